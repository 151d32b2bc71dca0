//! Filtered, paginated views over the enriched trade set.
//!
//! Every view follows the same shape: filter -> sort -> paginate, plus the
//! distinct values a front end needs to populate its filter pickers. Views are
//! recomputed from the base data on every call; nothing is memoized here.
//!
//! - `aggregates`: one row per legislator
//! - `trades`: one row per trade, date-windowed
//! - `profile`: one legislator's trade history

use crate::domain::Page;

pub mod aggregates;
pub mod profile;
pub mod trades;

pub use aggregates::{AggregateFilters, AggregateOptions, AggregateView, query_aggregates};
pub use profile::{percent_decode, query_legislator};
pub use trades::{TradeFilters, TradeOptions, TradeSelection, TradeView, query_trades, resolve_after, select_trades};

pub const AGGREGATE_PAGE_SIZE: usize = 20;
pub const TRADE_PAGE_SIZE: usize = 100;
pub const PROFILE_PAGE_SIZE: usize = 50;

/// Cut page `page` (1-indexed) out of `items`.
///
/// Page 0 and pages past the end are empty rather than errors.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(page_size);

    let items = match page.checked_sub(1).and_then(|p| p.checked_mul(page_size)) {
        Some(start) if start < total => items.into_iter().skip(start).take(page_size).collect(),
        _ => Vec::new(),
    };

    Page {
        items,
        page,
        page_size,
        total,
        total_pages,
    }
}
