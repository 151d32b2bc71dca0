//! Flat, date-windowed trade listing.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::cache::SecurityCache;
use crate::domain::{EnrichedTrade, Page, SizeBucket, TradeRecord};
use crate::enrich::{bucket_trade_size, enrich_with_info};
use crate::repo::TradeRepository;
use crate::roster::RosterIndex;

use super::{TRADE_PAGE_SIZE, paginate};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default look-back window when no usable `after` date is given.
const DEFAULT_WINDOW_DAYS: i64 = 3 * 365;

/// Empty fields (and empty lists) do not filter. List fields match when any
/// selected value matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeFilters {
    pub name: String,
    pub party: String,
    pub state: String,
    pub industries: Vec<String>,
    pub committees: Vec<String>,
    pub transaction: String,
    pub size: Option<SizeBucket>,
    /// `YYYY-MM-DD`; trades dated before it are dropped.
    pub after: Option<String>,
}

/// Picker values over every trade inside the date window, before any other
/// filter is applied.
///
/// Empty values are left out of every list, party and transaction included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeOptions {
    pub industries: Vec<String>,
    pub committees: Vec<String>,
    pub parties: Vec<String>,
    pub states: Vec<String>,
    pub transactions: Vec<String>,
    pub sizes: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeView {
    pub page: Page<EnrichedTrade>,
    pub options: TradeOptions,
    /// The window start actually applied.
    pub after: NaiveDateTime,
}

/// Start of the date window: the `after` filter if it parses, otherwise three
/// years before `now`.
pub fn resolve_after(after: Option<&str>, now: NaiveDateTime) -> NaiveDateTime {
    after
        .filter(|raw| !raw.is_empty())
        .and_then(parse_date)
        .unwrap_or_else(|| now - Duration::days(DEFAULT_WINDOW_DAYS))
}

fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Every trade that passes `filters`, before pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeSelection {
    pub trades: Vec<EnrichedTrade>,
    pub options: TradeOptions,
    pub after: NaiveDateTime,
}

/// Trades on or after the window start that pass every filter, in feed order.
///
/// Trades whose date does not parse are left out entirely, options included.
/// Industry comes from the security cache, so cold tickers are looked up here.
pub fn select_trades(
    repo: &TradeRepository,
    roster: &RosterIndex,
    cache: &SecurityCache,
    filters: &TradeFilters,
    now: NaiveDateTime,
) -> TradeSelection {
    let after = resolve_after(filters.after.as_deref(), now);
    let needle = filters.name.to_lowercase();

    let mut options = OptionSets::default();
    let mut matched = Vec::new();

    for trade in repo {
        let Some(traded) = parse_date(&trade.traded) else {
            continue;
        };
        if traded < after {
            continue;
        }

        let bioguide = trade.bioguide();
        let info = cache.lookup(&trade.ticker);
        let committees = roster.committees_of(bioguide);
        let state = roster.state_of(bioguide);

        options.record(trade, &info.industry, committees, state);

        let passes = trade.name.to_lowercase().contains(&needle)
            && (filters.party.is_empty() || trade.party == filters.party)
            && (filters.state.is_empty() || state == filters.state)
            && (filters.industries.is_empty() || filters.industries.contains(&info.industry))
            && (filters.transaction.is_empty() || trade.transaction == filters.transaction)
            && filters
                .size
                .is_none_or(|size| bucket_trade_size(trade.trade_size_usd.as_deref()) == size)
            && (filters.committees.is_empty()
                || committees.iter().any(|c| filters.committees.contains(c)));

        if passes {
            matched.push(enrich_with_info(trade, &info, roster));
        }
    }

    TradeSelection {
        trades: matched,
        options: options.finish(),
        after,
    }
}

/// One page of `select_trades`.
pub fn query_trades(
    repo: &TradeRepository,
    roster: &RosterIndex,
    cache: &SecurityCache,
    filters: &TradeFilters,
    page: usize,
    now: NaiveDateTime,
) -> TradeView {
    let selection = select_trades(repo, roster, cache, filters, now);
    TradeView {
        page: paginate(selection.trades, page, TRADE_PAGE_SIZE),
        options: selection.options,
        after: selection.after,
    }
}

#[derive(Default)]
struct OptionSets {
    industries: BTreeSet<String>,
    committees: BTreeSet<String>,
    parties: BTreeSet<String>,
    states: BTreeSet<String>,
    transactions: BTreeSet<String>,
}

impl OptionSets {
    fn record(&mut self, trade: &TradeRecord, industry: &str, committees: &[String], state: &str) {
        insert_non_empty(&mut self.industries, industry);
        for committee in committees {
            insert_non_empty(&mut self.committees, committee);
        }
        insert_non_empty(&mut self.parties, &trade.party);
        insert_non_empty(&mut self.states, state);
        insert_non_empty(&mut self.transactions, &trade.transaction);
    }

    fn finish(self) -> TradeOptions {
        TradeOptions {
            industries: self.industries.into_iter().collect(),
            committees: self.committees.into_iter().collect(),
            parties: self.parties.into_iter().collect(),
            states: self.states.into_iter().collect(),
            transactions: self.transactions.into_iter().collect(),
            sizes: SizeBucket::labels(),
        }
    }
}

fn insert_non_empty(set: &mut BTreeSet<String>, value: &str) {
    if !value.is_empty() && !set.contains(value) {
        set.insert(value.to_string());
    }
}
