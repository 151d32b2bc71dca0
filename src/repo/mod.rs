//! In-memory store of raw trade records.
//!
//! Filled once at startup and never refreshed. A feed that cannot be fetched or
//! parsed leaves the repository empty instead of stopping the process.

use tracing::{error, info, warn};

use crate::data::TradeFeed;
use crate::data::feed::body_excerpt;
use crate::domain::TradeRecord;
use crate::error::AppError;

#[derive(Debug, Clone, Default)]
pub struct TradeRepository {
    records: Vec<TradeRecord>,
}

/// Result of parsing a feed body.
#[derive(Debug, Clone)]
pub struct ParsedFeed {
    pub records: Vec<TradeRecord>,
    /// Array elements that were not trade objects.
    pub skipped: usize,
}

impl TradeRepository {
    pub fn load(feed: &dyn TradeFeed) -> Self {
        let body = match feed.fetch() {
            Ok(body) => body,
            Err(err) => {
                error!(source = %feed.describe(), %err, "failed to fetch trade feed; starting with no trades");
                return Self::default();
            }
        };

        match parse_feed(&body) {
            Ok(parsed) => {
                if parsed.skipped > 0 {
                    warn!(skipped = parsed.skipped, "skipped feed entries that are not trade objects");
                }
                info!(source = %feed.describe(), records = parsed.records.len(), "loaded trade feed");
                Self::from_records(parsed.records)
            }
            Err(err) => {
                error!(
                    %err,
                    output = %body_excerpt(&body),
                    "failed to parse trade feed; starting with no trades"
                );
                Self::default()
            }
        }
    }

    pub fn from_records(records: Vec<TradeRecord>) -> Self {
        Self { records }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TradeRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a TradeRepository {
    type Item = &'a TradeRecord;
    type IntoIter = std::slice::Iter<'a, TradeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Parse a feed body: it must be a JSON array; elements that do not look like
/// trade objects are counted and dropped.
pub fn parse_feed(body: &str) -> Result<ParsedFeed, AppError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(body)
        .map_err(|e| AppError::FeedFetch(format!("malformed feed JSON: {e}")))?;

    let mut records = Vec::with_capacity(values.len());
    let mut skipped = 0usize;
    for value in values {
        if !value.is_object() {
            skipped += 1;
            continue;
        }
        match serde_json::from_value::<TradeRecord>(value) {
            Ok(record) => records.push(record),
            Err(_) => skipped += 1,
        }
    }

    Ok(ParsedFeed { records, skipped })
}
