//! Shared domain types.
//!
//! Raw feed records come in as loosely typed JSON, so `TradeRecord` accepts
//! strings, numbers and nulls for every field. Everything derived from it
//! (`EnrichedTrade`, `LegislatorAggregate`) is plain owned data, rebuilt per
//! query and serializable for export.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

/// One disclosure row from the bulk congressional trading feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    #[serde(rename = "Name", default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(rename = "BioGuideID", default, deserialize_with = "lenient::opt_text")]
    pub bioguide_id: Option<String>,
    #[serde(rename = "Party", default, deserialize_with = "lenient::text")]
    pub party: String,
    #[serde(rename = "Chamber", default, deserialize_with = "lenient::text")]
    pub chamber: String,
    #[serde(rename = "Ticker", default, deserialize_with = "lenient::text")]
    pub ticker: String,
    #[serde(rename = "Transaction", default, deserialize_with = "lenient::text")]
    pub transaction: String,
    /// ISO `YYYY-MM-DD`, but not guaranteed to parse.
    #[serde(rename = "Traded", default, deserialize_with = "lenient::text")]
    pub traded: String,
    #[serde(rename = "Filed", default, deserialize_with = "lenient::text")]
    pub filed: String,
    #[serde(rename = "Price", default, deserialize_with = "lenient::opt_text")]
    pub price: Option<String>,
    #[serde(rename = "Trade_Size_USD", default, deserialize_with = "lenient::opt_text")]
    pub trade_size_usd: Option<String>,
}

impl TradeRecord {
    /// Bioguide id, or `""` when the feed left it out.
    pub fn bioguide(&self) -> &str {
        self.bioguide_id.as_deref().unwrap_or("")
    }
}

/// Company metadata for a ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityInfo {
    pub name: String,
    pub industry: String,
}

impl SecurityInfo {
    pub const DEFAULT_INDUSTRY: &'static str = "General";

    pub fn new(name: impl Into<String>, industry: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            industry: industry.into(),
        }
    }

    /// Returned for blank tickers; never cached.
    pub fn unknown() -> Self {
        Self::new("Unknown", "Unknown")
    }

    /// Substituted when the metadata source fails for `ticker`.
    pub fn fallback(ticker: &str) -> Self {
        Self::new(ticker, Self::DEFAULT_INDUSTRY)
    }
}

/// Per-legislator rollup for the listing view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegislatorAggregate {
    pub name: String,
    pub party: String,
    pub chamber: String,
    pub state: String,
    pub committees: Vec<String>,
    pub trades: usize,
    /// `Traded` of the record that created this aggregate.
    pub last_traded: String,
}

/// A trade joined with roster and security metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedTrade {
    pub name: String,
    pub bioguide_id: Option<String>,
    pub party: String,
    pub chamber: String,
    pub state: String,
    pub ticker: String,
    pub company_name: String,
    pub industry: String,
    pub transaction: String,
    pub traded: String,
    pub filed: String,
    pub price: Option<String>,
    pub size: SizeBucket,
}

/// Coarse trade-size label.
///
/// The label text (including the en dash) is what callers filter on, so
/// `label()` must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SizeBucket {
    Under1K,
    From1KTo15K,
    From15KTo50K,
    From50KTo100K,
    From100KTo250K,
    From250KTo500K,
    From500KTo1M,
    From1MTo5M,
    From5MTo25M,
    From25MTo50M,
    Over50M,
    Unknown,
}

impl SizeBucket {
    /// Every bucket a parsable amount can land in, smallest first.
    pub const ALL: [SizeBucket; 11] = [
        SizeBucket::Under1K,
        SizeBucket::From1KTo15K,
        SizeBucket::From15KTo50K,
        SizeBucket::From50KTo100K,
        SizeBucket::From100KTo250K,
        SizeBucket::From250KTo500K,
        SizeBucket::From500KTo1M,
        SizeBucket::From1MTo5M,
        SizeBucket::From5MTo25M,
        SizeBucket::From25MTo50M,
        SizeBucket::Over50M,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SizeBucket::Under1K => "< 1K",
            SizeBucket::From1KTo15K => "1K–15K",
            SizeBucket::From15KTo50K => "15K–50K",
            SizeBucket::From50KTo100K => "50K–100K",
            SizeBucket::From100KTo250K => "100K–250K",
            SizeBucket::From250KTo500K => "250K–500K",
            SizeBucket::From500KTo1M => "500K–1M",
            SizeBucket::From1MTo5M => "1M–5M",
            SizeBucket::From5MTo25M => "5M–25M",
            SizeBucket::From25MTo50M => "25M–50M",
            SizeBucket::Over50M => "50M+",
            SizeBucket::Unknown => "Unknown",
        }
    }

    /// Inverse of `label()`. An ASCII `-` is accepted in place of the en dash.
    pub fn from_label(raw: &str) -> Option<SizeBucket> {
        let wanted = raw.trim().replace('-', "–");
        SizeBucket::ALL
            .into_iter()
            .chain(std::iter::once(SizeBucket::Unknown))
            .find(|b| b.label().eq_ignore_ascii_case(&wanted))
    }

    /// Option list for size pickers.
    pub fn labels() -> Vec<&'static str> {
        SizeBucket::ALL.iter().map(|b| b.label()).collect()
    }
}

impl fmt::Display for SizeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SizeBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SizeBucket::from_label(s).ok_or_else(|| {
            format!(
                "unknown size bucket '{s}' (expected one of: {})",
                SizeBucket::labels().join(", ")
            )
        })
    }
}

impl Serialize for SizeBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One page of a result list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-indexed page that was requested.
    pub page: usize,
    pub page_size: usize,
    /// Number of items across all pages.
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

/// Header plus one page of trade history for a single legislator.
#[derive(Debug, Clone, PartialEq)]
pub struct LegislatorProfile {
    pub name: String,
    pub party: String,
    pub chamber: String,
    pub state: String,
    pub committees: Vec<String>,
    pub trades: Page<EnrichedTrade>,
}

/// Feed values arrive as strings, numbers or null depending on the field and
/// the day.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(opt_text(deserializer)?.unwrap_or_default())
    }
}
