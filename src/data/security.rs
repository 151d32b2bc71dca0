//! Security metadata lookups (company name and industry by ticker).

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde::Deserialize;

use crate::error::AppError;

const BASE_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const MODULES: &str = "price,assetProfile";
const AGENT: &str = "Mozilla/5.0 (compatible; congress-trades/0.1)";

/// Raw metadata for one ticker. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityQuote {
    pub long_name: Option<String>,
    pub short_name: Option<String>,
    pub industry: Option<String>,
}

pub trait SecuritySource: Send + Sync {
    fn fetch_security(&self, ticker: &str) -> Result<SecurityQuote, AppError>;
}

/// Yahoo Finance quote-summary endpoint.
pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        Self::with_base_url(BASE_URL.to_string(), timeout)
    }

    pub fn with_base_url(base_url: String, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, base_url })
    }
}

impl SecuritySource for YahooClient {
    fn fetch_security(&self, ticker: &str) -> Result<SecurityQuote, AppError> {
        let url = format!("{}/{ticker}", self.base_url);
        let resp = self
            .client
            .get(&url)
            .header(USER_AGENT, AGENT)
            .query(&[("modules", MODULES)])
            .send()
            .map_err(|e| AppError::metadata(ticker, format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::metadata(
                ticker,
                format!("request failed with status {}", resp.status()),
            ));
        }

        let body: QuoteSummaryResponse = resp
            .json()
            .map_err(|e| AppError::metadata(ticker, format!("failed to parse response: {e}")))?;

        body.quote_summary
            .result
            .into_iter()
            .flatten()
            .next()
            .map(QuoteResult::into_quote)
            .ok_or_else(|| AppError::metadata(ticker, "empty quote summary"))
    }
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    #[serde(default)]
    result: Option<Vec<QuoteResult>>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteResult {
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(rename = "assetProfile", default)]
    asset_profile: Option<AssetProfileModule>,
}

#[derive(Debug, Default, Deserialize)]
struct PriceModule {
    #[serde(rename = "longName", default)]
    long_name: Option<serde_json::Value>,
    #[serde(rename = "shortName", default)]
    short_name: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetProfileModule {
    #[serde(default)]
    industry: Option<String>,
}

impl QuoteResult {
    fn into_quote(self) -> SecurityQuote {
        let price = self.price.unwrap_or_default();
        SecurityQuote {
            long_name: string_only(price.long_name),
            short_name: string_only(price.short_name),
            industry: self.asset_profile.and_then(|p| p.industry),
        }
    }
}

/// Stands in for a present but non-text name. All digits, so it is rejected
/// as a name exactly like a digit-only string.
const NON_TEXT_NAME: &str = "0";

/// Names sometimes come back as numbers. A non-empty non-string value still
/// counts as "present" (it wins over `shortName`) but never as a usable name.
fn string_only(value: Option<serde_json::Value>) -> Option<String> {
    use serde_json::Value;

    match value? {
        Value::String(s) => Some(s),
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        _ => Some(NON_TEXT_NAME.to_string()),
    }
}
