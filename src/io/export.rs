//! Export enriched trades to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::path::Path;

use serde::Serialize;

use crate::domain::EnrichedTrade;
use crate::error::AppError;

#[derive(Serialize)]
struct TradeRow<'a> {
    name: &'a str,
    bioguide_id: &'a str,
    party: &'a str,
    chamber: &'a str,
    state: &'a str,
    ticker: &'a str,
    company: &'a str,
    industry: &'a str,
    transaction: &'a str,
    traded: &'a str,
    filed: &'a str,
    price: &'a str,
    size: &'static str,
}

impl<'a> From<&'a EnrichedTrade> for TradeRow<'a> {
    fn from(t: &'a EnrichedTrade) -> Self {
        TradeRow {
            name: &t.name,
            bioguide_id: t.bioguide_id.as_deref().unwrap_or(""),
            party: &t.party,
            chamber: &t.chamber,
            state: &t.state,
            ticker: &t.ticker,
            company: &t.company_name,
            industry: &t.industry,
            transaction: &t.transaction,
            traded: &t.traded,
            filed: &t.filed,
            price: t.price.as_deref().unwrap_or(""),
            size: t.size.label(),
        }
    }
}

/// Write `trades` to `path`, one row per trade, with a header line.
pub fn write_trades_csv(path: &Path, trades: &[EnrichedTrade]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::Export(format!("failed to create '{}': {e}", path.display())))?;

    for trade in trades {
        writer
            .serialize(TradeRow::from(trade))
            .map_err(|e| AppError::Export(format!("failed to write row for {}: {e}", trade.name)))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::Export(format!("failed to flush '{}': {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SizeBucket;

    fn trade(name: &str, ticker: &str) -> EnrichedTrade {
        EnrichedTrade {
            name: name.to_string(),
            bioguide_id: Some("X000001".to_string()),
            party: "D".to_string(),
            chamber: "House".to_string(),
            state: "CA".to_string(),
            ticker: ticker.to_string(),
            company_name: "Apple Inc., common".to_string(),
            industry: "Consumer Electronics".to_string(),
            transaction: "Purchase".to_string(),
            traded: "2024-01-02".to_string(),
            filed: "2024-01-20".to_string(),
            price: None,
            size: SizeBucket::From15KTo50K,
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.csv");
        write_trades_csv(&path, &[trade("Jane Doe", "AAPL"), trade("John Roe", "MSFT")]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.get(0), Some("name"));
        assert_eq!(headers.get(12), Some("size"));

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(6), Some("Apple Inc., common"));
        assert_eq!(rows[0].get(11), Some(""));
        assert_eq!(rows[1].get(5), Some("MSFT"));
        assert_eq!(rows[1].get(12), Some("15K\u{2013}50K"));
    }

    #[test]
    fn missing_directory_is_an_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("trades.csv");
        let err = write_trades_csv(&path, &[]).unwrap_err();
        assert!(matches!(err, AppError::Export(_)));
    }
}
