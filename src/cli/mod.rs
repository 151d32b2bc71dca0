//! Command-line parsing for the congressional trades browser.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! query engine: each subcommand maps onto one query view, and the args
//! convert straight into that view's filter struct.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::SizeBucket;
use crate::query::{AggregateFilters, TradeFilters};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "ctrades",
    version,
    about = "Browse congressional stock-trading disclosures with roster and company metadata"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Data locations. Each falls back to the environment, then a default.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Directory holding the legislator and committee YAML files [env: CONGRESS_DATA_DIR].
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Ticker cache JSON file [env: TICKER_CACHE_PATH].
    #[arg(long, global = true, value_name = "JSON")]
    pub cache: Option<PathBuf>,

    /// Read the trade feed from a saved JSON file instead of the API.
    #[arg(long, global = true, value_name = "JSON")]
    pub feed_file: Option<PathBuf>,

    /// Trade feed URL [env: CONGRESS_FEED_URL].
    #[arg(long, global = true, value_name = "URL")]
    pub feed_url: Option<String>,

    /// Timeout for each HTTP request, in seconds [env: HTTP_TIMEOUT_SECS].
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List legislators ranked by number of disclosed trades.
    Legislators(LegislatorArgs),
    /// List individual trades inside a date window.
    Trades(TradeArgs),
    /// Show one legislator's trade history, newest first.
    Profile(ProfileArgs),
}

#[derive(Debug, Clone, Parser)]
pub struct LegislatorArgs {
    /// Case-insensitive substring of the legislator's name.
    #[arg(long, default_value = "")]
    pub name: String,

    /// Exact party code (e.g. D, R, I).
    #[arg(long, default_value = "")]
    pub party: String,

    /// Two-letter state code.
    #[arg(long, default_value = "")]
    pub state: String,

    /// Exact committee name.
    #[arg(long, default_value = "")]
    pub committee: String,

    /// Page number (20 per page).
    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

#[derive(Debug, Clone, Parser)]
pub struct TradeArgs {
    /// Case-insensitive substring of the legislator's name.
    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub party: String,

    #[arg(long, default_value = "")]
    pub state: String,

    /// Industry to include; repeat for several.
    #[arg(long = "industry")]
    pub industries: Vec<String>,

    /// Committee to include; repeat for several.
    #[arg(long = "committee")]
    pub committees: Vec<String>,

    /// Exact transaction type (e.g. Purchase, Sale).
    #[arg(long, default_value = "")]
    pub transaction: String,

    /// Trade-size bucket, e.g. "15K-50K" or "50M+".
    #[arg(long)]
    pub size: Option<SizeBucket>,

    /// Only trades on or after this date (YYYY-MM-DD); defaults to three years ago.
    #[arg(long)]
    pub after: Option<String>,

    /// Page number (100 per page).
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Write every matching trade (all pages) to a CSV file.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Clone, Parser)]
pub struct ProfileArgs {
    /// Legislator name as it appears in the feed (URL-encoded is fine).
    pub name: String,

    /// Page number (50 per page).
    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

impl From<&LegislatorArgs> for AggregateFilters {
    fn from(args: &LegislatorArgs) -> Self {
        AggregateFilters {
            name: args.name.clone(),
            party: args.party.clone(),
            state: args.state.clone(),
            committee: args.committee.clone(),
        }
    }
}

impl From<&TradeArgs> for TradeFilters {
    fn from(args: &TradeArgs) -> Self {
        TradeFilters {
            name: args.name.clone(),
            party: args.party.clone(),
            state: args.state.clone(),
            industries: args.industries.clone(),
            committees: args.committees.clone(),
            transaction: args.transaction.clone(),
            size: args.size,
            after: args.after.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_trade_filters() {
        let cli = Cli::parse_from(argv(&[
            "ctrades",
            "trades",
            "--industry",
            "Biotechnology",
            "--industry",
            "Banks",
            "--size",
            "1K-15K",
            "--after",
            "2024-01-01",
            "--feed-file",
            "feed.json",
        ]));
        assert_eq!(cli.global.feed_file, Some(PathBuf::from("feed.json")));
        let Command::Trades(args) = cli.command else {
            panic!("expected trades subcommand");
        };
        let filters = TradeFilters::from(&args);
        assert_eq!(filters.industries, vec!["Biotechnology", "Banks"]);
        assert_eq!(filters.size, Some(SizeBucket::From1KTo15K));
        assert_eq!(filters.after.as_deref(), Some("2024-01-01"));
        assert_eq!(args.page, 1);
    }

    #[test]
    fn rejects_unknown_size_bucket() {
        let result = Cli::try_parse_from(argv(&["ctrades", "trades", "--size", "lots"]));
        assert!(result.is_err());
    }
}
