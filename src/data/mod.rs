//! External data sources.
//!
//! - `feed`: the bulk trade feed (HTTP or a saved snapshot)
//! - `security`: per-ticker company metadata

pub mod feed;
pub mod security;

pub use feed::{FileFeed, QuiverClient, TradeFeed, feed_from_config};
pub use security::{SecurityQuote, SecuritySource, YahooClient};
