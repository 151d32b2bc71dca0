//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw feed records (`TradeRecord`) and security metadata (`SecurityInfo`)
//! - derived views (`LegislatorAggregate`, `EnrichedTrade`, `LegislatorProfile`)
//! - the trade-size label set (`SizeBucket`) and result pages (`Page`)
//! - resolved runtime configuration (`AppConfig`)

pub mod config;
pub mod types;

pub use config::*;
pub use types::*;
