//! Formatted terminal output for query views.
//!
//! Formatting lives in one place so the query code stays free of
//! presentation concerns and output changes stay localized.

pub mod format;

pub use format::*;
