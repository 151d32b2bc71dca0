//! Input/output helpers.
//!
//! - CSV export of trade selections (`export`)

pub mod export;

pub use export::*;
