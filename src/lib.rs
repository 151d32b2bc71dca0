//! `congress-trades` library crate.
//!
//! Joins the bulk congressional stock-trading disclosure feed with the
//! legislator roster, committee assignments and company metadata, then serves
//! filtered, paginated views over the result.
//!
//! The binary (`ctrades`) is a thin wrapper around this library so that the
//! query engine is testable without spawning processes or touching the network.

pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod domain;
pub mod enrich;
pub mod error;
pub mod io;
pub mod logging;
pub mod query;
pub mod report;
pub mod repo;
pub mod roster;
