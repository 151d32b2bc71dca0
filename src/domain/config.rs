//! Resolved runtime configuration.
//!
//! Values come from CLI flags first, then the environment (`.env` is loaded via
//! `dotenvy`), then the defaults below.

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_FEED_URL: &str = "https://api.quiverquant.com/beta/bulk/congresstrading";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_CACHE_PATH: &str = "ticker_cache.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const ENV_TOKEN: &str = "QAPI_TOKEN";
pub const ENV_DATA_DIR: &str = "CONGRESS_DATA_DIR";
pub const ENV_CACHE_PATH: &str = "TICKER_CACHE_PATH";
pub const ENV_FEED_URL: &str = "CONGRESS_FEED_URL";
pub const ENV_TIMEOUT: &str = "HTTP_TIMEOUT_SECS";

/// Where the trade feed is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// Bulk HTTP endpoint with an optional bearer token.
    Remote { url: String, token: Option<String> },
    /// A JSON array saved to disk.
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub cache_path: PathBuf,
    pub feed: FeedSource,
    pub http_timeout: Duration,
}

impl AppConfig {
    /// Roster files in load order: current legislators first, so that the
    /// historical roster wins on duplicate ids.
    pub fn legislator_files(&self) -> Vec<PathBuf> {
        vec![
            self.data_dir.join("legislators-current.yaml"),
            self.data_dir.join("legislators-historical.yaml"),
        ]
    }

    pub fn membership_file(&self) -> PathBuf {
        self.data_dir.join("committee-membership-current.yaml")
    }

    pub fn committees_file(&self) -> PathBuf {
        self.data_dir.join("committees-historical.yaml")
    }

    /// Config pointing every path under `dir`, reading the feed from a file.
    pub fn offline(dir: &Path, feed_file: PathBuf) -> Self {
        Self {
            data_dir: dir.to_path_buf(),
            cache_path: dir.join(DEFAULT_CACHE_PATH),
            feed: FeedSource::File(feed_file),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
