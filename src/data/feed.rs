//! Bulk congressional trading feed.
//!
//! Sources return the raw response body; turning it into records (and deciding
//! what a bad body means) is the repository's job.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};

use crate::domain::{AppConfig, FeedSource};
use crate::error::AppError;

/// Something that can hand back the bulk trade feed as a JSON string.
pub trait TradeFeed: Send + Sync {
    fn fetch(&self) -> Result<String, AppError>;

    /// Short human-readable origin, for logs.
    fn describe(&self) -> String;
}

/// Build the feed named by the resolved config.
pub fn feed_from_config(config: &AppConfig) -> Result<Box<dyn TradeFeed>, AppError> {
    Ok(match &config.feed {
        FeedSource::Remote { url, token } => Box::new(QuiverClient::new(
            url.clone(),
            token.clone(),
            config.http_timeout,
        )?),
        FeedSource::File(path) => Box::new(FileFeed::new(path.clone())),
    })
}

/// QuiverQuant bulk endpoint, authenticated with a bearer token.
pub struct QuiverClient {
    client: Client,
    url: String,
    token: Option<String>,
}

impl QuiverClient {
    pub fn new(url: String, token: Option<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, url, token })
    }
}

impl TradeFeed for QuiverClient {
    fn fetch(&self) -> Result<String, AppError> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| AppError::FeedFetch("missing QAPI_TOKEN in environment (.env)".into()))?;

        let resp = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .map_err(|e| AppError::FeedFetch(format!("request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| AppError::FeedFetch(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(AppError::FeedFetch(format!(
                "request failed with status {status}: {}",
                body_excerpt(&body)
            )));
        }
        Ok(body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// A feed snapshot saved to disk.
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TradeFeed for FileFeed {
    fn fetch(&self) -> Result<String, AppError> {
        fs::read_to_string(&self.path)
            .map_err(|e| AppError::FeedFetch(format!("failed to read '{}': {e}", self.path.display())))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// How much of a bad response body goes into errors and logs.
pub const RAW_PREFIX_CHARS: usize = 300;

/// Leading part of a response body, for diagnostics.
pub fn body_excerpt(body: &str) -> &str {
    prefix(body, RAW_PREFIX_CHARS)
}

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_excerpt_is_capped() {
        let body = "é".repeat(RAW_PREFIX_CHARS + 50);
        assert_eq!(body_excerpt(&body).chars().count(), RAW_PREFIX_CHARS);
        assert_eq!(body_excerpt("short body"), "short body");
    }

    #[test]
    fn prefix_respects_char_boundaries() {
        assert_eq!(prefix("abc", 10), "abc");
        assert_eq!(prefix("1K–15K", 3), "1K–");
        assert_eq!(prefix("", 3), "");
    }

    #[test]
    fn file_feed_reports_missing_file_as_feed_error() {
        let feed = FileFeed::new(PathBuf::from("/no/such/feed.json"));
        assert!(matches!(feed.fetch(), Err(AppError::FeedFetch(_))));
    }

    #[test]
    fn remote_feed_without_token_fails_before_sending() {
        let client = QuiverClient::new(
            "http://127.0.0.1:9/unused".into(),
            None,
            Duration::from_millis(50),
        )
        .unwrap();
        let err = client.fetch().unwrap_err();
        assert!(err.to_string().contains("QAPI_TOKEN"));
    }
}
