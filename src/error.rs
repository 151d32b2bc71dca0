//! Application error type.
//!
//! Every failure carries the process exit code the binary reports. Feed and
//! metadata failures are recovered from where they happen and only logged;
//! the rest can reach `main`.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// Roster or committee file missing or unparsable. The process must not serve.
    #[error("startup data error: {0}")]
    StartupData(String),

    /// Trade feed unavailable or malformed.
    #[error("trade feed error: {0}")]
    FeedFetch(String),

    /// Security metadata lookup failed or timed out.
    #[error("security lookup failed for {ticker}: {message}")]
    MetadataLookup { ticker: String, message: String },

    /// No trade matches the requested legislator.
    #[error("legislator not found: {0}")]
    NotFound(String),

    /// Bad CLI arguments or environment.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("export failed: {0}")]
    Export(String),

    /// The ticker cache file could not be written.
    #[error("cache write failed: {0}")]
    CacheWrite(String),
}

impl AppError {
    pub fn metadata(ticker: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MetadataLookup {
            ticker: ticker.into(),
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => 2,
            AppError::StartupData(_) => 3,
            AppError::FeedFetch(_) | AppError::MetadataLookup { .. } => 4,
            AppError::NotFound(_) => 5,
            AppError::Export(_) | AppError::CacheWrite(_) => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_distinguish_fatal_and_client_errors() {
        assert_eq!(AppError::StartupData("x".into()).exit_code(), 3);
        assert_eq!(AppError::NotFound("Jane Doe".into()).exit_code(), 5);
        assert_ne!(
            AppError::Config("x".into()).exit_code(),
            AppError::Export("x".into()).exit_code()
        );
    }

    #[test]
    fn metadata_error_names_the_ticker() {
        let err = AppError::metadata("AAPL", "timed out");
        assert_eq!(err.to_string(), "security lookup failed for AAPL: timed out");
    }
}
