//! Ticker -> company metadata cache, persisted as JSON between runs.
//!
//! A ticker is looked up externally at most once per process. Successful
//! lookups are written through to disk immediately; failed lookups are cached
//! in memory as `FailedFallback` and never written, so they get another chance
//! after a restart (or after `invalidate_failed`).

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::data::{SecurityQuote, SecuritySource};
use crate::domain::SecurityInfo;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Came from the metadata source (or the cache file).
    Resolved,
    /// The source failed; `info` is the ticker/"General" placeholder.
    FailedFallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub info: SecurityInfo,
    pub status: EntryStatus,
}

pub struct SecurityCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    source: Box<dyn SecuritySource>,
    path: Option<PathBuf>,
    /// Serializes writers of the cache file.
    write_lock: Mutex<()>,
}

impl SecurityCache {
    /// Empty cache. With `path = None` nothing is ever written to disk.
    pub fn new(source: Box<dyn SecuritySource>, path: Option<PathBuf>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            source,
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Cache seeded from `path`. A missing or corrupt file starts empty.
    pub fn load(path: PathBuf, source: Box<dyn SecuritySource>) -> Self {
        let cache = Self::new(source, Some(path.clone()));
        match read_cache_file(&path) {
            Ok(stored) => {
                let mut entries = cache.entries.write();
                for (ticker, info) in stored {
                    entries.insert(
                        ticker.to_uppercase(),
                        CacheEntry {
                            info,
                            status: EntryStatus::Resolved,
                        },
                    );
                }
                info!(path = %path.display(), entries = entries.len(), "loaded ticker cache");
            }
            Err(CacheFileError::Missing) => {
                debug!(path = %path.display(), "no ticker cache file; starting empty");
            }
            Err(CacheFileError::Unreadable(reason)) => {
                warn!(path = %path.display(), %reason, "failed to load ticker cache; starting empty");
            }
        }
        cache
    }

    /// Company name and industry for `ticker`, calling the source only when the
    /// ticker has never been seen.
    pub fn lookup(&self, ticker: &str) -> SecurityInfo {
        let key = match normalize_ticker(ticker) {
            Some(key) => key,
            None => return SecurityInfo::unknown(),
        };

        if let Some(entry) = self.entries.read().get(&key) {
            return entry.info.clone();
        }

        // Not holding the lock across the call: two cold lookups of the same
        // ticker may both reach the source, and the last write wins.
        match self.source.fetch_security(&key) {
            Ok(quote) => {
                let info = info_from_quote(&key, quote);
                self.insert(&key, info.clone(), EntryStatus::Resolved);
                if let Err(err) = self.flush() {
                    warn!(%err, "failed to persist ticker cache");
                }
                info
            }
            Err(err) => {
                warn!(ticker = %key, %err, "security lookup failed; using fallback");
                let info = SecurityInfo::fallback(&key);
                self.insert(&key, info.clone(), EntryStatus::FailedFallback);
                info
            }
        }
    }

    /// Cached entry for `ticker`, without ever calling the source.
    pub fn peek(&self, ticker: &str) -> Option<CacheEntry> {
        let key = normalize_ticker(ticker)?;
        self.entries.read().get(&key).cloned()
    }

    /// Drop every `FailedFallback` entry so the next lookup retries the source.
    pub fn invalidate_failed(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.status == EntryStatus::Resolved);
        let dropped = before - entries.len();
        if dropped > 0 {
            info!(dropped, "invalidated failed ticker lookups");
        }
        dropped
    }

    /// Write all resolved entries to the cache file (no-op without a path).
    ///
    /// One writer at a time; the snapshot is taken under the write lock so the
    /// last flush to finish always carries every entry resolved before it.
    pub fn flush(&self) -> Result<(), AppError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let _writing = self.write_lock.lock();
        let snapshot: BTreeMap<String, SecurityInfo> = self
            .entries
            .read()
            .iter()
            .filter(|(_, entry)| entry.status == EntryStatus::Resolved)
            .map(|(ticker, entry)| (ticker.clone(), entry.info.clone()))
            .collect();

        write_cache_file(path, &snapshot)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn failed_count(&self) -> usize {
        self.entries
            .read()
            .values()
            .filter(|entry| entry.status == EntryStatus::FailedFallback)
            .count()
    }

    fn insert(&self, key: &str, info: SecurityInfo, status: EntryStatus) {
        self.entries
            .write()
            .insert(key.to_string(), CacheEntry { info, status });
    }
}

fn normalize_ticker(ticker: &str) -> Option<String> {
    let trimmed = ticker.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// Long name, else short name; blank or all-digit names fall back to the ticker.
pub fn info_from_quote(ticker: &str, quote: SecurityQuote) -> SecurityInfo {
    let name = quote
        .long_name
        .filter(|n| !n.is_empty())
        .or(quote.short_name.filter(|n| !n.is_empty()))
        .filter(|n| {
            let trimmed = n.trim();
            !trimmed.is_empty() && !trimmed.chars().all(|c| c.is_ascii_digit())
        })
        .unwrap_or_else(|| ticker.to_string());

    let industry = quote
        .industry
        .filter(|i| !i.trim().is_empty())
        .unwrap_or_else(|| SecurityInfo::DEFAULT_INDUSTRY.to_string());

    SecurityInfo { name, industry }
}

enum CacheFileError {
    Missing,
    Unreadable(String),
}

fn read_cache_file(path: &Path) -> Result<BTreeMap<String, SecurityInfo>, CacheFileError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CacheFileError::Missing,
        _ => CacheFileError::Unreadable(e.to_string()),
    })?;
    serde_json::from_reader(file).map_err(|e| CacheFileError::Unreadable(e.to_string()))
}

fn write_cache_file(path: &Path, entries: &BTreeMap<String, SecurityInfo>) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::CacheWrite(format!("failed to create '{}': {e}", parent.display())))?;
    }

    // Readers only ever see a complete file: write a sibling, then rename over.
    let tmp = temp_path(path);
    let file = File::create(&tmp)
        .map_err(|e| AppError::CacheWrite(format!("failed to create '{}': {e}", tmp.display())))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, entries)
        .map_err(|e| AppError::CacheWrite(format!("failed to write '{}': {e}", tmp.display())))?;
    writer
        .flush()
        .map_err(|e| AppError::CacheWrite(format!("failed to write '{}': {e}", tmp.display())))?;
    drop(writer);

    fs::rename(&tmp, path).map_err(|e| {
        AppError::CacheWrite(format!(
            "failed to replace '{}' with '{}': {e}",
            path.display(),
            tmp.display()
        ))
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
