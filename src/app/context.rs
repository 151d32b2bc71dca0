//! Process-wide state, built once in a fixed order and shared by every query.
//!
//! Startup order: ticker cache -> roster index -> trade feed. Roster failures
//! are fatal; feed and cache problems are logged and the context still comes up.

use chrono::NaiveDateTime;
use tracing::info;

use crate::cache::SecurityCache;
use crate::data::{SecuritySource, TradeFeed, YahooClient, feed_from_config};
use crate::domain::{AppConfig, LegislatorProfile};
use crate::error::AppError;
use crate::query::{
    AggregateFilters, AggregateView, TradeFilters, TradeSelection, TradeView, query_aggregates,
    query_legislator, query_trades, select_trades,
};
use crate::repo::TradeRepository;
use crate::roster::RosterIndex;

pub struct AppContext {
    pub config: AppConfig,
    pub roster: RosterIndex,
    pub cache: SecurityCache,
    pub trades: TradeRepository,
}

impl AppContext {
    /// Build the context with the real HTTP sources named by `config`.
    pub fn initialize(config: AppConfig) -> Result<Self, AppError> {
        let feed = feed_from_config(&config)?;
        let security = YahooClient::new(config.http_timeout)?;
        Self::with_sources(config, feed.as_ref(), Box::new(security))
    }

    /// Build the context with injected sources.
    pub fn with_sources(
        config: AppConfig,
        feed: &dyn TradeFeed,
        security: Box<dyn SecuritySource>,
    ) -> Result<Self, AppError> {
        let cache = SecurityCache::load(config.cache_path.clone(), security);
        let roster = RosterIndex::load(&config)?;
        let trades = TradeRepository::load(feed);

        info!(
            trades = trades.len(),
            legislators = roster.legislator_count(),
            cached_tickers = cache.len(),
            "startup complete"
        );

        Ok(Self {
            config,
            roster,
            cache,
            trades,
        })
    }

    pub fn aggregates(&self, filters: &AggregateFilters, page: usize) -> AggregateView {
        query_aggregates(&self.trades, &self.roster, filters, page)
    }

    /// One page of the trade view; `now` anchors the default date window.
    pub fn trades_at(&self, filters: &TradeFilters, page: usize, now: NaiveDateTime) -> TradeView {
        query_trades(&self.trades, &self.roster, &self.cache, filters, page, now)
    }

    /// Every matching trade, unpaginated.
    pub fn select_trades_at(&self, filters: &TradeFilters, now: NaiveDateTime) -> TradeSelection {
        select_trades(&self.trades, &self.roster, &self.cache, filters, now)
    }

    pub fn legislator(&self, name: &str, page: usize) -> Result<LegislatorProfile, AppError> {
        query_legislator(&self.trades, &self.roster, &self.cache, name, page)
    }

    /// Persist the ticker cache. Call once on normal exit.
    pub fn shutdown(&self) -> Result<(), AppError> {
        self.cache.flush()?;
        info!(cached_tickers = self.cache.len(), "ticker cache flushed");
        Ok(())
    }
}
