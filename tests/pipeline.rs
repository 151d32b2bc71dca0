//! End-to-end queries over roster files and a saved feed on disk.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{NaiveDate, NaiveDateTime};
use congress_trades::app::AppContext;
use congress_trades::cache::EntryStatus;
use congress_trades::data::{FileFeed, SecurityQuote, SecuritySource};
use congress_trades::domain::{AppConfig, FeedSource, SizeBucket};
use congress_trades::error::AppError;
use congress_trades::query::{AggregateFilters, TradeFilters};

const LEGISLATORS_CURRENT: &str = r#"
- id: { bioguide: A000001 }
  terms:
    - { state: NY }
    - { state: CA }
- id: { bioguide: B000002 }
  terms:
    - { state: TX }
"#;

const LEGISLATORS_HISTORICAL: &str = r#"
- id: { bioguide: C000003 }
  terms:
    - { state: OH }
"#;

const COMMITTEES: &str = r#"
- thomas_id: HSAG
  name: House Committee on Agriculture
  subcommittees:
    - { thomas_id: "15" }
- thomas_id: SSFI
  name: Senate Committee on Finance
"#;

const MEMBERSHIP: &str = r#"
HSAG15:
  - { bioguide: A000001 }
SSFI:
  - { bioguide: A000001 }
  - { bioguide: B000002 }
ZZZZ:
  - { bioguide: C000003 }
"#;

const FEED: &str = r#"[
  {"Name": "Alice A", "BioGuideID": "A000001", "Party": "D", "Chamber": "House",
   "Ticker": "AAPL", "Transaction": "Purchase", "Traded": "2023-01-01", "Filed": "2023-01-20",
   "Trade_Size_USD": "2000"},
  {"Name": "Alice A", "BioGuideID": "A000001", "Party": "D", "Chamber": "House",
   "Ticker": "aapl", "Transaction": "Sale", "Traded": "2023-06-01", "Filed": "2023-06-15",
   "Trade_Size_USD": 60000},
  {"Name": "Bob B", "BioGuideID": "B000002", "Party": "R", "Chamber": "Senate",
   "Ticker": "XOM", "Transaction": "Purchase", "Traded": "2023-03-01", "Filed": "2023-03-02",
   "Trade_Size_USD": "bogus"},
  {"Name": "Carol C", "BioGuideID": "C000003", "Party": "I", "Chamber": "House",
   "Ticker": "NOPE", "Transaction": "Purchase", "Traded": "not a date", "Filed": ""},
  "garbage"
]"#;

#[derive(Clone, Default)]
struct StubSource {
    calls: Arc<AtomicUsize>,
}

impl SecuritySource for StubSource {
    fn fetch_security(&self, ticker: &str) -> Result<SecurityQuote, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (name, industry) = match ticker {
            "AAPL" => ("Apple Inc.", "Consumer Electronics"),
            "XOM" => ("Exxon Mobil Corporation", "Oil & Gas Integrated"),
            _ => return Err(AppError::metadata(ticker, "no such symbol")),
        };
        Ok(SecurityQuote {
            long_name: Some(name.to_string()),
            short_name: None,
            industry: Some(industry.to_string()),
        })
    }
}

struct Unreachable;

impl SecuritySource for Unreachable {
    fn fetch_security(&self, ticker: &str) -> Result<SecurityQuote, AppError> {
        Err(AppError::metadata(ticker, "network down"))
    }
}

fn write_fixture(dir: &Path) -> AppConfig {
    fs::write(dir.join("legislators-current.yaml"), LEGISLATORS_CURRENT).unwrap();
    fs::write(dir.join("legislators-historical.yaml"), LEGISLATORS_HISTORICAL).unwrap();
    fs::write(dir.join("committees-historical.yaml"), COMMITTEES).unwrap();
    fs::write(dir.join("committee-membership-current.yaml"), MEMBERSHIP).unwrap();
    let feed = dir.join("feed.json");
    fs::write(&feed, FEED).unwrap();
    AppConfig::offline(dir, feed)
}

fn context(config: AppConfig, source: impl SecuritySource + 'static) -> AppContext {
    let FeedSource::File(path) = &config.feed else {
        panic!("fixture uses a file feed");
    };
    let feed = FileFeed::new(path.clone());
    AppContext::with_sources(config, &feed, Box::new(source)).unwrap()
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 7, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

#[test]
fn loads_feed_and_skips_non_objects() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(write_fixture(dir.path()), StubSource::default());
    assert_eq!(ctx.trades.len(), 4);
    assert_eq!(ctx.roster.legislator_count(), 3);
}

#[test]
fn aggregates_count_every_trade_once() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(write_fixture(dir.path()), StubSource::default());

    let view = ctx.aggregates(&AggregateFilters::default(), 1);
    let counts: Vec<(&str, usize)> = view
        .page
        .items
        .iter()
        .map(|a| (a.name.as_str(), a.trades))
        .collect();
    assert_eq!(counts, vec![("Alice A", 2), ("Bob B", 1), ("Carol C", 1)]);
    assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), ctx.trades.len());

    let alice = &view.page.items[0];
    assert_eq!(alice.state, "CA");
    assert_eq!(alice.last_traded, "2023-01-01");
    assert_eq!(
        alice.committees,
        vec!["House Committee on Agriculture", "Senate Committee on Finance"]
    );

    // ZZZZ is not a known committee, so Carol sits on none.
    assert!(view.page.items[2].committees.is_empty());
    assert_eq!(view.options.states, vec!["CA", "OH", "TX"]);
}

#[test]
fn aggregate_committee_filter_uses_display_names() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(write_fixture(dir.path()), StubSource::default());

    let filters = AggregateFilters {
        committee: "Senate Committee on Finance".to_string(),
        ..Default::default()
    };
    let view = ctx.aggregates(&filters, 1);
    let names: Vec<&str> = view.page.items.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Alice A", "Bob B"]);
}

#[test]
fn trades_after_date_are_enriched_and_bucketed() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(write_fixture(dir.path()), StubSource::default());

    let filters = TradeFilters {
        name: "alice".to_string(),
        after: Some("2023-02-01".to_string()),
        ..Default::default()
    };
    let view = ctx.trades_at(&filters, 1, now());
    assert_eq!(view.page.total, 1);

    let trade = &view.page.items[0];
    assert_eq!(trade.traded, "2023-06-01");
    assert_eq!(trade.ticker, "AAPL");
    assert_eq!(trade.company_name, "Apple Inc.");
    assert_eq!(trade.industry, "Consumer Electronics");
    assert_eq!(trade.state, "CA");
    assert_eq!(trade.size, SizeBucket::From50KTo100K);
    assert_eq!(trade.size.label(), "50K\u{2013}100K");
}

#[test]
fn trade_size_filter_matches_unknown_bucket() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(write_fixture(dir.path()), StubSource::default());

    let filters = TradeFilters {
        size: Some(SizeBucket::Unknown),
        after: Some("2020-01-01".to_string()),
        ..Default::default()
    };
    let view = ctx.trades_at(&filters, 1, now());
    let names: Vec<&str> = view.page.items.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Bob B"]);
    assert_eq!(view.options.transactions, vec!["Purchase", "Sale"]);
}

fn names(view: &congress_trades::query::TradeView) -> Vec<&str> {
    view.page.items.iter().map(|t| t.name.as_str()).collect()
}

fn since_2020() -> TradeFilters {
    TradeFilters {
        after: Some("2020-01-01".to_string()),
        ..Default::default()
    }
}

#[test]
fn trade_committee_filter_matches_any_shared_committee() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(write_fixture(dir.path()), StubSource::default());

    let finance = TradeFilters {
        committees: vec![
            "Senate Committee on Finance".to_string(),
            "Joint Committee on Taxation".to_string(),
        ],
        ..since_2020()
    };
    assert_eq!(names(&ctx.trades_at(&finance, 1, now())), vec!["Alice A", "Alice A", "Bob B"]);

    let agriculture = TradeFilters {
        committees: vec![
            "Joint Committee on Taxation".to_string(),
            "House Committee on Agriculture".to_string(),
        ],
        ..since_2020()
    };
    assert_eq!(names(&ctx.trades_at(&agriculture, 1, now())), vec!["Alice A", "Alice A"]);
}

#[test]
fn trade_party_and_state_filters_are_exact_and_combined() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(write_fixture(dir.path()), StubSource::default());

    let republicans = TradeFilters {
        party: "R".to_string(),
        ..since_2020()
    };
    assert_eq!(names(&ctx.trades_at(&republicans, 1, now())), vec!["Bob B"]);

    let california = TradeFilters {
        state: "CA".to_string(),
        ..since_2020()
    };
    assert_eq!(names(&ctx.trades_at(&california, 1, now())), vec!["Alice A", "Alice A"]);

    let mismatch = TradeFilters {
        party: "D".to_string(),
        state: "TX".to_string(),
        ..since_2020()
    };
    assert!(ctx.trades_at(&mismatch, 1, now()).page.items.is_empty());
}

#[test]
fn trade_options_cover_the_window_not_the_filtered_rows() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(write_fixture(dir.path()), StubSource::default());

    let filters = TradeFilters {
        party: "R".to_string(),
        committees: vec!["Senate Committee on Finance".to_string()],
        ..since_2020()
    };
    let view = ctx.trades_at(&filters, 1, now());
    assert_eq!(names(&view), vec!["Bob B"]);

    // Carol's only trade has an unusable date, so she contributes nothing.
    assert_eq!(view.options.parties, vec!["D", "R"]);
    assert_eq!(view.options.states, vec!["CA", "TX"]);
    assert_eq!(
        view.options.committees,
        vec!["House Committee on Agriculture", "Senate Committee on Finance"]
    );
    assert_eq!(
        view.options.industries,
        vec!["Consumer Electronics", "Oil & Gas Integrated"]
    );
}

#[test]
fn profile_sorts_newest_first_and_decodes_name() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(write_fixture(dir.path()), StubSource::default());

    let profile = ctx.legislator("Alice%20A", 1).unwrap();
    assert_eq!(profile.name, "Alice A");
    assert_eq!(profile.state, "CA");
    assert_eq!(profile.committees.len(), 2);
    let dates: Vec<&str> = profile.trades.items.iter().map(|t| t.traded.as_str()).collect();
    assert_eq!(dates, vec!["2023-06-01", "2023-01-01"]);

    let err = ctx.legislator("Nobody", 1).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn queries_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(write_fixture(dir.path()), StubSource::default());

    let filters = TradeFilters {
        after: Some("2020-01-01".to_string()),
        ..Default::default()
    };
    assert_eq!(ctx.trades_at(&filters, 1, now()), ctx.trades_at(&filters, 1, now()));
    assert_eq!(
        ctx.aggregates(&AggregateFilters::default(), 1),
        ctx.aggregates(&AggregateFilters::default(), 1)
    );
}

#[test]
fn resolved_tickers_survive_restart_and_failures_do_not() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());

    let source = StubSource::default();
    let ctx = context(config.clone(), source.clone());
    let filters = TradeFilters {
        after: Some("2020-01-01".to_string()),
        ..Default::default()
    };
    ctx.trades_at(&filters, 1, now());
    ctx.legislator("Carol C", 1).unwrap();
    ctx.trades_at(&filters, 1, now());
    // AAPL, XOM and NOPE, each fetched once.
    assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    assert_eq!(
        ctx.cache.peek("NOPE").map(|e| e.status),
        Some(EntryStatus::FailedFallback)
    );
    ctx.shutdown().unwrap();

    let restarted = context(config, Unreachable);
    assert_eq!(restarted.cache.len(), 2);
    assert!(restarted.cache.peek("NOPE").is_none());
    let profile = restarted.legislator("Bob B", 1).unwrap();
    assert_eq!(profile.trades.items[0].company_name, "Exxon Mobil Corporation");
}

#[test]
fn missing_roster_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());
    fs::remove_file(config.committees_file()).unwrap();

    let feed = FileFeed::new(dir.path().join("feed.json"));
    let err = AppContext::with_sources(config, &feed, Box::new(Unreachable))
        .err()
        .unwrap();
    assert!(matches!(err, AppError::StartupData(_)));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn unreadable_feed_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_fixture(dir.path());
    config.feed = FeedSource::File(dir.path().join("absent.json"));

    let ctx = context(config, Unreachable);
    assert!(ctx.trades.is_empty());
    assert!(ctx.aggregates(&AggregateFilters::default(), 1).page.items.is_empty());
}
