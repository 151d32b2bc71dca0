//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves configuration from flags, environment and defaults
//! - builds the shared context (cache, roster, trade feed)
//! - runs one query and prints it
//! - flushes the ticker cache on the way out

use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use clap::Parser;
use tracing::info;

use crate::cli::{Command, GlobalArgs, LegislatorArgs, ProfileArgs, TradeArgs};
use crate::domain::{
    AppConfig, DEFAULT_CACHE_PATH, DEFAULT_DATA_DIR, DEFAULT_FEED_URL, DEFAULT_TIMEOUT_SECS,
    ENV_CACHE_PATH, ENV_DATA_DIR, ENV_FEED_URL, ENV_TIMEOUT, ENV_TOKEN, FeedSource,
};
use crate::error::AppError;
use crate::query::{AggregateFilters, TradeFilters};

pub mod context;

pub use context::AppContext;

/// Entry point for the `ctrades` binary.
pub fn run() -> Result<(), AppError> {
    // `ctrades` on its own should list legislators. Clap requires a subcommand
    // name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    dotenvy::dotenv().ok();
    crate::logging::init();

    let config = config_from_args(&cli.global, |key| std::env::var(key).ok())?;
    let ctx = AppContext::initialize(config)?;

    let result = match cli.command {
        Command::Legislators(args) => handle_legislators(&ctx, &args),
        Command::Trades(args) => handle_trades(&ctx, &args),
        Command::Profile(args) => handle_profile(&ctx, &args),
    };

    // The cache is flushed even when the query itself failed.
    let flushed = ctx.shutdown();
    result.and(flushed)
}

fn handle_legislators(ctx: &AppContext, args: &LegislatorArgs) -> Result<(), AppError> {
    let view = ctx.aggregates(&AggregateFilters::from(args), args.page);
    println!("{}", crate::report::format_aggregates(&view));
    Ok(())
}

fn handle_trades(ctx: &AppContext, args: &TradeArgs) -> Result<(), AppError> {
    let filters = TradeFilters::from(args);
    let now = Local::now().naive_local();
    let view = ctx.trades_at(&filters, args.page, now);
    println!("{}", crate::report::format_trades(&view));

    if let Some(path) = &args.export {
        let selection = ctx.select_trades_at(&filters, now);
        crate::io::write_trades_csv(path, &selection.trades)?;
        info!(rows = selection.trades.len(), path = %path.display(), "exported trades");
    }

    Ok(())
}

fn handle_profile(ctx: &AppContext, args: &ProfileArgs) -> Result<(), AppError> {
    let profile = ctx.legislator(&args.name, args.page)?;
    println!("{}", crate::report::format_profile(&profile));
    Ok(())
}

/// Resolve the runtime configuration.
///
/// Flags win over the environment, which wins over the built-in defaults.
/// `env` is the variable lookup, `std::env::var` in the binary.
pub fn config_from_args(
    args: &GlobalArgs,
    env: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig, AppError> {
    let env = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let data_dir = args
        .data_dir
        .clone()
        .or_else(|| env(ENV_DATA_DIR).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

    let cache_path = args
        .cache
        .clone()
        .or_else(|| env(ENV_CACHE_PATH).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_PATH));

    let timeout_secs = match args.timeout_secs {
        Some(secs) => secs,
        None => match env(ENV_TIMEOUT) {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                AppError::Config(format!("{ENV_TIMEOUT} must be a whole number of seconds, got '{raw}'"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        },
    };
    if timeout_secs == 0 {
        return Err(AppError::Config("HTTP timeout must be at least one second".to_string()));
    }

    let feed = match &args.feed_file {
        Some(path) => FeedSource::File(path.clone()),
        None => FeedSource::Remote {
            url: args
                .feed_url
                .clone()
                .or_else(|| env(ENV_FEED_URL))
                .unwrap_or_else(|| DEFAULT_FEED_URL.to_string()),
            token: env(ENV_TOKEN),
        },
    };

    Ok(AppConfig {
        data_dir,
        cache_path,
        feed,
        http_timeout: Duration::from_secs(timeout_secs),
    })
}

/// Rewrite argv so `ctrades` defaults to `ctrades legislators`.
///
/// Rules:
/// - `ctrades`                       -> `ctrades legislators`
/// - `ctrades --party D ...`         -> `ctrades legislators --party D ...`
/// - `ctrades --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("legislators".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if is_subcommand(&arg1) {
        return argv;
    }

    // A leading flag with no subcommand anywhere belongs to `legislators`.
    if arg1.starts_with('-') && !argv.iter().skip(1).any(|a| is_subcommand(a)) {
        argv.insert(1, "legislators".to_string());
    }

    argv
}

fn is_subcommand(arg: &str) -> bool {
    matches!(arg, "legislators" | "trades" | "profile")
}
