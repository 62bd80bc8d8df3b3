//! CLI definitions.

pub mod commands;
pub mod setup;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use fx_core::{Interval, ProviderId};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fxsignals")]
#[command(author, version, about = "Multi-source forex signal consensus engine")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (overrides the configured level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate signals from every enabled provider
    Signals(SignalsArgs),
    /// Run a single provider
    Source(SourceArgs),
    /// Show the session checkpoints for a day
    Sessions(SessionsArgs),
    /// List providers and the rules bound to them
    Providers,
    /// Validate configuration
    ValidateConfig,
    /// Print the default configuration
    Config,
}

#[derive(clap::Args)]
pub struct SignalsArgs {
    /// Currency pair, e.g. EURUSD or EUR/USD
    pub symbol: String,

    /// Data interval (1min, 5min, 15min, 30min, 1hour, 4hour, 1day)
    #[arg(short, long)]
    pub interval: Option<Interval>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Replay history from <DIR>/<PAIR>.csv instead of calling the APIs
    #[arg(long)]
    pub replay: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct SourceArgs {
    /// Provider (tradingview, alphavantage, twelvedata, truefx)
    pub provider: ProviderId,

    /// Currency pair
    pub symbol: String,

    /// Data interval
    #[arg(short, long)]
    pub interval: Option<Interval>,

    /// Use the provider's current quote instead of history
    #[arg(long)]
    pub quote: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct SessionsArgs {
    /// Currency pair
    pub symbol: String,

    /// Day to list (YYYY-MM-DD), defaults to today in UTC
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
}
