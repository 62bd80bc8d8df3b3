//! Single provider command.

use anyhow::{Context, Result};
use fx_config::AppConfig;
use fx_consensus::FetchMode;
use tracing::info;

use super::signals::print_signal;
use crate::cli::setup::{build_engine, build_request};
use crate::cli::{OutputFormat, SourceArgs};

pub async fn run(args: SourceArgs, config: &AppConfig) -> Result<()> {
    let request = build_request(&args.symbol, args.interval, config)?;
    let engine = build_engine(config, None)?;
    let mode = if args.quote {
        FetchMode::Snapshot
    } else {
        FetchMode::History
    };

    info!("Querying {} for {} ({})", args.provider, request.pair, request.interval);
    let signal = engine
        .source(args.provider, &request, mode)
        .await
        .with_context(|| format!("{} returned no signal", args.provider))?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&signal)?),
        OutputFormat::Text => {
            println!("{} via {} ({})", request.pair, args.provider, request.interval);
            println!("═══════════════════════════════════════════════════════════");
            print_signal(args.provider.label(), &signal);
        }
    }

    Ok(())
}
