//! Consensus signals command.

use anyhow::Result;
use fx_config::AppConfig;
use fx_consensus::ConsensusReport;
use fx_core::{Signal, SourceOutcome};
use tracing::info;

use crate::cli::setup::{build_engine, build_request};
use crate::cli::{OutputFormat, SignalsArgs};

pub async fn run(args: SignalsArgs, config: &AppConfig) -> Result<()> {
    let request = build_request(&args.symbol, args.interval, config)?;
    let engine = build_engine(config, args.replay.as_deref())?;

    info!(
        "Requesting {} ({}) from {} providers",
        request.pair,
        request.interval,
        engine.provider_ids().len()
    );
    let report = engine.run(&request).await;

    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => print_report(&report),
    }

    Ok(())
}

fn print_report(report: &ConsensusReport) {
    let consensus = &report.consensus;

    println!("Forex Signals: {} ({})", report.symbol, report.interval);
    println!("═══════════════════════════════════════════════════════════");
    println!("  Consensus:   {}", consensus.overall_recommendation);
    println!(
        "  Agreement:   {} ({:.1}%)",
        consensus.agreement_level,
        consensus.agreement_ratio * 100.0
    );
    println!(
        "  Votes:       BUY {} | SELL {} | NEUTRAL {}",
        consensus.votes.buy, consensus.votes.sell, consensus.votes.neutral
    );
    println!("  Confidence:  {}", consensus.average_confidence);
    println!("  Sources:     {}", consensus.total_sources);
    println!("  ───────────────────────────────────────────────────────");

    for (provider, outcome) in &consensus.per_source {
        match outcome {
            SourceOutcome::Signal(signal) => print_signal(provider.label(), signal),
            SourceOutcome::Failed { error } => println!("  {:<14} FAILED  {}", provider.label(), error),
        }
    }

    println!("  ───────────────────────────────────────────────────────");
    println!("  {}", consensus.summary);
    println!("  Request: {}  As of: {}", report.request_id, report.as_of.to_rfc3339());
}

/// One signal line followed by its evidence.
pub(crate) fn print_signal(label: &str, signal: &Signal) {
    println!(
        "  {:<14} {:<7} {}{}",
        label,
        signal.recommendation.to_string(),
        signal.confidence,
        if signal.evidence.synthetic { "  (synthetic)" } else { "" }
    );
    for reason in &signal.evidence.reasons {
        println!("      - {}", reason);
    }
    for (name, value) in &signal.evidence.indicators {
        println!("      {:<22} {:.5}", name, value);
    }
    if let Some(note) = &signal.evidence.note {
        println!("      note: {}", note);
    }
}
