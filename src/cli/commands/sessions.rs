//! Session checkpoints command.

use anyhow::{bail, Result};
use chrono::Utc;
use fx_data::TrueFxProvider;
use fx_rules::SessionRule;

use crate::cli::SessionsArgs;

pub async fn run(args: SessionsArgs) -> Result<()> {
    let pair: fx_core::CurrencyPair = args.symbol.parse()?;
    if !TrueFxProvider::supports(&pair) {
        bail!("{} has no TrueFX tick data", pair.slashed());
    }
    let date = args.date.unwrap_or_else(|| Utc::now().date_naive());

    println!("Session checkpoints: {} on {}", pair.slashed(), date);
    println!("═══════════════════════════════════════════════════════════");

    for checkpoint in SessionRule::new().checkpoints(date) {
        println!(
            "  {} UTC  {:<26} {} {}",
            checkpoint.time.format("%H:%M"),
            checkpoint.session,
            checkpoint.signal.recommendation,
            checkpoint.signal.confidence
        );
    }

    println!();
    println!("Checkpoints are placeholders and carry no market view.");

    Ok(())
}
