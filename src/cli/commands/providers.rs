//! List providers command.

use anyhow::Result;
use fx_config::AppConfig;
use fx_rules::RuleRegistry;

pub async fn run(config: &AppConfig) -> Result<()> {
    let registry = RuleRegistry::new(&config.rules.rule_settings(), &config.rules.calculator());

    println!("Signal Providers");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for info in registry.list() {
        let enabled = config.providers.get(info.provider).enabled;
        println!(
            "  {} ({}){}",
            info.provider.label(),
            info.provider.key(),
            if enabled { "" } else { "  [disabled]" }
        );
        println!("  ───────────────────────────────────────────────────────");
        println!("  Rule: {}", info.rule);
        println!("  {}", info.description);
        println!();
    }

    println!("Quote snapshots (source --quote) are always read by the momentum rule.");

    Ok(())
}
