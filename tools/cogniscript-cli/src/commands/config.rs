//! Show or initialize the configuration.

use cogniscript_common::config::AppConfig;

pub fn run(config: AppConfig, write_default: bool) -> anyhow::Result<()> {
    if write_default {
        let defaults = AppConfig::default();
        defaults
            .save()
            .map_err(|e| anyhow::anyhow!("Failed to write config: {e}"))?;
        println!("Wrote default config to {}", AppConfig::default_path().display());
        return Ok(());
    }

    println!("# {}", AppConfig::default_path().display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
