// config.rs - Print the configuration `sedy run` would use.

use std::path::Path;

use anyhow::Context;
use sedy_core::SedyConfig;

pub fn execute(config_path: &Path) -> anyhow::Result<()> {
    let config = SedyConfig::load_or_default(config_path)?;
    print!("{}", render(&config)?);
    Ok(())
}

fn render(config: &SedyConfig) -> anyhow::Result<String> {
    toml::to_string_pretty(config).context("failed to serialize configuration")
}
