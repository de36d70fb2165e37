// SPDX-License-Identifier: MIT OR Apache-2.0

//! Game settings from a TOML file plus command-line overrides

use anyhow::{Context, Result};
use goban_core::GameConfig;
use std::fs;
use std::path::Path;

/// Read `path`, or fall back to defaults when no file is given.
/// Missing keys take their default values.
pub fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        tracing::debug!("No config file given, using defaults");
        return Ok(GameConfig::default());
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = toml::from_str::<GameConfig>(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid settings in {}", path.display()))?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Write `config` as TOML, e.g. to start a config file from the defaults
pub fn save_config(config: &GameConfig, path: &Path) -> Result<()> {
    let toml_content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(path, toml_content).with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}
