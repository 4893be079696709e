//! `lowlink config`: show the effective configuration.

use anyhow::Result;
use serde::Serialize;

use crate::config::{Config, ConfigSource};
use crate::output::OutputMode;

#[derive(Debug, Serialize)]
struct EffectiveConfig<'a> {
    source: String,
    config: &'a Config,
}

pub fn run_config(config: &Config, source: &ConfigSource, output: OutputMode) -> Result<()> {
    println!("{}", format_config(config, source, output)?);
    Ok(())
}

fn format_config(config: &Config, source: &ConfigSource, output: OutputMode) -> Result<String> {
    match output {
        OutputMode::Json => Ok(serde_json::to_string_pretty(&EffectiveConfig {
            source: source.describe(),
            config,
        })?),
        OutputMode::Text | OutputMode::Pretty => {
            let body = toml::to_string_pretty(config)?;
            Ok(format!("# source: {}\n{}", source.describe(), body.trim_end()))
        }
    }
}
