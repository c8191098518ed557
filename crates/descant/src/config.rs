//! Typed configuration.
//!
//! Everything is loaded here and handed to the checker, oracle, and
//! refiner explicitly; there are no process-wide mutable settings.

use std::path::Path;

use anyhow::Context;
use counterpoint::CheckConfig;
use serde::Deserialize;

use crate::provider::OracleConfig;
use crate::refine::RefineConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DescantConfig {
    pub oracle: OracleConfig,
    pub refine: RefineConfig,
    pub checks: CheckConfig,
}

impl DescantConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: DescantConfig = toml::from_str(&contents)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Environment overlay: `DESCANT_API_KEY` wins over the config file.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("DESCANT_API_KEY") {
            self.oracle.api_key = Some(key);
        }
    }
}
