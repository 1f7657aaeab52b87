use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fs, ops::RangeInclusive, path::Path, time::Duration};

use crate::{
    format::{OutputMode, TempDisplay},
    sort::SortMode,
    source::wunderground::parse_endpoint,
};

pub const DEFAULT_ENDPOINT: &str = "https://www.wunderground.com/cgi-bin/findweather/getForecast";

/// Randomized pause between two consecutive lookups, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PauseConfig {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl Default for PauseConfig {
    fn default() -> Self {
        Self { min_secs: 1.0, max_secs: 2.0 }
    }
}

impl PauseConfig {
    /// No pause at all; handy for tests and local mirrors.
    pub const fn none() -> Self {
        Self { min_secs: 0.0, max_secs: 0.0 }
    }

    /// Bounds as durations; invalid bounds collapse to zero.
    pub fn range(&self) -> RangeInclusive<Duration> {
        let secs = |s: f64| Duration::try_from_secs_f64(s).unwrap_or(Duration::ZERO);
        let (min, max) = (secs(self.min_secs), secs(self.max_secs));
        min..=max.max(min)
    }
}

/// How a report is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    pub display: TempDisplay,
    pub sort: SortMode,
    pub output: OutputMode,
}

/// Top-level configuration.
///
/// Example TOML:
/// ```toml
/// endpoint = "https://www.wunderground.com/cgi-bin/findweather/getForecast"
/// timeout_secs = 30
///
/// [pause]
/// min_secs = 1.0
/// max_secs = 2.0
///
/// [defaults]
/// display = "celsius"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Search endpoint; the place goes into the `query` parameter.
    pub endpoint: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub pause: PauseConfig,
    /// Defaults for the report; command-line flags override them.
    pub defaults: ReportOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: concat!("wundertemp/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
            pause: PauseConfig::default(),
            defaults: ReportOptions::default(),
        }
    }
}

impl Config {
    /// Load and validate config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents).context("Invalid TOML configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        parse_endpoint(&self.endpoint)?;
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        let PauseConfig { min_secs, max_secs } = self.pause;
        if !min_secs.is_finite() || !max_secs.is_finite() || min_secs < 0.0 {
            bail!("pause bounds must be finite and non-negative (got {min_secs}..{max_secs})");
        }
        if min_secs > max_secs {
            bail!("pause.min_secs ({min_secs}) must not exceed pause.max_secs ({max_secs})");
        }
        Ok(())
    }
}
