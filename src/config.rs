//! TOML configuration and logging setup.
//!
//! Every field has a default; a missing config file means all defaults.
//!
//! ```toml
//! [limits]
//! age_min = 19
//! age_max = 100
//!
//! [data]
//! dir = "data"
//!
//! [optimiser]
//! max_tolerance = 10
//! relax_fibre = false
//! workers = 4
//! solve_timeout_ms = 5000
//! max_detached_solves = 1
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{DietError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "dietopt.toml";

/// Accepted ranges for personal parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub age_min: u32,
    pub age_max: u32,
    pub weight_min: f64,
    pub weight_max: f64,
    pub height_min: f64,
    pub height_max: f64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            age_min: 19,
            age_max: 100,
            weight_min: 30.0,
            weight_max: 200.0,
            height_min: 135.0,
            height_max: 200.0,
        }
    }
}

/// Where the reference tables come from. `None` means the bundled copies.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OptimiserConfig {
    /// Largest percent overflow tried on each relaxed macro goal.
    pub max_tolerance: u32,
    /// Treat fibre as a fourth relaxed axis instead of a hard lower bound.
    pub relax_fibre: bool,
    /// Combinations solved concurrently.
    pub workers: usize,
    pub solve_timeout_ms: Option<u64>,
    /// Timed-out solves left running before further solves fail fast.
    pub max_detached_solves: usize,
    /// Cap in grams for foods with no max serving, unless the request names one.
    pub unlimited_max_serving_g: f64,
}

impl Default for OptimiserConfig {
    fn default() -> Self {
        Self {
            max_tolerance: 10,
            relax_fibre: false,
            workers: 1,
            solve_timeout_ms: None,
            max_detached_solves: 1,
            unlimited_max_serving_g: 10_000.0,
        }
    }
}

impl OptimiserConfig {
    pub fn solve_timeout(&self) -> Option<Duration> {
        self.solve_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "pretty".into(),
        }
    }
}

impl LoggingConfig {
    /// Install the global subscriber. `RUST_LOG` wins over `level`.
    ///
    /// Logs go to stderr so JSON output on stdout stays clean. Calling this
    /// twice is harmless; the first subscriber stays in place.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        let _ = match self.format.as_str() {
            "json" => fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init(),
            _ => fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init(),
        };
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub limits: LimitsConfig,
    pub data: DataConfig,
    pub optimiser: OptimiserConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load and validate `path`; a missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let l = &self.limits;
        if l.age_min > l.age_max {
            return Err(DietError::Config("age_min exceeds age_max".into()));
        }
        if l.weight_min > l.weight_max {
            return Err(DietError::Config("weight_min exceeds weight_max".into()));
        }
        if l.height_min > l.height_max {
            return Err(DietError::Config("height_min exceeds height_max".into()));
        }
        if self.optimiser.workers == 0 {
            return Err(DietError::Config("workers must be at least 1".into()));
        }
        let fallback = self.optimiser.unlimited_max_serving_g;
        if !(fallback.is_finite() && fallback > 0.0) {
            return Err(DietError::Config(
                "unlimited_max_serving_g must be positive".into(),
            ));
        }
        if self.optimiser.solve_timeout_ms == Some(0) {
            return Err(DietError::Config("solve_timeout_ms must be positive".into()));
        }
        if self.optimiser.max_detached_solves == 0 {
            return Err(DietError::Config(
                "max_detached_solves must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
