//! Harness configuration
//!
//! Everything is optional in the TOML file and every key overrides one
//! default. Benchmark keys override the evolve benchmark's declared
//! settings. Example:
//!
//! ```toml
//! [benchmark]
//! max_time = 10.0
//!
//! [scenario]
//! finaltime = 100.0
//!
//! [stand_in]
//! timestep = 0.25
//! ```

use crate::anuga_evolve::anuga_evolve_config;
use crate::benchmark::{BenchmarkConfig, BenchmarkConfigError, TimerKind};
use crate::engine::stand_in::StandInConfig;
use crate::scenario::ScenarioParameters;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid benchmark settings")]
    Benchmark(#[from] BenchmarkConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    #[serde(deserialize_with = "declared_benchmark")]
    pub benchmark: BenchmarkConfig,
    pub scenario: ScenarioParameters,
    pub stand_in: StandInConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            benchmark: anuga_evolve_config(),
            scenario: ScenarioParameters::default(),
            stand_in: StandInConfig::default(),
        }
    }
}

/// Keys present in a `[benchmark]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BenchmarkOverrides {
    group: Option<String>,
    min_time: Option<f64>,
    max_time: Option<f64>,
    min_rounds: Option<u64>,
    timer: Option<TimerKind>,
    disable_gc: Option<bool>,
    warmup: Option<bool>,
    warmup_iterations: Option<u64>,
}

impl BenchmarkOverrides {
    fn apply(self, mut config: BenchmarkConfig) -> BenchmarkConfig {
        if let Some(group) = self.group {
            config.group = Some(group);
        }
        if let Some(min_time) = self.min_time {
            config.min_time = min_time;
        }
        if let Some(max_time) = self.max_time {
            config.max_time = max_time;
        }
        if let Some(min_rounds) = self.min_rounds {
            config.min_rounds = min_rounds;
        }
        if let Some(timer) = self.timer {
            config.timer = timer;
        }
        if let Some(disable_gc) = self.disable_gc {
            config.disable_gc = disable_gc;
        }
        if let Some(warmup) = self.warmup {
            config.warmup = warmup;
        }
        if let Some(warmup_iterations) = self.warmup_iterations {
            config.warmup_iterations = warmup_iterations;
        }
        config
    }
}

fn declared_benchmark<'de, D>(deserializer: D) -> Result<BenchmarkConfig, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = BenchmarkOverrides::deserialize(deserializer)?;
    Ok(overrides.apply(anuga_evolve_config()))
}

impl HarnessConfig {
    pub fn load<P: AsRef<Path>>(path: &P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let config: HarnessConfig =
            toml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.benchmark.validate()?;
        let s = &self.scenario;
        if !s.yieldstep.is_finite() || s.yieldstep <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "yieldstep must be positive, got {}",
                s.yieldstep
            )));
        }
        if !s.finaltime.is_finite() || s.finaltime < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "finaltime must be non-negative, got {}",
                s.finaltime
            )));
        }
        if !self.stand_in.timestep.is_finite() || self.stand_in.timestep <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "stand_in.timestep must be positive, got {}",
                self.stand_in.timestep
            )));
        }
        Ok(())
    }
}
