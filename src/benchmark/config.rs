use crate::benchmark::TimerKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BenchmarkConfigError {
    #[error("min_time must be a non-negative number of seconds, got {0}")]
    MinTime(f64),
    #[error("max_time must be a positive number of seconds, got {0}")]
    MaxTime(f64),
    #[error("min_rounds must be at least 1")]
    MinRounds,
}

/// How a benchmark is measured. None of these options change what is
/// being measured.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Label used to group results in reports
    pub group: Option<String>,

    /// Minimum duration of one round in seconds, calibration adds
    /// iterations per round until this is reached.
    pub min_time: f64,

    /// Target duration of the whole measurement in seconds
    pub max_time: f64,

    pub min_rounds: u64,

    pub timer: TimerKind,

    /// Recorded in reports only, there is no collector to suspend.
    pub disable_gc: bool,

    /// Run untimed calls before measuring
    pub warmup: bool,

    /// Upper bound on warmup calls
    pub warmup_iterations: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            group: None,
            min_time: 0.000005,
            max_time: 1.0,
            min_rounds: 5,
            timer: TimerKind::PerfCounter,
            disable_gc: false,
            warmup: false,
            warmup_iterations: 100000,
        }
    }
}

impl BenchmarkConfig {
    /// Both durations must fit in a `Duration`.
    pub fn validate(&self) -> Result<(), BenchmarkConfigError> {
        if Duration::try_from_secs_f64(self.min_time).is_err() {
            return Err(BenchmarkConfigError::MinTime(self.min_time));
        }
        match Duration::try_from_secs_f64(self.max_time) {
            Ok(d) if !d.is_zero() => {}
            _ => return Err(BenchmarkConfigError::MaxTime(self.max_time)),
        }
        if self.min_rounds == 0 {
            return Err(BenchmarkConfigError::MinRounds);
        }
        Ok(())
    }

    /// Saturates at `Duration::MAX`, `validate` rejects such values.
    pub fn min_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.min_time).unwrap_or(Duration::MAX)
    }

    pub fn max_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.max_time).unwrap_or(Duration::MAX)
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = BenchmarkConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.min_rounds, 5);
        assert!(!c.warmup);
    }

    #[test]
    fn rejects_nonsense() {
        let bad = [
            BenchmarkConfig {
                min_time: -1.0,
                ..Default::default()
            },
            BenchmarkConfig {
                max_time: 0.0,
                ..Default::default()
            },
            BenchmarkConfig {
                max_time: f64::INFINITY,
                ..Default::default()
            },
            BenchmarkConfig {
                min_rounds: 0,
                ..Default::default()
            },
        ];
        for c in bad {
            assert!(c.validate().is_err(), "{c:?}");
        }
    }

    #[test]
    fn rejects_unrepresentable_durations() {
        let c = BenchmarkConfig {
            min_time: 1e20,
            ..Default::default()
        };
        assert_eq!(c.validate(), Err(BenchmarkConfigError::MinTime(1e20)));
        assert_eq!(c.min_duration(), Duration::MAX);

        let c = BenchmarkConfig {
            max_time: 1e20,
            ..Default::default()
        };
        assert_eq!(c.validate(), Err(BenchmarkConfigError::MaxTime(1e20)));

        let c = BenchmarkConfig {
            min_time: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(BenchmarkConfigError::MinTime(_))));
    }

    #[test]
    fn partial_toml() {
        let c: BenchmarkConfig = toml::from_str(
            "group = \"anuga benchmarks\"\nmax_time = 3.5\ndisable_gc = true\n",
        )
        .unwrap();
        assert_eq!(c.group.as_deref(), Some("anuga benchmarks"));
        assert_eq!(c.max_duration(), Duration::from_millis(3500));
        assert!(c.disable_gc);
        assert_eq!(c.min_rounds, 5);
    }
}
