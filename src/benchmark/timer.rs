use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Clock used to time benchmark rounds.
/// Only differences between two readings are meaningful.
pub trait Timer {
    fn now(&self) -> Duration;
}

/// Monotonic high resolution clock.
pub struct PerfCounter {
    origin: Instant,
}

impl PerfCounter {
    pub fn new() -> Self {
        PerfCounter {
            origin: Instant::now(),
        }
    }
}

impl Default for PerfCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for PerfCounter {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Wall clock, may jump if the system time is changed.
#[derive(Default)]
pub struct SystemClock;

impl Timer for SystemClock {
    fn now(&self) -> Duration {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
    }
}

#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Monotonic high resolution counter
    #[default]
    #[value(name = "perf_counter")]
    PerfCounter,

    /// System wall clock
    #[value(name = "system_time")]
    SystemTime,
}

impl TimerKind {
    pub fn name(&self) -> &'static str {
        match self {
            TimerKind::PerfCounter => "perf_counter",
            TimerKind::SystemTime => "system_time",
        }
    }

    pub fn timer(&self) -> Box<dyn Timer> {
        match self {
            TimerKind::PerfCounter => Box::new(PerfCounter::new()),
            TimerKind::SystemTime => Box::new(SystemClock),
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn perf_counter_is_monotonic() {
        let t = PerfCounter::new();
        let a = t.now();
        std::thread::sleep(Duration::from_millis(2));
        let b = t.now();
        assert!(b >= a + Duration::from_millis(2));
    }

    #[test]
    fn system_clock_after_epoch() {
        assert!(SystemClock.now() > Duration::ZERO);
    }

    #[test]
    fn kinds_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            timer: TimerKind,
        }
        let w: Wrapper = toml::from_str("timer = \"system_time\"").unwrap();
        assert_eq!(w.timer, TimerKind::SystemTime);
        assert_eq!(TimerKind::default().name(), "perf_counter");
    }
}
