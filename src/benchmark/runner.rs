use crate::benchmark::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Calibration never runs more calls than this per round.
pub const MAX_CALIBRATION_LOOPS: u64 = 10_000_000;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Warmup,
    Calibration,
    Measurement,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Warmup => "warmup",
            Phase::Calibration => "calibration",
            Phase::Measurement => "measurement",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum BenchmarkError<E: std::error::Error + 'static> {
    #[error("invalid benchmark configuration")]
    InvalidConfig(#[source] BenchmarkConfigError),
    #[error("{phase} round {round} failed: {source}")]
    RoundFailed {
        phase: Phase,
        round: u64,
        #[source]
        source: E,
    },
}

impl<E: std::error::Error + 'static> BenchmarkError<E> {
    /// The benchmarked function's own error, if it caused the failure.
    pub fn source_error(&self) -> Option<&E> {
        match self {
            BenchmarkError::RoundFailed { source, .. } => Some(source),
            BenchmarkError::InvalidConfig(_) => None,
        }
    }
}

/// One finished benchmark.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub name: String,
    pub group: Option<String>,
    pub options: BenchmarkConfig,
    pub stats: Stats,
}

/// Times a function under a `BenchmarkConfig`.
pub struct Benchmark {
    name: String,
    config: BenchmarkConfig,
    timer: Box<dyn Timer>,
}

impl Benchmark {
    pub fn new<S: Into<String>>(name: S, config: BenchmarkConfig) -> Self {
        let timer = config.timer.timer();
        Benchmark {
            name: name.into(),
            config,
            timer,
        }
    }

    /// Replace the clock selected by the configuration.
    pub fn with_timer(mut self, timer: Box<dyn Timer>) -> Self {
        self.timer = timer;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Benchmark `function`, returning the statistics and the value of
    /// the last call. The first error aborts the benchmark.
    pub fn run<F, T, E>(
        &self,
        mut function: F,
    ) -> Result<(BenchmarkResult, T), BenchmarkError<E>>
    where
        F: FnMut() -> Result<T, E>,
        E: std::error::Error + 'static,
    {
        profiling::scope!("benchmark::run");
        self.config
            .validate()
            .map_err(BenchmarkError::InvalidConfig)?;
        if self.config.disable_gc {
            tracing::debug!(
                benchmark = %self.name,
                "disable_gc requested, no collector to suspend"
            );
        }

        if self.config.warmup {
            self.warmup(&mut function)?;
        }

        let (duration, loops, mut value) = self.calibrate(&mut function)?;
        let rounds = self.rounds(duration);
        tracing::debug!(
            benchmark = %self.name,
            loops,
            rounds,
            calibrated = ?duration,
            "calibrated"
        );

        let mut samples = Vec::with_capacity(rounds.min(1 << 20) as usize);
        for round in 0..rounds {
            let (elapsed, last) =
                self.time_loops(loops, &mut function, Phase::Measurement, round)?;
            samples.push(elapsed.as_secs_f64() / loops as f64);
            value = last;
        }

        let stats = Stats::from_samples(&samples, loops);
        tracing::info!(
            benchmark = %self.name,
            rounds = stats.rounds,
            iterations = stats.iterations,
            min = stats.min,
            mean = stats.mean,
            "benchmark finished"
        );
        let result = BenchmarkResult {
            name: self.name.clone(),
            group: self.config.group.clone(),
            options: self.config.clone(),
            stats,
        };
        Ok((result, value))
    }

    fn rounds(&self, duration: Duration) -> u64 {
        let per_round = duration.as_secs_f64();
        let budget = if per_round > 0.0 {
            let r = (self.config.max_time / per_round).ceil();
            if r >= u64::MAX as f64 {
                u64::MAX
            } else {
                r as u64
            }
        } else {
            0
        };
        budget.max(self.config.min_rounds)
    }

    fn warmup<F, T, E>(&self, function: &mut F) -> Result<(), BenchmarkError<E>>
    where
        F: FnMut() -> Result<T, E>,
        E: std::error::Error + 'static,
    {
        profiling::scope!("benchmark::warmup");
        let start = self.timer.now();
        let max = self.config.max_duration();
        let mut calls = 0;
        while calls < self.config.warmup_iterations
            && self.timer.now().saturating_sub(start) < max
        {
            function().map_err(|source| BenchmarkError::RoundFailed {
                phase: Phase::Warmup,
                round: calls,
                source,
            })?;
            calls += 1;
        }
        tracing::debug!(benchmark = %self.name, calls, "warmup done");
        Ok(())
    }

    /// Find how many back to back calls make a round last `min_time`.
    fn calibrate<F, T, E>(
        &self,
        function: &mut F,
    ) -> Result<(Duration, u64, T), BenchmarkError<E>>
    where
        F: FnMut() -> Result<T, E>,
        E: std::error::Error + 'static,
    {
        let min = self.config.min_duration();
        let mut loops = 1;
        let mut attempt = 0;
        loop {
            let (elapsed, value) =
                self.time_loops(loops, function, Phase::Calibration, attempt)?;
            if elapsed >= min || loops >= MAX_CALIBRATION_LOOPS {
                return Ok((elapsed, loops, value));
            }

            let per_call = elapsed.as_secs_f64() / loops as f64;
            let needed = if per_call > 0.0 {
                (min.as_secs_f64() / per_call).ceil() as u64
            } else {
                loops * 10
            };
            loops = needed.max(loops * 2).min(MAX_CALIBRATION_LOOPS);
            attempt += 1;
        }
    }

    fn time_loops<F, T, E>(
        &self,
        loops: u64,
        function: &mut F,
        phase: Phase,
        round: u64,
    ) -> Result<(Duration, T), BenchmarkError<E>>
    where
        F: FnMut() -> Result<T, E>,
        E: std::error::Error + 'static,
    {
        let fail = |source: E| BenchmarkError::RoundFailed {
            phase,
            round,
            source,
        };
        let start = self.timer.now();
        let mut value = function().map_err(fail)?;
        for _ in 1..loops {
            value = function().map_err(fail)?;
        }
        let end = self.timer.now();
        Ok((end.saturating_sub(start), value))
    }
}
