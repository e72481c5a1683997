//! Benchmark entry point for the evolve scenario.

use crate::benchmark::*;
use crate::engine::{EngineError, SimulationLibrary};
use crate::scenario::{run_evolve, EvolveSummary, ScenarioParameters};

pub const BENCHMARK_NAME: &str = "test_anuga_evolve";
pub const BENCHMARK_GROUP: &str = "anuga benchmarks";

/// Measurement settings declared for the evolve benchmark.
pub fn anuga_evolve_config() -> BenchmarkConfig {
    BenchmarkConfig {
        group: Some(BENCHMARK_GROUP.to_string()),
        min_time: 0.5,
        max_time: 3.5,
        min_rounds: 1,
        timer: TimerKind::PerfCounter,
        disable_gc: true,
        warmup: false,
        ..Default::default()
    }
}

/// Benchmark the evolve scenario with the declared settings.
pub fn evolve_benchmark<L: SimulationLibrary>(
    library: &L,
    params: &ScenarioParameters,
) -> Result<(BenchmarkResult, EvolveSummary), BenchmarkError<EngineError>> {
    let benchmark = Benchmark::new(BENCHMARK_NAME, anuga_evolve_config());
    run_benchmark(&benchmark, library, params)
}

/// Benchmark the evolve scenario with a caller supplied runner.
/// Every call rebuilds the domain from the mesh file.
pub fn run_benchmark<L: SimulationLibrary>(
    benchmark: &Benchmark,
    library: &L,
    params: &ScenarioParameters,
) -> Result<(BenchmarkResult, EvolveSummary), BenchmarkError<EngineError>> {
    benchmark.run(|| run_evolve(library, params))
}
