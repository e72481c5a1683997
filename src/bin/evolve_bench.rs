use anyhow::Context;
use evolve_bench::anuga_evolve::*;
use evolve_bench::benchmark::report::*;
use evolve_bench::benchmark::Benchmark;
use evolve_bench::cli::Args;
use evolve_bench::engine::stand_in::StandInLibrary;
use evolve_bench::scenario::run_evolve;
use evolve_bench::util::ensure_dir_exists;

fn main() -> anyhow::Result<()> {
    let args = Args::cli_setup("evolve_bench");
    let config = args.harness_config()?;
    let library = StandInLibrary::new(config.stand_in.clone());

    if args.once {
        let summary = run_evolve(&library, &config.scenario)?;
        tracing::info!(
            yields = summary.yield_times.len(),
            total_steps = summary.total_steps,
            "scenario finished"
        );
        return Ok(());
    }

    let benchmark = Benchmark::new(BENCHMARK_NAME, config.benchmark.clone());
    let (result, _) = run_benchmark(&benchmark, &library, &config.scenario)
        .context("evolve benchmark failed")?;
    let results = [result];
    print_table(&results);

    if let Some(json_path) = &args.json {
        if let Some(parent) = json_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir_exists(&parent)
                .with_context(|| format!("creating {parent:?}"))?;
        }
        write_json(json_path, &results)?;
    }
    Ok(())
}
