use crate::benchmark::TimerKind;
use crate::build_info;
use crate::config::{ConfigError, HarnessConfig};
use crate::engine::FlowAlgorithm;
use crate::logging;
use clap::Parser;
use std::path::PathBuf;

/// Benchmark the Merimbula evolve scenario
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// TOML file with [benchmark], [scenario] and [stand_in] sections.
    /// Flags given on the command line override it.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory containing merimbula_10785_1.tsh
    #[arg(short, long)]
    pub mesh_dir: Option<PathBuf>,

    /// Run the scenario a single time, without benchmarking
    #[arg(long)]
    pub once: bool,

    /// Write a JSON report here, parent directories are created.
    #[arg(short, long)]
    pub json: Option<PathBuf>,

    /// Minimum duration of one round in seconds
    #[arg(long)]
    pub min_time: Option<f64>,

    /// Target duration of the whole measurement in seconds
    #[arg(long)]
    pub max_time: Option<f64>,

    #[arg(long)]
    pub min_rounds: Option<u64>,

    /// Run untimed calls before measuring
    #[arg(long)]
    pub warmup: bool,

    /// Clock used to time rounds
    #[arg(long)]
    pub timer: Option<TimerKind>,

    /// Reporting interval of the evolve loop
    #[arg(long)]
    pub yieldstep: Option<f64>,

    /// Model time to evolve to
    #[arg(long)]
    pub finaltime: Option<f64>,

    #[arg(long)]
    pub flow_algorithm: Option<FlowAlgorithm>,

    /// More log output, repeat for trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print build information and quit
    #[arg(long)]
    pub build_info: bool,
}

impl Args {
    pub fn cli_setup(name: &str) -> Self {
        let args = Args::parse();

        if args.build_info {
            build_info::print_report(name);
            std::process::exit(0);
        }

        logging::init(args.log_level());
        args
    }

    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    /// Configuration file (or defaults) with command line overrides.
    pub fn harness_config(&self) -> Result<HarnessConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::load(path)?,
            None => HarnessConfig::default(),
        };

        let benchmark = &mut config.benchmark;
        if let Some(min_time) = self.min_time {
            benchmark.min_time = min_time;
        }
        if let Some(max_time) = self.max_time {
            benchmark.max_time = max_time;
        }
        if let Some(min_rounds) = self.min_rounds {
            benchmark.min_rounds = min_rounds;
        }
        if let Some(timer) = self.timer {
            benchmark.timer = timer;
        }
        if self.warmup {
            benchmark.warmup = true;
        }

        let scenario = &mut config.scenario;
        if let Some(mesh_dir) = &self.mesh_dir {
            scenario.mesh_dir = Some(mesh_dir.clone());
        }
        if let Some(yieldstep) = self.yieldstep {
            scenario.yieldstep = yieldstep;
        }
        if let Some(finaltime) = self.finaltime {
            scenario.finaltime = finaltime;
        }
        if let Some(flow_algorithm) = self.flow_algorithm {
            scenario.flow_algorithm = flow_algorithm;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_without_flags() {
        let args = Args::try_parse_from(["evolve_bench"]).unwrap();
        assert_eq!(args.harness_config().unwrap(), HarnessConfig::default());
        assert_eq!(args.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn overrides() {
        let args = Args::try_parse_from([
            "evolve_bench",
            "--mesh-dir",
            "/meshes",
            "--max-time",
            "1.5",
            "--min-rounds",
            "3",
            "--timer",
            "system_time",
            "--warmup",
            "--finaltime",
            "20",
            "--flow-algorithm",
            "DE1",
            "-vv",
        ])
        .unwrap();
        let c = args.harness_config().unwrap();
        assert_approx_eq!(f64, c.benchmark.max_time, 1.5);
        assert_eq!(c.benchmark.min_rounds, 3);
        assert_eq!(c.benchmark.timer, TimerKind::SystemTime);
        assert!(c.benchmark.warmup);
        assert_eq!(c.scenario.mesh_dir, Some(PathBuf::from("/meshes")));
        assert_approx_eq!(f64, c.scenario.finaltime, 20.0);
        assert_eq!(c.scenario.flow_algorithm, FlowAlgorithm::De1);
        assert_eq!(args.log_level(), tracing::Level::TRACE);
    }

    #[test]
    fn invalid_override() {
        let args =
            Args::try_parse_from(["evolve_bench", "--yieldstep", "0"]).unwrap();
        assert!(matches!(
            args.harness_config(),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn min_time_beyond_duration_range() {
        let args =
            Args::try_parse_from(["evolve_bench", "--min-time", "1e20"]).unwrap();
        assert!(matches!(
            args.harness_config(),
            Err(ConfigError::Benchmark(_))
        ));
    }
}
