//! Simulation library interface
//!
//! The harness drives a shallow water solver it does not implement.
//! Everything it needs from that solver is captured by
//! `SimulationLibrary` and `SimulationDomain`, so any engine
//! (or a test double) can be benchmarked.

mod boundary;
mod evolve;
mod flow_algorithm;
pub mod stand_in;

pub use boundary::*;
pub use evolve::*;
pub use flow_algorithm::*;

use crate::generators::{GeneratorError, QuantityFunction};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read mesh {path:?}: {source}")]
    MeshRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed mesh {path:?}: {reason}")]
    MalformedMesh { path: PathBuf, reason: String },
    #[error("unknown quantity `{0}`")]
    UnknownQuantity(String),
    #[error("boundary tag `{0}` does not exist in domain")]
    UnknownBoundaryTag(String),
    #[error("boundary tag `{0}` has no boundary condition assigned")]
    UnassignedBoundary(String),
    #[error("invalid evolve schedule: {0}")]
    InvalidSchedule(String),
    #[error("unknown flow algorithm `{0}`")]
    UnknownFlowAlgorithm(String),
    #[error("failed to set quantity `{name}`: {source}")]
    Generator {
        name: String,
        #[source]
        source: GeneratorError,
    },
    #[error("solver failure: {0}")]
    Solver(String),
}

/// Entry point of a simulation library, builds domains from mesh files.
pub trait SimulationLibrary {
    type Domain: SimulationDomain;

    fn create_domain_from_file(
        &self,
        path: &Path,
    ) -> Result<Self::Domain, EngineError>;
}

/// The operations the harness performs on a constructed domain.
pub trait SimulationDomain {
    fn set_quantity(
        &mut self,
        name: &str,
        function: &dyn QuantityFunction,
    ) -> Result<(), EngineError>;

    /// `None` restores the library's default name.
    fn set_name(&mut self, name: Option<&str>);

    fn name(&self) -> &str;

    /// Enable or disable writing results to persistent storage.
    fn set_store(&mut self, store: bool);

    fn set_flow_algorithm(&mut self, algorithm: FlowAlgorithm);

    fn set_boundary(&mut self, boundaries: BoundaryMap)
        -> Result<(), EngineError>;

    /// Called once before evolution starts.
    fn check_integrity(&self) -> Result<(), EngineError> {
        Ok(())
    }

    /// Current model time
    fn time(&self) -> f64;

    /// Take as many internal steps as required to reach `time` exactly.
    fn advance_to(&mut self, time: f64) -> Result<(), EngineError>;

    /// Statistics for the most recent reporting interval.
    fn timestepping_statistics(&self) -> TimesteppingStatistics;

    fn print_timestepping_statistics(&self) {
        println!("{}", self.timestepping_statistics());
    }

    /// Lazily evolve up to `finaltime`, yielding every `yieldstep`.
    fn evolve(
        &mut self,
        yieldstep: f64,
        finaltime: f64,
    ) -> Result<Evolve<'_, Self>, EngineError>
    where
        Self: Sized,
    {
        Evolve::new(self, yieldstep, finaltime)
    }
}

/// Summary of the internal steps taken during one reporting interval.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TimesteppingStatistics {
    pub time: f64,
    pub steps: u64,
    pub min_timestep: f64,
    pub max_timestep: f64,
    pub total_steps: u64,
}

impl fmt::Display for TimesteppingStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps == 0 {
            write!(f, "Time = {:.4} (sec), steps={}", self.time, self.steps)
        } else {
            write!(
                f,
                "Time = {:.4} (sec), delta t in [{:.8}, {:.8}] (s), steps={} ({})",
                self.time,
                self.min_timestep,
                self.max_timestep,
                self.steps,
                self.total_steps
            )
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn statistics_line() {
        let stats = TimesteppingStatistics {
            time: 10.0,
            steps: 20,
            min_timestep: 0.5,
            max_timestep: 0.5,
            total_steps: 40,
        };
        assert_eq!(
            stats.to_string(),
            "Time = 10.0000 (sec), delta t in [0.50000000, 0.50000000] (s), steps=20 (40)"
        );
    }

    #[test]
    fn statistics_line_before_stepping() {
        let stats = TimesteppingStatistics::default();
        assert_eq!(stats.to_string(), "Time = 0.0000 (sec), steps=0");
    }
}
