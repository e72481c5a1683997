//! The Merimbula evolve scenario
//!
//! Loads the Merimbula lake mesh, raises the stage inside a band of x,
//! closes the exterior with a reflective wall and drives the open
//! boundary with a slow sinusoidal stage, then evolves to `finaltime`.

use crate::engine::*;
use crate::generators::SetStage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MESH_FILENAME: &str = "merimbula_10785_1.tsh";

/// Directory holding the benchmark fixtures.
pub fn benchmark_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("benchmarks")
}

/// Stage imposed on the `open` boundary at time `t`.
pub fn open_boundary_stage(t: f64) -> f64 {
    10.0 * (t / 200.0).sin()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParameters {
    /// Directory containing the mesh, `benchmark_dir()` when unset
    pub mesh_dir: Option<PathBuf>,
    pub mesh_filename: String,

    /// Band `x0 < x < x1` where the stage is raised
    pub x0: f64,
    pub x1: f64,
    pub stage_height: f64,

    pub yieldstep: f64,
    pub finaltime: f64,
    pub flow_algorithm: FlowAlgorithm,
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        ScenarioParameters {
            mesh_dir: None,
            mesh_filename: MESH_FILENAME.to_string(),
            x0: 756000.0,
            x1: 756500.0,
            stage_height: 1.0,
            yieldstep: 10.0,
            finaltime: 50.0,
            flow_algorithm: FlowAlgorithm::De0,
        }
    }
}

impl ScenarioParameters {
    pub fn mesh_dir(&self) -> PathBuf {
        let dir = self.mesh_dir.clone().unwrap_or_else(benchmark_dir);
        std::path::absolute(&dir).unwrap_or(dir)
    }

    pub fn mesh_path(&self) -> PathBuf {
        self.mesh_dir().join(&self.mesh_filename)
    }
}

/// What one evolve run produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvolveSummary {
    pub yield_times: Vec<f64>,
    pub total_steps: u64,
}

/// Build the domain from scratch and evolve it once.
///
/// Errors raised by the library are returned untouched.
pub fn run_evolve<L: SimulationLibrary>(
    library: &L,
    params: &ScenarioParameters,
) -> Result<EvolveSummary, EngineError> {
    profiling::scope!("run_evolve");

    let mesh_filename = params.mesh_path();
    let file_dir = params.mesh_dir();
    println!("{}", mesh_filename.display());
    println!("{}", file_dir.display());

    let mut domain = library.create_domain_from_file(&mesh_filename)?;
    domain.set_quantity(
        "stage",
        &SetStage::new(params.x0, params.x1, params.stage_height),
    )?;

    domain.set_name(None);
    domain.set_store(false);
    domain.set_flow_algorithm(params.flow_algorithm);

    // Solid reflective wall
    let br = BoundaryCondition::reflective();
    let bts =
        BoundaryCondition::transmissive_n_momentum_zero_t_momentum_set_stage(
            open_boundary_stage,
        );
    domain.set_boundary([("exterior", br), ("open", bts)].into_iter().collect())?;

    let mut summary = EvolveSummary::default();
    let mut evolve = domain.evolve(params.yieldstep, params.finaltime)?;
    while let Some(t) = evolve.next() {
        let t = t?;
        evolve.domain().print_timestepping_statistics();
        summary.yield_times.push(t);
    }
    summary.total_steps = domain.timestepping_statistics().total_steps;

    tracing::debug!(
        domain = domain.name(),
        yields = summary.yield_times.len(),
        total_steps = summary.total_steps,
        "evolve finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn defaults() {
        let p = ScenarioParameters::default();
        assert_approx_eq!(f64, p.x0, 756000.0);
        assert_approx_eq!(f64, p.x1, 756500.0);
        assert_approx_eq!(f64, p.yieldstep, 10.0);
        assert_approx_eq!(f64, p.finaltime, 50.0);
        assert_eq!(p.flow_algorithm, FlowAlgorithm::De0);
        assert_eq!(p.mesh_path(), benchmark_dir().join(MESH_FILENAME));
        assert!(p.mesh_path().is_absolute());
    }

    #[test]
    fn mesh_dir_override() {
        let p = ScenarioParameters {
            mesh_dir: Some(PathBuf::from("/data/meshes")),
            ..Default::default()
        };
        assert_eq!(
            p.mesh_path(),
            PathBuf::from("/data/meshes/merimbula_10785_1.tsh")
        );
    }

    #[test]
    fn open_boundary() {
        assert_approx_eq!(f64, open_boundary_stage(0.0), 0.0);
        assert_approx_eq!(
            f64,
            open_boundary_stage(100.0 * std::f64::consts::PI),
            10.0,
            ulps = 2
        );
    }

    #[test]
    fn parameters_from_toml() {
        let p: ScenarioParameters =
            toml::from_str("finaltime = 20.0\nflow_algorithm = \"DE1\"\n")
                .unwrap();
        assert_approx_eq!(f64, p.finaltime, 20.0);
        assert_approx_eq!(f64, p.yieldstep, 10.0);
        assert_eq!(p.flow_algorithm, FlowAlgorithm::De1);
    }
}
