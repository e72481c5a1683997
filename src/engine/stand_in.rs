//! Deterministic stand-in for the simulation library.
//!
//! No shallow water equations are solved here. The stand-in keeps the
//! bookkeeping a real engine exposes (quantities sampled on a grid of
//! points, boundary assignment, fixed internal timesteps, statistics) so
//! the harness can be exercised quickly and reproducibly.

use crate::engine::*;
use crate::generators::QuantityFunction;
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const QUANTITIES: [&str; 5] =
    ["stage", "elevation", "friction", "xmomentum", "ymomentum"];

pub const DEFAULT_DOMAIN_NAME: &str = "domain";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandInConfig {
    /// Lower left corner of the sample grid
    pub origin: [f64; 2],

    /// Width and height of the sample grid
    pub extent: [f64; 2],

    /// Sample points along x and y
    pub resolution: [usize; 2],

    /// Fixed internal timestep
    pub timestep: f64,

    /// Boundary tags the mesh declares
    pub boundary_tags: Vec<String>,
}

impl Default for StandInConfig {
    fn default() -> Self {
        // Roughly the Merimbula lake bounding box, UTM zone 55.
        StandInConfig {
            origin: [754_500.0, 5_912_000.0],
            extent: [3_000.0, 2_500.0],
            resolution: [60, 50],
            timestep: 0.5,
            boundary_tags: vec!["exterior".to_string(), "open".to_string()],
        }
    }
}

impl StandInConfig {
    /// Cell centred sample points, row major.
    pub fn sample_points(&self) -> Vec<Point2<f64>> {
        let origin = Point2::new(self.origin[0], self.origin[1]);
        let [nx, ny] = self.resolution;
        let spacing = Vector2::new(
            self.extent[0] / nx.max(1) as f64,
            self.extent[1] / ny.max(1) as f64,
        );
        let mut points = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                let offset = Vector2::new(
                    (i as f64 + 0.5) * spacing.x,
                    (j as f64 + 0.5) * spacing.y,
                );
                points.push(origin + offset);
            }
        }
        points
    }
}

#[derive(Clone, Debug, Default)]
pub struct StandInLibrary {
    config: StandInConfig,
}

impl StandInLibrary {
    pub fn new(config: StandInConfig) -> Self {
        StandInLibrary { config }
    }

    pub fn config(&self) -> &StandInConfig {
        &self.config
    }
}

impl SimulationLibrary for StandInLibrary {
    type Domain = StandInDomain;

    fn create_domain_from_file(
        &self,
        path: &Path,
    ) -> Result<StandInDomain, EngineError> {
        let bytes = std::fs::read(path).map_err(|source| {
            EngineError::MeshRead {
                path: path.to_path_buf(),
                source,
            }
        })?;
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(EngineError::MalformedMesh {
                path: path.to_path_buf(),
                reason: "mesh file is empty".to_string(),
            });
        }
        if self.config.timestep <= 0.0 || !self.config.timestep.is_finite() {
            return Err(EngineError::Solver(format!(
                "internal timestep must be positive, got {}",
                self.config.timestep
            )));
        }

        tracing::debug!(
            path = %path.display(),
            bytes = bytes.len(),
            "loaded mesh"
        );
        Ok(StandInDomain::new(path.to_path_buf(), &self.config))
    }
}

pub struct StandInDomain {
    mesh_path: PathBuf,
    points: Vec<Point2<f64>>,
    quantities: BTreeMap<&'static str, Vec<f64>>,
    name: String,
    store: bool,
    flow_algorithm: FlowAlgorithm,
    boundary_tags: Vec<String>,
    boundaries: BoundaryMap,
    boundary_stage: BTreeMap<String, f64>,
    timestep: f64,
    time: f64,
    interval: TimesteppingStatistics,
}

impl StandInDomain {
    fn new(mesh_path: PathBuf, config: &StandInConfig) -> Self {
        let points = config.sample_points();
        let quantities = QUANTITIES
            .into_iter()
            .map(|q| (q, vec![0.0; points.len()]))
            .collect();
        StandInDomain {
            mesh_path,
            points,
            quantities,
            name: DEFAULT_DOMAIN_NAME.to_string(),
            store: true,
            flow_algorithm: FlowAlgorithm::default(),
            boundary_tags: config.boundary_tags.clone(),
            boundaries: BoundaryMap::new(),
            boundary_stage: BTreeMap::new(),
            timestep: config.timestep,
            time: 0.0,
            interval: TimesteppingStatistics::default(),
        }
    }

    pub fn mesh_path(&self) -> &Path {
        &self.mesh_path
    }

    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    pub fn quantity(&self, name: &str) -> Option<&[f64]> {
        self.quantities.get(name).map(Vec::as_slice)
    }

    pub fn store(&self) -> bool {
        self.store
    }

    pub fn flow_algorithm(&self) -> FlowAlgorithm {
        self.flow_algorithm
    }

    pub fn boundaries(&self) -> &BoundaryMap {
        &self.boundaries
    }

    /// Stage last imposed on boundary `tag`, if it sets one.
    pub fn boundary_stage(&self, tag: &str) -> Option<f64> {
        self.boundary_stage.get(tag).copied()
    }

    fn sample_boundaries(&mut self, t: f64) -> Result<(), EngineError> {
        for (tag, condition) in self.boundaries.iter() {
            if let Some(stage) = condition.stage_at(t) {
                if !stage.is_finite() {
                    return Err(EngineError::Solver(format!(
                        "boundary `{tag}` produced stage {stage} at t = {t}"
                    )));
                }
                self.boundary_stage.insert(tag.to_string(), stage);
            }
        }
        Ok(())
    }
}

impl SimulationDomain for StandInDomain {
    fn set_quantity(
        &mut self,
        name: &str,
        function: &dyn QuantityFunction,
    ) -> Result<(), EngineError> {
        let values = self
            .quantities
            .get_mut(name)
            .ok_or_else(|| EngineError::UnknownQuantity(name.to_string()))?;
        for (value, p) in values.iter_mut().zip(self.points.iter()) {
            *value = function.value(p.x, p.y).map_err(|source| {
                EngineError::Generator {
                    name: name.to_string(),
                    source,
                }
            })?;
        }
        Ok(())
    }

    fn set_name(&mut self, name: Option<&str>) {
        self.name = name.unwrap_or(DEFAULT_DOMAIN_NAME).to_string();
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_store(&mut self, store: bool) {
        self.store = store;
    }

    fn set_flow_algorithm(&mut self, algorithm: FlowAlgorithm) {
        self.flow_algorithm = algorithm;
    }

    fn set_boundary(
        &mut self,
        boundaries: BoundaryMap,
    ) -> Result<(), EngineError> {
        if let Some(tag) = boundaries
            .tags()
            .find(|tag| !self.boundary_tags.iter().any(|t| t == *tag))
        {
            return Err(EngineError::UnknownBoundaryTag(tag.to_string()));
        }
        self.boundaries = boundaries;
        self.boundary_stage.clear();
        Ok(())
    }

    fn check_integrity(&self) -> Result<(), EngineError> {
        match self
            .boundary_tags
            .iter()
            .find(|tag| !self.boundaries.contains(tag))
        {
            Some(tag) => Err(EngineError::UnassignedBoundary(tag.clone())),
            None => Ok(()),
        }
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn advance_to(&mut self, time: f64) -> Result<(), EngineError> {
        profiling::scope!("stand_in::advance_to");
        if time < self.time {
            return Err(EngineError::InvalidSchedule(format!(
                "can not advance backwards from {} to {time}",
                self.time
            )));
        }

        let mut interval = TimesteppingStatistics {
            time: self.time,
            steps: 0,
            min_timestep: f64::INFINITY,
            max_timestep: 0.0,
            total_steps: self.interval.total_steps,
        };
        while self.time < time {
            let dt = self.timestep.min(time - self.time);
            self.sample_boundaries(self.time)?;
            self.time = if dt < self.timestep { time } else { self.time + dt };
            interval.steps += 1;
            interval.total_steps += 1;
            interval.min_timestep = interval.min_timestep.min(dt);
            interval.max_timestep = interval.max_timestep.max(dt);
        }
        if interval.steps == 0 {
            interval.min_timestep = 0.0;
        }
        interval.time = self.time;
        self.interval = interval;

        tracing::debug!(
            time = self.time,
            steps = interval.steps,
            "advanced stand-in domain"
        );
        Ok(())
    }

    fn timestepping_statistics(&self) -> TimesteppingStatistics {
        self.interval
    }
}
