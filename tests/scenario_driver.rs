use evolve_bench::engine::*;
use evolve_bench::generators::QuantityFunction;
use evolve_bench::scenario::*;

use float_cmp::assert_approx_eq;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Create(PathBuf),
    Quantity(String, Vec<f64>),
    Name(Option<String>),
    Store(bool),
    FlowAlgorithm(FlowAlgorithm),
    Boundary(Vec<(String, &'static str)>),
    Advance(f64),
    PrintStatistics(f64),
}

type Log = Rc<RefCell<Vec<Call>>>;

/// Library double that records every call made by the scenario driver.
#[derive(Default)]
struct Recorder {
    log: Log,
    fail_create: bool,
    fail_at: Option<f64>,
}

struct RecordingDomain {
    log: Log,
    time: f64,
    fail_at: Option<f64>,
    open_stage: Option<f64>,
    boundaries: BoundaryMap,
}

impl SimulationLibrary for Recorder {
    type Domain = RecordingDomain;

    fn create_domain_from_file(
        &self,
        path: &Path,
    ) -> Result<RecordingDomain, EngineError> {
        self.log.borrow_mut().push(Call::Create(path.to_path_buf()));
        if self.fail_create {
            return Err(EngineError::MeshRead {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        Ok(RecordingDomain {
            log: self.log.clone(),
            time: 0.0,
            fail_at: self.fail_at,
            open_stage: None,
            boundaries: BoundaryMap::new(),
        })
    }
}

impl SimulationDomain for RecordingDomain {
    fn set_quantity(
        &mut self,
        name: &str,
        function: &dyn QuantityFunction,
    ) -> Result<(), EngineError> {
        // Probe a few x positions around the default band.
        let probes = [755999.0, 756000.0, 756250.0, 756500.0, 756501.0];
        let values = probes
            .iter()
            .map(|x| function.value(*x, 0.0).unwrap())
            .collect();
        self.log
            .borrow_mut()
            .push(Call::Quantity(name.to_string(), values));
        Ok(())
    }

    fn set_name(&mut self, name: Option<&str>) {
        self.log
            .borrow_mut()
            .push(Call::Name(name.map(str::to_string)));
    }

    fn name(&self) -> &str {
        "recorder"
    }

    fn set_store(&mut self, store: bool) {
        self.log.borrow_mut().push(Call::Store(store));
    }

    fn set_flow_algorithm(&mut self, algorithm: FlowAlgorithm) {
        self.log.borrow_mut().push(Call::FlowAlgorithm(algorithm));
    }

    fn set_boundary(
        &mut self,
        boundaries: BoundaryMap,
    ) -> Result<(), EngineError> {
        let summary = boundaries
            .iter()
            .map(|(tag, bc)| (tag.to_string(), bc.kind()))
            .collect();
        self.log.borrow_mut().push(Call::Boundary(summary));
        self.boundaries = boundaries;
        Ok(())
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn advance_to(&mut self, time: f64) -> Result<(), EngineError> {
        self.log.borrow_mut().push(Call::Advance(time));
        if self.fail_at == Some(time) {
            return Err(EngineError::Solver("negative depth".to_string()));
        }
        self.open_stage = self.boundaries.get("open").and_then(|b| b.stage_at(time));
        self.time = time;
        Ok(())
    }

    fn timestepping_statistics(&self) -> TimesteppingStatistics {
        TimesteppingStatistics {
            time: self.time,
            steps: 1,
            min_timestep: 10.0,
            max_timestep: 10.0,
            total_steps: (self.time / 10.0) as u64,
        }
    }

    fn print_timestepping_statistics(&self) {
        self.log.borrow_mut().push(Call::PrintStatistics(self.time));
    }
}

fn params() -> ScenarioParameters {
    ScenarioParameters {
        mesh_dir: Some(PathBuf::from("/fixtures")),
        ..Default::default()
    }
}

#[test]
fn five_statistics_prints() {
    let library = Recorder::default();
    let summary = run_evolve(&library, &params()).unwrap();
    assert_eq!(summary.yield_times, vec![10.0, 20.0, 30.0, 40.0, 50.0]);
    assert_eq!(summary.total_steps, 5);

    let prints = library
        .log
        .borrow()
        .iter()
        .filter(|c| matches!(c, Call::PrintStatistics(_)))
        .count();
    assert_eq!(prints, 5);
}

#[test]
fn call_sequence() {
    let library = Recorder::default();
    run_evolve(&library, &params()).unwrap();
    let log = library.log.borrow();

    assert_eq!(
        log[0],
        Call::Create(PathBuf::from("/fixtures/merimbula_10785_1.tsh"))
    );
    assert_eq!(
        log[1],
        Call::Quantity("stage".to_string(), vec![1.0, 1.0, 2.0, 1.0, 1.0])
    );
    assert_eq!(log[2], Call::Name(None));
    assert_eq!(log[3], Call::Store(false));
    assert_eq!(log[4], Call::FlowAlgorithm(FlowAlgorithm::De0));
    assert_eq!(
        log[5],
        Call::Boundary(vec![
            ("exterior".to_string(), "Reflective_boundary"),
            (
                "open".to_string(),
                "Transmissive_n_momentum_zero_t_momentum_set_stage_boundary"
            ),
        ])
    );

    // Each reporting step advances then prints.
    let rest = &log[6..];
    assert_eq!(rest.len(), 10);
    for (k, pair) in rest.chunks(2).enumerate() {
        let t = 10.0 * (k + 1) as f64;
        assert_eq!(pair, &[Call::Advance(t), Call::PrintStatistics(t)]);
    }
}

#[test]
fn open_boundary_follows_time() {
    let library = Recorder::default();
    let mut domain = library
        .create_domain_from_file(Path::new("/fixtures/any.tsh"))
        .unwrap();
    domain
        .set_boundary(
            [(
                "open",
                BoundaryCondition::transmissive_n_momentum_zero_t_momentum_set_stage(
                    open_boundary_stage,
                ),
            )]
            .into_iter()
            .collect(),
        )
        .unwrap();
    domain.advance_to(50.0).unwrap();
    assert_approx_eq!(
        f64,
        domain.open_stage.unwrap(),
        10.0 * 0.25f64.sin(),
        ulps = 2
    );
}

#[test]
fn mesh_errors_propagate_unchanged() {
    let library = Recorder {
        fail_create: true,
        ..Default::default()
    };
    let err = run_evolve(&library, &params()).unwrap_err();
    match err {
        EngineError::MeshRead { path, source } => {
            assert_eq!(path, PathBuf::from("/fixtures/merimbula_10785_1.tsh"));
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error {other}"),
    }
    assert_eq!(library.log.borrow().len(), 1);
}

#[test]
fn solver_errors_stop_the_loop() {
    let library = Recorder {
        fail_at: Some(30.0),
        ..Default::default()
    };
    let err = run_evolve(&library, &params()).unwrap_err();
    assert!(matches!(err, EngineError::Solver(ref m) if m == "negative depth"));

    let log = library.log.borrow();
    let prints: Vec<f64> = log
        .iter()
        .filter_map(|c| match c {
            Call::PrintStatistics(t) => Some(*t),
            _ => None,
        })
        .collect();
    assert_eq!(prints, vec![10.0, 20.0]);
    assert_eq!(log.last(), Some(&Call::Advance(30.0)));
}

#[test]
fn custom_schedule() {
    let library = Recorder::default();
    let summary = run_evolve(
        &library,
        &ScenarioParameters {
            yieldstep: 20.0,
            finaltime: 50.0,
            ..params()
        },
    )
    .unwrap();
    assert_eq!(summary.yield_times, vec![20.0, 40.0, 50.0]);
}

#[test]
fn invalid_schedule_is_reported() {
    let library = Recorder::default();
    let err = run_evolve(
        &library,
        &ScenarioParameters {
            yieldstep: 0.0,
            ..params()
        },
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::InvalidSchedule(_)));
}
