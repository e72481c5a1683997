use crate::engine::{EngineError, SimulationDomain};
use std::iter::FusedIterator;

/// Relative slack used when deciding a yield time has reached `finaltime`.
const FINALTIME_TOLERANCE: f64 = 1.0e-9;

/// Lazy evolution of a domain, created by `SimulationDomain::evolve`.
///
/// Each item is the model time at which control is yielded. The sequence
/// is finite and can not be restarted; after the final yield, or after
/// an error, it only returns `None`.
pub struct Evolve<'a, D: SimulationDomain> {
    domain: &'a mut D,
    start: f64,
    yieldstep: f64,
    finaltime: f64,
    yields: u64,
    finished: bool,
}

impl<'a, D: SimulationDomain> Evolve<'a, D> {
    pub fn new(
        domain: &'a mut D,
        yieldstep: f64,
        finaltime: f64,
    ) -> Result<Self, EngineError> {
        let start = domain.time();
        if !yieldstep.is_finite() || yieldstep <= 0.0 {
            return Err(EngineError::InvalidSchedule(format!(
                "yieldstep must be positive, got {yieldstep}"
            )));
        }
        if !finaltime.is_finite() || finaltime < start {
            return Err(EngineError::InvalidSchedule(format!(
                "finaltime {finaltime} is before current time {start}"
            )));
        }
        domain.check_integrity()?;

        Ok(Evolve {
            domain,
            start,
            yieldstep,
            finaltime,
            yields: 0,
            finished: finaltime == start,
        })
    }

    /// Access the domain between yields, e.g. to print statistics.
    pub fn domain(&self) -> &D {
        self.domain
    }

    pub fn yields(&self) -> u64 {
        self.yields
    }

    fn next_target(&self) -> f64 {
        let target = self.start + (self.yields + 1) as f64 * self.yieldstep;
        let slack = FINALTIME_TOLERANCE * self.yieldstep;
        if target + slack >= self.finaltime {
            self.finaltime
        } else {
            target
        }
    }
}

impl<D: SimulationDomain> Iterator for Evolve<'_, D> {
    type Item = Result<f64, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let target = self.next_target();
        if let Err(e) = self.domain.advance_to(target) {
            self.finished = true;
            return Some(Err(e));
        }

        self.yields += 1;
        if target >= self.finaltime {
            self.finished = true;
        }
        Some(Ok(target))
    }
}

impl<D: SimulationDomain> FusedIterator for Evolve<'_, D> {}
