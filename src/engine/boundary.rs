use std::collections::BTreeMap;
use std::fmt;

/// Time to stage mapping used by stage driven boundaries.
pub type StageFunction = Box<dyn Fn(f64) -> f64>;

/// Boundary conditions understood by the simulation library.
/// Once assigned through `SimulationDomain::set_boundary` they
/// belong to the domain.
pub enum BoundaryCondition {
    /// Solid reflective wall
    Reflective,

    /// Zero tangential momentum, transmissive normal momentum,
    /// stage set from a function of time.
    TransmissiveNMomentumZeroTMomentumSetStage(StageFunction),
}

impl BoundaryCondition {
    pub fn reflective() -> Self {
        BoundaryCondition::Reflective
    }

    pub fn transmissive_n_momentum_zero_t_momentum_set_stage<F>(
        stage: F,
    ) -> Self
    where
        F: Fn(f64) -> f64 + 'static,
    {
        BoundaryCondition::TransmissiveNMomentumZeroTMomentumSetStage(
            Box::new(stage),
        )
    }

    /// Stage imposed at time `t`, `None` for boundaries that do not set it.
    pub fn stage_at(&self, t: f64) -> Option<f64> {
        match self {
            BoundaryCondition::Reflective => None,
            BoundaryCondition::TransmissiveNMomentumZeroTMomentumSetStage(
                f,
            ) => Some(f(t)),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BoundaryCondition::Reflective => "Reflective_boundary",
            BoundaryCondition::TransmissiveNMomentumZeroTMomentumSetStage(
                _,
            ) => "Transmissive_n_momentum_zero_t_momentum_set_stage_boundary",
        }
    }
}

impl fmt::Debug for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// Boundary tag to boundary condition assignment.
#[derive(Debug, Default)]
pub struct BoundaryMap {
    entries: BTreeMap<String, BoundaryCondition>,
}

impl BoundaryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(
        &mut self,
        tag: S,
        condition: BoundaryCondition,
    ) -> Option<BoundaryCondition> {
        self.entries.insert(tag.into(), condition)
    }

    pub fn get(&self, tag: &str) -> Option<&BoundaryCondition> {
        self.entries.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoundaryCondition)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, BoundaryCondition)> for BoundaryMap {
    fn from_iter<I: IntoIterator<Item = (S, BoundaryCondition)>>(
        iter: I,
    ) -> Self {
        let mut map = BoundaryMap::new();
        for (tag, condition) in iter {
            map.insert(tag, condition);
        }
        map
    }
}
