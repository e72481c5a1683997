use crate::engine::EngineError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numerical schemes the simulation library can evolve with.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
)]
pub enum FlowAlgorithm {
    /// First order
    #[value(name = "1_0")]
    #[serde(rename = "1_0")]
    FirstOrder,

    #[value(name = "1_5")]
    #[serde(rename = "1_5")]
    OneAndHalfOrder,

    #[value(name = "1_75")]
    #[serde(rename = "1_75")]
    OneAndThreeQuarterOrder,

    /// Second order
    #[value(name = "2_0")]
    #[serde(rename = "2_0")]
    SecondOrder,

    #[value(name = "2_5")]
    #[serde(rename = "2_5")]
    SecondOrderRungeKutta,

    #[value(name = "tsunami")]
    #[serde(rename = "tsunami")]
    Tsunami,

    #[value(name = "yusuke")]
    #[serde(rename = "yusuke")]
    Yusuke,

    /// Discontinuous elevation, first order in time
    #[default]
    #[value(name = "DE0")]
    #[serde(rename = "DE0")]
    De0,

    #[value(name = "DE1")]
    #[serde(rename = "DE1")]
    De1,

    #[value(name = "DE2")]
    #[serde(rename = "DE2")]
    De2,
}

impl FlowAlgorithm {
    pub const ALL: [FlowAlgorithm; 10] = [
        FlowAlgorithm::FirstOrder,
        FlowAlgorithm::OneAndHalfOrder,
        FlowAlgorithm::OneAndThreeQuarterOrder,
        FlowAlgorithm::SecondOrder,
        FlowAlgorithm::SecondOrderRungeKutta,
        FlowAlgorithm::Tsunami,
        FlowAlgorithm::Yusuke,
        FlowAlgorithm::De0,
        FlowAlgorithm::De1,
        FlowAlgorithm::De2,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FlowAlgorithm::FirstOrder => "1_0",
            FlowAlgorithm::OneAndHalfOrder => "1_5",
            FlowAlgorithm::OneAndThreeQuarterOrder => "1_75",
            FlowAlgorithm::SecondOrder => "2_0",
            FlowAlgorithm::SecondOrderRungeKutta => "2_5",
            FlowAlgorithm::Tsunami => "tsunami",
            FlowAlgorithm::Yusuke => "yusuke",
            FlowAlgorithm::De0 => "DE0",
            FlowAlgorithm::De1 => "DE1",
            FlowAlgorithm::De2 => "DE2",
        }
    }
}

impl fmt::Display for FlowAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FlowAlgorithm {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FlowAlgorithm::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| EngineError::UnknownFlowAlgorithm(s.to_string()))
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for a in FlowAlgorithm::ALL {
            assert_eq!(a.name().parse::<FlowAlgorithm>().unwrap(), a);
        }
    }

    #[test]
    fn default_is_de0() {
        assert_eq!(FlowAlgorithm::default(), FlowAlgorithm::De0);
        assert_eq!(FlowAlgorithm::default().to_string(), "DE0");
    }

    #[test]
    fn unknown_name() {
        let e = "DE9".parse::<FlowAlgorithm>().unwrap_err();
        assert!(matches!(e, EngineError::UnknownFlowAlgorithm(ref n) if n == "DE9"));
        assert!("de0".parse::<FlowAlgorithm>().is_err());
    }
}
