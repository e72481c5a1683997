//! Initial condition generators
//!
//! Pointwise functions used to fill quantities over a domain.
//! Each generator maps a coordinate pair to a single field value.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeneratorError {
    #[error("generator parameter `{0}` was never assigned")]
    UnboundParameter(&'static str),
}

/// All quantity generators adhere to this interface.
pub trait QuantityFunction {
    fn value(&self, x: f64, y: f64) -> Result<f64, GeneratorError>;
}

impl<F> QuantityFunction for F
where
    F: Fn(f64, f64) -> f64,
{
    fn value(&self, x: f64, y: f64) -> Result<f64, GeneratorError> {
        Ok(self(x, y))
    }
}

/// Constant water height `h` inside the open band `x0 < x < x1`,
/// on top of a unit background stage everywhere.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SetStage {
    x0: f64,
    x1: f64,
    h: f64,
}

impl SetStage {
    pub fn new(x0: f64, x1: f64, h: f64) -> Self {
        SetStage { x0, x1, h }
    }

    pub fn stage(&self, x: f64) -> f64 {
        let inside = (x > self.x0) & (x < self.x1);
        self.h * (inside as u8 as f64) + 1.0
    }
}

impl Default for SetStage {
    fn default() -> Self {
        SetStage::new(0.25, 0.5, 1.0)
    }
}

impl QuantityFunction for SetStage {
    fn value(&self, x: f64, _y: f64) -> Result<f64, GeneratorError> {
        Ok(self.stage(x))
    }
}

/// Linear bed slope `x / h`.
///
/// `new` leaves the band bounds unassigned, and evaluating such a
/// generator reports the first missing bound. Use `with_bounds` for a
/// usable generator.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SetElevation {
    x0: Option<f64>,
    x1: Option<f64>,
    h: f64,
}

impl SetElevation {
    pub fn new(h: f64) -> Self {
        SetElevation {
            x0: None,
            x1: None,
            h,
        }
    }

    pub fn with_bounds(x0: f64, x1: f64, h: f64) -> Self {
        SetElevation {
            x0: Some(x0),
            x1: Some(x1),
            h,
        }
    }

    pub fn bounds(&self) -> Result<(f64, f64), GeneratorError> {
        let x0 = self.x0.ok_or(GeneratorError::UnboundParameter("x0"))?;
        let x1 = self.x1.ok_or(GeneratorError::UnboundParameter("x1"))?;
        Ok((x0, x1))
    }
}

impl Default for SetElevation {
    fn default() -> Self {
        SetElevation::new(1.0)
    }
}

impl QuantityFunction for SetElevation {
    fn value(&self, x: f64, _y: f64) -> Result<f64, GeneratorError> {
        self.bounds()?;
        Ok(x / self.h)
    }
}
