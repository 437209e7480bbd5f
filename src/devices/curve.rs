use serde::Deserialize;

use crate::devices::types::HardwareError;

/// Piecewise-linear curve over sorted control points.
///
/// Outside the control range the curve holds its end values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<[f64; 2]>")]
pub struct Curve {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Curve {
    /// Builds a curve from `(x, y)` control points.
    ///
    /// # Errors
    ///
    /// Fails on an empty point list, non-finite values, or x values that are
    /// not strictly increasing.
    pub fn new(points: &[(f64, f64)]) -> Result<Self, HardwareError> {
        if points.is_empty() {
            return Err(HardwareError::InvalidCurve("no control points".into()));
        }
        if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(HardwareError::InvalidCurve("non-finite control point".into()));
        }
        if points.windows(2).any(|w| w[1].0 <= w[0].0) {
            return Err(HardwareError::InvalidCurve(
                "x values must be strictly increasing".into(),
            ));
        }
        Ok(Self {
            xs: points.iter().map(|p| p.0).collect(),
            ys: points.iter().map(|p| p.1).collect(),
        })
    }

    /// Largest x covered by the control points.
    pub fn x_max(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// Evaluates the curve at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::NonFiniteInput`] for a NaN or infinite `x`.
    pub fn at(&self, x: f64) -> Result<f64, HardwareError> {
        if !x.is_finite() {
            return Err(HardwareError::NonFiniteInput(x));
        }
        let last = self.xs.len() - 1;
        if x <= self.xs[0] {
            return Ok(self.ys[0]);
        }
        if x >= self.xs[last] {
            return Ok(self.ys[last]);
        }
        // First control point strictly greater than x; in 1..=last for finite x.
        let hi = self.xs.partition_point(|&p| p <= x);
        let lo = hi - 1;
        let t = (x - self.xs[lo]) / (self.xs[hi] - self.xs[lo]);
        Ok(self.ys[lo] + t * (self.ys[hi] - self.ys[lo]))
    }
}

impl TryFrom<Vec<[f64; 2]>> for Curve {
    type Error = HardwareError;

    fn try_from(points: Vec<[f64; 2]>) -> Result<Self, Self::Error> {
        let pairs: Vec<(f64, f64)> = points.iter().map(|p| (p[0], p[1])).collect();
        Self::new(&pairs)
    }
}
