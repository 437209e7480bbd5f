use serde::Deserialize;

use crate::devices::curve::Curve;
use crate::devices::types::HardwareError;

/// Inverter transfer curve presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum InverterKind {
    /// Constant 94% conversion efficiency up to 750 W.
    Flat,
    /// 13 W standby draw, 75% at half load, 94% at full load.
    Typical,
}

impl InverterKind {
    pub const ALL: [Self; 2] = [Self::Flat, Self::Typical];

    pub fn label(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Typical => "typical",
        }
    }

    /// Output-power → input-power control points for this preset.
    fn control_points(self) -> Vec<(f64, f64)> {
        match self {
            Self::Flat => vec![(0.0, 0.0), (750.0, 750.0 / 0.94)],
            Self::Typical => vec![(0.0, 13.0), (375.0, 375.0 / 0.75), (750.0, 750.0 / 0.94)],
        }
    }
}

/// A DC→AC inverter described by its output-to-input power curve.
///
/// The last control point is the rated output; larger loads are rejected.
#[derive(Debug, Clone)]
pub struct Inverter {
    pub kind: InverterKind,
    curve: Curve,
}

impl Inverter {
    /// Creates an inverter from one of the built-in presets.
    ///
    /// # Errors
    ///
    /// Propagates curve validation failures.
    pub fn new(kind: InverterKind) -> Result<Self, HardwareError> {
        Ok(Self {
            kind,
            curve: Curve::new(&kind.control_points())?,
        })
    }

    /// Rated AC output power in watts.
    pub fn rated_w(&self) -> f64 {
        self.curve.x_max()
    }

    /// DC input power needed to serve `load_w` of AC load.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::InverterOverload`] when `load_w` exceeds the rating.
    pub fn input_power(&self, load_w: f64) -> Result<f64, HardwareError> {
        let rated_w = self.rated_w();
        if load_w > rated_w {
            return Err(HardwareError::InverterOverload { load_w, rated_w });
        }
        self.curve.at(load_w)
    }
}
