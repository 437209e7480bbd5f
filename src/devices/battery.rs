use serde::Deserialize;

use crate::devices::curve::Curve;
use crate::devices::types::{HardwareError, check_efficiency};

/// Battery chemistry presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum BatteryKind {
    LeadAcid,
    LithiumIon,
}

impl BatteryKind {
    pub const ALL: [Self; 2] = [Self::LeadAcid, Self::LithiumIon];

    pub fn label(self) -> &'static str {
        match self {
            Self::LeadAcid => "lead_acid",
            Self::LithiumIon => "lithium_ion",
        }
    }

    /// Discharge power (W) → efficiency control points.
    pub fn efficiency_points(self) -> Vec<(f64, f64)> {
        match self {
            Self::LeadAcid => vec![(0.0, 0.85), (1000.0, 0.75)],
            Self::LithiumIon => vec![(0.0, 0.96), (1000.0, 0.92)],
        }
    }

    /// Usable fraction of nominal capacity.
    pub fn depth_of_discharge(self) -> f64 {
        match self {
            Self::LeadAcid => 0.5,
            Self::LithiumIon => 0.8,
        }
    }

    /// Years between replacements.
    pub fn life_years(self) -> u32 {
        match self {
            Self::LeadAcid => 4,
            Self::LithiumIon => 10,
        }
    }

    /// Installed cost per watt-hour of nominal capacity.
    pub fn cost_per_wh(self) -> f64 {
        match self {
            Self::LeadAcid => 0.15,
            Self::LithiumIon => 0.50,
        }
    }
}

/// A storage battery: discharge efficiency curve plus the parameters the cost
/// model needs.
///
/// All fields are validated at construction, so a `Battery` in hand never fails
/// mid-simulation because of its own configuration.
#[derive(Debug, Clone)]
pub struct Battery {
    /// Type label used in reports.
    pub label: String,
    efficiency: Curve,
    /// Depth of discharge, in (0, 1].
    pub dod: f64,
    /// Replacement life in whole years (>= 1).
    pub life_years: u32,
    /// Installed cost per Wh of nominal capacity.
    pub cost_per_wh: f64,
}

impl Battery {
    /// Creates a battery, validating every parameter.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::InvalidBattery`] when `dod` is outside (0, 1],
    /// `life_years` is zero, the unit cost is negative, or any curve point has an
    /// efficiency outside (0, 1].
    pub fn new(
        label: impl Into<String>,
        efficiency: Curve,
        dod: f64,
        life_years: u32,
        cost_per_wh: f64,
    ) -> Result<Self, HardwareError> {
        if !(dod > 0.0 && dod <= 1.0) {
            return Err(HardwareError::InvalidBattery(format!(
                "depth of discharge must be in (0, 1], got {dod}"
            )));
        }
        if life_years < 1 {
            return Err(HardwareError::InvalidBattery(
                "replacement life must be at least 1 year".into(),
            ));
        }
        if !(cost_per_wh.is_finite() && cost_per_wh >= 0.0) {
            return Err(HardwareError::InvalidBattery(format!(
                "cost per Wh must be >= 0, got {cost_per_wh}"
            )));
        }
        for (power_w, eff) in efficiency.points() {
            check_efficiency(eff, power_w)
                .map_err(|e| HardwareError::InvalidBattery(e.to_string()))?;
        }

        Ok(Self {
            label: label.into(),
            efficiency,
            dod,
            life_years,
            cost_per_wh,
        })
    }

    /// Builds one of the built-in chemistry presets.
    ///
    /// # Errors
    ///
    /// Only fails if a preset table is malformed.
    pub fn preset(kind: BatteryKind) -> Result<Self, HardwareError> {
        Self::new(
            kind.label(),
            Curve::new(&kind.efficiency_points())?,
            kind.depth_of_discharge(),
            kind.life_years(),
            kind.cost_per_wh(),
        )
    }

    /// Discharge efficiency at `discharge_w`.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::InvalidEfficiency`] if the curve yields a value
    /// outside (0, 1].
    pub fn efficiency(&self, discharge_w: f64) -> Result<f64, HardwareError> {
        check_efficiency(self.efficiency.at(discharge_w)?, discharge_w)
    }

    /// Nominal capacity needed so that `usable_wh` fits within the depth of discharge.
    pub fn nominal_capacity_wh(&self, usable_wh: f64) -> f64 {
        usable_wh / self.dod
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_curve(eff: f64) -> Curve {
        Curve::new(&[(0.0, eff)]).unwrap()
    }

    #[test]
    fn presets_are_valid() {
        for kind in BatteryKind::ALL {
            let battery = Battery::preset(kind).unwrap();
            assert_eq!(battery.label, kind.label());
            assert_eq!(battery.dod, kind.depth_of_discharge());
        }
    }

    #[test]
    fn lead_acid_efficiency_drops_with_power() {
        let battery = Battery::preset(BatteryKind::LeadAcid).unwrap();
        assert!((battery.efficiency(500.0).unwrap() - 0.80).abs() < 1e-12);
        assert!(battery.efficiency(2000.0).unwrap() < battery.efficiency(100.0).unwrap());
    }

    #[test]
    fn zero_dod_is_rejected() {
        let err = Battery::new("x", flat_curve(0.9), 0.0, 5, 0.1);
        assert!(matches!(err, Err(HardwareError::InvalidBattery(_))));
    }

    #[test]
    fn dod_above_one_is_rejected() {
        assert!(Battery::new("x", flat_curve(0.9), 1.5, 5, 0.1).is_err());
    }

    #[test]
    fn zero_life_is_rejected() {
        assert!(Battery::new("x", flat_curve(0.9), 0.5, 0, 0.1).is_err());
    }

    #[test]
    fn efficiency_above_one_is_rejected() {
        assert!(Battery::new("x", flat_curve(1.1), 0.5, 5, 0.1).is_err());
    }

    #[test]
    fn nominal_capacity_scales_by_dod() {
        let battery = Battery::new("x", flat_curve(0.9), 0.5, 5, 0.1).unwrap();
        assert_eq!(battery.nominal_capacity_wh(1000.0), 2000.0);
    }
}
