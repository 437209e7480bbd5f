//! Core simulation types: load profiles, battery limits, and per-step records.

use std::fmt;

use chrono::{NaiveDateTime, TimeDelta};

use super::error::SimError;

/// One `(timestamp, power)` sample of a time series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    pub timestamp: NaiveDateTime,
    pub power_w: f64,
}

/// Chronologically ordered customer demand at a fixed step interval.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use offgrid_sim::sim::types::LoadProfile;
///
/// let start = NaiveDate::from_ymd_opt(2012, 3, 23).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let load = LoadProfile::new(start, 1.0, vec![100.0, 200.0]).unwrap();
/// assert_eq!(load.len(), 2);
/// assert_eq!(load.total_energy_wh(), 300.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LoadProfile {
    samples: Vec<TimeSample>,
    step_hours: f64,
}

impl LoadProfile {
    /// Creates a profile starting at `start` with one sample every `step_hours`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::EmptyProfile`] for an empty `values` vector and
    /// [`SimError::InvalidStep`] for a non-positive step, and
    /// [`SimError::NonFiniteLoad`] for a NaN or infinite sample.
    pub fn new(start: NaiveDateTime, step_hours: f64, values: Vec<f64>) -> Result<Self, SimError> {
        if values.is_empty() {
            return Err(SimError::EmptyProfile);
        }
        if !(step_hours.is_finite() && step_hours > 0.0) {
            return Err(SimError::InvalidStep(step_hours));
        }
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(SimError::NonFiniteLoad { index, value });
        }
        let step_ms = (step_hours * 3_600_000.0).round() as i64;
        let samples = values
            .into_iter()
            .enumerate()
            .map(|(i, power_w)| TimeSample {
                timestamp: start + TimeDelta::milliseconds(step_ms * i as i64),
                power_w,
            })
            .collect();
        Ok(Self {
            samples,
            step_hours,
        })
    }

    pub fn samples(&self) -> &[TimeSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn step_hours(&self) -> f64 {
        self.step_hours
    }

    /// Total demanded energy in Wh.
    pub fn total_energy_wh(&self) -> f64 {
        self.samples.iter().map(|s| s.power_w).sum::<f64>() * self.step_hours
    }

    /// Rescales the profile so that its total energy equals `daily_energy_wh`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UndefinedRatio`] if the profile carries no energy.
    pub fn normalized(mut self, daily_energy_wh: f64) -> Result<Self, SimError> {
        let total = self.total_energy_wh();
        if total == 0.0 {
            return Err(SimError::UndefinedRatio("total load energy"));
        }
        let scale = daily_energy_wh / total;
        for sample in &mut self.samples {
            sample.power_w *= scale;
        }
        Ok(self)
    }
}

/// Storage limits for the capacity-constrained simulation mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyLimits {
    min_wh: f64,
    max_wh: f64,
}

impl EnergyLimits {
    /// # Errors
    ///
    /// Returns [`SimError::InvalidLimits`] unless `min_wh < max_wh` and both are finite.
    pub fn new(min_wh: f64, max_wh: f64) -> Result<Self, SimError> {
        if !(min_wh.is_finite() && max_wh.is_finite() && min_wh < max_wh) {
            return Err(SimError::InvalidLimits {
                min: min_wh,
                max: max_wh,
            });
        }
        Ok(Self { min_wh, max_wh })
    }

    pub fn min_wh(&self) -> f64 {
        self.min_wh
    }

    pub fn max_wh(&self) -> f64 {
        self.max_wh
    }
}

/// Complete record of one simulation timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    /// Timestep index.
    pub step: usize,
    pub timestamp: NaiveDateTime,
    /// AC power demanded by the customer (W).
    pub load_customer_w: f64,
    /// DC power drawn by the inverter to serve the customer (W).
    pub load_inverter_w: f64,
    /// DC power produced by the panel (W).
    pub solar_w: f64,
    /// Battery energy at the start of this step (Wh).
    pub battery_energy_wh: f64,
    /// Energy the battery would hold after this step without limits (Wh).
    pub projected_energy_wh: f64,
    /// Energy that could not be supplied because of the lower limit (Wh, >= 0).
    pub energy_gap_wh: f64,
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>3} ({}) | load={:>7.1} W  inverter={:>7.1} W  solar={:>7.1} W | \
             battery={:>8.1} Wh  gap={:>6.1} Wh",
            self.step,
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.load_customer_w,
            self.load_inverter_w,
            self.solar_w,
            self.battery_energy_wh,
            self.energy_gap_wh,
        )
    }
}

/// Aligned per-step table plus the battery energy after the final step.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub rows: Vec<StepRecord>,
    /// Battery energy after the last step (Wh). Not part of any row.
    pub final_energy_wh: f64,
}

impl SimulationResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Start-of-step battery energies followed by the final energy.
    pub fn energy_trajectory(&self) -> Vec<f64> {
        self.rows
            .iter()
            .map(|r| r.battery_energy_wh)
            .chain(std::iter::once(self.final_energy_wh))
            .collect()
    }

    /// Spread between the highest and lowest start-of-step battery energy (Wh).
    pub fn battery_excursion_wh(&self) -> f64 {
        let (lo, hi) = self
            .rows
            .iter()
            .map(|r| r.battery_energy_wh)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| {
                (lo.min(e), hi.max(e))
            });
        if self.rows.is_empty() { 0.0 } else { hi - lo }
    }

    pub fn total_gap_wh(&self) -> f64 {
        self.rows.iter().map(|r| r.energy_gap_wh).sum()
    }

}

/// Outcome of a capacity-constrained run.
#[derive(Debug, Clone, PartialEq)]
pub struct LegpOutcome {
    /// Unmet energy as a fraction of total customer energy.
    pub legp: f64,
    pub result: SimulationResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2012, 3, 23)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    #[test]
    fn profile_timestamps_are_evenly_spaced() {
        let load = LoadProfile::new(start(), 0.5, vec![1.0, 2.0, 3.0]).unwrap();
        let ts: Vec<_> = load.samples().iter().map(|s| s.timestamp).collect();
        assert_eq!(ts[1] - ts[0], TimeDelta::minutes(30));
        assert_eq!(ts[2] - ts[1], TimeDelta::minutes(30));
        assert_eq!(load.total_energy_wh(), 3.0);
    }

    #[test]
    fn empty_profile_is_rejected() {
        assert_eq!(
            LoadProfile::new(start(), 1.0, vec![]),
            Err(SimError::EmptyProfile)
        );
    }

    #[test]
    fn zero_step_is_rejected() {
        assert!(matches!(
            LoadProfile::new(start(), 0.0, vec![1.0]),
            Err(SimError::InvalidStep(_))
        ));
    }

    #[test]
    fn non_finite_samples_are_rejected() {
        assert!(matches!(
            LoadProfile::new(start(), 1.0, vec![100.0, f64::NAN]),
            Err(SimError::NonFiniteLoad { index: 1, .. })
        ));
        assert_eq!(
            LoadProfile::new(start(), 1.0, vec![f64::INFINITY]),
            Err(SimError::NonFiniteLoad {
                index: 0,
                value: f64::INFINITY
            })
        );
        assert!(LoadProfile::new(start(), 1.0, vec![0.0, f64::NEG_INFINITY]).is_err());
    }

    #[test]
    fn normalize_scales_total_energy() {
        let load = LoadProfile::new(start(), 1.0, vec![0.0, 300.0, 300.0])
            .unwrap()
            .normalized(3000.0)
            .unwrap();
        assert!((load.total_energy_wh() - 3000.0).abs() < 1e-9);
        assert_eq!(load.samples()[0].power_w, 0.0);
        assert!((load.samples()[1].power_w - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn normalize_all_zero_profile_fails() {
        let load = LoadProfile::new(start(), 1.0, vec![0.0; 4]).unwrap();
        assert!(matches!(
            load.normalized(3000.0),
            Err(SimError::UndefinedRatio(_))
        ));
    }

    #[test]
    fn limits_require_min_below_max() {
        assert!(EnergyLimits::new(0.0, 1000.0).is_ok());
        assert!(EnergyLimits::new(1000.0, 1000.0).is_err());
        assert!(EnergyLimits::new(10.0, 5.0).is_err());
        assert!(EnergyLimits::new(f64::NAN, 5.0).is_err());
    }
}
