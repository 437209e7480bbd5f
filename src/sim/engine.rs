//! Time-stepped energy balance between panel, inverter, battery and load.

use tracing::trace;

use crate::devices::HardwareModel;

use super::error::SimError;
use super::types::{EnergyLimits, LegpOutcome, LoadProfile, SimulationResult, StepRecord, TimeSample};

/// Energy balance engine over a borrowed hardware model.
///
/// One stepping function serves both modes: without limits the battery tracks
/// arbitrary (even negative) energy starting from 0; with limits it starts full,
/// is clamped to `[min, max]`, and every shortfall below `min` is booked as an
/// energy gap.
pub struct Engine<'a, H: HardwareModel + ?Sized> {
    hardware: &'a H,
    limits: Option<EnergyLimits>,
}

impl<'a, H: HardwareModel + ?Sized> Engine<'a, H> {
    pub fn unconstrained(hardware: &'a H) -> Self {
        Self {
            hardware,
            limits: None,
        }
    }

    pub fn constrained(hardware: &'a H, limits: EnergyLimits) -> Self {
        Self {
            hardware,
            limits: Some(limits),
        }
    }

    /// Battery energy before the first step: empty when unconstrained, full otherwise.
    pub fn initial_energy_wh(&self) -> f64 {
        self.limits.map_or(0.0, |l| l.max_wh())
    }

    /// Executes one timestep.
    ///
    /// # Returns
    ///
    /// The step record and the battery energy carried into the next step.
    ///
    /// # Errors
    ///
    /// Hardware failures are tagged with the step index.
    pub fn step(
        &self,
        step: usize,
        sample: &TimeSample,
        energy_wh: f64,
        step_hours: f64,
    ) -> Result<(StepRecord, f64), SimError> {
        let tag = |source| SimError::Hardware { step, source };

        let load_inverter_w = self.hardware.inverter_input_power(sample.power_w).map_err(tag)?;
        let solar_w = self.hardware.panel_power(sample.timestamp).map_err(tag)?;

        let (charge_w, discharge_w) = if solar_w > load_inverter_w {
            (solar_w - load_inverter_w, 0.0)
        } else {
            (0.0, load_inverter_w - solar_w)
        };

        // Charging is lossless; only the discharge side sees the battery efficiency.
        let drain_w = if discharge_w > 0.0 {
            discharge_w / self.hardware.battery_efficiency(discharge_w).map_err(tag)?
        } else {
            0.0
        };

        let projected_energy_wh = energy_wh + (charge_w - drain_w) * step_hours;

        let (next_energy_wh, energy_gap_wh) = match self.limits {
            Some(l) if projected_energy_wh > l.max_wh() => (l.max_wh(), 0.0),
            Some(l) if projected_energy_wh < l.min_wh() => {
                (l.min_wh(), l.min_wh() - projected_energy_wh)
            }
            _ => (projected_energy_wh, 0.0),
        };

        trace!(step, charge_w, discharge_w, next_energy_wh, energy_gap_wh);

        let record = StepRecord {
            step,
            timestamp: sample.timestamp,
            load_customer_w: sample.power_w,
            load_inverter_w,
            solar_w,
            battery_energy_wh: energy_wh,
            projected_energy_wh,
            energy_gap_wh,
        };
        Ok((record, next_energy_wh))
    }

    /// Runs every sample of `load` in chronological order.
    ///
    /// # Errors
    ///
    /// Returns the first step failure.
    pub fn run(&self, load: &LoadProfile) -> Result<SimulationResult, SimError> {
        let mut rows = Vec::with_capacity(load.len());
        let mut energy_wh = self.initial_energy_wh();
        for (step, sample) in load.samples().iter().enumerate() {
            let (record, next) = self.step(step, sample, energy_wh, load.step_hours())?;
            rows.push(record);
            energy_wh = next;
        }
        Ok(SimulationResult {
            rows,
            final_energy_wh: energy_wh,
        })
    }
}

/// Runs the unconstrained simulation, starting from an empty battery.
///
/// # Errors
///
/// Propagates hardware failures tagged with their step index.
pub fn simulate<H: HardwareModel + ?Sized>(
    hardware: &H,
    load: &LoadProfile,
) -> Result<SimulationResult, SimError> {
    Engine::unconstrained(hardware).run(load)
}

/// Runs the capacity-constrained simulation and computes the LEGP.
///
/// The battery starts at `limits.max_wh()`.
///
/// # Errors
///
/// Returns [`SimError::UndefinedRatio`] when the total customer load is zero,
/// and propagates hardware failures tagged with their step index.
pub fn simulate_with_limits<H: HardwareModel + ?Sized>(
    hardware: &H,
    load: &LoadProfile,
    limits: EnergyLimits,
) -> Result<LegpOutcome, SimError> {
    let total_load_wh = load.total_energy_wh();
    if total_load_wh == 0.0 {
        return Err(SimError::UndefinedRatio("total customer load"));
    }
    let result = Engine::constrained(hardware, limits).run(load)?;
    Ok(LegpOutcome {
        legp: result.total_gap_wh() / total_load_wh,
        result,
    })
}
