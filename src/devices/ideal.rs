use chrono::{NaiveDateTime, Timelike};

use crate::devices::types::{HardwareError, HardwareModel, check_efficiency};

/// Constant-efficiency hardware with a fixed per-m² generation profile.
///
/// Panel power is `area_m2 * generation_w_per_m2[hour]`, linear in area. Handy
/// for checking the simulator and solver against hand-computed values.
#[derive(Debug, Clone)]
pub struct IdealHardware {
    pub area_m2: f64,
    /// Generation per m² for each hour of the day (24 entries, W/m²).
    pub generation_w_per_m2: [f64; 24],
    /// Inverter efficiency, in (0, 1].
    pub inverter_efficiency: f64,
    /// Battery discharge efficiency, in (0, 1].
    pub battery_efficiency: f64,
}

impl IdealHardware {
    /// # Errors
    ///
    /// Fails when either efficiency is outside (0, 1].
    pub fn new(
        area_m2: f64,
        generation_w_per_m2: [f64; 24],
        inverter_efficiency: f64,
        battery_efficiency: f64,
    ) -> Result<Self, HardwareError> {
        check_efficiency(inverter_efficiency, 0.0)?;
        check_efficiency(battery_efficiency, 0.0)?;
        Ok(Self {
            area_m2,
            generation_w_per_m2,
            inverter_efficiency,
            battery_efficiency,
        })
    }

    /// Same generation at every hour.
    pub fn constant(area_m2: f64, w_per_m2: f64, battery_efficiency: f64) -> Result<Self, HardwareError> {
        Self::new(area_m2, [w_per_m2; 24], 1.0, battery_efficiency)
    }
}

impl HardwareModel for IdealHardware {
    fn inverter_input_power(&self, customer_load_w: f64) -> Result<f64, HardwareError> {
        Ok(customer_load_w / self.inverter_efficiency)
    }

    fn panel_power(&self, timestamp: NaiveDateTime) -> Result<f64, HardwareError> {
        Ok(self.area_m2 * self.generation_w_per_m2[timestamp.hour() as usize])
    }

    fn battery_efficiency(&self, _discharge_w: f64) -> Result<f64, HardwareError> {
        Ok(self.battery_efficiency)
    }
}
