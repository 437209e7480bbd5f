use chrono::NaiveDateTime;

use crate::devices::battery::Battery;
use crate::devices::inverter::Inverter;
use crate::devices::panel::Panel;
use crate::devices::types::{HardwareError, HardwareModel};

/// Curve-based hardware: an inverter, a battery and a panel array.
#[derive(Debug, Clone)]
pub struct SystemModel {
    pub inverter: Inverter,
    pub battery: Battery,
    pub panel: Panel,
}

impl SystemModel {
    pub fn new(inverter: Inverter, battery: Battery, panel: Panel) -> Self {
        Self {
            inverter,
            battery,
            panel,
        }
    }
}

impl HardwareModel for SystemModel {
    fn inverter_input_power(&self, customer_load_w: f64) -> Result<f64, HardwareError> {
        self.inverter.input_power(customer_load_w)
    }

    fn panel_power(&self, timestamp: NaiveDateTime) -> Result<f64, HardwareError> {
        Ok(self.panel.power(timestamp))
    }

    fn battery_efficiency(&self, discharge_w: f64) -> Result<f64, HardwareError> {
        self.battery.efficiency(discharge_w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::battery::BatteryKind;
    use crate::devices::inverter::InverterKind;
    use crate::devices::panel::Irradiance;
    use chrono::NaiveDate;

    #[test]
    fn delegates_to_components() {
        let system = SystemModel::new(
            Inverter::new(InverterKind::Flat).unwrap(),
            Battery::preset(BatteryKind::LithiumIon).unwrap(),
            Panel::new(2.0, 0.2, Irradiance::new(1000.0, 6.0, 18.0, 0.0, 0).unwrap()).unwrap(),
        );
        let noon = NaiveDate::from_ymd_opt(2012, 3, 23)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();

        assert!((system.inverter_input_power(94.0).unwrap() - 100.0).abs() < 1e-9);
        assert!((system.panel_power(noon).unwrap() - 400.0).abs() < 1e-9);
        assert!((system.battery_efficiency(0.0).unwrap() - 0.96).abs() < 1e-12);
    }

    #[test]
    fn non_finite_queries_fail_instead_of_panicking() {
        let system = SystemModel::new(
            Inverter::new(InverterKind::Typical).unwrap(),
            Battery::preset(BatteryKind::LeadAcid).unwrap(),
            Panel::new(4.0, 0.135, Irradiance::new(1000.0, 6.0, 18.0, 0.0, 42).unwrap()).unwrap(),
        );
        assert!(matches!(
            system.inverter_input_power(f64::NAN),
            Err(HardwareError::NonFiniteInput(_))
        ));
        assert!(matches!(
            system.battery_efficiency(f64::NAN),
            Err(HardwareError::NonFiniteInput(_))
        ));
    }
}
