use chrono::{NaiveDateTime, Timelike};
use rand::{SeedableRng, rngs::StdRng};

use crate::devices::types::{HardwareError, daylight_frac, gaussian_noise};

/// Clear-sky irradiance model with optional seeded cloud noise.
///
/// Irradiance follows a half-sine between sunrise and sunset. Cloud noise is
/// drawn from an RNG seeded by `(seed, timestamp)`, so the same timestamp
/// always sees the same cloud cover.
#[derive(Debug, Clone)]
pub struct Irradiance {
    /// Peak irradiance on the panel plane at solar noon (W/m²).
    pub peak_w_m2: f64,
    /// Hour of day at which generation starts (inclusive).
    pub sunrise_hour: f64,
    /// Hour of day at which generation stops (exclusive).
    pub sunset_hour: f64,
    /// Standard deviation of the multiplicative cloud noise.
    pub cloud_noise_std: f64,
    pub seed: u64,
}

impl Irradiance {
    /// Creates an irradiance model.
    ///
    /// # Errors
    ///
    /// Fails when the peak is negative, the daylight window is empty or leaves
    /// `[0, 24]`, or the noise level is negative.
    pub fn new(
        peak_w_m2: f64,
        sunrise_hour: f64,
        sunset_hour: f64,
        cloud_noise_std: f64,
        seed: u64,
    ) -> Result<Self, HardwareError> {
        if !(peak_w_m2.is_finite() && peak_w_m2 >= 0.0) {
            return Err(HardwareError::InvalidPanel(format!(
                "peak irradiance must be >= 0, got {peak_w_m2}"
            )));
        }
        if !(0.0..=24.0).contains(&sunrise_hour)
            || !(0.0..=24.0).contains(&sunset_hour)
            || sunrise_hour >= sunset_hour
        {
            return Err(HardwareError::InvalidPanel(format!(
                "daylight window [{sunrise_hour}, {sunset_hour}) is not within a day"
            )));
        }
        if !(cloud_noise_std.is_finite() && cloud_noise_std >= 0.0) {
            return Err(HardwareError::InvalidPanel(format!(
                "cloud noise must be >= 0, got {cloud_noise_std}"
            )));
        }
        Ok(Self {
            peak_w_m2,
            sunrise_hour,
            sunset_hour,
            cloud_noise_std,
            seed,
        })
    }

    /// Irradiance in W/m² at `timestamp`.
    pub fn at(&self, timestamp: NaiveDateTime) -> f64 {
        let hour = f64::from(timestamp.hour())
            + f64::from(timestamp.minute()) / 60.0
            + f64::from(timestamp.second()) / 3600.0;
        let frac = daylight_frac(hour, self.sunrise_hour, self.sunset_hour);
        if frac <= 0.0 {
            return 0.0;
        }
        (self.peak_w_m2 * frac * self.cloud_factor(timestamp)).max(0.0)
    }

    fn cloud_factor(&self, timestamp: NaiveDateTime) -> f64 {
        if self.cloud_noise_std <= 0.0 {
            return 1.0;
        }
        let key = self.seed ^ timestamp.and_utc().timestamp() as u64;
        let mut rng = StdRng::seed_from_u64(key);
        1.0 + gaussian_noise(&mut rng, self.cloud_noise_std)
    }
}

/// A photovoltaic array of a given area and conversion efficiency.
#[derive(Debug, Clone)]
pub struct Panel {
    /// Panel area in m². The solver may try negative areas; they simply
    /// produce negative generation.
    pub area_m2: f64,
    /// Conversion efficiency, in (0, 1].
    pub efficiency: f64,
    pub irradiance: Irradiance,
}

impl Panel {
    /// # Errors
    ///
    /// Fails when `efficiency` is outside (0, 1] or `area_m2` is not finite.
    pub fn new(area_m2: f64, efficiency: f64, irradiance: Irradiance) -> Result<Self, HardwareError> {
        if !(efficiency > 0.0 && efficiency <= 1.0) {
            return Err(HardwareError::InvalidPanel(format!(
                "efficiency must be in (0, 1], got {efficiency}"
            )));
        }
        if !area_m2.is_finite() {
            return Err(HardwareError::InvalidPanel(format!(
                "area must be finite, got {area_m2}"
            )));
        }
        Ok(Self {
            area_m2,
            efficiency,
            irradiance,
        })
    }

    /// DC output power in watts at `timestamp`.
    pub fn power(&self, timestamp: NaiveDateTime) -> f64 {
        self.area_m2 * self.efficiency * self.irradiance.at(timestamp)
    }

    /// Peak rating in kW, at the standard 1 kW/m² test irradiance.
    pub fn peak_kw(&self) -> f64 {
        self.area_m2 * self.efficiency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at_hour(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2012, 3, 23)
            .and_then(|d| d.and_hms_opt(h, 0, 0))
            .unwrap()
    }

    fn clear_sky() -> Irradiance {
        Irradiance::new(1000.0, 6.0, 18.0, 0.0, 42).unwrap()
    }

    #[test]
    fn no_generation_at_night() {
        let panel = Panel::new(4.0, 0.135, clear_sky()).unwrap();
        assert_eq!(panel.power(at_hour(0)), 0.0);
        assert_eq!(panel.power(at_hour(5)), 0.0);
        assert_eq!(panel.power(at_hour(18)), 0.0);
        assert_eq!(panel.power(at_hour(23)), 0.0);
    }

    #[test]
    fn noon_output_matches_area_and_efficiency() {
        let panel = Panel::new(4.0, 0.135, clear_sky()).unwrap();
        assert!((panel.power(at_hour(12)) - 4.0 * 0.135 * 1000.0).abs() < 1e-9);
        assert!((panel.peak_kw() - 0.54).abs() < 1e-12);
    }

    #[test]
    fn power_is_linear_in_area() {
        let small = Panel::new(1.0, 0.2, clear_sky()).unwrap();
        let large = Panel::new(3.0, 0.2, clear_sky()).unwrap();
        for h in 0..24 {
            assert!((large.power(at_hour(h)) - 3.0 * small.power(at_hour(h))).abs() < 1e-9);
        }
    }

    #[test]
    fn cloud_noise_is_repeatable() {
        let sky = Irradiance::new(1000.0, 6.0, 18.0, 0.2, 7).unwrap();
        for h in 6..18 {
            assert_eq!(sky.at(at_hour(h)), sky.at(at_hour(h)));
            assert!(sky.at(at_hour(h)) >= 0.0);
        }
    }

    #[test]
    fn different_seeds_give_different_clouds() {
        let a = Irradiance::new(1000.0, 6.0, 18.0, 0.2, 1).unwrap();
        let b = Irradiance::new(1000.0, 6.0, 18.0, 0.2, 2).unwrap();
        assert!((7..17).any(|h| (a.at(at_hour(h)) - b.at(at_hour(h))).abs() > 1e-6));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(Irradiance::new(-1.0, 6.0, 18.0, 0.0, 0).is_err());
        assert!(Irradiance::new(1000.0, 18.0, 6.0, 0.0, 0).is_err());
        assert!(Irradiance::new(1000.0, 6.0, 25.0, 0.0, 0).is_err());
        assert!(Panel::new(1.0, 0.0, clear_sky()).is_err());
        assert!(Panel::new(f64::INFINITY, 0.1, clear_sky()).is_err());
    }
}
