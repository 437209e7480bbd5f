//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use offgrid_sim::devices::IdealHardware;
use offgrid_sim::sim::LoadProfile;

/// Midnight at the start of the reference day (2012-03-23).
pub fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2012, 3, 23)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid reference date")
}

/// 25 hourly samples with `watts` during hours `[from, to)` and zero elsewhere.
pub fn block_load(from: usize, to: usize, watts: f64) -> LoadProfile {
    let values = (0..25)
        .map(|h| if (from..to).contains(&h) { watts } else { 0.0 })
        .collect();
    LoadProfile::new(start(), 1.0, values).expect("valid load")
}

/// 300 W between 09:00 and 15:00.
pub fn day_load() -> LoadProfile {
    block_load(9, 15, 300.0)
}

/// 300 W between 18:00 and midnight.
pub fn night_load() -> LoadProfile {
    block_load(18, 24, 300.0)
}

/// Half-sine generation per m² between 06:00 and 18:00, peaking at `peak_w_m2`.
pub fn daylight_profile(peak_w_m2: f64) -> [f64; 24] {
    let mut profile = [0.0; 24];
    for (hour, slot) in profile.iter_mut().enumerate().take(18).skip(6) {
        *slot = peak_w_m2 * (std::f64::consts::PI * (hour as f64 - 6.0) / 12.0).sin();
    }
    profile
}

/// Ideal hardware with daylight generation, 90% inverter and 85% battery.
pub fn daylight_hardware(area_m2: f64) -> IdealHardware {
    IdealHardware::new(area_m2, daylight_profile(100.0), 0.9, 0.85).expect("valid hardware")
}

/// No generation, lossless conversion.
pub fn dark_hardware() -> IdealHardware {
    IdealHardware::constant(0.0, 0.0, 1.0).expect("valid hardware")
}
