use chrono::{NaiveDateTime, TimeDelta, Timelike};
use serde::Deserialize;

use crate::sim::error::SimError;
use crate::sim::types::LoadProfile;

/// Built-in customer demand shapes.
///
/// Shapes are defined by hour of day, so they can be sampled at any step
/// length. At 25 hourly samples starting at midnight they reproduce the
/// reference profiles exactly.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use offgrid_sim::devices::load::LoadShape;
///
/// let start = NaiveDate::from_ymd_opt(2012, 3, 23).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let load = LoadShape::Day.profile(start, 1.0, 25).unwrap();
/// assert_eq!(load.len(), 25);
/// assert_eq!(load.total_energy_wh(), 1800.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LoadShape {
    /// 300 W from 09:00 to 15:00.
    Day,
    /// 300 W from 18:00 to midnight.
    Night,
    /// 72 W around the clock.
    Continuous,
}

/// Power drawn while a day or night load is on (W).
const BLOCK_LOAD_W: f64 = 300.0;
/// Continuous draw: 1800 Wh spread over 25 hourly samples.
const CONTINUOUS_LOAD_W: f64 = 1800.0 / 25.0;

impl LoadShape {
    pub const ALL: [Self; 3] = [Self::Day, Self::Night, Self::Continuous];

    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Night => "night",
            Self::Continuous => "continuous",
        }
    }

    /// Demand in watts at a given hour of the day.
    pub fn power_at_hour(self, hour: u32) -> f64 {
        match self {
            Self::Day if (9..15).contains(&hour) => BLOCK_LOAD_W,
            Self::Night if (18..24).contains(&hour) => BLOCK_LOAD_W,
            Self::Continuous => CONTINUOUS_LOAD_W,
            _ => 0.0,
        }
    }

    /// Samples this shape into a profile of `steps` samples.
    ///
    /// # Errors
    ///
    /// Propagates [`LoadProfile::new`] failures (zero steps, bad step length).
    pub fn profile(
        self,
        start: NaiveDateTime,
        step_hours: f64,
        steps: usize,
    ) -> Result<LoadProfile, SimError> {
        let step_ms = (step_hours * 3_600_000.0).round() as i64;
        let values = (0..steps)
            .map(|i| {
                let ts = start + TimeDelta::milliseconds(step_ms * i as i64);
                self.power_at_hour(ts.hour())
            })
            .collect();
        LoadProfile::new(start, step_hours, values)
    }
}
