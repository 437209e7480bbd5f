//! Installed cost and replacement cashflow of the sized system.

use thiserror::Error;

/// Default analysis horizon in years.
pub const DEFAULT_HORIZON_YEARS: u32 = 20;
/// Default discount rate for the replacement cashflow.
pub const DEFAULT_DISCOUNT_RATE: f64 = 0.07;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CostError {
    #[error("depth of discharge must be > 0, got {0}")]
    InvalidDod(f64),

    #[error("battery life must be at least 1 year, got {0}")]
    InvalidLife(u32),
}

/// Installed battery cost for a usable energy excursion.
///
/// `excursion_wh / dod * cost_per_wh`.
///
/// # Errors
///
/// Returns [`CostError::InvalidDod`] when `dod <= 0`.
pub fn battery_cost(excursion_wh: f64, dod: f64, cost_per_wh: f64) -> Result<f64, CostError> {
    if !(dod > 0.0) {
        return Err(CostError::InvalidDod(dod));
    }
    Ok(excursion_wh / dod * cost_per_wh)
}

/// Battery purchase cashflow: `cost` at year 0 and every `life_years`
/// thereafter, zero otherwise, over `horizon_years + 1` entries.
///
/// # Examples
///
/// ```
/// use offgrid_sim::sim::cost::battery_cashflow;
///
/// let flows = battery_cashflow(100.0, 5, 20).unwrap();
/// assert_eq!(flows.len(), 21);
/// assert_eq!(flows[5], 100.0);
/// assert_eq!(flows[6], 0.0);
/// ```
///
/// # Errors
///
/// Returns [`CostError::InvalidLife`] when `life_years < 1`.
pub fn battery_cashflow(cost: f64, life_years: u32, horizon_years: u32) -> Result<Vec<f64>, CostError> {
    if life_years < 1 {
        return Err(CostError::InvalidLife(life_years));
    }
    Ok((0..=horizon_years)
        .map(|year| if year % life_years == 0 { cost } else { 0.0 })
        .collect())
}

/// Net present value: `Σ cashflow[i] / (1 + rate)^i`.
pub fn npv(rate: f64, cashflows: &[f64]) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(i, flow)| flow / (1.0 + rate).powi(i as i32))
        .sum()
}

/// Installed panel cost: peak kW (`area_m2 * efficiency`) times cost per peak kW.
pub fn panel_cost(area_m2: f64, efficiency: f64, cost_per_peak_kw: f64) -> f64 {
    area_m2 * efficiency * cost_per_peak_kw
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn battery_cost_scales_with_dod() {
        assert_eq!(battery_cost(1000.0, 0.5, 0.2), Ok(400.0));
        assert_eq!(battery_cost(1000.0, 1.0, 0.2), Ok(200.0));
    }

    #[test]
    fn battery_cost_rejects_zero_dod() {
        assert_eq!(battery_cost(1000.0, 0.0, 0.2), Err(CostError::InvalidDod(0.0)));
        assert!(battery_cost(1000.0, -0.5, 0.2).is_err());
        assert!(battery_cost(1000.0, f64::NAN, 0.2).is_err());
    }

    #[test]
    fn cashflow_recurs_every_life() {
        let flows = battery_cashflow(100.0, 5, DEFAULT_HORIZON_YEARS).unwrap();
        assert_eq!(flows.len(), 21);
        for (year, flow) in flows.iter().enumerate() {
            if [0, 5, 10, 15, 20].contains(&year) {
                assert_eq!(*flow, 100.0, "year {year}");
            } else {
                assert_eq!(*flow, 0.0, "year {year}");
            }
        }
    }

    #[test]
    fn cashflow_with_unit_life_pays_every_year() {
        let flows = battery_cashflow(10.0, 1, 3).unwrap();
        assert_eq!(flows, vec![10.0; 4]);
    }

    #[test]
    fn cashflow_with_life_beyond_horizon_pays_once() {
        let flows = battery_cashflow(10.0, 30, 20).unwrap();
        assert_eq!(flows[0], 10.0);
        assert_eq!(flows.iter().sum::<f64>(), 10.0);
    }

    #[test]
    fn cashflow_rejects_zero_life() {
        assert_eq!(battery_cashflow(10.0, 0, 20), Err(CostError::InvalidLife(0)));
    }

    #[test]
    fn npv_discounts_future_flows() {
        assert_eq!(npv(0.07, &[100.0]), 100.0);
        assert_abs_diff_eq!(npv(0.1, &[0.0, 110.0]), 100.0, epsilon = 1e-9);
        assert_eq!(npv(0.0, &[1.0, 2.0, 3.0]), 6.0);
        assert_eq!(npv(0.05, &[]), 0.0);
    }

    #[test]
    fn npv_decreases_with_rate() {
        let mut flows = vec![0.0; 11];
        flows[7] = 250.0;
        let values: Vec<f64> = [0.0, 0.01, 0.05, 0.07, 0.1, 0.2]
            .iter()
            .map(|&r| npv(r, &flows))
            .collect();
        assert!(values.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn panel_cost_uses_peak_rating() {
        assert_abs_diff_eq!(panel_cost(10.0, 0.135, 1000.0), 1350.0, epsilon = 1e-9);
    }
}
