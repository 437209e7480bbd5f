//! Secant root finding and the panel-area sizing built on it.

use tracing::{debug, instrument};

use crate::devices::{HardwareError, HardwareModel};

use super::engine::simulate;
use super::error::SimError;
use super::types::LoadProfile;

/// Explicit convergence policy for [`find_root`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    /// Largest acceptable `|f(x)|`.
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Relative offset of the second starting point from the initial guess.
    pub initial_step: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 100,
            initial_step: 1e-4,
        }
    }
}

/// A converged root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    pub x: f64,
    /// `f(x)` at the returned root.
    pub residual: f64,
    /// Number of function evaluations spent.
    pub iterations: usize,
    /// Tolerance the residual was checked against.
    pub tolerance: f64,
}

/// Finds `x` with `|f(x)| <= tolerance` by the secant method, starting at `x0`.
///
/// The second starting point is `x0 * (1 + initial_step) + initial_step`, so a
/// zero guess still moves.
///
/// # Errors
///
/// Returns [`SimError::NotConverged`] when the iteration budget runs out,
/// [`SimError::Stalled`] on a flat secant, [`SimError::NonFinite`] on a
/// non-finite iterate or residual, and propagates any error returned by `f`.
pub fn find_root<F>(mut f: F, x0: f64, options: &SolverOptions) -> Result<Root, SimError>
where
    F: FnMut(f64) -> Result<f64, SimError>,
{
    let mut eval = |x: f64| -> Result<f64, SimError> {
        let fx = f(x)?;
        if fx.is_finite() { Ok(fx) } else { Err(SimError::NonFinite { x }) }
    };
    let converged = |x: f64, fx: f64, iterations: usize| Root {
        x,
        residual: fx,
        iterations,
        tolerance: options.tolerance,
    };

    let (mut x_prev, mut f_prev) = (x0, eval(x0)?);
    let mut iterations = 1;
    if f_prev.abs() <= options.tolerance {
        return Ok(converged(x_prev, f_prev, iterations));
    }

    let mut x = x0 * (1.0 + options.initial_step) + options.initial_step;
    while iterations < options.max_iterations {
        let fx = eval(x)?;
        iterations += 1;
        debug!(iterations, x, fx, "secant iteration");

        if fx.abs() <= options.tolerance {
            return Ok(converged(x, fx, iterations));
        }
        if fx == f_prev {
            return Err(SimError::Stalled {
                iteration: iterations,
                x,
            });
        }

        let next = x - fx * (x - x_prev) / (fx - f_prev);
        if !next.is_finite() {
            return Err(SimError::NonFinite { x });
        }
        (x_prev, f_prev) = (x, fx);
        x = next;
    }

    Err(SimError::NotConverged {
        iterations,
        last: x_prev,
        residual: f_prev,
        tolerance: options.tolerance,
    })
}

/// Finds the panel area whose unconstrained day ends with the battery back at
/// its starting energy (0 Wh).
///
/// `factory` builds fresh hardware for every candidate area; nothing is shared
/// between evaluations.
///
/// # Errors
///
/// Propagates solver failures, simulation failures, and factory failures
/// (as [`SimError::Build`]).
#[instrument(skip_all, fields(initial_guess = initial_guess, steps = load.len()))]
pub fn solve_generation_area<H, F>(
    factory: F,
    load: &LoadProfile,
    initial_guess: f64,
    options: &SolverOptions,
) -> Result<Root, SimError>
where
    H: HardwareModel,
    F: Fn(f64) -> Result<H, HardwareError>,
{
    let balance = |area_m2: f64| -> Result<f64, SimError> {
        let hardware = factory(area_m2).map_err(|source| SimError::Build { area_m2, source })?;
        Ok(simulate(&hardware, load)?.final_energy_wh)
    };
    let root = find_root(balance, initial_guess, options)?;
    debug!(area_m2 = root.x, residual = root.residual, iterations = root.iterations, "sized");
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::IdealHardware;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    #[test]
    fn finds_linear_root_immediately() {
        let root = find_root(|x| Ok(2.0 * x - 6.0), 1.0, &SolverOptions::default()).unwrap();
        assert_abs_diff_eq!(root.x, 3.0, epsilon = 1e-9);
        assert!(root.residual.abs() <= root.tolerance);
        assert!(root.iterations <= 3);
    }

    #[test]
    fn finds_square_root() {
        let root = find_root(|x| Ok(x * x - 2.0), 1.0, &SolverOptions::default()).unwrap();
        assert_abs_diff_eq!(root.x, 2.0_f64.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn exact_initial_guess_returns_after_one_evaluation() {
        let root = find_root(|x| Ok(x - 4.0), 4.0, &SolverOptions::default()).unwrap();
        assert_eq!(root.x, 4.0);
        assert_eq!(root.iterations, 1);
    }

    #[test]
    fn rootless_function_does_not_converge() {
        let options = SolverOptions {
            max_iterations: 20,
            ..SolverOptions::default()
        };
        let err = find_root(|x| Ok(x * x + 1.0), 3.0, &options).unwrap_err();
        assert!(matches!(
            err,
            SimError::NotConverged { .. } | SimError::Stalled { .. } | SimError::NonFinite { .. }
        ));
    }

    #[test]
    fn iteration_budget_is_respected() {
        let options = SolverOptions {
            max_iterations: 3,
            tolerance: 1e-15,
            ..SolverOptions::default()
        };
        let err = find_root(|x| Ok(x.powi(3) - 10.0), 100.0, &options).unwrap_err();
        assert!(matches!(err, SimError::NotConverged { iterations: 3, .. }));
    }

    #[test]
    fn constant_function_stalls() {
        let err = find_root(|_| Ok(5.0), 1.0, &SolverOptions::default()).unwrap_err();
        assert!(matches!(err, SimError::Stalled { .. }));
    }

    #[test]
    fn objective_errors_propagate() {
        let err = find_root(|_| Err(SimError::EmptyProfile), 1.0, &SolverOptions::default())
            .unwrap_err();
        assert_eq!(err, SimError::EmptyProfile);
    }

    #[test]
    fn nan_objective_is_reported() {
        let err = find_root(|_| Ok(f64::NAN), 1.0, &SolverOptions::default()).unwrap_err();
        assert!(matches!(err, SimError::NonFinite { .. }));
    }

    #[test]
    fn sizes_constant_generation_against_constant_load() {
        // 10 W/m² all day against 50 W of load with a lossless battery: 5 m².
        let start = NaiveDate::from_ymd_opt(2012, 3, 23)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let load = LoadProfile::new(start, 1.0, vec![50.0; 24]).unwrap();
        let root = solve_generation_area(
            |area| IdealHardware::constant(area, 10.0, 1.0),
            &load,
            1.0,
            &SolverOptions::default(),
        )
        .unwrap();
        assert_abs_diff_eq!(root.x, 5.0, epsilon = 1e-6);
    }
}
