//! # Kepler's equation
//!
//! Newton–Raphson solution of Kepler's equation for elliptic orbits,
//!
//! ```text
//! M = E − e·sin E,    0 ≤ e < 1
//! ```
//!
//! returning the eccentric anomaly `E` for a mean anomaly `M`.
//!
//! ## Overview
//!
//! - [`reduce_mean_anomaly`] folds any real `M` into `(−π, π]`.
//! - [`solve_kepler`] iterates from `E₀ = M` with a bounded budget and an early exit
//!   on the step magnitude. Exhausting the budget is not an error: the last iterate is
//!   returned with [`KeplerSolution::converged`] set to `false`, and the caller decides
//!   whether to report it.
//!
//! Hyperbolic and parabolic orbits (`e ≥ 1`) are outside the supported domain.
use std::f64::consts::PI;

use super::constants::{Radian, DPI, KEPLER_MAX_ITER, KEPLER_STEP_TOL};

/// Return the principal value of an angle in radians, in `[0, 2π)`.
#[inline]
pub fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Fold a mean anomaly into `(−π, π]`.
///
/// The angle is first reduced to `[0, 2π)`, then `2π` is subtracted when it exceeds `π`.
/// Starting Newton–Raphson from this representative keeps `E₀ = M` close to the root
/// on both sides of apoapsis.
#[inline]
pub fn reduce_mean_anomaly(mean_anomaly: Radian) -> Radian {
    let m = principal_angle(mean_anomaly);
    if m > PI {
        m - DPI
    } else {
        m
    }
}

/// Outcome of [`solve_kepler`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    /// Eccentric anomaly `E` (radians), in the branch of the reduced mean anomaly.
    pub eccentric_anomaly: Radian,
    /// Number of Newton–Raphson steps taken.
    pub iterations: usize,
    /// `false` when the iteration budget was exhausted before the step fell below tolerance.
    pub converged: bool,
}

impl KeplerSolution {
    /// Residual `E − e·sin E − M` of the solution for the given inputs.
    pub fn residual(&self, mean_anomaly: Radian, eccentricity: f64) -> f64 {
        let e_anom = self.eccentric_anomaly;
        e_anom - eccentricity * e_anom.sin() - reduce_mean_anomaly(mean_anomaly)
    }
}

/// Solve Kepler's equation with the default budget (20 steps, 1e-7 rad).
///
/// See [`solve_kepler_with`] for the algorithm.
#[inline]
pub fn solve_kepler(mean_anomaly: Radian, eccentricity: f64) -> KeplerSolution {
    solve_kepler_with(mean_anomaly, eccentricity, KEPLER_MAX_ITER, KEPLER_STEP_TOL)
}

/// Solve Kepler's equation `M = E − e·sin E` by Newton–Raphson.
///
/// Arguments
/// -----------------
/// * `mean_anomaly`: Mean anomaly `M` in radians, any real value.
/// * `eccentricity`: Eccentricity `e`, expected in `[0, 1)`.
/// * `max_iterations`: Iteration budget.
/// * `tolerance`: The loop stops as soon as a step satisfies `|ΔE| < tolerance`.
///
/// Return
/// ----------
/// * A [`KeplerSolution`] carrying the eccentric anomaly, the number of steps taken and
///   the convergence flag. For `e = 0` the first step is exactly zero and `E = M`.
///
/// See also
/// ------------
/// * [`reduce_mean_anomaly`] – Initial reduction of `M`.
pub fn solve_kepler_with(
    mean_anomaly: Radian,
    eccentricity: f64,
    max_iterations: usize,
    tolerance: f64,
) -> KeplerSolution {
    let m = reduce_mean_anomaly(mean_anomaly);
    let mut e_anom = m;

    for it in 1..=max_iterations {
        let f = e_anom - eccentricity * e_anom.sin() - m;
        let fp = 1.0 - eccentricity * e_anom.cos();
        let step = f / fp;
        e_anom -= step;

        if step.abs() < tolerance {
            return KeplerSolution {
                eccentric_anomaly: e_anom,
                iterations: it,
                converged: true,
            };
        }
    }

    KeplerSolution {
        eccentric_anomaly: e_anom,
        iterations: max_iterations,
        converged: false,
    }
}

#[cfg(test)]
mod kepler_test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn test_reduce_mean_anomaly() {
        assert_abs_diff_eq!(reduce_mean_anomaly(0.5), 0.5);
        assert_abs_diff_eq!(reduce_mean_anomaly(3.0 * PI / 2.0), -PI / 2.0, epsilon = 1e-15);
        assert_abs_diff_eq!(reduce_mean_anomaly(-0.5), -0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(reduce_mean_anomaly(DPI + 0.25), 0.25, epsilon = 1e-14);
        assert_abs_diff_eq!(reduce_mean_anomaly(PI), PI);
    }

    #[test]
    fn test_circular_orbit() {
        let sol = solve_kepler(1.0, 0.0);
        assert!(sol.converged);
        assert_eq!(sol.iterations, 1);
        assert_eq!(sol.eccentric_anomaly, 1.0);
    }

    #[test]
    fn test_zero_mean_anomaly() {
        let sol = solve_kepler(0.0, 0.7);
        assert!(sol.converged);
        assert_eq!(sol.eccentric_anomaly, 0.0);
    }

    #[test]
    fn test_moderate_eccentricity() {
        let m = 1.2;
        let e = 0.3;
        let sol = solve_kepler(m, e);
        assert!(sol.converged);
        assert!(sol.iterations <= 6);
        assert_abs_diff_eq!(sol.residual(m, e), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_budget_exhaustion_returns_last_iterate() {
        let m = 0.1;
        let e = 0.95;
        let sol = solve_kepler_with(m, e, 1, 1e-15);
        assert!(!sol.converged);
        assert_eq!(sol.iterations, 1);
        // One Newton step from E0 = M.
        let expected = m - (m - e * m.sin() - m) / (1.0 - e * m.cos());
        assert_abs_diff_eq!(sol.eccentric_anomaly, expected, epsilon = 1e-15);
    }

    proptest! {
        #[test]
        fn prop_residual_is_small(m in -50.0f64..50.0, e in 0.0f64..0.9) {
            let sol = solve_kepler(m, e);
            prop_assert!(sol.converged);
            prop_assert!(sol.residual(m, e).abs() < 1e-9);
        }

        #[test]
        fn prop_shift_by_full_turn(m in -10.0f64..10.0, e in 0.0f64..0.8) {
            let a = solve_kepler(m, e).eccentric_anomaly;
            let b = solve_kepler(m + DPI, e).eccentric_anomaly;
            prop_assert!((a.sin() - b.sin()).abs() < 1e-8);
            prop_assert!((a.cos() - b.cos()).abs() < 1e-8);
        }
    }
}
