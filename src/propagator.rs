//! # Two-body state propagation
//!
//! Maps orbital elements and an elapsed time to an inertial heliocentric position, for one
//! body ([`StatePropagator::position_at`]), for many bodies at one instant
//! ([`StatePropagator::propagate_batch`]), and over a fixed time grid
//! ([`StatePropagator::propagate_trajectories`]).
//!
//! ## Algorithm
//!
//! For each body and elapsed time `t` (days):
//!
//! 1. Mean motion `n = k / a^1.5` with the Gaussian constant `k`.
//! 2. Mean anomaly `M = (M₀ + n·t) mod 2π`.
//! 3. Eccentric anomaly `E` from [`solve_kepler_with`].
//! 4. Orbital-plane position `x = a(cos E − e)`, `y = a·sqrt(1 − e²)·sin E`.
//! 5. Inertial position through the perifocal DCM `[P Q]` (see [`perifocal_dcm`]).
//!
//! ## Trajectories
//!
//! The time loop is sequential over `t_k = k·Δt`, `k = 0..=⌊horizon/Δt⌋`. Inside a step all
//! bodies are propagated in parallel with `rayon`; each body reads only its own elements
//! and the shared `t`, so the result does not depend on how the work is split. The
//! collected batch is the barrier before the next step.
//!
//! Velocity is the backward difference `(p(t) − p(t − Δt)) / Δt` against the single
//! previous position retained per body. The first sample has no velocity.
//!
//! ### Progress UI (feature: `progress`)
//! With the `progress` feature, [`StatePropagator::propagate_trajectories`] renders an
//! `indicatif` progress bar over time steps.
#[cfg(feature = "progress")]
use std::time::Duration;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};
use nalgebra::Vector3;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::constants::{BodyName, Days, DPI};
use crate::diagnostics::{Audited, DataQualityWarning};
use crate::drift_params::DriftParams;
use crate::kepler::{solve_kepler_with, KeplerSolution};
use crate::orbital_elements::OrbitalElementSet;
use crate::ref_system::{perifocal_dcm, to_inertial};
use crate::time_series::StateSample;

/// Elements of a named body.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedElements {
    pub name: BodyName,
    pub elements: OrbitalElementSet,
}

impl NamedElements {
    pub fn new(name: impl AsRef<str>, elements: OrbitalElementSet) -> Self {
        Self {
            name: BodyName::from(name.as_ref()),
            elements,
        }
    }
}

/// Inertial position of one body together with the Kepler solver outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagatedPosition {
    pub position: Vector3<f64>,
    pub solution: KeplerSolution,
}

/// Samples of one body over the whole time grid, in time order.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub body: BodyName,
    pub samples: Vec<StateSample>,
}

/// Stateless Keplerian propagator configured by a [`DriftParams`].
#[derive(Debug, Clone)]
pub struct StatePropagator {
    step_days: Days,
    horizon_days: Days,
    max_iterations: usize,
    tolerance: f64,
}

impl Default for StatePropagator {
    fn default() -> Self {
        Self::new(&DriftParams::default())
    }
}

impl StatePropagator {
    pub fn new(params: &DriftParams) -> Self {
        Self {
            step_days: params.step_days,
            horizon_days: params.horizon_days,
            max_iterations: params.kepler_max_iterations,
            tolerance: params.kepler_tolerance,
        }
    }

    /// Number of time samples per body.
    pub fn step_count(&self) -> usize {
        (self.horizon_days / self.step_days + 1e-9).floor() as usize + 1
    }

    /// Inertial position of a body `elapsed_days` after its element epoch.
    ///
    /// Arguments
    /// -----------------
    /// * `elements`: Orbital elements, assumed valid (`a > 0`, `0 ≤ e < 1`).
    /// * `elapsed_days`: Elapsed time `t` in days.
    ///
    /// Return
    /// ----------
    /// * The position (AU) and the [`KeplerSolution`]. A non-converged solution still
    ///   yields a position computed from the last iterate.
    pub fn position_at(
        &self,
        elements: &OrbitalElementSet,
        elapsed_days: Days,
    ) -> PropagatedPosition {
        let a = elements.semi_major_axis;
        let e = elements.eccentricity;

        let m = (elements.mean_anomaly + elements.mean_motion() * elapsed_days).rem_euclid(DPI);
        let solution = solve_kepler_with(m, e, self.max_iterations, self.tolerance);

        let (sin_e, cos_e) = solution.eccentric_anomaly.sin_cos();
        let x_orb = a * (cos_e - e);
        let y_orb = a * elements.minor_axis_ratio() * sin_e;

        let dcm = perifocal_dcm(
            elements.ascending_node_longitude,
            elements.inclination,
            elements.periapsis_argument,
        );

        PropagatedPosition {
            position: to_inertial(&dcm, x_orb, y_orb),
            solution,
        }
    }

    /// Propagate every body to the same elapsed time, in parallel.
    ///
    /// The output has the same length and order as `bodies`.
    pub fn propagate_batch(
        &self,
        bodies: &[OrbitalElementSet],
        elapsed_days: Days,
    ) -> Vec<PropagatedPosition> {
        bodies
            .par_iter()
            .map(|el| self.position_at(el, elapsed_days))
            .collect()
    }

    /// Propagate all bodies over the time grid and derive backward-difference velocities.
    ///
    /// Bodies with out-of-domain elements are left out with a
    /// [`DegenerateElements`](DataQualityWarning::DegenerateElements) warning. Every
    /// non-converged Kepler solve is reported as a
    /// [`SolverNonConvergence`](DataQualityWarning::SolverNonConvergence) warning.
    ///
    /// Return
    /// ----------
    /// * One [`Trajectory`] per propagated body, in input order, each holding
    ///   [`step_count`](Self::step_count) samples.
    pub fn propagate_trajectories(&self, bodies: &[NamedElements]) -> Audited<Vec<Trajectory>> {
        let mut out = Audited::new(Vec::new());

        let mut names: Vec<BodyName> = Vec::with_capacity(bodies.len());
        let mut elements: Vec<OrbitalElementSet> = Vec::with_capacity(bodies.len());
        for body in bodies {
            let issues = body.elements.validate(&body.name);
            if issues.is_empty() {
                names.push(body.name.clone());
                elements.push(body.elements);
            } else {
                issues.into_iter().for_each(|w| out.push(w));
            }
        }

        let steps = self.step_count();
        info!(
            bodies = elements.len(),
            steps,
            step_days = self.step_days,
            "propagating trajectories"
        );

        let mut trajectories: Vec<Trajectory> = names
            .iter()
            .map(|name| Trajectory {
                body: name.clone(),
                samples: Vec::with_capacity(steps),
            })
            .collect();
        let mut previous: Vec<Option<Vector3<f64>>> = vec![None; elements.len()];

        #[cfg(feature = "progress")]
        let pb = {
            let pb = ProgressBar::new(steps as u64);
            pb.set_style(
                ProgressStyle::with_template(
                    "{bar:40.cyan/blue} {pos}/{len} steps ({percent:>3}%) | ETA {eta_precise}",
                )
                .expect("indicatif template"),
            );
            pb.enable_steady_tick(Duration::from_millis(200));
            pb
        };

        for k in 0..steps {
            let t = k as f64 * self.step_days;
            let batch = self.propagate_batch(&elements, t);

            for ((traj, prev), res) in trajectories
                .iter_mut()
                .zip(previous.iter_mut())
                .zip(batch)
            {
                if !res.solution.converged {
                    out.push(DataQualityWarning::SolverNonConvergence {
                        body: traj.body.to_string(),
                        elapsed_days: t,
                    });
                }

                let velocity = prev.map(|p| (res.position - p) / self.step_days);
                *prev = Some(res.position);

                traj.samples.push(StateSample {
                    body: traj.body.clone(),
                    elapsed_days: t,
                    position: res.position,
                    velocity,
                });
            }

            #[cfg(feature = "progress")]
            pb.inc(1);
        }

        #[cfg(feature = "progress")]
        pb.finish_and_clear();

        debug!(trajectories = trajectories.len(), "propagation done");
        out.value = trajectories;
        out
    }
}

#[cfg(test)]
mod propagator_test {
    use super::*;
    use crate::constants::GAUSS_GRAV;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn circular_unit() -> OrbitalElementSet {
        OrbitalElementSet::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap()
    }

    #[test]
    fn test_circular_orbit_at_epoch() {
        let prop = StatePropagator::default();
        let p = prop.position_at(&circular_unit(), 0.0);
        assert_relative_eq!(p.position, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-15);
        assert!(p.solution.converged);
    }

    #[test]
    fn test_circular_orbit_quarter_period() {
        let prop = StatePropagator::default();
        let quarter = (std::f64::consts::PI / 2.0) / GAUSS_GRAV;
        let p = prop.position_at(&circular_unit(), quarter);
        assert_relative_eq!(p.position, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_periapsis_distance() {
        let el = OrbitalElementSet::new(2.0, 0.5, 0.3, 1.0, 2.0, 0.0).unwrap();
        let p = StatePropagator::default().position_at(&el, 0.0);
        assert_relative_eq!(p.position.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_radius_matches_conic() {
        let el = OrbitalElementSet::new(2.5, 0.2, 0.1, 0.4, 0.9, 1.7).unwrap();
        let prop = StatePropagator::default();
        for t in [0.0, 17.0, 250.0, 1000.0] {
            let p = prop.position_at(&el, t);
            let e_anom = p.solution.eccentric_anomaly;
            let r = 2.5 * (1.0 - 0.2 * e_anom.cos());
            assert_relative_eq!(p.position.norm(), r, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_trajectory_shape_and_velocity() {
        let params = DriftParams::builder().horizon_days(30.0).build().unwrap();
        let prop = StatePropagator::new(&params);
        let bodies = vec![
            NamedElements::new("a", circular_unit()),
            NamedElements::new(
                "b",
                OrbitalElementSet::new(3.0, 0.1, 0.2, 0.0, 0.0, 0.0).unwrap(),
            ),
        ];

        let out = prop.propagate_trajectories(&bodies);
        assert!(!out.has_warnings());
        assert_eq!(out.value.len(), 2);

        for traj in &out.value {
            assert_eq!(traj.samples.len(), 7);
            assert!(traj.samples[0].velocity.is_none());
            for w in traj.samples.windows(2) {
                let v = w[1].velocity.unwrap();
                assert_relative_eq!(v, (w[1].position - w[0].position) / 5.0, epsilon = 1e-15);
            }
        }
        assert_eq!(out.value[1].samples[6].elapsed_days, 30.0);
    }

    #[test]
    fn test_degenerate_body_is_excluded() {
        let bodies = vec![
            NamedElements::new("good", circular_unit()),
            NamedElements::new(
                "bad",
                OrbitalElementSet::from_degrees_unchecked(0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
            ),
        ];
        let params = DriftParams::builder().horizon_days(10.0).build().unwrap();
        let out = StatePropagator::new(&params).propagate_trajectories(&bodies);
        assert_eq!(out.value.len(), 1);
        assert_eq!(&*out.value[0].body, "good");
        assert!(matches!(
            out.warnings[0],
            DataQualityWarning::DegenerateElements { .. }
        ));
    }

    #[test]
    fn test_non_convergence_is_reported() {
        let params = DriftParams::builder()
            .horizon_days(0.0)
            .kepler_max_iterations(1)
            .kepler_tolerance(1e-300)
            .build()
            .unwrap();
        let el = OrbitalElementSet::new(1.0, 0.9, 0.0, 0.0, 0.0, 0.5).unwrap();
        let out = StatePropagator::new(&params)
            .propagate_trajectories(&[NamedElements::new("x", el)]);
        assert_eq!(out.value[0].samples.len(), 1);
        assert!(out.value[0].samples[0].position.iter().all(|c| c.is_finite()));
        assert!(matches!(
            out.warnings[0],
            DataQualityWarning::SolverNonConvergence { .. }
        ));
    }

    proptest! {
        #[test]
        fn prop_batch_matches_sequential(
            seeds in prop::collection::vec((0.5f64..5.0, 0.0f64..0.9, 0.0f64..3.0, 0.0f64..6.28), 1..40),
            t in 0.0f64..2000.0,
        ) {
            let prop = StatePropagator::default();
            let bodies: Vec<_> = seeds
                .iter()
                .map(|&(a, e, i, m)| OrbitalElementSet::new(a, e, i, 0.3, 1.1, m).unwrap())
                .collect();
            let batch = prop.propagate_batch(&bodies, t);
            prop_assert_eq!(batch.len(), bodies.len());
            for (el, res) in bodies.iter().zip(&batch) {
                prop_assert_eq!(prop.position_at(el, t), *res);
            }
        }
    }
}
