mod common;

use approx::assert_relative_eq;
use nalgebra::Vector3;
use orbdrift::constants::RADEG;
use orbdrift::propagator::StatePropagator;
use orbdrift::ref_system::perifocal_to_inertial;
use orbdrift::{DriftParams, DriftPipeline, OrbitalElementSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::common::{assert_vec3_close, three_bodies};

fn thirty_days() -> DriftParams {
    DriftParams::builder()
        .step_days(5.0)
        .horizon_days(30.0)
        .build()
        .unwrap()
}

#[test]
fn test_three_body_scenario() {
    let out = StatePropagator::new(&thirty_days()).propagate_trajectories(&three_bodies());
    assert!(out.warnings.is_empty());
    assert_eq!(out.value.len(), 3);

    for traj in &out.value {
        assert_eq!(traj.samples.len(), 7, "{}", traj.body);
        for w in traj.samples.windows(2) {
            assert!(w[1].elapsed_days >= w[0].elapsed_days);
        }
        assert!(traj.samples[0].velocity.is_none());
        assert!(traj.samples[1..].iter().all(|s| s.velocity.is_some()));
    }
}

#[test]
fn test_three_body_computed_series_dates() {
    let pipeline = DriftPipeline::new(thirty_days());
    let series = pipeline.propagate(&three_bodies()).value;

    let dates: Vec<_> = series[0].records.keys().map(String::as_str).collect();
    assert_eq!(
        dates,
        [
            "2025-01-01",
            "2025-01-06",
            "2025-01-11",
            "2025-01-16",
            "2025-01-21",
            "2025-01-26",
            "2025-01-31"
        ]
    );
}

#[test]
fn test_circular_orbit_closed_form() {
    let (a, i, node, peri, m0) = (1.7, 20.0, 40.0, 75.0, 110.0);
    let el = OrbitalElementSet::from_degrees(a, 0.0, i, node, peri, m0).unwrap();
    let p = StatePropagator::default().position_at(&el, 0.0);

    // Radius is a, and the position is the in-plane point at angle M0 rotated to inertial.
    assert_relative_eq!(p.position.norm(), a, epsilon = 1e-12);
    let m = m0 * RADEG;
    let in_plane = Vector3::new(a * m.cos(), a * m.sin(), 0.0);
    let expected = perifocal_to_inertial(node * RADEG, i * RADEG, peri * RADEG) * in_plane;
    assert_vec3_close(&p.position, &expected, 1e-12);
}

#[test]
fn test_inclined_orbit_leaves_ecliptic() {
    let out = StatePropagator::new(&thirty_days()).propagate_trajectories(&three_bodies());
    let flat = &out.value[0];
    let inclined = &out.value[2];
    assert!(flat.samples.iter().all(|s| s.position.z.abs() < 1e-15));
    assert!(inclined.samples.iter().any(|s| s.position.z.abs() > 0.1));
}

#[test]
fn test_batch_is_partition_independent() {
    let mut rng = StdRng::seed_from_u64(42);
    let bodies: Vec<OrbitalElementSet> = (0..500)
        .map(|_| {
            OrbitalElementSet::new(
                rng.random_range(0.5..6.0),
                rng.random_range(0.0..0.9),
                rng.random_range(0.0..3.0),
                rng.random_range(0.0..6.28),
                rng.random_range(0.0..6.28),
                rng.random_range(0.0..6.28),
            )
            .unwrap()
        })
        .collect();

    let prop = StatePropagator::default();
    let t = 123.0;
    let whole = prop.propagate_batch(&bodies, t);
    let chunked: Vec<_> = bodies
        .chunks(37)
        .flat_map(|c| prop.propagate_batch(c, t))
        .collect();
    let reversed: Vec<_> = {
        let rev: Vec<_> = bodies.iter().rev().copied().collect();
        let mut out = prop.propagate_batch(&rev, t);
        out.reverse();
        out
    };

    assert_eq!(whole, chunked);
    assert_eq!(whole, reversed);
}

#[test]
fn test_named_elements_keep_order() {
    let mut bodies = three_bodies();
    bodies.reverse();
    let out = StatePropagator::new(&thirty_days()).propagate_trajectories(&bodies);
    let names: Vec<_> = out.value.iter().map(|t| t.body.to_string()).collect();
    assert_eq!(names, ["inclined", "eccentric", "circular"]);
}
