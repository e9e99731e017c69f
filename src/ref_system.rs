//! # Orbital-plane to inertial frame rotation
//!
//! Elementary rotations and the perifocal → inertial direction-cosine matrix used by the
//! propagator.
//!
//! ## Convention
//!
//! Rotations are **active**: [`rotmt`] rotates a vector by `+α` about a fixed axis, and
//! the orbital-plane position `(x, y, 0)` maps to the inertial frame as
//!
//! ```text
//! r = Rz(Ω) · Rx(i) · Rz(ω) · (x, y, 0)ᵀ
//! ```
//!
//! Only the first two columns of that product matter for an in-plane vector. They are
//! the perifocal unit vectors `P` (towards periapsis) and `Q` (90° ahead in the orbit),
//! returned together by [`perifocal_dcm`].
use nalgebra::{Matrix3, Matrix3x2, Rotation3, Vector2, Vector3};

use crate::constants::Radian;

/// Coordinate axis of an elementary rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Elementary rotation matrix of angle `alpha` about `axis`.
///
/// The returned matrix is orthonormal and satisfies `R.transpose() == R.inverse()`.
///
/// See also
/// ------------
/// * [`perifocal_to_inertial`] – Composes three of these rotations.
pub fn rotmt(alpha: Radian, axis: Axis) -> Matrix3<f64> {
    let axis = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };

    Rotation3::from_axis_angle(&axis, alpha).into_inner()
}

/// Full rotation `Rz(Ω)·Rx(i)·Rz(ω)` from the perifocal frame to the inertial frame.
///
/// Arguments
/// -----------------
/// * `node`: Longitude of the ascending node Ω (radians).
/// * `inclination`: Inclination i (radians).
/// * `periapsis`: Argument of periapsis ω (radians).
pub fn perifocal_to_inertial(node: Radian, inclination: Radian, periapsis: Radian) -> Matrix3<f64> {
    rotmt(node, Axis::Z) * rotmt(inclination, Axis::X) * rotmt(periapsis, Axis::Z)
}

/// Closed-form 3×2 direction-cosine matrix `[P Q]` of the perifocal frame.
///
/// Equal to the first two columns of [`perifocal_to_inertial`], without building the
/// intermediate matrices. This is the form evaluated once per body per time step.
pub fn perifocal_dcm(node: Radian, inclination: Radian, periapsis: Radian) -> Matrix3x2<f64> {
    let (so, co) = node.sin_cos();
    let (si, ci) = inclination.sin_cos();
    let (sw, cw) = periapsis.sin_cos();

    Matrix3x2::new(
        co * cw - so * sw * ci,
        -co * sw - so * cw * ci,
        so * cw + co * sw * ci,
        -so * sw + co * cw * ci,
        sw * si,
        cw * si,
    )
}

/// Map an orbital-plane position `(x, y)` to the inertial frame.
#[inline]
pub fn to_inertial(dcm: &Matrix3x2<f64>, x_orb: f64, y_orb: f64) -> Vector3<f64> {
    dcm * Vector2::new(x_orb, y_orb)
}

#[cfg(test)]
mod ref_system_test {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_rotmt_z_quarter_turn() {
        let r = rotmt(FRAC_PI_2, Axis::Z);
        let v = r * Vector3::x();
        assert_relative_eq!(v, Vector3::y(), epsilon = 1e-15);
    }

    #[test]
    fn test_rotmt_orthonormal() {
        let r = rotmt(0.7, Axis::Y);
        assert_relative_eq!(r * r.transpose(), Matrix3::identity(), epsilon = 1e-15);
    }

    #[test]
    fn test_dcm_matches_composed_rotation() {
        let (node, inc, peri) = (1.3, 0.4, 2.2);
        let full = perifocal_to_inertial(node, inc, peri);
        let dcm = perifocal_dcm(node, inc, peri);
        assert_relative_eq!(full.column(0).into_owned(), dcm.column(0).into_owned(), epsilon = 1e-14);
        assert_relative_eq!(full.column(1).into_owned(), dcm.column(1).into_owned(), epsilon = 1e-14);
    }

    #[test]
    fn test_zero_angles_is_identity_plane() {
        let dcm = perifocal_dcm(0.0, 0.0, 0.0);
        let r = to_inertial(&dcm, 1.5, -0.5);
        assert_relative_eq!(r, Vector3::new(1.5, -0.5, 0.0), epsilon = 1e-15);
    }

    #[test]
    fn test_polar_orbit_lifts_q_to_z() {
        let dcm = perifocal_dcm(0.0, FRAC_PI_2, 0.0);
        let r = to_inertial(&dcm, 0.0, 1.0);
        assert_relative_eq!(r, Vector3::z(), epsilon = 1e-15);
    }
}
