//! # Orbital element sets
//!
//! This module defines [`OrbitalElementSet`], the immutable per-body classical Keplerian
//! elements consumed by the propagator.
//!
//! ## Elements
//!
//! 1. **a** – Semi-major axis (AU), `a > 0`
//! 2. **e** – Eccentricity (unitless), `0 ≤ e < 1`
//! 3. **i** – Inclination (radians)
//! 4. **Ω** – Longitude of ascending node (radians)
//! 5. **ω** – Argument of periapsis (radians)
//! 6. **M₀** – Mean anomaly at epoch (radians)
//!
//! Angles are stored in radians. Element files carry degrees; the conversion happens once
//! at construction through [`OrbitalElementSet::from_degrees`].
//!
//! ## Validation
//!
//! [`OrbitalElementSet::new`] and [`OrbitalElementSet::from_degrees`] reject values outside
//! the elliptic domain with [`DriftError::InvalidElements`].
//! [`OrbitalElementSet::from_degrees_unchecked`] is used by ingestion when missing fields
//! were filled with zero; a subsequent [`OrbitalElementSet::validate`] reports what is
//! wrong as data-quality warnings instead of failing.
//!
//! ## Example
//!
//! ```rust
//! use orbdrift::orbital_elements::OrbitalElementSet;
//!
//! let ceres = OrbitalElementSet::from_degrees(2.7675, 0.0785, 10.588, 80.267, 73.597, 291.4)
//!     .unwrap();
//! assert!(ceres.inclination < 0.2);
//! ```
use std::fmt;

use crate::constants::{AstronomicalUnit, Degree, Radian, GAUSS_GRAV, RADEG};
use crate::diagnostics::DataQualityWarning;
use crate::drift_errors::DriftError;

/// Classical Keplerian elements of one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElementSet {
    pub semi_major_axis: AstronomicalUnit,
    pub eccentricity: f64,
    pub inclination: Radian,
    pub ascending_node_longitude: Radian,
    pub periapsis_argument: Radian,
    pub mean_anomaly: Radian,
}

impl OrbitalElementSet {
    /// Build a validated element set from radians.
    pub fn new(
        semi_major_axis: AstronomicalUnit,
        eccentricity: f64,
        inclination: Radian,
        ascending_node_longitude: Radian,
        periapsis_argument: Radian,
        mean_anomaly: Radian,
    ) -> Result<Self, DriftError> {
        let elements = Self {
            semi_major_axis,
            eccentricity,
            inclination,
            ascending_node_longitude,
            periapsis_argument,
            mean_anomaly,
        };
        match elements.violations().into_iter().next() {
            None => Ok(elements),
            Some(reason) => Err(DriftError::InvalidElements {
                body: "<unnamed>".into(),
                reason,
            }),
        }
    }

    /// Build a validated element set from angles in degrees.
    pub fn from_degrees(
        semi_major_axis: AstronomicalUnit,
        eccentricity: f64,
        inclination: Degree,
        ascending_node_longitude: Degree,
        periapsis_argument: Degree,
        mean_anomaly: Degree,
    ) -> Result<Self, DriftError> {
        Self::new(
            semi_major_axis,
            eccentricity,
            inclination * RADEG,
            ascending_node_longitude * RADEG,
            periapsis_argument * RADEG,
            mean_anomaly * RADEG,
        )
    }

    /// Convert degrees to radians without any domain check.
    pub fn from_degrees_unchecked(
        semi_major_axis: AstronomicalUnit,
        eccentricity: f64,
        inclination: Degree,
        ascending_node_longitude: Degree,
        periapsis_argument: Degree,
        mean_anomaly: Degree,
    ) -> Self {
        Self {
            semi_major_axis,
            eccentricity,
            inclination: inclination * RADEG,
            ascending_node_longitude: ascending_node_longitude * RADEG,
            periapsis_argument: periapsis_argument * RADEG,
            mean_anomaly: mean_anomaly * RADEG,
        }
    }

    fn violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        let all = [
            self.semi_major_axis,
            self.eccentricity,
            self.inclination,
            self.ascending_node_longitude,
            self.periapsis_argument,
            self.mean_anomaly,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            out.push("non-finite element".to_string());
        }
        if self.semi_major_axis <= 0.0 {
            out.push(format!("semi-major axis {} AU is not positive", self.semi_major_axis));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            out.push(format!(
                "eccentricity {} outside the elliptic range [0, 1)",
                self.eccentricity
            ));
        }
        out
    }

    /// Report every domain violation of this set as a
    /// [`DegenerateElements`](DataQualityWarning::DegenerateElements) warning.
    pub fn validate(&self, body: &str) -> Vec<DataQualityWarning> {
        self.violations()
            .into_iter()
            .map(|reason| DataQualityWarning::DegenerateElements {
                body: body.to_string(),
                reason,
            })
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.violations().is_empty()
    }

    /// Mean motion `n = k / a^1.5` (rad/day).
    #[inline]
    pub fn mean_motion(&self) -> f64 {
        GAUSS_GRAV / self.semi_major_axis.powf(1.5)
    }

    /// Semi-minor axis factor `sqrt(max(0, 1 − e²))`.
    #[inline]
    pub fn minor_axis_ratio(&self) -> f64 {
        (1.0 - self.eccentricity * self.eccentricity).max(0.0).sqrt()
    }
}

impl fmt::Display for OrbitalElementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rad_to_deg = 1.0 / RADEG;
        writeln!(f, "Orbital Elements")?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  a   (semi-major axis)       = {:.6} AU",
            self.semi_major_axis
        )?;
        writeln!(
            f,
            "  e   (eccentricity)          = {:.6}",
            self.eccentricity
        )?;
        writeln!(
            f,
            "  i   (inclination)           = {:.6} rad ({:.6}°)",
            self.inclination,
            self.inclination * rad_to_deg
        )?;
        writeln!(
            f,
            "  Ω   (longitude of node)     = {:.6} rad ({:.6}°)",
            self.ascending_node_longitude,
            self.ascending_node_longitude * rad_to_deg
        )?;
        writeln!(
            f,
            "  ω   (argument of periapsis) = {:.6} rad ({:.6}°)",
            self.periapsis_argument,
            self.periapsis_argument * rad_to_deg
        )?;
        writeln!(
            f,
            "  M   (mean anomaly)          = {:.6} rad ({:.6}°)",
            self.mean_anomaly,
            self.mean_anomaly * rad_to_deg
        )
    }
}
