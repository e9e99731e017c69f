//! # Constants and type definitions for orbdrift
//!
//! This module centralizes the **physical constants**, **conversion factors**, the
//! **fixed thresholds** of the anomaly classifier, and the **common type aliases** used
//! throughout the crate.
//!
//! ## Overview
//!
//! - Astronomical constants (Gaussian gravitational constant, 2π)
//! - Unit conversions (degrees ↔ radians)
//! - Kepler solver budget (iterations, step tolerance)
//! - Anomaly classification thresholds and the statistics floor
//! - Canonical output file names
//!
//! The thresholds are the defaults of [`DriftParams`](crate::drift_params::DriftParams);
//! components never read them directly but receive them through the parameter struct.

use std::sync::Arc;

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Gaussian gravitational constant k (AU^1.5 / day, solar-mass units)
pub const GAUSS_GRAV: f64 = 0.01720209895;

// -------------------------------------------------------------------------------------------------
// Kepler solver budget
// -------------------------------------------------------------------------------------------------

/// Maximum number of Newton–Raphson steps in the Kepler solver
pub const KEPLER_MAX_ITER: usize = 20;

/// Step magnitude (radians) below which the Kepler solver stops early
pub const KEPLER_STEP_TOL: f64 = 1e-7;

// -------------------------------------------------------------------------------------------------
// Run defaults
// -------------------------------------------------------------------------------------------------

/// Default propagation step (days)
pub const DEFAULT_STEP_DAYS: f64 = 5.0;

/// Default propagation horizon (days)
pub const DEFAULT_HORIZON_DAYS: f64 = 365.0;

/// Default start date of the propagated series (UTC calendar date)
pub const DEFAULT_START_DATE: (i32, u8, u8) = (2025, 1, 1);

// -------------------------------------------------------------------------------------------------
// Anomaly classification
// -------------------------------------------------------------------------------------------------

/// Combined z-score at or above which a row is flagged anomalous
pub const ANOMALY_Z_THRESHOLD: f64 = 3.0;

/// Maximum combined z-score below which an anomalous object is still "Marginally Stable"
pub const STABILITY_Z_THRESHOLD: f64 = 4.0;

/// Minimum anomaly count for a "Persistent" temporal behavior
pub const PERSISTENCE_MIN_COUNT: usize = 3;

/// Substitute for a zero (or undefined) standard deviation
pub const STD_FLOOR: f64 = 1e-12;

// -------------------------------------------------------------------------------------------------
// File naming
// -------------------------------------------------------------------------------------------------

/// Suffix of reference ephemeris files: `<name>_Real.csv`
pub const REFERENCE_SUFFIX: &str = "_Real.csv";

/// Suffix of per-object annotated series: `<name>_ZScore.csv`
pub const ANNOTATED_SUFFIX: &str = "_ZScore.csv";

/// Population summary file name
pub const SUMMARY_FILE: &str = "ZScore_Summary.csv";

/// Global and per-object statistics file name
pub const STATISTICS_FILE: &str = "ZScore_Statistics.csv";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;
/// Elapsed time in days since the element epoch
pub type Days = f64;

/// Name of a body, shared cheaply between samples and reports
pub type BodyName = Arc<str>;
