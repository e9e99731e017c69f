//! # Drift run parameters
//!
//! This module defines the [`DriftParams`] configuration struct and its builder, which
//! control the **propagation grid** (start date, step, horizon), the **Kepler solver
//! budget**, the **anomaly classification thresholds**, and the **missing-field policy**
//! applied when ingesting orbital elements. It also defines [`PipelinePaths`], the
//! directory layout used by the file-driven batch.
//!
//! ## Defaults
//!
//! | Parameter              | Default        |
//! |------------------------|----------------|
//! | `step_days`            | 5 d            |
//! | `horizon_days`         | 365 d          |
//! | `start_epoch`          | 2025-01-01 UTC |
//! | `kepler_max_iterations`| 20             |
//! | `kepler_tolerance`     | 1e-7 rad       |
//! | `anomaly_threshold`    | 3.0            |
//! | `stability_threshold`  | 4.0            |
//! | `persistence_count`    | 3              |
//! | `std_floor`            | 1e-12          |
//! | `missing_field_policy` | DefaultToZero  |
//!
//! ## Example
//!
//! ```rust
//! use orbdrift::drift_params::DriftParams;
//!
//! let params = DriftParams::builder()
//!     .step_days(5.0)
//!     .horizon_days(30.0)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.step_count(), 7);
//! ```
use std::cmp::Ordering::{Equal, Greater, Less};
use std::fmt;

use camino::Utf8PathBuf;
use hifitime::Epoch;

use crate::constants::{
    ANOMALY_Z_THRESHOLD, DEFAULT_HORIZON_DAYS, DEFAULT_START_DATE, DEFAULT_STEP_DAYS,
    KEPLER_MAX_ITER, KEPLER_STEP_TOL, PERSISTENCE_MIN_COUNT, STABILITY_Z_THRESHOLD, STD_FLOOR,
};
use crate::drift_errors::DriftError;

/// What to do when an orbital-element field is absent from an element file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingFieldPolicy {
    /// Substitute zero and record a
    /// [`MissingElementField`](crate::diagnostics::DataQualityWarning::MissingElementField) warning.
    #[default]
    DefaultToZero,
    /// Reject the file with [`DriftError::MissingElementField`].
    FailFast,
}

impl fmt::Display for MissingFieldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingFieldPolicy::DefaultToZero => write!(f, "default-to-zero"),
            MissingFieldPolicy::FailFast => write!(f, "fail-fast"),
        }
    }
}

/// Parameters of a propagation + anomaly-detection run.
///
/// Fields
/// -----------------
/// * `step_days` – Fixed propagation step Δt (days), also the finite-difference step.
/// * `horizon_days` – Last elapsed time propagated (days); samples are `k·Δt ≤ horizon`.
/// * `start_epoch` – Calendar origin of the computed series (`t = 0`).
/// * `kepler_max_iterations` – Newton–Raphson iteration budget.
/// * `kepler_tolerance` – Early-exit step magnitude (radians).
/// * `anomaly_threshold` – Combined z-score at or above which a row is anomalous.
/// * `stability_threshold` – Max z-score separating "Marginally Stable" from "Unstable".
/// * `persistence_count` – Anomaly count from which the behavior is "Persistent".
/// * `std_floor` – Substitute for a zero standard deviation.
/// * `missing_field_policy` – See [`MissingFieldPolicy`].
///
/// See also
/// -----------------
/// * [`DriftParamsBuilder::build`] – validation rules.
#[derive(Debug, Clone)]
pub struct DriftParams {
    // --- Propagation grid ---
    pub step_days: f64,
    pub horizon_days: f64,
    pub start_epoch: Epoch,

    // --- Kepler solver ---
    pub kepler_max_iterations: usize,
    pub kepler_tolerance: f64,

    // --- Classification ---
    pub anomaly_threshold: f64,
    pub stability_threshold: f64,
    pub persistence_count: usize,
    pub std_floor: f64,

    // --- Ingestion ---
    pub missing_field_policy: MissingFieldPolicy,
}

impl DriftParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> DriftParamsBuilder {
        DriftParamsBuilder::new()
    }

    /// Number of samples per body: `⌊horizon/Δt⌋ + 1`.
    pub fn step_count(&self) -> usize {
        // Small slack so that e.g. 365/5 does not lose the last step to round-off.
        (self.horizon_days / self.step_days + 1e-9).floor() as usize + 1
    }

    /// Elapsed time (days) of the `k`-th sample.
    #[inline]
    pub fn elapsed_at(&self, k: usize) -> f64 {
        k as f64 * self.step_days
    }
}

impl Default for DriftParams {
    fn default() -> Self {
        let (year, month, day) = DEFAULT_START_DATE;
        DriftParams {
            step_days: DEFAULT_STEP_DAYS,
            horizon_days: DEFAULT_HORIZON_DAYS,
            start_epoch: Epoch::from_gregorian_utc_at_midnight(year, month, day),

            kepler_max_iterations: KEPLER_MAX_ITER,
            kepler_tolerance: KEPLER_STEP_TOL,

            anomaly_threshold: ANOMALY_Z_THRESHOLD,
            stability_threshold: STABILITY_Z_THRESHOLD,
            persistence_count: PERSISTENCE_MIN_COUNT,
            std_floor: STD_FLOOR,

            missing_field_policy: MissingFieldPolicy::DefaultToZero,
        }
    }
}

/// Builder for [`DriftParams`], with validation.
#[derive(Debug, Clone)]
pub struct DriftParamsBuilder {
    params: DriftParams,
}

impl Default for DriftParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DriftParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: DriftParams::default(),
        }
    }

    // --- Propagation grid ---
    pub fn step_days(mut self, v: f64) -> Self {
        self.params.step_days = v;
        self
    }
    pub fn horizon_days(mut self, v: f64) -> Self {
        self.params.horizon_days = v;
        self
    }
    pub fn start_epoch(mut self, v: Epoch) -> Self {
        self.params.start_epoch = v;
        self
    }

    // --- Kepler solver ---
    pub fn kepler_max_iterations(mut self, v: usize) -> Self {
        self.params.kepler_max_iterations = v;
        self
    }
    pub fn kepler_tolerance(mut self, v: f64) -> Self {
        self.params.kepler_tolerance = v;
        self
    }

    // --- Classification ---
    pub fn anomaly_threshold(mut self, v: f64) -> Self {
        self.params.anomaly_threshold = v;
        self
    }
    pub fn stability_threshold(mut self, v: f64) -> Self {
        self.params.stability_threshold = v;
        self
    }
    pub fn persistence_count(mut self, v: usize) -> Self {
        self.params.persistence_count = v;
        self
    }
    pub fn std_floor(mut self, v: f64) -> Self {
        self.params.std_floor = v;
        self
    }

    // --- Ingestion ---
    pub fn missing_field_policy(mut self, v: MissingFieldPolicy) -> Self {
        self.params.missing_field_policy = v;
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Return true iff x >= 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn ge0(x: f64) -> bool {
        matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
    }

    /// Return true iff a <= b and comparable (i.e., not NaN).
    #[inline]
    fn le(a: f64, b: f64) -> bool {
        matches!(a.partial_cmp(&b), Some(Less) | Some(Equal))
    }

    /// Finalize the builder and produce a [`DriftParams`] instance.
    ///
    /// Validation rules
    /// -----------------
    /// * `step_days > 0`, finite.
    /// * `horizon_days >= 0`, finite.
    /// * `kepler_max_iterations >= 1`, `kepler_tolerance > 0`.
    /// * `anomaly_threshold > 0` and `anomaly_threshold <= stability_threshold`.
    /// * `persistence_count >= 1`.
    /// * `std_floor > 0`.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(DriftParams)` if every rule holds.
    /// * `Err(DriftError::InvalidDriftParameter)` naming the first violated rule.
    pub fn build(self) -> Result<DriftParams, DriftError> {
        let p = &self.params;

        if !Self::gt0(p.step_days) || !p.step_days.is_finite() {
            return Err(DriftError::InvalidDriftParameter(
                "step_days must be > 0".into(),
            ));
        }
        if !Self::ge0(p.horizon_days) || !p.horizon_days.is_finite() {
            return Err(DriftError::InvalidDriftParameter(
                "horizon_days must be >= 0".into(),
            ));
        }
        if p.kepler_max_iterations == 0 {
            return Err(DriftError::InvalidDriftParameter(
                "kepler_max_iterations must be >= 1".into(),
            ));
        }
        if !Self::gt0(p.kepler_tolerance) {
            return Err(DriftError::InvalidDriftParameter(
                "kepler_tolerance must be > 0".into(),
            ));
        }
        if !Self::gt0(p.anomaly_threshold) {
            return Err(DriftError::InvalidDriftParameter(
                "anomaly_threshold must be > 0".into(),
            ));
        }
        if !Self::le(p.anomaly_threshold, p.stability_threshold) {
            return Err(DriftError::InvalidDriftParameter(
                "require anomaly_threshold <= stability_threshold".into(),
            ));
        }
        if p.persistence_count == 0 {
            return Err(DriftError::InvalidDriftParameter(
                "persistence_count must be >= 1".into(),
            ));
        }
        if !Self::gt0(p.std_floor) {
            return Err(DriftError::InvalidDriftParameter(
                "std_floor must be > 0".into(),
            ));
        }

        Ok(self.params)
    }
}

impl fmt::Display for DriftParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            const PARAM_COL: usize = 44;
            writeln!(f, "Drift Run Parameters")?;
            writeln!(f, "--------------------")?;

            macro_rules! line {
                ($fmt:expr, $val:expr, $comment:expr) => {{
                    let s = format!($fmt, $val);
                    let pad = if s.len() < PARAM_COL {
                        " ".repeat(PARAM_COL - s.len())
                    } else {
                        " ".to_string()
                    };
                    writeln!(f, "  {}{}# {}", s, pad, $comment)
                }};
            }

            writeln!(f, "[Propagation grid]")?;
            line!("start_epoch           = {}", self.start_epoch, "t = 0")?;
            line!("step_days             = {:.3} d", self.step_days, "Step and finite-difference Δt")?;
            line!("horizon_days          = {:.3} d", self.horizon_days, "Last elapsed time")?;

            writeln!(f, "\n[Kepler solver]")?;
            line!(
                "kepler_max_iterations = {}",
                self.kepler_max_iterations,
                "Newton–Raphson budget"
            )?;
            line!(
                "kepler_tolerance      = {:.1e}",
                self.kepler_tolerance,
                "Early-exit step (rad)"
            )?;

            writeln!(f, "\n[Classification]")?;
            line!(
                "anomaly_threshold     = {:.2}",
                self.anomaly_threshold,
                "Combined z-score cutoff"
            )?;
            line!(
                "stability_threshold   = {:.2}",
                self.stability_threshold,
                "Marginal vs. unstable"
            )?;
            line!(
                "persistence_count     = {}",
                self.persistence_count,
                "Persistent from this count"
            )?;
            line!("std_floor             = {:.1e}", self.std_floor, "Zero-σ substitute")?;

            writeln!(f, "\n[Ingestion]")?;
            line!(
                "missing_field_policy  = {}",
                self.missing_field_policy,
                "Absent element fields"
            )?;
            Ok(())
        } else {
            write!(
                f,
                "DriftParams(step={:.2}d, horizon={:.1}d, kepler_it={}, kepler_tol={:.1e}, z≥{:.2}, stable<{:.2}, persistent≥{}, floor={:.1e}, missing={})",
                self.step_days,
                self.horizon_days,
                self.kepler_max_iterations,
                self.kepler_tolerance,
                self.anomaly_threshold,
                self.stability_threshold,
                self.persistence_count,
                self.std_floor,
                self.missing_field_policy,
            )
        }
    }
}

/// Directory layout of the file-driven batch.
///
/// * `elements_dir` – SBDB-style JSON element files, one per body.
/// * `computed_dir` – Propagated series written/read as `<name>.csv`.
/// * `reference_dir` – Reference ephemerides `<name>_Real.csv`.
/// * `output_dir` – Annotated series, summary and statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePaths {
    pub elements_dir: Utf8PathBuf,
    pub computed_dir: Utf8PathBuf,
    pub reference_dir: Utf8PathBuf,
    pub output_dir: Utf8PathBuf,
}

impl Default for PipelinePaths {
    fn default() -> Self {
        Self {
            elements_dir: Utf8PathBuf::from("data"),
            computed_dir: Utf8PathBuf::from("results/manual"),
            reference_dir: Utf8PathBuf::from("results/real"),
            output_dir: Utf8PathBuf::from("results/zscore"),
        }
    }
}

impl PipelinePaths {
    /// All four directories rooted under `root`, keeping the default relative layout.
    pub fn rooted_at(root: impl Into<Utf8PathBuf>) -> Self {
        let root = root.into();
        let d = Self::default();
        Self {
            elements_dir: root.join(d.elements_dir),
            computed_dir: root.join(d.computed_dir),
            reference_dir: root.join(d.reference_dir),
            output_dir: root.join(d.output_dir),
        }
    }
}
