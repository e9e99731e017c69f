//! # Data-quality diagnostics
//!
//! Every degraded input handled by the batch is recovered locally with a defined
//! fallback (zero-filled element, floored standard deviation, last Kepler iterate,
//! dropped row, excluded body). None of them aborts the run, but each one is recorded
//! as a [`DataQualityWarning`] so a caller can audit the result.
//!
//! Operations that may degrade return an [`Audited`] value: the result itself plus the
//! warnings raised while computing it.
//!
//! ```rust
//! use orbdrift::diagnostics::{Audited, DataQualityWarning};
//!
//! let mut out = Audited::new(42.0);
//! out.push(DataQualityWarning::UnalignedSeries { body: "433_Eros".into() });
//! assert!(out.has_warnings());
//! ```
use std::fmt;

use tracing::warn;

use crate::constants::Days;

/// Axis of a deviation statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviationAxis {
    /// Radial-distance deviation `Δr`
    Radial,
    /// Speed deviation `Δv`
    Speed,
}

impl fmt::Display for DeviationAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviationAxis::Radial => write!(f, "delta_r"),
            DeviationAxis::Speed => write!(f, "delta_v"),
        }
    }
}

/// A recovered, non-fatal data-quality condition.
#[derive(Debug, Clone, PartialEq)]
pub enum DataQualityWarning {
    /// An orbital-element field was absent and replaced by zero.
    MissingElementField { body: String, field: &'static str },
    /// Elements outside the supported domain (`a ≤ 0`, `e ∉ [0,1)`, non-finite values).
    DegenerateElements { body: String, reason: String },
    /// No date shared between the computed and reference series; body excluded.
    UnalignedSeries { body: String },
    /// No reference series could be found for a computed body.
    MissingReference { body: String },
    /// Zero or undefined standard deviation replaced by the floor.
    DegenerateStatistics { scope: String, axis: DeviationAxis },
    /// The Kepler solver exhausted its iteration budget; the last iterate was used.
    SolverNonConvergence { body: String, elapsed_days: Days },
    /// A date label matched none of the supported formats; the row was dropped.
    UnparseableDate { source: String, raw: String },
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DataQualityWarning::*;
        match self {
            MissingElementField { body, field } => {
                write!(f, "{body}: element '{field}' missing, defaulted to 0")
            }
            DegenerateElements { body, reason } => write!(f, "{body}: degenerate elements ({reason})"),
            UnalignedSeries { body } => write!(f, "{body}: no overlapping dates, excluded"),
            MissingReference { body } => write!(f, "{body}: no reference series found"),
            DegenerateStatistics { scope, axis } => {
                write!(f, "{scope}: zero standard deviation on {axis}, floor substituted")
            }
            SolverNonConvergence { body, elapsed_days } => write!(
                f,
                "{body}: Kepler solver did not converge at t = {elapsed_days} d"
            ),
            UnparseableDate { source, raw } => write!(f, "{source}: unparseable date '{raw}'"),
        }
    }
}

/// A value together with the data-quality warnings raised while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Audited<T> {
    pub value: T,
    pub warnings: Vec<DataQualityWarning>,
}

impl<T> Audited<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(value: T, warnings: Vec<DataQualityWarning>) -> Self {
        Self { value, warnings }
    }

    /// Record a warning and emit it on the `tracing` warn level.
    pub fn push(&mut self, warning: DataQualityWarning) {
        warn!(%warning, "data quality");
        self.warnings.push(warning);
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Transform the value, keeping the warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Audited<U> {
        Audited {
            value: f(self.value),
            warnings: self.warnings,
        }
    }

    /// Unwrap the value, appending its warnings to `sink`.
    pub fn drain_into(self, sink: &mut Vec<DataQualityWarning>) -> T {
        sink.extend(self.warnings);
        self.value
    }

    pub fn into_parts(self) -> (T, Vec<DataQualityWarning>) {
        (self.value, self.warnings)
    }
}

#[cfg(test)]
mod diagnostics_test {
    use super::*;

    #[test]
    fn test_audited_map_keeps_warnings() {
        let mut a = Audited::new(2);
        a.push(DataQualityWarning::MissingReference {
            body: "1_Ceres".into(),
        });
        let b = a.map(|v| v * 10);
        assert_eq!(b.value, 20);
        assert_eq!(b.warnings.len(), 1);
    }

    #[test]
    fn test_drain_into() {
        let a = Audited::with_warnings(
            "x",
            vec![DataQualityWarning::UnalignedSeries {
                body: "2_Pallas".into(),
            }],
        );
        let mut sink = Vec::new();
        assert_eq!(a.drain_into(&mut sink), "x");
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_display() {
        let w = DataQualityWarning::DegenerateStatistics {
            scope: "global".into(),
            axis: DeviationAxis::Speed,
        };
        assert_eq!(
            w.to_string(),
            "global: zero standard deviation on delta_v, floor substituted"
        );
    }
}
