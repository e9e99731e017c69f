//! # Deviation statistics
//!
//! Mean and Bessel-corrected standard deviation of the radial (`Δr`) and speed (`Δv`)
//! deviations of aligned rows.
//!
//! Two scopes are computed by two independent functions:
//!
//! * [`global_statistics`] pools the rows of every body. It describes the population and
//!   is reported, but it does not enter the z-scores.
//! * [`object_statistics`] uses the rows of one body. Its mean and standard deviation
//!   are what the [`AnomalyClassifier`](crate::classifier::AnomalyClassifier) scores
//!   against.
//!
//! A standard deviation that is zero (identical values) or undefined (fewer than two
//! values) is replaced by a small floor so that z-scores stay finite. Each substitution
//! is reported as a
//! [`DegenerateStatistics`](crate::diagnostics::DataQualityWarning::DegenerateStatistics)
//! warning.
use std::fmt;

use crate::aligner::AlignedRow;
use crate::diagnostics::{Audited, DataQualityWarning, DeviationAxis};

/// Mean and standard deviation of one deviation axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisStatistics {
    pub mean: f64,
    pub std_dev: f64,
    /// `true` when `std_dev` is the floor rather than the sample value.
    pub floored: bool,
}

impl AxisStatistics {
    /// Arithmetic mean and Bessel-corrected standard deviation of `values`.
    ///
    /// Arguments
    /// -----------------
    /// * `values`: The samples. An empty slice has mean 0.
    /// * `floor`: Substitute used when `len < 2` or the variance is exactly zero.
    pub fn from_values(values: &[f64], floor: f64) -> Self {
        let n = values.len();
        let mean = if n == 0 {
            0.0
        } else {
            values.iter().sum::<f64>() / n as f64
        };

        if n < 2 {
            return Self {
                mean,
                std_dev: floor,
                floored: true,
            };
        }

        let ss: f64 = values.iter().map(|x| (x - mean) * (x - mean)).sum();
        let std = (ss / (n - 1) as f64).sqrt();
        if std == 0.0 {
            Self {
                mean,
                std_dev: floor,
                floored: true,
            }
        } else {
            Self {
                mean,
                std_dev: std,
                floored: false,
            }
        }
    }

    /// `|x − mean| / std_dev`
    #[inline]
    pub fn z_score(&self, x: f64) -> f64 {
        (x - self.mean).abs() / self.std_dev
    }
}

/// Statistics of both deviation axes over a set of aligned rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviationStatistics {
    pub samples: usize,
    pub delta_r: AxisStatistics,
    pub delta_v: AxisStatistics,
}

impl DeviationStatistics {
    /// Compute both axes over `rows`, reporting floored axes under `scope`.
    pub fn from_rows<'a>(
        rows: impl IntoIterator<Item = &'a AlignedRow>,
        floor: f64,
        scope: &str,
    ) -> Audited<Self> {
        let (dr, dv): (Vec<f64>, Vec<f64>) = rows.into_iter().map(|r| (r.delta_r, r.delta_v)).unzip();

        let stats = Self {
            samples: dr.len(),
            delta_r: AxisStatistics::from_values(&dr, floor),
            delta_v: AxisStatistics::from_values(&dv, floor),
        };

        let mut out = Audited::new(stats);
        if stats.delta_r.floored {
            out.push(DataQualityWarning::DegenerateStatistics {
                scope: scope.to_string(),
                axis: DeviationAxis::Radial,
            });
        }
        if stats.delta_v.floored {
            out.push(DataQualityWarning::DegenerateStatistics {
                scope: scope.to_string(),
                axis: DeviationAxis::Speed,
            });
        }
        out
    }
}

impl fmt::Display for DeviationStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Deviation statistics ({} samples)", self.samples)?;
            writeln!(
                f,
                "  Δr: mean = {:.6e} AU,     std = {:.6e} AU",
                self.delta_r.mean, self.delta_r.std_dev
            )?;
            write!(
                f,
                "  Δv: mean = {:.6e} AU/day, std = {:.6e} AU/day",
                self.delta_v.mean, self.delta_v.std_dev
            )
        } else {
            write!(
                f,
                "n={}, Δr={:.3e}±{:.3e}, Δv={:.3e}±{:.3e}",
                self.samples,
                self.delta_r.mean,
                self.delta_r.std_dev,
                self.delta_v.mean,
                self.delta_v.std_dev
            )
        }
    }
}

/// Population statistics pooled over the aligned rows of every body.
///
/// The scope reported in warnings is `"global"`.
pub fn global_statistics<'a, I>(objects: I, floor: f64) -> Audited<DeviationStatistics>
where
    I: IntoIterator<Item = &'a [AlignedRow]>,
{
    DeviationStatistics::from_rows(objects.into_iter().flatten(), floor, "global")
}

/// Statistics of one body, used for its z-scores.
pub fn object_statistics(
    body: &str,
    rows: &[AlignedRow],
    floor: f64,
) -> Audited<DeviationStatistics> {
    DeviationStatistics::from_rows(rows, floor, body)
}

#[cfg(test)]
mod statistics_test {
    use super::*;
    use approx::assert_relative_eq;

    fn row(dr: f64, dv: f64) -> AlignedRow {
        AlignedRow::new("2025-01-01".into(), 1.0 + dr, 0.01 + dv, 1.0, 0.01)
    }

    #[test]
    fn test_bessel_std() {
        let s = AxisStatistics::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 1e-12);
        assert_relative_eq!(s.mean, 5.0);
        assert_relative_eq!(s.std_dev, (32.0f64 / 7.0).sqrt());
        assert!(!s.floored);
    }

    #[test]
    fn test_floor_cases() {
        let s = AxisStatistics::from_values(&[], 1e-12);
        assert_eq!(s.mean, 0.0);
        assert_eq!(s.std_dev, 1e-12);

        let s = AxisStatistics::from_values(&[3.0], 1e-12);
        assert_eq!(s.mean, 3.0);
        assert_eq!(s.std_dev, 1e-12);

        let s = AxisStatistics::from_values(&[0.5, 0.5, 0.5], 1e-12);
        assert_eq!(s.std_dev, 1e-12);
        assert!(s.floored);
        assert_eq!(s.z_score(0.5), 0.0);
    }

    #[test]
    fn test_object_statistics_warns_on_flat_axis() {
        let rows = vec![
            AlignedRow::new("d1".into(), 1.0, 0.02, 1.0, 0.01),
            AlignedRow::new("d2".into(), 1.0, 0.03, 1.0, 0.01),
        ];
        let out = object_statistics("433_Eros", &rows, 1e-12);
        assert_eq!(out.value.samples, 2);
        assert_eq!(out.value.delta_r.std_dev, 1e-12);
        assert_eq!(
            out.warnings,
            vec![DataQualityWarning::DegenerateStatistics {
                scope: "433_Eros".into(),
                axis: DeviationAxis::Radial,
            }]
        );
    }

    #[test]
    fn test_global_pools_objects() {
        let a = vec![row(1.0, 0.1), row(3.0, 0.3)];
        let b = vec![row(5.0, 0.5)];
        let out = global_statistics([a.as_slice(), b.as_slice()], 1e-12);
        assert_eq!(out.value.samples, 3);
        assert_relative_eq!(out.value.delta_r.mean, 3.0, epsilon = 1e-12);
        assert_relative_eq!(out.value.delta_r.std_dev, 2.0, epsilon = 1e-12);
        assert!(!out.has_warnings());
    }
}
