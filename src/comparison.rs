//! # Model comparison
//!
//! Ranks two deviation reports of the same bodies against each other, e.g. the Keplerian
//! propagation against an N-body reference model, both scored against the same reference
//! ephemeris.
//!
//! Objects are matched by name (inner join). For each object the mean radial and speed
//! deviations of both models are compared:
//!
//! ```text
//! difference  = mean_A − mean_B          (positive: B closer to the reference)
//! improvement = difference / mean_A · 100
//! ```
//!
//! and the model with the smaller mean `Δr` is the better one for that object. The
//! overall winner uses the same rule on the average of the per-object means.
use std::fmt;

use itertools::{EitherOrBoth, Itertools};

use crate::classifier::StabilityClass;
use crate::pipeline::ObjectReport;

/// Which of the two compared models deviates less.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetterModel {
    A,
    B,
    Equal,
}

impl BetterModel {
    /// The model with the smaller error; exact ties are `Equal`.
    pub fn by_error(error_a: f64, error_b: f64) -> Self {
        if error_b < error_a {
            BetterModel::B
        } else if error_b > error_a {
            BetterModel::A
        } else {
            BetterModel::Equal
        }
    }
}

/// Side-by-side figures of one object under both models.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelComparison {
    pub object: String,
    pub a_mean_delta_r: f64,
    pub b_mean_delta_r: f64,
    pub a_mean_delta_v: f64,
    pub b_mean_delta_v: f64,
    pub a_max_z: f64,
    pub b_max_z: f64,
    pub a_anomaly_count: usize,
    pub b_anomaly_count: usize,
    pub a_stability: StabilityClass,
    pub b_stability: StabilityClass,
    /// `a_mean_delta_r − b_mean_delta_r`
    pub delta_r_difference: f64,
    /// `a_mean_delta_v − b_mean_delta_v`
    pub delta_v_difference: f64,
    /// Relative radial improvement of B over A (%); `None` when A's mean is zero.
    pub r_improvement_percent: Option<f64>,
    /// Relative speed improvement of B over A (%); `None` when A's mean is zero.
    pub v_improvement_percent: Option<f64>,
    pub better_model_radial: BetterModel,
}

fn percent(difference: f64, base: f64) -> Option<f64> {
    (base != 0.0).then(|| difference / base * 100.0)
}

impl ModelComparison {
    pub fn new(a: &ObjectReport, b: &ObjectReport) -> Self {
        let a_r = a.statistics.delta_r.mean;
        let b_r = b.statistics.delta_r.mean;
        let a_v = a.statistics.delta_v.mean;
        let b_v = b.statistics.delta_v.mean;

        Self {
            object: a.name.clone(),
            a_mean_delta_r: a_r,
            b_mean_delta_r: b_r,
            a_mean_delta_v: a_v,
            b_mean_delta_v: b_v,
            a_max_z: a.summary.max_z,
            b_max_z: b.summary.max_z,
            a_anomaly_count: a.summary.anomaly_count,
            b_anomaly_count: b.summary.anomaly_count,
            a_stability: a.summary.stability_class,
            b_stability: b.summary.stability_class,
            delta_r_difference: a_r - b_r,
            delta_v_difference: a_v - b_v,
            r_improvement_percent: percent(a_r - b_r, a_r),
            v_improvement_percent: percent(a_v - b_v, a_v),
            better_model_radial: BetterModel::by_error(a_r, b_r),
        }
    }
}

/// Per-object comparisons and the overall verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub model_a: String,
    pub model_b: String,
    pub rows: Vec<ModelComparison>,
}

impl ComparisonReport {
    /// Average of the per-object mean `Δr` of model A and model B.
    pub fn average_radial_errors(&self) -> (f64, f64) {
        if self.rows.is_empty() {
            return (0.0, 0.0);
        }
        let n = self.rows.len() as f64;
        let a = self.rows.iter().map(|r| r.a_mean_delta_r).sum::<f64>() / n;
        let b = self.rows.iter().map(|r| r.b_mean_delta_r).sum::<f64>() / n;
        (a, b)
    }

    pub fn overall_winner(&self) -> BetterModel {
        let (a, b) = self.average_radial_errors();
        BetterModel::by_error(a, b)
    }

    /// Display label of a verdict: the model name, or `"Equal"`.
    pub fn label(&self, which: BetterModel) -> &str {
        match which {
            BetterModel::A => &self.model_a,
            BetterModel::B => &self.model_b,
            BetterModel::Equal => "Equal",
        }
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b) = self.average_radial_errors();
        writeln!(f, "===== Overall Performance Summary =====")?;
        writeln!(f, "Objects compared:              {}", self.rows.len())?;
        writeln!(f, "Average {} radial error: {a:.6} AU", self.model_a)?;
        writeln!(f, "Average {} radial error: {b:.6} AU", self.model_b)?;
        write!(f, "Overall winner: {}", self.label(self.overall_winner()))
    }
}

/// Compare two reports object by object.
///
/// Arguments
/// -----------------
/// * `model_a`, `model_b`: Display names of the two models.
/// * `a`, `b`: Object reports of each model, sorted by name (as produced by the pipeline).
///
/// Return
/// ----------
/// * A [`ComparisonReport`] with one row per object present in both inputs, in name order.
pub fn compare_models(
    model_a: &str,
    a: &[ObjectReport],
    model_b: &str,
    b: &[ObjectReport],
) -> ComparisonReport {
    let rows = a
        .iter()
        .merge_join_by(b.iter(), |x, y| x.name.cmp(&y.name))
        .filter_map(|pair| match pair {
            EitherOrBoth::Both(x, y) => Some(ModelComparison::new(x, y)),
            _ => None,
        })
        .collect();

    ComparisonReport {
        model_a: model_a.to_string(),
        model_b: model_b.to_string(),
        rows,
    }
}

#[cfg(test)]
mod comparison_test {
    use super::*;
    use crate::classifier::AnomalyClassifier;
    use crate::statistics::{AxisStatistics, DeviationStatistics};
    use approx::assert_relative_eq;

    fn report(name: &str, mean_r: f64, mean_v: f64) -> ObjectReport {
        let statistics = DeviationStatistics {
            samples: 10,
            delta_r: AxisStatistics {
                mean: mean_r,
                std_dev: 1.0,
                floored: false,
            },
            delta_v: AxisStatistics {
                mean: mean_v,
                std_dev: 1.0,
                floored: false,
            },
        };
        ObjectReport {
            name: name.to_string(),
            statistics,
            records: Vec::new(),
            summary: AnomalyClassifier::default().summarize(name, &[]),
        }
    }

    #[test]
    fn test_inner_join_and_ranking() {
        let kepler = vec![
            report("1_Ceres", 0.02, 0.001),
            report("2_Pallas", 0.01, 0.002),
            report("4_Vesta", 0.03, 0.001),
        ];
        let nbody = vec![
            report("1_Ceres", 0.01, 0.001),
            report("2_Pallas", 0.01, 0.001),
            report("3_Juno", 0.05, 0.001),
        ];

        let cmp = compare_models("Kepler", &kepler, "Rebound", &nbody);
        assert_eq!(cmp.rows.len(), 2);

        let ceres = &cmp.rows[0];
        assert_eq!(ceres.object, "1_Ceres");
        assert_relative_eq!(ceres.delta_r_difference, 0.01);
        assert_relative_eq!(ceres.r_improvement_percent.unwrap(), 50.0, epsilon = 1e-10);
        assert_eq!(ceres.better_model_radial, BetterModel::B);

        let pallas = &cmp.rows[1];
        assert_eq!(pallas.better_model_radial, BetterModel::Equal);
        assert_relative_eq!(pallas.v_improvement_percent.unwrap(), 50.0, epsilon = 1e-10);

        assert_eq!(cmp.overall_winner(), BetterModel::B);
        assert_eq!(cmp.label(cmp.overall_winner()), "Rebound");
        assert!(cmp.to_string().ends_with("Overall winner: Rebound"));
    }

    #[test]
    fn test_zero_base_has_no_percent() {
        let cmp = compare_models(
            "A",
            &[report("x", 0.0, 0.0)],
            "B",
            &[report("x", 0.1, 0.0)],
        );
        assert_eq!(cmp.rows[0].r_improvement_percent, None);
        assert_eq!(cmp.rows[0].better_model_radial, BetterModel::A);
    }
}
