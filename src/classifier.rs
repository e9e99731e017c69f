//! # Anomaly classification
//!
//! Turns the aligned rows of one body and that body's own
//! [`DeviationStatistics`] into per-row z-scores, anomaly flags and a qualitative
//! [`ObjectSummary`].
//!
//! ## Scoring
//!
//! ```text
//! z_r = |Δr − μ_r| / σ_r        z_v = |Δv − μ_v| / σ_v
//! z   = max(z_r, z_v)           anomaly ⇔ z ≥ anomaly_threshold
//! ```
//!
//! An anomalous row is *velocity-dominated* when `z_v > z_r`, and *position-dominated*
//! otherwise (ties go to position).
//!
//! ## Summary rules
//!
//! | Field                 | Rule                                                          |
//! |-----------------------|---------------------------------------------------------------|
//! | dominant error mode   | None if no anomaly, Position if pos > vel, else Velocity      |
//! | temporal behavior     | Persistent if count ≥ persistence, Isolated if ≥ 1, else None |
//! | stability class       | Stable if no anomaly, Marginally Stable if max z < stability threshold, else Unstable |
//!
//! The physical interpretation is a fixed sentence per dominant mode.
use std::fmt;

use serde::Serialize;

use crate::aligner::AlignedRow;
use crate::drift_params::DriftParams;
use crate::statistics::DeviationStatistics;

/// One scored row of a body's aligned series.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyRecord {
    pub date: String,
    pub delta_r: f64,
    pub delta_v: f64,
    pub z_r: f64,
    pub z_v: f64,
    /// `max(z_r, z_v)`
    pub z_score: f64,
    pub anomaly: bool,
}

impl AnomalyRecord {
    #[inline]
    pub fn is_velocity_dominated(&self) -> bool {
        self.z_v > self.z_r
    }
}

/// Which deviation axis drives most of a body's anomalies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DominantErrorMode {
    None,
    Position,
    Velocity,
}

impl DominantErrorMode {
    pub fn physical_interpretation(&self) -> &'static str {
        match self {
            DominantErrorMode::Position => "Long-term orbital geometry deviation",
            DominantErrorMode::Velocity => "Short-term dynamical instability",
            DominantErrorMode::None => "Consistent with reference ephemeris",
        }
    }
}

/// How anomalies are spread in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TemporalBehavior {
    None,
    Isolated,
    Persistent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StabilityClass {
    Stable,
    #[serde(rename = "Marginally Stable")]
    MarginallyStable,
    Unstable,
}

impl fmt::Display for DominantErrorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DominantErrorMode::None => write!(f, "None"),
            DominantErrorMode::Position => write!(f, "Position"),
            DominantErrorMode::Velocity => write!(f, "Velocity"),
        }
    }
}

impl fmt::Display for TemporalBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemporalBehavior::None => write!(f, "None"),
            TemporalBehavior::Isolated => write!(f, "Isolated"),
            TemporalBehavior::Persistent => write!(f, "Persistent"),
        }
    }
}

impl fmt::Display for StabilityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StabilityClass::Stable => write!(f, "Stable"),
            StabilityClass::MarginallyStable => write!(f, "Marginally Stable"),
            StabilityClass::Unstable => write!(f, "Unstable"),
        }
    }
}

/// Qualitative verdict for one body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectSummary {
    #[serde(rename = "object")]
    pub name: String,
    #[serde(rename = "max_z_score")]
    pub max_z: f64,
    pub anomaly_count: usize,
    #[serde(rename = "velocity_dominated_anomalies")]
    pub velocity_dominated: usize,
    #[serde(rename = "position_dominated_anomalies")]
    pub position_dominated: usize,
    pub dominant_error_mode: DominantErrorMode,
    pub temporal_behavior: TemporalBehavior,
    pub physical_interpretation: &'static str,
    pub stability_class: StabilityClass,
}

/// Scores rows and derives summaries with the thresholds of a [`DriftParams`].
#[derive(Debug, Clone, Copy)]
pub struct AnomalyClassifier {
    anomaly_threshold: f64,
    stability_threshold: f64,
    persistence_count: usize,
}

impl Default for AnomalyClassifier {
    fn default() -> Self {
        Self::new(&DriftParams::default())
    }
}

impl AnomalyClassifier {
    pub fn new(params: &DriftParams) -> Self {
        Self {
            anomaly_threshold: params.anomaly_threshold,
            stability_threshold: params.stability_threshold,
            persistence_count: params.persistence_count,
        }
    }

    /// Score every row against the body's own statistics, keeping the row order.
    pub fn score(&self, rows: &[AlignedRow], stats: &DeviationStatistics) -> Vec<AnomalyRecord> {
        rows.iter()
            .map(|row| {
                let z_r = stats.delta_r.z_score(row.delta_r);
                let z_v = stats.delta_v.z_score(row.delta_v);
                let z_score = z_r.max(z_v);
                AnomalyRecord {
                    date: row.date.clone(),
                    delta_r: row.delta_r,
                    delta_v: row.delta_v,
                    z_r,
                    z_v,
                    z_score,
                    anomaly: z_score >= self.anomaly_threshold,
                }
            })
            .collect()
    }

    /// Fold scored rows into an [`ObjectSummary`].
    pub fn summarize(&self, name: &str, records: &[AnomalyRecord]) -> ObjectSummary {
        let max_z = records.iter().map(|r| r.z_score).fold(0.0, f64::max);
        let (velocity_dominated, position_dominated) = records
            .iter()
            .filter(|r| r.anomaly)
            .fold((0, 0), |(v, p), r| {
                if r.is_velocity_dominated() {
                    (v + 1, p)
                } else {
                    (v, p + 1)
                }
            });
        let anomaly_count = velocity_dominated + position_dominated;

        let dominant_error_mode = if anomaly_count == 0 {
            DominantErrorMode::None
        } else if position_dominated > velocity_dominated {
            DominantErrorMode::Position
        } else {
            DominantErrorMode::Velocity
        };

        let temporal_behavior = if anomaly_count >= self.persistence_count {
            TemporalBehavior::Persistent
        } else if anomaly_count > 0 {
            TemporalBehavior::Isolated
        } else {
            TemporalBehavior::None
        };

        let stability_class = if anomaly_count == 0 {
            StabilityClass::Stable
        } else if max_z < self.stability_threshold {
            StabilityClass::MarginallyStable
        } else {
            StabilityClass::Unstable
        };

        ObjectSummary {
            name: name.to_string(),
            max_z,
            anomaly_count,
            velocity_dominated,
            position_dominated,
            dominant_error_mode,
            temporal_behavior,
            physical_interpretation: dominant_error_mode.physical_interpretation(),
            stability_class,
        }
    }

    /// [`score`](Self::score) then [`summarize`](Self::summarize).
    pub fn classify(
        &self,
        name: &str,
        rows: &[AlignedRow],
        stats: &DeviationStatistics,
    ) -> (Vec<AnomalyRecord>, ObjectSummary) {
        let records = self.score(rows, stats);
        let summary = self.summarize(name, &records);
        (records, summary)
    }
}

#[cfg(test)]
mod classifier_test {
    use super::*;

    fn record(z_r: f64, z_v: f64, anomaly: bool) -> AnomalyRecord {
        AnomalyRecord {
            date: String::new(),
            delta_r: 0.0,
            delta_v: 0.0,
            z_r,
            z_v,
            z_score: z_r.max(z_v),
            anomaly,
        }
    }

    #[test]
    fn test_no_anomaly_is_stable() {
        let c = AnomalyClassifier::default();
        let s = c.summarize("x", &[record(1.0, 2.0, false), record(0.5, 0.1, false)]);
        assert_eq!(s.max_z, 2.0);
        assert_eq!(s.anomaly_count, 0);
        assert_eq!(s.dominant_error_mode, DominantErrorMode::None);
        assert_eq!(s.temporal_behavior, TemporalBehavior::None);
        assert_eq!(s.physical_interpretation, "Consistent with reference ephemeris");
        assert_eq!(s.stability_class, StabilityClass::Stable);
    }

    #[test]
    fn test_tie_goes_to_velocity_mode() {
        let c = AnomalyClassifier::default();
        let s = c.summarize("x", &[record(3.5, 1.0, true), record(1.0, 3.6, true)]);
        assert_eq!(s.anomaly_count, 2);
        assert_eq!(s.position_dominated, 1);
        assert_eq!(s.velocity_dominated, 1);
        assert_eq!(s.dominant_error_mode, DominantErrorMode::Velocity);
        assert_eq!(s.temporal_behavior, TemporalBehavior::Isolated);
        assert_eq!(s.stability_class, StabilityClass::MarginallyStable);
        assert_eq!(s.physical_interpretation, "Short-term dynamical instability");
    }

    #[test]
    fn test_persistent_unstable_position() {
        let c = AnomalyClassifier::default();
        let s = c.summarize(
            "x",
            &[
                record(5.0, 1.0, true),
                record(3.2, 3.2, true),
                record(4.0, 0.0, true),
            ],
        );
        assert_eq!(s.position_dominated, 3);
        assert_eq!(s.dominant_error_mode, DominantErrorMode::Position);
        assert_eq!(s.temporal_behavior, TemporalBehavior::Persistent);
        assert_eq!(s.stability_class, StabilityClass::Unstable);
        assert_eq!(s.max_z, 5.0);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(StabilityClass::MarginallyStable.to_string(), "Marginally Stable");
        assert_eq!(TemporalBehavior::Persistent.to_string(), "Persistent");
        assert_eq!(DominantErrorMode::Position.to_string(), "Position");
    }
}
