//! # Per-body time series
//!
//! [`StateSample`] is what the propagator emits for one body at one time step.
//! [`TimeSeries`] is the date-keyed form used for alignment, built either from those
//! samples or from reference ephemeris rows.
//!
//! Keys are canonical `YYYY-MM-DD` dates (see
//! [`date_normalization`](crate::date_normalization)). Inserting a record under an
//! existing key replaces it: the last record for a date wins.
use std::collections::BTreeMap;

use hifitime::Epoch;
use nalgebra::Vector3;

use crate::constants::{BodyName, Days};
use crate::date_normalization::date_label;

/// Position (and, from the second step on, velocity) of one body at one elapsed time.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSample {
    pub body: BodyName,
    /// Days since the element epoch.
    pub elapsed_days: Days,
    /// Inertial position (AU).
    pub position: Vector3<f64>,
    /// Backward-difference velocity (AU/day); `None` for the first sample of a run.
    pub velocity: Option<Vector3<f64>>,
}

impl StateSample {
    #[inline]
    pub fn radial_distance(&self) -> f64 {
        self.position.norm()
    }
}

/// One dated record of a [`TimeSeries`].
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRecord {
    pub position: Vector3<f64>,
    pub velocity: Option<Vector3<f64>>,
    /// Radial distance (AU). Taken from the source when it carries one, else `|position|`.
    pub radial_distance: f64,
}

impl SeriesRecord {
    pub fn new(position: Vector3<f64>, velocity: Option<Vector3<f64>>) -> Self {
        Self {
            radial_distance: position.norm(),
            position,
            velocity,
        }
    }

    pub fn with_radial_distance(mut self, r: f64) -> Self {
        self.radial_distance = r;
        self
    }

    /// Speed `|v|` (AU/day), if the record has a velocity.
    #[inline]
    pub fn speed(&self) -> Option<f64> {
        self.velocity.map(|v| v.norm())
    }
}

/// Date-ordered series of one body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    pub body: String,
    pub records: BTreeMap<String, SeriesRecord>,
}

impl TimeSeries {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            records: BTreeMap::new(),
        }
    }

    /// Build the computed series of a body, keyed by `start + elapsed_days`.
    pub fn from_samples<'a>(
        body: impl Into<String>,
        samples: impl IntoIterator<Item = &'a StateSample>,
        start: Epoch,
    ) -> Self {
        let mut series = Self::new(body);
        for s in samples {
            series.insert(
                date_label(start, s.elapsed_days),
                SeriesRecord::new(s.position, s.velocity),
            );
        }
        series
    }

    /// Insert a record; a record already stored under `date` is replaced.
    pub fn insert(&mut self, date: String, record: SeriesRecord) {
        self.records.insert(date, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, date: &str) -> Option<&SeriesRecord> {
        self.records.get(date)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SeriesRecord)> {
        self.records.iter()
    }
}
