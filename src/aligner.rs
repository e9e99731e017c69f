//! # Time-series alignment
//!
//! Inner join of a computed and a reference [`TimeSeries`] on their canonical date keys.
//! Both series are already date-ordered, so the join is a single ordered merge. There is
//! no interpolation: a date missing from either side produces no row, and neither does a
//! computed record without velocity (the first sample of a propagation run).
use itertools::{EitherOrBoth, Itertools};

use crate::time_series::TimeSeries;

/// One date present in both series, with the deviation magnitudes.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    pub date: String,
    pub computed_radius: f64,
    pub computed_speed: f64,
    pub reference_radius: f64,
    pub reference_speed: f64,
    /// `|r_computed − r_reference|` (AU)
    pub delta_r: f64,
    /// `|v_computed − v_reference|` (AU/day)
    pub delta_v: f64,
}

impl AlignedRow {
    pub fn new(
        date: String,
        computed_radius: f64,
        computed_speed: f64,
        reference_radius: f64,
        reference_speed: f64,
    ) -> Self {
        Self {
            date,
            computed_radius,
            computed_speed,
            reference_radius,
            reference_speed,
            delta_r: (computed_radius - reference_radius).abs(),
            delta_v: (computed_speed - reference_speed).abs(),
        }
    }
}

/// Join `computed` and `reference` on identical dates, in ascending date order.
///
/// Return
/// ----------
/// * The aligned rows; empty when the series share no usable date.
pub fn align(computed: &TimeSeries, reference: &TimeSeries) -> Vec<AlignedRow> {
    computed
        .records
        .iter()
        .merge_join_by(reference.records.iter(), |(a, _), (b, _)| a.cmp(b))
        .filter_map(|pair| match pair {
            EitherOrBoth::Both((date, c), (_, r)) => Some(AlignedRow::new(
                date.clone(),
                c.radial_distance,
                c.speed()?,
                r.radial_distance,
                r.speed()?,
            )),
            _ => None,
        })
        .collect()
}
