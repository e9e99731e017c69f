//! # CSV series and reports
//!
//! Reading of computed and reference series, and writing of every CSV output.
//!
//! ## Series files
//!
//! Computed and reference series share one row layout:
//!
//! ```text
//! date,x,y,z,vx,vy,vz,r
//! ```
//!
//! * The date column may be named `date` or `datetime_str`, in any form accepted by
//!   [`normalize_date`]. Rows whose date cannot be normalized are dropped and reported
//!   as [`UnparseableDate`](DataQualityWarning::UnparseableDate).
//! * Velocity cells are empty on the first computed sample.
//! * `r` (or `r_AU`) is optional; when absent the radial distance is `|(x, y, z)|`.
//! * Additional columns are ignored.
//!
//! ## Report files
//!
//! | Writer               | Header                                                         |
//! |----------------------|----------------------------------------------------------------|
//! | [`write_annotated`]  | `date,delta_r,delta_v,z_r,z_v,z_score,anomaly`                 |
//! | [`write_summary`]    | `object,max_z_score,anomaly_count,…,stability_class`           |
//! | [`write_statistics`] | `scope,samples,mean_delta_r,std_delta_r,mean_delta_v,std_delta_v` |
//! | [`write_comparison`] | `object,model_a,model_b,a_mean_delta_r,…,better_model_radial`  |
use std::fs::File;
use std::io::{Read, Write};

use camino::Utf8Path;
use csv::{ReaderBuilder, Trim, Writer};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::{AnomalyRecord, ObjectSummary, StabilityClass};
use crate::comparison::ComparisonReport;
use crate::date_normalization::normalize_date;
use crate::diagnostics::{Audited, DataQualityWarning};
use crate::drift_errors::DriftError;
use crate::pipeline::ObjectReport;
use crate::statistics::DeviationStatistics;
use crate::time_series::{SeriesRecord, TimeSeries};

#[derive(Debug, Serialize, Deserialize)]
struct SeriesRow {
    #[serde(alias = "datetime_str")]
    date: String,
    x: f64,
    y: f64,
    z: f64,
    #[serde(default)]
    vx: Option<f64>,
    #[serde(default)]
    vy: Option<f64>,
    #[serde(default)]
    vz: Option<f64>,
    #[serde(default, alias = "r_AU")]
    r: Option<f64>,
}

impl SeriesRow {
    fn record(&self) -> SeriesRecord {
        let velocity = match (self.vx, self.vy, self.vz) {
            (Some(vx), Some(vy), Some(vz)) => Some(Vector3::new(vx, vy, vz)),
            _ => None,
        };
        let rec = SeriesRecord::new(Vector3::new(self.x, self.y, self.z), velocity);
        match self.r {
            Some(r) => rec.with_radial_distance(r),
            None => rec,
        }
    }
}

/// Read a series from CSV text.
///
/// Arguments
/// -----------------
/// * `body`: Name of the series.
/// * `source`: Label used in warnings (typically the file path).
/// * `reader`: CSV input with a header row.
///
/// Return
/// ----------
/// * The series keyed by canonical date, duplicate dates keeping the last row.
/// * `Err(DriftError::CsvError)` for a row that cannot be decoded.
pub fn read_series<R: Read>(
    body: &str,
    source: &str,
    reader: R,
) -> Result<Audited<TimeSeries>, DriftError> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut out = Audited::new(TimeSeries::new(body));

    for row in rdr.deserialize::<SeriesRow>() {
        let row = row?;
        match normalize_date(&row.date) {
            Some(date) => out.value.insert(date, row.record()),
            None => out.push(DataQualityWarning::UnparseableDate {
                source: source.to_string(),
                raw: row.date.clone(),
            }),
        }
    }

    debug!(body, source, rows = out.value.len(), "series loaded");
    Ok(out)
}

/// Read a series file.
pub fn read_series_file(body: &str, path: &Utf8Path) -> Result<Audited<TimeSeries>, DriftError> {
    read_series(body, path.as_str(), File::open(path)?)
}

/// Write a series as `date,x,y,z,vx,vy,vz,r`.
pub fn write_series<W: Write>(writer: W, series: &TimeSeries) -> Result<(), DriftError> {
    let mut wtr = Writer::from_writer(writer);
    for (date, rec) in series.iter() {
        wtr.serialize(SeriesRow {
            date: date.clone(),
            x: rec.position.x,
            y: rec.position.y,
            z: rec.position.z,
            vx: rec.velocity.map(|v| v.x),
            vy: rec.velocity.map(|v| v.y),
            vz: rec.velocity.map(|v| v.z),
            r: Some(rec.radial_distance),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct AnnotatedRow<'a> {
    date: &'a str,
    delta_r: f64,
    delta_v: f64,
    z_r: f64,
    z_v: f64,
    z_score: f64,
    anomaly: u8,
}

/// Write the scored rows of one body.
pub fn write_annotated<W: Write>(writer: W, records: &[AnomalyRecord]) -> Result<(), DriftError> {
    let mut wtr = Writer::from_writer(writer);
    for r in records {
        wtr.serialize(AnnotatedRow {
            date: &r.date,
            delta_r: r.delta_r,
            delta_v: r.delta_v,
            z_r: r.z_r,
            z_v: r.z_v,
            z_score: r.z_score,
            anomaly: u8::from(r.anomaly),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the population summary, one row per object.
pub fn write_summary<W: Write>(writer: W, summaries: &[&ObjectSummary]) -> Result<(), DriftError> {
    let mut wtr = Writer::from_writer(writer);
    for s in summaries {
        wtr.serialize(s)?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct StatisticsRow<'a> {
    scope: &'a str,
    samples: usize,
    mean_delta_r: f64,
    std_delta_r: f64,
    mean_delta_v: f64,
    std_delta_v: f64,
}

impl<'a> StatisticsRow<'a> {
    fn new(scope: &'a str, s: &DeviationStatistics) -> Self {
        Self {
            scope,
            samples: s.samples,
            mean_delta_r: s.delta_r.mean,
            std_delta_r: s.delta_r.std_dev,
            mean_delta_v: s.delta_v.mean,
            std_delta_v: s.delta_v.std_dev,
        }
    }
}

/// Write the global statistics (scope `global`) followed by one row per object.
pub fn write_statistics<W: Write>(
    writer: W,
    global: Option<&DeviationStatistics>,
    objects: &[ObjectReport],
) -> Result<(), DriftError> {
    let mut wtr = Writer::from_writer(writer);
    if let Some(g) = global {
        wtr.serialize(StatisticsRow::new("global", g))?;
    }
    for obj in objects {
        wtr.serialize(StatisticsRow::new(&obj.name, &obj.statistics))?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct ComparisonRow<'a> {
    object: &'a str,
    model_a: &'a str,
    model_b: &'a str,
    a_mean_delta_r: f64,
    b_mean_delta_r: f64,
    a_mean_delta_v: f64,
    b_mean_delta_v: f64,
    a_max_z: f64,
    b_max_z: f64,
    a_anomaly_count: usize,
    b_anomaly_count: usize,
    a_stability_class: StabilityClass,
    b_stability_class: StabilityClass,
    delta_mean_r_difference: f64,
    delta_mean_v_difference: f64,
    r_improvement_percent: Option<f64>,
    v_improvement_percent: Option<f64>,
    better_model_radial: &'a str,
}

/// Write one row per compared object.
pub fn write_comparison<W: Write>(writer: W, report: &ComparisonReport) -> Result<(), DriftError> {
    let mut wtr = Writer::from_writer(writer);
    for row in &report.rows {
        wtr.serialize(ComparisonRow {
            object: &row.object,
            model_a: &report.model_a,
            model_b: &report.model_b,
            a_mean_delta_r: row.a_mean_delta_r,
            b_mean_delta_r: row.b_mean_delta_r,
            a_mean_delta_v: row.a_mean_delta_v,
            b_mean_delta_v: row.b_mean_delta_v,
            a_max_z: row.a_max_z,
            b_max_z: row.b_max_z,
            a_anomaly_count: row.a_anomaly_count,
            b_anomaly_count: row.b_anomaly_count,
            a_stability_class: row.a_stability,
            b_stability_class: row.b_stability,
            delta_mean_r_difference: row.delta_r_difference,
            delta_mean_v_difference: row.delta_v_difference,
            r_improvement_percent: row.r_improvement_percent,
            v_improvement_percent: row.v_improvement_percent,
            better_model_radial: report.label(row.better_model_radial),
        })?;
    }
    wtr.flush()?;
    Ok(())
}
