//! # Batch pipeline
//!
//! [`DriftPipeline`] chains the components of the crate into a batch run:
//!
//! ```text
//! elements ─► StatePropagator ─► computed TimeSeries ─┐
//!                                                      ├─► align ─► statistics ─► classify
//! reference CSV ─► date normalization ─► TimeSeries ────┘
//! ```
//!
//! Two entry styles are provided:
//!
//! * **In memory** – [`DriftPipeline::propagate`], [`DriftPipeline::analyze`] and
//!   [`DriftPipeline::run`] work on values and never touch the filesystem.
//! * **Directories** – [`DriftPipeline::propagate_directory`] and
//!   [`DriftPipeline::analyze_directories`] read and write the layout described by
//!   [`PipelinePaths`].
//!
//! ## Concurrency
//!
//! Propagation parallelizes over bodies inside each time step. Once the series exist,
//! alignment, per-object statistics and classification run in parallel across bodies.
//! Object reports are returned sorted by name regardless of scheduling.
//!
//! ## Failure model
//!
//! Degraded inputs never abort a batch. They are recovered locally and accumulated in
//! [`BatchReport::warnings`]. The only fatal conditions are I/O, malformed files, and a
//! directory run in which no body aligns at all ([`DriftError::NoOverlappingData`]).
//!
//! ## Example
//!
//! ```rust, no_run
//! use camino::Utf8Path;
//! use orbdrift::drift_params::{DriftParams, PipelinePaths};
//! use orbdrift::pipeline::DriftPipeline;
//!
//! let pipeline = DriftPipeline::new(DriftParams::default());
//! let paths = PipelinePaths::rooted_at("run");
//! pipeline.propagate_directory(&paths).unwrap();
//! let report = pipeline.analyze_directories(&paths).unwrap();
//! println!("{}", report.summary_table());
//! ```
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufWriter;

use ahash::RandomState;
use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::aligner::{align, AlignedRow};
use crate::classifier::{AnomalyClassifier, AnomalyRecord, ObjectSummary};
use crate::comparison::{compare_models, ComparisonReport};
use crate::constants::{ANNOTATED_SUFFIX, REFERENCE_SUFFIX, STATISTICS_FILE, SUMMARY_FILE};
use crate::diagnostics::{Audited, DataQualityWarning};
use crate::drift_errors::DriftError;
use crate::drift_params::{DriftParams, PipelinePaths};
use crate::io::element_reader::{list_files, read_element_dir};
use crate::io::series_csv::{
    read_series_file, write_annotated, write_comparison, write_series, write_statistics,
    write_summary,
};
use crate::propagator::{NamedElements, StatePropagator};
use crate::statistics::{global_statistics, object_statistics, DeviationStatistics};
use crate::time_series::TimeSeries;

/// File name of the model comparison written by [`write_comparison_file`].
pub const COMPARISON_FILE: &str = "model_comparison_summary.csv";

/// Everything computed for one aligned body.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectReport {
    pub name: String,
    /// Per-object statistics the z-scores are computed against.
    pub statistics: DeviationStatistics,
    /// Scored rows, in date order.
    pub records: Vec<AnomalyRecord>,
    pub summary: ObjectSummary,
}

/// Result of an analysis batch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchReport {
    /// Statistics pooled over every aligned body; `None` when nothing aligned.
    pub global: Option<DeviationStatistics>,
    /// One report per aligned body, sorted by name.
    pub objects: Vec<ObjectReport>,
    pub warnings: Vec<DataQualityWarning>,
}

impl BatchReport {
    pub fn object(&self, name: &str) -> Option<&ObjectReport> {
        self.objects
            .binary_search_by(|o| o.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.objects[i])
    }

    pub fn summaries(&self) -> Vec<&ObjectSummary> {
        self.objects.iter().map(|o| &o.summary).collect()
    }

    /// Rank this report (model A) against `other` (model B).
    pub fn compare_with(&self, label: &str, other: &BatchReport, other_label: &str) -> ComparisonReport {
        compare_models(label, &self.objects, other_label, &other.objects)
    }
}

/// Propagation + anomaly detection configured by one [`DriftParams`].
#[derive(Debug, Clone)]
pub struct DriftPipeline {
    params: DriftParams,
    propagator: StatePropagator,
    classifier: AnomalyClassifier,
}

impl Default for DriftPipeline {
    fn default() -> Self {
        Self::new(DriftParams::default())
    }
}

impl DriftPipeline {
    pub fn new(params: DriftParams) -> Self {
        Self {
            propagator: StatePropagator::new(&params),
            classifier: AnomalyClassifier::new(&params),
            params,
        }
    }

    pub fn params(&self) -> &DriftParams {
        &self.params
    }

    /// Propagate the bodies and turn each trajectory into a dated series.
    pub fn propagate(&self, bodies: &[NamedElements]) -> Audited<Vec<TimeSeries>> {
        let start = self.params.start_epoch;
        self.propagator
            .propagate_trajectories(bodies)
            .map(|trajectories| {
                trajectories
                    .par_iter()
                    .map(|t| TimeSeries::from_samples(&*t.body, &t.samples, start))
                    .collect()
            })
    }

    /// Score `(computed, reference)` pairs.
    ///
    /// Bodies without any aligned row are excluded with an
    /// [`UnalignedSeries`](DataQualityWarning::UnalignedSeries) warning. The name of each
    /// report is the name of the computed series.
    pub fn analyze(&self, pairs: &[(TimeSeries, TimeSeries)]) -> BatchReport {
        let mut report = BatchReport::default();

        let aligned: Vec<(&str, Vec<AlignedRow>)> = pairs
            .par_iter()
            .map(|(computed, reference)| (computed.body.as_str(), align(computed, reference)))
            .collect();

        let mut kept = Vec::with_capacity(aligned.len());
        for (name, rows) in aligned {
            if rows.is_empty() {
                let w = DataQualityWarning::UnalignedSeries {
                    body: name.to_string(),
                };
                warn!(warning = %w, "data quality");
                report.warnings.push(w);
            } else {
                debug!(body = name, rows = rows.len(), "aligned");
                kept.push((name, rows));
            }
        }

        if kept.is_empty() {
            info!("no body aligned with its reference");
            return report;
        }

        let floor = self.params.std_floor;
        report.global = Some(
            global_statistics(kept.iter().map(|(_, rows)| rows.as_slice()), floor)
                .drain_into(&mut report.warnings),
        );

        let scored: Vec<(ObjectReport, Vec<DataQualityWarning>)> = kept
            .par_iter()
            .map(|(name, rows)| {
                let (statistics, warnings) = object_statistics(name, rows, floor).into_parts();
                let (records, summary) = self.classifier.classify(name, rows, &statistics);
                (
                    ObjectReport {
                        name: name.to_string(),
                        statistics,
                        records,
                        summary,
                    },
                    warnings,
                )
            })
            .collect();

        for (object, warnings) in scored {
            report.warnings.extend(warnings);
            report.objects.push(object);
        }
        report.objects.sort_by(|a, b| a.name.cmp(&b.name));

        info!(
            objects = report.objects.len(),
            anomalies = report
                .objects
                .iter()
                .map(|o| o.summary.anomaly_count)
                .sum::<usize>(),
            "analysis complete"
        );
        report
    }

    /// Propagate `bodies` and score them against `references`, matched by body name.
    ///
    /// A body without a reference is reported as
    /// [`MissingReference`](DataQualityWarning::MissingReference).
    pub fn run(&self, bodies: &[NamedElements], references: Vec<TimeSeries>) -> BatchReport {
        let (computed, mut warnings) = self.propagate(bodies).into_parts();

        let mut by_name: HashMap<String, TimeSeries, RandomState> = references
            .into_iter()
            .map(|r| (r.body.clone(), r))
            .collect();

        let mut pairs = Vec::with_capacity(computed.len());
        for series in computed {
            match by_name.remove(&series.body) {
                Some(reference) => pairs.push((series, reference)),
                None => {
                    let w = DataQualityWarning::MissingReference { body: series.body };
                    warn!(warning = %w, "data quality");
                    warnings.push(w);
                }
            }
        }

        let mut report = self.analyze(&pairs);
        warnings.append(&mut report.warnings);
        report.warnings = warnings;
        report
    }

    /// Read every element file of `paths.elements_dir`, propagate, and write one
    /// `<name>.csv` per body into `paths.computed_dir`.
    pub fn propagate_directory(
        &self,
        paths: &PipelinePaths,
    ) -> Result<Audited<Vec<TimeSeries>>, DriftError> {
        let (bodies, mut warnings) =
            read_element_dir(&paths.elements_dir, self.params.missing_field_policy)?.into_parts();
        info!(bodies = bodies.len(), dir = %paths.elements_dir, "element files loaded");

        let series = self.propagate(&bodies).drain_into(&mut warnings);

        fs::create_dir_all(&paths.computed_dir)?;
        for s in &series {
            let path = paths.computed_dir.join(format!("{}.csv", s.body));
            write_series(BufWriter::new(File::create(&path)?), s)?;
            debug!(%path, "computed series written");
        }

        Ok(Audited::with_warnings(series, warnings))
    }

    /// Pair the computed series of `paths.computed_dir` with their reference files, score
    /// them, and write the annotated series, summary and statistics to
    /// `paths.output_dir`.
    ///
    /// The reference of `<name>.csv` is `<name with '_' → ' '>_Real.csv`, falling back to
    /// `<name>_Real.csv`.
    ///
    /// Return
    /// ----------
    /// * The [`BatchReport`] of the run.
    /// * `Err(DriftError::NoOverlappingData)` when no body aligns with its reference.
    pub fn analyze_directories(&self, paths: &PipelinePaths) -> Result<BatchReport, DriftError> {
        let mut warnings = Vec::new();
        let mut pairs = Vec::new();

        for computed_path in list_files(&paths.computed_dir, "csv")? {
            let Some(name) = computed_path.file_stem() else {
                continue;
            };
            let Some(reference_path) = reference_path_for(&paths.reference_dir, name) else {
                let w = DataQualityWarning::MissingReference {
                    body: name.to_string(),
                };
                warn!(warning = %w, "data quality");
                warnings.push(w);
                continue;
            };

            let computed = read_series_file(name, &computed_path)?.drain_into(&mut warnings);
            let reference = read_series_file(name, &reference_path)?.drain_into(&mut warnings);
            pairs.push((computed, reference));
        }

        let mut report = self.analyze(&pairs);
        if report.objects.is_empty() {
            return Err(DriftError::NoOverlappingData);
        }
        warnings.append(&mut report.warnings);
        report.warnings = warnings;

        write_outputs(&paths.output_dir, &report)?;
        Ok(report)
    }
}

/// Locate the reference file of a computed series named `name`.
pub fn reference_path_for(reference_dir: &Utf8Path, name: &str) -> Option<Utf8PathBuf> {
    let spaced = reference_dir.join(format!("{}{REFERENCE_SUFFIX}", name.replace('_', " ")));
    let plain = reference_dir.join(format!("{name}{REFERENCE_SUFFIX}"));
    [spaced, plain].into_iter().find(|p| p.is_file())
}

/// Write `<name>_ZScore.csv` for every object, plus the summary and statistics files.
pub fn write_outputs(output_dir: &Utf8Path, report: &BatchReport) -> Result<(), DriftError> {
    fs::create_dir_all(output_dir)?;

    for obj in &report.objects {
        let path = output_dir.join(format!("{}{ANNOTATED_SUFFIX}", obj.name));
        write_annotated(BufWriter::new(File::create(&path)?), &obj.records)?;
    }

    write_summary(
        BufWriter::new(File::create(output_dir.join(SUMMARY_FILE))?),
        &report.summaries(),
    )?;
    write_statistics(
        BufWriter::new(File::create(output_dir.join(STATISTICS_FILE))?),
        report.global.as_ref(),
        &report.objects,
    )?;

    info!(dir = %output_dir, objects = report.objects.len(), "outputs written");
    Ok(())
}

/// Write a model comparison to `<dir>/model_comparison_summary.csv`.
pub fn write_comparison_file(
    dir: &Utf8Path,
    report: &ComparisonReport,
) -> Result<Utf8PathBuf, DriftError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(COMPARISON_FILE);
    write_comparison(BufWriter::new(File::create(&path)?), report)?;
    Ok(path)
}
