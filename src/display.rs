//! # Tabular display of batch results
//!
//! Human-readable rendering of a [`BatchReport`] with `comfy-table`.
//!
//! * [`SummaryTable`] – one row per object: max z-score, anomaly counts, dominant error
//!   mode, temporal behavior and stability class. Optionally followed by the global
//!   statistics and the data-quality warnings.
//! * [`ComparisonTable`] – one row per object of a [`ComparisonReport`].
//!
//! Both are lightweight views borrowing the report; build them with
//! [`BatchReport::summary_table`] and [`ComparisonReport::table`].
use std::fmt;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::comparison::ComparisonReport;
use crate::pipeline::BatchReport;

/// Display adapter for the per-object summary of a [`BatchReport`].
pub struct SummaryTable<'a> {
    report: &'a BatchReport,
    with_warnings: bool,
}

impl<'a> SummaryTable<'a> {
    pub fn new(report: &'a BatchReport) -> Self {
        Self {
            report,
            with_warnings: false,
        }
    }

    /// Also list the data-quality warnings below the table.
    pub fn with_warnings(mut self, yes: bool) -> Self {
        self.with_warnings = yes;
        self
    }

    fn render_comfy(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("Object"),
            Cell::new("Samples"),
            Cell::new("max z"),
            Cell::new("Anomalies"),
            Cell::new("Vel/Pos"),
            Cell::new("Mode"),
            Cell::new("Temporal"),
            Cell::new("Stability"),
        ]);

        for obj in &self.report.objects {
            let s = &obj.summary;
            table.add_row(Row::from(vec![
                Cell::new(&s.name),
                Cell::new(obj.statistics.samples).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.3}", s.max_z)).set_alignment(CellAlignment::Right),
                Cell::new(s.anomaly_count).set_alignment(CellAlignment::Right),
                Cell::new(format!("{}/{}", s.velocity_dominated, s.position_dominated))
                    .set_alignment(CellAlignment::Right),
                Cell::new(s.dominant_error_mode),
                Cell::new(s.temporal_behavior),
                Cell::new(s.stability_class),
            ]));
        }

        table.to_string()
    }
}

impl fmt::Display for SummaryTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Anomaly summary (objects={})", self.report.objects.len())?;
        writeln!(f, "-----------------------------")?;
        f.write_str(&self.render_comfy())?;

        if let Some(global) = &self.report.global {
            write!(f, "\nGlobal: {global}")?;
        }

        if self.with_warnings && !self.report.warnings.is_empty() {
            writeln!(f, "\n\nData-quality warnings ({})", self.report.warnings.len())?;
            for w in &self.report.warnings {
                writeln!(f, "  - {w}")?;
            }
        }
        Ok(())
    }
}

impl BatchReport {
    pub fn summary_table(&self) -> SummaryTable<'_> {
        SummaryTable::new(self)
    }
}

/// Display adapter for a [`ComparisonReport`].
pub struct ComparisonTable<'a> {
    report: &'a ComparisonReport,
}

impl fmt::Display for ComparisonTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.report;
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("Object"),
            Cell::new(format!("{} mean Δr [AU]", r.model_a)),
            Cell::new(format!("{} mean Δr [AU]", r.model_b)),
            Cell::new("Δr improvement"),
            Cell::new("Better (radial)"),
        ]);

        for row in &r.rows {
            let pct = row
                .r_improvement_percent
                .map(|p| format!("{p:.2}%"))
                .unwrap_or_else(|| "-".to_string());
            table.add_row(Row::from(vec![
                Cell::new(&row.object),
                Cell::new(format!("{:.6e}", row.a_mean_delta_r)).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.6e}", row.b_mean_delta_r)).set_alignment(CellAlignment::Right),
                Cell::new(pct).set_alignment(CellAlignment::Right),
                Cell::new(r.label(row.better_model_radial)),
            ]));
        }

        writeln!(f, "{table}")?;
        write!(f, "{r}")
    }
}

impl ComparisonReport {
    pub fn table(&self) -> ComparisonTable<'_> {
        ComparisonTable { report: self }
    }
}
