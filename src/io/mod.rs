//! File formats read and written by the batch.
//!
//! * [`element_reader`] – SBDB-style JSON orbital element files.
//! * [`series_csv`] – computed and reference series, annotated series and reports.
pub mod element_reader;
pub mod series_csv;
