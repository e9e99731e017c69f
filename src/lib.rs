//! Keplerian propagation of small solar-system bodies and z-score anomaly detection of the
//! propagated trajectories against a reference ephemeris.
//!
//! See [`pipeline`] for the end-to-end batch and [`drift_params`] for the configuration.
pub mod aligner;
pub mod classifier;
pub mod comparison;
pub mod constants;
pub mod date_normalization;
pub mod diagnostics;
pub mod display;
pub mod drift_errors;
pub mod drift_params;
pub mod io;
pub mod kepler;
pub mod logging;
pub mod orbital_elements;
pub mod pipeline;
pub mod propagator;
pub mod ref_system;
pub mod statistics;
pub mod time_series;

pub use diagnostics::{Audited, DataQualityWarning};
pub use drift_errors::DriftError;
pub use drift_params::{DriftParams, MissingFieldPolicy, PipelinePaths};
pub use orbital_elements::OrbitalElementSet;
pub use pipeline::{BatchReport, DriftPipeline, ObjectReport};
pub use propagator::{NamedElements, StatePropagator};
