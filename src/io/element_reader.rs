//! # Orbital element files
//!
//! Reads SBDB-style JSON element files:
//!
//! ```json
//! {
//!   "object": { "fullname": "1 Ceres (A801 AA)" },
//!   "orbit": {
//!     "elements": [
//!       { "name": "a",  "value": "2.7672" },
//!       { "name": "e",  "value": 0.0785 },
//!       { "name": "i",  "value": "10.588" },
//!       { "name": "om", "value": "80.267" },
//!       { "name": "w",  "value": "73.598" },
//!       { "name": "ma", "value": "291.4" }
//!     ]
//!   }
//! }
//! ```
//!
//! Values may be JSON strings or numbers; angles are in degrees. Entries without a usable
//! value are ignored, and any element still absent is handled by the
//! [`MissingFieldPolicy`]. The body name is the file stem.
use std::collections::HashMap;
use std::fs;

use ahash::RandomState;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use tracing::debug;

use crate::diagnostics::{Audited, DataQualityWarning};
use crate::drift_errors::DriftError;
use crate::drift_params::MissingFieldPolicy;
use crate::orbital_elements::OrbitalElementSet;
use crate::propagator::NamedElements;

/// Element names, in the order `(a, e, i, Ω, ω, M₀)`.
pub const ELEMENT_FIELDS: [&str; 6] = ["a", "e", "i", "om", "w", "ma"];

#[derive(Debug, Deserialize, Default)]
struct SbdbFile {
    #[serde(default)]
    orbit: SbdbOrbit,
}

#[derive(Debug, Deserialize, Default)]
struct SbdbOrbit {
    #[serde(default)]
    elements: Vec<SbdbElement>,
}

#[derive(Debug, Deserialize)]
struct SbdbElement {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    value: Option<NumberOrString>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

impl NumberOrString {
    fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(v) => Some(*v),
            NumberOrString::String(s) => s.trim().parse().ok(),
        }
    }
}

/// Parse the JSON text of one element file.
///
/// Arguments
/// -----------------
/// * `body`: Name given to the body (used in warnings and as the result name).
/// * `json`: File contents.
/// * `policy`: What to do with absent elements.
///
/// Return
/// ----------
/// * The named elements, with a `MissingElementField` warning per zero-filled field.
/// * `Err(DriftError::JsonError)` on malformed JSON.
/// * `Err(DriftError::MissingElementField)` for the first absent field under
///   [`MissingFieldPolicy::FailFast`].
pub fn parse_elements(
    body: &str,
    json: &str,
    policy: MissingFieldPolicy,
) -> Result<Audited<NamedElements>, DriftError> {
    let file: SbdbFile = serde_json::from_str(json)?;

    let values: HashMap<&str, f64, RandomState> = file
        .orbit
        .elements
        .iter()
        .filter_map(|el| Some((el.name.as_deref()?, el.value.as_ref()?.as_f64()?)))
        .collect();

    let mut warnings = Vec::new();
    let mut fields = [0.0; 6];
    for (slot, field) in fields.iter_mut().zip(ELEMENT_FIELDS) {
        match values.get(field) {
            Some(v) => *slot = *v,
            None => match policy {
                MissingFieldPolicy::FailFast => {
                    return Err(DriftError::MissingElementField {
                        body: body.to_string(),
                        field,
                    })
                }
                MissingFieldPolicy::DefaultToZero => {
                    warnings.push(DataQualityWarning::MissingElementField {
                        body: body.to_string(),
                        field,
                    });
                }
            },
        }
    }

    let [a, e, i, om, w, ma] = fields;
    let elements = OrbitalElementSet::from_degrees_unchecked(a, e, i, om, w, ma);

    let mut out = Audited::new(NamedElements::new(body, elements));
    warnings.into_iter().for_each(|w| out.push(w));
    Ok(out)
}

/// Read one element file; the body name is the file stem.
pub fn read_element_file(
    path: &Utf8Path,
    policy: MissingFieldPolicy,
) -> Result<Audited<NamedElements>, DriftError> {
    let body = path
        .file_stem()
        .ok_or_else(|| DriftError::Utf8PathError(format!("no file stem in {path}")))?;
    let json = fs::read_to_string(path)?;
    debug!(%path, body, "reading element file");
    parse_elements(body, &json, policy)
}

/// List the files of `dir` with the given extension, sorted by path.
pub(crate) fn list_files(dir: &Utf8Path, extension: &str) -> Result<Vec<Utf8PathBuf>, DriftError> {
    let mut files = Vec::new();
    for entry in dir.read_dir_utf8()? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension() == Some(extension) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Read every `*.json` file of `dir`, in file-name order.
pub fn read_element_dir(
    dir: &Utf8Path,
    policy: MissingFieldPolicy,
) -> Result<Audited<Vec<NamedElements>>, DriftError> {
    let mut out = Audited::new(Vec::new());
    for path in list_files(dir, "json")? {
        let body = read_element_file(&path, policy)?;
        let named = body.drain_into(&mut out.warnings);
        out.value.push(named);
    }
    Ok(out)
}
