use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriftError {
    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON element file error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("UTF-8 Path error: {0}")]
    Utf8PathError(String),

    #[error("Invalid drift parameter: {0}")]
    InvalidDriftParameter(String),

    #[error("Invalid orbital elements for {body}: {reason}")]
    InvalidElements { body: String, reason: String },

    #[error("Missing orbital element field '{field}' for {body}")]
    MissingElementField { body: String, field: &'static str },

    #[error("No overlapping computed/reference data found")]
    NoOverlappingData,

    #[error("Logging setup failed: {0}")]
    LoggingError(String),
}

impl PartialEq for DriftError {
    fn eq(&self, other: &Self) -> bool {
        use DriftError::*;
        match (self, other) {
            // Not comparable: equal when same variant
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (JsonError(_), JsonError(_)) => true,

            (Utf8PathError(a), Utf8PathError(b)) => a == b,
            (InvalidDriftParameter(a), InvalidDriftParameter(b)) => a == b,
            (
                InvalidElements {
                    body: b1,
                    reason: r1,
                },
                InvalidElements {
                    body: b2,
                    reason: r2,
                },
            ) => b1 == b2 && r1 == r2,
            (
                MissingElementField {
                    body: b1,
                    field: f1,
                },
                MissingElementField {
                    body: b2,
                    field: f2,
                },
            ) => b1 == b2 && f1 == f2,

            (NoOverlappingData, NoOverlappingData) => true,
            (LoggingError(a), LoggingError(b)) => a == b,

            _ => false,
        }
    }
}
