use thiserror::Error;

use crate::model::FeatureId;

/// Errors surfaced by board IO, configuration, and session bookkeeping.
///
/// Nothing on the pointer path returns one of these; dragging degrades by
/// clamping instead.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required columns. Found headers: {found:?}. Need columns for: title, type")]
    MissingColumns { found: Vec<String> },

    #[error("No valid features found in CSV ({skipped} rows skipped)")]
    EmptyImport { skipped: usize },

    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),

    #[error("A drag session is already active for feature {0}")]
    SessionActive(FeatureId),

    #[error("Could not determine a configuration directory")]
    ConfigDir,
}

pub type Result<T> = std::result::Result<T, BoardError>;
