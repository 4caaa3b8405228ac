use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the data layer.
///
/// Per-cell problems never show up here: they are replaced by missing values
/// or the `Unknown` category during normalization.
#[derive(Debug, Error)]
pub enum DataError {
    /// The source is absent or its metadata cannot be read.
    #[error("cannot read data source {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source was found but cannot be turned into incident records.
    #[error("unusable data source {}: {message}", path.display())]
    Format { path: PathBuf, message: String },
}

impl DataError {
    pub fn format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        DataError::Format {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the error is a missing or unreadable source.
    pub fn is_load(&self) -> bool {
        matches!(self, DataError::Load { .. })
    }

    /// Whether the error is a structurally unusable source.
    pub fn is_format(&self) -> bool {
        matches!(self, DataError::Format { .. })
    }
}
