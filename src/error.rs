use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Invalid page range '{token}': {reason}")]
    InvalidRange { token: String, reason: String },

    #[error("Invalid page number '{token}': {reason}")]
    InvalidPage { token: String, reason: String },

    #[error("No valid pages in '{spec}' (document has {total} pages)")]
    NoValidPages { spec: String, total: u32 },

    #[error("Input file '{}' not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read PDF {}: {reason}", .path.display())]
    DocumentRead { path: PathBuf, reason: String },

    #[error("Failed to write PDF {}: {reason}", .path.display())]
    DocumentWrite { path: PathBuf, reason: String },
}

impl SplitError {
    pub fn read<P: Into<PathBuf>>(path: P, reason: impl ToString) -> Self {
        SplitError::DocumentRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn write<P: Into<PathBuf>>(path: P, reason: impl ToString) -> Self {
        SplitError::DocumentWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
