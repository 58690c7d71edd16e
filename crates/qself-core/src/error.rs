use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by qself.
#[derive(Error, Debug)]
pub enum QselfError {
    /// The delimited activity text could not be parsed.
    #[error("Failed to parse activity CSV: {0}")]
    Parse(#[from] csv::Error),

    /// The wellness upload is not a valid ZIP container.
    #[error("Invalid ZIP archive: {0}")]
    Container(#[from] zip::result::ZipError),

    /// A recognized archive entry holds malformed JSON.
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A recognized archive entry is missing a required key.
    #[error("Entry {entry}: missing required key \"{key}\"")]
    MissingKey { entry: String, key: String },

    /// A recognized archive entry has the wrong JSON shape.
    #[error("Entry {entry}: expected {expected}")]
    Shape { entry: String, expected: String },

    /// An upload file could not be read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the qself crates.
pub type Result<T> = std::result::Result<T, QselfError>;
