//! Error types shared by the pipeline steps

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GlyphsheetError>;

#[derive(Debug, Error)]
pub enum GlyphsheetError {
    /// No source tables in the resources directory
    #[error("no *.{extension} files found in {}", dir.display())]
    InputNotFound { dir: PathBuf, extension: String },

    /// A file could not be read or written
    #[error("failed to access {}: {source}", path.display())]
    ResourceLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// fontdue rejected the font data
    #[error("failed to parse font {}: {reason}", path.display())]
    FontParse { path: PathBuf, reason: &'static str },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// PNG encoder failure
    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: png::EncodingError,
    },
}

impl GlyphsheetError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ResourceLoad {
            path: path.into(),
            source,
        }
    }
}
