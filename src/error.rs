// ⚠️ Error Taxonomy
// Every failure the catalog, codecs and validator can surface

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the Pokédex core.
#[derive(Debug, Error)]
pub enum DexError {
    /// Bad numeric input at the stat level (negative or non-integer)
    #[error("validation error: {0}")]
    Validation(String),

    /// Raw string field failed its pattern contract
    #[error("format error: {0}")]
    Format(String),

    /// Keyed access to a stat that doesn't exist
    #[error("unknown stat '{0}'")]
    UnknownField(String),

    /// Kind/category could not be resolved while rebuilding a record
    #[error("unknown category for '{record}': {category:?}")]
    UnknownCategory { record: String, category: String },

    /// Lookup by name or national number failed
    #[error("no Pokémon found with {key}: {value}")]
    NotFound { key: &'static str, value: String },

    /// Malformed value in the text block format
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Save requested but no file is associated with the catalog
    #[error("no {0} file path set for saving")]
    MissingPath(&'static str),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DexError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DexError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the lookup failure the boolean convenience calls swallow
    pub fn is_not_found(&self) -> bool {
        matches!(self, DexError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, DexError>;
