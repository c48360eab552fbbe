// 💾 Codec Framework
// Two interchangeable on-disk representations of the full record list

pub mod json;
pub mod text;

pub use json::JsonCodec;
pub use text::TextCodec;

use crate::entities::Record;
use crate::error::{DexError, Result};
use std::fmt;
use std::path::Path;

// ============================================================================
// FORMAT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Blank-line separated `Key: Value` blocks (`.txt`)
    Text,
    /// Pretty-printed array of structured records (`.json`)
    Json,
}

impl Format {
    pub fn name(&self) -> &'static str {
        match self {
            Format::Text => "text",
            Format::Json => "JSON",
        }
    }

    /// Pick the format from the file extension (case-insensitive)
    pub fn detect(path: &Path) -> Result<Format> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "txt" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            _ => Err(DexError::Format(format!(
                "unsupported file type '{}': use .txt or .json",
                path.display()
            ))),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// CODEC TRAIT
// ============================================================================

/// Encode/decode the whole record list for one file format.
///
/// Codecs are pure: file access, missing-file policy and the dirty flag
/// belong to the `Catalog`.
pub trait CatalogCodec: Send + Sync {
    fn format(&self) -> Format;

    fn encode(&self, records: &[Record]) -> Result<String>;

    /// Decode every record or fail as a whole
    fn decode(&self, input: &str) -> Result<Vec<Record>>;
}

/// Factory: boxed codec for a format
pub fn codec_for(format: Format) -> Box<dyn CatalogCodec> {
    match format {
        Format::Text => Box::new(TextCodec::new()),
        Format::Json => Box::new(JsonCodec::new()),
    }
}
