// 🧾 JSON Array Format
// One structured object per record, pretty-printed with 4-space indent

use super::{CatalogCodec, Format};
use crate::entities::{Record, StructuredRecord};
use crate::error::Result;
use serde::Serialize;

pub struct JsonCodec;

impl JsonCodec {
    pub fn new() -> Self {
        JsonCodec
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogCodec for JsonCodec {
    fn format(&self) -> Format {
        Format::Json
    }

    fn encode(&self, records: &[Record]) -> Result<String> {
        let docs: Vec<StructuredRecord> = records.iter().map(Record::structured).collect();

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        docs.serialize(&mut serializer)?;

        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// All-or-nothing: one unresolvable element fails the whole decode
    fn decode(&self, input: &str) -> Result<Vec<Record>> {
        let docs: Vec<StructuredRecord> = serde_json::from_str(input)?;
        docs.iter().map(Record::from_structured).collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
