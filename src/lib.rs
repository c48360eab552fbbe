// Pokédex - Core Library
// Record catalog for Fire and Grass Pokémon with text/JSON persistence,
// type reports and chart data. Used by the CLI, the TUI and tests.

pub mod error;
pub mod entities;
pub mod codec;
pub mod validator;
pub mod catalog;
pub mod config;
pub mod chart;

// Re-export commonly used types
pub use error::{DexError, Result};
pub use entities::{
    average_stats, format_float, parse_stat_value,
    Category, Kind, Record, StatAverages, StatBlock, StatField, StatMap, StructuredRecord,
};
pub use codec::{codec_for, CatalogCodec, Format, JsonCodec, TextCodec};
pub use validator::{BasicField, RawEntry, Validator};
pub use catalog::Catalog;
pub use config::DexConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
