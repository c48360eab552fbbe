// Entity Models
//
// - StatBlock: six stats + derived total
// - Record: one Pokédex entry, tagged by Kind
// - Category: Fire/Grass grouping and per-category averages

pub mod stats;
pub mod record;
pub mod category;

pub use stats::{parse_stat_value, StatBlock, StatField, StatMap};
pub use record::{Kind, Record, StructuredRecord};
pub use category::{average_stats, Category, StatAverages};

/// Render a float the way the Pokédex files always have: whole numbers
/// keep one decimal (`7.0`), everything else uses the shortest form (`0.7`).
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
