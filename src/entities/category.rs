// 🔥🌿 Category - Fire / Grass partition of the Pokédex
//
// Not a stored entity: a grouping key with fixed descriptive text,
// plus the per-category average-stats aggregate.

use super::record::Record;
use super::stats::StatField;
use super::format_float;
use std::collections::BTreeMap;
use std::fmt;

const FIRE_INFO: &str = "Fire is one of the three basic elemental types along with Water and Grass. \
Fire types are rare in early games, but often powerful.\n\
In Generations 1-3, all Fire type moves were categorized as Special.";

const GRASS_INFO: &str = "Grass is one of the three basic elemental types along with Fire and Water, \
which constitute the three starter Pokémon. Grass is weak defensively, \
with 5 weaknesses and many resistances.\n\
In Generations 1-3, all Grass type moves were categorized as Special.";

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Fire,
    Grass,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Fire, Category::Grass];

    /// Display label ("Fire")
    pub fn label(&self) -> &'static str {
        match self {
            Category::Fire => "Fire",
            Category::Grass => "Grass",
        }
    }

    /// Lowercase key, also the report file stem ("fire")
    pub fn key(&self) -> &'static str {
        match self {
            Category::Fire => "fire",
            Category::Grass => "grass",
        }
    }

    /// Fixed descriptive text shared by every member
    pub fn info(&self) -> &'static str {
        match self {
            Category::Fire => FIRE_INFO,
            Category::Grass => GRASS_INFO,
        }
    }

    /// `[Type: Fire]` label line followed by the descriptive text
    pub fn description(&self) -> String {
        format!("[Type: {}]\n{}", self.label(), self.info())
    }

    /// Case-insensitive lookup ("FIRE", " grass ")
    pub fn parse(name: &str) -> Option<Category> {
        let wanted = name.trim().to_lowercase();
        Category::ALL.into_iter().find(|c| c.key() == wanted)
    }

    /// Per-field mean of every record in this category, one decimal place.
    ///
    /// Returns `None` when the category has no members.
    pub fn average_stats(&self, records: &[Record]) -> Option<StatAverages> {
        average_stats(records, *self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// AVERAGES
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct StatAverages {
    /// Number of records averaged
    pub count: usize,
    values: BTreeMap<StatField, f64>,
}

impl StatAverages {
    pub fn get(&self, field: StatField) -> f64 {
        self.values.get(&field).copied().unwrap_or(0.0)
    }

    /// Values in `StatField::ALL` order
    pub fn values(&self) -> Vec<f64> {
        StatField::ALL.iter().map(|f| self.get(*f)).collect()
    }

    /// `  HP 42.0, Atk 50.5, Def 46.0, SpA 62.5, SpD 57.5, Spe 55.0`
    pub fn summary_line(&self) -> String {
        let parts: Vec<String> = StatField::ALL
            .iter()
            .map(|f| format!("{} {}", f.short_label(), format_float(self.get(*f))))
            .collect();
        format!("  {}", parts.join(", "))
    }
}

/// Mean of each stat across the records of `category`, rounded to 1 decimal
pub fn average_stats(records: &[Record], category: Category) -> Option<StatAverages> {
    let members: Vec<&Record> = records
        .iter()
        .filter(|r| r.category() == category)
        .collect();

    if members.is_empty() {
        return None;
    }

    let count = members.len();
    let values = StatField::ALL
        .iter()
        .map(|field| {
            let sum: u64 = members
                .iter()
                .map(|r| u64::from(r.stats().stat(*field)))
                .sum();
            (*field, round_one(sum as f64 / count as f64))
        })
        .collect();

    Some(StatAverages { count, values })
}

/// One decimal place, exact ties to even (`42.25` → `42.2`, `42.35` → `42.4`)
pub(crate) fn round_one(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

// ============================================================================
// TESTS
// ============================================================================
