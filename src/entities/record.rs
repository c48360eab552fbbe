// 🐾 Record - One Pokédex entry
//
// A single record type parameterized by its Kind. The kind is the only
// thing that differs between Charmander, Oddish or a user-added Pokémon,
// and it fixes the category for the record's whole lifetime.

use super::category::Category;
use super::format_float;
use super::stats::{StatBlock, StatField, StatMap};
use crate::error::{DexError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// KIND
// ============================================================================

/// Reconstruction/display tag. Four named species plus a generic fallback
/// per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Charmander,
    Vulpix,
    Bulbasaur,
    Oddish,
    GenericFire,
    GenericGrass,
}

impl Kind {
    /// Species with their own kind tag
    pub const NAMED: [Kind; 4] = [Kind::Charmander, Kind::Vulpix, Kind::Bulbasaur, Kind::Oddish];

    pub fn tag(&self) -> &'static str {
        match self {
            Kind::Charmander => "Charmander",
            Kind::Vulpix => "Vulpix",
            Kind::Bulbasaur => "Bulbasaur",
            Kind::Oddish => "Oddish",
            Kind::GenericFire => "GenericFire",
            Kind::GenericGrass => "GenericGrass",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Kind::Charmander | Kind::Vulpix | Kind::GenericFire => Category::Fire,
            Kind::Bulbasaur | Kind::Oddish | Kind::GenericGrass => Category::Grass,
        }
    }

    /// Fallback kind for a category
    pub fn generic(category: Category) -> Kind {
        match category {
            Category::Fire => Kind::GenericFire,
            Category::Grass => Kind::GenericGrass,
        }
    }

    /// Exact tag match against the named species ("Vulpix", not "vulpix")
    pub fn named_from_tag(tag: &str) -> Option<Kind> {
        Kind::NAMED.into_iter().find(|k| k.tag() == tag)
    }

    /// Case-insensitive match of a Pokémon name against the named species
    pub fn named_from_name(name: &str) -> Option<Kind> {
        let wanted = name.trim().to_lowercase();
        Kind::NAMED
            .into_iter()
            .find(|k| k.tag().to_lowercase() == wanted)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ============================================================================
// STRUCTURED FORM (JSON element)
// ============================================================================

/// Nested value used by the JSON format.
///
/// Older files use `class` and `type` for the first two keys; both are accepted on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredRecord {
    #[serde(default, alias = "class")]
    pub kind: String,

    #[serde(default, alias = "type")]
    pub category: String,

    #[serde(default = "default_national_no")]
    pub national_no: String,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_species")]
    pub species: String,

    #[serde(default)]
    pub height_m: f64,

    #[serde(default)]
    pub weight_kg: f64,

    #[serde(default)]
    pub abilities: Vec<String>,

    #[serde(default)]
    pub stats: StatMap,
}

fn default_national_no() -> String {
    "0000".to_string()
}

fn default_name() -> String {
    "Unknown".to_string()
}

fn default_species() -> String {
    "???".to_string()
}

// ============================================================================
// RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: String,
    name: String,
    species: String,
    height_m: f64,
    weight_kg: f64,
    abilities: Vec<String>,
    stats: StatBlock,
    kind: Kind,
}

impl Record {
    /// Empty record of the given kind, to be filled with the `with_*` builders.
    ///
    /// Builders take already-validated values (see `validator`).
    pub fn new(kind: Kind) -> Self {
        Record {
            id: "0".to_string(),
            name: default_name(),
            species: default_species(),
            height_m: 0.0,
            weight_kg: 0.0,
            abilities: Vec::new(),
            stats: StatBlock::default(),
            kind,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = species.into();
        self
    }

    pub fn with_height(mut self, height_m: f64) -> Self {
        self.height_m = height_m;
        self
    }

    pub fn with_weight(mut self, weight_kg: f64) -> Self {
        self.weight_kg = weight_kg;
        self
    }

    pub fn with_abilities<I, S>(mut self, abilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abilities = abilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_stats(mut self, stats: StatBlock) -> Self {
        self.stats = stats;
        self
    }

    // Accessors

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn species(&self) -> &str {
        &self.species
    }

    pub fn height_m(&self) -> f64 {
        self.height_m
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn abilities(&self) -> &[String] {
        &self.abilities
    }

    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut StatBlock {
        &mut self.stats
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Replace all six descriptive fields at once.
    ///
    /// Nothing is written unless both measurements are valid.
    pub fn update_basic_info(
        &mut self,
        name: impl Into<String>,
        id: impl Into<String>,
        species: impl Into<String>,
        height_m: f64,
        weight_kg: f64,
        abilities: Vec<String>,
    ) -> Result<()> {
        let height_m = checked_measure("height", height_m)?;
        let weight_kg = checked_measure("weight", weight_kg)?;

        self.name = name.into();
        self.id = id.into();
        self.species = species.into();
        self.height_m = height_m;
        self.weight_kg = weight_kg;
        self.abilities = abilities;
        Ok(())
    }

    /// Abilities as stored in the text format (`Overgrow;Chlorophyll`)
    pub fn joined_abilities(&self) -> String {
        self.abilities.join(";")
    }

    /// Multi-line human readable rendering (starts with an empty line)
    pub fn describe(&self) -> String {
        let mut out = String::new();
        out.push('\n');
        out.push_str(&format!("National Number: {}\n", self.id));
        out.push_str(&format!("Name: {}\n", self.name));
        out.push_str(&format!("Type: {}\n", self.category().label()));
        out.push_str(&format!("Species: {}\n", self.species));
        out.push_str(&format!("Height: {} m\n", format_float(self.height_m)));
        out.push_str(&format!("Weight: {} kg\n", format_float(self.weight_kg)));
        out.push_str(&format!("Abilities: {}\n", self.joined_abilities()));
        out.push_str("Stats:\n");
        for field in StatField::ALL {
            out.push_str(&format!("  {}: {}\n", field.label(), self.stats.stat(field)));
        }
        out.push_str(&format!("  Total: {}", self.stats.total()));
        out
    }

    /// Flat string map used by the text format
    pub fn row(&self) -> BTreeMap<&'static str, String> {
        let mut row = BTreeMap::new();
        row.insert("national_no", self.id.clone());
        row.insert("name", self.name.clone());
        row.insert("type", self.category().label().to_string());
        row.insert("species", self.species.clone());
        row.insert("height_m", format_float(self.height_m));
        row.insert("weight_kg", format_float(self.weight_kg));
        row.insert("abilities", self.joined_abilities());
        for field in StatField::ALL {
            row.insert(field.key(), self.stats.stat(field).to_string());
        }
        row.insert("total", self.stats.total().to_string());
        row
    }

    /// Nested form used by the JSON format
    pub fn structured(&self) -> StructuredRecord {
        StructuredRecord {
            kind: self.kind.tag().to_string(),
            category: self.category().label().to_string(),
            national_no: self.id.clone(),
            name: self.name.clone(),
            species: self.species.clone(),
            height_m: self.height_m,
            weight_kg: self.weight_kg,
            abilities: self.abilities.clone(),
            stats: self.stats.to_map(),
        }
    }

    /// Rebuild a record from its structured form.
    ///
    /// Kind resolution: exact named-species tag, else the category tag
    /// (case-insensitive), else `UnknownCategory`.
    pub fn from_structured(doc: &StructuredRecord) -> Result<Record> {
        let kind = Kind::named_from_tag(&doc.kind)
            .or_else(|| Category::parse(&doc.category).map(Kind::generic))
            .ok_or_else(|| DexError::UnknownCategory {
                record: doc.name.clone(),
                category: doc.category.clone(),
            })?;

        Ok(Record::new(kind)
            .with_id(doc.national_no.clone())
            .with_name(doc.name.clone())
            .with_species(doc.species.clone())
            .with_height(checked_measure("height", doc.height_m)?)
            .with_weight(checked_measure("weight", doc.weight_kg)?)
            .with_abilities(doc.abilities.iter().cloned())
            .with_stats(StatBlock::from_map(&doc.stats)?))
    }
}

/// Heights and weights are finite and non-negative
pub(crate) fn checked_measure(what: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(DexError::Validation(format!(
            "{} must be a non-negative number, got {}",
            what, value
        )))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bulbasaur() -> Record {
        Record::new(Kind::Bulbasaur)
            .with_id("0001")
            .with_name("Bulbasaur")
            .with_species("Seed Pokémon")
            .with_height(0.7)
            .with_weight(6.9)
            .with_abilities(["Overgrow", "Chlorophyll"])
            .with_stats(StatBlock::new(45, 49, 49, 65, 65, 45).unwrap())
    }

    #[test]
    fn test_defaults() {
        let record = Record::new(Kind::GenericFire);
        assert_eq!(record.id(), "0");
        assert_eq!(record.name(), "Unknown");
        assert_eq!(record.species(), "???");
        assert!(record.abilities().is_empty());
        assert_eq!(record.stats().total(), 0);
        assert_eq!(record.category(), Category::Fire);
    }

    #[test]
    fn test_describe_format() {
        let expected = "\nNational Number: 0001\n\
Name: Bulbasaur\n\
Type: Grass\n\
Species: Seed Pokémon\n\
Height: 0.7 m\n\
Weight: 6.9 kg\n\
Abilities: Overgrow;Chlorophyll\n\
Stats:\n\
\x20 HP: 45\n\
\x20 Attack: 49\n\
\x20 Defense: 49\n\
\x20 Special Attack: 65\n\
\x20 Special Defense: 65\n\
\x20 Speed: 45\n\
\x20 Total: 318";
        assert_eq!(bulbasaur().describe(), expected);
    }

    #[test]
    fn test_describe_whole_floats_keep_decimal() {
        let record = Record::new(Kind::Vulpix).with_height(1.0).with_weight(10.0);
        let text = record.describe();
        assert!(text.contains("Height: 1.0 m\n"), "Got: {}", text);
        assert!(text.contains("Weight: 10.0 kg\n"), "Got: {}", text);
        assert!(text.contains("Type: Fire\n"));
    }

    #[test]
    fn test_row_flattens_fields() {
        let row = bulbasaur().row();
        assert_eq!(row["national_no"], "0001");
        assert_eq!(row["type"], "Grass");
        assert_eq!(row["abilities"], "Overgrow;Chlorophyll");
        assert_eq!(row["height_m"], "0.7");
        assert_eq!(row["sp_atk"], "65");
        assert_eq!(row["total"], "318");
    }

    #[test]
    fn test_structured_round_trip() {
        let original = bulbasaur();
        let doc = original.structured();
        assert_eq!(doc.kind, "Bulbasaur");
        assert_eq!(doc.category, "Grass");
        assert_eq!(doc.abilities, vec!["Overgrow", "Chlorophyll"]);

        let restored = Record::from_structured(&doc).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_generic_round_trip_keeps_kind() {
        let original = Record::new(Kind::GenericGrass).with_name("Tangela").with_id("0114");
        let restored = Record::from_structured(&original.structured()).unwrap();
        assert_eq!(restored.kind(), Kind::GenericGrass);
        assert_eq!(restored, original);
    }

    #[test]
    fn test_from_structured_kind_wins_over_category() {
        let mut doc = bulbasaur().structured();
        doc.kind = "Charmander".to_string();
        doc.category = "grass".to_string();
        let record = Record::from_structured(&doc).unwrap();
        assert_eq!(record.kind(), Kind::Charmander);
        assert_eq!(record.category(), Category::Fire);
    }

    #[test]
    fn test_from_structured_falls_back_to_category() {
        let mut doc = bulbasaur().structured();
        doc.kind = "GenericFirePokemon".to_string();
        doc.category = "FIRE".to_string();
        assert_eq!(Record::from_structured(&doc).unwrap().kind(), Kind::GenericFire);
    }

    #[test]
    fn test_from_structured_unknown_category() {
        let mut doc = bulbasaur().structured();
        doc.kind = "Squirtle".to_string();
        doc.category = "water".to_string();
        let err = Record::from_structured(&doc).unwrap_err();
        assert!(matches!(err, DexError::UnknownCategory { .. }), "Got {:?}", err);
    }

    #[test]
    fn test_from_structured_rejects_negative_stats() {
        let mut doc = bulbasaur().structured();
        doc.stats.insert("hp".to_string(), -1);
        assert!(matches!(Record::from_structured(&doc), Err(DexError::Validation(_))));
    }

    #[test]
    fn test_update_basic_info_keeps_category_and_stats() {
        let mut record = bulbasaur();
        record
            .update_basic_info("Bulby", "0099", "Seed", 1.5, 20.25, vec!["Leaf Guard".to_string()])
            .unwrap();

        assert_eq!(record.name(), "Bulby");
        assert_eq!(record.id(), "0099");
        assert_eq!(record.height_m(), 1.5);
        assert_eq!(record.abilities(), ["Leaf Guard".to_string()]);
        assert_eq!(record.kind(), Kind::Bulbasaur);
        assert_eq!(record.stats().total(), 318);
    }

    #[test]
    fn test_update_basic_info_is_all_or_nothing() {
        let mut record = bulbasaur();
        let err = record
            .update_basic_info("Bulby", "0099", "Seed", 1.5, -3.0, Vec::new())
            .unwrap_err();
        assert!(matches!(err, DexError::Validation(_)));
        assert_eq!(record, bulbasaur(), "Failed update must leave the record untouched");
    }

    #[test]
    fn test_kind_lookup() {
        assert_eq!(Kind::named_from_name("ODDISH"), Some(Kind::Oddish));
        assert_eq!(Kind::named_from_name("Pikachu"), None);
        assert_eq!(Kind::named_from_tag("vulpix"), None, "Tag match is exact");
        assert_eq!(Kind::named_from_tag("GenericFire"), None, "Generic tags resolve via category");
        assert_eq!(Kind::generic(Category::Grass), Kind::GenericGrass);
    }
}
