// 🛂 Input Validation - strict formats for raw user input
//
//   National Number  "No. 0034"
//   Height           "1.7 m"    (at most 2 decimals, one space)
//   Weight           "6.90 kg"
//   Name / Species   letters and spaces
//   Abilities        letters, spaces, commas, semicolons
//
// Raw strings are checked here before anything reaches the catalog.

use crate::entities::{parse_stat_value, Category, Kind, Record, StatBlock};
use crate::error::{DexError, Result};
use regex::Regex;
use std::sync::LazyLock;

static NATIONAL_NO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^No\. \d{4}$").expect("static pattern"));
static HEIGHT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+(?:\.\d{1,2})? m$").expect("static pattern"));
static WEIGHT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+(?:\.\d{1,2})? kg$").expect("static pattern"));
static NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z ]+$").expect("static pattern"));
static ABILITIES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z ,;]+$").expect("static pattern"));

// ============================================================================
// VALIDATOR
// ============================================================================

pub struct Validator;

impl Validator {
    pub fn valid_national_no(value: &str) -> bool {
        NATIONAL_NO.is_match(value)
    }

    pub fn valid_height(value: &str) -> bool {
        HEIGHT.is_match(value)
    }

    pub fn valid_weight(value: &str) -> bool {
        WEIGHT.is_match(value)
    }

    /// Also used for species
    pub fn valid_name(value: &str) -> bool {
        NAME.is_match(value)
    }

    pub fn valid_abilities(value: &str) -> bool {
        ABILITIES.is_match(value)
    }

    /// `"No. 0034"` → `"0034"`
    pub fn parse_national_no(value: &str) -> Result<String> {
        if !Self::valid_national_no(value) {
            return Err(DexError::Format(
                "National Number must be in format 'No. XXXX' (e.g., 'No. 0034')".to_string(),
            ));
        }
        Ok(value["No. ".len()..].to_string())
    }

    /// `"1.70 m"` → 1.7
    pub fn parse_height_m(value: &str) -> Result<f64> {
        if !Self::valid_height(value) {
            return Err(DexError::Format(
                "Height must include a space and unit, e.g., '1.70 m'".to_string(),
            ));
        }
        leading_number(value)
    }

    /// `"6.90 kg"` → 6.9
    pub fn parse_weight_kg(value: &str) -> Result<f64> {
        if !Self::valid_weight(value) {
            return Err(DexError::Format(
                "Weight must include a space and unit, e.g., '6.90 kg'".to_string(),
            ));
        }
        leading_number(value)
    }

    pub fn parse_name(value: &str) -> Result<String> {
        if !Self::valid_name(value) {
            return Err(DexError::Format(
                "Invalid name! Use only letters and spaces".to_string(),
            ));
        }
        Ok(value.to_string())
    }

    pub fn parse_species(value: &str) -> Result<String> {
        if !Self::valid_name(value) {
            return Err(DexError::Format(
                "Invalid species name! Use only letters and spaces".to_string(),
            ));
        }
        Ok(value.to_string())
    }

    /// `"Blaze; Solar Power"` → `["Blaze", "Solar Power"]`
    pub fn parse_abilities(value: &str) -> Result<Vec<String>> {
        if !Self::valid_abilities(value) {
            return Err(DexError::Format(
                "Invalid abilities format! Use only letters, commas, or semicolons".to_string(),
            ));
        }
        Ok(value
            .split(';')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(String::from)
            .collect())
    }

    /// Validate a single basic-info edit (`field` as shown in the menu)
    pub fn parse_basic_field(field: &str, value: &str) -> Result<BasicField> {
        match field.trim().to_lowercase().as_str() {
            "national_no" => Ok(BasicField::NationalNo(Self::parse_national_no(value)?)),
            "height_m" => Ok(BasicField::Height(Self::parse_height_m(value)?)),
            "weight_kg" => Ok(BasicField::Weight(Self::parse_weight_kg(value)?)),
            "name" => Ok(BasicField::Name(Self::parse_name(value)?)),
            "species" => Ok(BasicField::Species(Self::parse_species(value)?)),
            "abilities" => Ok(BasicField::Abilities(Self::parse_abilities(value)?)),
            other => Err(DexError::UnknownField(other.to_string())),
        }
    }
}

fn leading_number(value: &str) -> Result<f64> {
    value
        .split_whitespace()
        .next()
        .and_then(|n| n.parse::<f64>().ok())
        .ok_or_else(|| DexError::Format(format!("'{}' is not a number", value)))
}

// ============================================================================
// BASIC FIELD EDIT
// ============================================================================

/// One validated descriptive field, applied through `Record::update_basic_info`
#[derive(Debug, Clone, PartialEq)]
pub enum BasicField {
    NationalNo(String),
    Height(f64),
    Weight(f64),
    Name(String),
    Species(String),
    Abilities(Vec<String>),
}

impl BasicField {
    /// Replace one field, carrying the other five over unchanged
    pub fn apply(self, record: &mut Record) -> Result<()> {
        let mut name = record.name().to_string();
        let mut id = record.id().to_string();
        let mut species = record.species().to_string();
        let mut height = record.height_m();
        let mut weight = record.weight_kg();
        let mut abilities = record.abilities().to_vec();

        match self {
            BasicField::NationalNo(v) => id = v,
            BasicField::Height(v) => height = v,
            BasicField::Weight(v) => weight = v,
            BasicField::Name(v) => name = v,
            BasicField::Species(v) => species = v,
            BasicField::Abilities(v) => abilities = v,
        }

        record.update_basic_info(name, id, species, height, weight, abilities)
    }
}

// ============================================================================
// RAW ENTRY (new Pokémon from user input)
// ============================================================================

/// Unvalidated fields for a new Pokémon, exactly as typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    pub type_name: String,
    pub national_no: String,
    pub name: String,
    pub species: String,
    pub height: String,
    pub weight: String,
    pub abilities: String,
    /// hp, attack, defense, sp_atk, sp_def, speed
    pub stats: [String; 6],
}

impl RawEntry {
    /// Number of `|`-separated fields in an entry line
    pub const FIELD_COUNT: usize = 13;

    /// Split a one-line entry:
    /// `Fire | No. 0037 | Vulpix | Fox | 0.6 m | 9.9 kg | Flash Fire | 38 | 41 | 40 | 50 | 65 | 65`
    pub fn parse_line(line: &str) -> Result<RawEntry> {
        let parts: Vec<String> = line.split('|').map(|p| p.trim().to_string()).collect();
        let Ok(fields) = <[String; RawEntry::FIELD_COUNT]>::try_from(parts) else {
            return Err(DexError::Format(format!(
                "expected {} '|'-separated fields: Type | No. | Name | Species | Height | Weight | Abilities | HP | Atk | Def | SpA | SpD | Spe",
                Self::FIELD_COUNT
            )));
        };

        let [type_name, national_no, name, species, height, weight, abilities, hp, attack, defense, sp_atk, sp_def, speed] =
            fields;

        Ok(RawEntry {
            type_name,
            national_no,
            name,
            species,
            height,
            weight,
            abilities,
            stats: [hp, attack, defense, sp_atk, sp_def, speed],
        })
    }

    /// Validate every field and build a generic record of the chosen type
    pub fn into_record(self) -> Result<Record> {
        let category = Category::parse(&self.type_name).ok_or_else(|| DexError::UnknownCategory {
            record: self.name.clone(),
            category: self.type_name.clone(),
        })?;

        let national_no = Validator::parse_national_no(&self.national_no)?;
        let name = Validator::parse_name(&self.name)?;
        let species = Validator::parse_species(&self.species)?;
        let height = Validator::parse_height_m(&self.height)?;
        let weight = Validator::parse_weight_kg(&self.weight)?;
        let abilities = Validator::parse_abilities(&self.abilities)?;

        let mut values = [0i64; 6];
        for (slot, raw) in values.iter_mut().zip(self.stats.iter()) {
            *slot = parse_stat_value(raw)?;
        }
        let [hp, attack, defense, sp_atk, sp_def, speed] = values;
        let stats = StatBlock::new(hp, attack, defense, sp_atk, sp_def, speed)?;

        Ok(Record::new(Kind::generic(category))
            .with_id(national_no)
            .with_name(name)
            .with_species(species)
            .with_height(height)
            .with_weight(weight)
            .with_abilities(abilities)
            .with_stats(stats))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const VULPIX_LINE: &str =
        "Fire | No. 0037 | Vulpix | Fox Pokemon | 0.6 m | 9.9 kg | Flash Fire;Drought | 38 | 41 | 40 | 50 | 65 | 65";

    #[test]
    fn test_national_no_format() {
        assert_eq!(Validator::parse_national_no("No. 0034").unwrap(), "0034");
        for bad in ["0034", "No.0034", "No. 34", "No.  0034", "No. 00345", "no. 0034"] {
            assert!(
                matches!(Validator::parse_national_no(bad), Err(DexError::Format(_))),
                "Should reject {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_height_and_weight_format() {
        assert_eq!(Validator::parse_height_m("1.70 m").unwrap(), 1.7);
        assert_eq!(Validator::parse_height_m("2 m").unwrap(), 2.0);
        assert_eq!(Validator::parse_weight_kg("6.9 kg").unwrap(), 6.9);

        assert!(Validator::parse_height_m("1.7m").is_err(), "Space before unit is required");
        assert!(Validator::parse_height_m("1.705 m").is_err(), "At most two decimals");
        assert!(Validator::parse_height_m("1.7 kg").is_err());
        assert!(Validator::parse_weight_kg("-3 kg").is_err());
        assert!(Validator::parse_weight_kg("6.9  kg").is_err());
    }

    #[test]
    fn test_name_and_abilities_format() {
        assert!(Validator::valid_name("Mr Mime"));
        assert!(!Validator::valid_name("Porygon2"));
        assert!(!Validator::valid_name(""));
        assert!(Validator::valid_abilities("Blaze, Solar Power;Drought"));
        assert!(!Validator::valid_abilities("Blaze!"));
        assert!(!Validator::valid_abilities(""), "Abilities may not be empty");

        assert_eq!(
            Validator::parse_abilities("Blaze; Solar Power;").unwrap(),
            vec!["Blaze", "Solar Power"]
        );
    }

    #[test]
    fn test_parse_basic_field() {
        assert_eq!(
            Validator::parse_basic_field("national_no", "No. 0010").unwrap(),
            BasicField::NationalNo("0010".to_string())
        );
        assert_eq!(
            Validator::parse_basic_field("HEIGHT_M", "0.3 m").unwrap(),
            BasicField::Height(0.3)
        );
        assert!(matches!(
            Validator::parse_basic_field("height_m", "0.3"),
            Err(DexError::Format(_))
        ));
        assert!(matches!(
            Validator::parse_basic_field("colour", "red"),
            Err(DexError::UnknownField(_))
        ));
    }

    #[test]
    fn test_basic_field_apply_changes_one_field() {
        let mut record = Record::new(Kind::Oddish)
            .with_id("0043")
            .with_name("Oddish")
            .with_weight(5.4)
            .with_abilities(["Chlorophyll"]);

        BasicField::Height(0.5).apply(&mut record).unwrap();

        assert_eq!(record.height_m(), 0.5);
        assert_eq!(record.weight_kg(), 5.4);
        assert_eq!(record.id(), "0043");
        assert_eq!(record.abilities(), ["Chlorophyll".to_string()]);
    }

    #[test]
    fn test_raw_entry_into_record() {
        let record = RawEntry::parse_line(VULPIX_LINE).unwrap().into_record().unwrap();

        assert_eq!(record.kind(), Kind::GenericFire, "New entries are always generic");
        assert_eq!(record.id(), "0037");
        assert_eq!(record.name(), "Vulpix");
        assert_eq!(record.height_m(), 0.6);
        assert_eq!(record.abilities().len(), 2);
        assert_eq!(record.stats().total(), 38 + 41 + 40 + 50 + 65 + 65);
    }

    #[test]
    fn test_raw_entry_wrong_field_count() {
        assert!(matches!(RawEntry::parse_line("Fire | No. 0001"), Err(DexError::Format(_))));
    }

    #[test]
    fn test_raw_entry_rejections() {
        let entry = RawEntry::parse_line(VULPIX_LINE).unwrap();

        let mut water = entry.clone();
        water.type_name = "Water".to_string();
        assert!(matches!(water.into_record(), Err(DexError::UnknownCategory { .. })));

        let mut bad_no = entry.clone();
        bad_no.national_no = "37".to_string();
        assert!(matches!(bad_no.into_record(), Err(DexError::Format(_))));

        let mut negative = entry.clone();
        negative.stats[2] = "-1".to_string();
        assert!(matches!(negative.into_record(), Err(DexError::Validation(_))));

        let mut not_a_number = entry;
        not_a_number.stats[0] = "many".to_string();
        assert!(matches!(not_a_number.into_record(), Err(DexError::Validation(_))));
    }
}
