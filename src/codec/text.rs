// 📄 Text Block Format
//
//   Name: Bulbasaur
//   National Number: No. 0001
//   Type: Grass
//   Species: Seed Pokémon
//   Height: 0.7 m
//   Weight: 6.9 kg
//   Abilities: Overgrow;Chlorophyll
//   Stats:
//     Total: 318
//     HP: 45
//     ...
//   <blank line>
//
// Field order is free on read. `Total` is written but never read back.

use super::{CatalogCodec, Format};
use crate::entities::record::checked_measure;
use crate::entities::{Category, Kind, Record, StatBlock, StatField};
use crate::error::{DexError, Result};
use std::collections::HashMap;

pub struct TextCodec;

impl TextCodec {
    pub fn new() -> Self {
        TextCodec
    }
}

impl Default for TextCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogCodec for TextCodec {
    fn format(&self) -> Format {
        Format::Text
    }

    fn encode(&self, records: &[Record]) -> Result<String> {
        let mut out = String::new();

        for record in records {
            let row = record.row();
            let field = |key: &str| row.get(key).map(String::as_str).unwrap_or_default();

            out.push_str(&format!("Name: {}\n", field("name")));
            out.push_str(&format!("National Number: No. {}\n", field("national_no")));
            out.push_str(&format!("Type: {}\n", field("type")));
            out.push_str(&format!("Species: {}\n", field("species")));
            out.push_str(&format!("Height: {} m\n", field("height_m")));
            out.push_str(&format!("Weight: {} kg\n", field("weight_kg")));
            out.push_str(&format!("Abilities: {}\n", field("abilities")));
            out.push_str("Stats:\n");
            out.push_str(&format!("  Total: {}\n", field("total")));
            for stat in StatField::ALL {
                out.push_str(&format!("  {}: {}\n", stat.label(), field(stat.key())));
            }
            out.push('\n');
        }

        Ok(out)
    }

    fn decode(&self, input: &str) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        let mut block = Block::default();

        for (index, raw) in input.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();

            if line.is_empty() {
                if !block.is_empty() {
                    records.push(std::mem::take(&mut block).into_record()?);
                }
                continue;
            }

            if line.starts_with("Stats:") {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            block.start_line.get_or_insert(line_no);

            if key == "Total" {
                continue;
            }

            match StatField::from_label(key) {
                Some(field) => {
                    block.stats.insert(field, parse_stat(value, line_no)?);
                }
                None => {
                    block.fields.insert(key.to_string(), (value.to_string(), line_no));
                }
            }
        }

        if !block.is_empty() {
            records.push(block.into_record()?);
        }

        Ok(records)
    }
}

// ============================================================================
// BLOCK ACCUMULATOR
// ============================================================================

#[derive(Default)]
struct Block {
    /// key → (value, line number)
    fields: HashMap<String, (String, usize)>,
    stats: HashMap<StatField, i64>,
    start_line: Option<usize>,
}

impl Block {
    fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.stats.is_empty()
    }

    fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(|(value, _)| value.as_str())
    }

    fn line_of(&self, key: &str) -> usize {
        self.fields
            .get(key)
            .map(|(_, line)| *line)
            .or(self.start_line)
            .unwrap_or(0)
    }

    fn into_record(self) -> Result<Record> {
        let name = self.field("Name").unwrap_or("Unknown").to_string();

        let kind = match Kind::named_from_name(&name) {
            Some(kind) => kind,
            None => {
                let type_name = self.field("Type").unwrap_or_default();
                Category::parse(type_name)
                    .map(Kind::generic)
                    .ok_or_else(|| DexError::UnknownCategory {
                        record: format!("{} (block at line {})", name, self.start_line.unwrap_or(0)),
                        category: type_name.to_string(),
                    })?
            }
        };

        let national_no = self
            .field("National Number")
            .unwrap_or("0000")
            .replace("No. ", "");
        let national_no = format!("{:0>4}", national_no.trim());

        let height = self.measure("Height")?;
        let weight = self.measure("Weight")?;

        let abilities: Vec<String> = self
            .field("Abilities")
            .unwrap_or_default()
            .split(';')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(String::from)
            .collect();

        let stat = |f: StatField| self.stats.get(&f).copied().unwrap_or(0);
        let stats = StatBlock::new(
            stat(StatField::Hp),
            stat(StatField::Attack),
            stat(StatField::Defense),
            stat(StatField::SpAtk),
            stat(StatField::SpDef),
            stat(StatField::Speed),
        )?;

        Ok(Record::new(kind)
            .with_id(national_no)
            .with_name(name)
            .with_species(self.field("Species").unwrap_or("???"))
            .with_height(height)
            .with_weight(weight)
            .with_abilities(abilities)
            .with_stats(stats))
    }

    /// `"0.7 m"` → 0.7; the unit suffix is dropped, a missing field is 0
    fn measure(&self, key: &str) -> Result<f64> {
        let Some(token) = self.field(key).and_then(|v| v.split_whitespace().next()) else {
            return Ok(0.0);
        };

        let value = token.parse::<f64>().map_err(|_| DexError::Parse {
            line: self.line_of(key),
            message: format!("{} '{}' is not a number", key, token),
        })?;

        checked_measure(key, value)
    }
}

fn parse_stat(value: &str, line: usize) -> Result<i64> {
    value
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<i64>().ok())
        .ok_or_else(|| DexError::Parse {
            line,
            message: format!("stat value '{}' is not an integer", value),
        })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Name: Bulbasaur
National Number: No. 0001
Type: Grass
Species: Seed Pokemon
Height: 0.7 m
Weight: 6.9 kg
Abilities: Overgrow;Chlorophyll
Stats:
  Total: 318
  HP: 45
  Attack: 49
  Defense: 49
  Special Attack: 65
  Special Defense: 65
  Speed: 45

Name: Ponyta
National Number: No. 0077
Type: Fire
Species: Fire Horse Pokemon
Height: 1.0 m
Weight: 30.0 kg
Abilities: Run Away;Flash Fire
Stats:
  Total: 410
  HP: 50
  Attack: 85
  Defense: 55
  Special Attack: 65
  Special Defense: 65
  Speed: 90
";

    fn charmander() -> Record {
        Record::new(Kind::Charmander)
            .with_id("0004")
            .with_name("Charmander")
            .with_species("Lizard Pokemon")
            .with_height(0.6)
            .with_weight(8.5)
            .with_abilities(["Blaze", "Solar Power"])
            .with_stats(StatBlock::new(39, 52, 43, 60, 50, 65).unwrap())
    }

    #[test]
    fn test_decode_sample() {
        let records = TextCodec::new().decode(SAMPLE).unwrap();
        assert_eq!(records.len(), 2);

        let bulbasaur = &records[0];
        assert_eq!(bulbasaur.kind(), Kind::Bulbasaur);
        assert_eq!(bulbasaur.id(), "0001");
        assert_eq!(bulbasaur.height_m(), 0.7);
        assert_eq!(bulbasaur.abilities(), ["Overgrow".to_string(), "Chlorophyll".to_string()]);
        assert_eq!(bulbasaur.stats().total(), 318);

        let ponyta = &records[1];
        assert_eq!(ponyta.kind(), Kind::GenericFire, "Unknown names fall back to Type");
        assert_eq!(ponyta.weight_kg(), 30.0);
        assert_eq!(ponyta.stats().get("speed").unwrap(), 90);
    }

    #[test]
    fn test_encode_layout() {
        let text = TextCodec::new().encode(&[charmander()]).unwrap();
        let expected = "Name: Charmander
National Number: No. 0004
Type: Fire
Species: Lizard Pokemon
Height: 0.6 m
Weight: 8.5 kg
Abilities: Blaze;Solar Power
Stats:
  Total: 309
  HP: 39
  Attack: 52
  Defense: 43
  Special Attack: 60
  Special Defense: 50
  Speed: 65

";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_round_trip() {
        let codec = TextCodec::new();
        let records = vec![
            charmander(),
            Record::new(Kind::GenericGrass)
                .with_id("0043")
                .with_name("Gloomy")
                .with_species("Weed")
                .with_height(2.0)
                .with_abilities(["Stench"])
                .with_stats(StatBlock::new(1, 2, 3, 4, 5, 6).unwrap()),
        ];

        let decoded = codec.decode(&codec.encode(&records).unwrap()).unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn test_total_on_disk_is_ignored() {
        let text = SAMPLE.replace("Total: 318", "Total: 9999");
        let records = TextCodec::new().decode(&text).unwrap();
        assert_eq!(records[0].stats().total(), 318);
    }

    #[test]
    fn test_national_number_is_zero_padded() {
        let text = "Name: Vulpix\nNational Number: No. 37\n";
        let records = TextCodec::new().decode(text).unwrap();
        assert_eq!(records[0].id(), "0037");
        assert_eq!(records[0].kind(), Kind::Vulpix);
    }

    #[test]
    fn test_field_order_and_spacing_are_free() {
        let text = "  Speed: 5\nType: grass\n   Name:   Sunkern  \nHP: 30\n\n\n";
        let records = TextCodec::new().decode(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name(), "Sunkern");
        assert_eq!(records[0].kind(), Kind::GenericGrass);
        assert_eq!(records[0].stats().total(), 35);
        assert_eq!(records[0].id(), "0000");
        assert!(records[0].abilities().is_empty());
    }

    #[test]
    fn test_unknown_type_names_record() {
        let text = "Name: Squirtle\nType: Water\n";
        let err = TextCodec::new().decode(text).unwrap_err();
        match err {
            DexError::UnknownCategory { record, category } => {
                assert!(record.contains("Squirtle"));
                assert_eq!(category, "Water");
            }
            other => panic!("Expected UnknownCategory, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_stat_reports_line() {
        let text = "Name: Oddish\nStats:\n  HP: lots\n";
        match TextCodec::new().decode(text).unwrap_err() {
            DexError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("Expected Parse, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_height_reports_line() {
        let text = "Name: Oddish\nHeight: tall m\n";
        match TextCodec::new().decode(text).unwrap_err() {
            DexError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("Height"));
            }
            other => panic!("Expected Parse, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(TextCodec::new().decode("").unwrap().is_empty());
        assert_eq!(TextCodec::new().encode(&[]).unwrap(), "");
    }
}
