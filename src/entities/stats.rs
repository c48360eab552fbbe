// 📊 StatBlock - The six base stats of a Pokémon
//
// All six values are non-negative. The total is never stored,
// it is summed on demand so it can't go stale after an update.

use crate::error::{DexError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Map form of a StatBlock (`hp`, `attack`, ... plus `total`)
pub type StatMap = BTreeMap<String, i64>;

// ============================================================================
// STAT FIELD
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatField {
    Hp,
    Attack,
    Defense,
    SpAtk,
    SpDef,
    Speed,
}

impl StatField {
    /// Fixed display/storage order
    pub const ALL: [StatField; 6] = [
        StatField::Hp,
        StatField::Attack,
        StatField::Defense,
        StatField::SpAtk,
        StatField::SpDef,
        StatField::Speed,
    ];

    /// Key used by `get`/`set` and the JSON stats object
    pub fn key(&self) -> &'static str {
        match self {
            StatField::Hp => "hp",
            StatField::Attack => "attack",
            StatField::Defense => "defense",
            StatField::SpAtk => "sp_atk",
            StatField::SpDef => "sp_def",
            StatField::Speed => "speed",
        }
    }

    /// Label used in the text block format and in `describe()`
    pub fn label(&self) -> &'static str {
        match self {
            StatField::Hp => "HP",
            StatField::Attack => "Attack",
            StatField::Defense => "Defense",
            StatField::SpAtk => "Special Attack",
            StatField::SpDef => "Special Defense",
            StatField::Speed => "Speed",
        }
    }

    /// Abbreviation used on the report averages line
    pub fn short_label(&self) -> &'static str {
        match self {
            StatField::Hp => "HP",
            StatField::Attack => "Atk",
            StatField::Defense => "Def",
            StatField::SpAtk => "SpA",
            StatField::SpDef => "SpD",
            StatField::Speed => "Spe",
        }
    }

    /// Reverse of `label()`
    pub fn from_label(label: &str) -> Option<StatField> {
        StatField::ALL.into_iter().find(|f| f.label() == label)
    }
}

impl FromStr for StatField {
    type Err = DexError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        StatField::ALL
            .into_iter()
            .find(|f| f.key() == wanted)
            .ok_or_else(|| DexError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// STAT BLOCK
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatBlock {
    hp: u32,
    attack: u32,
    defense: u32,
    sp_atk: u32,
    sp_def: u32,
    speed: u32,
}

impl StatBlock {
    /// Build a stat block, rejecting any negative value
    pub fn new(hp: i64, attack: i64, defense: i64, sp_atk: i64, sp_def: i64, speed: i64) -> Result<Self> {
        Ok(StatBlock {
            hp: checked(StatField::Hp, hp)?,
            attack: checked(StatField::Attack, attack)?,
            defense: checked(StatField::Defense, defense)?,
            sp_atk: checked(StatField::SpAtk, sp_atk)?,
            sp_def: checked(StatField::SpDef, sp_def)?,
            speed: checked(StatField::Speed, speed)?,
        })
    }

    /// Typed read
    pub fn stat(&self, field: StatField) -> u32 {
        match field {
            StatField::Hp => self.hp,
            StatField::Attack => self.attack,
            StatField::Defense => self.defense,
            StatField::SpAtk => self.sp_atk,
            StatField::SpDef => self.sp_def,
            StatField::Speed => self.speed,
        }
    }

    /// Typed write
    pub fn set_stat(&mut self, field: StatField, value: i64) -> Result<()> {
        let value = checked(field, value)?;
        let slot = match field {
            StatField::Hp => &mut self.hp,
            StatField::Attack => &mut self.attack,
            StatField::Defense => &mut self.defense,
            StatField::SpAtk => &mut self.sp_atk,
            StatField::SpDef => &mut self.sp_def,
            StatField::Speed => &mut self.speed,
        };
        *slot = value;
        Ok(())
    }

    /// Keyed read (`"hp"`, `"attack"`, ...)
    pub fn get(&self, key: &str) -> Result<u32> {
        Ok(self.stat(key.parse()?))
    }

    /// Keyed write. Unknown key → `UnknownField`, negative → `Validation`
    pub fn set(&mut self, key: &str, value: i64) -> Result<()> {
        self.set_stat(key.parse()?, value)
    }

    pub fn total(&self) -> u32 {
        StatField::ALL.iter().map(|f| self.stat(*f)).sum()
    }

    /// Map form, including the derived `total`
    pub fn to_map(&self) -> StatMap {
        let mut map: StatMap = StatField::ALL
            .iter()
            .map(|f| (f.key().to_string(), i64::from(self.stat(*f))))
            .collect();
        map.insert("total".to_string(), i64::from(self.total()));
        map
    }

    /// Rebuild from map form; missing keys become 0, `total` is ignored
    pub fn from_map(map: &StatMap) -> Result<Self> {
        Self::from_map_or(map, 0)
    }

    /// Rebuild from map form with a custom default for missing keys
    pub fn from_map_or(map: &StatMap, default: i64) -> Result<Self> {
        let value = |f: StatField| map.get(f.key()).copied().unwrap_or(default);
        StatBlock::new(
            value(StatField::Hp),
            value(StatField::Attack),
            value(StatField::Defense),
            value(StatField::SpAtk),
            value(StatField::SpDef),
            value(StatField::Speed),
        )
    }
}

fn checked(field: StatField, value: i64) -> Result<u32> {
    if value < 0 {
        return Err(DexError::Validation(format!(
            "{} must be non-negative, got {}",
            field, value
        )));
    }
    u32::try_from(value)
        .map_err(|_| DexError::Validation(format!("{} is out of range: {}", field, value)))
}

/// Parse a raw stat value the way the menu accepts it (`" 45 "` → 45)
pub fn parse_stat_value(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| DexError::Validation(format!("'{}' is not an integer", raw.trim())))
}

// ============================================================================
// TESTS
// ============================================================================
