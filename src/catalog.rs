// 📚 Catalog - The in-memory Pokédex
//
// Ordered list of records plus the files it was loaded from.
// Lookups are linear scans and return the first match; duplicates are
// allowed but only the first one is ever reachable by name or number.
//
// One catalog per process is a convention of the caller, not enforced.
// There is no internal locking: share it across threads only behind
// your own synchronization.

use crate::codec::{codec_for, Format};
use crate::entities::{parse_stat_value, Category, Record, StatField};
use crate::error::{DexError, Result};
use crate::validator::BasicField;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ============================================================================
// LOOKUP KEY
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Lookup<'a> {
    /// Case-insensitive
    Name(&'a str),
    /// Exact string match
    NationalNo(&'a str),
}

impl Lookup<'_> {
    fn matches(&self, record: &Record) -> bool {
        match self {
            Lookup::Name(name) => record.name().to_lowercase() == name.to_lowercase(),
            Lookup::NationalNo(no) => record.id() == *no,
        }
    }

    fn not_found(&self) -> DexError {
        match self {
            Lookup::Name(name) => DexError::NotFound {
                key: "name",
                value: name.to_string(),
            },
            Lookup::NationalNo(no) => DexError::NotFound {
                key: "national number",
                value: no.to_string(),
            },
        }
    }
}

// ============================================================================
// CATALOG
// ============================================================================

#[derive(Debug, Default)]
pub struct Catalog {
    entries: Vec<Record>,
    text_path: Option<PathBuf>,
    json_path: Option<PathBuf>,
    dirty: bool,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. No duplicate check.
    pub fn add(&mut self, record: Record) {
        debug!("Added {} ({})", record.name(), record.id());
        self.entries.push(record);
        self.dirty = true;
    }

    pub fn entries(&self) -> &[Record] {
        &self.entries
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Unsaved changes since the last load/save
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn text_path(&self) -> Option<&Path> {
        self.text_path.as_deref()
    }

    pub fn json_path(&self) -> Option<&Path> {
        self.json_path.as_deref()
    }

    // ========================================================================
    // SEARCH
    // ========================================================================

    fn position(&self, lookup: Lookup<'_>) -> Result<usize> {
        self.entries
            .iter()
            .position(|r| lookup.matches(r))
            .ok_or_else(|| lookup.not_found())
    }

    /// Index of the first record whose name matches, ignoring case
    pub fn position_by_name(&self, name: &str) -> Result<usize> {
        self.position(Lookup::Name(name))
    }

    /// Index of the first record with exactly this national number
    pub fn position_by_id(&self, id: &str) -> Result<usize> {
        self.position(Lookup::NationalNo(id))
    }

    /// First record whose name matches, ignoring case
    pub fn find_by_name(&self, name: &str) -> Result<&Record> {
        let index = self.position_by_name(name)?;
        Ok(&self.entries[index])
    }

    /// First record with exactly this national number ("0004")
    pub fn find_by_id(&self, id: &str) -> Result<&Record> {
        let index = self.position_by_id(id)?;
        Ok(&self.entries[index])
    }

    /// Indices of every record of a category, in catalog order
    pub fn category_positions(&self, category: Category) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, r)| r.category() == category)
            .map(|(i, _)| i)
            .collect()
    }

    /// Every record of a category, in catalog order
    pub fn find_by_category(&self, category: Category) -> Vec<&Record> {
        self.entries
            .iter()
            .filter(|r| r.category() == category)
            .collect()
    }

    /// Same as `find_by_category`, from a type name ("fire"); unknown → empty
    pub fn find_by_category_name(&self, name: &str) -> Vec<&Record> {
        match Category::parse(name) {
            Some(category) => self.find_by_category(category),
            None => Vec::new(),
        }
    }

    // ========================================================================
    // REMOVE
    // ========================================================================

    fn checked_index(&self, index: usize) -> Result<usize> {
        if index < self.entries.len() {
            Ok(index)
        } else {
            Err(DexError::NotFound {
                key: "row",
                value: index.to_string(),
            })
        }
    }

    /// Remove the record at `index`; reaches duplicates the lookups can't
    pub fn remove_at(&mut self, index: usize) -> Result<Record> {
        let index = self.checked_index(index)?;
        let removed = self.entries.remove(index);
        self.dirty = true;
        info!("Removed {} ({})", removed.name(), removed.id());
        Ok(removed)
    }

    pub fn try_remove_by_name(&mut self, name: &str) -> Result<Record> {
        let index = self.position_by_name(name)?;
        self.remove_at(index)
    }

    pub fn try_remove_by_id(&mut self, id: &str) -> Result<Record> {
        let index = self.position_by_id(id)?;
        self.remove_at(index)
    }

    /// `false` when no record has this name
    pub fn remove_by_name(&mut self, name: &str) -> bool {
        self.try_remove_by_name(name).is_ok()
    }

    /// `false` when no record has this national number
    pub fn remove_by_id(&mut self, id: &str) -> bool {
        self.try_remove_by_id(id).is_ok()
    }

    // ========================================================================
    // UPDATE
    // ========================================================================

    /// Set one stat of the record at `index`
    pub fn update_stat_at(&mut self, index: usize, field: &str, value: &str) -> Result<()> {
        let index = self.checked_index(index)?;
        let field: StatField = field.parse()?;
        let value = parse_stat_value(value)?;
        self.entries[index].stats_mut().set_stat(field, value)?;
        self.dirty = true;
        Ok(())
    }

    /// Set one stat; surfaces `NotFound`, `UnknownField` and `Validation`
    pub fn try_update_stat_by_name(&mut self, name: &str, field: &str, value: &str) -> Result<()> {
        let index = self.position_by_name(name)?;
        self.update_stat_at(index, field, value)
    }

    pub fn try_update_stat_by_id(&mut self, id: &str, field: &str, value: &str) -> Result<()> {
        let index = self.position_by_id(id)?;
        self.update_stat_at(index, field, value)
    }

    /// Best-effort stat update: any failure (missing record, bad field,
    /// bad value) is reported as `false`.
    pub fn update_stat_by_name(&mut self, name: &str, field: &str, value: &str) -> bool {
        match self.try_update_stat_by_name(name, field, value) {
            Ok(()) => true,
            Err(e) => {
                debug!("Stat update for {} failed: {}", name, e);
                false
            }
        }
    }

    pub fn update_stat_by_id(&mut self, id: &str, field: &str, value: &str) -> bool {
        match self.try_update_stat_by_id(id, field, value) {
            Ok(()) => true,
            Err(e) => {
                debug!("Stat update for {} failed: {}", id, e);
                false
            }
        }
    }

    /// Replace one descriptive field (already validated) of the record at `index`
    pub fn update_basic_field_at(&mut self, index: usize, edit: BasicField) -> Result<()> {
        let index = self.checked_index(index)?;
        edit.apply(&mut self.entries[index])?;
        self.dirty = true;
        Ok(())
    }

    pub fn update_basic_field_by_name(&mut self, name: &str, edit: BasicField) -> Result<()> {
        let index = self.position_by_name(name)?;
        self.update_basic_field_at(index, edit)
    }

    pub fn update_basic_field_by_id(&mut self, id: &str, edit: BasicField) -> Result<()> {
        let index = self.position_by_id(id)?;
        self.update_basic_field_at(index, edit)
    }

    // ========================================================================
    // TEXT FILES
    // ========================================================================

    /// Load the text block format, replacing every entry.
    ///
    /// A missing file is not an error: the catalog becomes empty and
    /// `Ok(false)` is returned. A bad block fails the whole load and
    /// leaves the catalog as it was.
    pub fn load_text(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();

        let Some(input) = read_if_exists(path)? else {
            warn!("File '{}' not found. Starting with empty Pokédex.", path.display());
            self.entries.clear();
            self.text_path = Some(path.to_path_buf());
            self.json_path = None;
            self.dirty = false;
            return Ok(false);
        };

        let records = codec_for(Format::Text).decode(&input)?;
        self.entries = records;
        self.text_path = Some(path.to_path_buf());
        self.json_path = None;
        self.dirty = false;

        info!("Loaded {} Pokémon from '{}'", self.entries.len(), path.display());
        Ok(true)
    }

    /// Save the text block format to `path`, or to the associated text file
    pub fn save_text(&mut self, path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => self.text_path.clone().ok_or(DexError::MissingPath("text"))?,
        };

        self.write(&path, Format::Text)?;
        self.text_path = Some(path.clone());
        self.json_path = None;
        Ok(path)
    }

    // ========================================================================
    // JSON FILES
    // ========================================================================

    /// Load the JSON array format, replacing every entry.
    ///
    /// A missing file returns `Ok(false)` and leaves the catalog untouched.
    /// Any unresolvable element fails the whole load.
    pub fn load_json(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();

        let Some(input) = read_if_exists(path)? else {
            warn!("JSON file '{}' not found.", path.display());
            return Ok(false);
        };

        let records = codec_for(Format::Json).decode(&input)?;
        self.entries = records;
        self.json_path = Some(path.to_path_buf());
        self.text_path = None;
        self.dirty = false;

        info!("Loaded {} Pokémon from JSON '{}'", self.entries.len(), path.display());
        Ok(true)
    }

    /// Save the JSON array format to `path`, or to the associated JSON file
    pub fn save_json(&mut self, path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => self.json_path.clone().ok_or(DexError::MissingPath("JSON"))?,
        };

        self.write(&path, Format::Json)?;
        self.json_path = Some(path.clone());
        self.text_path = None;
        Ok(path)
    }

    // ========================================================================
    // FORMAT DISPATCH
    // ========================================================================

    /// Load `.txt` or `.json` by extension
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        match Format::detect(path)? {
            Format::Text => self.load_text(path),
            Format::Json => self.load_json(path),
        }
    }

    /// Save `.txt` or `.json` by extension, and associate the file
    pub fn save_path(&mut self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        match Format::detect(path)? {
            Format::Text => self.save_text(Some(path)),
            Format::Json => self.save_json(Some(path)),
        }
    }

    /// Save to the file last loaded or explicitly saved to
    pub fn save_back(&mut self) -> Result<PathBuf> {
        if self.json_path.is_some() {
            self.save_json(None)
        } else if self.text_path.is_some() {
            self.save_text(None)
        } else {
            Err(DexError::MissingPath("data"))
        }
    }

    fn write(&mut self, path: &Path, format: Format) -> Result<()> {
        let body = codec_for(format).encode(&self.entries)?;
        fs::write(path, body).map_err(|e| DexError::io(path, e))?;
        self.dirty = false;
        info!("Pokédex saved to {} file '{}'", format, path.display());
        Ok(())
    }

    // ========================================================================
    // CATEGORY REPORT
    // ========================================================================

    /// Report text for a category, `None` if it has no members
    pub fn category_report(&self, category: Category) -> Option<String> {
        let members = self.find_by_category(category);
        let averages = category.average_stats(&self.entries)?;

        let mut out = String::new();
        out.push_str(&category.description());
        out.push_str("\n\n");
        out.push_str(&format!("Average Stats ({} Pokémon):\n", averages.count));
        out.push_str(&averages.summary_line());
        out.push_str("\n\n");
        for record in members {
            out.push_str(&record.describe());
            out.push_str("\n\n");
        }
        Some(out)
    }

    /// Write `<category>.txt` into `out_dir`.
    ///
    /// `Ok(None)` for an unknown category name or a category with no
    /// members; no file is written in either case.
    pub fn export_category_report(&self, category: &str, out_dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        let Some(category) = Category::parse(category) else {
            debug!("No report for unknown type '{}'", category);
            return Ok(None);
        };
        let Some(report) = self.category_report(category) else {
            debug!("No {} Pokémon to report on", category);
            return Ok(None);
        };

        let out_dir = out_dir.as_ref();
        fs::create_dir_all(out_dir).map_err(|e| DexError::io(out_dir, e))?;

        let path = out_dir.join(format!("{}.txt", category.key()));
        fs::write(&path, report).map_err(|e| DexError::io(&path, e))?;

        info!("Type report exported to {}", path.display());
        Ok(Some(path))
    }
}

/// File contents, or `None` when the file does not exist
fn read_if_exists(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(input) => Ok(Some(input)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(DexError::io(path, e)),
    }
}

// ============================================================================
// TESTS
// ============================================================================
