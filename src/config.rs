//! Runtime configuration for the `pokedex` binary.
use std::env;
use std::path::PathBuf;

/// Paths and behaviour switches, read from the environment.
#[derive(Clone, Debug)]
pub struct DexConfig {
    /// Data file opened when no path argument is given
    pub data_file: Option<PathBuf>,
    /// Where category reports are written
    pub report_dir: PathBuf,
    /// Where the TUI writes its log file
    pub log_dir: PathBuf,
    /// Save back to the loaded file after every TUI mutation
    pub autosave: bool,
}

impl Default for DexConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            report_dir: PathBuf::from("."),
            log_dir: env::temp_dir().join("pokedex"),
            autosave: true,
        }
    }
}

impl DexConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `POKEDEX_FILE` - `.txt` or `.json` file to open (default: none)
    /// - `POKEDEX_REPORT_DIR` - category report directory (default: `.`)
    /// - `POKEDEX_LOG_DIR` - TUI log directory (default: `<tmp>/pokedex`)
    /// - `POKEDEX_AUTOSAVE` - `true`/`false` (default: `true`)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(file) = read_var::<PathBuf, _>(&lookup, "POKEDEX_FILE") {
            config.data_file = Some(file);
        }
        if let Some(dir) = read_var(&lookup, "POKEDEX_REPORT_DIR") {
            config.report_dir = dir;
        }
        if let Some(dir) = read_var(&lookup, "POKEDEX_LOG_DIR") {
            config.log_dir = dir;
        }
        if let Some(autosave) = read_var(&lookup, "POKEDEX_AUTOSAVE") {
            config.autosave = autosave;
        }

        config
    }
}

fn read_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}
