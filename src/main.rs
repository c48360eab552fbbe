// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use pokedex::{Catalog, Category, DexConfig};
use std::env;
use std::path::{Path, PathBuf};

const USAGE: &str = "Usage:
  pokedex [FILE]                          browse FILE (or $POKEDEX_FILE) in the terminal UI
  pokedex list FILE                       print every Pokémon
  pokedex show FILE NAME                  print one Pokémon
  pokedex type FILE fire|grass            print every Pokémon of one type
  pokedex report FILE fire|grass [DIR]    export a type report to DIR/<type>.txt
  pokedex convert IN OUT                  convert between .txt and .json
  pokedex averages FILE                   print Fire/Grass average stats";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = DexConfig::from_env();

    match args.get(1).map(String::as_str) {
        Some("-h") | Some("--help") | Some("help") => {
            println!("{}", USAGE);
            Ok(())
        }
        Some(command @ ("list" | "show" | "type" | "report" | "convert" | "averages")) => {
            init_cli_logging();
            run_command(command, &args[2..], &config)
        }
        file => {
            let file = file.map(PathBuf::from).or_else(|| config.data_file.clone());
            run_ui_mode(file, &config)
        }
    }
}

// ============================================================================
// LOGGING
// ============================================================================

/// Subcommands log to stderr so stdout stays clean for output
fn init_cli_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// The TUI owns the terminal, so logs go to `<log_dir>/pokedex.log`
#[cfg(feature = "tui")]
fn init_tui_logging(log_dir: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::prelude::*;

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, "pokedex.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!("Log file: {}/pokedex.log", log_dir.display());
    Ok(guard)
}

// ============================================================================
// COMMANDS
// ============================================================================

fn run_command(command: &str, args: &[String], config: &DexConfig) -> Result<()> {
    let file = args.first().map(PathBuf::from);
    let Some(file) = file else {
        bail!("Missing FILE argument\n\n{}", USAGE);
    };

    match command {
        "list" => {
            let catalog = open(&file)?;
            for record in catalog.entries() {
                println!("{}\n", record.describe());
            }
            println!("{} Pokémon", catalog.count());
        }
        "show" => {
            if args.len() < 2 {
                bail!("Missing NAME argument\n\n{}", USAGE);
            }
            let name = args[1..].join(" ");
            let catalog = open(&file)?;
            let record = catalog.find_by_name(&name)?;
            println!("{}", record.describe());
        }
        "type" => {
            let Some(category) = args.get(1) else {
                bail!("Missing type argument (fire or grass)\n\n{}", USAGE);
            };
            let catalog = open(&file)?;
            let members = catalog.find_by_category_name(category);
            if members.is_empty() {
                bail!("No Pokémon of type '{}'", category);
            }
            for record in &members {
                println!("{}\n", record.describe());
            }
            println!("{} Pokémon", members.len());
        }
        "report" => {
            let Some(category) = args.get(1) else {
                bail!("Missing type argument (fire or grass)\n\n{}", USAGE);
            };
            let out_dir = args.get(2).map(PathBuf::from).unwrap_or_else(|| config.report_dir.clone());
            let catalog = open(&file)?;

            match catalog.export_category_report(category, &out_dir)? {
                Some(path) => println!("✓ Type report exported to {}", path.display()),
                None => bail!("No Pokémon of type '{}' to report", category),
            }
        }
        "convert" => {
            let Some(output) = args.get(1) else {
                bail!("Missing OUT argument\n\n{}", USAGE);
            };
            let mut catalog = open(&file)?;
            let path = catalog
                .save_path(output)
                .with_context(|| format!("Failed to write {}", output))?;
            println!("✓ Converted {} Pokémon to {}", catalog.count(), path.display());
        }
        "averages" => {
            let catalog = open(&file)?;
            for category in Category::ALL {
                match category.average_stats(catalog.entries()) {
                    Some(averages) => {
                        println!("[Type: {}] Average Stats ({} Pokémon):", category, averages.count);
                        println!("{}", averages.summary_line());
                    }
                    None => println!("[Type: {}] No Pokémon", category),
                }
            }
        }
        other => bail!("Unknown command '{}'\n\n{}", other, USAGE),
    }

    Ok(())
}

/// Load a data file that must exist
fn open(path: &Path) -> Result<Catalog> {
    let mut catalog = Catalog::new();
    let found = catalog
        .load_path(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    if !found {
        bail!("File not found: {}", path.display());
    }
    Ok(catalog)
}

// ============================================================================
// TERMINAL UI
// ============================================================================

#[cfg(feature = "tui")]
fn run_ui_mode(file: Option<PathBuf>, config: &DexConfig) -> Result<()> {
    let _guard = init_tui_logging(&config.log_dir)?;

    let mut catalog = Catalog::new();
    if let Some(path) = &file {
        // A missing file starts an empty Pokédex bound to that path
        catalog
            .load_path(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
    }

    let mut app = ui::App::new(catalog, config);
    ui::run_ui(&mut app)?;

    if app.catalog.is_dirty() {
        println!("Exited with unsaved changes.");
    }

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_file: Option<PathBuf>, _config: &DexConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use a subcommand:\n\n{}", USAGE);
    std::process::exit(1);
}
