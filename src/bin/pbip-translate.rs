//! pbip-translate — add translated `displayName`s to report projections.
//!
//! - `pbip-translate pages/ --scan > map.json` — write a starter map
//! - `pbip-translate pages/ map.json --dry-run` — show changes without writing
//! - `pbip-translate pages/ map.json` — apply and write
//!
//! The map has two keys: `"translations"` (`{"English": "Svenska"}`) and
//! `"skip"` (native names left alone). Entries starting with `TODO:` are
//! placeholders and never applied.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use pbip_i18n::executor::{run_census, run_paths};
use pbip_i18n::{report, DocumentStore, FsStore, Mode, Passes, Session, TranslationMap};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "pbip-translate",
    about = "Translate Power BI report nativeQueryRef values into displayName"
)]
struct Cli {
    /// Path to the report's definition/pages folder
    pages_dir: PathBuf,

    /// JSON file with translation mappings
    translation_map: Option<PathBuf>,

    /// Print a starter translation map instead of translating
    #[arg(long, conflicts_with = "dry_run")]
    scan: bool,

    /// Show changes without writing
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    pbip_i18n::init_logging(cli.verbose);

    if !cli.pages_dir.is_dir() {
        bail!("{} is not a directory", cli.pages_dir.display());
    }

    if cli.scan {
        let existing = cli.translation_map.as_deref().map(load_map).transpose()?;
        let (census, errors) = run_census(&FsStore, &cli.pages_dir)?;
        if !errors.is_empty() {
            eprintln!(
                "Warning: {} visual files could not be read; the starter map is incomplete",
                errors.len()
            );
        }
        let starter = census.starter_map(existing.as_ref());
        println!("{}", serde_json::to_string_pretty(&starter)?);
        return Ok(());
    }

    let map_path = cli
        .translation_map
        .as_deref()
        .context("translation_map required (or use --scan)")?;
    let translations = load_map(map_path)?;

    let mode = if cli.dry_run { Mode::DryRun } else { Mode::Execute };
    println!("Mode: {}", if cli.dry_run { "DRY RUN" } else { "LIVE" });
    println!("Translations loaded: {}", translations.translations.len());
    println!("Skip list: {} entries", translations.skip.len());
    let placeholders = translations.placeholder_count();
    if placeholders > 0 {
        println!("Unresolved placeholders: {}", placeholders);
    }

    let session = Session::new(translations, mode).with_passes(Passes::DISPLAY_NAMES);
    let paths = FsStore.enumerate(&cli.pages_dir)?;
    println!("Found {} visual.json files", paths.len());
    let stats = run_paths(&FsStore, &paths, &session);

    print!("{}", report::render_translation(&stats, mode, &cli.pages_dir));
    Ok(())
}

fn load_map(path: &Path) -> Result<TranslationMap> {
    if !path.is_file() {
        bail!("translation_map not found: {}", path.display());
    }
    TranslationMap::load(path).with_context(|| format!("failed to load {}", path.display()))
}
