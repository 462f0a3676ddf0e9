//! pbip-titles — fix auto-generated visual titles and slicer headers.
//!
//! When a visual's title is visible but has no text, Power BI builds one from
//! the model's field names. This tool writes a translated title instead,
//! rewrites slicer header text and merges display-name translations.
//!
//! - `pbip-titles pages/ map.json --scan` — show what needs fixing
//! - `pbip-titles pages/ map.json --dry-run` — show what would change
//! - `pbip-titles pages/ map.json --execute` — apply and write

use anyhow::{bail, Context, Result};
use clap::{ArgAction, ArgGroup, Parser};
use pbip_i18n::executor::run_paths;
use pbip_i18n::{report, DocumentStore, FsStore, Mode, Session, TranslationMap};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pbip-titles",
    about = "Fix auto-generated visual titles and slicer headers in Power BI .pbip reports"
)]
#[command(group(ArgGroup::new("mode").required(true).args(["scan", "dry_run", "execute"])))]
struct Cli {
    /// Path to the report's definition/pages folder
    pages_dir: PathBuf,

    /// Translation map JSON file
    translation_map: PathBuf,

    /// Show what needs fixing
    #[arg(long)]
    scan: bool,

    /// Show what would change without writing
    #[arg(long)]
    dry_run: bool,

    /// Apply changes
    #[arg(long)]
    execute: bool,

    /// Conjunction between field names (overrides the map's phrasing)
    #[arg(long = "and", value_name = "WORD")]
    and_word: Option<String>,

    /// Word between measures and their axis (overrides the map's phrasing)
    #[arg(long = "by", value_name = "WORD")]
    by_word: Option<String>,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.scan {
            Mode::Scan
        } else if self.dry_run {
            Mode::DryRun
        } else {
            Mode::Execute
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    pbip_i18n::init_logging(cli.verbose);

    if !cli.pages_dir.is_dir() {
        bail!("pages_dir not found: {}", cli.pages_dir.display());
    }
    if !cli.translation_map.is_file() {
        bail!("translation_map not found: {}", cli.translation_map.display());
    }

    let translations = TranslationMap::load(&cli.translation_map)
        .with_context(|| format!("failed to load {}", cli.translation_map.display()))?;
    let phrasing = translations
        .phrasing
        .clone()
        .unwrap_or_default()
        .with_overrides(cli.and_word.as_deref(), cli.by_word.as_deref());

    let mode = cli.mode();
    let session = Session::new(translations, mode).with_phrasing(phrasing);
    let paths = FsStore.enumerate(&cli.pages_dir)?;
    println!("Found {} visual files", paths.len());
    let stats = run_paths(&FsStore, &paths, &session);

    print!("{}", report::render_titles(&stats, mode, &cli.pages_dir));
    Ok(())
}
