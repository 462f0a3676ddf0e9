//! pbip-i18n — translate Power BI `.pbip` report visuals in place.
//!
//! Power BI shows model field names wherever a report does not override
//! them: auto-generated visual titles, slicer headers and the labels of
//! projected fields. This crate fills those gaps from a translation map:
//!
//! - **Titles** — visible titles without text get one composed from the
//!   visual's fields, per visual type ([`synth`])
//! - **Slicer headers** — header literals found in the map are rewritten
//!   ([`slicer`])
//! - **Display names** — projections get a translated `displayName`
//!   ([`merge`])
//!
//! Everything runs under one of three modes (scan, dry-run, execute) through
//! [`executor::run`], and is idempotent: a second execute finds nothing to do.

pub mod census;
pub mod document;
pub mod error;
pub mod executor;
pub mod extract;
pub mod merge;
pub mod model;
pub mod report;
pub mod slicer;
pub mod store;
pub mod synth;
pub mod title;
pub mod translations;

pub use error::{Error, Result};
pub use executor::{process_document, run, run_paths, ChangeRecord, Mode, Passes, RunStats, Session};
pub use store::{DocumentStore, FsStore};
pub use translations::{Phrasing, TranslationMap};

/// Install the stderr log subscriber used by the binaries.
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks warn / info / debug.
pub fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
