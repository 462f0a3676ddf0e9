//! Mode-gated processing of a whole report.
//!
//! Each document goes through the same pipeline:
//!
//! 1. **Classify** the title (`title::classify`)
//! 2. **Extract** fields per role (`extract::extract_fields`)
//! 3. **Synthesize** a title when one is needed (`synth::synthesize_title`)
//! 4. **Detect** slicer header fixes (`slicer::detect_header_fixes`)
//! 5. **Merge** display-name translations (`merge::merge_display_names`)
//!
//! `Scan` computes and reports only. `DryRun` also applies the changes to the
//! in-memory document. `Execute` additionally writes changed documents back.

use crate::census::RefCensus;
use crate::document;
use crate::error::Result;
use crate::extract::extract_fields;
use crate::merge::{merge_display_names, MergeReport};
use crate::model::RoleBucket;
use crate::slicer::{self, SlicerHeaderFix};
use crate::store::DocumentStore;
use crate::synth::synthesize_title;
use crate::title::{self, TitleState};
use crate::translations::{Phrasing, TranslationMap};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Scan,
    DryRun,
    Execute,
}

impl Mode {
    /// Whether changes are applied to the in-memory document.
    pub fn applies(self) -> bool {
        !matches!(self, Mode::Scan)
    }

    pub fn persists(self) -> bool {
        matches!(self, Mode::Execute)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Scan => "scan",
            Mode::DryRun => "dry-run",
            Mode::Execute => "execute",
        })
    }
}

/// Which parts of the pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Passes {
    /// Title synthesis and slicer headers (steps 1–4)
    pub titles: bool,
    /// Display-name merge (step 5)
    pub display_names: bool,
}

impl Passes {
    pub const ALL: Passes = Passes {
        titles: true,
        display_names: true,
    };
    pub const DISPLAY_NAMES: Passes = Passes {
        titles: false,
        display_names: true,
    };
}

/// Run-scoped state: built once, borrowed by every document pass.
#[derive(Debug, Clone)]
pub struct Session {
    pub translations: TranslationMap,
    pub phrasing: Phrasing,
    pub mode: Mode,
    pub passes: Passes,
}

impl Session {
    /// Full pipeline, phrasing taken from the map when it has one.
    pub fn new(translations: TranslationMap, mode: Mode) -> Self {
        let phrasing = translations.phrasing.clone().unwrap_or_default();
        Self {
            translations,
            phrasing,
            mode,
            passes: Passes::ALL,
        }
    }

    pub fn with_phrasing(mut self, phrasing: Phrasing) -> Self {
        self.phrasing = phrasing;
        self
    }

    pub fn with_passes(mut self, passes: Passes) -> Self {
        self.passes = passes;
        self
    }
}

/// Outcome of one document.
#[derive(Debug, Clone)]
pub struct ChangeRecord {
    pub path: PathBuf,
    pub visual_type: String,
    /// `None` when the title pass did not run
    pub title_state: Option<TitleState>,
    pub generated_title: Option<String>,
    /// A title was composed but the title section cannot hold it
    pub title_blocked: bool,
    pub fields: RoleBucket,
    pub slicer_header_fixes: Vec<SlicerHeaderFix>,
    pub display_names: MergeReport,
    /// At least one text mutation was computed
    pub changed: bool,
    /// The document was written back
    pub written: bool,
}

impl ChangeRecord {
    /// Why the title pass did or did not act.
    pub fn title_reason(&self) -> String {
        match &self.title_state {
            Some(_) if self.title_blocked => "malformed_title_section".to_string(),
            Some(state) if state.needs_title() && self.generated_title.is_none() => {
                "no_fields_found".to_string()
            }
            Some(state) => state.to_string(),
            None => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileError {
    pub path: PathBuf,
    pub message: String,
}

/// Run-wide aggregate. `RunStats::default()` is the identity of [`RunStats::merge`].
#[derive(Debug, Default, Clone)]
pub struct RunStats {
    pub files_scanned: usize,
    /// Documents with at least one computed change
    pub files_modified: usize,
    pub files_written: usize,
    pub titles_generated: usize,
    pub slicer_header_fixes: usize,
    pub translated: usize,
    pub already_present: usize,
    pub skipped: usize,
    pub unmapped: BTreeSet<String>,
    pub errors: Vec<FileError>,
    pub records: Vec<ChangeRecord>,
}

impl RunStats {
    /// Fold one document outcome into the totals.
    pub fn record(&mut self, record: ChangeRecord) {
        self.files_scanned += 1;
        if record.changed {
            self.files_modified += 1;
        }
        if record.written {
            self.files_written += 1;
        }
        if record.generated_title.is_some() {
            self.titles_generated += 1;
        }
        self.slicer_header_fixes += record.slicer_header_fixes.len();
        self.translated += record.display_names.translated();
        self.already_present += record.display_names.already_present();
        self.skipped += record.display_names.skipped();
        self.unmapped
            .extend(record.display_names.unmapped().map(str::to_string));
        self.records.push(record);
    }

    /// Record a document that could not be read or written.
    pub fn record_error(&mut self, path: &Path, message: String) {
        self.files_scanned += 1;
        self.errors.push(FileError {
            path: path.to_path_buf(),
            message,
        });
    }

    pub fn merge(&mut self, other: RunStats) {
        self.files_scanned += other.files_scanned;
        self.files_modified += other.files_modified;
        self.files_written += other.files_written;
        self.titles_generated += other.titles_generated;
        self.slicer_header_fixes += other.slicer_header_fixes;
        self.translated += other.translated;
        self.already_present += other.already_present;
        self.skipped += other.skipped;
        self.unmapped.extend(other.unmapped);
        self.errors.extend(other.errors);
        self.records.extend(other.records);
    }

    pub fn changed_records(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.records.iter().filter(|r| r.changed)
    }

    /// Documents that were read and needed nothing.
    pub fn unchanged(&self) -> usize {
        self.records.len() - self.files_modified
    }
}

/// Run the pipeline over one document, mutating it unless in scan mode.
pub fn process_document(doc: &mut Value, path: &Path, session: &Session) -> ChangeRecord {
    let apply = session.mode.applies();
    let visual_type = document::visual_type(doc).to_string();
    let fields = extract_fields(doc);

    let mut title_state = None;
    let mut generated_title = None;
    let mut title_blocked = false;
    let mut slicer_header_fixes = Vec::new();

    if session.passes.titles {
        let state = title::classify(doc);
        if state.needs_title() {
            generated_title = synthesize_title(
                &visual_type,
                &fields,
                &session.translations,
                &session.phrasing,
            );
            if generated_title.is_some() && !document::title_writable(doc) {
                warn!(path = %path.display(), "title section is malformed, title not set");
                generated_title = None;
                title_blocked = true;
            }
        }
        slicer_header_fixes = slicer::detect_header_fixes(doc, &session.translations);

        if apply {
            if let Some(title) = &generated_title {
                document::set_title_text(doc, title);
            }
            slicer::apply_header_fixes(doc, &slicer_header_fixes);
        }
        title_state = Some(state);
    }

    let display_names = if session.passes.display_names {
        merge_display_names(doc, &session.translations, apply)
    } else {
        MergeReport::default()
    };

    let changed =
        generated_title.is_some() || !slicer_header_fixes.is_empty() || display_names.changed();

    debug!(
        path = %path.display(),
        visual_type = %visual_type,
        changed,
        title = generated_title.as_deref().unwrap_or(""),
        "processed visual"
    );

    ChangeRecord {
        path: path.to_path_buf(),
        visual_type,
        title_state,
        generated_title,
        title_blocked,
        fields,
        slicer_header_fixes,
        display_names,
        changed,
        written: false,
    }
}

/// Process every document under `root`.
///
/// Enumeration failure is fatal; read, parse and write failures are recorded
/// per file and the run continues.
pub fn run(store: &dyn DocumentStore, root: &Path, session: &Session) -> Result<RunStats> {
    let paths = store.enumerate(root)?;
    Ok(run_paths(store, &paths, session))
}

/// Process an already enumerated list of documents.
pub fn run_paths(store: &dyn DocumentStore, paths: &[PathBuf], session: &Session) -> RunStats {
    info!(count = paths.len(), mode = %session.mode, "processing visuals");

    let mut stats = RunStats::default();
    for path in paths {
        let mut doc = match store.read(path) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                stats.record_error(path, e.to_string());
                continue;
            }
        };

        let mut record = process_document(&mut doc, path, session);
        if record.changed && session.mode.persists() {
            match store.write(path, &doc) {
                Ok(()) => record.written = true,
                Err(e) => {
                    warn!("failed to write {}: {}", path.display(), e);
                    stats.errors.push(FileError {
                        path: path.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }
        stats.record(record);
    }

    info!(
        scanned = stats.files_scanned,
        modified = stats.files_modified,
        written = stats.files_written,
        errors = stats.errors.len(),
        "run complete"
    );
    stats
}

/// Count native fields across all documents under `root`.
pub fn run_census(store: &dyn DocumentStore, root: &Path) -> Result<(RefCensus, Vec<FileError>)> {
    let mut census = RefCensus::default();
    let mut errors = Vec::new();
    for path in store.enumerate(root)? {
        match store.read(&path) {
            Ok(doc) => census.record(&doc),
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                errors.push(FileError {
                    message: e.to_string(),
                    path,
                });
            }
        }
    }
    Ok((census, errors))
}
