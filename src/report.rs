//! Console reports for a finished run.

use crate::executor::{ChangeRecord, Mode, RunStats};
use std::path::Path;

/// Report for the full pipeline (titles, slicer headers, display names).
pub fn render_titles(stats: &RunStats, mode: Mode, root: &Path) -> String {
    let mut out = String::new();
    let heading = match mode {
        Mode::Scan => "NEEDS FIX",
        Mode::DryRun => "WOULD FIX",
        Mode::Execute => "FIXED",
    };
    let listed: Vec<&ChangeRecord> = match mode {
        Mode::Execute => stats.records.iter().filter(|r| r.written).collect(),
        _ => stats.changed_records().collect(),
    };
    out.push_str(&format!("\n=== {}: {} visuals ===\n", heading, listed.len()));

    for record in listed {
        let rel = relative(&record.path, root);
        match mode {
            Mode::Scan => {
                out.push_str(&format!("  {}\n", rel));
                out.push_str(&format!(
                    "    Type: {}, Reason: {}\n",
                    record.visual_type,
                    record.title_reason()
                ));
                if let Some(ref title) = record.generated_title {
                    out.push_str(&format!("    Title would be: {}\n", title));
                }
                out.push_str(&format!("    Fields: {}\n", render_fields(record)));
                render_text_changes(&mut out, record);
                out.push('\n');
            }
            Mode::DryRun => {
                out.push_str(&format!("  {}\n", rel));
                out.push_str(&format!("    Type: {}\n", record.visual_type));
                if let Some(ref title) = record.generated_title {
                    out.push_str(&format!("    Title: '{}'\n", title));
                }
                render_text_changes(&mut out, record);
                out.push('\n');
            }
            Mode::Execute => {
                out.push_str(&format!("  {}: {}\n", rel, summarize(record)));
            }
        }
    }

    out.push_str(&format!(
        "\nSummary: {} need fix, {} already OK\n",
        stats.files_modified,
        stats.unchanged()
    ));
    render_field_totals(&mut out, stats);
    render_problems(&mut out, stats, root);
    out
}

/// Report for the display-name pass.
pub fn render_translation(stats: &RunStats, mode: Mode, root: &Path) -> String {
    let mut out = String::new();

    if mode != Mode::Execute {
        let mut details = String::new();
        for record in stats.changed_records() {
            let visual_id = record
                .path
                .parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            for change in record.display_names.changes() {
                let from = change.previous.as_deref().unwrap_or(&change.native);
                details.push_str(&format!("  {} -> {}  [{}]\n", from, change.display, visual_id));
            }
        }
        if !details.is_empty() {
            out.push_str("\n=== CHANGES ===\n");
            out.push_str(&details);
        }
    }

    out.push_str("\n=== RESULTS ===\n");
    out.push_str(&format!("Files scanned: {}\n", stats.files_scanned));
    out.push_str(&format!("Files modified: {}\n", stats.files_modified));
    out.push_str(&format!("Translations added: {}\n", stats.translated));
    out.push_str(&format!("Already had displayName: {}\n", stats.already_present));
    out.push_str(&format!("Skipped: {}\n", stats.skipped));
    render_problems(&mut out, stats, root);
    out
}

fn render_fields(record: &ChangeRecord) -> String {
    let roles: Vec<String> = record
        .fields
        .display_names()
        .into_iter()
        .map(|(role, names)| format!("{}=[{}]", role, names.join(", ")))
        .collect();
    format!("{{{}}}", roles.join(", "))
}

fn render_text_changes(out: &mut String, record: &ChangeRecord) {
    for fix in &record.slicer_header_fixes {
        out.push_str(&format!(
            "    Slicer header: '{}' -> '{}'\n",
            fix.current, fix.translated
        ));
    }
    for change in record.display_names.changes() {
        let from = change.previous.as_deref().unwrap_or(&change.native);
        out.push_str(&format!(
            "    Display name: {} -> {}\n",
            from, change.display
        ));
    }
}

fn summarize(record: &ChangeRecord) -> String {
    let mut parts = Vec::new();
    if let Some(ref title) = record.generated_title {
        parts.push(format!("title='{}'", title));
    }
    if !record.slicer_header_fixes.is_empty() {
        parts.push(format!("{} slicer headers", record.slicer_header_fixes.len()));
    }
    let names = record.display_names.translated();
    if names > 0 {
        parts.push(format!("{} display names", names));
    }
    parts.join(", ")
}

fn render_field_totals(out: &mut String, stats: &RunStats) {
    if stats.translated + stats.already_present + stats.skipped == 0 && stats.unmapped.is_empty() {
        return;
    }
    out.push_str(&format!(
        "Display names: {} translated, {} already present, {} skipped\n",
        stats.translated, stats.already_present, stats.skipped
    ));
}

fn render_problems(out: &mut String, stats: &RunStats, root: &Path) {
    if !stats.unmapped.is_empty() {
        out.push_str(&format!("\nUNMAPPED values ({}):\n", stats.unmapped.len()));
        for native in &stats.unmapped {
            out.push_str(&format!("  - {}\n", native));
        }
    }
    if !stats.errors.is_empty() {
        out.push_str(&format!("\nERRORS ({}):\n", stats.errors.len()));
        for err in &stats.errors {
            out.push_str(&format!("  {}: {}\n", relative(&err.path, root), err.message));
        }
    }
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
