use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn titles() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_pbip-titles")))
}

fn translate() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_pbip-translate")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// Lay fixtures out as `pages/<page>/visuals/<id>/visual.json`.
fn report(visuals: &[(&str, &str, &str)]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let pages = dir.path().join("pages");
    for (page, id, fixture) in visuals {
        let visual_dir = pages.join(page).join("visuals").join(id);
        std::fs::create_dir_all(&visual_dir).unwrap();
        std::fs::copy(fixture_path(fixture), visual_dir.join("visual.json")).unwrap();
    }
    (dir, pages)
}

fn sample_report() -> (TempDir, PathBuf) {
    report(&[
        ("overview", "a1b2c3", "bar_chart.json"),
        ("overview", "d4e5f6", "slicer.json"),
        ("details", "a7b8c9", "skipped_table.json"),
        ("details", "c0d1e2", "titled_card.json"),
    ])
}

fn visual(pages: &Path, page: &str, id: &str) -> PathBuf {
    pages.join(page).join("visuals").join(id).join("visual.json")
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn snapshot(pages: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let pattern = format!("{}/**/visual.json", pages.display());
    let mut files: Vec<_> = glob::glob(&pattern)
        .unwrap()
        .map(|p| {
            let p = p.unwrap();
            let bytes = std::fs::read(&p).unwrap();
            (p, bytes)
        })
        .collect();
    files.sort();
    files
}

fn stdout(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

// -- pbip-titles --

#[test]
fn titles_scan_reports_without_writing() {
    let (_dir, pages) = sample_report();
    let before = snapshot(&pages);

    let assert = titles()
        .arg(&pages)
        .arg(fixture_path("map.json"))
        .arg("--scan")
        .assert()
        .success();
    let out = stdout(&assert);

    assert!(out.starts_with("Found 4 visual files\n"), "Got: {out}");
    assert!(out.contains("=== NEEDS FIX: 2 visuals ==="));
    assert!(out.contains("Type: clusteredBarChart, Reason: no_title_section"));
    assert!(out.contains("Title would be: Försäljning per Region"));
    assert!(out.contains("Slicer header: 'Category' -> 'Kategori'"));
    assert!(out.contains("Summary: 2 need fix, 2 already OK"));
    assert!(out.contains("UNMAPPED values (1):\n  - Quantity"));
    assert_eq!(snapshot(&pages), before);
}

#[test]
fn titles_dry_run_leaves_files_byte_identical() {
    let (_dir, pages) = sample_report();
    let before = snapshot(&pages);

    titles()
        .arg(&pages)
        .arg(fixture_path("map.json"))
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("=== WOULD FIX: 2 visuals ==="))
        .stdout(predicate::str::contains("Title: 'Försäljning per Region'"))
        .stdout(predicate::str::contains("Display name: Sales -> Försäljning"));

    assert_eq!(snapshot(&pages), before);
}

#[test]
fn titles_execute_writes_and_is_idempotent() {
    let (_dir, pages) = sample_report();
    let untouched = std::fs::read(visual(&pages, "details", "c0d1e2")).unwrap();

    titles()
        .arg(&pages)
        .arg(fixture_path("map.json"))
        .arg("--execute")
        .assert()
        .success()
        .stdout(predicate::str::contains("=== FIXED: 2 visuals ==="))
        .stdout(predicate::str::contains("title='Försäljning per Region'"));

    let chart = read_json(&visual(&pages, "overview", "a1b2c3"));
    assert_eq!(
        chart.pointer("/visual/visualContainerObjects/title/0/properties/text/expr/Literal/Value"),
        Some(&Value::from("'Försäljning per Region'"))
    );
    assert_eq!(
        chart.pointer("/visual/query/queryState/Y/projections/0/displayName"),
        Some(&Value::from("Försäljning"))
    );
    // Identity mapping adds no displayName
    assert!(chart
        .pointer("/visual/query/queryState/Category/projections/0/displayName")
        .is_none());
    // Key order is preserved
    let keys: Vec<&String> = chart.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["$schema", "name", "position", "visual"]);

    let slicer = read_json(&visual(&pages, "overview", "d4e5f6"));
    assert_eq!(
        slicer.pointer("/visual/objects/header/0/properties/text/expr/Literal/Value"),
        Some(&Value::from("'Kategori'"))
    );
    assert_eq!(
        slicer.pointer("/visual/visualContainerObjects/title/0/properties/show/expr/Literal/Value"),
        Some(&Value::from("false"))
    );
    assert_eq!(std::fs::read(visual(&pages, "details", "c0d1e2")).unwrap(), untouched);

    let after_first = snapshot(&pages);
    titles()
        .arg(&pages)
        .arg(fixture_path("map.json"))
        .arg("--execute")
        .assert()
        .success()
        .stdout(predicate::str::contains("=== FIXED: 0 visuals ==="))
        .stdout(predicate::str::contains("Summary: 0 need fix, 4 already OK"));
    assert_eq!(snapshot(&pages), after_first);
}

#[test]
fn titles_phrasing_flags_override_map() {
    let (_dir, pages) = report(&[("p", "v1", "bar_chart.json")]);

    titles()
        .arg(&pages)
        .arg(fixture_path("map.json"))
        .args(["--scan", "--by", "nach"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Title would be: Försäljning nach Region"));
}

#[test]
fn titles_invalid_json_is_reported_and_run_continues() {
    let (_dir, pages) = report(&[("p", "v1", "bar_chart.json")]);
    let broken = pages.join("p").join("visuals").join("v2");
    std::fs::create_dir_all(&broken).unwrap();
    std::fs::write(broken.join("visual.json"), "{ not json").unwrap();

    titles()
        .arg(&pages)
        .arg(fixture_path("map.json"))
        .arg("--execute")
        .assert()
        .success()
        .stdout(predicate::str::contains("ERRORS (1):"))
        .stdout(predicate::str::contains("p/visuals/v2/visual.json"))
        .stdout(predicate::str::contains("=== FIXED: 1 visuals ==="));

    assert_eq!(
        std::fs::read_to_string(broken.join("visual.json")).unwrap(),
        "{ not json"
    );
}

#[test]
fn titles_missing_pages_dir_fails() {
    titles()
        .arg("/nonexistent/pbip_pages_xyz")
        .arg(fixture_path("map.json"))
        .arg("--scan")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("pages_dir not found"));
}

#[test]
fn titles_missing_map_fails() {
    let (_dir, pages) = sample_report();
    titles()
        .arg(&pages)
        .arg("/nonexistent/pbip_map_xyz.json")
        .arg("--scan")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("translation_map not found"));
}

#[test]
fn titles_invalid_map_fails() {
    let (dir, pages) = sample_report();
    let map = dir.path().join("map.json");
    std::fs::write(&map, "{\"translations\": [1, 2]}").unwrap();
    titles()
        .arg(&pages)
        .arg(&map)
        .arg("--scan")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid translation map"));
}

#[test]
fn titles_requires_a_mode() {
    let (_dir, pages) = sample_report();
    titles()
        .arg(&pages)
        .arg(fixture_path("map.json"))
        .assert()
        .failure();
}

// -- pbip-translate --

#[test]
fn translate_scan_prints_starter_map() {
    let (_dir, pages) = sample_report();

    let assert = translate().arg(&pages).arg("--scan").assert().success();
    let starter: Value = serde_json::from_str(&stdout(&assert)).unwrap();
    let translations = starter["translations"].as_object().unwrap();

    assert_eq!(
        translations["Sales"],
        "TODO: Sales (appears 1x, 0 already have displayName)"
    );
    assert_eq!(
        translations["Order Date"],
        "TODO: Order Date (appears 1x, 1 already have displayName)"
    );
    assert!(translations.contains_key("Id"));
    assert_eq!(starter["skip"], Value::Array(vec![]));
}

#[test]
fn translate_scan_warns_about_unreadable_files() {
    let (_dir, pages) = report(&[("p", "v1", "bar_chart.json")]);
    let broken = pages.join("p").join("visuals").join("v2");
    std::fs::create_dir_all(&broken).unwrap();
    std::fs::write(broken.join("visual.json"), "{ not json").unwrap();

    let assert = translate()
        .arg(&pages)
        .arg("--scan")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Warning: 1 visual files could not be read; the starter map is incomplete",
        ));
    let starter: Value = serde_json::from_str(&stdout(&assert)).unwrap();
    assert!(starter["translations"].get("Sales").is_some());
}

#[test]
fn translate_reports_file_count_before_results() {
    let (_dir, pages) = sample_report();
    let assert = translate()
        .arg(&pages)
        .arg(fixture_path("map.json"))
        .arg("--dry-run")
        .assert()
        .success();
    let out = stdout(&assert);
    let found = out.find("Found 4 visual.json files").unwrap();
    let results = out.find("=== RESULTS ===").unwrap();
    assert!(found < results, "Got: {out}");
}

#[test]
fn translate_scan_merges_existing_map() {
    let (_dir, pages) = sample_report();

    let assert = translate()
        .arg(&pages)
        .arg(fixture_path("map.json"))
        .arg("--scan")
        .assert()
        .success();
    let starter: Value = serde_json::from_str(&stdout(&assert)).unwrap();

    assert_eq!(starter["translations"]["Sales"], "Försäljning");
    assert!(starter["translations"].get("Id").is_none());
    assert_eq!(starter["skip"], serde_json::json!(["Id"]));
    assert_eq!(starter["phrasing"]["and"], "och");
}

#[test]
fn translate_dry_run_lists_changes() {
    let (_dir, pages) = sample_report();
    let before = snapshot(&pages);

    translate()
        .arg(&pages)
        .arg(fixture_path("map.json"))
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mode: DRY RUN"))
        .stdout(predicate::str::contains("Skip list: 1 entries"))
        .stdout(predicate::str::contains("=== CHANGES ==="))
        .stdout(predicate::str::contains("Sales -> Försäljning  [a1b2c3]"))
        .stdout(predicate::str::contains("Category -> Kategori  [d4e5f6]"))
        .stdout(predicate::str::contains("Translations added: 2"));

    assert_eq!(snapshot(&pages), before);
}

#[test]
fn translate_execute_only_touches_display_names() {
    let (_dir, pages) = sample_report();
    let table_before = std::fs::read(visual(&pages, "details", "a7b8c9")).unwrap();

    translate()
        .arg(&pages)
        .arg(fixture_path("map.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Mode: LIVE"))
        .stdout(predicate::str::contains("Files scanned: 4"))
        .stdout(predicate::str::contains("Files modified: 2"))
        .stdout(predicate::str::contains("Already had displayName: 1"))
        .stdout(predicate::str::contains("Skipped: 2"));

    let chart = read_json(&visual(&pages, "overview", "a1b2c3"));
    assert!(chart.pointer("/visual/visualContainerObjects").is_none());
    assert_eq!(
        chart.pointer("/visual/query/queryState/Y/projections/0/displayName"),
        Some(&Value::from("Försäljning"))
    );
    let slicer = read_json(&visual(&pages, "overview", "d4e5f6"));
    assert_eq!(
        slicer.pointer("/visual/objects/header/0/properties/text/expr/Literal/Value"),
        Some(&Value::from("'Category'"))
    );
    // Skipped field only: file untouched
    assert_eq!(std::fs::read(visual(&pages, "details", "a7b8c9")).unwrap(), table_before);

    translate()
        .arg(&pages)
        .arg(fixture_path("map.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Files modified: 0"));
}

#[test]
fn translate_requires_map_unless_scanning() {
    let (_dir, pages) = sample_report();
    translate()
        .arg(&pages)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("translation_map required"));
}

#[test]
fn translate_missing_pages_dir_fails() {
    translate()
        .arg("/nonexistent/pbip_pages_xyz")
        .arg("--scan")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not a directory"));
}
