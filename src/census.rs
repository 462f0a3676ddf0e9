//! `nativeQueryRef` census and starter translation maps.
//!
//! Counting every native field across a report gives the operator a map to
//! fill in: each field gets a `TODO:` placeholder that the merge refuses to
//! apply until it is replaced.

use crate::document;
use crate::translations::{is_placeholder, TranslationMap, PLACEHOLDER_PREFIX};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefCount {
    /// Projections using the native field
    pub count: usize,
    /// How many of those already carry a `displayName`
    pub with_display_name: usize,
}

/// Native field usage across a set of documents, sorted by name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RefCensus {
    pub refs: BTreeMap<String, RefCount>,
}

impl RefCensus {
    /// Count the projections of one document.
    pub fn record(&mut self, doc: &Value) {
        for (_, projections) in document::query_roles(doc) {
            for projection in projections {
                let Some(native) = projection
                    .get("nativeQueryRef")
                    .and_then(Value::as_str)
                    .filter(|n| !n.is_empty())
                else {
                    continue;
                };
                let entry = self.refs.entry(native.to_string()).or_default();
                entry.count += 1;
                if projection.get("displayName").is_some() {
                    entry.with_display_name += 1;
                }
            }
        }
    }

    /// Build a starter map. Resolved entries and the skip list of `existing`
    /// are kept; every other native field gets a placeholder.
    pub fn starter_map(&self, existing: Option<&TranslationMap>) -> TranslationMap {
        let mut map = existing.cloned().unwrap_or_default();
        for (native, rc) in &self.refs {
            if map.is_skipped(native) {
                continue;
            }
            let resolved = map
                .translations
                .get(native)
                .is_some_and(|t| !is_placeholder(t));
            if !resolved {
                map.translations
                    .insert(native.clone(), placeholder(native, rc));
            }
        }
        map
    }
}

fn placeholder(native: &str, rc: &RefCount) -> String {
    format!(
        "{PLACEHOLDER_PREFIX} {native} (appears {}x, {} already have displayName)",
        rc.count, rc.with_display_name
    )
}
