//! Display-name translation merge.
//!
//! Every projection that carries a `nativeQueryRef` is classified exactly
//! once per pass:
//!
//! - has `displayName` with an applicable translation → rewritten, *translated*
//! - has any other `displayName` → *already present* (never cleared)
//! - native in the skip list → *skipped*
//! - native with an applicable translation → `displayName` added, *translated*
//! - native mapped to itself → *skipped*
//! - anything else (no entry, or a `TODO:` placeholder) → *unmapped*
//!
//! Running the merge over its own output finds nothing left to translate.

use crate::document;
use crate::translations::{Lookup, TranslationMap};
use serde_json::Value;

/// A display name that was added or rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayNameChange {
    pub native: String,
    /// Display name before the change; `None` when it was added
    pub previous: Option<String>,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    Translated(DisplayNameChange),
    AlreadyPresent(String),
    Skipped(String),
    Unmapped(String),
}

/// Classification of every projection in one document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub outcomes: Vec<FieldOutcome>,
}

impl MergeReport {
    pub fn changes(&self) -> impl Iterator<Item = &DisplayNameChange> {
        self.outcomes.iter().filter_map(|o| match o {
            FieldOutcome::Translated(change) => Some(change),
            _ => None,
        })
    }

    pub fn changed(&self) -> bool {
        self.changes().next().is_some()
    }

    pub fn translated(&self) -> usize {
        self.changes().count()
    }

    pub fn already_present(&self) -> usize {
        self.count(|o| matches!(o, FieldOutcome::AlreadyPresent(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FieldOutcome::Skipped(_)))
    }

    pub fn unmapped(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().filter_map(|o| match o {
            FieldOutcome::Unmapped(native) => Some(native.as_str()),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&FieldOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|&o| pred(o)).count()
    }
}

/// Classify every projection; when `apply` is set, write the translations
/// into the document as well.
pub fn merge_display_names(
    doc: &mut Value,
    translations: &TranslationMap,
    apply: bool,
) -> MergeReport {
    let mut report = MergeReport::default();

    for projection in document::projections_mut(doc) {
        let Some(native) = projection
            .get("nativeQueryRef")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
        else {
            continue;
        };

        let outcome = match projection.get("displayName") {
            Some(existing) => match existing.as_str().and_then(|e| {
                translations.resolve(e).map(|t| (e.to_string(), t.to_string()))
            }) {
                Some((previous, display)) => FieldOutcome::Translated(DisplayNameChange {
                    native,
                    previous: Some(previous),
                    display,
                }),
                None => FieldOutcome::AlreadyPresent(native),
            },
            None if translations.is_skipped(&native) => FieldOutcome::Skipped(native),
            None => match translations.lookup(&native) {
                Lookup::Applicable(display) => FieldOutcome::Translated(DisplayNameChange {
                    display: display.to_string(),
                    native,
                    previous: None,
                }),
                Lookup::Identity => FieldOutcome::Skipped(native),
                Lookup::Placeholder | Lookup::Missing => FieldOutcome::Unmapped(native),
            },
        };

        if apply {
            if let FieldOutcome::Translated(change) = &outcome {
                projection.insert(
                    "displayName".to_string(),
                    Value::String(change.display.clone()),
                );
            }
        }
        report.outcomes.push(outcome);
    }

    report
}
