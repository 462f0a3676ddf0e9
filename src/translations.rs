//! Translation map: `{"translations": {...}, "skip": [...], "phrasing": {...}}`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Entries starting with this are unresolved and never applied.
pub const PLACEHOLDER_PREFIX: &str = "TODO:";

pub fn is_placeholder(text: &str) -> bool {
    text.starts_with(PLACEHOLDER_PREFIX)
}

/// Joining words used when composing titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Phrasing {
    /// Conjunction between several field names ("and", "och")
    pub and: String,
    /// Separator between measures and their axis ("by", "per")
    pub by: String,
}

impl Default for Phrasing {
    fn default() -> Self {
        Self {
            and: "and".to_string(),
            by: "by".to_string(),
        }
    }
}

impl Phrasing {
    /// Apply CLI overrides on top of this phrasing.
    pub fn with_overrides(mut self, and: Option<&str>, by: Option<&str>) -> Self {
        if let Some(and) = and {
            self.and = and.to_string();
        }
        if let Some(by) = by {
            self.by = by.to_string();
        }
        self
    }
}

/// Outcome of looking a source text up in the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// A usable translation that differs from the source
    Applicable(&'a str),
    /// The entry maps the text to itself
    Identity,
    /// The entry is still a `TODO:` placeholder
    Placeholder,
    Missing,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationMap {
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
    #[serde(default)]
    pub skip: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phrasing: Option<Phrasing>,
}

impl TranslationMap {
    /// Read and parse a map file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&text, path)
    }

    /// Parse map JSON; `path` is only used for error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::InvalidMap {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn lookup(&self, source: &str) -> Lookup<'_> {
        match self.translations.get(source) {
            None => Lookup::Missing,
            Some(t) if is_placeholder(t) => Lookup::Placeholder,
            Some(t) if t == source => Lookup::Identity,
            Some(t) => Lookup::Applicable(t),
        }
    }

    /// The translation for `source`, if one may be applied.
    pub fn resolve(&self, source: &str) -> Option<&str> {
        match self.lookup(source) {
            Lookup::Applicable(t) => Some(t),
            _ => None,
        }
    }

    /// `source` translated when possible, otherwise unchanged.
    pub fn translate<'a>(&'a self, source: &'a str) -> &'a str {
        self.resolve(source).unwrap_or(source)
    }

    pub fn is_skipped(&self, native: &str) -> bool {
        self.skip.contains(native)
    }

    /// Number of entries that are still placeholders.
    pub fn placeholder_count(&self) -> usize {
        self.translations.values().filter(|t| is_placeholder(t)).count()
    }
}
