//! Slicer header text detection and rewriting.
//!
//! Slicers carry their own header text under `visual.objects.header`, which
//! Power BI fills with the model field name unless it is overridden.

use crate::document;
use crate::translations::TranslationMap;
use serde_json::Value;

/// A header literal that has a translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlicerHeaderFix {
    /// Position in `objects.header`
    pub index: usize,
    /// Current text, quotes stripped
    pub current: String,
    pub translated: String,
}

/// Find header entries whose text has an applicable translation.
/// Non-slicer visuals always yield nothing.
pub fn detect_header_fixes(doc: &Value, translations: &TranslationMap) -> Vec<SlicerHeaderFix> {
    if document::visual_type(doc) != "slicer" {
        return Vec::new();
    }
    document::header_texts(doc)
        .into_iter()
        .filter_map(|(index, raw)| {
            let current = document::unquote_literal(raw);
            let translated = translations.resolve(&current)?.to_string();
            Some(SlicerHeaderFix {
                index,
                current,
                translated,
            })
        })
        .collect()
}

/// Write the fixes back into the document. Returns how many were applied.
pub fn apply_header_fixes(doc: &mut Value, fixes: &[SlicerHeaderFix]) -> usize {
    fixes
        .iter()
        .filter(|fix| document::set_header_text(doc, fix.index, &fix.translated))
        .count()
}
