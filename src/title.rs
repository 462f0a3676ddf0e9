//! Title-need classification.
//!
//! Power BI auto-generates a title from model field names whenever the title
//! is visible and carries no text, which leaves untranslated titles in an
//! otherwise translated report.

use crate::document;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleState {
    /// No title list at all
    NoSection,
    /// `show` is the literal `"false"`
    Hidden,
    /// A `text` property is already set (raw literal, possibly empty)
    HasText(String),
    /// Visible (explicitly or by default) without text
    VisibleNoText { explicit_show: bool },
}

impl TitleState {
    pub fn needs_title(&self) -> bool {
        matches!(self, TitleState::NoSection | TitleState::VisibleNoText { .. })
    }
}

impl fmt::Display for TitleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TitleState::NoSection => f.write_str("no_title_section"),
            TitleState::Hidden => f.write_str("hidden"),
            TitleState::HasText(text) => write!(f, "has_text: {text}"),
            TitleState::VisibleNoText { explicit_show: true } => f.write_str("show_true_no_text"),
            TitleState::VisibleNoText { explicit_show: false } => f.write_str("no_show_property"),
        }
    }
}

/// Classify the title of a visual document.
pub fn classify(doc: &Value) -> TitleState {
    let Some(section) = document::title_section(doc) else {
        return TitleState::NoSection;
    };
    let properties = section.get("properties");
    let show = properties
        .and_then(|p| p.get("show"))
        .and_then(document::literal_value);

    if show == Some("false") {
        return TitleState::Hidden;
    }
    if let Some(text) = properties.and_then(|p| p.get("text")) {
        let literal = document::literal_value(text).unwrap_or_default();
        return TitleState::HasText(literal.to_string());
    }
    TitleState::VisibleNoText {
        explicit_show: show == Some("true"),
    }
}
