//! Title synthesis — visual type dispatch to composition templates.
//!
//! Field names are translated (when the map has an applicable entry),
//! sorted into four buckets by role, and then joined according to the
//! template of the visual's kind:
//!
//! | Kind           | Template                                   |
//! |----------------|--------------------------------------------|
//! | `Card`         | values                                     |
//! | `Cartesian`    | `<values> <by> <axis>`, or either alone    |
//! | `Pivot`        | `<values, ...> <by> <rows> <and> <columns>` |
//! | `Table`        | values, rows, columns, axis — comma-joined |
//! | `Slicer`       | all buckets joined with the conjunction    |
//! | `Proportional` | as `Cartesian`                             |
//! | `Scatter`      | values                                     |
//! | `Other`        | all buckets — comma-joined                 |

use crate::model::RoleBucket;
use crate::translations::{Phrasing, TranslationMap};

/// Visual type tag, with an explicit fallback for types not listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualKind {
    Card,
    Cartesian,
    Pivot,
    Table,
    Slicer,
    Proportional,
    Scatter,
    Other(String),
}

impl VisualKind {
    pub fn from_type(visual_type: &str) -> Self {
        match visual_type {
            "card" | "multiRowCard" | "kpi" => VisualKind::Card,
            "barChart"
            | "columnChart"
            | "lineChart"
            | "clusteredBarChart"
            | "clusteredColumnChart"
            | "stackedBarChart"
            | "stackedColumnChart"
            | "lineStackedColumnComboChart"
            | "lineClusteredColumnComboChart"
            | "areaChart"
            | "stackedAreaChart"
            | "waterfallChart"
            | "funnel"
            | "hundredPercentStackedBarChart"
            | "hundredPercentStackedColumnChart" => VisualKind::Cartesian,
            "pivotTable" => VisualKind::Pivot,
            "tableEx" => VisualKind::Table,
            "slicer" => VisualKind::Slicer,
            "donutChart" | "pieChart" | "treemap" => VisualKind::Proportional,
            "scatterChart" => VisualKind::Scatter,
            other => VisualKind::Other(other.to_string()),
        }
    }

    pub fn template(&self) -> Template {
        match self {
            VisualKind::Card | VisualKind::Scatter => Template::ValuesOnly,
            VisualKind::Cartesian | VisualKind::Proportional => Template::ValuesByAxis,
            VisualKind::Pivot => Template::Pivot,
            VisualKind::Table => Template::FlatTable,
            VisualKind::Slicer => Template::Conjoined,
            VisualKind::Other(_) => Template::CommaJoined,
        }
    }
}

/// How the buckets are put together into one title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    ValuesOnly,
    ValuesByAxis,
    Pivot,
    FlatTable,
    Conjoined,
    CommaJoined,
}

/// Translated field names sorted by the part they play in a title.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TitleBuckets {
    pub values: Vec<String>,
    pub axis: Vec<String>,
    pub rows: Vec<String>,
    pub columns: Vec<String>,
}

impl TitleBuckets {
    /// Sort display names into buckets, translating each one.
    pub fn from_fields(fields: &RoleBucket, translations: &TranslationMap) -> Self {
        let mut buckets = TitleBuckets::default();
        for (role, descriptors) in fields.iter() {
            let target = match role {
                "Values" => &mut buckets.values,
                "Category" | "X" | "Series" | "Axis" => &mut buckets.axis,
                "Rows" => &mut buckets.rows,
                "Columns" => &mut buckets.columns,
                _ => &mut buckets.values,
            };
            target.extend(
                descriptors
                    .iter()
                    .map(|f| f.display.as_str())
                    .filter(|name| !name.trim().is_empty())
                    .map(|name| translations.translate(name).trim().to_string()),
            );
        }
        buckets
    }
}

impl Template {
    pub fn compose(&self, b: &TitleBuckets, phrasing: &Phrasing) -> Option<String> {
        let sep = format!(" {} ", phrasing.and);
        let and = sep.as_str();
        let title = match self {
            Template::ValuesOnly => b.values.join(and),
            Template::ValuesByAxis => match (b.values.is_empty(), b.axis.is_empty()) {
                (false, false) => {
                    format!("{} {} {}", b.values.join(and), phrasing.by, b.axis.join(and))
                }
                (false, true) => b.values.join(and),
                (true, _) => b.axis.join(and),
            },
            Template::Pivot => {
                let mut parts = Vec::new();
                if !b.values.is_empty() {
                    parts.push(b.values.join(", "));
                }
                if !b.rows.is_empty() {
                    parts.push(format!("{} {}", phrasing.by, b.rows.join(and)));
                }
                if !b.columns.is_empty() {
                    parts.push(format!("{} {}", phrasing.and, b.columns.join(and)));
                }
                parts.join(" ")
            }
            Template::FlatTable => chain(&[&b.values, &b.rows, &b.columns, &b.axis]).join(", "),
            Template::Conjoined => chain(&[&b.values, &b.axis, &b.rows, &b.columns]).join(and),
            Template::CommaJoined => chain(&[&b.values, &b.axis, &b.rows, &b.columns]).join(", "),
        };
        (!title.is_empty()).then_some(title)
    }
}

fn chain(buckets: &[&Vec<String>]) -> Vec<String> {
    buckets.iter().flat_map(|b| b.iter().cloned()).collect()
}

/// Compose a title for a visual, or `None` when no contributing field exists.
pub fn synthesize_title(
    visual_type: &str,
    fields: &RoleBucket,
    translations: &TranslationMap,
    phrasing: &Phrasing,
) -> Option<String> {
    let buckets = TitleBuckets::from_fields(fields, translations);
    VisualKind::from_type(visual_type)
        .template()
        .compose(&buckets, phrasing)
}
