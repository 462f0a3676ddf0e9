//! Accessors over the `visual.json` schema.
//!
//! Documents stay as [`serde_json::Value`] so that everything the engine does
//! not touch round-trips unchanged (key order included). The paths used here:
//!
//! - `visual.visualType`
//! - `visual.query.queryState.<role>.projections[]{nativeQueryRef, displayName?}`
//! - `visual.visualContainerObjects.title[0].properties.{show,text}.expr.Literal.Value`
//! - `visual.objects.header[].properties.text.expr.Literal.Value`

use serde_json::{json, Map, Value};

/// Visual type, falling back to a top-level `visualType` and then `"unknown"`.
pub fn visual_type(doc: &Value) -> &str {
    doc.pointer("/visual/visualType")
        .or_else(|| doc.get("visualType"))
        .and_then(Value::as_str)
        .unwrap_or("unknown")
}

/// Role buckets of the query state, in document order.
///
/// Buckets that are not objects or carry no `projections` array are skipped.
pub fn query_roles(doc: &Value) -> impl Iterator<Item = (&str, &[Value])> {
    doc.pointer("/visual/query/queryState")
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|qs| qs.iter())
        .filter_map(|(role, bucket)| {
            let projections = bucket.get("projections")?.as_array()?;
            Some((role.as_str(), projections.as_slice()))
        })
}

/// Every projection object across all roles, for in-place rewriting.
pub fn projections_mut(doc: &mut Value) -> impl Iterator<Item = &mut Map<String, Value>> {
    doc.pointer_mut("/visual/query/queryState")
        .and_then(Value::as_object_mut)
        .into_iter()
        .flat_map(|qs| qs.values_mut())
        .filter_map(|bucket| bucket.get_mut("projections").and_then(Value::as_array_mut))
        .flat_map(|projections| projections.iter_mut())
        .filter_map(Value::as_object_mut)
}

/// First entry of the title list, or `None` when there is no title section.
pub fn title_section(doc: &Value) -> Option<&Value> {
    doc.pointer("/visual/visualContainerObjects/title")
        .and_then(Value::as_array)
        .and_then(|list| list.first())
}

/// `expr.Literal.Value` of a property, when it is a string.
pub fn literal_value(property: &Value) -> Option<&str> {
    property.pointer("/expr/Literal/Value").and_then(Value::as_str)
}

/// Build a `{"expr": {"Literal": {"Value": "'text'"}}}` property.
pub fn literal_expr(text: &str) -> Value {
    json!({ "expr": { "Literal": { "Value": quote_literal(text) } } })
}

/// Quote a string for a report literal, doubling embedded quotes.
pub fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Strip one pair of surrounding single quotes and collapse `''` escapes.
/// Unquoted input is returned as-is.
pub fn unquote_literal(raw: &str) -> String {
    match raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        Some(inner) => inner.replace("''", "'"),
        None => raw.to_string(),
    }
}

/// Set the title text, creating the title section when it is missing.
///
/// Returns false when the document has no `visual` object to attach to.
pub fn set_title_text(doc: &mut Value, title: &str) -> bool {
    let Some(container) = doc
        .get_mut("visual")
        .and_then(|visual| child_object(visual, "visualContainerObjects"))
    else {
        return false;
    };
    let titles = container
        .entry("title")
        .or_insert_with(|| Value::Array(Vec::new()));
    let Some(list) = titles.as_array_mut() else {
        return false;
    };
    if list.is_empty() {
        list.push(json!({ "properties": {} }));
    }
    let Some(properties) = child_object(&mut list[0], "properties") else {
        return false;
    };
    properties.insert("text".to_string(), literal_expr(title));
    true
}

/// Whether [`set_title_text`] would succeed, without touching the document.
pub fn title_writable(doc: &Value) -> bool {
    fn absent_or_object(value: Option<&Value>) -> bool {
        value.map_or(true, Value::is_object)
    }

    let Some(visual) = doc.get("visual").filter(|v| v.is_object()) else {
        return false;
    };
    let container = visual.get("visualContainerObjects");
    if !absent_or_object(container) {
        return false;
    }
    let Some(titles) = container.and_then(|c| c.get("title")) else {
        return true;
    };
    let Some(list) = titles.as_array() else {
        return false;
    };
    match list.first() {
        None => true,
        Some(first) => first.is_object() && absent_or_object(first.get("properties")),
    }
}

/// Raw literal text of each slicer header entry, with its index.
/// Entries without a non-empty text literal are skipped.
pub fn header_texts(doc: &Value) -> Vec<(usize, &str)> {
    doc.pointer("/visual/objects/header")
        .and_then(Value::as_array)
        .map(|headers| {
            headers
                .iter()
                .enumerate()
                .filter_map(|(i, header)| {
                    let text = header
                        .pointer("/properties/text")
                        .and_then(literal_value)?;
                    (!text.is_empty()).then_some((i, text))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Rewrite the text literal of the header entry at `index`.
pub fn set_header_text(doc: &mut Value, index: usize, text: &str) -> bool {
    let pointer = format!("/visual/objects/header/{index}/properties/text/expr/Literal/Value");
    match doc.pointer_mut(&pointer) {
        Some(slot) => {
            *slot = Value::String(quote_literal(text));
            true
        }
        None => false,
    }
}

/// Get `key` as an object, inserting an empty one when absent.
/// `None` when `value` or the existing child is not an object.
fn child_object<'a>(value: &'a mut Value, key: &str) -> Option<&'a mut Map<String, Value>> {
    value
        .as_object_mut()?
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
}
