//! Field extraction from `visual.query.queryState`.

use crate::document;
use crate::model::{FieldDescriptor, RoleBucket};
use serde_json::Value;

/// Collect every projection per role, in document order.
///
/// A projection without `nativeQueryRef` is kept with an empty native name
/// so nothing is dropped; its display name still comes from `displayName`.
pub fn extract_fields(doc: &Value) -> RoleBucket {
    let mut bucket = RoleBucket::default();
    for (role, projections) in document::query_roles(doc) {
        let fields = projections.iter().map(descriptor).collect();
        bucket.push(role, fields);
    }
    bucket
}

fn descriptor(projection: &Value) -> FieldDescriptor {
    let native = projection
        .get("nativeQueryRef")
        .and_then(Value::as_str)
        .unwrap_or("");
    let display = projection.get("displayName").and_then(Value::as_str);
    FieldDescriptor::new(native, display)
}
