//! Field data extracted from a visual's query state — schema-agnostic.

/// One projection bound to a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// `nativeQueryRef`, the model-side field name
    pub native: String,
    /// `displayName`, or `native` when the projection has none
    pub display: String,
}

impl FieldDescriptor {
    pub fn new(native: impl Into<String>, display: Option<&str>) -> Self {
        let native = native.into();
        let display = display.map(str::to_string).unwrap_or_else(|| native.clone());
        Self { native, display }
    }
}

/// Role name → ordered fields, roles kept in document order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RoleBucket {
    roles: Vec<(String, Vec<FieldDescriptor>)>,
}

impl RoleBucket {
    /// Append fields for a role. Empty lists are dropped; a repeated role
    /// extends the existing entry.
    pub fn push(&mut self, role: &str, fields: Vec<FieldDescriptor>) {
        if fields.is_empty() {
            return;
        }
        match self.roles.iter_mut().find(|(r, _)| r == role) {
            Some((_, existing)) => existing.extend(fields),
            None => self.roles.push((role.to_string(), fields)),
        }
    }

    pub fn get(&self, role: &str) -> Option<&[FieldDescriptor]> {
        self.roles
            .iter()
            .find(|(r, _)| r == role)
            .map(|(_, f)| f.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FieldDescriptor])> {
        self.roles.iter().map(|(r, f)| (r.as_str(), f.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Display names per role, for reporting.
    pub fn display_names(&self) -> Vec<(String, Vec<String>)> {
        self.roles
            .iter()
            .map(|(r, f)| (r.clone(), f.iter().map(|d| d.display.clone()).collect()))
            .collect()
    }
}
