//! Target schema: the ordered field descriptors records are mapped onto.

use serde::{Deserialize, Deserializer, Serialize};

/// How important a field is to the final dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    #[default]
    Medium,
    Low,
}

/// Descriptor for one canonical field.
///
/// On the plan wire format a field may arrive as a bare string or as a
/// `{name, description, importance}` object; both deserialize to this.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    /// Canonical field name.
    pub name: String,
    /// What the field holds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Importance of the field.
    #[serde(default)]
    pub importance: Importance,
}

impl FieldSpec {
    /// Create a field spec with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            importance: Importance::default(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the importance.
    pub fn with_importance(mut self, importance: Importance) -> Self {
        self.importance = importance;
        self
    }
}

impl<'de> Deserialize<'de> for FieldSpec {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Name(String),
            Spec {
                #[serde(default)]
                name: String,
                #[serde(default)]
                description: Option<String>,
                #[serde(default)]
                importance: Importance,
            },
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Name(name) => FieldSpec::new(name),
            Wire::Spec {
                name,
                description,
                importance,
            } => FieldSpec {
                name,
                description,
                importance,
            },
        })
    }
}

/// Ordered sequence of field descriptors.
///
/// Order matters: it determines tie-break priority when the reconciliation
/// engine has several equally-fuzzy candidates. Field names are unique;
/// a later duplicate name is dropped on construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetSchema {
    fields: Vec<FieldSpec>,
}

impl TargetSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schema from field specs, keeping the first occurrence of
    /// each name.
    pub fn from_fields(fields: Vec<FieldSpec>) -> Self {
        let mut seen = Vec::new();
        let mut unique = Vec::new();
        for field in fields {
            if field.name.is_empty() || seen.contains(&field.name) {
                continue;
            }
            seen.push(field.name.clone());
            unique.push(field);
        }
        Self { fields: unique }
    }

    /// Build a schema from bare field names.
    pub fn from_names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self::from_fields(names.into_iter().map(|n| FieldSpec::new(n)).collect())
    }

    /// The field descriptors, in priority order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Field names, in priority order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_spec_from_string() {
        let spec: FieldSpec = serde_json::from_str("\"price\"").unwrap();
        assert_eq!(spec.name, "price");
        assert_eq!(spec.importance, Importance::Medium);
    }

    #[test]
    fn test_field_spec_from_object() {
        let spec: FieldSpec = serde_json::from_str(
            r#"{"name": "release_date", "description": "First release", "importance": "high"}"#,
        )
        .unwrap();
        assert_eq!(spec.name, "release_date");
        assert_eq!(spec.importance, Importance::High);
        assert_eq!(spec.description.as_deref(), Some("First release"));
    }

    #[test]
    fn test_schema_deduplicates_names() {
        let schema = TargetSchema::from_names(["name", "price", "name", ""]);
        assert_eq!(schema.field_names(), vec!["name", "price"]);
    }

    #[test]
    fn test_schema_preserves_order() {
        let schema = TargetSchema::from_names(["b", "a", "c"]);
        assert_eq!(schema.field_names(), vec!["b", "a", "c"]);
    }
}
