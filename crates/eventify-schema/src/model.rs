use serde::{Deserialize, Serialize};

///
/// Schema
///
/// Ordered, read-only description of a data model as supplied by the
/// schema provider. Model and field order is preserved verbatim; every
/// generated artifact iterates in this order so regeneration is diffable.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Schema {
    pub models: Vec<ModelDescriptor>,
}

impl Schema {
    #[must_use]
    pub const fn new(models: Vec<ModelDescriptor>) -> Self {
        Self { models }
    }

    /// Look up a model by name, case-insensitively.
    #[must_use]
    pub fn model(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Fields of a model, or an empty slice when the model is unknown.
    #[must_use]
    pub fn model_fields(&self, name: &str) -> &[FieldDescriptor] {
        self.model(name).map_or(&[], |m| m.fields.as_slice())
    }

    /// Look up a single field on a model, case-insensitively.
    #[must_use]
    pub fn field(&self, model: &str, field: &str) -> Option<&FieldDescriptor> {
        self.model_fields(model)
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(field))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

///
/// ModelDescriptor
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ModelDescriptor {
    pub name: String,

    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl ModelDescriptor {
    #[must_use]
    pub const fn new(name: String, fields: Vec<FieldDescriptor>) -> Self {
        Self { name, fields }
    }
}

///
/// FieldDescriptor
///
/// A named field carrying a symbolic type tag. Tags outside the known
/// primitive set are passed through and map to the universal value type.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FieldDescriptor {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: String,
}

impl FieldDescriptor {
    #[must_use]
    pub const fn new(name: String, ty: String) -> Self {
        Self { name, ty }
    }

    /// Resolve the symbolic tag to a primitive.
    #[must_use]
    pub fn primitive(&self) -> crate::types::Primitive {
        crate::types::Primitive::from_tag(&self.ty)
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldDescriptor, ModelDescriptor, Schema};

    fn schema() -> Schema {
        Schema::new(vec![ModelDescriptor::new(
            "User".into(),
            vec![
                FieldDescriptor::new("id".into(), "Int".into()),
                FieldDescriptor::new("email".into(), "String".into()),
            ],
        )])
    }

    #[test]
    fn model_lookup_is_case_insensitive() {
        let schema = schema();
        assert!(schema.model("user").is_some());
        assert!(schema.model("USER").is_some());
        assert!(schema.model("post").is_none());
    }

    #[test]
    fn field_lookup_is_case_insensitive() {
        let schema = schema();
        assert_eq!(schema.field("user", "EMAIL").map(|f| f.ty.as_str()), Some("String"));
        assert!(schema.field("user", "missing").is_none());
    }

    #[test]
    fn unknown_model_has_no_fields() {
        assert!(schema().model_fields("post").is_empty());
    }

    #[test]
    fn deserializes_from_provider_json() {
        let schema: Schema = serde_json::from_str(
            r#"{"models":[{"name":"Post","fields":[{"name":"title","type":"String"}]}]}"#,
        )
        .unwrap();
        assert_eq!(schema.models.len(), 1);
        assert_eq!(schema.models[0].fields[0].name, "title");
    }
}
