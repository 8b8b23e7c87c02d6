use crate::{
    MAX_FIELD_NAME_LEN, MAX_MODEL_NAME_LEN, SchemaError, err, error::ErrorTree, model::Schema,
};
use std::collections::BTreeMap;

/// Case-folded event-grammar tokens that field names must never collide
/// with. The dot grammar is positional: a field named `before` at segment
/// two would be indistinguishable from a hook marker.
const RESERVED_TOKENS: [&str; 7] = [
    "after",
    "before",
    "create",
    "delete",
    "findmany",
    "findunique",
    "update",
];

/// Run full schema validation in a staged, deterministic order.
pub fn validate_schema(schema: &Schema) -> Result<(), SchemaError> {
    let mut errs = ErrorTree::new();

    validate_idents(schema, &mut errs);
    validate_naming(schema, &mut errs);

    errs.result().map_err(SchemaError::Validation)
}

// Per-node structural checks: shape of each identifier in isolation.
fn validate_idents(schema: &Schema, errs: &mut ErrorTree) {
    for model in &schema.models {
        check_ident(&model.name, MAX_MODEL_NAME_LEN, "model", errs);

        for field in &model.fields {
            check_ident(&field.name, MAX_FIELD_NAME_LEN, "field", errs);

            if RESERVED_TOKENS.contains(&field.name.to_lowercase().as_str()) {
                err!(
                    errs,
                    "field '{}.{}' collides with an event grammar token",
                    model.name,
                    field.name
                );
            }
        }
    }
}

fn check_ident(name: &str, max_len: usize, kind: &str, errs: &mut ErrorTree) {
    if name.is_empty() {
        err!(errs, "{kind} name must not be empty");
    }
    if name.len() > max_len {
        err!(errs, "{kind} name '{name}' exceeds {max_len} characters");
    }
    // '.' is the event key separator
    if name.contains('.') {
        err!(errs, "{kind} name '{name}' must not contain '.'");
    }
}

// Schema-wide checks: uniqueness across the full model list.
fn validate_naming(schema: &Schema, errs: &mut ErrorTree) {
    let mut models: BTreeMap<String, String> = BTreeMap::new();

    for model in &schema.models {
        let folded = model.name.to_lowercase();
        if let Some(prev) = models.insert(folded, model.name.clone()) {
            err!(
                errs,
                "duplicate model name '{}' collides with '{prev}'",
                model.name
            );
        }

        let mut fields: BTreeMap<String, String> = BTreeMap::new();
        for field in &model.fields {
            let folded = field.name.to_lowercase();
            if let Some(prev) = fields.insert(folded, field.name.clone()) {
                err!(
                    errs,
                    "duplicate field name '{}.{}' collides with '{prev}'",
                    model.name,
                    field.name
                );
            }
        }
    }
}
