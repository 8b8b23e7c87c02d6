use crate::{
    event::{EventConstituents, Hook, Method, compose},
    policy::PolicyFilter,
};
use eventify_schema::model::Schema;
use indexmap::IndexMap;
use serde::Serialize;

///
/// EventDescriptor
///
/// One declared event: its camel-case key, its dot-case bus topic, and
/// the payload shape marker (`has_result` mirrors hook == after).
///

#[derive(Clone, Debug, Serialize)]
pub struct EventDescriptor {
    pub name: String,
    pub topic: String,
    pub constituents: EventConstituents,
    pub has_result: bool,
}

impl EventDescriptor {
    #[must_use]
    pub fn new(constituents: EventConstituents) -> Self {
        let ids = compose(&constituents);

        Self {
            name: ids.camel_case,
            topic: ids.dot_case,
            has_result: constituents.hook == Some(Hook::After),
            constituents,
        }
    }

    #[must_use]
    pub const fn is_field_level(&self) -> bool {
        self.constituents.field.is_some()
    }
}

///
/// EventCatalog
///
/// The complete generated event set for one schema+policy pass, keyed by
/// camel-case name. Insertion order is schema-provider order, which makes
/// subscription wiring and regeneration deterministic.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct EventCatalog {
    events: IndexMap<String, EventDescriptor>,
}

impl EventCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an event. Re-declaring a name replaces the descriptor but
    /// keeps its original position.
    pub fn declare(&mut self, descriptor: EventDescriptor) {
        self.events.insert(descriptor.name.clone(), descriptor);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EventDescriptor> {
        self.events.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.events.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EventDescriptor)> {
        self.events.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }
}

///
/// CatalogBuilder
///
/// Derives the full event taxonomy from a schema and a policy filter:
/// per allowed model, one event for each of the 5x2 (method, hook) pairs;
/// per allowed field, one for each mutating 3x2 pair. Iteration follows
/// schema order throughout.
///

pub struct CatalogBuilder<'a> {
    schema: &'a Schema,
    filter: &'a PolicyFilter,
}

impl<'a> CatalogBuilder<'a> {
    #[must_use]
    pub const fn new(schema: &'a Schema, filter: &'a PolicyFilter) -> Self {
        Self { schema, filter }
    }

    #[must_use]
    pub fn build(&self) -> EventCatalog {
        let mut catalog = EventCatalog::new();

        for model in &self.schema.models {
            if !self.filter.model_allowed(&model.name) {
                continue;
            }

            for method in Method::ALL {
                for hook in Hook::ALL {
                    catalog.declare(EventDescriptor::new(EventConstituents::model_level(
                        &model.name,
                        hook,
                        method,
                    )));
                }
            }

            for field in &model.fields {
                if !self.filter.field_allowed(&model.name, &field.name) {
                    continue;
                }

                for method in Method::MUTATING {
                    for hook in Hook::ALL {
                        catalog.declare(EventDescriptor::new(EventConstituents::field_level(
                            &model.name,
                            &field.name,
                            hook,
                            method,
                        )));
                    }
                }
            }
        }

        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::CatalogBuilder;
    use crate::policy::{Config, PolicyFilter};
    use eventify_schema::model::{FieldDescriptor, ModelDescriptor, Schema};

    fn schema() -> Schema {
        Schema::new(vec![
            ModelDescriptor::new(
                "User".into(),
                vec![
                    FieldDescriptor::new("id".into(), "Int".into()),
                    FieldDescriptor::new("email".into(), "String".into()),
                ],
            ),
            ModelDescriptor::new("Audit".into(), vec![]),
        ])
    }

    fn catalog(exclude_models: &[&str], exclude_fields: &[&str]) -> super::EventCatalog {
        let config = Config {
            exclude_models: exclude_models.iter().map(ToString::to_string).collect(),
            exclude_fields: exclude_fields.iter().map(ToString::to_string).collect(),
            out_dir: "./eventify".into(),
        };
        let filter = PolicyFilter::new(&config);
        CatalogBuilder::new(&schema(), &filter).build()
    }

    #[test]
    fn counts_follow_the_taxonomy_law() {
        // 2 models x 10 model-level + 2 allowed fields x 6 field-level
        assert_eq!(catalog(&[], &[]).len(), 2 * 10 + 2 * 6);
    }

    #[test]
    fn zero_field_models_still_get_crud_events() {
        let catalog = catalog(&[], &[]);
        assert!(catalog.contains("AuditBeforeFindMany"));
        assert!(catalog.contains("AuditAfterDelete"));
    }

    #[test]
    fn excluding_a_model_removes_all_its_events() {
        let catalog = catalog(&["user"], &[]);
        assert_eq!(catalog.len(), 10);
        assert!(!catalog.contains("UserBeforeCreate"));
        assert!(!catalog.contains("UserEmailBeforeCreate"));
    }

    #[test]
    fn excluding_a_field_removes_only_its_six_events() {
        let catalog = catalog(&[], &["id"]);
        assert_eq!(catalog.len(), 2 * 10 + 6);
        assert!(!catalog.contains("UserIdBeforeCreate"));
        assert!(catalog.contains("UserEmailBeforeCreate"));
        assert!(catalog.contains("UserBeforeCreate"));
    }

    #[test]
    fn field_events_exist_only_for_mutating_methods() {
        let catalog = catalog(&[], &[]);
        assert!(catalog.contains("UserEmailBeforeUpdate"));
        assert!(!catalog.contains("UserEmailBeforeFindMany"));
        assert!(!catalog.contains("UserEmailAfterFindUnique"));
    }

    #[test]
    fn iteration_preserves_schema_order() {
        let catalog = catalog(&[], &[]);
        let keys: Vec<&str> = catalog.keys().collect();

        assert_eq!(keys[0], "UserBeforeFindMany");
        assert_eq!(keys[1], "UserAfterFindMany");

        // model-level block precedes field-level, models in schema order
        let user_field = keys.iter().position(|k| *k == "UserIdBeforeCreate").unwrap();
        let audit = keys.iter().position(|k| *k == "AuditBeforeFindMany").unwrap();
        assert!(user_field > keys.iter().position(|k| *k == "UserAfterDelete").unwrap());
        assert!(audit > user_field);
    }

    #[test]
    fn descriptors_carry_topic_and_result_shape() {
        let catalog = catalog(&[], &[]);
        let before = catalog.get("UserBeforeCreate").unwrap();
        assert_eq!(before.topic, "user.before.create");
        assert!(!before.has_result);

        let after = catalog.get("UserEmailAfterUpdate").unwrap();
        assert_eq!(after.topic, "user.email.after.update");
        assert!(after.has_result);
        assert!(after.is_field_level());
    }
}
