use convert_case::{Case, Casing};
use eventify_core::{
    catalog::{CatalogBuilder, EventCatalog},
    event::Hook,
    policy::PolicyFilter,
};
use eventify_schema::{model::Schema, types::Primitive};

///
/// Bundle
///
/// Structured intermediate representation of one generation run: what to
/// emit, independent of how any target language prints it. Service units
/// are planned from the same schema+policy pass as the catalog, which is
/// what keeps the two name-consistent without a data dependency.
///

#[derive(Debug)]
pub struct Bundle {
    pub events: EventsUnit,
    pub config: ConfigUnit,
    pub config_types: ConfigTypesUnit,
    pub services: Vec<ServiceUnit>,
}

///
/// EventsUnit
///

#[derive(Debug)]
pub struct EventsUnit {
    pub catalog: EventCatalog,
}

///
/// ConfigEntry
/// One event key as it appears in the config stub and its type record.
///

#[derive(Clone, Debug)]
pub struct ConfigEntry {
    /// Camel-case catalog key, e.g. `UserBeforeFindMany`.
    pub name: String,

    /// Snake-case record field ident, e.g. `user_before_find_many`.
    pub ident: String,

    pub hook: Hook,
}

///
/// ConfigUnit / ConfigTypesUnit
///

#[derive(Debug)]
pub struct ConfigUnit {
    pub entries: Vec<ConfigEntry>,
}

#[derive(Debug)]
pub struct ConfigTypesUnit {
    pub entries: Vec<ConfigEntry>,
}

///
/// ServiceUnit
///

#[derive(Debug)]
pub struct ServiceUnit {
    pub model: String,
    pub fields: Vec<ServiceField>,
}

impl ServiceUnit {
    /// File name of the generated service module under `out_dir`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}_service.rs", self.model.to_case(Case::Snake))
    }
}

#[derive(Debug)]
pub struct ServiceField {
    pub name: String,
    pub primitive: Primitive,
}

/// Plan the full bundle for one schema+policy pass, in schema order.
#[must_use]
pub fn plan(schema: &Schema, filter: &PolicyFilter) -> Bundle {
    let catalog = CatalogBuilder::new(schema, filter).build();

    let entries: Vec<ConfigEntry> = catalog
        .iter()
        .map(|(name, descriptor)| ConfigEntry {
            name: name.to_string(),
            ident: name.to_case(Case::Snake),
            // catalog descriptors mark after-hooks via the result shape
            hook: if descriptor.has_result {
                Hook::After
            } else {
                Hook::Before
            },
        })
        .collect();

    let services = schema
        .models
        .iter()
        .filter(|model| filter.model_allowed(&model.name))
        .map(|model| ServiceUnit {
            model: model.name.clone(),
            fields: model
                .fields
                .iter()
                .filter(|field| filter.field_allowed(&model.name, &field.name))
                .map(|field| ServiceField {
                    name: field.name.clone(),
                    primitive: field.primitive(),
                })
                .collect(),
        })
        .collect();

    Bundle {
        events: EventsUnit { catalog },
        config: ConfigUnit {
            entries: entries.clone(),
        },
        config_types: ConfigTypesUnit { entries },
        services,
    }
}
