use crate::{
    BuildError, events,
    service,
    unit::{ConfigTypesUnit, ConfigUnit, EventsUnit, ServiceUnit},
};
use proc_macro2::TokenStream;

/// Header for artifacts regenerated wholesale on every run.
const GENERATED_HEADER: &str = "// Generated by eventify. Regenerated wholesale on every run; do not edit.";

/// Header for the config stub, which is only seeded once.
const SEEDED_HEADER: &str =
    "// Seeded by eventify. Yours to edit; keys must track the generated catalog.";

///
/// Emit
///
/// Target-language boundary. The planner decides what to emit; an
/// emitter decides how that prints. One implementation per target
/// language.
///

pub trait Emit {
    fn events_unit(&self, unit: &EventsUnit) -> Result<String, BuildError>;
    fn config_unit(&self, unit: &ConfigUnit) -> Result<String, BuildError>;
    fn config_types_unit(&self, unit: &ConfigTypesUnit) -> Result<String, BuildError>;
    fn service_unit(&self, unit: &ServiceUnit) -> Result<String, BuildError>;
}

///
/// RustEmitter
/// Renders units as formatted Rust modules.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct RustEmitter;

impl RustEmitter {
    fn render(header: &str, tokens: TokenStream) -> Result<String, BuildError> {
        let file = syn::parse2::<syn::File>(tokens)?;

        Ok(format!("{header}\n\n{}", prettyplease::unparse(&file)))
    }
}

impl Emit for RustEmitter {
    fn events_unit(&self, unit: &EventsUnit) -> Result<String, BuildError> {
        Self::render(GENERATED_HEADER, events::events_unit(unit))
    }

    fn config_unit(&self, unit: &ConfigUnit) -> Result<String, BuildError> {
        Self::render(SEEDED_HEADER, events::config_unit(unit))
    }

    fn config_types_unit(&self, unit: &ConfigTypesUnit) -> Result<String, BuildError> {
        Self::render(GENERATED_HEADER, events::config_types_unit(unit))
    }

    fn service_unit(&self, unit: &ServiceUnit) -> Result<String, BuildError> {
        Self::render(GENERATED_HEADER, service::service_unit(unit))
    }
}
