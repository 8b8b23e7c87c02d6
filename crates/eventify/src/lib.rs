//! Eventify derives a complete create/read/update/delete event taxonomy
//! from a declarative data model, generates the source artifacts that
//! declare and wire those events, and dispatches them at runtime with
//! cascading field-level fan-out.
//!
//! ## Crate layout
//! - `schema`: the data-model AST and its validation pass.
//! - `core`: event grammar, policy filter, catalog, bus, and dispatcher.
//! - `build`: unit planning and Rust source emission.
//!
//! The `prelude` mirrors the surface generated services compile against.

pub use eventify_build as build;
pub use eventify_core as core;
pub use eventify_schema as schema;

use crate::core::{
    bus::{EventBus, MemoryBus},
    catalog::CatalogBuilder,
    config::ConfigTable,
    dispatch::{DispatchError, Dispatcher, DispatcherOptions},
    policy::{Config, PolicyFilter},
};
use crate::schema::{SchemaError, model::Schema, validate::validate_schema};
use std::sync::Arc;
use thiserror::Error as ThisError;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("eventify bundle generation failed; see logs for the failed artifacts")]
    Generation,
}

/// Validate a schema and generate the full artifact bundle under
/// `config.out_dir`.
///
/// Artifact write failures inside the bundle are logged and aggregated,
/// surfacing here as a single `Error::Generation`; an invalid schema
/// fails before anything is written.
pub fn generate(schema: &Schema, config: &Config) -> Result<(), Error> {
    validate_schema(schema)?;

    if build::BundleBuilder::new(schema, config).generate() {
        tracing::info!(out_dir = %config.out_dir.display(), "eventify bundle generated");
        Ok(())
    } else {
        Err(Error::Generation)
    }
}

/// Build a ready dispatcher for a schema+policy pass over an in-memory
/// bus, with the callback table seeded all-noop from the derived catalog.
/// Callers with a hand-maintained table construct `Dispatcher` directly.
pub fn dispatcher(schema: &Schema, config: &Config) -> Result<Dispatcher, Error> {
    dispatcher_on(schema, config, Arc::new(MemoryBus::new()))
}

/// Same as [`dispatcher`], over a caller-supplied bus transport.
pub fn dispatcher_on(
    schema: &Schema,
    config: &Config,
    bus: Arc<dyn EventBus>,
) -> Result<Dispatcher, Error> {
    validate_schema(schema)?;

    let filter = PolicyFilter::new(config);
    let catalog = CatalogBuilder::new(schema, &filter).build();
    let table = ConfigTable::seeded(&catalog);

    Ok(Dispatcher::with_options(
        catalog,
        &table,
        schema.clone(),
        filter,
        bus,
        DispatcherOptions::default(),
    )?)
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        bus::{BusCallback, EventBus, EventPayload, MemoryBus},
        catalog::{CatalogBuilder, EventCatalog, EventDescriptor},
        client::{ClientError, DataClient, MemoryClient},
        config::{AfterFn, BeforeFn, ConfigTable, HookCallback},
        dispatch::{DispatchError, Dispatcher, DispatcherOptions, EventMeta},
        event::{EventConstituents, EventIdentifiers, Hook, Method, compose, decompose},
        policy::{Config, PolicyFilter},
    };
    pub use crate::schema::{
        model::{FieldDescriptor, ModelDescriptor, Schema},
        validate::validate_schema,
    };
    pub use serde_json::{Value, json};
}
