//! Runtime core: the event grammar, exclusion policy, generated-catalog
//! model, and the publish/subscribe dispatcher.
//!
//! ## Crate layout
//! - `event`: identifier grammar (compose/decompose) and token enums.
//! - `policy`: generation config and the O(1) exclusion filter.
//! - `catalog`: event descriptors plus the schema-order catalog builder.
//! - `config`: the user callback table seeded from a catalog.
//! - `bus`: transport boundary and the in-memory bus.
//! - `client`: opaque CRUD capability and the in-memory client.
//! - `dispatch`: the runtime dispatcher with cascading field fan-out.

pub mod bus;
pub mod catalog;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod event;
pub mod policy;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        bus::{BusCallback, EventBus, EventPayload, MemoryBus},
        catalog::{CatalogBuilder, EventCatalog, EventDescriptor},
        client::{ClientError, DataClient, MemoryClient},
        config::{AfterFn, BeforeFn, ConfigTable, HookCallback},
        dispatch::{DispatchError, Dispatcher, DispatcherOptions, EventMeta},
        event::{EventConstituents, EventIdentifiers, Hook, Method, compose, decompose},
        policy::{Config, PolicyFilter},
    };
    pub use serde_json::{Value, json};
}
