use crate::{
    bus::{EventBus, EventPayload},
    catalog::EventCatalog,
    client::DataClient,
    config::{ConfigTable, HookCallback},
    event::{EventConstituents, Method, compose},
    policy::PolicyFilter,
};
use eventify_schema::model::Schema;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error as ThisError;
use tracing::debug;

///
/// DispatchError
///
/// Startup failures are fatal: a dispatcher over a partial or absent
/// catalog cannot publish safely, so there is no degraded mode.
///

#[derive(Debug, ThisError)]
pub enum DispatchError {
    #[error("event catalog is empty; run generation before constructing a dispatcher")]
    EmptyCatalog,

    #[error("config table is empty; seed it from the catalog first")]
    EmptyConfig,

    #[error("catalog/config key drift: {0}")]
    KeyDrift(String),
}

///
/// DispatcherOptions
///

#[derive(Clone, Copy, Debug, Default)]
pub struct DispatcherOptions {
    /// Reject construction when the config key set differs from the
    /// catalog's, instead of tolerating drift silently.
    pub strict: bool,
}

///
/// EventMeta
/// Publish-side payload parts; the dispatcher adds the topic.
///

#[derive(Clone)]
pub struct EventMeta {
    pub args: Value,
    pub ctx: Value,
    pub client: Arc<dyn DataClient>,
    pub result: Option<Value>,
}

impl EventMeta {
    #[must_use]
    pub const fn before(args: Value, ctx: Value, client: Arc<dyn DataClient>) -> Self {
        Self {
            args,
            ctx,
            client,
            result: None,
        }
    }

    #[must_use]
    pub const fn after(args: Value, ctx: Value, client: Arc<dyn DataClient>, result: Value) -> Self {
        Self {
            args,
            ctx,
            client,
            result: Some(result),
        }
    }
}

///
/// Dispatcher
///
/// The single runtime publish point for generated services. Construction
/// loads the catalog and callback table, wires every non-noop callback to
/// its bus topic in catalog order, and either reaches Ready or fails
/// fatally; per-publish misses afterwards are expected steady-state.
///

pub struct Dispatcher {
    catalog: EventCatalog,
    schema: Schema,
    filter: PolicyFilter,
    bus: Arc<dyn EventBus>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("catalog", &self.catalog)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(
        catalog: EventCatalog,
        config: &ConfigTable,
        schema: Schema,
        filter: PolicyFilter,
        bus: Arc<dyn EventBus>,
    ) -> Result<Self, DispatchError> {
        Self::with_options(
            catalog,
            config,
            schema,
            filter,
            bus,
            DispatcherOptions::default(),
        )
    }

    pub fn with_options(
        catalog: EventCatalog,
        config: &ConfigTable,
        schema: Schema,
        filter: PolicyFilter,
        bus: Arc<dyn EventBus>,
        options: DispatcherOptions,
    ) -> Result<Self, DispatchError> {
        if catalog.is_empty() {
            return Err(DispatchError::EmptyCatalog);
        }
        if config.is_empty() {
            return Err(DispatchError::EmptyConfig);
        }
        if options.strict {
            check_drift(&catalog, config)?;
        }

        let dispatcher = Self {
            catalog,
            schema,
            filter,
            bus,
        };
        dispatcher.subscribe_config_events(config);

        Ok(dispatcher)
    }

    // Wire non-noop callbacks to their topics, in catalog order. Config
    // entries without a catalog counterpart are skipped: drift is a latent
    // condition in permissive mode, not an error.
    fn subscribe_config_events(&self, config: &ConfigTable) {
        for (name, descriptor) in self.catalog.iter() {
            match config.get(name) {
                Some(HookCallback::Before(callback)) => {
                    let callback = callback.clone();
                    self.bus.subscribe(
                        &descriptor.topic,
                        Arc::new(move |payload| {
                            // replacement args are not applied here; the
                            // veto channel is a pending product decision
                            let _ = callback(payload);
                        }),
                    );
                }
                Some(HookCallback::After(callback)) => {
                    let callback = callback.clone();
                    self.bus
                        .subscribe(&descriptor.topic, Arc::new(move |payload| callback(payload)));
                }
                Some(HookCallback::Noop) | None => {}
            }
        }
    }

    /// Publish an event by its camel-case catalog key.
    ///
    /// Returns `false` when the key is unknown or its model is suppressed
    /// by policy; both stay silent so regenerated catalogs and hand-edited
    /// config can drift without crashing running services.
    ///
    /// Model-level mutating events cascade: every allowed field of the
    /// model gets its matching field-level event published first, in
    /// schema order, before the model-level event itself.
    pub fn publish_event(&self, event: &str, meta: EventMeta) -> bool {
        let Some(descriptor) = self.catalog.get(event) else {
            debug!(event, "publish skipped: unknown event key");
            return false;
        };

        let constituents = &descriptor.constituents;
        if !self.filter.model_allowed(&constituents.model) {
            debug!(event, model = %constituents.model, "publish suppressed by policy");
            return false;
        }

        let payload = EventPayload {
            topic: descriptor.topic.clone(),
            args: meta.args,
            ctx: meta.ctx,
            client: meta.client,
            result: meta.result,
        };

        if constituents.field.is_none()
            && constituents.method.is_some_and(Method::is_mutating)
        {
            self.fan_out(constituents, &payload);
        }

        self.bus.publish(&descriptor.topic, &payload);

        true
    }

    // Field-level cascade for a model-level mutating event.
    fn fan_out(&self, constituents: &EventConstituents, payload: &EventPayload) {
        for field in self.schema.model_fields(&constituents.model) {
            if !self.filter.field_allowed(&constituents.model, &field.name) {
                continue;
            }

            let ids = compose(&EventConstituents {
                model: constituents.model.clone(),
                field: Some(field.name.clone()),
                hook: constituents.hook,
                method: constituents.method,
            });

            // only declared field events fire
            if let Some(descriptor) = self.catalog.get(&ids.camel_case) {
                let payload = EventPayload {
                    topic: descriptor.topic.clone(),
                    ..payload.clone()
                };
                self.bus.publish(&descriptor.topic, &payload);
            }
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn bus(&self) -> Arc<dyn EventBus> {
        self.bus.clone()
    }
}

// Strict-mode startup validation: both key sets must be identical.
fn check_drift(catalog: &EventCatalog, config: &ConfigTable) -> Result<(), DispatchError> {
    let mut missing: Vec<&str> = catalog
        .keys()
        .filter(|k| config.get(k).is_none())
        .collect();
    let mut unknown: Vec<&str> = config
        .keys()
        .filter(|k| !catalog.contains(k))
        .collect();

    if missing.is_empty() && unknown.is_empty() {
        return Ok(());
    }

    missing.truncate(5);
    unknown.truncate(5);

    Err(DispatchError::KeyDrift(format!(
        "missing from config: [{}]; unknown to catalog: [{}]",
        missing.join(", "),
        unknown.join(", ")
    )))
}
