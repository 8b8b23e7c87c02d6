use crate::client::DataClient;
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

///
/// EventPayload
///
/// What a subscriber receives: the bus topic it fired on, the opaque call
/// arguments and context, a handle to the underlying client, and the call
/// result when the hook is `after`.
///

#[derive(Clone)]
pub struct EventPayload {
    pub topic: String,
    pub args: Value,
    pub ctx: Value,
    pub client: Arc<dyn DataClient>,
    pub result: Option<Value>,
}

impl std::fmt::Debug for EventPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPayload")
            .field("topic", &self.topic)
            .field("args", &self.args)
            .field("ctx", &self.ctx)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

/// Subscriber callback as stored on the bus.
pub type BusCallback = Arc<dyn Fn(&EventPayload) + Send + Sync>;

///
/// EventBus
///
/// Transport boundary. Dispatch logic never touches subscriber storage
/// directly; everything flows through these two primitives. `publish` is
/// synchronous fire-and-await: every subscriber runs before it returns.
///

pub trait EventBus: Send + Sync {
    fn subscribe(&self, topic: &str, callback: BusCallback);
    fn publish(&self, topic: &str, payload: &EventPayload);
}

///
/// MemoryBus
/// In-process bus for single-process use and tests.
///

#[derive(Default)]
pub struct MemoryBus {
    subscribers: RwLock<HashMap<String, Vec<BusCallback>>>,
}

impl MemoryBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of subscribers currently attached to a topic.
    #[must_use]
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.subscribers
            .read()
            .expect("subscriber map poisoned")
            .get(topic)
            .map_or(0, Vec::len)
    }
}

impl EventBus for MemoryBus {
    fn subscribe(&self, topic: &str, callback: BusCallback) {
        self.subscribers
            .write()
            .expect("subscriber map poisoned")
            .entry(topic.to_string())
            .or_default()
            .push(callback);
    }

    fn publish(&self, topic: &str, payload: &EventPayload) {
        // snapshot under the read lock so a callback may subscribe
        let callbacks: Vec<BusCallback> = self
            .subscribers
            .read()
            .expect("subscriber map poisoned")
            .get(topic)
            .cloned()
            .unwrap_or_default();

        for callback in callbacks {
            callback(payload);
        }
    }
}
