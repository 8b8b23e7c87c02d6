use crate::{bus::EventPayload, catalog::EventCatalog};
use indexmap::IndexMap;
use serde_json::Value;
use std::{fmt, sync::Arc};

/// Before-hook callback. The returned value is the veto/transform channel:
/// `Some(args)` proposes replacement arguments for the pending operation.
/// The default dispatcher subscribes these side-effect only and does not
/// apply the replacement; see DESIGN.md.
pub type BeforeFn = Arc<dyn Fn(&EventPayload) -> Option<Value> + Send + Sync>;

/// After-hook callback, side-effect only.
pub type AfterFn = Arc<dyn Fn(&EventPayload) + Send + Sync>;

///
/// HookCallback
///

#[derive(Clone, Default)]
pub enum HookCallback {
    /// Seeded default; never subscribed.
    #[default]
    Noop,
    Before(BeforeFn),
    After(AfterFn),
}

impl HookCallback {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::Noop)
    }
}

impl fmt::Debug for HookCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Noop => write!(f, "Noop"),
            Self::Before(_) => write!(f, "Before(..)"),
            Self::After(_) => write!(f, "After(..)"),
        }
    }
}

///
/// ConfigTable
///
/// The user callback table, keyed by camel-case event name. Seeded from a
/// catalog with all-noop entries; hand-maintained afterwards. Its key set
/// must track the catalog's: by construction in the default mode, checked
/// at dispatcher startup in strict mode.
///

#[derive(Clone, Debug, Default)]
pub struct ConfigTable {
    entries: IndexMap<String, HookCallback>,
}

impl ConfigTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One noop entry per catalog event, in catalog order.
    #[must_use]
    pub fn seeded(catalog: &EventCatalog) -> Self {
        let mut table = Self::new();
        for name in catalog.keys() {
            table.entries.insert(name.to_string(), HookCallback::Noop);
        }

        table
    }

    pub fn put(&mut self, name: impl Into<String>, callback: HookCallback) {
        self.entries.insert(name.into(), callback);
    }

    /// Attach a before-hook callback under an event key.
    pub fn set_before(
        &mut self,
        name: impl Into<String>,
        callback: impl Fn(&EventPayload) -> Option<Value> + Send + Sync + 'static,
    ) {
        self.put(name, HookCallback::Before(Arc::new(callback)));
    }

    /// Attach an after-hook callback under an event key.
    pub fn set_after(
        &mut self,
        name: impl Into<String>,
        callback: impl Fn(&EventPayload) + Send + Sync + 'static,
    ) {
        self.put(name, HookCallback::After(Arc::new(callback)));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&HookCallback> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HookCallback)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
