use std::collections::HashMap;

use tracing::debug;

use super::core::Dispatchable;

/// Name-keyed registry used to resolve [`Dispatchable::Service`] values.
///
/// Lookups happen during dispatch and may run concurrently, so
/// implementations must be safe for shared read-only access.
pub trait ServiceLocator: Send + Sync {
    fn has(&self, name: &str) -> bool;
    fn get(&self, name: &str) -> Option<Dispatchable>;
}

/// `HashMap`-backed locator, filled during setup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: HashMap<String, Dispatchable>,
}

impl ServiceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a service.
    pub fn register(&mut self, name: &str, service: Dispatchable) -> &mut Self {
        if self.services.insert(name.to_string(), service).is_some() {
            debug!(service = %name, "Replaced existing service");
        } else {
            debug!(service = %name, total = self.services.len(), "Service registered");
        }
        self
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.services.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl ServiceLocator for ServiceRegistry {
    fn has(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    fn get(&self, name: &str) -> Option<Dispatchable> {
        self.services.get(name).cloned()
    }
}
