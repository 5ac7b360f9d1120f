//! Fluent builder for [`Coordinator`]. Nothing here is strictly required
//! to build: an oracle-less coordinator falls back to [`NullOracle`] (every
//! analyzer then runs its deterministic fallback) and an audit-store-less
//! one falls back to [`InMemoryAuditStore`], so `build()` is infallible.

use std::sync::Arc;

use aegis_analyzer::{NullOracle, Oracle};
use aegis_audit::AuditStore;
use aegis_audit_memory::InMemoryAuditStore;

use crate::broadcast::Broadcaster;
use crate::coordinator::Coordinator;

/// Builds a [`Coordinator`] with pluggable oracle, audit store, and
/// broadcast fan-out capacity.
pub struct CoordinatorBuilder {
    oracle: Option<Arc<dyn Oracle>>,
    audit_store: Option<Arc<dyn AuditStore>>,
    broadcaster: Option<Broadcaster>,
}

impl CoordinatorBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            oracle: None,
            audit_store: None,
            broadcaster: None,
        }
    }

    /// Sets the oracle backing every analyzer. Defaults to
    /// [`NullOracle`], which always fails and so always drives analyzers
    /// onto their deterministic fallback.
    #[must_use]
    pub fn oracle(mut self, oracle: Arc<dyn Oracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Sets the audit store backend. Defaults to
    /// [`InMemoryAuditStore`].
    #[must_use]
    pub fn audit_store(mut self, store: Arc<dyn AuditStore>) -> Self {
        self.audit_store = Some(store);
        self
    }

    /// Sets the broadcast fabric. Defaults to a fresh [`Broadcaster`]
    /// with no subscribers.
    #[must_use]
    pub fn broadcaster(mut self, broadcaster: Broadcaster) -> Self {
        self.broadcaster = Some(broadcaster);
        self
    }

    #[must_use]
    pub fn build(self) -> Coordinator {
        let oracle = self.oracle.unwrap_or_else(|| Arc::new(NullOracle));
        let audit_store = self
            .audit_store
            .unwrap_or_else(|| Arc::new(InMemoryAuditStore::new()));
        let broadcaster = self.broadcaster.unwrap_or_default();
        Coordinator::new(oracle, audit_store, broadcaster)
    }
}

impl Default for CoordinatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_with_no_configuration_succeeds() {
        let _coordinator = CoordinatorBuilder::new().build();
    }

    #[test]
    fn build_with_explicit_audit_store_succeeds() {
        let _coordinator = CoordinatorBuilder::new()
            .audit_store(Arc::new(InMemoryAuditStore::new()))
            .oracle(Arc::new(NullOracle))
            .build();
    }
}
