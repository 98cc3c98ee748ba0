//! Registry of job handlers, built once at startup.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{HandlerError, RegistryError};
use crate::gateway::ActivatedJob;
use crate::worker::client::JobClient;

/// Handler for one job type.
///
/// Every invocation must end by calling either `complete` or `fail` on
/// the [`JobClient`]; a handler that returns without resolving leaves
/// the job outstanding at the engine until its timeout recovers it.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, client: JobClient, job: ActivatedJob) -> Result<(), HandlerError>;
}

/// Static job-type → handler association.
///
/// Populated before any subscription opens; no removal and no
/// re-registration afterwards.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn JobHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a job type. Registering the same type
    /// twice is a configuration error and fails fast.
    pub fn register(
        &mut self,
        job_type: &str,
        handler: Arc<dyn JobHandler>,
    ) -> Result<(), RegistryError> {
        if self.handlers.contains_key(job_type) {
            return Err(RegistryError::DuplicateHandler {
                job_type: job_type.to_string(),
            });
        }
        self.handlers.insert(job_type.to_string(), handler);
        tracing::debug!(job_type, "Registered job handler");
        Ok(())
    }

    pub fn get(&self, job_type: &str) -> Option<Arc<dyn JobHandler>> {
        self.handlers.get(job_type).cloned()
    }

    /// Registered job types, sorted for deterministic subscription order.
    pub fn job_types(&self) -> Vec<String> {
        let mut types: Vec<_> = self.handlers.keys().cloned().collect();
        types.sort();
        types
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub(crate) fn into_handlers(self) -> HashMap<String, Arc<dyn JobHandler>> {
        self.handlers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopHandler;

    #[async_trait]
    impl JobHandler for NoopHandler {
        async fn handle(
            &self,
            _client: JobClient,
            _job: ActivatedJob,
        ) -> Result<(), HandlerError> {
            Ok(())
        }
    }

    #[test]
    fn registers_and_looks_up() {
        let mut registry = HandlerRegistry::new();
        registry.register("loader", Arc::new(NoopHandler)).unwrap();

        assert!(registry.get("loader").is_some());
        assert!(registry.get("unknown").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_registration_fails_fast() {
        let mut registry = HandlerRegistry::new();
        registry.register("loader", Arc::new(NoopHandler)).unwrap();

        let err = registry
            .register("loader", Arc::new(NoopHandler))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateHandler { ref job_type } if job_type == "loader"
        ));
    }

    #[test]
    fn job_types_are_sorted() {
        let mut registry = HandlerRegistry::new();
        registry.register("b_type", Arc::new(NoopHandler)).unwrap();
        registry.register("a_type", Arc::new(NoopHandler)).unwrap();

        assert_eq!(registry.job_types(), vec!["a_type", "b_type"]);
    }
}
