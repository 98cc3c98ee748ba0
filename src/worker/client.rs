//! Per-job capability for resolving a dispatched job.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;

use crate::error::GatewayError;
use crate::gateway::Gateway;

/// Capability through which a handler resolves its job.
///
/// Scoped to one handler invocation and consumed on use: `complete` and
/// `fail` take `self`, so resolving the same job twice is a compile
/// error rather than a runtime surprise. The runtime keeps a copy of the
/// resolution flag and warns about handlers that return without calling
/// either method — such a job stays outstanding at the engine until the
/// engine's own timeout recovers it.
pub struct JobClient {
    gateway: Arc<dyn Gateway>,
    job_key: i64,
    job_type: String,
    resolved: Arc<AtomicBool>,
}

impl JobClient {
    pub(crate) fn new(
        gateway: Arc<dyn Gateway>,
        job_key: i64,
        job_type: &str,
    ) -> (Self, Arc<AtomicBool>) {
        let resolved = Arc::new(AtomicBool::new(false));
        let client = Self {
            gateway,
            job_key,
            job_type: job_type.to_string(),
            resolved: Arc::clone(&resolved),
        };
        (client, resolved)
    }

    pub fn job_key(&self) -> i64 {
        self.job_key
    }

    pub fn job_type(&self) -> &str {
        &self.job_type
    }

    /// Signal success, optionally attaching output variables.
    ///
    /// A gateway rejection (e.g. oversized payload) is returned to the
    /// handler; the flag is set regardless, since a resolution was
    /// signalled and recovery belongs to the engine.
    pub async fn complete(self, variables: Option<Value>) -> Result<(), GatewayError> {
        self.resolved.store(true, Ordering::SeqCst);
        self.gateway.complete_job(self.job_key, variables).await
    }

    /// Signal failure, handing the job back to the engine with the given
    /// remaining retries (the engine's retry/backoff policy owns what
    /// happens next).
    pub async fn fail(self, retries: u32, message: &str) -> Result<(), GatewayError> {
        self.resolved.store(true, Ordering::SeqCst);
        self.gateway.fail_job(self.job_key, retries, message).await
    }
}
