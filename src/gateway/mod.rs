//! Engine gateway boundary.
//!
//! The workflow engine owns process definitions, scheduling, persistence
//! and retry semantics; this module only describes the contract the
//! worker needs: activate jobs, resolve them, and start one process
//! instance. `HttpGateway` is the concrete client; tests substitute an
//! in-memory implementation.

pub mod http;

pub use http::HttpGateway;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::GatewayError;

/// A job the engine handed to this worker for one handler invocation.
///
/// Owned by the engine; the worker holds it only for the duration of the
/// dispatch.
#[derive(Debug, Clone)]
pub struct ActivatedJob {
    /// Opaque engine-issued key, unique per job.
    pub key: i64,
    /// Name used to route the job to its handler.
    pub job_type: String,
    /// Variable document attached by the engine (a JSON object).
    pub variables: Value,
    /// Retries remaining at the engine for this job.
    pub retries: u32,
}

/// Handle for a started process instance, used only for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessInstance {
    pub process_instance_key: i64,
}

/// Parameters for one activation poll.
#[derive(Debug, Clone)]
pub struct ActivationRequest {
    pub job_type: String,
    pub max_jobs: u32,
    /// How long activated jobs stay locked to this worker at the engine.
    pub timeout: Duration,
    pub worker: String,
}

/// Contract with the external workflow engine.
///
/// A single gateway instance is shared by all subscriptions and the
/// process trigger, so implementations must tolerate concurrent use.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Poll for jobs of one type. An empty vec means nothing is pending.
    async fn activate_jobs(
        &self,
        request: &ActivationRequest,
    ) -> Result<Vec<ActivatedJob>, GatewayError>;

    /// Signal success for a job, optionally attaching output variables
    /// (a JSON object mapping variable names to values). Fails if the
    /// job key is unknown or the payload is rejected (e.g. too large).
    async fn complete_job(
        &self,
        job_key: i64,
        variables: Option<Value>,
    ) -> Result<(), GatewayError>;

    /// Signal failure for a job, handing it back to the engine with the
    /// given remaining retries.
    async fn fail_job(
        &self,
        job_key: i64,
        retries: u32,
        message: &str,
    ) -> Result<(), GatewayError>;

    /// Start a new instance of `process_id` at its latest deployed
    /// version, with no input variables.
    async fn create_process_instance(
        &self,
        process_id: &str,
    ) -> Result<ProcessInstance, GatewayError>;
}
