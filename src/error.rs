//! Error types for the fan-out worker.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors at the engine gateway boundary.
///
/// All durable recovery (retries, backoff, job timeouts) belongs to the
/// engine; these errors are surfaced to the caller and logged, never
/// retried inside the worker.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Gateway {address} unreachable: {reason}")]
    Unreachable { address: String, reason: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Payload for job {job_key} rejected by the engine: {message}")]
    PayloadRejected { job_key: i64, message: String },

    #[error("Job {job_key} is unknown or already resolved")]
    JobNotFound { job_key: i64 },

    #[error("No deployed process definition for id {process_id}")]
    ProcessNotFound { process_id: String },

    #[error("Request rejected by the engine (status {status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Handler registration errors. Registration happens once at startup,
/// so every variant is fatal.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Duplicate handler registration for job type {job_type}")]
    DuplicateHandler { job_type: String },
}

/// Errors raised inside a job handler invocation.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Malformed variables on job {job_key}: {reason}")]
    MalformedVariables { job_key: i64, reason: String },

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Variable document (de)serialization errors.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Variables are not a JSON object (found {found})")]
    NotAnObject { found: &'static str },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
