//! Configuration types.

use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Base URL of the engine's HTTP gateway (plaintext, unauthenticated).
    pub gateway_url: String,
    /// BPMN process id started at its latest deployed version.
    pub process_id: String,
    /// Number of records the loader handler generates.
    ///
    /// Large values (e.g. 5000) produce a completion payload the engine
    /// rejects at its message-size limit; the worker reports the rejection
    /// and keeps serving other jobs.
    pub data_count: u32,
    /// Worker name reported to the engine on job activation.
    pub worker_name: String,
    /// Delay between activation polls on each subscription.
    pub poll_interval: Duration,
    /// Maximum jobs activated per poll per job type.
    pub max_jobs_per_poll: u32,
    /// Activation timeout granted to the engine per activated job.
    pub job_timeout: Duration,
    /// How long shutdown waits for in-flight handlers to drain.
    pub drain_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            gateway_url: "http://127.0.0.1:8080".to_string(),
            process_id: "my_process".to_string(),
            data_count: 5,
            worker_name: "fanout-worker".to_string(),
            poll_interval: Duration::from_millis(300),
            max_jobs_per_poll: 32,
            job_timeout: Duration::from_secs(60),
            drain_timeout: Duration::from_secs(10),
        }
    }
}

impl WorkerConfig {
    /// Build a config from `FANOUT_*` environment variables, falling back
    /// to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("FANOUT_GATEWAY_URL") {
            config.gateway_url = url;
        }
        if let Ok(id) = std::env::var("FANOUT_PROCESS_ID") {
            config.process_id = id;
        }
        if let Ok(name) = std::env::var("FANOUT_WORKER_NAME") {
            config.worker_name = name;
        }
        if let Some(count) = parse_env("FANOUT_DATA_COUNT")? {
            config.data_count = count;
        }
        if let Some(max) = parse_env("FANOUT_MAX_JOBS_PER_POLL")? {
            config.max_jobs_per_poll = max;
        }
        if let Some(ms) = parse_env("FANOUT_POLL_INTERVAL_MS")? {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_env("FANOUT_JOB_TIMEOUT_SECS")? {
            config.job_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_env("FANOUT_DRAIN_TIMEOUT_SECS")? {
            config.drain_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn parse_env<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{e}"),
            }),
        Err(_) => Ok(None),
    }
}
