//! Startup sequencing and lifetime of the worker process.
//!
//! Order matters: handlers are registered before any subscription opens,
//! and the process instance is triggered only after all subscriptions
//! are polling — otherwise the engine could dispatch jobs nobody serves.

use std::future::Future;
use std::sync::Arc;

use tracing::info;

use crate::config::WorkerConfig;
use crate::error::Error;
use crate::gateway::Gateway;
use crate::handlers::{self, DataLoader, DataPrinter, ParallelProcessor};
use crate::trigger;
use crate::worker::{HandlerRegistry, JobWorkerRuntime};

/// Wires the registry, runtime and trigger together and owns the
/// run-until-shutdown loop.
pub struct Supervisor {
    gateway: Arc<dyn Gateway>,
    config: WorkerConfig,
}

impl Supervisor {
    pub fn new(gateway: Arc<dyn Gateway>, config: WorkerConfig) -> Self {
        Self { gateway, config }
    }

    /// Register the built-in handlers and open all subscriptions.
    ///
    /// Any registration error (duplicate job type) is a fatal
    /// configuration error.
    pub fn start(&self) -> Result<JobWorkerRuntime, Error> {
        let mut registry = HandlerRegistry::new();
        registry.register(
            handlers::DATA_LOADER,
            Arc::new(DataLoader {
                count: self.config.data_count,
            }),
        )?;
        registry.register(handlers::DATA_PROCESSOR, Arc::new(ParallelProcessor))?;
        registry.register(handlers::DATA_PRINTER, Arc::new(DataPrinter))?;

        info!(job_types = registry.len(), "Opening subscriptions");
        Ok(JobWorkerRuntime::open(
            Arc::clone(&self.gateway),
            registry,
            &self.config,
        ))
    }

    /// Full lifecycle: open subscriptions, trigger the process instance,
    /// then wait for `shutdown` to resolve and drain the workers.
    ///
    /// All further activity between startup and shutdown is engine-driven
    /// job dispatch; the supervisor itself has no periodic work.
    pub async fn run<F>(&self, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = ()>,
    {
        let runtime = self.start()?;

        trigger::start_process(&self.gateway, &self.config.process_id).await?;

        shutdown.await;
        info!("Shutdown signal received, draining workers");
        runtime.shutdown().await;
        Ok(())
    }
}
