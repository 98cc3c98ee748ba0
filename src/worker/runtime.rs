//! Job worker runtime — one polling subscription per registered job type.
//!
//! Each subscription is a spawned task that polls the gateway for jobs
//! of its type and dispatches every received job exactly once to the
//! registered handler, each dispatch in its own task. A panic inside one
//! handler never affects other jobs or other subscriptions.
//!
//! Errors from completion (oversized payload, connection drop) are
//! logged with job context and NOT retried here — the engine's own
//! retry/backoff policy owns recovery.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::WorkerConfig;
use crate::gateway::{ActivatedJob, ActivationRequest, Gateway};
use crate::worker::client::JobClient;
use crate::worker::registry::{HandlerRegistry, JobHandler};

/// Running set of subscriptions. Obtained from [`JobWorkerRuntime::open`];
/// lives until [`shutdown`](Self::shutdown).
pub struct JobWorkerRuntime {
    subscriptions: Vec<JoinHandle<()>>,
    shutdown_tx: watch::Sender<bool>,
    drain_timeout: Duration,
}

impl JobWorkerRuntime {
    /// Open one polling subscription per registered job type.
    ///
    /// Subscriptions start polling immediately and run until
    /// [`shutdown`](Self::shutdown).
    pub fn open(
        gateway: Arc<dyn Gateway>,
        registry: HandlerRegistry,
        config: &WorkerConfig,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let drain_timeout = config.drain_timeout;
        let config = Arc::new(config.clone());

        let subscriptions = registry
            .into_handlers()
            .into_iter()
            .map(|(job_type, handler)| {
                spawn_subscription(
                    Arc::clone(&gateway),
                    job_type,
                    handler,
                    Arc::clone(&config),
                    shutdown_rx.clone(),
                )
            })
            .collect();

        Self {
            subscriptions,
            shutdown_tx,
            drain_timeout,
        }
    }

    /// Signal shutdown: stop accepting new job dispatches, let in-flight
    /// handler invocations finish (bounded by the drain timeout), then
    /// return.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);

        let drained = tokio::time::timeout(self.drain_timeout, join_all(self.subscriptions)).await;
        match drained {
            Ok(_) => info!("All subscriptions drained"),
            Err(_) => warn!(
                timeout_secs = self.drain_timeout.as_secs(),
                "Drain timeout elapsed with handlers still in flight"
            ),
        }
    }
}

fn spawn_subscription(
    gateway: Arc<dyn Gateway>,
    job_type: String,
    handler: Arc<dyn JobHandler>,
    config: Arc<WorkerConfig>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(job_type = %job_type, "Subscription opened");

        let mut tick = tokio::time::interval(config.poll_interval);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut in_flight: Vec<JoinHandle<()>> = Vec::new();

        loop {
            tokio::select! {
                _ = tick.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }

            in_flight.retain(|handle| !handle.is_finished());
            poll_once(&gateway, &job_type, &handler, &config, &mut in_flight).await;
        }

        // Drain dispatches still in flight before closing.
        join_all(in_flight).await;
        info!(job_type = %job_type, "Subscription closed");
    })
}

/// One poll cycle: activate pending jobs of this type and dispatch each.
async fn poll_once(
    gateway: &Arc<dyn Gateway>,
    job_type: &str,
    handler: &Arc<dyn JobHandler>,
    config: &WorkerConfig,
    in_flight: &mut Vec<JoinHandle<()>>,
) {
    let request = ActivationRequest {
        job_type: job_type.to_string(),
        max_jobs: config.max_jobs_per_poll,
        timeout: config.job_timeout,
        worker: config.worker_name.clone(),
    };

    let jobs = match gateway.activate_jobs(&request).await {
        Ok(jobs) => jobs,
        Err(e) => {
            error!(job_type, error = %e, "Job activation failed");
            return;
        }
    };

    if jobs.is_empty() {
        return;
    }

    debug!(job_type, count = jobs.len(), "Activated jobs");

    for job in jobs {
        in_flight.push(dispatch(Arc::clone(gateway), Arc::clone(handler), job));
    }
}

/// Dispatch one job to its handler in an isolated task.
fn dispatch(
    gateway: Arc<dyn Gateway>,
    handler: Arc<dyn JobHandler>,
    job: ActivatedJob,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let job_key = job.key;
        let job_type = job.job_type.clone();
        let retries_left = job.retries.saturating_sub(1);

        let (client, resolved) = JobClient::new(Arc::clone(&gateway), job_key, &job_type);
        debug!(job_key, job_type = %job_type, "Dispatching job");

        // The handler runs in its own task so a panic is contained to
        // this one job.
        let invocation = tokio::spawn(async move { handler.handle(client, job).await });

        match invocation.await {
            Ok(Ok(())) => {
                if !resolved.load(Ordering::SeqCst) {
                    warn!(
                        job_key,
                        job_type = %job_type,
                        "Handler returned without completing or failing the job; \
                         it stays outstanding until the engine's timeout"
                    );
                }
            }
            Ok(Err(e)) => {
                error!(job_key, job_type = %job_type, error = %e, "Job handler failed");
                if !resolved.load(Ordering::SeqCst) {
                    signal_failure(&gateway, job_key, &job_type, retries_left, &e.to_string())
                        .await;
                }
            }
            Err(join_err) => {
                error!(job_key, job_type = %job_type, error = %join_err, "Job handler panicked");
                if !resolved.load(Ordering::SeqCst) {
                    signal_failure(&gateway, job_key, &job_type, retries_left, "handler panicked")
                        .await;
                }
            }
        }
    })
}

async fn signal_failure(
    gateway: &Arc<dyn Gateway>,
    job_key: i64,
    job_type: &str,
    retries: u32,
    message: &str,
) {
    if let Err(e) = gateway.fail_job(job_key, retries, message).await {
        error!(job_key, job_type, error = %e, "Failed to signal job failure");
    }
}
