use std::sync::Arc;

use fanout_worker::config::WorkerConfig;
use fanout_worker::gateway::{Gateway, HttpGateway};
use fanout_worker::supervisor::Supervisor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = WorkerConfig::from_env()?;
    tracing::info!(
        gateway = %config.gateway_url,
        process_id = %config.process_id,
        data_count = config.data_count,
        "Starting fan-out worker"
    );

    let gateway: Arc<dyn Gateway> = Arc::new(HttpGateway::connect(&config.gateway_url).await?);

    let supervisor = Supervisor::new(gateway, config);
    supervisor
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    tracing::info!("Worker stopped");
    Ok(())
}
