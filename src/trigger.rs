//! One-shot process start.

use std::sync::Arc;

use tracing::info;

use crate::error::GatewayError;
use crate::gateway::{Gateway, ProcessInstance};

/// Start a new instance of `process_id` at its latest deployed version,
/// with no input variables.
///
/// Failure (process not found, engine unreachable) is fatal to startup;
/// callers do not retry.
pub async fn start_process(
    gateway: &Arc<dyn Gateway>,
    process_id: &str,
) -> Result<ProcessInstance, GatewayError> {
    let instance = gateway.create_process_instance(process_id).await?;
    info!(
        process_id,
        process_instance_key = instance.process_instance_key,
        "Started process instance"
    );
    Ok(instance)
}
