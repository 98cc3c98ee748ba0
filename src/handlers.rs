//! Built-in job handlers for the deployed fan-out process.
//!
//! Three job types, one per task node:
//! - the loader generates the `inputCollection` variable,
//! - the processor is the parallel multi-instance pass-through the
//!   engine invokes once per collection element,
//! - the printer logs the variables it received (diagnostics only).

use async_trait::async_trait;
use tracing::info;

use crate::error::HandlerError;
use crate::gateway::ActivatedJob;
use crate::variables::{self, VariablePayload};
use crate::worker::{JobClient, JobHandler};

/// Job type served by [`DataLoader`].
pub const DATA_LOADER: &str = "first_data_loader";
/// Job type served by [`ParallelProcessor`].
pub const DATA_PROCESSOR: &str = "second_data_processor";
/// Job type served by [`DataPrinter`].
pub const DATA_PRINTER: &str = "third_data_printer";

/// Generates the input collection and attaches it as output variables.
///
/// Consumes no input variables. With a large `count` the completion
/// payload exceeds the engine's message-size limit and the resulting
/// gateway rejection propagates out of `handle`.
pub struct DataLoader {
    pub count: u32,
}

#[async_trait]
impl JobHandler for DataLoader {
    async fn handle(&self, client: JobClient, job: ActivatedJob) -> Result<(), HandlerError> {
        info!(job_key = job.key, count = self.count, "Loader job received");

        let variables = VariablePayload::generate(self.count).encode()?;
        client.complete(Some(variables)).await?;
        Ok(())
    }
}

/// Parallel multi-instance pass-through: exists purely so the engine can
/// iterate the loader's collection; completes immediately with no
/// variables read or written.
pub struct ParallelProcessor;

#[async_trait]
impl JobHandler for ParallelProcessor {
    async fn handle(&self, client: JobClient, job: ActivatedJob) -> Result<(), HandlerError> {
        info!(job_key = job.key, "Processor job received");

        client.complete(None).await?;
        Ok(())
    }
}

/// Logs the job's variables and completes with no output.
pub struct DataPrinter;

#[async_trait]
impl JobHandler for DataPrinter {
    async fn handle(&self, client: JobClient, job: ActivatedJob) -> Result<(), HandlerError> {
        info!(job_key = job.key, "Printer job received");

        let vars = variables::decode(&job.variables).map_err(|e| {
            HandlerError::MalformedVariables {
                job_key: job.key,
                reason: e.to_string(),
            }
        })?;
        info!(job_key = job.key, variables = %serde_json::Value::Object(vars), "Job variables");

        client.complete(None).await?;
        Ok(())
    }
}
