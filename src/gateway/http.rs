//! HTTP gateway client — talks JSON to the engine's REST gateway.
//!
//! Plaintext and unauthenticated; multi-gateway topologies, auth and TLS
//! are out of scope. Engine rejections are mapped onto `GatewayError`
//! variants so callers can tell a size rejection from an unknown job or
//! a missing process definition.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::gateway::{ActivatedJob, ActivationRequest, Gateway, ProcessInstance};

/// Version selector sent when starting a process instance; the engine
/// treats -1 as "latest deployed version".
const LATEST_VERSION: i32 = -1;

/// JSON client for the engine's HTTP gateway.
pub struct HttpGateway {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActivateJobsBody<'a> {
    #[serde(rename = "type")]
    job_type: &'a str,
    worker: &'a str,
    timeout: u64,
    max_jobs_to_activate: u32,
}

#[derive(Debug, Deserialize)]
struct ActivateJobsResponse {
    #[serde(default)]
    jobs: Vec<JobDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobDto {
    job_key: i64,
    #[serde(rename = "type")]
    job_type: String,
    #[serde(default)]
    variables: Value,
    #[serde(default = "default_retries")]
    retries: u32,
}

fn default_retries() -> u32 {
    3
}

#[derive(Debug, Serialize)]
struct CompleteJobBody {
    variables: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FailJobBody<'a> {
    retries: u32,
    error_message: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateInstanceBody<'a> {
    process_definition_id: &'a str,
    version: i32,
    variables: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateInstanceResponse {
    process_instance_key: i64,
}

impl HttpGateway {
    /// Connect to the gateway at `base_url`, probing its topology
    /// endpoint so an unreachable engine fails at startup instead of on
    /// the first poll.
    pub async fn connect(base_url: &str) -> Result<Self, GatewayError> {
        let gateway = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        };

        let response = gateway
            .client
            .get(gateway.url("/v2/topology"))
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable {
                address: base_url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(GatewayError::Unreachable {
                address: base_url.to_string(),
                reason: format!("topology probe returned status {}", response.status()),
            });
        }

        Ok(gateway)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn read_error(response: reqwest::Response) -> (u16, String) {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        (status, message)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn activate_jobs(
        &self,
        request: &ActivationRequest,
    ) -> Result<Vec<ActivatedJob>, GatewayError> {
        let body = ActivateJobsBody {
            job_type: &request.job_type,
            worker: &request.worker,
            timeout: request.timeout.as_millis() as u64,
            max_jobs_to_activate: request.max_jobs,
        };

        let response = self
            .client
            .post(self.url("/v2/jobs/activation"))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let (status, message) = Self::read_error(response).await;
            return Err(GatewayError::Rejected { status, message });
        }

        let activated: ActivateJobsResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(activated
            .jobs
            .into_iter()
            .map(|job| ActivatedJob {
                key: job.job_key,
                job_type: job.job_type,
                // Jobs activated without variables come back as null.
                variables: match job.variables {
                    Value::Null => Value::Object(Default::default()),
                    other => other,
                },
                retries: job.retries,
            })
            .collect())
    }

    async fn complete_job(
        &self,
        job_key: i64,
        variables: Option<Value>,
    ) -> Result<(), GatewayError> {
        let body = CompleteJobBody {
            variables: variables.unwrap_or_else(|| Value::Object(Default::default())),
        };

        let response = self
            .client
            .post(self.url(&format!("/v2/jobs/{job_key}/completion")))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        match response.status().as_u16() {
            200 | 204 => Ok(()),
            404 => Err(GatewayError::JobNotFound { job_key }),
            413 => {
                let (_, message) = Self::read_error(response).await;
                Err(GatewayError::PayloadRejected { job_key, message })
            }
            _ => {
                let (status, message) = Self::read_error(response).await;
                Err(GatewayError::Rejected { status, message })
            }
        }
    }

    async fn fail_job(
        &self,
        job_key: i64,
        retries: u32,
        message: &str,
    ) -> Result<(), GatewayError> {
        let body = FailJobBody {
            retries,
            error_message: message,
        };

        let response = self
            .client
            .post(self.url(&format!("/v2/jobs/{job_key}/failure")))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        match response.status().as_u16() {
            200 | 204 => Ok(()),
            404 => Err(GatewayError::JobNotFound { job_key }),
            _ => {
                let (status, message) = Self::read_error(response).await;
                Err(GatewayError::Rejected { status, message })
            }
        }
    }

    async fn create_process_instance(
        &self,
        process_id: &str,
    ) -> Result<ProcessInstance, GatewayError> {
        let body = CreateInstanceBody {
            process_definition_id: process_id,
            version: LATEST_VERSION,
            variables: Value::Object(Default::default()),
        };

        let response = self
            .client
            .post(self.url("/v2/process-instances"))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        match response.status().as_u16() {
            200 | 201 => {
                let created: CreateInstanceResponse = response
                    .json()
                    .await
                    .map_err(|e| GatewayError::Transport(e.to_string()))?;
                Ok(ProcessInstance {
                    process_instance_key: created.process_instance_key,
                })
            }
            404 => Err(GatewayError::ProcessNotFound {
                process_id: process_id.to_string(),
            }),
            _ => {
                let (status, message) = Self::read_error(response).await;
                Err(GatewayError::Rejected { status, message })
            }
        }
    }
}
