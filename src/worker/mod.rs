//! Job worker dispatch.
//!
//! Core components:
//! - `registry` — static job-type → handler association
//! - `client` — single-use per-job capability for complete/fail
//! - `runtime` — polling subscriptions and job dispatch

pub mod client;
pub mod registry;
pub mod runtime;

pub use client::JobClient;
pub use registry::{HandlerRegistry, JobHandler};
pub use runtime::JobWorkerRuntime;
