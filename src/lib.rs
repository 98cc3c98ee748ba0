//! Fan-out worker — job handlers and a process trigger for an external
//! BPMN workflow engine.
//!
//! The engine owns process definitions, scheduling, persistence and
//! retries; this crate registers handlers for three job types, exchanges
//! variable payloads with the engine, and starts one process instance.

pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod supervisor;
pub mod trigger;
pub mod variables;
pub mod worker;
