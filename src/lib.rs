// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod filter;
pub mod ingest;
pub mod notify;
pub mod pipeline;
pub mod store;

pub use crate::config::AppConfig;
pub use crate::pipeline::{run_once, RunSettings, RunSummary};
