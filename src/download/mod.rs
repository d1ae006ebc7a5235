//! Download module.
//!
//! This module provides:
//! - Bounded-concurrency segment pipeline
//! - Download session orchestration

pub mod pipeline;
pub mod session;

pub use pipeline::download_segments;
pub use session::{run, DEFAULT_PARALLELISM, SERVICE_HOST};
