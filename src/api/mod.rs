//! Boomstream HTTP interface.
//!
//! This module provides:
//! - HTTP client with the fixed player header set
//! - Configuration document types
//! - Segment fetching for the download pipeline

pub mod client;
pub mod types;

pub use client::{ApiClient, SegmentSource};
pub use types::StreamConfig;
