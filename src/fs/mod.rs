//! Filesystem module.
//!
//! This module provides:
//! - Session cache directory management
//! - Output filename sanitization

pub mod cache;
pub mod naming;

pub use cache::session_cache_dir;
pub use naming::sanitize_filename;
