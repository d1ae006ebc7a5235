//! HLS playlist handling.
//!
//! This module provides:
//! - Line-oriented M3U8 parsing
//! - Playlist data model and rendition selection

pub mod model;
pub mod parser;

pub use model::{Playlist, Rendition, Segment};
pub use parser::parse;
