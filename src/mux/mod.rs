//! External muxing via ffmpeg's concat demuxer.

pub mod ffmpeg;

pub use ffmpeg::{join_files, write_input_manifest};
