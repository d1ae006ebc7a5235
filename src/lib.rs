//! Boomstream Downloader - download and decrypt Boomstream HLS videos.
//!
//! This library retrieves a Boomstream asset's configuration, parses its HLS
//! playlists, recovers the segment decryption key through the platform's
//! XOR-obfuscated key exchange, downloads and decrypts all segments with
//! bounded concurrency, and hands the ordered segment files to ffmpeg for
//! lossless concatenation.
//!
//! # Example
//!
//! ```no_run
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let url = Url::parse("https://play.boomstream.com/AbCdEf12")?;
//!     let output = boomstream_downloader::download::run(&url, 10).await?;
//!     println!("saved {}", output.display());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod crypto;
pub mod download;
pub mod error;
pub mod fs;
pub mod mux;
pub mod output;
pub mod playlist;

// Re-exports for convenience
pub use api::{ApiClient, SegmentSource};
pub use crypto::KeyMaterial;
pub use download::{download_segments, run};
pub use error::{Error, Result};
pub use playlist::{Playlist, Rendition, Segment};
