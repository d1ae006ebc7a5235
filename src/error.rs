//! Error types for the boomstream-downloader application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration document errors
    #[error("Config fetch error: {0}")]
    ConfigFetch(String),

    // Playlist errors
    #[error("Manifest parse error: {0}")]
    ManifestParse(String),

    // Key exchange errors
    #[error("Key exchange protocol error: {0}")]
    Protocol(String),

    // Cipher setup and padding errors
    #[error("Crypto error: {0}")]
    Crypto(String),

    // Segment download errors
    #[error("Segment fetch error: {0}")]
    SegmentFetch(String),

    // Non-segment transport failures (config, manifests, key endpoint)
    #[error("Transport error: {0}")]
    Transport(String),

    // External tool errors
    #[error("Mux error: {0}")]
    Mux(String),

    #[error("FFmpeg not found. Please install ffmpeg and ensure it's in your PATH.")]
    FfmpegNotFound,

    #[error("Unsupported URL: {0}")]
    UnsupportedUrl(String),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const ABORT: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
    pub const DOWNLOAD_ERROR: i32 = 3;
    pub const MUX_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}
