//! Command-line argument definitions using clap.

use clap::Parser;

/// Version string carrying commit hash and build time, emitted by build.rs.
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("BUILD_COMMIT"),
    "\nbuilt: ",
    env!("BUILD_TIME"),
);

/// Boomstream video downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "boomstream-downloader",
    version,
    long_version = LONG_VERSION,
    about = "Download and decrypt videos from play.boomstream.com",
    long_about = "Downloads a Boomstream HLS stream, decrypts its segments and \
                  losslessly muxes them into a single file in the current directory."
)]
pub struct Args {
    /// Player URL, e.g. https://play.boomstream.com/<media-id>.
    pub url: String,

    /// Number of segments downloaded in parallel.
    #[arg(long, default_value_t = crate::download::DEFAULT_PARALLELISM)]
    pub parallel: usize,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}
