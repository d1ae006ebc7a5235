//! Boomstream Downloader - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use boomstream_downloader::{
    cli::Args,
    download,
    error::{exit_codes, Error, Result},
    output::{print_error, print_success},
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(path) => {
            print_success(&format!("Saved {}", path.display()));
            ExitCode::from(exit_codes::SUCCESS as u8)
        }
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::ConfigFetch(_) | Error::UnsupportedUrl(_) | Error::UrlParse(_) => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                Error::ManifestParse(_)
                | Error::Protocol(_)
                | Error::Crypto(_)
                | Error::SegmentFetch(_)
                | Error::Transport(_) => ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8),
                Error::Mux(_) | Error::FfmpegNotFound => {
                    ExitCode::from(exit_codes::MUX_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<PathBuf> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt().with_env_filter(filter).with_target(false).init();

    let url = Url::parse(&args.url)?;

    match url.host_str() {
        Some(host) if host == download::SERVICE_HOST => download::run(&url, args.parallel).await,
        _ => Err(Error::UnsupportedUrl(args.url)),
    }
}
