//! Download session orchestration.

use std::path::PathBuf;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use url::Url;

use crate::api::ApiClient;
use crate::crypto::keys::{self, XOR_SECRET};
use crate::download::pipeline;
use crate::error::{Error, Result};
use crate::fs::{sanitize_filename, session_cache_dir};
use crate::mux;
use crate::output::{create_segment_bar, create_spinner, print_info};

/// Host served by this downloader.
pub const SERVICE_HOST: &str = "play.boomstream.com";

/// Service directory name under the cache root.
const SERVICE_NAME: &str = "boomstream";

/// Default segment worker cap.
pub const DEFAULT_PARALLELISM: usize = 10;

/// Download the asset behind a player URL into the working directory.
///
/// Sequences: config fetch, token/manifest decoding, master playlist,
/// rendition selection, media playlist, key exchange, segment pipeline,
/// concat manifest, external mux, cache cleanup. Returns the muxed file's
/// path.
pub async fn run(player_url: &Url, parallel: usize) -> Result<PathBuf> {
    let session_id = player_url.path().trim_matches('/').replace('/', "_");
    if session_id.is_empty() {
        return Err(Error::UnsupportedUrl(format!(
            "player URL is missing a media id: {}",
            player_url
        )));
    }

    let client = Arc::new(ApiClient::new()?);

    let spinner = create_spinner("Getting video config");
    let config = client.fetch_config(&ApiClient::config_url(player_url)).await?;

    let token = BASE64
        .decode(&config.media_data.token)
        .map_err(|e| Error::Protocol(format!("token is not valid base64: {}", e)))?;

    let master_url = BASE64
        .decode(&config.media_data.links.hls)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(|| {
            Error::ConfigFetch("config has no decodable HLS manifest link".to_string())
        })?;

    spinner.set_message("Retrieving video data");

    let master = client.fetch_playlist(&master_url).await?;
    let rendition = master.best_rendition();
    if rendition.url.is_empty() {
        return Err(Error::ManifestParse(
            "master playlist contains no usable rendition".to_string(),
        ));
    }
    tracing::debug!(
        "selected rendition {}x{} @ {} bps",
        rendition.width,
        rendition.height,
        rendition.bandwidth
    );

    let chunklist = client.fetch_playlist(&rendition.url).await?;

    let key_material = keys::exchange_keys(&client, &chunklist, &token, XOR_SECRET).await?;

    let cache_dir = session_cache_dir(SERVICE_NAME, &session_id)?;
    spinner.finish_and_clear();

    print_info(&format!("Downloading: {}", config.meta.title));
    let bar = create_segment_bar(chunklist.segments.len() as u64);
    let files = pipeline::download_segments(
        Arc::clone(&client),
        &chunklist.segments,
        key_material,
        &cache_dir,
        parallel,
        &bar,
    )
    .await?;
    bar.finish_and_clear();

    let input_manifest = mux::write_input_manifest(&files, &cache_dir).await?;

    let output = std::env::current_dir()?.join(sanitize_filename(&config.meta.title)?);

    let spinner = create_spinner("Saving video");
    mux::join_files(&input_manifest, &output).await?;
    spinner.finish_and_clear();

    // The download already succeeded; a stale cache dir is only a nuisance.
    if let Err(e) = tokio::fs::remove_dir_all(&cache_dir).await {
        tracing::warn!("failed to remove cache dir {}: {}", cache_dir.display(), e);
    }

    Ok(output)
}
