//! Boomstream HTTP client.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use url::Url;

use crate::api::types::StreamConfig;
use crate::error::{Error, Result};
use crate::playlist::{self, Playlist};

/// Query parameter pinning the player protocol version on `/config`.
const CONFIG_VERSION: &str = "1.2.97";

/// Fixed header set sent by the platform's web player. Accept-Encoding is
/// negotiated by reqwest's gzip support instead of being pinned here, so
/// gzip responses are decompressed transparently.
const PLAYER_HEADERS: &[(&str, &str)] = &[
    ("accept", "*/*"),
    ("accept-language", "ru-RU,ru;q=0.8"),
    ("connection", "keep-alive"),
    ("content-type", "application/json"),
    ("origin", "https://otus.ru"),
    ("referer", "https://otus.ru/"),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "cross-site"),
    ("sec-gpc", "1"),
    (
        "user-agent",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    ),
    (
        "sec-ch-ua",
        "\"Brave\";v=\"131\", \"Chromium\";v=\"131\", \"Not_A Brand\";v=\"24\"",
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"macOS\""),
];

/// Source of encrypted segment bytes, abstracted for the pipeline.
#[async_trait]
pub trait SegmentSource: Send + Sync {
    async fn fetch_segment(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP client carrying the fixed player header set on every request.
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// Build a client with the player headers installed as defaults.
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        for &(name, value) in PLAYER_HEADERS {
            headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .gzip(true)
            .build()?;

        Ok(Self { client })
    }

    /// Derive the `/config` URL from a player URL.
    pub fn config_url(player_url: &Url) -> Url {
        let mut url = player_url.clone();
        url.set_path(&format!("{}/config", player_url.path()));
        url.query_pairs_mut().append_pair("version", CONFIG_VERSION);
        url
    }

    /// Fetch and decode the player configuration document.
    pub async fn fetch_config(&self, url: &Url) -> Result<StreamConfig> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::ConfigFetch(format!("config request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ConfigFetch(format!(
                "config request returned HTTP {}",
                status
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::ConfigFetch(format!("failed to read config body: {}", e)))?;

        serde_json::from_str(&text)
            .map_err(|e| Error::ConfigFetch(format!("failed to parse config JSON: {}", e)))
    }

    /// Fetch and parse a playlist (master or media).
    pub async fn fetch_playlist(&self, url: &str) -> Result<Playlist> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("playlist request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!(
                "playlist request returned HTTP {}",
                status
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("failed to read playlist body: {}", e)))?;

        playlist::parse(&text)
    }

    /// Fetch the raw AES key from the key-exchange endpoint.
    pub async fn fetch_key(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("key request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!(
                "key request returned HTTP {}",
                status
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(format!("failed to read key body: {}", e)))?;

        Ok(body.to_vec())
    }
}

#[async_trait]
impl SegmentSource for ApiClient {
    async fn fetch_segment(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::SegmentFetch(format!("segment request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::SegmentFetch(format!(
                "segment request returned HTTP {}",
                status
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::SegmentFetch(format!("failed to read segment body: {}", e)))?;

        Ok(body.to_vec())
    }
}
