//! Boomstream key exchange.
//!
//! The media playlist carries an obfuscated `#EXT-X-MEDIA-READY` value. Its
//! deobfuscated form holds a 20-byte request prefix followed by the 16-byte
//! IV. The prefix, concatenated with the session token and re-obfuscated,
//! addresses the key endpoint; the raw response body is the AES key.

use crate::api::ApiClient;
use crate::crypto::xor;
use crate::error::{Error, Result};
use crate::playlist::Playlist;

/// Side-table tag carrying the obfuscated key-exchange value.
pub const MEDIA_READY_TAG: &str = "#EXT-X-MEDIA-READY";

/// Shared XOR secret used by the platform player.
pub const XOR_SECRET: &[u8] = b"bla_bla_bla";

/// Fixed key-exchange endpoint.
pub const KEY_ENDPOINT: &str = "https://play.boomstream.com/api/process/";

/// Symmetric key material shared by every segment download in a session.
///
/// The IV is reused across all segments; that is a platform property, not a
/// per-segment nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMaterial {
    pub key: [u8; 16],
    pub iv: [u8; 16],
}

/// Derive the key-request path and IV from the media playlist's side table.
///
/// Pure part of the exchange; the returned path segment is appended to
/// [`KEY_ENDPOINT`].
pub fn derive_key_request(
    chunklist: &Playlist,
    token: &[u8],
    secret: &[u8],
) -> Result<(String, [u8; 16])> {
    let media_ready = chunklist.side_table.get(MEDIA_READY_TAG).ok_or_else(|| {
        Error::Protocol(format!("{} tag missing from media playlist", MEDIA_READY_TAG))
    })?;

    let plain = xor::deobfuscate_hex(media_ready, secret)?;
    if plain.len() < 36 {
        return Err(Error::Protocol(format!(
            "deobfuscated {} value is {} bytes, expected at least 36",
            MEDIA_READY_TAG,
            plain.len()
        )));
    }

    let mut iv = [0u8; 16];
    iv.copy_from_slice(&plain[20..36]);

    let mut request = plain[..20].to_vec();
    request.extend_from_slice(token);

    Ok((xor::obfuscate_hex(&request, secret), iv))
}

/// Run the key exchange: derive the request path, fetch the key, assemble
/// the session [`KeyMaterial`]. Issued exactly once per session, no retries.
pub async fn exchange_keys(
    client: &ApiClient,
    chunklist: &Playlist,
    token: &[u8],
    secret: &[u8],
) -> Result<KeyMaterial> {
    let (path, iv) = derive_key_request(chunklist, token, secret)?;

    let key_url = format!("{}{}", KEY_ENDPOINT, path);
    tracing::debug!("fetching decryption key from {}", key_url);
    let body = client.fetch_key(&key_url).await?;

    let key: [u8; 16] = body.as_slice().try_into().map_err(|_| {
        Error::Protocol(format!(
            "key endpoint returned {} bytes, expected 16",
            body.len()
        ))
    })?;

    Ok(KeyMaterial { key, iv })
}
