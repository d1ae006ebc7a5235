//! Boomstream configuration document types.

use serde::Deserialize;

/// The player's `/config` JSON document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamConfig {
    pub media_data: MediaData,
    pub meta: Meta,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaData {
    pub links: Links,
    /// Base64-encoded session token consumed by the key exchange.
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Links {
    /// Base64-encoded master playlist URL.
    #[serde(default)]
    pub hls: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_config() {
        let json = r#"{
            "mediaData": {
                "links": { "hls": "aHR0cHM6Ly9leGFtcGxlLmNvbS9tYXN0ZXIubTN1OA==" },
                "token": "VE9LRU4="
            },
            "meta": { "title": "Lecture 01" }
        }"#;

        let config: StreamConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.meta.title, "Lecture 01");
        assert_eq!(config.media_data.token, "VE9LRU4=");
        assert!(!config.media_data.links.hls.is_empty());
    }

    #[test]
    fn test_missing_hls_link_defaults_to_empty() {
        let json = r#"{
            "mediaData": { "links": {}, "token": "VE9LRU4=" },
            "meta": { "title": "t" }
        }"#;

        let config: StreamConfig = serde_json::from_str(json).unwrap();
        assert!(config.media_data.links.hls.is_empty());
    }
}
