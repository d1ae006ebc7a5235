//! Playlist data model and rendition selection.

use std::collections::HashMap;

/// A parsed M3U8 playlist.
///
/// A playlist is either a master playlist (`is_master`, populating
/// `renditions`) or a media playlist (populating `segments`), never both.
/// Directives the parser does not recognize are kept verbatim in
/// `side_table`, keyed by the text before the first colon.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Playlist {
    pub version: u32,
    pub is_master: bool,
    pub renditions: Vec<Rendition>,
    pub segments: Vec<Segment>,
    pub side_table: HashMap<String, String>,
}

/// One alternative encoding of the asset in a master playlist.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Rendition {
    pub bandwidth: u64,
    pub width: u32,
    pub height: u32,
    pub url: String,
}

/// One encrypted media chunk in a media playlist.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Declared duration in whole milliseconds (seconds * 1000, truncated).
    pub duration_ms: u64,
    pub url: String,
}

impl Playlist {
    /// Find the first rendition with exactly the given resolution.
    pub fn rendition_by_resolution(&self, width: u32, height: u32) -> Option<&Rendition> {
        self.renditions
            .iter()
            .find(|r| r.width == width && r.height == height)
    }

    /// Select the rendition with the highest resolution.
    ///
    /// A candidate replaces the running best only when both its width and
    /// height are strictly greater; ties do not replace. When no rendition
    /// dominates 0x0 on both axes, the zero rendition is returned; callers
    /// must treat an empty `url` as "no usable rendition".
    pub fn best_rendition(&self) -> Rendition {
        let mut best = Rendition::default();

        for rendition in &self.renditions {
            if rendition.width > best.width && rendition.height > best.height {
                best = rendition.clone();
            }
        }

        best
    }
}
