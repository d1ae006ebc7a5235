//! Line-oriented M3U8 playlist parsing.

use crate::error::{Error, Result};
use crate::playlist::model::{Playlist, Rendition, Segment};

/// Parse M3U8 playlist text into a [`Playlist`].
///
/// Single forward pass. `#EXTM3U` resets all accumulated state, even
/// mid-document. Stream and segment declarations open a new entry whose URL
/// is assigned by the following non-directive line, exactly once. Every other
/// directive is stored verbatim in the side table.
pub fn parse(input: &str) -> Result<Playlist> {
    let mut playlist = Playlist::default();

    for line in input.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        if !line.starts_with('#') {
            attach_url(&mut playlist, line)?;
        } else if line.starts_with("#EXTM3U") {
            playlist = Playlist::default();
        } else if line.starts_with("#EXT-X-VERSION") {
            let value = directive_value(line);
            playlist.version = value.parse().map_err(|_| {
                Error::ManifestParse(format!("invalid version directive: {}", line))
            })?;
        } else if line.starts_with("#EXT-X-STREAM-INF") {
            playlist.is_master = true;
            let rendition = parse_stream_inf(directive_value(line))?;
            playlist.renditions.push(rendition);
        } else if line.starts_with("#EXTINF") {
            let segment = parse_extinf(directive_value(line))?;
            playlist.segments.push(segment);
        } else {
            let (key, value) = match line.split_once(':') {
                Some((key, value)) => (key, value),
                None => (line, ""),
            };
            playlist
                .side_table
                .insert(key.to_string(), value.to_string());
        }
    }

    Ok(playlist)
}

/// Attach a URL line to the last open rendition or segment.
fn attach_url(playlist: &mut Playlist, line: &str) -> Result<()> {
    if playlist.is_master {
        let rendition = playlist.renditions.last_mut().ok_or_else(|| {
            Error::ManifestParse(format!("URL line with no preceding stream declaration: {}", line))
        })?;
        if !rendition.url.is_empty() {
            return Err(Error::ManifestParse(format!(
                "rendition URL already set, unexpected line: {}",
                line
            )));
        }
        rendition.url = line.to_string();
    } else {
        let segment = playlist.segments.last_mut().ok_or_else(|| {
            Error::ManifestParse(format!("URL line with no preceding #EXTINF: {}", line))
        })?;
        if !segment.url.is_empty() {
            return Err(Error::ManifestParse(format!(
                "segment URL already set, unexpected line: {}",
                line
            )));
        }
        segment.url = line.to_string();
    }

    Ok(())
}

/// Everything after the first colon, or empty when there is none.
fn directive_value(line: &str) -> &str {
    line.split_once(':').map(|(_, value)| value).unwrap_or("")
}

/// Parse a `#EXT-X-STREAM-INF` attribute list into a URL-less rendition.
fn parse_stream_inf(attrs: &str) -> Result<Rendition> {
    let mut rendition = Rendition::default();

    for attr in attrs.split(',') {
        if let Some(value) = attr.strip_prefix("BANDWIDTH=") {
            rendition.bandwidth = value.parse().map_err(|_| {
                Error::ManifestParse(format!("invalid bandwidth attribute: {}", attr))
            })?;
        } else if let Some(value) = attr.strip_prefix("RESOLUTION=") {
            let (width, height) = value.split_once('x').ok_or_else(|| {
                Error::ManifestParse(format!("invalid resolution attribute: {}", attr))
            })?;
            rendition.width = width.parse().map_err(|_| {
                Error::ManifestParse(format!("invalid resolution width: {}", attr))
            })?;
            rendition.height = height.parse().map_err(|_| {
                Error::ManifestParse(format!("invalid resolution height: {}", attr))
            })?;
        }
    }

    Ok(rendition)
}

/// Parse a `#EXTINF` attribute list into a URL-less segment.
///
/// The first comma-separated attribute is the duration in fractional
/// seconds, stored as truncated milliseconds.
fn parse_extinf(attrs: &str) -> Result<Segment> {
    let duration = attrs.split(',').next().unwrap_or("");
    let seconds: f64 = duration.parse().map_err(|_| {
        Error::ManifestParse(format!("invalid segment duration: {}", duration))
    })?;

    Ok(Segment {
        duration_ms: (seconds * 1000.0) as u64,
        url: String::new(),
    })
}
