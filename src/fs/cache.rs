//! Session cache directory management.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::{Error, Result};

/// Application directory name under the platform cache root.
const APP_DIR: &str = "boomstream-downloader";

/// Get the session cache directory for the given service and session id,
/// creating it if it does not exist.
///
/// Layout: `<platform-cache-root>/boomstream-downloader/<service>/<id>/`.
pub fn session_cache_dir(service: &str, session_id: &str) -> Result<PathBuf> {
    let base = BaseDirs::new().ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "could not determine user cache directory",
        ))
    })?;

    session_cache_dir_in(base.cache_dir(), service, session_id)
}

fn session_cache_dir_in(cache_root: &Path, service: &str, session_id: &str) -> Result<PathBuf> {
    let dir = cache_root.join(APP_DIR).join(service).join(session_id);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
