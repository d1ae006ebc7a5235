//! Concat manifest generation and ffmpeg invocation.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::fs;
use tokio::process::Command;

use crate::error::{Error, Result};

/// Name of the concat manifest inside the session cache directory.
const INPUT_MANIFEST: &str = "input.txt";

/// Write the concat demuxer manifest, one `file '<path>'` line per segment
/// file, in order. Returns the manifest path.
pub async fn write_input_manifest(files: &[PathBuf], cache_dir: &Path) -> Result<PathBuf> {
    let mut content = String::new();
    for file in files {
        content.push_str(&format!("file '{}'\n", file.display()));
    }

    let path = cache_dir.join(INPUT_MANIFEST);
    fs::write(&path, content).await?;

    Ok(path)
}

/// Losslessly concatenate the listed segment files into the output file.
pub async fn join_files(input_manifest: &Path, output: &Path) -> Result<()> {
    let manifest_str = input_manifest
        .to_str()
        .ok_or_else(|| Error::Mux("invalid path encoding for concat manifest".to_string()))?;
    let output_str = output
        .to_str()
        .ok_or_else(|| Error::Mux("invalid path encoding for output file".to_string()))?;

    let status = Command::new("ffmpeg")
        .args([
            "-y",
            "-f",
            "concat",
            "-safe",
            "0",
            "-i",
            manifest_str,
            "-c",
            "copy",
            output_str,
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FfmpegNotFound
            } else {
                Error::Mux(format!("failed to run ffmpeg: {}", e))
            }
        })?;

    if !status.success() {
        return Err(Error::Mux(format!("ffmpeg exited with status: {}", status)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_input_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            dir.path().join("seg0.ts"),
            dir.path().join("seg1.ts"),
        ];

        let manifest = write_input_manifest(&files, dir.path()).await.unwrap();
        assert_eq!(manifest, dir.path().join("input.txt"));

        let content = std::fs::read_to_string(&manifest).unwrap();
        let expected = format!(
            "file '{}'\nfile '{}'\n",
            files[0].display(),
            files[1].display()
        );
        assert_eq!(content, expected);
    }

    #[tokio::test]
    async fn test_write_input_manifest_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_input_manifest(&[], dir.path()).await.unwrap();
        assert_eq!(std::fs::read_to_string(&manifest).unwrap(), "");
    }
}
