//! Bounded-concurrency segment pipeline.
//!
//! All segments are scheduled up front; a semaphore of width W admits at
//! most W simultaneous fetch-decrypt-write operations. Each worker writes
//! only its own slot of the pre-sized output buffer, so the final file list
//! is in manifest order regardless of completion order. The first failure
//! sets a cancellation flag checked by every worker before it starts; its
//! error is the one returned, and callers never receive a partial list.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use indicatif::ProgressBar;
use tokio::sync::{Mutex, Semaphore};
use url::Url;

use crate::api::SegmentSource;
use crate::crypto::{self, KeyMaterial};
use crate::error::{Error, Result};
use crate::playlist::Segment;

/// Download, decrypt and persist all segments, returning their paths in
/// manifest order.
pub async fn download_segments<S: SegmentSource + 'static>(
    source: Arc<S>,
    segments: &[Segment],
    keys: KeyMaterial,
    cache_dir: &Path,
    parallel: usize,
    progress: &ProgressBar,
) -> Result<Vec<PathBuf>> {
    let total = segments.len();
    let slots: Arc<Mutex<Vec<Option<PathBuf>>>> = Arc::new(Mutex::new(vec![None; total]));
    let gate = Arc::new(Semaphore::new(parallel.max(1)));
    let cancelled = Arc::new(AtomicBool::new(false));
    let first_error: Arc<Mutex<Option<Error>>> = Arc::new(Mutex::new(None));

    let mut workers = Vec::with_capacity(total);

    for (index, segment) in segments.iter().cloned().enumerate() {
        let source = Arc::clone(&source);
        let slots = Arc::clone(&slots);
        let gate = Arc::clone(&gate);
        let cancelled = Arc::clone(&cancelled);
        let first_error = Arc::clone(&first_error);
        let cache_dir = cache_dir.to_path_buf();
        let progress = progress.clone();

        workers.push(tokio::spawn(async move {
            let Ok(_permit) = gate.acquire_owned().await else {
                return;
            };

            if cancelled.load(Ordering::SeqCst) {
                return;
            }

            match materialize_segment(source.as_ref(), &segment, &keys, &cache_dir).await {
                Ok(path) => {
                    slots.lock().await[index] = Some(path);
                    progress.inc(1);
                }
                Err(e) => {
                    // First failure wins; later ones are discarded.
                    let mut slot = first_error.lock().await;
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                    cancelled.store(true, Ordering::SeqCst);
                }
            }
        }));
    }

    for result in join_all(workers).await {
        result.map_err(|e| Error::SegmentFetch(format!("segment worker panicked: {}", e)))?;
    }

    if let Some(err) = first_error.lock().await.take() {
        return Err(err);
    }

    let slots = Arc::try_unwrap(slots)
        .map_err(|_| Error::SegmentFetch("segment buffer still shared after join".to_string()))?
        .into_inner();

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| {
                Error::SegmentFetch(format!("segment {} was never materialized", index))
            })
        })
        .collect()
}

/// Fetch, decrypt and write one segment, or reuse the existing file.
async fn materialize_segment<S: SegmentSource + ?Sized>(
    source: &S,
    segment: &Segment,
    keys: &KeyMaterial,
    cache_dir: &Path,
) -> Result<PathBuf> {
    let path = cache_dir.join(segment_filename(&segment.url)?);

    if path.exists() {
        tracing::debug!("reusing cached segment {}", path.display());
        return Ok(path);
    }

    let encrypted = source.fetch_segment(&segment.url).await?;
    let decrypted = crypto::decrypt_segment(&encrypted, &keys.key, &keys.iv)?;
    tokio::fs::write(&path, decrypted).await?;

    Ok(path)
}

/// Final path component of a segment URL, used as the cache filename.
fn segment_filename(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    parsed
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::SegmentFetch(format!("segment URL has no file name: {}", url)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use aes::cipher::block_padding::Pkcs7;
    use aes::cipher::{BlockEncryptMut, KeyIvInit};
    use async_trait::async_trait;

    type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;

    const KEYS: KeyMaterial = KeyMaterial {
        key: *b"0123456789abcdef",
        iv: *b"fedcba9876543210",
    };

    fn encrypt(plain: &[u8]) -> Vec<u8> {
        let padded_len = (plain.len() / 16 + 1) * 16;
        let mut buffer = vec![0u8; padded_len];
        buffer[..plain.len()].copy_from_slice(plain);
        Aes128CbcEnc::new(&KEYS.key.into(), &KEYS.iv.into())
            .encrypt_padded_mut::<Pkcs7>(&mut buffer, plain.len())
            .unwrap();
        buffer
    }

    fn make_segments(count: usize) -> Vec<Segment> {
        (0..count)
            .map(|i| Segment {
                duration_ms: 4000,
                url: format!("http://origin.invalid/media/seg{}.ts", i),
            })
            .collect()
    }

    /// Serves encrypted payloads while recording in-flight concurrency.
    struct InstrumentedSource {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        fetches: AtomicUsize,
        fail_on: Option<String>,
    }

    impl InstrumentedSource {
        fn new(fail_on: Option<&str>) -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                fetches: AtomicUsize::new(0),
                fail_on: fail_on.map(str::to_string),
            }
        }
    }

    #[async_trait]
    impl SegmentSource for InstrumentedSource {
        async fn fetch_segment(&self, url: &str) -> Result<Vec<u8>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);

            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if let Some(marker) = &self.fail_on {
                if url.contains(marker.as_str()) {
                    return Err(Error::SegmentFetch(format!(
                        "segment request returned HTTP 503: {}",
                        url
                    )));
                }
            }

            Ok(encrypt(url.as_bytes()))
        }
    }

    #[tokio::test]
    async fn test_files_are_ordered_and_decrypted() {
        let dir = tempfile::tempdir().unwrap();
        let segments = make_segments(6);
        let source = Arc::new(InstrumentedSource::new(None));

        let files = download_segments(
            Arc::clone(&source),
            &segments,
            KEYS,
            dir.path(),
            3,
            &ProgressBar::hidden(),
        )
        .await
        .unwrap();

        assert_eq!(files.len(), 6);
        for (i, path) in files.iter().enumerate() {
            assert_eq!(
                path.file_name().and_then(|n| n.to_str()),
                Some(format!("seg{}.ts", i).as_str())
            );
            let contents = std::fs::read(path).unwrap();
            assert_eq!(contents, segments[i].url.as_bytes());
        }
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_worker_cap() {
        let dir = tempfile::tempdir().unwrap();
        let segments = make_segments(12);
        let source = Arc::new(InstrumentedSource::new(None));

        download_segments(
            Arc::clone(&source),
            &segments,
            KEYS,
            dir.path(),
            3,
            &ProgressBar::hidden(),
        )
        .await
        .unwrap();

        assert!(source.max_in_flight.load(Ordering::SeqCst) <= 3);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 12);
    }

    #[tokio::test]
    async fn test_first_error_is_propagated_never_a_partial_list() {
        let dir = tempfile::tempdir().unwrap();
        let segments = make_segments(10);
        let source = Arc::new(InstrumentedSource::new(Some("seg3.ts")));

        let err = download_segments(
            Arc::clone(&source),
            &segments,
            KEYS,
            dir.path(),
            2,
            &ProgressBar::hidden(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::SegmentFetch(_)));
        assert!(err.to_string().contains("seg3.ts"));
    }

    #[tokio::test]
    async fn test_cancellation_stops_new_work() {
        let dir = tempfile::tempdir().unwrap();
        let segments = make_segments(40);
        // Width 1 fails fast on the very first segment; cancelled workers
        // must not issue further fetches.
        let source = Arc::new(InstrumentedSource::new(Some("seg0.ts")));

        download_segments(
            Arc::clone(&source),
            &segments,
            KEYS,
            dir.path(),
            1,
            &ProgressBar::hidden(),
        )
        .await
        .unwrap_err();

        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_existing_files_are_reused_without_fetching() {
        let dir = tempfile::tempdir().unwrap();
        let segments = make_segments(5);

        for i in 0..5 {
            std::fs::write(dir.path().join(format!("seg{}.ts", i)), b"cached").unwrap();
        }

        let source = Arc::new(InstrumentedSource::new(None));
        let files = download_segments(
            Arc::clone(&source),
            &segments,
            KEYS,
            dir.path(),
            10,
            &ProgressBar::hidden(),
        )
        .await
        .unwrap();

        assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["seg0.ts", "seg1.ts", "seg2.ts", "seg3.ts", "seg4.ts"]);
    }

    #[test]
    fn test_segment_filename() {
        assert_eq!(
            segment_filename("https://cdn.example.com/a/b/seg7.ts?tok=1").unwrap(),
            "seg7.ts"
        );
        assert!(segment_filename("https://cdn.example.com/").is_err());
        assert!(segment_filename("not a url").is_err());
    }
}
