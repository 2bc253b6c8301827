use crate::cache::{is_expired, CameraCache, Clock, SystemClock};
use crate::camera::CachedResponse;
use crate::config::AppConfig;
use crate::error::AppError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// File-backed cache slot. Freshness comes from the file's mtime, nothing
/// about it is stored inside the payload.
///
/// Writes go to a sibling temp file that is renamed over the artifact, so a
/// reader sees either the old or the new payload in full. Concurrent writers
/// are not coordinated: the last rename wins.
pub struct FileCache {
    path: PathBuf,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl FileCache {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_clock(&config.cache_file, config.cache_ttl(), Arc::new(SystemClock))
    }

    pub fn with_clock(path: impl AsRef<Path>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let path = path.as_ref().to_path_buf();
        log::debug!("Using file cache at {:?} with TTL {:?}", path, ttl);
        Self { path, ttl, clock }
    }

    fn temp_path(&self) -> PathBuf {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut name = self
            .path
            .file_name()
            .map(|s| s.to_os_string())
            .unwrap_or_else(|| "cache".into());
        name.push(format!(".{}.{}.tmp", std::process::id(), n));
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl CameraCache for FileCache {
    async fn read(&self) -> Option<CachedResponse> {
        let metadata = match tokio::fs::metadata(&self.path).await {
            Ok(m) => m,
            Err(e) => {
                log::debug!("No cache artifact at {:?}: {}", self.path, e);
                return None;
            }
        };

        let modified = match metadata.modified() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Cannot read mtime of {:?}: {}", self.path, e);
                return None;
            }
        };
        if is_expired(modified, self.clock.now(), self.ttl) {
            log::debug!("Cache artifact {:?} is older than {:?}", self.path, self.ttl);
            return None;
        }

        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) => {
                log::warn!("Failed to read cache artifact {:?}: {}", self.path, e);
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(response) => Some(response),
            Err(e) => {
                log::warn!("Ignoring unreadable cache artifact {:?}: {}", self.path, e);
                None
            }
        }
    }

    async fn write(&self, response: &CachedResponse) -> Result<(), AppError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }

        let bytes = serde_json::to_vec(response)?;
        let temp = self.temp_path();
        log::trace!("Writing {} bytes to {:?}", bytes.len(), temp);
        if let Err(e) = tokio::fs::write(&temp, &bytes).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }

        log::debug!("Cached {} cameras at {:?}", response.data.len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::test_clock::ManualClock;
    use crate::camera::{CameraLocation, CanonicalCamera};
    use std::time::SystemTime;

    fn sample() -> CachedResponse {
        CachedResponse {
            data: vec![CanonicalCamera {
                location: CameraLocation {
                    latitude: -6.2,
                    longitude: 106.8,
                    address: "Jl. Sudirman/Thamrin".to_string(),
                    city: "JAKARTA".to_string(),
                },
                name: Some("Bundaran HI".to_string()),
                url: Some("https://cams.example/hi".to_string()),
                city: Some("JAKARTA".to_string()),
                tag: None,
                status: Some("active".to_string()),
                note: None,
                kind: Some("http".to_string()),
            }],
        }
    }

    fn cache_in(dir: &Path, clock: Arc<ManualClock>) -> FileCache {
        FileCache::with_clock(dir.join("nested/cache/cctv_data.json"), Duration::from_secs(3600), clock)
    }

    #[tokio::test]
    async fn missing_artifact_reads_as_no_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path(), Arc::new(ManualClock::new(SystemTime::now())));
        assert!(cache.read().await.is_none());
    }

    #[tokio::test]
    async fn write_creates_directories_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path(), Arc::new(ManualClock::new(SystemTime::now())));

        cache.write(&sample()).await.unwrap();
        assert!(cache.path.exists());
        assert_eq!(cache.read().await, Some(sample()));

        // Directory already present: second write is a plain overwrite.
        let empty = CachedResponse::default();
        cache.write(&empty).await.unwrap();
        assert_eq!(cache.read().await, Some(empty));
    }

    #[tokio::test]
    async fn stale_artifact_reads_as_no_cache() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(SystemTime::now()));
        let cache = cache_in(dir.path(), clock.clone());

        cache.write(&sample()).await.unwrap();
        clock.advance(Duration::from_secs(60));
        assert!(cache.read().await.is_some());

        clock.advance(Duration::from_secs(3600));
        assert!(cache.read().await.is_none());
    }

    #[tokio::test]
    async fn unparsable_artifact_reads_as_no_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path(), Arc::new(ManualClock::new(SystemTime::now())));
        cache.write(&sample()).await.unwrap();

        std::fs::write(&cache.path, b"{not json").unwrap();
        assert!(cache.read().await.is_none());
    }

    #[tokio::test]
    async fn write_leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path(), Arc::new(ManualClock::new(SystemTime::now())));
        cache.write(&sample()).await.unwrap();
        cache.write(&sample()).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(cache.path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("cctv_data.json")]);
    }

    #[tokio::test]
    async fn unicode_and_slashes_are_stored_unescaped() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path(), Arc::new(ManualClock::new(SystemTime::now())));
        let mut payload = sample();
        payload.data[0].note = Some("Jalan Raya Bogor – arah Cibinong".to_string());
        cache.write(&payload).await.unwrap();

        let raw = std::fs::read_to_string(&cache.path).unwrap();
        assert!(raw.contains("https://cams.example/hi"));
        assert!(raw.contains("Jalan Raya Bogor – arah Cibinong"));
    }
}
