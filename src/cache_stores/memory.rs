use crate::cache::{is_expired, CameraCache, Clock, SystemClock};
use crate::camera::CachedResponse;
use crate::error::AppError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;

struct Entry {
    response: CachedResponse,
    written_at: SystemTime,
}

/// In-process cache slot with the same TTL rules as the file cache.
pub struct MemoryCache {
    slot: RwLock<Option<Entry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
            clock,
        }
    }
}

#[async_trait]
impl CameraCache for MemoryCache {
    async fn read(&self) -> Option<CachedResponse> {
        let slot = self.slot.read().await;
        let entry = slot.as_ref()?;
        if is_expired(entry.written_at, self.clock.now(), self.ttl) {
            log::debug!("In-memory cache entry expired");
            return None;
        }
        Some(entry.response.clone())
    }

    async fn write(&self, response: &CachedResponse) -> Result<(), AppError> {
        let mut slot = self.slot.write().await;
        *slot = Some(Entry {
            response: response.clone(),
            written_at: self.clock.now(),
        });
        Ok(())
    }
}
