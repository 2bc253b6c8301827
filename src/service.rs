use crate::cache::CameraCache;
use crate::camera::{transform_all, CachedResponse};
use crate::error::AppError;
use crate::upstream::UpstreamClient;
use serde_json::Value;
use std::sync::Arc;

/// Outcome of one fetch-transform-store cycle.
#[derive(Debug)]
pub struct Refresh {
    pub response: CachedResponse,
    pub skipped: usize,
}

/// Cache-aside pipeline behind the camera endpoint.
pub struct CameraService {
    cache: Arc<dyn CameraCache>,
    upstream: UpstreamClient,
}

impl CameraService {
    pub fn new(cache: Arc<dyn CameraCache>, upstream: UpstreamClient) -> Self {
        Self { cache, upstream }
    }

    /// Serves from the cache when allowed and fresh, otherwise refreshes.
    pub async fn cameras(&self, force: bool) -> Result<CachedResponse, AppError> {
        if !force {
            if let Some(cached) = self.cache.read().await {
                log::debug!("Cache hit: serving {} cameras", cached.data.len());
                return Ok(cached);
            }
            log::debug!("Cache miss");
        } else {
            log::debug!("Forced refresh requested, skipping cache read");
        }

        Ok(self.refresh().await?.response)
    }

    /// Fetches the feed, validates and transforms it, and stores the result.
    /// A failed cache write is logged; the fresh data is still returned.
    pub async fn refresh(&self) -> Result<Refresh, AppError> {
        let body = self.upstream.fetch().await?;

        let feed: Value = serde_json::from_slice(&body).map_err(|e| {
            log::warn!("Upstream returned invalid JSON: {}", e);
            AppError::UpstreamInvalidJson(e)
        })?;

        let items = feed
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                log::warn!("Upstream payload has no `data` array");
                AppError::UpstreamInvalidStructure
            })?;

        let summary = transform_all(items);
        if summary.skipped > 0 {
            log::info!("Skipped {} non-record elements from upstream", summary.skipped);
        }

        let response = CachedResponse { data: summary.cameras };
        if let Err(e) = self.cache.write(&response).await {
            log::warn!("Failed to write camera cache: {}", e);
        }
        log::info!("Fetched and cached {} cameras", response.data.len());

        Ok(Refresh {
            response,
            skipped: summary.skipped,
        })
    }
}
