use crate::config::AppConfig;
use crate::error::AppError;
use reqwest::Client;
use url::Url;

/// Fetches the raw upstream feed. One GET per call, never retried.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    url: Url,
}

impl UpstreamClient {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let url = Url::parse(&config.upstream_url)?;
        log::debug!("Creating upstream client for URL: {}", url);
        let client = Client::builder()
            .timeout(config.fetch_timeout())
            .build()
            .map_err(AppError::HttpClient)?;
        Ok(Self { client, url })
    }

    /// Returns the raw response body, undecoded. Transport failures and
    /// non-success statuses both mean the feed is unavailable.
    pub async fn fetch(&self) -> Result<Vec<u8>, AppError> {
        log::debug!("Fetching upstream feed from {}", self.url);
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                log::warn!("Upstream fetch failed: {}", e);
                AppError::UpstreamUnavailable(e)
            })?;

        let body = response.bytes().await.map_err(|e| {
            log::warn!("Failed to read upstream body: {}", e);
            AppError::UpstreamUnavailable(e)
        })?;
        log::trace!("Upstream returned {} bytes", body.len());
        Ok(body.to_vec())
    }
}
