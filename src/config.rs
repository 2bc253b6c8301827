use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    File,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub upstream_url: String,
    pub cache_backend: CacheBackend,
    pub cache_file: String,
    pub cache_ttl_secs: u64,
    pub fetch_timeout_secs: u64,
    pub static_directory: String,
    pub web_port: u16,
    pub log_level: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .set_default("cache_backend", "file")?
            .set_default("cache_file", "cache/cctv_data.json")?
            .set_default("cache_ttl_secs", 3600)?
            .set_default("fetch_timeout_secs", 30)?
            .set_default("static_directory", "./static")?
            .set_default("web_port", 8080)?
            .set_default("log_level", "info")?
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("CCTV").try_parsing(true))
            .build()?;

        s.try_deserialize()
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
impl AppConfig {
    /// Config pointing at `upstream_url` with a cache file inside `cache_dir`.
    pub fn for_tests(upstream_url: &str, cache_dir: &std::path::Path) -> Self {
        Self {
            upstream_url: upstream_url.to_string(),
            cache_backend: CacheBackend::File,
            cache_file: cache_dir.join("cctv_data.json").to_string_lossy().to_string(),
            cache_ttl_secs: 3600,
            fetch_timeout_secs: 5,
            static_directory: "./static".to_string(),
            web_port: 0,
            log_level: "debug".to_string(),
        }
    }
}
