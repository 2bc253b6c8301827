mod cache;
mod cache_stores;
mod camera;
mod config;
mod coordinates;
mod error;
mod service;
mod upstream;
mod web_server;

use crate::cache::CameraCache;
use crate::cache_stores::{file::FileCache, memory::MemoryCache};
use crate::config::{AppConfig, CacheBackend};
use crate::service::CameraService;
use crate::upstream::UpstreamClient;
use anyhow::Result;
use clap::Parser;
use log::info;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(about = "Caching proxy for the Indonesian CCTV location feed")]
struct Args {
    /// Port to listen on, overriding `web_port` from the config files.
    #[arg(long)]
    port: Option<u16>,

    /// Fetch the feed once, write the cache and exit without serving.
    #[arg(long)]
    refresh: bool,
}

fn build_service(config: &AppConfig) -> Result<CameraService> {
    let cache: Arc<dyn CameraCache> = match config.cache_backend {
        CacheBackend::File => Arc::new(FileCache::new(config)),
        CacheBackend::Memory => Arc::new(MemoryCache::new(config.cache_ttl())),
    };
    let upstream = UpstreamClient::new(config)?;
    Ok(CameraService::new(cache, upstream))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = AppConfig::new()?;
    if let Some(port) = args.port {
        config.web_port = port;
    }

    // Initialize env_logger based on config.log_level
    env_logger::Builder::new()
        .filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    info!("Starting cctv-proxy");

    let service = build_service(&config)?;

    if args.refresh {
        if config.cache_backend == CacheBackend::Memory {
            log::warn!("--refresh with the memory cache backend does not persist anything");
        }
        let refresh = service.refresh().await?;
        info!(
            "Refreshed cache with {} cameras ({} elements skipped)",
            refresh.response.data.len(),
            refresh.skipped
        );
        return Ok(());
    }

    if let Err(e) = web_server::start_web_server(Arc::new(config), Arc::new(service)).await {
        log::error!("Web server error: {}", e);
    }

    info!("cctv-proxy finished");

    Ok(())
}
