use std::path::{Path, PathBuf};

use log::{debug, info};
use tokio::io::AsyncWriteExt;

use crate::config::MapConfig;
use crate::error::{Result, RouteArtError};
use crate::geo::MapView;
use crate::utils::Fingerprint;

/// Static-map fetcher with a fingerprint-named file cache.
pub struct MapClient {
    http: reqwest::Client,
    config: MapConfig,
    cache_dir: PathBuf,
}

impl MapClient {
    pub fn new(config: MapConfig, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_path(&self, view: &MapView) -> PathBuf {
        self.cache_dir
            .join(format!("map-{}.png", map_fingerprint(&self.config.style, view)))
    }

    /// Query pairs sent to the provider, API key last.
    pub fn query(&self, view: &MapView) -> Vec<(&'static str, String)> {
        vec![
            ("style", self.config.style.clone()),
            ("width", view.width.to_string()),
            ("height", view.height.to_string()),
            (
                "center",
                format!("lonlat:{},{}", view.center.longitude, view.center.latitude),
            ),
            ("zoom", view.zoom.to_string()),
            ("apiKey", self.config.api_key.clone()),
        ]
    }

    /// Background image for `view`, downloading it only on a cache miss.
    pub async fn fetch(&self, view: &MapView) -> Result<PathBuf> {
        let path = self.cache_path(view);
        if path.exists() {
            debug!("Using cached map {}", path.display());
            return Ok(path);
        }

        let mut response = self
            .http
            .get(&self.config.base_url)
            .query(&self.query(view))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let url = redact_key(response.url().as_str(), &self.config.api_key);
            let body = response.text().await.unwrap_or_default();
            return Err(RouteArtError::RequestFailed { status, url, body });
        }

        tokio::fs::create_dir_all(&self.cache_dir).await?;
        let partial = path.with_extension("part");
        let mut file = tokio::fs::File::create(&partial).await?;
        let mut written = 0usize;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len();
        }
        file.flush().await?;
        drop(file);
        tokio::fs::rename(&partial, &path).await?;

        info!(
            "Downloaded {}x{} map at zoom {} ({} bytes) to {}",
            view.width,
            view.height,
            view.zoom,
            written,
            path.display()
        );
        Ok(path)
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }
}

/// The API key is left out so rotating it does not invalidate the cache.
fn map_fingerprint(style: &str, view: &MapView) -> String {
    Fingerprint::new()
        .text(style)
        .uint(u64::from(view.width))
        .uint(u64::from(view.height))
        .float(view.center.latitude)
        .float(view.center.longitude)
        .uint(u64::from(view.zoom))
        .finish()
}

fn redact_key(url: &str, key: &str) -> String {
    if key.is_empty() {
        url.to_string()
    } else {
        url.replace(key, "***")
    }
}
