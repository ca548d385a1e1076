//! Remote chart and issuance-time retrieval.
//!
//! Every network, HTTP status or decode problem surfaces as
//! [`PanelError::FetchFailed`] carrying the URL. Nothing is retried: a failed
//! fetch skips its unit for this run.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use compositor::{declare_transparent, decode_rgba};
use image::RgbaImage;
use panel_common::{IssuanceTime, PanelError, PanelResult};
use reqwest::Client;
use tracing::{debug, info, instrument};

use crate::config::FetchSettings;

/// Trait for sources that serve issuance feeds and chart images.
#[async_trait]
pub trait ChartSource: Send + Sync {
    /// Fetch the text body of an issuance-time feed.
    async fn fetch_feed(&self, url: &str) -> PanelResult<String>;

    /// Fetch the raw bytes of a chart image.
    async fn fetch_chart(&self, url: &str) -> PanelResult<Bytes>;
}

/// HTTP chart source backed by reqwest.
pub struct HttpChartSource {
    client: Client,
    feed_timeout: Duration,
    image_timeout: Duration,
}

impl HttpChartSource {
    pub fn new(settings: &FetchSettings) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            feed_timeout: Duration::from_secs(settings.feed_timeout_secs),
            image_timeout: Duration::from_secs(settings.image_timeout_secs),
        })
    }

    async fn get(&self, url: &str, timeout: Duration) -> PanelResult<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| PanelError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PanelError::fetch(url, format!("HTTP error: {}", status)));
        }
        Ok(response)
    }
}

#[async_trait]
impl ChartSource for HttpChartSource {
    #[instrument(skip(self))]
    async fn fetch_feed(&self, url: &str) -> PanelResult<String> {
        let response = self.get(url, self.feed_timeout).await?;
        response.text().await.map_err(|e| PanelError::fetch(url, e))
    }

    #[instrument(skip(self))]
    async fn fetch_chart(&self, url: &str) -> PanelResult<Bytes> {
        let response = self.get(url, self.image_timeout).await?;
        let bytes = response.bytes().await.map_err(|e| PanelError::fetch(url, e))?;
        debug!(size = bytes.len(), "Downloaded chart");
        Ok(bytes)
    }
}

/// Fetch and parse the latest issuance time published at `feed_url`.
pub async fn fetch_issuance(source: &dyn ChartSource, feed_url: &str) -> PanelResult<IssuanceTime> {
    let body = source.fetch_feed(feed_url).await?;
    let issuance = IssuanceTime::from_feed(&body).map_err(|e| PanelError::fetch(feed_url, e))?;
    info!(feed = %feed_url, issuance = %issuance, "Resolved issuance time");
    Ok(issuance)
}

/// Fetch a chart, decode it to RGBA and clear its white background.
///
/// Decoding and filtering run on the blocking pool.
pub async fn fetch_chart_image(
    source: &dyn ChartSource,
    url: &str,
    white_threshold: Option<u8>,
) -> PanelResult<RgbaImage> {
    let bytes = source.fetch_chart(url).await?;
    let owned_url = url.to_string();

    tokio::task::spawn_blocking(move || -> PanelResult<RgbaImage> {
        let mut image = decode_rgba(&bytes).map_err(|e| PanelError::fetch(&owned_url, e))?;
        if let Some(threshold) = white_threshold {
            declare_transparent(&mut image, threshold);
        }
        Ok(image)
    })
    .await
    .map_err(|e| PanelError::fetch(url, format!("decode task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use test_utils::{chart_on_white, encode_png};

    struct StaticSource {
        feeds: HashMap<String, String>,
        charts: HashMap<String, Bytes>,
    }

    #[async_trait]
    impl ChartSource for StaticSource {
        async fn fetch_feed(&self, url: &str) -> PanelResult<String> {
            self.feeds
                .get(url)
                .cloned()
                .ok_or_else(|| PanelError::fetch(url, "HTTP error: 404 Not Found"))
        }

        async fn fetch_chart(&self, url: &str) -> PanelResult<Bytes> {
            self.charts
                .get(url)
                .cloned()
                .ok_or_else(|| PanelError::fetch(url, "HTTP error: 404 Not Found"))
        }
    }

    fn source() -> StaticSource {
        let mut feeds = HashMap::new();
        feeds.insert("feed/ok".to_string(), "KEY_date,202602211200\n".to_string());
        feeds.insert("feed/nocomma".to_string(), "202602211200".to_string());

        let mut charts = HashMap::new();
        let png = encode_png(&chart_on_white(8, 8, [0, 0, 255, 255]));
        charts.insert("chart/ok".to_string(), Bytes::from(png));
        charts.insert("chart/html".to_string(), Bytes::from_static(b"<html>404</html>"));
        StaticSource { feeds, charts }
    }

    #[tokio::test]
    async fn test_fetch_issuance() {
        let issuance = fetch_issuance(&source(), "feed/ok").await.unwrap();
        assert_eq!(issuance.as_str(), "202602211200");
    }

    #[tokio::test]
    async fn test_feed_without_comma_is_fetch_failure() {
        let err = fetch_issuance(&source(), "feed/nocomma").await.unwrap_err();
        assert!(matches!(err, PanelError::FetchFailed { ref url, .. } if url == "feed/nocomma"));
    }

    #[tokio::test]
    async fn test_fetch_chart_filters_white() {
        let image = fetch_chart_image(&source(), "chart/ok", Some(200)).await.unwrap();
        assert_eq!(image.get_pixel(0, 0).0[3], 0);
        assert_eq!(image.get_pixel(4, 4).0, [0, 0, 255, 255]);

        let raw = fetch_chart_image(&source(), "chart/ok", None).await.unwrap();
        assert_eq!(raw.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[tokio::test]
    async fn test_undecodable_chart_is_fetch_failure() {
        let err = fetch_chart_image(&source(), "chart/html", Some(200)).await.unwrap_err();
        assert!(matches!(err, PanelError::FetchFailed { ref url, .. } if url == "chart/html"));
    }

    #[tokio::test]
    async fn test_missing_chart_is_fetch_failure() {
        let err = fetch_chart_image(&source(), "chart/missing", Some(200)).await.unwrap_err();
        assert_eq!(err.kind(), "fetch_failed");
    }

    #[test]
    fn test_http_source_builds_with_defaults() {
        assert!(HttpChartSource::new(&FetchSettings::default()).is_ok());
    }
}
