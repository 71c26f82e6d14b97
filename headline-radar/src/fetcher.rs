use crate::types::{FetchConfig, FetchResult, RadarError, Result};
use reqwest::{Client, Response};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    /// Download one feed document. Network and HTTP problems are reported in
    /// the returned `FetchResult`, never as `Err`.
    pub async fn fetch_feed(&self, url: &str) -> FetchResult {
        let start_time = Instant::now();

        debug!("Fetching feed: {}", url);

        match self.download(url).await {
            Ok((status, content)) => {
                let response_time = start_time.elapsed().as_millis() as u64;
                info!("Fetched feed: {} ({} bytes, {}ms)", url, content.len(), response_time);
                FetchResult {
                    url: url.to_string(),
                    success: true,
                    error: None,
                    response_time_ms: response_time,
                    http_status: Some(status),
                    content: Some(content),
                }
            }
            Err(e) => {
                warn!("Failed to fetch feed {}: {}", url, e);
                let status = match &e {
                    RadarError::HttpStatus { status, .. } => Some(*status),
                    _ => None,
                };
                let mut result = FetchResult::failed(
                    url,
                    start_time.elapsed().as_millis() as u64,
                    e.to_string(),
                );
                result.http_status = status;
                result
            }
        }
    }

    async fn download(&self, url: &str) -> Result<(u16, Vec<u8>)> {
        let response = self.send(url).await?;
        let status = response.status();

        if !status.is_success() {
            return Err(RadarError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        // Check declared content length before reading the body
        if let Some(content_length) = response.content_length() {
            self.check_size(content_length)?;
        }

        let body = response.bytes().await?;
        self.check_size(body.len() as u64)?;

        Ok((status.as_u16(), body.to_vec()))
    }

    async fn send(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                RadarError::Timeout {
                    url: url.to_string(),
                    seconds: self.config.timeout_seconds,
                }
            } else {
                RadarError::Http(e)
            }
        })?;
        Ok(response)
    }

    fn check_size(&self, bytes: u64) -> Result<()> {
        let limit = self.config.max_feed_size_mb as u64 * 1024 * 1024;
        if bytes > limit {
            return Err(RadarError::FeedTooLarge {
                size_mb: bytes as f64 / (1024.0 * 1024.0),
                limit_mb: self.config.max_feed_size_mb,
            });
        }
        Ok(())
    }
}
