use crate::config::ScrapingConfig;
use crate::error::{Result, TrackerError};
use async_trait::async_trait;
use rand::seq::IndexedRandom;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Browser identities rotated between requests
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
];

/// Source of raw search result pages
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Polite HTTP fetcher: waits a randomized delay before each request and
/// presents a different browser identity each time
pub struct HttpFetcher {
    client: Client,
    delay: Duration,
    jitter: Duration,
}

impl HttpFetcher {
    pub fn new(scraping: &ScrapingConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9,lt;q=0.8"));
        headers.insert(REFERER, HeaderValue::from_static("https://www.google.com/"));
        headers.insert("dnt", HeaderValue::from_static("1"));

        let client = Client::builder()
            .timeout(Duration::from_secs(scraping.timeout))
            .default_headers(headers)
            .build()
            .map_err(|e| TrackerError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            delay: Duration::from_secs_f64(scraping.delay),
            jitter: Duration::from_secs_f64(scraping.jitter),
        })
    }

    fn politeness_delay(&self) -> Duration {
        let extra = if self.jitter.is_zero() {
            0.0
        } else {
            rand::rng().random_range(0.0..=self.jitter.as_secs_f64())
        };
        self.delay + Duration::from_secs_f64(extra)
    }
}

pub fn random_user_agent() -> &'static str {
    USER_AGENTS.choose(&mut rand::rng()).copied().unwrap_or(USER_AGENTS[0])
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let wait = self.politeness_delay();
        debug!("Waiting {:.2} seconds before request", wait.as_secs_f64());
        tokio::time::sleep(wait).await;

        debug!("Fetching URL: {}", url);
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, random_user_agent())
            .send()
            .await
            .map_err(|e| TrackerError::fetch(url, e))?;

        let response = response
            .error_for_status()
            .map_err(|e| TrackerError::fetch(url, e))?;

        let html = response.text().await.map_err(|e| TrackerError::fetch(url, e))?;
        debug!("Downloaded {} bytes of HTML", html.len());

        Ok(html)
    }
}
