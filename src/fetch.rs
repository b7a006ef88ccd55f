//! Outbound search requests.
//!
//! [`PageFetcher`] is the seam between the query runner and the network; the
//! runner only ever sees HTML text.

use std::time::Duration;

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use tracing::{debug, info};
use url::Url;

use crate::config::FetchConfig;

/// Browser User-Agent strings. Search engines tend to serve trimmed or
/// blocked pages to clients that do not look like a browser.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
];

pub trait PageFetcher {
    /// Fetch the results page for `query`, asking the engine for `raw_count`
    /// results.
    fn fetch(&self, query: &str, raw_count: usize) -> Result<String>;
}

/// Build the results-page URL: `<endpoint>?q=<query>&count=<raw_count>`.
pub fn search_url(endpoint: &str, query: &str, raw_count: usize) -> Result<Url> {
    let count = raw_count.to_string();
    Url::parse_with_params(endpoint, &[("q", query), ("count", count.as_str())])
        .with_context(|| format!("Invalid search endpoint: {endpoint}"))
}

pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS.choose(&mut rng).copied().unwrap_or(USER_AGENTS[0])
}

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let user_agent = match config.user_agent {
            Some(ref custom) => custom.clone(),
            None => random_user_agent().to_owned(),
        };

        debug!(action = "configure", component = "http", user_agent = %user_agent, "Building HTTP client");

        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, query: &str, raw_count: usize) -> Result<String> {
        let url = search_url(&self.endpoint, query, raw_count)?;
        info!(action = "request", component = "http", url = %url, "Fetching results page");

        let response = self
            .client
            .get(url.clone())
            .header("Accept", "text/html,application/xhtml+xml")
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .with_context(|| format!("Request failed: {url}"))?
            .error_for_status()
            .with_context(|| format!("HTTP error from {url}"))?;

        let html = response
            .text()
            .with_context(|| format!("Failed to read response body from {url}"))?;

        debug!(action = "response", component = "http", bytes = html.len(), "Results page received");
        Ok(html)
    }
}
