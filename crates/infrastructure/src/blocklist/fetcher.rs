use sinkhole_domain::DomainError;
use std::time::Duration;

/// Shared HTTP client for list downloads.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sinkhole/", env!("CARGO_PKG_VERSION"), " (blocklist-sync)"))
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// GET `url`; any non-2xx status is an error.
    pub async fn fetch(&self, url: &str) -> Result<String, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("fetch error: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status().as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| format!("read error: {}", e))
    }
}
