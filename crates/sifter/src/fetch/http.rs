//! Blocking HTTP fetcher.

use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};

use crate::error::{Result, SifterError};
use crate::provider::ProviderSpec;

use super::{FetchOutcome, Fetcher};

/// Fetches result pages over HTTP with each provider's headers and timeout.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| SifterError::HttpClient(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Build headers for one request; the User-Agent is resolved per call.
    fn build_headers(&self, provider: &ProviderSpec) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(provider.user_agent.pick()));
        for &(name, value) in provider.headers {
            match HeaderName::from_bytes(name.as_bytes()) {
                Ok(name) => {
                    headers.insert(name, HeaderValue::from_static(value));
                }
                Err(e) => debug!("Dropping header '{}' for {}: {}", name, provider.id, e),
            }
        }
        headers
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, provider: &ProviderSpec, query: &str) -> FetchOutcome {
        let url = provider.request_url(query);
        debug!("GET {} (timeout {:?})", url, provider.timeout);

        let response = match self
            .client
            .get(&url)
            .headers(self.build_headers(provider))
            .timeout(provider.timeout)
            .send()
        {
            Ok(response) => response,
            Err(e) => return FetchOutcome::TransportError(e.to_string()),
        };

        let status = response.status();
        if status != StatusCode::OK {
            return FetchOutcome::HttpError(status.as_u16());
        }

        match response.text() {
            Ok(body) if provider.is_challenge(&body) => FetchOutcome::ChallengeDetected,
            Ok(body) => FetchOutcome::Success(body),
            Err(e) => FetchOutcome::TransportError(e.to_string()),
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}
