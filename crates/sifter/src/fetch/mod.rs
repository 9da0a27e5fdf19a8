//! Fetching provider result pages.
//!
//! A [`Fetcher`] performs exactly one request per call and classifies the
//! response into a [`FetchOutcome`]. Retrying, if any, is the caller's job.

mod http;
mod scripted;

use std::fmt;

use serde::Serialize;

use crate::provider::ProviderSpec;

pub use http::HttpFetcher;
pub use scripted::ScriptedFetcher;

/// Classified result of one provider request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// HTTP 200 with a usable body.
    Success(String),
    /// Any non-200 status.
    HttpError(u16),
    /// Connection, timeout or body-read failure.
    TransportError(String),
    /// HTTP 200 whose body is an anti-bot page.
    ChallengeDetected,
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    /// Body of a successful fetch.
    pub fn body(&self) -> Option<&str> {
        match self {
            FetchOutcome::Success(body) => Some(body),
            _ => None,
        }
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOutcome::Success(body) => write!(f, "ok ({} bytes)", body.len()),
            FetchOutcome::HttpError(status) => write!(f, "HTTP status {}", status),
            FetchOutcome::TransportError(cause) => write!(f, "request failed: {}", cause),
            FetchOutcome::ChallengeDetected => write!(f, "bot challenge page"),
        }
    }
}

/// Issues one request per (provider, query) pair.
///
/// Implementations must be thread-safe (Send + Sync) so a run can move to a
/// background worker.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, provider: &ProviderSpec, query: &str) -> FetchOutcome;

    /// Name of this fetcher (for logging/debugging).
    fn name(&self) -> &str;
}
