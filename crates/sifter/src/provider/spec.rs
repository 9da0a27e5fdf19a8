//! Provider descriptors.

use std::time::Duration;

use serde::Serialize;

/// How a provider's result page is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultRule {
    /// CSS selector for one result container (e.g. `li.b_algo`).
    pub container: &'static str,
    /// CSS selector, evaluated inside a container, for the result's primary
    /// link. The first match's `href` is used.
    pub link: &'static str,
}

impl ResultRule {
    pub const fn new(container: &'static str, link: &'static str) -> Self {
        Self { container, link }
    }
}

/// User-Agent policy of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAgent {
    /// Same value on every request.
    Fixed(&'static str),
    /// Picked uniformly at random from the pool on every request.
    Rotating(&'static [&'static str]),
}

impl UserAgent {
    /// Resolve the value to send for one request.
    pub fn pick(&self) -> &'static str {
        match self {
            UserAgent::Fixed(ua) => ua,
            UserAgent::Rotating(pool) => pool[fastrand::usize(..pool.len())],
        }
    }
}

/// One search provider.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSpec {
    /// Stable lowercase identifier (`"duckduckgo"`, `"bing"`, ...).
    pub id: &'static str,
    /// Human-readable name.
    pub label: &'static str,
    /// URL template; `{query}` is replaced by the percent-encoded query.
    pub endpoint: &'static str,
    /// Request headers sent besides the User-Agent.
    pub headers: &'static [(&'static str, &'static str)],
    pub user_agent: UserAgent,
    /// Per-request timeout.
    #[serde(serialize_with = "serialize_secs")]
    pub timeout: Duration,
    /// Body substrings that mark an anti-bot page.
    pub challenge_markers: &'static [&'static str],
    pub rule: ResultRule,
}

impl ProviderSpec {
    /// Build the request URL for a query.
    pub fn request_url(&self, query: &str) -> String {
        self.endpoint.replace("{query}", &urlencoding::encode(query))
    }

    /// True when the body carries one of this provider's challenge markers.
    pub fn is_challenge(&self, body: &str) -> bool {
        self.challenge_markers.iter().any(|m| body.contains(m))
    }
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_secs())
}
