//! Built-in catalog of search providers.

use std::time::Duration;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::error::{Result, SifterError};
use super::spec::{ProviderSpec, ResultRule, UserAgent};

/// Desktop Chrome, sent by every provider without a rotating pool.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const GOOGLE_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
];

// Accept-Encoding is left to the HTTP client so responses are decoded.
const BROWSER_HEADERS: &[(&str, &str)] = &[
    ("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
    ("Accept-Language", "en-US,en;q=0.5"),
    ("DNT", "1"),
    ("Connection", "keep-alive"),
    ("Upgrade-Insecure-Requests", "1"),
];

const GOOGLE_HEADERS: &[(&str, &str)] = &[
    ("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
    ("Accept-Language", "en-US,en;q=0.5"),
    ("DNT", "1"),
    ("Connection", "keep-alive"),
    ("Upgrade-Insecure-Requests", "1"),
    ("Sec-Fetch-Dest", "document"),
    ("Sec-Fetch-Mode", "navigate"),
    ("Sec-Fetch-Site", "none"),
    ("Cache-Control", "max-age=0"),
];

const GOOGLE_CHALLENGE: &[&str] = &["Please click here if you are not redirected"];

/// Provider ids tried when no order is configured, most reliable first.
pub const DEFAULT_FALLBACK_ORDER: &[&str] = &["yahoo", "searx", "startpage", "ask", "yandex"];

/// Provider used as primary when none is chosen.
pub const DEFAULT_PRIMARY: &str = "duckduckgo";

const fn standard(
    id: &'static str,
    label: &'static str,
    endpoint: &'static str,
    rule: ResultRule,
) -> ProviderSpec {
    ProviderSpec {
        id,
        label,
        endpoint,
        headers: BROWSER_HEADERS,
        user_agent: UserAgent::Fixed(DEFAULT_USER_AGENT),
        timeout: Duration::from_secs(10),
        challenge_markers: &[],
        rule,
    }
}

static BUILTIN: Lazy<ProviderRegistry> = Lazy::new(|| {
    ProviderRegistry::from_specs([
        standard(
            "duckduckgo",
            "DuckDuckGo",
            "https://html.duckduckgo.com/html/?q={query}",
            ResultRule::new("div.result", "a.result__a"),
        ),
        standard(
            "bing",
            "Bing",
            "https://www.bing.com/search?q={query}",
            ResultRule::new("li.b_algo", "h2 a"),
        ),
        ProviderSpec {
            id: "google",
            label: "Google",
            endpoint: "https://www.google.com/search?q={query}&num=10",
            headers: GOOGLE_HEADERS,
            user_agent: UserAgent::Rotating(GOOGLE_USER_AGENTS),
            timeout: Duration::from_secs(15),
            challenge_markers: GOOGLE_CHALLENGE,
            rule: ResultRule::new("div.g", "a[href]"),
        },
        standard(
            "yahoo",
            "Yahoo",
            "https://search.yahoo.com/search?p={query}",
            ResultRule::new("div.Sr", "a[href]"),
        ),
        standard(
            "ask",
            "Ask.com",
            "https://www.ask.com/web?q={query}",
            ResultRule::new("div.PartialSearchResults-item", "a[href]"),
        ),
        standard(
            "yandex",
            "Yandex",
            "https://yandex.com/search/?text={query}",
            ResultRule::new("li.serp-item", "a[href]"),
        ),
        standard(
            "ecosia",
            "Ecosia",
            "https://www.ecosia.org/search?q={query}",
            ResultRule::new("article.result", "a[href]"),
        ),
        standard(
            "startpage",
            "Startpage",
            "https://www.startpage.com/sp/search?query={query}",
            ResultRule::new("div.w-gl__result", "a[href]"),
        ),
        standard(
            "searx",
            "Searx",
            "https://searx.be/search?q={query}",
            ResultRule::new("div.result", "a[href]"),
        ),
    ])
});

/// Read-only table of providers keyed by id, in registration order.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: IndexMap<&'static str, ProviderSpec>,
}

impl ProviderRegistry {
    /// The built-in catalog.
    pub fn builtin() -> &'static ProviderRegistry {
        &BUILTIN
    }

    pub fn from_specs(specs: impl IntoIterator<Item = ProviderSpec>) -> Self {
        let providers = specs.into_iter().map(|spec| (spec.id, spec)).collect();
        Self { providers }
    }

    pub fn get(&self, id: &str) -> Option<&ProviderSpec> {
        self.providers.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.providers.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.providers.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderSpec> {
        self.providers.values()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Copy of this registry with per-provider timeouts replaced.
    pub fn with_timeouts<'a>(
        &self,
        overrides: impl IntoIterator<Item = (&'a str, Duration)>,
    ) -> Result<Self> {
        let mut registry = self.clone();
        for (id, timeout) in overrides {
            let spec = registry.providers.get_mut(id).ok_or_else(|| {
                SifterError::Config(format!("Timeout override for unknown provider '{}'", id))
            })?;
            spec.timeout = timeout;
        }
        Ok(registry)
    }
}
