//! Scripted fetcher for tests and dry runs.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::provider::ProviderSpec;

use super::{FetchOutcome, Fetcher};

/// Fetcher that returns preset outcomes per provider id and records calls.
///
/// Providers without a scripted outcome fail with a transport error.
#[derive(Default)]
pub struct ScriptedFetcher {
    outcomes: HashMap<String, FetchOutcome>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcome returned for a provider.
    pub fn with_outcome(mut self, provider_id: impl Into<String>, outcome: FetchOutcome) -> Self {
        self.outcomes.insert(provider_id.into(), outcome);
        self
    }

    /// Script a successful fetch returning `body`.
    pub fn with_body(self, provider_id: impl Into<String>, body: impl Into<String>) -> Self {
        self.with_outcome(provider_id, FetchOutcome::Success(body.into()))
    }

    /// `(provider id, query)` pairs in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Provider ids in call order.
    pub fn called_providers(&self) -> Vec<String> {
        self.calls().into_iter().map(|(id, _)| id).collect()
    }
}

impl Fetcher for ScriptedFetcher {
    fn fetch(&self, provider: &ProviderSpec, query: &str) -> FetchOutcome {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((provider.id.to_string(), query.to_string()));
        }

        self.outcomes
            .get(provider.id)
            .cloned()
            .unwrap_or_else(|| FetchOutcome::TransportError("no scripted response".to_string()))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
