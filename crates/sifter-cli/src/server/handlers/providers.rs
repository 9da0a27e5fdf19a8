//! Provider catalog handler.

use axum::Json;
use serde::Serialize;
use sifter::provider::{DEFAULT_FALLBACK_ORDER, DEFAULT_PRIMARY};
use sifter::ProviderRegistry;

/// One provider as shown in the UI.
#[derive(Serialize)]
pub struct ProviderInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub timeout_secs: u64,
    pub container: &'static str,
}

#[derive(Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderInfo>,
    pub default_primary: &'static str,
    pub default_order: Vec<&'static str>,
}

/// List the built-in providers and the stock fallback order.
pub async fn list_providers() -> Json<ProvidersResponse> {
    let providers = ProviderRegistry::builtin()
        .iter()
        .map(|spec| ProviderInfo {
            id: spec.id,
            label: spec.label,
            timeout_secs: spec.timeout.as_secs(),
            container: spec.rule.container,
        })
        .collect();

    Json(ProvidersResponse {
        providers,
        default_primary: DEFAULT_PRIMARY,
        default_order: DEFAULT_FALLBACK_ORDER.to_vec(),
    })
}
