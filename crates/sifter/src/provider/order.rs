//! Provider fallback order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SifterError};
use super::registry::{DEFAULT_FALLBACK_ORDER, DEFAULT_PRIMARY, ProviderRegistry};

/// Sequence in which providers are attempted for each record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderOrder(Vec<String>);

impl ProviderOrder {
    /// Build an order from a base list with `primary` at the front.
    ///
    /// The primary is moved to the front when it is already listed and
    /// inserted there otherwise. Duplicate ids keep their first position.
    pub fn new<I, S>(base: I, primary: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<String> = Vec::new();
        if let Some(primary) = primary {
            ids.push(primary.to_string());
        }
        for id in base {
            let id = id.into();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self(ids)
    }

    /// The stock fallback list with the given primary in front.
    pub fn with_primary(primary: &str) -> Self {
        Self::new(DEFAULT_FALLBACK_ORDER.iter().copied(), Some(primary))
    }

    /// Parse a comma-separated list of ids (`"bing, yahoo"`).
    pub fn parse_list(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
            None,
        )
    }

    /// Fail on ids the registry does not know.
    pub fn validate(&self, registry: &ProviderRegistry) -> Result<()> {
        let unknown: Vec<&str> = self
            .0
            .iter()
            .map(String::as_str)
            .filter(|id| !registry.contains(id))
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(SifterError::Config(format!(
                "Unknown provider(s): {}. Known: {}",
                unknown.join(", "),
                registry.ids().collect::<Vec<_>>().join(", ")
            )))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|p| p == id)
    }

    pub fn primary(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }
}

impl Default for ProviderOrder {
    fn default() -> Self {
        Self::with_primary(DEFAULT_PRIMARY)
    }
}

impl fmt::Display for ProviderOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" → "))
    }
}
