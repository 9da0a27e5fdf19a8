//! File-based settings.
//!
//! Every field is optional; an empty `{}` file reproduces the stock behavior.
//!
//! ```json
//! {
//!   "provider_order": ["bing", "yahoo"],
//!   "query_templates": { "first_last_phone": "{first} {last} realtor email" },
//!   "timeout_overrides": { "google": 20 },
//!   "debug_dump": "search_result_debug.html",
//!   "include_provider_column": true,
//!   "delay_between_providers_ms": 500
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SifterError};
use crate::input::{InputSchema, RowWindow};
use crate::provider::{DEFAULT_FALLBACK_ORDER, ProviderOrder, ProviderRegistry};
use crate::run::RunConfig;

/// Query template overrides per input schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryTemplates {
    pub name_phone: Option<String>,
    pub first_last_phone: Option<String>,
}

impl QueryTemplates {
    pub fn get(&self, schema: InputSchema) -> Option<&str> {
        match schema {
            InputSchema::NamePhone => self.name_phone.as_deref(),
            InputSchema::FirstLastPhone => self.first_last_phone.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SifterConfig {
    /// Fallback order; the chosen primary is still moved to the front.
    pub provider_order: Option<Vec<String>>,
    pub query_templates: QueryTemplates,
    /// Per-provider request timeout, in seconds.
    pub timeout_overrides: IndexMap<String, u64>,
    pub debug_dump: Option<PathBuf>,
    pub include_provider_column: bool,
    pub delay_between_providers_ms: u64,
}

impl SifterConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SifterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SifterConfig = serde_json::from_reader(BufReader::new(file))?;
        config.check()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: SifterConfig = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if let Some(id) = self
            .timeout_overrides
            .iter()
            .find_map(|(id, secs)| (*secs == 0).then_some(id))
        {
            return Err(SifterError::Config(format!(
                "Timeout override for '{}' must be at least one second",
                id
            )));
        }
        Ok(())
    }

    /// Built-in registry with timeout overrides applied.
    pub fn registry(&self) -> Result<ProviderRegistry> {
        ProviderRegistry::builtin().with_timeouts(
            self.timeout_overrides
                .iter()
                .map(|(id, secs)| (id.as_str(), Duration::from_secs(*secs))),
        )
    }

    /// Configured (or stock) fallback order with `primary` in front.
    pub fn provider_order(&self, primary: &str) -> ProviderOrder {
        match &self.provider_order {
            Some(ids) => ProviderOrder::new(ids.iter().map(|id| id.to_lowercase()), Some(primary)),
            None => ProviderOrder::new(DEFAULT_FALLBACK_ORDER.iter().copied(), Some(primary)),
        }
    }

    pub fn provider_delay(&self) -> Duration {
        Duration::from_millis(self.delay_between_providers_ms)
    }

    /// Run settings from this file; callers override fields from flags.
    pub fn run_config(
        &self,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        schema: InputSchema,
        window: RowWindow,
        primary: &str,
    ) -> Result<RunConfig> {
        let mut config = RunConfig::new(input, output);
        config.schema = schema;
        config.window = window;
        config.order = self.provider_order(primary);
        config.query_template = self.query_templates.get(schema).map(str::to_string);
        config.debug_dump = self.debug_dump.clone();
        config.include_provider = self.include_provider_column;
        config.provider_delay = self.provider_delay();
        config.registry = self.registry()?;
        Ok(config)
    }
}
