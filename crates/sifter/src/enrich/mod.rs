//! Provider fallback for a single record.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::debug;
use serde::Serialize;

use crate::error::Result;
use crate::events::{AttemptOutcome, ProgressEvent, ProgressSink, ProviderAttempt};
use crate::extract::{ExtractionResult, Extractor};
use crate::fetch::{FetchOutcome, Fetcher};
use crate::input::{ContactRecord, InputSchema};
use crate::provider::{ProviderOrder, ProviderRegistry};

/// A contact plus whatever the provider chain found for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedRecord {
    pub contact: ContactRecord,
    pub email: String,
    pub source_link: String,
    /// Id of the provider that yielded the email; empty when none did.
    pub provider_used: String,
}

impl EnrichedRecord {
    /// Record for which no provider found an email.
    pub fn unmatched(contact: ContactRecord) -> Self {
        Self {
            contact,
            email: String::new(),
            source_link: String::new(),
            provider_used: String::new(),
        }
    }

    pub fn has_email(&self) -> bool {
        !self.email.is_empty()
    }

    /// Output row for `schema`, optionally followed by the provider id.
    pub fn to_row(&self, schema: InputSchema, include_provider: bool) -> Vec<&str> {
        let mut row = match schema {
            InputSchema::FirstLastPhone => vec![
                self.contact.first_name.as_str(),
                self.contact.last_name.as_str(),
                self.contact.phone.as_str(),
                self.contact.full_name(),
                self.email.as_str(),
                self.source_link.as_str(),
            ],
            InputSchema::NamePhone => vec![
                self.contact.full_name(),
                self.contact.phone.as_str(),
                self.email.as_str(),
                self.source_link.as_str(),
            ],
        };
        if include_provider {
            row.push(self.provider_used.as_str());
        }
        row
    }
}

/// Tries providers in order for each record until one yields an email.
pub struct Orchestrator {
    fetcher: Arc<dyn Fetcher>,
    extractor: Extractor,
    registry: ProviderRegistry,
    order: ProviderOrder,
    query_template: String,
    delay: Duration,
}

impl Orchestrator {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        registry: ProviderRegistry,
        order: ProviderOrder,
        query_template: impl Into<String>,
    ) -> Result<Self> {
        let extractor = Extractor::new(&registry)?;
        Ok(Self {
            fetcher,
            extractor,
            registry,
            order,
            query_template: query_template.into(),
            delay: Duration::ZERO,
        })
    }

    /// Replace the extractor, e.g. with one that writes a debug dump.
    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Pause between consecutive providers for the same record.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn order(&self) -> &ProviderOrder {
        &self.order
    }

    pub fn query_template(&self) -> &str {
        &self.query_template
    }

    /// Run the provider chain for one record.
    ///
    /// Provider failures are reported to `sink` and never abort the chain.
    pub fn enrich(&self, record: &ContactRecord, sink: &mut dyn ProgressSink) -> EnrichedRecord {
        let query = record.render_query(&self.query_template);
        debug!("Query for row {}: {}", record.row_index, query);

        for (position, provider_id) in self.order.iter().enumerate() {
            if position > 0 && !self.delay.is_zero() {
                thread::sleep(self.delay);
            }

            let (outcome, found) = self.attempt(provider_id, &query);
            if outcome.is_failure() {
                debug!("{} failed for row {}: {:?}", provider_id, record.row_index, outcome);
            }
            sink.emit(ProgressEvent::Attempt(ProviderAttempt::new(provider_id, outcome)));

            if let Some(found) = found {
                return EnrichedRecord {
                    contact: record.clone(),
                    email: found.email,
                    source_link: found.source_link,
                    provider_used: provider_id.to_string(),
                };
            }
        }

        EnrichedRecord::unmatched(record.clone())
    }

    fn attempt(
        &self,
        provider_id: &str,
        query: &str,
    ) -> (AttemptOutcome, Option<ExtractionResult>) {
        let Some(spec) = self.registry.get(provider_id) else {
            return (AttemptOutcome::UnknownProvider, None);
        };

        match self.fetcher.fetch(spec, query) {
            FetchOutcome::Success(body) => {
                let result = self.extractor.extract(&body, provider_id);
                if result.has_email() {
                    let outcome = AttemptOutcome::Found {
                        email: result.email.clone(),
                    };
                    (outcome, Some(result))
                } else {
                    (AttemptOutcome::NoEmail, None)
                }
            }
            FetchOutcome::HttpError(status) => (AttemptOutcome::HttpError { status }, None),
            FetchOutcome::TransportError(cause) => (AttemptOutcome::TransportError { cause }, None),
            FetchOutcome::ChallengeDetected => (AttemptOutcome::Challenge, None),
        }
    }
}
