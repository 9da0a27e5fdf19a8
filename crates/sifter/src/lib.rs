//! Sifter: contact email enrichment through search provider fallback.
//!
//! Sifter reads contact rows (name and phone) from a spreadsheet or CSV file,
//! asks a chain of search providers about each contact, and appends the first
//! email found (plus the link it came from) to an output CSV.
//!
//! # Core Principles
//!
//! - **Ordered fallback**: Providers are tried in a fixed order, primary first
//! - **Data-driven providers**: Endpoint, headers and result selectors live in a table
//! - **Resumable output**: Each record is synced to disk before the next starts
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sifter::{CancelToken, HttpFetcher, LogSink, RunConfig, run_batch};
//!
//! let config = RunConfig::new("phone_data.xlsx", "phone_email_output.csv");
//! let fetcher = Arc::new(HttpFetcher::new().unwrap());
//! let summary = run_batch(&config, fetcher, &mut LogSink, &CancelToken::new()).unwrap();
//!
//! println!("Emails found: {}", summary.emails_found);
//! ```

pub mod config;
pub mod enrich;
pub mod error;
pub mod events;
pub mod extract;
pub mod fetch;
pub mod input;
pub mod output;
pub mod provider;
pub mod run;
pub mod task;

pub use config::SifterConfig;
pub use enrich::{EnrichedRecord, Orchestrator};
pub use error::{Result, SifterError};
pub use events::{
    AttemptOutcome, ChannelSink, CollectingSink, LogSink, NullSink, ProgressEvent, ProgressSink,
    ProviderAttempt,
};
pub use extract::{ExtractionResult, Extractor};
pub use fetch::{FetchOutcome, Fetcher, HttpFetcher, ScriptedFetcher};
pub use input::{ContactRecord, InputFormat, InputSchema, RowWindow, SourceMetadata, TabularSource};
pub use output::ResultSink;
pub use provider::{ProviderOrder, ProviderRegistry, ProviderSpec};
pub use run::{CancelToken, RunConfig, RunSummary, run_batch};
pub use task::{EnrichmentTask, RunGate, RunGuard};
