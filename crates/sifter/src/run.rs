//! One enrichment batch: input → provider chain → output.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

use crate::enrich::Orchestrator;
use crate::error::Result;
use crate::events::{ProgressEvent, ProgressSink};
use crate::extract::Extractor;
use crate::fetch::Fetcher;
use crate::input::{InputSchema, RowWindow, SourceMetadata, TabularSource};
use crate::output::ResultSink;
use crate::provider::{ProviderOrder, ProviderRegistry};

/// Everything needed to run one batch.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub schema: InputSchema,
    pub window: RowWindow,
    pub order: ProviderOrder,
    /// Query template; `None` uses the schema's default.
    pub query_template: Option<String>,
    /// Where to dump each fetched page, if anywhere.
    pub debug_dump: Option<PathBuf>,
    pub include_provider: bool,
    pub provider_delay: Duration,
    pub registry: ProviderRegistry,
}

impl RunConfig {
    /// Config with the built-in registry and default order, window and schema.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            schema: InputSchema::default(),
            window: RowWindow::default(),
            order: ProviderOrder::default(),
            query_template: None,
            debug_dump: None,
            include_provider: false,
            provider_delay: Duration::ZERO,
            registry: ProviderRegistry::builtin().clone(),
        }
    }

    pub fn query_template(&self) -> &str {
        self.query_template
            .as_deref()
            .unwrap_or_else(|| self.schema.default_query_template())
    }

    fn orchestrator(&self, fetcher: Arc<dyn Fetcher>) -> Result<Orchestrator> {
        let mut extractor = Extractor::new(&self.registry)?;
        if let Some(path) = &self.debug_dump {
            extractor = extractor.with_debug_dump(path);
        }

        Ok(Orchestrator::new(
            fetcher,
            self.registry.clone(),
            self.order.clone(),
            self.query_template(),
        )?
        .with_extractor(extractor)
        .with_delay(self.provider_delay))
    }
}

/// Cooperative cancellation flag shared between a run and its controller.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Totals reported when a run ends.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub records_loaded: usize,
    pub records_processed: usize,
    pub emails_found: usize,
    pub cancelled: bool,
    pub output: PathBuf,
    pub source: SourceMetadata,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{} records, {} emails found. Results saved to {}",
            if self.cancelled { "Cancelled after" } else { "Processed" },
            self.records_processed,
            self.records_loaded,
            self.emails_found,
            self.output.display()
        )
    }
}

/// Run one batch to completion or cancellation.
///
/// Records are processed strictly in source order; each one is written
/// before the next starts. `cancel` is checked before every record.
pub fn run_batch(
    config: &RunConfig,
    fetcher: Arc<dyn Fetcher>,
    sink: &mut dyn ProgressSink,
    cancel: &CancelToken,
) -> Result<RunSummary> {
    let started_at = Utc::now();

    let source = TabularSource::new(config.schema, config.window);
    let (records, metadata) = source.load_with_metadata(&config.input)?;
    let orchestrator = config.orchestrator(fetcher)?;
    let mut output = ResultSink::open(&config.output, config.schema, config.include_provider)?;

    let total = records.len();
    info!(
        "Run started: {} records from {} using {}",
        total, metadata.file, config.order
    );
    sink.emit(ProgressEvent::RunStarted {
        total,
        providers: config.order.iter().map(str::to_string).collect(),
    });

    let mut processed = 0;
    let mut emails_found = 0;
    let mut cancelled = false;

    for (i, record) in records.iter().enumerate() {
        if cancel.is_cancelled() {
            cancelled = true;
            sink.log("Cancellation requested, stopping");
            break;
        }

        sink.emit(ProgressEvent::RecordStarted {
            position: i + 1,
            total,
            name: record.full_name().to_string(),
            phone: record.phone.clone(),
        });

        let enriched = orchestrator.enrich(record, sink);
        output.append(&enriched)?;

        processed += 1;
        if enriched.has_email() {
            emails_found += 1;
        }
        sink.emit(ProgressEvent::RecordFinished {
            position: i + 1,
            email: enriched.email,
            provider: enriched.provider_used,
        });
    }

    let summary = RunSummary {
        records_loaded: total,
        records_processed: processed,
        emails_found,
        cancelled,
        output: config.output.clone(),
        source: metadata,
        started_at,
        finished_at: Utc::now(),
    };
    info!("{}", summary);
    sink.emit(ProgressEvent::RunFinished(summary.clone()));

    Ok(summary)
}
