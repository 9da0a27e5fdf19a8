//! Progress reporting for enrichment runs.
//!
//! The run driver never prints. It hands [`ProgressEvent`]s to a
//! [`ProgressSink`] supplied by the caller: the CLI colors them on the
//! console, the web shell buffers them, a background task forwards them over
//! a channel.

use std::fmt;
use std::sync::mpsc::Sender;

use log::{info, warn};
use serde::Serialize;

use crate::run::RunSummary;

/// Result of asking one provider about one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Found { email: String },
    NoEmail,
    HttpError { status: u16 },
    TransportError { cause: String },
    Challenge,
    UnknownProvider,
}

impl AttemptOutcome {
    /// Whether the provider failed, as opposed to answering without an email.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            AttemptOutcome::HttpError { .. }
                | AttemptOutcome::TransportError { .. }
                | AttemptOutcome::Challenge
                | AttemptOutcome::UnknownProvider
        )
    }
}

/// One provider attempt for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderAttempt {
    pub provider: String,
    pub outcome: AttemptOutcome,
}

impl ProviderAttempt {
    pub fn new(provider: impl Into<String>, outcome: AttemptOutcome) -> Self {
        Self {
            provider: provider.into(),
            outcome,
        }
    }
}

impl fmt::Display for ProviderAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            AttemptOutcome::Found { email } => write!(f, "{}: found {}", self.provider, email),
            AttemptOutcome::NoEmail => write!(f, "{}: no email found", self.provider),
            AttemptOutcome::HttpError { status } => {
                write!(f, "{}: HTTP status {}", self.provider, status)
            }
            AttemptOutcome::TransportError { cause } => {
                write!(f, "{}: request failed: {}", self.provider, cause)
            }
            AttemptOutcome::Challenge => write!(f, "{}: blocked by bot challenge", self.provider),
            AttemptOutcome::UnknownProvider => {
                write!(f, "{}: unknown provider, skipped", self.provider)
            }
        }
    }
}

/// Something worth telling a human about while a run is in progress.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    RunStarted {
        total: usize,
        providers: Vec<String>,
    },
    RecordStarted {
        /// 1-based position within the loaded records.
        position: usize,
        total: usize,
        name: String,
        phone: String,
    },
    Attempt(ProviderAttempt),
    RecordFinished {
        position: usize,
        email: String,
        provider: String,
    },
    Message {
        text: String,
    },
    RunFinished(RunSummary),
}

impl ProgressEvent {
    pub fn message(text: impl Into<String>) -> Self {
        ProgressEvent::Message { text: text.into() }
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::RunStarted { total, providers } => write!(
                f,
                "Processing {} records (providers: {})",
                total,
                providers.join(", ")
            ),
            ProgressEvent::RecordStarted {
                position,
                total,
                name,
                phone,
            } => write!(f, "[{}/{}] {} {}", position, total, name, phone),
            ProgressEvent::Attempt(attempt) => write!(f, "  {}", attempt),
            ProgressEvent::RecordFinished { email, provider, .. } => {
                if email.is_empty() {
                    write!(f, "  No email found")
                } else {
                    write!(f, "  Email: {} (via {})", email, provider)
                }
            }
            ProgressEvent::Message { text } => write!(f, "{}", text),
            ProgressEvent::RunFinished(summary) => write!(f, "{}", summary),
        }
    }
}

/// Receives progress events from a run.
pub trait ProgressSink {
    fn emit(&mut self, event: ProgressEvent);

    /// Free-form status line.
    fn log(&mut self, text: &str) {
        self.emit(ProgressEvent::message(text));
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&mut self, _event: ProgressEvent) {}
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn emit(&mut self, event: ProgressEvent) {
        match &event {
            ProgressEvent::Attempt(attempt) if attempt.outcome.is_failure() => warn!("{}", event),
            _ => info!("{}", event),
        }
    }
}

/// Sends events over a channel. A dropped receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<ProgressEvent>,
}

impl ChannelSink {
    pub fn new(sender: Sender<ProgressEvent>) -> Self {
        Self { sender }
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&mut self, event: ProgressEvent) {
        let _ = self.sender.send(event);
    }
}

/// Keeps every event; handy in tests.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub events: Vec<ProgressEvent>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider attempts in emission order.
    pub fn attempts(&self) -> Vec<&ProviderAttempt> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Attempt(attempt) => Some(attempt),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for CollectingSink {
    fn emit(&mut self, event: ProgressEvent) {
        self.events.push(event);
    }
}
