//! Application state for the web server.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use sifter::{CancelToken, Fetcher, RunGate, RunSummary, SifterConfig};

/// Log lines kept for the UI.
pub const MAX_LOG_LINES: usize = 500;

/// What the UI shows about the current (or last) run.
#[derive(Debug, Default, Serialize)]
pub struct RunStatus {
    pub running: bool,
    pub log: VecDeque<String>,
    pub summary: Option<RunSummary>,
    pub error: Option<String>,
    #[serde(skip)]
    pub cancel: Option<CancelToken>,
}

impl RunStatus {
    /// Reset for a newly started run.
    pub fn start(&mut self, cancel: CancelToken) {
        self.running = true;
        self.log.clear();
        self.summary = None;
        self.error = None;
        self.cancel = Some(cancel);
    }

    pub fn push_line(&mut self, line: String) {
        if self.log.len() == MAX_LOG_LINES {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }

    /// Record the outcome of the run and mark it stopped.
    pub fn finish(&mut self, result: sifter::Result<RunSummary>) {
        self.running = false;
        self.cancel = None;
        match result {
            Ok(summary) => self.summary = Some(summary),
            Err(e) => {
                self.push_line(format!("Error: {}", e));
                self.error = Some(e.to_string());
            }
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Settings applied to every run started from the UI.
    pub settings: Arc<SifterConfig>,
    /// Fetcher shared by all runs.
    pub fetcher: Arc<dyn Fetcher>,
    /// Allows one run at a time.
    pub gate: RunGate,
    pub status: Arc<RwLock<RunStatus>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(settings: SifterConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            settings: Arc::new(settings),
            fetcher,
            gate: RunGate::new(),
            status: Arc::new(RwLock::new(RunStatus::default())),
        }
    }

    /// Request cancellation of the active run, if any.
    pub async fn cancel_active(&self) -> bool {
        let status = self.status.read().await;
        match (&status.cancel, status.running) {
            (Some(token), true) => {
                token.cancel();
                true
            }
            _ => false,
        }
    }
}
