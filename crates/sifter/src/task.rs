//! Background enrichment runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use log::debug;

use crate::error::{Result, SifterError};
use crate::events::{ChannelSink, ProgressEvent};
use crate::fetch::Fetcher;
use crate::run::{CancelToken, RunConfig, RunSummary, run_batch};

/// Handle to a batch running on its own worker thread.
///
/// Progress arrives through [`EnrichmentTask::events`]; the caller owns
/// whatever it displays.
pub struct EnrichmentTask {
    events: Receiver<ProgressEvent>,
    cancel: CancelToken,
    handle: JoinHandle<Result<RunSummary>>,
}

impl EnrichmentTask {
    /// Start `config` on a new worker thread.
    pub fn spawn(config: RunConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let (sender, events) = mpsc::channel();
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();

        let handle = thread::spawn(move || {
            let mut sink = ChannelSink::new(sender);
            let result = run_batch(&config, fetcher, &mut sink, &worker_cancel);
            debug!("Enrichment worker finished (ok: {})", result.is_ok());
            result
        });

        Self {
            events,
            cancel,
            handle,
        }
    }

    pub fn events(&self) -> &Receiver<ProgressEvent> {
        &self.events
    }

    /// Drain events emitted so far without blocking.
    pub fn poll_events(&self) -> Vec<ProgressEvent> {
        self.events.try_iter().collect()
    }

    /// Ask the worker to stop before its next record.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker and return its result.
    pub fn join(self) -> Result<RunSummary> {
        self.handle.join().map_err(|_| SifterError::WorkerPanicked)?
    }
}

/// At most one run at a time.
#[derive(Debug, Clone, Default)]
pub struct RunGate {
    active: Arc<AtomicBool>,
}

impl RunGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate, or `None` when a run already holds it.
    pub fn try_acquire(&self) -> Option<RunGuard> {
        self.active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| RunGuard {
                active: Arc::clone(&self.active),
            })
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// Releases the [`RunGate`] on drop.
#[derive(Debug)]
pub struct RunGuard {
    active: Arc<AtomicBool>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }
}
