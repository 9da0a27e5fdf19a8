//! Run lifecycle handlers: start, status, cancel.

use std::path::PathBuf;

use axum::{Json, extract::State, http::StatusCode};
use log::info;
use serde::{Deserialize, Serialize};
use sifter::{EnrichmentTask, InputFormat, InputSchema, RowWindow, RunSummary};

use crate::server::error::ApiError;
use crate::server::state::AppState;

fn default_start_index() -> usize {
    1
}

fn default_output() -> PathBuf {
    PathBuf::from("phone_email_output.csv")
}

fn default_engine() -> String {
    sifter::provider::DEFAULT_PRIMARY.to_string()
}

/// Request body for starting a run.
#[derive(Debug, Deserialize)]
pub struct StartRunRequest {
    pub input: PathBuf,
    #[serde(default = "default_start_index")]
    pub start_index: usize,
    #[serde(default)]
    pub end_index: Option<usize>,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_engine")]
    pub engine: String,
    #[serde(default)]
    pub schema: InputSchema,
}

/// Snapshot of the run status.
#[derive(Debug, Serialize)]
pub struct RunStatusResponse {
    pub running: bool,
    pub log: Vec<String>,
    pub summary: Option<RunSummary>,
    pub error: Option<String>,
}

/// Start a run on a background worker.
pub async fn start_run(
    State(state): State<AppState>,
    Json(request): Json<StartRunRequest>,
) -> Result<(StatusCode, Json<RunStatusResponse>), ApiError> {
    let guard = state
        .gate
        .try_acquire()
        .ok_or_else(|| ApiError::Conflict("A run is already in progress".to_string()))?;

    if !request.input.exists() {
        return Err(ApiError::BadRequest(format!(
            "Input file '{}' not found",
            request.input.display()
        )));
    }
    InputFormat::from_path(&request.input).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let engine = request.engine.trim().to_lowercase();
    if !sifter::ProviderRegistry::builtin().contains(&engine) {
        return Err(ApiError::BadRequest(format!("Unknown engine: {}", request.engine)));
    }

    let config = state.settings.run_config(
        request.input.clone(),
        request.output.clone(),
        request.schema,
        RowWindow::new(request.start_index, request.end_index),
        &engine,
    )?;

    info!(
        "Starting run on {} (engine {}, schema {})",
        request.input.display(),
        engine,
        request.schema
    );
    let task = EnrichmentTask::spawn(config, state.fetcher.clone());

    let snapshot = {
        let mut status = state.status.write().await;
        status.start(task.cancel_token());
        snapshot(&status)
    };

    let status = state.status.clone();
    tokio::task::spawn_blocking(move || {
        for event in task.events().iter() {
            status.blocking_write().push_line(event.to_string());
        }
        let result = task.join();
        status.blocking_write().finish(result);
        drop(guard);
    });

    Ok((StatusCode::ACCEPTED, Json(snapshot)))
}

/// Status of the current or last run.
pub async fn current_run(State(state): State<AppState>) -> Json<RunStatusResponse> {
    let status = state.status.read().await;
    Json(snapshot(&status))
}

/// Ask the active run to stop after its current record.
pub async fn cancel_run(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<RunStatusResponse>), ApiError> {
    if !state.cancel_active().await {
        return Err(ApiError::NotFound("No run in progress".to_string()));
    }

    let mut status = state.status.write().await;
    status.push_line("Cancellation requested".to_string());
    Ok((StatusCode::ACCEPTED, Json(snapshot(&status))))
}

fn snapshot(status: &crate::server::state::RunStatus) -> RunStatusResponse {
    RunStatusResponse {
        running: status.running,
        log: status.log.iter().cloned().collect(),
        summary: status.summary.clone(),
        error: status.error.clone(),
    }
}
