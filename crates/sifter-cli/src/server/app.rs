//! Axum application setup.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use super::state::AppState;
use crate::web::static_handler;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/providers", get(handlers::list_providers))
        .route("/runs", post(handlers::start_run))
        .route("/runs/current", get(handlers::current_run))
        .route("/runs/cancel", post(handlers::cancel_run));

    Router::new()
        .nest("/api", api_routes)
        .fallback(static_handler)
        .layer(cors)
        .with_state(state)
}

/// Start the web server.
pub async fn run_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));

    log::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use sifter::{ScriptedFetcher, SifterConfig};
    use tower::ServiceExt;

    const YAHOO_HIT: &str = r#"<div class="Sr"><a href="https://r.example/jane">Jane</a> jane@realty.com</div>"#;

    fn state() -> AppState {
        let fetcher = ScriptedFetcher::new().with_body("yahoo", YAHOO_HIT);
        AppState::new(SifterConfig::default(), Arc::new(fetcher))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_providers() {
        let app = create_router(state());
        let (status, body) = send(&app, get_request("/api/providers")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["providers"].as_array().unwrap().len(), 9);
        assert_eq!(body["default_primary"], "duckduckgo");
        assert_eq!(body["default_order"][0], "yahoo");
    }

    #[tokio::test]
    async fn test_index_is_served() {
        let app = create_router(state());
        let response = app.oneshot(get_request("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_cancel_without_run_is_not_found() {
        let app = create_router(state());
        let (status, body) = send(&app, post_json("/api/runs/cancel", json!({}))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_start_rejects_missing_input() {
        let app = create_router(state());
        let (status, body) = send(
            &app,
            post_json("/api/runs", json!({ "input": "/nonexistent/contacts.csv" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_start_rejects_unknown_engine() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("contacts.csv");
        std::fs::write(&input, "h,h,h\nJane,Doe,555\n").unwrap();

        let app = create_router(state());
        let (status, _) = send(
            &app,
            post_json("/api/runs", json!({ "input": input, "engine": "altavista" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_second_run_conflicts() {
        let state = state();
        let _held = state.gate.try_acquire().unwrap();
        let app = create_router(state);

        let (status, body) = send(&app, post_json("/api/runs", json!({ "input": "x.csv" }))).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "conflict");
    }

    #[tokio::test]
    async fn test_run_to_completion() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("contacts.csv");
        let output = dir.path().join("out.csv");
        std::fs::write(&input, "First,Last,Phone\nJane,Doe,555-0100\nJohn,Roe,555-0101\n").unwrap();

        let app = create_router(state());
        let (status, body) = send(
            &app,
            post_json(
                "/api/runs",
                json!({ "input": input, "output": output, "engine": "yahoo" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["running"], true);

        let mut current = Value::Null;
        for _ in 0..100 {
            let (_, body) = send(&app, get_request("/api/runs/current")).await;
            current = body;
            if current["running"] == false {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        assert_eq!(current["running"], false);
        assert_eq!(current["summary"]["records_processed"], 2);
        assert_eq!(current["summary"]["emails_found"], 2);
        assert!(!current["log"].as_array().unwrap().is_empty());

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written.lines().count(), 3);
    }
}
