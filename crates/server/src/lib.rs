// crates/server/src/lib.rs
//! Claude-pulse server library.
//!
//! Axum HTTP layer over the session state scanner: a realtime monitoring
//! endpoint, CLAUDE.md instruction management, and terminal window focusing,
//! plus optional static file serving for the dashboard frontend.

pub mod error;
pub mod routes;
pub mod state;
pub mod terminal;

pub use error::{ApiError, ErrorResponse};
pub use routes::api_routes;
pub use state::AppState;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Create the Axum application with all routes and middleware.
pub fn create_app(state: Arc<AppState>) -> Router {
    create_app_with_static(state, None)
}

/// Create the app, optionally serving a static frontend directory as the
/// fallback for non-API paths.
pub fn create_app_with_static(state: Arc<AppState>, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new().merge(api_routes(state));
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(cors).layer(TraceLayer::new_for_http())
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;
    use tower::ServiceExt;

    /// App rooted at a temp directory; returns the temp dir so tests can
    /// populate the fake projects tree.
    fn test_app() -> (Router, TempDir) {
        let tmp = TempDir::new().unwrap();
        let state = AppState::with_paths(
            tmp.path().join("projects"),
            tmp.path().join("CLAUDE.md"),
        );
        (create_app(state), tmp)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        read_json(response).await
    }

    async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        read_json(response).await
    }

    async fn read_json(response: axum::response::Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
        };
        (status, json)
    }

    fn write_session(projects_dir: &Path, project: &str, file: &str, line: &str) {
        let dir = projects_dir.join(project);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), format!("{line}\n")).unwrap();
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (app, _tmp) = test_app();
        let (status, body) = get(app, "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["version"].is_string());
        assert!(body["uptime_secs"].is_number());
    }

    #[tokio::test]
    async fn test_realtime_with_missing_projects_dir() {
        let (app, _tmp) = test_app();
        let (status, body) = get(app, "/api/realtime").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["waiting_count"], 0);
        assert_eq!(body["processing_count"], 0);
        assert_eq!(body["active_sessions"], serde_json::json!([]));
        assert_eq!(body["projects_with_waiting"], serde_json::json!([]));
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_realtime_reports_waiting_session() {
        let (app, tmp) = test_app();
        write_session(
            &tmp.path().join("projects"),
            "-Users-alice-proj",
            "abc123.jsonl",
            r#"{"type":"assistant","message":{"content":[{"type":"tool_use","name":"Bash","input":{"command":"ls -la"}}]}}"#,
        );

        let (status, body) = get(app, "/api/realtime").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["waiting_count"], 1);
        assert_eq!(body["projects_with_waiting"], serde_json::json!(["proj"]));

        let session = &body["active_sessions"][0];
        assert_eq!(session["session_id"], "abc123");
        assert_eq!(session["project_name"], "proj");
        assert_eq!(session["project_path"], "/Users/alice/proj");
        assert_eq!(session["state"], "waiting_for_approval");
        assert_eq!(session["pending_approval"]["tool_name"], "Bash");
        assert_eq!(session["pending_approval"]["type"], "tool_use");
    }

    #[tokio::test]
    async fn test_claude_md_missing_reads_empty() {
        let (app, _tmp) = test_app();
        let (status, body) = get(app, "/api/claude-md").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["exists"], false);
        assert_eq!(body["content"], "");
    }

    #[tokio::test]
    async fn test_add_instruction_roundtrip() {
        let (app, _tmp) = test_app();

        let (status, body) = post_json(
            app.clone(),
            "/api/add-instruction",
            r#"{"title":"Testing","instruction":"Run tests before committing."}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        // Same instruction again: reported as duplicate, still a 200.
        let (status, body) = post_json(
            app.clone(),
            "/api/add-instruction",
            r#"{"title":"Other","instruction":"Run tests before committing."}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);

        let (_, body) = get(app, "/api/claude-md").await;
        assert_eq!(body["exists"], true);
        assert!(body["content"]
            .as_str()
            .unwrap()
            .contains("Run tests before committing."));
    }

    #[tokio::test]
    async fn test_add_instruction_rejects_empty_body() {
        let (app, _tmp) = test_app();
        let (status, body) = post_json(
            app,
            "/api/add-instruction",
            r#"{"title":"T","instruction":"   "}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No instruction provided");
    }

    #[cfg(not(target_os = "macos"))]
    #[tokio::test]
    async fn test_terminal_windows_unsupported_off_macos() {
        let (app, _tmp) = test_app();
        let (status, body) = get(app, "/api/terminal-windows").await;

        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert!(body["error"].as_str().unwrap().contains("macOS"));
    }

    #[cfg(not(target_os = "macos"))]
    #[tokio::test]
    async fn test_focus_terminal_unsupported_off_macos() {
        let (app, _tmp) = test_app();
        let (status, _body) = post_json(
            app,
            "/api/focus-terminal",
            r#"{"project_name":"proj"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_focus_terminal_requires_a_project() {
        let (app, _tmp) = test_app();
        let (status, body) = post_json(app, "/api/focus-terminal", r#"{}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No project specified");
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let (app, _tmp) = test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header("Origin", "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let allow_origin = response.headers().get("access-control-allow-origin");
        assert!(allow_origin.is_some());
        assert_eq!(allow_origin.unwrap(), "*");
    }

    #[tokio::test]
    async fn test_404_for_unknown_route() {
        let (app, _tmp) = test_app();
        let (status, _body) = get(app, "/api/nonexistent").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
