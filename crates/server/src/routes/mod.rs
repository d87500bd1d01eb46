//! API route handlers for the claude-pulse server.

pub mod health;
pub mod instructions;
pub mod realtime;
pub mod terminal;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined API router with all routes under /api prefix.
///
/// Routes:
/// - GET  /api/health               - Health check
/// - GET  /api/realtime             - Scan all sessions and report their states
/// - GET  /api/claude-md            - Current CLAUDE.md content
/// - POST /api/add-instruction      - Append an instruction to CLAUDE.md
/// - GET  /api/terminal-windows     - List Terminal.app windows (macOS)
/// - POST /api/focus-terminal       - Focus a terminal by project name (macOS)
/// - POST /api/focus-terminal-by-id - Focus a terminal by stable window id (macOS)
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", realtime::router())
        .nest("/api", instructions::router())
        .nest("/api", terminal::router())
        .with_state(state)
}
