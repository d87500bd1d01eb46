// crates/server/src/main.rs
//! Claude-pulse server binary.
//!
//! Binds the HTTP server on localhost and serves the realtime session
//! monitoring API, plus the dashboard frontend when a static dir is present.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use claude_pulse_server::{create_app_with_static, AppState};
use tracing_subscriber::{fmt, EnvFilter};

/// Default port for the server.
const DEFAULT_PORT: u16 = 9347;

/// Get the server port from environment or use default.
fn get_port() -> u16 {
    std::env::var("CLAUDE_PULSE_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Get the static directory for serving frontend files.
///
/// Priority:
/// 1. STATIC_DIR environment variable (explicit override)
/// 2. ./dist directory (if it exists)
/// 3. None (API-only mode)
fn get_static_dir() -> Option<PathBuf> {
    std::env::var("STATIC_DIR")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            let dist = PathBuf::from("dist");
            dist.exists().then_some(dist)
        })
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .compact()
        .init();

    let state = AppState::new()?;
    let static_dir = get_static_dir();
    let serving_static = static_dir.is_some();
    let app = create_app_with_static(state.clone(), static_dir);

    let port = get_port();
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    eprintln!("\n\u{1f4e1} claude-pulse v{}\n", env!("CARGO_PKG_VERSION"));
    eprintln!("  Watching {}", state.projects_dir().display());
    if serving_static {
        eprintln!("  Serving dashboard from static dir");
    }
    eprintln!("  \u{2192} http://localhost:{}\n", port);

    axum::serve(listener, app).await?;

    Ok(())
}
