// crates/server/src/state.rs
//! Application state for the Axum server.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use claude_pulse_core::{claude_md_path, claude_projects_dir, ScanError, Scanner, ScannerConfig};

/// Shared application state accessible from all route handlers.
///
/// Deliberately small: the scanner is stateless and every request re-reads
/// the filesystem, so there is nothing to cache or invalidate here.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Session state scanner over the projects directory.
    pub scanner: Scanner,
    /// Location of the global instructions document.
    pub claude_md_path: PathBuf,
}

impl AppState {
    /// State rooted at the real `~/.claude` layout.
    pub fn new() -> Result<Arc<Self>, ScanError> {
        let projects_dir = claude_projects_dir()?;
        let md_path = claude_md_path()?;
        Ok(Self::with_paths(projects_dir, md_path))
    }

    /// State with explicit paths — used by tests against temp directories.
    pub fn with_paths(projects_dir: PathBuf, claude_md_path: PathBuf) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            scanner: Scanner::new(ScannerConfig::new(projects_dir)),
            claude_md_path,
        })
    }

    /// Projects directory the scanner is rooted at.
    pub fn projects_dir(&self) -> &PathBuf {
        &self.scanner.config().projects_dir
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
