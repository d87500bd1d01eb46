// crates/core/src/paths.rs
//! Centralized path functions for the Claude home directory layout.

use crate::error::ScanError;
use std::path::PathBuf;

/// Claude projects root: `~/.claude/projects`.
///
/// # Errors
/// Returns `ScanError::HomeDirNotFound` if the home directory cannot be
/// determined.
pub fn claude_projects_dir() -> Result<PathBuf, ScanError> {
    let home = dirs::home_dir().ok_or(ScanError::HomeDirNotFound)?;
    Ok(home.join(".claude").join("projects"))
}

/// Global instructions document: `~/.claude/CLAUDE.md`.
pub fn claude_md_path() -> Result<PathBuf, ScanError> {
    let home = dirs::home_dir().ok_or(ScanError::HomeDirNotFound)?;
    Ok(home.join(".claude").join("CLAUDE.md"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claude_projects_dir() {
        let dir = claude_projects_dir().unwrap();
        assert!(dir.ends_with(".claude/projects"));
    }

    #[test]
    fn test_claude_md_path() {
        let path = claude_md_path().unwrap();
        assert!(path.ends_with(".claude/CLAUDE.md"));
    }
}
