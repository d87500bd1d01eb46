// crates/core/src/instructions.rs
//! The global instructions document (`~/.claude/CLAUDE.md`).
//!
//! Operators can append a new instruction section from the dashboard. The
//! document is plain markdown owned by the user; we only ever read it or
//! append to it, and an instruction whose exact text is already present is
//! reported as a duplicate instead of being written twice.

use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::InstructionsError;

/// Current contents of the instructions document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionsDoc {
    pub exists: bool,
    pub path: PathBuf,
    pub content: String,
}

/// Result of an append attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The instruction was written.
    Added { path: PathBuf },
    /// The exact instruction text is already in the document; nothing written.
    Duplicate,
}

/// Read the instructions document. A missing file is not an error — it just
/// reads as empty with `exists: false`.
pub async fn read_instructions(path: &Path) -> Result<InstructionsDoc, InstructionsError> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(InstructionsDoc {
            exists: true,
            path: path.to_path_buf(),
            content,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(InstructionsDoc {
            exists: false,
            path: path.to_path_buf(),
            content: String::new(),
        }),
        Err(e) => Err(InstructionsError::io(path, e)),
    }
}

/// Append a dated instruction section to the document, creating it (and its
/// parent directory) if needed.
///
/// # Errors
/// `InstructionsError::EmptyInstruction` when the trimmed instruction body is
/// empty; IO errors otherwise.
pub async fn append_instruction(
    path: &Path,
    title: &str,
    instruction: &str,
) -> Result<AppendOutcome, InstructionsError> {
    let title = title.trim();
    let instruction = instruction.trim();
    if instruction.is_empty() {
        return Err(InstructionsError::EmptyInstruction);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| InstructionsError::io(parent, e))?;
    }

    let existing = read_instructions(path).await?;
    if existing.content.contains(instruction) {
        debug!(path = %path.display(), "Instruction already present, not appending");
        return Ok(AppendOutcome::Duplicate);
    }

    let date = Local::now().format("%Y-%m-%d");
    let entry = format!("\n\n## {title}\n*Added {date} via claude-pulse*\n\n{instruction}\n");

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| InstructionsError::io(path, e))?;
    file.write_all(entry.as_bytes())
        .await
        .map_err(|e| InstructionsError::io(path, e))?;

    Ok(AppendOutcome::Added {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn read_missing_file_is_empty_not_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("CLAUDE.md");

        let doc = read_instructions(&path).await.unwrap();
        assert!(!doc.exists);
        assert_eq!(doc.content, "");
    }

    #[tokio::test]
    async fn append_creates_file_with_dated_section() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".claude").join("CLAUDE.md");

        let outcome = append_instruction(&path, "Style", "Always use rustfmt.")
            .await
            .unwrap();
        assert!(matches!(outcome, AppendOutcome::Added { .. }));

        let doc = read_instructions(&path).await.unwrap();
        assert!(doc.exists);
        assert!(doc.content.contains("## Style"));
        assert!(doc.content.contains("Always use rustfmt."));
        assert!(doc.content.contains("via claude-pulse"));
    }

    #[tokio::test]
    async fn duplicate_instruction_is_not_written_twice() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("CLAUDE.md");

        append_instruction(&path, "A", "Prefer small PRs.").await.unwrap();
        let outcome = append_instruction(&path, "B", "Prefer small PRs.")
            .await
            .unwrap();
        assert_eq!(outcome, AppendOutcome::Duplicate);

        let doc = read_instructions(&path).await.unwrap();
        assert_eq!(doc.content.matches("Prefer small PRs.").count(), 1);
    }

    #[tokio::test]
    async fn empty_instruction_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("CLAUDE.md");

        let err = append_instruction(&path, "T", "   ").await.unwrap_err();
        assert!(matches!(err, InstructionsError::EmptyInstruction));
        assert!(!path.exists() || read_instructions(&path).await.unwrap().content.is_empty());
    }
}
