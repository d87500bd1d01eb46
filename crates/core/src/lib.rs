// crates/core/src/lib.rs
//! Claude-pulse core library.
//!
//! Scans `~/.claude/projects/` and classifies what every active Claude Code
//! session is doing right now (idle, processing, waiting on the user, done)
//! from the tail of its JSONL transcript. Also owns the CLAUDE.md
//! instructions-document logic used by the server.

pub mod error;
pub mod instructions;
pub mod paths;
pub mod project;
pub mod scanner;
pub mod types;

pub use error::{InstructionsError, ScanError};
pub use instructions::{append_instruction, read_instructions, AppendOutcome, InstructionsDoc};
pub use paths::{claude_md_path, claude_projects_dir};
pub use project::{decode_project_dir, DecodedProject};
pub use scanner::{Scanner, ScannerConfig};
pub use types::{
    LastTool, PendingApproval, PendingKind, ScanReport, SessionSnapshot, SessionState,
};
