// crates/core/src/scanner.rs
//! The session state scanner.
//!
//! Each scan is a fresh, stateless walk of the projects directory: enumerate
//! project subdirectories, find their recently-modified `*.jsonl` session
//! logs, and classify each one from the last line of its transcript. No
//! index, no cache, no watcher — the cost of a scan is bounded by recent
//! activity, not total history, which is what makes sub-second polling cheap.
//!
//! Failure containment is per file: a corrupt, empty, or unreadable log is
//! dropped from the report with a diagnostic and the scan keeps going. A scan
//! itself never fails; the worst case is an empty report.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::Utc;
use tracing::{debug, warn};

use crate::project::{decode_project_dir, DecodedProject};
use crate::types::{
    ContentItem, LastTool, LogEntry, PendingApproval, PendingKind, ScanReport, SessionSnapshot,
    SessionState,
};

/// Files modified longer ago than this are not reported at all.
pub const ACTIVE_THRESHOLD: Duration = Duration::from_secs(600);

/// Files older than this (but still active) are `idle` regardless of content.
pub const IDLE_THRESHOLD: Duration = Duration::from_secs(300);

/// Sub-agent transcripts share the project directory but are not sessions.
const SUBAGENT_PREFIX: &str = "agent-";

/// The tool the assistant uses to ask the user an explicit question.
const ASK_USER_QUESTION_TOOL: &str = "AskUserQuestion";

/// How many tail lines the last-tool recovery scan may examine.
const LOOKBACK_LINES: usize = 10;

/// Character limits for the operator-facing summaries.
const PREVIEW_MAX: usize = 150;
const DESCRIPTION_MAX: usize = 100;

/// Scanner configuration. Thresholds are explicit so tests can tighten or
/// widen the windows without touching the clock.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub projects_dir: PathBuf,
    pub active_threshold: Duration,
    pub idle_threshold: Duration,
}

impl ScannerConfig {
    /// Config with the default 600 s / 300 s windows.
    pub fn new(projects_dir: impl Into<PathBuf>) -> Self {
        Self {
            projects_dir: projects_dir.into(),
            active_threshold: ACTIVE_THRESHOLD,
            idle_threshold: IDLE_THRESHOLD,
        }
    }
}

/// Stateless session scanner. Cheap to clone; holds only configuration.
#[derive(Debug, Clone)]
pub struct Scanner {
    config: ScannerConfig,
}

impl Scanner {
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Scan against the current wall clock.
    pub fn scan(&self) -> ScanReport {
        self.scan_at(SystemTime::now())
    }

    /// Scan with an explicit "now". Given a fixed filesystem and a fixed
    /// `now`, two calls produce identical reports apart from the report's
    /// own timestamp.
    pub fn scan_at(&self, now: SystemTime) -> ScanReport {
        let mut report = ScanReport::empty(Utc::now().to_rfc3339());

        let root = &self.config.projects_dir;
        if !root.exists() {
            debug!(path = %root.display(), "Projects directory does not exist");
            return report;
        }
        let dirs = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %root.display(), error = %e, "Cannot read projects directory");
                return report;
            }
        };

        for dir_entry in dirs.flatten() {
            let dir_path = dir_entry.path();
            if !dir_path.is_dir() {
                continue;
            }
            let dir_name = dir_entry.file_name().to_string_lossy().to_string();
            let project = decode_project_dir(&dir_name);

            let files = match fs::read_dir(&dir_path) {
                Ok(files) => files,
                Err(e) => {
                    debug!(path = %dir_path.display(), error = %e, "Cannot read project directory");
                    continue;
                }
            };

            for file_entry in files.flatten() {
                let path = file_entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
                    continue;
                }
                let file_name = file_entry.file_name().to_string_lossy().to_string();
                if file_name.starts_with(SUBAGENT_PREFIX) {
                    continue;
                }

                let mtime = match file_entry.metadata().and_then(|m| m.modified()) {
                    Ok(mtime) => mtime,
                    Err(e) => {
                        debug!(path = %path.display(), error = %e, "Cannot stat session file");
                        continue;
                    }
                };
                // A file touched "in the future" counts as age zero.
                let age_seconds = now.duration_since(mtime).unwrap_or_default().as_secs_f64();
                if age_seconds > self.config.active_threshold.as_secs_f64() {
                    continue;
                }

                let Some(snapshot) = self.classify(&path, &project, age_seconds) else {
                    continue;
                };

                if snapshot.state.is_waiting() {
                    report.waiting_count += 1;
                    if !report.projects_with_waiting.contains(&project.name) {
                        report.projects_with_waiting.push(project.name.clone());
                    }
                } else if snapshot.state == SessionState::Processing {
                    report.processing_count += 1;
                }
                // idle / task_complete / unknown raise no operator alert.
                report.active_sessions.push(snapshot);
            }
        }

        // Most recent first; ISO-8601 timestamps compare correctly as
        // strings. Missing timestamps sort as empty, i.e. last.
        report.active_sessions.sort_by(|a, b| {
            b.last_activity
                .as_deref()
                .unwrap_or("")
                .cmp(a.last_activity.as_deref().unwrap_or(""))
        });

        report
    }

    /// Classify one session log. `None` means the file is excluded from the
    /// report (empty or unparseable); the caller moves on.
    fn classify(
        &self,
        path: &Path,
        project: &DecodedProject,
        age_seconds: f64,
    ) -> Option<SessionSnapshot> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable session file");
                return None;
            }
        };
        let lines: Vec<&str> = text.lines().collect();
        let Some(last_line) = lines.last() else {
            debug!(path = %path.display(), "Skipping empty session file");
            return None;
        };

        // Only the last line drives the state; everything older is at most
        // used for last-tool recovery below.
        let entry: LogEntry = match serde_json::from_str(last_line.trim()) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping session file with malformed tail");
                return None;
            }
        };

        let session_id = entry.session_id.clone().unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default()
        });

        let mut state = SessionState::Unknown;
        let mut pending_approval = None;
        let mut last_tool = None;
        let mut last_message_preview = String::new();

        if age_seconds > self.config.idle_threshold.as_secs_f64() {
            // Idleness is a time-based override and always wins.
            state = SessionState::Idle;
        } else if entry.entry_type == "user" {
            // Newest event is user input the assistant has not answered yet.
            state = SessionState::Processing;
        } else if entry.entry_type == "assistant" {
            let mut has_question = false;
            for item in entry.content_items() {
                match item {
                    ContentItem::ToolUse { name, input } => {
                        let tool_name =
                            name.clone().unwrap_or_else(|| "Unknown".to_string());
                        if tool_name == ASK_USER_QUESTION_TOOL {
                            state = SessionState::WaitingForQuestion;
                            pending_approval = Some(PendingApproval {
                                kind: PendingKind::Question,
                                tool_name: tool_name.clone(),
                                description: question_description(input),
                            });
                        } else {
                            state = SessionState::WaitingForApproval;
                            pending_approval = Some(PendingApproval {
                                kind: PendingKind::ToolUse,
                                tool_name: tool_name.clone(),
                                description: tool_description(input),
                            });
                        }
                        last_tool = Some(LastTool {
                            name: tool_name,
                            timestamp: entry.timestamp.clone(),
                        });
                        // First tool_use decides; later items are never seen.
                        break;
                    }
                    ContentItem::Text { text } => {
                        last_message_preview = preview_of(text);
                        if text.trim().ends_with('?') {
                            has_question = true;
                        }
                    }
                    ContentItem::Other => {}
                }
            }
            if state == SessionState::Unknown {
                // No tool pending: a trailing question mark is an implicit
                // request for input, otherwise the assistant is done and
                // waiting for a fresh instruction.
                state = if has_question {
                    SessionState::WaitingForQuestion
                } else {
                    SessionState::TaskComplete
                };
            }
        }

        let model = entry.model().unwrap_or("unknown").to_string();

        if last_tool.is_none() {
            last_tool = recover_last_tool(&lines);
        }

        Some(SessionSnapshot {
            session_id,
            project_path: project.path.clone(),
            project_name: project.name.clone(),
            state,
            last_activity: entry.timestamp,
            idle_seconds: age_seconds as u64,
            model,
            last_tool,
            last_message_preview,
            pending_approval,
        })
    }
}

/// Walk up to the last [`LOOKBACK_LINES`] lines backwards and take the first
/// `tool_use` found in any assistant entry. Recovers "what did the assistant
/// last do" when the newest entry is a plain user message or text; it never
/// re-derives the state.
fn recover_last_tool(lines: &[&str]) -> Option<LastTool> {
    for line in lines.iter().rev().take(LOOKBACK_LINES) {
        let Ok(entry) = serde_json::from_str::<LogEntry>(line.trim()) else {
            continue;
        };
        if entry.entry_type != "assistant" {
            continue;
        }
        for item in entry.content_items() {
            if let ContentItem::ToolUse { name, .. } = item {
                return Some(LastTool {
                    name: name.clone().unwrap_or_else(|| "Unknown".to_string()),
                    timestamp: entry.timestamp.clone(),
                });
            }
        }
    }
    None
}

/// Char-safe truncation without ellipsis.
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}

/// Preview of an assistant text block: 150 chars plus a trailing ellipsis.
fn preview_of(text: &str) -> String {
    if text.chars().count() > PREVIEW_MAX {
        format!("{}...", text.chars().take(PREVIEW_MAX).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Descriptor body for an AskUserQuestion: the stringified `questions`
/// value, truncated. Absent questions render as an empty list.
fn question_description(input: &serde_json::Value) -> String {
    let questions = input
        .get("questions")
        .cloned()
        .unwrap_or_else(|| serde_json::Value::Array(Vec::new()));
    let rendered = serde_json::to_string(&questions).unwrap_or_default();
    truncate_chars(&rendered, DESCRIPTION_MAX)
}

/// Descriptor body for an ordinary tool_use: the tool's own `description`,
/// else the first 100 chars of its `command`, else empty.
fn tool_description(input: &serde_json::Value) -> String {
    if let Some(description) = input.get("description").and_then(|v| v.as_str()) {
        return description.to_string();
    }
    let command = input.get("command").and_then(|v| v.as_str()).unwrap_or("");
    truncate_chars(command, DESCRIPTION_MAX)
}
