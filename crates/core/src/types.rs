// crates/core/src/types.rs
//! Wire types for Claude Code JSONL transcripts and the derived scan report.
//!
//! The JSONL side is deliberately loose: every field an external writer
//! controls is optional or defaulted, and unrecognized entry/content kinds
//! land in catch-all arms. A session log should never be able to make
//! deserialization of a *recognized* shape fail.

use serde::{Deserialize, Serialize};

// ============================================================================
// JSONL Parsing Types (internal, for deserializing Claude Code format)
// ============================================================================

/// One line of a session transcript.
///
/// `entry_type` is free-form; only `"user"` and `"assistant"` carry meaning
/// for classification, everything else is opaque but still contributes its
/// `sessionId` / `timestamp` fields.
#[derive(Debug, Clone, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "type", default)]
    pub entry_type: String,
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub message: Option<LogMessage>,
}

impl LogEntry {
    /// Content items of the nested message, empty when the message is absent
    /// or its content is not a block list.
    pub fn content_items(&self) -> &[ContentItem] {
        self.message
            .as_ref()
            .map(|m| m.content.items())
            .unwrap_or(&[])
    }

    /// Model identifier of the nested message, if any.
    pub fn model(&self) -> Option<&str> {
        self.message.as_ref().and_then(|m| m.model.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogMessage {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub content: MessageContent,
}

/// Message content is either a plain string (early user entries) or a list
/// of content blocks. Anything else is kept opaque rather than failing the
/// whole line.
#[derive(Debug, Clone)]
pub enum MessageContent {
    Text(String),
    Items(Vec<ContentItem>),
    Other(serde_json::Value),
}

// Manual impl rather than `#[serde(untagged)]`: tolerance must be
// per-element. A stray non-object in a block list turns into
// `ContentItem::Other` instead of failing the whole list, so a real
// `tool_use` next to it is still seen.
impl<'de> Deserialize<'de> for MessageContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(text) => Self::Text(text),
            serde_json::Value::Array(items) => Self::Items(
                items
                    .into_iter()
                    .map(|item| serde_json::from_value(item).unwrap_or(ContentItem::Other))
                    .collect(),
            ),
            other => Self::Other(other),
        })
    }
}

impl Default for MessageContent {
    fn default() -> Self {
        Self::Items(Vec::new())
    }
}

impl MessageContent {
    pub fn items(&self) -> &[ContentItem] {
        match self {
            Self::Items(items) => items,
            _ => &[],
        }
    }
}

/// Tagged union of assistant content blocks. Unrecognized tags fall into
/// `Other` and are skipped by the classifier.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    Text {
        #[serde(default)]
        text: String,
    },
    ToolUse {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        input: serde_json::Value,
    },
    #[serde(other)]
    Other,
}

// ============================================================================
// Derived Report Types (the scanner's output)
// ============================================================================

/// Current operational state of a session, derived from the newest log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Processing,
    WaitingForQuestion,
    WaitingForApproval,
    TaskComplete,
    Unknown,
}

impl SessionState {
    /// Waiting states are the ones worth an operator alert.
    pub fn is_waiting(self) -> bool {
        matches!(self, Self::WaitingForQuestion | Self::WaitingForApproval)
    }
}

/// What kind of input the assistant is blocked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingKind {
    Question,
    ToolUse,
}

/// Summary of what the assistant is blocked on, shown to the operator
/// without opening the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingApproval {
    #[serde(rename = "type")]
    pub kind: PendingKind,
    pub tool_name: String,
    pub description: String,
}

/// Most recent tool invocation observed in the log tail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastTool {
    pub name: String,
    pub timestamp: Option<String>,
}

/// One session's state as of this scan. Recomputed fresh every call,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub project_path: String,
    pub project_name: String,
    pub state: SessionState,
    pub last_activity: Option<String>,
    pub idle_seconds: u64,
    pub model: String,
    pub last_tool: Option<LastTool>,
    pub last_message_preview: String,
    pub pending_approval: Option<PendingApproval>,
}

/// Aggregate result of one scan over the projects directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub timestamp: String,
    pub active_sessions: Vec<SessionSnapshot>,
    pub waiting_count: usize,
    pub processing_count: usize,
    pub projects_with_waiting: Vec<String>,
}

impl ScanReport {
    /// An empty report stamped with the given timestamp. Used when the
    /// projects directory does not exist.
    pub fn empty(timestamp: String) -> Self {
        Self {
            timestamp,
            active_sessions: Vec::new(),
            waiting_count: 0,
            processing_count: 0,
            projects_with_waiting: Vec::new(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
