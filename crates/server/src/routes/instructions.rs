// crates/server/src/routes/instructions.rs
//! CLAUDE.md read/append endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use claude_pulse_core::{append_instruction, read_instructions, AppendOutcome};

use crate::error::ApiError;
use crate::state::AppState;

/// Response for GET /api/claude-md.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ClaudeMdResponse {
    pub exists: bool,
    pub path: String,
    pub content: String,
}

/// Request body for POST /api/add-instruction.
#[derive(Debug, Deserialize)]
pub struct AddInstructionRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub instruction: String,
}

/// Response for POST /api/add-instruction.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct AddInstructionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// GET /api/claude-md - Current content of the instructions document.
pub async fn get_claude_md(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClaudeMdResponse>, ApiError> {
    let doc = read_instructions(&state.claude_md_path).await?;
    Ok(Json(ClaudeMdResponse {
        exists: doc.exists,
        path: doc.path.display().to_string(),
        content: doc.content,
    }))
}

/// POST /api/add-instruction - Append an instruction section to CLAUDE.md.
///
/// A duplicate instruction reports `success: false` with a message but is
/// not an error; an empty instruction is a 400.
pub async fn add_instruction(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddInstructionRequest>,
) -> Result<Json<AddInstructionResponse>, ApiError> {
    let outcome =
        append_instruction(&state.claude_md_path, &request.title, &request.instruction).await?;
    let response = match outcome {
        AppendOutcome::Added { path } => AddInstructionResponse {
            success: true,
            message: format!("Instruction added to {}", path.display()),
            path: Some(path.display().to_string()),
        },
        AppendOutcome::Duplicate => AddInstructionResponse {
            success: false,
            message: "This instruction already exists in CLAUDE.md".to_string(),
            path: None,
        },
    };
    Ok(Json(response))
}

/// Create the instructions routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/claude-md", get(get_claude_md))
        .route("/add-instruction", post(add_instruction))
}
