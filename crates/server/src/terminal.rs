// crates/server/src/terminal.rs
//! Terminal window enumeration and focusing via AppleScript.
//!
//! Raising the right terminal window is how an operator jumps from a
//! "waiting for you" alert to the actual session. Everything here shells out
//! to `osascript`, so the real implementations are macOS-only; on other
//! platforms every operation reports `Unsupported` and the routes answer
//! with a clean JSON error.
//!
//! Window titles are matched against project names, and any operator-supplied
//! search term is sanitized before it is spliced into a script.

use std::path::Path;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::Serialize;
use thiserror::Error;

use claude_pulse_core::decode_project_dir;

/// One Terminal.app window with its stable id and best-effort project match.
#[derive(Debug, Clone, Serialize)]
pub struct TerminalWindow {
    pub window_id: i64,
    pub window_name: String,
    pub project_name: String,
    pub project_path: Option<String>,
    pub is_claude: bool,
}

/// Result of a focus attempt. Script-level failures (window gone, app not
/// running, timeout) are data, not errors — the caller turns `success:
/// false` into a 404 the way the original dashboard expects.
#[derive(Debug, Clone, Serialize)]
pub struct FocusOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FocusOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            terminal: None,
            window_name: None,
            window_id: None,
            project: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("Terminal focusing is only supported on macOS")]
    Unsupported,
}

/// Sanitize a string for safe interpolation into an AppleScript literal:
/// escape backslashes and quotes, then drop anything outside
/// alphanumerics, whitespace, hyphens, underscores, and dots.
pub fn sanitize_applescript(text: &str) -> String {
    static ALLOWED: OnceLock<Regex> = OnceLock::new();
    let re = ALLOWED.get_or_init(|| Regex::new(r"[^\w\s\-._]").expect("valid regex"));
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    re.replace_all(&escaped, "").into_owned()
}

/// Parse osascript's window-list output: comma-separated `id|||name` pairs.
/// Malformed items are skipped.
pub fn parse_window_list(output: &str) -> Vec<(i64, String)> {
    output
        .split(", ")
        .filter_map(|item| {
            let (id, name) = item.split_once("|||")?;
            let id = id.trim().parse::<i64>().ok()?;
            Some((id, name.trim().to_string()))
        })
        .collect()
}

/// Build a [`TerminalWindow`] from a raw window title, matching it against
/// the encoded project directories to recover a filesystem path.
pub fn window_from_title(window_id: i64, window_name: &str, projects_dir: &Path) -> TerminalWindow {
    let lower = window_name.to_lowercase();
    let is_claude = lower.contains("claude") || lower.contains("node");

    // Terminal.app titles look like "proj — claude — 120x40".
    let project_name = window_name
        .split(" \u{2014} ")
        .next()
        .unwrap_or(window_name)
        .trim()
        .to_string();

    TerminalWindow {
        window_id,
        window_name: window_name.to_string(),
        project_path: project_path_for(projects_dir, &project_name),
        project_name,
        is_claude,
    }
}

/// Best-effort map of a project display name to a decoded project path, by
/// substring match against the encoded directory names.
fn project_path_for(projects_dir: &Path, project_name: &str) -> Option<String> {
    if project_name.is_empty() {
        return None;
    }
    let needle = project_name.to_lowercase();
    let entries = std::fs::read_dir(projects_dir).ok()?;
    for entry in entries.flatten() {
        if !entry.path().is_dir() {
            continue;
        }
        let dir_name = entry.file_name().to_string_lossy().to_string();
        if dir_name.to_lowercase().contains(&needle) {
            // Only absolute-path encodings reconstruct to a real path.
            if dir_name.starts_with('-') {
                return Some(decode_project_dir(&dir_name).path);
            }
            return None;
        }
    }
    None
}

#[cfg(target_os = "macos")]
mod macos {
    use super::*;
    use std::time::Duration;
    use tokio::process::Command;
    use tracing::warn;

    const LIST_WINDOWS_SCRIPT: &str = r#"
tell application "System Events"
    if not (exists process "Terminal") then
        return ""
    end if
end tell

tell application "Terminal"
    set windowList to {}
    repeat with w in windows
        set windowId to id of w
        set windowName to name of w
        set end of windowList to (windowId as text) & "|||" & windowName
    end repeat
    return windowList
end tell
"#;

    async fn run_osascript(script: &str, timeout_secs: u64) -> Result<String, String> {
        let output = tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            Command::new("osascript").arg("-e").arg(script).output(),
        )
        .await
        .map_err(|_| "Timeout".to_string())?
        .map_err(|e| e.to_string())?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stdout.is_empty() && !stderr.is_empty() {
            return Err(stderr);
        }
        Ok(stdout)
    }

    pub async fn list_windows(projects_dir: &Path) -> Vec<TerminalWindow> {
        let output = match run_osascript(LIST_WINDOWS_SCRIPT, 5).await {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, "Failed to list terminal windows");
                return Vec::new();
            }
        };
        let mut windows: Vec<TerminalWindow> = parse_window_list(&output)
            .into_iter()
            .map(|(id, name)| window_from_title(id, &name, projects_dir))
            .collect();
        windows.sort_by_key(|w| w.window_id);
        windows
    }

    pub async fn focus_by_id(window_id: i64) -> FocusOutcome {
        // The Window menu path works even for fullscreen windows.
        let script = format!(
            r#"
set targetId to {window_id}
set targetName to ""

tell application "Terminal"
    try
        set targetName to name of window id targetId
    on error
        return "error:Window not found"
    end try
    activate
    delay 0.2
end tell

tell application "System Events"
    tell process "Terminal"
        click menu bar item "Window" of menu bar 1
        delay 0.1
        try
            click menu item targetName of menu "Window" of menu bar 1
        on error
            repeat with menuItem in menu items of menu "Window" of menu bar 1
                try
                    if name of menuItem contains targetName then
                        click menuItem
                        exit repeat
                    end if
                end try
            end repeat
        end try
    end tell
end tell

return targetName
"#
        );

        match run_osascript(&script, 10).await {
            Ok(output) if output.starts_with("error:") => {
                FocusOutcome::failed(output["error:".len()..].to_string())
            }
            Ok(output) if !output.is_empty() => FocusOutcome {
                success: true,
                terminal: Some("Terminal.app".to_string()),
                window_name: Some(output),
                window_id: Some(window_id),
                project: None,
                error: None,
            },
            Ok(_) => FocusOutcome::failed("Could not focus window"),
            Err(e) => FocusOutcome::failed(e),
        }
    }

    pub async fn focus_matching(search_term: &str) -> FocusOutcome {
        let outcome = try_iterm2(search_term).await;
        if outcome.success {
            return outcome;
        }
        let outcome = try_terminal_app(search_term).await;
        if outcome.success {
            return outcome;
        }
        FocusOutcome::failed(format!(
            "Could not find terminal window containing '{search_term}'"
        ))
    }

    async fn try_iterm2(search_term: &str) -> FocusOutcome {
        let safe = sanitize_applescript(search_term);
        let script = format!(
            r#"
tell application "System Events"
    if not (exists process "iTerm2") then
        return "not_running"
    end if
end tell

tell application "iTerm2"
    repeat with w in windows
        repeat with t in tabs of w
            repeat with s in sessions of t
                if name of s contains "{safe}" then
                    select t
                    select w
                    activate
                    return "found"
                end if
            end repeat
        end repeat
    end repeat
    return "not_found"
end tell
"#
        );
        search_outcome(&script, "iTerm2", search_term).await
    }

    async fn try_terminal_app(search_term: &str) -> FocusOutcome {
        let safe = sanitize_applescript(search_term);
        let script = format!(
            r#"
tell application "System Events"
    if not (exists process "Terminal") then
        return "not_running"
    end if
end tell

tell application "Terminal"
    repeat with w in windows
        if name of w contains "{safe}" then
            set index of w to 1
            activate
            return "found"
        end if
    end repeat
    return "not_found"
end tell
"#
        );
        search_outcome(&script, "Terminal.app", search_term).await
    }

    async fn search_outcome(script: &str, terminal: &str, search_term: &str) -> FocusOutcome {
        match run_osascript(script, 5).await {
            Ok(output) if output == "found" => FocusOutcome {
                success: true,
                terminal: Some(terminal.to_string()),
                window_name: None,
                window_id: None,
                project: Some(search_term.to_string()),
                error: None,
            },
            Ok(output) if output == "not_running" => {
                FocusOutcome::failed(format!("{terminal} not running"))
            }
            Ok(_) => FocusOutcome::failed(format!("Not found in {terminal}")),
            Err(e) => FocusOutcome::failed(e),
        }
    }
}

#[cfg(target_os = "macos")]
pub async fn list_windows(projects_dir: &Path) -> Result<Vec<TerminalWindow>, TerminalError> {
    Ok(macos::list_windows(projects_dir).await)
}

#[cfg(target_os = "macos")]
pub async fn focus_by_id(window_id: i64) -> Result<FocusOutcome, TerminalError> {
    Ok(macos::focus_by_id(window_id).await)
}

#[cfg(target_os = "macos")]
pub async fn focus_matching(search_term: &str) -> Result<FocusOutcome, TerminalError> {
    Ok(macos::focus_matching(search_term).await)
}

#[cfg(not(target_os = "macos"))]
pub async fn list_windows(_projects_dir: &Path) -> Result<Vec<TerminalWindow>, TerminalError> {
    Err(TerminalError::Unsupported)
}

#[cfg(not(target_os = "macos"))]
pub async fn focus_by_id(_window_id: i64) -> Result<FocusOutcome, TerminalError> {
    Err(TerminalError::Unsupported)
}

#[cfg(not(target_os = "macos"))]
pub async fn focus_matching(_search_term: &str) -> Result<FocusOutcome, TerminalError> {
    Err(TerminalError::Unsupported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_escapes_and_strips() {
        assert_eq!(sanitize_applescript("my-proj"), "my-proj");
        // Quotes and backslashes never survive into a script literal.
        assert_eq!(sanitize_applescript(r#"a"b"#), "ab");
        assert_eq!(sanitize_applescript("rm; echo $(pwd)"), "rm echo pwd");
        assert_eq!(sanitize_applescript(""), "");
    }

    #[test]
    fn test_parse_window_list() {
        let parsed = parse_window_list("101|||proj — claude, 205|||bash — 80x24");
        assert_eq!(
            parsed,
            vec![
                (101, "proj — claude".to_string()),
                (205, "bash — 80x24".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_window_list_skips_malformed_items() {
        let parsed = parse_window_list("garbage, abc|||name, 7|||ok");
        assert_eq!(parsed, vec![(7, "ok".to_string())]);
    }

    #[test]
    fn test_window_from_title_detects_claude() {
        let tmp = TempDir::new().unwrap();
        let w = window_from_title(3, "proj \u{2014} claude \u{2014} 120x40", tmp.path());
        assert!(w.is_claude);
        assert_eq!(w.project_name, "proj");
        assert!(w.project_path.is_none());

        let w = window_from_title(4, "bash", tmp.path());
        assert!(!w.is_claude);
        assert_eq!(w.project_name, "bash");
    }

    #[test]
    fn test_window_project_path_resolution() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("-Users-alice-proj")).unwrap();

        let w = window_from_title(1, "proj \u{2014} claude", tmp.path());
        assert_eq!(w.project_path.as_deref(), Some("/Users/alice/proj"));
    }
}
