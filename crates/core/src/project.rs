// crates/core/src/project.rs
//! Decoding of encoded project directory names.
//!
//! Claude encodes a project's filesystem path into its directory name under
//! `~/.claude/projects/` by replacing path separators with `-`, e.g.
//! `/Users/alice/proj` becomes `-Users-alice-proj`. The encoding is lossy: a
//! literal `-` inside a path segment is indistinguishable from a separator,
//! so `-Users-a-my-app` decodes to `/Users/a/my/app` even when the real
//! project is `my-app`. This is a best-effort reconstruction matching the
//! producer's observed behavior; do not try to disambiguate it here.

/// Project identity derived from an encoded directory name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedProject {
    /// Human-readable display name (last path segment).
    pub name: String,
    /// Reconstructed filesystem path, best effort.
    pub path: String,
}

/// Decode an encoded project directory name.
///
/// A leading `-` marks an absolute path: the name is split on `-`, the
/// display name is the last non-empty segment, and the path is the segments
/// after the first rejoined with `/` under a leading `/`. Names without a
/// leading `-` are used verbatim for both fields.
pub fn decode_project_dir(dir_name: &str) -> DecodedProject {
    if !dir_name.starts_with('-') {
        return DecodedProject {
            name: dir_name.to_string(),
            path: dir_name.to_string(),
        };
    }

    let parts: Vec<&str> = dir_name.split('-').collect();
    let name = parts
        .iter()
        .rev()
        .find(|p| !p.is_empty())
        .map(|p| p.to_string())
        .unwrap_or_else(|| dir_name.to_string());
    let path = if parts.len() > 1 {
        format!("/{}", parts[1..].join("/"))
    } else {
        dir_name.to_string()
    };

    DecodedProject { name, path }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_absolute_path() {
        let decoded = decode_project_dir("-Users-alice-proj");
        assert_eq!(decoded.name, "proj");
        assert_eq!(decoded.path, "/Users/alice/proj");
    }

    #[test]
    fn test_decode_plain_name() {
        let decoded = decode_project_dir("scratch");
        assert_eq!(decoded.name, "scratch");
        assert_eq!(decoded.path, "scratch");
    }

    #[test]
    fn test_decode_is_lossy_for_hyphenated_projects() {
        // Known ambiguity: a hyphen inside the project name reads as a
        // separator. The decode must reproduce that, not repair it.
        let decoded = decode_project_dir("-Users-a-my-app");
        assert_eq!(decoded.name, "app");
        assert_eq!(decoded.path, "/Users/a/my/app");
    }

    #[test]
    fn test_decode_bare_delimiter() {
        let decoded = decode_project_dir("-");
        // No non-empty segment: the name falls back to the raw directory name.
        assert_eq!(decoded.name, "-");
        assert_eq!(decoded.path, "/");
    }

    #[test]
    fn test_decode_trailing_delimiter() {
        let decoded = decode_project_dir("-Users-alice-");
        assert_eq!(decoded.name, "alice");
        assert_eq!(decoded.path, "/Users/alice/");
    }

    #[test]
    fn test_decode_empty_name() {
        let decoded = decode_project_dir("");
        assert_eq!(decoded.name, "");
        assert_eq!(decoded.path, "");
    }
}
