// crates/core/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scanning the projects directory.
///
/// Per-file problems never surface here: a corrupt or empty session log is
/// dropped from the report with a diagnostic, and the scan keeps going.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Cannot access projects directory: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Home directory not found")]
    HomeDirNotFound,
}

impl ScanError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Errors from the CLAUDE.md instructions document.
#[derive(Debug, Error)]
pub enum InstructionsError {
    #[error("No instruction provided")]
    EmptyInstruction,

    #[error("Permission denied accessing {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InstructionsError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_io_classification() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ScanError::io("/test/path", io_err);
        assert!(matches!(err, ScanError::PermissionDenied { .. }));

        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout");
        let err = ScanError::io("/test/path", io_err);
        assert!(matches!(err, ScanError::Io { .. }));
    }

    #[test]
    fn test_scan_error_display() {
        let err = ScanError::HomeDirNotFound;
        assert!(err.to_string().contains("Home directory"));
    }

    #[test]
    fn test_instructions_error_display() {
        let err = InstructionsError::EmptyInstruction;
        assert!(err.to_string().contains("No instruction"));
    }
}
