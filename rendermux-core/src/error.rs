//! Error types shared across the rendermux workspace.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for engine orchestration.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Bad or unusable configuration (paths, ports, directories).
    #[error("Configuration error: {0}")]
    Config(String),

    /// An external program could not be launched or exited abnormally.
    #[error("Process launch error: {program}: {message}")]
    ProcessLaunch {
        /// Program that failed.
        program: PathBuf,
        /// Failure description.
        message: String,
    },

    /// The OS could not create or expose a named pipe.
    #[error("Pipe error: {path}: {message}")]
    Pipe {
        /// Pipe path involved.
        path: PathBuf,
        /// Failure description.
        message: String,
    },

    /// No engine is both compatible with the resource and active.
    #[error("No compatible engine for renderer {renderer}")]
    IncompatibleRenderer {
        /// Renderer that the request targeted.
        renderer: String,
    },

    /// The media descriptor could not be produced or is unusable.
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Create a process launch error.
    pub fn launch(program: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ProcessLaunch {
            program: program.into(),
            message: message.into(),
        }
    }

    /// Create a pipe error.
    pub fn pipe(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Pipe {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether trying the next candidate engine makes sense.
    ///
    /// Incompatibility is soft; launch and pipe failures abort the request.
    #[must_use]
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::IncompatibleRenderer { .. })
    }
}

/// Result type alias using [`EngineError`].
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = EngineError::launch("/usr/bin/ffmpeg", "exit code 1");
        assert_eq!(
            err.to_string(),
            "Process launch error: /usr/bin/ffmpeg: exit code 1"
        );
    }

    #[test]
    fn test_soft_errors() {
        let soft = EngineError::IncompatibleRenderer { renderer: "PS3".into() };
        assert!(soft.is_soft());
        assert!(!EngineError::pipe("/tmp/p", "denied").is_soft());
    }
}
