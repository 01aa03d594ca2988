//! Named pipe endpoints.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use rendermux_core::{EngineError, Result};
use tracing::{debug, warn};

/// Poll interval while waiting for a pipe to appear.
const READINESS_POLL: Duration = Duration::from_millis(10);

/// Generate a collision-free pipe name for an engine.
///
/// The name embeds the calling thread's id and the epoch milliseconds, so
/// two requests started within the same millisecond on different threads
/// never collide on the same host. An optional suffix distinguishes
/// auxiliary (audio/mux) pipes of the same request.
pub fn pipe_name(engine: &str, suffix: Option<&str>) -> String {
    let mut hasher = DefaultHasher::new();
    std::thread::current().id().hash(&mut hasher);
    let thread = hasher.finish();
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    match suffix {
        Some(suffix) => format!("{engine}_{thread}_{millis}_{suffix}"),
        None => format!("{engine}_{thread}_{millis}"),
    }
}

/// A named OS pipe with create/delete lifecycle.
///
/// Created before its producer starts and consumed by exactly one
/// downstream process. Deletion is best-effort: a pipe that was never
/// created on disk must not fail the request when cleaned up.
#[derive(Debug)]
pub struct PipeEndpoint {
    path: PathBuf,
    created: bool,
}

impl PipeEndpoint {
    /// Create the FIFO on disk and wait until it is visible.
    ///
    /// Creation runs the configured mkfifo helper synchronously, then polls
    /// for existence within the bounded wait; exceeding the wait is a
    /// pipe error, not a hang.
    pub fn create(path: PathBuf, mkfifo: &Path, wait: Duration) -> Result<Self> {
        debug!(path = %path.display(), "Creating named pipe");
        let status = Command::new(mkfifo)
            .arg("--mode=777")
            .arg(&path)
            .status()
            .map_err(|e| EngineError::pipe(&path, format!("mkfifo failed to start: {e}")))?;
        if !status.success() {
            return Err(EngineError::pipe(&path, format!("mkfifo exited with {status}")));
        }

        let deadline = Instant::now() + wait;
        while !path.exists() {
            if Instant::now() >= deadline {
                return Err(EngineError::pipe(&path, "pipe did not appear within the startup wait"));
            }
            std::thread::sleep(READINESS_POLL);
        }
        Ok(Self { path, created: true })
    }

    /// Wrap an existing path without creating anything (for teardown of
    /// pipes another process created).
    pub fn adopt(path: PathBuf) -> Self {
        Self { path, created: true }
    }

    /// The pipe's filesystem path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the FIFO, best-effort.
    pub fn delete(&mut self) {
        if !self.created {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "Failed to delete pipe");
        }
        self.created = false;
    }
}

impl Drop for PipeEndpoint {
    fn drop(&mut self) {
        self.delete();
    }
}
