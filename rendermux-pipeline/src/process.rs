//! External process handles.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;

use rendermux_core::{EngineError, Result};
use rendermux_engine::TranscodeJob;
use tracing::{debug, info, warn};

use crate::pipe::PipeEndpoint;

/// Classification of an external program's exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitClass {
    /// Exit code 0.
    Success,
    /// Non-zero exit code.
    Failure(i32),
    /// Exit code 127 on 32-bit Linux: almost always a missing shared
    /// library rather than a media error.
    MissingSharedLibrary,
    /// Terminated by a signal (the platform reported no exit code).
    Signaled,
}

/// Classify an exit code, with the 32-bit Linux shared-library hint.
pub fn classify_exit_code(code: Option<i32>, linux_32bit: bool) -> ExitClass {
    match code {
        Some(0) => ExitClass::Success,
        Some(127) if linux_32bit => ExitClass::MissingSharedLibrary,
        Some(code) => ExitClass::Failure(code),
        None => ExitClass::Signaled,
    }
}

/// Classify an exit status for the running platform.
pub fn classify_exit(status: &ExitStatus) -> ExitClass {
    let linux_32bit = cfg!(all(target_os = "linux", target_pointer_width = "32"));
    classify_exit_code(status.code(), linux_32bit)
}

/// A running external program plus everything that must die with it.
///
/// Attached handles and pipes form the ownership tree of one pipeline:
/// stopping the terminal handle stops every producer and deletes every
/// pipe. Cancellation is destructive; there is no in-band signal to the
/// external programs.
pub struct ProcessHandle {
    label: String,
    program: PathBuf,
    child: Child,
    attached: Vec<ProcessHandle>,
    pipes: Vec<PipeEndpoint>,
    output: PathBuf,
    stopped: bool,
    stderr_tail: Arc<Mutex<String>>,
    drain: Option<thread::JoinHandle<()>>,
}

impl ProcessHandle {
    /// Spawn a program with an explicit argument vector.
    ///
    /// stdout/stdin are detached (media flows through pipes, not stdio);
    /// stderr is drained by a background thread that logs each line and
    /// keeps the most recent one for exit diagnostics. Without the drain a
    /// chatty child would block on a full stderr pipe mid-stream.
    pub fn spawn(
        label: impl Into<String>,
        program: &Path,
        args: &[String],
        output: PathBuf,
    ) -> Result<Self> {
        let label = label.into();
        info!(%label, program = %program.display(), ?args, "Starting process");
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| EngineError::launch(program, e.to_string()))?;

        let stderr_tail = Arc::new(Mutex::new(String::new()));
        let drain = child.stderr.take().map(|stderr| {
            let tail = Arc::clone(&stderr_tail);
            let label = label.clone();
            thread::spawn(move || {
                for line in BufReader::new(stderr).lines().map_while(|l| l.ok()) {
                    debug!(%label, %line, "Process stderr");
                    if let Ok(mut tail) = tail.lock() {
                        *tail = line;
                    }
                }
            })
        });

        Ok(Self {
            label,
            program: program.to_path_buf(),
            child,
            attached: Vec::new(),
            pipes: Vec::new(),
            output,
            stopped: false,
            stderr_tail,
            drain,
        })
    }

    /// Attach a dependent handle; stopping `self` also stops it.
    pub fn attach(&mut self, handle: ProcessHandle) {
        self.attached.push(handle);
    }

    /// Give this handle ownership of a pipe to delete on stop.
    pub fn adopt_pipe(&mut self, pipe: PipeEndpoint) {
        self.pipes.push(pipe);
    }

    /// The process label, for diagnostics.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The most recent stderr line the process produced.
    pub fn stderr_tail(&self) -> String {
        self.stderr_tail
            .lock()
            .map(|tail| tail.clone())
            .unwrap_or_default()
    }

    /// Wait for the process to exit and classify the result.
    pub fn wait_classified(&mut self) -> Result<ExitClass> {
        let status = self
            .child
            .wait()
            .map_err(|e| EngineError::launch(&self.program, e.to_string()))?;
        if let Some(drain) = self.drain.take() {
            let _ = drain.join();
        }
        let class = classify_exit(&status);
        if class != ExitClass::Success {
            warn!(
                label = %self.label,
                ?class,
                stderr = %self.stderr_tail(),
                "Process exited abnormally"
            );
        }
        Ok(class)
    }
}

impl TranscodeJob for ProcessHandle {
    fn output(&self) -> &Path {
        &self.output
    }

    fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        debug!(label = %self.label, "Stopping process tree");
        for attached in &mut self.attached {
            attached.stop();
        }
        if let Err(e) = self.child.kill() {
            warn!(label = %self.label, error = %e, "Failed to kill process");
        }
        let _ = self.child.wait();
        if let Some(drain) = self.drain.take() {
            let _ = drain.join();
        }
        for pipe in &mut self.pipes {
            pipe.delete();
        }
    }

    fn is_alive(&mut self) -> bool {
        !self.stopped && matches!(self.child.try_wait(), Ok(None))
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
