//! Pipeline plans and their execution.
//!
//! Engines describe the pipeline they want as data first: the pipes to
//! create, an optional mux script, and the processes to start. Planning is
//! pure, so command synthesis and topology can be asserted in tests;
//! [`execute`] then performs the side effects in a fixed order. Pipe
//! creation and mux-script writing happen synchronously before any process
//! starts; processes start in plan order with the terminal process last.
//! On any failure everything already started is torn down before the error
//! is returned.

use std::path::PathBuf;

use rendermux_core::{Result, TranscodeConfig};
use tracing::{debug, info};

use crate::muxscript::MuxScript;
use crate::pipe::PipeEndpoint;
use crate::process::ProcessHandle;

/// One process to start, fully described.
#[derive(Debug, Clone)]
pub struct PlannedProcess {
    /// Diagnostic label (engine or role name).
    pub label: String,
    /// Executable path.
    pub program: PathBuf,
    /// Complete argument vector.
    pub args: Vec<String>,
}

impl PlannedProcess {
    /// Describe a process.
    pub fn new(label: impl Into<String>, program: PathBuf, args: Vec<String>) -> Self {
        Self { label: label.into(), program, args }
    }
}

/// A fully planned pipeline, not yet started.
///
/// `processes` is start order; the last entry is the terminal process whose
/// handle owns the whole tree. `output` is the pipe or file whose read side
/// is handed to the delivery layer.
#[derive(Debug, Clone)]
pub struct PipelinePlan {
    /// Named pipes to create, in creation order.
    pub pipes: Vec<PathBuf>,
    /// Mux script to write before any process starts, when the topology
    /// includes a muxer.
    pub mux_script: Option<(PathBuf, MuxScript)>,
    /// Processes in start order; the last one is the terminal process.
    pub processes: Vec<PlannedProcess>,
    /// Path carrying the final output stream.
    pub output: PathBuf,
}

impl PipelinePlan {
    /// A simple topology: one process writing to one output pipe.
    pub fn simple(process: PlannedProcess, output_pipe: PathBuf) -> Self {
        Self {
            pipes: vec![output_pipe.clone()],
            mux_script: None,
            processes: vec![process],
            output: output_pipe,
        }
    }
}

/// Execute a plan: create pipes, write the mux script, start processes.
///
/// Returns the terminal process handle owning every producer and pipe. If
/// any step fails, everything created so far is stopped and deleted before
/// the error propagates.
pub fn execute(plan: PipelinePlan, config: &TranscodeConfig) -> Result<ProcessHandle> {
    debug!(
        pipes = plan.pipes.len(),
        processes = plan.processes.len(),
        output = %plan.output.display(),
        "Executing pipeline plan"
    );

    // Dropping these on an early return tears everything down.
    let mut pipes = Vec::with_capacity(plan.pipes.len());
    for path in plan.pipes {
        pipes.push(PipeEndpoint::create(path, &config.mkfifo_path, config.startup_wait)?);
    }

    if let Some((path, script)) = &plan.mux_script {
        script.write_to(path)?;
    }

    let mut started: Vec<ProcessHandle> = Vec::with_capacity(plan.processes.len());
    for planned in plan.processes {
        let handle = ProcessHandle::spawn(
            planned.label,
            &planned.program,
            &planned.args,
            plan.output.clone(),
        )?;
        started.push(handle);
    }

    // The registry guarantees at least one process per plan.
    let mut terminal = match started.pop() {
        Some(terminal) => terminal,
        None => {
            return Err(rendermux_core::EngineError::Config(
                "pipeline plan contains no processes".into(),
            ))
        }
    };
    for producer in started {
        terminal.attach(producer);
    }
    for pipe in pipes {
        terminal.adopt_pipe(pipe);
    }
    if let Some((path, _)) = plan.mux_script {
        terminal.adopt_pipe(PipeEndpoint::adopt(path));
    }

    info!(label = terminal.label(), "Pipeline started");
    Ok(terminal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_plan_shape() {
        let plan = PipelinePlan::simple(
            PlannedProcess::new("enc", "/usr/bin/ffmpeg".into(), vec!["-i".into(), "x".into()]),
            PathBuf::from("/tmp/out_pipe"),
        );
        assert_eq!(plan.pipes, vec![PathBuf::from("/tmp/out_pipe")]);
        assert_eq!(plan.output, PathBuf::from("/tmp/out_pipe"));
        assert!(plan.mux_script.is_none());
        assert_eq!(plan.processes.len(), 1);
    }

    #[test]
    fn test_empty_plan_is_config_error() {
        let plan = PipelinePlan {
            pipes: Vec::new(),
            mux_script: None,
            processes: Vec::new(),
            output: PathBuf::from("/tmp/out"),
        };
        let err = match execute(plan, &TranscodeConfig::default()) {
            Ok(_) => panic!("empty plan must not start a pipeline"),
            Err(err) => err,
        };
        assert!(matches!(err, rendermux_core::EngineError::Config(_)));
    }
}
