//! # Rendermux Pipeline Orchestration
//!
//! Builds and runs the inter-process pipelines that produce a
//! renderer-compatible byte stream: named-pipe endpoints, process handles
//! with attached-child semantics, the mux-script writer, deferral
//! evaluation, and the concrete engines.
//!
//! A pipeline is a directed acyclic graph of external processes connected by
//! named pipes, with exactly one terminal output pipe whose read side is the
//! stream handed to the delivery layer. Engines first *plan* a pipeline
//! (pipes, commands, optional mux script) and then *execute* the plan; the
//! split keeps command synthesis testable without spawning anything.
//!
//! Startup ordering: pipe creation and mux-script writing are synchronous
//! in the orchestrating thread; media processes are started asynchronously
//! and run for the lifetime of the stream. Readiness is established by
//! bounded polling for pipe existence rather than fixed sleeps, and any
//! partially constructed pipeline is torn down before an error is returned.

pub mod deferral;
pub mod engines;
pub mod muxscript;
pub mod pipe;
pub mod plan;
pub mod process;

pub use deferral::{evaluate, remux_deferral, subtitle_deferral, Check, DeferralDecision};
pub use engines::{FfmpegVideoEngine, SubtitleTranscodeEngine, TsRemuxEngine};
pub use muxscript::{MuxScript, MuxStream};
pub use pipe::{pipe_name, PipeEndpoint};
pub use plan::{PipelinePlan, PlannedProcess};
pub use process::{classify_exit_code, ExitClass, ProcessHandle};
