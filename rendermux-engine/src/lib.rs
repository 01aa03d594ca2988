//! # Rendermux Engine Layer
//!
//! The engine abstraction and everything needed to pick one: immutable
//! engine descriptors, the availability store, the ordered engine registry,
//! and the renderer-compatibility matcher.
//!
//! An *engine* wraps one external media-processing program and its
//! invocation policy. Engines never hold mutable availability state; the
//! [`AvailabilityStore`] records, per (engine id, executable variant), the
//! result of the one-time executable probe, and registry lookups read it
//! without performing I/O.

pub mod availability;
pub mod compat;
pub mod descriptor;
pub mod registry;

use std::path::Path;

use rendermux_core::{Result, TranscodeConfig, TranscodeRequest};

pub use availability::{Availability, AvailabilityStore, ExecutableVariant};
pub use descriptor::{EngineDescriptor, EngineId, EnginePurpose};
pub use registry::EngineRegistry;

/// A running transcode pipeline, owned by the delivery layer.
///
/// Dropping or stopping the job is destructive: every process in the
/// pipeline is terminated and its pipes are scheduled for deletion.
pub trait TranscodeJob: Send {
    /// Path of the pipe or file carrying the final output stream.
    fn output(&self) -> &Path;

    /// Destructively cancel the pipeline.
    fn stop(&mut self);

    /// Whether the terminal process is still running.
    fn is_alive(&mut self) -> bool;
}

/// One transcoding engine: a wrapper around an external program.
pub trait Engine: Send + Sync {
    /// The engine's immutable identity and capability record.
    fn descriptor(&self) -> &EngineDescriptor;

    /// Whether this engine can handle the given resource/renderer pair.
    ///
    /// Must resolve missing metadata to a definite answer, never panic.
    fn is_compatible(&self, request: &TranscodeRequest) -> bool;

    /// Build and start the pipeline for a request.
    ///
    /// On error, any processes or pipes already created by this call have
    /// been torn down; callers never observe partial success.
    fn launch(
        &self,
        request: &TranscodeRequest,
        config: &TranscodeConfig,
        registry: &EngineRegistry,
    ) -> Result<Box<dyn TranscodeJob>>;
}
