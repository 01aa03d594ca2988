//! Ordered engine registry.

use std::sync::Arc;

use rendermux_core::{EngineError, Result, TranscodeConfig, TranscodeRequest};
use tracing::{debug, info};

use crate::availability::{Availability, AvailabilityStore, ExecutableVariant};
use crate::descriptor::EngineId;
use crate::Engine;

/// Ordered collection of candidate engines plus their availability records.
///
/// Registration order is selection priority: `resolve` walks the list and
/// returns the first engine that is both compatible with the request and
/// active (available and enabled).
#[derive(Default)]
pub struct EngineRegistry {
    engines: Vec<Arc<dyn Engine>>,
    availability: AvailabilityStore,
}

impl EngineRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            engines: Vec::new(),
            availability: AvailabilityStore::new(),
        }
    }

    /// Register an engine together with the result of its executable probe.
    pub fn register(
        &mut self,
        engine: Arc<dyn Engine>,
        variant: ExecutableVariant,
        availability: Availability,
    ) {
        let descriptor = engine.descriptor();
        info!(
            engine = %descriptor.id,
            name = descriptor.name,
            purpose = %descriptor.purpose,
            "Engine registered"
        );
        self.availability
            .record(descriptor.id.clone(), variant, availability);
        self.engines.push(engine);
    }

    /// The availability store, for retest-time updates.
    pub fn availability(&self) -> &AvailabilityStore {
        &self.availability
    }

    /// Whether an engine is available and enabled. Never performs I/O.
    pub fn is_active(&self, id: &EngineId, config: &TranscodeConfig) -> bool {
        self.availability.is_available(id) && config.engine_enabled(id.0)
    }

    /// Find a registered engine by id, active or not.
    pub fn find(&self, id: &EngineId) -> Option<&Arc<dyn Engine>> {
        self.engines.iter().find(|e| &e.descriptor().id == id)
    }

    /// Find a registered engine by id only if it is active.
    pub fn find_active(&self, id: &EngineId, config: &TranscodeConfig) -> Option<&Arc<dyn Engine>> {
        self.find(id).filter(|_| self.is_active(id, config))
    }

    /// Select the engine for a request.
    ///
    /// Incompatibility and unavailability are soft: the walk continues to
    /// the next candidate. Only exhaustion surfaces an error.
    pub fn resolve(
        &self,
        request: &TranscodeRequest,
        config: &TranscodeConfig,
    ) -> Result<&Arc<dyn Engine>> {
        for engine in &self.engines {
            let id = &engine.descriptor().id;
            if !self.is_active(id, config) {
                debug!(engine = %id, "Skipping inactive engine");
                continue;
            }
            if !engine.is_compatible(request) {
                debug!(engine = %id, "Engine not compatible with request");
                continue;
            }
            debug!(engine = %id, "Engine selected");
            return Ok(engine);
        }
        Err(EngineError::IncompatibleRenderer {
            renderer: request.renderer.name.clone(),
        })
    }
}
