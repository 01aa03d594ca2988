//! Per-executable availability records.
//!
//! Availability is resolved once by an external probe when an engine is
//! registered and cached here. Lookups happen on every request and never
//! perform I/O, so the store is a reader/writer lock around a plain map:
//! many concurrent reads, rare writes at registration or retest time.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::info;

use crate::descriptor::EngineId;

/// Which build of an engine's executable a record refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum ExecutableVariant {
    /// The variant bundled with the server.
    #[default]
    Bundled,
    /// A user-configured custom path.
    Custom,
}

/// Result of probing one executable variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// Not probed yet.
    Untested,
    /// Probe succeeded; carries the reported version string.
    Available {
        /// Version reported by the executable.
        version: String,
    },
    /// Probe failed; carries the reason.
    Unavailable {
        /// Why the executable cannot be used.
        reason: String,
    },
}

impl Availability {
    /// Whether the executable can be used.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }
}

/// Availability records keyed by (engine id, executable variant).
#[derive(Default)]
pub struct AvailabilityStore {
    records: RwLock<HashMap<(EngineId, ExecutableVariant), Availability>>,
}

impl AvailabilityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a probe result for an engine variant.
    pub fn record(&self, id: EngineId, variant: ExecutableVariant, availability: Availability) {
        info!(engine = %id, ?variant, available = availability.is_available(), "Engine availability recorded");
        self.records.write().insert((id, variant), availability);
    }

    /// Look up the record for an engine variant; `Untested` when absent.
    pub fn get(&self, id: &EngineId, variant: ExecutableVariant) -> Availability {
        self.records
            .read()
            .get(&(id.clone(), variant))
            .cloned()
            .unwrap_or(Availability::Untested)
    }

    /// Whether any variant of the engine is available.
    pub fn is_available(&self, id: &EngineId) -> bool {
        self.records
            .read()
            .iter()
            .any(|((rid, _), a)| rid == id && a.is_available())
    }
}
