//! Immutable engine identity and capability records.

use std::fmt;

/// What class of resource an engine produces output for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum EnginePurpose {
    /// Transcodes or remuxes local video files.
    FileVideo,
    /// Transcodes local audio files.
    FileAudio,
    /// Relays web video streams.
    WebVideoStream,
    /// Relays web audio streams.
    WebAudioStream,
}

impl fmt::Display for EnginePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileVideo => write!(f, "file video"),
            Self::FileAudio => write!(f, "file audio"),
            Self::WebVideoStream => write!(f, "web video stream"),
            Self::WebAudioStream => write!(f, "web audio stream"),
        }
    }
}

/// Stable engine identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EngineId(pub &'static str);

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable identity plus capability flags for one engine.
///
/// Availability is deliberately *not* part of this record; it lives in the
/// [`AvailabilityStore`](crate::AvailabilityStore), keyed by engine id and
/// executable variant.
#[derive(Debug, Clone)]
pub struct EngineDescriptor {
    /// Stable identifier, also used as the pipe-name prefix.
    pub id: EngineId,
    /// Human-readable display name.
    pub name: &'static str,
    /// What class of resource this engine serves.
    pub purpose: EnginePurpose,
    /// Whether embedded subtitles can be burned or passed through.
    pub internal_subtitles: bool,
    /// Whether external subtitle files can be burned or passed through.
    pub external_subtitles: bool,
    /// Whether output supports time-based seeking.
    pub time_seekable: bool,
}

impl EngineDescriptor {
    /// Create a descriptor with no subtitle support and no seeking.
    pub const fn new(id: &'static str, name: &'static str, purpose: EnginePurpose) -> Self {
        Self {
            id: EngineId(id),
            name,
            purpose,
            internal_subtitles: false,
            external_subtitles: false,
            time_seekable: false,
        }
    }

    /// Enable embedded-subtitle support.
    pub const fn with_internal_subtitles(mut self) -> Self {
        self.internal_subtitles = true;
        self
    }

    /// Enable external-subtitle support.
    pub const fn with_external_subtitles(mut self) -> Self {
        self.external_subtitles = true;
        self
    }

    /// Mark the engine time-seekable.
    pub const fn with_time_seek(mut self) -> Self {
        self.time_seekable = true;
        self
    }
}
