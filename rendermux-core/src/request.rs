//! Per-playback-request transcode description.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::media::{AudioTrackInfo, MediaDescriptor, SubtitleTrackInfo};
use crate::renderer::RendererProfile;

/// A time-seek range in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start offset in seconds.
    pub start: f64,
    /// End offset in seconds, when bounded.
    pub end: Option<f64>,
}

impl TimeRange {
    /// Whether this range starts at the beginning with no end bound.
    pub fn is_whole(&self) -> bool {
        self.start == 0.0 && self.end.is_none()
    }
}

/// One playback request: resource, descriptors, chosen tracks and overrides.
///
/// Created per request and short-lived. Track selection must have filled in
/// the chosen audio (exactly one) and subtitle (at most one) before a
/// pipeline is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscodeRequest {
    /// Path of the media resource.
    pub resource: PathBuf,
    /// Parsed media metadata.
    pub media: MediaDescriptor,
    /// Capability profile of the requesting renderer.
    pub renderer: RendererProfile,
    /// Chosen audio track; set by track selection.
    pub audio: Option<AudioTrackInfo>,
    /// Chosen subtitle track; `None` means no burn-in or passthrough.
    pub subtitle: Option<SubtitleTrackInfo>,
    /// Requested time-seek range.
    pub range: TimeRange,
    /// Request re-entered through the virtual transcode folder.
    pub from_transcode_folder: bool,
    /// The script-based filter engine is driving this request.
    pub script_filter_engine: bool,
    /// Frame rate override requested by the renderer, as an ffmpeg token.
    pub forced_frame_rate: Option<String>,
}

impl TranscodeRequest {
    /// Create a request with no tracks chosen yet.
    pub fn new(resource: impl Into<PathBuf>, media: MediaDescriptor, renderer: RendererProfile) -> Self {
        Self {
            resource: resource.into(),
            media,
            renderer,
            audio: None,
            subtitle: None,
            range: TimeRange::default(),
            from_transcode_folder: false,
            script_filter_engine: false,
            forced_frame_rate: None,
        }
    }

    /// Ordinal index of the chosen audio track within the descriptor.
    pub fn audio_index(&self) -> Option<usize> {
        let chosen = self.audio.as_ref()?;
        self.media.audio.iter().position(|t| t.id == chosen.id)
    }

    /// Whether the chosen audio track is the container's default one.
    pub fn audio_is_default(&self) -> bool {
        self.audio_index().map(|i| i == 0).unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{AudioCodec, ContainerFormat};

    fn request_with_two_audio_tracks() -> TranscodeRequest {
        let media = MediaDescriptor::new(ContainerFormat::Mkv)
            .with_audio(AudioTrackInfo::new(1, AudioCodec::Ac3, "eng"))
            .with_audio(AudioTrackInfo::new(2, AudioCodec::Dts, "fre"));
        TranscodeRequest::new("/media/movie.mkv", media, RendererProfile::new("r", "R"))
    }

    #[test]
    fn test_audio_index() {
        let mut request = request_with_two_audio_tracks();
        request.audio = Some(request.media.audio[1].clone());
        assert_eq!(request.audio_index(), Some(1));
        assert!(!request.audio_is_default());
    }

    #[test]
    fn test_audio_default_when_unset() {
        let request = request_with_two_audio_tracks();
        assert!(request.audio_is_default());
    }

    #[test]
    fn test_whole_range() {
        assert!(TimeRange::default().is_whole());
        assert!(!TimeRange { start: 10.0, end: None }.is_whole());
    }
}
