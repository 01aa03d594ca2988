//! Parsed media metadata: track records and the media descriptor.
//!
//! A [`MediaDescriptor`] is produced exactly once per resource by the media
//! probe collaborator and never mutated by the orchestration layers. Track
//! selection and option synthesis only ever borrow from it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::format::{AudioCodec, ContainerFormat, SubtitleKind, VideoCodec};
use crate::rational::Rational;

/// Sentinel track id meaning "no subtitle must be selected".
pub const OFF_TRACK_ID: u32 = u32::MAX;

/// Stereoscopic 3D frame layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Stereo3dLayout {
    /// Side-by-side, full or half width.
    SideBySide,
    /// Top-and-bottom (over/under).
    TopBottom,
    /// Frame-sequential.
    FrameSequential,
}

impl Stereo3dLayout {
    /// The ffmpeg `stereo3d` filter input token for this layout.
    pub fn filter_token(&self) -> &'static str {
        match self {
            Self::SideBySide => "sbsl",
            Self::TopBottom => "abl",
            Self::FrameSequential => "al",
        }
    }
}

/// A video elementary stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoTrackInfo {
    /// Ordinal track id within the container.
    pub id: u32,
    /// Video codec.
    pub codec: VideoCodec,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Frame rate as a rational.
    pub frame_rate: Option<Rational>,
    /// Display aspect ratio of the track itself.
    pub aspect: Option<Rational>,
    /// Display aspect ratio declared by the container, when different.
    pub container_aspect: Option<Rational>,
    /// Parsed H.264 level (e.g. 41 for Level 4.1), when known.
    pub h264_level: Option<u8>,
    /// 3D layout, when the source is stereoscopic.
    pub stereo_layout: Option<Stereo3dLayout>,
    /// Color matrix identifier as reported by the probe (e.g. "bt601").
    pub color_matrix: Option<String>,
}

impl VideoTrackInfo {
    /// Create a video track record with the mandatory fields.
    pub fn new(id: u32, codec: VideoCodec) -> Self {
        Self {
            id,
            codec,
            width: 0,
            height: 0,
            frame_rate: None,
            aspect: None,
            container_aspect: None,
            h264_level: None,
            stereo_layout: None,
            color_matrix: None,
        }
    }

    /// Set the resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the frame rate.
    pub fn with_frame_rate(mut self, rate: Rational) -> Self {
        self.frame_rate = Some(rate);
        self
    }

    /// Set the track display aspect ratio.
    pub fn with_aspect(mut self, aspect: Rational) -> Self {
        self.aspect = Some(aspect);
        self
    }

    /// Set the H.264 level (tens notation, 41 = Level 4.1).
    pub fn with_h264_level(mut self, level: u8) -> Self {
        self.h264_level = Some(level);
        self
    }

    /// Whether the container declares a different aspect than the track.
    ///
    /// A mismatch means aspect correction (and possibly letterboxing) is
    /// required before the stream can be passed through unmodified.
    pub fn aspect_mismatch(&self) -> bool {
        match (self.aspect, self.container_aspect) {
            (Some(track), Some(container)) => !track.same_ratio(container),
            _ => false,
        }
    }
}

/// An audio elementary stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioTrackInfo {
    /// Ordinal track id within the container.
    pub id: u32,
    /// Audio codec.
    pub codec: AudioCodec,
    /// ISO 639 language tag, lowercase; "und" when unknown.
    pub language: String,
    /// Channel count.
    pub channels: u8,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample, when reported.
    pub bits_per_sample: Option<u8>,
    /// Track title metadata, when present.
    pub title: Option<String>,
}

impl AudioTrackInfo {
    /// Create an audio track record.
    pub fn new(id: u32, codec: AudioCodec, language: impl Into<String>) -> Self {
        Self {
            id,
            codec,
            language: language.into().to_lowercase(),
            channels: 2,
            sample_rate: 48_000,
            bits_per_sample: None,
            title: None,
        }
    }

    /// Set the channel count.
    pub fn with_channels(mut self, channels: u8) -> Self {
        self.channels = channels;
        self
    }

    /// Whether this track's language matches a preference token.
    ///
    /// `"*"` and `"und"` act as wildcards on the preference side.
    pub fn matches_language(&self, pref: &str) -> bool {
        let pref = pref.trim().to_lowercase();
        pref == "*" || pref == "und" || self.language == pref
    }
}

/// A subtitle stream, embedded or external.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleTrackInfo {
    /// Ordinal track id, or [`OFF_TRACK_ID`] for the "off" sentinel.
    pub id: u32,
    /// Subtitle format family.
    pub kind: SubtitleKind,
    /// ISO 639 language tag, lowercase; "off" for the sentinel.
    pub language: String,
    /// Track title metadata; searched for the configured forced tag.
    pub title: Option<String>,
    /// Path of the external subtitle file, `None` for embedded tracks.
    pub external: Option<PathBuf>,
}

impl SubtitleTrackInfo {
    /// Create an embedded subtitle track record.
    pub fn embedded(id: u32, kind: SubtitleKind, language: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            language: language.into().to_lowercase(),
            title: None,
            external: None,
        }
    }

    /// Create an external subtitle track record.
    pub fn external(id: u32, kind: SubtitleKind, language: impl Into<String>, path: PathBuf) -> Self {
        Self {
            id,
            kind,
            language: language.into().to_lowercase(),
            title: None,
            external: Some(path),
        }
    }

    /// The "off" sentinel: subtitle selection was explicitly disabled.
    pub fn off() -> Self {
        Self {
            id: OFF_TRACK_ID,
            kind: SubtitleKind::Subrip,
            language: "off".into(),
            title: None,
            external: None,
        }
    }

    /// Set the track title metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Whether this is the "off" sentinel.
    pub fn is_off(&self) -> bool {
        self.id == OFF_TRACK_ID || self.language == "off"
    }

    /// Whether this track comes from an external file.
    pub fn is_external(&self) -> bool {
        self.external.is_some()
    }

    /// Whether this track's language matches a preference token.
    pub fn matches_language(&self, pref: &str) -> bool {
        let pref = pref.trim().to_lowercase();
        pref == "*" || pref == "und" || self.language == pref
    }

    /// Whether the title metadata contains the given forced tag.
    pub fn title_contains(&self, tag: &str) -> bool {
        self.title
            .as_deref()
            .map(|t| t.to_lowercase().contains(&tag.to_lowercase()))
            .unwrap_or(false)
    }
}

/// Parsed media metadata for one resource.
///
/// Immutable once produced by the probe; the probe guards against re-entrant
/// parsing so a descriptor exists at most once per resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    /// Container format, when recognized.
    pub container: Option<ContainerFormat>,
    /// Video tracks in container order.
    pub video: Vec<VideoTrackInfo>,
    /// Audio tracks in container order.
    pub audio: Vec<AudioTrackInfo>,
    /// Subtitle tracks, embedded first, then external.
    pub subtitles: Vec<SubtitleTrackInfo>,
    /// Duration in milliseconds, when known.
    pub duration_ms: Option<u64>,
    /// Whether the source was identified as a WEB-DL rip.
    pub web_dl: bool,
    /// Whether the probe flagged the stream muxable to MPEG-TS as-is.
    pub ts_muxable: bool,
}

impl MediaDescriptor {
    /// Create an empty descriptor for a container.
    pub fn new(container: ContainerFormat) -> Self {
        Self {
            container: Some(container),
            video: Vec::new(),
            audio: Vec::new(),
            subtitles: Vec::new(),
            duration_ms: None,
            web_dl: false,
            ts_muxable: true,
        }
    }

    /// Add a video track.
    pub fn with_video(mut self, track: VideoTrackInfo) -> Self {
        self.video.push(track);
        self
    }

    /// Add an audio track.
    pub fn with_audio(mut self, track: AudioTrackInfo) -> Self {
        self.audio.push(track);
        self
    }

    /// Add a subtitle track.
    pub fn with_subtitle(mut self, track: SubtitleTrackInfo) -> Self {
        self.subtitles.push(track);
        self
    }

    /// The first (default) video track, when present.
    pub fn default_video(&self) -> Option<&VideoTrackInfo> {
        self.video.first()
    }

    /// The first (default) audio track, when present.
    pub fn default_audio(&self) -> Option<&AudioTrackInfo> {
        self.audio.first()
    }

    /// Whether the primary video track is HD (720 lines or more).
    pub fn is_hd(&self) -> bool {
        self.default_video().map(|v| v.height >= 720).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_off_sentinel() {
        let off = SubtitleTrackInfo::off();
        assert!(off.is_off());
        assert!(!off.is_external());
    }

    #[test]
    fn test_language_matching() {
        let track = AudioTrackInfo::new(0, AudioCodec::Ac3, "ENG");
        assert!(track.matches_language("eng"));
        assert!(track.matches_language("*"));
        assert!(!track.matches_language("fre"));
    }

    #[test]
    fn test_title_contains_forced_tag() {
        let sub = SubtitleTrackInfo::embedded(2, SubtitleKind::Subrip, "eng")
            .with_title("English (Forced)");
        assert!(sub.title_contains("forced"));
        assert!(!sub.title_contains("sdh"));
    }

    #[test]
    fn test_aspect_mismatch() {
        let mut video = VideoTrackInfo::new(0, VideoCodec::H264)
            .with_resolution(1920, 1080)
            .with_aspect(Rational::new(16, 9));
        assert!(!video.aspect_mismatch());
        video.container_aspect = Some(Rational::new(4, 3));
        assert!(video.aspect_mismatch());
    }

    #[test]
    fn test_is_hd() {
        let media = MediaDescriptor::new(ContainerFormat::Mkv)
            .with_video(VideoTrackInfo::new(0, VideoCodec::H264).with_resolution(1280, 720));
        assert!(media.is_hd());

        let sd = MediaDescriptor::new(ContainerFormat::Avi)
            .with_video(VideoTrackInfo::new(0, VideoCodec::Mpeg4).with_resolution(720, 576));
        assert!(!sd.is_hd());
    }
}
