//! Renderer capability profile.
//!
//! A profile describes what one playback device accepts. Profiles are loaded
//! from per-device configuration and are read-only for the engine layers. A
//! device-specific override produces a distinct profile value that is passed
//! explicitly; no profile is ever shared mutable state.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::format::{AudioCodec, ContainerFormat, H264Level, VideoCodec};
use crate::media::Stereo3dLayout;

bitflags! {
    /// Renderer capability and policy flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct RendererFlags: u32 {
        /// Accepts H.264 video muxed into MPEG-TS without re-encoding.
        const MUXED_H264_TS = 0x0001;
        /// AC-3 audio can be passed through unmodified.
        const AC3_PASSTHROUGH = 0x0002;
        /// DTS audio can be passed through unmodified.
        const DTS_PASSTHROUGH = 0x0004;
        /// Audio should be transcoded to AAC rather than AC-3.
        const AAC_TRANSCODE = 0x0008;
        /// DTS must be wrapped in LPCM before sending.
        const WRAP_DTS_IN_PCM = 0x0010;
        /// Halve the configured bitrate ceiling for this device.
        const HALVE_BITRATE = 0x0020;
        /// Legacy device that only accepts MPEG-PS output.
        const LEGACY_MPEGPS = 0x0040;
        /// Accepts H.265/HEVC output.
        const H265_SUPPORT = 0x0080;
        /// Keep the source aspect ratio by letterboxing to 16:9.
        const KEEP_ASPECT_RATIO = 0x0100;
        /// PS3-class device quirk set (WEB-DL sources remux fine).
        const PS3_COMPAT = 0x0200;
        /// Device is reached over a wireless link.
        const WIRELESS = 0x0400;
        /// Legacy BT.601 color matrix is rendered incorrectly.
        const REJECT_BT601 = 0x0800;
    }
}

/// Capability matrix for one playback device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererProfile {
    /// Stable device identifier.
    pub id: String,
    /// Human-readable device name.
    pub name: String,
    /// Capability and policy flags.
    pub flags: RendererFlags,
    /// Maximum accepted width in pixels (0 = unlimited).
    pub max_width: u32,
    /// Maximum accepted height in pixels (0 = unlimited).
    pub max_height: u32,
    /// Maximum accepted bitrate in kbit/s (0 = unlimited).
    pub max_bitrate_kbps: u32,
    /// H.264 level ceiling, when the device advertises one.
    pub max_h264_level: Option<H264Level>,
    /// Containers the device accepts natively.
    pub containers: Vec<ContainerFormat>,
    /// Video codecs the device decodes natively.
    pub video_codecs: Vec<VideoCodec>,
    /// Audio codecs the device decodes natively.
    pub audio_codecs: Vec<AudioCodec>,
    /// Preferred 3D output layout, when the device is 3D-capable.
    pub output_3d: Option<Stereo3dLayout>,
    /// Extra ffmpeg options configured for this device.
    pub custom_options: Vec<String>,
    /// Filter appended as the final element of every filter chain.
    pub custom_filter: Option<String>,
    /// Encoder buffer size override in kbit (0 = use heuristics).
    pub buffer_size_kbit: u32,
    /// Ordered subtitle language fallback list for this device.
    pub languages: Vec<String>,
}

impl RendererProfile {
    /// Create a profile with no restrictions and no capabilities.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            flags: RendererFlags::empty(),
            max_width: 0,
            max_height: 0,
            max_bitrate_kbps: 0,
            max_h264_level: None,
            containers: Vec::new(),
            video_codecs: Vec::new(),
            audio_codecs: Vec::new(),
            output_3d: None,
            custom_options: Vec::new(),
            custom_filter: None,
            buffer_size_kbit: 0,
            languages: Vec::new(),
        }
    }

    /// Whether the given flag set is present.
    pub fn has(&self, flags: RendererFlags) -> bool {
        self.flags.contains(flags)
    }

    /// Whether a resolution fits within the device limits.
    pub fn fits_resolution(&self, width: u32, height: u32) -> bool {
        (self.max_width == 0 || width <= self.max_width)
            && (self.max_height == 0 || height <= self.max_height)
    }

    /// Whether an H.264 level (tens notation, 41 = 4.1) is within the ceiling.
    ///
    /// An unset ceiling accepts everything. Probe-reported levels are
    /// compared numerically so intermediate levels (e.g. 3.2) are not
    /// rejected just for being uncommon.
    pub fn accepts_h264_level(&self, level: u8) -> bool {
        match self.max_h264_level {
            None => true,
            Some(max) => level <= max.as_tens(),
        }
    }

    /// Whether the device decodes the given video codec natively.
    pub fn supports_video_codec(&self, codec: VideoCodec) -> bool {
        self.video_codecs.contains(&codec)
    }

    /// Whether the device decodes the given audio codec natively.
    pub fn supports_audio_codec(&self, codec: AudioCodec) -> bool {
        self.audio_codecs.contains(&codec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_resolution_unlimited() {
        let profile = RendererProfile::new("test", "Test");
        assert!(profile.fits_resolution(7680, 4320));
    }

    #[test]
    fn test_fits_resolution_limited() {
        let mut profile = RendererProfile::new("test", "Test");
        profile.max_width = 1920;
        profile.max_height = 1080;
        assert!(profile.fits_resolution(1920, 1080));
        assert!(!profile.fits_resolution(3840, 2160));
    }

    #[test]
    fn test_accepts_h264_level() {
        let mut profile = RendererProfile::new("test", "Test");
        assert!(profile.accepts_h264_level(51));

        profile.max_h264_level = Some(H264Level::L4_1);
        assert!(profile.accepts_h264_level(41));
        assert!(profile.accepts_h264_level(31));
        assert!(!profile.accepts_h264_level(51));
    }

    #[test]
    fn test_accepts_intermediate_h264_level() {
        // Levels between the common values (3.2, 2.2, ...) compare by value.
        let mut profile = RendererProfile::new("test", "Test");
        profile.max_h264_level = Some(H264Level::L4_1);
        assert!(profile.accepts_h264_level(32));
        assert!(profile.accepts_h264_level(22));
        assert!(!profile.accepts_h264_level(42));
    }

    #[test]
    fn test_flags() {
        let mut profile = RendererProfile::new("test", "Test");
        profile.flags = RendererFlags::MUXED_H264_TS | RendererFlags::AC3_PASSTHROUGH;
        assert!(profile.has(RendererFlags::MUXED_H264_TS));
        assert!(!profile.has(RendererFlags::DTS_PASSTHROUGH));
    }
}
