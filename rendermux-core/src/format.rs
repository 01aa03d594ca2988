//! Container, codec and subtitle format definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Container format type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ContainerFormat {
    /// ISO Base Media File Format (MP4, M4V).
    Mp4,
    /// Matroska container.
    Mkv,
    /// Audio Video Interleave (legacy).
    Avi,
    /// MPEG Program Stream (DVD-era).
    MpegPs,
    /// MPEG Transport Stream.
    MpegTs,
    /// QuickTime Movie.
    Mov,
    /// Windows Media / ASF.
    Wmv,
    /// Flash Video (legacy).
    Flv,
    /// WebM (Matroska subset).
    WebM,
}

impl ContainerFormat {
    /// Get the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Mkv => "mkv",
            Self::Avi => "avi",
            Self::MpegPs => "mpg",
            Self::MpegTs => "ts",
            Self::Mov => "mov",
            Self::Wmv => "wmv",
            Self::Flv => "flv",
            Self::WebM => "webm",
        }
    }

    /// Get the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp4 => "video/mp4",
            Self::Mkv => "video/x-matroska",
            Self::Avi => "video/avi",
            Self::MpegPs => "video/mpeg",
            Self::MpegTs => "video/mp2t",
            Self::Mov => "video/quicktime",
            Self::Wmv => "video/x-ms-wmv",
            Self::Flv => "video/x-flv",
            Self::WebM => "video/webm",
        }
    }

    /// Try to detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp4" | "m4v" => Some(Self::Mp4),
            "mkv" => Some(Self::Mkv),
            "avi" => Some(Self::Avi),
            "mpg" | "mpeg" | "vob" => Some(Self::MpegPs),
            "ts" | "mts" | "m2ts" => Some(Self::MpegTs),
            "mov" => Some(Self::Mov),
            "wmv" | "asf" => Some(Self::Wmv),
            "flv" => Some(Self::Flv),
            "webm" => Some(Self::WebM),
            _ => None,
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mp4 => write!(f, "MP4"),
            Self::Mkv => write!(f, "Matroska"),
            Self::Avi => write!(f, "AVI"),
            Self::MpegPs => write!(f, "MPEG-PS"),
            Self::MpegTs => write!(f, "MPEG-TS"),
            Self::Mov => write!(f, "QuickTime"),
            Self::Wmv => write!(f, "WMV"),
            Self::Flv => write!(f, "FLV"),
            Self::WebM => write!(f, "WebM"),
        }
    }
}

/// Video codec type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum VideoCodec {
    /// H.264 / AVC.
    H264,
    /// H.265 / HEVC.
    H265,
    /// MPEG-2 Part 2.
    Mpeg2,
    /// MPEG-4 Part 2 (DivX/Xvid era).
    Mpeg4,
    /// VC-1 / WMV3.
    Vc1,
    /// VP9.
    Vp9,
    /// AV1.
    Av1,
}

impl fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::H264 => write!(f, "H.264/AVC"),
            Self::H265 => write!(f, "H.265/HEVC"),
            Self::Mpeg2 => write!(f, "MPEG-2"),
            Self::Mpeg4 => write!(f, "MPEG-4 ASP"),
            Self::Vc1 => write!(f, "VC-1"),
            Self::Vp9 => write!(f, "VP9"),
            Self::Av1 => write!(f, "AV1"),
        }
    }
}

/// Audio codec type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AudioCodec {
    /// AAC (Advanced Audio Coding).
    Aac,
    /// AC-3 (Dolby Digital).
    Ac3,
    /// E-AC-3 (Enhanced AC-3).
    Eac3,
    /// DTS core.
    Dts,
    /// DTS-HD Master Audio.
    DtsHd,
    /// Dolby TrueHD.
    TrueHd,
    /// Linear PCM.
    Lpcm,
    /// FLAC (Free Lossless Audio Codec).
    Flac,
    /// MP3 (MPEG Layer 3).
    Mp3,
    /// Vorbis.
    Vorbis,
    /// Opus.
    Opus,
}

impl AudioCodec {
    /// Check if this is a lossless codec.
    pub fn is_lossless(&self) -> bool {
        matches!(self, Self::DtsHd | Self::TrueHd | Self::Lpcm | Self::Flac)
    }

    /// Check if this codec belongs to the DTS family.
    pub fn is_dts(&self) -> bool {
        matches!(self, Self::Dts | Self::DtsHd)
    }

    /// Check if this codec belongs to the AC-3 family.
    pub fn is_ac3(&self) -> bool {
        matches!(self, Self::Ac3 | Self::Eac3)
    }
}

impl fmt::Display for AudioCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aac => write!(f, "AAC"),
            Self::Ac3 => write!(f, "AC-3"),
            Self::Eac3 => write!(f, "E-AC-3"),
            Self::Dts => write!(f, "DTS"),
            Self::DtsHd => write!(f, "DTS-HD MA"),
            Self::TrueHd => write!(f, "TrueHD"),
            Self::Lpcm => write!(f, "LPCM"),
            Self::Flac => write!(f, "FLAC"),
            Self::Mp3 => write!(f, "MP3"),
            Self::Vorbis => write!(f, "Vorbis"),
            Self::Opus => write!(f, "Opus"),
        }
    }
}

/// Subtitle format family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SubtitleKind {
    /// SubRip text subtitles (.srt).
    Subrip,
    /// Advanced SubStation Alpha (.ass/.ssa).
    Ass,
    /// WebVTT text subtitles.
    Vtt,
    /// MicroDVD text subtitles (.sub).
    MicroDvd,
    /// DVD picture subtitles (VOBSUB).
    Vobsub,
    /// Blu-ray Presentation Graphics Stream.
    Pgs,
    /// DVB broadcast picture subtitles.
    Dvb,
}

impl SubtitleKind {
    /// Text-based formats that can be rendered via a subtitle filter.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Subrip | Self::Ass | Self::Vtt | Self::MicroDvd)
    }

    /// Picture-based formats that need an overlay filter to burn in.
    pub fn is_picture(&self) -> bool {
        !self.is_text()
    }
}

impl fmt::Display for SubtitleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subrip => write!(f, "SubRip"),
            Self::Ass => write!(f, "ASS"),
            Self::Vtt => write!(f, "WebVTT"),
            Self::MicroDvd => write!(f, "MicroDVD"),
            Self::Vobsub => write!(f, "VOBSUB"),
            Self::Pgs => write!(f, "PGS"),
            Self::Dvb => write!(f, "DVB"),
        }
    }
}

/// H.264 level ceiling as advertised by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum H264Level {
    /// Level 3.0.
    L3_0,
    /// Level 3.1.
    L3_1,
    /// Level 4.0.
    L4_0,
    /// Level 4.1 (the common Blu-ray/renderer ceiling).
    L4_1,
    /// Level 4.2.
    L4_2,
    /// Level 5.0.
    L5_0,
    /// Level 5.1.
    L5_1,
}

impl H264Level {
    /// Parse a level string such as "4.1" or "41".
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().replace('.', "").as_str() {
            "30" => Some(Self::L3_0),
            "31" => Some(Self::L3_1),
            "40" => Some(Self::L4_0),
            "41" => Some(Self::L4_1),
            "42" => Some(Self::L4_2),
            "50" => Some(Self::L5_0),
            "51" => Some(Self::L5_1),
            _ => None,
        }
    }

    /// The level in tens notation (41 = Level 4.1), for comparison against
    /// probe-reported numeric levels outside the common set.
    pub fn as_tens(&self) -> u8 {
        match self {
            Self::L3_0 => 30,
            Self::L3_1 => 31,
            Self::L4_0 => 40,
            Self::L4_1 => 41,
            Self::L4_2 => 42,
            Self::L5_0 => 50,
            Self::L5_1 => 51,
        }
    }

    /// The level as an ffmpeg `-level` argument value.
    pub fn as_arg(&self) -> &'static str {
        match self {
            Self::L3_0 => "3.0",
            Self::L3_1 => "3.1",
            Self::L4_0 => "4.0",
            Self::L4_1 => "4.1",
            Self::L4_2 => "4.2",
            Self::L5_0 => "5.0",
            Self::L5_1 => "5.1",
        }
    }
}

impl fmt::Display for H264Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level {}", self.as_arg())
    }
}
