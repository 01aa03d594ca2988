//! Global transcoding configuration.
//!
//! Configuration is loaded once at startup and then passed explicitly into
//! every builder and orchestrator call. Device-specific overrides are
//! expressed by constructing a modified copy for the call, never by swapping
//! shared state.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default video buffer size in kbit when no ceiling is configured.
pub const DEFAULT_BUFFER_KBIT: u32 = 1835;

/// Hard cap on the computed video buffer size in kbit.
pub const MAX_BUFFER_KBIT: u32 = 7000;

/// Bitrate reserved for AC-3 audio, subtracted from the video ceiling (kbit/s).
///
/// Approximation carried over from the original tuning, not derived from the
/// negotiated audio bitrate.
pub const AUDIO_RESERVATION_AC3_KBPS: u32 = 640;

/// Bitrate reserved for DTS wrapped in LPCM (kbit/s). Higher than AC-3
/// because the PCM wrapping inflates the stream.
///
/// Approximation carried over from the original tuning, not derived from the
/// negotiated audio bitrate.
pub const AUDIO_RESERVATION_DTS_PCM_KBPS: u32 = 1536;

/// One (audio language, subtitle language) preference pair.
///
/// `audio` may be `"*"` to match any chosen audio language; `subtitle` may be
/// the literal `"off"` to disable subtitle selection for that pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    /// Audio language token.
    pub audio: String,
    /// Subtitle language token, or "off".
    pub subtitle: String,
}

impl LanguagePair {
    /// Create a pair from two tokens.
    pub fn new(audio: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            audio: audio.into().to_lowercase(),
            subtitle: subtitle.into().to_lowercase(),
        }
    }
}

/// Subtitle selection policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitlePolicy {
    /// Disable subtitles globally.
    pub disabled: bool,
    /// Load external subtitle files and prefer them over embedded tracks.
    pub autoload_external: bool,
    /// Let an external subtitle take priority over an "off" pairing.
    pub force_external_over_off: bool,
    /// Ordered (audio language, subtitle language) preference pairs.
    pub pairs: Vec<LanguagePair>,
    /// Use forced subtitles when nothing else was selected.
    pub use_forced: bool,
    /// Title substring identifying a forced track (e.g. "forced").
    pub forced_tag: String,
    /// Language a forced track must match.
    pub forced_language: String,
    /// Hand embedded non-ASS text and VOBSUB subtitles to the alternate
    /// engine instead of burning them through the filter graph.
    pub defer_problematic: bool,
}

impl Default for SubtitlePolicy {
    fn default() -> Self {
        Self {
            disabled: false,
            autoload_external: true,
            force_external_over_off: false,
            pairs: Vec::new(),
            use_forced: false,
            forced_tag: "forced".into(),
            forced_language: String::new(),
            defer_problematic: false,
        }
    }
}

/// Global configuration for the transcoding core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscodeConfig {
    /// Path to the ffmpeg executable.
    pub ffmpeg_path: PathBuf,
    /// Path to the TS multiplexer executable.
    pub tsmuxer_path: PathBuf,
    /// Path to the subtitle-capable alternate transcoder executable.
    pub alternate_path: PathBuf,
    /// Path to the mkfifo helper used to create named pipes.
    pub mkfifo_path: PathBuf,
    /// Directory where named pipes and mux scripts are created.
    pub pipe_dir: PathBuf,
    /// Global bitrate ceiling in kbit/s (0 = unlimited).
    pub max_bitrate_kbps: u32,
    /// Ordered audio language preference list.
    pub audio_languages: Vec<String>,
    /// Subtitle selection policy.
    pub subtitles: SubtitlePolicy,
    /// Constant-quality override; empty string selects the automatic table.
    pub crf_override: String,
    /// Use constant-quality mode instead of a bitrate ceiling.
    pub constant_quality: bool,
    /// Dimension alignment for scaling (e.g. 4 = round to multiple of four).
    pub dimension_alignment: u32,
    /// AC-3 audio bitrate used when re-encoding (kbit/s).
    pub audio_bitrate_kbps: u32,
    /// Reservation subtracted from the video ceiling for AC-3 audio (kbit/s).
    pub audio_reservation_ac3_kbps: u32,
    /// Reservation subtracted for DTS-in-PCM audio (kbit/s).
    pub audio_reservation_dts_pcm_kbps: u32,
    /// Engine ids disabled by the user.
    pub disabled_engines: HashSet<String>,
    /// Bounded wait for pipe creation and process startup.
    pub startup_wait: Duration,
    /// Enable fontconfig-based style overrides for text subtitles.
    pub fontconfig: bool,
    /// Character encoding forced onto text subtitles, when set.
    pub subtitle_charenc: Option<String>,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            tsmuxer_path: PathBuf::from("tsMuxeR"),
            alternate_path: PathBuf::from("mencoder"),
            mkfifo_path: PathBuf::from("mkfifo"),
            pipe_dir: std::env::temp_dir(),
            max_bitrate_kbps: 0,
            audio_languages: Vec::new(),
            subtitles: SubtitlePolicy::default(),
            crf_override: String::new(),
            constant_quality: false,
            dimension_alignment: 4,
            audio_bitrate_kbps: 448,
            audio_reservation_ac3_kbps: AUDIO_RESERVATION_AC3_KBPS,
            audio_reservation_dts_pcm_kbps: AUDIO_RESERVATION_DTS_PCM_KBPS,
            disabled_engines: HashSet::new(),
            startup_wait: Duration::from_millis(1500),
            fontconfig: false,
            subtitle_charenc: None,
        }
    }
}

impl TranscodeConfig {
    /// Whether an engine id is enabled by the user.
    pub fn engine_enabled(&self, id: &str) -> bool {
        !self.disabled_engines.contains(id)
    }
}
