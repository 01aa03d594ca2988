//! # Rendermux Track Selection
//!
//! Chooses the audio and subtitle track for a playback request from the
//! media descriptor and the configured preferences. Selection is
//! deterministic: the same descriptor, preference list and policy flags
//! always produce the same choice.
//!
//! ## Quick Start
//!
//! ```rust
//! use rendermux_core::format::{AudioCodec, ContainerFormat};
//! use rendermux_core::media::{AudioTrackInfo, MediaDescriptor};
//! use rendermux_tracks::select_audio;
//!
//! let media = MediaDescriptor::new(ContainerFormat::Mkv)
//!     .with_audio(AudioTrackInfo::new(1, AudioCodec::Ac3, "fre"))
//!     .with_audio(AudioTrackInfo::new(2, AudioCodec::Dts, "eng"));
//!
//! let prefs = vec!["eng".to_string(), "fre".to_string()];
//! let chosen = select_audio(&media, &prefs).unwrap();
//! assert_eq!(chosen.language, "eng");
//! ```

pub mod audio;
pub mod subtitle;

pub use audio::select_audio;
pub use subtitle::{select_subtitle, LiveSubtitleSource, SubtitleContext};
