//! # Rendermux Core
//!
//! Shared data model for the rendermux streaming engine: media and renderer
//! descriptors, the per-request transcode description, global configuration,
//! and the error taxonomy used across the workspace.
//!
//! Everything in this crate is plain data. Descriptors are parsed once by a
//! media-probe collaborator and are read-only for the orchestration layers;
//! renderer profiles and configuration are loaded externally and threaded
//! explicitly through every call that needs them.
//!
//! ## Quick Start
//!
//! ```rust
//! use rendermux_core::format::{ContainerFormat, VideoCodec};
//! use rendermux_core::media::{MediaDescriptor, VideoTrackInfo};
//! use rendermux_core::rational::Rational;
//!
//! let video = VideoTrackInfo::new(0, VideoCodec::H264)
//!     .with_resolution(1920, 1080)
//!     .with_frame_rate(Rational::new(24000, 1001));
//!
//! let media = MediaDescriptor::new(ContainerFormat::Mp4).with_video(video);
//! assert!(media.is_hd());
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod media;
pub mod rational;
pub mod renderer;
pub mod request;

pub use config::{SubtitlePolicy, TranscodeConfig};
pub use error::{EngineError, Result};
pub use format::{AudioCodec, ContainerFormat, H264Level, SubtitleKind, VideoCodec};
pub use media::{
    AudioTrackInfo, MediaDescriptor, Stereo3dLayout, SubtitleTrackInfo, VideoTrackInfo,
    OFF_TRACK_ID,
};
pub use rational::Rational;
pub use renderer::{RendererFlags, RendererProfile};
pub use request::{TimeRange, TranscodeRequest};
