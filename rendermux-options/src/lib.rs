//! # Rendermux Option Synthesis
//!
//! Pure builders that turn (resource, media descriptor, renderer profile,
//! configuration) into ordered command-line token lists for the
//! FFmpeg-family engines: video filter graphs, bitrate and buffer flags, and
//! codec/container output selection.
//!
//! Builders never mutate descriptors and have no side effects beyond
//! logging; the same inputs always produce the same ordered token list.
//!
//! ## Quick Start
//!
//! ```rust
//! use rendermux_core::format::{ContainerFormat, VideoCodec};
//! use rendermux_core::media::{MediaDescriptor, VideoTrackInfo};
//! use rendermux_core::renderer::RendererProfile;
//! use rendermux_core::request::TranscodeRequest;
//! use rendermux_core::config::TranscodeConfig;
//! use rendermux_options::bitrate::video_bitrate;
//!
//! let media = MediaDescriptor::new(ContainerFormat::Mkv)
//!     .with_video(VideoTrackInfo::new(0, VideoCodec::H264).with_resolution(1920, 1080));
//! let mut renderer = RendererProfile::new("tv", "TV");
//! renderer.max_bitrate_kbps = 10_000;
//!
//! let request = TranscodeRequest::new("/media/movie.mkv", media, renderer);
//! let config = TranscodeConfig::default();
//! let args = video_bitrate(&request, &config);
//! assert!(args.contains(&"-maxrate".to_string()));
//! ```

pub mod bitrate;
pub mod custom;
pub mod filters;
pub mod output;

pub use bitrate::video_bitrate;
pub use custom::custom_specifies;
pub use filters::{video_filters, VideoFilterPlan};
pub use output::transcode_options;
