//! Concrete engine implementations.

mod ffmpeg;
mod subtitle;
mod tsremux;

pub use ffmpeg::FfmpegVideoEngine;
pub use subtitle::SubtitleTranscodeEngine;
pub use tsremux::TsRemuxEngine;
