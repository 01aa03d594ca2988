//! Mux script synthesis for the TS muxer.
//!
//! The muxer is driven by a line-oriented text file: one header line of
//! global options, then one line per elementary stream of the form
//! `TYPE, "pipe-path", key=value, ..., track=N`. The script is written
//! synchronously before the muxer process starts so the muxer never races
//! an incomplete file.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use rendermux_core::format::{AudioCodec, VideoCodec};
use rendermux_core::{EngineError, Result};
use tracing::debug;

/// Default header options: VBR with a generous VBV window, no PCR on the
/// video PID, and a fresh PES per audio frame.
const DEFAULT_HEADER: &str =
    "MUXOPT --no-pcr-on-video-pid --new-audio-pes --no-asyncio --vbr --vbv-len=500";

/// One elementary stream entry in a mux script.
#[derive(Debug, Clone)]
pub struct MuxStream {
    kind: &'static str,
    source: PathBuf,
    params: Vec<String>,
}

impl MuxStream {
    /// A video stream read from `source`.
    ///
    /// H.264 input gets SEI timing insertion and SPS/PGS repetition, which
    /// hardware players need for mid-stream joins; an explicit level ceiling
    /// is stamped when known. `fps` pins the timing when the source stream
    /// carries none.
    pub fn video(codec: VideoCodec, source: PathBuf, fps: Option<f64>, level: Option<&str>) -> Self {
        let kind = video_stream_type(codec);
        let mut params = Vec::new();
        if codec == VideoCodec::H264 {
            if let Some(level) = level {
                params.push(format!("level={level}"));
            }
            params.push("insertSEI".into());
            params.push("contSPS".into());
        }
        if let Some(fps) = fps {
            params.push(format!("fps={fps}"));
        }
        Self { kind, source, params }
    }

    /// An audio stream read from `source`.
    pub fn audio(codec: AudioCodec, source: PathBuf) -> Self {
        Self {
            kind: audio_stream_type(codec),
            source,
            params: Vec::new(),
        }
    }

    /// LPCM audio with explicit sample layout, used when DTS is wrapped in
    /// PCM for renderers that cannot bitstream it.
    pub fn lpcm(source: PathBuf, channels: u32, sample_rate: u32, bits: u32) -> Self {
        Self {
            kind: "A_LPCM",
            source,
            params: vec![
                format!("bitsPerSample={bits}"),
                format!("sampleRate={sample_rate}"),
                format!("channels={channels}"),
            ],
        }
    }

    fn render(&self, track: usize, out: &mut String) {
        let _ = write!(out, "{}, \"{}\"", self.kind, self.source.display());
        for param in &self.params {
            let _ = write!(out, ", {param}");
        }
        let _ = writeln!(out, ", track={track}");
    }
}

fn video_stream_type(codec: VideoCodec) -> &'static str {
    match codec {
        VideoCodec::H264 => "V_MPEG4/ISO/AVC",
        VideoCodec::H265 => "V_MPEGH/ISO/HEVC",
        VideoCodec::Vc1 => "V_MS/VFW/WVC1",
        _ => "V_MPEG-2",
    }
}

fn audio_stream_type(codec: AudioCodec) -> &'static str {
    match codec {
        AudioCodec::Aac => "A_AAC",
        AudioCodec::Dts | AudioCodec::DtsHd => "A_DTS",
        AudioCodec::Lpcm => "A_LPCM",
        _ => "A_AC3",
    }
}

/// An in-memory mux script, rendered or written on demand.
#[derive(Debug, Clone)]
pub struct MuxScript {
    header: String,
    streams: Vec<MuxStream>,
}

impl MuxScript {
    /// A script with the default header options.
    pub fn new() -> Self {
        Self {
            header: DEFAULT_HEADER.to_string(),
            streams: Vec::new(),
        }
    }

    /// Replace the header option line.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Append an elementary stream; tracks are numbered in push order
    /// starting at 1.
    pub fn push(&mut self, stream: MuxStream) {
        self.streams.push(stream);
    }

    /// Number of streams in the script.
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// True when no streams were added.
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Render the script text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.header);
        for (i, stream) in self.streams.iter().enumerate() {
            stream.render(i + 1, &mut out);
        }
        out
    }

    /// Write the script to disk before the muxer starts.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), streams = self.streams.len(), "Writing mux script");
        fs::write(path, self.render())
            .map_err(|e| EngineError::Config(format!("cannot write mux script {}: {e}", path.display())))
    }
}

impl Default for MuxScript {
    fn default() -> Self {
        Self::new()
    }
}
