//! The TS remux engine.
//!
//! Repackages already-compatible elementary streams into MPEG-TS without
//! re-encoding: one ffmpeg process extracts the video stream and one per
//! selected audio track extracts audio, each into its own named pipe; the
//! TS muxer reads the pipes per the generated mux script and writes the
//! final stream to the output pipe.

use std::path::Path;

use rendermux_core::format::{AudioCodec, VideoCodec};
use rendermux_core::media::AudioTrackInfo;
use rendermux_core::renderer::RendererFlags;
use rendermux_core::{Result, TranscodeConfig, TranscodeRequest};
use rendermux_engine::{
    compat, Engine, EngineDescriptor, EnginePurpose, EngineRegistry, TranscodeJob,
};
use tracing::debug;

use crate::muxscript::{MuxScript, MuxStream};
use crate::pipe::pipe_name;
use crate::plan::{execute, PipelinePlan, PlannedProcess};

const DESCRIPTOR: EngineDescriptor =
    EngineDescriptor::new("ts-remux", "MPEG-TS Remux", EnginePurpose::FileVideo);

/// Remux engine built around the external TS muxer.
#[derive(Debug, Default)]
pub struct TsRemuxEngine;

impl TsRemuxEngine {
    /// Create the engine.
    pub fn new() -> Self {
        Self
    }

    /// Build the (pure) pipeline plan for a remux.
    ///
    /// The plan carries the full topology: the elementary-stream producer
    /// commands, the mux script describing each pipe, and the muxer as the
    /// terminal process.
    pub fn plan(&self, request: &TranscodeRequest, config: &TranscodeConfig) -> PipelinePlan {
        let engine = DESCRIPTOR.id.0;
        let video_pipe = config.pipe_dir.join(pipe_name(engine, Some("video")));
        let output_pipe = config.pipe_dir.join(pipe_name(engine, None));
        let script_path = config.pipe_dir.join(pipe_name(engine, Some("meta")));

        let mut pipes = vec![video_pipe.clone()];
        let mut processes = Vec::new();
        let mut script = MuxScript::new();

        let video = request.media.default_video();
        processes.push(PlannedProcess::new(
            format!("{engine}/video"),
            config.ffmpeg_path.clone(),
            extract_args(
                request,
                "-an",
                &video_extraction(video.map(|v| v.codec)),
                &video_pipe,
            ),
        ));
        if let Some(video) = video {
            let fps = video.frame_rate.map(|r| r.to_f64());
            let level = video.h264_level.map(|l| format!("{}.{}", l / 10, l % 10));
            script.push(MuxStream::video(video.codec, video_pipe, fps, level.as_deref()));
        }

        let audio = request.audio.as_ref().or_else(|| request.media.default_audio());
        if let Some(audio) = audio {
            let audio_pipe = config.pipe_dir.join(pipe_name(engine, Some("audio")));
            let wrap_pcm = audio.codec.is_dts()
                && request.renderer.has(RendererFlags::WRAP_DTS_IN_PCM);
            let (codec_args, stream) = audio_extraction(audio, wrap_pcm, &audio_pipe);
            processes.push(PlannedProcess::new(
                format!("{engine}/audio"),
                config.ffmpeg_path.clone(),
                extract_args(request, "-vn", &codec_args, &audio_pipe),
            ));
            script.push(stream);
            pipes.push(audio_pipe);
        }

        pipes.push(output_pipe.clone());
        processes.push(PlannedProcess::new(
            engine,
            config.tsmuxer_path.clone(),
            vec![
                script_path.display().to_string(),
                output_pipe.display().to_string(),
            ],
        ));

        PipelinePlan {
            pipes,
            mux_script: Some((script_path, script)),
            processes,
            output: output_pipe,
        }
    }
}

/// Elementary-stream extraction command: copy one stream class to a pipe.
fn extract_args(
    request: &TranscodeRequest,
    drop_flag: &str,
    codec_args: &[&str],
    pipe: &Path,
) -> Vec<String> {
    let mut args: Vec<String> = vec!["-y".into(), "-loglevel".into(), "warning".into()];
    if request.range.start > 0.0 {
        args.push("-ss".into());
        args.push(format!("{}", request.range.start));
    }
    args.push("-i".into());
    args.push(request.resource.display().to_string());
    args.push(drop_flag.into());
    args.push("-sn".into());
    args.extend(codec_args.iter().map(|s| s.to_string()));
    args.push(pipe.display().to_string());
    args
}

/// Video extraction flags: copy to the codec's elementary-stream format.
///
/// AVC/HEVC from ISO-BMFF or Matroska sources is length-prefixed without
/// Annex-B start codes; the muxer only parses Annex-B, so the conversion
/// bitstream filter is applied on the way out.
fn video_extraction(codec: Option<VideoCodec>) -> Vec<&'static str> {
    match codec {
        Some(VideoCodec::H265) => vec!["-c:v", "copy", "-bsf:v", "hevc_mp4toannexb", "-f", "hevc"],
        Some(VideoCodec::Mpeg2) => vec!["-c:v", "copy", "-f", "mpeg2video"],
        Some(VideoCodec::Vc1) => vec!["-c:v", "copy", "-f", "vc1"],
        _ => vec!["-c:v", "copy", "-bsf:v", "h264_mp4toannexb", "-f", "h264"],
    }
}

/// Audio extraction flags and the matching mux-script stream entry.
fn audio_extraction(
    audio: &AudioTrackInfo,
    wrap_pcm: bool,
    pipe: &Path,
) -> (Vec<&'static str>, MuxStream) {
    if wrap_pcm {
        // Renderers that cannot bitstream DTS get it decoded to LPCM.
        let stream = MuxStream::lpcm(
            pipe.to_path_buf(),
            u32::from(audio.channels),
            audio.sample_rate,
            u32::from(audio.bits_per_sample.unwrap_or(16)),
        );
        return (vec!["-c:a", "pcm_s16be", "-f", "s16be"], stream);
    }
    let format = match audio.codec {
        AudioCodec::Aac => "adts",
        AudioCodec::Dts | AudioCodec::DtsHd => "dts",
        _ => "ac3",
    };
    let stream = MuxStream::audio(audio.codec, pipe.to_path_buf());
    (vec!["-c:a", "copy", "-f", format], stream)
}

impl Engine for TsRemuxEngine {
    fn descriptor(&self) -> &EngineDescriptor {
        &DESCRIPTOR
    }

    fn is_compatible(&self, request: &TranscodeRequest) -> bool {
        compat::container_accepted(&request.media, &[])
            && compat::subtitle_accepted(&DESCRIPTOR, request)
            && compat::default_audio_accepted(request)
            && compat::remux_codecs_accepted(request)
    }

    fn launch(
        &self,
        request: &TranscodeRequest,
        config: &TranscodeConfig,
        _registry: &EngineRegistry,
    ) -> Result<Box<dyn TranscodeJob>> {
        let plan = self.plan(request, config);
        debug!(streams = plan.mux_script.as_ref().map(|(_, s)| s.len()).unwrap_or(0),
            "Remux plan built");
        let handle = execute(plan, config)?;
        Ok(Box::new(handle))
    }
}
