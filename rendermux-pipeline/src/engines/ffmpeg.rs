//! The FFmpeg transcoding engine.
//!
//! The default engine for local video: a single ffmpeg process re-encodes
//! the resource and writes the muxed result to the output pipe. Before
//! building its own pipeline it evaluates the two deferral paths, subtitle
//! deferral first, then remux deferral, and delegates when one applies and
//! its target engine is active.

use rendermux_core::{Result, TranscodeConfig, TranscodeRequest};
use rendermux_engine::{
    compat, Engine, EngineDescriptor, EngineId, EnginePurpose, EngineRegistry, TranscodeJob,
};
use rendermux_options::{transcode_options, video_bitrate, video_filters};
use tracing::{debug, info};

use crate::deferral::{remux_deferral, subtitle_deferral, DeferralDecision};
use crate::pipe::pipe_name;
use crate::plan::{execute, PipelinePlan, PlannedProcess};

const DESCRIPTOR: EngineDescriptor =
    EngineDescriptor::new("ffmpeg-video", "FFmpeg Video", EnginePurpose::FileVideo)
        .with_internal_subtitles()
        .with_external_subtitles()
        .with_time_seek();

/// The engine id of the remux target.
pub(crate) const REMUX_ENGINE: EngineId = EngineId("ts-remux");
/// The engine id of the subtitle-capable alternate.
pub(crate) const SUBTITLE_ENGINE: EngineId = EngineId("subtitle-transcode");

/// FFmpeg-based transcoding engine.
#[derive(Debug, Default)]
pub struct FfmpegVideoEngine;

impl FfmpegVideoEngine {
    /// Create the engine.
    pub fn new() -> Self {
        Self
    }

    /// Build the (pure) pipeline plan for a transcode.
    pub fn plan(&self, request: &TranscodeRequest, config: &TranscodeConfig) -> PipelinePlan {
        let output = config.pipe_dir.join(pipe_name(DESCRIPTOR.id.0, None));

        let mut args: Vec<String> = vec!["-y".into(), "-loglevel".into(), "warning".into()];
        if request.range.start > 0.0 {
            args.push("-ss".into());
            args.push(format!("{}", request.range.start));
        }
        args.push("-i".into());
        args.push(request.resource.display().to_string());

        let filters = video_filters(request, config);
        for extra in &filters.extra_inputs {
            args.push("-i".into());
            args.push(extra.display().to_string());
        }
        if let Some(rate) = &request.forced_frame_rate {
            args.push("-r".into());
            args.push(rate.clone());
        }
        args.extend(filters.to_args());
        args.extend(video_bitrate(request, config));
        args.extend(transcode_options(request, config));
        if let Some(end) = request.range.end {
            args.push("-t".into());
            args.push(format!("{}", end - request.range.start));
        }
        args.push(output.display().to_string());

        PipelinePlan::simple(
            PlannedProcess::new(DESCRIPTOR.id.0, config.ffmpeg_path.clone(), args),
            output,
        )
    }
}

impl Engine for FfmpegVideoEngine {
    fn descriptor(&self) -> &EngineDescriptor {
        &DESCRIPTOR
    }

    fn is_compatible(&self, request: &TranscodeRequest) -> bool {
        compat::container_accepted(&request.media, &[])
            && compat::subtitle_accepted(&DESCRIPTOR, request)
    }

    fn launch(
        &self,
        request: &TranscodeRequest,
        config: &TranscodeConfig,
        registry: &EngineRegistry,
    ) -> Result<Box<dyn TranscodeJob>> {
        // Subtitle deferral is evaluated before remux deferral.
        match subtitle_deferral(request, &config.subtitles) {
            DeferralDecision::Defer => {
                if let Some(alternate) = registry.find_active(&SUBTITLE_ENGINE, config) {
                    info!(target_engine = %SUBTITLE_ENGINE, "Deferring problematic subtitle");
                    return alternate.launch(request, config, registry);
                }
                debug!("Subtitle deferral target inactive, transcoding locally");
            }
            DeferralDecision::Keep { reason } => {
                debug!(reason, "Not deferring to the subtitle engine");
            }
        }

        match remux_deferral(request) {
            DeferralDecision::Defer => {
                if let Some(remux) = registry.find_active(&REMUX_ENGINE, config) {
                    info!(target_engine = %REMUX_ENGINE, "Deferring to remux, no re-encode needed");
                    return remux.launch(request, config, registry);
                }
                debug!("Remux deferral target inactive, transcoding locally");
            }
            DeferralDecision::Keep { reason } => {
                debug!(reason, "Not deferring to the remux engine");
            }
        }

        let handle = execute(self.plan(request, config), config)?;
        Ok(Box::new(handle))
    }
}
