//! The subtitle-capable alternate transcoding engine.
//!
//! Wraps the alternate transcoder (MEncoder-family command line) that
//! renders embedded text and VOBSUB subtitles more faithfully than the
//! filter graph. It receives requests via subtitle deferral and can also be
//! selected directly by the registry.

use rendermux_core::renderer::RendererFlags;
use rendermux_core::{Result, TranscodeConfig, TranscodeRequest};
use rendermux_engine::{
    compat, Engine, EngineDescriptor, EnginePurpose, EngineRegistry, TranscodeJob,
};
use rendermux_options::bitrate::{compute_maxrate_kbps, effective_ceiling_kbps};

use crate::pipe::pipe_name;
use crate::plan::{execute, PipelinePlan, PlannedProcess};

const DESCRIPTOR: EngineDescriptor =
    EngineDescriptor::new("subtitle-transcode", "Subtitle Transcode", EnginePurpose::FileVideo)
        .with_internal_subtitles()
        .with_external_subtitles()
        .with_time_seek();

/// Alternate transcoding engine with native subtitle rendering.
#[derive(Debug, Default)]
pub struct SubtitleTranscodeEngine;

impl SubtitleTranscodeEngine {
    /// Create the engine.
    pub fn new() -> Self {
        Self
    }

    /// Build the (pure) pipeline plan.
    pub fn plan(&self, request: &TranscodeRequest, config: &TranscodeConfig) -> PipelinePlan {
        let output = config.pipe_dir.join(pipe_name(DESCRIPTOR.id.0, None));

        let mut args: Vec<String> = vec![request.resource.display().to_string(), "-quiet".into()];
        if request.range.start > 0.0 {
            args.push("-ss".into());
            args.push(format!("{}", request.range.start));
        }

        if let Some(sub) = request.subtitle.as_ref().filter(|s| !s.is_off()) {
            match &sub.external {
                Some(path) => {
                    args.push("-sub".into());
                    args.push(path.display().to_string());
                }
                None => {
                    args.push("-sid".into());
                    args.push(sub.id.to_string());
                }
            }
            if let Some(enc) = &config.subtitle_charenc {
                args.push("-subcp".into());
                args.push(enc.clone());
            }
        }

        if let Some(index) = request.audio_index() {
            args.push("-aid".into());
            args.push(index.to_string());
        }

        let ceiling = effective_ceiling_kbps(request, config);
        let vbitrate = if ceiling == 0 {
            5000
        } else {
            compute_maxrate_kbps(request, config, ceiling)
        };
        let vcodec = if request.renderer.has(RendererFlags::LEGACY_MPEGPS) {
            "mpeg2video"
        } else {
            "libx264"
        };
        args.push("-oac".into());
        args.push("lavc".into());
        args.push("-ovc".into());
        args.push("lavc".into());
        args.push("-lavcopts".into());
        args.push(format!(
            "vcodec={vcodec}:vbitrate={vbitrate}:acodec=ac3:abitrate={}",
            config.audio_bitrate_kbps
        ));
        args.push("-of".into());
        args.push(
            if request.renderer.has(RendererFlags::LEGACY_MPEGPS) {
                "mpeg"
            } else {
                "lavf"
            }
            .into(),
        );
        args.push("-o".into());
        args.push(output.display().to_string());

        PipelinePlan::simple(
            PlannedProcess::new(DESCRIPTOR.id.0, config.alternate_path.clone(), args),
            output,
        )
    }
}

impl Engine for SubtitleTranscodeEngine {
    fn descriptor(&self) -> &EngineDescriptor {
        &DESCRIPTOR
    }

    fn is_compatible(&self, request: &TranscodeRequest) -> bool {
        compat::container_accepted(&request.media, &[])
            && compat::subtitle_accepted(&DESCRIPTOR, request)
            && compat::default_audio_accepted(request)
    }

    fn launch(
        &self,
        request: &TranscodeRequest,
        config: &TranscodeConfig,
        _registry: &EngineRegistry,
    ) -> Result<Box<dyn TranscodeJob>> {
        let handle = execute(self.plan(request, config), config)?;
        Ok(Box::new(handle))
    }
}
