//! Video filter graph synthesis.
//!
//! Builds the ordered filter chain for an FFmpeg-family transcode: scaling
//! and padding against renderer limits, subtitle burn-in, stereoscopic
//! conversion, and the renderer's own filter override as the final element.
//! All parts are joined into a single filter-graph argument.

use std::path::PathBuf;

use rendermux_core::config::TranscodeConfig;
use rendermux_core::media::SubtitleTrackInfo;
use rendermux_core::renderer::RendererFlags;
use rendermux_core::request::TranscodeRequest;
use tracing::debug;

/// The synthesized filter graph plus any extra inputs it references.
///
/// External picture subtitles are separate ffmpeg inputs; their overlay
/// elements are wired by input index, so the engine must add
/// `extra_inputs` to the command in order after the main resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoFilterPlan {
    /// Extra input files referenced by the chain (input index 1, 2, ...).
    pub extra_inputs: Vec<PathBuf>,
    /// Ordered filter-chain elements.
    pub chain: Vec<String>,
    /// The chain references multiple streams and needs `-filter_complex`.
    pub complex: bool,
}

impl VideoFilterPlan {
    /// Whether no filtering is required.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// The joined filter-graph argument tokens, empty when no filtering.
    pub fn to_args(&self) -> Vec<String> {
        if self.chain.is_empty() {
            return Vec::new();
        }
        let flag = if self.complex { "-filter_complex" } else { "-vf" };
        vec![flag.to_string(), self.chain.join(",")]
    }
}

/// Build the video filter plan for a request.
pub fn video_filters(request: &TranscodeRequest, config: &TranscodeConfig) -> VideoFilterPlan {
    let mut plan = VideoFilterPlan::default();
    let Some(video) = request.media.default_video() else {
        return plan;
    };

    // Scale when the source exceeds the renderer's maximum.
    if let Some((w, h)) = scaled_dimensions(
        video.width,
        video.height,
        request.renderer.max_width,
        request.renderer.max_height,
        config.dimension_alignment,
    ) {
        debug!(from_w = video.width, from_h = video.height, to_w = w, to_h = h, "Scaling for renderer limits");
        plan.chain.push(format!("scale={w}:{h}"));
    }

    // Letterbox to 16:9 when the renderer wants its aspect kept and the
    // source is not already 16:9.
    let aspect_is_16_9 = video
        .aspect
        .map(|a| a.is_sixteen_nine())
        .unwrap_or(true);
    if request.renderer.has(RendererFlags::KEEP_ASPECT_RATIO) && !aspect_is_16_9 {
        plan.chain.push("pad=ih*16/9:ih:(ow-iw)/2:0".to_string());
    }

    // Subtitle burn-in.
    if let Some(sub) = request.subtitle.as_ref().filter(|s| !s.is_off()) {
        push_subtitle_filter(&mut plan, sub, request, config);
    }

    // Stereo 3D conversion, only when layout and target differ and both are
    // known.
    if let (Some(layout), Some(target)) = (video.stereo_layout, request.renderer.output_3d) {
        if layout != target {
            plan.chain
                .push(format!("stereo3d={}:{}", layout.filter_token(), target.filter_token()));
        }
    }

    // Renderer-level override is always the final element.
    if let Some(custom) = &request.renderer.custom_filter {
        plan.chain.push(custom.clone());
    }

    plan
}

fn push_subtitle_filter(
    plan: &mut VideoFilterPlan,
    sub: &SubtitleTrackInfo,
    request: &TranscodeRequest,
    config: &TranscodeConfig,
) {
    if sub.kind.is_text() {
        let mut filter = match &sub.external {
            Some(path) => format!("subtitles=filename='{}'", path.display()),
            None => {
                let si = subtitle_stream_index(request, sub);
                format!("subtitles='{}':si={}", request.resource.display(), si)
            }
        };
        if let Some(enc) = &config.subtitle_charenc {
            filter.push_str(&format!(":charenc={enc}"));
        }
        if config.fontconfig {
            filter.push_str(":force_style='Fontname=Arial'");
        }
        plan.chain.push(filter);
    } else {
        // Picture subtitles burn in through an overlay.
        plan.complex = true;
        match &sub.external {
            Some(path) => {
                plan.extra_inputs.push(path.clone());
                let input = plan.extra_inputs.len();
                plan.chain.push(format!("[0:v][{input}:s]overlay"));
            }
            None => {
                let si = subtitle_stream_index(request, sub);
                plan.chain.push(format!("[0:v][0:s:{si}]overlay"));
            }
        }
    }
}

/// Ordinal of the subtitle track among the container's embedded subtitles.
fn subtitle_stream_index(request: &TranscodeRequest, sub: &SubtitleTrackInfo) -> usize {
    request
        .media
        .subtitles
        .iter()
        .filter(|s| !s.is_external())
        .position(|s| s.id == sub.id)
        .unwrap_or(0)
}

/// Compute scaled dimensions when the source exceeds the limits.
///
/// Preserves the source proportions and rounds both dimensions down to the
/// configured alignment. Returns `None` when no scaling is needed.
fn scaled_dimensions(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
    alignment: u32,
) -> Option<(u32, u32)> {
    if width == 0 || height == 0 {
        return None;
    }
    let over_w = max_width != 0 && width > max_width;
    let over_h = max_height != 0 && height > max_height;
    if !over_w && !over_h {
        return None;
    }

    let scale_w = if max_width != 0 { max_width as f64 / width as f64 } else { f64::MAX };
    let scale_h = if max_height != 0 { max_height as f64 / height as f64 } else { f64::MAX };
    let scale = scale_w.min(scale_h);

    let align = alignment.max(1);
    let w = ((width as f64 * scale) as u32 / align) * align;
    let h = ((height as f64 * scale) as u32 / align) * align;
    Some((w.max(align), h.max(align)))
}
