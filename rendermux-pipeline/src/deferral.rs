//! Engine deferral decisions.
//!
//! A deferral is evaluated as an ordered list of (predicate, reason) checks
//! folded with short-circuit AND: every check must hold for the request to
//! be handed to the other engine, and the first failing check's reason is
//! the decision's explanation. Decision logic stays pure; callers log the
//! outcome.

use rendermux_core::config::SubtitlePolicy;
use rendermux_core::format::{SubtitleKind, VideoCodec};
use rendermux_core::renderer::RendererFlags;
use rendermux_core::request::TranscodeRequest;
use tracing::warn;

/// One deferral precondition with its diagnostic reason.
#[derive(Debug, Clone, Copy)]
pub struct Check {
    /// Whether the precondition holds.
    pub ok: bool,
    /// Human-readable reason logged when this check blocks the deferral.
    pub reason: &'static str,
}

impl Check {
    /// Build a check.
    pub fn new(ok: bool, reason: &'static str) -> Self {
        Self { ok, reason }
    }
}

/// Outcome of a deferral evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferralDecision {
    /// Every precondition held; hand the request to the other engine.
    Defer,
    /// A precondition failed; keep the request, for the given reason.
    Keep {
        /// Reason of the first failing check.
        reason: &'static str,
    },
}

impl DeferralDecision {
    /// Whether the decision is to defer.
    pub fn is_defer(&self) -> bool {
        matches!(self, Self::Defer)
    }
}

/// Fold an ordered check list with short-circuit AND.
pub fn evaluate(checks: &[Check]) -> DeferralDecision {
    for check in checks {
        if !check.ok {
            return DeferralDecision::Keep { reason: check.reason };
        }
    }
    DeferralDecision::Defer
}

/// Should a transcode request be handed to the TS remux engine instead?
///
/// All preconditions must hold; any single failure keeps the transcoding
/// engine. Evaluation order only affects which reason is reported, never
/// the outcome. An H.264 stream whose level could not be parsed passes the
/// level check with a warning rather than blocking the remux.
pub fn remux_deferral(request: &TranscodeRequest) -> DeferralDecision {
    let video = match request.media.default_video() {
        Some(video) => video,
        None => return DeferralDecision::Keep { reason: "no video stream" },
    };
    let renderer = &request.renderer;

    let level_ok = if video.codec == VideoCodec::H264 {
        match video.h264_level {
            Some(level) => renderer.accepts_h264_level(level),
            None => {
                warn!(
                    resource = %request.resource.display(),
                    "H.264 level unknown, allowing remux"
                );
                true
            }
        }
    } else {
        true
    };

    let subtitle_burn = request
        .subtitle
        .as_ref()
        .map(|s| !s.is_off())
        .unwrap_or(false);
    let letterbox = renderer.has(RendererFlags::KEEP_ASPECT_RATIO)
        && video.aspect.map(|a| !a.is_sixteen_nine()).unwrap_or(false);
    let bt601_rejected = renderer.has(RendererFlags::REJECT_BT601)
        && video.color_matrix.as_deref() == Some("bt601");

    evaluate(&[
        Check::new(
            renderer.has(RendererFlags::MUXED_H264_TS),
            "renderer does not accept muxed H.264/MPEG-TS",
        ),
        Check::new(!request.from_transcode_folder, "request re-entered via transcode folder"),
        Check::new(!subtitle_burn, "subtitle burn-in required"),
        Check::new(!request.script_filter_engine, "script filter engine in use"),
        Check::new(level_ok, "H.264 level exceeds renderer ceiling"),
        Check::new(request.media.ts_muxable, "stream not flagged muxable"),
        Check::new(!video.aspect_mismatch(), "container/track aspect mismatch"),
        Check::new(
            !request.media.web_dl || renderer.has(RendererFlags::PS3_COMPAT),
            "WEB-DL source on non-PS3-class renderer",
        ),
        Check::new(!bt601_rejected, "renderer rejects BT.601 color matrix"),
        Check::new(!letterbox, "letterboxing required"),
        Check::new(
            renderer.fits_resolution(video.width, video.height),
            "resolution exceeds renderer limits",
        ),
    ])
}

/// Should a transcode request with a problematic embedded subtitle be handed
/// to the subtitle-capable alternate engine?
///
/// "Problematic" means an embedded track the filter graph handles poorly:
/// non-ASS text formats and picture-based VOBSUB. Availability of the
/// alternate engine is the caller's concern.
pub fn subtitle_deferral(request: &TranscodeRequest, policy: &SubtitlePolicy) -> DeferralDecision {
    let subtitle = request.subtitle.as_ref().filter(|s| !s.is_off());
    let problematic = subtitle
        .map(|s| {
            !s.is_external()
                && ((s.kind.is_text() && s.kind != SubtitleKind::Ass)
                    || s.kind == SubtitleKind::Vobsub)
        })
        .unwrap_or(false);

    evaluate(&[
        Check::new(
            request.renderer.custom_options.is_empty(),
            "renderer output override in effect",
        ),
        Check::new(subtitle.is_some(), "no subtitle selected"),
        Check::new(policy.defer_problematic, "problematic-subtitle deferral disabled"),
        Check::new(problematic, "subtitle type handled by the filter graph"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rendermux_core::format::{AudioCodec, ContainerFormat};
    use rendermux_core::media::{AudioTrackInfo, MediaDescriptor, SubtitleTrackInfo, VideoTrackInfo};
    use rendermux_core::rational::Rational;
    use rendermux_core::renderer::RendererProfile;

    fn muxable_request() -> TranscodeRequest {
        let media = MediaDescriptor::new(ContainerFormat::Mp4)
            .with_video(
                VideoTrackInfo::new(0, VideoCodec::H264)
                    .with_resolution(1920, 1080)
                    .with_aspect(Rational::new(16, 9))
                    .with_h264_level(31),
            )
            .with_audio(AudioTrackInfo::new(1, AudioCodec::Ac3, "eng"));
        let mut renderer = RendererProfile::new("tv", "TV");
        renderer.flags |= RendererFlags::MUXED_H264_TS;
        TranscodeRequest::new("/m.mp4", media, renderer)
    }

    #[test]
    fn test_evaluate_first_failure_wins() {
        let decision = evaluate(&[
            Check::new(true, "a"),
            Check::new(false, "b"),
            Check::new(false, "c"),
        ]);
        assert_eq!(decision, DeferralDecision::Keep { reason: "b" });
    }

    #[test]
    fn test_remux_deferral_passes_for_clean_h264() {
        assert!(remux_deferral(&muxable_request()).is_defer());
    }

    #[test]
    fn test_no_muxed_ts_support_blocks() {
        let mut req = muxable_request();
        req.renderer.flags = RendererFlags::empty();
        let decision = remux_deferral(&req);
        assert_eq!(
            decision,
            DeferralDecision::Keep { reason: "renderer does not accept muxed H.264/MPEG-TS" }
        );
    }

    #[test]
    fn test_subtitle_burn_blocks_remux() {
        let mut req = muxable_request();
        req.subtitle = Some(SubtitleTrackInfo::embedded(2, SubtitleKind::Subrip, "eng"));
        assert!(!remux_deferral(&req).is_defer());
    }

    #[test]
    fn test_off_sentinel_does_not_block_remux() {
        let mut req = muxable_request();
        req.subtitle = Some(SubtitleTrackInfo::off());
        assert!(remux_deferral(&req).is_defer());
    }

    #[test]
    fn test_level_over_ceiling_blocks() {
        let mut req = muxable_request();
        req.renderer.max_h264_level = Some(rendermux_core::format::H264Level::L4_1);
        req.media.video[0].h264_level = Some(51);
        let decision = remux_deferral(&req);
        assert_eq!(
            decision,
            DeferralDecision::Keep { reason: "H.264 level exceeds renderer ceiling" }
        );
    }

    #[test]
    fn test_intermediate_level_within_ceiling_defers() {
        // Level 3.2 is below a 4.1 ceiling and must not block the remux.
        let mut req = muxable_request();
        req.renderer.max_h264_level = Some(rendermux_core::format::H264Level::L4_1);
        req.media.video[0].h264_level = Some(32);
        assert!(remux_deferral(&req).is_defer());
    }

    #[test]
    fn test_unknown_level_passes_with_warning() {
        let mut req = muxable_request();
        req.renderer.max_h264_level = Some(rendermux_core::format::H264Level::L4_1);
        req.media.video[0].h264_level = None;
        assert!(remux_deferral(&req).is_defer());
    }

    #[test]
    fn test_web_dl_blocks_unless_ps3_class() {
        let mut req = muxable_request();
        req.media.web_dl = true;
        assert!(!remux_deferral(&req).is_defer());

        req.renderer.flags |= RendererFlags::PS3_COMPAT;
        assert!(remux_deferral(&req).is_defer());
    }

    #[test]
    fn test_bt601_blocks_when_rejected() {
        let mut req = muxable_request();
        req.media.video[0].color_matrix = Some("bt601".into());
        assert!(remux_deferral(&req).is_defer());

        req.renderer.flags |= RendererFlags::REJECT_BT601;
        assert!(!remux_deferral(&req).is_defer());
    }

    #[test]
    fn test_letterbox_blocks() {
        let mut req = muxable_request();
        req.renderer.flags |= RendererFlags::KEEP_ASPECT_RATIO;
        req.media.video[0].aspect = Some(Rational::new(4, 3));
        assert!(!remux_deferral(&req).is_defer());
    }

    #[test]
    fn test_resolution_limit_blocks() {
        let mut req = muxable_request();
        req.renderer.max_width = 1280;
        req.renderer.max_height = 720;
        let decision = remux_deferral(&req);
        assert_eq!(
            decision,
            DeferralDecision::Keep { reason: "resolution exceeds renderer limits" }
        );
    }

    #[test]
    fn test_not_muxable_blocks() {
        let mut req = muxable_request();
        req.media.ts_muxable = false;
        assert!(!remux_deferral(&req).is_defer());
    }

    #[test]
    fn test_aspect_mismatch_blocks() {
        let mut req = muxable_request();
        req.media.video[0].container_aspect = Some(Rational::new(4, 3));
        assert!(!remux_deferral(&req).is_defer());
    }

    fn policy_deferring() -> SubtitlePolicy {
        SubtitlePolicy {
            defer_problematic: true,
            ..SubtitlePolicy::default()
        }
    }

    /// Scenario: embedded VOBSUB selected with the deferral policy enabled
    /// must delegate instead of burning through the filter graph.
    #[test]
    fn test_embedded_vobsub_defers() {
        let mut req = muxable_request();
        req.subtitle = Some(SubtitleTrackInfo::embedded(2, SubtitleKind::Vobsub, "eng"));
        assert!(subtitle_deferral(&req, &policy_deferring()).is_defer());
    }

    #[test]
    fn test_embedded_subrip_defers() {
        let mut req = muxable_request();
        req.subtitle = Some(SubtitleTrackInfo::embedded(2, SubtitleKind::Subrip, "eng"));
        assert!(subtitle_deferral(&req, &policy_deferring()).is_defer());
    }

    #[test]
    fn test_embedded_ass_is_not_problematic() {
        let mut req = muxable_request();
        req.subtitle = Some(SubtitleTrackInfo::embedded(2, SubtitleKind::Ass, "eng"));
        assert!(!subtitle_deferral(&req, &policy_deferring()).is_defer());
    }

    #[test]
    fn test_external_subtitle_is_not_deferred() {
        let mut req = muxable_request();
        req.subtitle = Some(SubtitleTrackInfo::external(
            0,
            SubtitleKind::Subrip,
            "eng",
            "/m.srt".into(),
        ));
        assert!(!subtitle_deferral(&req, &policy_deferring()).is_defer());
    }

    #[test]
    fn test_policy_disabled_blocks_subtitle_deferral() {
        let mut req = muxable_request();
        req.subtitle = Some(SubtitleTrackInfo::embedded(2, SubtitleKind::Vobsub, "eng"));
        let decision = subtitle_deferral(&req, &SubtitlePolicy::default());
        assert_eq!(
            decision,
            DeferralDecision::Keep { reason: "problematic-subtitle deferral disabled" }
        );
    }

    #[test]
    fn test_output_override_blocks_subtitle_deferral() {
        let mut req = muxable_request();
        req.renderer.custom_options = vec!["-f".into(), "matroska".into()];
        req.subtitle = Some(SubtitleTrackInfo::embedded(2, SubtitleKind::Vobsub, "eng"));
        assert!(!subtitle_deferral(&req, &policy_deferring()).is_defer());
    }
}
