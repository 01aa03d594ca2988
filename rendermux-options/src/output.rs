//! Output codec and container option synthesis.

use rendermux_core::config::TranscodeConfig;
use rendermux_core::format::VideoCodec;
use rendermux_core::renderer::RendererFlags;
use rendermux_core::request::TranscodeRequest;
use tracing::debug;

use crate::custom::custom_specifies;

/// Build the codec/container/mapping tokens for an FFmpeg-family transcode.
///
/// Container and video codec follow the renderer's flags: legacy devices get
/// MPEG-2 in MPEG-PS, H.265-capable devices keep HEVC sources as HEVC, and
/// everything else gets H.264 in MPEG-TS with the renderer's level ceiling.
/// Audio is passed through when the renderer accepts the source codec,
/// otherwise re-encoded to AAC or AC-3 per renderer preference. Flags the
/// renderer's custom options already specify are never emitted.
pub fn transcode_options(request: &TranscodeRequest, config: &TranscodeConfig) -> Vec<String> {
    let custom = &request.renderer.custom_options;
    let mut args = Vec::new();

    // Explicit stream map when the chosen audio track is not the default.
    if let Some(index) = request.audio_index() {
        if index != 0 {
            args.push("-map".into());
            args.push("0:v:0".into());
            args.push("-map".into());
            args.push(format!("0:a:{index}"));
        }
    }

    push_video_codec(&mut args, request, custom);
    push_audio_codec(&mut args, request, config, custom);

    if !custom_specifies(custom, &["-f"]) {
        let format = if request.renderer.has(RendererFlags::LEGACY_MPEGPS) {
            "vob"
        } else {
            "mpegts"
        };
        args.push("-f".into());
        args.push(format.into());
    }

    args.extend(custom.iter().cloned());
    debug!(?args, "Transcode output options built");
    args
}

fn push_video_codec(args: &mut Vec<String>, request: &TranscodeRequest, custom: &[String]) {
    if custom_specifies(custom, &["-c:v", "-vcodec"]) {
        return;
    }
    args.push("-c:v".into());

    if request.renderer.has(RendererFlags::LEGACY_MPEGPS) {
        args.push("mpeg2video".into());
        return;
    }

    let source_is_hevc = request
        .media
        .default_video()
        .map(|v| v.codec == VideoCodec::H265)
        .unwrap_or(false);
    if source_is_hevc && request.renderer.has(RendererFlags::H265_SUPPORT) {
        args.push("libx265".into());
        return;
    }

    if request.renderer.supports_video_codec(VideoCodec::H264)
        || request.renderer.has(RendererFlags::MUXED_H264_TS)
        || request.renderer.video_codecs.is_empty()
    {
        args.push("libx264".into());
        if let Some(level) = request.renderer.max_h264_level {
            if !custom_specifies(custom, &["-level"]) {
                args.push("-level".into());
                args.push(level.as_arg().into());
            }
        }
        return;
    }

    // MPEG-2 fallback for devices with no H.264 support at all.
    args.push("mpeg2video".into());
}

fn push_audio_codec(
    args: &mut Vec<String>,
    request: &TranscodeRequest,
    config: &TranscodeConfig,
    custom: &[String],
) {
    if custom_specifies(custom, &["-c:a", "-acodec", "-an"]) {
        return;
    }
    args.push("-c:a".into());

    let passthrough = request
        .audio
        .as_ref()
        .map(|a| {
            (a.codec.is_ac3() && request.renderer.has(RendererFlags::AC3_PASSTHROUGH))
                || (a.codec.is_dts() && request.renderer.has(RendererFlags::DTS_PASSTHROUGH))
        })
        .unwrap_or(false);
    if passthrough {
        args.push("copy".into());
        return;
    }

    if request.renderer.has(RendererFlags::AAC_TRANSCODE) {
        args.push("aac".into());
        args.push("-b:a".into());
        args.push("320k".into());
        args.push("-ac".into());
        args.push("2".into());
        return;
    }

    args.push("ac3".into());
    args.push("-b:a".into());
    args.push(format!("{}k", config.audio_bitrate_kbps));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rendermux_core::format::{AudioCodec, ContainerFormat, H264Level};
    use rendermux_core::media::{AudioTrackInfo, MediaDescriptor, VideoTrackInfo};
    use rendermux_core::renderer::RendererProfile;

    fn request() -> TranscodeRequest {
        let media = MediaDescriptor::new(ContainerFormat::Mkv)
            .with_video(VideoTrackInfo::new(0, VideoCodec::H264).with_resolution(1920, 1080))
            .with_audio(AudioTrackInfo::new(1, AudioCodec::Ac3, "eng"))
            .with_audio(AudioTrackInfo::new(2, AudioCodec::Dts, "fre"));
        TranscodeRequest::new("/m.mkv", media, RendererProfile::new("tv", "TV"))
    }

    fn tokens(args: &[String]) -> Vec<&str> {
        args.iter().map(String::as_str).collect()
    }

    /// Scenario: two audio tracks, selected track is index 1. The builder
    /// must emit an explicit stream map, not rely on the default track.
    #[test]
    fn test_non_default_audio_emits_stream_map() {
        let mut req = request();
        req.audio = Some(req.media.audio[1].clone());
        let args = transcode_options(&req, &TranscodeConfig::default());
        let t = tokens(&args);
        let map_pos = t.iter().position(|&s| s == "-map").unwrap();
        assert_eq!(t[map_pos + 1], "0:v:0");
        assert_eq!(t[map_pos + 2], "-map");
        assert_eq!(t[map_pos + 3], "0:a:1");
    }

    #[test]
    fn test_default_audio_has_no_map() {
        let mut req = request();
        req.audio = Some(req.media.audio[0].clone());
        let args = transcode_options(&req, &TranscodeConfig::default());
        assert!(!args.contains(&"-map".to_string()));
    }

    #[test]
    fn test_default_h264_ts_output() {
        let args = transcode_options(&request(), &TranscodeConfig::default());
        let t = tokens(&args);
        assert!(t.windows(2).any(|w| w == ["-c:v", "libx264"]));
        assert!(t.windows(2).any(|w| w == ["-f", "mpegts"]));
    }

    #[test]
    fn test_level_ceiling_emitted() {
        let mut req = request();
        req.renderer.max_h264_level = Some(H264Level::L4_1);
        let args = transcode_options(&req, &TranscodeConfig::default());
        let t = tokens(&args);
        assert!(t.windows(2).any(|w| w == ["-level", "4.1"]));
    }

    #[test]
    fn test_legacy_mpegps_renderer() {
        let mut req = request();
        req.renderer.flags |= RendererFlags::LEGACY_MPEGPS;
        let args = transcode_options(&req, &TranscodeConfig::default());
        let t = tokens(&args);
        assert!(t.windows(2).any(|w| w == ["-c:v", "mpeg2video"]));
        assert!(t.windows(2).any(|w| w == ["-f", "vob"]));
    }

    #[test]
    fn test_hevc_kept_for_h265_renderer() {
        let mut req = request();
        req.media.video[0].codec = VideoCodec::H265;
        req.renderer.flags |= RendererFlags::H265_SUPPORT;
        let args = transcode_options(&req, &TranscodeConfig::default());
        assert!(tokens(&args).windows(2).any(|w| w == ["-c:v", "libx265"]));
    }

    #[test]
    fn test_mpeg2_fallback_without_h264_support() {
        let mut req = request();
        req.renderer.video_codecs = vec![VideoCodec::Mpeg2];
        let args = transcode_options(&req, &TranscodeConfig::default());
        assert!(tokens(&args).windows(2).any(|w| w == ["-c:v", "mpeg2video"]));
    }

    #[test]
    fn test_ac3_passthrough() {
        let mut req = request();
        req.renderer.flags |= RendererFlags::AC3_PASSTHROUGH;
        req.audio = Some(req.media.audio[0].clone());
        let args = transcode_options(&req, &TranscodeConfig::default());
        assert!(tokens(&args).windows(2).any(|w| w == ["-c:a", "copy"]));
    }

    #[test]
    fn test_dts_not_passed_through_without_flag() {
        let mut req = request();
        req.renderer.flags |= RendererFlags::AC3_PASSTHROUGH;
        req.audio = Some(req.media.audio[1].clone());
        let args = transcode_options(&req, &TranscodeConfig::default());
        assert!(tokens(&args).windows(2).any(|w| w == ["-c:a", "ac3"]));
    }

    #[test]
    fn test_aac_transcode_preference() {
        let mut req = request();
        req.renderer.flags |= RendererFlags::AAC_TRANSCODE;
        req.audio = Some(req.media.audio[0].clone());
        let args = transcode_options(&req, &TranscodeConfig::default());
        assert!(tokens(&args).windows(2).any(|w| w == ["-c:a", "aac"]));
    }

    #[test]
    fn test_custom_options_suppress_and_append() {
        let mut req = request();
        req.renderer.custom_options = vec!["-f".into(), "matroska".into()];
        let args = transcode_options(&req, &TranscodeConfig::default());
        let t = tokens(&args);
        // The builder's own -f is suppressed; the custom tokens come last.
        assert_eq!(t.iter().filter(|&&s| s == "-f").count(), 1);
        assert_eq!(&t[t.len() - 2..], &["-f", "matroska"]);
    }

    #[test]
    fn test_custom_codec_suppresses_builder_codec() {
        let mut req = request();
        req.renderer.custom_options = vec!["-c:v".into(), "libx265".into()];
        let args = transcode_options(&req, &TranscodeConfig::default());
        let t = tokens(&args);
        assert!(!t.windows(2).any(|w| w == ["-c:v", "libx264"]));
        assert!(t.windows(2).any(|w| w == ["-c:v", "libx265"]));
    }
}
