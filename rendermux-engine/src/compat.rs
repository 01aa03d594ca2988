//! Renderer-compatibility checks shared by engine implementations.
//!
//! Every check resolves missing metadata to a definite answer; a descriptor
//! with no audio list or no codec string must fall through to the engine's
//! safe default instead of propagating a fault.

use rendermux_core::format::{AudioCodec, ContainerFormat, VideoCodec};
use rendermux_core::media::MediaDescriptor;
use rendermux_core::request::TranscodeRequest;

use crate::descriptor::EngineDescriptor;

/// Whether the container is present and not on the engine's denylist.
pub fn container_accepted(media: &MediaDescriptor, denylist: &[ContainerFormat]) -> bool {
    match media.container {
        None => false,
        Some(container) => !denylist.contains(&container),
    }
}

/// Whether the engine can handle the request's selected subtitle, if any.
pub fn subtitle_accepted(descriptor: &EngineDescriptor, request: &TranscodeRequest) -> bool {
    match &request.subtitle {
        None => true,
        Some(sub) if sub.is_off() => true,
        Some(sub) if sub.is_external() => descriptor.external_subtitles,
        Some(_) => descriptor.internal_subtitles,
    }
}

/// Whether the selected audio track satisfies an ordinal-default-only
/// restriction.
///
/// Some engines cannot map a non-default track; for those, more than one
/// audio track combined with a non-default selection is a rejection. An
/// absent audio list is accepted (nothing to mismap).
pub fn default_audio_accepted(request: &TranscodeRequest) -> bool {
    if request.media.audio.len() <= 1 {
        return true;
    }
    request.audio_is_default()
}

/// Video codecs a remux-class engine can repackage without re-encoding.
pub const REMUX_VIDEO_ALLOWLIST: &[VideoCodec] = &[
    VideoCodec::H264,
    VideoCodec::H265,
    VideoCodec::Mpeg2,
    VideoCodec::Vc1,
];

/// Audio codecs a remux-class engine can repackage without re-encoding.
pub const REMUX_AUDIO_ALLOWLIST: &[AudioCodec] = &[
    AudioCodec::Aac,
    AudioCodec::Ac3,
    AudioCodec::Eac3,
    AudioCodec::Dts,
    AudioCodec::DtsHd,
    AudioCodec::Lpcm,
];

/// Whether every stream the request carries is on the remux allow-lists.
///
/// A missing video track rejects (nothing to mux); a missing audio list is
/// accepted as video-only.
pub fn remux_codecs_accepted(request: &TranscodeRequest) -> bool {
    let Some(video) = request.media.default_video() else {
        return false;
    };
    if !REMUX_VIDEO_ALLOWLIST.contains(&video.codec) {
        return false;
    }
    match &request.audio {
        Some(audio) => REMUX_AUDIO_ALLOWLIST.contains(&audio.codec),
        None => request
            .media
            .audio
            .first()
            .map(|a| REMUX_AUDIO_ALLOWLIST.contains(&a.codec))
            .unwrap_or(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::EnginePurpose;
    use rendermux_core::format::SubtitleKind;
    use rendermux_core::media::{AudioTrackInfo, SubtitleTrackInfo, VideoTrackInfo};
    use rendermux_core::renderer::RendererProfile;
    use std::path::PathBuf;

    fn request(media: MediaDescriptor) -> TranscodeRequest {
        TranscodeRequest::new("/m.mkv", media, RendererProfile::new("r", "R"))
    }

    #[test]
    fn test_container_denylist() {
        let media = MediaDescriptor::new(ContainerFormat::Avi);
        assert!(!container_accepted(&media, &[ContainerFormat::Avi]));
        assert!(container_accepted(&media, &[ContainerFormat::Flv]));
    }

    #[test]
    fn test_missing_container_rejected() {
        let mut media = MediaDescriptor::new(ContainerFormat::Mkv);
        media.container = None;
        assert!(!container_accepted(&media, &[]));
    }

    #[test]
    fn test_subtitle_capabilities() {
        let no_subs = EngineDescriptor::new("a", "A", EnginePurpose::FileVideo);
        let internal_only = EngineDescriptor::new("b", "B", EnginePurpose::FileVideo)
            .with_internal_subtitles();

        let mut req = request(MediaDescriptor::new(ContainerFormat::Mkv));
        assert!(subtitle_accepted(&no_subs, &req));

        req.subtitle = Some(SubtitleTrackInfo::embedded(1, SubtitleKind::Ass, "eng"));
        assert!(!subtitle_accepted(&no_subs, &req));
        assert!(subtitle_accepted(&internal_only, &req));

        req.subtitle = Some(SubtitleTrackInfo::external(
            2,
            SubtitleKind::Subrip,
            "eng",
            PathBuf::from("/s.srt"),
        ));
        assert!(!subtitle_accepted(&internal_only, &req));
    }

    #[test]
    fn test_off_sentinel_always_accepted() {
        let no_subs = EngineDescriptor::new("a", "A", EnginePurpose::FileVideo);
        let mut req = request(MediaDescriptor::new(ContainerFormat::Mkv));
        req.subtitle = Some(SubtitleTrackInfo::off());
        assert!(subtitle_accepted(&no_subs, &req));
    }

    #[test]
    fn test_default_audio_restriction() {
        let media = MediaDescriptor::new(ContainerFormat::Mkv)
            .with_audio(AudioTrackInfo::new(1, AudioCodec::Ac3, "eng"))
            .with_audio(AudioTrackInfo::new(2, AudioCodec::Dts, "fre"));
        let mut req = request(media);
        assert!(default_audio_accepted(&req));

        req.audio = Some(req.media.audio[1].clone());
        assert!(!default_audio_accepted(&req));

        req.audio = Some(req.media.audio[0].clone());
        assert!(default_audio_accepted(&req));
    }

    #[test]
    fn test_remux_allowlist() {
        let media = MediaDescriptor::new(ContainerFormat::Mkv)
            .with_video(VideoTrackInfo::new(0, VideoCodec::H264))
            .with_audio(AudioTrackInfo::new(1, AudioCodec::Dts, "eng"));
        assert!(remux_codecs_accepted(&request(media)));

        let vp9 = MediaDescriptor::new(ContainerFormat::WebM)
            .with_video(VideoTrackInfo::new(0, VideoCodec::Vp9))
            .with_audio(AudioTrackInfo::new(1, AudioCodec::Opus, "eng"));
        assert!(!remux_codecs_accepted(&request(vp9)));
    }

    #[test]
    fn test_remux_missing_metadata_safe_defaults() {
        // No video track: nothing to mux, definite rejection.
        let no_video = MediaDescriptor::new(ContainerFormat::Mkv);
        assert!(!remux_codecs_accepted(&request(no_video)));

        // Video-only stream: accepted.
        let video_only = MediaDescriptor::new(ContainerFormat::Mkv)
            .with_video(VideoTrackInfo::new(0, VideoCodec::H264));
        assert!(remux_codecs_accepted(&request(video_only)));
    }
}
