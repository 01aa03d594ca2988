//! Subtitle track selection.
//!
//! The selection ladder mirrors long-standing renderer-server behavior and
//! its short-circuits are deliberate; every numbered step below is pinned by
//! a test. In priority order:
//!
//! 1. A track explicitly forced off short-circuits to no selection.
//! 2. An attached live subtitle source wins immediately on success.
//! 3. The first (audio language, subtitle language) pair whose audio side
//!    matches the chosen audio language resolves the subtitle token: "off"
//!    disables selection (unless external-over-off policy applies),
//!    otherwise a language search runs with external/embedded preference.
//! 4. Failing that, any external subtitle is taken when autoload allows.
//! 5. A choice that is globally disabled or carries the "off" language is
//!    cleared.
//! 6. Forced-subtitle policy searches for a forced-tagged track in the
//!    configured forced language; when "off" had matched, only forced-tag
//!    tracks are considered, otherwise the first external found is taken.
//! 7. Finally the renderer's own language list is walked.

use rendermux_core::config::SubtitlePolicy;
use rendermux_core::media::{MediaDescriptor, SubtitleTrackInfo};
use rendermux_core::renderer::RendererProfile;
use tracing::debug;

/// A source of externally fetched ("live") subtitles.
///
/// Implementations may hit the network; a failed or empty fetch simply lets
/// selection continue with the descriptor's own tracks.
pub trait LiveSubtitleSource {
    /// Fetch the live subtitle for the current resource, if any.
    fn fetch(&self) -> Option<SubtitleTrackInfo>;
}

/// Inputs to subtitle selection that come from the request rather than the
/// policy.
pub struct SubtitleContext<'a> {
    /// Parsed media metadata.
    pub media: &'a MediaDescriptor,
    /// The requesting renderer's profile.
    pub renderer: &'a RendererProfile,
    /// Language of the chosen audio track, when one was chosen.
    pub audio_language: Option<&'a str>,
    /// The request already forced subtitles off (id sentinel).
    pub forced_off: bool,
    /// Live subtitle source attached to the request, if any.
    pub live: Option<&'a dyn LiveSubtitleSource>,
}

/// Select the subtitle track for a request, or `None` for no subtitle.
pub fn select_subtitle(
    ctx: &SubtitleContext<'_>,
    policy: &SubtitlePolicy,
) -> Option<SubtitleTrackInfo> {
    // Step 1: explicit off sentinel.
    if ctx.forced_off {
        debug!("Subtitle selection forced off by request");
        return None;
    }

    // Step 2: live source wins immediately.
    if let Some(live) = ctx.live {
        if let Some(track) = live.fetch() {
            debug!(language = %track.language, "Live subtitle selected");
            return Some(track);
        }
    }

    let mut chosen: Option<SubtitleTrackInfo> = None;
    let mut off_matched = false;

    // Step 3: first pair whose audio side matches the chosen audio language.
    let pair = policy
        .pairs
        .iter()
        .find(|p| p.audio == "*" || Some(p.audio.as_str()) == ctx.audio_language);
    if let Some(pair) = pair {
        if pair.subtitle == "off" {
            if policy.force_external_over_off {
                chosen = first_external(ctx.media);
            }
            if chosen.is_none() {
                debug!(audio = %pair.audio, "Subtitle pair resolved to off");
                off_matched = true;
            }
        } else {
            chosen = find_by_language(ctx.media, &pair.subtitle, policy.autoload_external);
        }
    }

    // Step 4: any external subtitle, ignoring language.
    if chosen.is_none() && !off_matched && policy.autoload_external {
        chosen = first_external(ctx.media);
    }

    // Step 5: clear a choice that is globally disabled or itself "off".
    if let Some(track) = &chosen {
        if policy.disabled || track.language == "off" {
            debug!(language = %track.language, "Clearing disabled subtitle choice");
            chosen = None;
            off_matched = off_matched || policy.disabled;
        }
    }

    // Step 6: forced subtitles.
    if chosen.is_none() && policy.use_forced && !policy.forced_language.is_empty() {
        chosen = ctx
            .media
            .subtitles
            .iter()
            .find(|s| {
                s.title_contains(&policy.forced_tag) && s.matches_language(&policy.forced_language)
            })
            .cloned();
        // When "off" matched earlier, only forced-tag tracks qualify.
        if chosen.is_none() && !off_matched {
            chosen = first_external(ctx.media);
        }
    }

    // Step 7: renderer language list.
    if chosen.is_none() && !off_matched {
        for lang in &ctx.renderer.languages {
            if let Some(track) = find_by_language(ctx.media, lang, policy.autoload_external) {
                chosen = Some(track);
                break;
            }
        }
    }

    if let Some(track) = &chosen {
        debug!(
            id = track.id,
            language = %track.language,
            external = track.is_external(),
            "Subtitle track selected"
        );
    }
    chosen
}

/// Find a track matching a language token, preferring external tracks when
/// `prefer_external` is set and embedded tracks otherwise.
///
/// The non-preferred kind is held tentatively while the scan continues, so a
/// later track of the preferred kind can still win within the same pass.
fn find_by_language(
    media: &MediaDescriptor,
    token: &str,
    prefer_external: bool,
) -> Option<SubtitleTrackInfo> {
    let mut tentative: Option<&SubtitleTrackInfo> = None;
    for sub in &media.subtitles {
        if sub.is_off() || !sub.matches_language(token) {
            continue;
        }
        if sub.is_external() == prefer_external {
            return Some(sub.clone());
        }
        if tentative.is_none() {
            tentative = Some(sub);
        }
    }
    tentative.cloned()
}

fn first_external(media: &MediaDescriptor) -> Option<SubtitleTrackInfo> {
    media.subtitles.iter().find(|s| s.is_external()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rendermux_core::config::LanguagePair;
    use rendermux_core::format::{ContainerFormat, SubtitleKind};
    use std::path::PathBuf;

    fn media_with(subs: Vec<SubtitleTrackInfo>) -> MediaDescriptor {
        let mut m = MediaDescriptor::new(ContainerFormat::Mkv);
        m.subtitles = subs;
        m
    }

    fn embedded(id: u32, lang: &str) -> SubtitleTrackInfo {
        SubtitleTrackInfo::embedded(id, SubtitleKind::Subrip, lang)
    }

    fn external(id: u32, lang: &str) -> SubtitleTrackInfo {
        SubtitleTrackInfo::external(
            id,
            SubtitleKind::Subrip,
            lang,
            PathBuf::from(format!("/subs/{id}.srt")),
        )
    }

    fn ctx<'a>(media: &'a MediaDescriptor, renderer: &'a RendererProfile) -> SubtitleContext<'a> {
        SubtitleContext {
            media,
            renderer,
            audio_language: Some("eng"),
            forced_off: false,
            live: None,
        }
    }

    struct FixedLive(Option<SubtitleTrackInfo>);
    impl LiveSubtitleSource for FixedLive {
        fn fetch(&self) -> Option<SubtitleTrackInfo> {
            self.0.clone()
        }
    }

    #[test]
    fn test_step1_forced_off_short_circuits() {
        let media = media_with(vec![embedded(1, "eng")]);
        let renderer = RendererProfile::new("r", "R");
        let mut c = ctx(&media, &renderer);
        c.forced_off = true;
        let mut policy = SubtitlePolicy::default();
        policy.pairs.push(LanguagePair::new("*", "eng"));
        assert!(select_subtitle(&c, &policy).is_none());
    }

    #[test]
    fn test_step2_live_source_wins() {
        let media = media_with(vec![embedded(1, "eng")]);
        let renderer = RendererProfile::new("r", "R");
        let live = FixedLive(Some(external(9, "eng")));
        let mut c = ctx(&media, &renderer);
        c.live = Some(&live);
        let chosen = select_subtitle(&c, &SubtitlePolicy::default()).unwrap();
        assert_eq!(chosen.id, 9);
    }

    #[test]
    fn test_step2_failed_live_falls_through() {
        let media = media_with(vec![embedded(1, "eng")]);
        let renderer = RendererProfile::new("r", "R");
        let live = FixedLive(None);
        let mut c = ctx(&media, &renderer);
        c.live = Some(&live);
        let mut policy = SubtitlePolicy::default();
        policy.autoload_external = false;
        policy.pairs.push(LanguagePair::new("eng", "eng"));
        let chosen = select_subtitle(&c, &policy).unwrap();
        assert_eq!(chosen.id, 1);
    }

    #[test]
    fn test_step3_pair_matches_audio_language() {
        let media = media_with(vec![embedded(1, "fre"), embedded(2, "eng")]);
        let renderer = RendererProfile::new("r", "R");
        let mut policy = SubtitlePolicy::default();
        policy.autoload_external = false;
        policy.pairs.push(LanguagePair::new("jpn", "fre"));
        policy.pairs.push(LanguagePair::new("eng", "eng"));
        let chosen = select_subtitle(&ctx(&media, &renderer), &policy).unwrap();
        assert_eq!(chosen.id, 2, "only the first audio-matching pair is used");
    }

    /// Scenario: pair ("eng","off"), no forced policy, autoload disabled.
    /// No subtitle may be selected even though embedded "eng" tracks exist.
    #[test]
    fn test_step3_off_pair_disables_selection() {
        let media = media_with(vec![embedded(1, "eng")]);
        let mut renderer = RendererProfile::new("r", "R");
        renderer.languages = vec!["eng".into()];
        let mut policy = SubtitlePolicy::default();
        policy.autoload_external = false;
        policy.pairs.push(LanguagePair::new("eng", "off"));
        assert!(select_subtitle(&ctx(&media, &renderer), &policy).is_none());
    }

    #[test]
    fn test_step3_external_over_off_policy() {
        let media = media_with(vec![embedded(1, "eng"), external(2, "ger")]);
        let renderer = RendererProfile::new("r", "R");
        let mut policy = SubtitlePolicy::default();
        policy.pairs.push(LanguagePair::new("eng", "off"));
        policy.force_external_over_off = true;
        let chosen = select_subtitle(&ctx(&media, &renderer), &policy).unwrap();
        assert_eq!(chosen.id, 2);
    }

    #[test]
    fn test_step3_external_preferred_with_autoload() {
        // Embedded match appears first but is only held tentatively while
        // the external search continues.
        let media = media_with(vec![embedded(1, "eng"), external(2, "eng")]);
        let renderer = RendererProfile::new("r", "R");
        let mut policy = SubtitlePolicy::default();
        policy.pairs.push(LanguagePair::new("eng", "eng"));
        let chosen = select_subtitle(&ctx(&media, &renderer), &policy).unwrap();
        assert_eq!(chosen.id, 2);
    }

    #[test]
    fn test_step3_embedded_preferred_without_autoload() {
        let media = media_with(vec![external(2, "eng"), embedded(1, "eng")]);
        let renderer = RendererProfile::new("r", "R");
        let mut policy = SubtitlePolicy::default();
        policy.autoload_external = false;
        policy.pairs.push(LanguagePair::new("eng", "eng"));
        let chosen = select_subtitle(&ctx(&media, &renderer), &policy).unwrap();
        assert_eq!(chosen.id, 1);
    }

    #[test]
    fn test_step3_tentative_embedded_used_when_no_external() {
        let media = media_with(vec![embedded(1, "eng")]);
        let renderer = RendererProfile::new("r", "R");
        let mut policy = SubtitlePolicy::default();
        policy.pairs.push(LanguagePair::new("eng", "eng"));
        let chosen = select_subtitle(&ctx(&media, &renderer), &policy).unwrap();
        assert_eq!(chosen.id, 1);
    }

    #[test]
    fn test_step4_any_external_fallback() {
        let media = media_with(vec![embedded(1, "jpn"), external(2, "ger")]);
        let renderer = RendererProfile::new("r", "R");
        let mut policy = SubtitlePolicy::default();
        policy.pairs.push(LanguagePair::new("eng", "kor"));
        let chosen = select_subtitle(&ctx(&media, &renderer), &policy).unwrap();
        assert_eq!(chosen.id, 2, "language ignored for the external fallback");
    }

    #[test]
    fn test_step4_skipped_without_autoload() {
        let media = media_with(vec![external(2, "ger")]);
        let renderer = RendererProfile::new("r", "R");
        let mut policy = SubtitlePolicy::default();
        policy.autoload_external = false;
        policy.pairs.push(LanguagePair::new("eng", "kor"));
        assert!(select_subtitle(&ctx(&media, &renderer), &policy).is_none());
    }

    #[test]
    fn test_step5_global_disable_clears_choice() {
        let media = media_with(vec![embedded(1, "eng")]);
        let mut renderer = RendererProfile::new("r", "R");
        renderer.languages = vec!["eng".into()];
        let mut policy = SubtitlePolicy::default();
        policy.disabled = true;
        policy.pairs.push(LanguagePair::new("eng", "eng"));
        assert!(select_subtitle(&ctx(&media, &renderer), &policy).is_none());
    }

    #[test]
    fn test_step6_forced_track_selected() {
        let media = media_with(vec![
            embedded(1, "eng"),
            embedded(2, "eng").with_title("English (Forced)"),
        ]);
        let renderer = RendererProfile::new("r", "R");
        let mut policy = SubtitlePolicy::default();
        policy.autoload_external = false;
        policy.pairs.push(LanguagePair::new("eng", "kor"));
        policy.use_forced = true;
        policy.forced_language = "eng".into();
        let chosen = select_subtitle(&ctx(&media, &renderer), &policy).unwrap();
        assert_eq!(chosen.id, 2);
    }

    #[test]
    fn test_step6_off_restricts_to_forced_tag() {
        // "off" matched, so only forced-tag tracks qualify; the external
        // track must not be taken.
        let media = media_with(vec![external(3, "eng")]);
        let renderer = RendererProfile::new("r", "R");
        let mut policy = SubtitlePolicy::default();
        policy.pairs.push(LanguagePair::new("eng", "off"));
        policy.use_forced = true;
        policy.forced_language = "eng".into();
        assert!(select_subtitle(&ctx(&media, &renderer), &policy).is_none());
    }

    #[test]
    fn test_step6_external_taken_when_not_off() {
        let media = media_with(vec![embedded(1, "jpn"), external(3, "ger")]);
        let renderer = RendererProfile::new("r", "R");
        let mut policy = SubtitlePolicy::default();
        policy.autoload_external = false;
        policy.pairs.push(LanguagePair::new("eng", "kor"));
        policy.use_forced = true;
        policy.forced_language = "eng".into();
        let chosen = select_subtitle(&ctx(&media, &renderer), &policy).unwrap();
        assert_eq!(chosen.id, 3);
    }

    #[test]
    fn test_step7_renderer_language_fallback() {
        let media = media_with(vec![embedded(1, "ger"), embedded(2, "fre")]);
        let mut renderer = RendererProfile::new("r", "R");
        renderer.languages = vec!["fre".into(), "ger".into()];
        let mut policy = SubtitlePolicy::default();
        policy.autoload_external = false;
        let chosen = select_subtitle(&ctx(&media, &renderer), &policy).unwrap();
        assert_eq!(chosen.id, 2);
    }

    #[test]
    fn test_step7_honors_autoload_preference() {
        let media = media_with(vec![embedded(1, "fre"), external(2, "fre")]);
        let mut renderer = RendererProfile::new("r", "R");
        renderer.languages = vec!["fre".into()];
        let policy = SubtitlePolicy::default();
        let chosen = select_subtitle(&ctx(&media, &renderer), &policy).unwrap();
        assert_eq!(chosen.id, 2);
    }

    #[test]
    fn test_deterministic() {
        let media = media_with(vec![embedded(1, "eng"), external(2, "eng")]);
        let renderer = RendererProfile::new("r", "R");
        let mut policy = SubtitlePolicy::default();
        policy.pairs.push(LanguagePair::new("eng", "eng"));
        let c = ctx(&media, &renderer);
        let first = select_subtitle(&c, &policy);
        for _ in 0..10 {
            assert_eq!(select_subtitle(&c, &policy), first);
        }
    }
}
