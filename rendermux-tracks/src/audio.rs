//! Audio track selection.

use rendermux_core::media::{AudioTrackInfo, MediaDescriptor};
use tracing::debug;

/// Select the audio track for a request.
///
/// Walks the ordered language preference list and returns the first matching
/// track. When nothing matches, a lossless or DTS track is preferred over the
/// ordinal-first track; failing that, the first audio track wins.
///
/// Returns `None` only when the descriptor carries no audio tracks at all.
pub fn select_audio<'a>(
    media: &'a MediaDescriptor,
    preferences: &[String],
) -> Option<&'a AudioTrackInfo> {
    for pref in preferences {
        if let Some(track) = media.audio.iter().find(|t| t.matches_language(pref)) {
            debug!(language = %track.language, id = track.id, "Audio track matched preference");
            return Some(track);
        }
    }

    if let Some(track) = media
        .audio
        .iter()
        .find(|t| t.codec.is_lossless() || t.codec.is_dts())
    {
        debug!(codec = %track.codec, id = track.id, "No preference matched, using lossless/DTS track");
        return Some(track);
    }

    media.audio.first()
}
