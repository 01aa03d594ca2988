//! Video bitrate, buffer and quality option synthesis.

use rendermux_core::config::{TranscodeConfig, DEFAULT_BUFFER_KBIT, MAX_BUFFER_KBIT};
use rendermux_core::format::H264Level;
use rendermux_core::renderer::RendererFlags;
use rendermux_core::request::TranscodeRequest;
use tracing::debug;

use crate::custom::custom_specifies;

/// Practical H.264 Level 4.1 bitrate ceiling in kbit/s.
///
/// Below the theoretical 50 Mbit/s maximum; devices advertising a 4.1
/// ceiling reliably choke above this value.
pub const H264_LEVEL41_CEILING_KBPS: u32 = 31_250;

/// HD content above this ceiling halves the encoder buffer.
const HD_BUFFER_HALVING_THRESHOLD_KBPS: u32 = 14_000;

/// The effective bitrate ceiling in kbit/s: the minimum of the renderer's
/// and the global ceiling, with the renderer's halving flag applied.
/// Zero means unlimited.
pub fn effective_ceiling_kbps(request: &TranscodeRequest, config: &TranscodeConfig) -> u32 {
    let renderer = request.renderer.max_bitrate_kbps;
    let global = config.max_bitrate_kbps;
    let mut ceiling = match (renderer, global) {
        (0, g) => g,
        (r, 0) => r,
        (r, g) => r.min(g),
    };
    if ceiling != 0 && request.renderer.has(RendererFlags::HALVE_BITRATE) {
        ceiling /= 2;
    }
    ceiling
}

/// Compute the encoder buffer size in kbit.
///
/// HD content above the halving threshold gets half the ceiling; the result
/// is capped at [`MAX_BUFFER_KBIT`] and defaults to [`DEFAULT_BUFFER_KBIT`]
/// when no ceiling is configured. A renderer-specific override wins but is
/// still capped.
pub fn buffer_size_kbit(request: &TranscodeRequest, ceiling_kbps: u32) -> u32 {
    let mut buffer = if ceiling_kbps == 0 {
        DEFAULT_BUFFER_KBIT
    } else if request.media.is_hd() && ceiling_kbps > HD_BUFFER_HALVING_THRESHOLD_KBPS {
        ceiling_kbps / 2
    } else {
        ceiling_kbps
    };
    if request.renderer.buffer_size_kbit > 0 {
        buffer = request.renderer.buffer_size_kbit;
    }
    buffer.min(MAX_BUFFER_KBIT)
}

/// Compute the maximum video rate in kbit/s for constant-ceiling mode.
///
/// The audio reservation (larger for DTS wrapped in LPCM than for plain
/// AC-3) is subtracted before the ceiling is rounded down to a whole Mbit,
/// and an H.264 Level 4.1 renderer caps the result at the practical ceiling.
pub fn compute_maxrate_kbps(
    request: &TranscodeRequest,
    config: &TranscodeConfig,
    ceiling_kbps: u32,
) -> u32 {
    let reservation = if request.renderer.has(RendererFlags::WRAP_DTS_IN_PCM)
        && request.audio.as_ref().map(|a| a.codec.is_dts()).unwrap_or(false)
    {
        config.audio_reservation_dts_pcm_kbps
    } else {
        config.audio_reservation_ac3_kbps
    };

    let mut maxrate = ceiling_kbps.saturating_sub(reservation);
    maxrate = (maxrate / 1000) * 1000;

    if request.renderer.max_h264_level == Some(H264Level::L4_1) {
        maxrate = maxrate.min(H264_LEVEL41_CEILING_KBPS);
    }
    maxrate
}

/// Constant-quality value from the automatic table.
///
/// Keyed by bitrate band, wireless link and resolution; lower is better
/// quality. Used when no custom value is configured.
pub fn automatic_crf(ceiling_kbps: u32, wireless: bool, height: u32) -> u32 {
    let mut crf = if ceiling_kbps == 0 || ceiling_kbps >= 35_000 {
        16
    } else if ceiling_kbps >= 20_000 {
        17
    } else if ceiling_kbps >= 10_000 {
        19
    } else {
        23
    };
    if wireless {
        // Wireless links need headroom against throughput dips.
        crf = crf.max(19) + 2;
    }
    if height >= 2160 {
        crf += 2;
    }
    crf
}

/// Build the bitrate/quality tokens for an FFmpeg-family transcode.
///
/// Constant-ceiling mode emits explicit `-maxrate`/`-bufsize` flags;
/// constant-quality mode emits `-crf`, taking the configured override or the
/// automatic table. Flags already present in the renderer's custom options
/// are never emitted.
pub fn video_bitrate(request: &TranscodeRequest, config: &TranscodeConfig) -> Vec<String> {
    let custom = &request.renderer.custom_options;
    let ceiling = effective_ceiling_kbps(request, config);
    let mut args = Vec::new();

    if config.constant_quality {
        if custom_specifies(custom, &["-crf", "-qp"]) {
            return args;
        }
        let crf = if config.crf_override.is_empty() {
            let height = request.media.default_video().map(|v| v.height).unwrap_or(0);
            automatic_crf(ceiling, request.renderer.has(RendererFlags::WIRELESS), height)
                .to_string()
        } else {
            config.crf_override.clone()
        };
        debug!(%crf, "Using constant-quality mode");
        args.push("-crf".into());
        args.push(crf);
        return args;
    }

    if ceiling == 0 {
        return args;
    }

    let maxrate = compute_maxrate_kbps(request, config, ceiling);
    let buffer = buffer_size_kbit(request, ceiling);
    debug!(maxrate, buffer, "Using constant-ceiling mode");

    if !custom_specifies(custom, &["-maxrate"]) {
        args.push("-maxrate".into());
        args.push(format!("{maxrate}k"));
    }
    if !custom_specifies(custom, &["-bufsize"]) {
        args.push("-bufsize".into());
        args.push(format!("{buffer}k"));
    }
    args
}
