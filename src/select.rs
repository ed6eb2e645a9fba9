//! Frame selection for video sources.
//!
//! Streams often fade in from black; blindly taking frame zero produces an
//! all-black thumbnail. The selector probes decoded frames in presentation
//! order and rejects "degenerate" ones — frames whose luminance histogram is
//! dominated by near-black values — up to a bounded lookahead. If every
//! probed frame is degenerate, the last one examined is used anyway: a
//! mostly-black thumbnail beats no thumbnail.

use crate::error::ThumbError;
use crate::types::RawFrame;

/// Coarse luminance histogram bucket count.
pub(crate) const LUMA_BUCKETS: usize = 16;

/// A frame is degenerate when the darkest bucket holds at least this
/// fraction of sampled pixels.
pub(crate) const DARK_BUCKET_FRACTION: f64 = 0.9;

/// How many frames the selector examines before giving up on finding a
/// non-degenerate one. Bounds decode cost on long fades.
pub(crate) const MAX_LOOKAHEAD: usize = 10;

/// Probe every Nth decoded frame so the lookahead window covers a longer
/// stretch of the stream at the same decode budget.
pub(crate) const PROBE_INTERVAL: usize = 3;

/// Whether a decoded frame is near-uniformly dark.
///
/// Luminance is Rec.601 (integer weights) over the RGBA payload; stride
/// padding bytes are excluded from sampling.
pub(crate) fn is_degenerate(frame: &RawFrame) -> bool {
    let mut histogram = [0u64; LUMA_BUCKETS];
    let row_bytes = frame.width as usize * 4;

    for y in 0..frame.height as usize {
        let start = y * frame.stride;
        let Some(row) = frame.data.get(start..start + row_bytes) else {
            break;
        };
        for px in row.chunks_exact(4) {
            let luma =
                (299 * px[0] as u32 + 587 * px[1] as u32 + 114 * px[2] as u32) / 1000;
            histogram[(luma as usize * LUMA_BUCKETS) / 256] += 1;
        }
    }

    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return true;
    }
    histogram[0] as f64 / total as f64 >= DARK_BUCKET_FRACTION
}

/// Pick a frame from a decode sequence.
///
/// Returns the first non-degenerate frame within [`MAX_LOOKAHEAD`] probes,
/// otherwise the last frame examined, or `None` when the sequence yields no
/// frames at all. A decode error mid-sequence aborts only if nothing has
/// been decoded yet (matching the demuxer's "ignore trailing read errors"
/// leniency); the caller surfaces that distinction.
pub(crate) fn select_frame<I>(frames: I) -> Result<Option<RawFrame>, ThumbError>
where
    I: IntoIterator<Item = Result<RawFrame, ThumbError>>,
{
    let mut last = None;
    let mut probed = 0usize;

    for frame in frames {
        let frame = match frame {
            Ok(frame) => frame,
            Err(err) if last.is_none() => return Err(err),
            Err(err) => {
                tracing::debug!(error = %err, "ignoring decode error after first frame");
                break;
            }
        };

        probed += 1;
        if !is_degenerate(&frame) {
            tracing::debug!(probed, "selected non-degenerate frame");
            return Ok(Some(frame));
        }
        last = Some(frame);
        if probed >= MAX_LOOKAHEAD {
            break;
        }
    }

    if last.is_some() {
        tracing::debug!(probed, "all probed frames degenerate, using last");
    }
    Ok(last)
}
