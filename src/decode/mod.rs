//! Decode backends, one per format family.
//!
//! Every backend is polymorphic over a single narrow capability:
//! [`DecodeBackend::decode`] turns a sniffed input into zero or one raw
//! frame plus source metadata, or fails hard. The dispatcher picks exactly
//! one backend per call and never probes another; backends hold no state,
//! so a call mutates nothing observable by concurrent calls.
//!
//! | Backend | Formats | Library |
//! |---|---|---|
//! | [`picture::PictureBackend`] | JPEG, PNG, GIF, WebP, BMP | `image` (pure Rust) |
//! | [`cover::CoverArtBackend`] | MP3, FLAC | FFmpeg demux + `image` decode |
//! | [`video::VideoBackend`] | MP4/MOV, WebM, MKV, OGG, AVI, ASF, FLV | FFmpeg demux + decode |

use std::path::Path;
use std::sync::Once;

use ffmpeg_next as ffmpeg;

use crate::error::ThumbError;
use crate::sniff::FileKind;
use crate::types::{RawFrame, SourceMeta};

pub(crate) mod cover;
pub(crate) mod picture;
pub(crate) mod video;

/// What a backend produced: a frame with metadata, or metadata alone when
/// the input is recognized but carries nothing to thumbnail (soft outcome).
#[derive(Debug)]
pub(crate) enum BackendOutput {
    Frame(SourceMeta, RawFrame),
    NoContent(SourceMeta),
}

/// The one capability the orchestrator needs from a backend.
pub(crate) trait DecodeBackend: Sync {
    fn decode(&self, path: &Path, kind: FileKind) -> Result<BackendOutput, ThumbError>;
}

/// One-time FFmpeg global registration. All decode *state* (format and
/// codec contexts, scalers) is constructed per call; only this registration
/// is shared, and it is immutable after the first call.
pub(crate) fn ffmpeg_setup() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        if let Err(err) = ffmpeg::init() {
            tracing::warn!(error = %err, "ffmpeg initialization failed");
        }
        // Errors surface through return codes; keep the native log quiet.
        ffmpeg::util::log::set_level(ffmpeg::util::log::Level::Fatal);
    });
}

/// Open an input container, mapping the failure to the hard-error taxonomy.
pub(crate) fn open_input(
    path: &Path,
    kind: FileKind,
) -> Result<ffmpeg::format::context::Input, ThumbError> {
    ffmpeg::format::input(&path)
        .map_err(|err| ThumbError::Corrupt(format!("{}: cannot open container: {err}", kind.name())))
}

/// Lowercase codec label for [`SourceMeta::container`](crate::types::SourceMeta).
pub(crate) fn codec_label(id: ffmpeg::codec::Id) -> String {
    format!("{id:?}").to_lowercase()
}
