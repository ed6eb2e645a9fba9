//! Embedded cover art extraction from audio containers.
//!
//! FFmpeg exposes an embedded picture (ID3 APIC, FLAC PICTURE block) as a
//! stream with the `ATTACHED_PIC` disposition whose single packet holds the
//! encoded image. The packet bytes are handed to the picture backend, which
//! guesses the image format from content. Absence of art is not an error:
//! the container was still identified, there is just nothing to thumbnail.

use std::path::Path;

use ffmpeg_next as ffmpeg;
use ffmpeg::format::stream::Disposition;
use ffmpeg::media;

use super::{BackendOutput, DecodeBackend, ffmpeg_setup, open_input, picture};
use crate::error::ThumbError;
use crate::sniff::FileKind;
use crate::types::{Family, Orientation, SourceMeta};

pub(crate) struct CoverArtBackend;

impl DecodeBackend for CoverArtBackend {
    fn decode(&self, path: &Path, kind: FileKind) -> Result<BackendOutput, ThumbError> {
        ffmpeg_setup();
        let mut ictx = open_input(path, kind)?;

        let has_audio = ictx.streams().best(media::Type::Audio).is_some();
        let art_index = ictx
            .streams()
            .find(|stream| stream.disposition().contains(Disposition::ATTACHED_PIC))
            .map(|stream| stream.index());

        let mut meta = SourceMeta {
            family: Family::Audio,
            container: kind.name().to_string(),
            width: 0,
            height: 0,
            has_video: false,
            has_audio,
            orientation: Orientation::Identity,
        };

        let Some(art_index) = art_index else {
            tracing::debug!(container = kind.name(), "no embedded cover art");
            return Ok(BackendOutput::NoContent(meta));
        };

        // The attached picture is a single packet on its own stream.
        let art = ictx.packets().find_map(|(stream, packet)| {
            if stream.index() == art_index {
                packet.data().map(|data| data.to_vec())
            } else {
                None
            }
        });
        let Some(art) = art else {
            return Err(ThumbError::Corrupt(format!(
                "{}: attached picture stream without picture data",
                kind.name()
            )));
        };

        let (frame, art_label) = picture::decode_embedded(&art)?;
        meta.container = format!("{}/{art_label}", kind.name());
        meta.width = frame.width;
        meta.height = frame.height;
        Ok(BackendOutput::Frame(meta, frame))
    }
}
