//! Still and animated image decoding via the `image` crate.
//!
//! Animated formats contribute their first frame only. Decoding is as
//! lenient as the underlying decoders allow — locally invalid trailing data
//! does not fail an image whose leading structure is valid — while inputs
//! too short to form a header are rejected as corrupt. The JPEG sub-case
//! additionally extracts the EXIF orientation tag (identity when absent).

use std::io::Cursor;
use std::path::Path;

use exif::{In, Reader, Tag};
use image::ImageFormat;

use super::{BackendOutput, DecodeBackend};
use crate::error::ThumbError;
use crate::sniff::FileKind;
use crate::types::{Family, Orientation, RawFrame, SourceMeta};

pub(crate) struct PictureBackend;

impl DecodeBackend for PictureBackend {
    fn decode(&self, path: &Path, kind: FileKind) -> Result<BackendOutput, ThumbError> {
        let bytes = std::fs::read(path)?;
        let format = kind
            .image_format()
            .ok_or_else(|| ThumbError::Corrupt(format!("{} is not an image format", kind.name())))?;

        let frame = decode_frame(&bytes, format, kind.name())?;

        let orientation = if kind == FileKind::Jpeg {
            extract_orientation(&bytes)
        } else {
            Orientation::Identity
        };

        let family = kind.family().unwrap_or(Family::Image);

        let meta = SourceMeta {
            family,
            container: kind.name().to_string(),
            width: frame.width,
            height: frame.height,
            has_video: false,
            has_audio: false,
            orientation,
        };
        Ok(BackendOutput::Frame(meta, frame))
    }
}

/// Decode a byte blob whose format is already known from sniffing.
fn decode_frame(bytes: &[u8], format: ImageFormat, label: &str) -> Result<RawFrame, ThumbError> {
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|err| ThumbError::Corrupt(format!("{label}: {err}")))?;
    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(RawFrame::tight(width, height, rgba.into_raw()))
}

/// Decode an embedded picture blob (cover art) whose format is guessed from
/// its own leading bytes — never from anything the surrounding container
/// claims. Returns the frame and the detected format's label.
pub(crate) fn decode_embedded(bytes: &[u8]) -> Result<(RawFrame, &'static str), ThumbError> {
    let format = image::guess_format(bytes)
        .map_err(|err| ThumbError::Corrupt(format!("embedded picture: {err}")))?;
    let label = label_for(format);
    let frame = decode_frame(bytes, format, label)?;
    Ok((frame, label))
}

fn label_for(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Png => "png",
        ImageFormat::Gif => "gif",
        ImageFormat::WebP => "webp",
        ImageFormat::Bmp => "bmp",
        _ => "image",
    }
}

/// EXIF orientation from JPEG bytes; identity when the tag or the whole
/// EXIF block is absent or unreadable.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from_exif)
            .unwrap_or_default(),
        Err(_) => Orientation::Identity,
    }
}
