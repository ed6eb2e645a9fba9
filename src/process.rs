//! The thumbnailing pipeline: sniff → dispatch → isolated decode →
//! orientation → geometry → resize.
//!
//! [`process`] is the public entry point and the only place with
//! cross-cutting knowledge. Control flow is strictly linear per call; each
//! invocation owns its own sniff buffer, decode context, and pixel buffers,
//! so concurrent calls are fully independent. The single suspension point
//! is the join on the fault-isolation thread around the backend call.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use image::imageops::{self, FilterType};

use crate::decode::{BackendOutput, DecodeBackend, cover, picture, video};
use crate::error::ThumbError;
use crate::types::{Dims, Family, Options, Outcome, SkipReason};
use crate::{geometry, isolate, orient, sniff};

/// The backend set the dispatcher selects from. Injectable so tests can
/// substitute mocks for the real decoders.
pub(crate) struct Backends<'a> {
    pub picture: &'a dyn DecodeBackend,
    pub cover: &'a dyn DecodeBackend,
    pub video: &'a dyn DecodeBackend,
}

const DEFAULT_BACKENDS: Backends<'static> = Backends {
    picture: &picture::PictureBackend,
    cover: &cover::CoverArtBackend,
    video: &video::VideoBackend,
};

/// Produce a thumbnail for an arbitrary, untrusted media file.
///
/// The file's real format is sniffed from leading bytes (the name and
/// extension are never consulted), exactly one decode backend runs under
/// the fault-isolation boundary, and the resulting frame is normalized
/// upright and fitted into the `options` bounding box with the aspect ratio
/// preserved.
///
/// Returns [`Outcome::Skipped`] — a normal value, not an error — for inputs
/// that are expected to yield no thumbnail: unrecognized signatures,
/// archives, audio without embedded art. Hard [`ThumbError`]s mean the
/// input is corrupt, unreadable, or crashed a decoder.
pub fn process(path: &Path, options: &Options) -> Result<Outcome, ThumbError> {
    process_with(path, options, &DEFAULT_BACKENDS)
}

pub(crate) fn process_with(
    path: &Path,
    options: &Options,
    backends: &Backends<'_>,
) -> Result<Outcome, ThumbError> {
    options.validate()?;

    let head = read_head(path)?;
    let Some(kind) = sniff::sniff(&head) else {
        tracing::debug!(?path, "no signature matched");
        return Ok(Outcome::Skipped {
            reason: SkipReason::UnrecognizedFormat,
            meta: None,
        });
    };

    let Some(family) = kind.family() else {
        tracing::debug!(container = kind.name(), "excluded format");
        return Ok(Outcome::Skipped {
            reason: SkipReason::ExcludedFormat,
            meta: None,
        });
    };

    let backend = match family {
        Family::Image | Family::AnimatedImage => backends.picture,
        Family::Audio => backends.cover,
        Family::Video => backends.video,
    };
    tracing::debug!(container = kind.name(), ?family, "dispatching decode");

    let output = isolate::guarded(kind.name(), || backend.decode(path, kind))?;
    let (meta, frame) = match output {
        BackendOutput::NoContent(meta) => {
            return Ok(Outcome::Skipped {
                reason: SkipReason::NoVisualContent,
                meta: Some(meta),
            });
        }
        BackendOutput::Frame(meta, frame) => (meta, frame),
    };

    let upright = orient::normalize(frame.into_image()?, meta.orientation);
    let (width, height) = upright.dimensions();
    let fitted = geometry::fit_dimensions(Dims { width, height }, options.bounds());
    tracing::debug!(
        source = format!("{width}x{height}"),
        thumb = format!("{}x{}", fitted.width, fitted.height),
        container = meta.container,
        "fitting frame"
    );

    let image = if (fitted.width, fitted.height) == (width, height) {
        upright
    } else {
        resize_with_alpha(upright, fitted.width, fitted.height)
    };

    Ok(Outcome::Thumbnail { meta, image })
}

/// Lanczos resize that keeps fully transparent pixels from bleeding color.
///
/// Straight-alpha filtering averages the RGB of transparent pixels into
/// their opaque neighbors, which shows up as dark fringes along transparent
/// edges. Sources with transparency are premultiplied before the resample
/// and unpremultiplied after, so a pixel's color contribution is weighted by
/// its coverage. Fully opaque images take the direct path.
fn resize_with_alpha(img: image::RgbaImage, width: u32, height: u32) -> image::RgbaImage {
    if img.pixels().all(|px| px.0[3] == u8::MAX) {
        return imageops::resize(&img, width, height, FilterType::Lanczos3);
    }

    let mut premultiplied = img;
    for px in premultiplied.pixels_mut() {
        let alpha = px.0[3] as u32;
        for channel in &mut px.0[..3] {
            *channel = ((*channel as u32 * alpha + 127) / 255) as u8;
        }
    }

    let mut resized = imageops::resize(&premultiplied, width, height, FilterType::Lanczos3);
    for px in resized.pixels_mut() {
        let alpha = px.0[3] as u32;
        if alpha == 0 {
            px.0 = [0, 0, 0, 0];
            continue;
        }
        for channel in &mut px.0[..3] {
            *channel = ((*channel as u32 * 255 + alpha / 2) / alpha).min(255) as u8;
        }
    }
    resized
}

/// Read the sniff window: up to [`sniff::SNIFF_LEN`] leading bytes.
fn read_head(path: &Path) -> Result<Vec<u8>, ThumbError> {
    let file = File::open(path)?;
    let mut head = Vec::with_capacity(sniff::SNIFF_LEN);
    file.take(sniff::SNIFF_LEN as u64).read_to_end(&mut head)?;
    Ok(head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniff::FileKind;
    use crate::types::{Orientation, RawFrame, SourceMeta};

    fn meta(family: Family) -> SourceMeta {
        SourceMeta {
            family,
            container: "mock".into(),
            width: 4,
            height: 4,
            has_video: family == Family::Video,
            has_audio: false,
            orientation: Orientation::Identity,
        }
    }

    /// Backend returning a fixed 4x4 gray frame.
    struct FrameBackend;
    impl DecodeBackend for FrameBackend {
        fn decode(&self, _: &Path, kind: FileKind) -> Result<BackendOutput, ThumbError> {
            let family = kind.family().unwrap_or(Family::Image);
            let data = vec![128u8; 4 * 4 * 4];
            Ok(BackendOutput::Frame(meta(family), RawFrame::tight(4, 4, data)))
        }
    }

    /// Backend that panics, standing in for a crashing native decoder.
    struct CrashingBackend;
    impl DecodeBackend for CrashingBackend {
        fn decode(&self, _: &Path, _: FileKind) -> Result<BackendOutput, ThumbError> {
            panic!("simulated native decoder crash")
        }
    }

    /// Backend reporting recognized-but-empty content.
    struct EmptyBackend;
    impl DecodeBackend for EmptyBackend {
        fn decode(&self, _: &Path, _: FileKind) -> Result<BackendOutput, ThumbError> {
            Ok(BackendOutput::NoContent(meta(Family::Audio)))
        }
    }

    fn backends<'a>(backend: &'a dyn DecodeBackend) -> Backends<'a> {
        Backends {
            picture: backend,
            cover: backend,
            video: backend,
        }
    }

    fn write_jpeg_header(dir: &tempfile::TempDir) -> std::path::PathBuf {
        // Only the sniffer sees these bytes; the mock backend never reads.
        let path = dir.path().join("input.bin");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0]).unwrap();
        path
    }

    #[test]
    fn invalid_options_fail_before_any_io() {
        let err = process(Path::new("/nonexistent"), &Options::new(0, 100)).unwrap_err();
        assert!(matches!(err, ThumbError::InvalidOptions(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = process(Path::new("/nonexistent/input"), &Options::new(100, 100)).unwrap_err();
        assert!(matches!(err, ThumbError::Io(_)));
    }

    #[test]
    fn mock_frame_is_fitted_to_the_box() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write_jpeg_header(&tmp);

        let outcome =
            process_with(&path, &Options::new(150, 100), &backends(&FrameBackend)).unwrap();
        let Outcome::Thumbnail { image, meta } = outcome else {
            panic!("expected a thumbnail");
        };
        // 4x4 square into 150x100: height binds.
        assert_eq!(image.dimensions(), (100, 100));
        assert_eq!(meta.container, "mock");
    }

    #[test]
    fn backend_crash_is_intercepted_and_caller_survives() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write_jpeg_header(&tmp);
        let opts = Options::new(150, 150);

        let err = process_with(&path, &opts, &backends(&CrashingBackend)).unwrap_err();
        assert!(matches!(err, ThumbError::DecodeCrash(_)));

        // The process is alive and subsequent calls work.
        let outcome = process_with(&path, &opts, &backends(&FrameBackend)).unwrap();
        assert!(!outcome.is_skipped());
    }

    #[test]
    fn no_content_propagates_as_soft_skip_with_meta() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("input.bin");
        std::fs::write(&path, b"ID3\x04\x00\x00\x00\x00\x00\x00").unwrap();

        let outcome =
            process_with(&path, &Options::new(150, 150), &backends(&EmptyBackend)).unwrap();
        let Outcome::Skipped { reason, meta } = outcome else {
            panic!("expected a skip");
        };
        assert_eq!(reason, SkipReason::NoVisualContent);
        assert!(meta.is_some());
    }

    #[test]
    fn unrecognized_bytes_skip_without_touching_backends() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("input.bin");
        std::fs::write(&path, b"just some text").unwrap();

        let outcome =
            process_with(&path, &Options::new(150, 150), &backends(&CrashingBackend)).unwrap();
        let Outcome::Skipped { reason, .. } = outcome else {
            panic!("expected a skip");
        };
        assert_eq!(reason, SkipReason::UnrecognizedFormat);
    }

    #[test]
    fn resize_does_not_bleed_color_from_transparent_pixels() {
        // Opaque white next to fully transparent black: straight-alpha
        // filtering would pull the whites toward gray.
        let img = image::RgbaImage::from_fn(8, 8, |x, _| {
            if x < 4 {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([0, 0, 0, 0])
            }
        });
        let out = resize_with_alpha(img, 4, 4);
        let px = out.get_pixel(0, 0);
        assert!(px.0[3] >= 200, "alpha deep in the opaque region: {}", px.0[3]);
        assert!(
            px.0[0] >= 250 && px.0[1] >= 250 && px.0[2] >= 250,
            "white must stay white next to a transparent edge, got {:?}",
            px.0
        );
    }

    #[test]
    fn fully_transparent_input_stays_transparent() {
        let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([90, 120, 200, 0]));
        let out = resize_with_alpha(img, 4, 4);
        assert!(out.pixels().all(|px| px.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn opaque_input_resizes_directly() {
        let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([10, 200, 30, 255]));
        let out = resize_with_alpha(img, 4, 4);
        assert_eq!(out.dimensions(), (4, 4));
        assert!(out.pixels().all(|px| px.0[3] == 255));
    }

    #[test]
    fn archives_skip_without_touching_backends() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("input.bin");
        std::fs::write(&path, b"PK\x03\x04rest-of-zip").unwrap();

        let outcome =
            process_with(&path, &Options::new(150, 150), &backends(&CrashingBackend)).unwrap();
        let Outcome::Skipped { reason, .. } = outcome else {
            panic!("expected a skip");
        };
        assert_eq!(reason, SkipReason::ExcludedFormat);
    }
}
