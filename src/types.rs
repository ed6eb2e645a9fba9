//! Shared types flowing through the pipeline.
//!
//! [`SourceMeta`] and [`RawFrame`] are produced by the decode backends,
//! consumed by the orientation and geometry stages, and never persisted.
//! [`Outcome`] is the public result: a thumbnail, or a *soft* skip that is
//! deliberately not an error.

use image::RgbaImage;

use crate::error::ThumbError;

/// Pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dims {
    pub width: u32,
    pub height: u32,
}

/// Caller-supplied configuration: the bounding box the thumbnail must fit.
///
/// Both values must be greater than zero. The box is a *target*, not a
/// maximum — sources smaller than the box are scaled up until the binding
/// axis touches its bound (see [`geometry`](crate::geometry)).
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub max_width: u32,
    pub max_height: u32,
}

impl Options {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ThumbError> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(ThumbError::InvalidOptions(format!(
                "bounding box must be positive on both axes, got {}x{}",
                self.max_width, self.max_height
            )));
        }
        Ok(())
    }

    pub(crate) fn bounds(&self) -> Dims {
        Dims {
            width: self.max_width,
            height: self.max_height,
        }
    }
}

/// Format family a sniffed input belongs to. Selects the decode backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Still raster image (JPEG, PNG, WebP, BMP).
    Image,
    /// Animated raster image (GIF); only the first frame is decoded.
    AnimatedImage,
    /// Audio container that may carry embedded cover art.
    Audio,
    /// Video container (also OGG, which can be either; resolved at demux).
    Video,
}

/// EXIF-style orientation tag, 0–7.
///
/// The numbering is the EXIF orientation value minus one. Each variant names
/// the transform that makes the frame upright, expressed as at most one
/// clockwise quarter-turn rotation followed by at most one axis mirror,
/// applied in that fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Identity,
    MirrorHorizontal,
    Rotate180,
    MirrorVertical,
    /// EXIF 5: transpose (reflect across the main diagonal).
    Rotate90MirrorH,
    Rotate90,
    /// EXIF 7: anti-transpose (reflect across the anti-diagonal).
    Rotate270MirrorH,
    Rotate270,
}

impl Orientation {
    /// Map a raw EXIF orientation value (1–8) to a tag.
    /// Anything out of range means "no usable tag": identity.
    pub fn from_exif(value: u32) -> Self {
        match value {
            2 => Self::MirrorHorizontal,
            3 => Self::Rotate180,
            4 => Self::MirrorVertical,
            5 => Self::Rotate90MirrorH,
            6 => Self::Rotate90,
            7 => Self::Rotate270MirrorH,
            8 => Self::Rotate270,
            _ => Self::Identity,
        }
    }

    /// Whether normalization swaps width and height (any 90°/270° rotation).
    pub fn swaps_axes(self) -> bool {
        matches!(
            self,
            Self::Rotate90 | Self::Rotate90MirrorH | Self::Rotate270 | Self::Rotate270MirrorH
        )
    }
}

/// Immutable description of the source, produced by the matching backend.
#[derive(Debug, Clone)]
pub struct SourceMeta {
    pub family: Family,
    /// Container/codec identifier, e.g. `"jpeg"`, `"mp3"`, `"webm/vp9"`.
    pub container: String,
    /// Width of the chosen frame before fitting (0 when no frame exists).
    pub width: u32,
    /// Height of the chosen frame before fitting.
    pub height: u32,
    pub has_video: bool,
    pub has_audio: bool,
    /// Only meaningful for the image family; identity for all others.
    pub orientation: Orientation,
}

/// A decoded RGBA frame plus the stride the source decoder actually used.
///
/// `stride` is in bytes and may exceed `4 * width` when the codec pads rows
/// to a block-alignment boundary. Consumers must never assume the rows are
/// tightly packed.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub stride: usize,
    pub data: Vec<u8>,
}

impl RawFrame {
    /// Build a frame whose rows are tightly packed (`stride == 4 * width`).
    pub fn tight(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            stride: width as usize * 4,
            data,
        }
    }

    /// Convert into a tightly-packed [`RgbaImage`], dropping any row padding.
    pub fn into_image(self) -> Result<RgbaImage, ThumbError> {
        if self.width == 0 || self.height == 0 {
            return Err(ThumbError::Corrupt(format!(
                "zero-sized frame: {}x{}",
                self.width, self.height
            )));
        }
        let row = self.width as usize * 4;
        if self.stride < row {
            return Err(ThumbError::Corrupt(format!(
                "frame stride {} shorter than row width {row}",
                self.stride
            )));
        }
        if self
            .data
            .len()
            .checked_sub((self.height as usize - 1).saturating_mul(self.stride))
            .is_none_or(|tail| tail < row)
        {
            return Err(ThumbError::Corrupt(format!(
                "frame buffer too small: {} bytes for {}x{} stride {}",
                self.data.len(),
                self.width,
                self.height,
                self.stride
            )));
        }

        let buf = if self.stride == row {
            self.data
        } else {
            let mut packed = Vec::with_capacity(row * self.height as usize);
            for y in 0..self.height as usize {
                let start = y * self.stride;
                packed.extend_from_slice(&self.data[start..start + row]);
            }
            packed
        };

        RgbaImage::from_raw(self.width, self.height, buf)
            .ok_or_else(|| ThumbError::Corrupt("frame buffer/dimension mismatch".into()))
    }
}

/// Why an input was skipped without producing a thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No magic-number signature matched.
    UnrecognizedFormat,
    /// Recognized, but explicitly excluded (archive formats).
    ExcludedFormat,
    /// Format recognized but this instance carries nothing to thumbnail
    /// (e.g. audio without embedded cover art).
    NoVisualContent,
}

/// Result of a [`process`](crate::process) call.
#[derive(Debug)]
pub enum Outcome {
    /// A thumbnail was produced; `image` has exactly the fitted dimensions.
    Thumbnail { meta: SourceMeta, image: RgbaImage },
    /// The expected "no thumbnail for this input" case. `meta` is present
    /// when the container was still identified (e.g. audio without art).
    Skipped {
        reason: SkipReason,
        meta: Option<SourceMeta>,
    },
}

impl Outcome {
    /// Single-comparison check callers use to drop skipped items in a batch.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}
