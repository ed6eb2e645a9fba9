//! Orientation normalization: rotate/mirror a decoded frame upright.
//!
//! Every non-identity tag is a composition of at most one clockwise
//! quarter-turn rotation and at most one axis mirror, applied in a fixed
//! order (rotate, then mirror), so the result is deterministic and matches
//! the tag semantics exactly. 90°/270° rotations swap the output dimensions.

use image::RgbaImage;
use image::imageops;

use crate::types::Orientation;

/// Produce an upright copy of `img` according to its orientation tag.
///
/// The image family always goes through here when a tag is present; for
/// audio cover art and video frames the tag is identity and this is a no-op.
pub fn normalize(img: RgbaImage, orientation: Orientation) -> RgbaImage {
    match orientation {
        Orientation::Identity => img,
        Orientation::MirrorHorizontal => imageops::flip_horizontal(&img),
        Orientation::Rotate180 => imageops::rotate180(&img),
        Orientation::MirrorVertical => imageops::flip_vertical(&img),
        Orientation::Rotate270MirrorH => imageops::flip_horizontal(&imageops::rotate270(&img)),
        Orientation::Rotate90 => imageops::rotate90(&img),
        Orientation::Rotate90MirrorH => imageops::flip_horizontal(&imageops::rotate90(&img)),
        Orientation::Rotate270 => imageops::rotate270(&img),
    }
}
