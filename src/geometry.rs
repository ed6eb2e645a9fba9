//! Pure geometry: fit source dimensions into a bounding box.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::types::Dims;

/// Compute output dimensions for a source frame and a bounding box.
///
/// The axis that constrains scaling lands *exactly* on its bound; the other
/// axis is scaled by the same ratio and rounded to the nearest integer (ties
/// round up), so the result never exceeds the box. The box is a target, not
/// a maximum: a source already smaller than the box is scaled up until the
/// binding axis touches its bound.
///
/// # Examples
/// ```
/// # use mediathumb::geometry::fit_dimensions;
/// # use mediathumb::Dims;
/// // Near-bound source: height clamps to the bound, width stays inside it.
/// let out = fit_dimensions(
///     Dims { width: 121, height: 150 },
///     Dims { width: 150, height: 150 },
/// );
/// assert_eq!((out.width, out.height), (121, 150));
/// ```
pub fn fit_dimensions(source: Dims, bounds: Dims) -> Dims {
    // Guard against degenerate sources; decode backends never produce these,
    // but a division by zero must stay impossible.
    let src_w = source.width.max(1) as f64;
    let src_h = source.height.max(1) as f64;

    let scale_w = bounds.width as f64 / src_w;
    let scale_h = bounds.height as f64 / src_h;

    if scale_w <= scale_h {
        // Width binds: clamp it to the bound, scale height by the same ratio.
        Dims {
            width: bounds.width,
            height: round_half_up(src_h * scale_w).clamp(1, bounds.height),
        }
    } else {
        Dims {
            width: round_half_up(src_w * scale_h).clamp(1, bounds.width),
            height: bounds.height,
        }
    }
}

// Round half up; exact .5 goes to the larger integer.
fn round_half_up(v: f64) -> u32 {
    (v + 0.5).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit(src: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
        let out = fit_dimensions(
            Dims {
                width: src.0,
                height: src.1,
            },
            Dims {
                width: bounds.0,
                height: bounds.1,
            },
        );
        (out.width, out.height)
    }

    #[test]
    fn near_bound_source_regression() {
        // 121x150 into 150x150: height clamps to the bound exactly, width is
        // scaled by the same (unit) ratio.
        assert_eq!(fit((121, 150), (150, 150)), (121, 150));
    }

    #[test]
    fn large_landscape_downscales() {
        // 1920x1080 into 150x150: width binds, height = 1080 * 150/1920 = 84.375
        assert_eq!(fit((1920, 1080), (150, 150)), (150, 84));
    }

    #[test]
    fn large_portrait_downscales() {
        assert_eq!(fit((1080, 1920), (150, 150)), (84, 150));
    }

    #[test]
    fn small_source_scales_up_to_the_box() {
        // The box defines a target, not a maximum: 50x40 grows until the
        // width touches 150.
        assert_eq!(fit((50, 40), (150, 150)), (150, 120));
    }

    #[test]
    fn exact_fit_source_is_unchanged() {
        assert_eq!(fit((150, 150), (150, 150)), (150, 150));
    }

    #[test]
    fn square_source_into_rectangular_box() {
        // 100x100 into 300x150: height binds, width scales to 150.
        assert_eq!(fit((100, 100), (300, 150)), (150, 150));
    }

    #[test]
    fn ties_round_up() {
        // 3x2 into 100x67: width binds (scale 33.33 vs 33.5), height =
        // 2 * 100/3 = 66.66 -> 67; and a constructed exact .5:
        // 200x3 into 100x100 -> height = 3 * 0.5 = 1.5 -> 2.
        assert_eq!(fit((200, 3), (100, 100)), (100, 2));
    }

    #[test]
    fn scaled_axis_never_exceeds_its_bound() {
        // Rounding on the free axis must stay inside the box.
        let (w, h) = fit((151, 150), (150, 150));
        assert!(w <= 150 && h <= 150);
        assert_eq!(w, 150);
    }

    #[test]
    fn one_pixel_floor_on_extreme_aspect() {
        // 10000x1 into 150x150: height would round to 0 without the clamp.
        assert_eq!(fit((10000, 1), (150, 150)), (150, 1));
    }
}
