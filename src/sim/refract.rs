//! Refraction renderer
//!
//! Each interior output pixel samples the source image displaced by the
//! local energy gradient:
//!
//! ```text
//! src_x = x + E(x-1, y) - E(x+1, y)
//! src_y = y + E(x, y-1) - E(x, y+1)
//! ```
//!
//! Displaced samples are softened with a 5-tap blend (center 4, direct
//! neighbors 3 each, divided by 16).

use super::energy::EnergyField;
use super::frame::{BYTES_PER_PIXEL, PixelFrame};

/// Render `target` from `source` and the current energy step.
///
/// Returns true when any interior pixel had a nonzero displacement. Pixels
/// whose displaced sample falls outside the image are left untouched.
/// A sample on the image's outer ring is copied unblended, since its 5-tap
/// footprint would read past the image edge.
pub fn refract(source: &PixelFrame, energy: &EnergyField, target: &mut PixelFrame) -> bool {
    let width = energy.width();
    let height = energy.height();
    debug_assert!(source.same_shape(target));
    debug_assert_eq!((source.width(), source.height()), (width, height));

    let cells = energy.current();
    let stride = source.stride();
    let src = source.as_bytes();
    let dst = target.as_bytes_mut();
    let mut moved = false;

    for y in 1..height.saturating_sub(1) {
        let row = y * width;
        for x in 1..width.saturating_sub(1) {
            let i = row + x;
            let dx = cells[i - 1] as i64 - cells[i + 1] as i64;
            let dy = cells[i - width] as i64 - cells[i + width] as i64;
            let out = y * stride + x * BYTES_PER_PIXEL;

            if dx == 0 && dy == 0 {
                dst[out..out + BYTES_PER_PIXEL].copy_from_slice(&src[out..out + BYTES_PER_PIXEL]);
                continue;
            }
            moved = true;

            let sx = x as i64 + dx;
            let sy = y as i64 + dy;
            if sx < 0 || sy < 0 || sx >= width as i64 || sy >= height as i64 {
                continue;
            }
            let (sx, sy) = (sx as usize, sy as usize);
            let at = sy * stride + sx * BYTES_PER_PIXEL;

            if sx == 0 || sy == 0 || sx + 1 == width || sy + 1 == height {
                // Blend footprint would leave the image
                dst[out..out + BYTES_PER_PIXEL].copy_from_slice(&src[at..at + BYTES_PER_PIXEL]);
            } else {
                for c in 0..BYTES_PER_PIXEL {
                    dst[out + c] = blend(src, at + c, stride);
                }
            }
        }
    }

    moved
}

/// 5-tap weighted average of one channel around byte offset `at`
#[inline]
fn blend(src: &[u8], at: usize, stride: usize) -> u8 {
    let center = src[at] as u32 * 4;
    let around = src[at - BYTES_PER_PIXEL] as u32
        + src[at + BYTES_PER_PIXEL] as u32
        + src[at - stride] as u32
        + src[at + stride] as u32;
    ((center + around * 3) >> 4) as u8
}
