//! Presentation helpers
//!
//! The kernel renders into padded BGR frames. Display surfaces want other
//! layouts, so the conversions live here along with the concrete sinks.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod ppm;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPresenter;

use crate::error::InitError;
use crate::sim::PixelFrame;

/// Expand a frame to tightly packed RGBA (opaque), as canvases expect
pub fn to_rgba(frame: &PixelFrame) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(frame.width() * frame.height() * 4);
    for y in 0..frame.height() {
        let row = &frame.as_bytes()[y * frame.stride()..];
        for bgr in row.chunks_exact(3).take(frame.width()) {
            rgba.extend_from_slice(&[bgr[2], bgr[1], bgr[0], 0xFF]);
        }
    }
    rgba
}

/// Build a frame from tightly packed RGBA, dropping alpha
pub fn from_rgba(width: usize, height: usize, rgba: &[u8]) -> Result<PixelFrame, InitError> {
    if rgba.len() < width * height * 4 {
        return Err(InitError::SourceImage(format!(
            "expected {} RGBA bytes for {width}x{height}, got {}",
            width * height * 4,
            rgba.len()
        )));
    }
    PixelFrame::from_fn(width, height, |x, y| {
        let at = (y * width + x) * 4;
        [rgba[at + 2], rgba[at + 1], rgba[at]]
    })
}

/// Tightly packed RGB, as written to PPM files
pub fn to_rgb(frame: &PixelFrame) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(frame.width() * frame.height() * 3);
    for y in 0..frame.height() {
        let row = &frame.as_bytes()[y * frame.stride()..];
        for bgr in row.chunks_exact(3).take(frame.width()) {
            rgb.extend_from_slice(&[bgr[2], bgr[1], bgr[0]]);
        }
    }
    rgb
}

/// Procedural stand-in image: diagonal color bands over a checkerboard
pub fn test_pattern(width: usize, height: usize) -> Result<PixelFrame, InitError> {
    PixelFrame::from_fn(width, height, |x, y| {
        let check = if (x / 16 + y / 16) % 2 == 0 { 40 } else { 0 };
        let band = ((x + y) * 255 / (width + height).max(1)) as u8;
        [
            band.saturating_add(check),
            (255 - band) / 2 + check,
            ((x * 255) / width.max(1)) as u8,
        ]
    })
}
