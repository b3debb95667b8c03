//! Packed 24-bit pixel buffers
//!
//! Three bytes per pixel in BGR order, each row padded to a multiple of four
//! bytes (device-independent bitmap layout).

use crate::error::InitError;

/// Bytes per pixel
pub const BYTES_PER_PIXEL: usize = 3;

/// Padded row length in bytes for an image `width` pixels wide
#[inline]
pub fn row_bytes(width: usize) -> usize {
    (width * BYTES_PER_PIXEL + 3) & !3
}

/// A fixed-size padded BGR image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelFrame {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<u8>,
}

impl PixelFrame {
    /// Black image of the given size
    pub fn new(width: usize, height: usize) -> Result<Self, InitError> {
        let (stride, len) = width
            .checked_mul(BYTES_PER_PIXEL)
            .and_then(|bytes| bytes.checked_add(3))
            .map(|bytes| bytes & !3)
            .and_then(|stride| Some((stride, stride.checked_mul(height)?)))
            .ok_or(InitError::TooLarge { width, height })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)?;
        data.resize(len, 0);
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    /// Copy an already padded BGR buffer. Extra trailing bytes are ignored.
    pub fn from_padded(width: usize, height: usize, bytes: &[u8]) -> Result<Self, InitError> {
        let mut frame = Self::new(width, height)?;
        let len = frame.data.len();
        if bytes.len() < len {
            return Err(InitError::SourceImage(format!(
                "expected {len} bytes for {width}x{height}, got {}",
                bytes.len()
            )));
        }
        frame.data.copy_from_slice(&bytes[..len]);
        Ok(frame)
    }

    /// Build from tightly packed pixels produced by `pixel(x, y) -> [b, g, r]`
    pub fn from_fn(
        width: usize,
        height: usize,
        mut pixel: impl FnMut(usize, usize) -> [u8; 3],
    ) -> Result<Self, InitError> {
        let mut frame = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                let at = frame.offset(x, y);
                frame.data[at..at + BYTES_PER_PIXEL].copy_from_slice(&pixel(x, y));
            }
        }
        Ok(frame)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Padded row length in bytes
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Raw padded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Byte offset of pixel (x, y). The caller guarantees bounds.
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> usize {
        y * self.stride + x * BYTES_PER_PIXEL
    }

    /// Pixel at (x, y), `None` outside the image
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = self.offset(x, y);
        Some([self.data[at], self.data[at + 1], self.data[at + 2]])
    }

    /// True when both frames have the same dimensions
    pub fn same_shape(&self, other: &PixelFrame) -> bool {
        self.width == other.width && self.height == other.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_padding() {
        assert_eq!(row_bytes(1), 4);
        assert_eq!(row_bytes(4), 12);
        assert_eq!(row_bytes(5), 16);
        assert_eq!(row_bytes(10), 32);
    }

    #[test]
    fn test_from_fn_layout() {
        let frame = PixelFrame::from_fn(5, 2, |x, y| [x as u8, y as u8, 9]).unwrap();
        assert_eq!(frame.stride(), 16);
        assert_eq!(frame.as_bytes().len(), 32);
        assert_eq!(frame.pixel(4, 1), Some([4, 1, 9]));
        // Padding bytes stay zero
        assert_eq!(&frame.as_bytes()[15..16], &[0]);
        assert_eq!(frame.pixel(5, 0), None);
    }

    #[test]
    fn test_oversized_frame_is_an_error() {
        assert!(matches!(
            PixelFrame::new(usize::MAX / 2, 1),
            Err(InitError::TooLarge { height: 1, .. })
        ));
        assert!(matches!(
            PixelFrame::new(1024, usize::MAX / 1024),
            Err(InitError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_from_padded_rejects_short_buffer() {
        let err = PixelFrame::from_padded(5, 5, &[0u8; 79]).unwrap_err();
        assert!(matches!(err, InitError::SourceImage(_)));
        assert!(PixelFrame::from_padded(5, 5, &[7u8; 80]).is_ok());
    }
}
