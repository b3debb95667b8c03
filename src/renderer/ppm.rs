//! Binary PPM (P6) images
//!
//! Used by the native host as its image source and display surface.

use std::io::{Read, Write};

use super::to_rgb;
use crate::error::PpmError;
use crate::sim::PixelFrame;

/// Write `frame` as an 8-bit P6 image
pub fn write<W: Write>(mut out: W, frame: &PixelFrame) -> Result<(), PpmError> {
    write!(out, "P6\n{} {}\n255\n", frame.width(), frame.height())?;
    out.write_all(&to_rgb(frame))?;
    out.flush()?;
    Ok(())
}

/// Read an 8-bit P6 image
pub fn read<R: Read>(mut input: R) -> Result<PixelFrame, PpmError> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;

    let mut header = Header::new(&bytes);
    if header.token()? != b"P6" {
        return Err(PpmError::Format("not a binary PPM (P6)".into()));
    }
    let width = header.number()?;
    let height = header.number()?;
    let max = header.number()?;
    if max != 255 {
        return Err(PpmError::Format(format!("unsupported max value {max}")));
    }
    // Exactly one whitespace byte separates the header from the raster
    let start = header.pos + 1;

    let len = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| PpmError::Format(format!("image too large: {width}x{height}")))?;
    let raster = bytes
        .get(start..start.saturating_add(len))
        .ok_or_else(|| PpmError::Format(format!("raster shorter than {len} bytes")))?;

    PixelFrame::from_fn(width, height, |x, y| {
        let at = (y * width + x) * 3;
        [raster[at + 2], raster[at + 1], raster[at]]
    })
    .map_err(|e| PpmError::Format(e.to_string()))
}

/// Whitespace/comment-aware header tokenizer
struct Header<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Header<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn token(&mut self) -> Result<&'a [u8], PpmError> {
        loop {
            match self.bytes.get(self.pos) {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'#') => {
                    while self.bytes.get(self.pos).is_some_and(|&b| b != b'\n') {
                        self.pos += 1;
                    }
                }
                Some(_) => break,
                None => return Err(PpmError::Format("truncated header".into())),
            }
        }
        let start = self.pos;
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|b| !b.is_ascii_whitespace())
        {
            self.pos += 1;
        }
        Ok(&self.bytes[start..self.pos])
    }

    fn number(&mut self) -> Result<usize, PpmError> {
        let token = self.token()?;
        std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| PpmError::Format(format!("bad header number {:?}", token)))
    }
}
