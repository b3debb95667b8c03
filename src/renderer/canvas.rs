//! Browser canvas surface (WASM only)

use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, ImageData};

use super::{from_rgba, to_rgba};
use crate::error::InitError;
use crate::sim::PixelFrame;

/// Blits kernel frames onto a 2D canvas
pub struct CanvasPresenter {
    ctx: CanvasRenderingContext2d,
    pub size: (u32, u32),
}

impl CanvasPresenter {
    /// Size `canvas` to the image and grab its 2D context
    pub fn new(canvas: &HtmlCanvasElement, width: u32, height: u32) -> Result<Self, InitError> {
        canvas.set_width(width);
        canvas.set_height(height);
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| InitError::SourceImage("canvas has no 2D context".into()))?;
        Ok(Self {
            ctx,
            size: (width, height),
        })
    }

    /// Draw `image` and read its pixels back as the source frame
    pub fn capture(&self, image: &HtmlImageElement) -> Result<PixelFrame, InitError> {
        let (width, height) = self.size;
        self.ctx
            .draw_image_with_html_image_element(image, 0.0, 0.0)
            .map_err(|e| InitError::SourceImage(format!("{e:?}")))?;
        let data = self
            .ctx
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .map_err(|e| InitError::SourceImage(format!("{e:?}")))?;
        from_rgba(width as usize, height as usize, &data.data())
    }

    /// Put a rendered frame on screen
    pub fn present(&self, frame: &PixelFrame) {
        let rgba = to_rgba(frame);
        match ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(&rgba),
            frame.width() as u32,
            frame.height() as u32,
        ) {
            Ok(image) => {
                if let Err(e) = self.ctx.put_image_data(&image, 0.0, 0.0) {
                    log::warn!("Present error: {:?}", e);
                }
            }
            Err(e) => log::warn!("Present error: {:?}", e),
        }
    }
}
