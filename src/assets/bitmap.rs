use std::sync::Arc;

use crate::foundation::error::{StyleError, StyleResult};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Raster glyph in premultiplied RGBA8 form.
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl Bitmap {
    /// Wrap premultiplied pixel bytes, checking that the length matches the dimensions.
    pub fn new(width: u32, height: u32, rgba8_premul: Vec<u8>) -> StyleResult<Self> {
        if width == 0 || height == 0 {
            return Err(StyleError::validation("bitmap dimensions must be non-zero"));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| StyleError::validation("bitmap dimensions overflow"))?;
        if rgba8_premul.len() != expected {
            return Err(StyleError::validation(format!(
                "bitmap byte length {} does not match {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Premultiplied RGBA8 value at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.rgba8_premul.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}
