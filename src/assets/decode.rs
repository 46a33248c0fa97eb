use std::sync::Arc;

use anyhow::Context;

use crate::{
    assets::bitmap::Bitmap,
    foundation::error::{StyleError, StyleResult},
};

/// Decode encoded raster bytes (PNG, JPEG, ...) into a premultiplied bitmap.
pub fn decode_image(bytes: &[u8]) -> StyleResult<Bitmap> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Bitmap::new(width, height, rgba8_premul)
}

/// Parse SVG bytes and rasterize them at their intrinsic size.
pub fn decode_svg(bytes: &[u8]) -> StyleResult<Bitmap> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;

    let size = tree.size();
    let to_px = |v: f32| -> StyleResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(StyleError::asset("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    };
    let width = to_px(size.width())?;
    let height = to_px(size.height())?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| StyleError::asset("failed to allocate svg pixmap"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );
    Bitmap::new(width, height, pixmap.data().to_vec())
}

/// Encode a premultiplied bitmap as PNG bytes (straight alpha).
pub fn encode_png(bitmap: &Bitmap) -> StyleResult<Vec<u8>> {
    let mut straight = bitmap.rgba8_premul.as_ref().clone();
    unpremultiply_rgba8_in_place(&mut straight);
    let img = image::RgbaImage::from_raw(bitmap.width, bitmap.height, straight)
        .ok_or_else(|| StyleError::validation("bitmap byte length mismatch"))?;
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(out)
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
