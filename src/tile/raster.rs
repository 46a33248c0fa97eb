use std::sync::Arc;

use crate::{
    assets::bitmap::Bitmap,
    feature::geometry::Vertex,
    foundation::core::{Affine, Rect, Vec2},
    foundation::error::{StyleError, StyleResult},
    style::params::{CompOp, LabelOrientation},
    tile::builder::{
        BitmapLabelInfo, BitmapLabelStyle, GROUP_COLLIDING, PointStyle, TileLayerBuilder,
    },
    tile::composite,
};

/// Counters kept by [`RasterLayerBuilder`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RasterStats {
    pub batches: usize,
    pub drawn: usize,
    /// Labels dropped because they collided with an earlier label.
    pub suppressed: usize,
}

/// [`TileLayerBuilder`] that draws batches onto a square premultiplied RGBA8 tile.
///
/// Bitmaps are centered on their anchor. Colliding labels (group `0`) are dropped when
/// their bounding box overlaps one placed earlier; `ignore_placement` labels are drawn but
/// reserve no space.
pub struct RasterLayerBuilder {
    size: u16,
    pixels: Vec<u8>,
    occupied: Vec<Rect>,
    stats: RasterStats,
}

impl RasterLayerBuilder {
    pub fn new(tile_size: u32) -> StyleResult<Self> {
        let size: u16 = tile_size
            .try_into()
            .ok()
            .filter(|s| *s > 0)
            .ok_or_else(|| StyleError::validation("tile_size must be in 1..=65535"))?;
        Ok(Self {
            size,
            pixels: vec![0; usize::from(size) * usize::from(size) * 4],
            occupied: Vec::new(),
            stats: RasterStats::default(),
        })
    }

    pub fn stats(&self) -> RasterStats {
        self.stats
    }

    /// The tile drawn so far.
    pub fn to_bitmap(&self) -> StyleResult<Bitmap> {
        let size = u32::from(self.size);
        Bitmap::new(size, size, self.pixels.clone())
    }

    fn tile_size(&self) -> f64 {
        f64::from(self.size)
    }

    /// Bitmap-space to tile-pixel transform for one placement.
    fn placement_transform(
        &self,
        anchor: Vertex,
        direction: Option<Vec2>,
        style_transform: Affine,
        bitmap: &Bitmap,
    ) -> Affine {
        let rotation = direction
            .map(|d| Affine::new([d.x, d.y, -d.y, d.x, 0.0, 0.0]))
            .unwrap_or(Affine::IDENTITY);
        Affine::translate(anchor.to_vec2() * self.tile_size())
            * rotation
            * style_transform
            * Affine::translate((
                -f64::from(bitmap.width) * 0.5,
                -f64::from(bitmap.height) * 0.5,
            ))
    }

    fn draw_layer(
        &mut self,
        bitmap: &Bitmap,
        opacity: f32,
        comp_op: CompOp,
        transforms: &[Affine],
    ) -> StyleResult<()> {
        self.stats.batches += 1;
        if transforms.is_empty() || opacity <= 0.0 {
            return Ok(());
        }

        let image = bitmap_to_image(bitmap)?;
        let mut ctx = vello_cpu::RenderContext::new(self.size, self.size);
        let bounds = vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(bitmap.width),
            f64::from(bitmap.height),
        );
        for t in transforms {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_transform(affine_to_cpu(*t));
            ctx.set_paint(image.clone());
            if opacity < 1.0 {
                ctx.push_opacity_layer(opacity);
            }
            ctx.fill_rect(&bounds);
            if opacity < 1.0 {
                ctx.pop_layer();
            }
        }
        ctx.flush();

        let mut layer = vello_cpu::Pixmap::new(self.size, self.size);
        ctx.render_to_pixmap(&mut layer);
        composite::blend_in_place(&mut self.pixels, layer.data_as_u8_slice(), comp_op)?;
        self.stats.drawn += transforms.len();
        Ok(())
    }
}

impl TileLayerBuilder for RasterLayerBuilder {
    fn add_points(
        &mut self,
        points: &mut dyn Iterator<Item = (i64, Vertex)>,
        style: PointStyle,
    ) -> StyleResult<()> {
        let transforms: Vec<Affine> = points
            .map(|(_, v)| self.placement_transform(v, None, style.transform, &style.bitmap))
            .collect();
        let opacity = style.opacity * f32::from(style.fill.a()) / 255.0;
        self.draw_layer(&style.bitmap, opacity, style.comp_op, &transforms)
    }

    fn add_bitmap_labels(
        &mut self,
        labels: &mut dyn Iterator<Item = (i64, BitmapLabelInfo)>,
        style: BitmapLabelStyle,
    ) -> StyleResult<()> {
        let mut transforms = Vec::new();
        for (_, label) in labels {
            let Some((anchor, direction)) = label.position.anchor() else {
                continue;
            };
            let direction = match style.orientation {
                LabelOrientation::Line => direction,
                LabelOrientation::Point => None,
            };
            let t = self.placement_transform(anchor, direction, style.transform, &style.bitmap);
            if label.group_id == GROUP_COLLIDING {
                let bbox = t.transform_rect_bbox(Rect::new(
                    0.0,
                    0.0,
                    f64::from(style.bitmap.width),
                    f64::from(style.bitmap.height),
                ));
                if self.occupied.iter().any(|r| overlaps(*r, bbox)) {
                    self.stats.suppressed += 1;
                    continue;
                }
                if !label.ignore_placement {
                    self.occupied.push(bbox);
                }
            }
            transforms.push(t);
        }
        let opacity = f32::from(style.color.a()) / 255.0;
        self.draw_layer(&style.bitmap, opacity, CompOp::SrcOver, &transforms)
    }
}

fn overlaps(a: Rect, b: Rect) -> bool {
    let i = a.intersect(b);
    i.width() > 0.0 && i.height() > 0.0
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bitmap_to_image(bitmap: &Bitmap) -> StyleResult<vello_cpu::Image> {
    let w: u16 = bitmap
        .width
        .try_into()
        .map_err(|_| StyleError::evaluation("bitmap width exceeds u16"))?;
    let h: u16 = bitmap
        .height
        .try_into()
        .map_err(|_| StyleError::evaluation("bitmap height exceeds u16"))?;

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(bitmap.rgba8_premul.len() / 4);
    for px in bitmap.rgba8_premul.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        });
    }
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/tile/raster.rs"]
mod tests;
