use std::sync::Arc;

use crate::{
    assets::{bitmap::Bitmap, manager::BitmapManager},
    foundation::core::Color,
    foundation::error::{StyleError, StyleResult},
    glyph::canvas,
    style::params::LabelOrientation,
};

/// Sizes used for procedural markers when the style leaves them open.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MarkerDefaults {
    /// Diameter of the default ellipse marker.
    pub circle_size: f32,
    /// Width of the default arrow marker.
    pub arrow_width: f32,
    /// Height of the default arrow marker.
    pub arrow_height: f32,
    /// Oversampling applied when rasterizing procedural markers.
    pub supersampling_factor: f32,
    /// Upper bound on procedural marker width, height and stroke width; larger requests
    /// are clamped before rasterizing.
    pub max_size: f32,
}

impl Default for MarkerDefaults {
    fn default() -> Self {
        Self {
            circle_size: 10.0,
            arrow_width: 28.0,
            arrow_height: 14.0,
            supersampling_factor: 4.0,
            max_size: 256.0,
        }
    }
}

impl MarkerDefaults {
    pub(crate) fn validate(&self) -> StyleResult<()> {
        let positive = |v: f32, name: &str| -> StyleResult<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(StyleError::validation(format!("markers.{name} must be > 0")))
            }
        };
        positive(self.circle_size, "circle_size")?;
        positive(self.arrow_width, "arrow_width")?;
        positive(self.arrow_height, "arrow_height")?;
        if !(self.supersampling_factor.is_finite() && self.supersampling_factor >= 1.0) {
            return Err(StyleError::validation(
                "markers.supersampling_factor must be >= 1",
            ));
        }
        positive(self.max_size, "max_size")?;
        // Size plus stroke, supersampled, must fit a u16 canvas.
        if (2.0 * self.max_size * self.supersampling_factor).ceil() > f32::from(u16::MAX) {
            return Err(StyleError::validation(
                "markers.max_size * supersampling_factor is too large",
            ));
        }
        Ok(())
    }

    pub(crate) fn clamp_size(&self, size: f32) -> f32 {
        if size <= self.max_size {
            return size;
        }
        tracing::debug!(size, max = self.max_size, "clamping procedural marker size");
        self.max_size
    }
}

/// Procedural marker shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerShape {
    /// Filled ellipse with an optional outline.
    Ellipse,
    /// Right-pointing arrow.
    Arrow,
}

impl MarkerShape {
    /// Name used in cache keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ellipse => "ellipse",
            Self::Arrow => "arrow",
        }
    }

    /// Shape chosen for a style: explicit `marker-type`, else ellipse unless placed along lines.
    pub fn select(marker_type: &str, placement: LabelOrientation) -> Self {
        if marker_type == "ellipse"
            || (marker_type.is_empty() && placement != LabelOrientation::Line)
        {
            Self::Ellipse
        } else {
            Self::Arrow
        }
    }
}

/// Marker parameters after binding, as seen by the resolver.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphRequest {
    /// External bitmap path; empty selects a procedural marker.
    pub file: String,
    /// `ellipse`, `arrow` or empty.
    pub marker_type: String,
    /// Bound `placement`.
    pub placement: LabelOrientation,
    pub fill: Color,
    pub fill_opacity: f32,
    pub stroke: Color,
    pub stroke_opacity: f32,
    pub stroke_width: f32,
    pub width: f32,
    /// Whether `width` was bound at all, even to zero or a negative value.
    pub width_defined: bool,
    pub height: f32,
    /// Whether `height` was bound at all.
    pub height_defined: bool,
}

/// A bitmap ready for placement plus the scale mapping it to logical marker size.
#[derive(Clone, Debug)]
pub struct ResolvedGlyph {
    pub bitmap: Arc<Bitmap>,
    /// File path or procedural cache key; feeds label bitmap ids.
    pub key: String,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Opacity applied when drawing. Procedural markers bake it into their colors.
    pub fill_opacity: f32,
}

impl ResolvedGlyph {
    /// Larger of the two scaled bitmap dimensions.
    pub fn size(&self) -> f32 {
        (self.bitmap.width as f32 * self.scale_x).max(self.bitmap.height as f32 * self.scale_y)
    }
}

/// Turns a [`GlyphRequest`] into a [`ResolvedGlyph`], loading or synthesizing the bitmap.
#[derive(Clone, Copy, Debug)]
pub struct GlyphResolver {
    pub font_scale: f32,
    pub defaults: MarkerDefaults,
}

impl GlyphResolver {
    pub fn new(font_scale: f32, defaults: MarkerDefaults) -> Self {
        Self {
            font_scale,
            defaults,
        }
    }

    pub fn resolve(
        &self,
        req: &GlyphRequest,
        bitmaps: &dyn BitmapManager,
    ) -> StyleResult<ResolvedGlyph> {
        if !req.file.is_empty() {
            return self.resolve_file(req, bitmaps);
        }

        let fill = Color::from_color_opacity(req.fill, req.fill_opacity);
        let stroke = Color::from_color_opacity(req.stroke, req.stroke_opacity);
        let d = &self.defaults;
        let stroke_width = d.clamp_size(req.stroke_width.abs());
        let shape = MarkerShape::select(&req.marker_type, req.placement);
        let (width, height) = match shape {
            MarkerShape::Ellipse => self.ellipse_size(req),
            MarkerShape::Arrow => self.arrow_size(req),
        };
        let (width, height) = (d.clamp_size(width), d.clamp_size(height));

        let key = marker_cache_key(shape, width, height, fill, stroke_width, stroke);
        let bitmap = match bitmaps.get_bitmap(&key) {
            Some(hit) => hit,
            None => {
                let ss = self.defaults.supersampling_factor;
                let made = match shape {
                    MarkerShape::Ellipse => canvas::make_ellipse_bitmap(
                        width * ss,
                        height * ss,
                        fill,
                        stroke_width * ss,
                        stroke,
                    )?,
                    MarkerShape::Arrow => canvas::make_arrow_bitmap(
                        width * ss,
                        height * ss,
                        fill,
                        stroke_width * ss,
                        stroke,
                    )?,
                };
                let made = Arc::new(made);
                bitmaps.store_bitmap(&key, made.clone());
                tracing::debug!(key = %key, w = made.width, h = made.height, "rasterized marker");
                bitmaps.get_bitmap(&key).unwrap_or(made)
            }
        };

        Ok(ResolvedGlyph {
            scale_x: width * self.font_scale / bitmap.width as f32,
            scale_y: height * self.font_scale / bitmap.height as f32,
            bitmap,
            key,
            fill_opacity: 1.0,
        })
    }

    fn resolve_file(
        &self,
        req: &GlyphRequest,
        bitmaps: &dyn BitmapManager,
    ) -> StyleResult<ResolvedGlyph> {
        let bitmap = bitmaps.load_bitmap(&req.file)?;
        let (bw, bh) = (bitmap.width as f32, bitmap.height as f32);
        let fs = self.font_scale;
        let (scale_x, scale_y) = if req.width > 0.0 {
            let sx = fs * req.width / bw;
            let sy = if req.height > 0.0 {
                fs * req.height / bh
            } else {
                sx
            };
            (sx, sy)
        } else if req.height > 0.0 {
            let s = fs * req.height / bh;
            (s, s)
        } else {
            (fs, fs)
        };
        Ok(ResolvedGlyph {
            bitmap,
            key: req.file.clone(),
            scale_x,
            scale_y,
            fill_opacity: req.fill_opacity,
        })
    }

    fn ellipse_size(&self, req: &GlyphRequest) -> (f32, f32) {
        if req.width_defined {
            let w = req.width.abs();
            let h = if req.height_defined {
                req.height.abs()
            } else {
                w
            };
            (w, h)
        } else if req.height_defined {
            let h = req.height.abs();
            (h, h)
        } else {
            (self.defaults.circle_size, self.defaults.circle_size)
        }
    }

    fn arrow_size(&self, req: &GlyphRequest) -> (f32, f32) {
        let d = &self.defaults;
        if req.width > 0.0 {
            let h = if req.height > 0.0 {
                req.height
            } else {
                d.arrow_height * req.width / d.arrow_width
            };
            (req.width, h)
        } else if req.height > 0.0 {
            (d.arrow_width * req.height / d.arrow_height, req.height)
        } else {
            (d.arrow_width, d.arrow_height)
        }
    }
}

/// Cache key for a procedural marker; equal inputs always give equal keys.
pub fn marker_cache_key(
    shape: MarkerShape,
    width: f32,
    height: f32,
    fill: Color,
    stroke_width: f32,
    stroke: Color,
) -> String {
    format!(
        "__default_marker_{}_{width}_{height}_{}_{stroke_width}_{}.bmp",
        shape.as_str(),
        fill.value(),
        stroke.value()
    )
}

#[cfg(test)]
#[path = "../../tests/unit/glyph/resolver.rs"]
mod tests;
