use kurbo::{BezPath, Ellipse, Point, Rect, Shape};

use crate::{
    assets::bitmap::Bitmap,
    foundation::core::Color,
    foundation::error::{StyleError, StyleResult},
};

/// Immediate-mode raster canvas for procedural marker shapes.
///
/// Coordinates are in canvas pixels with the origin at the top-left corner. Shapes are
/// composited source-over in draw order with the current color.
pub struct GlyphCanvas {
    width: u16,
    height: u16,
    color: Color,
    ctx: vello_cpu::RenderContext,
}

impl GlyphCanvas {
    /// Create a transparent canvas; dimensions are clamped to at least one pixel.
    pub fn new(width: u32, height: u32) -> StyleResult<Self> {
        let to_u16 = |v: u32, what: &str| -> StyleResult<u16> {
            u16::try_from(v.max(1))
                .map_err(|_| StyleError::validation(format!("glyph {what} {v} exceeds u16")))
        };
        let width = to_u16(width, "width")?;
        let height = to_u16(height, "height")?;
        Ok(Self {
            width,
            height,
            color: Color::BLACK,
            ctx: vello_cpu::RenderContext::new(width, height),
        })
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Set the paint used by subsequent draw calls.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r(),
            color.g(),
            color.b(),
            color.a(),
        ));
    }

    /// Fill an axis-aligned ellipse. Non-positive radii draw nothing.
    pub fn draw_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        if !(rx > 0.0 && ry > 0.0) {
            return;
        }
        let ellipse = Ellipse::new(
            Point::new(f64::from(cx), f64::from(cy)),
            (f64::from(rx), f64::from(ry)),
            0.0,
        );
        self.fill(&ellipse.to_path(0.01));
    }

    /// Fill the rectangle from `(x0, y0)` to `(x1, y1)`. Empty or inverted spans draw nothing.
    pub fn draw_rectangle(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        if !(x1 > x0 && y1 > y0) {
            return;
        }
        let rect = Rect::new(
            f64::from(x0),
            f64::from(y0),
            f64::from(x1),
            f64::from(y1),
        );
        self.fill(&rect.to_path(0.01));
    }

    /// Fill a triangle.
    pub fn draw_triangle(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, x2: f32, y2: f32) {
        let mut path = BezPath::new();
        path.move_to((f64::from(x0), f64::from(y0)));
        path.line_to((f64::from(x1), f64::from(y1)));
        path.line_to((f64::from(x2), f64::from(y2)));
        path.close_path();
        self.fill(&path);
    }

    fn fill(&mut self, path: &BezPath) {
        if self.color.a() == 0 {
            return;
        }
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Rasterize everything drawn so far into an immutable bitmap.
    pub fn build_bitmap(mut self) -> StyleResult<Bitmap> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        Bitmap::new(
            u32::from(self.width),
            u32::from(self.height),
            pixmap.data_as_u8_slice().to_vec(),
        )
    }
}

pub(crate) fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Ellipse glyph of logical size `width x height` with an outline of `stroke_width`.
pub fn make_ellipse_bitmap(
    width: f32,
    height: f32,
    color: Color,
    stroke_width: f32,
    stroke_color: Color,
) -> StyleResult<Bitmap> {
    let mut canvas = GlyphCanvas::new(
        canvas_extent(width, stroke_width),
        canvas_extent(height, stroke_width),
    )?;
    let x0 = canvas.width() as f32 * 0.5;
    let y0 = canvas.height() as f32 * 0.5;
    if stroke_width > 0.0 {
        canvas.set_color(stroke_color);
        canvas.draw_ellipse(
            x0,
            y0,
            (width + stroke_width * 0.5) * 0.5,
            (height + stroke_width * 0.5) * 0.5,
        );
    }
    canvas.set_color(color);
    canvas.draw_ellipse(
        x0,
        y0,
        (width - stroke_width * 0.5) * 0.5,
        (height - stroke_width * 0.5) * 0.5,
    );
    canvas.build_bitmap()
}

/// Right-pointing arrow glyph: a shaft over the middle third and a triangular head.
pub fn make_arrow_bitmap(
    width: f32,
    height: f32,
    color: Color,
    stroke_width: f32,
    stroke_color: Color,
) -> StyleResult<Bitmap> {
    let mut canvas = GlyphCanvas::new(
        canvas_extent(width, stroke_width),
        canvas_extent(height, stroke_width),
    )?;
    let half = stroke_width * 0.5;
    let x0 = half;
    let x1 = (width - height * 0.5).ceil();
    let y1 = height / 3.0;
    let y2 = height * 2.0 / 3.0;
    if stroke_width > 0.0 {
        canvas.set_color(stroke_color);
        canvas.draw_rectangle(0.0, y1 - half, x1, y2 + half);
        canvas.draw_triangle(x1 - half, 0.0, x1 - half, height, width, height * 0.5);
    }
    canvas.set_color(color);
    canvas.draw_rectangle(x0, y1, x1, y2);
    canvas.draw_triangle(
        x1,
        stroke_width,
        x1,
        height - half,
        width - half,
        height * 0.5,
    );
    canvas.build_bitmap()
}

fn canvas_extent(size: f32, stroke_width: f32) -> u32 {
    let v = (size + stroke_width).ceil();
    if v.is_finite() && v > 0.0 {
        v.min(f32::from(u16::MAX)) as u32
    } else {
        1
    }
}

#[cfg(test)]
#[path = "../../tests/unit/glyph/canvas.rs"]
mod tests;
