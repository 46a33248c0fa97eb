use crate::{
    feature::geometry::Vertex,
    foundation::core::{Point, Vec2},
};

/// One marker position along a line, with the unit tangent of its segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinePlacement {
    pub position: Vertex,
    pub direction: Vec2,
}

/// Fixed-spacing walk along a polyline in pixel units.
///
/// The first marker sits at half of `min(first segment, spacing)`; each following one is
/// `spacing + glyph_size` further along. Leftover length carries across vertices. Only
/// positions strictly inside the unit tile are emitted, so neighbouring tiles that share
/// the line do not both draw the same marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineWalk {
    /// Distance between consecutive markers, in pixels. Must be positive.
    pub spacing: f64,
    /// Footprint of one marker, in pixels.
    pub glyph_size: f64,
    /// Pixels per tile unit.
    pub tile_size: f64,
}

impl LineWalk {
    pub fn new(spacing: f64, glyph_size: f64, tile_size: f64) -> Self {
        Self {
            spacing,
            glyph_size,
            tile_size,
        }
    }

    pub fn walk(&self, vertices: &[Vertex]) -> Vec<LinePlacement> {
        let mut out = Vec::new();
        let step = self.spacing + self.glyph_size.max(0.0);
        if !(step > 0.0 && step.is_finite()) {
            return out;
        }

        let mut line_pos = 0.0;
        for (i, seg) in vertices.windows(2).enumerate() {
            let (v0, v1) = (seg[0], seg[1]);
            let delta = v1 - v0;
            let line_len = delta.hypot() * self.tile_size;
            if !line_len.is_finite() {
                continue;
            }
            if i == 0 {
                line_pos = line_len.min(self.spacing) * 0.5;
            }

            while line_pos < line_len {
                let pos = v0 + delta * (line_pos / line_len);
                if inside_unit_tile(pos) {
                    out.push(LinePlacement {
                        position: pos,
                        direction: delta.normalize(),
                    });
                }
                line_pos += step;
            }
            line_pos -= line_len;
        }
        out
    }
}

fn inside_unit_tile(p: Point) -> bool {
    p.x.min(p.y) > 0.0 && p.x.max(p.y) < 1.0
}

#[cfg(test)]
#[path = "../../tests/unit/placement/line.rs"]
mod tests;
