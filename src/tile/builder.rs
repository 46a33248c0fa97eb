use std::sync::Arc;

use crate::{
    assets::{bitmap::Bitmap, font::FontHandle},
    feature::geometry::{Vertex, mid_point},
    foundation::core::{Affine, Color, Vec2},
    foundation::error::StyleResult,
    foundation::math::Fnv1a64,
    style::params::{CompOp, LabelOrientation},
};

/// Label group that is always drawn, bypassing collision checks.
pub const GROUP_ALWAYS: i32 = -1;
/// Label group subject to collision suppression.
pub const GROUP_COLLIDING: i32 = 0;

/// Where a bitmap label sits: a point, or a polyline the label is attached to.
#[derive(Clone, Debug, PartialEq)]
pub enum LabelPosition {
    Point(Vertex),
    Line(Arc<[Vertex]>),
}

impl LabelPosition {
    /// Anchor point and, for lines, the direction of the segment under it.
    pub fn anchor(&self) -> Option<(Vertex, Option<Vec2>)> {
        match self {
            Self::Point(p) => Some((*p, None)),
            Self::Line(vertices) => {
                let mid = mid_point(vertices)?;
                Some((mid, direction_at(vertices, mid)))
            }
        }
    }
}

fn direction_at(vertices: &[Vertex], at: Vertex) -> Option<Vec2> {
    vertices
        .windows(2)
        .filter(|w| w[0] != w[1])
        .min_by(|a, b| {
            seg_distance(a[0], a[1], at).total_cmp(&seg_distance(b[0], b[1], at))
        })
        .map(|w| (w[1] - w[0]).normalize())
}

fn seg_distance(a: Vertex, b: Vertex, p: Vertex) -> f64 {
    let ab = b - a;
    let t = ((p - a).dot(ab) / ab.hypot2()).clamp(0.0, 1.0);
    (a.lerp(b, t) - p).hypot()
}

/// One bitmap label handed to [`TileLayerBuilder::add_bitmap_labels`].
#[derive(Clone, Debug, PartialEq)]
pub struct BitmapLabelInfo {
    /// Identity used to dedupe the same label across tiles.
    pub bitmap_id: u64,
    /// [`GROUP_ALWAYS`] or [`GROUP_COLLIDING`].
    pub group_id: i32,
    pub position: LabelPosition,
    pub min_distance: f32,
    /// Drawn, but does not reserve space for later labels.
    pub ignore_placement: bool,
}

/// Label identity derived from the feature and the glyph it shows.
pub fn bitmap_id(global_id: u64, glyph_key: &str) -> u64 {
    let mut h = Fnv1a64::new_default();
    h.write_u64(global_id);
    h.write_bytes(glyph_key.as_bytes());
    h.finish()
}

/// Style shared by every point of an `add_points` batch.
#[derive(Clone, Debug)]
pub struct PointStyle {
    pub comp_op: CompOp,
    pub orientation: LabelOrientation,
    /// Tint multiplied with the bitmap.
    pub fill: Color,
    pub opacity: f32,
    pub bitmap: Arc<Bitmap>,
    /// Bitmap-space to marker-space transform, scale included.
    pub transform: Affine,
}

/// Style shared by every label of an `add_bitmap_labels` batch.
#[derive(Clone, Debug)]
pub struct BitmapLabelStyle {
    pub orientation: LabelOrientation,
    pub color: Color,
    pub font: FontHandle,
    pub bitmap: Arc<Bitmap>,
    pub transform: Affine,
}

/// Consumer of symbolizer output for one tile layer.
///
/// Each call receives a finite batch that shares a single style. Batches may be empty.
pub trait TileLayerBuilder {
    /// Add points that are always drawn.
    fn add_points(
        &mut self,
        points: &mut dyn Iterator<Item = (i64, Vertex)>,
        style: PointStyle,
    ) -> StyleResult<()>;

    /// Add bitmap labels that take part in label placement.
    fn add_bitmap_labels(
        &mut self,
        labels: &mut dyn Iterator<Item = (i64, BitmapLabelInfo)>,
        style: BitmapLabelStyle,
    ) -> StyleResult<()>;
}

#[cfg(test)]
#[path = "../../tests/unit/tile/builder.rs"]
mod tests;
