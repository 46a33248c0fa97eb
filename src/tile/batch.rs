use std::sync::Arc;

use crate::{
    assets::{bitmap::Bitmap, font::FontHandle},
    feature::geometry::Vertex,
    foundation::core::{Affine, Color},
    foundation::error::StyleResult,
    placement::Placement,
    style::params::{CompOp, LabelOrientation},
    tile::builder::{
        BitmapLabelInfo, BitmapLabelStyle, GROUP_ALWAYS, GROUP_COLLIDING, LabelPosition,
        PointStyle, TileLayerBuilder, bitmap_id,
    },
};

/// Which builder entry point a symbolizer feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawMode {
    /// `add_points`: always drawn, overlaps allowed.
    Overlay,
    /// `add_bitmap_labels`: collision managed.
    Label,
}

impl DrawMode {
    pub fn from_allow_overlap(allow_overlap: bool) -> Self {
        if allow_overlap {
            Self::Overlay
        } else {
            Self::Label
        }
    }

    pub fn group_id(self) -> i32 {
        match self {
            Self::Overlay => GROUP_ALWAYS,
            Self::Label => GROUP_COLLIDING,
        }
    }
}

/// Per-build inputs every flushed style snapshot is derived from.
#[derive(Clone, Debug)]
pub struct BatchStyle {
    pub comp_op: CompOp,
    pub orientation: LabelOrientation,
    pub fill_opacity: f32,
    pub bitmap: Arc<Bitmap>,
    pub glyph_key: String,
    pub scale_x: f32,
    pub scale_y: f32,
    pub font: FontHandle,
    pub ignore_placement: bool,
}

/// Accumulates placements until the style (transform) changes, then hands them to the
/// builder as one batch.
#[derive(Debug)]
pub struct PlacementQueue {
    mode: DrawMode,
    style: BatchStyle,
    points: Vec<(i64, Vertex)>,
    labels: Vec<(i64, BitmapLabelInfo)>,
    flushes: usize,
    submitted: usize,
}

impl PlacementQueue {
    pub fn new(mode: DrawMode, style: BatchStyle) -> Self {
        Self {
            mode,
            style,
            points: Vec::new(),
            labels: Vec::new(),
            flushes: 0,
            submitted: 0,
        }
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    /// Queued records not yet flushed.
    pub fn len(&self) -> usize {
        self.points.len() + self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builder calls made so far.
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    /// Records handed to the builder so far.
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Queue one placement. Returns `false` when the placement has no drawable position.
    pub fn add(&mut self, local_id: i64, global_id: u64, placement: &Placement) -> bool {
        match self.mode {
            DrawMode::Overlay => {
                let Some(vertex) = placement.anchor() else {
                    return false;
                };
                self.points.push((local_id, vertex));
            }
            DrawMode::Label => {
                let position = match placement {
                    Placement::Anchor(p) => LabelPosition::Point(*p),
                    Placement::Oriented { position, .. } => LabelPosition::Point(*position),
                    Placement::Polyline(v) => LabelPosition::Line(v.clone()),
                };
                self.labels.push((
                    local_id,
                    BitmapLabelInfo {
                        bitmap_id: bitmap_id(global_id, &self.style.glyph_key),
                        group_id: self.mode.group_id(),
                        position,
                        min_distance: 0.0,
                        ignore_placement: self.style.ignore_placement,
                    },
                ));
            }
        }
        true
    }

    /// Submit everything queued as one batch drawn with `transform`, even if nothing is queued.
    pub fn flush(
        &mut self,
        transform: Affine,
        builder: &mut dyn TileLayerBuilder,
    ) -> StyleResult<()> {
        let transform = transform
            * Affine::scale_non_uniform(
                f64::from(self.style.scale_x),
                f64::from(self.style.scale_y),
            );
        let count = self.len();
        tracing::debug!(mode = ?self.mode, count, "flush placements");

        match self.mode {
            DrawMode::Overlay => {
                let style = PointStyle {
                    comp_op: self.style.comp_op,
                    orientation: self.style.orientation,
                    fill: Color::WHITE,
                    opacity: self.style.fill_opacity,
                    bitmap: self.style.bitmap.clone(),
                    transform,
                };
                builder.add_points(&mut self.points.drain(..), style)?;
            }
            DrawMode::Label => {
                let style = BitmapLabelStyle {
                    orientation: self.style.orientation,
                    color: Color::from_color_opacity(Color::WHITE, self.style.fill_opacity),
                    font: self.style.font.clone(),
                    bitmap: self.style.bitmap.clone(),
                    transform,
                };
                builder.add_bitmap_labels(&mut self.labels.drain(..), style)?;
            }
        }
        self.flushes += 1;
        self.submitted += count;
        Ok(())
    }

    /// Like [`flush`](Self::flush), but skips the builder call when nothing is queued.
    pub fn flush_pending(
        &mut self,
        transform: Affine,
        builder: &mut dyn TileLayerBuilder,
    ) -> StyleResult<()> {
        if self.is_empty() {
            return Ok(());
        }
        self.flush(transform, builder)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tile/batch.rs"]
mod tests;
