use crate::{
    feature::geometry::Vertex,
    foundation::error::StyleResult,
    tile::builder::{BitmapLabelInfo, BitmapLabelStyle, PointStyle, TileLayerBuilder},
};

/// One builder call captured by [`RecordingLayerBuilder`].
#[derive(Clone, Debug)]
pub enum RecordedBatch {
    Points {
        points: Vec<(i64, Vertex)>,
        style: PointStyle,
    },
    BitmapLabels {
        labels: Vec<(i64, BitmapLabelInfo)>,
        style: BitmapLabelStyle,
    },
}

impl RecordedBatch {
    pub fn len(&self) -> usize {
        match self {
            Self::Points { points, .. } => points.len(),
            Self::BitmapLabels { labels, .. } => labels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// [`TileLayerBuilder`] that keeps every batch in memory, in call order.
#[derive(Clone, Debug, Default)]
pub struct RecordingLayerBuilder {
    pub batches: Vec<RecordedBatch>,
}

impl RecordingLayerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded points, flattened across batches.
    pub fn points(&self) -> impl Iterator<Item = &(i64, Vertex)> {
        self.batches.iter().flat_map(|b| match b {
            RecordedBatch::Points { points, .. } => points.as_slice(),
            RecordedBatch::BitmapLabels { .. } => Default::default(),
        })
    }

    /// All recorded labels, flattened across batches.
    pub fn labels(&self) -> impl Iterator<Item = &(i64, BitmapLabelInfo)> {
        self.batches.iter().flat_map(|b| match b {
            RecordedBatch::BitmapLabels { labels, .. } => labels.as_slice(),
            RecordedBatch::Points { .. } => Default::default(),
        })
    }
}

impl TileLayerBuilder for RecordingLayerBuilder {
    fn add_points(
        &mut self,
        points: &mut dyn Iterator<Item = (i64, Vertex)>,
        style: PointStyle,
    ) -> StyleResult<()> {
        self.batches.push(RecordedBatch::Points {
            points: points.collect(),
            style,
        });
        Ok(())
    }

    fn add_bitmap_labels(
        &mut self,
        labels: &mut dyn Iterator<Item = (i64, BitmapLabelInfo)>,
        style: BitmapLabelStyle,
    ) -> StyleResult<()> {
        self.batches.push(RecordedBatch::BitmapLabels {
            labels: labels.collect(),
            style,
        });
        Ok(())
    }
}
