//! vtstyle renders style-driven markers for vector map tiles.
//!
//! A [`MarkersSymbolizer`] is configured from style-sheet parameters, each a literal or an
//! [`Expression`] evaluated per build against a [`FeatureExpressionContext`]. On
//! [`Symbolizer::build`] it:
//!
//! 1. **Binds**: re-evaluates every bound parameter, falling back to defaults on failure.
//! 2. **Resolves a glyph**: loads the `file` bitmap through a [`BitmapManager`], or
//!    rasterizes a procedural ellipse/arrow and caches it under a content key.
//! 3. **Places**: maps each feature geometry to anchors, whole polylines, or rotated
//!    positions walked along lines at a fixed spacing.
//! 4. **Flushes**: hands batches sharing one style to a [`TileLayerBuilder`], either as
//!    always-drawn points or as collision-managed bitmap labels.
//!
//! All pixels are premultiplied RGBA8. `unsafe` is forbidden.
#![forbid(unsafe_code)]

mod assets;
mod expression;
mod feature;
mod foundation;
mod glyph;
mod placement;
mod scene;
mod style;
mod symbolizer;
mod tile;

pub use assets::bitmap::Bitmap;
pub use assets::decode::{decode_image, decode_svg, encode_png};
pub use assets::font::{FontHandle, FontManager, NullFontManager};
pub use assets::manager::{BitmapManager, FileBitmapManager, normalize_rel_path};
pub use expression::Expression;
pub use expression::context::FeatureExpressionContext;
pub use expression::value::Value;
pub use feature::collection::{Feature, FeatureCollection};
pub use feature::geometry::{
    Geometry, LineGeometry, PointGeometry, PolygonGeometry, Vertex, mid_point, polygon_contains,
    surface_point,
};
pub use foundation::core::{Affine, Color, Point, Rect, Vec2};
pub use foundation::error::{StyleError, StyleResult};
pub use glyph::canvas::{GlyphCanvas, make_arrow_bitmap, make_ellipse_bitmap};
pub use glyph::resolver::{
    GlyphRequest, GlyphResolver, MarkerDefaults, MarkerShape, ResolvedGlyph, marker_cache_key,
};
pub use placement::line::{LinePlacement, LineWalk};
pub use placement::{Placement, PlacementGenerator};
pub use scene::{RenderedTile, Scene, StyleParameter};
pub use style::params::{CompOp, LabelOrientation, convert_comp_op, convert_label_placement};
pub use style::transform::{
    Transform, compose_transform_list, contains_rotation, parse_transform, parse_transform_list,
};
pub use symbolizer::base::SymbolizerBase;
pub use symbolizer::binding::{
    Bound, Converter, FromValue, TransformBinding, convert_color, convert_transform,
};
pub use symbolizer::context::{SymbolizerContext, SymbolizerSettings};
pub use symbolizer::markers::MarkersSymbolizer;
pub use symbolizer::{BuildStatus, BuildSummary, Symbolizer};
pub use tile::batch::{BatchStyle, DrawMode, PlacementQueue};
pub use tile::builder::{
    BitmapLabelInfo, BitmapLabelStyle, GROUP_ALWAYS, GROUP_COLLIDING, LabelPosition,
    PointStyle, TileLayerBuilder, bitmap_id,
};
pub use tile::composite::{PremulRgba8, blend, blend_in_place};
pub use tile::raster::{RasterLayerBuilder, RasterStats};
pub use tile::recording::{RecordedBatch, RecordingLayerBuilder};
