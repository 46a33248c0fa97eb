//! Symbolizers turn a feature collection plus bound style parameters into tile-layer batches.

pub(crate) mod base;
pub(crate) mod binding;
pub(crate) mod context;
pub(crate) mod markers;

use crate::{
    expression::context::FeatureExpressionContext,
    feature::collection::FeatureCollection,
    foundation::error::StyleResult,
    symbolizer::context::SymbolizerContext,
    tile::builder::TileLayerBuilder,
};

/// How a [`Symbolizer::build`] call ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BuildStatus {
    /// All supported features were processed.
    #[default]
    Completed,
    /// The glyph could not be resolved; nothing was sent to the builder.
    GlyphUnavailable,
}

/// What a [`Symbolizer::build`] call produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub status: BuildStatus,
    /// Records handed to the builder.
    pub placements: usize,
    /// Builder calls made.
    pub flushes: usize,
    /// Features whose geometry could not be placed.
    pub skipped_features: usize,
    /// Key of the glyph used, when one was resolved.
    pub glyph_key: Option<String>,
}

impl BuildSummary {
    pub fn glyph_unavailable() -> Self {
        Self {
            status: BuildStatus::GlyphUnavailable,
            ..Self::default()
        }
    }
}

/// A style rule that renders one class of map features.
pub trait Symbolizer: Send + Sync {
    /// Bind a style-sheet parameter. Repeated names overwrite earlier bindings. Unknown
    /// names are accepted; malformed expressions are reported as [`crate::StyleError::Expression`].
    fn bind_parameter(&mut self, name: &str, value: &str) -> StyleResult<()>;

    /// Evaluate bindings against `expr_ctx` and emit the collection into `builder`.
    ///
    /// Calls on one instance are serialized; a concurrent caller blocks until the running
    /// build finishes.
    fn build(
        &self,
        features: &FeatureCollection,
        expr_ctx: &FeatureExpressionContext,
        ctx: &SymbolizerContext,
        builder: &mut dyn TileLayerBuilder,
    ) -> StyleResult<BuildSummary>;
}
