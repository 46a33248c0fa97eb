use std::{path::Path, sync::Arc};

use crate::{
    assets::{bitmap::Bitmap, manager::FileBitmapManager},
    expression::context::FeatureExpressionContext,
    feature::collection::FeatureCollection,
    foundation::error::{StyleError, StyleResult},
    symbolizer::{
        BuildSummary, Symbolizer,
        context::{SymbolizerContext, SymbolizerSettings},
        markers::MarkersSymbolizer,
    },
    tile::raster::{RasterLayerBuilder, RasterStats},
};

/// One `name = value` style parameter, applied in document order.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StyleParameter {
    pub name: String,
    pub value: String,
}

/// A self-contained markers tile: settings, style, expression context and features.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Scene {
    pub settings: SymbolizerSettings,
    pub parameters: Vec<StyleParameter>,
    pub context: FeatureExpressionContext,
    pub features: FeatureCollection,
}

/// Output of [`Scene::render`].
#[derive(Clone, Debug)]
pub struct RenderedTile {
    pub tile: Bitmap,
    pub summary: BuildSummary,
    pub stats: RasterStats,
}

impl Scene {
    pub fn from_json_str(s: &str) -> StyleResult<Self> {
        let scene: Self = serde_json::from_str(s)
            .map_err(|e| StyleError::validation(format!("scene json: {e}")))?;
        scene.settings.validate()?;
        Ok(scene)
    }

    /// A markers symbolizer with this scene's parameters bound.
    pub fn symbolizer(&self) -> StyleResult<MarkersSymbolizer> {
        let mut sym = MarkersSymbolizer::new();
        for p in &self.parameters {
            sym.bind_parameter(&p.name, &p.value)?;
        }
        Ok(sym)
    }

    /// Build the scene into a raster tile; marker files resolve relative to `asset_root`.
    pub fn render(&self, asset_root: &Path) -> StyleResult<RenderedTile> {
        let sym = self.symbolizer()?;
        let ctx = SymbolizerContext::new(
            self.settings,
            Arc::new(FileBitmapManager::new(asset_root)),
        );
        let mut raster = RasterLayerBuilder::new(self.settings.tile_size)?;
        let summary = sym.build(&self.features, &self.context, &ctx, &mut raster)?;
        Ok(RenderedTile {
            tile: raster.to_bitmap()?,
            summary,
            stats: raster.stats(),
        })
    }
}
