use std::sync::Arc;

use crate::{
    assets::{
        font::{FontManager, NullFontManager},
        manager::BitmapManager,
    },
    foundation::error::{StyleError, StyleResult},
    glyph::resolver::MarkerDefaults,
};

/// Rendering settings shared by all symbolizers of a tile.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SymbolizerSettings {
    /// Tile edge length in pixels.
    pub tile_size: u32,
    /// Multiplier applied to marker sizes.
    pub font_scale: f32,
    pub markers: MarkerDefaults,
}

impl Default for SymbolizerSettings {
    fn default() -> Self {
        Self {
            tile_size: 256,
            font_scale: 1.0,
            markers: MarkerDefaults::default(),
        }
    }
}

impl SymbolizerSettings {
    pub fn validate(&self) -> StyleResult<()> {
        if self.tile_size == 0 {
            return Err(StyleError::validation("tile_size must be > 0"));
        }
        if !(self.font_scale.is_finite() && self.font_scale > 0.0) {
            return Err(StyleError::validation("font_scale must be > 0"));
        }
        self.markers.validate()
    }

    /// Parse and validate settings from JSON; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> StyleResult<Self> {
        let settings: Self = serde_json::from_str(s)
            .map_err(|e| StyleError::validation(format!("settings json: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Everything a symbolizer needs from its surroundings while building.
#[derive(Clone)]
pub struct SymbolizerContext {
    pub settings: SymbolizerSettings,
    pub bitmap_manager: Arc<dyn BitmapManager>,
    pub font_manager: Arc<dyn FontManager>,
}

impl SymbolizerContext {
    pub fn new(settings: SymbolizerSettings, bitmap_manager: Arc<dyn BitmapManager>) -> Self {
        Self {
            settings,
            bitmap_manager,
            font_manager: Arc::new(NullFontManager),
        }
    }

    pub fn with_font_manager(mut self, font_manager: Arc<dyn FontManager>) -> Self {
        self.font_manager = font_manager;
        self
    }
}

impl std::fmt::Debug for SymbolizerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolizerContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/symbolizer/context.rs"]
mod tests;
