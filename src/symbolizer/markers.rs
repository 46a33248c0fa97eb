use std::sync::Mutex;

use crate::{
    expression::{Expression, context::FeatureExpressionContext},
    feature::collection::FeatureCollection,
    foundation::core::{Affine, Color},
    foundation::error::{StyleError, StyleResult},
    glyph::resolver::{GlyphRequest, GlyphResolver},
    placement::{Placement, PlacementGenerator, line::LineWalk},
    style::params::{LabelOrientation, convert_comp_op, convert_label_placement},
    symbolizer::{
        BuildSummary, Symbolizer,
        base::SymbolizerBase,
        binding::{Bound, TransformBinding, convert_color},
        context::SymbolizerContext,
    },
    tile::{
        batch::{BatchStyle, DrawMode, PlacementQueue},
        builder::TileLayerBuilder,
    },
};

#[derive(Clone, Debug)]
struct MarkersParams {
    file: Bound<String>,
    placement: Bound<String>,
    marker_type: Bound<String>,
    fill: Bound<Color>,
    fill_opacity: Bound<f32>,
    stroke: Bound<Color>,
    stroke_opacity: Bound<f32>,
    stroke_width: Bound<f32>,
    width: Bound<f32>,
    width_defined: bool,
    height: Bound<f32>,
    height_defined: bool,
    spacing: Bound<f32>,
    allow_overlap: Bound<bool>,
    ignore_placement: Bound<bool>,
    transform: TransformBinding,
    comp_op: Bound<String>,
}

impl Default for MarkersParams {
    fn default() -> Self {
        Self {
            file: Bound::new(String::new()),
            placement: Bound::new("point".to_owned()),
            marker_type: Bound::new(String::new()),
            fill: Bound::with_converter(Color::from_argb(0xff00_00ff), convert_color),
            fill_opacity: Bound::new(1.0),
            stroke: Bound::with_converter(Color::BLACK, convert_color),
            stroke_opacity: Bound::new(1.0),
            stroke_width: Bound::new(0.0),
            width: Bound::new(0.0),
            width_defined: false,
            height: Bound::new(0.0),
            height_defined: false,
            spacing: Bound::new(100.0),
            allow_overlap: Bound::new(false),
            ignore_placement: Bound::new(false),
            transform: TransformBinding::default(),
            comp_op: Bound::new("src-over".to_owned()),
        }
    }
}

impl MarkersParams {
    fn update_bindings(&mut self, ctx: &FeatureExpressionContext) {
        self.file.update(ctx);
        self.placement.update(ctx);
        self.marker_type.update(ctx);
        self.fill.update(ctx);
        self.fill_opacity.update(ctx);
        self.stroke.update(ctx);
        self.stroke_opacity.update(ctx);
        self.stroke_width.update(ctx);
        self.width.update(ctx);
        self.height.update(ctx);
        self.spacing.update(ctx);
        self.allow_overlap.update(ctx);
        self.ignore_placement.update(ctx);
        self.transform.update(ctx);
        self.comp_op.update(ctx);
    }

    fn glyph_request(&self, placement: LabelOrientation) -> GlyphRequest {
        GlyphRequest {
            file: self.file.get(),
            marker_type: self.marker_type.get(),
            placement,
            fill: self.fill.get(),
            fill_opacity: self.fill_opacity.get(),
            stroke: self.stroke.get(),
            stroke_opacity: self.stroke_opacity.get(),
            stroke_width: self.stroke_width.get(),
            width: self.width.get(),
            width_defined: self.width_defined,
            height: self.height.get(),
            height_defined: self.height_defined,
        }
    }
}

/// Draws a bitmap marker (an external file, or a procedural ellipse or arrow) at every
/// point, polygon interior and line of a feature collection.
#[derive(Debug, Default)]
pub struct MarkersSymbolizer {
    params: Mutex<MarkersParams>,
    base: SymbolizerBase,
}

impl MarkersSymbolizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters handed to the base handler because markers do not use them.
    pub fn base(&self) -> &SymbolizerBase {
        &self.base
    }
}

impl Symbolizer for MarkersSymbolizer {
    fn bind_parameter(&mut self, name: &str, value: &str) -> StyleResult<()> {
        let string = || Expression::parse_string(value);
        let expr = || Expression::parse(value);
        let p = self
            .params
            .get_mut()
            .map_err(|_| StyleError::evaluation("markers symbolizer lock poisoned"))?;
        match name {
            "file" => p.file.bind(string()?),
            "placement" => p.placement.bind(string()?),
            "marker-type" => p.marker_type.bind(string()?),
            "fill" => p.fill.bind(string()?),
            "fill-opacity" => p.fill_opacity.bind(expr()?),
            "stroke" => p.stroke.bind(string()?),
            "stroke-opacity" => p.stroke_opacity.bind(expr()?),
            "stroke-width" => p.stroke_width.bind(expr()?),
            "width" => {
                p.width.bind(expr()?);
                p.width_defined = true;
            }
            "height" => {
                p.height.bind(expr()?);
                p.height_defined = true;
            }
            "spacing" => p.spacing.bind(expr()?),
            "allow-overlap" => p.allow_overlap.bind(expr()?),
            "ignore-placement" => p.ignore_placement.bind(expr()?),
            "transform" => p.transform.bind(string()?),
            "comp-op" => p.comp_op.bind(string()?),
            "opacity" => {
                let e = expr()?;
                p.fill_opacity.bind(e.clone());
                p.stroke_opacity.bind(e);
            }
            _ => return self.base.bind_parameter(name, value),
        }
        Ok(())
    }

    /// Holds the parameter lock for the whole call, so concurrent builds on one instance
    /// run one after another.
    #[tracing::instrument(skip_all, fields(features = features.len()))]
    fn build(
        &self,
        features: &FeatureCollection,
        expr_ctx: &FeatureExpressionContext,
        ctx: &SymbolizerContext,
        builder: &mut dyn TileLayerBuilder,
    ) -> StyleResult<BuildSummary> {
        let mut params = self
            .params
            .lock()
            .map_err(|_| StyleError::evaluation("markers symbolizer lock poisoned"))?;
        params.update_bindings(expr_ctx);

        let settings = &ctx.settings;
        let comp_op = convert_comp_op(params.comp_op.value());
        let placement = convert_label_placement(params.placement.value());
        let spacing = params.spacing.get();
        let rotated = params.transform.has_rotation(expr_ctx);
        let walk_lines = placement == LabelOrientation::Line && spacing > 0.0 && !rotated;

        // Rotation comes from the transform or from the line walk, never from the builder.
        let orientation = if rotated || (placement == LabelOrientation::Line && spacing > 0.0) {
            LabelOrientation::Point
        } else {
            placement
        };

        let resolver = GlyphResolver::new(settings.font_scale, settings.markers);
        let request = params.glyph_request(placement);
        let glyph = match resolver.resolve(&request, ctx.bitmap_manager.as_ref()) {
            Ok(glyph) => glyph,
            Err(err) => {
                tracing::error!(file = %request.file, %err, "failed to resolve marker bitmap");
                return Ok(BuildSummary::glyph_unavailable());
            }
        };

        let generator = PlacementGenerator::new(
            if rotated {
                LabelOrientation::Point
            } else {
                placement
            },
            walk_lines.then(|| {
                LineWalk::new(
                    f64::from(spacing),
                    f64::from(glyph.size()),
                    f64::from(settings.tile_size),
                )
            }),
        );

        let base = params.transform.value();
        let mut queue = PlacementQueue::new(
            DrawMode::from_allow_overlap(params.allow_overlap.get()),
            BatchStyle {
                comp_op,
                orientation,
                fill_opacity: glyph.fill_opacity,
                bitmap: glyph.bitmap.clone(),
                glyph_key: glyph.key.clone(),
                scale_x: glyph.scale_x,
                scale_y: glyph.scale_y,
                font: ctx.font_manager.null_font(),
                ignore_placement: params.ignore_placement.get(),
            },
        );

        let mut skipped_features = 0;
        for feature in features {
            let Some(placements) = generator.placements(&feature.geometry) else {
                tracing::warn!(
                    local_id = feature.local_id,
                    geometry = feature.geometry.kind(),
                    "unsupported geometry for markers"
                );
                skipped_features += 1;
                continue;
            };

            for placement in &placements {
                match placement {
                    Placement::Oriented { direction, .. } => {
                        queue.flush_pending(base, builder)?;
                        queue.add(feature.local_id, 0, placement);
                        let rotation = Affine::new([
                            direction.x,
                            direction.y,
                            -direction.y,
                            direction.x,
                            0.0,
                            0.0,
                        ]);
                        queue.flush(rotation * base, builder)?;
                    }
                    _ => {
                        queue.add(feature.local_id, feature.global_id, placement);
                    }
                }
            }
        }
        queue.flush(base, builder)?;

        Ok(BuildSummary {
            placements: queue.submitted(),
            flushes: queue.flushes(),
            skipped_features,
            glyph_key: Some(glyph.key),
            ..BuildSummary::default()
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/symbolizer/markers.rs"]
mod tests;
