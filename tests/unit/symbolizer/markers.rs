use std::sync::Arc;

use super::*;
use crate::assets::manager::FileBitmapManager;
use crate::feature::collection::Feature;
use crate::feature::geometry::{Geometry, LineGeometry, PointGeometry};
use crate::foundation::core::Point;
use crate::symbolizer::BuildStatus;
use crate::symbolizer::context::SymbolizerSettings;
use crate::tile::recording::{RecordedBatch, RecordingLayerBuilder};

fn context(name: &str) -> SymbolizerContext {
    let dir = std::env::temp_dir().join(format!("vtstyle_markers_{name}_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    SymbolizerContext::new(
        SymbolizerSettings::default(),
        Arc::new(FileBitmapManager::new(dir)),
    )
}

fn bind(sym: &mut MarkersSymbolizer, pairs: &[(&str, &str)]) {
    for (name, value) in pairs {
        sym.bind_parameter(name, value).unwrap();
    }
}

fn one_point() -> FeatureCollection {
    std::iter::once(Feature::new(
        1,
        11,
        Geometry::Point(PointGeometry {
            vertices: vec![Point::new(0.5, 0.5)],
        }),
    ))
    .collect()
}

#[test]
fn width_and_height_track_definition() {
    let mut sym = MarkersSymbolizer::new();
    bind(&mut sym, &[("width", "0")]);
    let p = sym.params.lock().unwrap();
    assert!(p.width_defined);
    assert!(!p.height_defined);
    assert_eq!(p.width.get(), 0.0);
}

#[test]
fn opacity_binds_fill_and_stroke() {
    let mut sym = MarkersSymbolizer::new();
    bind(&mut sym, &[("opacity", "0.25")]);
    let p = sym.params.lock().unwrap();
    assert_eq!(p.fill_opacity.get(), 0.25);
    assert_eq!(p.stroke_opacity.get(), 0.25);
}

#[test]
fn unknown_names_go_to_base() {
    let mut sym = MarkersSymbolizer::new();
    bind(&mut sym, &[("smooth", "0.5"), ("fill", "red")]);
    assert_eq!(
        sym.base().unhandled_parameters().get("smooth").map(String::as_str),
        Some("0.5")
    );
    assert!(!sym.base().unhandled_parameters().contains_key("fill"));
}

#[test]
fn malformed_expressions_are_reported() {
    let mut sym = MarkersSymbolizer::new();
    let err = sym.bind_parameter("width", "3 +").unwrap_err();
    assert!(matches!(err, StyleError::Expression(_)));
    let err = sym.bind_parameter("file", "icons/[kind.png").unwrap_err();
    assert!(matches!(err, StyleError::Expression(_)));
}

#[test]
fn bindings_follow_the_expression_context() {
    let mut sym = MarkersSymbolizer::new();
    bind(&mut sym, &[("width", "[size] * 2"), ("fill", "[color]")]);
    let ctx = context("ctx");
    let expr_ctx = FeatureExpressionContext::new(10.0)
        .with_attribute("size", 4i64)
        .with_attribute("color", "#ff0000");
    let mut builder = RecordingLayerBuilder::new();
    let summary = sym.build(&one_point(), &expr_ctx, &ctx, &mut builder).unwrap();
    let key = summary.glyph_key.unwrap();
    assert!(key.starts_with("__default_marker_ellipse_8_8_4294901760_"), "{key}");
}

#[test]
fn missing_file_emits_nothing() {
    let mut sym = MarkersSymbolizer::new();
    bind(&mut sym, &[("file", "nowhere.png")]);
    let mut builder = RecordingLayerBuilder::new();
    let summary = sym
        .build(
            &one_point(),
            &FeatureExpressionContext::default(),
            &context("missing"),
            &mut builder,
        )
        .unwrap();
    assert_eq!(summary.status, BuildStatus::GlyphUnavailable);
    assert_eq!(summary.flushes, 0);
    assert!(builder.batches.is_empty());
}

#[test]
fn unknown_geometry_is_skipped() {
    let mut features = one_point();
    features.push(Feature::new(2, 22, Geometry::Unknown));
    let sym = MarkersSymbolizer::new();
    let mut builder = RecordingLayerBuilder::new();
    let summary = sym
        .build(
            &features,
            &FeatureExpressionContext::default(),
            &context("unknown"),
            &mut builder,
        )
        .unwrap();
    assert_eq!(summary.skipped_features, 1);
    assert_eq!(summary.placements, 1);
    assert_eq!(summary.flushes, 1);
}

#[test]
fn rotation_transform_uses_midpoints_and_point_orientation() {
    let mut sym = MarkersSymbolizer::new();
    bind(
        &mut sym,
        &[("placement", "line"), ("spacing", "10"), ("transform", "rotate(45)")],
    );
    let features: FeatureCollection = std::iter::once(Feature::new(
        1,
        1,
        Geometry::Line(LineGeometry {
            lines: vec![vec![Point::new(0.25, 0.5), Point::new(0.75, 0.5)]],
        }),
    ))
    .collect();
    let mut builder = RecordingLayerBuilder::new();
    let summary = sym
        .build(
            &features,
            &FeatureExpressionContext::default(),
            &context("rotation"),
            &mut builder,
        )
        .unwrap();
    assert_eq!((summary.placements, summary.flushes), (1, 1));
    let RecordedBatch::BitmapLabels { style, labels } = &builder.batches[0] else {
        panic!("expected labels");
    };
    assert_eq!(style.orientation, LabelOrientation::Point);
    assert_eq!(
        labels[0].1.position,
        crate::tile::builder::LabelPosition::Point(Point::new(0.5, 0.5))
    );
    assert!(summary.glyph_key.unwrap().starts_with("__default_marker_arrow_"));
}

/// Logs which build each builder call belongs to and how many calls overlap.
struct SharedLog<'a> {
    build: usize,
    calls: &'a std::sync::Mutex<Vec<usize>>,
    in_flight: &'a std::sync::atomic::AtomicUsize,
    max_in_flight: &'a std::sync::atomic::AtomicUsize,
}

impl SharedLog<'_> {
    fn record(&self) {
        use std::sync::atomic::Ordering;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls.lock().unwrap().push(self.build);
        std::thread::sleep(std::time::Duration::from_millis(20));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl TileLayerBuilder for SharedLog<'_> {
    fn add_points(
        &mut self,
        points: &mut dyn Iterator<Item = (i64, crate::feature::geometry::Vertex)>,
        _style: crate::tile::builder::PointStyle,
    ) -> StyleResult<()> {
        points.for_each(drop);
        self.record();
        Ok(())
    }

    fn add_bitmap_labels(
        &mut self,
        labels: &mut dyn Iterator<Item = (i64, crate::tile::builder::BitmapLabelInfo)>,
        _style: crate::tile::builder::BitmapLabelStyle,
    ) -> StyleResult<()> {
        labels.for_each(drop);
        self.record();
        Ok(())
    }
}

#[test]
fn concurrent_builds_on_one_instance_run_one_after_another() {
    let mut sym = MarkersSymbolizer::new();
    bind(&mut sym, &[("placement", "line"), ("spacing", "20")]);
    let features: FeatureCollection = std::iter::once(Feature::new(
        1,
        1,
        Geometry::Line(LineGeometry {
            lines: vec![vec![Point::new(0.0, 0.5), Point::new(1.0, 0.5)]],
        }),
    ))
    .collect();
    let ctx = context("concurrent");
    let expr_ctx = FeatureExpressionContext::default();

    let calls = std::sync::Mutex::new(Vec::new());
    let in_flight = std::sync::atomic::AtomicUsize::new(0);
    let max_in_flight = std::sync::atomic::AtomicUsize::new(0);

    let (sym, features, ctx, expr_ctx) = (&sym, &features, &ctx, &expr_ctx);
    let (calls_ref, in_flight, max_in_flight) = (&calls, &in_flight, &max_in_flight);
    let summaries: Vec<BuildSummary> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..2)
            .map(|build| {
                s.spawn(move || {
                    let mut log = SharedLog {
                        build,
                        calls: calls_ref,
                        in_flight,
                        max_in_flight,
                    };
                    sym.build(features, expr_ctx, ctx, &mut log).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(summaries.iter().all(|s| s.status == BuildStatus::Completed));
    let per_build = summaries[0].flushes;
    assert!(per_build > 2);
    assert_eq!(summaries[1].flushes, per_build);

    assert_eq!(max_in_flight.load(std::sync::atomic::Ordering::SeqCst), 1);
    let calls = calls.into_inner().unwrap();
    assert_eq!(calls.len(), 2 * per_build);
    // Each build's calls form one contiguous run.
    let switches = calls.windows(2).filter(|w| w[0] != w[1]).count();
    assert_eq!(switches, 1, "{calls:?}");
}
