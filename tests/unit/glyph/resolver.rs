use std::path::PathBuf;

use super::*;
use crate::assets::manager::FileBitmapManager;

const RED: Color = Color::from_argb(0xffff_0000);

fn request() -> GlyphRequest {
    GlyphRequest {
        file: String::new(),
        marker_type: String::new(),
        placement: LabelOrientation::Point,
        fill: Color::from_argb(0xff00_00ff),
        fill_opacity: 1.0,
        stroke: Color::BLACK,
        stroke_opacity: 1.0,
        stroke_width: 0.0,
        width: 0.0,
        width_defined: false,
        height: 0.0,
        height_defined: false,
    }
}

fn temp_root(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vtstyle_glyph_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn resolver() -> GlyphResolver {
    GlyphResolver::new(1.0, MarkerDefaults::default())
}

#[test]
fn cache_key_format() {
    let key = marker_cache_key(MarkerShape::Ellipse, 20.0, 20.0, RED, 0.0, Color::BLACK);
    assert_eq!(key, "__default_marker_ellipse_20_20_4294901760_0_4278190080.bmp");
    let key = marker_cache_key(MarkerShape::Arrow, 2.5, 14.0, RED, 1.5, Color::BLACK);
    assert_eq!(key, "__default_marker_arrow_2.5_14_4294901760_1.5_4278190080.bmp");
}

#[test]
fn shape_selection() {
    assert_eq!(MarkerShape::select("", LabelOrientation::Point), MarkerShape::Ellipse);
    assert_eq!(MarkerShape::select("", LabelOrientation::Line), MarkerShape::Arrow);
    assert_eq!(MarkerShape::select("ellipse", LabelOrientation::Line), MarkerShape::Ellipse);
    assert_eq!(MarkerShape::select("arrow", LabelOrientation::Point), MarkerShape::Arrow);
    assert_eq!(MarkerShape::select("star", LabelOrientation::Point), MarkerShape::Arrow);
}

#[test]
fn red_ellipse_is_supersampled_and_scaled_back() {
    let mgr = FileBitmapManager::new(temp_root("red"));
    let req = GlyphRequest {
        fill: RED,
        width: 20.0,
        width_defined: true,
        ..request()
    };
    let glyph = resolver().resolve(&req, &mgr).unwrap();
    assert!(glyph.key.contains("20_20_4294901760_0_4278190080"));
    assert_eq!((glyph.bitmap.width, glyph.bitmap.height), (80, 80));
    assert_eq!((glyph.scale_x, glyph.scale_y), (0.25, 0.25));
    assert_eq!(glyph.size(), 20.0);
    assert_eq!(glyph.fill_opacity, 1.0);
    assert!(mgr.get_bitmap(&glyph.key).is_some());
}

#[test]
fn ellipse_sizes_use_absolute_values() {
    let mgr = FileBitmapManager::new(temp_root("abs"));
    let neg = GlyphRequest {
        width: -20.0,
        width_defined: true,
        ..request()
    };
    let pos = GlyphRequest {
        width: 20.0,
        width_defined: true,
        ..request()
    };
    let a = resolver().resolve(&neg, &mgr).unwrap();
    let b = resolver().resolve(&pos, &mgr).unwrap();
    assert_eq!(a.key, b.key);
    assert!(Arc::ptr_eq(&a.bitmap, &b.bitmap));

    let only_height = GlyphRequest {
        height: 6.0,
        height_defined: true,
        ..request()
    };
    let c = resolver().resolve(&only_height, &mgr).unwrap();
    assert!(c.key.starts_with("__default_marker_ellipse_6_6_"));

    let d = resolver().resolve(&request(), &mgr).unwrap();
    assert!(d.key.starts_with("__default_marker_ellipse_10_10_"));
}

#[test]
fn arrow_sizes_follow_aspect_defaults() {
    let mgr = FileBitmapManager::new(temp_root("arrow"));
    let line = GlyphRequest {
        placement: LabelOrientation::Line,
        ..request()
    };
    let a = resolver().resolve(&line, &mgr).unwrap();
    assert!(a.key.starts_with("__default_marker_arrow_28_14_"));
    assert_eq!((a.bitmap.width, a.bitmap.height), (112, 56));

    let by_width = GlyphRequest {
        width: 56.0,
        ..line.clone()
    };
    let b = resolver().resolve(&by_width, &mgr).unwrap();
    assert!(b.key.starts_with("__default_marker_arrow_56_28_"));

    let by_height = GlyphRequest {
        height: 7.0,
        ..line
    };
    let c = resolver().resolve(&by_height, &mgr).unwrap();
    assert!(c.key.starts_with("__default_marker_arrow_14_7_"));
}

#[test]
fn opacity_is_baked_into_key_colors() {
    let mgr = FileBitmapManager::new(temp_root("opacity"));
    let req = GlyphRequest {
        fill: RED,
        fill_opacity: 0.5,
        ..request()
    };
    let glyph = resolver().resolve(&req, &mgr).unwrap();
    let half_red = Color::from_color_opacity(RED, 0.5).value();
    assert!(glyph.key.contains(&format!("_{half_red}_")));
    assert_eq!(glyph.fill_opacity, 1.0);
}

#[test]
fn file_scales() {
    let root = temp_root("file");
    image::RgbaImage::from_pixel(10, 5, image::Rgba([0, 255, 0, 255]))
        .save(root.join("m.png"))
        .unwrap();
    let mgr = FileBitmapManager::new(&root);
    let r = GlyphResolver::new(2.0, MarkerDefaults::default());

    let base = GlyphRequest {
        file: "m.png".to_owned(),
        fill_opacity: 0.4,
        ..request()
    };
    let g = r.resolve(&base, &mgr).unwrap();
    assert_eq!((g.scale_x, g.scale_y), (2.0, 2.0));
    assert_eq!(g.key, "m.png");
    assert_eq!(g.fill_opacity, 0.4);

    let w = GlyphRequest {
        width: 20.0,
        ..base.clone()
    };
    let g = r.resolve(&w, &mgr).unwrap();
    assert_eq!((g.scale_x, g.scale_y), (4.0, 4.0));

    let wh = GlyphRequest {
        width: 20.0,
        height: 20.0,
        ..base.clone()
    };
    let g = r.resolve(&wh, &mgr).unwrap();
    assert_eq!((g.scale_x, g.scale_y), (4.0, 8.0));

    let h = GlyphRequest {
        height: 10.0,
        ..base
    };
    let g = r.resolve(&h, &mgr).unwrap();
    assert_eq!((g.scale_x, g.scale_y), (4.0, 4.0));
}

#[test]
fn missing_file_fails() {
    let mgr = FileBitmapManager::new(temp_root("missing"));
    let req = GlyphRequest {
        file: "absent.png".to_owned(),
        ..request()
    };
    assert!(matches!(
        resolver().resolve(&req, &mgr),
        Err(StyleError::Asset(_))
    ));
}

#[test]
fn defaults_validate() {
    MarkerDefaults::default().validate().unwrap();
    let bad = MarkerDefaults {
        supersampling_factor: 0.5,
        ..MarkerDefaults::default()
    };
    assert!(bad.validate().is_err());
    let huge = MarkerDefaults {
        max_size: 10_000.0,
        ..MarkerDefaults::default()
    };
    assert!(huge.validate().is_err());
}

#[test]
fn oversized_markers_are_clamped_before_rasterizing() {
    let mgr = FileBitmapManager::new(temp_root("clamp"));
    let req = GlyphRequest {
        width: 20_000.0,
        width_defined: true,
        stroke_width: 1e9,
        ..request()
    };
    let glyph = resolver().resolve(&req, &mgr).unwrap();
    // 256 logical pixels plus a 256 stroke, at 4x supersampling.
    assert_eq!((glyph.bitmap.width, glyph.bitmap.height), (2048, 2048));
    assert!(glyph.key.starts_with("__default_marker_ellipse_256_256_"), "{}", glyph.key);
    assert_eq!(glyph.size(), 256.0);
}
