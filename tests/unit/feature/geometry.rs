use super::*;

fn p(x: f64, y: f64) -> Vertex {
    Point::new(x, y)
}

#[test]
fn mid_point_uses_arc_length() {
    let line = vec![p(0.0, 0.0), p(0.2, 0.0), p(0.2, 0.6)];
    let mid = mid_point(&line).unwrap();
    assert!((mid.x - 0.2).abs() < 1e-12);
    assert!((mid.y - 0.2).abs() < 1e-12);

    assert_eq!(mid_point(&[p(0.3, 0.4)]), Some(p(0.3, 0.4)));
    assert_eq!(mid_point(&[]), None);
}

#[test]
fn line_geometry_skips_empty_lines() {
    let g = LineGeometry {
        lines: vec![vec![p(0.0, 0.5), p(1.0, 0.5)], vec![]],
    };
    assert_eq!(g.mid_points(), vec![p(0.5, 0.5)]);
}

#[test]
fn surface_point_of_square() {
    let square = vec![p(0.1, 0.1), p(0.5, 0.1), p(0.5, 0.5), p(0.1, 0.5)];
    let sp = surface_point(&[square.clone()]).unwrap();
    assert!((sp.x - 0.3).abs() < 1e-12);
    assert!((sp.y - 0.3).abs() < 1e-12);
    assert!(polygon_contains(&[square], sp));
}

#[test]
fn surface_point_avoids_holes() {
    let outer = vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
    let hole = vec![p(0.2, 0.2), p(0.7, 0.2), p(0.7, 0.8), p(0.2, 0.8)];
    let rings = vec![outer, hole];
    let sp = surface_point(&rings).unwrap();
    assert!(polygon_contains(&rings, sp));
    assert!((sp.x - 0.85).abs() < 1e-12);
}

#[test]
fn surface_point_of_concave_polygon_is_inside() {
    // U shape: the bbox center lies in the notch.
    let u = vec![
        p(0.0, 0.0),
        p(0.3, 0.0),
        p(0.3, 0.7),
        p(0.6, 0.7),
        p(0.6, 0.0),
        p(1.0, 0.0),
        p(1.0, 1.0),
        p(0.0, 1.0),
    ];
    let rings = vec![u];
    let sp = surface_point(&rings).unwrap();
    assert!(polygon_contains(&rings, sp));
}

#[test]
fn polygon_geometry_yields_one_point_per_polygon() {
    let square = |o: f64| vec![p(o, o), p(o + 0.1, o), p(o + 0.1, o + 0.1), p(o, o + 0.1)];
    let g = PolygonGeometry {
        polygons: vec![vec![square(0.1)], vec![square(0.6)], vec![]],
    };
    assert_eq!(g.surface_points().len(), 2);
}

#[test]
fn geometry_json_shape() {
    let g: Geometry = serde_json::from_str(
        r#"{"type":"point","vertices":[{"x":0.5,"y":0.25}]}"#,
    )
    .unwrap();
    assert_eq!(
        g,
        Geometry::Point(PointGeometry {
            vertices: vec![p(0.5, 0.25)]
        })
    );
    let u: Geometry = serde_json::from_str(r#"{"type":"raster"}"#).unwrap();
    assert_eq!(u, Geometry::Unknown);
    assert_eq!(u.kind(), "unknown");
}
