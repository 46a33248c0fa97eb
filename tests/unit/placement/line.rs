use super::*;

fn p(x: f64, y: f64) -> Vertex {
    Point::new(x, y)
}

fn expected_count(len: f64, spacing: f64) -> usize {
    ((len - spacing / 2.0) / spacing).floor() as usize + 1
}

#[test]
fn straight_line_count_matches_formula() {
    let line = [p(0.0, 0.5), p(1.0, 0.5)];
    for spacing in [30.0, 64.0, 100.0, 200.0, 300.0] {
        let walk = LineWalk::new(spacing, 0.0, 256.0);
        assert_eq!(
            walk.walk(&line).len(),
            expected_count(256.0, spacing),
            "spacing {spacing}"
        );
    }
}

#[test]
fn positions_and_direction() {
    let walk = LineWalk::new(64.0, 0.0, 256.0);
    let out = walk.walk(&[p(0.0, 0.5), p(1.0, 0.5)]);
    let xs: Vec<f64> = out.iter().map(|lp| lp.position.x).collect();
    assert_eq!(xs, vec![0.125, 0.375, 0.625, 0.875]);
    assert!(out.iter().all(|lp| lp.direction == Vec2::new(1.0, 0.0)));

    let down = walk.walk(&[p(0.5, 0.0), p(0.5, 1.0)]);
    assert!(down.iter().all(|lp| lp.direction == Vec2::new(0.0, 1.0)));
}

#[test]
fn glyph_size_widens_step() {
    let walk = LineWalk::new(64.0, 64.0, 256.0);
    let xs: Vec<f64> = walk
        .walk(&[p(0.0, 0.5), p(1.0, 0.5)])
        .iter()
        .map(|lp| lp.position.x)
        .collect();
    assert_eq!(xs, vec![0.125, 0.625]);
}

#[test]
fn tile_boundary_is_exclusive() {
    // Thresholds land exactly on x = 0.0 and x = 1.0.
    let walk = LineWalk::new(256.0, 0.0, 256.0);
    let out = walk.walk(&[p(-0.5, 0.5), p(1.5, 0.5)]);
    assert!(out.is_empty());

    // Shifted by a quarter tile, only the first threshold is inside.
    let out = walk.walk(&[p(-0.25, 0.5), p(1.75, 0.5)]);
    let xs: Vec<f64> = out.iter().map(|lp| lp.position.x).collect();
    assert_eq!(xs, vec![0.25]);

    // A line on the tile edge never emits.
    let edge = LineWalk::new(32.0, 0.0, 256.0).walk(&[p(0.0, 0.0), p(1.0, 0.0)]);
    assert!(edge.is_empty());
}

#[test]
fn remainder_carries_across_vertices() {
    let walk = LineWalk::new(128.0, 0.0, 256.0);
    let single = walk.walk(&[p(0.0, 0.5), p(1.0, 0.5)]);
    let split = walk.walk(&[p(0.0, 0.5), p(0.3, 0.5), p(0.6, 0.5), p(1.0, 0.5)]);
    assert_eq!(single.len(), 2);
    assert_eq!(split.len(), single.len());

    let gap = |v: &[LinePlacement]| v[1].position.x - v[0].position.x;
    assert!((gap(&single) - 0.5).abs() < 1e-9);
    assert!((gap(&split) - 0.5).abs() < 1e-9);
    assert!((split[0].position.x - 0.15).abs() < 1e-9);
    assert!((split[1].position.x - 0.65).abs() < 1e-9);
}

#[test]
fn short_line_gets_its_midpoint() {
    let walk = LineWalk::new(600.0, 0.0, 256.0);
    let out = walk.walk(&[p(0.0, 0.5), p(1.0, 0.5)]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].position, p(0.5, 0.5));
}

#[test]
fn degenerate_input() {
    let walk = LineWalk::new(10.0, 0.0, 256.0);
    assert!(walk.walk(&[]).is_empty());
    assert!(walk.walk(&[p(0.5, 0.5)]).is_empty());
    assert!(walk.walk(&[p(0.5, 0.5), p(0.5, 0.5)]).is_empty());
    assert!(LineWalk::new(0.0, 0.0, 256.0)
        .walk(&[p(0.0, 0.5), p(1.0, 0.5)])
        .is_empty());
}
