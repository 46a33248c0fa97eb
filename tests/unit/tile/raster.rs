use super::*;
use crate::assets::font::FontHandle;
use crate::foundation::core::{Color, Point};
use crate::tile::builder::{GROUP_ALWAYS, LabelPosition};

fn red_square() -> Arc<Bitmap> {
    Arc::new(Bitmap::new(4, 4, [255, 0, 0, 255].repeat(16)).unwrap())
}

fn label(group_id: i32, ignore_placement: bool) -> (i64, BitmapLabelInfo) {
    (
        1,
        BitmapLabelInfo {
            bitmap_id: 1,
            group_id,
            position: LabelPosition::Point(Point::new(0.5, 0.5)),
            min_distance: 0.0,
            ignore_placement,
        },
    )
}

fn label_style() -> BitmapLabelStyle {
    BitmapLabelStyle {
        orientation: LabelOrientation::Point,
        color: Color::WHITE,
        font: FontHandle::null(),
        bitmap: red_square(),
        transform: Affine::IDENTITY,
    }
}

#[test]
fn rejects_bad_tile_sizes() {
    assert!(RasterLayerBuilder::new(0).is_err());
    assert!(RasterLayerBuilder::new(70_000).is_err());
}

#[test]
fn points_are_centered_on_anchor() {
    let mut tile = RasterLayerBuilder::new(64).unwrap();
    let style = PointStyle {
        comp_op: CompOp::SrcOver,
        orientation: LabelOrientation::Point,
        fill: Color::WHITE,
        opacity: 1.0,
        bitmap: red_square(),
        transform: Affine::IDENTITY,
    };
    let mut pts = vec![(1, Point::new(0.5, 0.5))].into_iter();
    tile.add_points(&mut pts, style).unwrap();

    let out = tile.to_bitmap().unwrap();
    assert_eq!(out.pixel(31, 31), Some([255, 0, 0, 255]));
    assert_eq!(out.pixel(32, 32), Some([255, 0, 0, 255]));
    assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(out.pixel(40, 40), Some([0, 0, 0, 0]));
    assert_eq!(tile.stats().drawn, 1);
}

#[test]
fn colliding_labels_are_suppressed() {
    let mut tile = RasterLayerBuilder::new(64).unwrap();
    let mut labels = vec![label(0, false), label(0, false)].into_iter();
    tile.add_bitmap_labels(&mut labels, label_style()).unwrap();
    assert_eq!(tile.stats().drawn, 1);
    assert_eq!(tile.stats().suppressed, 1);
}

#[test]
fn ignore_placement_and_always_groups_do_not_block() {
    let mut tile = RasterLayerBuilder::new(64).unwrap();
    let mut labels = vec![
        label(0, true),
        label(0, false),
        label(GROUP_ALWAYS, false),
    ]
    .into_iter();
    tile.add_bitmap_labels(&mut labels, label_style()).unwrap();
    assert_eq!(tile.stats().drawn, 3);
    assert_eq!(tile.stats().suppressed, 0);
}

#[test]
fn empty_batches_are_accepted() {
    let mut tile = RasterLayerBuilder::new(16).unwrap();
    tile.add_bitmap_labels(&mut std::iter::empty(), label_style())
        .unwrap();
    assert_eq!(tile.stats().batches, 1);
    assert!(tile.to_bitmap().unwrap().rgba8_premul.iter().all(|&b| b == 0));
}
