//! Integration tests for bounding box encodings.

use mlobject::geometry::{BoundingBox, BoxInput, ImageSize};
use mlobject::MlObjectError;

mod common;

use common::{assert_close, assert_quad_close};

#[test]
fn equivalent_encodings_produce_the_same_voc_corners() {
    let size = ImageSize::new(100, 100);
    let inputs = [
        BoxInput::Yolo((0.5, 0.5, 0.4, 0.4)),
        BoxInput::Coco((30.0, 30.0, 40.0, 40.0)),
        BoxInput::Voc((30.0, 30.0, 70.0, 70.0)),
    ];

    for input in inputs {
        let bbox = BoundingBox::new(size, input);
        assert_quad_close(bbox.voc(), (30.0, 30.0, 70.0, 70.0));
        assert_quad_close(bbox.coco(), (30.0, 30.0, 40.0, 40.0));
        assert_quad_close(bbox.yolo(), (0.5, 0.5, 0.4, 0.4));
        assert_close(bbox.area_a(), 1600.0, "area_a");
        assert_close(bbox.area_r(), 0.16, "area_r");
    }
}

#[test]
fn non_square_image_scales_each_axis_separately() {
    let size = ImageSize::new(200, 400);
    let bbox = BoundingBox::new(size, BoxInput::Yolo((0.25, 0.5, 0.5, 0.5)));

    assert_quad_close(bbox.voc(), (0.0, 50.0, 200.0, 150.0));
    assert_quad_close(bbox.coco(), (0.0, 50.0, 200.0, 100.0));
    assert_close(bbox.xc_a(), 100.0, "xc_a");
    assert_close(bbox.yc_a(), 100.0, "yc_a");
}

#[test]
fn yolo_box_hanging_off_the_corner_is_truncated() {
    let size = ImageSize::new(100, 100);
    let bbox = BoundingBox::new(size, BoxInput::Yolo((0.9, 0.9, 0.4, 0.4)));

    assert_quad_close(bbox.voc(), (70.0, 70.0, 100.0, 100.0));
    assert_quad_close(bbox.yolo(), (0.85, 0.85, 0.3, 0.3));
    assert_close(bbox.area_a(), 900.0, "area_a");
}

#[test]
fn coco_box_past_the_edge_is_clamped_in_pixels() {
    let size = ImageSize::new(50, 80);
    let bbox = BoundingBox::new(size, BoxInput::Coco((-10.0, 20.0, 100.0, 100.0)));

    assert_quad_close(bbox.voc(), (0.0, 20.0, 80.0, 50.0));
    assert_quad_close(bbox.coco(), (0.0, 20.0, 80.0, 30.0));
    assert_close(bbox.x2_r(), 1.0, "x2_r");
    assert_close(bbox.y2_r(), 1.0, "y2_r");
}

#[test]
fn box_entirely_outside_the_image_collapses_to_zero_area() {
    let size = ImageSize::new(100, 100);
    let bbox = BoundingBox::new(size, BoxInput::Voc((150.0, 150.0, 200.0, 200.0)));

    assert_eq!(bbox.w_a(), 0.0);
    assert_eq!(bbox.h_a(), 0.0);
    assert_eq!(bbox.area_a(), 0.0);
    assert_eq!(bbox.area_r(), 0.0);
}

#[test]
fn from_encodings_uses_the_first_present_encoding() {
    let size = ImageSize::new(100, 100);
    let bbox = BoundingBox::from_encodings(
        size,
        None,
        Some((10.0, 10.0, 20.0, 20.0)),
        Some((50.0, 50.0, 5.0, 5.0)),
    )
    .unwrap();
    assert_quad_close(bbox.voc(), (10.0, 10.0, 20.0, 20.0));

    let err = BoundingBox::from_encodings(size, None, None, None).unwrap_err();
    assert!(matches!(err, MlObjectError::MissingEncoding { .. }));
    assert!(err.to_string().contains("yolo, voc or coco"));
}

#[test]
fn data_snapshot_serializes_to_a_flat_record() {
    let bbox = BoundingBox::new(ImageSize::new(100, 100), BoxInput::Voc((30.0, 30.0, 70.0, 70.0)))
        .with_label("cat")
        .with_confidence(0.75);

    let json = serde_json::to_value(bbox.data()).unwrap();
    assert_eq!(json["label"], "cat");
    assert_eq!(json["confidence"], 0.75);
    assert_eq!(json["voc_bbox"], serde_json::json!([30.0, 30.0, 70.0, 70.0]));
}

#[test]
fn full_box_serializes_both_spaces() {
    let bbox = BoundingBox::new(ImageSize::new(100, 200), BoxInput::Voc((20.0, 10.0, 60.0, 50.0)));
    let json = serde_json::to_value(&bbox).unwrap();

    assert_eq!(json["image_size"], serde_json::json!([100, 200]));
    assert_eq!(json["absolute"]["x2"], 60.0);
    assert_eq!(json["absolute"]["area"], 1600.0);
    assert_eq!(json["relative"]["x1"], 0.1);
    assert_eq!(json["relative"]["y1"], 0.1);
}
