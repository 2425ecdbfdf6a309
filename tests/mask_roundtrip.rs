//! Integration tests for mask construction and the RLE/polygon round trip.

use mlobject::codec::{BinaryMask, CocoRleCodec, CompressedRle, MaskCodec, Rle};
use mlobject::geometry::ImageSize;
use mlobject::mask::{Mask, MaskInput};
use mlobject::{CodecError, MlObjectError};

mod common;

use common::{rect_mask, rect_polygon};

fn l_shape(size: ImageSize) -> BinaryMask {
    BinaryMask::from_fn(size, |row, col| {
        let stem = (5..25).contains(&row) && (5..10).contains(&col);
        let foot = (20..25).contains(&row) && (5..30).contains(&col);
        stem || foot
    })
}

#[test]
fn polygons_rasterise_to_expected_area_and_box() {
    let size = ImageSize::new(60, 80);
    let mask = Mask::new(
        size,
        MaskInput::Polygons(vec![rect_polygon(10.0, 20.0, 30.0, 15.0)]),
    )
    .unwrap();

    assert_eq!(mask.area(), 450);
    assert_eq!(mask.bbox().coco(), (10.0, 20.0, 30.0, 15.0));
    assert_eq!(mask.get_mask().unwrap(), rect_mask(size, 10, 20, 30, 15));
}

#[test]
fn rle_to_polygons_to_rle_keeps_area_within_outline_loss() {
    let size = ImageSize::new(40, 40);
    let dense = l_shape(size);
    let rle = CocoRleCodec.encode(&dense).unwrap();

    let from_rle = Mask::new(size, MaskInput::Rle(rle.clone())).unwrap();
    assert_eq!(from_rle.area(), 200);
    assert_eq!(from_rle.rle(), &rle);
    assert_eq!(from_rle.bbox().coco(), (5.0, 5.0, 25.0, 20.0));
    assert_eq!(from_rle.polygons().len(), 1);

    let rebuilt = Mask::new(size, MaskInput::Polygons(from_rle.polygons().to_vec())).unwrap();
    let perimeter = 2 * (25 + 20);
    assert!(rebuilt.area() < from_rle.area());
    assert!(
        from_rle.area() - rebuilt.area() < perimeter,
        "lost {} pixels",
        from_rle.area() - rebuilt.area()
    );
    assert_eq!(rebuilt.bbox().voc().0, 5.0);
    assert_eq!(rebuilt.bbox().voc().1, 5.0);
}

#[test]
fn rle_touching_the_image_edge_traces_a_polygon() {
    let size = ImageSize::new(20, 20);
    let dense = rect_mask(size, 0, 0, 10, 10);
    let rle = CocoRleCodec.encode(&dense).unwrap();

    let from_rle = Mask::new(size, MaskInput::Rle(rle)).unwrap();
    assert_eq!(from_rle.area(), 100);
    assert_eq!(from_rle.polygons().len(), 1);
    assert!(!from_rle.data().polygons.is_empty());

    let rebuilt = Mask::new(size, MaskInput::Polygons(from_rle.polygons().to_vec())).unwrap();
    assert_eq!(rebuilt.area(), 81);
    assert_eq!(rebuilt.bbox().voc(), (0.0, 0.0, 9.0, 9.0));
}

#[test]
fn full_image_rle_traces_the_frame() {
    let size = ImageSize::new(6, 8);
    let rle = Rle::new(size, vec![0, 48]);
    let mask = Mask::new(size, MaskInput::Rle(rle)).unwrap();

    assert_eq!(mask.area(), 48);
    assert_eq!(mask.polygons().len(), 1);
    let mut corners: Vec<(f64, f64)> = mask.polygons()[0]
        .chunks(2)
        .map(|p| (p[0], p[1]))
        .collect();
    corners.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(corners, vec![(0.0, 0.0), (0.0, 5.0), (7.0, 0.0), (7.0, 5.0)]);
}

#[test]
fn mask_rle_survives_compression() {
    let size = ImageSize::new(40, 40);
    let rle = CocoRleCodec.encode(&l_shape(size)).unwrap();
    let mask = Mask::new(size, MaskInput::Rle(rle)).unwrap();

    let compressed = mask.rle().to_compressed();
    assert_eq!(compressed.size, size);
    assert_eq!(&Rle::from_compressed(&compressed).unwrap(), mask.rle());
}

#[test]
fn compressed_counts_decode_through_the_mask() {
    let size = ImageSize::new(3, 4);
    let compressed = CompressedRle {
        size,
        counts: "354".to_string(),
    };
    let rle = Rle::from_compressed(&compressed).unwrap();
    assert_eq!(rle.counts, vec![3, 5, 4]);

    let mask = Mask::new(size, MaskInput::Rle(rle)).unwrap();
    assert_eq!(mask.area(), 5);
}

#[test]
fn disjoint_polygons_are_unioned() {
    let size = ImageSize::new(50, 50);
    let mask = Mask::new(
        size,
        MaskInput::Polygons(vec![
            rect_polygon(0.0, 0.0, 10.0, 10.0),
            rect_polygon(30.0, 30.0, 10.0, 10.0),
        ]),
    )
    .unwrap();

    assert_eq!(mask.area(), 200);
    assert_eq!(mask.bbox().voc(), (0.0, 0.0, 40.0, 40.0));
    assert_eq!(mask.polygons().len(), 2);
}

#[test]
fn data_snapshot_carries_polygons_and_metadata() {
    let polygon = rect_polygon(1.0, 1.0, 4.0, 4.0);
    let mask = Mask::new(ImageSize::new(10, 10), MaskInput::Polygons(vec![polygon.clone()]))
        .unwrap()
        .with_label("person")
        .with_confidence(0.5);

    let json = serde_json::to_value(mask.data()).unwrap();
    assert_eq!(json["label"], "person");
    assert_eq!(json["confidence"], 0.5);
    assert_eq!(json["polygons"], serde_json::json!([polygon]));
    assert_eq!(mask.bbox().label(), Some("person"));
}

#[test]
fn malformed_inputs_surface_codec_errors() {
    let size = ImageSize::new(10, 10);

    let err = Mask::new(size, MaskInput::Polygons(vec![vec![1.0, 2.0, 3.0]])).unwrap_err();
    assert!(matches!(
        err,
        MlObjectError::Codec(CodecError::InvalidPolygon { index: 0, .. })
    ));

    let huge = vec![1e300, 0.0, -1e300, 0.0, 0.0, 1.0];
    let err = Mask::new(ImageSize::new(20, 20), MaskInput::Polygons(vec![huge])).unwrap_err();
    assert!(matches!(
        err,
        MlObjectError::Codec(CodecError::InvalidPolygon { index: 0, .. })
    ));

    let err = Mask::new(size, MaskInput::Rle(Rle::new(size, vec![10, 20]))).unwrap_err();
    assert_eq!(
        err.to_string(),
        CodecError::MalformedRle {
            expected: 100,
            actual: 30
        }
        .to_string()
    );
}
