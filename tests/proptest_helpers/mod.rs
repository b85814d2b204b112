#![allow(dead_code)]

use regionlab::geom::{ImageSize, Point, Rect};
use regionlab::label::{CornerRecord, LabelRecord, NormalizedRecord};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Floats with exactly two decimals, as written by the corner schema.
fn hundredths(min: i64, max: i64) -> impl Strategy<Value = f64> {
    (min..=max).prop_map(|n| n as f64 / 100.0)
}

/// Floats with at most six decimals in `0.0..=1.0`.
fn millionths() -> impl Strategy<Value = f64> {
    (0i64..=1_000_000).prop_map(|n| n as f64 / 1_000_000.0)
}

fn type_name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Car", "Van", "Truck", "Pedestrian", "Cyclist", "DontCare"])
        .prop_map(str::to_string)
}

pub fn arb_corner_record() -> BoxedStrategy<LabelRecord> {
    (
        type_name_strategy(),
        hundredths(0, 100),
        0i32..=3,
        hundredths(-314, 314),
        (
            hundredths(0, 400_000),
            hundredths(0, 400_000),
            hundredths(0, 400_000),
            hundredths(0, 400_000),
        ),
        (hundredths(0, 1_000), hundredths(0, 1_000), hundredths(0, 2_000)),
        (
            hundredths(-10_000, 10_000),
            hundredths(-1_000, 1_000),
            hundredths(0, 10_000),
        ),
        hundredths(-314, 314),
    )
        .prop_map(
            |(kind, truncated, occluded, alpha, (l, t, r, b), (dh, dw, dl), (x, y, z), ry)| {
                LabelRecord::Corner(CornerRecord {
                    kind,
                    truncated,
                    occluded,
                    observation_angle: alpha,
                    left: l,
                    top: t,
                    right: r,
                    bottom: b,
                    dim_height: dh,
                    dim_width: dw,
                    dim_length: dl,
                    loc_x: x,
                    loc_y: y,
                    loc_z: z,
                    rotation_y: ry,
                })
            },
        )
        .boxed()
}

pub fn arb_normalized_record() -> BoxedStrategy<LabelRecord> {
    (0usize..80, millionths(), millionths(), millionths(), millionths())
        .prop_map(|(class_index, center_x, center_y, width, height)| {
            LabelRecord::Normalized(NormalizedRecord {
                class_index,
                center_x,
                center_y,
                width,
                height,
            })
        })
        .boxed()
}

pub fn arb_image_size() -> BoxedStrategy<ImageSize> {
    (2u32..=4096, 2u32..=4096)
        .prop_map(|(w, h)| ImageSize::new(w, h))
        .boxed()
}

/// A non-empty rectangle inside an image of `size`.
pub fn arb_rect_within(size: ImageSize) -> BoxedStrategy<Rect> {
    let max_x = size.width as i32 - 1;
    let max_y = size.height as i32 - 1;
    (0..max_x, 0..max_y)
        .prop_flat_map(move |(x, y)| {
            (
                Just(x),
                Just(y),
                1..=(max_x + 1 - x),
                1..=(max_y + 1 - y),
            )
        })
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
        .boxed()
}

pub fn arb_point(size: ImageSize) -> BoxedStrategy<Point> {
    (0..size.width as i32, 0..size.height as i32)
        .prop_map(|(x, y)| Point::new(x, y))
        .boxed()
}
