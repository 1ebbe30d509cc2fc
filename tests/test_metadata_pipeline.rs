use std::collections::HashSet;

use approx::assert_abs_diff_eq;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use wasm_clipper_meta::clipper::clipper_wrapper::{difference, inflate_paths, intersect, union};
use wasm_clipper_meta::clipper::enums::{ClipType, EndType, FillRule, JoinType};
use wasm_clipper_meta::constants::MAX_COORD;
use wasm_clipper_meta::error::{GeometryError, InputSet, Operation};
use wasm_clipper_meta::geometry::path::{area, area_of_set, Path, PathSet};
use wasm_clipper_meta::geometry::point::Point64;

type PointData = (i64, i64, i32, i32);

#[derive(Debug, Deserialize)]
struct DonutData {
    areas: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct CutData {
    area: f64,
    path: Vec<PointData>,
}

#[derive(Debug, Deserialize)]
struct CompositionData {
    outer: Vec<PointData>,
    inner: Vec<PointData>,
    cutter: Vec<PointData>,
    donut: DonutData,
    cut: CutData,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn load_composition() -> CompositionData {
    let test_json = include_str!("data/composition.json");
    serde_json::from_str(test_json).expect("Failed to parse composition data")
}

fn create_path(points: &[PointData]) -> Path {
    points
        .iter()
        .map(|&(x, y, segment_id, loop_id)| Point64::with_meta(x, y, segment_id, loop_id))
        .collect()
}

fn square(left: i64, top: i64, size: i64, loop_id: i32) -> Path {
    create_path(&[
        (left, top, 0, loop_id),
        (left + size, top, 1, loop_id),
        (left + size, top + size, 2, loop_id),
        (left, top + size, 3, loop_id),
    ])
}

fn records(paths: &PathSet) -> Vec<Vec<PointData>> {
    paths
        .iter()
        .map(|path| {
            path.iter()
                .map(|pt| (pt.x, pt.y, pt.segment_id, pt.loop_id))
                .collect()
        })
        .collect()
}

fn synthetic_count(paths: &PathSet) -> usize {
    paths.iter().flatten().filter(|pt| pt.is_synthetic()).count()
}

/// Every inherited vertex must sit on an input vertex carrying the same tags.
fn assert_provenance(result: &PathSet, inputs: &[&PathSet]) {
    let known: HashSet<PointData> = inputs
        .iter()
        .flat_map(|paths| paths.iter().flatten())
        .map(|pt| (pt.x, pt.y, pt.segment_id, pt.loop_id))
        .collect();

    for pt in result.iter().flatten().filter(|pt| !pt.is_synthetic()) {
        assert!(
            known.contains(&(pt.x, pt.y, pt.segment_id, pt.loop_id)),
            "{pt} does not match a tagged input vertex"
        );
    }
}

fn rotate_to(path: &[PointData], first: (i64, i64)) -> Vec<PointData> {
    let start = path
        .iter()
        .position(|&(x, y, _, _)| (x, y) == first)
        .expect("start vertex missing");

    path[start..].iter().chain(path[..start].iter()).copied().collect()
}

#[test]
fn test_composition_scenario() {
    init_tracing();

    let data = load_composition();
    let outer = vec![create_path(&data.outer)];
    let inner = vec![create_path(&data.inner)];
    let cutter = vec![create_path(&data.cutter)];

    let donut = difference(&outer, &inner, FillRule::NonZero).unwrap();
    let mut areas: Vec<f64> = donut.iter().map(|path| area(path)).collect();
    areas.sort_by(|a, b| b.total_cmp(a));

    assert_eq!(areas, data.donut.areas);
    assert_eq!(synthetic_count(&donut), 0);
    assert_provenance(&donut, &[&outer, &inner]);

    let cut = intersect(&donut, &cutter, FillRule::EvenOdd).unwrap();

    assert_eq!(cut.len(), 1);
    assert_eq!(area(&cut[0]), data.cut.area);
    assert_eq!(synthetic_count(&cut), 4);
    assert_provenance(&cut, &[&donut, &cutter]);

    let loops: HashSet<i32> = cut[0].iter().map(|pt| pt.loop_id).collect();
    assert_eq!(loops, HashSet::from([1, 2, 3]));

    let actual = rotate_to(&records(&cut)[0], (250, 150));
    assert_eq!(actual, data.cut.path);
}

#[test]
fn test_fill_rules_agree_on_donut() {
    let data = load_composition();
    let donut = difference(
        &[create_path(&data.outer)],
        &[create_path(&data.inner)],
        FillRule::NonZero,
    )
    .unwrap();
    let cutter = vec![create_path(&data.cutter)];

    let even_odd = intersect(&donut, &cutter, FillRule::EvenOdd).unwrap();
    let non_zero = intersect(&donut, &cutter, FillRule::NonZero).unwrap();

    assert_eq!(records(&even_odd), records(&non_zero));
}

#[test]
fn test_union_of_disjoint_squares() {
    let left = vec![square(0, 0, 100, 1)];
    let right = vec![square(200, 0, 100, 2)];

    let result = union(&left, &right, FillRule::NonZero).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(synthetic_count(&result), 0);

    let loops: HashSet<i32> = result.iter().map(|path| path[0].loop_id).collect();
    assert_eq!(loops, HashSet::from([1, 2]));

    for path in &result {
        assert!(path.iter().all(|pt| pt.loop_id == path[0].loop_id));
    }
}

#[test]
fn test_results_are_deterministic() {
    let data = load_composition();
    let run = || {
        let donut = difference(
            &[create_path(&data.outer)],
            &[create_path(&data.inner)],
            FillRule::NonZero,
        )
        .unwrap();
        let cut = intersect(&donut, &[create_path(&data.cutter)], FillRule::EvenOdd).unwrap();
        let grown = inflate_paths(&cut, 15.0, JoinType::Round, EndType::Polygon, None, None).unwrap();

        (records(&cut), records(&grown))
    };

    assert_eq!(run(), run());
}

#[test]
fn test_pipeline_keeps_provenance() {
    init_tracing();

    let data = load_composition();
    let outer = vec![create_path(&data.outer)];
    let inner = vec![create_path(&data.inner)];
    let cutter = vec![create_path(&data.cutter)];

    let donut = difference(&outer, &inner, FillRule::NonZero).unwrap();
    let cut = intersect(&donut, &cutter, FillRule::NonZero).unwrap();
    let grown = inflate_paths(&cut, 20.0, JoinType::Miter, EndType::Polygon, None, None).unwrap();

    assert!(!grown.is_empty());
    assert!(grown.iter().flatten().all(|pt| pt.is_synthetic()));
    assert!(area_of_set(&grown) > area_of_set(&cut));

    let trimmed = difference(&grown, &inner, FillRule::NonZero).unwrap();
    assert_provenance(&trimmed, &[&grown, &inner]);
    assert!(trimmed.iter().flatten().any(|pt| pt.loop_id == 2 && !pt.is_synthetic()));

    let shrunk = inflate_paths(&trimmed, -5.0, JoinType::Square, EndType::Polygon, None, None).unwrap();
    assert!(area_of_set(&shrunk) < area_of_set(&trimmed));
}

#[test]
fn test_deflate_past_inradius_is_empty() {
    let paths = vec![square(0, 0, 100, 1)];

    for join_type in [JoinType::Miter, JoinType::Square, JoinType::Round] {
        let result = inflate_paths(&paths, -60.0, join_type, EndType::Polygon, None, None).unwrap();
        assert!(result.is_empty(), "{join_type:?} left {result:?}");
    }
}

#[test]
fn test_deflate_by_exact_inradius_is_empty() {
    // right triangle with legs 400 and 300 has inradius 100
    let triangle = vec![create_path(&[(0, 0, 0, 2), (400, 0, 1, 2), (0, 300, 2, 2)])];
    let cases = [(vec![square(0, 0, 100, 1)], 50.0), (triangle, 100.0)];

    for (paths, inradius) in &cases {
        for join_type in [JoinType::Miter, JoinType::Square, JoinType::Round] {
            let result = inflate_paths(paths, -inradius, join_type, EndType::Polygon, None, None).unwrap();
            assert!(result.is_empty(), "{join_type:?} by {inradius} left {result:?}");
        }
    }
}

#[test]
fn test_concave_round_trip() {
    let l_shape = vec![create_path(&[
        (0, 0, 0, 1),
        (300, 0, 1, 1),
        (300, 100, 2, 1),
        (100, 100, 3, 1),
        (100, 300, 4, 1),
        (0, 300, 5, 1),
    ])];
    let original = area_of_set(&l_shape);
    let delta = 20.0;

    assert_eq!(original, 50000.0);

    let grown = inflate_paths(&l_shape, delta, JoinType::Miter, EndType::Polygon, None, None).unwrap();
    let restored = inflate_paths(&grown, -delta, JoinType::Miter, EndType::Polygon, None, None).unwrap();
    assert_eq!(area_of_set(&restored), original);

    // the squared reflex corner keeps a sliver of at most (sqrt(2) - 1)^2 * delta^2
    let grown = inflate_paths(&l_shape, delta, JoinType::Square, EndType::Polygon, None, None).unwrap();
    let restored = inflate_paths(&grown, -delta, JoinType::Square, EndType::Polygon, None, None).unwrap();
    let excess = area_of_set(&restored) - original;

    assert!(excess >= 0.0, "square round trip lost area: {excess}");
    assert!(excess <= 0.25 * delta * delta, "square round trip gained {excess}");
}

#[test]
fn test_inflate_then_deflate_is_bounded() {
    let paths = vec![square(0, 0, 1000, 1)];
    let original = area_of_set(&paths);

    let grown = inflate_paths(&paths, 40.0, JoinType::Miter, EndType::Polygon, None, None).unwrap();
    let restored = inflate_paths(&grown, -40.0, JoinType::Miter, EndType::Polygon, None, None).unwrap();
    assert_eq!(area_of_set(&restored), original);

    let arc_tolerance = 0.5;
    let grown = inflate_paths(&paths, 40.0, JoinType::Round, EndType::Polygon, None, Some(arc_tolerance)).unwrap();
    let restored = inflate_paths(&grown, -40.0, JoinType::Round, EndType::Polygon, None, Some(arc_tolerance)).unwrap();
    let perimeter = 4000.0;

    assert_abs_diff_eq!(area_of_set(&restored), original, epsilon = 2.0 * arc_tolerance * perimeter);
}

#[test]
fn test_out_of_range_input_is_rejected() {
    let valid = vec![square(0, 0, 10, 1)];
    let invalid = vec![square(0, 0, 10, 2), square(MAX_COORD, 0, 10, 3)];

    let error = intersect(&valid, &invalid, FillRule::NonZero).unwrap_err();

    match error {
        GeometryError::OutOfRange {
            operation,
            input,
            path,
            vertex,
            ..
        } => {
            assert_eq!(operation, Operation::Clip(ClipType::Intersection));
            assert_eq!(input, InputSet::Clip);
            assert_eq!(path, 1);
            assert_eq!(vertex, 1);
        }
        other => panic!("unexpected error {other:?}"),
    }

    let error = inflate_paths(&invalid, 5.0, JoinType::Miter, EndType::Polygon, None, None).unwrap_err();
    assert!(matches!(
        error,
        GeometryError::OutOfRange {
            operation: Operation::Inflate,
            input: InputSet::Offset,
            path: 1,
            ..
        }
    ));
}

#[test]
fn test_invalid_offset_parameters_are_rejected() {
    let paths = vec![square(0, 0, 10, 1)];

    let error = inflate_paths(&paths, f64::INFINITY, JoinType::Round, EndType::Polygon, None, None).unwrap_err();
    assert_eq!(error.operation(), Operation::Inflate);
    assert!(error.to_string().contains("delta"));

    let error = inflate_paths(&paths, 5.0, JoinType::Miter, EndType::Polygon, Some(f64::NAN), None).unwrap_err();
    assert!(matches!(error, GeometryError::InvalidParameter { name: "miter_limit", .. }));
}

#[test]
fn test_empty_inputs() {
    assert!(union(&[], &[], FillRule::NonZero).unwrap().is_empty());
    assert!(inflate_paths(&[], 10.0, JoinType::Miter, EndType::Polygon, None, None)
        .unwrap()
        .is_empty());
}
