use crate::clipper::clipper_offset::ClipperOffset;
use crate::clipper::constants::MAX_ROUND_STEPS;
use crate::clipper::enums::{EndType, JoinType};
use crate::error::GeometryError;
use crate::geometry::path::{area, area_of_set, Path, PathSet};
use crate::geometry::point::Point64;
use approx::assert_abs_diff_eq;
use serde::Deserialize;
use std::fs;

type PointData = (i64, i64, i32, i32);

#[derive(Debug, Deserialize)]
struct TestInput {
    paths: Vec<Vec<PointData>>,
    delta: f64,
    #[serde(rename = "joinType")]
    join_type: u8,
    #[serde(rename = "endType")]
    end_type: u8,
}

#[derive(Debug, Deserialize)]
struct TestOutput {
    #[serde(rename = "pathCount")]
    path_count: usize,
    area: f64,
    tolerance: f64,
    #[serde(rename = "loopId")]
    loop_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct TestCase {
    id: String,
    input: TestInput,
    output: TestOutput,
}

#[derive(Debug, Deserialize)]
struct TestSuite {
    id: String,
    data: Vec<TestCase>,
}

#[derive(Debug, Deserialize)]
struct TestDataStructure {
    suites: Vec<TestSuite>,
}

fn load_test_data() -> TestDataStructure {
    let json_path = concat!(env!("CARGO_MANIFEST_DIR"), "/src/clipper/__data__/clipper_offset.json");
    let json_content = fs::read_to_string(json_path).expect("Failed to read offset test data file");
    serde_json::from_str(&json_content).expect("Failed to parse offset test data")
}

fn create_path(points: &[PointData]) -> Path {
    points
        .iter()
        .map(|&(x, y, segment_id, loop_id)| Point64::with_meta(x, y, segment_id, loop_id))
        .collect()
}

fn execute_case(data: &TestCase) -> PathSet {
    let paths: PathSet = data.input.paths.iter().map(|p| create_path(p)).collect();
    let join_type = JoinType::try_from(data.input.join_type).expect("Invalid JoinType");
    let end_type = EndType::try_from(data.input.end_type).expect("Invalid EndType");
    let mut offset = ClipperOffset::new();

    offset.add_paths(&paths, join_type, end_type);
    offset.execute(data.input.delta).expect("Offset execution failed")
}

fn run_suite(suite_id: &str) {
    let test_data = load_test_data();
    let suite = test_data
        .suites
        .iter()
        .find(|s| s.id == suite_id)
        .unwrap_or_else(|| panic!("{suite_id} suite not found"));

    for data in &suite.data {
        let solution = execute_case(data);

        assert_eq!(solution.len(), data.output.path_count, "{}: path count", data.id);
        assert_abs_diff_eq!(area_of_set(&solution), data.output.area, epsilon = data.output.tolerance);

        if let Some(loop_id) = data.output.loop_id {
            assert!(
                solution.iter().flatten().all(|pt| pt.loop_id == loop_id),
                "{}: unexpected loop id in {solution:?}",
                data.id
            );
        }
    }
}

fn square(size: i64, loop_id: i32) -> Path {
    vec![
        Point64::with_meta(0, 0, 0, loop_id),
        Point64::with_meta(size, 0, 1, loop_id),
        Point64::with_meta(size, size, 2, loop_id),
        Point64::with_meta(0, size, 3, loop_id),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_offset() {
        run_suite("polygon_offset");
    }

    #[test]
    fn test_open_path_offset() {
        run_suite("open_path_offset");
    }

    #[test]
    fn test_miter_limit_falls_back_to_square() {
        let triangle = vec![
            Point64::with_meta(0, 100, 0, 1),
            Point64::with_meta(100, 0, 1, 1),
            Point64::with_meta(200, 100, 2, 1),
        ];
        let mut mitered = ClipperOffset::new().miter_limit(10.0);
        let mut squared = ClipperOffset::new().miter_limit(1.0);

        mitered.add_paths(&[triangle.clone()], JoinType::Miter, EndType::Polygon);
        squared.add_paths(&[triangle], JoinType::Miter, EndType::Polygon);

        let mitered_area = area_of_set(&mitered.execute(10.0).unwrap());
        let squared_area = area_of_set(&squared.execute(10.0).unwrap());

        assert!(squared_area < mitered_area);
    }

    #[test]
    fn test_generated_vertices_are_synthetic() {
        let mut offset = ClipperOffset::new();
        offset.add_paths(&[square(100, 3)], JoinType::Round, EndType::Polygon);

        let solution = offset.execute(15.0).unwrap();

        assert_eq!(solution.len(), 1);
        assert!(solution[0].iter().all(|pt| pt.is_synthetic() && pt.loop_id == 3));
    }

    #[test]
    fn test_deflate_restores_area() {
        let mut inflate = ClipperOffset::new();
        inflate.add_paths(&[square(100, 1)], JoinType::Miter, EndType::Polygon);

        let inflated = inflate.execute(25.0).unwrap();
        let mut deflate = ClipperOffset::new();
        deflate.add_paths(&inflated, JoinType::Miter, EndType::Polygon);

        let restored = deflate.execute(-25.0).unwrap();

        assert_eq!(restored.len(), 1);
        assert_eq!(area(&restored[0]), 10000.0);
    }

    #[test]
    fn test_explicit_arc_tolerance_adds_vertices() {
        let mut coarse = ClipperOffset::new().arc_tolerance(5.0);
        let mut fine = ClipperOffset::new().arc_tolerance(0.05);

        coarse.add_paths(&[square(100, 1)], JoinType::Round, EndType::Polygon);
        fine.add_paths(&[square(100, 1)], JoinType::Round, EndType::Polygon);

        let coarse = coarse.execute(20.0).unwrap();
        let fine = fine.execute(20.0).unwrap();

        assert!(fine[0].len() > coarse[0].len());
        assert!(area_of_set(&fine) > area_of_set(&coarse));
    }

    #[test]
    fn test_negative_arc_tolerance_is_rejected() {
        let mut offset = ClipperOffset::new().arc_tolerance(-1.0);
        offset.add_paths(&[square(100, 1)], JoinType::Round, EndType::Polygon);

        assert!(matches!(
            offset.execute(10.0),
            Err(GeometryError::InvalidParameter { name: "arc_tolerance", .. })
        ));
    }

    #[test]
    fn test_overflow_is_reported() {
        let limit = crate::constants::MAX_COORD;
        let edge = vec![
            Point64::with_meta(limit - 10, 0, 0, 1),
            Point64::with_meta(limit, 0, 1, 1),
            Point64::with_meta(limit, 10, 2, 1),
            Point64::with_meta(limit - 10, 10, 3, 1),
        ];
        let mut offset = ClipperOffset::new();
        offset.add_paths(&[square(10, 2), edge], JoinType::Miter, EndType::Polygon);

        assert!(matches!(
            offset.execute(1000.0),
            Err(GeometryError::Overflow { path: 1, .. })
        ));
    }

    #[test]
    fn test_round_join_at_large_delta_is_bounded() {
        let delta = 1e17;
        let mut offset = ClipperOffset::new();
        offset.add_paths(&[square(10, 1)], JoinType::Round, EndType::Polygon);

        let solution = offset.execute(delta).unwrap();
        let expected = std::f64::consts::PI * delta * delta;

        assert_eq!(solution.len(), 1);
        assert!(solution[0].len() <= 4 * (MAX_ROUND_STEPS as usize / 4 + 2));
        assert!((area(&solution[0]) - expected).abs() / expected < 1e-3);
    }

    #[test]
    fn test_fine_arc_tolerance_beyond_step_limit_is_rejected() {
        let mut offset = ClipperOffset::new().arc_tolerance(1e-8);
        offset.add_paths(&[square(100, 1)], JoinType::Round, EndType::Polygon);

        assert!(matches!(
            offset.execute(1e9),
            Err(GeometryError::InvalidParameter { name: "arc_tolerance", .. })
        ));
    }

    #[test]
    fn test_point_square_beyond_range_overflows() {
        let mut offset = ClipperOffset::new();
        offset.add_paths(&[vec![Point64::with_meta(5, 5, 0, 1)]], JoinType::Square, EndType::Polygon);

        assert!(matches!(
            offset.execute(1e19),
            Err(GeometryError::Overflow { path: 0, .. })
        ));

        let mut offset = ClipperOffset::new();
        offset.add_paths(&[vec![Point64::with_meta(5, 5, 0, 1)]], JoinType::Round, EndType::Polygon);

        assert!(matches!(
            offset.execute(1e19),
            Err(GeometryError::Overflow { path: 0, .. })
        ));
    }

    #[test]
    fn test_empty_offset() {
        let offset = ClipperOffset::new();

        assert!(offset.execute(10.0).unwrap().is_empty());
    }
}
