use num_traits::ToPrimitive;

use crate::clipper::enums::PointInPolygonResult;
use crate::constants::{MAX_COORD, POINT_STRIDE};
use crate::error::{GeometryError, InputSet, Operation, Result};
use crate::geometry::bound_rect::Rect64;
use crate::geometry::point::Point64;
use crate::utils::round::ClipperRound;

pub type Path = Vec<Point64>;

pub type PathSet = Vec<Path>;

/// Signed shoelace area. Counter-clockwise in y-up axes is positive; output
/// outers are positive and holes negative.
pub fn area(path: &[Point64]) -> f64 {
    let count = path.len();

    if count < 3 {
        return 0.0;
    }

    let mut result = 0.0;
    let mut prev = &path[count - 1];

    for point in path {
        result += (prev.y + point.y) as f64 * (prev.x - point.x) as f64;
        prev = point;
    }

    result * 0.5
}

pub fn area_of_set(paths: &[Path]) -> f64 {
    paths.iter().map(|path| area(path)).sum()
}

pub fn is_positive(path: &[Point64]) -> bool {
    area(path) >= 0.0
}

pub fn reverse_path(path: &[Point64]) -> Path {
    path.iter().rev().copied().collect()
}

/// Drops consecutive duplicates; closed paths also lose a duplicated closing vertex.
pub fn strip_duplicates(path: &[Point64], is_closed: bool) -> Path {
    let mut result: Path = Vec::with_capacity(path.len());

    for point in path {
        if result.last() != Some(point) {
            result.push(*point);
        }
    }

    if is_closed {
        while result.len() > 1 && result.first() == result.last() {
            result.pop();
        }
    }

    result
}

pub fn bounds(paths: &[Path]) -> Rect64 {
    let mut result = Rect64::invalid();

    for point in paths.iter().flatten() {
        result.include(point);
    }

    if result.left > result.right {
        return Rect64::new(0, 0, 0, 0);
    }

    result
}

fn on_segment(point: &Point64, a: &Point64, b: &Point64) -> bool {
    crate::utils::math::cross_product(a, b, point) == 0
        && point.x >= a.x.min(b.x)
        && point.x <= a.x.max(b.x)
        && point.y >= a.y.min(b.y)
        && point.y <= a.y.max(b.y)
}

pub fn point_in_polygon(point: &Point64, polygon: &[Point64]) -> PointInPolygonResult {
    let count = polygon.len();

    if count < 3 {
        return PointInPolygonResult::Outside;
    }

    let mut is_inside = false;
    let mut prev = &polygon[count - 1];

    for curr in polygon {
        if on_segment(point, prev, curr) {
            return PointInPolygonResult::On;
        }

        if (prev.y > point.y) != (curr.y > point.y) {
            let lhs = (point.x as i128 - prev.x as i128) * (curr.y as i128 - prev.y as i128);
            let rhs = (point.y as i128 - prev.y as i128) * (curr.x as i128 - prev.x as i128);
            let crosses = if curr.y > prev.y { lhs < rhs } else { lhs > rhs };

            if crosses {
                is_inside = !is_inside;
            }
        }

        prev = curr;
    }

    if is_inside {
        PointInPolygonResult::Inside
    } else {
        PointInPolygonResult::Outside
    }
}

pub fn validate_paths(paths: &[Path], operation: Operation, input: InputSet) -> Result<()> {
    for (path_index, path) in paths.iter().enumerate() {
        for (vertex, point) in path.iter().enumerate() {
            if point.x.abs() > MAX_COORD || point.y.abs() > MAX_COORD {
                return Err(GeometryError::OutOfRange {
                    operation,
                    input,
                    path: path_index,
                    vertex,
                    x: point.x,
                    y: point.y,
                });
            }
        }
    }

    Ok(())
}

fn scale_coord(value: f64, scale: f64) -> Option<i64> {
    let scaled = (value * scale).clipper_rounded();

    if !scaled.is_finite() {
        return None;
    }

    scaled.to_i64()
}

fn load_point(
    x: f64,
    y: f64,
    scale: f64,
    path: usize,
    vertex: usize,
) -> Result<(i64, i64)> {
    let non_finite = GeometryError::NonFinite {
        operation: Operation::Load,
        input: InputSet::Raw,
        path,
        vertex,
    };

    if !x.is_finite() || !y.is_finite() {
        return Err(non_finite);
    }

    let out_of_range = |x: i64, y: i64| GeometryError::OutOfRange {
        operation: Operation::Load,
        input: InputSet::Raw,
        path,
        vertex,
        x,
        y,
    };
    let sx = scale_coord(x, scale).ok_or_else(|| out_of_range(i64::MAX, i64::MAX))?;
    let sy = scale_coord(y, scale).ok_or_else(|| out_of_range(sx, i64::MAX))?;

    if sx.abs() > MAX_COORD || sy.abs() > MAX_COORD {
        return Err(out_of_range(sx, sy));
    }

    Ok((sx, sy))
}

/// Loads `x, y` pairs; segment ids follow vertex order and every vertex gets `loop_id`.
pub fn path_from_f64(coords: &[f64], scale: f64, loop_id: i32, path: usize) -> Result<Path> {
    coords
        .chunks_exact(2)
        .enumerate()
        .map(|(vertex, chunk)| {
            let (x, y) = load_point(chunk[0], chunk[1], scale, path, vertex)?;
            Ok(Point64::with_meta(x, y, vertex as i32, loop_id))
        })
        .collect()
}

fn malformed(name: &'static str, value: f64) -> GeometryError {
    GeometryError::InvalidParameter {
        operation: Operation::Load,
        name,
        value,
    }
}

fn load_tag(value: f64, name: &'static str, path: usize, vertex: usize) -> Result<i32> {
    if !value.is_finite() {
        return Err(GeometryError::NonFinite {
            operation: Operation::Load,
            input: InputSet::Raw,
            path,
            vertex,
        });
    }

    if value.fract() != 0.0 {
        return Err(malformed(name, value));
    }

    value.to_i32().ok_or_else(|| malformed(name, value))
}

/// Integral, non-negative buffer entry such as a count or an offset.
fn load_index(value: f64, name: &'static str) -> Result<usize> {
    if value.fract() != 0.0 {
        return Err(malformed(name, value));
    }

    value.to_usize().ok_or_else(|| malformed(name, value))
}

/// Loads `x, y, segment_id, loop_id` records.
pub fn path_from_records(records: &[f64], scale: f64, path: usize) -> Result<Path> {
    if records.len() % POINT_STRIDE != 0 {
        return Err(malformed("point_records", records.len() as f64));
    }

    records
        .chunks_exact(POINT_STRIDE)
        .enumerate()
        .map(|(vertex, chunk)| {
            let (x, y) = load_point(chunk[0], chunk[1], scale, path, vertex)?;
            let segment_id = load_tag(chunk[2], "segment_id", path, vertex)?;
            let loop_id = load_tag(chunk[3], "loop_id", path, vertex)?;

            Ok(Point64::with_meta(x, y, segment_id, loop_id))
        })
        .collect()
}

pub fn path_to_records(path: &[Point64], scale: f64) -> Vec<f64> {
    let inv_scale = 1.0 / scale;
    let mut result = Vec::with_capacity(path.len() * POINT_STRIDE);

    for point in path {
        result.push(point.x as f64 * inv_scale);
        result.push(point.y as f64 * inv_scale);
        result.push(point.segment_id as f64);
        result.push(point.loop_id as f64);
    }

    result
}

/// Packs paths as `[count, offset.., records..]`, offsets counting points.
pub fn pack_paths(paths: &[Path], scale: f64) -> Vec<f64> {
    let header_len = 1 + paths.len();
    let total_points: usize = paths.iter().map(|path| path.len()).sum();
    let mut result = Vec::with_capacity(header_len + total_points * POINT_STRIDE);
    let mut running = 0usize;

    result.push(paths.len() as f64);

    for path in paths {
        result.push(running as f64);
        running += path.len();
    }

    for path in paths {
        result.extend(path_to_records(path, scale));
    }

    result
}

/// Inverse of [`pack_paths`]. An empty buffer is an empty set; a header that
/// does not describe the buffer is rejected.
pub fn unpack_paths(buffer: &[f64], scale: f64) -> Result<PathSet> {
    let Some(&raw_count) = buffer.first() else {
        return Ok(Vec::new());
    };
    let count = load_index(raw_count, "path_count")?;

    if buffer.len() - 1 < count {
        return Err(malformed("path_count", raw_count));
    }

    let data = &buffer[1 + count..];

    if data.len() % POINT_STRIDE != 0 {
        return Err(malformed("point_records", data.len() as f64));
    }

    let total_points = data.len() / POINT_STRIDE;
    let mut offsets = Vec::with_capacity(count);

    for &value in &buffer[1..1 + count] {
        let offset = load_index(value, "path_offset")?;

        if offset > total_points || offsets.last().is_some_and(|&last| offset < last) {
            return Err(malformed("path_offset", value));
        }

        offsets.push(offset);
    }

    let mut result = Vec::with_capacity(count);

    for (index, &start) in offsets.iter().enumerate() {
        let end = offsets.get(index + 1).copied().unwrap_or(total_points);
        let records = &data[start * POINT_STRIDE..end * POINT_STRIDE];

        result.push(path_from_records(records, scale, index)?);
    }

    Ok(result)
}
