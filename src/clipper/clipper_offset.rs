use std::f64::consts::PI;

use tracing::debug;

use crate::clipper::clipper::Clipper;
use crate::clipper::constants::{MAX_ROUND_STEPS, NEAR_STRAIGHT_COS};
use crate::clipper::enums::{ClipType, EndType, FillRule, JoinType};
use crate::constants::{DEFAULT_ARC_TOLERANCE, DEFAULT_MITER_LIMIT, FLOATING_POINT_TOLERANCE, MAX_COORD};
use crate::error::{GeometryError, InputSet, Operation, Result};
use crate::geometry::bound_rect::Rect64;
use crate::geometry::path::{area, strip_duplicates, validate_paths, Path, PathSet};
use crate::geometry::point::{Point64, PointD};
use crate::utils::round::ClipperRound;

#[derive(Debug, Clone)]
struct Group {
    source: PathSet,
    paths: PathSet,
    join_type: JoinType,
    end_type: EndType,
    has_lowest: bool,
    is_reversed: bool,
}

impl Group {
    fn new(paths: &[Path], join_type: JoinType, end_type: EndType) -> Self {
        let is_joined = matches!(end_type, EndType::Polygon | EndType::Joined);
        let stripped: PathSet = paths.iter().map(|path| strip_duplicates(path, is_joined)).collect();
        let (has_lowest, is_reversed) = if end_type == EndType::Polygon {
            match lowest_closed_path_area(&stripped) {
                Some(lowest_area) => (true, lowest_area < 0.0),
                None => (false, false),
            }
        } else {
            (false, false)
        };

        Self {
            source: paths.to_vec(),
            paths: stripped,
            join_type,
            end_type,
            has_lowest,
            is_reversed,
        }
    }
}

/// Area of the path owning the bottom-most (then left-most) vertex, which
/// must be an outer contour.
fn lowest_closed_path_area(paths: &[Path]) -> Option<f64> {
    let mut result = None;
    let mut bot_x = i64::MAX;
    let mut bot_y = i64::MIN;

    for path in paths {
        let mut path_area = None;

        for pt in path {
            if pt.y < bot_y || (pt.y == bot_y && pt.x >= bot_x) {
                continue;
            }

            let value = *path_area.get_or_insert_with(|| area(path));

            if value == 0.0 {
                break;
            }

            result = Some(value);
            bot_x = pt.x;
            bot_y = pt.y;
        }
    }

    result
}

/// Arc steps per full turn that keep a round join within `arc_tol` of the
/// true arc. Stays finite when `arc_tol / abs_delta` is far below `f64`
/// epsilon.
fn round_steps_per_360(abs_delta: f64, arc_tol: f64) -> f64 {
    let half_step = 2.0 * (arc_tol / (2.0 * abs_delta)).sqrt().asin();

    (PI / half_step).min(abs_delta * PI)
}

fn unit_normal(pt1: &Point64, pt2: &Point64) -> PointD {
    if pt1 == pt2 {
        return PointD::default();
    }

    let dx = (pt2.x - pt1.x) as f64;
    let dy = (pt2.y - pt1.y) as f64;
    let inverse_hypot = 1.0 / dx.hypot(dy);

    PointD::new(dy * inverse_hypot, -dx * inverse_hypot)
}

/// Crossing of the infinite lines through both segments.
fn line_intersect(ln1a: &PointD, ln1b: &PointD, ln2a: &PointD, ln2b: &PointD) -> Option<PointD> {
    let dx1 = ln1b.x - ln1a.x;
    let dy1 = ln1b.y - ln1a.y;
    let dx2 = ln2b.x - ln2a.x;
    let dy2 = ln2b.y - ln2a.y;
    let det = dy1 * dx2 - dy2 * dx1;

    if det == 0.0 {
        return None;
    }

    let t = ((ln1a.x - ln2a.x) * dy2 - (ln1a.y - ln2a.y) * dx2) / det;

    Some(PointD::new(ln1a.x + t * dx1, ln1a.y + t * dy1))
}

#[inline(always)]
fn reflect_point(pt: &PointD, pivot: &PointD) -> PointD {
    PointD::new(2.0 * pivot.x - pt.x, 2.0 * pivot.y - pt.y)
}

fn ellipse(center: &Point64, radius: f64, steps: usize) -> Vec<PointD> {
    let steps = if steps <= 2 {
        (PI * radius.sqrt()).clipper_rounded().max(3.0) as usize
    } else {
        steps
    };
    let step_sin = (2.0 * PI / steps as f64).sin();
    let step_cos = (2.0 * PI / steps as f64).cos();
    let (cx, cy) = (center.x as f64, center.y as f64);
    let (mut dx, mut dy) = (step_cos, step_sin);
    let mut result = Vec::with_capacity(steps);

    result.push(PointD::new(cx + radius, cy));

    for _ in 1..steps {
        result.push(PointD::new(cx + radius * dx, cy + radius * dy));

        let x = dx * step_cos - dy * step_sin;
        dy = dy * step_cos + dx * step_sin;
        dx = x;
    }

    result
}

fn check_parameter(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::InvalidParameter {
            operation: Operation::Inflate,
            name,
            value,
        })
    }
}

/// Polygon and polyline offsetting.
///
/// The raw offset contours are cleaned by a union with themselves, so
/// self-overlap, inverted concave-corner loops and collapsed contours never
/// reach the result.
#[derive(Debug, Clone)]
pub struct ClipperOffset {
    groups: Vec<Group>,
    miter_limit: f64,
    arc_tolerance: f64,
    preserve_collinear: bool,
    reverse_solution: bool,
}

impl Default for ClipperOffset {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipperOffset {
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            miter_limit: DEFAULT_MITER_LIMIT,
            arc_tolerance: 0.0,
            preserve_collinear: false,
            reverse_solution: false,
        }
    }

    pub fn miter_limit(mut self, value: f64) -> Self {
        self.miter_limit = value;
        self
    }

    /// Maximum distance of a round join from the true arc. Zero picks a
    /// tolerance from the offset size.
    pub fn arc_tolerance(mut self, value: f64) -> Self {
        self.arc_tolerance = value;
        self
    }

    pub fn preserve_collinear(mut self, value: bool) -> Self {
        self.preserve_collinear = value;
        self
    }

    pub fn reverse_solution(mut self, value: bool) -> Self {
        self.reverse_solution = value;
        self
    }

    pub fn add_path(&mut self, path: &[Point64], join_type: JoinType, end_type: EndType) -> &mut Self {
        self.add_paths(&[path.to_vec()], join_type, end_type)
    }

    pub fn add_paths(&mut self, paths: &[Path], join_type: JoinType, end_type: EndType) -> &mut Self {
        if !paths.is_empty() {
            self.groups.push(Group::new(paths, join_type, end_type));
        }

        self
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    pub fn execute(&self, delta: f64) -> Result<PathSet> {
        check_parameter("delta", delta)?;
        check_parameter("miter_limit", self.miter_limit)?;
        check_parameter("arc_tolerance", self.arc_tolerance)?;

        if self.arc_tolerance < 0.0 {
            return Err(GeometryError::InvalidParameter {
                operation: Operation::Inflate,
                name: "arc_tolerance",
                value: self.arc_tolerance,
            });
        }

        let sources: PathSet = self.groups.iter().flat_map(|group| group.source.iter().cloned()).collect();

        validate_paths(&sources, Operation::Inflate, InputSet::Offset)?;

        debug!(delta, groups = self.groups.len(), paths = sources.len(), "inflate started");

        if delta.abs() < 0.5 {
            return Ok(sources);
        }

        let temp_lim = if self.miter_limit <= 1.0 {
            2.0
        } else {
            2.0 / (self.miter_limit * self.miter_limit)
        };
        let mut solution = Vec::new();
        let mut path_offset = 0;

        for group in &self.groups {
            let mut offsetter = Offsetter::new(group, delta, temp_lim, self.arc_tolerance)?;

            offsetter.offset_group(group, &mut solution).map_err(|path| GeometryError::Overflow {
                operation: Operation::Inflate,
                path: path_offset + path,
            })?;
            path_offset += group.paths.len();
        }

        if solution.is_empty() {
            return Ok(solution);
        }

        let paths_reversed = self
            .groups
            .iter()
            .find(|group| group.end_type == EndType::Polygon)
            .is_some_and(|group| group.is_reversed);
        let fill_rule = if paths_reversed {
            FillRule::Negative
        } else {
            FillRule::Positive
        };
        let mut clipper = Clipper::new()
            .preserve_collinear(self.preserve_collinear)
            .reverse_solution(self.reverse_solution != paths_reversed);

        clipper.add_subject(&solution);

        let result = clipper
            .execute(ClipType::Union, fill_rule)
            .map_err(|error| match error {
                GeometryError::Unresolved { y, .. } => GeometryError::Unresolved {
                    operation: Operation::Inflate,
                    y,
                },
                other => other,
            })?;

        debug!(delta, paths = result.len(), "inflate finished");

        Ok(result)
    }
}

/// Per-group offsetting state. Errors carry the index of the path whose
/// generated vertices left the coordinate range.
struct Offsetter {
    group_delta: f64,
    join_type: JoinType,
    end_type: EndType,
    temp_lim: f64,
    step_sin: f64,
    step_cos: f64,
    steps_per_rad: f64,
    norms: Vec<PointD>,
    path_out: Path,
    overflow: bool,
}

impl Offsetter {
    /// Fails when an explicit `arc_tolerance` needs more than
    /// [`MAX_ROUND_STEPS`] per turn; the derived tolerance is clamped instead.
    fn new(group: &Group, delta: f64, temp_lim: f64, arc_tolerance: f64) -> Result<Self> {
        let group_delta = if group.end_type == EndType::Polygon {
            let delta = if group.has_lowest { delta } else { delta.abs() };

            if group.is_reversed {
                -delta
            } else {
                delta
            }
        } else {
            delta.abs()
        };

        let mut result = Self {
            group_delta,
            join_type: group.join_type,
            end_type: group.end_type,
            temp_lim,
            step_sin: 0.0,
            step_cos: 1.0,
            steps_per_rad: 0.0,
            norms: Vec::new(),
            path_out: Vec::new(),
            overflow: false,
        };

        if group.join_type == JoinType::Round || group.end_type == EndType::Round {
            let abs_delta = group_delta.abs();
            let steps_per_360 = if arc_tolerance > FLOATING_POINT_TOLERANCE {
                let steps = round_steps_per_360(abs_delta, abs_delta.min(arc_tolerance));

                if steps > MAX_ROUND_STEPS {
                    return Err(GeometryError::InvalidParameter {
                        operation: Operation::Inflate,
                        name: "arc_tolerance",
                        value: arc_tolerance,
                    });
                }

                steps
            } else {
                let arc_tol = (2.0 + abs_delta).log10() * DEFAULT_ARC_TOLERANCE;

                round_steps_per_360(abs_delta, arc_tol).min(MAX_ROUND_STEPS)
            };

            result.step_sin = (2.0 * PI / steps_per_360).sin();
            result.step_cos = (2.0 * PI / steps_per_360).cos();

            if group_delta < 0.0 {
                result.step_sin = -result.step_sin;
            }

            result.steps_per_rad = steps_per_360 / (2.0 * PI);
        }

        Ok(result)
    }

    fn offset_group(&mut self, group: &Group, solution: &mut PathSet) -> std::result::Result<(), usize> {
        let abs_delta = self.group_delta.abs();

        for (index, path) in group.paths.iter().enumerate() {
            self.path_out.clear();
            self.end_type = group.end_type;

            match path.len() {
                0 => continue,
                1 => {
                    if self.group_delta < 1.0 {
                        continue;
                    }

                    let pt = &path[0];

                    if group.join_type == JoinType::Round {
                        let steps = if self.steps_per_rad > 0.0 {
                            (self.steps_per_rad * 2.0 * PI).ceil() as usize
                        } else {
                            0
                        };

                        for point in ellipse(pt, abs_delta, steps) {
                            self.push(point, pt.loop_id);
                        }
                    } else {
                        if abs_delta.ceil() > MAX_COORD as f64 {
                            return Err(index);
                        }

                        let d = abs_delta.ceil() as i64;
                        let rect = Rect64::new(pt.x - d, pt.y - d, pt.x + d, pt.y + d);

                        for corner in rect.as_path(pt.loop_id) {
                            self.push(corner.to_point_d(), pt.loop_id);
                        }
                    }
                }
                count => {
                    if count == 2 && group.end_type == EndType::Joined {
                        self.end_type = if group.join_type == JoinType::Round {
                            EndType::Round
                        } else {
                            EndType::Square
                        };
                    }

                    self.build_normals(path);

                    match self.end_type {
                        EndType::Polygon => self.offset_polygon(path),
                        EndType::Joined => {
                            self.offset_polygon(path);
                            if self.overflow {
                                return Err(index);
                            }
                            solution.push(std::mem::take(&mut self.path_out));
                            self.offset_reversed(path);
                        }
                        _ => self.offset_open_path(path),
                    }
                }
            }

            if self.overflow {
                return Err(index);
            }

            solution.push(std::mem::take(&mut self.path_out));
        }

        Ok(())
    }

    fn push(&mut self, point: PointD, loop_id: i32) {
        let limit = MAX_COORD as f64;

        if !point.is_finite() || point.x.abs() > limit || point.y.abs() > limit {
            self.overflow = true;
            return;
        }

        self.path_out.push(Point64::from_point_d(&point, loop_id));
    }

    fn build_normals(&mut self, path: &[Point64]) {
        let count = path.len();

        self.norms.clear();
        self.norms
            .extend((0..count).map(|i| unit_normal(&path[i], &path[(i + 1) % count])));
    }

    #[inline(always)]
    fn perpendic(&self, pt: &Point64, norm: &PointD) -> PointD {
        pt.to_point_d().add(&norm.scale(self.group_delta))
    }

    fn offset_polygon(&mut self, path: &[Point64]) {
        let mut k = path.len() - 1;

        for j in 0..path.len() {
            self.offset_point(path, j, k);
            k = j;
        }
    }

    /// Second side of a joined open path: the path walked backwards with
    /// normals flipped to match.
    fn offset_reversed(&mut self, path: &[Point64]) {
        let reversed: Path = path.iter().rev().copied().collect();

        self.norms.reverse();
        self.norms.rotate_left(1);
        for norm in &mut self.norms {
            *norm = norm.reverse();
        }

        self.offset_polygon(&reversed);
    }

    fn offset_open_path(&mut self, path: &[Point64]) {
        let high = path.len() - 1;

        self.offset_cap(path, 0);

        for j in 1..high {
            self.offset_point(path, j, j - 1);
        }

        for i in (1..=high).rev() {
            self.norms[i] = self.norms[i - 1].reverse();
        }
        self.norms[0] = self.norms[high];

        self.offset_cap(path, high);

        for j in (1..high).rev() {
            self.offset_point(path, j, j + 1);
        }
    }

    fn offset_cap(&mut self, path: &[Point64], j: usize) {
        if self.group_delta.abs() <= FLOATING_POINT_TOLERANCE {
            self.path_out.push(path[j]);
            return;
        }

        match self.end_type {
            EndType::Butt => self.do_bevel(path, j, j),
            EndType::Round => self.do_round(path, j, j, PI),
            _ => self.do_square(path, j, j),
        }
    }

    fn offset_point(&mut self, path: &[Point64], j: usize, k: usize) {
        if path[j] == path[k] {
            return;
        }

        let sin_a = self.norms[j].cross(&self.norms[k]).clamp(-1.0, 1.0);
        let cos_a = self.norms[j].dot(&self.norms[k]);

        if self.group_delta.abs() <= FLOATING_POINT_TOLERANCE {
            self.path_out.push(path[j]);
            return;
        }

        if cos_a > -NEAR_STRAIGHT_COS && sin_a * self.group_delta < 0.0 {
            // concave: the inverted loop is removed by the final union
            let before = self.perpendic(&path[j], &self.norms[k]);
            self.push(before, path[k].loop_id);

            if cos_a < NEAR_STRAIGHT_COS {
                self.path_out.push(path[j]);
            }

            let after = self.perpendic(&path[j], &self.norms[j]);
            self.push(after, path[j].loop_id);
        } else if cos_a > NEAR_STRAIGHT_COS && self.join_type != JoinType::Round {
            self.do_miter(path, j, k, cos_a);
        } else {
            match self.join_type {
                JoinType::Miter if cos_a > self.temp_lim - 1.0 => self.do_miter(path, j, k, cos_a),
                JoinType::Round => self.do_round(path, j, k, sin_a.atan2(cos_a)),
                _ => self.do_square(path, j, k),
            }
        }
    }

    fn do_miter(&mut self, path: &[Point64], j: usize, k: usize, cos_a: f64) {
        let q = self.group_delta / (cos_a + 1.0);
        let point = path[j].to_point_d().add(&self.norms[k].add(&self.norms[j]).scale(q));

        self.push(point, path[j].loop_id);
    }

    fn do_bevel(&mut self, path: &[Point64], j: usize, k: usize) {
        let pt = path[j].to_point_d();
        let (pt1, pt2) = if j == k {
            let offset = self.norms[j].scale(self.group_delta.abs());
            (pt.sub(&offset), pt.add(&offset))
        } else {
            (
                pt.add(&self.norms[k].scale(self.group_delta)),
                pt.add(&self.norms[j].scale(self.group_delta)),
            )
        };

        self.push(pt1, path[j].loop_id);
        self.push(pt2, path[j].loop_id);
    }

    fn do_square(&mut self, path: &[Point64], j: usize, k: usize) {
        let loop_id = path[j].loop_id;
        let delta = self.group_delta;
        let vec = if j == k {
            PointD::new(self.norms[j].y, -self.norms[j].x)
        } else {
            PointD::new(-self.norms[k].y, self.norms[k].x)
                .add(&PointD::new(self.norms[j].y, -self.norms[j].x))
                .normalize()
        };

        // the vertex pushed |delta| along the bisector
        let pt_q = path[j].to_point_d().add(&vec.scale(delta.abs()));
        let pt1 = pt_q.add(&PointD::new(delta * vec.y, -delta * vec.x));
        let pt2 = pt_q.add(&PointD::new(-delta * vec.y, delta * vec.x));
        let pt3 = self.perpendic(&path[k], &self.norms[k]);

        if j == k {
            let pt4 = pt3.add(&vec.scale(delta));
            let pt = line_intersect(&pt1, &pt2, &pt3, &pt4).unwrap_or(pt_q);

            self.push(reflect_point(&pt, &pt_q), loop_id);
            self.push(pt, loop_id);
        } else {
            let pt4 = self.perpendic(&path[j], &self.norms[k]);
            let pt = line_intersect(&pt1, &pt2, &pt3, &pt4).unwrap_or(pt_q);

            self.push(pt, loop_id);
            self.push(reflect_point(&pt, &pt_q), loop_id);
        }
    }

    fn do_round(&mut self, path: &[Point64], j: usize, k: usize, angle: f64) {
        let loop_id = path[j].loop_id;
        let pt = path[j].to_point_d();
        let mut offset = self.norms[k].scale(self.group_delta);

        if j == k {
            offset = offset.reverse();
        }

        self.push(pt.add(&offset), loop_id);

        let steps = (self.steps_per_rad * angle.abs()).ceil() as usize;

        for _ in 1..steps {
            offset = PointD::new(
                offset.x * self.step_cos - self.step_sin * offset.y,
                offset.x * self.step_sin + offset.y * self.step_cos,
            );
            self.push(pt.add(&offset), loop_id);
        }

        let end = self.perpendic(&path[j], &self.norms[j]);
        self.push(end, loop_id);
    }
}
