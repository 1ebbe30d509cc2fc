use tracing::{debug, trace, warn};

use crate::clipper::constants::{JOIN_LEFT_DIST_SQRD, JOIN_RIGHT_DIST_SQRD, STEEP_DX, UNASSIGNED};
use crate::clipper::enums::{ClipType, FillRule, JoinWith, PathType};
use crate::clipper::intersect_node::IntersectList;
use crate::clipper::join::Joiner;
use crate::clipper::local_minima::LocalMinima;
use crate::clipper::out_pt::OutPtList;
use crate::clipper::out_rec::OutRec;
use crate::clipper::scanbeam::Scanbeam;
use crate::clipper::t_edge::TEdge;
use crate::clipper::utils::{
    get_closest_point_on_segment, get_segment_intersect_pt, perpendic_dist_from_line_sqrd, segments_intersect,
};
use crate::error::{GeometryError, InputSet, Operation, Result};
use crate::geometry::path::{validate_paths, Path, PathSet};
use crate::geometry::point::Point64;
use crate::geometry::poly_tree::PolyTree;
use crate::utils::math::{area_triangle, cross_product, dot_product, is_collinear};

/// Boolean operations over tagged polygon sets.
///
/// Inputs are stored until [`Clipper::execute`]; every call builds and drops
/// its own sweep state, so a configured `Clipper` can be executed repeatedly.
#[derive(Debug, Clone)]
pub struct Clipper {
    subjects: PathSet,
    clips: PathSet,
    preserve_collinear: bool,
    reverse_solution: bool,
}

impl Default for Clipper {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipper {
    pub fn new() -> Self {
        Self {
            subjects: Vec::new(),
            clips: Vec::new(),
            preserve_collinear: true,
            reverse_solution: false,
        }
    }

    /// Keep collinear input vertices in the output (default `true`).
    pub fn preserve_collinear(mut self, value: bool) -> Self {
        self.preserve_collinear = value;
        self
    }

    /// Output outers negative and holes positive.
    pub fn reverse_solution(mut self, value: bool) -> Self {
        self.reverse_solution = value;
        self
    }

    pub fn add_path(&mut self, path: &[Point64], path_type: PathType) -> &mut Self {
        match path_type {
            PathType::Subject => self.subjects.push(path.to_vec()),
            PathType::Clip => self.clips.push(path.to_vec()),
        }

        self
    }

    pub fn add_subject(&mut self, paths: &[Path]) -> &mut Self {
        self.subjects.extend(paths.iter().cloned());
        self
    }

    pub fn add_clip(&mut self, paths: &[Path]) -> &mut Self {
        self.clips.extend(paths.iter().cloned());
        self
    }

    pub fn clear(&mut self) {
        self.subjects.clear();
        self.clips.clear();
    }

    pub fn execute(&self, clip_type: ClipType, fill_rule: FillRule) -> Result<PathSet> {
        let operation = Operation::Clip(clip_type);

        validate_paths(&self.subjects, operation, InputSet::Subject)?;
        validate_paths(&self.clips, operation, InputSet::Clip)?;

        debug!(
            %clip_type,
            ?fill_rule,
            subjects = self.subjects.len(),
            clips = self.clips.len(),
            "clip started"
        );

        let mut sweep = Sweep::new(clip_type, fill_rule, self.preserve_collinear, self.reverse_solution);

        for path in &self.subjects {
            sweep.local_minima.add_path(path, PathType::Subject);
        }

        for path in &self.clips {
            sweep.local_minima.add_path(path, PathType::Clip);
        }

        if let Err(error) = sweep.execute_internal() {
            warn!(%error, "clip aborted");
            return Err(error);
        }

        let result = sweep.build_paths();

        debug!(%clip_type, paths = result.len(), "clip finished");

        Ok(result)
    }

    pub fn execute_tree(&self, clip_type: ClipType, fill_rule: FillRule) -> Result<PolyTree> {
        self.execute(clip_type, fill_rule).map(PolyTree::from_paths)
    }
}

/// State of a single sweep. All links are indices into the arenas below.
struct Sweep {
    operation: Operation,
    clip_type: ClipType,
    fill_rule: FillRule,
    preserve_collinear: bool,
    reverse_solution: bool,
    succeeded: bool,
    bot_y: i64,
    local_minima: LocalMinima,
    scanbeam: Scanbeam,
    t_edge: TEdge,
    intersections: IntersectList,
    joiner: Joiner,
    out_pt: OutPtList,
    out_rec: OutRec,
}

impl Sweep {
    fn new(clip_type: ClipType, fill_rule: FillRule, preserve_collinear: bool, reverse_solution: bool) -> Self {
        Self {
            operation: Operation::Clip(clip_type),
            clip_type,
            fill_rule,
            preserve_collinear,
            reverse_solution,
            succeeded: true,
            bot_y: 0,
            local_minima: LocalMinima::new(),
            scanbeam: Scanbeam::new(),
            t_edge: TEdge::new(),
            intersections: IntersectList::new(),
            joiner: Joiner::new(),
            out_pt: OutPtList::new(),
            out_rec: OutRec::new(),
        }
    }

    fn execute_internal(&mut self) -> Result<()> {
        self.local_minima.reset();

        let minima_y: Vec<i64> = self.local_minima.minima_y().collect();
        for y in minima_y {
            self.scanbeam.insert(y);
        }

        let Some(mut y) = self.scanbeam.pop() else {
            return Ok(());
        };

        loop {
            self.insert_local_minima_into_ael(y);
            self.process_horizontals();

            if self.joiner.has_segments() {
                self.joiner.convert_segments(&mut self.out_pt, &self.out_rec);
            }

            self.bot_y = y;

            let Some(top_y) = self.scanbeam.pop() else {
                break;
            };

            y = top_y;
            trace!(bot_y = self.bot_y, top_y = y, "scanbeam");

            self.do_intersections(y)?;
            self.do_top_of_scanbeam(y);
            self.process_horizontals();

            if !self.succeeded {
                break;
            }
        }

        if !self.succeeded {
            return Err(GeometryError::Unresolved {
                operation: self.operation,
                y,
            });
        }

        self.joiner.process(&mut self.out_pt, &mut self.out_rec);

        Ok(())
    }

    fn process_horizontals(&mut self) {
        while let Some(horz) = self.t_edge.pop_horz() {
            self.do_horizontal(horz);
        }
    }

    // Provenance

    /// Tags a point produced where `e1` meets `e2` (`e1` on the left). A
    /// Subject edge outranks a Clip edge, otherwise the left edge leads. The
    /// point inherits the tags of a coinciding bound vertex, else it is
    /// synthetic and takes the loop of the leading edge.
    ///
    /// Crossings found later inside a finished ring follow a ring-order rule
    /// instead, see [`Sweep::do_split_op`].
    fn crossing_point(&self, e1: usize, e2: usize, pt: Point64) -> Point64 {
        let (primary, secondary) =
            if self.t_edge[e1].path_type == PathType::Clip && self.t_edge[e2].path_type == PathType::Subject {
                (e2, e1)
            } else {
                (e1, e2)
            };

        for edge in [primary, secondary] {
            let active = &self.t_edge[edge];

            if pt == active.bot {
                return pt.retag(&active.bot);
            }

            if pt == active.top {
                return pt.retag(&active.top);
            }
        }

        Point64::synthetic(pt.x, pt.y, self.t_edge.path_start(primary).loop_id)
    }

    /// Same as [`Sweep::crossing_point`] for a point that lies on one edge only.
    fn edge_point(&self, edge: usize, pt: Point64) -> Point64 {
        let active = &self.t_edge[edge];

        if pt == active.bot {
            pt.retag(&active.bot)
        } else if pt == active.top {
            pt.retag(&active.top)
        } else {
            Point64::synthetic(pt.x, pt.y, self.t_edge.path_start(edge).loop_id)
        }
    }

    // Winding

    fn rule_count(&self, count: i32) -> i32 {
        match self.fill_rule {
            FillRule::EvenOdd | FillRule::NonZero => count.abs(),
            FillRule::Positive => count,
            FillRule::Negative => -count,
        }
    }

    fn set_wind_count_for_closed_path_edge(&mut self, edge: usize) {
        let path_type = self.t_edge[edge].path_type;
        let wind_dx = self.t_edge[edge].wind_dx;
        let mut e2 = self.t_edge[edge].prev_in_ael;

        while e2 != UNASSIGNED && self.t_edge[e2].path_type != path_type {
            e2 = self.t_edge[e2].prev_in_ael;
        }

        let mut wind_cnt2 = 0;
        let wind_cnt;

        if e2 == UNASSIGNED {
            wind_cnt = wind_dx;
            e2 = self.t_edge.active;
        } else if self.fill_rule == FillRule::EvenOdd {
            wind_cnt = wind_dx;
            wind_cnt2 = self.t_edge[e2].wind_cnt2;
            e2 = self.t_edge[e2].next_in_ael;
        } else {
            let other = &self.t_edge[e2];

            wind_cnt = if other.wind_cnt * other.wind_dx < 0 {
                // outside `other`
                if other.wind_cnt.abs() > 1 {
                    if other.wind_dx * wind_dx < 0 {
                        other.wind_cnt
                    } else {
                        other.wind_cnt + wind_dx
                    }
                } else {
                    wind_dx
                }
            } else if other.wind_dx * wind_dx < 0 {
                other.wind_cnt
            } else {
                other.wind_cnt + wind_dx
            };
            wind_cnt2 = other.wind_cnt2;
            e2 = other.next_in_ael;
        }

        while e2 != edge && e2 != UNASSIGNED {
            let other = &self.t_edge[e2];

            if other.path_type != path_type {
                if self.fill_rule == FillRule::EvenOdd {
                    wind_cnt2 = if wind_cnt2 == 0 { 1 } else { 0 };
                } else {
                    wind_cnt2 += other.wind_dx;
                }
            }

            e2 = other.next_in_ael;
        }

        self.t_edge[edge].wind_cnt = wind_cnt;
        self.t_edge[edge].wind_cnt2 = wind_cnt2;
    }

    fn is_contributing_closed(&self, edge: usize) -> bool {
        let active = &self.t_edge[edge];

        let in_fill = match self.fill_rule {
            FillRule::EvenOdd => true,
            FillRule::NonZero => active.wind_cnt.abs() == 1,
            FillRule::Positive => active.wind_cnt == 1,
            FillRule::Negative => active.wind_cnt == -1,
        };

        if !in_fill {
            return false;
        }

        let wind_cnt2 = active.wind_cnt2;
        let outside_other = match self.fill_rule {
            FillRule::Positive => wind_cnt2 <= 0,
            FillRule::Negative => wind_cnt2 >= 0,
            _ => wind_cnt2 == 0,
        };

        match self.clip_type {
            ClipType::Intersection => match self.fill_rule {
                FillRule::Positive => wind_cnt2 > 0,
                FillRule::Negative => wind_cnt2 < 0,
                _ => wind_cnt2 != 0,
            },
            ClipType::Union => outside_other,
            ClipType::Difference => (active.path_type == PathType::Subject) == outside_other,
            ClipType::Xor => true,
        }
    }

    // Active edge list

    fn insert_local_minima_into_ael(&mut self, bot_y: i64) {
        while let Some(minimum) = self.local_minima.pop(bot_y) {
            let vertex = minimum.vertex;
            let descending = self.local_minima.prev(vertex);
            let ascending = self.local_minima.next(vertex);
            let mut left = self
                .t_edge
                .create(vertex, descending, -1, minimum.path_type, &self.local_minima);
            let mut right = self
                .t_edge
                .create(vertex, ascending, 1, minimum.path_type, &self.local_minima);

            let swap = if self.t_edge.is_horizontal(left) {
                self.t_edge.is_heading_right_horz(left)
            } else if self.t_edge.is_horizontal(right) {
                self.t_edge.is_heading_left_horz(right)
            } else {
                self.t_edge[left].dx < self.t_edge[right].dx
            };

            if swap {
                std::mem::swap(&mut left, &mut right);
            }

            self.t_edge[left].is_left_bound = true;
            self.t_edge.insert_left_edge(left, &self.local_minima);
            self.set_wind_count_for_closed_path_edge(left);

            let contributing = self.is_contributing_closed(left);

            self.t_edge[right].is_left_bound = false;
            self.t_edge[right].wind_cnt = self.t_edge[left].wind_cnt;
            self.t_edge[right].wind_cnt2 = self.t_edge[left].wind_cnt2;
            self.t_edge.insert_right_edge(left, right);

            if contributing {
                let bot = self.t_edge[left].bot;

                self.add_local_min_poly(left, right, bot, true);

                if !self.t_edge.is_horizontal(left) {
                    self.check_join_left(left, bot, false);
                }
            }

            loop {
                let next = self.t_edge[right].next_in_ael;

                if next == UNASSIGNED || !self.t_edge.is_valid_ael_order(next, right, &self.local_minima) {
                    break;
                }

                let bot = self.t_edge[right].bot;
                self.intersect_edges(right, next, bot);
                self.t_edge.swap_positions_in_ael(right, next);
            }

            if self.t_edge.is_horizontal(right) {
                self.t_edge.push_horz(right);
            } else {
                let bot = self.t_edge[right].bot;

                self.check_join_right(right, bot, false);
                self.scanbeam.insert(self.t_edge[right].top.y);
            }

            if self.t_edge.is_horizontal(left) {
                self.t_edge.push_horz(left);
            } else {
                self.scanbeam.insert(self.t_edge[left].top.y);
            }
        }
    }

    fn update_edge_into_ael(&mut self, edge: usize) {
        let vertex_top = self.t_edge.next_vertex(edge, &self.local_minima);
        let top = *self.local_minima.point(vertex_top);
        let active = &mut self.t_edge[edge];

        active.bot = active.top;
        active.vertex_top = vertex_top;
        active.top = top;
        active.curr_x = active.bot.x;
        self.t_edge.set_dx(edge);

        if self.t_edge.is_joined(edge) {
            let bot = self.t_edge[edge].bot;
            self.split(edge, bot);
        }

        if self.t_edge.is_horizontal(edge) {
            self.trim_horz(edge);
            return;
        }

        self.scanbeam.insert(top.y);

        let bot = self.t_edge[edge].bot;
        self.check_join_left(edge, bot, false);
        self.check_join_right(edge, bot, true);
    }

    /// Merges consecutive horizontal vertices into the edge. Reversing spikes
    /// are always merged; straight runs only without `preserve_collinear`.
    fn trim_horz(&mut self, horz: usize) {
        let mut was_trimmed = false;
        let mut pt = *self
            .local_minima
            .point(self.t_edge.next_vertex(horz, &self.local_minima));

        while pt.y == self.t_edge[horz].top.y {
            let active = &self.t_edge[horz];

            if self.preserve_collinear && ((pt.x < active.top.x) != (active.bot.x < active.top.x)) {
                break;
            }

            let vertex_top = self.t_edge.next_vertex(horz, &self.local_minima);
            self.t_edge[horz].vertex_top = vertex_top;
            self.t_edge[horz].top = pt;
            was_trimmed = true;

            if self.t_edge.is_maxima(horz, &self.local_minima) {
                break;
            }

            pt = *self
                .local_minima
                .point(self.t_edge.next_vertex(horz, &self.local_minima));
        }

        if was_trimmed {
            self.t_edge.set_dx(horz);
        }
    }

    // Output records

    fn add_local_min_poly(&mut self, e1: usize, e2: usize, pt: Point64, is_new: bool) -> usize {
        let outrec = self.out_rec.create();

        self.t_edge[e1].outrec = outrec;
        self.t_edge[e2].outrec = outrec;

        let prev_hot = self.t_edge.get_prev_hot_edge(e1);
        let e1_front = if prev_hot != UNASSIGNED {
            let ascending = self.out_rec.is_front(self.t_edge[prev_hot].outrec, prev_hot);
            ascending != is_new
        } else {
            is_new
        };

        let (front, back) = if e1_front { (e1, e2) } else { (e2, e1) };
        self.out_rec[outrec].front_edge = front;
        self.out_rec[outrec].back_edge = back;

        let op = self.out_pt.create(pt, outrec);
        self.out_rec[outrec].pts = op;

        op
    }

    fn add_local_max_poly(&mut self, e1: usize, e2: usize, pt: Point64) -> usize {
        if self.t_edge.is_joined(e1) {
            self.split(e1, pt);
        }

        if self.t_edge.is_joined(e2) {
            self.split(e2, pt);
        }

        let or1 = self.t_edge[e1].outrec;
        let or2 = self.t_edge[e2].outrec;

        if or1 == UNASSIGNED || or2 == UNASSIGNED || self.out_rec.is_front(or1, e1) == self.out_rec.is_front(or2, e2) {
            self.succeeded = false;
            return UNASSIGNED;
        }

        let result = self.add_out_pt(e1, pt);

        if or1 == or2 {
            self.out_rec[or1].pts = result;
            self.uncouple_outrec(e1);
        } else if or1 < or2 {
            self.join_outrec_paths(e1, e2);
        } else {
            self.join_outrec_paths(e2, e1);
        }

        result
    }

    /// Appends the ring of `e2`'s record onto `e1`'s record and leaves both
    /// edges without output.
    fn join_outrec_paths(&mut self, e1: usize, e2: usize) {
        let or1 = self.t_edge[e1].outrec;
        let or2 = self.t_edge[e2].outrec;
        let p1_st = self.out_rec[or1].pts;
        let p2_st = self.out_rec[or2].pts;
        let p1_end = self.out_pt[p1_st].next;
        let p2_end = self.out_pt[p2_st].next;

        if self.out_rec.is_front(or1, e1) {
            self.out_pt[p2_end].prev = p1_st;
            self.out_pt[p1_st].next = p2_end;
            self.out_pt[p2_st].next = p1_end;
            self.out_pt[p1_end].prev = p2_st;
            self.out_rec[or1].pts = p2_st;

            let front = self.out_rec[or2].front_edge;
            self.out_rec[or1].front_edge = front;

            if front != UNASSIGNED {
                self.t_edge[front].outrec = or1;
            }
        } else {
            self.out_pt[p1_end].prev = p2_st;
            self.out_pt[p2_st].next = p1_end;
            self.out_pt[p1_st].next = p2_end;
            self.out_pt[p2_end].prev = p1_st;

            let back = self.out_rec[or2].back_edge;
            self.out_rec[or1].back_edge = back;

            if back != UNASSIGNED {
                self.t_edge[back].outrec = or1;
            }
        }

        self.out_rec[or2].front_edge = UNASSIGNED;
        self.out_rec[or2].back_edge = UNASSIGNED;
        self.out_rec[or2].pts = UNASSIGNED;
        self.out_rec[or2].owner = or1;

        self.t_edge[e1].outrec = UNASSIGNED;
        self.t_edge[e2].outrec = UNASSIGNED;
    }

    /// Adds `pt` at the end of the ring owned by `edge`; an equal end point is reused.
    fn add_out_pt(&mut self, edge: usize, pt: Point64) -> usize {
        let outrec = self.t_edge[edge].outrec;
        let to_front = self.out_rec.is_front(outrec, edge);
        let op_front = self.out_rec[outrec].pts;
        let op_back = self.out_pt[op_front].next;

        if to_front {
            if pt == self.out_pt[op_front].pt {
                return op_front;
            }
        } else if pt == self.out_pt[op_back].pt {
            return op_back;
        }

        let new_op = self.out_pt.insert_between(pt, outrec, op_front, op_back);

        if to_front {
            self.out_rec[outrec].pts = new_op;
        }

        new_op
    }

    fn get_last_op(&self, hot_edge: usize) -> usize {
        let outrec = self.t_edge[hot_edge].outrec;
        let pts = self.out_rec[outrec].pts;

        if self.out_rec.is_front(outrec, hot_edge) {
            pts
        } else {
            self.out_pt[pts].next
        }
    }

    fn uncouple_outrec(&mut self, edge: usize) {
        let outrec = self.t_edge[edge].outrec;

        if outrec == UNASSIGNED {
            return;
        }

        for side in [self.out_rec[outrec].front_edge, self.out_rec[outrec].back_edge] {
            if side != UNASSIGNED {
                self.t_edge[side].outrec = UNASSIGNED;
            }
        }

        self.out_rec[outrec].front_edge = UNASSIGNED;
        self.out_rec[outrec].back_edge = UNASSIGNED;
    }

    fn swap_outrecs(&mut self, e1: usize, e2: usize) {
        let or1 = self.t_edge[e1].outrec;
        let or2 = self.t_edge[e2].outrec;

        if or1 == or2 {
            if or1 != UNASSIGNED {
                self.out_rec.swap_front_back(or1);
            }
            return;
        }

        if or1 != UNASSIGNED {
            if self.out_rec.is_front(or1, e1) {
                self.out_rec[or1].front_edge = e2;
            } else {
                self.out_rec[or1].back_edge = e2;
            }
        }

        if or2 != UNASSIGNED {
            if self.out_rec.is_front(or2, e2) {
                self.out_rec[or2].front_edge = e1;
            } else {
                self.out_rec[or2].back_edge = e1;
            }
        }

        self.t_edge[e1].outrec = or2;
        self.t_edge[e2].outrec = or1;
    }

    // Collinear joins

    fn split(&mut self, edge: usize, pt: Point64) {
        if self.t_edge[edge].join_with == JoinWith::Right {
            let next = self.t_edge[edge].next_in_ael;

            self.t_edge[edge].join_with = JoinWith::NoJoin;

            if next != UNASSIGNED {
                self.t_edge[next].join_with = JoinWith::NoJoin;
                self.add_local_min_poly(edge, next, pt, true);
            }
        } else {
            let prev = self.t_edge[edge].prev_in_ael;

            self.t_edge[edge].join_with = JoinWith::NoJoin;

            if prev != UNASSIGNED {
                self.t_edge[prev].join_with = JoinWith::NoJoin;
                self.add_local_min_poly(prev, edge, pt, true);
            }
        }
    }

    fn check_join_left(&mut self, edge: usize, pt: Point64, check_curr_x: bool) {
        let prev = self.t_edge[edge].prev_in_ael;

        if prev == UNASSIGNED
            || !self.t_edge.is_hot(edge)
            || !self.t_edge.is_hot(prev)
            || self.t_edge.is_horizontal(edge)
            || self.t_edge.is_horizontal(prev)
        {
            return;
        }

        let active = &self.t_edge[edge];
        let other = &self.t_edge[prev];

        // trivial joins near the ends of either edge
        if (pt.y < active.top.y + 2 || pt.y < other.top.y + 2) && (active.bot.y > pt.y || other.bot.y > pt.y) {
            return;
        }

        if check_curr_x {
            if perpendic_dist_from_line_sqrd(&pt, &other.bot, &other.top) > JOIN_LEFT_DIST_SQRD {
                return;
            }
        } else if active.curr_x != other.curr_x {
            return;
        }

        if !is_collinear(&active.top, &pt, &other.top) {
            return;
        }

        let outrec = active.outrec;
        let prev_outrec = other.outrec;

        if outrec == prev_outrec {
            self.add_local_max_poly(prev, edge, pt);
        } else if outrec < prev_outrec {
            self.join_outrec_paths(edge, prev);
        } else {
            self.join_outrec_paths(prev, edge);
        }

        self.t_edge[prev].join_with = JoinWith::Right;
        self.t_edge[edge].join_with = JoinWith::Left;
    }

    fn check_join_right(&mut self, edge: usize, pt: Point64, check_curr_x: bool) {
        let next = self.t_edge[edge].next_in_ael;

        if next == UNASSIGNED
            || !self.t_edge.is_hot(edge)
            || !self.t_edge.is_hot(next)
            || self.t_edge.is_horizontal(edge)
            || self.t_edge.is_horizontal(next)
        {
            return;
        }

        let active = &self.t_edge[edge];
        let other = &self.t_edge[next];

        if (pt.y < active.top.y + 2 || pt.y < other.top.y + 2) && (active.bot.y > pt.y || other.bot.y > pt.y) {
            return;
        }

        if check_curr_x {
            if perpendic_dist_from_line_sqrd(&pt, &other.bot, &other.top) > JOIN_RIGHT_DIST_SQRD {
                return;
            }
        } else if active.curr_x != other.curr_x {
            return;
        }

        if !is_collinear(&active.top, &pt, &other.top) {
            return;
        }

        let outrec = active.outrec;
        let next_outrec = other.outrec;

        if outrec == next_outrec {
            self.add_local_max_poly(edge, next, pt);
        } else if outrec < next_outrec {
            self.join_outrec_paths(edge, next);
        } else {
            self.join_outrec_paths(next, edge);
        }

        self.t_edge[edge].join_with = JoinWith::Right;
        self.t_edge[next].join_with = JoinWith::Left;
    }

    // Intersections

    /// Crosses two neighbouring edges (`e1` left of `e2`) at `pt` and emits
    /// output. Returns `pt` with its provenance resolved.
    fn intersect_edges(&mut self, e1: usize, e2: usize, pt: Point64) -> Point64 {
        let pt = self.crossing_point(e1, e2, pt);

        if self.t_edge.is_joined(e1) {
            self.split(e1, pt);
        }

        if self.t_edge.is_joined(e2) {
            self.split(e2, pt);
        }

        let same_type = self.t_edge.is_same_path_type(e1, e2);
        let even_odd = self.fill_rule == FillRule::EvenOdd;
        let wind_dx1 = self.t_edge[e1].wind_dx;
        let wind_dx2 = self.t_edge[e2].wind_dx;

        if same_type {
            if even_odd {
                let wind_cnt1 = self.t_edge[e1].wind_cnt;
                self.t_edge[e1].wind_cnt = self.t_edge[e2].wind_cnt;
                self.t_edge[e2].wind_cnt = wind_cnt1;
            } else {
                let active1 = &mut self.t_edge[e1];
                active1.wind_cnt = if active1.wind_cnt + wind_dx2 == 0 {
                    -active1.wind_cnt
                } else {
                    active1.wind_cnt + wind_dx2
                };

                let active2 = &mut self.t_edge[e2];
                active2.wind_cnt = if active2.wind_cnt - wind_dx1 == 0 {
                    -active2.wind_cnt
                } else {
                    active2.wind_cnt - wind_dx1
                };
            }
        } else if even_odd {
            for edge in [e1, e2] {
                let active = &mut self.t_edge[edge];
                active.wind_cnt2 = if active.wind_cnt2 == 0 { 1 } else { 0 };
            }
        } else {
            self.t_edge[e1].wind_cnt2 += wind_dx2;
            self.t_edge[e2].wind_cnt2 -= wind_dx1;
        }

        let wind_cnt1 = self.rule_count(self.t_edge[e1].wind_cnt);
        let wind_cnt2 = self.rule_count(self.t_edge[e2].wind_cnt);
        let e1_in_01 = wind_cnt1 == 0 || wind_cnt1 == 1;
        let e2_in_01 = wind_cnt2 == 0 || wind_cnt2 == 1;
        let e1_hot = self.t_edge.is_hot(e1);
        let e2_hot = self.t_edge.is_hot(e2);

        if (!e1_hot && !e1_in_01) || (!e2_hot && !e2_in_01) {
            return pt;
        }

        if e1_hot && e2_hot {
            let or1 = self.t_edge[e1].outrec;

            if !e1_in_01 || !e2_in_01 || (!same_type && self.clip_type != ClipType::Xor) {
                self.add_local_max_poly(e1, e2, pt);
            } else if self.out_rec.is_front(or1, e1) || or1 == self.t_edge[e2].outrec {
                // touching at a vertex only: close here and restart
                self.add_local_max_poly(e1, e2, pt);
                self.add_local_min_poly(e1, e2, pt, false);
            } else {
                self.add_out_pt(e1, pt);
                self.add_out_pt(e2, pt);
                self.swap_outrecs(e1, e2);
            }
        } else if e1_hot {
            self.add_out_pt(e1, pt);
            self.swap_outrecs(e1, e2);
        } else if e2_hot {
            self.add_out_pt(e2, pt);
            self.swap_outrecs(e1, e2);
        } else {
            let other_cnt1 = self.rule_count(self.t_edge[e1].wind_cnt2);
            let other_cnt2 = self.rule_count(self.t_edge[e2].wind_cnt2);

            if !same_type {
                self.add_local_min_poly(e1, e2, pt, false);
            } else if wind_cnt1 == 1 && wind_cnt2 == 1 {
                let starts = match self.clip_type {
                    ClipType::Union => other_cnt1 <= 0 && other_cnt2 <= 0,
                    ClipType::Difference => match self.t_edge[e1].path_type {
                        PathType::Clip => other_cnt1 > 0 && other_cnt2 > 0,
                        PathType::Subject => other_cnt1 <= 0 && other_cnt2 <= 0,
                    },
                    ClipType::Xor => true,
                    ClipType::Intersection => other_cnt1 > 0 && other_cnt2 > 0,
                };

                if starts {
                    self.add_local_min_poly(e1, e2, pt, false);
                }
            }
        }

        pt
    }

    fn do_intersections(&mut self, top_y: i64) -> Result<()> {
        if !self.build_intersect_list(top_y) {
            return Ok(());
        }

        let result = self.process_intersect_list(top_y);
        self.intersections.clean();

        result
    }

    /// Bubble sorts the SEL by x at `top_y`; every swap is a crossing.
    fn build_intersect_list(&mut self, top_y: i64) -> bool {
        let active = self.t_edge.active;

        if active == UNASSIGNED || self.t_edge[active].next_in_ael == UNASSIGNED {
            return false;
        }

        self.t_edge.adjust_curr_x_and_copy_to_sel(top_y);

        loop {
            let mut is_modified = false;
            let mut edge = self.t_edge.sorted;

            loop {
                let next = self.t_edge[edge].next_in_sel;

                if next == UNASSIGNED {
                    break;
                }

                if self.t_edge[edge].curr_x > self.t_edge[next].curr_x {
                    self.add_new_intersect_node(edge, next, top_y);
                    self.t_edge.swap_positions_in_sel(edge, next);
                    is_modified = true;
                } else {
                    edge = next;
                }
            }

            let prev = self.t_edge[edge].prev_in_sel;

            if !is_modified || prev == UNASSIGNED {
                break;
            }

            self.t_edge[prev].next_in_sel = UNASSIGNED;
        }

        self.t_edge.sorted = UNASSIGNED;

        !self.intersections.is_empty()
    }

    fn add_new_intersect_node(&mut self, e1: usize, e2: usize, top_y: i64) {
        let active1 = &self.t_edge[e1];
        let active2 = &self.t_edge[e2];
        let mut ip = get_segment_intersect_pt(&active1.bot, &active1.top, &active2.bot, &active2.top)
            .unwrap_or_else(|| Point64::new(active1.curr_x, top_y));

        if ip.y > self.bot_y || ip.y < top_y {
            let abs_dx1 = active1.dx.abs();
            let abs_dx2 = active2.dx.abs();

            ip = if abs_dx1 > STEEP_DX && abs_dx2 > STEEP_DX {
                if abs_dx1 > abs_dx2 {
                    get_closest_point_on_segment(&ip, &active1.bot, &active1.top)
                } else {
                    get_closest_point_on_segment(&ip, &active2.bot, &active2.top)
                }
            } else if abs_dx1 > STEEP_DX {
                get_closest_point_on_segment(&ip, &active1.bot, &active1.top)
            } else if abs_dx2 > STEEP_DX {
                get_closest_point_on_segment(&ip, &active2.bot, &active2.top)
            } else {
                let y = if ip.y < top_y { top_y } else { self.bot_y };
                let x = if abs_dx1 < abs_dx2 {
                    self.t_edge.top_x(e1, y)
                } else {
                    self.t_edge.top_x(e2, y)
                };

                Point64::new(x, y)
            };
        }

        self.intersections.add(e1, e2, ip);
    }

    fn nodes_adjacent(&self, index: usize) -> bool {
        let node = &self.intersections[index];

        self.t_edge.edges_adjacent_in_ael(node.edge1, node.edge2)
    }

    fn process_intersect_list(&mut self, top_y: i64) -> Result<()> {
        self.intersections.sort();

        let count = self.intersections.len();

        for i in 0..count {
            if !self.nodes_adjacent(i) {
                let mut j = i + 1;

                while j < count && !self.nodes_adjacent(j) {
                    j += 1;
                }

                if j == count {
                    return Err(GeometryError::Unresolved {
                        operation: self.operation,
                        y: top_y,
                    });
                }

                self.intersections.swap(i, j);
            }

            let node = self.intersections[i].clone();
            let pt = self.intersect_edges(node.edge1, node.edge2, node.pt);

            self.t_edge.swap_positions_in_ael(node.edge1, node.edge2);
            self.t_edge[node.edge1].curr_x = pt.x;
            self.t_edge[node.edge2].curr_x = pt.x;
            self.check_join_left(node.edge2, pt, true);
            self.check_join_right(node.edge1, pt, true);
        }

        Ok(())
    }

    // Top of scanbeam

    fn do_top_of_scanbeam(&mut self, y: i64) {
        self.t_edge.sorted = UNASSIGNED;

        let mut edge = self.t_edge.active;

        while edge != UNASSIGNED {
            if self.t_edge[edge].top.y == y {
                self.t_edge[edge].curr_x = self.t_edge[edge].top.x;

                if self.t_edge.is_maxima(edge, &self.local_minima) {
                    edge = self.do_maxima(edge);
                    continue;
                }

                if self.t_edge.is_hot(edge) {
                    let top = self.t_edge[edge].top;
                    self.add_out_pt(edge, top);
                }

                self.update_edge_into_ael(edge);

                if self.t_edge.is_horizontal(edge) {
                    self.t_edge.push_horz(edge);
                }
            } else {
                self.t_edge[edge].curr_x = self.t_edge.top_x(edge, y);
            }

            edge = self.t_edge[edge].next_in_ael;
        }
    }

    /// Closes a bound pair at its shared top vertex. Returns the edge to
    /// continue the AEL walk from.
    fn do_maxima(&mut self, edge: usize) -> usize {
        let prev_edge = self.t_edge[edge].prev_in_ael;
        let mut next_edge = self.t_edge[edge].next_in_ael;
        let max_pair = self.t_edge.get_maxima_pair(edge);

        if max_pair == UNASSIGNED {
            // the pair is a horizontal still to be processed
            return next_edge;
        }

        if self.t_edge.is_joined(edge) {
            let top = self.t_edge[edge].top;
            self.split(edge, top);
        }

        if self.t_edge.is_joined(max_pair) {
            let top = self.t_edge[max_pair].top;
            self.split(max_pair, top);
        }

        while next_edge != max_pair && next_edge != UNASSIGNED {
            let top = self.t_edge[edge].top;

            self.intersect_edges(edge, next_edge, top);
            self.t_edge.swap_positions_in_ael(edge, next_edge);
            next_edge = self.t_edge[edge].next_in_ael;
        }

        if self.t_edge.is_hot(edge) {
            let top = self.t_edge[edge].top;
            self.add_local_max_poly(edge, max_pair, top);
        }

        self.t_edge.delete_from_ael(edge);
        self.t_edge.delete_from_ael(max_pair);

        if prev_edge != UNASSIGNED {
            self.t_edge[prev_edge].next_in_ael
        } else {
            self.t_edge.active
        }
    }

    // Horizontals

    fn get_curr_y_maxima_vertex(&self, edge: usize) -> usize {
        let forward = self.t_edge[edge].wind_dx > 0;
        let mut result = self.t_edge[edge].vertex_top;

        loop {
            let next = if forward {
                self.local_minima.next(result)
            } else {
                self.local_minima.prev(result)
            };

            if self.local_minima.point(next).y != self.local_minima.point(result).y
                || self.local_minima.vertex(result).is_local_max()
            {
                break;
            }

            result = next;
        }

        if self.local_minima.vertex(result).is_local_max() {
            result
        } else {
            UNASSIGNED
        }
    }

    /// Direction and x extent of a horizontal, as `(left_to_right, left, right)`.
    fn reset_horz_direction(&self, horz: usize, vertex_max: usize) -> (bool, i64, i64) {
        let active = &self.t_edge[horz];

        if active.bot.x == active.top.x {
            let mut edge = active.next_in_ael;

            while edge != UNASSIGNED && self.t_edge[edge].vertex_top != vertex_max {
                edge = self.t_edge[edge].next_in_ael;
            }

            (edge != UNASSIGNED, active.curr_x, active.curr_x)
        } else if active.curr_x < active.top.x {
            (true, active.curr_x, active.top.x)
        } else {
            (false, active.top.x, active.curr_x)
        }
    }

    fn do_horizontal(&mut self, horz: usize) {
        let y = self.t_edge[horz].bot.y;
        let vertex_max = self.get_curr_y_maxima_vertex(horz);

        if vertex_max != UNASSIGNED && vertex_max != self.t_edge[horz].vertex_top {
            self.trim_horz(horz);
        }

        let (mut is_left_to_right, mut horz_left, mut horz_right) = self.reset_horz_direction(horz, vertex_max);

        if self.t_edge.is_hot(horz) {
            let pt = self.edge_point(horz, Point64::new(self.t_edge[horz].curr_x, y));
            let op = self.add_out_pt(horz, pt);
            self.joiner.add_trial(op);
        }

        loop {
            let mut edge = if is_left_to_right {
                self.t_edge[horz].next_in_ael
            } else {
                self.t_edge[horz].prev_in_ael
            };

            while edge != UNASSIGNED {
                if self.t_edge[edge].vertex_top == vertex_max {
                    if self.t_edge.is_hot(horz) && self.t_edge.is_joined(edge) {
                        let top = self.t_edge[edge].top;
                        self.split(edge, top);
                    }

                    if self.t_edge.is_hot(horz) {
                        while self.t_edge[horz].vertex_top != vertex_max {
                            let top = self.t_edge[horz].top;
                            self.add_out_pt(horz, top);
                            self.update_edge_into_ael(horz);
                        }

                        let top = self.t_edge[horz].top;

                        if is_left_to_right {
                            self.add_local_max_poly(horz, edge, top);
                        } else {
                            self.add_local_max_poly(edge, horz, top);
                        }
                    }

                    self.t_edge.delete_from_ael(edge);
                    self.t_edge.delete_from_ael(horz);
                    return;
                }

                if vertex_max != self.t_edge[horz].vertex_top {
                    let curr_x = self.t_edge[edge].curr_x;

                    if (is_left_to_right && curr_x > horz_right) || (!is_left_to_right && curr_x < horz_left) {
                        break;
                    }

                    if curr_x == self.t_edge[horz].top.x && !self.t_edge.is_horizontal(edge) {
                        let next = *self
                            .local_minima
                            .point(self.t_edge.next_vertex(horz, &self.local_minima));
                        let top_x = self.t_edge.top_x(edge, next.y);

                        if (is_left_to_right && top_x >= next.x) || (!is_left_to_right && top_x <= next.x) {
                            break;
                        }
                    }
                }

                let pt = Point64::new(self.t_edge[edge].curr_x, y);

                if is_left_to_right {
                    let pt = self.intersect_edges(horz, edge, pt);

                    self.t_edge.swap_positions_in_ael(horz, edge);
                    self.check_join_left(edge, pt, false);
                    self.t_edge[horz].curr_x = self.t_edge[edge].curr_x;
                    edge = self.t_edge[horz].next_in_ael;
                } else {
                    let pt = self.intersect_edges(edge, horz, pt);

                    self.t_edge.swap_positions_in_ael(edge, horz);
                    self.check_join_right(edge, pt, false);
                    self.t_edge[horz].curr_x = self.t_edge[edge].curr_x;
                    edge = self.t_edge[horz].prev_in_ael;
                }

                if self.t_edge.is_hot(horz) {
                    let op = self.get_last_op(horz);
                    self.joiner.add_trial(op);
                }
            }

            let next = *self
                .local_minima
                .point(self.t_edge.next_vertex(horz, &self.local_minima));

            if next.y != self.t_edge[horz].top.y {
                break;
            }

            // consecutive horizontal
            if self.t_edge.is_hot(horz) {
                let top = self.t_edge[horz].top;
                self.add_out_pt(horz, top);
            }

            self.update_edge_into_ael(horz);
            (is_left_to_right, horz_left, horz_right) = self.reset_horz_direction(horz, vertex_max);
        }

        if self.t_edge.is_hot(horz) {
            let top = self.t_edge[horz].top;
            let op = self.add_out_pt(horz, top);
            self.joiner.add_trial(op);
        }

        self.update_edge_into_ael(horz);
    }

    // Result

    fn build_paths(&mut self) -> PathSet {
        let mut result = Vec::with_capacity(self.out_rec.len());
        let mut index = 0;

        // splitting self intersections appends records while iterating
        while index < self.out_rec.len() {
            if self.out_rec[index].pts != UNASSIGNED {
                self.clean_collinear(index);

                if let Some(path) = self.out_pt.build_path(self.out_rec[index].pts, self.reverse_solution) {
                    result.push(path);
                }
            }

            index += 1;
        }

        result
    }

    fn clean_collinear(&mut self, outrec: usize) {
        let outrec = self.out_rec.get_real(outrec);

        if outrec == UNASSIGNED {
            return;
        }

        if !self.out_pt.is_valid_closed(self.out_rec[outrec].pts) {
            self.out_rec[outrec].pts = UNASSIGNED;
            return;
        }

        let mut start = self.out_rec[outrec].pts;
        let mut op = start;

        loop {
            let prev = self.out_pt[op].prev;
            let next = self.out_pt[op].next;
            let p_prev = self.out_pt[prev].pt;
            let pt = self.out_pt[op].pt;
            let p_next = self.out_pt[next].pt;

            // with preserve_collinear only spikes and duplicates go
            if cross_product(&p_prev, &pt, &p_next) == 0
                && (pt == p_prev || pt == p_next || !self.preserve_collinear || dot_product(&p_prev, &pt, &p_next) < 0)
            {
                if op == self.out_rec[outrec].pts {
                    self.out_rec[outrec].pts = prev;
                }

                op = self.out_pt.dispose(op);

                if !self.out_pt.is_valid_closed(op) {
                    self.out_rec[outrec].pts = UNASSIGNED;
                    return;
                }

                start = op;
                continue;
            }

            op = next;

            if op == start {
                break;
            }
        }

        self.fix_self_intersects(outrec);
    }

    fn is_triangle(&self, op: usize) -> bool {
        self.out_pt[op].prev == self.out_pt[self.out_pt[op].next].next
    }

    fn fix_self_intersects(&mut self, outrec: usize) {
        let mut op = self.out_rec[outrec].pts;

        if self.is_triangle(op) {
            return;
        }

        loop {
            let prev = self.out_pt[op].prev;
            let next = self.out_pt[op].next;
            let next_next = self.out_pt[next].next;

            if segments_intersect(
                &self.out_pt[prev].pt,
                &self.out_pt[op].pt,
                &self.out_pt[next].pt,
                &self.out_pt[next_next].pt,
            ) {
                let pts = self.out_rec[outrec].pts;

                if op == pts || next == pts {
                    self.out_rec[outrec].pts = self.out_pt[pts].prev;
                }

                self.do_split_op(outrec, op);

                op = self.out_rec[outrec].pts;

                if op == UNASSIGNED || self.is_triangle(op) {
                    break;
                }

                continue;
            }

            op = next;

            if op == self.out_rec[outrec].pts {
                break;
            }
        }
    }

    /// Splits the ring where `prev -> split_op` crosses `split_op.next -> next.next`.
    ///
    /// Both crossing edges belong to the output ring, so there is no path type
    /// to rank. The crossing inherits the tags of a coinciding corner, else it
    /// is synthetic with the loop of `prev`, the first corner in ring order.
    fn do_split_op(&mut self, outrec: usize, split_op: usize) {
        let prev_op = self.out_pt[split_op].prev;
        let next_op = self.out_pt[split_op].next;
        let next_next_op = self.out_pt[next_op].next;
        let corners = [
            self.out_pt[prev_op].pt,
            self.out_pt[split_op].pt,
            self.out_pt[next_op].pt,
            self.out_pt[next_next_op].pt,
        ];

        self.out_rec[outrec].pts = prev_op;

        let position = get_segment_intersect_pt(&corners[0], &corners[1], &corners[2], &corners[3])
            .unwrap_or(corners[1]);
        let ip = corners
            .iter()
            .find(|corner| **corner == position)
            .map(|corner| position.retag(corner))
            .unwrap_or_else(|| Point64::synthetic(position.x, position.y, corners[0].loop_id));

        let area1 = self.out_pt.area(prev_op);
        let abs_area1 = area1.abs();

        if abs_area1 < 2.0 {
            self.out_rec[outrec].pts = UNASSIGNED;
            return;
        }

        let area2 = area_triangle(&ip, &corners[1], &corners[2]);
        let abs_area2 = area2.abs();

        if ip == corners[0] || ip == corners[3] {
            self.out_pt[next_next_op].prev = prev_op;
            self.out_pt[prev_op].next = next_next_op;
        } else {
            let owner = self.out_pt[prev_op].outrec;
            self.out_pt.insert_between(ip, owner, prev_op, next_next_op);
        }

        // the cut off triangle survives when it is large enough and either
        // bigger than the rest or wound the same way
        if abs_area2 >= 1.0 && (abs_area2 > abs_area1 || (area2 > 0.0) == (area1 > 0.0)) {
            let split = self.out_rec.create();
            self.out_rec[split].owner = self.out_rec[outrec].owner;
            self.out_pt[split_op].outrec = split;
            self.out_pt[next_op].outrec = split;

            let new_op = self.out_pt.create(ip, split);
            self.out_pt[new_op].prev = next_op;
            self.out_pt[new_op].next = split_op;
            self.out_rec[split].pts = new_op;
            self.out_pt[split_op].prev = new_op;
            self.out_pt[next_op].next = new_op;
        }
    }
}
