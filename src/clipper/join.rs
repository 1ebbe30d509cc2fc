use crate::clipper::constants::UNASSIGNED;
use crate::clipper::out_pt::OutPtList;
use crate::clipper::out_rec::OutRec;

/// Horizontal run of output points found while processing a horizontal edge.
#[derive(Debug, Clone)]
pub struct HorzSegment {
    pub left_op: usize,
    pub right_op: usize,
    pub left_to_right: bool,
}

/// Pair of duplicated output points whose rings get relinked once the sweep
/// has finished.
#[derive(Debug, Clone)]
pub struct HorzJoin {
    pub op1: usize,
    pub op2: usize,
}

#[derive(Debug, Default)]
pub struct Joiner {
    segments: Vec<HorzSegment>,
    joins: Vec<HorzJoin>,
}

fn set_heading_forward(segment: &mut HorzSegment, op_p: usize, op_n: usize, out_pts: &OutPtList) -> bool {
    let x_p = out_pts[op_p].pt.x;
    let x_n = out_pts[op_n].pt.x;

    if x_p == x_n {
        return false;
    }

    if x_p < x_n {
        segment.left_op = op_p;
        segment.right_op = op_n;
        segment.left_to_right = true;
    } else {
        segment.left_op = op_n;
        segment.right_op = op_p;
        segment.left_to_right = false;
    }

    true
}

fn update_segment(segment: &mut HorzSegment, out_pts: &mut OutPtList, out_recs: &OutRec) -> bool {
    let op = segment.left_op;
    let outrec = out_recs.get_real(out_pts[op].outrec);

    if outrec == UNASSIGNED {
        segment.right_op = UNASSIGNED;
        return false;
    }

    let curr_y = out_pts[op].pt.y;
    let mut op_p = op;
    let mut op_n = op;

    if out_recs[outrec].front_edge != UNASSIGNED {
        let op_a = out_recs[outrec].pts;
        let op_z = out_pts[op_a].next;

        while op_p != op_z && out_pts[out_pts[op_p].prev].pt.y == curr_y {
            op_p = out_pts[op_p].prev;
        }
        while op_n != op_a && out_pts[out_pts[op_n].next].pt.y == curr_y {
            op_n = out_pts[op_n].next;
        }
    } else {
        while out_pts[op_p].prev != op_n && out_pts[out_pts[op_p].prev].pt.y == curr_y {
            op_p = out_pts[op_p].prev;
        }
        while out_pts[op_n].next != op_p && out_pts[out_pts[op_n].next].pt.y == curr_y {
            op_n = out_pts[op_n].next;
        }
    }

    let result = set_heading_forward(segment, op_p, op_n, out_pts) && !out_pts[segment.left_op].horz;

    if result {
        out_pts[segment.left_op].horz = true;
    } else {
        segment.right_op = UNASSIGNED;
    }

    result
}

impl Joiner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_trial(&mut self, op: usize) {
        self.segments.push(HorzSegment {
            left_op: op,
            right_op: UNASSIGNED,
            left_to_right: true,
        });
    }

    pub fn has_segments(&self) -> bool {
        !self.segments.is_empty()
    }

    /// Pairs overlapping horizontal segments heading in opposite directions
    /// and records a join for each pair. Clears the segment list.
    pub fn convert_segments(&mut self, out_pts: &mut OutPtList, out_recs: &OutRec) {
        let mut segments = std::mem::take(&mut self.segments);
        let valid = segments
            .iter_mut()
            .map(|segment| update_segment(segment, out_pts, out_recs))
            .filter(|&valid| valid)
            .count();

        if valid < 2 {
            return;
        }

        segments.sort_by(|a, b| match (a.right_op != UNASSIGNED, b.right_op != UNASSIGNED) {
            (true, true) => out_pts[a.left_op].pt.x.cmp(&out_pts[b.left_op].pt.x),
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            (false, false) => std::cmp::Ordering::Equal,
        });

        for i in 0..valid - 1 {
            for j in i + 1..valid {
                let (hs1, hs2) = (&segments[i], &segments[j]);

                if out_pts[hs2.left_op].pt.x >= out_pts[hs1.right_op].pt.x
                    || hs2.left_to_right == hs1.left_to_right
                    || out_pts[hs2.right_op].pt.x <= out_pts[hs1.left_op].pt.x
                {
                    continue;
                }

                let curr_y = out_pts[hs1.left_op].pt.y;
                let left_to_right = hs1.left_to_right;
                let mut left1 = hs1.left_op;
                let mut left2 = hs2.left_op;

                if left_to_right {
                    loop {
                        let next = out_pts[left1].next;
                        if out_pts[next].pt.y != curr_y || out_pts[next].pt.x > out_pts[left2].pt.x {
                            break;
                        }
                        left1 = next;
                    }
                    loop {
                        let prev = out_pts[left2].prev;
                        if out_pts[prev].pt.y != curr_y || out_pts[prev].pt.x > out_pts[left1].pt.x {
                            break;
                        }
                        left2 = prev;
                    }

                    let op1 = out_pts.duplicate(left1, true);
                    let op2 = out_pts.duplicate(left2, false);
                    self.joins.push(HorzJoin { op1, op2 });
                } else {
                    loop {
                        let prev = out_pts[left1].prev;
                        if out_pts[prev].pt.y != curr_y || out_pts[prev].pt.x > out_pts[left2].pt.x {
                            break;
                        }
                        left1 = prev;
                    }
                    loop {
                        let next = out_pts[left2].next;
                        if out_pts[next].pt.y != curr_y || out_pts[next].pt.x > out_pts[left1].pt.x {
                            break;
                        }
                        left2 = next;
                    }

                    let op1 = out_pts.duplicate(left2, true);
                    let op2 = out_pts.duplicate(left1, false);
                    self.joins.push(HorzJoin { op1, op2 });
                }

                segments[i].left_op = left1;
                segments[j].left_op = left2;
            }
        }
    }

    /// Relinks every recorded join. A join inside one ring splits it and the
    /// detached part becomes a new record.
    pub fn process(&mut self, out_pts: &mut OutPtList, out_recs: &mut OutRec) {
        for join in std::mem::take(&mut self.joins) {
            let or1 = out_recs.get_real(out_pts[join.op1].outrec);
            let or2 = out_recs.get_real(out_pts[join.op2].outrec);

            if or1 == UNASSIGNED || or2 == UNASSIGNED {
                continue;
            }

            let op1b = out_pts[join.op1].next;
            let op2b = out_pts[join.op2].prev;

            out_pts[join.op1].next = join.op2;
            out_pts[join.op2].prev = join.op1;
            out_pts[op1b].prev = op2b;
            out_pts[op2b].next = op1b;

            if or1 == or2 {
                let split = out_recs.create();
                out_recs[split].pts = op1b;
                fix_outrec_pts(split, out_pts, out_recs);

                let pts = out_recs[or1].pts;
                if out_pts[pts].outrec == split {
                    out_recs[or1].pts = join.op1;
                    out_pts[join.op1].outrec = or1;
                }
            } else {
                out_recs[or2].pts = UNASSIGNED;
                out_recs[or2].owner = or1;
            }
        }
    }
}

/// Points every ring member back at `outrec`.
pub fn fix_outrec_pts(outrec: usize, out_pts: &mut OutPtList, out_recs: &OutRec) {
    let start = out_recs[outrec].pts;
    let mut op = start;

    loop {
        out_pts[op].outrec = outrec;
        op = out_pts[op].next;

        if op == start {
            break;
        }
    }
}
