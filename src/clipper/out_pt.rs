use std::ops::{Index, IndexMut};

use crate::clipper::constants::UNASSIGNED;
use crate::geometry::path::Path;
use crate::geometry::point::Point64;

/// Node of a circular output ring. `horz` marks the left end of a pending
/// horizontal segment.
#[derive(Debug, Clone)]
pub struct OutPt {
    pub pt: Point64,
    pub next: usize,
    pub prev: usize,
    pub outrec: usize,
    pub horz: bool,
}

#[derive(Debug, Default)]
pub struct OutPtList {
    points: Vec<OutPt>,
}

impl Index<usize> for OutPtList {
    type Output = OutPt;

    #[inline(always)]
    fn index(&self, index: usize) -> &OutPt {
        &self.points[index]
    }
}

impl IndexMut<usize> for OutPtList {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut OutPt {
        &mut self.points[index]
    }
}

#[inline(always)]
fn pts_really_close(a: &Point64, b: &Point64) -> bool {
    (a.x - b.x).abs() < 2 && (a.y - b.y).abs() < 2
}

impl OutPtList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single point ring.
    pub fn create(&mut self, pt: Point64, outrec: usize) -> usize {
        let index = self.points.len();

        self.points.push(OutPt {
            pt,
            next: index,
            prev: index,
            outrec,
            horz: false,
        });

        index
    }

    /// Unlinks `index` from its ring and returns the following point.
    pub fn dispose(&mut self, index: usize) -> usize {
        let next = self.points[index].next;
        let prev = self.points[index].prev;

        self.points[prev].next = next;
        self.points[next].prev = prev;

        next
    }

    pub fn duplicate(&mut self, index: usize, insert_after: bool) -> usize {
        let result = self.create(self.points[index].pt, self.points[index].outrec);

        if insert_after {
            let next = self.points[index].next;
            self.points[result].next = next;
            self.points[next].prev = result;
            self.points[result].prev = index;
            self.points[index].next = result;
        } else {
            let prev = self.points[index].prev;
            self.points[result].prev = prev;
            self.points[prev].next = result;
            self.points[result].next = index;
            self.points[index].prev = result;
        }

        result
    }

    /// Inserts a new point carrying `pt` between `prev` and `next`.
    pub fn insert_between(&mut self, pt: Point64, outrec: usize, prev: usize, next: usize) -> usize {
        let result = self.create(pt, outrec);

        self.points[result].prev = prev;
        self.points[result].next = next;
        self.points[prev].next = result;
        self.points[next].prev = result;

        result
    }

    pub fn area(&self, index: usize) -> f64 {
        let mut result = 0.0;
        let mut curr = index;

        loop {
            let prev = &self.points[self.points[curr].prev].pt;
            let pt = &self.points[curr].pt;

            result += (prev.y + pt.y) as f64 * (prev.x - pt.x) as f64;
            curr = self.points[curr].next;

            if curr == index {
                break;
            }
        }

        result * 0.5
    }

    pub fn is_very_small_triangle(&self, index: usize) -> bool {
        let op = &self.points[index];
        let next = &self.points[op.next];
        let prev = &self.points[op.prev];

        next.next == op.prev
            && (pts_really_close(&prev.pt, &next.pt)
                || pts_really_close(&op.pt, &next.pt)
                || pts_really_close(&op.pt, &prev.pt))
    }

    pub fn is_valid_closed(&self, index: usize) -> bool {
        if index == UNASSIGNED {
            return false;
        }

        let op = &self.points[index];

        op.next != index && op.next != op.prev && !self.is_very_small_triangle(index)
    }

    /// Walks the ring into a path, dropping repeated positions. The first
    /// copy of a repeated position keeps its provenance.
    pub fn build_path(&self, index: usize, reverse: bool) -> Option<Path> {
        if index == UNASSIGNED {
            return None;
        }

        let op = &self.points[index];

        if op.next == index || op.next == op.prev {
            return None;
        }

        let (start, mut curr) = if reverse {
            (index, op.prev)
        } else {
            (op.next, self.points[op.next].next)
        };
        let mut last = self.points[start].pt;
        let mut result: Path = vec![last];

        while curr != start {
            let pt = self.points[curr].pt;

            if pt != last {
                last = pt;
                result.push(pt);
            }

            curr = if reverse {
                self.points[curr].prev
            } else {
                self.points[curr].next
            };
        }

        if result.len() > 1 && result.first() == result.last() {
            result.pop();
        }

        if result.len() < 3 || (result.len() == 3 && self.is_very_small_triangle(curr)) {
            return None;
        }

        Some(result)
    }
}
