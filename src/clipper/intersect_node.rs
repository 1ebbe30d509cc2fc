use std::cmp::Ordering;
use std::ops::Index;

use crate::geometry::point::Point64;

/// Crossing of two active edges inside the current scanbeam. `edge1` is the
/// edge that was to the left at the bottom of the beam.
#[derive(Debug, Clone)]
pub struct IntersectNode {
    pub edge1: usize,
    pub edge2: usize,
    pub pt: Point64,
}

impl IntersectNode {
    /// Bottom-up, then left to right.
    pub fn sort(a: &IntersectNode, b: &IntersectNode) -> Ordering {
        b.pt.y.cmp(&a.pt.y).then(a.pt.x.cmp(&b.pt.x))
    }
}

#[derive(Debug, Default)]
pub struct IntersectList {
    nodes: Vec<IntersectNode>,
}

impl Index<usize> for IntersectList {
    type Output = IntersectNode;

    #[inline(always)]
    fn index(&self, index: usize) -> &IntersectNode {
        &self.nodes[index]
    }
}

impl IntersectList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, edge1: usize, edge2: usize, pt: Point64) {
        self.nodes.push(IntersectNode { edge1, edge2, pt });
    }

    /// Stable, so equal points keep the order they were found in.
    pub fn sort(&mut self) {
        self.nodes.sort_by(IntersectNode::sort);
    }

    pub fn swap(&mut self, index1: usize, index2: usize) {
        self.nodes.swap(index1, index2);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clean(&mut self) {
        self.nodes.clear();
    }
}
