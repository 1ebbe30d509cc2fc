use crate::clipper::constants::UNASSIGNED;
use crate::clipper::enums::PointInPolygonResult;
use crate::geometry::bound_rect::Rect64;
use crate::geometry::path::{area, bounds, point_in_polygon, Path, PathSet};

#[derive(Debug, Clone)]
pub struct PolyNode {
    pub path: Path,
    pub parent: usize,
    pub children: Vec<usize>,
    pub is_hole: bool,
}

impl PolyNode {
    pub fn depth(&self, tree: &PolyTree) -> usize {
        let mut result = 0;
        let mut parent = self.parent;

        while parent != UNASSIGNED {
            result += 1;
            parent = tree.nodes[parent].parent;
        }

        result
    }
}

/// Outer/hole nesting of a result, stored flat. `parent` is [`UNASSIGNED`] for top level contours.
#[derive(Debug, Clone, Default)]
pub struct PolyTree {
    nodes: Vec<PolyNode>,
    roots: Vec<usize>,
}

impl PolyTree {
    pub fn from_paths(paths: PathSet) -> Self {
        let areas: Vec<f64> = paths.iter().map(|path| area(path).abs()).collect();
        let boxes: Vec<Rect64> = paths.iter().map(|path| bounds(std::slice::from_ref(path))).collect();
        let mut order: Vec<usize> = (0..paths.len()).collect();

        order.sort_by(|a, b| areas[*b].total_cmp(&areas[*a]).then(a.cmp(b)));

        let mut nodes: Vec<PolyNode> = paths
            .into_iter()
            .map(|path| PolyNode {
                path,
                parent: UNASSIGNED,
                children: Vec::new(),
                is_hole: false,
            })
            .collect();
        let mut roots = Vec::new();

        for (rank, &index) in order.iter().enumerate() {
            let parent = order[..rank]
                .iter()
                .rev()
                .copied()
                .find(|&candidate| {
                    boxes[candidate].contains_rect(&boxes[index])
                        && PolyTree::encloses(&nodes[candidate].path, &nodes[index].path)
                });

            match parent {
                Some(parent) => {
                    nodes[index].parent = parent;
                    nodes[index].is_hole = !nodes[parent].is_hole;
                    nodes[parent].children.push(index);
                }
                None => roots.push(index),
            }
        }

        roots.sort_unstable();
        for node in nodes.iter_mut() {
            node.children.sort_unstable();
        }

        Self { nodes, roots }
    }

    fn encloses(outer: &Path, inner: &Path) -> bool {
        for point in inner {
            match point_in_polygon(point, outer) {
                PointInPolygonResult::Inside => return true,
                PointInPolygonResult::Outside => return false,
                PointInPolygonResult::On => {}
            }
        }

        false
    }

    pub fn nodes(&self) -> &[PolyNode] {
        &self.nodes
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PolyNode> {
        self.nodes.get(index)
    }

    pub fn into_paths(self) -> PathSet {
        self.nodes.into_iter().map(|node| node.path).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point::Point64;

    fn square(left: i64, top: i64, size: i64) -> Path {
        vec![
            Point64::new(left, top),
            Point64::new(left + size, top),
            Point64::new(left + size, top + size),
            Point64::new(left, top + size),
        ]
    }

    #[test]
    fn test_nesting() {
        let tree = PolyTree::from_paths(vec![
            square(20, 20, 10),
            square(0, 0, 100),
            square(10, 10, 50),
            square(200, 0, 10),
        ]);

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.roots(), &[1, 3]);
        assert_eq!(tree.nodes()[2].parent, 1);
        assert!(tree.nodes()[2].is_hole);
        assert_eq!(tree.nodes()[0].parent, 2);
        assert!(!tree.nodes()[0].is_hole);
        assert_eq!(tree.nodes()[0].depth(&tree), 2);
        assert_eq!(tree.nodes()[1].children, vec![2]);
    }

    #[test]
    fn test_touching_contours_are_siblings() {
        let tree = PolyTree::from_paths(vec![square(0, 0, 10), square(10, 0, 10)]);

        assert_eq!(tree.roots(), &[0, 1]);
        assert!(tree.nodes().iter().all(|node| node.parent == UNASSIGNED));
    }
}
