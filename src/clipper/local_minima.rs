use crate::clipper::constants::{VERTEX_EMPTY, VERTEX_LOCAL_MAX, VERTEX_LOCAL_MIN};
use crate::clipper::enums::PathType;
use crate::geometry::point::Point64;

#[derive(Debug, Clone)]
pub struct Vertex {
    pub pt: Point64,
    pub next: usize,
    pub prev: usize,
    pub flags: u8,
}

impl Vertex {
    #[inline(always)]
    pub fn is_local_max(&self) -> bool {
        self.flags & VERTEX_LOCAL_MAX != 0
    }

    #[inline(always)]
    pub fn is_local_min(&self) -> bool {
        self.flags & VERTEX_LOCAL_MIN != 0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LocalMinimum {
    pub vertex: usize,
    pub path_type: PathType,
}

/// Vertex rings of every input path plus the local minima found on them.
#[derive(Debug, Default)]
pub struct LocalMinima {
    vertices: Vec<Vertex>,
    minima: Vec<LocalMinimum>,
    current: usize,
}

impl LocalMinima {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a closed vertex ring. Returns `false` when the path has no area to contribute.
    pub fn add_path(&mut self, path: &[Point64], path_type: PathType) -> bool {
        let first = self.vertices.len();

        for point in path {
            if let Some(last) = self.vertices[first..].last() {
                if last.pt == *point {
                    continue;
                }
            }

            let index = self.vertices.len();
            self.vertices.push(Vertex {
                pt: *point,
                next: index + 1,
                prev: index.wrapping_sub(1),
                flags: VERTEX_EMPTY,
            });
        }

        while self.vertices.len() - first > 1
            && self.vertices[self.vertices.len() - 1].pt == self.vertices[first].pt
        {
            self.vertices.pop();
        }

        let count = self.vertices.len() - first;

        if count < 3 {
            self.vertices.truncate(first);
            return false;
        }

        let last = self.vertices.len() - 1;
        self.vertices[last].next = first;
        self.vertices[first].prev = last;

        let mut prev = self.vertices[first].prev;
        while prev != first && self.vertices[prev].pt.y == self.vertices[first].pt.y {
            prev = self.vertices[prev].prev;
        }

        if prev == first {
            self.vertices.truncate(first);
            return false;
        }

        let mut going_up = self.vertices[prev].pt.y > self.vertices[first].pt.y;
        let going_up0 = going_up;
        let mut prev = first;
        let mut curr = self.vertices[first].next;

        while curr != first {
            let curr_y = self.vertices[curr].pt.y;
            let prev_y = self.vertices[prev].pt.y;

            if curr_y > prev_y && going_up {
                self.vertices[prev].flags |= VERTEX_LOCAL_MAX;
                going_up = false;
            } else if curr_y < prev_y && !going_up {
                going_up = true;
                self.add_local_min(prev, path_type);
            }

            prev = curr;
            curr = self.vertices[curr].next;
        }

        if going_up != going_up0 {
            if going_up0 {
                self.add_local_min(prev, path_type);
            } else {
                self.vertices[prev].flags |= VERTEX_LOCAL_MAX;
            }
        }

        true
    }

    fn add_local_min(&mut self, vertex: usize, path_type: PathType) {
        if self.vertices[vertex].is_local_min() {
            return;
        }

        self.vertices[vertex].flags |= VERTEX_LOCAL_MIN;
        self.minima.push(LocalMinimum { vertex, path_type });
    }

    /// Orders minima bottom-up (largest y first, then smallest x) and rewinds.
    pub fn reset(&mut self) {
        let vertices = &self.vertices;

        self.minima.sort_by(|a, b| {
            let pa = &vertices[a.vertex].pt;
            let pb = &vertices[b.vertex].pt;

            pb.y.cmp(&pa.y).then(pa.x.cmp(&pb.x))
        });
        self.current = 0;
    }

    pub fn pop(&mut self, y: i64) -> Option<LocalMinimum> {
        let minimum = *self.minima.get(self.current)?;

        if self.vertices[minimum.vertex].pt.y != y {
            return None;
        }

        self.current += 1;
        Some(minimum)
    }

    pub fn minima_y(&self) -> impl Iterator<Item = i64> + '_ {
        self.minima.iter().map(|minimum| self.vertices[minimum.vertex].pt.y)
    }

    #[inline(always)]
    pub fn vertex(&self, index: usize) -> &Vertex {
        &self.vertices[index]
    }

    #[inline(always)]
    pub fn point(&self, index: usize) -> &Point64 {
        &self.vertices[index].pt
    }

    #[inline(always)]
    pub fn next(&self, index: usize) -> usize {
        self.vertices[index].next
    }

    #[inline(always)]
    pub fn prev(&self, index: usize) -> usize {
        self.vertices[index].prev
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(points: &[(i64, i64)]) -> Vec<Point64> {
        points.iter().map(|&(x, y)| Point64::new(x, y)).collect()
    }

    #[test]
    fn test_square_has_one_minimum() {
        let mut local_minima = LocalMinima::new();

        assert!(local_minima.add_path(&path(&[(0, 0), (10, 0), (10, 10), (0, 10)]), PathType::Subject));
        assert_eq!(local_minima.minima.len(), 1);
        assert_eq!(local_minima.vertices.len(), 4);

        local_minima.reset();
        let minimum = local_minima.pop(10).unwrap();
        assert_eq!(local_minima.point(minimum.vertex).y, 10);
        assert!(local_minima.pop(10).is_none());
    }

    #[test]
    fn test_duplicates_and_flat_paths_are_dropped() {
        let mut local_minima = LocalMinima::new();

        assert!(!local_minima.add_path(&path(&[(0, 0), (0, 0), (5, 5), (0, 0)]), PathType::Clip));
        assert!(!local_minima.add_path(&path(&[(0, 0), (5, 0), (9, 0)]), PathType::Clip));
        assert!(local_minima.minima.is_empty());
        assert!(local_minima.vertices.is_empty());
    }

    #[test]
    fn test_minima_are_sorted_bottom_up() {
        let mut local_minima = LocalMinima::new();

        local_minima.add_path(&path(&[(0, 0), (10, 0), (10, 10), (0, 10)]), PathType::Subject);
        local_minima.add_path(&path(&[(50, 0), (60, 0), (60, 30), (50, 30)]), PathType::Clip);
        local_minima.add_path(&path(&[(30, 0), (40, 0), (40, 30), (30, 30)]), PathType::Subject);
        local_minima.reset();

        let ys: Vec<i64> = local_minima.minima_y().collect();
        assert_eq!(ys, vec![30, 30, 10]);

        let first = local_minima.pop(30).unwrap();
        assert_eq!(local_minima.point(first.vertex).x, 30);
        assert_eq!(first.path_type, PathType::Subject);
    }

    #[test]
    fn test_zigzag_has_three_minima() {
        let mut local_minima = LocalMinima::new();

        local_minima.add_path(
            &path(&[(0, 0), (10, 20), (20, 0), (30, 20), (40, 0), (20, 40)]),
            PathType::Subject,
        );

        assert_eq!(local_minima.minima.len(), 3);
        assert!(local_minima.vertex(5).is_local_min());
        assert!(local_minima.vertex(0).is_local_max());
    }
}
