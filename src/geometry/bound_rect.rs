use crate::geometry::point::Point64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect64 {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl Rect64 {
    pub fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Inverted rect that any `include` call replaces.
    pub fn invalid() -> Self {
        Self::new(i64::MAX, i64::MAX, i64::MIN, i64::MIN)
    }

    pub fn include(&mut self, point: &Point64) {
        self.left = self.left.min(point.x);
        self.right = self.right.max(point.x);
        self.top = self.top.min(point.y);
        self.bottom = self.bottom.max(point.y);
    }

    pub fn contains_rect(&self, other: &Rect64) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    /// Corner ring tagged as engine generated for `loop_id`.
    pub fn as_path(&self, loop_id: i32) -> Vec<Point64> {
        vec![
            Point64::synthetic(self.left, self.top, loop_id),
            Point64::synthetic(self.right, self.top, loop_id),
            Point64::synthetic(self.right, self.bottom, loop_id),
            Point64::synthetic(self.left, self.bottom, loop_id),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include() {
        let mut rect = Rect64::invalid();
        rect.include(&Point64::new(10, 40));
        rect.include(&Point64::new(-5, 2));

        assert_eq!(rect, Rect64::new(-5, 2, 10, 40));
    }

    #[test]
    fn test_contains_rect_is_inclusive() {
        let rect = Rect64::new(0, 0, 10, 10);

        assert!(rect.contains_rect(&Rect64::new(0, 0, 5, 5)));
        assert!(rect.contains_rect(&rect));
        assert!(!rect.contains_rect(&Rect64::new(5, 5, 11, 9)));
    }

    #[test]
    fn test_as_path_is_synthetic() {
        let path = Rect64::new(0, 0, 4, 4).as_path(9);

        assert_eq!(path.len(), 4);
        assert!(path.iter().all(|p| p.is_synthetic() && p.loop_id == 9));
    }
}
