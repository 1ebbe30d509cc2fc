use std::collections::BinaryHeap;

/// Pending scanline y values, largest first.
#[derive(Debug, Default)]
pub struct Scanbeam {
    heap: BinaryHeap<i64>,
}

impl Scanbeam {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, y: i64) {
        self.heap.push(y);
    }

    /// Next scanline; repeated values collapse into one.
    pub fn pop(&mut self) -> Option<i64> {
        let y = self.heap.pop()?;

        while self.heap.peek() == Some(&y) {
            self.heap.pop();
        }

        Some(y)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_pop() {
        let mut scanbeam = Scanbeam::new();

        scanbeam.insert(5);
        scanbeam.insert(3);
        scanbeam.insert(7);
        scanbeam.insert(3);

        assert_eq!(scanbeam.pop(), Some(7));
        assert_eq!(scanbeam.pop(), Some(5));
        assert_eq!(scanbeam.pop(), Some(3));
        assert_eq!(scanbeam.pop(), None);
    }

    #[test]
    fn test_negative_values() {
        let mut scanbeam = Scanbeam::new();

        scanbeam.insert(-10);
        scanbeam.insert(i64::MAX >> 2);
        assert_eq!(scanbeam.heap.len(), 2);
        assert_eq!(scanbeam.pop(), Some(i64::MAX >> 2));
        assert_eq!(scanbeam.pop(), Some(-10));
        assert_eq!(scanbeam.pop(), None);
    }
}
