use std::ops::{Index, IndexMut};

use crate::clipper::constants::UNASSIGNED;

/// Output polygon under construction. `front_edge`/`back_edge` are the two
/// active edges currently appending to it; `owner` only links records whose
/// points were merged elsewhere.
#[derive(Debug, Clone)]
pub struct OutRecord {
    pub pts: usize,
    pub front_edge: usize,
    pub back_edge: usize,
    pub owner: usize,
}

#[derive(Debug, Default)]
pub struct OutRec {
    records: Vec<OutRecord>,
}

impl Index<usize> for OutRec {
    type Output = OutRecord;

    #[inline(always)]
    fn index(&self, index: usize) -> &OutRecord {
        &self.records[index]
    }
}

impl IndexMut<usize> for OutRec {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut OutRecord {
        &mut self.records[index]
    }
}

impl OutRec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self) -> usize {
        let index = self.records.len();

        self.records.push(OutRecord {
            pts: UNASSIGNED,
            front_edge: UNASSIGNED,
            back_edge: UNASSIGNED,
            owner: UNASSIGNED,
        });

        index
    }

    /// Follows merge links to the record that now holds the points.
    pub fn get_real(&self, index: usize) -> usize {
        let mut result = index;
        let mut steps = 0;

        while result != UNASSIGNED && self.records[result].pts == UNASSIGNED {
            result = self.records[result].owner;
            steps += 1;

            if steps > self.records.len() {
                return UNASSIGNED;
            }
        }

        result
    }

    #[inline(always)]
    pub fn is_front(&self, index: usize, edge: usize) -> bool {
        self.records[index].front_edge == edge
    }

    pub fn swap_front_back(&mut self, index: usize) {
        let record = &mut self.records[index];
        std::mem::swap(&mut record.front_edge, &mut record.back_edge);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_real_follows_owner() {
        let mut out_rec = OutRec::new();
        let a = out_rec.create();
        let b = out_rec.create();
        let c = out_rec.create();

        out_rec[c].pts = 0;
        out_rec[a].owner = b;
        out_rec[b].owner = c;

        assert_eq!(out_rec.get_real(a), c);
        assert_eq!(out_rec.get_real(c), c);
    }

    #[test]
    fn test_get_real_without_points() {
        let mut out_rec = OutRec::new();
        let a = out_rec.create();
        let b = out_rec.create();

        out_rec[a].owner = b;
        out_rec[b].owner = a;

        assert_eq!(out_rec.get_real(a), UNASSIGNED);
    }

    #[test]
    fn test_swap_front_back() {
        let mut out_rec = OutRec::new();
        let a = out_rec.create();

        out_rec[a].front_edge = 4;
        out_rec[a].back_edge = 7;
        out_rec.swap_front_back(a);

        assert!(out_rec.is_front(a, 7));
        assert_eq!(out_rec[a].back_edge, 4);
    }
}
