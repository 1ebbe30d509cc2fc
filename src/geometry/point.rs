use std::fmt;
use std::hash::{Hash, Hasher};

use crate::constants::{SYNTHETIC_SEGMENT, UNTAGGED_LOOP};
use crate::utils::round::ClipperRound;

/// Integer vertex carrying the provenance tags of the input edge it came from.
///
/// Equality and hashing look at the coordinates only, the way the sweep
/// compares positions. Use [`Point64::meta`] to compare provenance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Point64 {
    pub x: i64,
    pub y: i64,
    pub segment_id: i32,
    pub loop_id: i32,
}

impl Point64 {
    #[inline(always)]
    pub fn new(x: i64, y: i64) -> Self {
        Self {
            x,
            y,
            segment_id: SYNTHETIC_SEGMENT,
            loop_id: UNTAGGED_LOOP,
        }
    }

    #[inline(always)]
    pub fn with_meta(x: i64, y: i64, segment_id: i32, loop_id: i32) -> Self {
        Self {
            x,
            y,
            segment_id,
            loop_id,
        }
    }

    #[inline(always)]
    pub fn synthetic(x: i64, y: i64, loop_id: i32) -> Self {
        Self::with_meta(x, y, SYNTHETIC_SEGMENT, loop_id)
    }

    /// Rounds a floating point position and tags it as engine generated.
    #[inline(always)]
    pub fn from_point_d(point: &PointD, loop_id: i32) -> Self {
        Self::synthetic(
            point.x.clipper_rounded() as i64,
            point.y.clipper_rounded() as i64,
            loop_id,
        )
    }

    #[inline(always)]
    pub fn is_synthetic(&self) -> bool {
        self.segment_id == SYNTHETIC_SEGMENT
    }

    #[inline(always)]
    pub fn meta(&self) -> (i32, i32) {
        (self.segment_id, self.loop_id)
    }

    #[inline(always)]
    pub fn same_position(&self, other: &Point64) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// Same position as `self`, provenance of `source`.
    #[inline(always)]
    pub fn retag(&self, source: &Point64) -> Self {
        Self::with_meta(self.x, self.y, source.segment_id, source.loop_id)
    }

    #[inline(always)]
    pub fn to_point_d(&self) -> PointD {
        PointD::new(self.x as f64, self.y as f64)
    }
}

impl PartialEq for Point64 {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.same_position(other)
    }
}

impl Eq for Point64 {}

impl Hash for Point64 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

impl fmt::Display for Point64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) [seg {}, loop {}]",
            self.x, self.y, self.segment_id, self.loop_id
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointD {
    pub x: f64,
    pub y: f64,
}

impl PointD {
    #[inline(always)]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline(always)]
    pub fn add(&self, other: &PointD) -> PointD {
        PointD::new(self.x + other.x, self.y + other.y)
    }

    #[inline(always)]
    pub fn sub(&self, other: &PointD) -> PointD {
        PointD::new(self.x - other.x, self.y - other.y)
    }

    #[inline(always)]
    pub fn scale(&self, value: f64) -> PointD {
        PointD::new(self.x * value, self.y * value)
    }

    #[inline(always)]
    pub fn reverse(&self) -> PointD {
        PointD::new(-self.x, -self.y)
    }

    #[inline(always)]
    pub fn dot(&self, other: &PointD) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[inline(always)]
    pub fn cross(&self, other: &PointD) -> f64 {
        self.y * other.x - other.y * self.x
    }

    #[inline(always)]
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn normalize(&self) -> PointD {
        let length = self.length();

        if length < crate::constants::TOL_F64 {
            return PointD::default();
        }

        self.scale(1.0 / length)
    }

    #[inline(always)]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_provenance() {
        let a = Point64::with_meta(10, 20, 3, 1);
        let b = Point64::with_meta(10, 20, 7, 2);

        assert_eq!(a, b);
        assert_ne!(a.meta(), b.meta());
    }

    #[test]
    fn test_untagged_point_uses_sentinels() {
        let point = Point64::new(1, 2);

        assert!(point.is_synthetic());
        assert_eq!(point.loop_id, UNTAGGED_LOOP);
    }

    #[test]
    fn test_from_point_d_rounds_half_away() {
        let point = Point64::from_point_d(&PointD::new(2.5, -2.5), 4);

        assert_eq!((point.x, point.y), (3, -3));
        assert_eq!(point.meta(), (SYNTHETIC_SEGMENT, 4));
    }

    #[test]
    fn test_cross_matches_normal_convention() {
        let a = PointD::new(1.0, 0.0);
        let b = PointD::new(0.0, 1.0);

        assert_eq!(a.cross(&b), -1.0);
        assert_eq!(b.cross(&a), 1.0);
        assert_eq!(a.dot(&b), 0.0);
    }
}
