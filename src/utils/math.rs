use crate::geometry::point::Point64;

/// Turn of `p1 -> p2 -> p3`, exact for the whole coordinate range.
#[inline(always)]
pub fn cross_product(p1: &Point64, p2: &Point64, p3: &Point64) -> i128 {
    (p2.x as i128 - p1.x as i128) * (p3.y as i128 - p2.y as i128)
        - (p2.y as i128 - p1.y as i128) * (p3.x as i128 - p2.x as i128)
}

#[inline(always)]
pub fn cross_sign(p1: &Point64, p2: &Point64, p3: &Point64) -> i32 {
    cross_product(p1, p2, p3).signum() as i32
}

#[inline(always)]
pub fn dot_product(p1: &Point64, p2: &Point64, p3: &Point64) -> i128 {
    (p2.x as i128 - p1.x as i128) * (p3.x as i128 - p2.x as i128)
        + (p2.y as i128 - p1.y as i128) * (p3.y as i128 - p2.y as i128)
}

#[inline(always)]
pub fn is_collinear(p1: &Point64, shared: &Point64, p2: &Point64) -> bool {
    cross_product(p1, shared, p2) == 0
}

/// Doubled signed area of the triangle, same sign convention as the path area.
pub fn area_triangle(p1: &Point64, p2: &Point64, p3: &Point64) -> f64 {
    (p3.y + p1.y) as f64 * (p3.x - p1.x) as f64
        + (p1.y + p2.y) as f64 * (p1.x - p2.x) as f64
        + (p2.y + p3.y) as f64 * (p2.x - p3.x) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_COORD;

    #[test]
    fn test_cross_product_does_not_overflow_at_range_limit() {
        let a = Point64::new(-MAX_COORD, -MAX_COORD);
        let b = Point64::new(MAX_COORD, -MAX_COORD);
        let c = Point64::new(MAX_COORD, MAX_COORD);

        assert!(cross_product(&a, &b, &c) > 0);
        assert_eq!(cross_sign(&c, &b, &a), -1);
    }

    #[test]
    fn test_collinear() {
        let a = Point64::new(0, 0);
        let b = Point64::new(5, 5);
        let c = Point64::new(10, 10);

        assert!(is_collinear(&a, &b, &c));
        assert!(!is_collinear(&a, &b, &Point64::new(10, 11)));
        assert!(dot_product(&a, &b, &c) > 0);
        assert!(dot_product(&a, &b, &a) < 0);
    }
}
