use crate::geometry::point::Point64;
use crate::utils::math::cross_sign;
use crate::utils::round::{div_round, ClipperRound};

/// Crossing point of the infinite lines through the two segments, clamped to
/// the first segment's end points. Only the position is meaningful; callers
/// decide the provenance. `None` for parallel segments.
pub fn get_segment_intersect_pt(
    ln1a: &Point64,
    ln1b: &Point64,
    ln2a: &Point64,
    ln2b: &Point64,
) -> Option<Point64> {
    let dx1 = ln1b.x as i128 - ln1a.x as i128;
    let dy1 = ln1b.y as i128 - ln1a.y as i128;
    let dx2 = ln2b.x as i128 - ln2a.x as i128;
    let dy2 = ln2b.y as i128 - ln2a.y as i128;
    let mut det = dy1 * dx2 - dy2 * dx1;

    if det == 0 {
        return None;
    }

    let mut num = (ln1a.x as i128 - ln2a.x as i128) * dy2 - (ln1a.y as i128 - ln2a.y as i128) * dx2;

    if det < 0 {
        det = -det;
        num = -num;
    }

    if num <= 0 {
        return Some(*ln1a);
    }

    if num >= det {
        return Some(*ln1b);
    }

    match (dx1.checked_mul(num), dy1.checked_mul(num)) {
        (Some(x_num), Some(y_num)) => Some(Point64::new(
            ln1a.x + div_round(x_num, det) as i64,
            ln1a.y + div_round(y_num, det) as i64,
        )),
        _ => {
            let t = num as f64 / det as f64;

            Some(Point64::new(
                ln1a.x + (t * dx1 as f64).clipper_rounded() as i64,
                ln1a.y + (t * dy1 as f64).clipper_rounded() as i64,
            ))
        }
    }
}

/// Proper crossing test; touching or collinear segments do not count.
pub fn segments_intersect(seg1a: &Point64, seg1b: &Point64, seg2a: &Point64, seg2b: &Point64) -> bool {
    cross_sign(seg1a, seg2a, seg2b) * cross_sign(seg1b, seg2a, seg2b) < 0
        && cross_sign(seg2a, seg1a, seg1b) * cross_sign(seg2b, seg1a, seg1b) < 0
}

pub fn get_closest_point_on_segment(off_pt: &Point64, seg1: &Point64, seg2: &Point64) -> Point64 {
    if seg1 == seg2 {
        return *seg1;
    }

    let dx = (seg2.x - seg1.x) as f64;
    let dy = (seg2.y - seg1.y) as f64;
    let q = ((off_pt.x - seg1.x) as f64 * dx + (off_pt.y - seg1.y) as f64 * dy) / (dx * dx + dy * dy);
    let q = q.clamp(0.0, 1.0);

    Point64::new(
        seg1.x + (q * dx).clipper_rounded() as i64,
        seg1.y + (q * dy).clipper_rounded() as i64,
    )
}

pub fn perpendic_dist_from_line_sqrd(pt: &Point64, line1: &Point64, line2: &Point64) -> f64 {
    let a = (pt.x - line1.x) as f64;
    let b = (pt.y - line1.y) as f64;
    let c = (line2.x - line1.x) as f64;
    let d = (line2.y - line1.y) as f64;

    if c == 0.0 && d == 0.0 {
        return 0.0;
    }

    let cross = a * d - c * b;

    cross * cross / (c * c + d * d)
}
