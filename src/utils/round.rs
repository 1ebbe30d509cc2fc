pub trait ClipperRound {
    fn clipper_rounded(self) -> Self;
}

impl ClipperRound for f64 {
    fn clipper_rounded(self) -> Self {
        if self < 0.0 {
            (self - 0.5).ceil()
        } else {
            (self + 0.5).floor()
        }
    }
}

/// Integer division rounded half away from zero.
pub fn div_round(numerator: i128, denominator: i128) -> i128 {
    let (numerator, denominator) = if denominator < 0 {
        (-numerator, -denominator)
    } else {
        (numerator, denominator)
    };
    let half = denominator / 2;

    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clipper_rounded_is_symmetric() {
        assert_eq!(0.5f64.clipper_rounded(), 1.0);
        assert_eq!((-0.5f64).clipper_rounded(), -1.0);
        assert_eq!(1.49f64.clipper_rounded(), 1.0);
        assert_eq!((-1.49f64).clipper_rounded(), -1.0);
    }

    #[test]
    fn test_div_round() {
        assert_eq!(div_round(7, 2), 4);
        assert_eq!(div_round(-7, 2), -4);
        assert_eq!(div_round(7, -2), -4);
        assert_eq!(div_round(5, 3), 2);
        assert_eq!(div_round(4, 3), 1);
    }
}
