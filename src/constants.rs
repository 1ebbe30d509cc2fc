pub const TOL_F64: f64 = 1e-9;

pub const MAX_COORD: i64 = i64::MAX >> 2;

pub const DEFAULT_MITER_LIMIT: f64 = 2.0;

pub const DEFAULT_ARC_TOLERANCE: f64 = 0.25;

pub const FLOATING_POINT_TOLERANCE: f64 = 1e-12;

pub const SYNTHETIC_SEGMENT: i32 = -1;

pub const UNTAGGED_LOOP: i32 = -1;

pub const POINT_STRIDE: usize = 4;
