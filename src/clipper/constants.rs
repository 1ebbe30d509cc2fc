pub const UNASSIGNED: usize = usize::MAX;

pub const VERTEX_EMPTY: u8 = 0;

pub const VERTEX_LOCAL_MAX: u8 = 1;

pub const VERTEX_LOCAL_MIN: u8 = 2;

/// Edges steeper than this (in |dx|) are snapped along themselves when a
/// crossing lands outside its scanbeam.
pub const STEEP_DX: f64 = 100.0;

pub const JOIN_LEFT_DIST_SQRD: f64 = 0.25;

pub const JOIN_RIGHT_DIST_SQRD: f64 = 0.35;

pub const NEAR_STRAIGHT_COS: f64 = 0.999;

/// Upper bound on round join steps per full turn.
pub const MAX_ROUND_STEPS: f64 = 4096.0;
