use crate::clipper::clipper::Clipper;
use crate::clipper::clipper_offset::ClipperOffset;
use crate::clipper::enums::{ClipType, EndType, FillRule, JoinType};
use crate::constants::DEFAULT_MITER_LIMIT;
use crate::error::Result;
use crate::geometry::path::{Path, PathSet};

/// One-shot boolean operation with default options.
pub fn boolean_op(subject: &[Path], clip: &[Path], clip_type: ClipType, fill_rule: FillRule) -> Result<PathSet> {
    let mut clipper = Clipper::new();

    clipper.add_subject(subject).add_clip(clip);
    clipper.execute(clip_type, fill_rule)
}

pub fn union(subject: &[Path], clip: &[Path], fill_rule: FillRule) -> Result<PathSet> {
    boolean_op(subject, clip, ClipType::Union, fill_rule)
}

pub fn intersect(subject: &[Path], clip: &[Path], fill_rule: FillRule) -> Result<PathSet> {
    boolean_op(subject, clip, ClipType::Intersection, fill_rule)
}

pub fn difference(subject: &[Path], clip: &[Path], fill_rule: FillRule) -> Result<PathSet> {
    boolean_op(subject, clip, ClipType::Difference, fill_rule)
}

pub fn xor(subject: &[Path], clip: &[Path], fill_rule: FillRule) -> Result<PathSet> {
    boolean_op(subject, clip, ClipType::Xor, fill_rule)
}

/// Offsets `paths` by `delta`. `None` options fall back to the miter limit
/// of 2 and an arc tolerance derived from `delta`.
pub fn inflate_paths(
    paths: &[Path],
    delta: f64,
    join_type: JoinType,
    end_type: EndType,
    miter_limit: Option<f64>,
    arc_tolerance: Option<f64>,
) -> Result<PathSet> {
    let mut offset = ClipperOffset::new()
        .miter_limit(miter_limit.unwrap_or(DEFAULT_MITER_LIMIT))
        .arc_tolerance(arc_tolerance.unwrap_or(0.0));

    offset.add_paths(paths, join_type, end_type);
    offset.execute(delta)
}
