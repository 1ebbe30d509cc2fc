use wasm_bindgen::prelude::*;
use web_sys::js_sys::Float64Array;

pub mod clipper;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod palette;
pub mod utils;

use crate::clipper::clipper_wrapper::{boolean_op, inflate_paths};
use crate::clipper::enums::{ClipType, EndType, FillRule, JoinType};
use crate::error::{GeometryError, Operation, Result};
use crate::geometry::path::{area, pack_paths, path_from_records, unpack_paths};

fn check_scale(scale: f64) -> Result<f64> {
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(GeometryError::InvalidParameter {
            operation: Operation::Load,
            name: "scale",
            value: scale,
        })
    }
}

fn decode_enum<T: TryFrom<u8, Error = u8>>(value: u8, name: &'static str) -> Result<T> {
    T::try_from(value).map_err(|value| GeometryError::InvalidParameter {
        operation: Operation::Load,
        name,
        value: value as f64,
    })
}

fn to_float64_array(values: &[f64]) -> Float64Array {
    let out = Float64Array::new_with_length(values.len() as u32);
    out.copy_from(values);
    out
}

/// Boolean operation over two packed path sets, see [`pack_paths`].
pub fn clip_paths_inner(subject: &[f64], clip: &[f64], clip_type: u8, fill_rule: u8, scale: f64) -> Result<Vec<f64>> {
    let scale = check_scale(scale)?;
    let clip_type: ClipType = decode_enum(clip_type, "clip_type")?;
    let fill_rule: FillRule = decode_enum(fill_rule, "fill_rule")?;
    let subject = unpack_paths(subject, scale)?;
    let clip = unpack_paths(clip, scale)?;
    let result = boolean_op(&subject, &clip, clip_type, fill_rule)?;

    Ok(pack_paths(&result, scale))
}

/// Offset of a packed path set. `delta` is in input units; non-positive
/// `miter_limit` and `arc_tolerance` select the defaults.
pub fn inflate_paths_inner(
    paths: &[f64],
    delta: f64,
    join_type: u8,
    end_type: u8,
    miter_limit: f64,
    arc_tolerance: f64,
    scale: f64,
) -> Result<Vec<f64>> {
    let scale = check_scale(scale)?;
    let join_type: JoinType = decode_enum(join_type, "join_type")?;
    let end_type: EndType = decode_enum(end_type, "end_type")?;
    let paths = unpack_paths(paths, scale)?;
    let miter_limit = (miter_limit > 0.0).then_some(miter_limit);
    let arc_tolerance = (arc_tolerance > 0.0).then_some(arc_tolerance * scale);
    let result = inflate_paths(&paths, delta * scale, join_type, end_type, miter_limit, arc_tolerance)?;

    Ok(pack_paths(&result, scale))
}

/// Signed area of one path given as `x, y, segment_id, loop_id` records.
pub fn polygon_area_inner(records: &[f64], scale: f64) -> Result<f64> {
    let scale = check_scale(scale)?;
    let path = path_from_records(records, scale, 0)?;

    Ok(area(&path) / (scale * scale))
}

#[wasm_bindgen]
pub fn clip_paths_wasm(subject: &[f64], clip: &[f64], clip_type: u8, fill_rule: u8, scale: f64) -> Float64Array {
    match clip_paths_inner(subject, clip, clip_type, fill_rule, scale) {
        Ok(result) => to_float64_array(&result),
        Err(error) => {
            wasm_log!("clip_paths_wasm: {error}");
            Float64Array::new_with_length(0)
        }
    }
}

#[wasm_bindgen]
pub fn inflate_paths_wasm(
    paths: &[f64],
    delta: f64,
    join_type: u8,
    end_type: u8,
    miter_limit: f64,
    arc_tolerance: f64,
    scale: f64,
) -> Float64Array {
    match inflate_paths_inner(paths, delta, join_type, end_type, miter_limit, arc_tolerance, scale) {
        Ok(result) => to_float64_array(&result),
        Err(error) => {
            wasm_log!("inflate_paths_wasm: {error}");
            Float64Array::new_with_length(0)
        }
    }
}

#[wasm_bindgen]
pub fn polygon_area_wasm(records: &[f64], scale: f64) -> f64 {
    polygon_area_inner(records, scale).unwrap_or_else(|error| {
        wasm_log!("polygon_area_wasm: {error}");
        0.0
    })
}
