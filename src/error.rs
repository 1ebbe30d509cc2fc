use std::fmt;

use thiserror::Error;

use crate::clipper::enums::ClipType;

pub type Result<T> = std::result::Result<T, GeometryError>;

/// Engine call that raised a [`GeometryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Clip(ClipType),
    Inflate,
    Load,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Clip(clip_type) => write!(f, "{clip_type}"),
            Operation::Inflate => f.write_str("inflate"),
            Operation::Load => f.write_str("load"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSet {
    Subject,
    Clip,
    Offset,
    Raw,
}

impl fmt::Display for InputSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputSet::Subject => "subject",
            InputSet::Clip => "clip",
            InputSet::Offset => "offset",
            InputSet::Raw => "raw",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("{operation}: {input} path {path} vertex {vertex} has a non-finite coordinate")]
    NonFinite {
        operation: Operation,
        input: InputSet,
        path: usize,
        vertex: usize,
    },

    #[error("{operation}: {input} path {path} vertex {vertex} ({x}, {y}) is outside the coordinate range")]
    OutOfRange {
        operation: Operation,
        input: InputSet,
        path: usize,
        vertex: usize,
        x: i64,
        y: i64,
    },

    #[error("{operation}: invalid {name} ({value})")]
    InvalidParameter {
        operation: Operation,
        name: &'static str,
        value: f64,
    },

    #[error("{operation}: generated vertex for path {path} overflows the coordinate range")]
    Overflow { operation: Operation, path: usize },

    #[error("{operation}: edge intersections could not be ordered at y = {y}")]
    Unresolved { operation: Operation, y: i64 },
}

impl GeometryError {
    pub fn operation(&self) -> Operation {
        match self {
            GeometryError::NonFinite { operation, .. }
            | GeometryError::OutOfRange { operation, .. }
            | GeometryError::InvalidParameter { operation, .. }
            | GeometryError::Overflow { operation, .. }
            | GeometryError::Unresolved { operation, .. } => *operation,
        }
    }
}
