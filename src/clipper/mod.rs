// Clipper module - metadata-aware clipping and offsetting
// Sweep engine, offset engine and their arena building blocks

pub mod clipper;
pub mod clipper_offset;
pub mod clipper_wrapper;
pub mod constants;
pub mod enums;
pub mod intersect_node;
pub mod join;
pub mod local_minima;
pub mod out_pt;
pub mod out_rec;
pub mod scanbeam;
pub mod t_edge;
pub mod utils;

#[cfg(test)]
pub mod tests;

// Re-export commonly used items for convenience
pub use clipper_wrapper::*;
pub use constants::*;
pub use enums::*;
