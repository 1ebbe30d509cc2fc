pub mod bound_rect;
pub mod path;
pub mod point;
pub mod poly_tree;
