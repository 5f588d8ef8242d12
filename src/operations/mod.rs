//! CSG combine operations and spatial modifiers (Deep Fried Edition)
//!
//! Author: Moroya Sakamoto

mod repeat;
mod smooth;

pub use repeat::repeat_clamped;
pub use smooth::{blend_weight, smooth_max, smooth_min};
