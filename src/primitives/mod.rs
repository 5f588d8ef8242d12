//! Primitive SDF functions (Deep Fried Edition)
//!
//! One file per primitive, all evaluated in the primitive's local
//! space. Commands translate/rotate the query point before calling in.
//!
//! Author: Moroya Sakamoto

mod box3d;
mod cylinder;
mod heightfield;
mod sphere;

pub use box3d::{sdf_box3d, sdf_rounded_box3d};
pub use cylinder::{sdf_cylinder, sdf_rounded_cylinder};
pub use heightfield::sdf_heightfield;
pub use sphere::sdf_sphere;
