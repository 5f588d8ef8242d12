//! Cylinder primitive SDF (Deep Fried Edition)
//!
//! # Deep Fried Optimizations
//! - **Branchless Capped Cylinder**: max/min selection instead of
//!   if/else chains.
//! - **Forced Inlining**: Zero call overhead.
//!
//! Author: Moroya Sakamoto

use glam::{Vec2, Vec3};

/// Signed distance to a vertical capped cylinder centered at origin
///
/// # Arguments
/// * `point` - Point to evaluate
/// * `radius` - Cylinder radius
/// * `half_height` - Half of the cylinder height
///
/// # Returns
/// Signed distance (negative inside, positive outside)
#[inline(always)]
pub fn sdf_cylinder(point: Vec3, radius: f32, half_height: f32) -> f32 {
    let d = Vec2::new(
        Vec2::new(point.x, point.z).length() - radius,
        point.y.abs() - half_height,
    );
    d.x.max(d.y).min(0.0) + d.max(Vec2::ZERO).length()
}

/// Signed distance to a vertical cylinder with rounded caps
///
/// The rounding radius is folded into radius and height so the overall
/// footprint stays at `radius` x `half_height`.
#[inline(always)]
pub fn sdf_rounded_cylinder(point: Vec3, radius: f32, half_height: f32, rounding: f32) -> f32 {
    let r = rounding.min(radius).min(half_height);
    let d = Vec2::new(
        Vec2::new(point.x, point.z).length() - radius + r,
        point.y.abs() - half_height + r,
    );
    d.x.max(d.y).min(0.0) + d.max(Vec2::ZERO).length() - r
}
