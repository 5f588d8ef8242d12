//! Clamped domain repetition (Deep Fried Edition)
//!
//! Folds the query point into a repeating cell so one primitive stamps
//! a bounded lattice of copies. The cell index is clamped so the
//! lattice stays finite and the field stays bounded.
//!
//! Author: Moroya Sakamoto

use glam::Vec3;

/// Fold a point into a finite repetition lattice
///
/// # Arguments
/// * `point` - Point in the command's local space
/// * `spacing` - Distance between copies (must be > 0)
/// * `lower` - Lower cell-index limit per axis
/// * `upper` - Upper cell-index limit per axis
#[inline(always)]
pub fn repeat_clamped(point: Vec3, spacing: f32, lower: Vec3, upper: Vec3) -> Vec3 {
    let cell = (point / spacing).round().clamp(lower, upper);
    point - cell * spacing
}
