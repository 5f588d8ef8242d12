//! Polynomial smooth min/max (Deep Fried Edition)
//!
//! The quadratic polynomial blend: C1 continuous across the seam,
//! identical to hard min/max outside the `k`-wide band, and exactly
//! hard min/max when `k` is zero.
//!
//! # Deep Fried Optimizations
//! - **Branchless Band**: `max(0.0)` instead of a band test.
//! - **Forced Inlining**: These run per node per march step.
//!
//! Author: Moroya Sakamoto

/// Smooth minimum of two distances with blend radius `k`
///
/// `k = 0` reduces to a hard `min`, preserving a crisp edge.
#[inline(always)]
pub fn smooth_min(a: f32, b: f32, k: f32) -> f32 {
    if k <= 0.0 {
        return a.min(b);
    }
    let h = (k - (a - b).abs()).max(0.0) / k;
    a.min(b) - h * h * k * 0.25
}

/// Smooth maximum of two distances with blend radius `k`
///
/// `k = 0` reduces to a hard `max`, preserving a crisp edge.
#[inline(always)]
pub fn smooth_max(a: f32, b: f32, k: f32) -> f32 {
    if k <= 0.0 {
        return a.max(b);
    }
    let h = (k - (a - b).abs()).max(0.0) / k;
    a.max(b) + h * h * k * 0.25
}

/// Material interpolation weight across the smoothing band
///
/// Returns how much the incoming distance `b` dominates the
/// accumulated distance `a`: 0 well outside the band (keep the
/// accumulated material), 1 where `b` has fully won, and a smooth ramp
/// across the `k`-wide seam. `k = 0` degenerates to a hard select.
#[inline(always)]
pub fn blend_weight(a: f32, b: f32, k: f32) -> f32 {
    if k <= 0.0 {
        return if b < a { 1.0 } else { 0.0 };
    }
    (0.5 + 0.5 * (a - b) / k).clamp(0.0, 1.0)
}
