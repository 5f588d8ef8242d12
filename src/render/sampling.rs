//! Direction and light sampling (Deep Fried Edition)
//!
//! Cosine-weighted hemisphere and GGX half-vector sampling for the
//! BSDF, plus area sampling for the three analytic light kinds. All
//! pdfs are solid-angle densities so the integrator can mix them
//! without unit juggling.
//!
//! Author: Moroya Sakamoto

use crate::render::rng::PathRng;
use crate::scene::Light;
use crate::types::LightKind;
use glam::Vec3;
use std::f32::consts::PI;

/// Orthonormal basis around a normal
#[inline]
pub fn onb(n: Vec3) -> (Vec3, Vec3) {
    let a = if n.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
    let t = n.cross(a).normalize();
    let b = n.cross(t);
    (t, b)
}

/// Cosine-weighted hemisphere direction around `n`
#[inline]
pub fn sample_cosine_hemisphere(n: Vec3, rng: &mut PathRng) -> Vec3 {
    let r1 = rng.next_f32();
    let r2 = rng.next_f32();
    let phi = 2.0 * PI * r1;
    let r = r2.sqrt();
    let (t, b) = onb(n);
    let z = (1.0 - r2).max(0.0).sqrt();
    (t * (r * phi.cos()) + b * (r * phi.sin()) + n * z).normalize()
}

/// Solid-angle pdf of [`sample_cosine_hemisphere`]
#[inline]
pub fn cosine_hemisphere_pdf(n: Vec3, dir: Vec3) -> f32 {
    n.dot(dir).max(0.0) / PI
}

/// Sample a GGX half vector around `n` and reflect `wo` about it
///
/// Isotropic collapse of the anisotropic cache: `alpha = sqrt(ax*ay)`.
#[inline]
pub fn sample_ggx_reflection(n: Vec3, wo: Vec3, ax: f32, ay: f32, rng: &mut PathRng) -> Vec3 {
    let alpha = (ax * ay).sqrt().max(0.001);
    let r1 = rng.next_f32();
    let r2 = rng.next_f32();
    let phi = 2.0 * PI * r1;
    let cos_theta = ((1.0 - r2) / (1.0 + (alpha * alpha - 1.0) * r2)).sqrt();
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let (t, b) = onb(n);
    let h = (t * (sin_theta * phi.cos()) + b * (sin_theta * phi.sin()) + n * cos_theta).normalize();
    (2.0 * wo.dot(h) * h - wo).normalize()
}

/// GGX normal distribution term
#[inline]
pub fn ggx_d(n_dot_h: f32, alpha: f32) -> f32 {
    let a2 = alpha * alpha;
    let d = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
    a2 / (PI * d * d).max(1e-8)
}

/// Smith masking-shadowing term (separable Schlick-GGX)
#[inline]
pub fn smith_g(n_dot_v: f32, n_dot_l: f32, alpha: f32) -> f32 {
    let k = alpha * alpha * 0.5;
    let g1 = |c: f32| c / (c * (1.0 - k) + k).max(1e-8);
    g1(n_dot_v.max(0.0)) * g1(n_dot_l.max(0.0))
}

/// Schlick Fresnel with a color F0
#[inline]
pub fn fresnel_schlick(cos_theta: f32, f0: Vec3) -> Vec3 {
    f0 + (Vec3::ONE - f0) * (1.0 - cos_theta.clamp(0.0, 1.0)).powi(5)
}

/// One sampled direct-lighting connection
#[derive(Debug, Clone, Copy)]
pub struct LightSample {
    /// Direction from the shading point toward the light
    pub direction: Vec3,
    /// Distance to the sampled light point (infinite for distant)
    pub distance: f32,
    /// Emitted radiance arriving along `direction`
    pub emission: Vec3,
    /// Solid-angle pdf of the sample
    pub pdf: f32,
}

/// Sample a point on one light as seen from `point`
///
/// Returns `None` when the sampled point faces away or the pdf
/// degenerates.
pub fn sample_light(light: &Light, point: Vec3, rng: &mut PathRng) -> Option<LightSample> {
    match LightKind::from_wire(light.kind)? {
        LightKind::Rect => {
            let on_light = light.position + light.u * rng.next_f32() + light.v * rng.next_f32();
            let to_light = on_light - point;
            let dist_sq = to_light.length_squared();
            let distance = dist_sq.sqrt();
            if distance < 1e-5 {
                return None;
            }
            let direction = to_light / distance;
            let light_normal = light.u.cross(light.v).normalize_or_zero();
            let cos_light = light_normal.dot(-direction).abs();
            if cos_light < 1e-5 || light.area < 1e-8 {
                return None;
            }
            // Area pdf converted to solid angle
            let pdf = dist_sq / (cos_light * light.area);
            Some(LightSample {
                direction,
                distance,
                emission: light.emission,
                pdf,
            })
        }
        LightKind::Sphere => {
            // Uniform point on the sphere surface
            let r1 = rng.next_f32();
            let r2 = rng.next_f32();
            let z = 1.0 - 2.0 * r1;
            let r = (1.0 - z * z).max(0.0).sqrt();
            let phi = 2.0 * PI * r2;
            let normal = Vec3::new(r * phi.cos(), r * phi.sin(), z);
            let on_light = light.position + normal * light.radius;
            let to_light = on_light - point;
            let dist_sq = to_light.length_squared();
            let distance = dist_sq.sqrt();
            if distance < 1e-5 {
                return None;
            }
            let direction = to_light / distance;
            let cos_light = normal.dot(-direction);
            if cos_light < 1e-5 || light.area < 1e-8 {
                return None;
            }
            let pdf = dist_sq / (cos_light * light.area);
            Some(LightSample {
                direction,
                distance,
                emission: light.emission,
                pdf,
            })
        }
        LightKind::Distant => {
            // Delta distribution: direction is fixed, pdf is 1
            let direction = -light.position.normalize_or_zero();
            if direction == Vec3::ZERO {
                return None;
            }
            Some(LightSample {
                direction,
                distance: f32::INFINITY,
                emission: light.emission,
                pdf: 1.0,
            })
        }
    }
}
