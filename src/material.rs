//! Disney-style material records and the channel mixer (Deep Fried Edition)
//!
//! `Material` is the flat shading record the integrator consumes; it
//! matches the uniform layout byte-for-byte so a command list can be
//! uploaded without repacking. `MaterialMixer` holds one independent
//! mixer per channel, so a single blend can lerp albedo linearly while
//! breaking up roughness with noise.
//!
//! # Deep Fried Optimizations
//! - **Exact-Endpoint Lerp**: `a*(1-w) + b*w` instead of `a + w*(b-a)`
//!   so weight 0 and 1 reproduce the inputs bit-exactly.
//! - **Cached Anisotropy**: `ax`/`ay` are derived once at blend time,
//!   never in the integrator's inner loop.
//!
//! Author: Moroya Sakamoto

use crate::noise::value_noise_at;
use crate::types::BlendMode;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Noise frequency used by the value-noise blend mode
const MIX_NOISE_FREQUENCY: f32 = 8.0;

/// Noise seed used by the value-noise blend mode
const MIX_NOISE_SEED: u32 = 0x5EED;

/// Flat physically-based shading record
///
/// Channel semantics follow the Disney principled model. `ax`/`ay`
/// are a derived cache of the anisotropic GGX roughness, refreshed by
/// [`Material::derive_anisotropy`] whenever `roughness` or
/// `anisotropic` change.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Material {
    /// Base color
    pub albedo: Vec3,
    /// Specular reflectance scale
    pub specular: f32,
    /// Emitted radiance
    pub emission: Vec3,
    /// Anisotropy amount in [0, 1)
    pub anisotropic: f32,
    /// Metalness in [0, 1]
    pub metallic: f32,
    /// Microfacet roughness in [0, 1]
    pub roughness: f32,
    /// Subsurface scattering approximation weight
    pub subsurface: f32,
    /// Tint of the specular lobe toward the albedo
    pub specular_tint: f32,
    /// Sheen lobe weight
    pub sheen: f32,
    /// Tint of the sheen lobe toward the albedo
    pub sheen_tint: f32,
    /// Clearcoat lobe weight
    pub clearcoat: f32,
    /// Clearcoat glossiness
    pub clearcoat_gloss: f32,
    /// Specular transmission weight
    pub spec_trans: f32,
    /// Index of refraction
    pub ior: f32,
    /// Absorption reference distance for transmission
    pub at_distance: f32,
    /// Absorption color at the reference distance
    pub extinction: Vec3,
    /// Derived GGX roughness along the tangent
    pub ax: f32,
    /// Derived GGX roughness along the bitangent
    pub ay: f32,
}

impl Default for Material {
    fn default() -> Self {
        let mut mat = Material {
            albedo: Vec3::splat(0.5),
            specular: 0.5,
            emission: Vec3::ZERO,
            anisotropic: 0.0,
            metallic: 0.0,
            roughness: 0.5,
            subsurface: 0.0,
            specular_tint: 0.0,
            sheen: 0.0,
            sheen_tint: 0.5,
            clearcoat: 0.0,
            clearcoat_gloss: 0.0,
            spec_trans: 0.0,
            ior: 1.45,
            at_distance: 1.0,
            extinction: Vec3::ONE,
            ax: 0.0,
            ay: 0.0,
        };
        mat.derive_anisotropy();
        mat
    }
}

impl Material {
    /// Create a material with the given base color
    pub fn new(albedo: Vec3) -> Self {
        Material {
            albedo,
            ..Default::default()
        }
    }

    /// Builder: set metallic
    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic;
        self
    }

    /// Builder: set roughness and refresh the anisotropy cache
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self.derive_anisotropy();
        self
    }

    /// Builder: set anisotropy and refresh the cache
    pub fn with_anisotropic(mut self, anisotropic: f32) -> Self {
        self.anisotropic = anisotropic;
        self.derive_anisotropy();
        self
    }

    /// Builder: set emission
    pub fn with_emission(mut self, emission: Vec3) -> Self {
        self.emission = emission;
        self
    }

    /// Builder: set specular transmission and index of refraction
    pub fn with_transmission(mut self, spec_trans: f32, ior: f32) -> Self {
        self.spec_trans = spec_trans;
        self.ior = ior;
        self
    }

    /// Refresh the cached anisotropic GGX roughness
    ///
    /// `aspect = sqrt(1 - 0.9 * anisotropic)` per the Disney model,
    /// floored so the microfacet distribution never degenerates.
    pub fn derive_anisotropy(&mut self) {
        let aspect = (1.0 - 0.9 * self.anisotropic.clamp(0.0, 1.0)).sqrt();
        let r2 = self.roughness * self.roughness;
        self.ax = (r2 / aspect).max(0.001);
        self.ay = (r2 * aspect).max(0.001);
    }
}

/// One channel's blend configuration
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct ChannelMixer {
    /// Blend curve tag, one of [`BlendMode`]'s wire values
    pub mode: i32,
    /// Weight rescale applied after the blend curve
    pub scale: f32,
    /// Nonzero applies a smoothstep to the final weight
    pub smoothing: i32,
}

impl Default for ChannelMixer {
    fn default() -> Self {
        ChannelMixer {
            mode: BlendMode::Linear as i32,
            scale: 1.0,
            smoothing: 0,
        }
    }
}

impl ChannelMixer {
    /// Create a mixer from typed parts
    pub fn new(mode: BlendMode, scale: f32, smoothing: bool) -> Self {
        ChannelMixer {
            mode: mode as i32,
            scale,
            smoothing: smoothing as i32,
        }
    }
}

/// Per-channel mixers for a material blend
///
/// Every channel carries its own mixer; a channel whose mixer is left
/// at the default still participates with a plain lerp.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct MaterialMixer {
    /// Albedo mixer
    pub albedo: ChannelMixer,
    /// Specular mixer
    pub specular: ChannelMixer,
    /// Anisotropic mixer
    pub anisotropic: ChannelMixer,
    /// Metallic mixer
    pub metallic: ChannelMixer,
    /// Roughness mixer
    pub roughness: ChannelMixer,
    /// Subsurface mixer
    pub subsurface: ChannelMixer,
    /// Specular tint mixer
    pub specular_tint: ChannelMixer,
    /// Sheen mixer
    pub sheen: ChannelMixer,
    /// Sheen tint mixer
    pub sheen_tint: ChannelMixer,
    /// Clearcoat mixer
    pub clearcoat: ChannelMixer,
    /// Clearcoat gloss mixer
    pub clearcoat_gloss: ChannelMixer,
    /// Specular transmission mixer
    pub spec_trans: ChannelMixer,
    /// Index of refraction mixer
    pub ior: ChannelMixer,
    /// Emission mixer
    pub emission: ChannelMixer,
}

/// Evaluate one channel's final blend weight
///
/// `base` is the CSG band weight, `depth` the accumulated signed
/// distance at the query point. The noise mode perturbs only strictly
/// inside the band (gated by `4w(1-w)`), so weight 0 and 1 pass
/// through untouched in every mode.
#[inline]
fn channel_weight(base: f32, mixer: &ChannelMixer, point: Vec3, depth: f32) -> f32 {
    let mode = BlendMode::from_wire(mixer.mode).unwrap_or(BlendMode::Linear);
    let mut w = match mode {
        BlendMode::Linear => base,
        BlendMode::ValueNoise => {
            let n = value_noise_at(point, MIX_NOISE_FREQUENCY, MIX_NOISE_SEED);
            base + n * 2.0 * base * (1.0 - base)
        }
        BlendMode::Depth => {
            // Fade the blend in with depth below the surface
            base * (-depth).clamp(0.0, 1.0)
        }
    };
    w = (w * mixer.scale).clamp(0.0, 1.0);
    if mixer.smoothing != 0 {
        w = w * w * (3.0 - 2.0 * w);
    }
    w
}

#[inline(always)]
fn mix_f32(a: f32, b: f32, w: f32) -> f32 {
    a * (1.0 - w) + b * w
}

#[inline(always)]
fn mix_vec3(a: Vec3, b: Vec3, w: f32) -> Vec3 {
    a * (1.0 - w) + b * w
}

/// Blend two materials across a smoothing band
///
/// # Arguments
/// * `a` - Accumulated material (weight 0 side)
/// * `b` - Incoming material (weight 1 side)
/// * `band` - CSG band weight in [0, 1]
/// * `mixer` - Per-channel blend configuration
/// * `point` - World-space query point, feeds the noise mode
/// * `depth` - Accumulated signed distance, feeds the depth mode
pub fn mix_materials(
    a: &Material,
    b: &Material,
    band: f32,
    mixer: &MaterialMixer,
    point: Vec3,
    depth: f32,
) -> Material {
    let band = band.clamp(0.0, 1.0);
    let cw = |ch: &ChannelMixer| channel_weight(band, ch, point, depth);

    let mut out = Material {
        albedo: mix_vec3(a.albedo, b.albedo, cw(&mixer.albedo)),
        specular: mix_f32(a.specular, b.specular, cw(&mixer.specular)),
        emission: mix_vec3(a.emission, b.emission, cw(&mixer.emission)),
        anisotropic: mix_f32(a.anisotropic, b.anisotropic, cw(&mixer.anisotropic)),
        metallic: mix_f32(a.metallic, b.metallic, cw(&mixer.metallic)),
        roughness: mix_f32(a.roughness, b.roughness, cw(&mixer.roughness)),
        subsurface: mix_f32(a.subsurface, b.subsurface, cw(&mixer.subsurface)),
        specular_tint: mix_f32(a.specular_tint, b.specular_tint, cw(&mixer.specular_tint)),
        sheen: mix_f32(a.sheen, b.sheen, cw(&mixer.sheen)),
        sheen_tint: mix_f32(a.sheen_tint, b.sheen_tint, cw(&mixer.sheen_tint)),
        clearcoat: mix_f32(a.clearcoat, b.clearcoat, cw(&mixer.clearcoat)),
        clearcoat_gloss: mix_f32(a.clearcoat_gloss, b.clearcoat_gloss, cw(&mixer.clearcoat_gloss)),
        spec_trans: mix_f32(a.spec_trans, b.spec_trans, cw(&mixer.spec_trans)),
        ior: mix_f32(a.ior, b.ior, cw(&mixer.ior)),
        // Volume terms have no mixer slot and ride the raw band weight
        at_distance: mix_f32(a.at_distance, b.at_distance, band),
        extinction: mix_vec3(a.extinction, b.extinction, band),
        ax: 0.0,
        ay: 0.0,
    };
    out.derive_anisotropy();
    out
}
