//! Scene description and render uniforms (Deep Fried Edition)
//!
//! The authoring side builds a [`RenderScene`] from typed parts; the
//! renderer consumes the flat [`RenderUniform`] packed from it. Lights
//! live in a fixed four-slot array so the record size never varies;
//! the builder rejects a fifth light instead of truncating.
//!
//! # Deep Fried Optimizations
//! - **Flat Records**: All uniform structs are `#[repr(C)]` + `Pod`
//!   with 4-byte alignment and no padding.
//! - **Precomputed Light Area**: Sampling pdfs divide by the cached
//!   area instead of recomputing cross products per sample.
//!
//! Author: Moroya Sakamoto

use crate::material::Material;
use crate::types::{LightKind, ModelError, MAX_LIGHTS};
use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// Pinhole camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Eye position
    pub origin: Vec3,
    /// Point the camera looks at
    pub look_at: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            origin: Vec3::new(0.0, 0.0, -3.0),
            look_at: Vec3::ZERO,
            fov: 80.0,
        }
    }
}

/// Analytic light in authoring form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LightDescriptor {
    /// Rectangular area light
    Rect {
        /// Corner position
        position: Vec3,
        /// First edge vector
        u: Vec3,
        /// Second edge vector
        v: Vec3,
        /// Emitted radiance
        emission: Vec3,
    },
    /// Spherical area light
    Sphere {
        /// Center position
        position: Vec3,
        /// Sphere radius
        radius: f32,
        /// Emitted radiance
        emission: Vec3,
    },
    /// Distant directional light
    Distant {
        /// Direction the light travels (toward the scene)
        direction: Vec3,
        /// Emitted radiance
        emission: Vec3,
    },
}

impl LightDescriptor {
    /// Pack into the fixed wire record, caching the sampled area
    pub fn to_uniform(&self) -> Light {
        match *self {
            LightDescriptor::Rect {
                position,
                u,
                v,
                emission,
            } => Light {
                position,
                emission,
                u,
                v,
                params: Vec3::ZERO,
                radius: 0.0,
                area: u.cross(v).length(),
                kind: LightKind::Rect as i32,
            },
            LightDescriptor::Sphere {
                position,
                radius,
                emission,
            } => Light {
                position,
                emission,
                u: Vec3::ZERO,
                v: Vec3::ZERO,
                params: Vec3::ZERO,
                radius,
                area: 4.0 * std::f32::consts::PI * radius * radius,
                kind: LightKind::Sphere as i32,
            },
            LightDescriptor::Distant {
                direction,
                emission,
            } => Light {
                // Delta light: position carries the direction
                position: direction.normalize_or_zero(),
                emission,
                u: Vec3::ZERO,
                v: Vec3::ZERO,
                params: Vec3::ZERO,
                radius: 0.0,
                area: 1.0,
                kind: LightKind::Distant as i32,
            },
        }
    }
}

/// Flat light record
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Light {
    /// Rect corner, sphere center, or travel direction for distant
    pub position: Vec3,
    /// Emitted radiance
    pub emission: Vec3,
    /// Rect first edge vector
    pub u: Vec3,
    /// Rect second edge vector
    pub v: Vec3,
    /// Reserved per-kind parameters
    pub params: Vec3,
    /// Sphere radius
    pub radius: f32,
    /// Cached surface area (1 for delta lights)
    pub area: f32,
    /// [`LightKind`] wire tag
    pub kind: i32,
}

impl Light {
    /// Slot filler for unused light entries
    pub fn empty() -> Self {
        Light {
            position: Vec3::ZERO,
            emission: Vec3::ZERO,
            u: Vec3::ZERO,
            v: Vec3::ZERO,
            params: Vec3::ZERO,
            radius: 0.0,
            area: 1.0,
            kind: LightKind::Rect as i32,
        }
    }
}

/// Oriented bounding frame for the model
///
/// `p` is the center, `l` the half extent per local axis, and `f` the
/// rotation from frame space to world space. March loops only step
/// inside the slab interval this frame yields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundingFrame {
    /// Frame center
    pub p: Vec3,
    /// Half extent per frame axis
    pub l: Vec3,
    /// Frame-to-world rotation
    pub f: Mat3,
}

impl Default for BoundingFrame {
    fn default() -> Self {
        BoundingFrame {
            p: Vec3::ZERO,
            l: Vec3::splat(4.0),
            f: Mat3::IDENTITY,
        }
    }
}

impl BoundingFrame {
    /// Axis-aligned frame centered at `p` with half extent `l`
    pub fn axis_aligned(p: Vec3, l: Vec3) -> Self {
        BoundingFrame {
            p,
            l,
            f: Mat3::IDENTITY,
        }
    }

    /// Whether a world point lies inside the frame
    pub fn contains(&self, point: Vec3) -> bool {
        let q = self.f.transpose() * (point - self.p);
        q.abs().cmple(self.l).all()
    }

    /// Ray/frame slab intersection
    ///
    /// Returns the `(t_enter, t_exit)` interval, or `None` when the
    /// ray misses the frame entirely.
    pub fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<(f32, f32)> {
        let inv = self.f.transpose();
        let o = inv * (origin - self.p);
        let d = inv * direction;

        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let (o, d, l) = (o[axis], d[axis], self.l[axis]);
            if d.abs() < 1e-12 {
                if o.abs() > l {
                    return None;
                }
            } else {
                let t0 = (-l - o) / d;
                let t1 = (l - o) / d;
                let (t0, t1) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
                t_min = t_min.max(t0);
                t_max = t_max.min(t1);
                if t_min > t_max {
                    return None;
                }
            }
        }
        Some((t_min, t_max))
    }
}

/// Authoring-side render scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderScene {
    /// Camera
    pub camera: Camera,
    /// Analytic lights, at most [`MAX_LIGHTS`]
    lights: Vec<LightDescriptor>,
    /// Radiance returned on ray miss (RGB + alpha)
    pub background: [f32; 4],
    /// Model bounding frame
    pub bounds: BoundingFrame,
    /// Samples per pixel per frame
    pub samples: i32,
    /// Hard path length cap
    pub max_depth: i32,
    /// March distance cap along a ray
    pub max_distance: f32,
    /// World scale multiplier for march tolerances
    pub scale: f32,
    /// Skip shadow rays, keeping indirect light untouched
    pub no_shadows: bool,
    /// Overlay the bounding frame edges on the primary hit
    pub show_bbox: bool,
}

impl Default for RenderScene {
    fn default() -> Self {
        RenderScene {
            camera: Camera::default(),
            lights: Vec::new(),
            background: [0.25, 0.25, 0.25, 1.0],
            bounds: BoundingFrame::default(),
            samples: 1,
            max_depth: 6,
            max_distance: 100.0,
            scale: 1.0,
            no_shadows: false,
            show_bbox: false,
        }
    }
}

impl RenderScene {
    /// Scene with the given camera and no lights
    pub fn new(camera: Camera) -> Self {
        RenderScene {
            camera,
            ..Default::default()
        }
    }

    /// Add a light, rejecting overflow past the fixed slots
    pub fn push_light(&mut self, light: LightDescriptor) -> Result<(), ModelError> {
        if self.lights.len() >= MAX_LIGHTS {
            return Err(ModelError::TooManyLights {
                count: self.lights.len() + 1,
                max: MAX_LIGHTS,
            });
        }
        self.lights.push(light);
        Ok(())
    }

    /// Current light list
    pub fn lights(&self) -> &[LightDescriptor] {
        &self.lights
    }

    /// Pack into the flat render record
    ///
    /// `random_vector` decorrelates the frame's sample streams and
    /// `sample_index` is the number of frames already accumulated.
    pub fn to_uniform(&self, random_vector: Vec3, sample_index: i32) -> Result<RenderUniform, ModelError> {
        if self.lights.len() > MAX_LIGHTS {
            return Err(ModelError::TooManyLights {
                count: self.lights.len(),
                max: MAX_LIGHTS,
            });
        }
        if !self.camera.origin.is_finite() || !self.camera.look_at.is_finite() {
            return Err(ModelError::NonFinite("camera"));
        }

        let mut lights = [Light::empty(); MAX_LIGHTS];
        for (slot, descriptor) in lights.iter_mut().zip(self.lights.iter()) {
            *slot = descriptor.to_uniform();
        }

        log::debug!(
            "packed render scene: {} lights, {} spp, depth cap {}",
            self.lights.len(),
            self.samples.max(1),
            self.max_depth
        );

        Ok(RenderUniform {
            random_vector,
            camera_origin: self.camera.origin,
            camera_look_at: self.camera.look_at,
            camera_fov: self.camera.fov,
            num_of_lights: self.lights.len() as i32,
            lights,
            background_color: self.background,
            scale: self.scale,
            samples: self.samples.max(1),
            depth: 0,
            sample_index: sample_index.max(0),
            max_depth: self.max_depth.max(1),
            no_shadows: self.no_shadows as i32,
            show_bbox: self.show_bbox as i32,
            p: self.bounds.p,
            l: self.bounds.l,
            f: self.bounds.f,
            max_distance: self.max_distance,
        })
    }
}

/// Flat per-frame render record
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RenderUniform {
    /// Frame random vector, keys the sample streams
    pub random_vector: Vec3,
    /// Camera eye position
    pub camera_origin: Vec3,
    /// Camera target
    pub camera_look_at: Vec3,
    /// Vertical field of view in degrees
    pub camera_fov: f32,
    /// Number of valid entries in `lights`
    pub num_of_lights: i32,
    /// Fixed light slots
    pub lights: [Light; MAX_LIGHTS],
    /// Miss radiance (RGB + alpha)
    pub background_color: [f32; 4],
    /// World scale multiplier for march tolerances
    pub scale: f32,
    /// Samples per pixel this frame
    pub samples: i32,
    /// Bounce depth paths start at, 0 for a full trace
    pub depth: i32,
    /// Frames already accumulated before this one
    pub sample_index: i32,
    /// Hard path length cap
    pub max_depth: i32,
    /// Nonzero skips shadow rays
    pub no_shadows: i32,
    /// Nonzero overlays the bounding frame
    pub show_bbox: i32,
    /// Bounding frame center
    pub p: Vec3,
    /// Bounding frame half extent
    pub l: Vec3,
    /// Bounding frame rotation
    pub f: Mat3,
    /// March distance cap
    pub max_distance: f32,
}

impl RenderUniform {
    /// Reject records with invalid counts or tags
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.num_of_lights < 0 || self.num_of_lights as usize > MAX_LIGHTS {
            return Err(ModelError::TooManyLights {
                count: self.num_of_lights.max(0) as usize,
                max: MAX_LIGHTS,
            });
        }
        for light in &self.lights[..self.num_of_lights as usize] {
            if LightKind::from_wire(light.kind).is_none() {
                return Err(ModelError::InvalidTag {
                    field: "light.kind",
                    value: light.kind,
                });
            }
        }
        Ok(())
    }

    /// Bounding frame view of the packed fields
    pub fn bounds(&self) -> BoundingFrame {
        BoundingFrame {
            p: self.p,
            l: self.l,
            f: self.f,
        }
    }
}

/// Flat accumulator record
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct AccumUniform {
    /// Number of frames merged so far
    pub samples: i32,
}

/// Flat record for interactive surface-hit queries
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ModelerHitUniform {
    /// Frame random vector
    pub random_vector: Vec3,
    /// Query position in pixels
    pub uv: glam::Vec2,
    /// Viewport size in pixels
    pub size: glam::Vec2,
    /// World scale multiplier
    pub scale: f32,
    /// Camera eye position
    pub camera_origin: Vec3,
    /// Camera target
    pub camera_look_at: Vec3,
    /// Vertical field of view in degrees
    pub camera_fov: f32,
}

/// Distance and material view of a scene for serialization round trips
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Render settings
    pub scene: RenderScene,
    /// Materials referenced by name in authoring tools
    pub named_materials: Vec<(String, Material)>,
}

impl SceneDocument {
    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String, ModelError> {
        serde_json::to_string_pretty(self).map_err(|e| ModelError::Serialization(e.to_string()))
    }

    /// Deserialize from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        serde_json::from_str(json).map_err(|e| ModelError::Serialization(e.to_string()))
    }
}
