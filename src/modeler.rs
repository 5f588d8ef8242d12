//! Edit commands and the flat upload record (Deep Fried Edition)
//!
//! A model is an ordered list of [`ModelerNode`] edit commands. The
//! authoring side works with typed enums and builder methods; `upload`
//! validates the list, clamps numeric degeneracy, and packs it into
//! the fixed-layout [`ModelerUniform`] records the evaluator and the
//! renderer consume.
//!
//! # Deep Fried Optimizations
//! - **Flat Records**: `#[repr(C)]` + `Pod`, so a packed command list
//!   is one `bytemuck::cast_slice` away from a byte buffer.
//! - **Validate Once**: All tag and finiteness checks happen at upload;
//!   the per-point evaluator never branches on bad data.
//!
//! Author: Moroya Sakamoto

use crate::material::{Material, MaterialMixer};
use crate::types::{Action, Hit, ModelError, Primitive, Role, MAX_NODES, MIN_SIZE};
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One edit command in authoring form
///
/// Spatial fields are world space; `rotation` is Euler XYZ degrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelerNode {
    /// Geometry-and-material or material-only
    pub role: Role,
    /// How the command combines with the field so far
    pub action: Action,
    /// Base shape
    pub primitive: Primitive,
    /// Shape center
    pub position: Vec3,
    /// Euler XYZ rotation in degrees
    pub rotation: Vec3,
    /// fBM surface displacement amplitude, 0 disables
    pub noise: f32,
    /// CSG blend radius, 0 for a hard edge
    pub smoothing: f32,
    /// Sphere and cylinder radius
    pub radius: f32,
    /// Box half extents; `size.y` is the cylinder half height
    pub size: Vec3,
    /// Edge rounding radius for box and cylinder
    pub rounding: f32,
    /// Heightfield base noise frequency
    pub height_frequency: f32,
    /// Heightfield fBM octave count
    pub height_octaves: f32,
    /// Heightfield displacement amplitude
    pub height_scale: f32,
    /// Repetition cell spacing, 0 disables repetition
    pub rep_distance: f32,
    /// Lower repetition cell-index limit
    pub rep_lower_limit: Vec3,
    /// Upper repetition cell-index limit
    pub rep_upper_limit: Vec3,
    /// Surface material
    pub material: Material,
    /// Secondary material for material-only repaints
    pub mix_material: Material,
    /// Per-channel blend configuration
    pub mixer: MaterialMixer,
    /// Strength of a material-only repaint in [0, 1]
    pub material_only_mixer_value: f32,
    /// Per-command random vector, seeds the noise lattice
    pub random_vector: Vec3,
    /// Brush anchor point from the interactive session
    pub brush_hit: Vec3,
    /// Whether the brush preview should be stamped
    pub write_brush: bool,
    /// Brush preview radius
    pub brush_size: f32,
    /// Stable command id assigned by the authoring layer
    pub id: i32,
}

impl Default for ModelerNode {
    fn default() -> Self {
        ModelerNode {
            role: Role::GeometryAndMaterial,
            action: Action::Add,
            primitive: Primitive::Sphere,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            noise: 0.0,
            smoothing: 0.0,
            radius: 1.0,
            size: Vec3::splat(0.5),
            rounding: 0.0,
            height_frequency: 2.0,
            height_octaves: 5.0,
            height_scale: 0.2,
            rep_distance: 0.0,
            rep_lower_limit: Vec3::splat(-1.0),
            rep_upper_limit: Vec3::splat(1.0),
            material: Material::default(),
            mix_material: Material::default(),
            mixer: MaterialMixer::default(),
            material_only_mixer_value: 1.0,
            random_vector: Vec3::ZERO,
            brush_hit: Vec3::ZERO,
            write_brush: false,
            brush_size: 0.05,
            id: 0,
        }
    }
}

impl ModelerNode {
    /// Sphere command with the given radius
    pub fn sphere(radius: f32) -> Self {
        ModelerNode {
            primitive: Primitive::Sphere,
            radius,
            ..Default::default()
        }
    }

    /// Box command with the given half extents
    pub fn box3d(half_extents: Vec3) -> Self {
        ModelerNode {
            primitive: Primitive::Box,
            size: half_extents,
            ..Default::default()
        }
    }

    /// Cylinder command with the given radius and half height
    pub fn cylinder(radius: f32, half_height: f32) -> Self {
        ModelerNode {
            primitive: Primitive::Cylinder,
            radius,
            size: Vec3::new(radius, half_height, radius),
            ..Default::default()
        }
    }

    /// Heightfield command with default frequency, octaves and scale
    pub fn heightfield() -> Self {
        ModelerNode {
            primitive: Primitive::Heightfield,
            ..Default::default()
        }
    }

    /// Builder: set the combine action
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// Builder: set the role
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Builder: move the command
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Builder: set the Euler XYZ rotation in degrees
    pub fn rotated(mut self, degrees: Vec3) -> Self {
        self.rotation = degrees;
        self
    }

    /// Builder: set the CSG blend radius
    pub fn with_smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Builder: set the surface noise amplitude
    pub fn with_noise(mut self, noise: f32) -> Self {
        self.noise = noise;
        self
    }

    /// Builder: set edge rounding
    pub fn with_rounding(mut self, rounding: f32) -> Self {
        self.rounding = rounding;
        self
    }

    /// Builder: set the surface material
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Builder: set finite repetition
    pub fn with_repetition(mut self, spacing: f32, lower: Vec3, upper: Vec3) -> Self {
        self.rep_distance = spacing;
        self.rep_lower_limit = lower;
        self.rep_upper_limit = upper;
        self
    }

    /// Check every numeric field for NaN and infinity
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.position.is_finite() || !self.rotation.is_finite() {
            return Err(ModelError::NonFinite("transform"));
        }
        if !self.size.is_finite() || !self.radius.is_finite() {
            return Err(ModelError::NonFinite("dimensions"));
        }
        if !(self.smoothing.is_finite()
            && self.noise.is_finite()
            && self.rounding.is_finite()
            && self.rep_distance.is_finite())
        {
            return Err(ModelError::NonFinite("modifiers"));
        }
        if !(self.height_frequency.is_finite()
            && self.height_octaves.is_finite()
            && self.height_scale.is_finite())
        {
            return Err(ModelError::NonFinite("heightfield"));
        }
        Ok(())
    }

    /// Pack into the flat wire record, clamping numeric degeneracy
    ///
    /// Zero or negative dimensions clamp to [`MIN_SIZE`] rather than
    /// collapsing the field.
    pub fn to_uniform(&self) -> ModelerUniform {
        let mut material = self.material;
        material.derive_anisotropy();
        let mut mix_material = self.mix_material;
        mix_material.derive_anisotropy();

        ModelerUniform {
            role_type: self.role as i32,
            action_type: self.action as i32,
            primitive_type: self.primitive as i32,
            id: self.id,
            random_vector: self.random_vector,
            position: self.position,
            rotation: self.rotation,
            noise: self.noise.max(0.0),
            smoothing: self.smoothing.max(0.0),
            radius: self.radius.max(MIN_SIZE),
            size: self.size.max(Vec3::splat(MIN_SIZE)),
            rounding: self.rounding.max(0.0),
            height_frequency: self.height_frequency.max(MIN_SIZE),
            height_octaves: self.height_octaves.clamp(1.0, 10.0),
            height_scale: self.height_scale.max(0.0),
            rep_distance: self.rep_distance.max(0.0),
            rep_lower_limit: self.rep_lower_limit,
            rep_upper_limit: self.rep_upper_limit.max(self.rep_lower_limit),
            normal: Vec3::ZERO,
            surface_distance: 0.0,
            material,
            mix_material,
            mixer: self.mixer,
            material_only_mixer_value: self.material_only_mixer_value.clamp(0.0, 1.0),
            brush_hit: self.brush_hit,
            write_brush: self.write_brush as i32,
            brush_size: self.brush_size.max(0.0),
        }
    }
}

/// Flat per-command record consumed by the evaluator
///
/// All fields are 4-byte aligned with no padding, so a command list
/// casts directly to bytes for upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ModelerUniform {
    /// [`Role`] wire tag
    pub role_type: i32,
    /// [`Action`] wire tag
    pub action_type: i32,
    /// [`Primitive`] wire tag
    pub primitive_type: i32,
    /// Stable command id
    pub id: i32,
    /// Per-command random vector
    pub random_vector: Vec3,
    /// Shape center
    pub position: Vec3,
    /// Euler XYZ rotation in degrees
    pub rotation: Vec3,
    /// Surface noise amplitude
    pub noise: f32,
    /// CSG blend radius
    pub smoothing: f32,
    /// Sphere and cylinder radius
    pub radius: f32,
    /// Half extents
    pub size: Vec3,
    /// Edge rounding radius
    pub rounding: f32,
    /// Heightfield noise frequency
    pub height_frequency: f32,
    /// Heightfield octave count (stored as float in the record)
    pub height_octaves: f32,
    /// Heightfield displacement amplitude
    pub height_scale: f32,
    /// Repetition cell spacing
    pub rep_distance: f32,
    /// Lower repetition cell-index limit
    pub rep_lower_limit: Vec3,
    /// Upper repetition cell-index limit
    pub rep_upper_limit: Vec3,
    /// Surface normal at the brush anchor, filled by [`record_hit`]
    ///
    /// [`record_hit`]: ModelerUniform::record_hit
    pub normal: Vec3,
    /// March distance to the brush anchor, filled by [`record_hit`]
    ///
    /// [`record_hit`]: ModelerUniform::record_hit
    pub surface_distance: f32,
    /// Surface material
    pub material: Material,
    /// Secondary material for repaints
    pub mix_material: Material,
    /// Per-channel blend configuration
    pub mixer: MaterialMixer,
    /// Repaint strength
    pub material_only_mixer_value: f32,
    /// Brush anchor point
    pub brush_hit: Vec3,
    /// Brush stamp flag (0 or 1)
    pub write_brush: i32,
    /// Brush preview radius
    pub brush_size: f32,
}

impl ModelerUniform {
    /// Reject records whose tags fall outside the closed enums
    pub fn validate(&self) -> Result<(), ModelError> {
        if Role::from_wire(self.role_type).is_none() {
            return Err(ModelError::InvalidTag {
                field: "role_type",
                value: self.role_type,
            });
        }
        if Action::from_wire(self.action_type).is_none() {
            return Err(ModelError::InvalidTag {
                field: "action_type",
                value: self.action_type,
            });
        }
        if Primitive::from_wire(self.primitive_type).is_none() {
            return Err(ModelError::InvalidTag {
                field: "primitive_type",
                value: self.primitive_type,
            });
        }
        Ok(())
    }

    /// Write an interactive hit query result onto the record
    ///
    /// Anchors the brush at the struck surface point so the next stamp
    /// lands where the pointer hovered.
    pub fn record_hit(&mut self, hit: &Hit) {
        self.brush_hit = hit.point;
        self.normal = hit.normal;
        self.surface_distance = hit.distance;
    }
}

/// Validate and pack an ordered command list for evaluation
///
/// Rejects lists over [`MAX_NODES`] outright; a truncated model would
/// silently render the wrong shape.
pub fn upload(nodes: &[ModelerNode]) -> Result<Vec<ModelerUniform>, ModelError> {
    if nodes.len() > MAX_NODES {
        return Err(ModelError::TooManyNodes {
            count: nodes.len(),
            max: MAX_NODES,
        });
    }
    for node in nodes {
        node.validate()?;
    }
    let uniforms: Vec<ModelerUniform> = nodes.iter().map(ModelerNode::to_uniform).collect();
    log::debug!(
        "uploaded {} modeler commands ({} bytes)",
        uniforms.len(),
        std::mem::size_of_val(uniforms.as_slice())
    );
    Ok(uniforms)
}
