//! Core types for the modeler and renderer (Deep Fried Edition)
//!
//! Closed enums for the edit-command wire contract, ray/hit geometry,
//! and the error taxonomy shared by every subsystem.
//!
//! # Deep Fried Optimizations
//! - **i32 Discriminants**: Enum tags match the flat uniform records
//!   one-to-one, so encoding is a cast and decoding is a single match.
//!
//! Author: Moroya Sakamoto

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of analytic lights per scene
pub const MAX_LIGHTS: usize = 4;

/// Maximum number of edit commands in a single upload
pub const MAX_NODES: usize = 256;

/// Smallest usable primitive dimension; degenerate inputs clamp here
pub const MIN_SIZE: f32 = 1e-4;

/// Empty-field distance, the fold accumulator seed
pub const FIELD_EMPTY: f32 = 1.0e5;

/// How an edit command combines with the field built so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum Action {
    /// Command is disabled; evaluation skips it entirely
    None = 0,
    /// Reset the accumulator to this command's distance and material
    Clear = 1,
    /// Smooth union with the accumulated field
    Add = 2,
    /// Smooth subtraction from the accumulated field
    Subtract = 3,
}

impl Action {
    /// Decode a wire tag, rejecting values outside the closed set
    #[inline]
    pub fn from_wire(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(Action::None),
            1 => Some(Action::Clear),
            2 => Some(Action::Add),
            3 => Some(Action::Subtract),
            _ => None,
        }
    }
}

/// Base shape of an edit command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum Primitive {
    /// Sphere, parameterized by `radius`
    Sphere = 0,
    /// Rounded box, parameterized by `size` (half extents) and `rounding`
    Box = 1,
    /// Rounded cylinder along Y, parameterized by `radius`, `size.y`, `rounding`
    Cylinder = 2,
    /// Displaced ground plane driven by analytic fBM noise
    Heightfield = 3,
}

impl Primitive {
    /// Decode a wire tag, rejecting values outside the closed set
    #[inline]
    pub fn from_wire(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(Primitive::Sphere),
            1 => Some(Primitive::Box),
            2 => Some(Primitive::Cylinder),
            3 => Some(Primitive::Heightfield),
            _ => None,
        }
    }
}

/// Whether a command writes geometry or only repaints material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum Role {
    /// Geometry and material both contribute to the fold
    GeometryAndMaterial = 0,
    /// Distance is left untouched; material blends inside the band
    MaterialOnly = 1,
}

impl Role {
    /// Decode a wire tag, rejecting values outside the closed set
    #[inline]
    pub fn from_wire(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(Role::GeometryAndMaterial),
            1 => Some(Role::MaterialOnly),
            _ => None,
        }
    }
}

/// Per-channel material blend curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum BlendMode {
    /// Plain lerp on the band weight
    Linear = 0,
    /// Band weight perturbed by value noise before the lerp
    ValueNoise = 1,
    /// Band weight driven by signed-distance depth into the surface
    Depth = 2,
}

impl BlendMode {
    /// Decode a wire tag, rejecting values outside the closed set
    #[inline]
    pub fn from_wire(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(BlendMode::Linear),
            1 => Some(BlendMode::ValueNoise),
            2 => Some(BlendMode::Depth),
            _ => None,
        }
    }
}

/// Analytic light shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum LightKind {
    /// Rectangular area light spanned by two edge vectors
    Rect = 0,
    /// Spherical area light
    Sphere = 1,
    /// Distant directional light (sun), a delta distribution
    Distant = 2,
}

impl LightKind {
    /// Decode a wire tag, rejecting values outside the closed set
    #[inline]
    pub fn from_wire(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(LightKind::Rect),
            1 => Some(LightKind::Sphere),
            2 => Some(LightKind::Distant),
            _ => None,
        }
    }
}

/// Ray for raycasting and path tracing
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ray {
    /// Ray origin
    pub origin: Vec3,
    /// Ray direction (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray (direction will be normalized)
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Ray {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get point along ray at parameter t
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Sphere-trace hit information
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    /// Distance along the ray
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Surface normal at the hit point
    pub normal: Vec3,
    /// Number of march steps taken
    pub steps: u32,
}

/// Errors raised while validating and uploading scene data
#[derive(Error, Debug)]
pub enum ModelError {
    /// Wire tag does not name a member of a closed enum
    #[error("invalid {field} tag: {value}")]
    InvalidTag {
        /// Name of the offending record field
        field: &'static str,
        /// The rejected wire value
        value: i32,
    },

    /// More edit commands than the upload capacity
    #[error("too many nodes: {count} exceeds capacity {max}")]
    TooManyNodes {
        /// Number of commands submitted
        count: usize,
        /// Upload capacity
        max: usize,
    },

    /// More lights than the fixed uniform slots
    #[error("too many lights: {count} exceeds capacity {max}")]
    TooManyLights {
        /// Number of lights submitted
        count: usize,
        /// Fixed light slot count
        max: usize,
    },

    /// A numeric field is NaN or infinite
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    /// Frame dimensions with a zero axis
    #[error("degenerate frame size: {width}x{height}")]
    FrameSize {
        /// Requested width in pixels
        width: usize,
        /// Requested height in pixels
        height: usize,
    },

    /// Frame buffer dimensions do not match the accumulator
    #[error("buffer size mismatch: expected {expected} pixels, got {actual}")]
    BufferSize {
        /// Pixel count the accumulator was created with
        expected: usize,
        /// Pixel count of the submitted frame
        actual: usize,
    },

    /// Serialization error from scene I/O
    #[error("serialization error: {0}")]
    Serialization(String),
}
