//! # ALICE-Modeler
//!
//! **A.L.I.C.E. - Adaptive Lightweight Implicit Construction Engine**
//!
//! A signed-distance-field modeler coupled to a progressive Monte
//! Carlo path tracer. Models are ordered lists of edit commands
//! (primitive + CSG action + material); rendering folds the list into
//! a distance/material field and sphere-traces it, no meshes anywhere.
//!
//! ## Features
//!
//! - **Primitives**: Sphere, Box, Cylinder, fBM Heightfield
//! - **CSG Actions**: Clear, Add, Subtract with polynomial smoothing
//! - **Materials**: Disney-style channels with a per-channel mixer
//! - **Lights**: Rect, Sphere, Distant (at most four per scene)
//! - **Rendering**: Path tracing with next-event estimation and a
//!   progressive running-mean accumulator
//! - **Flat Records**: Every GPU-facing struct is `#[repr(C)]` + `Pod`
//!
//! ## Example
//!
//! ```rust
//! use alice_modeler::prelude::*;
//!
//! // A sphere with a box carved out of it
//! let nodes = upload(&[
//!     ModelerNode::sphere(1.0),
//!     ModelerNode::box3d(Vec3::splat(0.6))
//!         .with_action(Action::Subtract)
//!         .with_smoothing(0.1),
//! ]).unwrap();
//!
//! // Distance at a point
//! let d = field_distance(&nodes, Vec3::ZERO);
//! assert!(d > 0.0); // carved out
//!
//! // One progressive frame
//! let mut scene = RenderScene::default();
//! scene.push_light(LightDescriptor::Distant {
//!     direction: Vec3::new(0.2, -1.0, 0.1),
//!     emission: Vec3::splat(3.0),
//! }).unwrap();
//! let uniform = scene.to_uniform(Vec3::new(0.1, 0.5, 0.9), 0).unwrap();
//! let frame = render_frame(&uniform, &nodes, 32, 32).unwrap();
//! let mut accum = Accumulator::new(32, 32);
//! accum.accumulate_frame(&frame).unwrap();
//! ```
//!
//! ## Author
//!
//! Moroya Sakamoto

#![warn(missing_docs)]

pub mod field;
pub mod material;
pub mod modeler;
pub mod noise;
pub mod operations;
pub mod primitives;
pub mod render;
pub mod scene;
pub mod types;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::field::{
        field_distance, field_distance_batch, field_distance_batch_parallel, field_normal,
        field_sample, FieldSample,
    };
    pub use crate::material::{mix_materials, ChannelMixer, Material, MaterialMixer};
    pub use crate::modeler::{upload, ModelerNode, ModelerUniform};
    pub use crate::operations::{blend_weight, repeat_clamped, smooth_max, smooth_min};
    pub use crate::primitives::*;
    pub use crate::render::accum::{accumulate, Accumulator};
    pub use crate::render::integrator::{march, trace_radiance};
    pub use crate::render::rng::PathRng;
    pub use crate::render::{camera_ray, render_frame, scene_hit};
    pub use crate::scene::{
        AccumUniform, BoundingFrame, Camera, Light, LightDescriptor, ModelerHitUniform,
        RenderScene, RenderUniform, SceneDocument,
    };
    pub use crate::types::{
        Action, BlendMode, Hit, LightKind, ModelError, Primitive, Ray, Role, MAX_LIGHTS, MAX_NODES,
    };
    pub use glam::{Mat3, Quat, Vec2, Vec3, Vec4};
}

pub use field::{field_distance, field_sample};
pub use modeler::{upload, ModelerNode};
pub use render::render_frame;
pub use scene::RenderScene;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_basic_workflow() {
        // Model: sphere with a hole carved out
        let nodes = upload(&[
            ModelerNode::sphere(1.0),
            ModelerNode::box3d(Vec3::splat(0.5)).with_action(Action::Subtract),
        ])
        .unwrap();
        assert!(field_distance(&nodes, Vec3::ZERO) > 0.0);
        assert!(field_distance(&nodes, Vec3::new(0.9, 0.0, 0.0)) < 0.0);

        // Scene: one sun, one frame, one accumulation step
        let mut scene = RenderScene::default();
        scene
            .push_light(LightDescriptor::Distant {
                direction: Vec3::new(0.0, -1.0, 0.2),
                emission: Vec3::splat(2.0),
            })
            .unwrap();
        let uniform = scene.to_uniform(Vec3::new(0.3, 0.3, 0.3), 0).unwrap();
        let frame = render_frame(&uniform, &nodes, 8, 8).unwrap();
        let mut accum = Accumulator::new(8, 8);
        accum.accumulate_frame(&frame).unwrap();
        assert_eq!(accum.samples(), 1);
        assert_eq!(accum.buffer(), frame.as_slice());
    }
}
