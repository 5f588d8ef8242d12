//! Progressive path-traced rendering (Deep Fried Edition)
//!
//! `render_frame` dispatches one frame: every pixel traces its samples
//! independently, rows fan out over rayon, and nothing is shared
//! mutably, so a frame is a pure function of (uniform, commands,
//! resolution). Pair it with [`accum::Accumulator`] for progressive
//! refinement and [`scene_hit`] for interactive brush queries.
//!
//! Author: Moroya Sakamoto

pub mod accum;
pub mod integrator;
pub mod rng;
pub mod sampling;

use crate::modeler::ModelerUniform;
use crate::scene::{ModelerHitUniform, RenderUniform};
use crate::types::{Hit, ModelError, Ray};
use glam::{Vec2, Vec3, Vec4};
use integrator::{march, trace_radiance};
use rayon::prelude::*;
use rng::PathRng;

/// Build a camera ray through a normalized device coordinate
///
/// `ndc` is [-1, 1] on both axes, `aspect` width over height.
pub fn camera_ray(origin: Vec3, look_at: Vec3, fov_deg: f32, ndc: Vec2, aspect: f32) -> Ray {
    let forward = (look_at - origin).normalize_or_zero();
    let mut right = forward.cross(Vec3::Y).normalize_or_zero();
    if right == Vec3::ZERO {
        // Looking straight up or down
        right = Vec3::X;
    }
    let up = right.cross(forward);
    let half = (fov_deg.to_radians() * 0.5).tan();
    Ray::new(
        origin,
        forward + right * (ndc.x * half * aspect) + up * (ndc.y * half),
    )
}

/// Render one frame, returning row-major RGBA radiance
///
/// Sample streams are keyed on (frame seed, pixel index, global sample
/// index), so two dispatches with the same uniform produce identical
/// buffers.
pub fn render_frame(
    uniform: &RenderUniform,
    nodes: &[ModelerUniform],
    width: usize,
    height: usize,
) -> Result<Vec<Vec4>, ModelError> {
    if width == 0 || height == 0 {
        return Err(ModelError::FrameSize { width, height });
    }
    uniform.validate()?;
    for node in nodes {
        node.validate()?;
    }

    let aspect = width as f32 / height as f32;
    let spp = uniform.samples.max(1) as u32;
    let sample_base = uniform.sample_index.max(0) as u32 * spp;
    log::debug!(
        "render dispatch {}x{}, {} spp, sample base {}",
        width,
        height,
        spp,
        sample_base
    );

    let mut pixels = vec![Vec4::ZERO; width * height];
    pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                let invocation = (y * width + x) as u32;
                let mut color = Vec3::ZERO;
                for s in 0..spp {
                    let mut rng = PathRng::new(uniform.random_vector, invocation, sample_base + s);
                    let jitter = rng.next_vec2();
                    let ndc = Vec2::new(
                        ((x as f32 + jitter.x) / width as f32) * 2.0 - 1.0,
                        1.0 - ((y as f32 + jitter.y) / height as f32) * 2.0,
                    );
                    let ray = camera_ray(
                        uniform.camera_origin,
                        uniform.camera_look_at,
                        uniform.camera_fov,
                        ndc,
                        aspect,
                    );
                    color += trace_radiance(uniform, nodes, ray, &mut rng);
                }
                color /= spp as f32;
                *pixel = Vec4::new(color.x, color.y, color.z, 1.0);
            }
        });

    Ok(pixels)
}

/// Surface hit under a viewport coordinate, for interactive brushes
///
/// Marches the full field along the camera ray through `hit.uv` and
/// returns the surface point and normal, or `None` over background.
pub fn scene_hit(query: &ModelerHitUniform, nodes: &[ModelerUniform]) -> Option<Hit> {
    if query.size.x < 1.0 || query.size.y < 1.0 {
        return None;
    }
    let aspect = query.size.x / query.size.y;
    let ndc = Vec2::new(
        (query.uv.x / query.size.x) * 2.0 - 1.0,
        1.0 - (query.uv.y / query.size.y) * 2.0,
    );
    let ray = camera_ray(
        query.camera_origin,
        query.camera_look_at,
        query.camera_fov,
        ndc,
        aspect,
    );
    march(nodes, ray.origin, ray.direction, 1e-3, 100.0, query.scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modeler::{upload, ModelerNode};
    use crate::scene::{LightDescriptor, RenderScene};

    fn test_scene() -> (RenderUniform, Vec<ModelerUniform>) {
        let nodes = upload(&[ModelerNode::sphere(1.0)]).unwrap();
        let mut scene = RenderScene::default();
        scene
            .push_light(LightDescriptor::Distant {
                direction: Vec3::new(0.2, -1.0, 0.3),
                emission: Vec3::splat(3.0),
            })
            .unwrap();
        let uniform = scene.to_uniform(Vec3::new(0.4, 0.1, 0.7), 0).unwrap();
        (uniform, nodes)
    }

    #[test]
    fn test_camera_ray_center() {
        let ray = camera_ray(Vec3::new(0.0, 0.0, -3.0), Vec3::ZERO, 80.0, Vec2::ZERO, 1.0);
        assert!((ray.direction - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_camera_ray_degenerate_forward() {
        // Looking straight down must still yield a valid frame
        let ray = camera_ray(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, 60.0, Vec2::new(0.5, 0.0), 1.0);
        assert!(ray.direction.is_finite());
        assert!((ray.direction.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_render_frame_deterministic() {
        let (uniform, nodes) = test_scene();
        let a = render_frame(&uniform, &nodes, 16, 16).unwrap();
        let b = render_frame(&uniform, &nodes, 16, 16).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_render_frame_corner_is_background() {
        let (uniform, nodes) = test_scene();
        let pixels = render_frame(&uniform, &nodes, 32, 32).unwrap();
        // Top-left corner looks past the sphere
        let c = pixels[0];
        assert!((c.x - 0.25).abs() < 1e-4);
        assert_eq!(c.w, 1.0);
    }

    #[test]
    fn test_render_frame_center_differs_from_background() {
        let (uniform, nodes) = test_scene();
        let pixels = render_frame(&uniform, &nodes, 32, 32).unwrap();
        let center = pixels[16 * 32 + 16];
        assert!((Vec3::new(center.x, center.y, center.z) - Vec3::splat(0.25)).length() > 1e-3);
    }

    #[test]
    fn test_render_rejects_zero_dimensions() {
        let (uniform, nodes) = test_scene();
        assert!(matches!(
            render_frame(&uniform, &nodes, 0, 8),
            Err(ModelError::FrameSize { width: 0, height: 8 })
        ));
        assert!(matches!(
            render_frame(&uniform, &nodes, 8, 0),
            Err(ModelError::FrameSize { width: 8, height: 0 })
        ));
    }

    #[test]
    fn test_render_rejects_bad_tags() {
        let (uniform, mut nodes) = test_scene();
        nodes[0].action_type = 77;
        assert!(render_frame(&uniform, &nodes, 8, 8).is_err());
    }

    #[test]
    fn test_scene_hit_center_of_sphere() {
        let (_, nodes) = test_scene();
        let query = ModelerHitUniform {
            random_vector: Vec3::ZERO,
            uv: Vec2::new(32.0, 32.0),
            size: Vec2::new(64.0, 64.0),
            scale: 1.0,
            camera_origin: Vec3::new(0.0, 0.0, -3.0),
            camera_look_at: Vec3::ZERO,
            camera_fov: 80.0,
        };
        let hit = scene_hit(&query, &nodes).unwrap();
        assert!((hit.distance - 2.0).abs() < 0.02);
        assert!(hit.normal.z < -0.9);
    }

    #[test]
    fn test_scene_hit_anchors_brush_command() {
        let (_, nodes) = test_scene();
        let query = ModelerHitUniform {
            random_vector: Vec3::ZERO,
            uv: Vec2::new(32.0, 32.0),
            size: Vec2::new(64.0, 64.0),
            scale: 1.0,
            camera_origin: Vec3::new(0.0, 0.0, -3.0),
            camera_look_at: Vec3::ZERO,
            camera_fov: 80.0,
        };
        let hit = scene_hit(&query, &nodes).unwrap();
        let mut brush = ModelerNode::sphere(0.1).to_uniform();
        brush.record_hit(&hit);
        assert_eq!(brush.brush_hit, hit.point);
        assert_eq!(brush.normal, hit.normal);
        assert_eq!(brush.surface_distance, hit.distance);
    }

    #[test]
    fn test_scene_hit_misses_background() {
        let (_, nodes) = test_scene();
        let query = ModelerHitUniform {
            random_vector: Vec3::ZERO,
            uv: Vec2::new(1.0, 1.0),
            size: Vec2::new(64.0, 64.0),
            scale: 1.0,
            camera_origin: Vec3::new(0.0, 0.0, -3.0),
            camera_look_at: Vec3::ZERO,
            camera_fov: 80.0,
        };
        assert!(scene_hit(&query, &nodes).is_none());
    }
}
