//! # Object Picking
//!
//! Mouse ray-casting against the scene: convert the pointer position to a
//! world-space ray, intersect it with every mesh node's world-space AABB,
//! and return the nearest hit. The hit resolver then walks the node's
//! ownership chain to find a registered interactable.

use cgmath::{
    ElementWise, EuclideanSpace, InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4, Zero,
};

use crate::gfx::{camera::orbit_camera::OrbitCamera, scene::Scene};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Create an AABB from a set of vertices
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        if vertices.is_empty() {
            return Self::new(Vector3::zero(), Vector3::zero());
        }

        let mut min = Vector3::new(vertices[0][0], vertices[0][1], vertices[0][2]);
        let mut max = min;

        for vertex in vertices.iter().skip(1) {
            let v = Vector3::new(vertex[0], vertex[1], vertex[2]);
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            min.z = min.z.min(v.z);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
            max.z = max.z.max(v.z);
        }

        Self::new(min, max)
    }

    /// Slab test. Returns the distance to the entry point, or the exit point
    /// when the ray starts inside the box; `None` on a miss.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// Apply a transformation matrix, re-bounding the eight corners.
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners = [
            Vector3::new(self.min.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.max.z),
        ];

        let mut transformed_corners = Vec::with_capacity(8);
        for corner in &corners {
            let homogeneous = Vector4::new(corner.x, corner.y, corner.z, 1.0);
            let transformed = matrix * homogeneous;
            transformed_corners.push([
                transformed.x / transformed.w,
                transformed.y / transformed.w,
                transformed.z / transformed.w,
            ]);
        }

        Self::from_vertices(&transformed_corners)
    }
}

/// Result of a picking operation
#[derive(Debug, Clone)]
pub struct PickResult {
    /// Index of the picked node in the scene arena
    pub node_index: usize,
    /// Distance from the ray origin to the intersection point
    pub distance: f32,
    /// World space intersection point
    pub intersection_point: Vector3<f32>,
}

/// Picks scene nodes under the mouse. Local-space AABBs are cached per node
/// index; world transforms are applied fresh every query.
pub struct ScenePicker {
    cached_aabbs: Vec<Option<Aabb>>,
}

impl ScenePicker {
    pub fn new() -> Self {
        Self {
            cached_aabbs: Vec::new(),
        }
    }

    /// Convert a pointer position to a world-space ray.
    ///
    /// Screen coordinates map to normalized device coordinates in [-1, 1]
    /// with Y flipped, then through the inverse view-projection to the near
    /// and far planes.
    pub fn screen_to_ray(
        &self,
        screen_pos: (f32, f32),
        screen_size: (f32, f32),
        camera: &OrbitCamera,
    ) -> Ray {
        let (mouse_x, mouse_y) = screen_pos;
        let (screen_width, screen_height) = screen_size;

        let ndc_x = (2.0 * mouse_x) / screen_width - 1.0;
        let ndc_y = 1.0 - (2.0 * mouse_y) / screen_height;

        let eye = cgmath::Point3::from_vec(camera.eye);
        let target = cgmath::Point3::from_vec(camera.target);
        let view_matrix = Matrix4::look_at_rh(eye, target, camera.up);
        let proj_matrix = cgmath::perspective(camera.fovy, camera.aspect, camera.znear, camera.zfar);

        let view_proj_matrix = proj_matrix * view_matrix;
        let inv_view_proj = view_proj_matrix.invert().unwrap_or(Matrix4::from_scale(1.0));

        let near_point = Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far_point = Vector4::new(ndc_x, ndc_y, 1.0, 1.0);

        let world_near = inv_view_proj * near_point;
        let world_far = inv_view_proj * far_point;

        let near_3d = Vector3::new(
            world_near.x / world_near.w,
            world_near.y / world_near.w,
            world_near.z / world_near.w,
        );
        let far_3d = Vector3::new(
            world_far.x / world_far.w,
            world_far.y / world_far.w,
            world_far.z / world_far.w,
        );

        Ray::new(near_3d, far_3d - near_3d)
    }

    /// Pick the nearest visible mesh node under the pointer.
    pub fn pick(
        &mut self,
        screen_pos: (f32, f32),
        screen_size: (f32, f32),
        camera: &OrbitCamera,
        scene: &Scene,
    ) -> Option<PickResult> {
        let ray = self.screen_to_ray(screen_pos, screen_size, camera);

        while self.cached_aabbs.len() < scene.nodes.len() {
            self.cached_aabbs.push(None);
        }

        let mut closest_result: Option<PickResult> = None;

        for (i, node) in scene.nodes.iter().enumerate() {
            if !node.visible || node.meshes.is_empty() {
                continue;
            }

            let aabb = match &self.cached_aabbs[i] {
                Some(cached) => *cached,
                None => {
                    let aabb = compute_node_aabb(node);
                    self.cached_aabbs[i] = Some(aabb);
                    aabb
                }
            };

            let world_aabb = aabb.transform(&scene.world_transform(i));

            if let Some(distance) = world_aabb.intersect_ray(&ray) {
                if closest_result
                    .as_ref()
                    .map_or(true, |result| distance < result.distance)
                {
                    closest_result = Some(PickResult {
                        node_index: i,
                        distance,
                        intersection_point: ray.point_at(distance),
                    });
                }
            }
        }

        closest_result
    }

    /// Invalidate cached AABBs (call when mesh geometry changes).
    pub fn invalidate_cache(&mut self) {
        self.cached_aabbs.clear();
    }
}

impl Default for ScenePicker {
    fn default() -> Self {
        Self::new()
    }
}

fn compute_node_aabb(node: &crate::gfx::scene::SceneNode) -> Aabb {
    let mut all_vertices = Vec::new();
    for mesh in &node.meshes {
        for vertex in mesh.vertices() {
            all_vertices.push(vertex.position);
        }
    }

    if all_vertices.is_empty() {
        Aabb::new(Vector3::new(-0.5, -0.5, -0.5), Vector3::new(0.5, 0.5, 0.5))
    } else {
        Aabb::from_vertices(&all_vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{camera_controller::CameraController, camera_utils::CameraManager};
    use crate::gfx::geometry::generate_cylinder;
    use crate::gfx::scene::SceneNode;
    use cgmath::Rad;

    #[test]
    fn aabb_bounds_cover_all_vertices() {
        let vertices = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [-1.0, -1.0, -1.0]];
        let aabb = Aabb::from_vertices(&vertices);

        assert_eq!(aabb.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn ray_hits_and_misses_a_unit_box() {
        let aabb = Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));

        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray).is_some());

        let ray_miss = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray_miss).is_none());
    }

    #[test]
    fn center_ray_points_at_the_orbit_target() {
        let camera = OrbitCamera::new(
            Vector3::new(18.0, 12.0, 18.0),
            Vector3::new(0.0, 0.0, 0.0),
            Rad(std::f32::consts::FRAC_PI_4),
            1.5,
        );
        let picker = ScenePicker::new();
        let ray = picker.screen_to_ray((600.0, 400.0), (1200.0, 800.0), &camera);

        let to_target = (camera.target - camera.eye).normalize();
        assert!((ray.direction - to_target).magnitude() < 1e-3);
    }

    #[test]
    fn pick_returns_the_nearest_of_two_nodes() {
        let camera = OrbitCamera::new(
            Vector3::new(0.0, 0.0, 20.0),
            Vector3::new(0.0, 0.0, 0.0),
            Rad(std::f32::consts::FRAC_PI_4),
            1.0,
        );
        let manager = CameraManager::new(camera, CameraController::new(0.005, 0.1));
        let mut scene = Scene::new(manager);

        let mut near = SceneNode::new("near", vec![generate_cylinder(1.0, 1.0, 2.0, 8).into_mesh()]);
        near.set_translation(Vector3::new(0.0, 0.0, 5.0));
        scene.add_node(near);

        let mut far = SceneNode::new("far", vec![generate_cylinder(1.0, 1.0, 2.0, 8).into_mesh()]);
        far.set_translation(Vector3::new(0.0, 0.0, -5.0));
        scene.add_node(far);

        let mut picker = ScenePicker::new();
        let result = picker
            .pick((400.0, 300.0), (800.0, 600.0), &scene.camera_manager.camera, &scene)
            .expect("center ray should hit both cylinders");
        assert_eq!(scene.nodes[result.node_index].name, "near");
    }

    #[test]
    fn invisible_nodes_are_skipped() {
        let camera = OrbitCamera::new(
            Vector3::new(0.0, 0.0, 20.0),
            Vector3::new(0.0, 0.0, 0.0),
            Rad(std::f32::consts::FRAC_PI_4),
            1.0,
        );
        let manager = CameraManager::new(camera, CameraController::new(0.005, 0.1));
        let mut scene = Scene::new(manager);
        let node = scene.add_node(SceneNode::new(
            "hidden",
            vec![generate_cylinder(1.0, 1.0, 2.0, 8).into_mesh()],
        ));
        scene.nodes[node].visible = false;

        let mut picker = ScenePicker::new();
        assert!(picker
            .pick((400.0, 300.0), (800.0, 600.0), &scene.camera_manager.camera, &scene)
            .is_none());
    }
}
