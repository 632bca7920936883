use std::path::Path;

use cgmath::Matrix4;
use log::{debug, error, info};
use wgpu::Device;

use crate::error::AssetError;
use crate::gfx::{
    camera::camera_utils::CameraManager,
    resources::material::{Material, MaterialManager},
};

use super::node::{Mesh, SceneNode};

/// Scene arena: nodes addressed by index, with parent links forming the
/// ownership chain the hit resolver walks. A node's parent always has a
/// smaller index, so world transforms can be resolved in one forward pass.
pub struct Scene {
    pub camera_manager: CameraManager,
    pub nodes: Vec<SceneNode>,
    pub material_manager: MaterialManager,
}

impl Scene {
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            nodes: Vec::new(),
            material_manager: MaterialManager::new(),
        }
    }

    /// Adds a root-level node, returning its index.
    pub fn add_node(&mut self, node: SceneNode) -> usize {
        debug_assert!(node.parent.is_none());
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Adds a node under `parent`, returning its index.
    pub fn add_child(&mut self, parent: usize, mut node: SceneNode) -> usize {
        assert!(parent < self.nodes.len(), "parent index out of bounds");
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn node(&self, index: usize) -> Option<&SceneNode> {
        self.nodes.get(index)
    }

    pub fn node_mut(&mut self, index: usize) -> Option<&mut SceneNode> {
        self.nodes.get_mut(index)
    }

    /// World transform of a node, composed by walking the parent chain.
    pub fn world_transform(&self, index: usize) -> Matrix4<f32> {
        let mut matrix = self.nodes[index].transform;
        let mut current = index;
        while let Some(parent) = self.nodes[current].parent {
            matrix = self.nodes[parent].transform * matrix;
            current = parent;
        }
        matrix
    }

    /// World-space position of a node's origin.
    pub fn world_position(&self, index: usize) -> cgmath::Vector3<f32> {
        let m = self.world_transform(index);
        cgmath::Vector3::new(m.w.x, m.w.y, m.w.z)
    }

    /// Updates per-frame scene state: camera matrices and the cached world
    /// transforms (valid because parents precede children in the arena).
    pub fn update(&mut self) {
        self.camera_manager.camera.update_view_proj();
        for i in 0..self.nodes.len() {
            let world = match self.nodes[i].parent {
                Some(parent) => self.nodes[parent].world_transform * self.nodes[i].transform,
                None => self.nodes[i].transform,
            };
            self.nodes[i].world_transform = world;
        }
    }

    /// Loads an OBJ model as a group node with one child per sub-mesh.
    ///
    /// Materials from the MTL file are registered with the material manager
    /// and every mesh is set to cast and receive shadows. Mesh names are
    /// logged once as a diagnostic, matching what artists see in their DCC
    /// tool. Returns the group node's index.
    pub fn load_model(&mut self, path: &str, group_name: &str) -> Result<usize, AssetError> {
        let (models, materials) = tobj::load_obj(
            Path::new(path),
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .map_err(|source| AssetError::Model {
            path: path.into(),
            source,
        })?;

        let materials = materials.unwrap_or_else(|err| {
            debug!("No MTL companion for {path}: {err}. Using default materials");
            Vec::new()
        });

        for (i, mtl) in materials.iter().enumerate() {
            let material_name = material_name_for(mtl, i);
            if self.material_manager.get_material(&material_name).is_some() {
                continue;
            }

            let diffuse = mtl.diffuse.unwrap_or([0.8, 0.8, 0.8]);
            let material = Material::new(
                &material_name,
                [
                    diffuse[0],
                    diffuse[1],
                    diffuse[2],
                    mtl.dissolve.unwrap_or(1.0),
                ],
                0.0,
                1.0 - (mtl.shininess.unwrap_or(32.0) / 128.0).clamp(0.0, 1.0),
            );
            self.material_manager.add_material(material);
        }

        let group_name = self.ensure_unique_name(group_name);
        let group = self.add_node(SceneNode::group(group_name.clone()));

        info!("--- {} mesh names ---", group_name);
        for m in models.iter() {
            let mesh = &m.mesh;
            let normals = if !mesh.normals.is_empty() && mesh.normals.len() == mesh.positions.len()
            {
                mesh.normals.clone()
            } else {
                Mesh::calculate_face_normals(&mesh.positions, &mesh.indices)
            };

            info!("  {}", m.name);

            let mut node = SceneNode::new(
                m.name.clone(),
                vec![Mesh::new(mesh.positions.clone(), normals, mesh.indices.clone())],
            );
            node.cast_shadow = true;
            node.receive_shadow = true;

            if let Some(material_id) = mesh.material_id {
                if material_id < materials.len() {
                    node.set_material(&material_name_for(&materials[material_id], material_id));
                }
            }

            self.add_child(group, node);
        }

        Ok(group)
    }

    /// Like [`Scene::load_model`] but degrades to an empty scene on failure:
    /// the error is logged and `None` returned, leaving nothing to interact
    /// with rather than crashing.
    pub fn try_load_model(&mut self, path: &str, group_name: &str) -> Option<usize> {
        match self.load_model(path, group_name) {
            Ok(index) => Some(index),
            Err(err) => {
                error!("Failed to load {group_name}: {err}");
                None
            }
        }
    }

    /// Creates a new material and adds it to the material manager.
    pub fn add_material(
        &mut self,
        name: &str,
        base_color: [f32; 4],
        metallic: f32,
        roughness: f32,
    ) -> &mut Material {
        let material = Material::new(name, base_color, metallic, roughness);
        self.material_manager.add_material(material);
        self.material_manager.get_material_mut(name).unwrap()
    }

    /// Convenience for opaque RGB materials.
    pub fn add_material_rgb(
        &mut self,
        name: &str,
        r: f32,
        g: f32,
        b: f32,
        metallic: f32,
        roughness: f32,
    ) -> &mut Material {
        self.add_material(name, [r, g, b, 1.0], metallic, roughness)
    }

    /// Initializes GPU resources for all nodes and materials. Must be called
    /// once the device exists and before rendering.
    pub fn init_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        for node in self.nodes.iter_mut() {
            node.init_gpu_resources(device);
        }
        self.material_manager.update_all_gpu_resources(device, queue);
    }

    /// Uploads cached world transforms for every visible node.
    pub fn update_all_transforms(&mut self, queue: &wgpu::Queue) {
        for node in &self.nodes {
            if node.visible && node.gpu_resources.is_some() {
                node.update_transform(queue);
            }
        }
    }

    pub fn get_material_for_node(&self, node: &SceneNode) -> &Material {
        self.material_manager.get_material_for_node(node.material_id())
    }

    pub fn ensure_unique_name(&self, desired_name: &str) -> String {
        let mut counter = 0;
        let mut test_name = desired_name.to_string();

        while self.nodes.iter().any(|node| node.name == test_name) {
            counter += 1;
            test_name = format!("{} ({})", desired_name, counter);
        }

        test_name
    }
}

fn material_name_for(mtl: &tobj::Material, index: usize) -> String {
    if mtl.name.is_empty() {
        format!("material_{}", index)
    } else {
        mtl.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{camera_controller::CameraController, orbit_camera::OrbitCamera};
    use cgmath::{Rad, Vector3};

    fn empty_scene() -> Scene {
        let camera = OrbitCamera::new(
            Vector3::new(18.0, 12.0, 18.0),
            Vector3::new(0.0, 0.0, 0.0),
            Rad(std::f32::consts::FRAC_PI_4),
            1.5,
        );
        Scene::new(CameraManager::new(camera, CameraController::new(0.005, 0.1)))
    }

    #[test]
    fn world_position_composes_through_parents() {
        let mut scene = empty_scene();
        let mut desk = SceneNode::group("Desk");
        desk.set_translation(Vector3::new(10.0, 0.0, -5.0));
        let desk = scene.add_node(desk);

        let mut screen = SceneNode::group("TV_Screen_01");
        screen.set_translation(Vector3::new(0.0, 2.0, 0.0));
        let screen = scene.add_child(desk, screen);

        assert_eq!(scene.world_position(screen), Vector3::new(10.0, 2.0, -5.0));
        assert_eq!(scene.world_position(desk), Vector3::new(10.0, 0.0, -5.0));
    }

    #[test]
    fn update_caches_the_same_world_transforms() {
        let mut scene = empty_scene();
        let mut root = SceneNode::group("root");
        root.set_translation(Vector3::new(1.0, 2.0, 3.0));
        let root = scene.add_node(root);
        let mut child = SceneNode::group("child");
        child.set_translation(Vector3::new(0.0, 1.0, 0.0));
        let child = scene.add_child(root, child);

        scene.update();
        let cached = scene.nodes[child].world_transform;
        let walked = scene.world_transform(child);
        let a: &[f32; 16] = cached.as_ref();
        let b: &[f32; 16] = walked.as_ref();
        assert_eq!(a, b);
    }

    #[test]
    fn unique_names_get_suffixed() {
        let mut scene = empty_scene();
        scene.add_node(SceneNode::group("bird"));
        assert_eq!(scene.ensure_unique_name("bird"), "bird (1)");
        scene.add_node(SceneNode::group("bird (1)"));
        assert_eq!(scene.ensure_unique_name("bird"), "bird (2)");
    }

    #[test]
    fn missing_model_file_is_an_error_not_a_panic() {
        let mut scene = empty_scene();
        let err = scene.load_model("does/not/exist.obj", "room");
        assert!(err.is_err());
        assert!(scene.try_load_model("does/not/exist.obj", "room").is_none());
        assert!(scene.nodes.is_empty());
    }
}
