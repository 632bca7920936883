//! Hit resolution: from a pointer position to an interactable zone.
//!
//! The pointer is cast into the scene; the nearest hit node's ownership
//! chain is then walked upward, testing each node's name against the
//! registry, so clicking a keyboard mesh nested under a "Desk" group still
//! opens the desk's section. Resolution is a pure function of scene state
//! and pointer position.

use log::debug;

use crate::gfx::{picking::ScenePicker, scene::Scene};

use super::registry::{Interactable, ResolveByName};

/// A resolved click: the mesh node that was hit plus the registry entry an
/// ancestor (or the node itself) matched.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedHit {
    /// Node the ray actually struck.
    pub node_index: usize,
    /// Node whose name matched the registry; the camera focuses here.
    pub matched_index: usize,
    pub interactable: Interactable,
}

/// Resolves pointer positions to interactables. Owns the picker so AABB
/// caches survive across queries.
pub struct HitResolver {
    picker: ScenePicker,
}

impl HitResolver {
    pub fn new() -> Self {
        Self {
            picker: ScenePicker::new(),
        }
    }

    /// Full resolution: raycast, then walk the ownership chain. Returns
    /// `None` when nothing is under the pointer or no ancestor matches.
    pub fn resolve<R: ResolveByName>(
        &mut self,
        pointer: (f32, f32),
        surface_size: (f32, f32),
        scene: &Scene,
        registry: &R,
    ) -> Option<ResolvedHit> {
        let hit = self
            .picker
            .pick(pointer, surface_size, &scene.camera_manager.camera, scene)?;
        debug!("Raycast hit: {}", scene.nodes[hit.node_index].name);
        self.resolve_from_node(hit.node_index, scene, registry)
    }

    /// Hover variant: identical resolution, but only the truthiness is
    /// interesting. Callers skip this entirely while interacting.
    pub fn hovers_interactable<R: ResolveByName>(
        &mut self,
        pointer: (f32, f32),
        surface_size: (f32, f32),
        scene: &Scene,
        registry: &R,
    ) -> bool {
        self.resolve(pointer, surface_size, scene, registry).is_some()
    }

    /// Walks from `node_index` up through its parents, returning the first
    /// registry match. The walk stops after the last parentless ancestor
    /// (the scene root itself has no node and is never tested).
    pub fn resolve_from_node<R: ResolveByName>(
        &self,
        node_index: usize,
        scene: &Scene,
        registry: &R,
    ) -> Option<ResolvedHit> {
        let mut current = node_index;
        loop {
            let node = scene.node(current)?;
            if let Some(interactable) = registry.resolve(&node.name) {
                return Some(ResolvedHit {
                    node_index,
                    matched_index: current,
                    interactable: *interactable,
                });
            }
            current = node.parent?;
        }
    }

    /// Drops cached AABBs; call after meshes change shape.
    pub fn invalidate(&mut self) {
        self.picker.invalidate_cache();
    }
}

impl Default for HitResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SectionId;
    use crate::gfx::camera::{
        camera_controller::CameraController, camera_utils::CameraManager, orbit_camera::OrbitCamera,
    };
    use crate::gfx::geometry::generate_cylinder;
    use crate::gfx::scene::SceneNode;
    use crate::interaction::registry::InteractableRegistry;
    use cgmath::{Rad, Vector3};

    fn scene_with_camera(eye: Vector3<f32>) -> Scene {
        let camera = OrbitCamera::new(
            eye,
            Vector3::new(0.0, 0.0, 0.0),
            Rad(std::f32::consts::FRAC_PI_4),
            1.0,
        );
        Scene::new(CameraManager::new(camera, CameraController::new(0.005, 0.1)))
    }

    #[test]
    fn nested_unnamed_mesh_resolves_through_its_group() {
        let mut scene = scene_with_camera(Vector3::new(0.0, 0.0, 20.0));
        let desk = scene.add_node(SceneNode::group("Bookshelf_Left"));
        // The mesh itself has an empty name; only the group matches.
        let mesh = scene.add_child(
            desk,
            SceneNode::new("", vec![generate_cylinder(1.0, 1.0, 2.0, 8).into_mesh()]),
        );

        let resolver = HitResolver::new();
        let registry = InteractableRegistry::portfolio();
        let hit = resolver.resolve_from_node(mesh, &scene, &registry).unwrap();
        assert_eq!(hit.interactable.section, SectionId::Skills);
        assert_eq!(hit.matched_index, desk);
        assert_eq!(hit.node_index, mesh);
    }

    #[test]
    fn unmatched_chain_resolves_to_none() {
        let mut scene = scene_with_camera(Vector3::new(0.0, 0.0, 20.0));
        let group = scene.add_node(SceneNode::group("Plant_Pot"));
        let leaf = scene.add_child(group, SceneNode::group("Leaf_03"));

        let resolver = HitResolver::new();
        let registry = InteractableRegistry::portfolio();
        assert!(resolver.resolve_from_node(leaf, &scene, &registry).is_none());
    }

    #[test]
    fn nearest_hit_wins_before_the_walk_starts() {
        let mut scene = scene_with_camera(Vector3::new(0.0, 0.0, 20.0));

        let mut tv = SceneNode::new("TV_Screen_01", vec![generate_cylinder(1.0, 1.0, 2.0, 8).into_mesh()]);
        tv.set_translation(Vector3::new(0.0, 0.0, 5.0));
        scene.add_node(tv);

        let mut shelf = SceneNode::new("Bookshelf", vec![generate_cylinder(1.0, 1.0, 2.0, 8).into_mesh()]);
        shelf.set_translation(Vector3::new(0.0, 0.0, -5.0));
        scene.add_node(shelf);

        let mut resolver = HitResolver::new();
        let registry = InteractableRegistry::portfolio();
        let hit = resolver
            .resolve((400.0, 300.0), (800.0, 600.0), &scene, &registry)
            .expect("ray through both should resolve");
        assert_eq!(hit.interactable.section, SectionId::GameProject);
    }

    #[test]
    fn pointer_over_nothing_is_not_an_interaction() {
        let scene = scene_with_camera(Vector3::new(0.0, 0.0, 20.0));
        let mut resolver = HitResolver::new();
        let registry = InteractableRegistry::portfolio();
        assert!(resolver
            .resolve((10.0, 10.0), (800.0, 600.0), &scene, &registry)
            .is_none());
        assert!(!resolver.hovers_interactable((10.0, 10.0), (800.0, 600.0), &scene, &registry));
    }

    #[test]
    fn hover_matches_click_resolution() {
        let mut scene = scene_with_camera(Vector3::new(0.0, 0.0, 20.0));
        scene.add_node(SceneNode::new(
            "tv_console",
            vec![generate_cylinder(1.0, 1.0, 2.0, 8).into_mesh()],
        ));

        let mut resolver = HitResolver::new();
        let registry = InteractableRegistry::portfolio();
        assert!(resolver.hovers_interactable((400.0, 300.0), (800.0, 600.0), &scene, &registry));
    }
}
