//! Decorative outdoor environment around the room.
//!
//! Ground disc, a pond off to the side, a few procedural trees, and a flock
//! of birds circling overhead. None of this is interactive - nothing here
//! matches a registry fragment - but the meshes do cast and catch shadows.
//!
//! The birds prefer a loaded model; when that fails the flock degrades to
//! simple cone meshes on the same circular orbits.

use cgmath::{Matrix4, Rad, Vector3};
use log::warn;
use rand::Rng;

use crate::gfx::geometry::{generate_cone, generate_cylinder, generate_disc, generate_ring};
use crate::gfx::scene::{Scene, SceneNode};

/// Circular flight path of one bird.
#[derive(Debug, Clone, Copy)]
pub struct BirdPath {
    pub speed: f32,
    pub center_y: f32,
    pub radius: f32,
    pub angle: f32,
    pub y_offset: f32,
}

impl BirdPath {
    /// Advances the orbit. The original tuning moved `speed * 0.1` per frame
    /// at 60 fps; `speed * 6.0 * dt` is the time-based equivalent.
    pub fn advance(&mut self, dt: f32) {
        self.angle += self.speed * 6.0 * dt;
    }

    /// World position at the current angle; `time` drives a gentle bob.
    pub fn position(&self, time: f32) -> Vector3<f32> {
        Vector3::new(
            self.angle.cos() * self.radius,
            self.center_y + (time + self.y_offset).sin(),
            self.angle.sin() * self.radius,
        )
    }
}

struct Bird {
    node: usize,
    path: BirdPath,
    scale: f32,
}

/// Owns the animated parts of the environment.
pub struct Environment {
    birds: Vec<Bird>,
    time: f32,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            birds: Vec::new(),
            time: 0.0,
        }
    }

    /// Builds the whole environment into the scene. `bird_model_path` is
    /// attempted first; on failure the procedural flock takes over.
    pub fn setup(&mut self, scene: &mut Scene, bird_model_path: &str, rng: &mut impl Rng) {
        self.setup_terrain(scene);
        self.plant_trees(scene, rng);
        self.spawn_birds(scene, bird_model_path, rng);
    }

    fn setup_terrain(&self, scene: &mut Scene) {
        scene.add_material_rgb("ground", 0.34, 0.49, 0.27, 0.1, 0.8);
        let mut ground = SceneNode::new("Ground", vec![generate_cylinder(60.0, 60.0, 2.0, 64).into_mesh()]);
        ground.set_translation(Vector3::new(0.0, -1.1, 0.0));
        ground.set_material("ground");
        ground.receive_shadow = true;
        scene.add_node(ground);

        scene
            .add_material("water", [0.0, 0.47, 0.75, 0.8], 0.8, 0.04)
            .emissive = [0.0, 0.013, 0.04];
        let mut water = SceneNode::new("Water", vec![generate_disc(40.0, 64).into_mesh()]);
        water.set_translation(Vector3::new(-60.0, -1.2, 0.0));
        water.set_material("water");
        scene.add_node(water);

        scene
            .add_material("wave", [1.0, 1.0, 1.0, 0.2], 0.0, 1.0)
            .emissive = [0.8, 0.8, 0.8];
        let mut wave = SceneNode::new("Wave", vec![generate_ring(35.0, 36.0, 64).into_mesh()]);
        wave.set_translation(Vector3::new(-60.0, -1.15, 0.0));
        wave.set_material("wave");
        scene.add_node(wave);
    }

    /// Three fixed trees near the room, lightly randomized in heading and
    /// size.
    fn plant_trees(&self, scene: &mut Scene, rng: &mut impl Rng) {
        scene.add_material_rgb("trunk", 0.29, 0.22, 0.16, 0.0, 0.9);
        scene.add_material_rgb("leaves", 0.18, 0.35, 0.15, 0.0, 0.9);

        let placements = [(-12.0, -12.0), (-14.0, 6.0), (6.0, -14.0)];

        for (i, (x, z)) in placements.into_iter().enumerate() {
            let tree = scene.add_node({
                let mut tree = SceneNode::group(format!("Tree_{i}"));
                tree.set_transform_trs(
                    Vector3::new(x, 0.0, z),
                    Rad(rng.random_range(0.0..std::f32::consts::TAU)),
                    1.0 + rng.random_range(0.0..0.5),
                );
                tree
            });

            let mut trunk =
                SceneNode::new("", vec![generate_cylinder(0.3, 0.5, 3.0, 8).into_mesh()]);
            trunk.set_translation(Vector3::new(0.0, 1.5, 0.0));
            trunk.set_material("trunk");
            trunk.cast_shadow = true;
            scene.add_child(tree, trunk);

            let mut leaves = SceneNode::new("", vec![generate_cone(2.5, 6.0, 8).into_mesh()]);
            leaves.set_translation(Vector3::new(0.0, 5.0, 0.0));
            leaves.set_material("leaves");
            leaves.cast_shadow = true;
            scene.add_child(tree, leaves);
        }
    }

    fn spawn_birds(&mut self, scene: &mut Scene, bird_model_path: &str, rng: &mut impl Rng) {
        match scene.load_model(bird_model_path, "bird_template") {
            Ok(template) => {
                // The template stays hidden; each flock member gets its own
                // copy of the geometry under an animated group node.
                let children: Vec<usize> = (0..scene.nodes.len())
                    .filter(|&i| scene.nodes[i].parent == Some(template))
                    .collect();
                scene.nodes[template].visible = false;
                for &child in &children {
                    scene.nodes[child].visible = false;
                }

                for i in 0..10 {
                    let bird = scene.add_node(SceneNode::group(format!("bird_{i}")));
                    for &child in &children {
                        let mut copy = SceneNode::new(
                            "",
                            scene.nodes[child]
                                .meshes
                                .iter()
                                .map(|m| m.clone_geometry())
                                .collect(),
                        );
                        if let Some(material) = scene.nodes[child].material_id() {
                            copy.set_material(material);
                        }
                        copy.cast_shadow = true;
                        scene.add_child(bird, copy);
                    }
                    self.birds.push(Bird {
                        node: bird,
                        path: BirdPath {
                            speed: 0.02 + rng.random_range(0.0..0.03),
                            center_y: 15.0 + rng.random_range(0.0..8.0),
                            radius: 25.0 + rng.random_range(0.0..15.0),
                            angle: rng.random_range(0.0..std::f32::consts::TAU),
                            y_offset: rng.random_range(0.0..2.0),
                        },
                        scale: 0.2,
                    });
                }
            }
            Err(err) => {
                warn!("Could not load {bird_model_path}: {err}. Using procedural birds");
                self.spawn_procedural_birds(scene, 8, rng);
            }
        }
    }

    /// Fallback flock: cones pitched forward along their flight direction.
    fn spawn_procedural_birds(&mut self, scene: &mut Scene, count: usize, rng: &mut impl Rng) {
        scene.add_material_rgb("bird", 1.0, 1.0, 1.0, 0.0, 0.7);

        for i in 0..count {
            let bird = scene.add_node(SceneNode::group(format!("bird_{i}")));

            let mut body = SceneNode::new("", vec![generate_cone(0.2, 1.0, 5).into_mesh()]);
            body.transform = Matrix4::from_angle_x(Rad(std::f32::consts::FRAC_PI_2));
            body.set_material("bird");
            body.cast_shadow = true;
            scene.add_child(bird, body);

            self.birds.push(Bird {
                node: bird,
                path: BirdPath {
                    speed: 0.04 + rng.random_range(0.0..0.02),
                    center_y: 15.0 + rng.random_range(0.0..5.0),
                    radius: 20.0 + rng.random_range(0.0..15.0),
                    angle: rng.random_range(0.0..std::f32::consts::TAU),
                    y_offset: rng.random_range(0.0..2.0),
                },
                scale: 1.0,
            });
        }
    }

    pub fn bird_count(&self) -> usize {
        self.birds.len()
    }

    /// Advances the flock.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        self.time += dt;
        for bird in &mut self.birds {
            bird.path.advance(dt);
            if let Some(node) = scene.node_mut(bird.node) {
                node.set_transform_trs(
                    bird.path.position(self.time),
                    Rad(-bird.path.angle),
                    bird.scale,
                );
            }
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{
        camera_controller::CameraController, camera_utils::CameraManager, orbit_camera::OrbitCamera,
    };
    use rand::{rngs::StdRng, SeedableRng};

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
    fn bird_path_stays_on_its_circle() {
        let mut path = BirdPath {
            speed: 0.03,
            center_y: 18.0,
            radius: 30.0,
            angle: 0.4,
            y_offset: 1.0,
        };
        for step in 0..100 {
            path.advance(1.0 / 60.0);
            let p = path.position(step as f32 * (1.0 / 60.0));
            let horizontal = (p.x * p.x + p.z * p.z).sqrt();
            assert!((horizontal - 30.0).abs() < 1e-3);
            assert!((p.y - 18.0).abs() <= 1.0 + 1e-3);
        }
    }

    #[test]
    fn bird_path_advance_is_time_based() {
        let mut path = BirdPath {
            speed: 0.05,
            center_y: 15.0,
            radius: 20.0,
            angle: 0.0,
            y_offset: 0.0,
        };
        path.advance(0.5);
        assert!((path.angle - 0.05 * 6.0 * 0.5).abs() < 1e-6);
    }

    #[test]
    fn missing_bird_model_falls_back_to_procedural_flock() {
        let mut scene = empty_scene();
        let mut env = Environment::new();
        let mut rng = StdRng::seed_from_u64(7);
        env.setup(&mut scene, "no/such/birds.obj", &mut rng);

        assert_eq!(env.bird_count(), 8);
        // Terrain, trees and birds all landed in the arena.
        assert!(scene.nodes.iter().any(|n| n.name == "Ground"));
        assert!(scene.nodes.iter().any(|n| n.name == "Tree_2"));
        assert!(scene.nodes.iter().any(|n| n.name == "bird_7"));
    }

    #[test]
    fn update_moves_every_bird() {
        let mut scene = empty_scene();
        let mut env = Environment::new();
        let mut rng = StdRng::seed_from_u64(7);
        env.setup(&mut scene, "no/such/birds.obj", &mut rng);

        let before: Vec<_> = env.birds.iter().map(|b| scene.world_position(b.node)).collect();
        env.update(0.25, &mut scene);
        for (bird, old) in env.birds.iter().zip(before) {
            assert_ne!(scene.world_position(bird.node), old);
        }
    }

    #[test]
    fn environment_names_never_match_the_registry() {
        use crate::interaction::registry::{InteractableRegistry, ResolveByName};
        let mut scene = empty_scene();
        let mut env = Environment::new();
        let mut rng = StdRng::seed_from_u64(7);
        env.setup(&mut scene, "no/such/birds.obj", &mut rng);

        let registry = InteractableRegistry::portfolio();
        for node in &scene.nodes {
            assert!(
                registry.resolve(&node.name).is_none(),
                "decorative node '{}' must not be clickable",
                node.name
            );
        }
    }
}
