//! Interaction core: registry, hit resolution, and camera sequencing.
//!
//! [`InteractionSession`] is the single context object owning the pieces and
//! the `is_interacting` flag they share - there are no ambient globals. The
//! app feeds it pointer events and frame ticks; it answers with camera poses
//! and panel events.

pub mod easing;
pub mod registry;
pub mod resolver;
pub mod sequencer;

pub use registry::{Interactable, InteractableRegistry, ResolveByName};
pub use resolver::{HitResolver, ResolvedHit};
pub use sequencer::{CameraSequencer, SequencerEvent, SequencerOutput, SequencerPhase};

use log::info;

use crate::gfx::scene::Scene;

/// Everything a pointer interaction needs, in one place.
pub struct InteractionSession {
    registry: InteractableRegistry,
    resolver: HitResolver,
    sequencer: CameraSequencer,
}

impl InteractionSession {
    pub fn new(registry: InteractableRegistry, sequencer: CameraSequencer) -> Self {
        Self {
            registry,
            resolver: HitResolver::new(),
            sequencer,
        }
    }

    pub fn is_interacting(&self) -> bool {
        self.sequencer.is_interacting()
    }

    pub fn sequencer(&self) -> &CameraSequencer {
        &self.sequencer
    }

    pub fn sequencer_mut(&mut self) -> &mut CameraSequencer {
        &mut self.sequencer
    }

    /// Handles a pointer press. Clicks are rejected while the popup is open
    /// or an interaction is in flight; otherwise the hit is resolved and, on
    /// a match, a focus move starts toward the clicked node.
    ///
    /// Returns the resolved hit when a focus actually started.
    pub fn pointer_pressed(
        &mut self,
        pointer: (f32, f32),
        surface_size: (f32, f32),
        scene: &Scene,
        popup_open: bool,
    ) -> Option<ResolvedHit> {
        if popup_open || self.sequencer.is_interacting() {
            return None;
        }

        let hit = self
            .resolver
            .resolve(pointer, surface_size, scene, &self.registry)?;

        // The camera flies to the mesh that was actually struck, not the
        // ancestor whose name matched; a keyboard click frames the keyboard.
        let target = scene.world_position(hit.node_index);
        let started = self.sequencer.focus_on(
            scene.camera_manager.camera.pose(),
            target,
            Some(hit.interactable.offset),
            hit.interactable.section,
        );

        if started {
            info!(
                "Interaction triggered: '{}' -> {}",
                hit.interactable.fragment, hit.interactable.section
            );
            Some(hit)
        } else {
            None
        }
    }

    /// Hover check for the cursor style. Skipped entirely while interacting;
    /// the result is only a yes/no.
    pub fn pointer_hover(
        &mut self,
        pointer: (f32, f32),
        surface_size: (f32, f32),
        scene: &Scene,
    ) -> bool {
        if self.sequencer.is_interacting() {
            return false;
        }
        self.resolver
            .hovers_interactable(pointer, surface_size, scene, &self.registry)
    }

    /// Starts the close animation. The popup should already be hidden.
    pub fn begin_reset(&mut self) -> bool {
        self.sequencer.reset()
    }

    /// Advances animations by `dt` seconds.
    pub fn update(&mut self, dt: f32) -> SequencerOutput {
        self.sequencer.update(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SectionId;
    use crate::gfx::camera::{
        camera_controller::CameraController, camera_utils::CameraManager, orbit_camera::CameraPose,
        orbit_camera::OrbitCamera,
    };
    use crate::gfx::geometry::generate_cylinder;
    use crate::gfx::scene::SceneNode;
    use cgmath::{InnerSpace, Rad, Vector3};

    fn session() -> InteractionSession {
        let default_pose =
            CameraPose::new(Vector3::new(0.0, 0.0, 20.0), Vector3::new(0.0, 0.0, 0.0));
        InteractionSession::new(
            InteractableRegistry::portfolio(),
            CameraSequencer::new(1.5, 2.0, default_pose),
        )
    }

    fn scene_with_tv() -> Scene {
        let camera = OrbitCamera::new(
            Vector3::new(0.0, 0.0, 20.0),
            Vector3::new(0.0, 0.0, 0.0),
            Rad(std::f32::consts::FRAC_PI_4),
            1.0,
        );
        let mut scene = Scene::new(CameraManager::new(camera, CameraController::new(0.005, 0.1)));
        let mut tv = SceneNode::new(
            "TV_Screen_01",
            vec![generate_cylinder(1.0, 1.0, 2.0, 8).into_mesh()],
        );
        tv.set_translation(Vector3::new(0.0, 0.0, 5.0));
        scene.add_node(tv);
        scene
    }

    const CENTER: (f32, f32) = (400.0, 300.0);
    const SURFACE: (f32, f32) = (800.0, 600.0);

    #[test]
    fn click_on_tv_starts_a_focus_toward_it() {
        let mut session = session();
        let scene = scene_with_tv();

        let hit = session
            .pointer_pressed(CENTER, SURFACE, &scene, false)
            .expect("tv click should resolve");
        assert_eq!(hit.interactable.section, SectionId::GameProject);
        assert!(session.is_interacting());

        // Drive to completion: the camera parks at tv + (0, 0, 4).
        let mut last = None;
        for _ in 0..40 {
            if let Some(pose) = session.update(0.1).pose {
                last = Some(pose);
            }
        }
        let pose = last.unwrap();
        assert!((pose.eye - Vector3::new(0.0, 0.0, 9.0)).magnitude() < 1e-3);
        assert!((pose.target - Vector3::new(0.0, 0.0, 5.0)).magnitude() < 1e-3);
    }

    #[test]
    fn clicks_are_ignored_while_the_popup_is_open() {
        let mut session = session();
        let scene = scene_with_tv();
        assert!(session.pointer_pressed(CENTER, SURFACE, &scene, true).is_none());
        assert!(!session.is_interacting());
    }

    #[test]
    fn clicks_are_ignored_while_interacting() {
        let mut session = session();
        let scene = scene_with_tv();
        assert!(session.pointer_pressed(CENTER, SURFACE, &scene, false).is_some());
        assert!(session.pointer_pressed(CENTER, SURFACE, &scene, false).is_none());
    }

    #[test]
    fn hover_is_suppressed_while_interacting() {
        let mut session = session();
        let scene = scene_with_tv();
        assert!(session.pointer_hover(CENTER, SURFACE, &scene));

        session.pointer_pressed(CENTER, SURFACE, &scene, false);
        assert!(!session.pointer_hover(CENTER, SURFACE, &scene));
    }

    #[test]
    fn full_cycle_reveal_then_reset() {
        let mut session = session();
        let scene = scene_with_tv();
        session.pointer_pressed(CENTER, SURFACE, &scene, false);

        let mut revealed = None;
        for _ in 0..40 {
            for event in session.update(0.1).events {
                if let SequencerEvent::RevealSection(section) = event {
                    revealed = Some(section);
                }
            }
        }
        assert_eq!(revealed, Some(SectionId::GameProject));

        assert!(session.begin_reset());
        let mut completed = false;
        for _ in 0..40 {
            if session
                .update(0.1)
                .events
                .contains(&SequencerEvent::ResetComplete)
            {
                completed = true;
            }
        }
        assert!(completed);
        assert!(!session.is_interacting());
    }
}
