use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use super::orbit_camera::OrbitCamera;

/// Maps raw mouse input onto the orbit camera. The camera sequencer flips
/// `enabled` off while a focus animation or popup owns the camera; input
/// arriving in that window is dropped here rather than queued.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    enabled: bool,
    is_shift_held: bool,
    is_mouse_pressed: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            enabled: true,
            is_shift_held: false,
            is_mouse_pressed: false,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            // A drag in progress must not resume when control returns.
            self.is_mouse_pressed = false;
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn process_events(
        &mut self,
        event: &DeviceEvent,
        window: &Window,
        camera: &mut OrbitCamera,
    ) {
        match event {
            DeviceEvent::Button {
                button: 0, // Left mouse button
                state,
            } => {
                self.is_mouse_pressed = self.enabled && *state == ElementState::Pressed;
            }
            DeviceEvent::MouseWheel { delta, .. } => {
                if !self.enabled {
                    return;
                }
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                camera.add_distance(scroll_amount * self.zoom_speed);
                window.request_redraw();
            }
            DeviceEvent::MouseMotion { delta } => {
                if self.is_mouse_pressed {
                    if self.is_shift_held {
                        // Shift + drag pans the focus point
                        camera.pan((
                            -delta.0 as f32 * self.pan_speed,
                            delta.1 as f32 * self.pan_speed,
                        ));
                    } else {
                        // Plain drag orbits
                        camera.add_yaw(-delta.0 as f32 * self.rotate_speed);
                        camera.add_pitch(delta.1 as f32 * self.rotate_speed);
                    }
                    window.request_redraw();
                }
            }
            _ => (),
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent, camera: &mut OrbitCamera) {
        match event {
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight),
                state,
                ..
            } => {
                self.is_shift_held = *state == ElementState::Pressed;
            }
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::KeyC),
                state: ElementState::Pressed,
                ..
            } => {
                if self.is_shift_held && self.enabled {
                    camera.reset_to_default();
                }
            }
            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabling_clears_a_drag_in_progress() {
        let mut controller = CameraController::new(0.005, 0.1);
        controller.is_mouse_pressed = true;
        controller.set_enabled(false);
        assert!(!controller.is_mouse_pressed);
        assert!(!controller.is_enabled());
        controller.set_enabled(true);
        assert!(!controller.is_mouse_pressed);
    }
}
