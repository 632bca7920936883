use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Eye position plus look-at target. This is the unit the camera sequencer
/// interpolates; the orbit parameters are re-derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
}

impl CameraPose {
    pub fn new(eye: Vector3<f32>, target: Vector3<f32>) -> Self {
        Self { eye, target }
    }

    /// Component-wise linear blend between two poses.
    pub fn lerp(&self, other: &CameraPose, t: f32) -> CameraPose {
        CameraPose {
            eye: self.eye.lerp(other.eye, t),
            target: self.target.lerp(other.target, t),
        }
    }
}

/// Y-up orbit camera. `eye` is derived from `(distance, pitch, yaw)` around
/// `target`; setting a pose directly re-derives the spherical parameters so
/// orbit input picks up seamlessly after an animated move.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
    default_pose: CameraPose,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

impl OrbitCamera {
    /// Creates a camera looking from `eye` at `target`; that pose also
    /// becomes the default restored by [`OrbitCamera::reset_to_default`].
    pub fn new(eye: Vector3<f32>, target: Vector3<f32>, fovy: Rad<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance: 1.0,
            pitch: 0.0,
            yaw: 0.0,
            eye,
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy,
            znear: 0.1,
            zfar: 100.0,
            uniform: CameraUniform::default(),
            default_pose: CameraPose::new(eye, target),
        };
        camera.set_pose(CameraPose::new(eye, target));
        camera
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.eye, self.target)
    }

    pub fn default_pose(&self) -> CameraPose {
        self.default_pose
    }

    /// Places the camera at an explicit pose, bypassing the orbit bounds.
    /// Distance, pitch and yaw are re-derived so subsequent drag input
    /// continues from wherever an animation left the camera.
    pub fn set_pose(&mut self, pose: CameraPose) {
        self.target = pose.target;
        self.eye = pose.eye;
        let offset = pose.eye - pose.target;
        let distance = offset.magnitude();
        if distance > f32::EPSILON {
            self.distance = distance;
            self.pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
            self.yaw = offset.x.atan2(offset.z);
        }
    }

    pub fn reset_to_default(&mut self) {
        self.set_pose(self.default_pose);
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        let corrected_zoom = f32::log10(self.distance.max(1.1)) * delta;
        self.set_distance(self.distance + corrected_zoom);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Pans the camera relative to the current view direction.
    /// `delta.0` moves left/right, `delta.1` up/down in view space.
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scale by distance so panning feels the same at every zoom level.
        let pan_scale = self.distance * 0.1;
        let movement = right * delta.0 * pan_scale + up * delta.1 * pan_scale;

        self.eye += movement;
        self.target += movement;
    }

    /// Recomputes `eye` after changing `distance`, `pitch` or `yaw`.
    fn update(&mut self) {
        self.eye = Vector3::new(
            self.distance * self.yaw.sin() * self.pitch.cos(),
            self.distance * self.pitch.sin(),
            self.distance * self.yaw.cos() * self.pitch.cos(),
        ) + self.target;
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: None,
            max_distance: None,
            // Keep the camera above the ground plane and short of the pole.
            min_pitch: std::f32::consts::FRAC_PI_2 - std::f32::consts::PI / 2.1,
            max_pitch: std::f32::consts::FRAC_PI_2 - f32::EPSILON,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(
            Vector3::new(18.0, 12.0, 18.0),
            Vector3::new(0.0, 0.0, 0.0),
            Rad(FRAC_PI_4),
            1.5,
        )
    }

    #[test]
    fn set_pose_preserves_eye_and_target() {
        let mut cam = camera();
        let pose = CameraPose::new(Vector3::new(10.0, 2.0, -1.0), Vector3::new(10.0, 2.0, -5.0));
        cam.set_pose(pose);
        assert_eq!(cam.eye, pose.eye);
        assert_eq!(cam.target, pose.target);
    }

    #[test]
    fn spherical_parameters_round_trip_through_update() {
        let mut cam = camera();
        let pose = CameraPose::new(Vector3::new(3.0, 4.0, 5.0), Vector3::new(1.0, 1.0, 1.0));
        cam.set_pose(pose);
        // Nudging yaw by zero re-derives eye from (distance, pitch, yaw);
        // it must land back where set_pose put it.
        cam.add_yaw(0.0);
        assert!((cam.eye - pose.eye).magnitude() < 1e-4);
    }

    #[test]
    fn distance_respects_bounds() {
        let mut cam = camera();
        cam.bounds.min_distance = Some(5.0);
        cam.bounds.max_distance = Some(50.0);
        cam.set_distance(1.0);
        assert_eq!(cam.distance, 5.0);
        cam.set_distance(500.0);
        assert_eq!(cam.distance, 50.0);
    }

    #[test]
    fn pitch_cannot_go_below_the_horizon_limit() {
        let mut cam = camera();
        cam.set_pitch(-1.0);
        assert!(cam.pitch >= cam.bounds.min_pitch);
        assert!(cam.eye.y >= cam.target.y);
    }

    #[test]
    fn reset_restores_construction_pose() {
        let mut cam = camera();
        cam.set_pose(CameraPose::new(Vector3::new(0.0, 9.0, 0.1), Vector3::new(2.0, 0.0, 2.0)));
        cam.reset_to_default();
        assert!((cam.eye - Vector3::new(18.0, 12.0, 18.0)).magnitude() < 1e-5);
        assert!((cam.target - Vector3::new(0.0, 0.0, 0.0)).magnitude() < 1e-5);
    }

    #[test]
    fn pose_lerp_blends_both_endpoints() {
        let a = CameraPose::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        let b = CameraPose::new(Vector3::new(2.0, 2.0, 2.0), Vector3::new(1.0, 2.0, 0.0));
        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid.eye, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(mid.target, Vector3::new(1.0, 1.0, 0.0));
    }
}
