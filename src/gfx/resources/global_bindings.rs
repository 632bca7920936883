//! Global uniform bindings for camera and lighting
//!
//! Per-frame data shared by every draw call: camera matrices plus the sun
//! light used for shading and shadow mapping. Bound at group 0 in all
//! render pipelines; the layout here must match `Globals` in the shaders.

use crate::{
    gfx::camera::{camera_utils::CameraUniform, orbit_camera::OPENGL_TO_WGPU_MATRIX},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    light_view_proj: [[f32; 4]; 4],
    light_position: [f32; 3],
    light_intensity: f32,
    light_color: [f32; 3],
    ambient_strength: f32,
}

/// Sun light configuration for shading and shadow mapping.
#[derive(Copy, Clone, Debug)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
    pub ambient_strength: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        // Warm sun high above the room, matching the outdoor setting.
        Self {
            position: [20.0, 50.0, 20.0],
            color: [1.0, 0.93, 0.69],
            intensity: 1.2,
            ambient_strength: 0.6,
        }
    }
}

pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Updates the global uniform buffer with camera and light data.
///
/// The light's view-projection is an orthographic box wide enough to cover
/// the whole environment, looking at the scene origin.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    light: LightConfig,
) {
    let light_pos = cgmath::Point3::new(light.position[0], light.position[1], light.position[2]);
    let light_view = cgmath::Matrix4::look_at_rh(
        light_pos,
        cgmath::Point3::new(0.0, 0.0, 0.0),
        cgmath::Vector3::unit_y(),
    );
    let light_proj = OPENGL_TO_WGPU_MATRIX * cgmath::ortho(-50.0, 50.0, -50.0, 50.0, 0.1, 200.0);
    let light_view_proj = light_proj * light_view;

    let content = GlobalUBOContent {
        view_position: camera.view_position,
        view_proj: camera.view_proj,
        light_view_proj: light_view_proj.into(),
        light_position: light.position,
        light_intensity: light.intensity,
        light_color: light.color,
        ambient_strength: light.ambient_strength,
    };

    ubo.update_content(queue, content);
}

/// Bind group layout and bind group for the global uniforms (slot 0 in all
/// render pipelines).
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(&mut self, device: &wgpu::Device, ubo: &GlobalUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Global Bind Group"),
        );
    }

    pub fn bind_group_layouts(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    /// # Panics
    /// Panics if `create_bind_group()` hasn't been called yet
    pub fn bind_groups(&self) -> &wgpu::BindGroup {
        self.bind_group
            .as_ref()
            .expect("Bind group has not been created yet!")
    }
}
