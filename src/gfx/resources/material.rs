//! Material system
//!
//! Materials are stored centrally in [`MaterialManager`] and referenced by
//! name from scene nodes. Each material owns a small uniform buffer and bind
//! group shared by every node that uses it.

use std::collections::HashMap;
use wgpu::Device;

use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// GPU uniform data for materials. Must match `MaterialUniform` in the
/// scene shader: params holds (metallic, roughness, unused, unused).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub params: [f32; 4],
    pub emissive: [f32; 4],
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Material bind group management
pub struct MaterialBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl MaterialBindings {
    pub fn new(device: &Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .create(device, "Material Bind Group");

        MaterialBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(&mut self, device: &Device, ubo: &MaterialUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Material Bind Group"),
        );
    }

    pub fn bind_group_layouts(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }
}

/// Material definition with basic PBR properties.
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub emissive: [f32; 3],

    // GPU resources - shared by all nodes using this material
    material_ubo: Option<MaterialUBO>,
    material_bindings: Option<MaterialBindings>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            metallic: 0.0,
            roughness: 0.5,
            emissive: [0.0, 0.0, 0.0],
            material_ubo: None,
            material_bindings: None,
        }
    }
}

impl Material {
    pub fn new(name: &str, base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.04, 1.0),
            ..Default::default()
        }
    }

    fn uniform(&self) -> MaterialUniform {
        MaterialUniform {
            base_color: self.base_color,
            params: [self.metallic, self.roughness, 0.0, 0.0],
            emissive: [self.emissive[0], self.emissive[1], self.emissive[2], 0.0],
        }
    }

    /// (Re)uploads this material's uniform data, creating GPU resources on
    /// first use.
    pub fn update_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        if self.material_ubo.is_none() {
            let ubo = MaterialUBO::new(device);
            let mut bindings = MaterialBindings::new(device);
            bindings.create_bind_group(device, &ubo);
            self.material_ubo = Some(ubo);
            self.material_bindings = Some(bindings);
        }

        let uniform = self.uniform();
        if let Some(ubo) = &mut self.material_ubo {
            ubo.update_content(queue, uniform);
        }
    }

    pub fn get_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.material_bindings
            .as_ref()
            .and_then(|bindings| bindings.bind_group.as_ref())
    }
}

/// Centralized material storage. Nodes reference materials by name; lookups
/// that miss fall back to the default material rather than failing.
pub struct MaterialManager {
    materials: HashMap<String, Material>,
    default_material: Material,
}

impl MaterialManager {
    pub fn new() -> Self {
        Self {
            materials: HashMap::new(),
            default_material: Material::default(),
        }
    }

    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn get_material(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    pub fn get_material_mut(&mut self, name: &str) -> Option<&mut Material> {
        self.materials.get_mut(name)
    }

    /// Material for a node, falling back to the default when the node has no
    /// assignment or names a material that does not exist.
    pub fn get_material_for_node(&self, material_id: Option<&str>) -> &Material {
        material_id
            .and_then(|id| self.materials.get(id))
            .unwrap_or(&self.default_material)
    }

    /// Syncs every material (including the fallback) to the GPU.
    pub fn update_all_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        self.default_material.update_gpu_resources(device, queue);
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue);
        }
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_material_falls_back_to_default() {
        let mut manager = MaterialManager::new();
        manager.add_material(Material::new("water", [0.0, 0.47, 0.75, 0.8], 0.8, 0.04));

        assert_eq!(manager.get_material_for_node(Some("water")).name, "water");
        assert_eq!(manager.get_material_for_node(Some("lava")).name, "Default");
        assert_eq!(manager.get_material_for_node(None).name, "Default");
    }

    #[test]
    fn roughness_is_clamped_away_from_zero() {
        let material = Material::new("mirror", [1.0; 4], 1.0, 0.0);
        assert!(material.roughness >= 0.04);
    }
}
