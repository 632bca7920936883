use std::ops::Range;

use cgmath::{Matrix4, Rad, SquareMatrix, Vector3};
use wgpu::Device;

use super::vertex::Vertex3D;

pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    pub index_count: u32,
    pub vertex_count: u32,
}

impl Mesh {
    /// Builds a mesh from flat position/normal arrays (three floats per
    /// vertex, as produced by the OBJ loader).
    pub fn new(positions: Vec<f32>, normals: Vec<f32>, indices: Vec<u32>) -> Self {
        let mut vertices = Vec::with_capacity(positions.len() / 3);
        for i in 0..positions.len() / 3 {
            vertices.push(Vertex3D {
                position: [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]],
                normal: [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]],
            });
        }
        Self::from_vertices(vertices, indices)
    }

    pub fn from_vertices(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        let index_count = indices.len() as u32;
        let vertex_count = vertices.len() as u32;
        Self {
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
            index_count,
            vertex_count,
        }
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    /// CPU-side copy without GPU buffers, for instancing the same geometry
    /// under several nodes (the bird flock).
    pub fn clone_geometry(&self) -> Mesh {
        Mesh::from_vertices(self.vertices.clone(), self.indices.clone())
    }

    /// Averages face normals per vertex when the source file has none.
    pub fn calculate_face_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
        let vertex_count = positions.len() / 3;
        let mut normals = vec![0.0; positions.len()];
        let mut counts = vec![0u32; vertex_count];

        for triangle in indices.chunks(3) {
            let i0 = triangle[0] as usize;
            let i1 = triangle[1] as usize;
            let i2 = triangle[2] as usize;

            let v = |i: usize| {
                Vector3::new(positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2])
            };
            let edge1 = v(i1) - v(i0);
            let edge2 = v(i2) - v(i0);
            let face_normal = edge1.cross(edge2);

            for &vertex_idx in &[i0, i1, i2] {
                normals[vertex_idx * 3] += face_normal.x;
                normals[vertex_idx * 3 + 1] += face_normal.y;
                normals[vertex_idx * 3 + 2] += face_normal.z;
                counts[vertex_idx] += 1;
            }
        }

        for i in 0..vertex_count {
            if counts[i] > 0 {
                let n = Vector3::new(normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]);
                let length = (n.x * n.x + n.y * n.y + n.z * n.z).sqrt();
                if length > 0.0 {
                    normals[i * 3] = n.x / length;
                    normals[i * 3 + 1] = n.y / length;
                    normals[i * 3 + 2] = n.z / length;
                }
            }
        }

        normals
    }

    fn init_gpu(&mut self, device: &Device) {
        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );
        let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(&self.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );
        self.vertex_buffer = Some(vertex_buffer);
        self.index_buffer = Some(index_buffer);
    }
}

/// Per-node uniform: world transform plus shading flags
/// (`params.x` = receives shadows).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NodeUniform {
    pub model: [[f32; 4]; 4],
    pub params: [f32; 4],
}

pub struct NodeGpuResources {
    pub transform_buffer: wgpu::Buffer,
    pub transform_bind_group: wgpu::BindGroup,
}

/// One entry in the scene arena. Nodes are referenced by index; `parent`
/// points into the same arena and is always a smaller index, so walking up
/// the ownership chain terminates.
pub struct SceneNode {
    pub name: String,
    pub parent: Option<usize>,
    /// Transform relative to the parent node.
    pub transform: Matrix4<f32>,
    /// Cached world transform, recomputed by `Scene::update`.
    pub world_transform: Matrix4<f32>,
    pub meshes: Vec<Mesh>,
    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    material_id: Option<String>,
    pub gpu_resources: Option<NodeGpuResources>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, meshes: Vec<Mesh>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            transform: Matrix4::identity(),
            world_transform: Matrix4::identity(),
            meshes,
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
            material_id: None,
            gpu_resources: None,
        }
    }

    /// A mesh-less grouping node, used as the parent for loaded models.
    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn set_material(&mut self, material_id: &str) {
        self.material_id = Some(material_id.to_string());
    }

    pub fn material_id(&self) -> Option<&str> {
        self.material_id.as_deref()
    }

    pub fn set_translation(&mut self, translation: Vector3<f32>) {
        self.transform = Matrix4::from_translation(translation);
    }

    /// Translation, rotation about Y, then uniform scale (T * R * S).
    pub fn set_transform_trs(
        &mut self,
        translation: Vector3<f32>,
        rotation_y: Rad<f32>,
        scale: f32,
    ) {
        let t = Matrix4::from_translation(translation);
        let r = Matrix4::from_angle_y(rotation_y);
        let s = Matrix4::from_scale(scale);
        self.transform = t * r * s;
    }

    fn uniform(&self) -> NodeUniform {
        let model: &[f32; 16] = self.world_transform.as_ref();
        let mut matrix = [[0.0; 4]; 4];
        for (col, chunk) in model.chunks(4).enumerate() {
            matrix[col].copy_from_slice(chunk);
        }
        NodeUniform {
            model: matrix,
            params: [if self.receive_shadow { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }

    pub fn init_gpu_resources(&mut self, device: &Device) {
        if self.meshes.is_empty() {
            return;
        }

        for mesh in self.meshes.iter_mut() {
            mesh.init_gpu(device);
        }

        let transform_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Node Uniform Buffer"),
                contents: bytemuck::bytes_of(&self.uniform()),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );

        let transform_bind_group_layout =
            device.create_bind_group_layout(&node_bind_group_layout_descriptor());

        let transform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Node Bind Group"),
            layout: &transform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_buffer.as_entire_binding(),
            }],
        });

        self.gpu_resources = Some(NodeGpuResources {
            transform_buffer,
            transform_bind_group,
        });
    }

    /// Syncs the cached world transform to the GPU.
    pub fn update_transform(&self, queue: &wgpu::Queue) {
        if let Some(gpu_resources) = &self.gpu_resources {
            queue.write_buffer(
                &gpu_resources.transform_buffer,
                0,
                bytemuck::bytes_of(&self.uniform()),
            );
        }
    }

    pub fn get_transform_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources
            .as_ref()
            .map(|res| &res.transform_bind_group)
    }
}

/// Layout shared by the render pipelines and every node's bind group.
pub fn node_bind_group_layout_descriptor() -> wgpu::BindGroupLayoutDescriptor<'static> {
    wgpu::BindGroupLayoutDescriptor {
        label: Some("Node Bind Group Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    }
}

pub trait DrawNode<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    fn draw_mesh_instanced(&mut self, mesh: &'a Mesh, instances: Range<u32>);
    fn draw_node(&mut self, node: &'a SceneNode);
}

impl<'a, 'b> DrawNode<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        self.draw_mesh_instanced(mesh, 0..1);
    }

    fn draw_mesh_instanced(&mut self, mesh: &'b Mesh, instances: Range<u32>) {
        let vertex_buffer = match &mesh.vertex_buffer {
            Some(buffer) => buffer,
            None => return, // Skip drawing if not uploaded
        };
        let index_buffer = match &mesh.index_buffer {
            Some(buffer) => buffer,
            None => return,
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, instances);
    }

    fn draw_node(&mut self, node: &'b SceneNode) {
        for mesh in &node.meshes {
            self.draw_mesh(mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_normals_point_out_of_a_flat_triangle() {
        // Counter-clockwise triangle in the XZ plane, normal should be +Y.
        let positions = vec![0.0, 0.0, 0.0, 0.0, 0.0, -1.0, 1.0, 0.0, 0.0];
        let indices = vec![0, 1, 2];
        let normals = Mesh::calculate_face_normals(&positions, &indices);
        for i in 0..3 {
            assert!((normals[i * 3 + 1] - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn clone_geometry_copies_counts_but_not_buffers() {
        let mesh = Mesh::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            vec![0, 1, 2],
        );
        let copy = mesh.clone_geometry();
        assert_eq!(copy.vertex_count, 3);
        assert_eq!(copy.index_count, 3);
        assert!(copy.vertex_buffer.is_none());
    }

    #[test]
    fn trs_transform_places_translation_in_the_last_column() {
        let mut node = SceneNode::group("tree");
        node.set_transform_trs(Vector3::new(-12.0, 0.0, -12.0), Rad(1.0), 1.25);
        assert_eq!(node.transform.w.x, -12.0);
        assert_eq!(node.transform.w.z, -12.0);
    }
}
