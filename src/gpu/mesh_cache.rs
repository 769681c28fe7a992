//! GPU copies of tessellated geometry, shared by every object in a stage
//! that uses the same [`Geometry`].

use rustc_hash::{FxHashMap, FxHashSet};
use wgpu::util::DeviceExt;

use crate::scene::mesh::{MeshData, MeshVertex};
use crate::scene::{Geometry, GeometryKey};

/// Vertex, triangle index and edge index buffers of one mesh.
pub struct GpuMesh {
    /// Interleaved [`MeshVertex`] data.
    pub vertices: wgpu::Buffer,
    /// Triangle list indices.
    pub indices: wgpu::Buffer,
    /// Line list indices for wireframe drawing.
    pub edges: wgpu::Buffer,
    /// Triangle index count.
    pub index_count: u32,
    /// Edge index count.
    pub edge_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, mesh: &MeshData) -> Self {
        let edges = mesh.edges();
        let init = |label: &str, contents: &[u8], usage| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            })
        };
        Self {
            vertices: init(
                "Mesh Vertices",
                bytemuck::cast_slice(&mesh.vertices),
                wgpu::BufferUsages::VERTEX,
            ),
            indices: init(
                "Mesh Indices",
                bytemuck::cast_slice(&mesh.indices),
                wgpu::BufferUsages::INDEX,
            ),
            edges: init(
                "Mesh Edges",
                bytemuck::cast_slice(&edges),
                wgpu::BufferUsages::INDEX,
            ),
            index_count: mesh.indices.len() as u32,
            edge_count: edges.len() as u32,
        }
    }

    /// Vertex buffer layout matching [`MeshVertex`].
    pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
            2 => Float32x2,
        ];
        wgpu::VertexBufferLayout {
            array_stride: size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Meshes keyed by [`GeometryKey`], evicted when a frame stops using them.
#[derive(Default)]
pub struct MeshCache {
    meshes: FxHashMap<GeometryKey, GpuMesh>,
    used: FxHashSet<GeometryKey>,
}

impl MeshCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `geometry` is resident and mark it used this frame.
    pub fn prepare(&mut self, device: &wgpu::Device, geometry: &Geometry) -> GeometryKey {
        let key = geometry.cache_key();
        let _ = self.used.insert(key);
        let _ = self
            .meshes
            .entry(key)
            .or_insert_with(|| GpuMesh::upload(device, &MeshData::generate(geometry)));
        key
    }

    /// Resident mesh for `key`.
    #[must_use]
    pub fn get(&self, key: &GeometryKey) -> Option<&GpuMesh> {
        self.meshes.get(key)
    }

    /// Drop meshes not prepared since the previous call.
    pub fn end_frame(&mut self) {
        let used = std::mem::take(&mut self.used);
        let before = self.meshes.len();
        self.meshes.retain(|key, _| used.contains(key));
        if self.meshes.len() < before {
            log::debug!("evicted {} meshes", before - self.meshes.len());
        }
    }

    /// Number of resident meshes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// `true` when nothing is resident.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
