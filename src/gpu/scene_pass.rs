//! Scene pass: lit objects, wireframes and the helper grid into the HDR
//! target.

use bytemuck::{Pod, Zeroable};

use super::dynamic_buffer::DynamicBuffer;
use super::mesh_cache::{GpuMesh, MeshCache};
use super::pipeline_helpers::{storage_buffer, uniform_buffer, wgsl_module};
use super::texture::{DEPTH_FORMAT, HDR_FORMAT};
use super::uniforms::{FrameUniform, ObjectUniform};
use crate::scene::{Grid, GeometryKey};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
/// Colored line vertex for the helper grid.
pub struct GridVertex {
    /// World position.
    pub position: [f32; 3],
    /// Line color.
    pub color: [f32; 3],
}

impl GridVertex {
    fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }

    /// Line list for `grid`. With an even division count the two center
    /// lines are drawn brighter.
    #[must_use]
    pub fn lines(grid: &Grid) -> Vec<Self> {
        let highlight = grid.color * 1.8;
        let divisions = grid.divisions.max(1) as usize;
        let center = (divisions % 2 == 0).then_some(divisions / 2);
        grid.segments()
            .iter()
            .enumerate()
            .flat_map(|(i, [a, b])| {
                // segments come in pairs, one per axis
                let color = if Some(i / 2) == center {
                    highlight
                } else {
                    grid.color
                };
                [
                    Self {
                        position: a.to_array(),
                        color: color.to_array(),
                    },
                    Self {
                        position: b.to_array(),
                        color: color.to_array(),
                    },
                ]
            })
            .collect()
    }
}

/// One object to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Draw {
    /// Index into the object storage buffer.
    pub instance: u32,
    /// Mesh to bind.
    pub mesh: GeometryKey,
    /// Draw edges only.
    pub wireframe: bool,
    /// Needs blending.
    pub transparent: bool,
    /// Squared distance from the eye, for sorting.
    pub depth: f32,
}

/// Opaque draws first, then transparent draws back to front.
pub fn order_draws(draws: &mut [Draw]) {
    draws.sort_by(|a, b| match (a.transparent, b.transparent) {
        (false, true) => std::cmp::Ordering::Less,
        (true, false) => std::cmp::Ordering::Greater,
        (true, true) => b.depth.total_cmp(&a.depth),
        (false, false) => a.instance.cmp(&b.instance),
    });
}

/// Attachments the scene pass renders into.
pub struct SceneTargets<'a> {
    /// Color attachment (multisampled when antialiasing).
    pub color: &'a wgpu::TextureView,
    /// Resolve target when `color` is multisampled.
    pub resolve: Option<&'a wgpu::TextureView>,
    /// Depth attachment.
    pub depth: &'a wgpu::TextureView,
}

/// Pipelines and per-frame buffers of the scene pass.
pub struct ScenePass {
    frame_buffer: wgpu::Buffer,
    objects: DynamicBuffer<ObjectUniform>,
    grid_vertices: DynamicBuffer<GridVertex>,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    opaque: wgpu::RenderPipeline,
    transparent: wgpu::RenderPipeline,
    wireframe: wgpu::RenderPipeline,
    grid: wgpu::RenderPipeline,
}

struct PipelineSpec<'a> {
    label: &'a str,
    vertex_entry: &'a str,
    fragment_entry: &'a str,
    vertex_layout: wgpu::VertexBufferLayout<'static>,
    topology: wgpu::PrimitiveTopology,
    blend: Option<wgpu::BlendState>,
    depth_write: bool,
}

impl ScenePass {
    /// Build pipelines for the given MSAA sample count.
    pub fn new(device: &wgpu::Device, sample_count: u32) -> Self {
        let shader = wgsl_module(
            device,
            "Scene Shader",
            include_str!("../../assets/shaders/scene.wgsl"),
        );
        let stages = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[uniform_buffer(0, stages), storage_buffer(1, stages)],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform"),
            size: size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let objects = DynamicBuffer::new(
            device,
            "Scene Objects",
            64,
            wgpu::BufferUsages::STORAGE,
        );
        let grid_vertices = DynamicBuffer::new(
            device,
            "Grid Vertices",
            256,
            wgpu::BufferUsages::VERTEX,
        );
        let bind_group = Self::create_bind_group(device, &layout, &frame_buffer, objects.buffer());

        let build = |spec: PipelineSpec<'_>| {
            Self::create_pipeline(device, &pipeline_layout, &shader, sample_count, spec)
        };
        let opaque = build(PipelineSpec {
            label: "Scene Opaque",
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
            vertex_layout: GpuMesh::vertex_layout(),
            topology: wgpu::PrimitiveTopology::TriangleList,
            blend: None,
            depth_write: true,
        });
        let transparent = build(PipelineSpec {
            label: "Scene Transparent",
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
            vertex_layout: GpuMesh::vertex_layout(),
            topology: wgpu::PrimitiveTopology::TriangleList,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            depth_write: false,
        });
        let wireframe = build(PipelineSpec {
            label: "Scene Wireframe",
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
            vertex_layout: GpuMesh::vertex_layout(),
            topology: wgpu::PrimitiveTopology::LineList,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            depth_write: true,
        });
        let grid = build(PipelineSpec {
            label: "Scene Grid",
            vertex_entry: "vs_grid",
            fragment_entry: "fs_grid",
            vertex_layout: GridVertex::layout(),
            topology: wgpu::PrimitiveTopology::LineList,
            blend: None,
            depth_write: true,
        });

        Self {
            frame_buffer,
            objects,
            grid_vertices,
            layout,
            bind_group,
            opaque,
            transparent,
            wireframe,
            grid,
        }
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        frame: &wgpu::Buffer,
        objects: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: objects.as_entire_binding(),
                },
            ],
        })
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        sample_count: u32,
        spec: PipelineSpec<'_>,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(spec.label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some(spec.vertex_entry),
                buffers: &[spec.vertex_layout],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some(spec.fragment_entry),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
                    blend: spec.blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: spec.topology,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: spec.depth_write,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                ..Default::default()
            },
            multiview: None,
            cache: None,
        })
    }

    /// Upload this frame's camera, lights, objects and grid.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        frame: &FrameUniform,
        objects: &[ObjectUniform],
        grid: Option<&Grid>,
    ) {
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(frame));
        if self.objects.write(device, queue, objects) {
            self.bind_group = Self::create_bind_group(
                device,
                &self.layout,
                &self.frame_buffer,
                self.objects.buffer(),
            );
        }
        let lines = grid.map(GridVertex::lines).unwrap_or_default();
        let _ = self.grid_vertices.write(device, queue, &lines);
    }

    /// Record the pass. `draws` must already be ordered.
    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        targets: &SceneTargets<'_>,
        clear: wgpu::Color,
        draws: &[Draw],
        meshes: &MeshCache,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: targets.color,
                resolve_target: targets.resolve,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: targets.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });
        pass.set_bind_group(0, &self.bind_group, &[]);

        let mut grid_drawn = false;
        for draw in draws {
            if draw.transparent && !grid_drawn {
                self.encode_grid(&mut pass);
                grid_drawn = true;
            }
            let Some(mesh) = meshes.get(&draw.mesh) else {
                continue;
            };
            let (pipeline, indices, count) = if draw.wireframe {
                (&self.wireframe, &mesh.edges, mesh.edge_count)
            } else if draw.transparent {
                (&self.transparent, &mesh.indices, mesh.index_count)
            } else {
                (&self.opaque, &mesh.indices, mesh.index_count)
            };
            if count == 0 {
                continue;
            }
            pass.set_pipeline(pipeline);
            pass.set_vertex_buffer(0, mesh.vertices.slice(..));
            pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..count, 0, draw.instance..draw.instance + 1);
        }
        if !grid_drawn {
            self.encode_grid(&mut pass);
        }
    }

    fn encode_grid(&self, pass: &mut wgpu::RenderPass<'_>) {
        let count = self.grid_vertices.count() as u32;
        if count == 0 {
            return;
        }
        pass.set_pipeline(&self.grid);
        pass.set_vertex_buffer(0, self.grid_vertices.buffer().slice(..));
        pass.draw(0..count, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Geometry;

    fn draw(instance: u32, transparent: bool, depth: f32) -> Draw {
        Draw {
            instance,
            mesh: Geometry::cube(1.0).cache_key(),
            wireframe: false,
            transparent,
            depth,
        }
    }

    #[test]
    fn transparent_draws_sort_back_to_front_after_opaque() {
        let mut draws = [
            draw(0, true, 1.0),
            draw(1, false, 9.0),
            draw(2, true, 5.0),
            draw(3, false, 2.0),
        ];
        order_draws(&mut draws);
        let order: Vec<u32> = draws.iter().map(|d| d.instance).collect();
        assert_eq!(order, [1, 3, 2, 0]);
    }

    #[test]
    fn grid_center_lines_are_highlighted() {
        let grid = Grid::new(4.0, 4);
        let lines = GridVertex::lines(&grid);
        assert_eq!(lines.len(), grid.segments().len() * 2);
        let bright = lines
            .iter()
            .filter(|v| v.color[0] > grid.color.x + 1e-3)
            .count();
        assert_eq!(bright, 4);
    }
}
