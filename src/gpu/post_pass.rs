//! Post pass: applies the surface's [`PostChain`](crate::surface::PostChain)
//! to the resolved HDR scene and tone maps into the presentation format.

use super::pipeline_helpers::{
    create_screen_space_pipeline, filtering_sampler, linear_sampler,
    texture_2d, uniform_buffer, wgsl_module,
};
use super::uniforms::PostUniform;

/// Full-screen post-processing pipeline.
pub struct PostPass {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    params_buffer: wgpu::Buffer,
}

impl PostPass {
    /// Create the pass reading from `input` and writing `format`.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        input: &wgpu::TextureView,
    ) -> Self {
        let shader = wgsl_module(
            device,
            "Post Shader",
            include_str!("../../assets/shaders/post.wgsl"),
        );
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Post Bind Group Layout"),
            entries: &[
                texture_2d(0),
                filtering_sampler(1),
                uniform_buffer(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let pipeline = create_screen_space_pipeline(device, "Post", &shader, format, &[&layout]);
        let sampler = linear_sampler(device, "Post Sampler");
        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Post Params Buffer"),
            size: size_of::<PostUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = Self::create_bind_group(device, &layout, input, &sampler, &params_buffer);
        Self {
            pipeline,
            layout,
            bind_group,
            sampler,
            params_buffer,
        }
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        input: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        params: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Post Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(input),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: params.as_entire_binding(),
                },
            ],
        })
    }

    /// Point the pass at a new input after the scene target was recreated.
    pub fn rebind_input(&mut self, device: &wgpu::Device, input: &wgpu::TextureView) {
        self.bind_group = Self::create_bind_group(
            device,
            &self.layout,
            input,
            &self.sampler,
            &self.params_buffer,
        );
    }

    /// Upload this frame's effect parameters.
    pub fn prepare(&self, queue: &wgpu::Queue, params: &PostUniform) {
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(params));
    }

    /// Record the pass into `output`.
    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, output: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Post Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            ..Default::default()
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}
