//! wgpu implementation of the surface traits.
//!
//! A [`GpuStage`] is what one mount renders into: its own orbit camera,
//! off-screen targets, pipelines and mesh cache. Everything is released when
//! the stage drops, so switching samples never leaks GPU memory into the
//! next mount.

use std::sync::Arc;

use glam::Vec3;

use super::camera::OrbitCamera;
use super::mesh_cache::MeshCache;
use super::post_pass::PostPass;
use super::scene_pass::{order_draws, Draw, ScenePass, SceneTargets};
use super::texture::{RenderTarget, DEPTH_FORMAT, HDR_FORMAT};
use super::uniforms::{FrameUniform, ObjectUniform, PostUniform};
use crate::error::VistaError;
use crate::input::InputEvent;
use crate::scene::{CameraOverride, Scene};
use crate::surface::{RenderSurface, SurfaceConfig, SurfaceFactory};

const MSAA_SAMPLES: u32 = 4;

/// Creates a [`GpuStage`] per mount, sharing one device.
pub struct GpuSurfaceFactory {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    format: wgpu::TextureFormat,
    size: (u32, u32),
    created: u64,
}

impl GpuSurfaceFactory {
    /// Factory for stages presenting in `format` at `size`.
    #[must_use]
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        format: wgpu::TextureFormat,
        size: (u32, u32),
    ) -> Self {
        Self {
            device,
            queue,
            format,
            size,
            created: 0,
        }
    }

    /// Size new stages start with. Follow window resizes with this.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width.max(1), height.max(1));
    }

    /// Number of stages created so far.
    #[must_use]
    pub fn created(&self) -> u64 {
        self.created
    }
}

impl SurfaceFactory for GpuSurfaceFactory {
    type Surface = GpuStage;

    fn create(&mut self, config: SurfaceConfig) -> Result<GpuStage, VistaError> {
        self.created += 1;
        log::debug!(
            "creating stage #{} at {}x{} (antialias {}, {} post effects)",
            self.created,
            self.size.0,
            self.size.1,
            config.antialias,
            config.post.effects.len(),
        );
        Ok(GpuStage::new(
            Arc::clone(&self.device),
            Arc::clone(&self.queue),
            self.format,
            self.size,
            config,
        ))
    }
}

struct Targets {
    hdr: RenderTarget,
    msaa: Option<RenderTarget>,
    depth: RenderTarget,
}

impl Targets {
    fn new(device: &wgpu::Device, size: (u32, u32), sample_count: u32) -> Self {
        Self {
            hdr: RenderTarget::new(device, "Stage HDR", size, HDR_FORMAT, 1),
            msaa: (sample_count > 1).then(|| {
                RenderTarget::new(device, "Stage MSAA", size, HDR_FORMAT, sample_count)
            }),
            depth: RenderTarget::new(device, "Stage Depth", size, DEPTH_FORMAT, sample_count),
        }
    }

    fn scene(&self) -> SceneTargets<'_> {
        match &self.msaa {
            Some(msaa) => SceneTargets {
                color: &msaa.view,
                resolve: Some(&self.hdr.view),
                depth: &self.depth.view,
            },
            None => SceneTargets {
                color: &self.hdr.view,
                resolve: None,
                depth: &self.depth.view,
            },
        }
    }
}

/// GPU resources of one mounted sample.
pub struct GpuStage {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: SurfaceConfig,
    camera: OrbitCamera,
    camera_request: Option<CameraOverride>,
    size: (u32, u32),
    sample_count: u32,
    targets: Targets,
    scene_pass: ScenePass,
    post_pass: PostPass,
    meshes: MeshCache,
    time: f32,
}

impl GpuStage {
    fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        format: wgpu::TextureFormat,
        size: (u32, u32),
        config: SurfaceConfig,
    ) -> Self {
        let size = (size.0.max(1), size.1.max(1));
        let sample_count = if config.antialias { MSAA_SAMPLES } else { 1 };
        let targets = Targets::new(&device, size, sample_count);
        let scene_pass = ScenePass::new(&device, sample_count);
        let post_pass = PostPass::new(&device, format, &targets.hdr.view);
        Self {
            camera: OrbitCamera::new(config.camera, config.orbit),
            camera_request: None,
            device,
            queue,
            config,
            size,
            sample_count,
            targets,
            scene_pass,
            post_pass,
            meshes: MeshCache::new(),
            time: 0.0,
        }
    }

    /// Orbit camera.
    #[must_use]
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Meshes currently resident on the GPU.
    #[must_use]
    pub fn resident_meshes(&self) -> usize {
        self.meshes.len()
    }

    /// Advance camera damping and the post-processing clock.
    pub fn update(&mut self, dt: f32) {
        self.time += dt;
        self.camera.update(dt);
    }

    /// Draw `scene` and post-process it into `output`.
    pub fn render(&mut self, scene: &Scene, output: &wgpu::TextureView) {
        if scene.camera != self.camera_request {
            if let Some(request) = &scene.camera {
                self.camera.retarget(request);
            }
            self.camera_request = scene.camera;
        }

        let aspect = self.size.0 as f32 / self.size.1 as f32;
        let eye = self.camera.eye();
        let frame = FrameUniform::new(
            self.camera.view_proj(aspect),
            eye,
            self.time,
            &scene.lights,
        );

        let mut objects = Vec::with_capacity(scene.objects.len());
        let mut draws = Vec::with_capacity(scene.objects.len());
        for (i, object) in scene.objects.iter().enumerate() {
            let mesh = self.meshes.prepare(&self.device, &object.geometry);
            objects.push(ObjectUniform::new(object));
            draws.push(Draw {
                instance: i as u32,
                mesh,
                wireframe: object.material.wireframe,
                transparent: object.material.is_transparent(),
                depth: object.transform.w_axis.truncate().distance_squared(eye),
            });
        }
        order_draws(&mut draws);
        self.meshes.end_frame();

        self.scene_pass.prepare(
            &self.device,
            &self.queue,
            &frame,
            &objects,
            scene.grid.as_ref(),
        );
        let chain = scene.post.as_ref().unwrap_or(&self.config.post);
        self.post_pass.prepare(
            &self.queue,
            &PostUniform::new(chain, self.size.0, self.size.1, self.time),
        );

        let background = scene.background.unwrap_or(self.config.clear_color);
        let clear = wgpu::Color {
            r: f64::from(background.x),
            g: f64::from(background.y),
            b: f64::from(background.z),
            a: 1.0,
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Stage Encoder"),
            });
        self.scene_pass.encode(
            &mut encoder,
            &self.targets.scene(),
            clear,
            &draws,
            &self.meshes,
        );
        self.post_pass.encode(&mut encoder, output);
        let _ = self.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl RenderSurface for GpuStage {
    fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == self.size {
            return;
        }
        self.size = (width, height);
        self.targets = Targets::new(&self.device, self.size, self.sample_count);
        self.post_pass.rebind_input(&self.device, &self.targets.hdr.view);
    }

    fn handle_input(&mut self, event: &InputEvent) -> bool {
        self.camera.handle_input(event)
    }

    fn reset_camera(&mut self) {
        self.camera.reset();
    }

    fn eye(&self) -> Vec3 {
        self.camera.eye()
    }
}

impl Drop for GpuStage {
    fn drop(&mut self) {
        log::debug!("releasing stage with {} resident meshes", self.meshes.len());
    }
}
