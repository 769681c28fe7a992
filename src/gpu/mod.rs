//! wgpu back end for the gallery's rendering surfaces.
//!
//! [`render_context::RenderContext`] owns the window surface and device.
//! [`stage::GpuSurfaceFactory`] creates one [`stage::GpuStage`] per mount;
//! the stage draws a [`Scene`](crate::scene::Scene) with the scene pass and
//! finishes with the post pass.

/// Orbit camera driven by pointer input.
pub mod camera;
/// Growable GPU buffers.
pub mod dynamic_buffer;
/// Geometry uploaded once per stage.
pub mod mesh_cache;
/// Shared wgpu boilerplate helpers.
pub mod pipeline_helpers;
/// Screen-space post chain and tone mapping.
pub mod post_pass;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Lit objects, wireframes and grid.
pub mod scene_pass;
/// Surface factory and per-mount stage.
pub mod stage;
/// Render-target textures.
pub mod texture;
/// CPU-to-GPU layouts.
pub mod uniforms;
