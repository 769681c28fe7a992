//! Standalone gallery window backed by winit.
//!
//! When the `gui` feature is enabled, a wry webview hosting the shell UI is
//! created alongside the 3D viewport. Without it the gallery is driven from
//! the keyboard alone.
//!
//! ```no_run
//! # use vista::Viewer;
//! Viewer::builder()
//!     .with_address("/category/basics/basic-cube")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::{
    error::VistaError,
    gallery::Gallery,
    gpu::{render_context::RenderContext, stage::GpuSurfaceFactory},
    input::{InputEvent, KeyAction, MouseButton},
    options::Options,
    registry::SampleRegistry,
    surface::RenderSurface,
    util::frame_timing::FrameTiming,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
#[derive(Debug, Default)]
pub struct ViewerBuilder {
    options: Option<Options>,
    address: Option<String>,
}

impl ViewerBuilder {
    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Open this address instead of the configured initial address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        let options = self.options.unwrap_or_default();
        let address = self
            .address
            .unwrap_or_else(|| options.navigation.initial_address.clone());
        Viewer { options, address }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window browsing the built-in samples.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
#[derive(Debug)]
pub struct Viewer {
    options: Options,
    address: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::default()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Fails if the event loop cannot start, the built-in samples clash, or
    /// the GPU cannot render a mounted sample.
    pub fn run(self) -> Result<(), VistaError> {
        #[cfg(all(feature = "gui", target_os = "linux"))]
        gtk::init().map_err(|e| VistaError::Viewer(e.to_string()))?;

        let registry = SampleRegistry::builtin()?;
        let event_loop =
            EventLoop::new().map_err(|e| VistaError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        #[cfg(feature = "gui")]
        let panel = crate::gui::panel::PanelController::new(
            self.options.panel.visible,
            self.options.panel.width,
        );
        let mut app = ViewerApp {
            window: None,
            context: None,
            gallery: None,
            registry: Some(registry),
            timing: FrameTiming::new(),
            options: self.options,
            address: self.address,
            failure: None,
            #[cfg(feature = "gui")]
            panel,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| VistaError::Viewer(e.to_string()))?;
        app.failure.map_or(Ok(()), Err)
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    context: Option<RenderContext>,
    gallery: Option<Gallery<GpuSurfaceFactory>>,
    /// Handed to the gallery once the GPU is up.
    registry: Option<SampleRegistry>,
    timing: FrameTiming,
    options: Options,
    address: String,
    /// Error that ended the event loop.
    failure: Option<VistaError>,
    #[cfg(feature = "gui")]
    panel: crate::gui::panel::PanelController,
}

/// Compute the wgpu surface size: always the full window dimensions.
///
/// The webview panel overlays the right edge of the window; the surface
/// covers the entire window to avoid stretching.
fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

fn clear_color(options: &Options) -> wgpu::Color {
    let [r, g, b] = options.surface.clear_color;
    wgpu::Color {
        r: f64::from(r),
        g: f64::from(g),
        b: f64::from(b),
        a: 1.0,
    }
}

impl ViewerApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: VistaError) {
        log::error!("{error}");
        self.failure = Some(error);
        event_loop.exit();
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(context) = &mut self.context {
            context.resize(width, height);
        }
        if let Some(gallery) = &mut self.gallery {
            gallery.factory_mut().set_size(width, height);
            if let Some(mounted) = gallery.mounted_mut() {
                mounted.surface_mut().resize(width, height);
            }
        }
    }

    fn forward_input(&mut self, event: &InputEvent) -> bool {
        self.gallery
            .as_mut()
            .and_then(Gallery::mounted_mut)
            .is_some_and(|mounted| mounted.surface_mut().handle_input(event))
    }

    fn key_action(&mut self, action: KeyAction) {
        let Some(gallery) = &mut self.gallery else {
            return;
        };
        if gallery.key_action(action) {
            return;
        }
        // Only the panel toggle is left for the window to handle.
        #[cfg(feature = "gui")]
        if let Some(window) = &self.window {
            self.panel.toggle(window);
        }
    }

    /// One frame: apply UI input, commit navigation, advance and draw.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(context), Some(gallery)) =
            (&self.window, &mut self.context, &mut self.gallery)
        else {
            return;
        };

        #[cfg(all(feature = "gui", target_os = "linux"))]
        while gtk::events_pending() {
            let _ = gtk::main_iteration_do(false);
        }

        #[cfg(feature = "gui")]
        self.panel.drain_and_apply(gallery, window);

        if let Err(e) = gallery.pump() {
            self.fail(event_loop, e);
            return;
        }

        let dt = self.timing.end_frame();
        gallery.tick(dt);

        if gallery.take_dirty() {
            window.set_title(&gallery.window_title());
            #[cfg(feature = "gui")]
            self.panel.sync_view(&gallery.view(), window);
        }

        match context.get_next_frame() {
            Ok(frame) => {
                let view = frame
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                if let Some(mounted) = gallery.mounted_mut() {
                    let (stage, scene) = mounted.stage();
                    stage.update(dt);
                    stage.render(scene, &view);
                } else {
                    context.clear(&view, clear_color(&self.options));
                }
                frame.present();
            }
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                let (w, h) = viewport_size(window.inner_size());
                self.resize(w, h);
            }
            Err(e) => {
                log::error!("render error: {e:?}");
            }
        }

        #[cfg(feature = "gui")]
        if self.timing.report_due() {
            if let Some(gallery) = &self.gallery {
                self.panel.push_stats(&crate::gui::webview::FrameStats {
                    fps: self.timing.fps(),
                    resident_meshes: gallery
                        .mounted()
                        .map_or(0, |m| m.surface().resident_meshes()),
                    surfaces_created: gallery.factory().created(),
                });
            }
        }

        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.options.window.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.options.window.width,
                self.options.window.height,
            ));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, VistaError::Viewer(e.to_string()));
                return;
            }
        };

        let size = viewport_size(window.inner_size());
        let context =
            match pollster::block_on(RenderContext::new(Arc::clone(&window), size)) {
                Ok(c) => c,
                Err(e) => {
                    self.fail(event_loop, e.into());
                    return;
                }
            };

        let Some(registry) = self.registry.take() else {
            return;
        };
        log::info!(
            "{} samples in {} categories, starting at {}",
            registry.sample_count(),
            registry.category_count(),
            self.address
        );
        let gallery = Gallery::new(
            registry,
            context.surface_factory(),
            self.options.surface.to_config(),
            &self.address,
            self.options.navigation.sidebar_open,
        );

        #[cfg(feature = "gui")]
        self.panel.init_webview(&window, &gallery);

        window.request_redraw();
        self.window = Some(window);
        self.context = Some(context);
        self.gallery = Some(gallery);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        // Guard: window, context and gallery must be initialised.
        if self.window.is_none() || self.gallery.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(event_size) => {
                let (w, h) = viewport_size(event_size);
                self.resize(w, h);
                #[cfg(feature = "gui")]
                if let Some(window) = &self.window {
                    self.panel.apply_layout(window);
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(inner) = self.window.as_ref().map(|w| w.inner_size()) {
                    let (w, h) = viewport_size(inner);
                    self.resize(w, h);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            WindowEvent::MouseInput { button, state, .. } => {
                let _ = self.forward_input(&InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                let _ = self.forward_input(&InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });

                // Peek panel on hover near the right edge.
                #[cfg(feature = "gui")]
                if let Some(window) = &self.window {
                    self.panel.update_peek(position.x as f32, window);
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                let _ = self.forward_input(&InputEvent::Scroll { delta });
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                let _ = self.forward_input(&InputEvent::ModifiersChanged {
                    shift: modifiers.state().shift_key(),
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let key = format!("{code:?}");
                if let Some(action) = self.options.keybindings.lookup(&key) {
                    log::debug!("key {key} -> {action:?}");
                    self.key_action(action);
                }
            }

            _ => (),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Surfaces hold device resources; release them before the device.
        if let Some(gallery) = &mut self.gallery {
            gallery.shutdown();
        }
        self.gallery = None;
        self.context = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_falls_back_to_the_configured_address() {
        let mut options = Options::default();
        options.navigation.initial_address = "/category/lights".to_owned();
        let viewer = Viewer::builder().with_options(options.clone()).build();
        assert_eq!(viewer.address, "/category/lights");

        let viewer = Viewer::builder()
            .with_options(options)
            .with_address("/category/basics")
            .build();
        assert_eq!(viewer.address, "/category/basics");
    }

    #[test]
    fn viewport_is_never_empty() {
        assert_eq!(
            viewport_size(winit::dpi::PhysicalSize::new(0, 0)),
            (1, 1)
        );
    }
}
