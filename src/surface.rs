//! Rendering surface configuration and the traits a back end implements.
//!
//! The gallery never talks to the GPU directly. It asks a
//! [`SurfaceFactory`] for a [`RenderSurface`] built from a
//! [`SurfaceConfig`], owns it for the lifetime of one mount, and drops it
//! on unmount. The wgpu implementation lives in [`crate::gpu`].

use glam::Vec3;

use crate::error::VistaError;
use crate::input::InputEvent;

// ── Camera ───────────────────────────────────────────────────────────────

/// Camera projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Perspective projection.
    Perspective {
        /// Vertical field of view in degrees.
        fov_y: f32,
        /// Near clip distance.
        near: f32,
        /// Far clip distance.
        far: f32,
    },
    /// Orthographic projection.
    Orthographic {
        /// Visible world height.
        height: f32,
        /// Near clip distance.
        near: f32,
        /// Far clip distance.
        far: f32,
    },
}

impl Projection {
    /// Perspective projection with default clip planes.
    #[must_use]
    pub fn perspective(fov_y: f32) -> Self {
        Self::Perspective {
            fov_y,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Projection matrix for the given aspect ratio (right-handed, depth
    /// 0..1).
    #[must_use]
    pub fn matrix(&self, aspect: f32) -> glam::Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };
        match *self {
            Self::Perspective { fov_y, near, far } => glam::Mat4::perspective_rh(
                fov_y.to_radians(),
                aspect,
                near,
                far,
            ),
            Self::Orthographic { height, near, far } => {
                let half_h = height * 0.5;
                let half_w = half_h * aspect;
                glam::Mat4::orthographic_rh(
                    -half_w, half_w, -half_h, half_h, near, far,
                )
            }
        }
    }
}

/// Initial camera placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSetup {
    /// Eye position.
    pub position: Vec3,
    /// Look-at point (orbit pivot).
    pub target: Vec3,
    /// Projection.
    pub projection: Projection,
}

/// Orbit controls attached to the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSettings {
    /// Whether mouse input moves the camera at all.
    pub enabled: bool,
    /// Inertia factor in `(0, 1]`; `None` stops immediately on release.
    pub damping: Option<f32>,
    /// Rotation sensitivity.
    pub rotate_speed: f32,
    /// Zoom sensitivity.
    pub zoom_speed: f32,
    /// Pan sensitivity.
    pub pan_speed: f32,
    /// Continuous rotation around the target, radians per second.
    pub auto_rotate: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            damping: Some(0.05),
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            auto_rotate: 0.0,
        }
    }
}

// ── Post-processing ──────────────────────────────────────────────────────

/// One screen-space effect of a [`PostChain`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PostEffect {
    /// Exposure multiplier followed by tone mapping.
    Exposure {
        /// Linear exposure factor.
        value: f32,
    },
    /// Bright-pass glow.
    Glow {
        /// Glow strength.
        strength: f32,
        /// Luminance threshold.
        threshold: f32,
        /// Blur radius in pixels.
        radius: f32,
    },
    /// Darkened corners.
    Vignette {
        /// Darkening strength.
        intensity: f32,
        /// Falloff width.
        smoothness: f32,
    },
    /// RGB channel separation.
    ChromaticAberration {
        /// Channel offset in pixels.
        offset: f32,
    },
    /// Film grain.
    Noise {
        /// Grain strength.
        amount: f32,
    },
    /// Blocky downsampling.
    Pixelate {
        /// Block size in pixels.
        size: f32,
    },
    /// Color tint blended over the image.
    Tint {
        /// Tint color.
        color: Vec3,
        /// Blend factor.
        amount: f32,
    },
    /// Desaturation.
    Grayscale {
        /// Blend factor.
        amount: f32,
    },
    /// Hue rotation, saturation, brightness and contrast in one step.
    ColorGrade {
        /// Hue rotation in radians.
        hue: f32,
        /// Saturation offset, `-1` is fully grey.
        saturation: f32,
        /// Brightness offset.
        brightness: f32,
        /// Contrast offset around mid grey.
        contrast: f32,
    },
    /// Sepia toning.
    Sepia {
        /// Blend factor.
        amount: f32,
    },
    /// Halftone dot pattern.
    DotScreen {
        /// Dot frequency relative to pixels.
        scale: f32,
    },
}

/// Ordered list of screen-space effects applied after the scene pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostChain {
    /// Effects in application order.
    pub effects: Vec<PostEffect>,
}

impl PostChain {
    /// Empty chain (plain copy to the screen).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an effect.
    #[must_use]
    pub fn with(mut self, effect: PostEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// `true` when no effect is applied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

// ── SurfaceConfig ────────────────────────────────────────────────────────

/// Everything needed to create a rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceConfig {
    /// Initial camera.
    pub camera: CameraSetup,
    /// Orbit controls.
    pub orbit: OrbitSettings,
    /// Post-processing chain.
    pub post: PostChain,
    /// Clear color (linear RGB).
    pub clear_color: Vec3,
    /// Shadow casting enabled.
    pub shadows: bool,
    /// Antialiasing enabled.
    pub antialias: bool,
}

impl Default for SurfaceConfig {
    /// The shared surface used by samples that do not render their own:
    /// camera at (5, 5, 5) looking at the origin, 50° field of view, damped
    /// orbit controls, shadows and antialiasing on.
    fn default() -> Self {
        Self {
            camera: CameraSetup {
                position: Vec3::splat(5.0),
                target: Vec3::ZERO,
                projection: Projection::perspective(50.0),
            },
            orbit: OrbitSettings::default(),
            post: PostChain::new(),
            clear_color: Vec3::new(0.02, 0.02, 0.03),
            shadows: true,
            antialias: true,
        }
    }
}

// ── Traits ───────────────────────────────────────────────────────────────

/// A live rendering surface owned by one mount.
///
/// Dropping the surface releases everything it holds.
pub trait RenderSurface {
    /// Configuration the surface was created with.
    fn config(&self) -> &SurfaceConfig;

    /// Viewport size changed (physical pixels).
    fn resize(&mut self, width: u32, height: u32);

    /// Feed a pointer event to the camera controls. Returns `true` if the
    /// event was consumed.
    fn handle_input(&mut self, event: &InputEvent) -> bool;

    /// Return the camera to its configured placement.
    fn reset_camera(&mut self);

    /// Current eye position.
    fn eye(&self) -> Vec3 {
        self.config().camera.position
    }
}

/// Creates [`RenderSurface`]s.
pub trait SurfaceFactory {
    /// Surface type produced.
    type Surface: RenderSurface;

    /// Create a surface from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::Surface`] if the back end cannot allocate the
    /// surface's resources.
    fn create(&mut self, config: SurfaceConfig)
        -> Result<Self::Surface, VistaError>;
}

#[cfg(test)]
pub(crate) mod recording {
    //! Fake factory that records the surface lifecycle.

    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{InputEvent, RenderSurface, SurfaceConfig, SurfaceFactory};
    use crate::error::VistaError;

    /// Lifecycle event seen by [`RecordingFactory`].
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum SurfaceEvent {
        Created(u32),
        Dropped(u32),
        CameraReset(u32),
    }

    /// Shared event log.
    pub(crate) type Log = Rc<RefCell<Vec<SurfaceEvent>>>;

    #[derive(Debug)]
    pub(crate) struct RecordingSurface {
        pub(crate) id: u32,
        pub(crate) config: SurfaceConfig,
        pub(crate) size: (u32, u32),
        log: Log,
    }

    impl RenderSurface for RecordingSurface {
        fn config(&self) -> &SurfaceConfig {
            &self.config
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.size = (width, height);
        }

        fn handle_input(&mut self, _event: &InputEvent) -> bool {
            self.config.orbit.enabled
        }

        fn reset_camera(&mut self) {
            self.log.borrow_mut().push(SurfaceEvent::CameraReset(self.id));
        }
    }

    impl Drop for RecordingSurface {
        fn drop(&mut self) {
            self.log.borrow_mut().push(SurfaceEvent::Dropped(self.id));
        }
    }

    #[derive(Debug, Default)]
    pub(crate) struct RecordingFactory {
        pub(crate) log: Log,
        next_id: u32,
        pub(crate) fail: bool,
    }

    impl RecordingFactory {
        pub(crate) fn events(&self) -> Vec<SurfaceEvent> {
            self.log.borrow().clone()
        }

        pub(crate) fn live(&self) -> usize {
            let events = self.log.borrow();
            let created = events
                .iter()
                .filter(|e| matches!(e, SurfaceEvent::Created(_)))
                .count();
            let dropped = events
                .iter()
                .filter(|e| matches!(e, SurfaceEvent::Dropped(_)))
                .count();
            created - dropped
        }
    }

    impl SurfaceFactory for RecordingFactory {
        type Surface = RecordingSurface;

        fn create(
            &mut self,
            config: SurfaceConfig,
        ) -> Result<RecordingSurface, VistaError> {
            if self.fail {
                return Err(VistaError::Surface("no adapter".to_owned()));
            }
            self.next_id += 1;
            self.log
                .borrow_mut()
                .push(SurfaceEvent::Created(self.next_id));
            Ok(RecordingSurface {
                id: self.next_id,
                config,
                size: (0, 0),
                log: Rc::clone(&self.log),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_default_matches_documented_rig() {
        let config = SurfaceConfig::default();
        assert_eq!(config.camera.position, Vec3::new(5.0, 5.0, 5.0));
        assert!(matches!(
            config.camera.projection,
            Projection::Perspective { fov_y, .. } if fov_y == 50.0
        ));
        assert!(config.orbit.enabled);
        assert!(config.orbit.damping.is_some());
        assert!(config.shadows);
        assert!(config.antialias);
        assert!(config.post.is_empty());
    }

    #[test]
    fn projection_survives_degenerate_aspect() {
        let m = Projection::perspective(50.0).matrix(0.0);
        assert!(m.is_finite());
        let ortho = Projection::Orthographic {
            height: 10.0,
            near: 0.1,
            far: 100.0,
        };
        assert!(ortho.matrix(f32::NAN).is_finite());
    }

    #[test]
    fn post_chain_keeps_order() {
        let chain = PostChain::new()
            .with(PostEffect::Exposure { value: 1.2 })
            .with(PostEffect::Vignette {
                intensity: 0.5,
                smoothness: 0.5,
            });
        assert!(matches!(chain.effects[0], PostEffect::Exposure { .. }));
        assert!(matches!(chain.effects[1], PostEffect::Vignette { .. }));
    }
}
