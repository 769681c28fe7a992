//! The renderable unit contract every sample implements.

use glam::Vec3;

use crate::panel::{PanelSpec, ParameterPanel};
use crate::scene::Scene;
use crate::surface::SurfaceConfig;

/// Timing of the frame being built.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    /// Seconds since the sample was mounted.
    pub time: f32,
    /// Seconds since the previous frame (clamped to a sane maximum).
    pub delta: f32,
    /// Frames since the sample was mounted.
    pub frame: u64,
    /// Camera eye at the end of the previous frame.
    pub eye: Vec3,
}

impl FrameInput {
    /// Longest step a sample ever sees, so a stalled window does not blow up
    /// integrators.
    pub const MAX_DELTA: f32 = 0.1;

    /// Advance by `dt` seconds.
    #[must_use]
    pub fn advance(self, dt: f32) -> Self {
        let delta = if dt.is_finite() {
            dt.clamp(0.0, Self::MAX_DELTA)
        } else {
            0.0
        };
        Self {
            time: self.time + delta,
            delta,
            frame: self.frame + 1,
            eye: self.eye,
        }
    }
}

/// A self-contained interactive rendering sample.
///
/// Instances are created fresh for every mount through the registry's
/// constructor and dropped on unmount, so any state a sample keeps (a
/// physics world, particle buffers, accumulated rotation) lives exactly as
/// long as the mount.
pub trait Sample {
    /// Parameter groups shown in the control panel.
    fn parameters(&self) -> PanelSpec {
        PanelSpec::none()
    }

    /// Surface configuration for samples that render their own surface.
    ///
    /// Only consulted when the registry entry is flagged as rendering its
    /// own surface; `defaults` is the shared configuration.
    fn surface_config(&self, defaults: &SurfaceConfig) -> SurfaceConfig {
        defaults.clone()
    }

    /// Write this frame's scene. `scene` arrives cleared.
    fn update(
        &mut self,
        frame: &FrameInput,
        panel: &ParameterPanel,
        scene: &mut Scene,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_clamps_large_steps() {
        let f = FrameInput::default().advance(5.0);
        assert_eq!(f.delta, FrameInput::MAX_DELTA);
        assert_eq!(f.frame, 1);
        let g = f.advance(f32::NAN);
        assert_eq!(g.delta, 0.0);
        assert_eq!(g.time, f.time);
        assert_eq!(g.frame, 2);
    }
}
