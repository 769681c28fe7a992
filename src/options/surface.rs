use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::surface::{
    CameraSetup, OrbitSettings, PostChain, Projection, SurfaceConfig,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// The shared surface every sample without its own configuration renders
/// into.
pub struct SurfaceOptions {
    /// Camera eye position.
    pub camera_position: [f32; 3],
    /// Orbit pivot.
    pub camera_target: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
    /// Orbit inertia. `0` disables damping.
    pub damping: f32,
    /// Rotation sensitivity multiplier.
    pub rotate_speed: f32,
    /// Zoom sensitivity multiplier.
    pub zoom_speed: f32,
    /// Pan sensitivity multiplier.
    pub pan_speed: f32,
    /// Shadow casting.
    pub shadows: bool,
    /// Multisample antialiasing.
    pub antialias: bool,
    /// Background color (linear RGB).
    pub clear_color: [f32; 3],
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self::from_config(&SurfaceConfig::default())
    }
}

impl SurfaceOptions {
    fn from_config(config: &SurfaceConfig) -> Self {
        let (fov_y, near, far) = match config.camera.projection {
            Projection::Perspective { fov_y, near, far } => (fov_y, near, far),
            Projection::Orthographic { near, far, .. } => (50.0, near, far),
        };
        Self {
            camera_position: config.camera.position.to_array(),
            camera_target: config.camera.target.to_array(),
            fov_y,
            near,
            far,
            damping: config.orbit.damping.unwrap_or(0.0),
            rotate_speed: config.orbit.rotate_speed,
            zoom_speed: config.orbit.zoom_speed,
            pan_speed: config.orbit.pan_speed,
            shadows: config.shadows,
            antialias: config.antialias,
            clear_color: config.clear_color.to_array(),
        }
    }

    /// Surface configuration handed to samples as their defaults.
    #[must_use]
    pub fn to_config(&self) -> SurfaceConfig {
        let fov_y = self.fov_y.clamp(1.0, 179.0);
        let near = self.near.max(1e-4);
        SurfaceConfig {
            camera: CameraSetup {
                position: Vec3::from_array(self.camera_position),
                target: Vec3::from_array(self.camera_target),
                projection: Projection::Perspective {
                    fov_y,
                    near,
                    far: self.far.max(near * 2.0),
                },
            },
            orbit: OrbitSettings {
                damping: (self.damping > 0.0)
                    .then(|| self.damping.min(1.0)),
                rotate_speed: self.rotate_speed,
                zoom_speed: self.zoom_speed,
                pan_speed: self.pan_speed,
                ..OrbitSettings::default()
            },
            post: PostChain::new(),
            clear_color: Vec3::from_array(self.clear_color),
            shadows: self.shadows,
            antialias: self.antialias,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_maps_to_shared_surface() {
        assert_eq!(SurfaceOptions::default().to_config(), SurfaceConfig::default());
    }

    #[test]
    fn zero_damping_disables_inertia() {
        let opts = SurfaceOptions {
            damping: 0.0,
            ..SurfaceOptions::default()
        };
        assert_eq!(opts.to_config().orbit.damping, None);
    }

    #[test]
    fn broken_clip_planes_are_repaired() {
        let opts = SurfaceOptions {
            near: -1.0,
            far: 0.0,
            fov_y: 500.0,
            ..SurfaceOptions::default()
        };
        match opts.to_config().camera.projection {
            Projection::Perspective { fov_y, near, far } => {
                assert_eq!(fov_y, 179.0);
                assert!(near > 0.0);
                assert!(far > near);
            }
            Projection::Orthographic { .. } => unreachable!(),
        }
    }
}
