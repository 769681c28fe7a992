//! Perspective versus orthographic projection on a dedicated surface.

use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{axes, cone, construct};
use crate::error::VistaError;
use crate::panel::{PanelSpec, ParameterPanel};
use crate::registry::{RegistryBuilder, SampleEntry};
use crate::sample::{FrameInput, Sample};
use crate::scene::{
    hex_color, CameraOverride, Geometry, Grid, Light, Material, Scene, SceneObject,
};
use crate::surface::{CameraSetup, Projection, SurfaceConfig};

pub(super) fn register(builder: &mut RegistryBuilder) -> Result<(), VistaError> {
    let _ = builder.register(
        "cameras",
        SampleEntry::new("camera-demo", construct::<CameraDemo>)
            .titled("Camera Controls")
            .described("Compare perspective and orthographic projection.")
            .own_surface()
            .with_source(include_str!("cameras.rs")),
    )?;
    Ok(())
}

/// Orthographic zoom is relative to a 500 pixel tall viewport, so zoom 50
/// shows 10 world units.
const ORTHO_REFERENCE: f32 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
enum ProjectionKind {
    #[default]
    Perspective,
    Orthographic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
struct CameraSettings {
    projection: ProjectionKind,
    /// Vertical field of view (perspective only).
    #[schemars(title = "Field of View", range(min = 10.0, max = 120.0), extend("step" = 1.0))]
    fov: f32,
    /// Magnification (orthographic only).
    #[schemars(range(min = 10.0, max = 200.0), extend("step" = 1.0))]
    zoom: f32,
    #[schemars(range(min = 0.1, max = 10.0), extend("step" = 0.1))]
    near: f32,
    #[schemars(range(min = 10.0, max = 2000.0), extend("step" = 10.0))]
    far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            projection: ProjectionKind::Perspective,
            fov: 50.0,
            zoom: 50.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraSettings {
    fn projection(&self) -> Projection {
        let near = self.near.max(1e-3);
        let far = self.far.max(near + 0.1);
        match self.projection {
            ProjectionKind::Perspective => Projection::Perspective {
                fov_y: self.fov,
                near,
                far,
            },
            ProjectionKind::Orthographic => Projection::Orthographic {
                height: ORTHO_REFERENCE / self.zoom.max(1.0),
                near,
                far,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
struct CameraParams {
    camera: CameraSettings,
}

#[derive(Debug, Default)]
struct CameraDemo;

impl Sample for CameraDemo {
    fn parameters(&self) -> PanelSpec {
        PanelSpec::of::<CameraParams>()
    }

    fn surface_config(&self, defaults: &SurfaceConfig) -> SurfaceConfig {
        SurfaceConfig {
            camera: CameraSetup {
                position: Vec3::splat(5.0),
                target: Vec3::ZERO,
                projection: CameraSettings::default().projection(),
            },
            ..defaults.clone()
        }
    }

    fn update(&mut self, _frame: &FrameInput, panel: &ParameterPanel, scene: &mut Scene) {
        let CameraParams { camera } = panel.read();
        scene.camera = Some(CameraOverride {
            projection: camera.projection(),
            position: None,
            target: None,
        });

        scene.light(Light::ambient(0.5));
        scene.light(Light::directional(Vec3::new(10.0, 10.0, 5.0), 1.0));
        scene.add(
            SceneObject::new(Geometry::cube(1.0))
                .with_material(Material::color(hex_color("#ff6b6b"))),
        );
        scene.add(
            SceneObject::new(Geometry::Sphere {
                radius: 0.5,
                width_segments: 32,
                height_segments: 32,
            })
            .at(Vec3::new(2.0, 0.0, 0.0))
            .with_material(Material::color(hex_color("#4ecdc4"))),
        );
        scene.add(
            SceneObject::new(cone(0.5, 1.0))
                .at(Vec3::new(-2.0, 0.0, 0.0))
                .with_material(Material::color(hex_color("#45b7d1"))),
        );
        scene.grid = Some(Grid::new(10.0, 10));
        axes(scene, 5.0);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn requested(panel: &ParameterPanel) -> Projection {
        let mut scene = Scene::new();
        CameraDemo.update(&FrameInput::default(), panel, &mut scene);
        scene.camera.unwrap().projection
    }

    #[test]
    fn surface_starts_in_perspective() {
        let config = CameraDemo.surface_config(&SurfaceConfig::default());
        assert_eq!(config.camera.position, Vec3::splat(5.0));
        assert!(matches!(
            config.camera.projection,
            Projection::Perspective { fov_y, .. } if fov_y == 50.0
        ));
    }

    #[test]
    fn orthographic_height_follows_zoom() {
        let mut panel = ParameterPanel::new(CameraDemo.parameters());
        panel.set("camera", "projection", json!("orthographic")).unwrap();
        assert!(matches!(
            requested(&panel),
            Projection::Orthographic { height, .. } if height == 10.0
        ));
        panel.set("camera", "zoom", json!(100.0)).unwrap();
        assert!(matches!(
            requested(&panel),
            Projection::Orthographic { height, .. } if height == 5.0
        ));
    }

    #[test]
    fn clip_planes_stay_ordered() {
        let settings = CameraSettings {
            near: 10.0,
            far: 10.0,
            ..CameraSettings::default()
        };
        let Projection::Perspective { near, far, .. } = settings.projection() else {
            panic!("expected perspective");
        };
        assert!(far > near);
    }
}
