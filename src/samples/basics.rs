//! A spinning cube and a PBR sphere: the smallest useful scenes.

use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{construct, floor};
use crate::error::VistaError;
use crate::panel::{PanelSpec, ParameterPanel};
use crate::registry::{RegistryBuilder, SampleEntry};
use crate::sample::{FrameInput, Sample};
use crate::scene::{hex_color, Geometry, Grid, Light, Material, Scene, SceneObject};

const SOURCE: &str = include_str!("basics.rs");

pub(super) fn register(builder: &mut RegistryBuilder) -> Result<(), VistaError> {
    let _ = builder
        .register(
            "basics",
            SampleEntry::new("basic-cube", construct::<BasicCube>)
                .titled("Basic Cube")
                .described("A rotating cube. Adjust its position, scale and color.")
                .with_source(SOURCE),
        )?
        .register(
            "basics",
            SampleEntry::new("basic-sphere", construct::<BasicSphere>)
                .titled("Sphere and Material")
                .described("Sphere geometry with a physically based material.")
                .with_source(SOURCE),
        )?;
    Ok(())
}

// ── basic-cube ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Cube", inline)]
#[serde(default)]
struct CubeSettings {
    #[schemars(title = "X", range(min = -5.0, max = 5.0), extend("step" = 0.1))]
    position_x: f32,
    #[schemars(title = "Y", range(min = -5.0, max = 5.0), extend("step" = 0.1))]
    position_y: f32,
    #[schemars(title = "Z", range(min = -5.0, max = 5.0), extend("step" = 0.1))]
    position_z: f32,
    /// Radians per second around X and Y.
    #[schemars(range(min = 0.0, max = 6.0), extend("step" = 0.05))]
    rotation_speed: f32,
    #[schemars(range(min = 0.1, max = 3.0), extend("step" = 0.1))]
    scale: f32,
    #[schemars(extend("format" = "color"))]
    color: String,
    wireframe: bool,
}

impl Default for CubeSettings {
    fn default() -> Self {
        Self {
            position_x: 0.0,
            position_y: 0.0,
            position_z: 0.0,
            rotation_speed: 0.6,
            scale: 1.0,
            color: "#0088ff".to_owned(),
            wireframe: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
struct CubeParams {
    cube: CubeSettings,
}

#[derive(Debug, Default)]
struct BasicCube {
    rotation: f32,
}

impl Sample for BasicCube {
    fn parameters(&self) -> PanelSpec {
        PanelSpec::of::<CubeParams>()
    }

    fn update(&mut self, frame: &FrameInput, panel: &ParameterPanel, scene: &mut Scene) {
        let CubeParams { cube } = panel.read();
        self.rotation += cube.rotation_speed * frame.delta;

        scene.light(Light::ambient(0.5));
        scene.light(Light::point(Vec3::splat(10.0), 1.0));
        scene.add(
            SceneObject::new(Geometry::cube(2.0))
                .placed(
                    Vec3::new(cube.position_x, cube.position_y, cube.position_z),
                    Vec3::new(self.rotation, self.rotation, 0.0),
                    cube.scale,
                )
                .with_material(Material {
                    wireframe: cube.wireframe,
                    ..Material::color(hex_color(&cube.color))
                }),
        );
        scene.grid = Some(Grid::new(10.0, 10));
    }
}

// ── basic-sphere ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Sphere", inline)]
#[serde(default)]
struct SphereSettings {
    #[schemars(range(min = 0.5, max = 3.0), extend("step" = 0.1))]
    radius: f32,
    #[schemars(range(min = 8, max = 64))]
    width_segments: u32,
    #[schemars(range(min = 8, max = 32))]
    height_segments: u32,
    #[schemars(extend("format" = "color"))]
    color: String,
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    metalness: f32,
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    roughness: f32,
    wireframe: bool,
    /// Bob and sway.
    animate: bool,
}

impl Default for SphereSettings {
    fn default() -> Self {
        Self {
            radius: 1.5,
            width_segments: 32,
            height_segments: 16,
            color: "#ff6b6b".to_owned(),
            metalness: 0.3,
            roughness: 0.4,
            wireframe: false,
            animate: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
struct SphereParams {
    sphere: SphereSettings,
}

/// Pose is only advanced while animating, so toggling `animate` off freezes
/// the sphere where it is.
#[derive(Debug, Default)]
struct BasicSphere {
    sway: f32,
    height: f32,
}

impl Sample for BasicSphere {
    fn parameters(&self) -> PanelSpec {
        PanelSpec::of::<SphereParams>()
    }

    fn update(&mut self, frame: &FrameInput, panel: &ParameterPanel, scene: &mut Scene) {
        let SphereParams { sphere } = panel.read();
        if sphere.animate {
            self.sway = frame.time.sin() * 0.5;
            self.height = (frame.time * 2.0).sin() * 0.5;
        }

        scene.light(Light::ambient(0.3));
        scene.light(Light::directional(Vec3::splat(5.0), 1.0));
        scene.add(
            SceneObject::new(Geometry::Sphere {
                radius: sphere.radius,
                width_segments: sphere.width_segments,
                height_segments: sphere.height_segments,
            })
            .placed(
                Vec3::new(0.0, self.height, 0.0),
                Vec3::new(0.0, self.sway, 0.0),
                1.0,
            )
            .with_material(Material {
                metalness: sphere.metalness,
                roughness: sphere.roughness,
                wireframe: sphere.wireframe,
                ..Material::color(hex_color(&sphere.color))
            }),
        );
        scene.add(floor(10.0, -2.0, Material::color(hex_color("#222222"))));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn tick(sample: &mut dyn Sample, panel: &ParameterPanel, frame: FrameInput) -> Scene {
        let mut scene = Scene::new();
        sample.update(&frame, panel, &mut scene);
        scene
    }

    #[test]
    fn cube_rotates_with_elapsed_time() {
        let mut cube = BasicCube::default();
        let panel = ParameterPanel::new(cube.parameters());
        let first = tick(&mut cube, &panel, FrameInput::default().advance(0.05));
        let second = tick(&mut cube, &panel, FrameInput::default().advance(0.05));
        assert_eq!(first.objects.len(), 1);
        assert_ne!(first.objects[0].transform, second.objects[0].transform);
        assert!((cube.rotation - 0.06).abs() < 1e-5);
        assert!(first.grid.is_some());
    }

    #[test]
    fn cube_settings_reach_the_scene() {
        let mut cube = BasicCube::default();
        let mut panel = ParameterPanel::new(cube.parameters());
        panel.set("cube", "wireframe", json!(true)).unwrap();
        panel.set("cube", "position_x", json!(2.5)).unwrap();
        panel.set("cube", "rotation_speed", json!(0.0)).unwrap();
        let scene = tick(&mut cube, &panel, FrameInput::default().advance(0.1));
        let object = &scene.objects[0];
        assert!(object.material.wireframe);
        assert_eq!(object.transform.w_axis.x, 2.5);
        assert_eq!(cube.rotation, 0.0);
    }

    #[test]
    fn sphere_tessellation_follows_parameters() {
        let mut sphere = BasicSphere::default();
        let mut panel = ParameterPanel::new(sphere.parameters());
        panel.set("sphere", "width_segments", json!(12)).unwrap();
        let scene = tick(&mut sphere, &panel, FrameInput::default());
        assert!(matches!(
            scene.objects[0].geometry,
            Geometry::Sphere {
                width_segments: 12,
                height_segments: 16,
                ..
            }
        ));
        assert_eq!(scene.objects.len(), 2);
    }

    #[test]
    fn sphere_freezes_when_animation_is_off() {
        let mut sphere = BasicSphere::default();
        let mut panel = ParameterPanel::new(sphere.parameters());
        let frame = FrameInput::default().advance(0.1);
        let _ = tick(&mut sphere, &panel, frame);
        let height = sphere.height;
        assert!(height > 0.0);
        panel.set("sphere", "animate", json!(false)).unwrap();
        let _ = tick(&mut sphere, &panel, frame.advance(0.1).advance(0.1));
        assert_eq!(sphere.height, height);
    }
}
