//! Ambient, directional, point and spot lights over a few grey shapes.

use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{cone, construct, floor};
use crate::error::VistaError;
use crate::panel::{PanelSpec, ParameterPanel};
use crate::registry::{RegistryBuilder, SampleEntry};
use crate::sample::{FrameInput, Sample};
use crate::scene::{hex_color, Geometry, Light, Material, Scene, SceneObject, Shading};

pub(super) fn register(builder: &mut RegistryBuilder) -> Result<(), VistaError> {
    let _ = builder.register(
        "lights",
        SampleEntry::new("lighting-demo", construct::<LightingDemo>)
            .titled("Lighting Demo")
            .described("Experiment with light types and their settings.")
            .with_source(include_str!("lights.rs")),
    )?;
    Ok(())
}

const POINT_ORBIT_RADIUS: f32 = 3.0;
const SPOT_POSITION: Vec3 = Vec3::new(0.0, 5.0, 0.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Ambient", inline)]
#[serde(default)]
struct AmbientSettings {
    enabled: bool,
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    intensity: f32,
    #[schemars(extend("format" = "color"))]
    color: String,
}

impl Default for AmbientSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            intensity: 0.2,
            color: "#ffffff".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Directional", inline)]
#[serde(default)]
struct DirectionalSettings {
    enabled: bool,
    #[schemars(range(min = 0.0, max = 2.0), extend("step" = 0.01))]
    intensity: f32,
    #[schemars(extend("format" = "color"))]
    color: String,
    #[schemars(range(min = -10.0, max = 10.0), extend("step" = 0.1))]
    x: f32,
    #[schemars(range(min = -10.0, max = 10.0), extend("step" = 0.1))]
    y: f32,
    #[schemars(range(min = -10.0, max = 10.0), extend("step" = 0.1))]
    z: f32,
}

impl Default for DirectionalSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            intensity: 1.0,
            color: "#ffffff".to_owned(),
            x: 5.0,
            y: 5.0,
            z: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Point", inline)]
#[serde(default)]
struct PointSettings {
    enabled: bool,
    #[schemars(range(min = 0.0, max = 2.0), extend("step" = 0.01))]
    intensity: f32,
    #[schemars(extend("format" = "color"))]
    color: String,
}

impl Default for PointSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            intensity: 1.0,
            color: "#00ffff".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Spot", inline)]
#[serde(default)]
struct SpotSettings {
    enabled: bool,
    #[schemars(range(min = 0.0, max = 2.0), extend("step" = 0.01))]
    intensity: f32,
    #[schemars(extend("format" = "color"))]
    color: String,
    /// Cone half-angle in radians.
    #[schemars(range(min = 0.0, max = 1.5708), extend("step" = 0.01))]
    angle: f32,
}

impl Default for SpotSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            intensity: 1.0,
            color: "#ff00ff".to_owned(),
            angle: std::f32::consts::FRAC_PI_6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
struct LightParams {
    ambient: AmbientSettings,
    directional: DirectionalSettings,
    point: PointSettings,
    spot: SpotSettings,
}

fn point_position(time: f32) -> Vec3 {
    Vec3::new(
        time.sin() * POINT_ORBIT_RADIUS,
        2.0,
        time.cos() * POINT_ORBIT_RADIUS,
    )
}

/// Small unlit marker showing where a light sits.
fn marker(position: Vec3, color: Vec3) -> SceneObject {
    SceneObject::new(Geometry::Icosahedron {
        radius: 0.15,
        detail: 1,
    })
    .at(position)
    .with_material(Material {
        shading: Shading::Unlit,
        ..Material::color(color)
    })
}

#[derive(Debug, Default)]
struct LightingDemo;

impl Sample for LightingDemo {
    fn parameters(&self) -> PanelSpec {
        PanelSpec::of::<LightParams>()
    }

    fn update(&mut self, frame: &FrameInput, panel: &ParameterPanel, scene: &mut Scene) {
        let params: LightParams = panel.read();

        if params.ambient.enabled {
            scene.light(Light::Ambient {
                color: hex_color(&params.ambient.color),
                intensity: params.ambient.intensity,
            });
        }
        if params.directional.enabled {
            let d = &params.directional;
            let position = Vec3::new(d.x, d.y, d.z);
            let color = hex_color(&d.color);
            scene.light(Light::Directional {
                position,
                color,
                intensity: d.intensity,
            });
            scene.add(marker(position, color));
        }
        if params.point.enabled {
            let position = point_position(frame.time);
            let color = hex_color(&params.point.color);
            scene.light(Light::Point {
                position,
                color,
                intensity: params.point.intensity,
                range: 0.0,
            });
            scene.add(marker(position, color));
        }
        if params.spot.enabled {
            let color = hex_color(&params.spot.color);
            scene.light(Light::Spot {
                position: SPOT_POSITION,
                target: Vec3::ZERO,
                color,
                intensity: params.spot.intensity,
                angle: params.spot.angle,
                penumbra: 0.5,
            });
            scene.add(marker(SPOT_POSITION, color));
        }

        let grey = Material::color(hex_color("#888888"));
        scene.add(
            SceneObject::new(Geometry::Sphere {
                radius: 1.0,
                width_segments: 32,
                height_segments: 32,
            })
            .with_material(grey),
        );
        scene.add(
            SceneObject::new(Geometry::cube(1.5))
                .at(Vec3::new(3.0, 0.0, 0.0))
                .with_material(grey),
        );
        scene.add(
            SceneObject::new(cone(1.0, 2.0))
                .at(Vec3::new(-3.0, 0.0, 0.0))
                .with_material(grey),
        );
        scene.add(floor(20.0, -1.5, Material::color(hex_color("#333333"))));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn lights(panel: &ParameterPanel, time: f32) -> Vec<Light> {
        let mut scene = Scene::new();
        LightingDemo.update(
            &FrameInput {
                time,
                ..FrameInput::default()
            },
            panel,
            &mut scene,
        );
        scene.lights
    }

    #[test]
    fn four_light_groups() {
        let spec = PanelSpec::of::<LightParams>();
        let keys: Vec<_> = spec.groups().iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, ["ambient", "directional", "point", "spot"]);
        let panel = ParameterPanel::new(spec);
        assert_eq!(lights(&panel, 0.0).len(), 4);
    }

    #[test]
    fn disabled_groups_drop_their_light() {
        let mut panel = ParameterPanel::new(LightingDemo.parameters());
        panel.set("spot", "enabled", json!(false)).unwrap();
        panel.set("ambient", "enabled", json!(false)).unwrap();
        let lights = lights(&panel, 0.0);
        assert_eq!(lights.len(), 2);
        assert!(lights.iter().all(|l| !matches!(l, Light::Spot { .. } | Light::Ambient { .. })));
    }

    #[test]
    fn point_light_orbits() {
        let panel = ParameterPanel::new(LightingDemo.parameters());
        let position = |time| {
            lights(&panel, time)
                .into_iter()
                .find_map(|l| match l {
                    Light::Point { position, .. } => Some(position),
                    _ => None,
                })
                .unwrap()
        };
        let a = position(0.0);
        let b = position(1.0);
        assert_ne!(a, b);
        assert!((Vec3::new(b.x, 0.0, b.z).length() - POINT_ORBIT_RADIUS).abs() < 1e-4);
    }
}
