//! Many animated instances plus distance-based level of detail.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{construct, hsl};
use crate::error::VistaError;
use crate::panel::{PanelSpec, ParameterPanel};
use crate::registry::{RegistryBuilder, SampleEntry};
use crate::sample::{FrameInput, Sample};
use crate::scene::{hex_color, Geometry, Grid, Light, Material, Scene, SceneObject};

pub(super) fn register(builder: &mut RegistryBuilder) -> Result<(), VistaError> {
    let _ = builder.register(
        "performance",
        SampleEntry::new("performance-optimization", construct::<PerformanceDemo>)
            .titled("Performance Optimization")
            .described("Thousands of instances and level-of-detail switching.")
            .with_source(include_str!("performance.rs")),
    )?;
    Ok(())
}

const SPREAD: f32 = 15.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Instances", inline)]
#[serde(default)]
struct InstanceSettings {
    #[schemars(range(min = 100, max = 10000), extend("step" = 100))]
    count: u32,
    #[schemars(range(min = 0.0, max = 5.0), extend("step" = 0.1))]
    animation_speed: f32,
    #[schemars(range(min = 0.1, max = 2.0), extend("step" = 0.1))]
    scale: f32,
}

impl Default for InstanceSettings {
    fn default() -> Self {
        Self {
            count: 1000,
            animation_speed: 1.0,
            scale: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Level of Detail", inline)]
#[serde(default)]
struct LodSettings {
    enabled: bool,
    /// Camera distance at which the first detail step happens.
    #[schemars(range(min = 2.0, max = 50.0), extend("step" = 1.0))]
    distance: f32,
}

impl Default for LodSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            distance: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
struct PerformanceParams {
    instances: InstanceSettings,
    lod: LodSettings,
}

/// Sphere tessellation and tint for a camera distance: full detail inside
/// `step`, half up to twice that, then coarse.
fn lod_level(distance: f32, step: f32) -> (u32, Vec3) {
    if distance < step {
        (32, hex_color("#ff0000"))
    } else if distance < step * 2.0 {
        (16, hex_color("#ffff00"))
    } else {
        (8, hex_color("#00ff00"))
    }
}

const LOD_PROBES: [Vec3; 5] = [
    Vec3::new(0.0, 3.0, 0.0),
    Vec3::new(0.0, 3.0, -8.0),
    Vec3::new(0.0, 3.0, -16.0),
    Vec3::new(0.0, 3.0, -24.0),
    Vec3::new(0.0, 3.0, -32.0),
];

#[derive(Debug, Default)]
struct PerformanceDemo {
    /// Base position and color per instance.
    instances: Vec<(Vec3, Vec3)>,
}

impl PerformanceDemo {
    fn ensure_instances(&mut self, count: u32) {
        if self.instances.len() == count as usize {
            return;
        }
        log::debug!("placing {count} instances");
        let mut rng = StdRng::seed_from_u64(0x1257);
        self.instances = (0..count)
            .map(|_| {
                (
                    Vec3::new(
                        rng.random_range(-SPREAD..SPREAD),
                        rng.random_range(-SPREAD..SPREAD),
                        rng.random_range(-SPREAD..SPREAD),
                    ),
                    hsl(rng.random_range(0.0..360.0), 0.5, 0.5),
                )
            })
            .collect();
    }
}

impl Sample for PerformanceDemo {
    fn parameters(&self) -> PanelSpec {
        PanelSpec::of::<PerformanceParams>()
    }

    fn update(&mut self, frame: &FrameInput, panel: &ParameterPanel, scene: &mut Scene) {
        let PerformanceParams { instances, lod } = panel.read();
        self.ensure_instances(instances.count);
        let t = frame.time * instances.animation_speed;

        scene.light(Light::ambient(0.5));
        scene.light(Light::directional(Vec3::new(10.0, 10.0, 5.0), 1.0));
        scene.grid = Some(Grid::new(100.0, 100));

        let cube = Geometry::cube(1.0);
        for (i, &(position, color)) in self.instances.iter().enumerate() {
            let i = i as f32;
            scene.add(
                SceneObject::new(cube.clone())
                    .placed(
                        position,
                        Vec3::new((t + i * 0.1).sin() * 0.2, t + i * 0.01, 0.0),
                        instances.scale,
                    )
                    .with_material(Material::color(color)),
            );
        }

        if lod.enabled {
            for probe in LOD_PROBES {
                let (segments, color) = lod_level(frame.eye.distance(probe), lod.distance);
                scene.add(
                    SceneObject::new(Geometry::Sphere {
                        radius: 1.0,
                        width_segments: segments,
                        height_segments: segments / 2,
                    })
                    .at(probe)
                    .with_material(Material {
                        wireframe: true,
                        ..Material::color(color)
                    }),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn detail_drops_with_distance() {
        assert_eq!(lod_level(5.0, 10.0).0, 32);
        assert_eq!(lod_level(15.0, 10.0).0, 16);
        assert_eq!(lod_level(25.0, 10.0).0, 8);
    }

    #[test]
    fn instance_count_follows_the_panel() {
        let mut demo = PerformanceDemo::default();
        let mut panel = ParameterPanel::new(demo.parameters());
        panel.set("instances", "count", json!(200)).unwrap();
        panel.set("lod", "enabled", json!(false)).unwrap();
        let mut scene = Scene::new();
        demo.update(&FrameInput::default(), &panel, &mut scene);
        assert_eq!(scene.objects.len(), 200);
        assert!(scene
            .objects
            .iter()
            .all(|o| o.transform.w_axis.truncate().abs().max_element() <= SPREAD));
    }

    #[test]
    fn probes_use_the_camera_distance() {
        let mut demo = PerformanceDemo::default();
        let mut panel = ParameterPanel::new(demo.parameters());
        panel.set("instances", "count", json!(100)).unwrap();
        let frame = FrameInput {
            eye: LOD_PROBES[0],
            ..FrameInput::default()
        };
        let mut scene = Scene::new();
        demo.update(&frame, &panel, &mut scene);
        let detail: Vec<_> = scene.objects[100..]
            .iter()
            .map(|o| match o.geometry {
                Geometry::Sphere { width_segments, .. } => width_segments,
                _ => 0,
            })
            .collect();
        assert_eq!(detail, [32, 32, 16, 8, 8]);
    }
}
