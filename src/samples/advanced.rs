//! A grab bag of techniques: a framed portal, an animated render-texture
//! stand-in, a procedurally built mesh and a multi-pass style plasma panel.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{construct, hsl};
use crate::error::VistaError;
use crate::panel::{PanelSpec, ParameterPanel};
use crate::registry::{RegistryBuilder, SampleEntry};
use crate::sample::{FrameInput, Sample};
use crate::scene::mesh::MeshData;
use crate::scene::{
    hex_color, Effect, Geometry, Grid, Light, Material, Scene, SceneObject, Shading,
};

pub(super) fn register(builder: &mut RegistryBuilder) -> Result<(), VistaError> {
    let _ = builder.register(
        "advanced",
        SampleEntry::new("advanced-features", construct::<AdvancedFeatures>)
            .titled("Advanced Features")
            .described("Portals, render textures, custom geometry and multi-pass effects.")
            .with_source(include_str!("advanced.rs")),
    )?;
    Ok(())
}

/// Distinguishes this sample's custom meshes in the surface's mesh cache.
const SHARD_KEY_TAG: u64 = 0xad5a_0000_0000;
const PORTAL_CENTER: Vec3 = Vec3::new(-5.0, 0.0, 0.0);
const TEXTURE_CENTER: Vec3 = Vec3::new(5.0, 0.0, 0.0);
const SHARDS_CENTER: Vec3 = Vec3::new(0.0, 0.0, 5.0);
const PANEL_CENTER: Vec3 = Vec3::new(0.0, 3.0, -5.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
enum Feature {
    Portal,
    RenderTexture,
    CustomGeometry,
    Multipass,
    #[default]
    All,
}

impl Feature {
    fn shows(self, other: Self) -> bool {
        self == Self::All || self == other
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Features", inline)]
#[serde(default)]
struct FeatureSettings {
    feature: Feature,
    #[schemars(range(min = 0.0, max = 3.0), extend("step" = 0.1))]
    rotation_speed: f32,
}

impl Default for FeatureSettings {
    fn default() -> Self {
        Self {
            feature: Feature::All,
            rotation_speed: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Custom Geometry", inline)]
#[serde(default)]
struct GeometrySettings {
    /// Vertex count; every three vertices form one shard.
    #[schemars(range(min = 10, max = 200), extend("step" = 1))]
    vertices: u32,
    #[schemars(range(min = 0.5, max = 4.0), extend("step" = 0.1))]
    spread: f32,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            vertices: 50,
            spread: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
struct FeatureParams {
    features: FeatureSettings,
    geometry: GeometrySettings,
}

/// Random triangles inside a cube of half-size `spread`. Each shard keeps
/// one corner near the origin so the cloud reads as a single object.
fn shards(vertices: u32, spread: f32) -> MeshData {
    let mut rng = StdRng::seed_from_u64(u64::from(vertices));
    let positions: Vec<Vec3> = (0..vertices)
        .map(|i| {
            let p = Vec3::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            );
            let reach = if i % 3 == 0 { 0.2 } else { 1.0 };
            p * reach * spread
        })
        .collect();
    MeshData::from_triangles(&positions)
}

#[derive(Debug, Default)]
struct AdvancedFeatures {
    /// Generated mesh and the settings it was generated from.
    shards: Option<(u32, f32, Arc<MeshData>)>,
}

impl AdvancedFeatures {
    fn shard_geometry(&mut self, settings: &GeometrySettings) -> Geometry {
        let stale = !matches!(
            &self.shards,
            Some((v, s, _)) if *v == settings.vertices && *s == settings.spread
        );
        if stale {
            log::debug!("building {} shard vertices", settings.vertices);
            let mesh = Arc::new(shards(settings.vertices, settings.spread));
            self.shards = Some((settings.vertices, settings.spread, mesh));
        }
        let Some((vertices, spread, mesh)) = &self.shards else {
            return Geometry::cube(1.0);
        };
        Geometry::Custom {
            key: SHARD_KEY_TAG | (u64::from(*vertices) << 16) | u64::from(spread.to_bits() >> 16),
            mesh: Arc::clone(mesh),
        }
    }
}

fn portal(scene: &mut Scene, spin: f32) {
    let frame = Material {
        metalness: 0.8,
        roughness: 0.2,
        ..Material::color(hex_color("#c0a060"))
    };
    for (offset, size) in [
        (Vec3::new(0.0, 2.1, 0.0), Vec3::new(4.4, 0.2, 0.2)),
        (Vec3::new(0.0, -2.1, 0.0), Vec3::new(4.4, 0.2, 0.2)),
        (Vec3::new(2.1, 0.0, 0.0), Vec3::new(0.2, 4.0, 0.2)),
        (Vec3::new(-2.1, 0.0, 0.0), Vec3::new(0.2, 4.0, 0.2)),
    ] {
        scene.add(
            SceneObject::new(Geometry::Box {
                width: size.x,
                height: size.y,
                depth: size.z,
            })
            .at(PORTAL_CENTER + offset)
            .with_material(frame),
        );
    }
    // The far side: a dark backdrop and two objects only seen through the
    // frame.
    scene.add(
        SceneObject::new(Geometry::plane(4.0, 4.0))
            .at(PORTAL_CENTER + Vec3::new(0.0, 0.0, -1.5))
            .with_material(Material {
                shading: Shading::Unlit,
                ..Material::color(hex_color("#1a0033"))
            }),
    );
    scene.add(
        SceneObject::new(Geometry::cube(0.8))
            .placed(
                PORTAL_CENTER + Vec3::new(-0.7, 0.0, -0.8),
                Vec3::new(spin, spin * 0.7, 0.0),
                1.0,
            )
            .with_material(Material {
                emissive: hex_color("#ff00ff") * 0.3,
                ..Material::color(hex_color("#ff00ff"))
            }),
    );
    scene.add(
        SceneObject::new(Geometry::sphere(0.5))
            .at(PORTAL_CENTER + Vec3::new(0.7, spin.sin() * 0.5, -0.8))
            .with_material(Material {
                emissive: hex_color("#00ffff") * 0.3,
                ..Material::color(hex_color("#00ffff"))
            }),
    );
    scene.add(
        SceneObject::new(Geometry::plane(4.0, 4.0))
            .at(PORTAL_CENTER)
            .with_material(Material {
                opacity: 0.15,
                shading: Shading::Unlit,
                ..Material::color(hex_color("#8844ff"))
            }),
    );
}

/// Box whose faces show a scrolling, rotating pattern in place of a live
/// render target.
fn render_texture(scene: &mut Scene, time: f32, spin: f32) {
    scene.add(
        SceneObject::new(Geometry::cube(3.0))
            .placed(TEXTURE_CENTER, Vec3::new(0.0, spin, 0.0), 1.0)
            .with_material(Material {
                effect: Effect::Checker {
                    repeat: Vec2::splat(4.0),
                    offset: Vec2::new(time * 0.2, 0.0),
                    rotation: time * 0.1,
                    alternate: hsl(time * 30.0, 0.8, 0.5),
                },
                ..Material::color(hex_color("#ffffff"))
            }),
    );
}

fn multipass(scene: &mut Scene, time: f32) {
    scene.add(
        SceneObject::new(Geometry::Plane {
            width: 8.0,
            height: 6.0,
            segments: 1,
        })
        .at(PANEL_CENTER)
        .with_material(Material {
            shading: Shading::Unlit,
            effect: Effect::Plasma { time, scale: 3.0 },
            ..Material::default()
        }),
    );
}

impl Sample for AdvancedFeatures {
    fn parameters(&self) -> PanelSpec {
        PanelSpec::of::<FeatureParams>()
    }

    fn update(&mut self, frame: &FrameInput, panel: &ParameterPanel, scene: &mut Scene) {
        let FeatureParams { features, geometry } = panel.read();
        let spin = frame.time * features.rotation_speed;
        let active = features.feature;

        scene.background = Some(hex_color("#222222"));
        scene.light(Light::ambient(0.4));
        scene.light(Light::directional(Vec3::new(10.0, 10.0, 5.0), 1.0));
        scene.grid = Some(Grid::new(20.0, 20));

        if active.shows(Feature::Portal) {
            portal(scene, spin);
        }
        if active.shows(Feature::RenderTexture) {
            render_texture(scene, frame.time, spin);
        }
        if active.shows(Feature::CustomGeometry) {
            let shard_geometry = self.shard_geometry(&geometry);
            scene.add(
                SceneObject::new(shard_geometry)
                    .placed(SHARDS_CENTER, Vec3::new(0.0, spin, 0.0), 1.0)
                    .with_material(Material {
                        metalness: 0.3,
                        roughness: 0.6,
                        ..Material::color(hex_color("#ff8844"))
                    }),
            );
        }
        if active.shows(Feature::Multipass) {
            multipass(scene, frame.time);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn build(panel: &ParameterPanel, sample: &mut AdvancedFeatures) -> Scene {
        let mut scene = Scene::new();
        sample.update(&FrameInput::default(), panel, &mut scene);
        scene
    }

    #[test]
    fn shard_count_follows_vertices() {
        let mesh = shards(50, 2.0);
        assert_eq!(mesh.triangle_count(), 16);
        assert!(mesh
            .vertices
            .iter()
            .all(|v| Vec3::from_array(v.position).abs().max_element() <= 2.0));
    }

    #[test]
    fn custom_mesh_is_rebuilt_only_on_change() {
        let mut sample = AdvancedFeatures::default();
        let mut panel = ParameterPanel::new(sample.parameters());
        panel
            .set("features", "feature", json!("custom_geometry"))
            .unwrap();
        let first = build(&panel, &mut sample);
        let again = build(&panel, &mut sample);
        let key = |scene: &Scene| scene.objects[0].geometry.cache_key();
        assert_eq!(key(&first), key(&again));

        panel.set("geometry", "vertices", json!(90)).unwrap();
        let changed = build(&panel, &mut sample);
        assert_ne!(key(&first), key(&changed));
        let Geometry::Custom { mesh, .. } = &changed.objects[0].geometry else {
            panic!("expected custom geometry");
        };
        assert_eq!(mesh.triangle_count(), 30);
    }

    #[test]
    fn feature_choice_filters_objects() {
        let mut sample = AdvancedFeatures::default();
        let mut panel = ParameterPanel::new(sample.parameters());
        let all = build(&panel, &mut sample).objects.len();
        panel.set("features", "feature", json!("multipass")).unwrap();
        let only = build(&panel, &mut sample);
        assert_eq!(only.objects.len(), 1);
        assert!(matches!(only.objects[0].material.effect, Effect::Plasma { .. }));
        assert!(all > 8);
    }
}
