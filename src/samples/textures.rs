//! UV mapping with a procedural checker, and a bump-mapped sphere under
//! environment presets.

use glam::{Vec2, Vec3};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{axes, construct};
use crate::error::VistaError;
use crate::panel::{PanelSpec, ParameterPanel};
use crate::registry::{RegistryBuilder, SampleEntry};
use crate::sample::{FrameInput, Sample};
use crate::scene::{
    hex_color, Effect, Geometry, Grid, Light, Material, Scene, SceneObject, Shading,
};
use crate::surface::{CameraSetup, Projection, SurfaceConfig};

const SOURCE: &str = include_str!("textures.rs");

pub(super) fn register(builder: &mut RegistryBuilder) -> Result<(), VistaError> {
    let _ = builder
        .register(
            "textures",
            SampleEntry::new("texture-basics", construct::<TextureBasics>)
                .titled("Texture Basics")
                .described("UV mapping with texture repeat, offset and rotation.")
                .with_source(SOURCE),
        )?
        .register(
            "textures",
            SampleEntry::new("advanced-textures", construct::<AdvancedTextures>)
                .titled("Advanced Textures")
                .described("Normal, displacement and environment mapping.")
                .own_surface()
                .with_source(SOURCE),
        )?;
    Ok(())
}

// ── texture-basics ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
enum TextureMaterial {
    #[default]
    Standard,
    Basic,
    Lambert,
    Phong,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Texture", inline)]
#[serde(default)]
struct TextureSettings {
    /// Radians per second around X and Y.
    #[schemars(range(min = 0.0, max = 6.0), extend("step" = 0.05))]
    rotation_speed: f32,
    #[schemars(range(min = 0.1, max = 5.0), extend("step" = 0.1))]
    repeat_u: f32,
    #[schemars(range(min = 0.1, max = 5.0), extend("step" = 0.1))]
    repeat_v: f32,
    #[schemars(range(min = -3.1416, max = 3.1416), extend("step" = 0.01))]
    rotation: f32,
    #[schemars(range(min = -1.0, max = 1.0), extend("step" = 0.01))]
    offset_u: f32,
    #[schemars(range(min = -1.0, max = 1.0), extend("step" = 0.01))]
    offset_v: f32,
    material: TextureMaterial,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            rotation_speed: 0.3,
            repeat_u: 1.0,
            repeat_v: 1.0,
            rotation: 0.0,
            offset_u: 0.0,
            offset_v: 0.0,
            material: TextureMaterial::Standard,
        }
    }
}

impl TextureSettings {
    /// Checker standing in for a UV test grid: one cell per unit of repeat,
    /// eight per face at repeat 1.
    fn material(&self) -> Material {
        let shading = match self.material {
            TextureMaterial::Standard => Shading::Standard,
            TextureMaterial::Basic => Shading::Unlit,
            TextureMaterial::Lambert => Shading::Lambert,
            TextureMaterial::Phong => Shading::Phong,
        };
        Material {
            metalness: 0.1,
            roughness: 0.5,
            shading,
            effect: Effect::Checker {
                repeat: Vec2::new(self.repeat_u, self.repeat_v) * 8.0,
                offset: Vec2::new(self.offset_u, self.offset_v) * 8.0,
                rotation: self.rotation,
                alternate: hex_color("#202020"),
            },
            ..Material::color(hex_color("#f0f0f0"))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
struct TextureParams {
    texture: TextureSettings,
}

#[derive(Debug, Default)]
struct TextureBasics {
    rotation: f32,
}

impl Sample for TextureBasics {
    fn parameters(&self) -> PanelSpec {
        PanelSpec::of::<TextureParams>()
    }

    fn update(&mut self, frame: &FrameInput, panel: &ParameterPanel, scene: &mut Scene) {
        let TextureParams { texture } = panel.read();
        self.rotation += texture.rotation_speed * frame.delta;

        scene.light(Light::ambient(0.5));
        scene.light(Light::directional(Vec3::splat(5.0), 1.0));
        scene.add(
            SceneObject::new(Geometry::cube(2.0))
                .placed(Vec3::ZERO, Vec3::new(self.rotation, self.rotation, 0.0), 1.0)
                .with_material(texture.material()),
        );
        scene.grid = Some(Grid::new(10.0, 10));
        axes(scene, 5.0);
    }
}

// ── advanced-textures ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
enum EnvironmentPreset {
    #[default]
    Sunset,
    Dawn,
    Night,
    Warehouse,
    Forest,
    Apartment,
    Studio,
    City,
    Park,
}

/// Lighting rig of one preset.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Rig {
    ambient: f32,
    sun: f32,
    sun_color: Vec3,
    fill: f32,
    fill_color: Vec3,
}

impl EnvironmentPreset {
    fn rig(self) -> Rig {
        match self {
            Self::Night => Rig {
                ambient: 0.1,
                sun: 0.5,
                sun_color: hex_color("#4444aa"),
                fill: 0.3,
                fill_color: hex_color("#2222ff"),
            },
            Self::Sunset => Rig {
                ambient: 0.3,
                sun: 1.2,
                sun_color: hex_color("#ffaa44"),
                fill: 0.5,
                fill_color: hex_color("#ff6600"),
            },
            _ => Rig {
                ambient: 0.2,
                sun: 1.0,
                sun_color: Vec3::ONE,
                fill: 0.5,
                fill_color: hex_color("#ffaa00"),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Surface Maps", inline)]
#[serde(default)]
struct MapSettings {
    /// Radians per second around Y.
    #[schemars(range(min = 0.0, max = 3.0), extend("step" = 0.01))]
    rotation_speed: f32,
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    roughness: f32,
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    metalness: f32,
    #[schemars(range(min = -5.0, max = 5.0), extend("step" = 0.1))]
    normal_scale: f32,
    /// Outward offset of the mid-grey displacement map.
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    displacement_scale: f32,
    /// Environment contribution to ambient light.
    #[schemars(range(min = 0.0, max = 2.0), extend("step" = 0.1))]
    env_intensity: f32,
    normal_map: bool,
    displacement_map: bool,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            rotation_speed: 0.12,
            roughness: 0.2,
            metalness: 0.8,
            normal_scale: 1.0,
            displacement_scale: 0.1,
            env_intensity: 1.0,
            normal_map: true,
            displacement_map: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Environment", inline)]
#[serde(default)]
struct EnvironmentSettings {
    preset: EnvironmentPreset,
    /// Reflective boxes around the sphere.
    show_props: bool,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            preset: EnvironmentPreset::Sunset,
            show_props: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
struct AdvancedTextureParams {
    maps: MapSettings,
    environment: EnvironmentSettings,
}

const SPHERE_RADIUS: f32 = 2.0;

impl MapSettings {
    /// A uniform mid-grey displacement map pushes every vertex out by half
    /// the scale.
    fn radius(&self) -> f32 {
        if self.displacement_map {
            SPHERE_RADIUS + 0.5 * self.displacement_scale
        } else {
            SPHERE_RADIUS
        }
    }

    fn material(&self) -> Material {
        Material {
            metalness: self.metalness,
            roughness: self.roughness,
            effect: if self.normal_map {
                Effect::Bumps {
                    strength: self.normal_scale,
                    scale: 6.0,
                }
            } else {
                Effect::None
            },
            ..Material::color(hex_color("#3b75c1"))
        }
    }
}

#[derive(Debug, Default)]
struct AdvancedTextures {
    rotation: f32,
}

impl Sample for AdvancedTextures {
    fn parameters(&self) -> PanelSpec {
        PanelSpec::of::<AdvancedTextureParams>()
    }

    fn surface_config(&self, defaults: &SurfaceConfig) -> SurfaceConfig {
        SurfaceConfig {
            camera: CameraSetup {
                position: Vec3::new(5.0, 3.0, 5.0),
                target: Vec3::ZERO,
                projection: Projection::perspective(50.0),
            },
            ..defaults.clone()
        }
    }

    fn update(&mut self, frame: &FrameInput, panel: &ParameterPanel, scene: &mut Scene) {
        let AdvancedTextureParams { maps, environment } = panel.read();
        self.rotation += maps.rotation_speed * frame.delta;

        let rig = environment.preset.rig();
        scene.light(Light::ambient(rig.ambient * maps.env_intensity));
        scene.light(Light::Directional {
            position: Vec3::new(5.0, 8.0, 5.0),
            color: rig.sun_color,
            intensity: rig.sun,
        });
        scene.light(Light::Point {
            position: Vec3::new(-5.0, 5.0, -5.0),
            color: rig.fill_color,
            intensity: rig.fill,
            range: 0.0,
        });

        scene.add(
            SceneObject::new(Geometry::Sphere {
                radius: maps.radius(),
                width_segments: 64,
                height_segments: 64,
            })
            .placed(Vec3::ZERO, Vec3::new(0.0, self.rotation, 0.0), 1.0)
            .with_material(maps.material()),
        );
        if environment.show_props {
            let props = [
                (Vec3::new(-4.0, 0.0, 0.0), "#ff0000"),
                (Vec3::new(4.0, 0.0, 0.0), "#0000ff"),
                (Vec3::new(0.0, 0.0, -4.0), "#008000"),
                (Vec3::new(0.0, 0.0, 4.0), "#ffff00"),
            ];
            for (position, color) in props {
                scene.add(
                    SceneObject::new(Geometry::cube(1.0))
                        .at(position)
                        .with_material(Material {
                            metalness: 0.9,
                            roughness: 0.1,
                            ..Material::color(hex_color(color))
                        }),
                );
            }
        }
        scene.grid = Some(Grid::new(10.0, 10));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn checker_follows_uv_settings() {
        let settings = TextureSettings {
            repeat_u: 2.0,
            rotation: 0.5,
            ..TextureSettings::default()
        };
        let Effect::Checker {
            repeat, rotation, ..
        } = settings.material().effect
        else {
            panic!("expected checker");
        };
        assert_eq!(repeat, Vec2::new(16.0, 8.0));
        assert_eq!(rotation, 0.5);
    }

    #[test]
    fn basic_texture_material_is_unlit() {
        let settings = TextureSettings {
            material: TextureMaterial::Basic,
            ..TextureSettings::default()
        };
        assert_eq!(settings.material().shading, Shading::Unlit);
    }

    #[test]
    fn advanced_surface_moves_the_camera() {
        let config = AdvancedTextures::default().surface_config(&SurfaceConfig::default());
        assert_eq!(config.camera.position, Vec3::new(5.0, 3.0, 5.0));
        assert_ne!(config, SurfaceConfig::default());
    }

    #[test]
    fn night_is_darker_than_sunset() {
        let night = EnvironmentPreset::Night.rig();
        let sunset = EnvironmentPreset::Sunset.rig();
        assert!(night.ambient < sunset.ambient);
        assert!(night.sun < sunset.sun);
    }

    #[test]
    fn maps_can_be_switched_off() {
        let mut sample = AdvancedTextures::default();
        let mut panel = ParameterPanel::new(sample.parameters());
        panel.set("maps", "normal_map", json!(false)).unwrap();
        panel.set("maps", "displacement_map", json!(false)).unwrap();
        panel.set("environment", "show_props", json!(false)).unwrap();
        let mut scene = Scene::new();
        sample.update(&FrameInput::default(), &panel, &mut scene);
        assert_eq!(scene.objects.len(), 1);
        assert_eq!(scene.objects[0].material.effect, Effect::None);
        assert!(matches!(
            scene.objects[0].geometry,
            Geometry::Sphere { radius, .. } if radius == SPHERE_RADIUS
        ));
    }
}
