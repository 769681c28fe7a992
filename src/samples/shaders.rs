//! Procedural shader effects: a displaced wave plane, a flame sheet and a
//! rim-glow sphere.

use glam::Vec3;
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

const SOURCE: &str = include_str!("shaders.rs");

pub(super) fn register(builder: &mut RegistryBuilder) -> Result<(), VistaError> {
    let _ = builder
        .register(
            "shaders",
            SampleEntry::new("basic-shader", construct::<BasicShader>)
                .titled("Basic Shader")
                .described("Custom vertex displacement and fragment coloring.")
                .with_source(SOURCE),
        )?
        .register(
            "shaders",
            SampleEntry::new("advanced-shaders", construct::<AdvancedShaders>)
                .titled("Advanced Shader Effects")
                .described("Noise-driven fire and a rim glow.")
                .with_source(SOURCE),
        )?;
    Ok(())
}

// ── basic-shader ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Wave", inline)]
#[serde(default)]
struct WaveSettings {
    #[schemars(range(min = 0.0, max = 5.0), extend("step" = 0.1))]
    time_speed: f32,
    #[schemars(range(min = 0.0, max = 2.0), extend("step" = 0.01))]
    amplitude: f32,
    #[schemars(range(min = 0.1, max = 10.0), extend("step" = 0.1))]
    frequency: f32,
    /// Color in the troughs.
    #[schemars(extend("format" = "color"))]
    trough: String,
    /// Color on the crests.
    #[schemars(extend("format" = "color"))]
    crest: String,
}

impl Default for WaveSettings {
    fn default() -> Self {
        Self {
            time_speed: 1.0,
            amplitude: 0.5,
            frequency: 2.0,
            trough: "#ff0066".to_owned(),
            crest: "#00ffff".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
struct WaveParams {
    wave: WaveSettings,
}

#[derive(Debug, Default)]
struct BasicShader;

impl Sample for BasicShader {
    fn parameters(&self) -> PanelSpec {
        PanelSpec::of::<WaveParams>()
    }

    fn update(&mut self, frame: &FrameInput, panel: &ParameterPanel, scene: &mut Scene) {
        let WaveParams { wave } = panel.read();

        scene.light(Light::ambient(0.5));
        scene.light(Light::directional(Vec3::splat(5.0), 1.0));
        scene.add(
            SceneObject::new(Geometry::Plane {
                width: 10.0,
                height: 10.0,
                segments: 64,
            })
            .placed(
                Vec3::ZERO,
                Vec3::new(-std::f32::consts::FRAC_PI_2, 0.0, 0.0),
                1.0,
            )
            .with_material(Material {
                shading: Shading::Unlit,
                effect: Effect::Wave {
                    amplitude: wave.amplitude,
                    frequency: wave.frequency,
                    time: frame.time * wave.time_speed,
                    crest: hex_color(&wave.crest),
                },
                ..Material::color(hex_color(&wave.trough))
            }),
        );
        axes(scene, 5.0);
    }
}

// ── advanced-shaders ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Fire", inline)]
#[serde(default)]
struct FireSettings {
    #[schemars(range(min = 0.0, max = 5.0), extend("step" = 0.1))]
    speed: f32,
    #[schemars(range(min = 0.0, max = 3.0), extend("step" = 0.1))]
    intensity: f32,
    #[schemars(range(min = 1.0, max = 10.0), extend("step" = 0.1))]
    noise_scale: f32,
    /// Color at the base of the flame.
    #[schemars(extend("format" = "color"))]
    color_start: String,
    /// Color at the flame tips.
    #[schemars(extend("format" = "color"))]
    color_end: String,
}

impl Default for FireSettings {
    fn default() -> Self {
        Self {
            speed: 1.0,
            intensity: 1.5,
            noise_scale: 4.0,
            color_start: "#ff6600".to_owned(),
            color_end: "#ffcc00".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Glow", inline)]
#[serde(default)]
struct GlowSettings {
    #[schemars(range(min = 0.0, max = 5.0), extend("step" = 0.1))]
    intensity: f32,
    #[schemars(extend("format" = "color"))]
    color: String,
}

impl Default for GlowSettings {
    fn default() -> Self {
        Self {
            intensity: 2.0,
            color: "#00ffff".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
struct EffectParams {
    fire: FireSettings,
    glow: GlowSettings,
}

const GLOW_CENTER: Vec3 = Vec3::new(5.0, 0.0, 0.0);

#[derive(Debug, Default)]
struct AdvancedShaders {
    spin: f32,
}

impl Sample for AdvancedShaders {
    fn parameters(&self) -> PanelSpec {
        PanelSpec::of::<EffectParams>()
    }

    fn update(&mut self, frame: &FrameInput, panel: &ParameterPanel, scene: &mut Scene) {
        let EffectParams { fire, glow } = panel.read();
        self.spin += 0.6 * frame.delta;

        scene.background = Some(Vec3::ZERO);
        scene.light(Light::ambient(0.1));
        scene.light(Light::directional(Vec3::splat(5.0), 0.5));

        scene.add(
            SceneObject::new(Geometry::Plane {
                width: 4.0,
                height: 6.0,
                segments: 32,
            })
            .with_material(Material {
                shading: Shading::Unlit,
                opacity: 0.95,
                effect: Effect::Fire {
                    time: frame.time * fire.speed,
                    intensity: fire.intensity,
                    scale: fire.noise_scale,
                    tip: hex_color(&fire.color_end),
                },
                ..Material::color(hex_color(&fire.color_start))
            }),
        );

        let glow_color = hex_color(&glow.color);
        scene.add(
            SceneObject::new(Geometry::sphere(1.0))
                .at(GLOW_CENTER)
                .with_material(Material {
                    emissive: glow_color * 0.5,
                    ..Material::color(glow_color)
                }),
        );
        scene.add(
            SceneObject::new(Geometry::sphere(1.5))
                .placed(GLOW_CENTER, Vec3::new(0.0, self.spin, 0.0), 1.0)
                .with_material(Material {
                    color: Vec3::ZERO,
                    opacity: 0.6,
                    effect: Effect::Glow {
                        intensity: glow.intensity,
                        color: glow_color,
                    },
                    ..Material::default()
                }),
        );
        scene.grid = Some(Grid::new(20.0, 20));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn wave_time_scales_with_speed() {
        let mut panel = ParameterPanel::new(BasicShader.parameters());
        panel.set("wave", "time_speed", json!(2.0)).unwrap();
        let mut scene = Scene::new();
        let frame = FrameInput {
            time: 1.5,
            ..FrameInput::default()
        };
        BasicShader.update(&frame, &panel, &mut scene);
        let Effect::Wave { time, .. } = scene.objects[0].material.effect else {
            panic!("expected wave");
        };
        assert_eq!(time, 3.0);
    }

    #[test]
    fn effects_carry_their_colors() {
        let mut sample = AdvancedShaders::default();
        let mut panel = ParameterPanel::new(sample.parameters());
        panel.set("fire", "color_end", json!("#ffffff")).unwrap();
        panel.set("glow", "intensity", json!(4.0)).unwrap();
        let mut scene = Scene::new();
        sample.update(&FrameInput::default(), &panel, &mut scene);
        let effects: Vec<_> = scene.objects.iter().map(|o| o.material.effect).collect();
        assert!(effects.iter().any(
            |e| matches!(e, Effect::Fire { tip, .. } if (*tip - Vec3::ONE).length() < 1e-5)
        ));
        assert!(effects
            .iter()
            .any(|e| matches!(e, Effect::Glow { intensity, .. } if *intensity == 4.0)));
        assert_eq!(scene.background, Some(Vec3::ZERO));
    }
}
