//! Screen-space effect chains. Both samples render on their own surface so
//! their post chain never leaks into the shared one.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{construct, floor, hsl};
use crate::error::VistaError;
use crate::panel::{PanelSpec, ParameterPanel};
use crate::registry::{RegistryBuilder, SampleEntry};
use crate::sample::{FrameInput, Sample};
use crate::scene::{hex_color, Geometry, Light, Material, Scene, SceneObject};
use crate::surface::{PostChain, PostEffect, SurfaceConfig};

const SOURCE: &str = include_str!("postprocessing.rs");

pub(super) fn register(builder: &mut RegistryBuilder) -> Result<(), VistaError> {
    let _ = builder
        .register(
            "postprocessing",
            SampleEntry::new("basic-postprocessing", construct::<BasicPostProcessing>)
                .titled("Basic Post-Processing")
                .described("Bloom, chromatic aberration, vignette and film grain.")
                .own_surface()
                .with_source(SOURCE),
        )?
        .register(
            "postprocessing",
            SampleEntry::new("advanced-postprocessing", construct::<AdvancedPostProcessing>)
                .titled("Advanced Post-Processing")
                .described("Glitch bursts, pixelation, color grading and stylized filters.")
                .own_surface()
                .with_source(SOURCE),
        )?;
    Ok(())
}

/// Panel offsets are in UV units; the chain works in pixels of a 1000 px
/// reference frame.
const UV_TO_PIXELS: f32 = 1000.0;
const BLOOM_RADIUS_PIXELS: f32 = 16.0;

// ── basic-postprocessing ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Bloom", inline)]
#[serde(default)]
struct BloomSettings {
    enabled: bool,
    #[schemars(range(min = 0.0, max = 5.0), extend("step" = 0.1))]
    intensity: f32,
    /// Luminance above which pixels start to glow.
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    threshold: f32,
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    radius: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            intensity: 1.5,
            threshold: 0.5,
            radius: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Chromatic Aberration", inline)]
#[serde(default)]
struct ChromaticSettings {
    enabled: bool,
    #[schemars(range(min = 0.0, max = 0.01), extend("step" = 0.0001))]
    offset: f32,
}

impl Default for ChromaticSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            offset: 0.002,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Vignette", inline)]
#[serde(default)]
struct VignetteSettings {
    enabled: bool,
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    offset: f32,
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    darkness: f32,
}

impl Default for VignetteSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            offset: 0.2,
            darkness: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Noise", inline)]
#[serde(default)]
struct NoiseSettings {
    enabled: bool,
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    opacity: f32,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            opacity: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
struct BasicPostParams {
    bloom: BloomSettings,
    chromatic: ChromaticSettings,
    vignette: VignetteSettings,
    noise: NoiseSettings,
}

impl BasicPostParams {
    fn chain(&self) -> PostChain {
        let mut chain = PostChain::new();
        if self.bloom.enabled {
            chain = chain.with(PostEffect::Glow {
                strength: self.bloom.intensity,
                threshold: self.bloom.threshold,
                radius: self.bloom.radius * BLOOM_RADIUS_PIXELS,
            });
        }
        if self.chromatic.enabled {
            chain = chain.with(PostEffect::ChromaticAberration {
                offset: self.chromatic.offset * UV_TO_PIXELS,
            });
        }
        if self.vignette.enabled {
            chain = chain.with(PostEffect::Vignette {
                intensity: self.vignette.darkness,
                smoothness: 1.0 - self.vignette.offset,
            });
        }
        if self.noise.enabled {
            chain = chain.with(PostEffect::Noise {
                amount: self.noise.opacity,
            });
        }
        chain
    }
}

#[derive(Debug, Default)]
struct BasicPostProcessing;

impl Sample for BasicPostProcessing {
    fn parameters(&self) -> PanelSpec {
        PanelSpec::of::<BasicPostParams>()
    }

    fn surface_config(&self, defaults: &SurfaceConfig) -> SurfaceConfig {
        SurfaceConfig {
            post: BasicPostParams::default().chain(),
            clear_color: hex_color("#111111"),
            ..defaults.clone()
        }
    }

    fn update(&mut self, frame: &FrameInput, panel: &ParameterPanel, scene: &mut Scene) {
        let params: BasicPostParams = panel.read();
        let t = frame.time;
        scene.post = Some(params.chain());
        scene.background = Some(hex_color("#111111"));

        scene.light(Light::ambient(0.5));
        scene.light(Light::directional(Vec3::new(10.0, 10.0, 5.0), 1.0));
        scene.light(Light::Point {
            position: Vec3::new(-10.0, -10.0, -5.0),
            color: hex_color("#ff0088"),
            intensity: 2.0,
            range: 0.0,
        });

        let green = hex_color("#00ff88");
        scene.add(
            SceneObject::new(Geometry::cube(1.5))
                .placed(Vec3::new(-3.0, 0.0, 0.0), Vec3::new(t * 0.5, t * 0.7, 0.0), 1.0)
                .with_material(Material {
                    emissive: green * 0.5,
                    ..Material::color(green)
                }),
        );
        scene.add(
            SceneObject::new(Geometry::Sphere {
                radius: 1.5,
                width_segments: 32,
                height_segments: 32,
            })
            .with_material(Material {
                metalness: 0.8,
                roughness: 0.2,
                ..Material::color(hex_color("#ff0088"))
            }),
        );
        scene.add(
            SceneObject::new(Geometry::Torus {
                radius: 1.0,
                tube: 0.4,
                radial_segments: 16,
                tubular_segments: 48,
            })
            .placed(Vec3::new(3.0, 0.0, 0.0), Vec3::new(t * 0.3, 0.0, t * 0.4), 1.0)
            .with_material(Material {
                metalness: 0.5,
                ..Material::color(hex_color("#0088ff"))
            }),
        );
        scene.add(floor(20.0, -2.0, Material::color(hex_color("#222222"))));
    }
}

// ── advanced-postprocessing ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Glitch", inline)]
#[serde(default)]
struct GlitchSettings {
    enabled: bool,
    /// Shortest quiet period between bursts, seconds.
    #[schemars(range(min = 0.1, max = 10.0), extend("step" = 0.1))]
    delay_min: f32,
    #[schemars(range(min = 0.1, max = 10.0), extend("step" = 0.1))]
    delay_max: f32,
    /// Shortest burst, seconds.
    #[schemars(range(min = 0.1, max = 5.0), extend("step" = 0.1))]
    duration_min: f32,
    #[schemars(range(min = 0.1, max = 5.0), extend("step" = 0.1))]
    duration_max: f32,
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    strength_min: f32,
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    strength_max: f32,
}

impl Default for GlitchSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            delay_min: 1.5,
            delay_max: 3.5,
            duration_min: 0.6,
            duration_max: 1.0,
            strength_min: 0.3,
            strength_max: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Pixelation", inline)]
#[serde(default)]
struct PixelationSettings {
    enabled: bool,
    /// Block size in pixels.
    #[schemars(range(min = 1.0, max = 20.0), extend("step" = 1.0))]
    granularity: f32,
}

impl Default for PixelationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            granularity: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Color Grading", inline)]
#[serde(default)]
struct GradingSettings {
    /// Hue rotation in radians.
    #[schemars(range(min = -3.1416, max = 3.1416), extend("step" = 0.01))]
    hue: f32,
    #[schemars(range(min = -1.0, max = 1.0), extend("step" = 0.01))]
    saturation: f32,
    #[schemars(range(min = -1.0, max = 1.0), extend("step" = 0.01))]
    brightness: f32,
    #[schemars(range(min = -1.0, max = 1.0), extend("step" = 0.01))]
    contrast: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Stylize", inline)]
#[serde(default)]
struct StylizeSettings {
    sepia: bool,
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    sepia_intensity: f32,
    dot_screen: bool,
    #[schemars(range(min = 0.1, max = 2.0), extend("step" = 0.01))]
    dot_scale: f32,
}

impl Default for StylizeSettings {
    fn default() -> Self {
        Self {
            sepia: false,
            sepia_intensity: 0.5,
            dot_screen: false,
            dot_scale: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
struct AdvancedPostParams {
    glitch: GlitchSettings,
    pixelation: PixelationSettings,
    grading: GradingSettings,
    stylize: StylizeSettings,
}

impl AdvancedPostParams {
    /// Grading always runs so the chain is never empty; a zero grade is an
    /// identity.
    fn chain(&self, glitch: Option<f32>) -> PostChain {
        let g = &self.grading;
        let mut chain = PostChain::new().with(PostEffect::ColorGrade {
            hue: g.hue,
            saturation: g.saturation,
            brightness: g.brightness,
            contrast: g.contrast,
        });
        if self.stylize.sepia {
            chain = chain.with(PostEffect::Sepia {
                amount: self.stylize.sepia_intensity,
            });
        }
        if self.stylize.dot_screen {
            chain = chain.with(PostEffect::DotScreen {
                scale: self.stylize.dot_scale,
            });
        }
        if self.pixelation.enabled {
            chain = chain.with(PostEffect::Pixelate {
                size: self.pixelation.granularity,
            });
        }
        if let Some(strength) = glitch {
            chain = chain
                .with(PostEffect::ChromaticAberration {
                    offset: strength * 30.0,
                })
                .with(PostEffect::Noise {
                    amount: strength * 0.5,
                });
        }
        chain
    }
}

/// Sorted `[lo, hi)` range, widened when both ends meet.
fn span(a: f32, b: f32) -> std::ops::Range<f32> {
    let lo = a.min(b);
    let hi = a.max(b);
    lo..hi.max(lo + 1e-3)
}

/// Alternates quiet periods and bursts with randomized lengths.
#[derive(Debug)]
struct GlitchTimer {
    rng: StdRng,
    /// Time the current phase ends.
    phase_end: f32,
    /// Burst strength, `None` while quiet.
    burst: Option<f32>,
}

impl Default for GlitchTimer {
    fn default() -> Self {
        Self {
            rng: StdRng::seed_from_u64(0x611c),
            phase_end: 0.0,
            burst: None,
        }
    }
}

impl GlitchTimer {
    fn advance(&mut self, settings: &GlitchSettings, time: f32) -> Option<f32> {
        if !settings.enabled {
            self.burst = None;
            self.phase_end = time;
            return None;
        }
        while time >= self.phase_end {
            if self.burst.is_some() {
                self.burst = None;
                self.phase_end +=
                    self.rng.random_range(span(settings.delay_min, settings.delay_max));
            } else {
                self.burst = Some(
                    self.rng
                        .random_range(span(settings.strength_min, settings.strength_max)),
                );
                self.phase_end +=
                    self.rng.random_range(span(settings.duration_min, settings.duration_max));
            }
        }
        self.burst
    }
}

const BOX_COUNT: usize = 20;

#[derive(Debug)]
struct AdvancedPostProcessing {
    glitch: GlitchTimer,
    /// Position, rotation and color of the scattered boxes.
    boxes: Vec<(Vec3, Vec3, Vec3)>,
}

impl Default for AdvancedPostProcessing {
    fn default() -> Self {
        let mut rng = StdRng::seed_from_u64(0xb0c5);
        let boxes = (0..BOX_COUNT)
            .map(|_| {
                (
                    Vec3::new(
                        rng.random_range(-10.0..10.0),
                        rng.random_range(-5.0..5.0),
                        rng.random_range(-10.0..10.0),
                    ),
                    Vec3::new(
                        rng.random_range(0.0..std::f32::consts::TAU),
                        rng.random_range(0.0..std::f32::consts::TAU),
                        0.0,
                    ),
                    hsl(rng.random_range(0.0..360.0), 0.7, 0.5),
                )
            })
            .collect();
        Self {
            glitch: GlitchTimer::default(),
            boxes,
        }
    }
}

impl Sample for AdvancedPostProcessing {
    fn parameters(&self) -> PanelSpec {
        PanelSpec::of::<AdvancedPostParams>()
    }

    fn surface_config(&self, defaults: &SurfaceConfig) -> SurfaceConfig {
        SurfaceConfig {
            post: AdvancedPostParams::default().chain(None),
            clear_color: Vec3::ZERO,
            ..defaults.clone()
        }
    }

    fn update(&mut self, frame: &FrameInput, panel: &ParameterPanel, scene: &mut Scene) {
        let params: AdvancedPostParams = panel.read();
        let t = frame.time;
        let burst = self.glitch.advance(&params.glitch, t);
        scene.post = Some(params.chain(burst));
        scene.background = Some(Vec3::ZERO);

        scene.light(Light::ambient(0.3));
        scene.light(Light::directional(Vec3::new(10.0, 10.0, 5.0), 1.0));

        for &(position, rotation, color) in &self.boxes {
            scene.add(
                SceneObject::new(Geometry::cube(1.0))
                    .placed(position, rotation, 1.0)
                    .with_material(Material::color(color)),
            );
        }
        scene.add(
            SceneObject::new(Geometry::cube(2.0))
                .placed(Vec3::ZERO, Vec3::new(t * 0.5, t * 0.3, 0.0), 1.0)
                .with_material(Material {
                    metalness: 0.5,
                    roughness: 0.2,
                    ..Material::color(hex_color("#ff6b6b"))
                }),
        );
        scene.add(
            SceneObject::new(Geometry::Sphere {
                radius: 1.0,
                width_segments: 32,
                height_segments: 32,
            })
            .at(Vec3::new(3.0, t.sin(), 0.0))
            .with_material(Material {
                metalness: 0.8,
                roughness: 0.1,
                ..Material::color(hex_color("#4ecdc4"))
            }),
        );
        scene.add(floor(30.0, -3.0, Material::color(hex_color("#333333"))));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn basic_chain_follows_toggles() {
        let mut params = BasicPostParams::default();
        assert_eq!(params.chain().effects.len(), 4);
        params.noise.enabled = false;
        params.bloom.enabled = false;
        let chain = params.chain();
        assert_eq!(chain.effects.len(), 2);
        assert!(matches!(
            chain.effects[0],
            PostEffect::ChromaticAberration { offset } if (offset - 2.0).abs() < 1e-4
        ));
    }

    #[test]
    fn panel_edits_reach_the_scene_chain() {
        let mut sample = BasicPostProcessing;
        let mut panel = ParameterPanel::new(sample.parameters());
        panel.set("vignette", "enabled", json!(false)).unwrap();
        let mut scene = Scene::new();
        sample.update(&FrameInput::default(), &panel, &mut scene);
        let post = scene.post.unwrap();
        assert_eq!(post.effects.len(), 3);
        assert!(!post.effects.iter().any(|e| matches!(e, PostEffect::Vignette { .. })));
    }

    #[test]
    fn advanced_chain_is_never_empty() {
        let params = AdvancedPostParams::default();
        assert_eq!(params.chain(None).effects.len(), 1);
        let glitching = params.chain(Some(0.5));
        assert_eq!(glitching.effects.len(), 3);
    }

    #[test]
    fn glitch_alternates_quiet_and_burst() {
        let settings = GlitchSettings {
            enabled: true,
            ..GlitchSettings::default()
        };
        let mut timer = GlitchTimer::default();
        let mut bursts = 0;
        let mut quiet = 0;
        for step in 0..600 {
            match timer.advance(&settings, step as f32 * 0.05) {
                Some(strength) => {
                    assert!((settings.strength_min..settings.strength_max).contains(&strength));
                    bursts += 1;
                }
                None => quiet += 1,
            }
        }
        assert!(bursts > 0);
        assert!(quiet > bursts);
    }

    #[test]
    fn disabled_glitch_stays_quiet() {
        let mut timer = GlitchTimer::default();
        let settings = GlitchSettings::default();
        assert!((0..100).all(|i| timer.advance(&settings, i as f32).is_none()));
    }

    #[test]
    fn span_orders_and_widens() {
        assert_eq!(span(3.0, 1.0).start, 1.0);
        assert!(!span(2.0, 2.0).is_empty());
    }
}
