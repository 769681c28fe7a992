//! CPU-side packing of scene and post-processing state into GPU layouts.
//!
//! Every struct here is built from `vec4`-sized rows so the same bytes are
//! valid under both uniform and storage buffer layout rules.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::scene::{Effect, Light, SceneObject};
use crate::surface::{PostChain, PostEffect};

/// Lights beyond this count are ignored.
pub const MAX_LIGHTS: usize = 8;
/// Post effects beyond this count are ignored.
pub const MAX_POST_EFFECTS: usize = 8;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
/// One light: kind and falloff, position, direction, color, ground color.
pub struct LightUniform {
    /// `[kind, intensity, range, cos_outer]`.
    pub header: [f32; 4],
    /// `[x, y, z, cos_inner]`.
    pub position: [f32; 4],
    /// Direction the light travels.
    pub direction: [f32; 4],
    /// Light color (sky color for hemisphere lights).
    pub color: [f32; 4],
    /// Ground color for hemisphere lights.
    pub ground: [f32; 4],
}

impl LightUniform {
    const AMBIENT: f32 = 0.0;
    const HEMISPHERE: f32 = 1.0;
    const DIRECTIONAL: f32 = 2.0;
    const POINT: f32 = 3.0;
    const SPOT: f32 = 4.0;

    fn pack(light: &Light) -> Self {
        let rgb = |c: Vec3| c.extend(1.0).to_array();
        match *light {
            Light::Ambient { color, intensity } => Self {
                header: [Self::AMBIENT, intensity, 0.0, 0.0],
                color: rgb(color),
                ..Self::default()
            },
            Light::Hemisphere {
                sky,
                ground,
                intensity,
            } => Self {
                header: [Self::HEMISPHERE, intensity, 0.0, 0.0],
                color: rgb(sky),
                ground: rgb(ground),
                ..Self::default()
            },
            Light::Directional {
                position,
                color,
                intensity,
            } => Self {
                header: [Self::DIRECTIONAL, intensity, 0.0, 0.0],
                direction: (-position).normalize_or(Vec3::NEG_Y).extend(0.0).to_array(),
                color: rgb(color),
                ..Self::default()
            },
            Light::Point {
                position,
                color,
                intensity,
                range,
            } => Self {
                header: [Self::POINT, intensity, range.max(0.0), 0.0],
                position: position.extend(0.0).to_array(),
                color: rgb(color),
                ..Self::default()
            },
            Light::Spot {
                position,
                target,
                color,
                intensity,
                angle,
                penumbra,
            } => {
                let angle = angle.clamp(0.0, std::f32::consts::FRAC_PI_2);
                let inner = angle * (1.0 - penumbra.clamp(0.0, 1.0));
                Self {
                    header: [Self::SPOT, intensity, 0.0, angle.cos()],
                    position: position.extend(inner.cos()).to_array(),
                    direction: (target - position)
                        .normalize_or(Vec3::NEG_Y)
                        .extend(0.0)
                        .to_array(),
                    color: rgb(color),
                    ground: [0.0; 4],
                }
            }
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
/// Per-frame camera and light state.
pub struct FrameUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// `[eye.x, eye.y, eye.z, time]`.
    pub eye: [f32; 4],
    /// `[light_count, 0, 0, 0]`.
    pub counts: [u32; 4],
    /// Packed lights, first `counts[0]` valid.
    pub lights: [LightUniform; MAX_LIGHTS],
}

impl FrameUniform {
    /// Pack camera state and up to [`MAX_LIGHTS`] lights.
    #[must_use]
    pub fn new(view_proj: Mat4, eye: Vec3, time: f32, lights: &[Light]) -> Self {
        if lights.len() > MAX_LIGHTS {
            log::warn!(
                "scene has {} lights, only the first {MAX_LIGHTS} are used",
                lights.len()
            );
        }
        let mut packed = [LightUniform::default(); MAX_LIGHTS];
        let count = lights.len().min(MAX_LIGHTS);
        for (slot, light) in packed.iter_mut().zip(lights) {
            *slot = LightUniform::pack(light);
        }
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            eye: eye.extend(time).to_array(),
            counts: [count as u32, 0, 0, 0],
            lights: packed,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
/// Per-object transform and material, indexed by instance in the shader.
pub struct ObjectUniform {
    /// Model matrix.
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of the model matrix.
    pub normal: [[f32; 4]; 4],
    /// `[r, g, b, opacity]`.
    pub color: [f32; 4],
    /// `[r, g, b, metalness]`.
    pub emissive: [f32; 4],
    /// `[roughness, shading, effect, 0]`.
    pub material: [f32; 4],
    /// First effect parameter row.
    pub effect_a: [f32; 4],
    /// Second effect parameter row.
    pub effect_b: [f32; 4],
}

impl ObjectUniform {
    /// Pack one scene object.
    #[must_use]
    pub fn new(object: &SceneObject) -> Self {
        let m = &object.material;
        let (kind, effect_a, effect_b) = pack_effect(&m.effect);
        Self {
            model: object.transform.to_cols_array_2d(),
            normal: object
                .transform
                .inverse()
                .transpose()
                .to_cols_array_2d(),
            color: m.color.extend(m.opacity.clamp(0.0, 1.0)).to_array(),
            emissive: m.emissive.extend(m.metalness.clamp(0.0, 1.0)).to_array(),
            material: [
                m.roughness.clamp(0.0, 1.0),
                m.shading.shader_index() as f32,
                kind,
                0.0,
            ],
            effect_a,
            effect_b,
        }
    }
}

fn pack_effect(effect: &Effect) -> (f32, [f32; 4], [f32; 4]) {
    match *effect {
        Effect::None => (0.0, [0.0; 4], [0.0; 4]),
        Effect::Checker {
            repeat,
            offset,
            rotation,
            alternate,
        } => (
            1.0,
            [repeat.x, repeat.y, offset.x, offset.y],
            alternate.extend(rotation).to_array(),
        ),
        Effect::Bumps { strength, scale } => (2.0, [strength, scale, 0.0, 0.0], [0.0; 4]),
        Effect::Wave {
            amplitude,
            frequency,
            time,
            crest,
        } => (
            3.0,
            [amplitude, frequency, time, 0.0],
            crest.extend(0.0).to_array(),
        ),
        Effect::Plasma { time, scale } => (4.0, [time, scale, 0.0, 0.0], [0.0; 4]),
        Effect::Fire {
            time,
            intensity,
            scale,
            tip,
        } => (
            5.0,
            [time, intensity, scale, 0.0],
            tip.extend(0.0).to_array(),
        ),
        Effect::Glow { intensity, color } => (
            6.0,
            [intensity, 0.0, 0.0, 0.0],
            color.extend(0.0).to_array(),
        ),
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
/// Post chain flattened to two rows per effect.
pub struct PostUniform {
    /// `[width, height, time, effect_count]`.
    pub screen: [f32; 4],
    /// Row pairs: `[kind, p0, p1, p2]`, `[p3, p4, p5, p6]`.
    pub effects: [[f32; 4]; MAX_POST_EFFECTS * 2],
}

impl PostUniform {
    /// Pack up to [`MAX_POST_EFFECTS`] effects of `chain`.
    #[must_use]
    pub fn new(chain: &PostChain, width: u32, height: u32, time: f32) -> Self {
        if chain.effects.len() > MAX_POST_EFFECTS {
            log::warn!(
                "post chain has {} effects, only the first {MAX_POST_EFFECTS} are used",
                chain.effects.len()
            );
        }
        let mut effects = [[0.0; 4]; MAX_POST_EFFECTS * 2];
        let count = chain.effects.len().min(MAX_POST_EFFECTS);
        for (i, effect) in chain.effects.iter().take(count).enumerate() {
            let (head, tail) = pack_post_effect(effect);
            effects[i * 2] = head;
            effects[i * 2 + 1] = tail;
        }
        Self {
            screen: [width as f32, height as f32, time, count as f32],
            effects,
        }
    }
}

fn pack_post_effect(effect: &PostEffect) -> ([f32; 4], [f32; 4]) {
    match *effect {
        PostEffect::Exposure { value } => ([1.0, value.max(0.0), 0.0, 0.0], [0.0; 4]),
        PostEffect::Glow {
            strength,
            threshold,
            radius,
        } => ([2.0, strength, threshold, radius.max(0.0)], [0.0; 4]),
        PostEffect::Vignette {
            intensity,
            smoothness,
        } => ([3.0, intensity, smoothness.max(1e-3), 0.0], [0.0; 4]),
        PostEffect::ChromaticAberration { offset } => ([4.0, offset, 0.0, 0.0], [0.0; 4]),
        PostEffect::Noise { amount } => ([5.0, amount, 0.0, 0.0], [0.0; 4]),
        PostEffect::Pixelate { size } => ([6.0, size.max(1.0), 0.0, 0.0], [0.0; 4]),
        PostEffect::Tint { color, amount } => (
            [7.0, amount.clamp(0.0, 1.0), 0.0, 0.0],
            color.extend(0.0).to_array(),
        ),
        PostEffect::Grayscale { amount } => ([8.0, amount.clamp(0.0, 1.0), 0.0, 0.0], [0.0; 4]),
        PostEffect::ColorGrade {
            hue,
            saturation,
            brightness,
            contrast,
        } => (
            [9.0, hue, saturation.max(-1.0), brightness],
            [contrast.max(-1.0), 0.0, 0.0, 0.0],
        ),
        PostEffect::Sepia { amount } => ([10.0, amount.clamp(0.0, 1.0), 0.0, 0.0], [0.0; 4]),
        PostEffect::DotScreen { scale } => ([11.0, scale.max(0.01), 0.0, 0.0], [0.0; 4]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Geometry, Material};

    #[test]
    fn layouts_are_vec4_aligned() {
        assert_eq!(size_of::<LightUniform>() % 16, 0);
        assert_eq!(size_of::<FrameUniform>() % 16, 0);
        assert_eq!(size_of::<ObjectUniform>(), 208);
        assert_eq!(size_of::<PostUniform>() % 16, 0);
    }

    #[test]
    fn lights_are_capped() {
        let lights = vec![Light::ambient(0.1); MAX_LIGHTS + 3];
        let frame = FrameUniform::new(Mat4::IDENTITY, Vec3::ZERO, 0.0, &lights);
        assert_eq!(frame.counts[0] as usize, MAX_LIGHTS);
    }

    #[test]
    fn directional_light_points_at_origin() {
        let frame = FrameUniform::new(
            Mat4::IDENTITY,
            Vec3::ZERO,
            1.5,
            &[Light::directional(Vec3::new(0.0, 10.0, 0.0), 1.0)],
        );
        assert_eq!(frame.lights[0].direction, [0.0, -1.0, 0.0, 0.0]);
        assert_eq!(frame.eye[3], 1.5);
    }

    #[test]
    fn spot_cone_inner_is_inside_outer() {
        let spot = Light::Spot {
            position: Vec3::Y * 5.0,
            target: Vec3::ZERO,
            color: Vec3::ONE,
            intensity: 2.0,
            angle: 0.5,
            penumbra: 0.3,
        };
        let packed = LightUniform::pack(&spot);
        assert!(packed.position[3] > packed.header[3]);
    }

    #[test]
    fn object_packs_material() {
        let object = SceneObject::new(Geometry::cube(1.0))
            .at(Vec3::new(1.0, 2.0, 3.0))
            .with_material(Material {
                opacity: 0.5,
                effect: Effect::Plasma {
                    time: 2.0,
                    scale: 3.0,
                },
                ..Material::color(Vec3::X)
            });
        let packed = ObjectUniform::new(&object);
        assert_eq!(packed.color, [1.0, 0.0, 0.0, 0.5]);
        assert_eq!(packed.material[2], 4.0);
        assert_eq!(packed.effect_a[..2], [2.0, 3.0]);
        assert_eq!(packed.model[3][..3], [1.0, 2.0, 3.0]);
    }

    #[test]
    fn post_chain_keeps_order_and_count() {
        let chain = PostChain::new()
            .with(PostEffect::Exposure { value: 1.2 })
            .with(PostEffect::Grayscale { amount: 2.0 });
        let packed = PostUniform::new(&chain, 800, 600, 0.0);
        assert_eq!(packed.screen, [800.0, 600.0, 0.0, 2.0]);
        assert_eq!(packed.effects[0][0], 1.0);
        assert_eq!(packed.effects[2], [8.0, 1.0, 0.0, 0.0]);
    }
}
