//! Procedural motion patterns: rotation, waves, spirals and a particle
//! field.

use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{cone, construct};
use crate::error::VistaError;
use crate::panel::{PanelSpec, ParameterPanel};
use crate::registry::{RegistryBuilder, SampleEntry};
use crate::sample::{FrameInput, Sample};
use crate::scene::{hex_color, Geometry, Grid, Light, Material, Scene, SceneObject, Shading};
use crate::util::easing::Easing;

pub(super) fn register(builder: &mut RegistryBuilder) -> Result<(), VistaError> {
    let _ = builder.register(
        "animations",
        SampleEntry::new("animation-demo", construct::<AnimationDemo>)
            .titled("Animation Demo")
            .described("Experiment with different animation patterns.")
            .with_source(include_str!("animations.rs")),
    )?;
    Ok(())
}

const PARTICLE_SPREAD: f32 = 10.0;
const PARTICLE_SEED: u64 = 0x5eed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
enum Pattern {
    #[default]
    Rotation,
    Wave,
    Spiral,
    Particles,
    Combined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Animation", inline)]
#[serde(default)]
struct AnimationSettings {
    pattern: Pattern,
    #[schemars(range(min = 0.0, max = 5.0), extend("step" = 0.1))]
    speed: f32,
    #[schemars(range(min = 0.5, max = 5.0), extend("step" = 0.1))]
    amplitude: f32,
    /// Shapes the vertical motion of the wave pattern.
    easing: Easing,
    #[schemars(extend("format" = "color"))]
    color_a: String,
    #[schemars(extend("format" = "color"))]
    color_b: String,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            pattern: Pattern::Rotation,
            speed: 1.0,
            amplitude: 2.0,
            easing: Easing::Linear,
            color_a: "#ff6b6b".to_owned(),
            color_b: "#4ecdc4".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Particles", inline)]
#[serde(default)]
struct ParticleSettings {
    #[schemars(range(min = 100, max = 3000), extend("step" = 100))]
    count: u32,
    #[schemars(range(min = 0.01, max = 0.2), extend("step" = 0.01))]
    size: f32,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            count: 1000,
            size: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
struct AnimationParams {
    animation: AnimationSettings,
    particles: ParticleSettings,
}

#[derive(Debug)]
struct Particle {
    position: Vec3,
    uses_a: bool,
}

fn scatter(count: u32) -> Vec<Particle> {
    let mut rng = StdRng::seed_from_u64(PARTICLE_SEED);
    let half = PARTICLE_SPREAD * 0.5;
    (0..count)
        .map(|_| Particle {
            position: Vec3::new(
                rng.random_range(-half..half),
                rng.random_range(-half..half),
                rng.random_range(-half..half),
            ),
            uses_a: rng.random_bool(0.5),
        })
        .collect()
}

/// Group transform and per-child (position, rotation) for the shape
/// patterns.
fn shape_poses(
    settings: &AnimationSettings,
    time: f32,
    bases: &[Vec3],
) -> (Mat4, Vec<(Vec3, Vec3)>) {
    let amplitude = settings.amplitude;
    let group = match settings.pattern {
        Pattern::Rotation => Mat4::from_euler(EulerRot::XYZ, time * 0.5, time * 0.3, 0.0),
        Pattern::Combined => Mat4::from_rotation_y(time * 0.2),
        Pattern::Wave | Pattern::Spiral | Pattern::Particles => Mat4::IDENTITY,
    };
    let poses = bases
        .iter()
        .enumerate()
        .map(|(i, &base)| {
            let i = i as f32;
            match settings.pattern {
                Pattern::Wave => {
                    let phase = ((time + i * 0.5).sin() + 1.0) * 0.5;
                    let y = (settings.easing.evaluate(phase) * 2.0 - 1.0) * amplitude;
                    (Vec3::new(base.x, y, base.z), Vec3::ZERO)
                }
                Pattern::Spiral => {
                    let angle = time + i * 0.5;
                    (
                        Vec3::new(
                            angle.cos() * amplitude,
                            (time * 2.0 + i).sin() * 0.5,
                            angle.sin() * amplitude,
                        ),
                        Vec3::ZERO,
                    )
                }
                Pattern::Combined => (
                    Vec3::new(base.x, (time + i * 0.5).sin() * amplitude * 0.3, base.z),
                    Vec3::new(time + i * 0.5, 0.0, time + i * 0.3),
                ),
                Pattern::Rotation | Pattern::Particles => (base, Vec3::ZERO),
            }
        })
        .collect();
    (group, poses)
}

/// The particle cloud is seeded and rebuilt only when the requested count
/// changes.
#[derive(Debug, Default)]
struct AnimationDemo {
    particles: Vec<Particle>,
}

impl AnimationDemo {
    fn draw_particles(
        &mut self,
        settings: &AnimationSettings,
        particles: &ParticleSettings,
        time: f32,
        scene: &mut Scene,
    ) {
        if self.particles.len() != particles.count as usize {
            log::debug!("scattering {} particles", particles.count);
            self.particles = scatter(particles.count);
        }
        let spin = Quat::from_rotation_y(time * 0.1);
        let geometry = Geometry::Icosahedron {
            radius: particles.size,
            detail: 0,
        };
        let color_a = hex_color(&settings.color_a);
        let color_b = hex_color(&settings.color_b);
        for particle in &self.particles {
            let p = particle.position;
            let y = (time + p.x * 0.1).sin() * settings.amplitude;
            scene.add(
                SceneObject::new(geometry.clone())
                    .at(spin * Vec3::new(p.x, y, p.z))
                    .with_material(Material {
                        shading: Shading::Unlit,
                        opacity: 0.8,
                        ..Material::color(if particle.uses_a { color_a } else { color_b })
                    }),
            );
        }
    }
}

impl Sample for AnimationDemo {
    fn parameters(&self) -> PanelSpec {
        PanelSpec::of::<AnimationParams>()
    }

    fn update(&mut self, frame: &FrameInput, panel: &ParameterPanel, scene: &mut Scene) {
        let AnimationParams {
            animation,
            particles,
        } = panel.read();
        let time = frame.time * animation.speed;

        scene.light(Light::ambient(0.5));
        scene.light(Light::directional(Vec3::new(10.0, 10.0, 5.0), 1.0));
        scene.grid = Some(Grid::new(10.0, 10));

        if animation.pattern == Pattern::Particles {
            self.draw_particles(&animation, &particles, time, scene);
            return;
        }

        let color_a = hex_color(&animation.color_a);
        let color_b = hex_color(&animation.color_b);
        let shapes = [
            (Geometry::cube(1.0), color_a),
            (
                Geometry::Sphere {
                    radius: 0.7,
                    width_segments: 32,
                    height_segments: 32,
                },
                color_b,
            ),
            (cone(0.7, 1.5), color_a),
        ];
        let bases = [Vec3::new(-3.0, 0.0, 0.0), Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0)];
        let (group, poses) = shape_poses(&animation, time, &bases);
        for ((geometry, color), (position, rotation)) in shapes.into_iter().zip(poses) {
            let local = Mat4::from_rotation_translation(
                Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z),
                position,
            );
            scene.add(
                SceneObject::new(geometry)
                    .with_transform(group * local)
                    .with_material(Material::color(color)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn settings(pattern: Pattern) -> AnimationSettings {
        AnimationSettings {
            pattern,
            ..AnimationSettings::default()
        }
    }

    const BASES: [Vec3; 3] = [Vec3::new(-3.0, 0.0, 0.0), Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0)];

    #[test]
    fn wave_stays_within_amplitude() {
        let wave = settings(Pattern::Wave);
        for step in 0..50 {
            let (group, poses) = shape_poses(&wave, step as f32 * 0.13, &BASES);
            assert_eq!(group, Mat4::IDENTITY);
            for ((position, _), base) in poses.iter().zip(BASES) {
                assert!(position.y.abs() <= wave.amplitude + 1e-4);
                assert_eq!(position.x, base.x);
            }
        }
    }

    #[test]
    fn spiral_orbits_at_amplitude() {
        let spiral = settings(Pattern::Spiral);
        let (_, poses) = shape_poses(&spiral, 1.7, &BASES);
        for (position, _) in poses {
            let radius = Vec3::new(position.x, 0.0, position.z).length();
            assert!((radius - spiral.amplitude).abs() < 1e-4);
        }
    }

    #[test]
    fn rotation_turns_the_group() {
        let (group, poses) = shape_poses(&settings(Pattern::Rotation), 1.0, &BASES);
        assert_ne!(group, Mat4::IDENTITY);
        assert_eq!(poses[0].0, BASES[0]);
    }

    #[test]
    fn particles_follow_the_count() {
        let mut demo = AnimationDemo::default();
        let mut panel = ParameterPanel::new(demo.parameters());
        panel.set("animation", "pattern", json!("particles")).unwrap();
        panel.set("particles", "count", json!(200)).unwrap();
        let mut scene = Scene::new();
        demo.update(&FrameInput::default(), &panel, &mut scene);
        assert_eq!(scene.objects.len(), 200);
        assert!(scene.objects.iter().all(|o| o.material.is_transparent()));

        panel.set("particles", "count", json!(300)).unwrap();
        scene.clear();
        demo.update(&FrameInput::default(), &panel, &mut scene);
        assert_eq!(scene.objects.len(), 300);
    }

    #[test]
    fn scatter_is_deterministic() {
        let a = scatter(10);
        let b = scatter(10);
        assert!(a.iter().zip(&b).all(|(x, y)| x.position == y.position));
        let half = PARTICLE_SPREAD * 0.5;
        assert!(a.iter().all(|p| p.position.abs().max_element() <= half));
    }
}
