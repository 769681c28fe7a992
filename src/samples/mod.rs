//! Built-in samples, one module per catalog category.
//!
//! Every module exposes a `register` function adding its samples in listing
//! order. Parameter structs follow the same layout throughout: a top-level
//! struct whose fields are inline group structs, each deriving
//! [`schemars::JsonSchema`] so the panel can build controls from them.

mod advanced;
mod animations;
mod basics;
mod cameras;
mod geometries;
mod lights;
mod materials;
mod performance;
mod physics;
mod postprocessing;
mod shaders;
mod textures;

use glam::Vec3;

use crate::error::VistaError;
use crate::registry::RegistryBuilder;
use crate::sample::Sample;
use crate::scene::{Geometry, Material, Scene, SceneObject, Shading};

/// Register every built-in sample, categories in catalog order.
pub(crate) fn register_all(builder: &mut RegistryBuilder) -> Result<(), VistaError> {
    basics::register(builder)?;
    geometries::register(builder)?;
    materials::register(builder)?;
    lights::register(builder)?;
    cameras::register(builder)?;
    animations::register(builder)?;
    textures::register(builder)?;
    shaders::register(builder)?;
    postprocessing::register(builder)?;
    physics::register(builder)?;
    performance::register(builder)?;
    advanced::register(builder)?;
    Ok(())
}

/// Registry constructor for any default-constructible sample.
fn construct<S: Sample + Default + 'static>() -> Box<dyn Sample> {
    Box::new(S::default())
}

/// `hsl(hue°, saturation, lightness)` as linear RGB.
fn hsl(hue: f32, saturation: f32, lightness: f32) -> Vec3 {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c * 0.5;
    Vec3::new(r + m, g + m, b + m).map(|v| {
        if v <= 0.040_45 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    })
}

/// Floor plane facing +Y.
fn floor(size: f32, elevation: f32, material: Material) -> SceneObject {
    SceneObject::new(Geometry::plane(size, size))
        .placed(
            Vec3::new(0.0, elevation, 0.0),
            Vec3::new(-std::f32::consts::FRAC_PI_2, 0.0, 0.0),
            1.0,
        )
        .with_material(material)
}

/// Red, green and blue unlit bars along +X, +Y and +Z.
fn axes(scene: &mut Scene, length: f32) {
    const THICKNESS: f32 = 0.02;
    let bars = [
        (Vec3::new(length, THICKNESS, THICKNESS), Vec3::X),
        (Vec3::new(THICKNESS, length, THICKNESS), Vec3::Y),
        (Vec3::new(THICKNESS, THICKNESS, length), Vec3::Z),
    ];
    for (extent, axis) in bars {
        scene.add(
            SceneObject::new(Geometry::Box {
                width: extent.x,
                height: extent.y,
                depth: extent.z,
            })
            .at(axis * length * 0.5)
            .with_material(Material {
                shading: Shading::Unlit,
                ..Material::color(axis)
            }),
        );
    }
}

/// Cone of `radius` and `height` along Y.
fn cone(radius: f32, height: f32) -> Geometry {
    Geometry::Cylinder {
        radius_top: 0.0,
        radius_bottom: radius,
        height,
        radial_segments: 32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::ParameterPanel;
    use crate::registry::SampleRegistry;
    use crate::sample::FrameInput;
    use crate::scene::mesh::MeshData;
    use crate::surface::SurfaceConfig;

    fn every_entry() -> Vec<(&'static str, crate::registry::SampleEntry)> {
        let registry = SampleRegistry::builtin().unwrap();
        crate::catalog::Catalog::builtin()
            .all()
            .iter()
            .flat_map(|c| {
                registry
                    .lookup_category(c.id)
                    .iter()
                    .map(move |e| (c.id, *e))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    #[test]
    fn hsl_primaries() {
        assert!((hsl(0.0, 1.0, 0.5) - Vec3::X).length() < 1e-5);
        assert!((hsl(120.0, 1.0, 0.5) - Vec3::Y).length() < 1e-5);
        assert!((hsl(240.0, 1.0, 0.5) - Vec3::Z).length() < 1e-5);
        assert!((hsl(360.0, 1.0, 0.5) - Vec3::X).length() < 1e-5);
        assert_eq!(hsl(90.0, 0.0, 0.0), Vec3::ZERO);
    }

    #[test]
    fn every_sample_builds_a_drawable_scene() {
        for (category, entry) in every_entry() {
            let mut sample = entry.instantiate();
            let panel = ParameterPanel::new(sample.parameters());
            let mut scene = Scene::new();
            let mut frame = FrameInput::default();
            for _ in 0..3 {
                frame = frame.advance(1.0 / 60.0);
                scene.clear();
                sample.update(&frame, &panel, &mut scene);
            }
            assert!(
                !scene.objects.is_empty(),
                "{category}/{} drew nothing",
                entry.id()
            );
            assert!(!scene.lights.is_empty(), "{} has no lights", entry.id());
            for object in &scene.objects {
                assert!(object.transform.is_finite(), "{}", entry.id());
                if !matches!(object.geometry, Geometry::Custom { .. }) {
                    assert!(MeshData::generate(&object.geometry).triangle_count() > 0);
                }
            }
        }
    }

    #[test]
    fn every_sample_has_parameters_and_source() {
        for (_, entry) in every_entry() {
            let sample = entry.instantiate();
            assert!(!sample.parameters().is_empty(), "{}", entry.id());
            assert!(entry.source().is_some_and(|s| !s.is_empty()));
            assert_ne!(entry.title(), entry.id());
        }
    }

    #[test]
    fn only_flagged_samples_change_the_surface() {
        let defaults = SurfaceConfig::default();
        for (_, entry) in every_entry() {
            if entry.renders_own_surface() {
                continue;
            }
            let mut sample = entry.instantiate();
            assert_eq!(sample.surface_config(&defaults), defaults, "{}", entry.id());

            // Nor may they steer the shared surface from inside a frame.
            let panel = ParameterPanel::new(sample.parameters());
            let mut scene = Scene::new();
            sample.update(&FrameInput::default().advance(1.0 / 60.0), &panel, &mut scene);
            assert!(scene.camera.is_none(), "{} moves the camera", entry.id());
            assert!(scene.post.is_none(), "{} adds post effects", entry.id());
        }
    }

    #[test]
    fn physics_frames_its_own_wide_camera() {
        let registry = SampleRegistry::builtin().unwrap();
        let defaults = SurfaceConfig::default();
        for entry in registry.lookup_category("physics") {
            assert!(entry.renders_own_surface(), "{}", entry.id());
            let config = entry.instantiate().surface_config(&defaults);
            assert_eq!(config.camera.position, Vec3::new(15.0, 10.0, 15.0));
            assert_eq!(config.camera.target, Vec3::ZERO);
            assert_eq!(config.orbit, defaults.orbit);
        }
    }

    #[test]
    fn floor_faces_up() {
        let plane = floor(10.0, -2.0, Material::default());
        let up = plane.transform.transform_vector3(Vec3::Z);
        assert!((up - Vec3::Y).length() < 1e-5);
        assert_eq!(plane.transform.w_axis.y, -2.0);
    }
}
