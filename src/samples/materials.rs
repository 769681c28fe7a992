//! One torus knot, every shading model.

use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::construct;
use crate::error::VistaError;
use crate::panel::{PanelSpec, ParameterPanel};
use crate::registry::{RegistryBuilder, SampleEntry};
use crate::sample::{FrameInput, Sample};
use crate::scene::{
    hex_color, Geometry, Grid, Light, Material, Scene, SceneObject, Shading,
};

pub(super) fn register(builder: &mut RegistryBuilder) -> Result<(), VistaError> {
    let _ = builder.register(
        "materials",
        SampleEntry::new("material-showcase", construct::<MaterialShowcase>)
            .titled("Material Showcase")
            .described("Compare material types and their properties.")
            .with_source(include_str!("materials.rs")),
    )?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
enum MaterialKind {
    #[default]
    Standard,
    Basic,
    Phong,
    Lambert,
    Physical,
    Toon,
    Normal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Material", inline)]
#[serde(default)]
struct MaterialSettings {
    kind: MaterialKind,
    #[schemars(extend("format" = "color"))]
    color: String,
    #[schemars(extend("format" = "color"))]
    emissive: String,
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    metalness: f32,
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    roughness: f32,
    wireframe: bool,
    /// Only applied when `transparent` is on.
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    opacity: f32,
    transparent: bool,
}

impl Default for MaterialSettings {
    fn default() -> Self {
        Self {
            kind: MaterialKind::Standard,
            color: "#ff9800".to_owned(),
            emissive: "#000000".to_owned(),
            metalness: 0.5,
            roughness: 0.5,
            wireframe: false,
            opacity: 1.0,
            transparent: false,
        }
    }
}

impl MaterialSettings {
    fn material(&self) -> Material {
        let base = Material {
            color: hex_color(&self.color),
            opacity: if self.transparent { self.opacity } else { 1.0 },
            wireframe: self.wireframe,
            ..Material::default()
        };
        let emissive = hex_color(&self.emissive);
        match self.kind {
            MaterialKind::Standard => Material {
                emissive,
                metalness: self.metalness,
                roughness: self.roughness,
                ..base
            },
            // Clear coat approximated by halving roughness.
            MaterialKind::Physical => Material {
                metalness: self.metalness,
                roughness: self.roughness * 0.5,
                ..base
            },
            MaterialKind::Basic => Material {
                shading: Shading::Unlit,
                ..base
            },
            MaterialKind::Phong => Material {
                emissive,
                roughness: 0.1,
                shading: Shading::Phong,
                ..base
            },
            MaterialKind::Lambert => Material {
                emissive,
                shading: Shading::Lambert,
                ..base
            },
            MaterialKind::Toon => Material {
                shading: Shading::Toon,
                ..base
            },
            MaterialKind::Normal => Material {
                shading: Shading::Normal,
                ..base
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
struct MaterialParams {
    material: MaterialSettings,
}

#[derive(Debug, Default)]
struct MaterialShowcase;

impl Sample for MaterialShowcase {
    fn parameters(&self) -> PanelSpec {
        PanelSpec::of::<MaterialParams>()
    }

    fn update(&mut self, frame: &FrameInput, panel: &ParameterPanel, scene: &mut Scene) {
        let MaterialParams { material } = panel.read();

        scene.light(Light::ambient(0.5));
        scene.light(Light::directional(Vec3::new(10.0, 10.0, 5.0), 1.0));
        scene.light(Light::Point {
            position: Vec3::new(-10.0, -10.0, -5.0),
            color: hex_color("#ffaa00"),
            intensity: 0.5,
            range: 0.0,
        });
        scene.add(
            SceneObject::new(Geometry::TorusKnot {
                radius: 1.0,
                tube: 0.4,
                tubular_segments: 100,
                radial_segments: 16,
                p: 2,
                q: 3,
            })
            .placed(
                Vec3::ZERO,
                Vec3::new(frame.time * 0.5, frame.time * 0.3, 0.0),
                1.0,
            )
            .with_material(material.material()),
        );
        scene.grid = Some(Grid::new(10.0, 10));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_shading_models() {
        let mut settings = MaterialSettings::default();
        assert_eq!(settings.material().shading, Shading::Standard);
        settings.kind = MaterialKind::Basic;
        assert_eq!(settings.material().shading, Shading::Unlit);
        settings.kind = MaterialKind::Toon;
        assert_eq!(settings.material().shading, Shading::Toon);
        settings.kind = MaterialKind::Physical;
        assert_eq!(settings.material().roughness, 0.25);
    }

    #[test]
    fn opacity_needs_transparency() {
        let mut settings = MaterialSettings {
            opacity: 0.4,
            ..MaterialSettings::default()
        };
        assert!(!settings.material().is_transparent());
        settings.transparent = true;
        assert!(settings.material().is_transparent());
        assert_eq!(settings.material().opacity, 0.4);
    }

    #[test]
    fn emissive_is_ignored_by_unlit_kinds() {
        let settings = MaterialSettings {
            kind: MaterialKind::Basic,
            emissive: "#ffffff".to_owned(),
            ..MaterialSettings::default()
        };
        assert_eq!(settings.material().emissive, Vec3::ZERO);
    }
}
