//! Switch between the built-in parametric shapes.

use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{cone, construct};
use crate::error::VistaError;
use crate::panel::{PanelSpec, ParameterPanel};
use crate::registry::{RegistryBuilder, SampleEntry};
use crate::sample::{FrameInput, Sample};
use crate::scene::{hex_color, Geometry, Grid, Light, Material, Scene, SceneObject};

pub(super) fn register(builder: &mut RegistryBuilder) -> Result<(), VistaError> {
    let _ = builder.register(
        "geometries",
        SampleEntry::new("geometry-showcase", construct::<GeometryShowcase>)
            .titled("Geometry Showcase")
            .described("Switch between the basic built-in geometries.")
            .with_source(include_str!("geometries.rs")),
    )?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
enum Shape {
    #[default]
    Box,
    Sphere,
    Cone,
    Cylinder,
    Torus,
    TorusKnot,
    Icosahedron,
    Geodesic,
}

impl Shape {
    fn geometry(self) -> Geometry {
        match self {
            Self::Box => Geometry::cube(2.0),
            Self::Sphere => Geometry::sphere(1.5),
            Self::Cone => cone(1.0, 2.0),
            Self::Cylinder => Geometry::Cylinder {
                radius_top: 1.0,
                radius_bottom: 1.0,
                height: 2.0,
                radial_segments: 32,
            },
            Self::Torus => Geometry::Torus {
                radius: 1.0,
                tube: 0.4,
                radial_segments: 16,
                tubular_segments: 100,
            },
            Self::TorusKnot => Geometry::TorusKnot {
                radius: 1.0,
                tube: 0.3,
                tubular_segments: 100,
                radial_segments: 16,
                p: 2,
                q: 3,
            },
            Self::Icosahedron => Geometry::Icosahedron {
                radius: 1.5,
                detail: 0,
            },
            Self::Geodesic => Geometry::Icosahedron {
                radius: 1.5,
                detail: 2,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Geometry", inline)]
#[serde(default)]
struct GeometrySettings {
    shape: Shape,
    wireframe: bool,
    /// Radians per second around X and Y.
    #[schemars(range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    rotation_speed: f32,
    #[schemars(extend("format" = "color"))]
    color: String,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            shape: Shape::Box,
            wireframe: false,
            rotation_speed: 0.3,
            color: "#4fc3f7".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
struct GeometryParams {
    geometry: GeometrySettings,
}

#[derive(Debug, Default)]
struct GeometryShowcase {
    rotation: f32,
}

impl Sample for GeometryShowcase {
    fn parameters(&self) -> PanelSpec {
        PanelSpec::of::<GeometryParams>()
    }

    fn update(&mut self, frame: &FrameInput, panel: &ParameterPanel, scene: &mut Scene) {
        let GeometryParams { geometry } = panel.read();
        self.rotation += geometry.rotation_speed * frame.delta;

        scene.light(Light::ambient(0.5));
        scene.light(Light::directional(Vec3::new(10.0, 10.0, 5.0), 1.0));
        scene.add(
            SceneObject::new(geometry.shape.geometry())
                .placed(Vec3::ZERO, Vec3::new(self.rotation, self.rotation, 0.0), 1.0)
                .with_material(Material {
                    wireframe: geometry.wireframe,
                    ..Material::color(hex_color(&geometry.color))
                }),
        );
        scene.grid = Some(Grid::new(10.0, 10));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::panel::ControlKind;

    #[test]
    fn every_shape_is_offered_and_distinct() {
        let spec = PanelSpec::of::<GeometryParams>();
        let ControlKind::Choice { options } = &spec.groups()[0].fields[0].kind else {
            panic!("shape should be a choice");
        };
        assert_eq!(options.len(), 8);
        assert!(options.iter().any(|o| o == "torus_knot"));

        let shapes: Vec<Shape> = options
            .iter()
            .map(|o| serde_json::from_value(json!(o)).unwrap())
            .collect();
        for (i, a) in shapes.iter().enumerate() {
            for b in &shapes[i + 1..] {
                assert_ne!(a.geometry().cache_key(), b.geometry().cache_key());
            }
        }
    }

    #[test]
    fn selected_shape_is_drawn() {
        let mut sample = GeometryShowcase::default();
        let mut panel = ParameterPanel::new(sample.parameters());
        panel.set("geometry", "shape", json!("cone")).unwrap();
        let mut scene = Scene::new();
        sample.update(&FrameInput::default(), &panel, &mut scene);
        assert!(matches!(
            scene.objects[0].geometry,
            Geometry::Cylinder { radius_top, .. } if radius_top == 0.0
        ));
    }
}
