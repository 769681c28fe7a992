//! Per-frame scene description written by samples and drawn by surfaces.
//!
//! A [`Scene`] is plain data: objects (geometry + transform + material),
//! lights, an optional helper grid and optional per-frame camera and
//! post-processing overrides. Samples rebuild it every frame; a rendering
//! surface consumes it without holding on to it.

/// CPU mesh generators for [`Geometry`] variants.
pub mod mesh;

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

use crate::surface::{PostChain, Projection};

// ── Geometry ─────────────────────────────────────────────────────────────

/// Parametric shape of a scene object.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Axis-aligned box centered on the origin.
    Box {
        /// Extent along X.
        width: f32,
        /// Extent along Y.
        height: f32,
        /// Extent along Z.
        depth: f32,
    },
    /// UV sphere.
    Sphere {
        /// Sphere radius.
        radius: f32,
        /// Segments around the equator.
        width_segments: u32,
        /// Segments from pole to pole.
        height_segments: u32,
    },
    /// Plane in the XY plane facing +Z.
    Plane {
        /// Extent along X.
        width: f32,
        /// Extent along Y.
        height: f32,
        /// Subdivisions along each axis (1 = a single quad).
        segments: u32,
    },
    /// Torus around the Z axis.
    Torus {
        /// Distance from the center to the middle of the tube.
        radius: f32,
        /// Tube radius.
        tube: f32,
        /// Segments around the tube.
        radial_segments: u32,
        /// Segments around the ring.
        tubular_segments: u32,
    },
    /// (p, q) torus knot.
    TorusKnot {
        /// Knot radius.
        radius: f32,
        /// Tube radius.
        tube: f32,
        /// Segments along the knot.
        tubular_segments: u32,
        /// Segments around the tube.
        radial_segments: u32,
        /// Winds around the axis of rotational symmetry.
        p: u32,
        /// Winds around the interior circle.
        q: u32,
    },
    /// Capped cylinder along Y (a cone when one radius is zero).
    Cylinder {
        /// Radius at +Y.
        radius_top: f32,
        /// Radius at -Y.
        radius_bottom: f32,
        /// Extent along Y.
        height: f32,
        /// Segments around the axis.
        radial_segments: u32,
    },
    /// Subdivided icosahedron.
    Icosahedron {
        /// Circumscribed radius.
        radius: f32,
        /// Subdivision level (0 = plain icosahedron).
        detail: u32,
    },
    /// Caller-provided mesh, cached under `key`.
    Custom {
        /// Cache key; equal keys must mean equal meshes.
        key: u64,
        /// Mesh data.
        mesh: std::sync::Arc<mesh::MeshData>,
    },
}

impl Geometry {
    /// Box with equal sides.
    #[must_use]
    pub fn cube(size: f32) -> Self {
        Self::Box {
            width: size,
            height: size,
            depth: size,
        }
    }

    /// Sphere with the default tessellation.
    #[must_use]
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere {
            radius,
            width_segments: 32,
            height_segments: 16,
        }
    }

    /// Single-quad plane.
    #[must_use]
    pub fn plane(width: f32, height: f32) -> Self {
        Self::Plane {
            width,
            height,
            segments: 1,
        }
    }

    /// Hashable identity of the tessellated mesh. Floats are compared by
    /// bit pattern, so two geometries share a key exactly when they produce
    /// the same vertices.
    #[must_use]
    pub fn cache_key(&self) -> GeometryKey {
        let bits = f32::to_bits;
        match self {
            Self::Box {
                width,
                height,
                depth,
            } => GeometryKey(0, [bits(*width), bits(*height), bits(*depth), 0, 0, 0]),
            Self::Sphere {
                radius,
                width_segments,
                height_segments,
            } => GeometryKey(1, [bits(*radius), *width_segments, *height_segments, 0, 0, 0]),
            Self::Plane {
                width,
                height,
                segments,
            } => GeometryKey(2, [bits(*width), bits(*height), *segments, 0, 0, 0]),
            Self::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => GeometryKey(
                3,
                [bits(*radius), bits(*tube), *radial_segments, *tubular_segments, 0, 0],
            ),
            Self::TorusKnot {
                radius,
                tube,
                tubular_segments,
                radial_segments,
                p,
                q,
            } => GeometryKey(
                4,
                [bits(*radius), bits(*tube), *tubular_segments, *radial_segments, *p, *q],
            ),
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => GeometryKey(
                5,
                [bits(*radius_top), bits(*radius_bottom), bits(*height), *radial_segments, 0, 0],
            ),
            Self::Icosahedron { radius, detail } => {
                GeometryKey(6, [bits(*radius), *detail, 0, 0, 0, 0])
            }
            Self::Custom { key, .. } => GeometryKey(
                7,
                [(*key >> 32) as u32, *key as u32, 0, 0, 0, 0],
            ),
        }
    }
}

/// Cache identity of a [`Geometry`], see [`Geometry::cache_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryKey(u8, [u32; 6]);

// ── Material ─────────────────────────────────────────────────────────────

/// Lighting model used to shade an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    /// Metal/roughness physically based shading.
    #[default]
    Standard,
    /// Flat color, no lighting.
    Unlit,
    /// Diffuse only.
    Lambert,
    /// Diffuse plus sharp specular highlight.
    Phong,
    /// Quantized diffuse bands.
    Toon,
    /// View-space normal visualization.
    Normal,
}

impl Shading {
    /// Index understood by the scene shader.
    #[must_use]
    pub fn shader_index(self) -> u32 {
        match self {
            Self::Standard => 0,
            Self::Unlit => 1,
            Self::Lambert => 2,
            Self::Phong => 3,
            Self::Toon => 4,
            Self::Normal => 5,
        }
    }
}

/// Procedural surface effect evaluated in the scene shader.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Effect {
    /// Plain material color.
    #[default]
    None,
    /// Checkerboard texture with UV repeat, offset and rotation.
    Checker {
        /// UV repeat per axis.
        repeat: Vec2,
        /// UV offset.
        offset: Vec2,
        /// UV rotation in radians.
        rotation: f32,
        /// Second checker color.
        alternate: Vec3,
    },
    /// Procedural bump pattern perturbing the normal.
    Bumps {
        /// Normal perturbation strength.
        strength: f32,
        /// Pattern frequency.
        scale: f32,
    },
    /// Vertex wave displacement blended between two colors.
    Wave {
        /// Displacement amplitude.
        amplitude: f32,
        /// Spatial frequency.
        frequency: f32,
        /// Animation time in seconds (already scaled by speed).
        time: f32,
        /// Color at wave crests.
        crest: Vec3,
    },
    /// Animated plasma color field.
    Plasma {
        /// Animation time in seconds.
        time: f32,
        /// Pattern scale.
        scale: f32,
    },
    /// Flickering flame rising from the material color at the base to
    /// `tip` at the top.
    Fire {
        /// Animation time in seconds.
        time: f32,
        /// Brightness multiplier.
        intensity: f32,
        /// Noise frequency.
        scale: f32,
        /// Color at the flame tips.
        tip: Vec3,
    },
    /// Rim glow around silhouettes.
    Glow {
        /// Glow strength.
        intensity: f32,
        /// Glow color.
        color: Vec3,
    },
}

/// Surface appearance of a scene object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Base color (linear RGB).
    pub color: Vec3,
    /// Emitted color added after lighting.
    pub emissive: Vec3,
    /// Metalness in `[0, 1]`.
    pub metalness: f32,
    /// Roughness in `[0, 1]`.
    pub roughness: f32,
    /// Opacity in `[0, 1]`; values below 1 are alpha blended.
    pub opacity: f32,
    /// Lighting model.
    pub shading: Shading,
    /// Draw edges instead of filled triangles.
    pub wireframe: bool,
    /// Procedural effect.
    pub effect: Effect,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vec3::splat(0.8),
            emissive: Vec3::ZERO,
            metalness: 0.0,
            roughness: 0.5,
            opacity: 1.0,
            shading: Shading::Standard,
            wireframe: false,
            effect: Effect::None,
        }
    }
}

impl Material {
    /// Standard material with the given base color.
    #[must_use]
    pub fn color(color: Vec3) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// `true` when the object needs the blended (transparent) pipeline.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// Parse a `#rrggbb` (or `#rgb`) hex color into linear RGB.
///
/// Returns `None` for anything that is not a well-formed hex color.
#[must_use]
pub fn parse_hex_color(hex: &str) -> Option<Vec3> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    // `from_str_radix` would also take a sign.
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_owned(),
        _ => return None,
    };
    let channel = |i: usize| {
        u8::from_str_radix(expanded.get(i..i + 2)?, 16)
            .ok()
            .map(|v| srgb_to_linear(f32::from(v) / 255.0))
    };
    Some(Vec3::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Parse a hex color, falling back to neutral grey.
#[must_use]
pub fn hex_color(hex: &str) -> Vec3 {
    parse_hex_color(hex).unwrap_or_else(|| {
        log::warn!("invalid color '{hex}', using grey");
        Vec3::splat(0.5)
    })
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

// ── Objects and lights ───────────────────────────────────────────────────

/// One drawable object.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Shape to draw.
    pub geometry: Geometry,
    /// Model-to-world transform.
    pub transform: Mat4,
    /// Appearance.
    pub material: Material,
}

impl SceneObject {
    /// Object at the origin with the default material.
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            transform: Mat4::IDENTITY,
            material: Material::default(),
        }
    }

    /// Set translation, Euler rotation (XYZ, radians) and uniform scale.
    #[must_use]
    pub fn placed(mut self, position: Vec3, rotation: Vec3, scale: f32) -> Self {
        self.transform = Mat4::from_scale_rotation_translation(
            Vec3::splat(scale),
            Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z),
            position,
        );
        self
    }

    /// Translate to `position`, no rotation, unit scale.
    #[must_use]
    pub fn at(self, position: Vec3) -> Self {
        self.placed(position, Vec3::ZERO, 1.0)
    }

    /// Replace the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    /// Replace the material.
    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }
}

/// Light source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Uniform light from every direction.
    Ambient {
        /// Light color.
        color: Vec3,
        /// Intensity multiplier.
        intensity: f32,
    },
    /// Sky/ground gradient ambient light.
    Hemisphere {
        /// Color from above.
        sky: Vec3,
        /// Color from below.
        ground: Vec3,
        /// Intensity multiplier.
        intensity: f32,
    },
    /// Parallel light, e.g. the sun.
    Directional {
        /// Position the light shines from (toward the origin).
        position: Vec3,
        /// Light color.
        color: Vec3,
        /// Intensity multiplier.
        intensity: f32,
    },
    /// Omnidirectional light with distance falloff.
    Point {
        /// World position.
        position: Vec3,
        /// Light color.
        color: Vec3,
        /// Intensity multiplier.
        intensity: f32,
        /// Distance at which the light reaches zero (0 = infinite).
        range: f32,
    },
    /// Cone light.
    Spot {
        /// World position.
        position: Vec3,
        /// Point the cone is aimed at.
        target: Vec3,
        /// Light color.
        color: Vec3,
        /// Intensity multiplier.
        intensity: f32,
        /// Cone half-angle in radians.
        angle: f32,
        /// Fraction of the cone that fades out, `[0, 1]`.
        penumbra: f32,
    },
}

impl Light {
    /// White ambient light.
    #[must_use]
    pub fn ambient(intensity: f32) -> Self {
        Self::Ambient {
            color: Vec3::ONE,
            intensity,
        }
    }

    /// White directional light shining from `position`.
    #[must_use]
    pub fn directional(position: Vec3, intensity: f32) -> Self {
        Self::Directional {
            position,
            color: Vec3::ONE,
            intensity,
        }
    }

    /// White point light without range limit.
    #[must_use]
    pub fn point(position: Vec3, intensity: f32) -> Self {
        Self::Point {
            position,
            color: Vec3::ONE,
            intensity,
            range: 0.0,
        }
    }
}

/// Helper grid on the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    /// Total extent.
    pub size: f32,
    /// Number of cells per side.
    pub divisions: u32,
    /// Line color.
    pub color: Vec3,
    /// Height of the grid plane.
    pub elevation: f32,
}

impl Grid {
    /// Grey grid of `size` with `divisions` cells at y = 0.
    #[must_use]
    pub fn new(size: f32, divisions: u32) -> Self {
        Self {
            size,
            divisions,
            color: Vec3::splat(0.35),
            elevation: 0.0,
        }
    }

    /// Line segment endpoints making up the grid.
    #[must_use]
    pub fn segments(&self) -> Vec<[Vec3; 2]> {
        let divisions = self.divisions.max(1);
        let half = self.size * 0.5;
        let step = self.size / divisions as f32;
        let mut lines = Vec::with_capacity(2 * (divisions as usize + 1));
        for i in 0..=divisions {
            let t = -half + step * i as f32;
            lines.push([
                Vec3::new(t, self.elevation, -half),
                Vec3::new(t, self.elevation, half),
            ]);
            lines.push([
                Vec3::new(-half, self.elevation, t),
                Vec3::new(half, self.elevation, t),
            ]);
        }
        lines
    }
}

/// Per-frame camera request from a sample that drives its own rig.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraOverride {
    /// Projection to use this frame.
    pub projection: Projection,
    /// Eye position; `None` keeps the orbit position.
    pub position: Option<Vec3>,
    /// Look-at target; `None` keeps the orbit target.
    pub target: Option<Vec3>,
}

// ── Scene ────────────────────────────────────────────────────────────────

/// Everything a surface needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Background color; `None` uses the surface's clear color.
    pub background: Option<Vec3>,
    /// Drawable objects.
    pub objects: Vec<SceneObject>,
    /// Light sources.
    pub lights: Vec<Light>,
    /// Optional helper grid.
    pub grid: Option<Grid>,
    /// Optional camera override.
    pub camera: Option<CameraOverride>,
    /// Optional post-processing override.
    pub post: Option<PostChain>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self {
            background: None,
            objects: Vec::new(),
            lights: Vec::new(),
            grid: None,
            camera: None,
            post: None,
        }
    }

    /// Drop everything, keeping allocations.
    pub fn clear(&mut self) {
        self.background = None;
        self.objects.clear();
        self.lights.clear();
        self.grid = None;
        self.camera = None;
        self.post = None;
    }

    /// Append an object.
    pub fn add(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    /// Append a light.
    pub fn light(&mut self, light: Light) {
        self.lights.push(light);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse_to_linear() {
        let white = parse_hex_color("#ffffff").unwrap();
        assert!((white - Vec3::ONE).length() < 1e-5);
        let black = parse_hex_color("#000").unwrap();
        assert_eq!(black, Vec3::ZERO);
        let mid = parse_hex_color("#808080").unwrap();
        assert!(mid.x > 0.2 && mid.x < 0.23, "sRGB 0.5 is ~0.216 linear");
        assert!(parse_hex_color("#12345").is_none());
        assert!(parse_hex_color("#gggggg").is_none());
        assert!(parse_hex_color("#+1+2+3").is_none());
        assert!(parse_hex_color("+ff").is_none());
    }

    #[test]
    fn cache_keys_follow_parameters() {
        let a = Geometry::sphere(1.0);
        let b = Geometry::sphere(1.0);
        let c = Geometry::sphere(1.5);
        assert_eq!(a.cache_key(), b.cache_key());
        assert_ne!(a.cache_key(), c.cache_key());
        assert_ne!(Geometry::cube(1.0).cache_key(), a.cache_key());
    }

    #[test]
    fn grid_has_two_lines_per_division_edge() {
        let grid = Grid::new(10.0, 10);
        let segments = grid.segments();
        assert_eq!(segments.len(), 22);
        assert!(segments.iter().all(|[a, b]| a.y == 0.0 && b.y == 0.0));
    }

    #[test]
    fn clear_empties_the_scene() {
        let mut scene = Scene::new();
        scene.add(SceneObject::new(Geometry::cube(1.0)));
        scene.light(Light::ambient(0.5));
        scene.grid = Some(Grid::new(4.0, 4));
        scene.clear();
        assert_eq!(scene, Scene::new());
    }
}
