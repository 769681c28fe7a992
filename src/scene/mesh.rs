use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use rustc_hash::{FxHashMap, FxHashSet};

use super::Geometry;

/// Interleaved vertex uploaded as-is to the GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Unit normal.
    pub normal: [f32; 3],
    /// Texture coordinate.
    pub uv: [f32; 2],
}

impl MeshVertex {
    fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.normalize_or_zero().to_array(),
            uv: uv.to_array(),
        }
    }
}

/// Indexed triangle list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    /// Vertices.
    pub vertices: Vec<MeshVertex>,
    /// Triangle list indices into `vertices`.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Tessellate a geometry.
    #[must_use]
    pub fn generate(geometry: &Geometry) -> Self {
        match geometry {
            Geometry::Box {
                width,
                height,
                depth,
            } => cuboid(Vec3::new(*width, *height, *depth)),
            Geometry::Sphere {
                radius,
                width_segments,
                height_segments,
            } => sphere(*radius, (*width_segments).max(3), (*height_segments).max(2)),
            Geometry::Plane {
                width,
                height,
                segments,
            } => plane(*width, *height, (*segments).max(1)),
            Geometry::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => torus(
                *radius,
                *tube,
                (*radial_segments).max(3),
                (*tubular_segments).max(3),
            ),
            Geometry::TorusKnot {
                radius,
                tube,
                tubular_segments,
                radial_segments,
                p,
                q,
            } => torus_knot(
                *radius,
                *tube,
                (*tubular_segments).max(3),
                (*radial_segments).max(3),
                (*p).max(1),
                (*q).max(1),
            ),
            Geometry::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => cylinder(
                *radius_top,
                *radius_bottom,
                *height,
                (*radial_segments).max(3),
            ),
            Geometry::Icosahedron { radius, detail } => {
                icosahedron(*radius, (*detail).min(5))
            }
            Geometry::Custom { mesh, .. } => mesh.as_ref().clone(),
        }
    }

    /// Flat-shaded mesh from a triangle soup, three positions per face.
    /// A trailing partial triangle is ignored.
    #[must_use]
    pub fn from_triangles(positions: &[Vec3]) -> Self {
        let mut mesh = Self::default();
        for tri in positions.chunks_exact(3) {
            let normal = (tri[1] - tri[0]).cross(tri[2] - tri[0]);
            let base = mesh.vertices.len() as u32;
            mesh.vertices.extend([
                MeshVertex::new(tri[0], normal, Vec2::ZERO),
                MeshVertex::new(tri[1], normal, Vec2::X),
                MeshVertex::new(tri[2], normal, Vec2::Y),
            ]);
            mesh.indices.extend([base, base + 1, base + 2]);
        }
        mesh
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Unique undirected triangle edges as a line list, for wireframe
    /// drawing.
    #[must_use]
    pub fn edges(&self) -> Vec<u32> {
        let mut seen = FxHashSet::default();
        let mut lines = Vec::with_capacity(self.indices.len() * 2);
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                if a != b && seen.insert((a.min(b), a.max(b))) {
                    lines.extend([a, b]);
                }
            }
        }
        lines
    }

    fn push_grid(&mut self, columns: u32, rows: u32, base: u32) {
        let stride = columns + 1;
        for y in 0..rows {
            for x in 0..columns {
                let a = base + y * stride + x;
                let b = a + stride;
                self.indices.extend([a, b, a + 1, b, b + 1, a + 1]);
            }
        }
    }
}

fn cuboid(size: Vec3) -> MeshData {
    let h = size * 0.5;
    // (normal, u axis, v axis)
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    let mut mesh = MeshData::default();
    for (normal, u, v) in faces {
        let base = mesh.vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let p = (normal + u * su + v * sv) * h;
            mesh.vertices.push(MeshVertex::new(
                p,
                normal,
                Vec2::new((su + 1.0) * 0.5, (1.0 - sv) * 0.5),
            ));
        }
        mesh.indices
            .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    for y in 0..=height_segments {
        let v = y as f32 / height_segments as f32;
        let theta = v * PI;
        for x in 0..=width_segments {
            let u = x as f32 / width_segments as f32;
            let phi = u * TAU;
            let n = Vec3::new(
                -phi.cos() * theta.sin(),
                theta.cos(),
                phi.sin() * theta.sin(),
            );
            mesh.vertices
                .push(MeshVertex::new(n * radius, n, Vec2::new(u, v)));
        }
    }
    mesh.push_grid(width_segments, height_segments, 0);
    mesh
}

fn plane(width: f32, height: f32, segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    for y in 0..=segments {
        let v = y as f32 / segments as f32;
        for x in 0..=segments {
            let u = x as f32 / segments as f32;
            let p = Vec3::new((u - 0.5) * width, (0.5 - v) * height, 0.0);
            mesh.vertices.push(MeshVertex::new(p, Vec3::Z, Vec2::new(u, v)));
        }
    }
    mesh.push_grid(segments, segments, 0);
    mesh
}

fn torus(radius: f32, tube: f32, radial: u32, tubular: u32) -> MeshData {
    let mut mesh = MeshData::default();
    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            let p = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            mesh.vertices.push(MeshVertex::new(
                p,
                p - center,
                Vec2::new(i as f32 / tubular as f32, j as f32 / radial as f32),
            ));
        }
    }
    mesh.push_grid(tubular, radial, 0);
    mesh
}

fn knot_curve(u: f32, p: f32, q: f32, radius: f32) -> Vec3 {
    let qu = q / p * u;
    let cs = qu.cos();
    Vec3::new(
        radius * (2.0 + cs) * 0.5 * u.cos(),
        radius * (2.0 + cs) * 0.5 * u.sin(),
        radius * qu.sin() * 0.5,
    )
}

fn torus_knot(
    radius: f32,
    tube: f32,
    tubular: u32,
    radial: u32,
    p: u32,
    q: u32,
) -> MeshData {
    let (pf, qf) = (p as f32, q as f32);
    let mut mesh = MeshData::default();
    for i in 0..=tubular {
        let u = i as f32 / tubular as f32 * pf * TAU;
        let p1 = knot_curve(u, pf, qf, radius);
        let p2 = knot_curve(u + 0.01, pf, qf, radius);
        let t = p2 - p1;
        let b = t.cross(p2 + p1).normalize_or_zero();
        let n = b.cross(t).normalize_or_zero();
        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let (cx, cy) = (-tube * v.cos(), tube * v.sin());
            let pos = p1 + n * cx + b * cy;
            mesh.vertices.push(MeshVertex::new(
                pos,
                pos - p1,
                Vec2::new(i as f32 / tubular as f32, j as f32 / radial as f32),
            ));
        }
    }
    mesh.push_grid(radial, tubular, 0);
    mesh
}

fn cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial: u32,
) -> MeshData {
    let mut mesh = MeshData::default();
    let half = height * 0.5;
    let slope = if height > 0.0 {
        (radius_bottom - radius_top) / height
    } else {
        0.0
    };
    for (row, (r, y)) in [(radius_top, half), (radius_bottom, -half)]
        .into_iter()
        .enumerate()
    {
        for x in 0..=radial {
            let u = x as f32 / radial as f32;
            let theta = u * TAU;
            let (sin, cos) = theta.sin_cos();
            mesh.vertices.push(MeshVertex::new(
                Vec3::new(r * sin, y, r * cos),
                Vec3::new(sin, slope, cos),
                Vec2::new(u, row as f32),
            ));
        }
    }
    mesh.push_grid(radial, 1, 0);

    for (r, y, normal) in [(radius_top, half, Vec3::Y), (radius_bottom, -half, Vec3::NEG_Y)] {
        if r <= 0.0 {
            continue;
        }
        let center = mesh.vertices.len() as u32;
        mesh.vertices.push(MeshVertex::new(
            Vec3::new(0.0, y, 0.0),
            normal,
            Vec2::splat(0.5),
        ));
        for x in 0..=radial {
            let theta = x as f32 / radial as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            mesh.vertices.push(MeshVertex::new(
                Vec3::new(r * sin, y, r * cos),
                normal,
                Vec2::new(sin * 0.5 + 0.5, cos * 0.5 + 0.5),
            ));
        }
        for x in 0..radial {
            let a = center + 1 + x;
            if normal.y > 0.0 {
                mesh.indices.extend([center, a, a + 1]);
            } else {
                mesh.indices.extend([center, a + 1, a]);
            }
        }
    }
    mesh
}

fn icosahedron(radius: f32, detail: u32) -> MeshData {
    let t = (1.0 + 5.0_f32.sqrt()) * 0.5;
    let mut points: Vec<Vec3> = [
        (-1.0, t, 0.0),
        (1.0, t, 0.0),
        (-1.0, -t, 0.0),
        (1.0, -t, 0.0),
        (0.0, -1.0, t),
        (0.0, 1.0, t),
        (0.0, -1.0, -t),
        (0.0, 1.0, -t),
        (t, 0.0, -1.0),
        (t, 0.0, 1.0),
        (-t, 0.0, -1.0),
        (-t, 0.0, 1.0),
    ]
    .into_iter()
    .map(|(x, y, z)| Vec3::new(x, y, z).normalize())
    .collect();
    let mut faces: Vec<[u32; 3]> = vec![
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    for _ in 0..detail {
        let mut midpoints: FxHashMap<(u32, u32), u32> = FxHashMap::default();
        let mut midpoint = |a: u32, b: u32, points: &mut Vec<Vec3>| -> u32 {
            *midpoints.entry((a.min(b), a.max(b))).or_insert_with(|| {
                let m = ((points[a as usize] + points[b as usize]) * 0.5).normalize();
                points.push(m);
                points.len() as u32 - 1
            })
        };
        let mut next = Vec::with_capacity(faces.len() * 4);
        for [a, b, c] in faces {
            let ab = midpoint(a, b, &mut points);
            let bc = midpoint(b, c, &mut points);
            let ca = midpoint(c, a, &mut points);
            next.extend([[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]);
        }
        faces = next;
    }

    let vertices = points
        .iter()
        .map(|&n| {
            let uv = Vec2::new(
                n.z.atan2(n.x) / TAU + 0.5,
                n.y.clamp(-1.0, 1.0).acos() / PI,
            );
            MeshVertex::new(n * radius, n, uv)
        })
        .collect();
    MeshData {
        vertices,
        indices: faces.into_iter().flatten().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(mesh: &MeshData) {
        assert!(!mesh.indices.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
        for v in &mesh.vertices {
            let len = Vec3::from_array(v.normal).length();
            assert!((len - 1.0).abs() < 1e-3 || len == 0.0, "normal length {len}");
        }
    }

    #[test]
    fn cube_has_six_quads() {
        let mesh = MeshData::generate(&Geometry::cube(2.0));
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert_well_formed(&mesh);
        assert!(mesh
            .vertices
            .iter()
            .all(|v| v.position.iter().all(|c| c.abs() <= 1.0 + 1e-6)));
    }

    #[test]
    fn cube_faces_wind_outward() {
        let mesh = MeshData::generate(&Geometry::cube(1.0));
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]]
                .map(|i| Vec3::from_array(mesh.vertices[i as usize].position));
            let face_normal = (b - a).cross(c - a);
            let stored = Vec3::from_array(mesh.vertices[tri[0] as usize].normal);
            assert!(face_normal.dot(stored) > 0.0);
        }
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let mesh = MeshData::generate(&Geometry::Sphere {
            radius: 2.0,
            width_segments: 16,
            height_segments: 8,
        });
        assert_eq!(mesh.vertices.len(), 17 * 9);
        assert_well_formed(&mesh);
        for v in &mesh.vertices {
            assert!((Vec3::from_array(v.position).length() - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn every_shape_is_well_formed() {
        let shapes = [
            Geometry::plane(2.0, 1.0),
            Geometry::Torus {
                radius: 1.0,
                tube: 0.3,
                radial_segments: 12,
                tubular_segments: 24,
            },
            Geometry::TorusKnot {
                radius: 1.0,
                tube: 0.3,
                tubular_segments: 64,
                radial_segments: 8,
                p: 2,
                q: 3,
            },
            Geometry::Cylinder {
                radius_top: 1.0,
                radius_bottom: 1.0,
                height: 2.0,
                radial_segments: 16,
            },
            Geometry::Cylinder {
                radius_top: 0.0,
                radius_bottom: 1.0,
                height: 2.0,
                radial_segments: 16,
            },
            Geometry::Icosahedron {
                radius: 1.0,
                detail: 2,
            },
        ];
        for shape in &shapes {
            assert_well_formed(&MeshData::generate(shape));
        }
    }

    #[test]
    fn degenerate_segment_counts_are_clamped() {
        let mesh = MeshData::generate(&Geometry::Sphere {
            radius: 1.0,
            width_segments: 0,
            height_segments: 0,
        });
        assert_well_formed(&mesh);
    }

    #[test]
    fn icosahedron_subdivision_quadruples_faces() {
        let base = MeshData::generate(&Geometry::Icosahedron {
            radius: 1.0,
            detail: 0,
        });
        assert_eq!(base.triangle_count(), 20);
        assert_eq!(base.vertices.len(), 12);
        let fine = MeshData::generate(&Geometry::Icosahedron {
            radius: 1.0,
            detail: 1,
        });
        assert_eq!(fine.triangle_count(), 80);
        assert_eq!(fine.vertices.len(), 42);
    }

    #[test]
    fn triangle_soup_gets_face_normals() {
        let mesh = MeshData::from_triangles(&[
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
            Vec3::ZERO,
            Vec3::Z,
            Vec3::X,
            Vec3::ONE,
        ]);
        assert_well_formed(&mesh);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(mesh.vertices[3].normal, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn edges_are_unique() {
        let mesh = MeshData::generate(&Geometry::cube(1.0));
        let edges = mesh.edges();
        // faces don't share vertices: 4 sides + 1 diagonal each
        assert_eq!(edges.len() / 2, 30);
    }
}
