use std::collections::HashMap;

use glam::Vec3;

use crate::world_core::config::WorldConfig;
use crate::world_core::error::{Result, WorldGenError};
use crate::world_core::layer::Layer;

/// Upper bound on subdivision passes; keeps vertex indices within `u32`.
pub const MAX_SUBDIVISIONS: u32 = 10;

const ICOSAHEDRON_FACES: [[u32; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// Vertex positions on a sphere of `radius` plus the triangle index list.
#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
    pub radius: f32,
}

impl SphereMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

/// Vertex and triangle counts after `k` subdivisions: `(10·4^k + 2, 20·4^k)`.
pub fn expected_counts(subdivisions: u32) -> (usize, usize) {
    let scale = 4usize.pow(subdivisions);
    (10 * scale + 2, 20 * scale)
}

pub fn build_icosphere(subdivisions: u32, radius: f32) -> Result<SphereMesh> {
    if subdivisions > MAX_SUBDIVISIONS {
        return Err(WorldGenError::invalid(format!(
            "subdivisions must be at most {MAX_SUBDIVISIONS}, got {subdivisions}"
        )));
    }
    if !radius.is_finite() || radius <= 0.0 {
        return Err(WorldGenError::invalid(format!(
            "radius must be a positive finite number, got {radius}"
        )));
    }

    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let mut vertices: Vec<Vec3> = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
    .iter()
    .map(|v| v.normalize() * radius)
    .collect();

    let mut triangles = ICOSAHEDRON_FACES.to_vec();
    for _ in 0..subdivisions {
        triangles = subdivide(&mut vertices, &triangles, radius);
    }

    let (expected_vertices, expected_triangles) = expected_counts(subdivisions);
    debug_assert_eq!(vertices.len(), expected_vertices);
    debug_assert_eq!(triangles.len(), expected_triangles);

    Ok(SphereMesh {
        vertices,
        triangles,
        radius,
    })
}

/// Splits every triangle into three corner triangles and one center triangle.
/// Midpoints are shared through a cache keyed on the `(min, max)` edge, so both
/// faces on an edge reuse the same vertex.
fn subdivide(vertices: &mut Vec<Vec3>, triangles: &[[u32; 3]], radius: f32) -> Vec<[u32; 3]> {
    let mut midpoint_cache: HashMap<(u32, u32), u32> =
        HashMap::with_capacity(triangles.len() * 3 / 2);
    let mut next = Vec::with_capacity(triangles.len() * 4);

    for &[v1, v2, v3] in triangles {
        let a = midpoint(vertices, &mut midpoint_cache, v1, v2, radius);
        let b = midpoint(vertices, &mut midpoint_cache, v2, v3, radius);
        let c = midpoint(vertices, &mut midpoint_cache, v3, v1, radius);

        next.push([v1, a, c]);
        next.push([v2, b, a]);
        next.push([v3, c, b]);
        next.push([a, b, c]);
    }

    next
}

fn midpoint(
    vertices: &mut Vec<Vec3>,
    cache: &mut HashMap<(u32, u32), u32>,
    a: u32,
    b: u32,
    radius: f32,
) -> u32 {
    let key = if a < b { (a, b) } else { (b, a) };
    if let Some(&idx) = cache.get(&key) {
        return idx;
    }

    let mid = (vertices[a as usize] + vertices[b as usize]) * 0.5;
    let idx = vertices.len() as u32;
    vertices.push(mid.normalize() * radius);
    cache.insert(key, idx);
    idx
}

pub struct SphereLayer;

impl Layer<&WorldConfig, Result<SphereMesh>> for SphereLayer {
    fn generate(&self, config: &WorldConfig) -> Result<SphereMesh> {
        let mesh = build_icosphere(config.subdivisions, config.radius)?;
        log::debug!(
            "sphere: {} vertices, {} triangles (k={}, r={})",
            mesh.vertex_count(),
            mesh.triangle_count(),
            config.subdivisions,
            config.radius
        );
        Ok(mesh)
    }
}
