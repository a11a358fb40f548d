use crate::world_core::error::{Result, WorldGenError};
use crate::world_core::layer::Layer;
use crate::world_core::sphere::SphereMesh;

/// Vertex → triangle-adjacent vertices, built once from the triangle list.
///
/// Each neighbor list is sorted ascending and never contains the vertex itself,
/// so iteration order is stable across runs.
#[derive(Debug, Clone)]
pub struct AdjacencyIndex {
    neighbors: Vec<Vec<u32>>,
}

impl AdjacencyIndex {
    pub fn build(vertex_count: usize, triangles: &[[u32; 3]]) -> Result<Self> {
        if triangles.is_empty() {
            return Err(WorldGenError::EmptyTopology);
        }

        let mut neighbors: Vec<Vec<u32>> = vec![Vec::with_capacity(6); vertex_count];
        for tri in triangles {
            for &idx in tri {
                if idx as usize >= vertex_count {
                    return Err(WorldGenError::VertexOutOfRange {
                        index: idx as usize,
                        vertex_count,
                    });
                }
            }
            let [a, b, c] = *tri;
            for (from, to) in [(a, b), (a, c), (b, a), (b, c), (c, a), (c, b)] {
                if from != to {
                    neighbors[from as usize].push(to);
                }
            }
        }

        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }

        Ok(Self { neighbors })
    }

    pub fn neighbors(&self, vertex: usize) -> &[u32] {
        &self.neighbors[vertex]
    }

    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        self.neighbors[a].binary_search(&(b as u32)).is_ok()
    }
}

pub struct AdjacencyLayer;

impl Layer<&SphereMesh, Result<AdjacencyIndex>> for AdjacencyLayer {
    fn generate(&self, mesh: &SphereMesh) -> Result<AdjacencyIndex> {
        let index = AdjacencyIndex::build(mesh.vertex_count(), &mesh.triangles)?;
        log::debug!("adjacency: indexed {} vertices", index.vertex_count());
        Ok(index)
    }
}
