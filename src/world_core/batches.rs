use crate::world_core::biome_map::VertexTerrainMap;
use crate::world_core::layer::Layer;
use crate::world_core::terrain::TerrainType;

/// Majority/plurality vote over a triangle's corners. Ties go to the variant
/// declared first in [`TerrainType`].
pub fn dominant_terrain(corners: [TerrainType; 3]) -> TerrainType {
    let mut counts = [0u8; TerrainType::COUNT];
    for t in corners {
        counts[t.index()] += 1;
    }

    let mut dominant = TerrainType::Water;
    let mut best = 0;
    for t in TerrainType::ALL {
        if counts[t.index()] > best {
            best = counts[t.index()];
            dominant = t;
        }
    }
    dominant
}

/// Triangle indices grouped by dominant terrain, each group in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainBatches {
    triangle_terrain: Vec<TerrainType>,
    groups: [Vec<usize>; TerrainType::COUNT],
}

impl TerrainBatches {
    pub fn classify(terrain: &VertexTerrainMap, triangles: &[[u32; 3]]) -> Self {
        let triangle_terrain: Vec<TerrainType> = par_map_collect!(0..triangles.len(), |i| {
            let [a, b, c] = triangles[i];
            dominant_terrain([
                terrain.get(a as usize),
                terrain.get(b as usize),
                terrain.get(c as usize),
            ])
        });

        let mut groups: [Vec<usize>; TerrainType::COUNT] = std::array::from_fn(|_| Vec::new());
        for (i, t) in triangle_terrain.iter().enumerate() {
            groups[t.index()].push(i);
        }

        Self {
            triangle_terrain,
            groups,
        }
    }

    pub fn triangles_of(&self, terrain: TerrainType) -> &[usize] {
        &self.groups[terrain.index()]
    }

    pub fn terrain_of_triangle(&self, triangle: usize) -> TerrainType {
        self.triangle_terrain[triangle]
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_terrain.len()
    }

    /// Groups with at least one triangle, in declaration order. One submesh each.
    pub fn non_empty(&self) -> impl Iterator<Item = (TerrainType, &[usize])> + '_ {
        TerrainType::ALL
            .into_iter()
            .map(|t| (t, self.triangles_of(t)))
            .filter(|(_, tris)| !tris.is_empty())
    }

    /// Flattened vertex-index buffer for one terrain submesh.
    pub fn indices(&self, terrain: TerrainType, triangles: &[[u32; 3]]) -> Vec<u32> {
        self.triangles_of(terrain)
            .iter()
            .flat_map(|&i| triangles[i])
            .collect()
    }
}

pub struct BatchInput<'a> {
    pub terrain: &'a VertexTerrainMap,
    pub triangles: &'a [[u32; 3]],
}

pub struct BatchLayer;

impl<'a> Layer<BatchInput<'a>, TerrainBatches> for BatchLayer {
    fn generate(&self, input: BatchInput<'a>) -> TerrainBatches {
        let batches = TerrainBatches::classify(input.terrain, input.triangles);
        log::debug!(
            "batches: {} submeshes over {} triangles",
            batches.non_empty().count(),
            batches.triangle_count()
        );
        batches
    }
}
