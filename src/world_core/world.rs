use glam::Vec3;

use crate::world_core::adjacency::{AdjacencyIndex, AdjacencyLayer};
use crate::world_core::batches::{BatchInput, BatchLayer, TerrainBatches};
use crate::world_core::biome_map::{BiomeInput, BiomeLayer, VertexTerrainMap};
use crate::world_core::config::GameConfig;
use crate::world_core::country::{Country, CountryInput, CountryLayer, CountryMap};
use crate::world_core::error::Result;
use crate::world_core::layer::Layer;
use crate::world_core::sphere::{SphereLayer, SphereMesh};
use crate::world_core::terrain::TerrainType;

/// A fully generated planet. Built once by [`WorldGenerator::generate`] and
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct WorldGraph {
    seed: u32,
    mesh: SphereMesh,
    adjacency: AdjacencyIndex,
    terrain: VertexTerrainMap,
    countries: CountryMap,
    batches: TerrainBatches,
}

impl WorldGraph {
    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn radius(&self) -> f32 {
        self.mesh.radius
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.mesh.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.mesh.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    pub fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    pub fn terrain(&self) -> &VertexTerrainMap {
        &self.terrain
    }

    pub fn terrain_at(&self, vertex: usize) -> TerrainType {
        self.terrain.get(vertex)
    }

    pub fn countries(&self) -> &CountryMap {
        &self.countries
    }

    pub fn country(&self, id: u32) -> Option<&Country> {
        self.countries.country(id)
    }

    /// Country of `vertex`, `-1` for water and unreached land.
    pub fn country_id(&self, vertex: usize) -> i32 {
        self.countries.country_id(vertex)
    }

    pub fn country_count(&self) -> usize {
        self.countries.count()
    }

    pub fn batches(&self) -> &TerrainBatches {
        &self.batches
    }

    pub fn batch_indices(&self, terrain: TerrainType) -> Vec<u32> {
        self.batches.indices(terrain, &self.mesh.triangles)
    }

    pub fn terrain_color(&self, terrain: TerrainType) -> [f32; 3] {
        terrain.color()
    }

    pub fn terrain_histogram(&self) -> [usize; TerrainType::COUNT] {
        self.terrain.histogram()
    }
}

pub struct WorldGenerator {
    config: GameConfig,
    sphere_layer: SphereLayer,
    adjacency_layer: AdjacencyLayer,
    biome_layer: BiomeLayer,
    country_layer: CountryLayer,
    batch_layer: BatchLayer,
}

impl WorldGenerator {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.world.seed;
        Ok(Self {
            sphere_layer: SphereLayer,
            adjacency_layer: AdjacencyLayer,
            biome_layer: BiomeLayer::new(seed, config.biome.clone()),
            country_layer: CountryLayer::new(seed, config.countries.clone()),
            batch_layer: BatchLayer,
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn generate(&self) -> Result<WorldGraph> {
        let mesh = self.sphere_layer.generate(&self.config.world)?;
        let adjacency = self.adjacency_layer.generate(&mesh)?;
        let terrain = self.biome_layer.generate(BiomeInput {
            mesh: &mesh,
            adjacency: &adjacency,
        });
        let countries = self.country_layer.generate(CountryInput {
            terrain: &terrain,
            adjacency: &adjacency,
        });
        let batches = self.batch_layer.generate(BatchInput {
            terrain: &terrain,
            triangles: &mesh.triangles,
        });

        log::info!(
            "generated world (seed {}): {} vertices, {} triangles, {} land, {} countries",
            self.config.world.seed,
            mesh.vertex_count(),
            mesh.triangle_count(),
            terrain.land_vertices().len(),
            countries.count()
        );

        Ok(WorldGraph {
            seed: self.config.world.seed,
            mesh,
            adjacency,
            terrain,
            countries,
            batches,
        })
    }
}
