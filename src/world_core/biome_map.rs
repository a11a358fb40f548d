use glam::Vec3;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::world_core::adjacency::AdjacencyIndex;
use crate::world_core::config::BiomeConfig;
use crate::world_core::expansion::{expand_biome, expand_snow, GrowthLaw};
use crate::world_core::layer::Layer;
use crate::world_core::sphere::SphereMesh;
use crate::world_core::terrain::TerrainType;

const BIOME_SEED_SALT: u32 = 1301;

/// Terrain label per vertex; total over the sphere and frozen once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexTerrainMap {
    values: Vec<TerrainType>,
}

impl VertexTerrainMap {
    pub fn new(values: Vec<TerrainType>) -> Self {
        Self { values }
    }

    pub fn get(&self, vertex: usize) -> TerrainType {
        self.values[vertex]
    }

    pub fn as_slice(&self) -> &[TerrainType] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn land_vertices(&self) -> Vec<usize> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_land())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn histogram(&self) -> [usize; TerrainType::COUNT] {
        let mut counts = [0; TerrainType::COUNT];
        for t in &self.values {
            counts[t.index()] += 1;
        }
        counts
    }
}

pub struct BiomeInput<'a> {
    pub mesh: &'a SphereMesh,
    pub adjacency: &'a AdjacencyIndex,
}

pub struct BiomeLayer {
    seed: u32,
    config: BiomeConfig,
}

impl BiomeLayer {
    pub fn new(seed: u32, config: BiomeConfig) -> Self {
        Self { seed, config }
    }
}

impl<'a> Layer<BiomeInput<'a>, VertexTerrainMap> for BiomeLayer {
    fn generate(&self, input: BiomeInput<'a>) -> VertexTerrainMap {
        let rng = StdRng::seed_from_u64(u64::from(self.seed.wrapping_add(BIOME_SEED_SALT)));
        assign_biomes(input.mesh, input.adjacency, &self.config, rng)
    }
}

/// Runs every biome pass in order with one random source.
pub fn assign_biomes<R: Rng>(
    mesh: &SphereMesh,
    adjacency: &AdjacencyIndex,
    config: &BiomeConfig,
    rng: R,
) -> VertexTerrainMap {
    let mut passes = BiomePasses::new(&mesh.vertices, adjacency, config, rng);

    passes.snow_caps();
    passes.landmasses();
    passes.beaches();
    passes.forests();
    passes.mountain_chains();
    passes.cities();

    let map = VertexTerrainMap::new(passes.terrain);
    log::debug!("biomes: {:?}", map.histogram());
    map
}

/// Vertices within `epsilon` of the highest and of the lowest `y`.
pub fn pole_vertices(vertices: &[Vec3], epsilon: f32) -> (Vec<usize>, Vec<usize>) {
    let max_y = vertices.iter().map(|v| v.y).fold(f32::MIN, f32::max);
    let min_y = vertices.iter().map(|v| v.y).fold(f32::MAX, f32::min);

    let north = (0..vertices.len())
        .filter(|&i| max_y - vertices[i].y <= epsilon)
        .collect();
    let south = (0..vertices.len())
        .filter(|&i| vertices[i].y - min_y <= epsilon)
        .collect();
    (north, south)
}

/// Uniformly picks a vertex currently labeled with one of `types`.
pub fn random_vertex_of<R: Rng + ?Sized>(
    terrain: &[TerrainType],
    types: &[TerrainType],
    rng: &mut R,
) -> Option<usize> {
    let candidates: Vec<usize> = (0..terrain.len())
        .filter(|&i| types.contains(&terrain[i]))
        .collect();
    candidates.choose(rng).copied()
}

struct BiomePasses<'a, R> {
    terrain: Vec<TerrainType>,
    vertices: &'a [Vec3],
    adjacency: &'a AdjacencyIndex,
    config: &'a BiomeConfig,
    law: GrowthLaw,
    rng: R,
}

impl<'a, R: Rng> BiomePasses<'a, R> {
    fn new(
        vertices: &'a [Vec3],
        adjacency: &'a AdjacencyIndex,
        config: &'a BiomeConfig,
        rng: R,
    ) -> Self {
        Self {
            terrain: vec![TerrainType::Water; vertices.len()],
            vertices,
            adjacency,
            config,
            law: GrowthLaw::from(config),
            rng,
        }
    }

    fn chance(&mut self, probability: f32) -> bool {
        self.rng.random::<f32>() < probability
    }

    fn snow_caps(&mut self) {
        let limit = (self.vertices.len() / self.config.snow_budget_divisor) as i64;
        let (north, south) = pole_vertices(self.vertices, self.config.pole_epsilon);

        let mut converted = 0;
        for seed in north.into_iter().chain(south) {
            converted += expand_snow(
                &mut self.terrain,
                self.adjacency,
                &mut self.rng,
                seed,
                1.0,
                limit,
                self.config.snow_decay,
            );
        }
        log::debug!("snow caps: {converted} cold vertices (budget {limit} per seed)");
    }

    fn landmasses(&mut self) {
        let count = self
            .rng
            .random_range(self.config.landmass_count_min..self.config.landmass_count_max);

        for _ in 0..count {
            let Some(seed) = random_vertex_of(&self.terrain, &[TerrainType::Water], &mut self.rng)
            else {
                log::debug!("landmasses: no water left to seed");
                continue;
            };
            let size = self
                .rng
                .random_range(self.config.landmass_size_min..self.config.landmass_size_max);
            let converted = expand_biome(
                &mut self.terrain,
                self.adjacency,
                &mut self.rng,
                seed,
                TerrainType::Plains,
                size,
                &self.law,
            );
            log::trace!("landmass at {seed}: {converted} vertices (target {size})");
        }
    }

    fn beaches(&mut self) {
        for i in 0..self.terrain.len() {
            if matches!(self.terrain[i], TerrainType::Water | TerrainType::Cold) {
                continue;
            }
            let coastal = self
                .adjacency
                .neighbors(i)
                .iter()
                .any(|&n| self.terrain[n as usize] == TerrainType::Water);
            if coastal && self.chance(self.config.beach_chance) {
                self.terrain[i] = TerrainType::Beach;
            }
        }
    }

    /// Growth from a Plains vertex goes through `expand_biome`, which only
    /// claims Water, so a triggered large forest starting on Plains converts
    /// nothing.
    fn forests(&mut self) {
        for i in 0..self.terrain.len() {
            if self.terrain[i] != TerrainType::Plains {
                continue;
            }
            if self.chance(self.config.forest_chance) {
                self.terrain[i] = TerrainType::Forest;
            } else if self.chance(self.config.large_forest_chance) {
                let sizes = self.config.large_forest_size_min..self.config.large_forest_size_max;
                let size = self.rng.random_range(sizes);
                expand_biome(
                    &mut self.terrain,
                    self.adjacency,
                    &mut self.rng,
                    i,
                    TerrainType::Forest,
                    size,
                    &self.law,
                );
            }
        }
    }

    fn mountain_chains(&mut self) {
        let mut chains = 0;
        for i in 0..self.terrain.len() {
            if !self.triggers_chain(i) {
                continue;
            }
            if self.chance(self.config.mountain_chance) && self.carve_mountain_chain().is_some() {
                chains += 1;
            }
        }
        log::debug!("mountain chains: {chains} carved");
    }

    /// Read against the live map, so vertices an earlier chain walked over
    /// are eligible when the scan reaches them.
    fn triggers_chain(&self, vertex: usize) -> bool {
        !matches!(
            self.terrain[vertex],
            TerrainType::Water | TerrainType::Beach | TerrainType::Cold
        )
    }

    /// Walks a random path from a Plains or Forest vertex, marks it Hills and
    /// promotes crowded Hills to Mountain. `None` when no start vertex exists.
    fn carve_mountain_chain(&mut self) -> Option<Vec<usize>> {
        let Some(start) = random_vertex_of(
            &self.terrain,
            &[TerrainType::Plains, TerrainType::Forest],
            &mut self.rng,
        ) else {
            log::debug!("mountain chain: no plains or forest to start from");
            return None;
        };

        let steps = self
            .rng
            .random_range(self.config.chain_length_min..self.config.chain_length_max);
        let mut chain = vec![start];
        for _ in 0..steps {
            let last = chain[chain.len() - 1];
            let candidates: Vec<usize> = self
                .adjacency
                .neighbors(last)
                .iter()
                .map(|&n| n as usize)
                .filter(|n| !chain.contains(n) && self.terrain[*n] != TerrainType::Water)
                .collect();
            let Some(&next) = candidates.choose(&mut self.rng) else {
                break;
            };
            chain.push(next);
        }

        for &v in &chain {
            self.terrain[v] = TerrainType::Hills;
        }
        self.upgrade_hills();
        Some(chain)
    }

    fn upgrade_hills(&mut self) {
        let ratio = self.config.mountain_neighbor_ratio;
        let promoted: Vec<usize> = (0..self.terrain.len())
            .filter(|&v| self.terrain[v] == TerrainType::Hills)
            .filter(|&v| {
                let neighbors = self.adjacency.neighbors(v);
                let raised = neighbors
                    .iter()
                    .filter(|&&n| {
                        matches!(
                            self.terrain[n as usize],
                            TerrainType::Hills | TerrainType::Mountain
                        )
                    })
                    .count();
                !neighbors.is_empty() && raised as f32 / neighbors.len() as f32 >= ratio
            })
            .collect();

        for v in promoted {
            self.terrain[v] = TerrainType::Mountain;
        }
    }

    fn cities(&mut self) {
        let mut cities = 0;
        for i in 0..self.terrain.len() {
            if matches!(
                self.terrain[i],
                TerrainType::Water | TerrainType::Beach | TerrainType::Mountain | TerrainType::Cold
            ) {
                continue;
            }
            if self.chance(self.config.city_chance) {
                self.terrain[i] = TerrainType::City;
                cities += 1;
            }
        }
        log::debug!("cities: {cities} placed");
    }
}
