use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::world_core::adjacency::AdjacencyIndex;
use crate::world_core::biome_map::VertexTerrainMap;
use crate::world_core::config::CountryConfig;
use crate::world_core::layer::Layer;

const COUNTRY_SEED_SALT: u32 = 2203;

/// Sentinel used by serialized output for vertices that belong to no country.
pub const NO_COUNTRY: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub id: u32,
    /// Member vertices in the order the flood fill settled them; the seed is first.
    pub vertices: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryMap {
    assignment: Vec<Option<u32>>,
    countries: Vec<Country>,
}

impl CountryMap {
    pub fn country_of(&self, vertex: usize) -> Option<u32> {
        self.assignment[vertex]
    }

    /// Country id with [`NO_COUNTRY`] for water and unreached land.
    pub fn country_id(&self, vertex: usize) -> i32 {
        self.assignment[vertex].map_or(NO_COUNTRY, |id| id as i32)
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn country(&self, id: u32) -> Option<&Country> {
        self.countries.get(id as usize)
    }

    /// Includes countries left empty because land ran out of seeds.
    pub fn count(&self) -> usize {
        self.countries.len()
    }

    pub fn assigned_count(&self) -> usize {
        self.assignment.iter().filter(|a| a.is_some()).count()
    }

    fn pad_to(&mut self, count: usize) {
        for id in self.countries.len()..count {
            self.countries.push(Country {
                id: id as u32,
                vertices: Vec::new(),
            });
        }
    }
}

/// `clamp(max(min_land_masses, land / land_per_mass) * countries_per_mass, min, max)`.
pub fn target_country_count(land_count: usize, config: &CountryConfig) -> usize {
    let land_masses = (land_count / config.land_per_mass).max(config.min_land_masses);
    (land_masses * config.countries_per_mass).clamp(config.min_countries, config.max_countries)
}

/// Picks distinct random land seeds and floods the land graph from them. The
/// map always holds the target number of countries; when there are fewer land
/// vertices than that, the trailing countries stay empty.
pub fn partition_countries<R: Rng + ?Sized>(
    terrain: &VertexTerrainMap,
    adjacency: &AdjacencyIndex,
    config: &CountryConfig,
    rng: &mut R,
) -> CountryMap {
    let land = terrain.land_vertices();
    let target = target_country_count(land.len(), config);
    let amount = target.min(land.len());
    if amount < target {
        log::debug!("countries: only {} land vertices for {target} countries", land.len());
    }

    let seeds: Vec<usize> = rand::seq::index::sample(rng, land.len(), amount)
        .into_iter()
        .map(|i| land[i])
        .collect();
    let mut map = partition_from_seeds(terrain, adjacency, &seeds);
    map.pad_to(target);
    map
}

/// Multi-source breadth-first fill over land. Water and repeated seeds are
/// dropped first; the `i`th remaining seed roots country `i`. A vertex joins
/// whichever frontier reaches it first, and ties at equal depth go to the
/// earlier seed. Water is never entered.
pub fn partition_from_seeds(
    terrain: &VertexTerrainMap,
    adjacency: &AdjacencyIndex,
    seeds: &[usize],
) -> CountryMap {
    let mut claimed: Vec<Option<u32>> = vec![None; terrain.len()];
    let mut frontier = VecDeque::with_capacity(seeds.len());
    for &seed in seeds {
        if !terrain.get(seed).is_land() || claimed[seed].is_some() {
            log::warn!("countries: skipping unusable seed {seed}");
            continue;
        }
        claimed[seed] = Some(frontier.len() as u32);
        frontier.push_back(seed);
    }

    let mut assignment: Vec<Option<u32>> = vec![None; terrain.len()];
    let mut countries: Vec<Country> = (0..frontier.len() as u32)
        .map(|id| Country {
            id,
            vertices: Vec::new(),
        })
        .collect();

    while let Some(vertex) = frontier.pop_front() {
        let Some(id) = claimed[vertex] else {
            continue;
        };
        assignment[vertex] = Some(id);
        countries[id as usize].vertices.push(vertex);

        for &neighbor in adjacency.neighbors(vertex) {
            let neighbor = neighbor as usize;
            if claimed[neighbor].is_none() && terrain.get(neighbor).is_land() {
                claimed[neighbor] = Some(id);
                frontier.push_back(neighbor);
            }
        }
    }

    let map = CountryMap {
        assignment,
        countries,
    };
    log::debug!(
        "countries: {} countries over {} vertices",
        map.count(),
        map.assigned_count()
    );
    map
}

pub struct CountryInput<'a> {
    pub terrain: &'a VertexTerrainMap,
    pub adjacency: &'a AdjacencyIndex,
}

pub struct CountryLayer {
    seed: u32,
    config: CountryConfig,
}

impl CountryLayer {
    pub fn new(seed: u32, config: CountryConfig) -> Self {
        Self { seed, config }
    }
}

impl<'a> Layer<CountryInput<'a>, CountryMap> for CountryLayer {
    fn generate(&self, input: CountryInput<'a>) -> CountryMap {
        let mut rng = StdRng::seed_from_u64(u64::from(self.seed.wrapping_add(COUNTRY_SEED_SALT)));
        partition_countries(input.terrain, input.adjacency, &self.config, &mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_core::sphere::build_icosphere;
    use crate::world_core::terrain::TerrainType;

    fn adjacency(k: u32) -> AdjacencyIndex {
        let mesh = build_icosphere(k, 1.0).unwrap();
        AdjacencyIndex::build(mesh.vertex_count(), &mesh.triangles).unwrap()
    }

    fn striped_terrain(n: usize) -> VertexTerrainMap {
        VertexTerrainMap::new(
            (0..n)
                .map(|v| {
                    if v % 5 == 0 {
                        TerrainType::Water
                    } else {
                        TerrainType::Plains
                    }
                })
                .collect(),
        )
    }

    #[test]
    fn target_count_is_clamped() {
        let config = CountryConfig::default();
        assert_eq!(target_country_count(0, &config), 15);
        assert_eq!(target_country_count(33, &config), 15);
        assert_eq!(target_country_count(599, &config), 15);
        assert_eq!(target_country_count(700, &config), 21);
        assert_eq!(target_country_count(5000, &config), 30);
    }

    #[test]
    fn water_never_joins_a_country() {
        let adjacency = adjacency(3);
        let terrain = striped_terrain(adjacency.vertex_count());
        let mut rng = StdRng::seed_from_u64(1);
        let map = partition_countries(&terrain, &adjacency, &CountryConfig::default(), &mut rng);

        for v in 0..terrain.len() {
            if terrain.get(v) == TerrainType::Water {
                assert_eq!(map.country_id(v), NO_COUNTRY);
                assert_eq!(map.country_of(v), None);
            }
        }
    }

    #[test]
    fn all_land_sphere_is_fully_partitioned() {
        let adjacency = adjacency(3);
        let terrain = VertexTerrainMap::new(vec![TerrainType::Plains; adjacency.vertex_count()]);
        let config = CountryConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let map = partition_countries(&terrain, &adjacency, &config, &mut rng);

        assert_eq!(map.count(), target_country_count(terrain.len(), &config));
        assert_eq!(map.assigned_count(), terrain.len());
        let members: usize = map.countries().iter().map(|c| c.vertices.len()).sum();
        assert_eq!(members, terrain.len());
        for country in map.countries() {
            assert!(!country.vertices.is_empty());
        }
    }

    #[test]
    fn every_country_is_connected() {
        let adjacency = adjacency(3);
        let terrain = striped_terrain(adjacency.vertex_count());
        let mut rng = StdRng::seed_from_u64(3);
        let map = partition_countries(&terrain, &adjacency, &CountryConfig::default(), &mut rng);

        for country in map.countries() {
            let Some(&seed) = country.vertices.first() else {
                continue;
            };
            let mut seen = vec![false; terrain.len()];
            let mut queue = VecDeque::from([seed]);
            seen[seed] = true;
            let mut reached = 0;
            while let Some(v) = queue.pop_front() {
                reached += 1;
                for &n in adjacency.neighbors(v) {
                    let n = n as usize;
                    if !seen[n] && map.country_of(n) == Some(country.id) {
                        seen[n] = true;
                        queue.push_back(n);
                    }
                }
            }
            assert_eq!(reached, country.vertices.len(), "country {}", country.id);
        }
    }

    #[test]
    fn scarce_land_still_yields_the_target_count() {
        let adjacency = adjacency(1);
        let mut values = vec![TerrainType::Water; adjacency.vertex_count()];
        values[0] = TerrainType::Plains;
        values[3] = TerrainType::Cold;
        values[20] = TerrainType::City;
        let terrain = VertexTerrainMap::new(values);
        let mut rng = StdRng::seed_from_u64(4);
        let map = partition_countries(&terrain, &adjacency, &CountryConfig::default(), &mut rng);

        assert_eq!(map.count(), 15);
        let mut ids: Vec<u32> = [0, 3, 20].iter().filter_map(|&v| map.country_of(v)).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2]);
        for country in &map.countries()[3..] {
            assert!(country.vertices.is_empty());
        }
    }

    #[test]
    fn unusable_seeds_do_not_leave_id_gaps() {
        let adjacency = adjacency(0);
        let terrain = striped_terrain(adjacency.vertex_count());
        assert_eq!(terrain.get(0), TerrainType::Water);

        let map = partition_from_seeds(&terrain, &adjacency, &[0, 1, 1, 7]);
        assert_eq!(map.count(), 2);
        assert_eq!(map.country(0).unwrap().vertices[0], 1);
        assert_eq!(map.country(1).unwrap().vertices[0], 7);
        assert_eq!(map.country_of(1), Some(0));
        assert_eq!(map.country_of(7), Some(1));
    }

    #[test]
    fn unseeded_land_component_stays_unassigned() {
        let adjacency = adjacency(2);
        let mut values = vec![TerrainType::Plains; adjacency.vertex_count()];
        let island = 0;
        for &n in adjacency.neighbors(island) {
            values[n as usize] = TerrainType::Water;
        }
        let terrain = VertexTerrainMap::new(values);
        let mainland = (1..terrain.len())
            .find(|&v| terrain.get(v).is_land())
            .unwrap();

        let map = partition_from_seeds(&terrain, &adjacency, &[mainland]);
        assert_eq!(map.country_id(island), NO_COUNTRY);
        assert_eq!(map.country_of(mainland), Some(0));
    }

    #[test]
    fn ties_go_to_the_earlier_seed() {
        let adjacency = adjacency(0);
        let terrain = VertexTerrainMap::new(vec![TerrainType::Plains; adjacency.vertex_count()]);
        let shared = 1;
        assert!(adjacency.are_adjacent(0, shared) && adjacency.are_adjacent(5, shared));

        let first = partition_from_seeds(&terrain, &adjacency, &[0, 5]);
        assert_eq!(first.country_of(shared), first.country_of(0));

        let swapped = partition_from_seeds(&terrain, &adjacency, &[5, 0]);
        assert_eq!(swapped.country_of(shared), swapped.country_of(5));
    }

    #[test]
    fn layer_is_deterministic_for_a_seed() {
        let adjacency = adjacency(3);
        let terrain = striped_terrain(adjacency.vertex_count());
        let layer = CountryLayer::new(9, CountryConfig::default());
        let input = || CountryInput {
            terrain: &terrain,
            adjacency: &adjacency,
        };
        assert_eq!(layer.generate(input()), layer.generate(input()));
    }
}
