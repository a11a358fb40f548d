//! Randomized region growth over the vertex graph.
//!
//! Both growth kinds run on an explicit frame stack rather than the call stack.
//! A frame holds the vertex, the budget left on its branch and a cursor into its
//! neighbor list, so neighbors are examined in the same depth-first order (and
//! against the same live terrain state) as a recursive walk would, without
//! risking stack overflow on finely subdivided spheres. Budgets are per branch:
//! each child starts with its parent's remaining budget.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::world_core::adjacency::AdjacencyIndex;
use crate::world_core::config::BiomeConfig;
use crate::world_core::terrain::TerrainType;

/// Probability law for [`expand_biome`]: `clamp(1 - remaining / budget_scale, min, max)`.
#[derive(Debug, Clone, Copy)]
pub struct GrowthLaw {
    pub budget_scale: f32,
    pub min_chance: f32,
    pub max_chance: f32,
}

impl Default for GrowthLaw {
    fn default() -> Self {
        Self {
            budget_scale: 150.0,
            min_chance: 0.5,
            max_chance: 0.9,
        }
    }
}

impl From<&BiomeConfig> for GrowthLaw {
    fn from(config: &BiomeConfig) -> Self {
        Self {
            budget_scale: config.expansion_budget_scale,
            min_chance: config.expansion_chance_min,
            max_chance: config.expansion_chance_max,
        }
    }
}

impl GrowthLaw {
    pub fn chance(&self, remaining: i32) -> f32 {
        (1.0 - remaining as f32 / self.budget_scale).clamp(self.min_chance, self.max_chance)
    }
}

struct SnowFrame {
    vertex: usize,
    probability: f32,
    remaining: i64,
    cursor: usize,
}

/// Relabels `seed` and its surroundings to `Cold`. A visit succeeds while its
/// budget is positive and a uniform draw does not exceed its probability; each
/// hop outward multiplies the probability by `decay`. Neighbors that are
/// already `Cold` are skipped. Returns how many vertices changed label.
pub fn expand_snow<R: Rng + ?Sized>(
    terrain: &mut [TerrainType],
    adjacency: &AdjacencyIndex,
    rng: &mut R,
    seed: usize,
    probability: f32,
    max_tiles: i64,
    decay: f32,
) -> usize {
    let mut converted = 0;
    let mut stack = Vec::new();

    if let Some(frame) = visit_snow(terrain, rng, seed, probability, max_tiles, &mut converted) {
        stack.push(frame);
    }

    while let Some(top) = stack.last_mut() {
        let neighbors = adjacency.neighbors(top.vertex);
        let Some(&next) = neighbors.get(top.cursor) else {
            stack.pop();
            continue;
        };
        top.cursor += 1;

        let next = next as usize;
        if terrain[next] == TerrainType::Cold {
            continue;
        }
        let probability = top.probability * decay;
        let remaining = top.remaining;
        if let Some(frame) = visit_snow(terrain, rng, next, probability, remaining, &mut converted)
        {
            stack.push(frame);
        }
    }

    converted
}

fn visit_snow<R: Rng + ?Sized>(
    terrain: &mut [TerrainType],
    rng: &mut R,
    vertex: usize,
    probability: f32,
    remaining: i64,
    converted: &mut usize,
) -> Option<SnowFrame> {
    if remaining <= 0 || probability < rng.random::<f32>() {
        return None;
    }
    if terrain[vertex] != TerrainType::Cold {
        *converted += 1;
    }
    terrain[vertex] = TerrainType::Cold;
    Some(SnowFrame {
        vertex,
        probability,
        remaining: remaining - 1,
        cursor: 0,
    })
}

struct GrowthFrame {
    remaining: i32,
    neighbors: Vec<u32>,
    cursor: usize,
}

/// Grows `target` over `Water` starting at `seed`.
///
/// A visit stops when the branch budget is spent or the vertex is no longer
/// `Water`; otherwise it converts the vertex, shuffles its neighbors and tries
/// each `Water` neighbor with [`GrowthLaw::chance`] of the remaining budget.
/// A non-`Water` seed converts nothing. Returns how many vertices changed label.
pub fn expand_biome<R: Rng + ?Sized>(
    terrain: &mut [TerrainType],
    adjacency: &AdjacencyIndex,
    rng: &mut R,
    seed: usize,
    target: TerrainType,
    budget: i32,
    law: &GrowthLaw,
) -> usize {
    let mut converted = 0;
    let mut stack = Vec::new();

    if let Some(frame) = visit_growth(terrain, adjacency, rng, seed, target, budget) {
        converted += 1;
        stack.push(frame);
    } else {
        log::trace!("growth from {seed} skipped: {:?} with budget {budget}", terrain[seed]);
    }

    while let Some(top) = stack.last_mut() {
        let Some(&next) = top.neighbors.get(top.cursor) else {
            stack.pop();
            continue;
        };
        top.cursor += 1;

        let next = next as usize;
        if terrain[next] != TerrainType::Water {
            continue;
        }
        let remaining = top.remaining;
        if rng.random::<f32>() < law.chance(remaining) {
            if let Some(frame) = visit_growth(terrain, adjacency, rng, next, target, remaining) {
                converted += 1;
                stack.push(frame);
            }
        }
    }

    converted
}

fn visit_growth<R: Rng + ?Sized>(
    terrain: &mut [TerrainType],
    adjacency: &AdjacencyIndex,
    rng: &mut R,
    vertex: usize,
    target: TerrainType,
    remaining: i32,
) -> Option<GrowthFrame> {
    if remaining <= 0 || terrain[vertex] != TerrainType::Water {
        return None;
    }
    terrain[vertex] = target;

    let mut neighbors = adjacency.neighbors(vertex).to_vec();
    neighbors.shuffle(rng);
    Some(GrowthFrame {
        remaining: remaining - 1,
        neighbors,
        cursor: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_core::sphere::build_icosphere;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    fn sphere(k: u32) -> (usize, AdjacencyIndex) {
        let mesh = build_icosphere(k, 1.0).unwrap();
        let index = AdjacencyIndex::build(mesh.vertex_count(), &mesh.triangles).unwrap();
        (mesh.vertex_count(), index)
    }

    fn connected_within(
        terrain: &[TerrainType],
        adjacency: &AdjacencyIndex,
        seed: usize,
        label: TerrainType,
    ) -> usize {
        let mut seen = vec![false; terrain.len()];
        let mut queue = VecDeque::from([seed]);
        seen[seed] = true;
        let mut count = 0;
        while let Some(v) = queue.pop_front() {
            count += 1;
            for &n in adjacency.neighbors(v) {
                let n = n as usize;
                if !seen[n] && terrain[n] == label {
                    seen[n] = true;
                    queue.push_back(n);
                }
            }
        }
        count
    }

    #[test]
    fn growth_chance_is_clamped() {
        let law = GrowthLaw::default();
        assert_eq!(law.chance(150), 0.5);
        assert_eq!(law.chance(500), 0.5);
        assert_eq!(law.chance(0), 0.9);
        assert_eq!(law.chance(-10), 0.9);
        assert!((law.chance(60) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn snow_with_zero_budget_converts_nothing() {
        let (n, adjacency) = sphere(1);
        let mut terrain = vec![TerrainType::Water; n];
        let mut rng = StdRng::seed_from_u64(1);
        let converted = expand_snow(&mut terrain, &adjacency, &mut rng, 0, 1.0, 0, 0.85);
        assert_eq!(converted, 0);
        assert!(terrain.iter().all(|t| *t == TerrainType::Water));
    }

    #[test]
    fn snow_with_single_tile_budget_converts_only_the_seed() {
        let (n, adjacency) = sphere(1);
        let mut terrain = vec![TerrainType::Water; n];
        let mut rng = StdRng::seed_from_u64(2);
        let converted = expand_snow(&mut terrain, &adjacency, &mut rng, 0, 1.0, 1, 0.85);
        assert_eq!(converted, 1);
        assert_eq!(terrain[0], TerrainType::Cold);
    }

    #[test]
    fn snow_without_decay_reaches_the_full_ring() {
        let (n, adjacency) = sphere(0);
        let mut terrain = vec![TerrainType::Water; n];
        let mut rng = StdRng::seed_from_u64(3);
        let converted = expand_snow(&mut terrain, &adjacency, &mut rng, 0, 1.0, 2, 1.0);
        assert_eq!(converted, 1 + adjacency.neighbors(0).len());
        for &neighbor in adjacency.neighbors(0) {
            assert_eq!(terrain[neighbor as usize], TerrainType::Cold);
        }
    }

    #[test]
    fn snow_with_zero_probability_converts_nothing() {
        let (n, adjacency) = sphere(1);
        let mut terrain = vec![TerrainType::Water; n];
        let mut rng = StdRng::seed_from_u64(4);
        let converted = expand_snow(&mut terrain, &adjacency, &mut rng, 5, 0.0, 100, 0.85);
        assert_eq!(converted, 0);
    }

    #[test]
    fn snow_region_stays_connected() {
        let (n, adjacency) = sphere(3);
        let mut terrain = vec![TerrainType::Water; n];
        let mut rng = StdRng::seed_from_u64(5);
        let converted = expand_snow(&mut terrain, &adjacency, &mut rng, 0, 1.0, 40, 0.85);
        let cold = terrain.iter().filter(|t| **t == TerrainType::Cold).count();
        assert_eq!(converted, cold);
        assert_eq!(connected_within(&terrain, &adjacency, 0, TerrainType::Cold), cold);
    }

    #[test]
    fn growth_from_non_water_seed_is_a_no_op() {
        let (n, adjacency) = sphere(2);
        let mut terrain = vec![TerrainType::Water; n];
        terrain[7] = TerrainType::Plains;
        let before = terrain.clone();
        let mut rng = StdRng::seed_from_u64(6);
        let converted = expand_biome(
            &mut terrain,
            &adjacency,
            &mut rng,
            7,
            TerrainType::Forest,
            20,
            &GrowthLaw::default(),
        );
        assert_eq!(converted, 0);
        assert_eq!(terrain, before);
    }

    #[test]
    fn growth_with_unit_budget_converts_only_the_seed() {
        let (n, adjacency) = sphere(2);
        let mut terrain = vec![TerrainType::Water; n];
        let mut rng = StdRng::seed_from_u64(7);
        let converted = expand_biome(
            &mut terrain,
            &adjacency,
            &mut rng,
            3,
            TerrainType::Plains,
            1,
            &GrowthLaw::default(),
        );
        assert_eq!(converted, 1);
        assert_eq!(terrain[3], TerrainType::Plains);
    }

    #[test]
    fn growth_only_claims_water_and_stays_connected() {
        let (n, adjacency) = sphere(3);
        let mut terrain = vec![TerrainType::Water; n];
        for v in (0..n).step_by(9) {
            terrain[v] = TerrainType::Cold;
        }
        terrain[1] = TerrainType::Water;
        let cold_before = terrain.iter().filter(|t| **t == TerrainType::Cold).count();

        let mut rng = StdRng::seed_from_u64(8);
        let converted = expand_biome(
            &mut terrain,
            &adjacency,
            &mut rng,
            1,
            TerrainType::Plains,
            60,
            &GrowthLaw::default(),
        );

        let plains = terrain.iter().filter(|t| **t == TerrainType::Plains).count();
        let cold_after = terrain.iter().filter(|t| **t == TerrainType::Cold).count();
        assert!(converted >= 1);
        assert_eq!(converted, plains);
        assert_eq!(cold_before, cold_after);
        assert_eq!(connected_within(&terrain, &adjacency, 1, TerrainType::Plains), plains);
    }

    #[test]
    fn growth_is_reproducible_for_a_fixed_seed() {
        let (n, adjacency) = sphere(3);
        let run = |seed: u64| {
            let mut terrain = vec![TerrainType::Water; n];
            let mut rng = StdRng::seed_from_u64(seed);
            expand_biome(
                &mut terrain,
                &adjacency,
                &mut rng,
                10,
                TerrainType::Plains,
                80,
                &GrowthLaw::default(),
            );
            terrain
        };
        assert_eq!(run(11), run(11));
    }
}
