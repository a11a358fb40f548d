use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::world_core::error::{Result, WorldGenError};
use crate::world_core::sphere::MAX_SUBDIVISIONS;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub biome: BiomeConfig,
    pub countries: CountryConfig,
}

impl GameConfig {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let path = Path::new("config.json");
        if !path.exists() {
            log::info!("no config.json found, using defaults");
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("loaded config.json");
                    config
                }
                Err(e) => {
                    log::warn!("failed to parse config.json: {e}, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("failed to read config.json: {e}, using defaults");
                Self::default()
            }
        }
    }

    /// Strict variant of [`GameConfig::load`] for an explicitly requested file.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        log::info!("loaded {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.world.validate()?;
        self.biome.validate()?;
        self.countries.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: u32,
    pub subdivisions: u32,
    pub radius: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            subdivisions: 2,
            radius: 5.0,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        if self.subdivisions > MAX_SUBDIVISIONS {
            return Err(WorldGenError::invalid(format!(
                "world.subdivisions must be at most {MAX_SUBDIVISIONS}, got {}",
                self.subdivisions
            )));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(WorldGenError::invalid(format!(
                "world.radius must be a positive finite number, got {}",
                self.radius
            )));
        }
        Ok(())
    }
}

/// Tunables for the biome passes. Ranges are half-open: `min..max`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeConfig {
    pub pole_epsilon: f32,
    pub snow_decay: f32,
    pub snow_budget_divisor: usize,
    pub landmass_count_min: u32,
    pub landmass_count_max: u32,
    pub landmass_size_min: i32,
    pub landmass_size_max: i32,
    pub expansion_budget_scale: f32,
    pub expansion_chance_min: f32,
    pub expansion_chance_max: f32,
    pub beach_chance: f32,
    pub forest_chance: f32,
    pub large_forest_chance: f32,
    pub large_forest_size_min: i32,
    pub large_forest_size_max: i32,
    pub mountain_chance: f32,
    pub chain_length_min: u32,
    pub chain_length_max: u32,
    pub mountain_neighbor_ratio: f32,
    pub city_chance: f32,
}

impl Default for BiomeConfig {
    fn default() -> Self {
        Self {
            pole_epsilon: 0.05,
            snow_decay: 0.85,
            snow_budget_divisor: 12,
            landmass_count_min: 5,
            landmass_count_max: 10,
            landmass_size_min: 30,
            landmass_size_max: 100,
            expansion_budget_scale: 150.0,
            expansion_chance_min: 0.5,
            expansion_chance_max: 0.9,
            beach_chance: 0.95,
            forest_chance: 0.18,
            large_forest_chance: 0.03,
            large_forest_size_min: 5,
            large_forest_size_max: 25,
            mountain_chance: 0.01,
            chain_length_min: 5,
            chain_length_max: 20,
            mountain_neighbor_ratio: 0.60,
            city_chance: 0.04,
        }
    }
}

impl BiomeConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("snow_decay", self.snow_decay),
            ("expansion_chance_min", self.expansion_chance_min),
            ("expansion_chance_max", self.expansion_chance_max),
            ("beach_chance", self.beach_chance),
            ("forest_chance", self.forest_chance),
            ("large_forest_chance", self.large_forest_chance),
            ("mountain_chance", self.mountain_chance),
            ("mountain_neighbor_ratio", self.mountain_neighbor_ratio),
            ("city_chance", self.city_chance),
        ] {
            check_probability(name, value)?;
        }

        if !self.pole_epsilon.is_finite() || self.pole_epsilon < 0.0 {
            return Err(WorldGenError::invalid(format!(
                "biome.pole_epsilon must be non-negative, got {}",
                self.pole_epsilon
            )));
        }
        if self.snow_budget_divisor == 0 {
            return Err(WorldGenError::invalid("biome.snow_budget_divisor must be non-zero"));
        }
        if !self.expansion_budget_scale.is_finite() || self.expansion_budget_scale <= 0.0 {
            return Err(WorldGenError::invalid(format!(
                "biome.expansion_budget_scale must be positive, got {}",
                self.expansion_budget_scale
            )));
        }
        if self.expansion_chance_min > self.expansion_chance_max {
            return Err(WorldGenError::invalid(
                "biome.expansion_chance_min exceeds expansion_chance_max",
            ));
        }

        check_range("landmass_count", self.landmass_count_min, self.landmass_count_max)?;
        check_range("landmass_size", self.landmass_size_min, self.landmass_size_max)?;
        check_range(
            "large_forest_size",
            self.large_forest_size_min,
            self.large_forest_size_max,
        )?;
        check_range("chain_length", self.chain_length_min, self.chain_length_max)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CountryConfig {
    pub min_land_masses: usize,
    pub land_per_mass: usize,
    pub countries_per_mass: usize,
    pub min_countries: usize,
    pub max_countries: usize,
}

impl Default for CountryConfig {
    fn default() -> Self {
        Self {
            min_land_masses: 5,
            land_per_mass: 100,
            countries_per_mass: 3,
            min_countries: 15,
            max_countries: 30,
        }
    }
}

impl CountryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.land_per_mass == 0 {
            return Err(WorldGenError::invalid("countries.land_per_mass must be non-zero"));
        }
        if self.min_countries > self.max_countries {
            return Err(WorldGenError::invalid(format!(
                "countries.min_countries ({}) exceeds max_countries ({})",
                self.min_countries, self.max_countries
            )));
        }
        Ok(())
    }
}

fn check_probability(name: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(WorldGenError::invalid(format!(
            "biome.{name} must be within [0, 1], got {value}"
        )))
    }
}

fn check_range<T: PartialOrd + std::fmt::Display>(name: &str, min: T, max: T) -> Result<()> {
    if min < max {
        Ok(())
    } else {
        Err(WorldGenError::invalid(format!(
            "biome.{name} range {min}..{max} is empty"
        )))
    }
}
