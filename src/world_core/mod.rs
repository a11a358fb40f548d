#[macro_use]
mod par;

pub mod adjacency;
pub mod batches;
pub mod biome_map;
pub mod config;
pub mod country;
pub mod error;
pub mod expansion;
pub mod export;
pub mod layer;
pub mod sphere;
pub mod terrain;
pub mod world;
