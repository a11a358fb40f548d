use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::world_core::error::Result;
use crate::world_core::terrain::TerrainType;
use crate::world_core::world::WorldGraph;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldExport {
    pub tiles: Vec<TileRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileRecord {
    pub id: usize,
    pub position: Position,
    pub terrain_type: TerrainType,
    pub country_id: i32,
    pub infrastructure: Infrastructure,
    pub population: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Owned by the economy layer; the generator always emits zeroed levels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Infrastructure {
    pub sea: InfrastructureLevel,
    pub road: InfrastructureLevel,
    pub rail: InfrastructureLevel,
    pub air: InfrastructureLevel,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureLevel {
    pub level: u32,
    pub max_level: u32,
}

impl WorldExport {
    pub fn from_world(world: &WorldGraph) -> Self {
        let tiles = world
            .vertices()
            .iter()
            .enumerate()
            .map(|(id, v)| TileRecord {
                id,
                position: Position {
                    x: v.x,
                    y: v.y,
                    z: v.z,
                },
                terrain_type: world.terrain_at(id),
                country_id: world.country_id(id),
                infrastructure: Infrastructure::default(),
                population: 0,
            })
            .collect();
        Self { tiles }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("wrote {} tiles to {}", self.tiles.len(), path.display());
        Ok(())
    }
}
