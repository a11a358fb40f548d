use serde::{Deserialize, Serialize};

/// Surface label carried by every sphere vertex. Declaration order is the
/// tie-break order for render-batch voting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TerrainType {
    Water,
    Beach,
    Desert,
    Plains,
    Forest,
    Hills,
    City,
    Mountain,
    Cold,
}

impl TerrainType {
    pub const COUNT: usize = 9;

    pub const ALL: [TerrainType; Self::COUNT] = [
        TerrainType::Water,
        TerrainType::Beach,
        TerrainType::Desert,
        TerrainType::Plains,
        TerrainType::Forest,
        TerrainType::Hills,
        TerrainType::City,
        TerrainType::Mountain,
        TerrainType::Cold,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            TerrainType::Water => "Water",
            TerrainType::Beach => "Beach",
            TerrainType::Desert => "Desert",
            TerrainType::Plains => "Plains",
            TerrainType::Forest => "Forest",
            TerrainType::Hills => "Hills",
            TerrainType::City => "City",
            TerrainType::Mountain => "Mountain",
            TerrainType::Cold => "Cold",
        }
    }

    pub fn is_land(self) -> bool {
        self != TerrainType::Water
    }

    /// Linear RGB display color.
    pub fn color(self) -> [f32; 3] {
        match self {
            TerrainType::Water => [0.2, 0.4, 0.8],
            TerrainType::Beach => [0.93, 0.91, 0.67],
            TerrainType::Desert => [1.0, 0.92, 0.016],
            TerrainType::Plains => [0.6, 0.8, 0.2],
            TerrainType::Forest => [0.5, 0.6, 0.1],
            TerrainType::Hills => [0.4, 0.4, 0.0],
            TerrainType::City => [0.5, 0.5, 0.5],
            TerrainType::Mountain => [0.5, 0.35, 0.2],
            TerrainType::Cold => [1.0, 1.0, 1.0],
        }
    }
}

impl std::fmt::Display for TerrainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}
