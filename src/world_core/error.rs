use thiserror::Error;

pub type Result<T> = std::result::Result<T, WorldGenError>;

#[derive(Debug, Error)]
pub enum WorldGenError {
    /// A world or biome parameter failed validation before generation started.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid configuration: adjacency requires at least one triangle")]
    EmptyTopology,

    #[error("triangle references vertex {index}, but only {vertex_count} vertices exist")]
    VertexOutOfRange { index: usize, vertex_count: usize },

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode export: {0}")]
    Json(#[from] serde_json::Error),
}

impl WorldGenError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    pub fn is_invalid_config(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig(_) | Self::EmptyTopology | Self::VertexOutOfRange { .. }
        )
    }
}
