use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("room_size_min must be at least {minimum}, got {actual}")]
    RoomSizeTooSmall { minimum: usize, actual: usize },

    #[error("room_size_max must be at most {maximum}, got {actual}")]
    RoomSizeTooLarge { maximum: usize, actual: usize },

    #[error("room_size_min ({min}) exceeds room_size_max ({max})")]
    RoomSizeBounds { min: usize, max: usize },

    #[error("room_count_min must be at least 1, got {actual}")]
    RoomCountTooSmall { actual: usize },

    #[error("room_count_min ({min}) exceeds room_count_max ({max})")]
    RoomCountBounds { min: usize, max: usize },

    #[error("tile_scale must be finite and positive, got {actual}")]
    InvalidTileScale { actual: f32 },

    #[error("could not read config file '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
