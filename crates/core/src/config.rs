//! Generator parameters and their validation.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{ConstructionType, Tile};

/// Smallest room edge that still has four distinct corners.
pub const MIN_ROOM_EDGE: usize = 2;

/// Largest room edge accepted. Keeps tile offsets well inside `i32`.
pub const MAX_ROOM_EDGE: usize = 1024;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub room_size_min: usize,
    pub room_size_max: usize,
    pub room_count_min: usize,
    pub room_count_max: usize,
    /// Perimeter positions closed on each side of a carved door.
    pub door_spacing: usize,
    /// Bottom-left tile of the first room.
    pub seed_origin: Tile,
    pub tile_scale: f32,
    pub prefabs: PrefabSet,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            room_size_min: 2,
            room_size_max: 5,
            room_count_min: 5,
            room_count_max: 10,
            door_spacing: 2,
            seed_origin: Tile::new(0, 0),
            tile_scale: 300.0,
            prefabs: PrefabSet::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.room_size_min < MIN_ROOM_EDGE {
            return Err(ConfigError::RoomSizeTooSmall {
                minimum: MIN_ROOM_EDGE,
                actual: self.room_size_min,
            });
        }
        if self.room_size_max > MAX_ROOM_EDGE {
            return Err(ConfigError::RoomSizeTooLarge {
                maximum: MAX_ROOM_EDGE,
                actual: self.room_size_max,
            });
        }
        if self.room_size_min > self.room_size_max {
            return Err(ConfigError::RoomSizeBounds {
                min: self.room_size_min,
                max: self.room_size_max,
            });
        }
        if self.room_count_min == 0 {
            return Err(ConfigError::RoomCountTooSmall { actual: self.room_count_min });
        }
        if self.room_count_min > self.room_count_max {
            return Err(ConfigError::RoomCountBounds {
                min: self.room_count_min,
                max: self.room_count_max,
            });
        }
        if !self.tile_scale.is_finite() || self.tile_scale <= 0.0 {
            return Err(ConfigError::InvalidTileScale { actual: self.tile_scale });
        }
        Ok(())
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text)
    }
}

/// Opaque handles a renderer resolves into wall, floor, doorway and spawn-marker assets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefabSet {
    pub wall: String,
    pub floor: String,
    pub doorway: String,
    pub spawn_marker: String,
}

impl Default for PrefabSet {
    fn default() -> Self {
        Self {
            wall: "wall".to_string(),
            floor: "floor".to_string(),
            doorway: "doorway".to_string(),
            spawn_marker: "spawn_marker".to_string(),
        }
    }
}

impl PrefabSet {
    pub fn handle_for(&self, kind: ConstructionType) -> &str {
        match kind {
            ConstructionType::Wall => &self.wall,
            ConstructionType::Doorway => &self.doorway,
            ConstructionType::Floor => &self.floor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_bounds() {
        let tiny_rooms = GeneratorConfig { room_size_min: 1, ..GeneratorConfig::default() };
        assert!(matches!(
            tiny_rooms.validate(),
            Err(ConfigError::RoomSizeTooSmall { minimum: 2, actual: 1 })
        ));

        let inverted = GeneratorConfig {
            room_size_min: 4,
            room_size_max: 3,
            ..GeneratorConfig::default()
        };
        assert!(matches!(inverted.validate(), Err(ConfigError::RoomSizeBounds { .. })));

        let huge = GeneratorConfig { room_size_max: usize::MAX, ..GeneratorConfig::default() };
        assert!(matches!(
            huge.validate(),
            Err(ConfigError::RoomSizeTooLarge { maximum: MAX_ROOM_EDGE, actual: usize::MAX })
        ));
        let largest = GeneratorConfig {
            room_size_min: MAX_ROOM_EDGE,
            room_size_max: MAX_ROOM_EDGE,
            ..GeneratorConfig::default()
        };
        assert!(largest.validate().is_ok());

        let no_rooms = GeneratorConfig {
            room_count_min: 0,
            room_count_max: 0,
            ..GeneratorConfig::default()
        };
        assert!(matches!(no_rooms.validate(), Err(ConfigError::RoomCountTooSmall { .. })));

        let inverted_count = GeneratorConfig {
            room_count_min: 6,
            room_count_max: 2,
            ..GeneratorConfig::default()
        };
        assert!(matches!(inverted_count.validate(), Err(ConfigError::RoomCountBounds { .. })));

        let flat = GeneratorConfig { tile_scale: 0.0, ..GeneratorConfig::default() };
        assert!(matches!(flat.validate(), Err(ConfigError::InvalidTileScale { .. })));
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let config = GeneratorConfig::from_toml_str(
            r#"
            room_size_min = 3
            door_spacing = 0

            [seed_origin]
            x = 4
            y = -2

            [prefabs]
            wall = "stone_wall"
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.room_size_min, 3);
        assert_eq!(config.room_size_max, 5);
        assert_eq!(config.door_spacing, 0);
        assert_eq!(config.seed_origin, Tile::new(4, -2));
        assert_eq!(config.prefabs.handle_for(ConstructionType::Wall), "stone_wall");
        assert_eq!(config.prefabs.handle_for(ConstructionType::Floor), "floor");
    }

    #[test]
    fn invalid_toml_surfaces_parse_error() {
        let result = GeneratorConfig::from_toml_str("room_size_min = \"large\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
