use std::fs;

use dungeon_core::{ConfigError, GeneratorConfig, Tile, generate_floor_plan};

#[test]
fn test_loads_config_from_toml_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dungeon.toml");
    fs::write(
        &path,
        r#"
room_size_min = 2
room_size_max = 2
room_count_min = 3
room_count_max = 3
door_spacing = 0
tile_scale = 100.0

[seed_origin]
x = 10
y = 20
"#,
    )
    .expect("write config");

    let config = GeneratorConfig::load(&path).expect("config should load");
    assert_eq!(config.seed_origin, Tile::new(10, 20));
    assert_eq!(config.tile_scale, 100.0);

    let plan = generate_floor_plan(config, 1).expect("loaded config is valid");
    assert_eq!(plan.rooms[0].origin, Tile::new(10, 20));
    assert_eq!(plan.nodes[0].position.x, 1000.0);
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.toml");

    let error = GeneratorConfig::load(&path).expect_err("file does not exist");
    assert!(matches!(&error, ConfigError::Io { path: reported, .. } if *reported == path));
    assert!(error.to_string().contains("absent.toml"));
}

#[test]
fn test_invalid_bounds_in_file_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.toml");
    fs::write(&path, "room_count_min = 4\nroom_count_max = 2\n").expect("write config");

    let error = GeneratorConfig::load(&path).expect_err("bounds are inverted");
    assert!(matches!(error, ConfigError::RoomCountBounds { min: 4, max: 2 }));
}
