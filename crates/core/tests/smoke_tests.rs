use std::fs;

use spire_core::config_file::{load_config_from_file, save_config_to_file};
use spire_core::mapgen::{MapExport, MapGenerator};
use spire_core::{Category, MapConfig, MapGenError, NodeCount, generate_map};
use tempfile::tempdir;

#[test]
fn smoke_default_config_generates_every_chapter() {
    let config = MapConfig::default();
    for seed in [0, 1, -1, i32::MAX, i32::MIN, 42] {
        for chapter in 0..config.chapter_count {
            let map = generate_map(&config, seed, chapter)
                .unwrap_or_else(|err| panic!("seed {seed} chapter {chapter} failed: {err}"));

            assert_eq!(map.chapter(), chapter);
            assert_eq!(map.floor_count(), config.floor_count());
            assert!(map.attempts() >= 1);
            assert!(map.connections() as f32 > config.min_connections());

            let last = map.floor(config.floor_count() - 1);
            assert_eq!(last.len(), 1, "default chapter ends in a single boss");
            assert!(last[0].1.category.is_boss());
        }
    }
}

#[test]
fn smoke_chapter_past_the_seed_set_is_rejected() {
    let config = MapConfig::default();
    let err = generate_map(&config, 1, config.chapter_count).unwrap_err();
    assert_eq!(err, MapGenError::ChapterOutOfRange { chapter: 3, chapter_count: 3 });
}

#[test]
fn smoke_invalid_config_is_rejected_before_generation() {
    let mut config = MapConfig::default();
    config.layers[0].count = NodeCount::Fixed(config.max_width + 1);

    assert!(MapGenerator::new(&config, 1).is_err());
    assert!(matches!(generate_map(&config, 1, 0), Err(MapGenError::Config(_))));
}

#[test]
fn smoke_saved_config_generates_the_same_map() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chapter.toml");

    let config = MapConfig::default();
    save_config_to_file(&config, &path).unwrap();
    let loaded = load_config_from_file(&path).unwrap();

    let original = generate_map(&config, 2_718, 1).expect("default config generates");
    let reloaded = generate_map(&loaded, 2_718, 1).expect("reloaded config generates");
    assert_eq!(original.fingerprint(), reloaded.fingerprint());
}

#[test]
fn smoke_export_survives_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("map.json");

    let map = generate_map(&MapConfig::default(), 31_415, 0).expect("default config generates");
    let export = map.export();
    fs::write(&path, serde_json::to_string_pretty(&export).unwrap()).unwrap();

    let parsed: MapExport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed, export);
    assert_eq!(parsed.floors.len(), map.floor_count());

    let exported_edges: usize =
        parsed.floors.iter().flat_map(|floor| &floor.nodes).map(|node| node.next.len()).sum();
    assert_eq!(exported_edges, map.edge_count());
    assert!(
        parsed.floors[0].nodes.iter().all(|node| node.category == Category::ORDINARY),
        "first default floor is ordinary"
    );
}

#[test]
fn smoke_edges_project_to_segments() {
    let config = MapConfig::default();
    let generator = MapGenerator::new(&config, 9).expect("default config is valid");
    let map = generator.generate(0).expect("default config generates");

    for (from, to) in map.edges() {
        let segments = map
            .edge_segments(generator.projector(), from, to)
            .expect("edge endpoints exist");
        assert!(segments.count >= 1);
        assert_eq!(segments.centers.len(), segments.count);
    }
}
