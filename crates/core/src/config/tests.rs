use super::*;
use crate::types::Category;

fn two_floor_config() -> MapConfig {
    MapConfig {
        layers: vec![
            LayerSpec::new(Category::ORDINARY, NodeCount::Fixed(2)),
            LayerSpec::new(Category::BOSS, NodeCount::Fixed(1)),
        ],
        max_width: 3,
        ..MapConfig::default()
    }
}

#[test]
fn default_config_is_valid() {
    let config = MapConfig::default();
    assert_eq!(config.validate(), Ok(()));
    assert_eq!(config.floor_count(), 15);
    assert_eq!(config.boss_floors(), vec![14]);
}

#[test]
fn empty_layers_and_zero_width_are_rejected() {
    let mut config = two_floor_config();
    config.layers.clear();
    assert_eq!(config.validate(), Err(ConfigError::NoLayers));

    let mut config = two_floor_config();
    config.max_width = 0;
    assert_eq!(config.validate(), Err(ConfigError::ZeroWidth));
}

#[test]
fn chances_must_be_in_half_open_unit_interval() {
    for value in [0.0, -0.1, 1.01, f32::NAN] {
        let mut config = two_floor_config();
        config.chance_path_side = value;
        assert!(
            matches!(
                config.validate(),
                Err(ConfigError::ChanceOutOfRange { field: "chance_path_side", .. })
            ),
            "side chance {value} should be rejected"
        );
    }

    let mut config = two_floor_config();
    config.chance_path_middle = 1.0;
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn multipliers_below_one_are_rejected() {
    let mut config = two_floor_config();
    config.min_connections_multiplier = 0.5;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::MultiplierTooSmall { field: "min_connections_multiplier", .. })
    ));

    let mut config = two_floor_config();
    config.space_between_segments_multiplier = 0.9;
    assert!(matches!(config.validate(), Err(ConfigError::MultiplierTooSmall { .. })));
}

#[test]
fn layer_counts_must_fit_the_width() {
    let mut config = two_floor_config();
    config.layers[0].count = NodeCount::Fixed(4);
    assert_eq!(
        config.validate(),
        Err(ConfigError::CountExceedsWidth { floor: 0, count: 4, max_width: 3 })
    );

    // Range upper bound is exclusive, so [1, 4) fits a width of 3.
    config.layers[0].count = NodeCount::Range { min: 1, max: 4 };
    assert_eq!(config.validate(), Ok(()));

    config.layers[0].count = NodeCount::Range { min: 2, max: 2 };
    assert_eq!(config.validate(), Err(ConfigError::EmptyRange { floor: 0, min: 2, max: 2 }));
}

#[test]
fn jitter_and_spacing_are_bounded() {
    let mut config = two_floor_config();
    config.layers[1].jitter = 1.5;
    assert!(matches!(config.validate(), Err(ConfigError::JitterOutOfRange { floor: 1, .. })));

    let mut config = two_floor_config();
    config.layers[0].spacing = -1.0;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidSpacing { floor: 0, .. })));
}

#[test]
fn boss_layers_need_a_predecessor_and_a_bounded_count() {
    let mut config = two_floor_config();
    config.layers[0].category = Category::BOSS;
    assert_eq!(config.validate(), Err(ConfigError::BossOnFirstFloor));

    let mut config = two_floor_config();
    config.layers[1].count = NodeCount::Unbounded;
    assert_eq!(config.validate(), Err(ConfigError::InvalidBossCount { floor: 1 }));

    config.layers[1].count = NodeCount::Range { min: 0, max: 2 };
    assert_eq!(config.validate(), Err(ConfigError::InvalidBossCount { floor: 1 }));
}

#[test]
fn zero_chapters_or_attempts_are_rejected() {
    let mut config = two_floor_config();
    config.chapter_count = 0;
    assert_eq!(config.validate(), Err(ConfigError::NoChapters));

    let mut config = two_floor_config();
    config.max_attempts = 0;
    assert_eq!(config.validate(), Err(ConfigError::NoAttempts));
}

#[test]
fn layout_must_leave_usable_width() {
    let mut config = two_floor_config();
    config.layout.x_padding = config.layout.board_width;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidLayout { field: "board_width", .. })
    ));

    let mut config = two_floor_config();
    config.layout.segment_length = 0.0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidLayout { field: "segment_length", .. })
    ));
}

#[test]
fn resolved_counts_are_cached_until_cleared() {
    let mut config = two_floor_config();
    config.max_width = 50;
    config.layers[0].count = NodeCount::Range { min: 0, max: 50 };

    let mut rng = MapRng::new(7);
    let mut counts = ResolvedCounts::default();
    let first = counts.get(&config, 0, &mut rng);
    for _ in 0..10 {
        assert_eq!(counts.get(&config, 0, &mut rng), first);
    }

    let rerolled: Vec<FloorTarget> = (0..10)
        .map(|_| {
            counts.clear();
            counts.get(&config, 0, &mut rng)
        })
        .collect();
    assert!(rerolled.iter().any(|&target| target != first), "clearing should allow rerolls");
}

#[test]
fn unbounded_targets_never_cap_and_fill_the_width() {
    let target = NodeCount::Unbounded.resolve(5, &mut MapRng::new(1));
    assert_eq!(target, FloorTarget::Unbounded { capacity: 5 });
    assert!(!target.is_reached(5));
    assert_eq!(target.fill_to(), 5);

    let bounded = FloorTarget::Bounded(2);
    assert!(!bounded.is_reached(1));
    assert!(bounded.is_reached(2));
}

#[test]
fn min_connections_scales_with_floor_count() {
    let config = two_floor_config();
    assert_eq!(config.min_connections(), 6.0);
}
