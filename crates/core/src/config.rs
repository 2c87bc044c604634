//! Static description of a map: per-floor layer specs plus global generation knobs.
//!
//! A [`MapConfig`] is read-only while a map is being generated. The only
//! per-run state derived from it is the table of resolved node counts
//! ([`ResolvedCounts`]), which the generator owns and clears between attempts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, CatalogEntry, Variant};
use crate::mapgen::rng::MapRng;
use crate::types::Category;

pub const DEFAULT_CHAPTER_COUNT: usize = 3;
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub layers: Vec<LayerSpec>,
    /// Columns per floor.
    pub max_width: usize,
    pub chance_path_middle: f32,
    pub chance_path_side: f32,
    pub space_between_segments_multiplier: f32,
    pub min_connections_multiplier: f32,
    #[serde(default)]
    pub allow_path_crossing: bool,
    #[serde(default = "default_chapter_count")]
    pub chapter_count: usize,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub catalog: Catalog,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub category: Category,
    /// Vertical distance from the previous layer.
    #[serde(default = "default_spacing")]
    pub spacing: f32,
    /// Scales the positional jitter applied to every node on this layer, in `[0, 1]`.
    #[serde(default = "default_jitter")]
    pub jitter: f32,
    pub count: NodeCount,
}

impl LayerSpec {
    pub fn new(category: Category, count: NodeCount) -> Self {
        Self { category, spacing: default_spacing(), jitter: default_jitter(), count }
    }

    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter;
        self
    }
}

/// How many nodes a floor holds.
///
/// On the wire this is an integer (`-1` meaning unbounded) or a `{ min, max }`
/// table describing a half-open range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNodeCount", into = "RawNodeCount")]
pub enum NodeCount {
    Fixed(usize),
    /// Rolled once per attempt from `[min, max)`.
    Range { min: usize, max: usize },
    /// Fills every column left free after branching.
    Unbounded,
}

impl NodeCount {
    fn resolve(self, max_width: usize, rng: &mut MapRng) -> FloorTarget {
        match self {
            Self::Fixed(count) => FloorTarget::Bounded(count),
            Self::Range { min, max } => FloorTarget::Bounded(rng.range_usize(min, max)),
            Self::Unbounded => FloorTarget::Unbounded { capacity: max_width },
        }
    }

    fn minimum(self) -> Option<usize> {
        match self {
            Self::Fixed(count) => Some(count),
            Self::Range { min, .. } => Some(min),
            Self::Unbounded => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawNodeCount {
    Count(i64),
    Range { min: usize, max: usize },
}

impl TryFrom<RawNodeCount> for NodeCount {
    type Error = String;

    fn try_from(raw: RawNodeCount) -> Result<Self, Self::Error> {
        match raw {
            RawNodeCount::Count(-1) => Ok(Self::Unbounded),
            RawNodeCount::Count(count) => usize::try_from(count)
                .map(Self::Fixed)
                .map_err(|_| format!("node count {count} must be -1 or non-negative")),
            RawNodeCount::Range { min, max } => Ok(Self::Range { min, max }),
        }
    }
}

impl From<NodeCount> for RawNodeCount {
    fn from(count: NodeCount) -> Self {
        match count {
            NodeCount::Fixed(count) => Self::Count(count as i64),
            NodeCount::Range { min, max } => Self::Range { min, max },
            NodeCount::Unbounded => Self::Count(-1),
        }
    }
}

/// Node count of one floor for the current attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloorTarget {
    Bounded(usize),
    Unbounded { capacity: usize },
}

impl FloorTarget {
    /// Whether branching must stop creating nodes on this floor.
    pub fn is_reached(self, placed: usize) -> bool {
        match self {
            Self::Bounded(count) => placed >= count,
            Self::Unbounded { .. } => false,
        }
    }

    /// Number of nodes the floor holds once the fill pass is done.
    pub fn fill_to(self) -> usize {
        match self {
            Self::Bounded(count) => count,
            Self::Unbounded { capacity } => capacity,
        }
    }
}

/// Per-attempt cache of rolled node counts.
#[derive(Clone, Debug, Default)]
pub struct ResolvedCounts {
    targets: Vec<Option<FloorTarget>>,
}

impl ResolvedCounts {
    pub fn clear(&mut self) {
        self.targets.iter_mut().for_each(|target| *target = None);
    }

    /// Returns the cached target for `floor`, rolling it on first access.
    pub fn get(&mut self, config: &MapConfig, floor: usize, rng: &mut MapRng) -> FloorTarget {
        if self.targets.len() < config.layers.len() {
            self.targets.resize(config.layers.len(), None);
        }
        *self.targets[floor]
            .get_or_insert_with(|| config.layers[floor].count.resolve(config.max_width, rng))
    }

    /// Rolls every uncached floor in floor order.
    pub fn resolve_all(&mut self, config: &MapConfig, rng: &mut MapRng) -> Vec<FloorTarget> {
        (0..config.layers.len()).map(|floor| self.get(config, floor, rng)).collect()
    }
}

/// Presentation constants feeding the layout projector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub board_width: f32,
    pub x_padding: f32,
    pub edge_y_offset: f32,
    pub segment_length: f32,
    pub segment_height: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            board_width: 1000.0,
            x_padding: 50.0,
            edge_y_offset: 100.0,
            segment_length: 20.0,
            segment_height: 6.0,
        }
    }
}

impl LayoutSettings {
    /// Horizontal extent the column grid is spread across.
    pub fn usable_width(&self) -> f32 {
        self.board_width - self.x_padding
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("map config needs at least one layer")]
    NoLayers,
    #[error("max_width must be at least 1")]
    ZeroWidth,
    #[error("{field} must be in (0, 1], got {value}")]
    ChanceOutOfRange { field: &'static str, value: f32 },
    #[error("{field} must be at least 1, got {value}")]
    MultiplierTooSmall { field: &'static str, value: f32 },
    #[error("layer {floor}: spacing must be a non-negative number, got {value}")]
    InvalidSpacing { floor: usize, value: f32 },
    #[error("layer {floor}: jitter must be in [0, 1], got {value}")]
    JitterOutOfRange { floor: usize, value: f32 },
    #[error("layer {floor}: node count {count} exceeds max_width {max_width}")]
    CountExceedsWidth { floor: usize, count: usize, max_width: usize },
    #[error("layer {floor}: node range [{min}, {max}) is empty")]
    EmptyRange { floor: usize, min: usize, max: usize },
    #[error("layer 0 cannot be a boss layer")]
    BossOnFirstFloor,
    #[error("layer {floor}: boss layers need a bounded node count of at least 1")]
    InvalidBossCount { floor: usize },
    #[error("chapter_count must be at least 1")]
    NoChapters,
    #[error("max_attempts must be at least 1")]
    NoAttempts,
    #[error("layout setting {field} is invalid: {value}")]
    InvalidLayout { field: &'static str, value: f32 },
}

impl MapConfig {
    pub fn floor_count(&self) -> usize {
        self.layers.len()
    }

    pub fn is_boss_floor(&self, floor: usize) -> bool {
        self.layers.get(floor).is_some_and(|layer| layer.category.is_boss())
    }

    pub fn boss_floors(&self) -> Vec<usize> {
        (0..self.layers.len()).filter(|&floor| self.is_boss_floor(floor)).collect()
    }

    /// Connection count an attempt has to exceed to be accepted.
    pub fn min_connections(&self) -> f32 {
        self.layers.len() as f32 * self.min_connections_multiplier
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layers.is_empty() {
            return Err(ConfigError::NoLayers);
        }
        if self.max_width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        check_chance("chance_path_middle", self.chance_path_middle)?;
        check_chance("chance_path_side", self.chance_path_side)?;
        check_multiplier(
            "space_between_segments_multiplier",
            self.space_between_segments_multiplier,
        )?;
        check_multiplier("min_connections_multiplier", self.min_connections_multiplier)?;
        if self.chapter_count == 0 {
            return Err(ConfigError::NoChapters);
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }

        for (floor, layer) in self.layers.iter().enumerate() {
            self.validate_layer(floor, layer)?;
        }

        self.validate_layout()
    }

    fn validate_layer(&self, floor: usize, layer: &LayerSpec) -> Result<(), ConfigError> {
        if !layer.spacing.is_finite() || layer.spacing < 0.0 {
            return Err(ConfigError::InvalidSpacing { floor, value: layer.spacing });
        }
        if !(0.0..=1.0).contains(&layer.jitter) {
            return Err(ConfigError::JitterOutOfRange { floor, value: layer.jitter });
        }

        match layer.count {
            NodeCount::Fixed(count) if count > self.max_width => {
                return Err(ConfigError::CountExceedsWidth {
                    floor,
                    count,
                    max_width: self.max_width,
                });
            }
            NodeCount::Range { min, max } if min >= max => {
                return Err(ConfigError::EmptyRange { floor, min, max });
            }
            NodeCount::Range { max, .. } if max - 1 > self.max_width => {
                return Err(ConfigError::CountExceedsWidth {
                    floor,
                    count: max - 1,
                    max_width: self.max_width,
                });
            }
            _ => {}
        }

        if layer.category.is_boss() {
            if floor == 0 {
                return Err(ConfigError::BossOnFirstFloor);
            }
            if layer.count.minimum().is_none_or(|minimum| minimum == 0) {
                return Err(ConfigError::InvalidBossCount { floor });
            }
        }

        Ok(())
    }

    fn validate_layout(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        if !layout.board_width.is_finite() || layout.usable_width() <= 0.0 {
            return Err(ConfigError::InvalidLayout {
                field: "board_width",
                value: layout.board_width,
            });
        }
        if !layout.x_padding.is_finite() || layout.x_padding < 0.0 {
            return Err(ConfigError::InvalidLayout { field: "x_padding", value: layout.x_padding });
        }
        if !layout.segment_length.is_finite() || layout.segment_length <= 0.0 {
            return Err(ConfigError::InvalidLayout {
                field: "segment_length",
                value: layout.segment_length,
            });
        }
        Ok(())
    }
}

fn check_chance(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::ChanceOutOfRange { field, value })
    }
}

fn check_multiplier(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::MultiplierTooSmall { field, value })
    }
}

fn default_chapter_count() -> usize {
    DEFAULT_CHAPTER_COUNT
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

fn default_spacing() -> f32 {
    200.0
}

fn default_jitter() -> f32 {
    1.0
}

impl Default for MapConfig {
    /// Fifteen-floor chapter ending in a single boss.
    fn default() -> Self {
        let elite = Category::custom("elite");
        let campfire = Category::custom("campfire");
        let range = |min, max| NodeCount::Range { min, max };

        let layers = vec![
            LayerSpec::new(Category::ORDINARY, range(3, 5)),
            LayerSpec::new(Category::MINOR_ENCOUNTER, range(2, 5)),
            LayerSpec::new(Category::ORDINARY, range(3, 6)),
            LayerSpec::new(Category::MINOR_ENCOUNTER, range(3, 6)),
            LayerSpec::new(Category::ORDINARY, range(3, 6)),
            LayerSpec::new(Category::MINOR_ENCOUNTER, range(3, 6)),
            LayerSpec::new(Category::ORDINARY, range(2, 5)),
            LayerSpec::new(elite.clone(), range(2, 4)),
            LayerSpec::new(Category::TREASURE, NodeCount::Fixed(3)),
            LayerSpec::new(Category::ORDINARY, range(3, 6)),
            LayerSpec::new(Category::MINOR_ENCOUNTER, range(3, 6)),
            LayerSpec::new(elite.clone(), range(2, 4)),
            LayerSpec::new(Category::ORDINARY, range(3, 6)),
            LayerSpec::new(campfire.clone(), NodeCount::Fixed(4)),
            LayerSpec::new(Category::BOSS, NodeCount::Fixed(1))
                .with_spacing(300.0)
                .with_jitter(0.0),
        ];

        let variants = |names: &[(&str, u32)]| {
            names.iter().map(|&(name, weight)| Variant::new(name, weight)).collect::<Vec<_>>()
        };
        let catalog = Catalog::new(vec![
            CatalogEntry::new(Category::ORDINARY, variants(&[("event", 3), ("shop", 1)])),
            CatalogEntry::new(
                Category::MINOR_ENCOUNTER,
                variants(&[("cultist", 2), ("jaw_worm", 2), ("louse_pair", 1)]),
            ),
            CatalogEntry::new(Category::TREASURE, variants(&[("chest", 1)])),
            CatalogEntry::new(elite, variants(&[("gremlin_nob", 1), ("lagavulin", 1)])),
            CatalogEntry::new(campfire, variants(&[("campfire", 1)])),
            CatalogEntry::new(Category::BOSS, variants(&[("guardian", 1), ("hexaghost", 1)])),
        ]);

        Self {
            layers,
            max_width: 6,
            chance_path_middle: 0.5,
            chance_path_side: 0.35,
            space_between_segments_multiplier: 2.5,
            min_connections_multiplier: 3.0,
            allow_path_crossing: false,
            chapter_count: DEFAULT_CHAPTER_COUNT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            layout: LayoutSettings::default(),
            catalog,
        }
    }
}

#[cfg(test)]
mod tests;
