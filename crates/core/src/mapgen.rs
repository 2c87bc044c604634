//! Procedural chapter map generation split into coherent submodules.

pub mod layout;
pub mod model;
pub mod seed;

mod generator;
mod grid;
mod observer;
pub(crate) mod rng;

pub use generator::MapGenerator;
pub use grid::{FloorGrid, Look, closest_in_row, shuffled_columns};
pub use layout::{EdgeSegments, LayoutProjector};
pub use model::{FloorExport, GeneratedMap, MapExport, MapNode, NodeExport};
pub use observer::{MapObserver, NoopObserver};
pub use rng::MapRng;
pub use seed::{ChapterSeeds, SeedInput, SeedSource, derive_node_seed, resolve_chapter_seeds};

use crate::config::MapConfig;
use crate::error::MapGenError;

/// Generates the map of one chapter for `master_seed`.
pub fn generate_map(
    config: &MapConfig,
    master_seed: i32,
    chapter: usize,
) -> Result<GeneratedMap, MapGenError> {
    MapGenerator::new(config, master_seed)?.generate(chapter)
}
