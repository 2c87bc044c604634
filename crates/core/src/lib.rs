pub mod catalog;
pub mod config;
pub mod config_file;
pub mod error;
pub mod mapgen;
pub mod types;

pub use catalog::{Catalog, CatalogEntry, Variant};
pub use config::{ConfigError, LayerSpec, LayoutSettings, MapConfig, NodeCount};
pub use error::MapGenError;
pub use mapgen::{GeneratedMap, MapGenerator, MapNode, generate_map};
pub use types::*;
