//! Chapter map generation: attempt orchestration and the sparse-map retry loop.

mod attempt;
mod fill;

use tracing::{debug, info, warn};

use crate::config::{ConfigError, MapConfig, ResolvedCounts};
use crate::error::MapGenError;

use super::layout::LayoutProjector;
use super::model::GeneratedMap;
use super::observer::{MapObserver, NoopObserver};
use super::rng::MapRng;
use super::seed::{ChapterSeeds, attempt_seed};
use attempt::Attempt;

/// Generates chapter maps for one validated config and master seed.
///
/// Runs are synchronous and single-threaded. A run either returns a map that
/// passed the connectivity threshold or a fatal [`MapGenError`].
pub struct MapGenerator<'a> {
    config: &'a MapConfig,
    seeds: ChapterSeeds,
    projector: LayoutProjector,
}

impl<'a> MapGenerator<'a> {
    pub fn new(config: &'a MapConfig, master_seed: i32) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            seeds: ChapterSeeds::resolve(config.chapter_count, master_seed),
            projector: LayoutProjector::new(config),
        })
    }

    pub fn config(&self) -> &MapConfig {
        self.config
    }

    pub fn chapter_seeds(&self) -> &ChapterSeeds {
        &self.seeds
    }

    pub fn projector(&self) -> &LayoutProjector {
        &self.projector
    }

    pub fn generate(&self, chapter: usize) -> Result<GeneratedMap, MapGenError> {
        self.generate_with(chapter, &mut NoopObserver)
    }

    /// Like [`MapGenerator::generate`], notifying `observer` once on success.
    pub fn generate_with(
        &self,
        chapter: usize,
        observer: &mut impl MapObserver,
    ) -> Result<GeneratedMap, MapGenError> {
        let chapter_seed = self.seeds.get(chapter).ok_or(MapGenError::ChapterOutOfRange {
            chapter,
            chapter_count: self.seeds.len(),
        })?;

        let threshold = self.config.min_connections();
        let mut rng = MapRng::new(attempt_seed(chapter_seed, 0));
        let mut counts = ResolvedCounts::default();
        let mut last_connections = 0;

        for attempt in 0..self.config.max_attempts {
            rng.reseed(attempt_seed(chapter_seed, attempt));
            let outcome =
                Attempt::new(self.config, &self.projector, &mut rng, &mut counts, chapter_seed)
                    .run()?;

            if outcome.connections as f32 <= threshold {
                debug!(
                    chapter,
                    attempt,
                    connections = outcome.connections,
                    threshold,
                    "map too sparse, regenerating"
                );
                last_connections = outcome.connections;
                continue;
            }

            let map = GeneratedMap {
                chapter,
                chapter_seed,
                attempts: attempt + 1,
                connections: outcome.connections,
                boss_floors: self.config.boss_floors(),
                targets: outcome.targets,
                grid: outcome.grid,
                nodes: outcome.nodes,
            };
            info!(
                chapter,
                attempts = map.attempts,
                connections = map.connections,
                nodes = map.node_count(),
                "generated map"
            );
            observer.map_generated();
            return Ok(map);
        }

        warn!(
            chapter,
            attempts = self.config.max_attempts,
            connections = last_connections,
            threshold,
            "gave up on sparse map"
        );
        Err(MapGenError::AttemptsExhausted {
            attempts: self.config.max_attempts,
            connections: last_connections,
            threshold,
        })
    }
}
