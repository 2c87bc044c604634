use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use spire_core::config_file::load_config_from_file;
use spire_core::mapgen::MapGenerator;
use spire_core::{GeneratedMap, MapConfig, MapGenError};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Generate many maps and check their topology",
    long_about = None
)]
struct Args {
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// First master seed of the sweep
    #[arg(short, long, default_value_t = 0)]
    start: i32,
    #[arg(short = 'n', long, default_value_t = 500)]
    seeds: u32,
}

#[derive(Default)]
struct Stats {
    maps: usize,
    exhausted: usize,
    attempts: BTreeMap<usize, usize>,
    nodes: usize,
    edges: usize,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config_from_file(path)
            .with_context(|| format!("Failed to load map config: {}", path.display()))?,
        None => MapConfig::default(),
    };

    println!(
        "Sweeping {} seed(s) from {} over {} chapter(s)...",
        args.seeds, args.start, config.chapter_count
    );

    let mut stats = Stats::default();
    for offset in 0..args.seeds {
        let seed = args.start.wrapping_add_unsigned(offset);
        let generator = MapGenerator::new(&config, seed).context("Map config is invalid")?;

        for chapter in 0..config.chapter_count {
            match generator.generate(chapter) {
                Ok(map) => {
                    check_invariants(&map)
                        .with_context(|| format!("seed {seed} chapter {chapter}"))?;
                    stats.record(&map);
                }
                Err(err @ MapGenError::AttemptsExhausted { .. }) => {
                    warn!(seed, chapter, %err, "no acceptable map");
                    stats.exhausted += 1;
                }
                Err(err) => bail!("seed {seed} chapter {chapter} failed: {err}"),
            }
        }
    }

    stats.report();
    Ok(())
}

fn check_invariants(map: &GeneratedMap) -> Result<()> {
    let last_floor = map.floor_count() - 1;

    for (id, node) in map.nodes() {
        if node.floor() < last_floor && map.successors(id).is_empty() {
            bail!("Invariant failed: node {:?} has no way forward", node.pos);
        }
        for &next in map.successors(id) {
            let Some(target) = map.node(next) else {
                bail!("Invariant failed: node {:?} links to a missing node", node.pos);
            };
            if target.floor() != node.floor() + 1 {
                bail!("Invariant failed: edge {:?} -> {:?} skips floors", node.pos, target.pos);
            }
        }
    }

    for floor in 0..map.floor_count() {
        let Some(target) = map.floor_target(floor) else {
            bail!("Invariant failed: floor {floor} has no target");
        };
        let occupied = map.grid().occupied_count(floor);
        let expected = target.fill_to();
        if occupied != expected {
            bail!("Invariant failed: floor {floor} holds {occupied}, expected {expected}");
        }
    }

    for &boss_floor in map.boss_floors() {
        for (boss, node) in map.floor(boss_floor) {
            if map.predecessors(boss).is_empty() {
                bail!("Invariant failed: boss {:?} is unreachable", node.pos);
            }
        }
        for (id, node) in map.floor(boss_floor - 1) {
            let leads_to_boss = map
                .successors(id)
                .iter()
                .any(|&next| map.node(next).is_some_and(|next| next.category.is_boss()));
            if !leads_to_boss {
                bail!("Invariant failed: node {:?} has no edge into boss floor", node.pos);
            }
        }
    }

    debug!(chapter = map.chapter(), fingerprint = map.fingerprint(), "map passed");
    Ok(())
}

impl Stats {
    fn record(&mut self, map: &GeneratedMap) {
        self.maps += 1;
        *self.attempts.entry(map.attempts()).or_default() += 1;
        self.nodes += map.node_count();
        self.edges += map.edge_count();
    }

    fn report(&self) {
        println!("Sweep completed: {} map(s), {} exhausted.", self.maps, self.exhausted);
        if self.maps == 0 {
            return;
        }
        println!(
            "Average nodes: {:.1}, average edges: {:.1}",
            self.nodes as f64 / self.maps as f64,
            self.edges as f64 / self.maps as f64
        );
        println!("Attempts needed:");
        for (attempts, count) in &self.attempts {
            println!("  {attempts:>3}: {count}");
        }
    }
}
