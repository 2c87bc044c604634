use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use spire_core::config_file::load_config_from_file;
use spire_core::mapgen::{MapGenerator, SeedInput};
use spire_core::{GeneratedMap, MapConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(author, version, about = "Generate a chapter route map", long_about = None)]
struct Args {
    /// Map config file (.toml or .json); the built-in fifteen-floor config if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Master seed: an integer, any other text to hash, or empty for a random seed
    #[arg(short, long, default_value = "")]
    seed: String,
    /// Chapter to generate; all chapters when omitted
    #[arg(long)]
    chapter: Option<usize>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Log generation progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => load_config_from_file(path)
            .with_context(|| format!("Failed to load map config: {}", path.display()))?,
        None => MapConfig::default(),
    };

    let seed = SeedInput::parse(&args.seed);
    info!(seed = seed.seed, source = ?seed.source, "resolved master seed");

    let generator = MapGenerator::new(&config, seed.seed).context("Map config is invalid")?;
    let chapters = match args.chapter {
        Some(chapter) => vec![chapter],
        None => (0..config.chapter_count).collect(),
    };

    let maps = chapters
        .into_iter()
        .map(|chapter| {
            generator
                .generate(chapter)
                .with_context(|| format!("Failed to generate chapter {chapter}"))
        })
        .collect::<Result<Vec<_>>>()?;

    match args.format {
        OutputFormat::Json => {
            let exports: Vec<_> = maps.iter().map(GeneratedMap::export).collect();
            println!("{}", serde_json::to_string_pretty(&exports)?);
        }
        OutputFormat::Text => {
            println!("Master seed: {} ({:?})", seed.seed, seed.source);
            for map in &maps {
                print_map(map);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

/// Draws the map top floor first, one cell per column.
fn print_map(map: &GeneratedMap) {
    println!();
    println!(
        "Chapter {} (seed {}, {} attempt(s), {} connections, {} nodes, {} edges)",
        map.chapter(),
        map.chapter_seed(),
        map.attempts(),
        map.connections(),
        map.node_count(),
        map.edge_count()
    );

    for floor in (0..map.floor_count()).rev() {
        let cells: String = (0..map.max_width())
            .map(|column| match map.node_at(floor, column) {
                Some(node) => format!("[{:^3}]", glyph(node.category.name())),
                None => "  .  ".to_string(),
            })
            .collect();
        println!("{floor:>3} {cells}");
    }

    println!();
    for (id, node) in map.nodes() {
        let next: Vec<String> = map
            .successors(id)
            .iter()
            .filter_map(|&next| map.node(next))
            .map(|next| format!("{}:{}", next.floor(), next.column()))
            .collect();
        println!(
            "  {}:{} {} ({}) -> {}",
            node.floor(),
            node.column(),
            node.category,
            node.variant,
            next.join(", ")
        );
    }
}

fn glyph(category: &str) -> String {
    category.chars().next().map(|c| c.to_ascii_uppercase()).unwrap_or('?').to_string()
}
