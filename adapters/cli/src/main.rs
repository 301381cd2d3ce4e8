#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for inspecting compiled game graphs.

mod demo;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use level_graph_core::{GameVertexId, LevelVertexId};
use level_graph_system_script_bridge::{ScriptBridge, VertexView};
use level_graph_world::{Session, SessionConfig};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "level-graph")]
#[command(about = "Inspect game graphs and level cross-tables", long_about = None)]
struct Cli {
    /// Session configuration file
    #[arg(long, global = true, default_value = demo::CONFIG_NAME)]
    config: PathBuf,
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the graph digest and the levels it spans
    Summary,
    /// Print a single game vertex
    Vertex {
        id: u32,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print whether a game vertex is traversable
    Accessible { id: u32 },
    /// Load a level's cross-table and print its header or a single cell
    CrossTable {
        level: String,
        /// Level vertex to resolve
        #[arg(long)]
        local: Option<u32>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write a synthetic world and its config into a directory
    Demo {
        dir: PathBuf,
        #[arg(long, default_value_t = 2)]
        levels: usize,
        #[arg(long, default_value_t = 8)]
        vertices_per_level: u32,
    },
}

#[derive(Serialize)]
struct VertexReport {
    id: u32,
    level_point: [f32; 3],
    game_point: [f32; 3],
    level_id: u8,
    level_vertex_id: u32,
    mask: [f32; 4],
    accessible: bool,
}

impl From<VertexView<'_>> for VertexReport {
    fn from(view: VertexView<'_>) -> Self {
        Self {
            id: view.id().get(),
            level_point: view.level_point().to_array(),
            game_point: view.game_point().to_array(),
            level_id: view.level_id().get(),
            level_vertex_id: view.level_vertex_id().get(),
            mask: view.mask().to_array(),
            accessible: view.accessible(),
        }
    }
}

#[derive(Serialize)]
struct CellReport {
    level: String,
    level_vertex_id: u32,
    game_vertex_id: u32,
    distance: f32,
}

/// Entry point for the level graph command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let bridge = ScriptBridge;

    match cli.command {
        Commands::Demo {
            dir,
            levels,
            vertices_per_level,
        } => {
            let config = demo::write(&dir, levels, vertices_per_level)?;
            println!("wrote demo world, config at {}", config.display());
        }
        Commands::Summary => {
            let session = open_session(&cli.config)?;
            let graph = bridge.game_graph(&session);
            println!("guid: {}", graph.guid());
            println!("vertices: {}", graph.vertex_count());
            for level in graph.levels().iter() {
                let owned = graph.vertices_in_level(level.id()).count();
                println!(
                    "level {:>3} {:<16} vertices={owned} offset={:?} section={}",
                    level.id(),
                    level.name(),
                    level.offset().to_array(),
                    level.section()
                );
            }
        }
        Commands::Vertex { id, json } => {
            let session = open_session(&cli.config)?;
            let view = bridge.vertex(&session, GameVertexId::new(id))?;
            let report = VertexReport::from(view);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "vertex {} level={} level_vertex={} level_point={:?} game_point={:?} mask={:?} accessible={}",
                    report.id,
                    report.level_id,
                    report.level_vertex_id,
                    report.level_point,
                    report.game_point,
                    report.mask,
                    report.accessible
                );
            }
        }
        Commands::Accessible { id } => {
            let session = open_session(&cli.config)?;
            let accessible = bridge.accessible(&session, GameVertexId::new(id))?;
            println!("{accessible}");
        }
        Commands::CrossTable { level, local, json } => {
            let mut session = open_session(&cli.config)?;
            let Some(table) = bridge.cross_table_for_level(&mut session, &level)? else {
                bail!("unknown level `{level}`");
            };
            match local {
                Some(local) => {
                    let cell = table.vertex(LevelVertexId::new(local))?;
                    let report = CellReport {
                        level,
                        level_vertex_id: local,
                        game_vertex_id: cell.game_vertex_id().get(),
                        distance: cell.distance(),
                    };
                    if json {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    } else {
                        println!(
                            "{} level vertex {} -> game vertex {} ({:.2} units)",
                            report.level,
                            report.level_vertex_id,
                            report.game_vertex_id,
                            report.distance
                        );
                    }
                }
                None => {
                    let header = table.header();
                    println!("level: {level}");
                    println!("version: {}", header.version());
                    println!("level vertices: {}", header.level_vertex_count());
                    println!("game vertices: {}", header.game_vertex_count());
                    println!("game guid: {}", header.game_guid());
                }
            }
        }
    }

    Ok(())
}

fn open_session(config_path: &Path) -> Result<Session> {
    let config = SessionConfig::from_path(config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;
    Session::open(&config).context("failed to open session")
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
