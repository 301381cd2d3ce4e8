//! Synthetic dataset used to try the CLI without compiled game data.

use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context, Result};
use glam::Vec3;
use level_graph_core::{LevelVertexId, VertexMask, CROSS_TABLE_NAME};
use level_graph_world::{CrossTable, GraphBuilder, ResourceLayout, SessionConfig, VertexRecord};
use tracing::info;

const LEVEL_NAMES: [&str; 4] = ["escape", "garbage", "agroprom", "bar"];
/// Distance between neighbouring game vertices along a level's corridor.
const VERTEX_SPACING: f32 = 25.0;
/// Level navigation vertices generated per game vertex.
const LEVEL_VERTICES_PER_GAME_VERTEX: u32 = 5;
const LEVEL_STRIDE: f32 = 10_000.0;

/// Name of the configuration file written next to the demo data.
pub(crate) const CONFIG_NAME: &str = "level-graph.toml";

/// Writes a demo world below `dir` and returns the path of its config file.
///
/// Every level is a straight corridor of game vertices; the last vertex of
/// each level links to the first vertex of the next one.
pub(crate) fn write(dir: &Path, levels: usize, vertices_per_level: u32) -> Result<PathBuf> {
    ensure!(
        (1..=LEVEL_NAMES.len()).contains(&levels),
        "levels must be between 1 and {}",
        LEVEL_NAMES.len()
    );
    ensure!(vertices_per_level > 0, "vertices per level must be positive");
    let Some(level_vertex_count) = vertices_per_level.checked_mul(LEVEL_VERTICES_PER_GAME_VERTEX)
    else {
        bail!("{vertices_per_level} vertices per level exceed the level vertex id range");
    };

    let layout = ResourceLayout::new(dir.join("levels"));
    let mut builder = GraphBuilder::default();
    let mut previous_exit = None;
    let mut level_ids = Vec::with_capacity(levels);

    for (index, name) in LEVEL_NAMES.iter().take(levels).enumerate() {
        let offset = Vec3::new(index as f32 * LEVEL_STRIDE, 0.0, 0.0);
        let level = builder.add_level(*name, offset)?;
        level_ids.push(level);

        let mut previous = None;
        for local in 0..vertices_per_level {
            let level_point = Vec3::new(local as f32 * VERTEX_SPACING, 0.0, 0.0);
            let id = builder.add_vertex(VertexRecord {
                level_point,
                game_point: level_point + offset,
                level_id: level,
                level_vertex_id: LevelVertexId::new(local * LEVEL_VERTICES_PER_GAME_VERTEX),
                mask: VertexMask::new([level.get(), u8::from(local % 2 == 0), 0, 0]),
                edges: Vec::new(),
            })?;
            if let Some(from) = previous.or(previous_exit) {
                builder.connect(from, id)?;
            }
            previous = Some(id);
        }
        previous_exit = previous;
    }

    let graph = builder.build(layout.clone())?;
    let graph_path = dir.join("game.graph");
    graph
        .save(&graph_path)
        .with_context(|| format!("failed to write {}", graph_path.display()))?;

    let step = VERTEX_SPACING / LEVEL_VERTICES_PER_GAME_VERTEX as f32;
    let level_points: Vec<Vec3> = (0..level_vertex_count)
        .map(|local| Vec3::new(local as f32 * step, 0.0, 0.5))
        .collect();
    for level in level_ids {
        let name = graph
            .levels()
            .by_id(level)
            .map(|level| level.name().to_owned())
            .context("demo level vanished from the graph")?;
        let path = layout.cross_table_path(&name);
        CrossTable::compile(&graph, level, &level_points)?
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    let config = SessionConfig {
        graph: PathBuf::from("game.graph"),
        levels_root: PathBuf::from("levels"),
        cross_table_name: CROSS_TABLE_NAME.to_owned(),
        current_level: Some(LEVEL_NAMES[0].to_owned()),
    };
    let config_path = dir.join(CONFIG_NAME);
    std::fs::write(&config_path, toml::to_string(&config)?)
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    info!(
        dir = %dir.display(),
        levels,
        vertices = graph.vertex_count(),
        "Wrote demo world"
    );
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use level_graph_world::Session;

    #[test]
    fn demo_world_opens_as_a_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config_path = write(dir.path(), 3, 4).expect("demo");

        let config = SessionConfig::from_path(&config_path).expect("config");
        let mut session = Session::open(&config).expect("session");

        assert_eq!(session.graph().vertex_count(), 12);
        assert_eq!(session.graph().levels().len(), 3);
        assert!(session.cross_table().is_some());
        let table = session
            .graph_mut()
            .cross_table_for_level("agroprom")
            .expect("load")
            .expect("known level");
        assert_eq!(table.cells().len(), 20);
    }

    #[test]
    fn levels_are_linked_end_to_start() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config_path = write(dir.path(), 2, 3).expect("demo");
        let session =
            Session::open(&SessionConfig::from_path(&config_path).expect("config")).expect("session");

        let exit = level_graph_core::GameVertexId::new(2);
        let entry = level_graph_core::GameVertexId::new(3);
        let neighbours = session.graph().neighbours(exit).expect("vertex");
        assert!(neighbours.iter().any(|edge| edge.target() == entry));
    }

    #[test]
    fn rejects_vertex_counts_beyond_level_vertex_ids() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = write(dir.path(), 1, u32::MAX / LEVEL_VERTICES_PER_GAME_VERTEX + 1)
            .expect_err("overflowing level vertex ids");
        assert!(error.to_string().contains("level vertex id range"));
        assert!(!dir.path().join("game.graph").exists());
    }

    #[test]
    fn rejects_unsupported_level_counts() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(write(dir.path(), 0, 3).is_err());
        assert!(write(dir.path(), LEVEL_NAMES.len() + 1, 3).is_err());
    }
}
