//! Per-level tables mapping level vertices onto game vertices.

use std::{
    collections::{hash_map::Entry, HashMap},
    fs,
    path::Path,
};

use glam::Vec3;
use level_graph_core::{Cell, GameVertexId, GraphGuid, LevelId, LevelVertexId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    resource::{decode_checked, write_bytes},
    GameGraph, GraphError,
};

pub(crate) const CROSS_TABLE_MAGIC: [u8; 4] = *b"LGCT";
pub(crate) const CROSS_TABLE_VERSION: u32 = 1;

/// Metadata stored ahead of the cells of a cross-table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossTableHeader {
    version: u32,
    level_vertex_count: u32,
    game_vertex_count: u32,
    game_guid: GraphGuid,
}

impl CrossTableHeader {
    /// Format version the table was written with.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Number of level vertices, and therefore cells, in the table.
    #[must_use]
    pub const fn level_vertex_count(&self) -> u32 {
        self.level_vertex_count
    }

    /// Vertex count of the game graph the table was compiled against.
    #[must_use]
    pub const fn game_vertex_count(&self) -> u32 {
        self.game_vertex_count
    }

    /// Digest of the game graph the table was compiled against.
    #[must_use]
    pub const fn game_guid(&self) -> GraphGuid {
        self.game_guid
    }
}

#[derive(Serialize, Deserialize)]
struct CrossTableFile {
    magic: [u8; 4],
    header: CrossTableHeader,
    cells: Vec<Cell>,
}

/// Dense mapping from a level's vertices onto the game graph.
#[derive(Clone, Debug, PartialEq)]
pub struct CrossTable {
    header: CrossTableHeader,
    cells: Vec<Cell>,
}

impl CrossTable {
    /// Creates a table for a graph with the given digest and vertex count.
    pub fn new(
        game_guid: GraphGuid,
        game_vertex_count: u32,
        cells: Vec<Cell>,
    ) -> Result<Self, GraphError> {
        let level_vertex_count =
            u32::try_from(cells.len()).map_err(|_| GraphError::TooManyVertices {
                count: cells.len(),
            })?;
        Ok(Self {
            header: CrossTableHeader {
                version: CROSS_TABLE_VERSION,
                level_vertex_count,
                game_vertex_count,
                game_guid,
            },
            cells,
        })
    }

    /// Compiles a table for `level` by snapping every level vertex to the
    /// nearest game vertex the level owns.
    ///
    /// `level_points` lists the level's navigation vertices in level-local
    /// coordinates, indexed by [`LevelVertexId`].
    pub fn compile(
        graph: &GameGraph,
        level: LevelId,
        level_points: &[Vec3],
    ) -> Result<Self, GraphError> {
        let anchors: Vec<(GameVertexId, Vec3)> = graph
            .vertices_in_level(level)
            .map(|vertex| (vertex.id(), vertex.level_point()))
            .collect();
        if anchors.is_empty() {
            return Err(GraphError::EmptyLevel { level });
        }

        let cells = level_points
            .iter()
            .map(|point| {
                let (id, distance) = anchors
                    .iter()
                    .map(|(id, anchor)| (*id, point.distance(*anchor)))
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .unwrap_or((anchors[0].0, f32::INFINITY));
                Cell::new(id, distance)
            })
            .collect();

        Self::new(graph.guid(), graph.vertex_count(), cells)
    }

    /// Reads a table from disk, checking only its internal consistency.
    pub fn load(path: &Path) -> Result<Self, GraphError> {
        let bytes = fs::read(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: CrossTableFile =
            decode_checked(path, &bytes, CROSS_TABLE_MAGIC, CROSS_TABLE_VERSION, "cross-table")?;

        let declared = file.header.level_vertex_count;
        if usize::try_from(declared).ok() != Some(file.cells.len()) {
            return Err(GraphError::CellCountMismatch {
                path: path.to_path_buf(),
                declared,
                stored: file.cells.len(),
            });
        }

        Ok(Self {
            header: file.header,
            cells: file.cells,
        })
    }

    /// Reads a table and verifies that it belongs to a graph with the given
    /// digest and vertex count.
    pub fn load_for_graph(
        path: &Path,
        game_guid: GraphGuid,
        game_vertex_count: u32,
    ) -> Result<Self, GraphError> {
        let table = Self::load(path)?;
        if table.header.game_guid != game_guid
            || table.header.game_vertex_count != game_vertex_count
        {
            return Err(GraphError::GraphMismatch {
                path: path.to_path_buf(),
            });
        }

        if let Some((level_vertex, cell)) = table
            .cells
            .iter()
            .zip(0u32..)
            .map(|(cell, id)| (LevelVertexId::new(id), cell))
            .find(|(_, cell)| cell.game_vertex_id().get() >= game_vertex_count)
        {
            return Err(GraphError::DanglingCell {
                path: path.to_path_buf(),
                level_vertex,
                game_vertex: cell.game_vertex_id(),
            });
        }

        info!(
            path = %path.display(),
            cells = table.cells.len(),
            "Loaded cross-table"
        );
        Ok(table)
    }

    /// Writes the table to disk, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), GraphError> {
        #[derive(Serialize)]
        struct CrossTableFileRef<'a> {
            magic: [u8; 4],
            header: &'a CrossTableHeader,
            cells: &'a [Cell],
        }

        let bytes = bincode::serialize(&CrossTableFileRef {
            magic: CROSS_TABLE_MAGIC,
            header: &self.header,
            cells: &self.cells,
        })
        .map_err(|source| GraphError::Encode {
            what: "cross-table",
            source,
        })?;
        write_bytes(path, &bytes)
    }

    /// Header describing the table.
    #[must_use]
    pub const fn header(&self) -> &CrossTableHeader {
        &self.header
    }

    /// Cell describing the level vertex `id`.
    pub fn vertex(&self, id: LevelVertexId) -> Result<&Cell, GraphError> {
        self.cells
            .get(id.index())
            .ok_or(GraphError::LevelVertexOutOfRange {
                id,
                count: self.header.level_vertex_count,
            })
    }

    /// All cells indexed by level vertex id.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// Lazily populated cross-tables keyed by level.
///
/// Each level holds at most one table. Tables stay cached until the owning
/// graph is dropped or [`clear`](Self::clear) is called.
#[derive(Debug, Default)]
pub struct CrossTableCache {
    tables: HashMap<LevelId, CrossTable>,
}

impl CrossTableCache {
    /// Cached table for `level`, if one was loaded.
    #[must_use]
    pub fn find(&self, level: LevelId) -> Option<&CrossTable> {
        self.tables.get(&level)
    }

    /// Returns the cached table for `level`, running `load` on a miss.
    ///
    /// A failing `load` leaves the cache untouched.
    pub fn get_or_load<F>(&mut self, level: LevelId, load: F) -> Result<&CrossTable, GraphError>
    where
        F: FnOnce() -> Result<CrossTable, GraphError>,
    {
        match self.tables.entry(level) {
            Entry::Occupied(entry) => {
                debug!(level = %level, "Cross-table cache hit");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let table = load()?;
                Ok(entry.insert(table))
            }
        }
    }

    /// Number of cached tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Reports whether no table is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Releases every cached table.
    pub fn clear(&mut self) {
        self.tables.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(cells: usize) -> CrossTable {
        let cells = (0..cells)
            .map(|index| Cell::new(GameVertexId::new(index as u32 % 3), 1.0))
            .collect();
        CrossTable::new(GraphGuid::from_bytes([7; 16]), 3, cells).expect("table")
    }

    #[test]
    fn vertex_is_bounds_checked() {
        let table = table(2);
        assert_eq!(
            table.vertex(LevelVertexId::new(1)).expect("in range").game_vertex_id(),
            GameVertexId::new(1)
        );
        assert!(matches!(
            table.vertex(LevelVertexId::new(2)),
            Err(GraphError::LevelVertexOutOfRange { count: 2, .. })
        ));
    }

    #[test]
    fn saved_table_loads_for_matching_graph() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("escape").join("level.gct");
        let original = table(5);

        original.save(&path).expect("save");
        let loaded =
            CrossTable::load_for_graph(&path, GraphGuid::from_bytes([7; 16]), 3).expect("load");
        assert_eq!(loaded, original);
    }

    #[test]
    fn load_for_graph_rejects_other_graphs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("level.gct");
        table(5).save(&path).expect("save");

        let error = CrossTable::load_for_graph(&path, GraphGuid::from_bytes([8; 16]), 3)
            .expect_err("different guid");
        assert!(matches!(error, GraphError::GraphMismatch { .. }));
    }

    #[test]
    fn load_for_graph_rejects_dangling_cells() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("level.gct");
        let guid = GraphGuid::from_bytes([1; 16]);
        let cells = vec![
            Cell::new(GameVertexId::new(0), 0.0),
            Cell::new(GameVertexId::new(4), 0.0),
        ];
        CrossTable::new(guid, 2, cells)
            .expect("table")
            .save(&path)
            .expect("save");

        let error = CrossTable::load_for_graph(&path, guid, 2).expect_err("dangling");
        assert!(matches!(
            error,
            GraphError::DanglingCell { level_vertex, .. } if level_vertex == LevelVertexId::new(1)
        ));
    }

    #[test]
    fn cache_keeps_the_first_loaded_table() {
        let mut cache = CrossTableCache::default();
        let level = LevelId::new(2);

        let first = cache.get_or_load(level, || Ok(table(4))).expect("load") as *const CrossTable;
        let second = cache
            .get_or_load(level, || panic!("cache hit must not reload"))
            .expect("hit") as *const CrossTable;

        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_load_leaves_cache_empty() {
        let mut cache = CrossTableCache::default();
        let error = cache
            .get_or_load(LevelId::new(0), || CrossTable::load(Path::new("/nonexistent/level.gct")))
            .expect_err("missing file");

        assert!(matches!(error, GraphError::Io { .. }));
        assert!(cache.is_empty());
        assert!(cache.find(LevelId::new(0)).is_none());
    }
}
