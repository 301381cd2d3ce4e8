//! The global game graph spanning every level.

use std::path::Path;

use level_graph_core::{GameVertexId, GraphGuid, LevelId, VertexMask};
use tracing::{info, warn};

use crate::{
    resource::{read_graph, write_graph, GraphPayload},
    CrossTable, CrossTableCache, Edge, GraphError, LevelDescriptor, LevelDirectory,
    ResourceLayout, Vertex, VertexRecord, VertexStore,
};

/// Navigation graph over all levels, together with the cross-tables loaded
/// for it so far.
#[derive(Debug)]
pub struct GameGraph {
    guid: GraphGuid,
    vertices: VertexStore,
    levels: LevelDirectory,
    layout: ResourceLayout,
    cross_tables: CrossTableCache,
}

impl GameGraph {
    /// Builds a graph from its decoded payload.
    ///
    /// Every vertex must belong to a declared level and every edge must point
    /// at an existing vertex. The guid is taken over the levels in id order,
    /// which is the order [`GameGraph::to_payload`] writes them back in.
    pub fn from_payload(payload: GraphPayload, layout: ResourceLayout) -> Result<Self, GraphError> {
        let levels = LevelDirectory::from_descriptors(payload.levels)?;
        let canonical = GraphPayload {
            levels: levels.iter().cloned().collect(),
            vertices: payload.vertices,
        };
        let guid = canonical.guid()?;
        let vertices = VertexStore::from_records(canonical.vertices)?;

        for vertex in vertices.iter() {
            if levels.by_id(vertex.level_id()).is_none() {
                return Err(GraphError::UnknownVertexLevel {
                    vertex: vertex.id(),
                    level: vertex.level_id(),
                });
            }
            if let Some(edge) = vertex
                .edges()
                .iter()
                .find(|edge| !vertices.contains(edge.target()))
            {
                return Err(GraphError::DanglingEdge {
                    from: vertex.id(),
                    to: edge.target(),
                });
            }
        }

        Ok(Self {
            guid,
            vertices,
            levels,
            layout,
            cross_tables: CrossTableCache::default(),
        })
    }

    /// Loads a graph file; cross-tables are later resolved through `layout`.
    pub fn load(path: &Path, layout: ResourceLayout) -> Result<Self, GraphError> {
        let graph = Self::from_payload(read_graph(path)?, layout)?;
        info!(
            path = %path.display(),
            vertices = graph.vertex_count(),
            levels = graph.levels.len(),
            guid = %graph.guid,
            "Loaded game graph"
        );
        Ok(graph)
    }

    /// Writes the graph to disk.
    ///
    /// Runtime state (accessibility flags, cached cross-tables) is not
    /// persisted; masks are written as currently set.
    pub fn save(&self, path: &Path) -> Result<(), GraphError> {
        write_graph(path, &self.to_payload())
    }

    /// Persistable form of the graph.
    #[must_use]
    pub fn to_payload(&self) -> GraphPayload {
        GraphPayload {
            levels: self.levels.iter().cloned().collect(),
            vertices: self.vertices.iter().map(Vertex::to_record).collect(),
        }
    }

    /// Digest of the payload the graph was built from.
    #[must_use]
    pub const fn guid(&self) -> GraphGuid {
        self.guid
    }

    /// Total number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len()
    }

    /// Reports whether `id` addresses a vertex of this graph.
    #[must_use]
    pub fn valid_vertex_id(&self, id: GameVertexId) -> bool {
        self.vertices.contains(id)
    }

    /// Vertex addressed by `id`.
    pub fn vertex(&self, id: GameVertexId) -> Result<&Vertex, GraphError> {
        self.vertices.get(id)
    }

    /// Identifier of a vertex obtained from this graph.
    #[must_use]
    pub const fn vertex_id(&self, vertex: &Vertex) -> GameVertexId {
        vertex.id()
    }

    /// Outgoing edges of the vertex addressed by `id`.
    pub fn neighbours(&self, id: GameVertexId) -> Result<&[Edge], GraphError> {
        Ok(self.vertices.get(id)?.edges())
    }

    /// Whether AI planners may currently route through `id`.
    pub fn accessible(&self, id: GameVertexId) -> Result<bool, GraphError> {
        Ok(self.vertices.get(id)?.accessible())
    }

    /// Marks `id` as traversable or blocked.
    pub fn set_accessible(&mut self, id: GameVertexId, value: bool) -> Result<(), GraphError> {
        self.vertices.set_accessible(id, value)
    }

    /// Replaces the classification bytes of `id`.
    pub fn set_mask(&mut self, id: GameVertexId, mask: VertexMask) -> Result<(), GraphError> {
        self.vertices.set_mask(id, mask)
    }

    /// Vertices owned by `level`, in identifier order.
    pub fn vertices_in_level(&self, level: LevelId) -> impl Iterator<Item = &Vertex> {
        self.vertices
            .iter()
            .filter(move |vertex| vertex.level_id() == level)
    }

    /// Levels covered by the graph.
    #[must_use]
    pub const fn levels(&self) -> &LevelDirectory {
        &self.levels
    }

    /// Layout used to locate per-level resources.
    #[must_use]
    pub const fn layout(&self) -> &ResourceLayout {
        &self.layout
    }

    /// Cross-tables loaded so far.
    #[must_use]
    pub const fn cross_tables(&self) -> &CrossTableCache {
        &self.cross_tables
    }

    /// Cached cross-table for `level`; absence is not an error.
    #[must_use]
    pub fn find_cross_table_for_level(&self, level: LevelId) -> Option<&CrossTable> {
        self.cross_tables.find(level)
    }

    /// Cross-table of the level named `level_name`, loaded on first request.
    ///
    /// The returned table stays owned by the graph; later calls for the same
    /// level return the same instance. Unknown names are reported and yield
    /// `Ok(None)` without touching the cache. Load failures propagate and
    /// leave the cache unchanged.
    pub fn cross_table_for_level(
        &mut self,
        level_name: &str,
    ) -> Result<Option<&CrossTable>, GraphError> {
        let Some(level) = self.resolve_level(level_name) else {
            return Ok(None);
        };
        let level_id = level.id();
        let path = self.layout.cross_table_path(level.name());
        let (guid, vertex_count) = (self.guid, self.vertex_count());

        let table = self.cross_tables.get_or_load(level_id, || {
            CrossTable::load_for_graph(&path, guid, vertex_count)
        })?;
        Ok(Some(table))
    }

    /// Freshly loaded cross-table of the level named `level_name`, owned by
    /// the caller.
    ///
    /// The cache is neither consulted nor populated.
    pub fn adopt_cross_table_for_level(
        &self,
        level_name: &str,
    ) -> Result<Option<CrossTable>, GraphError> {
        let Some(level) = self.resolve_level(level_name) else {
            return Ok(None);
        };
        let path = self.layout.cross_table_path(level.name());
        CrossTable::load_for_graph(&path, self.guid, self.vertex_count()).map(Some)
    }

    /// Drops every cached cross-table.
    pub fn release_cross_tables(&mut self) {
        self.cross_tables.clear();
    }

    fn resolve_level(&self, level_name: &str) -> Option<&LevelDescriptor> {
        let level = self.levels.by_name(level_name);
        if level.is_none() {
            warn!(level = level_name, "Unknown level");
        }
        level
    }
}

/// Incrementally assembles a [`GameGraph`] payload.
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    payload: GraphPayload,
}

impl GraphBuilder {
    /// Declares a level and returns its identifier.
    pub fn add_level(
        &mut self,
        name: impl Into<String>,
        offset: glam::Vec3,
    ) -> Result<LevelId, GraphError> {
        let id = u8::try_from(self.payload.levels.len())
            .map(LevelId::new)
            .map_err(|_| GraphError::TooManyLevels)?;
        let name = name.into();
        self.payload
            .levels
            .push(LevelDescriptor::new(id, name.clone(), offset, name));
        Ok(id)
    }

    /// Appends a vertex and returns its identifier.
    pub fn add_vertex(&mut self, record: VertexRecord) -> Result<GameVertexId, GraphError> {
        let count = self.payload.vertices.len();
        let id = u32::try_from(count)
            .map(GameVertexId::new)
            .map_err(|_| GraphError::TooManyVertices { count })?;
        self.payload.vertices.push(record);
        Ok(id)
    }

    /// Connects two vertices in both directions.
    ///
    /// The distance defaults to the game-space length between the vertices.
    pub fn connect(&mut self, a: GameVertexId, b: GameVertexId) -> Result<(), GraphError> {
        let count = u32::try_from(self.payload.vertices.len()).unwrap_or(u32::MAX);
        let point = |id: GameVertexId| {
            self.payload
                .vertices
                .get(id.index())
                .map(|record| record.game_point)
                .ok_or(GraphError::VertexOutOfRange { id, count })
        };
        let distance = point(a)?.distance(point(b)?);

        self.payload.vertices[a.index()].edges.push(Edge::new(b, distance));
        self.payload.vertices[b.index()].edges.push(Edge::new(a, distance));
        Ok(())
    }

    /// Validates the payload and builds the graph.
    pub fn build(self, layout: ResourceLayout) -> Result<GameGraph, GraphError> {
        GameGraph::from_payload(self.payload, layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use level_graph_core::LevelVertexId;

    fn record(level: LevelId, local: u32, x: f32) -> VertexRecord {
        VertexRecord {
            level_point: Vec3::new(x, 0.0, 0.0),
            game_point: Vec3::new(x, 0.0, 0.0),
            level_id: level,
            level_vertex_id: LevelVertexId::new(local),
            mask: VertexMask::default(),
            edges: Vec::new(),
        }
    }

    fn two_vertex_graph() -> GameGraph {
        let mut builder = GraphBuilder::default();
        let level = builder.add_level("escape", Vec3::ZERO).expect("level");
        let a = builder.add_vertex(record(level, 0, 0.0)).expect("vertex");
        let b = builder.add_vertex(record(level, 3, 4.0)).expect("vertex");
        builder.connect(a, b).expect("connect");
        builder.build(ResourceLayout::new("levels")).expect("graph")
    }

    #[test]
    fn connect_adds_symmetric_edges() {
        let graph = two_vertex_graph();
        let forward = graph.neighbours(GameVertexId::new(0)).expect("vertex");
        let backward = graph.neighbours(GameVertexId::new(1)).expect("vertex");

        assert_eq!(forward, &[Edge::new(GameVertexId::new(1), 4.0)]);
        assert_eq!(backward, &[Edge::new(GameVertexId::new(0), 4.0)]);
    }

    #[test]
    fn connect_rejects_unknown_vertices() {
        let mut builder = GraphBuilder::default();
        let level = builder.add_level("escape", Vec3::ZERO).expect("level");
        let a = builder.add_vertex(record(level, 0, 0.0)).expect("vertex");
        assert!(matches!(
            builder.connect(a, GameVertexId::new(5)),
            Err(GraphError::VertexOutOfRange { .. })
        ));
    }

    #[test]
    fn vertex_id_reverses_vertex_lookup() {
        let graph = two_vertex_graph();
        let id = GameVertexId::new(1);
        let vertex = graph.vertex(id).expect("vertex");
        assert_eq!(graph.vertex_id(vertex), id);
        assert_eq!(vertex.level_vertex_id(), LevelVertexId::new(3));
    }

    #[test]
    fn accessibility_is_rejected_for_invalid_ids() {
        let mut graph = two_vertex_graph();
        let invalid = GameVertexId::new(2);
        assert!(!graph.valid_vertex_id(invalid));
        assert!(graph.accessible(invalid).is_err());
        assert!(graph.set_accessible(invalid, false).is_err());
    }

    #[test]
    fn vertices_with_undeclared_levels_are_rejected() {
        let mut builder = GraphBuilder::default();
        let _ = builder
            .add_vertex(record(LevelId::new(3), 0, 0.0))
            .expect("vertex");
        assert!(matches!(
            builder.build(ResourceLayout::new("levels")),
            Err(GraphError::UnknownVertexLevel { .. })
        ));
    }

    #[test]
    fn dangling_edges_are_rejected() {
        let mut builder = GraphBuilder::default();
        let level = builder.add_level("escape", Vec3::ZERO).expect("level");
        let mut dangling = record(level, 0, 0.0);
        dangling.edges.push(Edge::new(GameVertexId::new(9), 1.0));
        let _ = builder.add_vertex(dangling).expect("vertex");

        assert!(matches!(
            builder.build(ResourceLayout::new("levels")),
            Err(GraphError::DanglingEdge { .. })
        ));
    }

    #[test]
    fn unknown_level_lookup_returns_none_without_caching() {
        let mut graph = two_vertex_graph();
        assert!(graph
            .cross_table_for_level("nonexistent-level")
            .expect("unknown levels are not errors")
            .is_none());
        assert!(graph.cross_tables().is_empty());
    }

    #[test]
    fn saved_graph_keeps_its_guid() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("game.graph");
        let graph = two_vertex_graph();

        graph.save(&path).expect("save");
        let loaded = GameGraph::load(&path, ResourceLayout::new("levels")).expect("load");
        assert_eq!(loaded.guid(), graph.guid());
        assert_eq!(loaded.vertex_count(), 2);
    }

    #[test]
    fn guid_ignores_level_declaration_order() {
        let bar = LevelDescriptor::new(LevelId::new(1), "bar", Vec3::new(1000.0, 0.0, 0.0), "bar");
        let escape = LevelDescriptor::new(LevelId::new(0), "escape", Vec3::ZERO, "escape");
        let vertices = vec![record(LevelId::new(0), 0, 0.0), record(LevelId::new(1), 0, 5.0)];
        let unsorted = GraphPayload {
            levels: vec![bar.clone(), escape.clone()],
            vertices: vertices.clone(),
        };
        let sorted = GraphPayload {
            levels: vec![escape, bar],
            vertices,
        };

        let graph = GameGraph::from_payload(unsorted, ResourceLayout::new("levels")).expect("graph");
        let reloaded =
            GameGraph::from_payload(graph.to_payload(), ResourceLayout::new("levels")).expect("graph");
        let canonical = GameGraph::from_payload(sorted, ResourceLayout::new("levels")).expect("graph");

        assert_eq!(reloaded.guid(), graph.guid());
        assert_eq!(canonical.guid(), graph.guid());
    }
}
