#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Surface of the game graph exposed to scripted AI.
//!
//! Scripts never hold the graph directly. Every entry point receives the
//! [`Session`] it operates on and hands back either plain values, views that
//! borrow from the session, or owned tables. Which of the latter two a caller
//! receives is encoded in the signature: [`ScriptBridge::cross_table_for_level`]
//! lends a table that stays cached in the graph, while
//! [`ScriptBridge::adopt_cross_table_for_level`] transfers a fresh table to
//! the caller.

use glam::{Vec3, Vec4};
use level_graph_core::{GameVertexId, LevelId, LevelVertexId};
use level_graph_world::{CrossTable, GameGraph, GraphError, Session, Vertex};

/// Read-only projection of a game vertex handed to scripts.
#[derive(Clone, Copy, Debug)]
pub struct VertexView<'session> {
    vertex: &'session Vertex,
}

impl<'session> VertexView<'session> {
    /// Identifier of the vertex.
    #[must_use]
    pub fn id(&self) -> GameVertexId {
        self.vertex.id()
    }

    /// Position in the owning level's coordinate space.
    #[must_use]
    pub fn level_point(&self) -> Vec3 {
        self.vertex.level_point()
    }

    /// Position in the global game coordinate space.
    #[must_use]
    pub fn game_point(&self) -> Vec3 {
        self.vertex.game_point()
    }

    /// Level owning the vertex.
    #[must_use]
    pub fn level_id(&self) -> LevelId {
        self.vertex.level_id()
    }

    /// Level navigation vertex the game vertex sits on.
    #[must_use]
    pub fn level_vertex_id(&self) -> LevelVertexId {
        self.vertex.level_vertex_id()
    }

    /// Classification bytes widened into a vector.
    #[must_use]
    pub fn mask(&self) -> Vec4 {
        self.vertex.mask_vector()
    }

    /// Whether planners may route through the vertex.
    #[must_use]
    pub fn accessible(&self) -> bool {
        self.vertex.accessible()
    }
}

/// Stateless entry points mirroring what scripts may call.
#[derive(Debug, Default)]
pub struct ScriptBridge;

impl ScriptBridge {
    /// Game graph of the session.
    #[must_use]
    pub fn game_graph<'session>(&self, session: &'session Session) -> &'session GameGraph {
        session.graph()
    }

    /// Projection of the vertex addressed by `id`.
    pub fn vertex<'session>(
        &self,
        session: &'session Session,
        id: GameVertexId,
    ) -> Result<VertexView<'session>, GraphError> {
        session
            .graph()
            .vertex(id)
            .map(|vertex| VertexView { vertex })
    }

    /// Total number of game vertices.
    #[must_use]
    pub fn vertex_count(&self, session: &Session) -> u32 {
        session.graph().vertex_count()
    }

    /// Reports whether `id` is a valid game vertex.
    #[must_use]
    pub fn valid_vertex_id(&self, session: &Session, id: GameVertexId) -> bool {
        session.graph().valid_vertex_id(id)
    }

    /// Traversability of the vertex addressed by `id`.
    pub fn accessible(&self, session: &Session, id: GameVertexId) -> Result<bool, GraphError> {
        session.graph().accessible(id)
    }

    /// Marks the vertex addressed by `id` as traversable or blocked.
    pub fn set_accessible(
        &self,
        session: &mut Session,
        id: GameVertexId,
        value: bool,
    ) -> Result<(), GraphError> {
        session.graph_mut().set_accessible(id, value)
    }

    /// Cross-table of the session's current level.
    #[must_use]
    pub fn cross_table<'session>(&self, session: &'session Session) -> Option<&'session CrossTable> {
        session.cross_table()
    }

    /// Cross-table of `level_name`, lent from the graph's cache.
    ///
    /// The table is loaded on first request and then shared by every later
    /// call; callers never own it.
    pub fn cross_table_for_level<'session>(
        &self,
        session: &'session mut Session,
        level_name: &str,
    ) -> Result<Option<&'session CrossTable>, GraphError> {
        session.graph_mut().cross_table_for_level(level_name)
    }

    /// Cross-table of `level_name`, freshly loaded and owned by the caller.
    pub fn adopt_cross_table_for_level(
        &self,
        session: &Session,
        level_name: &str,
    ) -> Result<Option<CrossTable>, GraphError> {
        session.graph().adopt_cross_table_for_level(level_name)
    }

    /// Game vertex the level vertex `local` maps onto.
    pub fn cell_game_vertex_id(
        &self,
        table: &CrossTable,
        local: LevelVertexId,
    ) -> Result<GameVertexId, GraphError> {
        table.vertex(local).map(|cell| cell.game_vertex_id())
    }
}
