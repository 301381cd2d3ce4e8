//! Explicit owner of the graph used by AI subsystems.

use level_graph_core::LevelId;

use crate::{CrossTable, GameGraph, GraphError, SessionConfig};

/// Game-logic context owning the game graph and the current level's
/// cross-table.
///
/// Subsystems receive the session (or the graph inside it) by reference; there
/// is no ambient accessor.
#[derive(Debug)]
pub struct Session {
    graph: GameGraph,
    current_level: Option<LevelId>,
    cross_table: Option<CrossTable>,
}

impl Session {
    /// Wraps an already loaded graph with no current level.
    #[must_use]
    pub fn from_graph(graph: GameGraph) -> Self {
        Self {
            graph,
            current_level: None,
            cross_table: None,
        }
    }

    /// Loads the graph described by `config` and, if a current level is
    /// configured, that level's cross-table.
    pub fn open(config: &SessionConfig) -> Result<Self, GraphError> {
        let graph = GameGraph::load(&config.graph, config.layout())?;
        let mut session = Self::from_graph(graph);
        if let Some(level) = config.current_level.as_deref() {
            session.enter_level(level)?;
        }
        Ok(session)
    }

    /// Makes `level_name` the current level, loading its cross-table.
    ///
    /// Unlike cross-table lookups, an unknown name is an error here: the
    /// session cannot run on a level the graph does not cover.
    pub fn enter_level(&mut self, level_name: &str) -> Result<(), GraphError> {
        let level = self
            .graph
            .levels()
            .by_name(level_name)
            .map(|level| level.id())
            .ok_or_else(|| GraphError::UnknownLevel {
                name: level_name.to_owned(),
            })?;
        let table = self
            .graph
            .adopt_cross_table_for_level(level_name)?
            .ok_or_else(|| GraphError::UnknownLevel {
                name: level_name.to_owned(),
            })?;

        self.current_level = Some(level);
        self.cross_table = Some(table);
        Ok(())
    }

    /// Level the session currently runs, if any.
    #[must_use]
    pub const fn current_level(&self) -> Option<LevelId> {
        self.current_level
    }

    /// Cross-table of the current level.
    #[must_use]
    pub fn cross_table(&self) -> Option<&CrossTable> {
        self.cross_table.as_ref()
    }

    /// Game graph owned by the session.
    #[must_use]
    pub const fn graph(&self) -> &GameGraph {
        &self.graph
    }

    /// Mutable access for gameplay systems that toggle vertex state or
    /// populate the cross-table cache.
    pub fn graph_mut(&mut self) -> &mut GameGraph {
        &mut self.graph
    }
}
