#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the level graph workspace.
//!
//! This crate defines the identifiers and plain value types that flow between
//! the authoritative graph, the scripting bridge, and adapters. The global
//! game graph addresses its vertices by [`GameVertexId`], every level indexes
//! its own navigation vertices by [`LevelVertexId`], and cross-tables map the
//! latter onto the former one [`Cell`] at a time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default file name of the per-level cross-table resource.
pub const CROSS_TABLE_NAME: &str = "level.gct";

/// Identifier of a vertex within the global game graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameVertexId(u32);

impl GameVertexId {
    /// Creates a new game vertex identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Index of the vertex inside dense vertex storage.
    #[must_use]
    pub fn index(&self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }
}

impl fmt::Display for GameVertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a vertex within a single level's navigation mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelVertexId(u32);

impl LevelVertexId {
    /// Creates a new level vertex identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Index of the vertex inside a dense per-level table.
    #[must_use]
    pub fn index(&self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }
}

impl fmt::Display for LevelVertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier assigned to a level when the graph is compiled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelId(u8);

impl LevelId {
    /// Creates a new level identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Four raw classification bytes attached to every game vertex.
///
/// Gameplay code treats the bytes as independent terrain or faction tags and
/// compares them component-wise against masks of the same shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexMask([u8; 4]);

impl VertexMask {
    /// Creates a mask from its raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Raw bytes of the mask.
    #[must_use]
    pub const fn bytes(&self) -> [u8; 4] {
        self.0
    }

    /// Widens each byte into an `f32` component.
    #[must_use]
    pub fn widened(&self) -> [f32; 4] {
        self.0.map(f32::from)
    }
}

/// Content digest identifying a compiled game graph.
///
/// Cross-tables record the digest of the graph they were compiled against so
/// that stale tables are rejected instead of silently mapping into the wrong
/// vertex range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphGuid([u8; 16]);

impl GraphGuid {
    /// Creates a digest from its raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Raw bytes of the digest.
    #[must_use]
    pub const fn bytes(&self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for GraphGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Single cross-table entry mapping a level vertex onto the game graph.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    game_vertex_id: GameVertexId,
    distance: f32,
}

impl Cell {
    /// Creates a cell pointing at the provided game vertex.
    #[must_use]
    pub const fn new(game_vertex_id: GameVertexId, distance: f32) -> Self {
        Self {
            game_vertex_id,
            distance,
        }
    }

    /// Game vertex nearest to the level vertex this cell describes.
    #[must_use]
    pub const fn game_vertex_id(&self) -> GameVertexId {
        self.game_vertex_id
    }

    /// Distance from the level vertex to its game vertex in world units.
    #[must_use]
    pub const fn distance(&self) -> f32 {
        self.distance
    }
}
