//! Error surface of the level graph.

use std::path::PathBuf;

use level_graph_core::{GameVertexId, LevelId, LevelVertexId};
use thiserror::Error;

/// Errors raised while loading, validating, or querying the game graph.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GraphError {
    /// A game vertex id fell outside `[0, vertex_count)`.
    #[error("game vertex {id} is out of range (graph holds {count} vertices)")]
    VertexOutOfRange {
        /// Offending identifier.
        id: GameVertexId,
        /// Number of vertices in the graph.
        count: u32,
    },

    /// A level vertex id fell outside the cross-table.
    #[error("level vertex {id} is out of range (cross-table holds {count} cells)")]
    LevelVertexOutOfRange {
        /// Offending identifier.
        id: LevelVertexId,
        /// Number of cells in the cross-table.
        count: u32,
    },

    /// A level name that an operation requires could not be resolved.
    #[error("unknown level `{name}`")]
    UnknownLevel {
        /// Name that failed to resolve.
        name: String,
    },

    /// A level owns no game vertices, so nothing can be mapped onto it.
    #[error("level {level} owns no game vertices")]
    EmptyLevel {
        /// Level without vertices.
        level: LevelId,
    },

    /// Reading or writing a resource failed.
    #[error("failed to access {}", .path.display())]
    Io {
        /// Resource path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A resource could not be decoded.
    #[error("failed to decode {}", .path.display())]
    Decode {
        /// Resource path.
        path: PathBuf,
        /// Underlying codec failure.
        #[source]
        source: bincode::Error,
    },

    /// A resource could not be encoded.
    #[error("failed to encode {what}")]
    Encode {
        /// Kind of resource being encoded.
        what: &'static str,
        /// Underlying codec failure.
        #[source]
        source: bincode::Error,
    },

    /// A resource did not start with the expected magic bytes.
    #[error("{} is not a {expected} resource", .path.display())]
    BadMagic {
        /// Resource path.
        path: PathBuf,
        /// Kind of resource that was expected.
        expected: &'static str,
    },

    /// A resource was written by an incompatible format version.
    #[error("{} uses format version {found}, expected {expected}", .path.display())]
    UnsupportedVersion {
        /// Resource path.
        path: PathBuf,
        /// Version stored in the file.
        found: u32,
        /// Version this build understands.
        expected: u32,
    },

    /// A cross-table header disagrees with the number of stored cells.
    #[error(
        "cross-table {} declares {declared} level vertices but stores {stored}",
        .path.display()
    )]
    CellCountMismatch {
        /// Resource path.
        path: PathBuf,
        /// Count declared by the header.
        declared: u32,
        /// Count actually stored.
        stored: usize,
    },

    /// A cross-table was compiled against a different game graph.
    #[error("cross-table {} was compiled against a different game graph", .path.display())]
    GraphMismatch {
        /// Resource path.
        path: PathBuf,
    },

    /// A cross-table cell points outside the game graph.
    #[error(
        "cross-table {} maps level vertex {level_vertex} to missing game vertex {game_vertex}",
        .path.display()
    )]
    DanglingCell {
        /// Resource path.
        path: PathBuf,
        /// Level vertex owning the cell.
        level_vertex: LevelVertexId,
        /// Game vertex the cell points at.
        game_vertex: GameVertexId,
    },

    /// An edge points outside the game graph.
    #[error("vertex {from} has an edge to missing vertex {to}")]
    DanglingEdge {
        /// Edge source.
        from: GameVertexId,
        /// Edge target.
        to: GameVertexId,
    },

    /// A vertex references a level that the graph does not declare.
    #[error("vertex {vertex} belongs to undeclared level {level}")]
    UnknownVertexLevel {
        /// Offending vertex.
        vertex: GameVertexId,
        /// Level it claims to belong to.
        level: LevelId,
    },

    /// Two levels share a name or an identifier.
    #[error("level `{name}` (id {id}) is declared more than once")]
    DuplicateLevel {
        /// Name of the duplicated level.
        name: String,
        /// Identifier of the duplicated level.
        id: LevelId,
    },

    /// The graph holds more vertices than a game vertex id can address.
    #[error("graph holds {count} vertices, more than a game vertex id can address")]
    TooManyVertices {
        /// Number of vertices supplied.
        count: usize,
    },

    /// More levels were declared than a level id can address.
    #[error("graph declares more than {} levels", u8::MAX as usize + 1)]
    TooManyLevels,

    /// A session configuration file could not be parsed.
    #[error("failed to parse session config {}", .path.display())]
    Config {
        /// Configuration path.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: toml::de::Error,
    },
}
