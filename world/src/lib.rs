#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game graph state for AI navigation.
//!
//! The [`GameGraph`] owns every navigation vertex of the game world together
//! with the [`LevelDirectory`] describing the levels it spans. Cross-tables,
//! which translate a level's local vertex ids into game vertex ids, are loaded
//! on demand from the [`ResourceLayout`] and cached per level for the lifetime
//! of the graph. A [`Session`] owns the graph and is passed explicitly to the
//! systems that query it.

mod config;
mod cross_table;
mod error;
mod graph;
mod levels;
pub mod resource;
mod session;
mod vertex;

pub use config::{ResourceLayout, SessionConfig};
pub use cross_table::{CrossTable, CrossTableCache, CrossTableHeader};
pub use error::GraphError;
pub use graph::{GameGraph, GraphBuilder};
pub use levels::{LevelDescriptor, LevelDirectory};
pub use session::Session;
pub use vertex::{Edge, Vertex, VertexRecord, VertexStore};
