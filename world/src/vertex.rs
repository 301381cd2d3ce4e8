//! Dense storage of game graph vertices.

use glam::{Vec3, Vec4};
use level_graph_core::{GameVertexId, LevelId, LevelVertexId, VertexMask};
use serde::{Deserialize, Serialize};

use crate::GraphError;

/// Directed connection between two game vertices.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    target: GameVertexId,
    distance: f32,
}

impl Edge {
    /// Creates an edge leading to `target`.
    #[must_use]
    pub const fn new(target: GameVertexId, distance: f32) -> Self {
        Self { target, distance }
    }

    /// Vertex reached by following the edge.
    #[must_use]
    pub const fn target(&self) -> GameVertexId {
        self.target
    }

    /// Travel distance along the edge in world units.
    #[must_use]
    pub const fn distance(&self) -> f32 {
        self.distance
    }
}

/// Persisted description of a vertex, before an identifier is assigned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    /// Position expressed in the owning level's coordinate space.
    pub level_point: Vec3,
    /// Position expressed in the global game coordinate space.
    pub game_point: Vec3,
    /// Level that owns the vertex.
    pub level_id: LevelId,
    /// Navigation vertex of the owning level the vertex sits on.
    pub level_vertex_id: LevelVertexId,
    /// Classification bytes attached to the vertex.
    pub mask: VertexMask,
    /// Outgoing connections.
    pub edges: Vec<Edge>,
}

/// Navigation node of the global game graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    id: GameVertexId,
    level_point: Vec3,
    game_point: Vec3,
    level_id: LevelId,
    level_vertex_id: LevelVertexId,
    mask: VertexMask,
    edges: Vec<Edge>,
    accessible: bool,
}

impl Vertex {
    fn from_record(id: GameVertexId, record: VertexRecord) -> Self {
        Self {
            id,
            level_point: record.level_point,
            game_point: record.game_point,
            level_id: record.level_id,
            level_vertex_id: record.level_vertex_id,
            mask: record.mask,
            edges: record.edges,
            accessible: true,
        }
    }

    pub(crate) fn to_record(&self) -> VertexRecord {
        VertexRecord {
            level_point: self.level_point,
            game_point: self.game_point,
            level_id: self.level_id,
            level_vertex_id: self.level_vertex_id,
            mask: self.mask,
            edges: self.edges.clone(),
        }
    }

    /// Identifier of the vertex within the game graph.
    #[must_use]
    pub const fn id(&self) -> GameVertexId {
        self.id
    }

    /// Position in the owning level's coordinate space.
    #[must_use]
    pub const fn level_point(&self) -> Vec3 {
        self.level_point
    }

    /// Position in the global game coordinate space.
    #[must_use]
    pub const fn game_point(&self) -> Vec3 {
        self.game_point
    }

    /// Level that owns the vertex.
    #[must_use]
    pub const fn level_id(&self) -> LevelId {
        self.level_id
    }

    /// Navigation vertex of the owning level the vertex sits on.
    #[must_use]
    pub const fn level_vertex_id(&self) -> LevelVertexId {
        self.level_vertex_id
    }

    /// Raw classification bytes.
    #[must_use]
    pub const fn mask(&self) -> VertexMask {
        self.mask
    }

    /// Classification bytes widened into a vector for scripted heuristics.
    #[must_use]
    pub fn mask_vector(&self) -> Vec4 {
        Vec4::from_array(self.mask.widened())
    }

    /// Outgoing connections of the vertex.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Whether AI planners may currently route through the vertex.
    #[must_use]
    pub const fn accessible(&self) -> bool {
        self.accessible
    }
}

/// Owns every vertex of the game graph, indexed by [`GameVertexId`].
#[derive(Clone, Debug, Default)]
pub struct VertexStore {
    vertices: Vec<Vertex>,
}

impl VertexStore {
    /// Assigns sequential identifiers to the provided records.
    pub fn from_records(records: Vec<VertexRecord>) -> Result<Self, GraphError> {
        let count = records.len();
        if u32::try_from(count).is_err() {
            return Err(GraphError::TooManyVertices { count });
        }

        let vertices = records
            .into_iter()
            .zip(0u32..)
            .map(|(record, id)| Vertex::from_record(GameVertexId::new(id), record))
            .collect();
        Ok(Self { vertices })
    }

    /// Number of stored vertices.
    #[must_use]
    pub fn len(&self) -> u32 {
        // from_records rejects stores that would not fit
        u32::try_from(self.vertices.len()).unwrap_or(u32::MAX)
    }

    /// Reports whether the store holds no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Reports whether `id` addresses a stored vertex.
    #[must_use]
    pub fn contains(&self, id: GameVertexId) -> bool {
        id.index() < self.vertices.len()
    }

    /// Vertex addressed by `id`.
    pub fn get(&self, id: GameVertexId) -> Result<&Vertex, GraphError> {
        let count = self.len();
        self.vertices
            .get(id.index())
            .ok_or(GraphError::VertexOutOfRange { id, count })
    }

    fn get_mut(&mut self, id: GameVertexId) -> Result<&mut Vertex, GraphError> {
        let count = self.len();
        self.vertices
            .get_mut(id.index())
            .ok_or(GraphError::VertexOutOfRange { id, count })
    }

    /// Updates the traversability flag of a vertex.
    pub fn set_accessible(&mut self, id: GameVertexId, value: bool) -> Result<(), GraphError> {
        self.get_mut(id)?.accessible = value;
        Ok(())
    }

    /// Replaces the classification bytes of a vertex.
    pub fn set_mask(&mut self, id: GameVertexId, mask: VertexMask) -> Result<(), GraphError> {
        self.get_mut(id)?.mask = mask;
        Ok(())
    }

    /// Iterator over the vertices in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }
}
