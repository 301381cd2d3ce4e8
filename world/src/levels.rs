//! Registry of the levels covered by the game graph.

use std::collections::HashMap;

use glam::Vec3;
use level_graph_core::LevelId;
use serde::{Deserialize, Serialize};

use crate::GraphError;

/// Static description of a single level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    id: LevelId,
    name: String,
    offset: Vec3,
    section: String,
}

impl LevelDescriptor {
    /// Creates a descriptor for the level `name`.
    ///
    /// `offset` translates level-local coordinates into game coordinates and
    /// `section` names the configuration block holding the level's settings.
    #[must_use]
    pub fn new(id: LevelId, name: impl Into<String>, offset: Vec3, section: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            offset,
            section: section.into(),
        }
    }

    /// Identifier of the level.
    #[must_use]
    pub const fn id(&self) -> LevelId {
        self.id
    }

    /// Name of the level, which is also its resource directory.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Translation from level-local into game coordinates.
    #[must_use]
    pub const fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Configuration section describing the level.
    #[must_use]
    pub fn section(&self) -> &str {
        &self.section
    }
}

/// Maps level names and identifiers onto their descriptors.
#[derive(Clone, Debug, Default)]
pub struct LevelDirectory {
    levels: Vec<LevelDescriptor>,
    by_name: HashMap<String, usize>,
}

impl LevelDirectory {
    /// Builds a directory, rejecting duplicate names or identifiers.
    pub fn from_descriptors(mut levels: Vec<LevelDescriptor>) -> Result<Self, GraphError> {
        if levels.len() > usize::from(u8::MAX) + 1 {
            return Err(GraphError::TooManyLevels);
        }

        levels.sort_by_key(LevelDescriptor::id);
        if let Some(pair) = levels.windows(2).find(|pair| pair[0].id == pair[1].id) {
            return Err(GraphError::DuplicateLevel {
                name: pair[1].name.clone(),
                id: pair[1].id,
            });
        }

        let mut by_name = HashMap::with_capacity(levels.len());
        for (index, level) in levels.iter().enumerate() {
            if by_name.insert(level.name.clone(), index).is_some() {
                return Err(GraphError::DuplicateLevel {
                    name: level.name.clone(),
                    id: level.id,
                });
            }
        }

        Ok(Self { levels, by_name })
    }

    /// Looks a level up by its exact name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&LevelDescriptor> {
        self.by_name.get(name).map(|&index| &self.levels[index])
    }

    /// Looks a level up by identifier.
    #[must_use]
    pub fn by_id(&self, id: LevelId) -> Option<&LevelDescriptor> {
        self.levels
            .binary_search_by_key(&id, LevelDescriptor::id)
            .ok()
            .map(|index| &self.levels[index])
    }

    /// Number of registered levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Reports whether no levels are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Iterator over the levels ordered by identifier.
    pub fn iter(&self) -> impl Iterator<Item = &LevelDescriptor> {
        self.levels.iter()
    }
}
