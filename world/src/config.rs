//! Session configuration and resource path layout.

use std::{
    fs,
    path::{Path, PathBuf},
};

use level_graph_core::CROSS_TABLE_NAME;
use serde::{Deserialize, Serialize};

use crate::GraphError;

/// Locates per-level resources below a shared levels directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceLayout {
    levels_root: PathBuf,
    cross_table_name: String,
}

impl ResourceLayout {
    /// Creates a layout rooted at `levels_root` using the default cross-table name.
    #[must_use]
    pub fn new(levels_root: impl Into<PathBuf>) -> Self {
        Self::with_cross_table_name(levels_root, CROSS_TABLE_NAME)
    }

    /// Creates a layout with an explicit cross-table resource name.
    #[must_use]
    pub fn with_cross_table_name(
        levels_root: impl Into<PathBuf>,
        cross_table_name: impl Into<String>,
    ) -> Self {
        Self {
            levels_root: levels_root.into(),
            cross_table_name: cross_table_name.into(),
        }
    }

    /// Directory that holds one subdirectory per level.
    #[must_use]
    pub fn levels_root(&self) -> &Path {
        &self.levels_root
    }

    /// File name of the cross-table inside each level directory.
    #[must_use]
    pub fn cross_table_name(&self) -> &str {
        &self.cross_table_name
    }

    /// Path of the cross-table resource belonging to `level_name`.
    #[must_use]
    pub fn cross_table_path(&self, level_name: &str) -> PathBuf {
        self.levels_root
            .join(level_name)
            .join(&self.cross_table_name)
    }
}

/// Settings required to open a [`Session`](crate::Session).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Compiled game graph file.
    pub graph: PathBuf,
    /// Directory holding one subdirectory per level.
    pub levels_root: PathBuf,
    /// Cross-table resource name inside each level directory.
    #[serde(default = "default_cross_table_name")]
    pub cross_table_name: String,
    /// Level whose cross-table is loaded eagerly when the session opens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_level: Option<String>,
}

fn default_cross_table_name() -> String {
    CROSS_TABLE_NAME.to_owned()
}

impl SessionConfig {
    /// Reads a TOML configuration file.
    ///
    /// Relative paths inside the file are resolved against its directory.
    pub fn from_path(path: &Path) -> Result<Self, GraphError> {
        let contents = fs::read_to_string(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse(&contents, base).map_err(|source| GraphError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses TOML contents, resolving relative paths against `base`.
    pub fn parse(contents: &str, base: &Path) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(contents)?;
        config.graph = base.join(&config.graph);
        config.levels_root = base.join(&config.levels_root);
        Ok(config)
    }

    /// Resource layout described by the configuration.
    #[must_use]
    pub fn layout(&self) -> ResourceLayout {
        ResourceLayout::with_cross_table_name(&self.levels_root, &self.cross_table_name)
    }
}
