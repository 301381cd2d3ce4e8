//! On-disk encoding of the compiled game graph.
//!
//! A graph file is a bincode stream of a fixed magic, a format version and the
//! level and vertex payload. The payload bytes, with levels in id order,
//! double as the input of the graph digest, so re-encoding an unchanged graph
//! reproduces the same guid. Trailing bytes after the payload are rejected.

use std::{fs, path::Path};

use bincode::Options;
use level_graph_core::GraphGuid;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{GraphError, LevelDescriptor, VertexRecord};

pub(crate) const GRAPH_MAGIC: [u8; 4] = *b"LGGR";
pub(crate) const GRAPH_VERSION: u32 = 1;

/// Levels and vertices stored in a graph file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphPayload {
    /// Levels covered by the graph.
    pub levels: Vec<LevelDescriptor>,
    /// Vertices in identifier order.
    pub vertices: Vec<VertexRecord>,
}

impl GraphPayload {
    /// Digest identifying this payload.
    pub fn guid(&self) -> Result<GraphGuid, GraphError> {
        let bytes = bincode::serialize(self).map_err(|source| GraphError::Encode {
            what: "graph payload",
            source,
        })?;
        Ok(digest(&bytes))
    }
}

#[derive(Serialize, Deserialize)]
struct GraphFile {
    magic: [u8; 4],
    version: u32,
    payload: GraphPayload,
}

fn digest(bytes: &[u8]) -> GraphGuid {
    let hash = Sha256::digest(bytes);
    let mut guid = [0u8; 16];
    guid.copy_from_slice(&hash[..16]);
    GraphGuid::from_bytes(guid)
}

/// Reads and decodes a graph file.
pub fn read_graph(path: &Path) -> Result<GraphPayload, GraphError> {
    let bytes = fs::read(path).map_err(|source| GraphError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: GraphFile = decode_checked(path, &bytes, GRAPH_MAGIC, GRAPH_VERSION, "game graph")?;
    Ok(file.payload)
}

/// Encodes and writes a graph file.
pub fn write_graph(path: &Path, payload: &GraphPayload) -> Result<(), GraphError> {
    #[derive(Serialize)]
    struct GraphFileRef<'a> {
        magic: [u8; 4],
        version: u32,
        payload: &'a GraphPayload,
    }

    let bytes = bincode::serialize(&GraphFileRef {
        magic: GRAPH_MAGIC,
        version: GRAPH_VERSION,
        payload,
    })
    .map_err(|source| GraphError::Encode {
        what: "game graph",
        source,
    })?;
    write_bytes(path, &bytes)
}

/// Decodes a bincode resource after checking its magic and version prefix.
pub(crate) fn decode_checked<T>(
    path: &Path,
    bytes: &[u8],
    magic: [u8; 4],
    version: u32,
    expected: &'static str,
) -> Result<T, GraphError>
where
    T: serde::de::DeserializeOwned,
{
    if bytes.get(..4) != Some(&magic[..]) {
        return Err(GraphError::BadMagic {
            path: path.to_path_buf(),
            expected,
        });
    }

    let found = bytes
        .get(4..8)
        .and_then(|raw| <[u8; 4]>::try_from(raw).ok())
        .map(u32::from_le_bytes)
        .ok_or_else(|| GraphError::BadMagic {
            path: path.to_path_buf(),
            expected,
        })?;
    if found != version {
        return Err(GraphError::UnsupportedVersion {
            path: path.to_path_buf(),
            found,
            expected: version,
        });
    }

    bincode::options()
        .with_fixint_encoding()
        .reject_trailing_bytes()
        .deserialize(bytes)
        .map_err(|source| GraphError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

pub(crate) fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), GraphError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| GraphError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, bytes).map_err(|source| GraphError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use level_graph_core::{LevelId, LevelVertexId, VertexMask};

    fn payload() -> GraphPayload {
        GraphPayload {
            levels: vec![LevelDescriptor::new(LevelId::new(0), "escape", Vec3::ZERO, "escape")],
            vertices: vec![VertexRecord {
                level_point: Vec3::ONE,
                game_point: Vec3::ONE,
                level_id: LevelId::new(0),
                level_vertex_id: LevelVertexId::new(0),
                mask: VertexMask::default(),
                edges: Vec::new(),
            }],
        }
    }

    #[test]
    fn written_graph_reads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("game.graph");

        write_graph(&path, &payload()).expect("write");
        assert_eq!(read_graph(&path).expect("read"), payload());
    }

    #[test]
    fn guid_tracks_payload_content() {
        let original = payload().guid().expect("guid");
        assert_eq!(original, payload().guid().expect("guid"));

        let mut changed = payload();
        changed.vertices[0].game_point = Vec3::ZERO;
        assert_ne!(original, changed.guid().expect("guid"));
    }

    #[test]
    fn foreign_files_are_rejected_by_magic() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("game.graph");
        fs::write(&path, b"not a graph at all").expect("write");

        let error = read_graph(&path).expect_err("foreign file");
        assert!(matches!(error, GraphError::BadMagic { .. }));
    }

    #[test]
    fn future_versions_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("game.graph");
        let mut bytes = GRAPH_MAGIC.to_vec();
        bytes.extend_from_slice(&(GRAPH_VERSION + 1).to_le_bytes());
        fs::write(&path, bytes).expect("write");

        let error = read_graph(&path).expect_err("newer version");
        assert!(matches!(
            error,
            GraphError::UnsupportedVersion { found, .. } if found == GRAPH_VERSION + 1
        ));
    }

    #[test]
    fn trailing_bytes_report_decode_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("game.graph");
        write_graph(&path, &payload()).expect("write");
        let mut bytes = fs::read(&path).expect("read");
        bytes.extend_from_slice(b"junk");
        fs::write(&path, bytes).expect("append");

        assert!(matches!(
            read_graph(&path).expect_err("trailing junk"),
            GraphError::Decode { .. }
        ));
    }

    #[test]
    fn truncated_payload_reports_decode_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("game.graph");
        write_graph(&path, &payload()).expect("write");
        let bytes = fs::read(&path).expect("read");
        fs::write(&path, &bytes[..bytes.len() - 3]).expect("truncate");

        assert!(matches!(
            read_graph(&path).expect_err("truncated"),
            GraphError::Decode { .. }
        ));
    }
}
