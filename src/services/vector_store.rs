//! Append-only vector store persisted as a single JSON document.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::models::{Embedding, StoreStats};

/// In-memory collection of embeddings in insertion order.
///
/// The whole store is rewritten on every [`VectorStore::save`]; there is no
/// incremental update, no delete, and no protection against two processes
/// writing the same file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorStore {
    embeddings: Vec<Embedding>,
}

impl VectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from `path`, or start empty when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No vector store at {}, starting empty", path.display());
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let store: VectorStore =
            serde_json::from_slice(&data).map_err(|source| StoreError::Format {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(
            "Loaded {} embeddings from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    /// Serialize the entire store to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(self).map_err(StoreError::Serialize)?;

        let io_err = |source: std::io::Error| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, data).map_err(io_err)?;

        debug!("Saved {} embeddings to {}", self.len(), path.display());
        Ok(())
    }

    /// Add an embedding. Callers check [`VectorStore::contains`] first.
    pub fn append(&mut self, embedding: Embedding) {
        self.embeddings.push(embedding);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.embeddings.iter().any(|e| e.id == id)
    }

    pub fn all(&self) -> &[Embedding] {
        &self.embeddings
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    /// Dimensionality fixed by the first stored vector.
    pub fn dimension(&self) -> Option<usize> {
        self.embeddings.first().map(|e| e.vector.len())
    }

    /// Document counts per extension and the raw vector footprint
    /// (`len * dimension * 4` bytes).
    pub fn stats(&self) -> StoreStats {
        let mut files_by_extension = BTreeMap::new();
        for embedding in &self.embeddings {
            *files_by_extension
                .entry(embedding.document.extension())
                .or_insert(0) += 1;
        }

        let dimension = self.dimension().unwrap_or(0);
        let bytes = self.len() * dimension * 4;

        StoreStats {
            total_documents: self.len() as u64,
            files_by_extension,
            dimension,
            database_size_mb: bytes as f64 / 1024.0 / 1024.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;

    fn embedding(path: &str, idx: usize, vector: Vec<f32>) -> Embedding {
        let doc = Document::new(path, idx, &format!("content of {path} #{idx}")).unwrap();
        Embedding::new(doc, vector)
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorStore::load(&dir.path().join("missing.json")).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.dimension(), None);
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, "{\"embeddings\": [oops").unwrap();

        let err = VectorStore::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Format { .. }));
    }

    #[test]
    fn test_append_and_contains() {
        let mut store = VectorStore::new();
        let first = embedding("/a.md", 0, vec![1.0, 0.0]);
        let id = first.id.clone();
        store.append(first);
        store.append(embedding("/a.md", 1, vec![0.0, 1.0]));

        assert!(store.contains(&id));
        assert!(!store.contains("0000000000000000"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.dimension(), Some(2));
        assert_eq!(store.all()[1].document.chunk_index, 1);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("db.json");

        let mut store = VectorStore::new();
        store.append(embedding("/a.md", 0, vec![0.1, 0.2, 0.3]));
        store.append(embedding("/b.txt", 0, vec![0.4, 0.5, 0.6]));
        store.save(&path).unwrap();

        let loaded = VectorStore::load(&path).unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        let mut store = VectorStore::new();
        store.append(embedding("/a.md", 0, vec![1.0]));
        store.append(embedding("/a.md", 1, vec![2.0]));
        store.save(&path).unwrap();

        VectorStore::new().save(&path).unwrap();
        assert!(VectorStore::load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_loads_original_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(
            &path,
            r#"{
  "embeddings": [
    {
      "id": "abc",
      "vector": [0.5, -0.5],
      "document": {
        "id": "abc",
        "content": "hello",
        "file_path": "notes/a.md",
        "chunk_idx": 0,
        "created": "2024-05-01T10:00:00.123456789+02:00"
      },
      "created": "2024-05-01T10:00:01Z"
    }
  ]
}"#,
        )
        .unwrap();

        let store = VectorStore::load(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.all()[0].document.source_path, "notes/a.md");
        assert_eq!(store.all()[0].vector, vec![0.5, -0.5]);
    }
}
