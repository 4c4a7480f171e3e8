use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::document_id;

/// A chunk of source text ready to be embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    #[serde(rename = "file_path")]
    pub source_path: String,
    #[serde(rename = "chunk_idx")]
    pub chunk_index: usize,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
}

/// The durable unit of the vector store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub id: String,
    pub vector: Vec<f32>,
    pub document: Document,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Build a document for chunk `chunk_index` of `source_path`.
    ///
    /// Returns `None` when the content is empty after trimming.
    pub fn new(source_path: &str, chunk_index: usize, content: &str) -> Option<Self> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }

        Some(Self {
            id: document_id(source_path, chunk_index),
            content: content.to_string(),
            source_path: source_path.to_string(),
            chunk_index,
            created_at: Utc::now(),
        })
    }

    /// File extension of the source path, with its leading dot.
    pub fn extension(&self) -> String {
        std::path::Path::new(&self.source_path)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default()
    }
}

impl Embedding {
    pub fn new(document: Document, vector: Vec<f32>) -> Self {
        Self {
            id: document.id.clone(),
            vector,
            document,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new_trims_content() {
        let doc = Document::new("/notes/a.md", 2, "  hello \n").unwrap();
        assert_eq!(doc.content, "hello");
        assert_eq!(doc.chunk_index, 2);
        assert_eq!(doc.id, document_id("/notes/a.md", 2));
    }

    #[test]
    fn test_document_new_rejects_blank() {
        assert!(Document::new("/notes/a.md", 0, " \n\t ").is_none());
    }

    #[test]
    fn test_extension() {
        let doc = Document::new("/src/main.go", 0, "package main").unwrap();
        assert_eq!(doc.extension(), ".go");
        let doc = Document::new("/LICENSE", 0, "MIT").unwrap();
        assert_eq!(doc.extension(), "");
    }

    #[test]
    fn test_embedding_serializes_with_file_keys() {
        let doc = Document::new("/a.txt", 0, "alpha").unwrap();
        let embedding = Embedding::new(doc, vec![0.5, 0.25]);
        let json = serde_json::to_value(&embedding).unwrap();

        assert_eq!(json["id"], json["document"]["id"]);
        assert_eq!(json["document"]["file_path"], "/a.txt");
        assert_eq!(json["document"]["chunk_idx"], 0);
        assert!(json["created"].is_string());
        assert_eq!(json["vector"][1], 0.25);
    }
}
