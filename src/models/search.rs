//! Search-related models for queries and results.

use serde::{Deserialize, Serialize};

use super::document::Document;

/// Answer returned when retrieval finds nothing to ground a response on.
pub const NO_RELEVANT_DOCUMENTS: &str = "No relevant documents found for your query.";

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// Machine-parseable JSON format
    Json,
    /// Documentation-friendly Markdown format
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// A stored document paired with its similarity to a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub document: Document,
    #[serde(rename = "similarity")]
    pub score: f32,
}

/// Result of a full retrieve-then-generate query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAnswer {
    /// Query that was executed
    pub query: String,

    /// Generated answer, or the no-documents sentinel
    pub answer: String,

    /// Retrieved context, best match first
    pub results: Vec<SearchResult>,

    /// Query execution time in milliseconds
    pub duration_ms: u64,
}

impl QueryAnswer {
    /// An answer produced without consulting the generator.
    pub fn no_documents(query: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            query: query.into(),
            answer: NO_RELEVANT_DOCUMENTS.to_string(),
            results: Vec::new(),
            duration_ms,
        }
    }

    /// Check whether retrieval found anything.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
