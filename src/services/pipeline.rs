//! Retrieval-augmented generation pipeline: extract, index, retrieve, answer.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::chunker::TextChunker;
use super::embedding::{Embedder, GeminiClient, Generator};
use super::rate_limiter::RateLimiter;
use super::retriever;
use super::vector_store::VectorStore;
use crate::error::{AppError, IndexError, QueryError, StoreError};
use crate::models::{
    Config, Document, Embedding, IndexReport, QueryAnswer, RateLimitConfig, SearchResult,
    StoreStats,
};
use crate::sources::FileNode;
use crate::utils::{CancellationToken, is_text_file};

/// Build the generation prompt from the query and retrieved passages.
pub fn build_prompt(query: &str, contexts: &[&str]) -> String {
    let context = contexts.join("\n\n");
    format!(
        "You are a helpful and knowledgeable assistant that answers questions using the provided context from code repositories and documentation.

Use the context below to answer the user's question. Be thorough and include relevant details, and explain technical concepts in a clear, accessible way.

If the context does not contain enough information to fully answer the question, say so and share what information you can. If the question is unrelated to the context, say so.

CONTEXT:
{context}

QUESTION: {query}

ANSWER:"
    )
}

/// Chunk every allow-listed file under `root` into documents, depth-first in
/// tree order. Files without content are skipped.
pub fn extract_documents(root: &FileNode, chunker: &TextChunker) -> Vec<Document> {
    let mut documents = Vec::new();
    extract_into(root, chunker, &mut documents);
    debug!("Extracted {} document chunks", documents.len());
    documents
}

fn extract_into(node: &FileNode, chunker: &TextChunker, documents: &mut Vec<Document>) {
    if !node.is_dir
        && is_text_file(&node.path)
        && let Some(content) = &node.content
    {
        let source_path = node.path.to_string_lossy();
        documents.extend(
            chunker
                .split(content)
                .iter()
                .enumerate()
                .filter_map(|(idx, chunk)| Document::new(&source_path, idx, chunk)),
        );
    }

    for child in &node.children {
        extract_into(child, chunker, documents);
    }
}

/// Orchestrates chunking, embedding, storage and retrieval over one store file.
///
/// Indexing takes `&mut self` and querying takes `&self`, so the store has a
/// single writer at any time.
pub struct RagPipeline {
    embedder: Box<dyn Embedder>,
    generator: Box<dyn Generator>,
    store: VectorStore,
    store_path: PathBuf,
    rate_limiter: RateLimiter,
    chunker: TextChunker,
    embed_delay: Duration,
}

impl RagPipeline {
    /// Create a pipeline, restoring the store at `store_path` if it exists.
    pub fn new(
        embedder: Box<dyn Embedder>,
        generator: Box<dyn Generator>,
        store_path: impl Into<PathBuf>,
        rate_limit: &RateLimitConfig,
    ) -> Result<Self, StoreError> {
        let store_path = store_path.into();
        let store = VectorStore::load(&store_path)?;

        Ok(Self {
            embedder,
            generator,
            store,
            store_path,
            rate_limiter: RateLimiter::from_config(rate_limit),
            chunker: TextChunker::with_defaults(),
            embed_delay: rate_limit.embed_delay(),
        })
    }

    /// Create a pipeline backed by Gemini, reading the API key from the environment.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let api_key = config.api_key()?;
        let client = GeminiClient::new(&config.gemini, api_key)?;

        Ok(Self::new(
            Box::new(client.clone()),
            Box::new(client),
            config.store.path.clone(),
            &config.rate_limit,
        )?)
    }

    /// Chunk every allow-listed file in `root` into documents.
    pub fn extract(&self, root: &FileNode) -> Vec<Document> {
        extract_documents(root, &self.chunker)
    }

    /// Embed and store every document not already in the store, then persist.
    ///
    /// A failed embedding is logged and skipped. Cancellation stops the batch
    /// but still persists what was embedded before returning
    /// [`IndexError::Aborted`].
    pub async fn index(
        &mut self,
        documents: &[Document],
        cancel: &CancellationToken,
    ) -> Result<IndexReport, IndexError> {
        let start = Instant::now();
        let total = documents.len();
        let mut report = IndexReport {
            documents: total as u64,
            ..Default::default()
        };

        info!("Indexing {} documents...", total);

        for (i, document) in documents.iter().enumerate() {
            if i % 10 == 0 {
                info!("Processing document {}/{}", i + 1, total);
            }

            if self.store.contains(&document.id) {
                report.already_indexed += 1;
                continue;
            }

            if self.rate_limiter.acquire(cancel).await.is_err() {
                report.cancelled = true;
                break;
            }

            let vector = match self.embedder.embed(&document.content).await {
                Ok(vector) => vector,
                Err(e) => {
                    warn!("Error creating embedding for document {}: {}", document.id, e);
                    report.failed += 1;
                    continue;
                }
            };

            if let Some(dimension) = self.store.dimension()
                && dimension != vector.len()
            {
                warn!(
                    "Skipping document {}: embedding has {} dimensions, store has {}",
                    document.id,
                    vector.len(),
                    dimension
                );
                report.failed += 1;
                continue;
            }

            self.store.append(Embedding::new(document.clone(), vector));
            report.embedded += 1;

            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = sleep(self.embed_delay) => {}
            }
        }

        self.store.save(&self.store_path)?;
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Indexed {} of {} documents ({} already indexed, {} failed)",
            report.embedded, total, report.already_indexed, report.failed
        );

        if report.cancelled {
            return Err(IndexError::Aborted(report));
        }
        Ok(report)
    }

    /// Embed `query` and return the `top_k` most similar stored documents.
    pub async fn search(
        &self,
        query: &str,
        top_k: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>, QueryError> {
        self.rate_limiter.acquire(cancel).await?;
        let query_vector = self.embedder.embed(query).await?;
        Ok(retriever::rank(&query_vector, self.store.all(), top_k))
    }

    /// Retrieve context for `query` and generate an answer from it.
    ///
    /// When nothing is retrieved the answer is the no-documents sentinel and
    /// the generator is not called. A generation failure still returns the
    /// retrieved results inside [`QueryError::Generation`].
    pub async fn query(
        &self,
        query: &str,
        top_k: usize,
        cancel: &CancellationToken,
    ) -> Result<QueryAnswer, QueryError> {
        let start = Instant::now();
        let elapsed_ms = |start: Instant| start.elapsed().as_millis() as u64;

        if self.store.is_empty() || top_k == 0 {
            return Ok(QueryAnswer::no_documents(query, elapsed_ms(start)));
        }

        let results = self.search(query, top_k, cancel).await?;
        if results.is_empty() {
            return Ok(QueryAnswer::no_documents(query, elapsed_ms(start)));
        }

        let contexts: Vec<&str> = results
            .iter()
            .map(|r| r.document.content.as_str())
            .collect();
        let prompt = build_prompt(query, &contexts);

        self.rate_limiter.acquire(cancel).await?;
        let answer = match self.generator.generate(&prompt).await {
            Ok(answer) => answer,
            Err(source) => return Err(QueryError::Generation { source, results }),
        };

        Ok(QueryAnswer {
            query: query.to_string(),
            answer,
            results,
            duration_ms: elapsed_ms(start),
        })
    }

    /// Summarize the store contents.
    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }
}
