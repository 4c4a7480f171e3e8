mod chunker;
mod embedding;
mod identifier;
mod pipeline;
mod rate_limiter;
mod retriever;
mod vector_store;

pub use chunker::{MAX_CHUNK_CHARS, TextChunker};
pub use embedding::{Embedder, GeminiClient, Generator};
pub use identifier::{DOCUMENT_ID_LEN, document_id};
pub use pipeline::{RagPipeline, build_prompt, extract_documents};
pub use rate_limiter::RateLimiter;
pub use retriever::{cosine_similarity, rank};
pub use vector_store::VectorStore;
