mod config;
mod document;
mod search;
mod stats;

pub use config::{
    Config, DEFAULT_API_KEY_ENV, DEFAULT_EMBEDDING_MODEL, DEFAULT_GEMINI_URL,
    DEFAULT_GENERATION_MODEL, DEFAULT_STORE_FILE, GeminiConfig, IndexingConfig, RateLimitConfig,
    SearchConfig, StoreConfig,
};
pub use document::{Document, Embedding};
pub use search::{NO_RELEVANT_DOCUMENTS, OutputFormat, QueryAnswer, SearchResult};
pub use stats::{IndexReport, StoreStats};
