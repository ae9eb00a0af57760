//! Fixed-length embeddings for arbitrarily long text.
//!
//! Text is tokenized, cut into windows of at most `max_tokens` tokens, each
//! window is encoded on its own, and the window vectors are combined into a
//! token-count-weighted mean scaled to unit length.
//!
//! ```rust,ignore
//! use long_text_embedding::{embedding_model_factory, tokenizer_factory, Embedder};
//!
//! let base = std::path::Path::new("gte-small");
//! let embedder = Embedder::new(
//!     tokenizer_factory::get_tokenizer(base)?,
//!     embedding_model_factory::get_model(base)?,
//! );
//! let vector = embedder.embed(long_document)?;
//! ```

pub mod config;
pub mod embedding;
pub mod embedding_model_factory;
pub mod error;
pub mod gte_small;
pub mod splitter;
pub mod tokenizer;
pub mod tokenizer_factory;
pub mod vector_mean;

pub use embedding::{embed, embed_chunks, ChunkEmbedding, Embedder, TextEncoder, DEFAULT_MAX_TOKENS};
pub use error::{Error, Result};
pub use splitter::{chunk, Chunk};
pub use tokenizer::{TextTokenizer, TokenSpan, TokenizedText};
pub use vector_mean::{aggregate, WeightedVector};
