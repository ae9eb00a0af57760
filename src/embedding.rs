//! Long-text embedding: tokenize, chunk, encode each chunk, aggregate.

use crate::error::{Error, Result};
use crate::gte_small;
use crate::splitter::{self, Chunk};
use crate::tokenizer::TextTokenizer;
use crate::vector_mean::{self, WeightedVector};
use anyhow::anyhow;
use fastembed::TextEmbedding;
use tracing::{debug, instrument};

pub const DEFAULT_MAX_TOKENS: usize = gte_small::MAX_TOKENS_PER_CHUNK;

/// Maps a text span to a fixed-length vector.
pub trait TextEncoder {
    fn encode(&self, text: &str) -> anyhow::Result<Vec<f32>>;

    /// Encode several spans; vector `i` belongs to `texts[i]`.
    fn encode_batch(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.encode(text)).collect()
    }
}

impl TextEncoder for TextEmbedding {
    fn encode(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.embed(vec![text], None)?
            .pop()
            .ok_or_else(|| anyhow!("model returned no embedding"))
    }

    fn encode_batch(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        self.embed(texts.to_vec(), None)
    }
}

/// The encoder's vector for one chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkEmbedding {
    pub start: usize,
    pub end: usize,
    pub token_count: usize,
    pub embedding: Vec<f32>,
}

/// Embed `text` as one unit-length vector, whatever its length.
///
/// Text longer than `max_tokens` is split into token windows; each window is
/// encoded and the results are averaged by token count, then normalized.
///
/// # Errors
///
/// [`Error::InvalidArgument`] for `max_tokens == 0` or text with no tokens,
/// [`Error::DegenerateInput`] when the mean cannot be normalized, and
/// tokenizer or encoder failures as they were reported.
#[instrument(skip(text, tokenizer, encoder), fields(text_len = text.len()))]
pub fn embed<T, E>(text: &str, tokenizer: &T, encoder: &E, max_tokens: usize) -> Result<Vec<f32>>
where
    T: TextTokenizer + ?Sized,
    E: TextEncoder + ?Sized,
{
    let weighted: Vec<WeightedVector> = embed_chunks(text, tokenizer, encoder, max_tokens)?
        .into_iter()
        .map(|c| WeightedVector::new(c.embedding, c.token_count))
        .collect();
    vector_mean::aggregate(&weighted)
}

/// Per-chunk embeddings of `text`, in text order, without aggregation.
///
/// Text with no tokens yields an empty list.
#[instrument(skip(text, tokenizer, encoder), fields(text_len = text.len()))]
pub fn embed_chunks<T, E>(
    text: &str,
    tokenizer: &T,
    encoder: &E,
    max_tokens: usize,
) -> Result<Vec<ChunkEmbedding>>
where
    T: TextTokenizer + ?Sized,
    E: TextEncoder + ?Sized,
{
    let tokens = tokenizer.tokenize(text).map_err(Error::Tokenizer)?;
    let chunks: Vec<Chunk> = splitter::chunk(text, &tokens, max_tokens)?;
    debug!(tokens = tokens.len(), chunks = chunks.len(), "split text");

    if chunks.is_empty() {
        return Ok(Vec::new());
    }

    let spans: Vec<&str> = chunks.iter().map(|c| c.text).collect();
    let embeddings = encoder.encode_batch(&spans).map_err(Error::Encoder)?;
    if embeddings.len() != chunks.len() {
        return Err(Error::Encoder(anyhow!(
            "encoder returned {} vectors for {} chunks",
            embeddings.len(),
            chunks.len()
        )));
    }

    Ok(chunks
        .iter()
        .zip(embeddings)
        .map(|(chunk, embedding)| ChunkEmbedding {
            start: chunk.start,
            end: chunk.end,
            token_count: chunk.token_count(),
            embedding,
        })
        .collect())
}

/// A tokenizer and encoder built once and reused for every text.
pub struct Embedder<T, E> {
    tokenizer: T,
    encoder: E,
    max_tokens: usize,
}

impl<T: TextTokenizer, E: TextEncoder> Embedder<T, E> {
    pub fn new(tokenizer: T, encoder: E) -> Self {
        Self {
            tokenizer,
            encoder,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_with(text, self.max_tokens)
    }

    /// Like [`Embedder::embed`] with a per-call token limit.
    pub fn embed_with(&self, text: &str, max_tokens: usize) -> Result<Vec<f32>> {
        embed(text, &self.tokenizer, &self.encoder, max_tokens)
    }

    pub fn embed_chunks(&self, text: &str, max_tokens: usize) -> Result<Vec<ChunkEmbedding>> {
        embed_chunks(text, &self.tokenizer, &self.encoder, max_tokens)
    }
}
