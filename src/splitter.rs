//! Token-bounded chunking.
//!
//! The token stream is cut into consecutive windows of `max_tokens` tokens;
//! the last window holds whatever remains. Each window's text is sliced from
//! the first token's start offset to the last token's end offset, so a chunk
//! never splits a token and keeps any whitespace between its tokens.
//!
//! ```text
//! text:    "the quick  brown fox"
//! tokens:  [0,3) [4,9) [11,16) [17,20)
//! max = 3
//!
//! chunk 0: tokens [0,3)  "the quick  brown"
//! chunk 1: tokens [3,4)  "fox"
//! ```

use crate::error::{Error, Result};
use crate::tokenizer::TokenizedText;

/// A contiguous run of tokens and the text it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// The chunk's text, borrowed from the source.
    pub text: &'a str,
    /// Byte offset of the first token's start.
    pub start: usize,
    /// Byte offset of the last token's end.
    pub end: usize,
    /// Index of the first token in the window.
    pub token_start: usize,
    /// One past the last token in the window.
    pub token_end: usize,
    /// Position of this chunk in the sequence.
    pub index: usize,
}

impl Chunk<'_> {
    pub fn token_count(&self) -> usize {
        self.token_end - self.token_start
    }
}

/// Partition `tokens` into windows of at most `max_tokens` and slice `text`
/// accordingly.
///
/// Returns an empty list when there are no tokens. Every call recomputes the
/// chunks from scratch.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `max_tokens` is zero, or if a window's
/// offsets are reversed, out of range, or not on a char boundary of `text`.
pub fn chunk<'a>(
    text: &'a str,
    tokens: &TokenizedText,
    max_tokens: usize,
) -> Result<Vec<Chunk<'a>>> {
    if max_tokens < 1 {
        return Err(Error::InvalidArgument(format!(
            "max_tokens must be at least 1, got {max_tokens}"
        )));
    }

    let spans = tokens.spans();
    let mut chunks = Vec::with_capacity(spans.len().div_ceil(max_tokens));

    for (index, window) in spans.chunks(max_tokens).enumerate() {
        let token_start = index * max_tokens;
        let token_end = token_start + window.len();
        // chunks() never yields an empty window
        let (first, last) = (window[0], window[window.len() - 1]);

        let text_span = text.get(first.start..last.end).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "tokens [{token_start}, {token_end}) map to bytes [{}, {}), \
                 which is not a valid slice of text of length {}",
                first.start,
                last.end,
                text.len()
            ))
        })?;

        chunks.push(Chunk {
            text: text_span,
            start: first.start,
            end: last.end,
            token_start,
            token_end,
            index,
        });
    }

    Ok(chunks)
}
