use anyhow::{bail, Result};
use tokenizers::tokenizer::Tokenizer;

/// Half-open `[start, end)` byte offsets of one token in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
}

impl TokenSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Ordered tokens of a text, each carrying its offsets into that text.
///
/// Offsets are non-decreasing and non-overlapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedText {
    spans: Vec<TokenSpan>,
}

impl TokenizedText {
    pub fn new(spans: Vec<TokenSpan>) -> Self {
        Self { spans }
    }

    pub fn from_offsets(offsets: &[(usize, usize)]) -> Self {
        Self::new(
            offsets
                .iter()
                .map(|&(start, end)| TokenSpan::new(start, end))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn spans(&self) -> &[TokenSpan] {
        &self.spans
    }
}

/// Maps text to tokens with offsets.
///
/// Constructed once by the caller and shared across `embed` calls.
pub trait TextTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenizedText>;
}

impl TextTokenizer for Tokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenizedText> {
        // no special tokens: counts must measure the text alone
        let encoding = self.encode(text, false).map_err(anyhow::Error::msg)?;
        if !encoding.get_overflowing().is_empty() {
            bail!(
                "tokenizer truncated the text to {} tokens; disable truncation before chunking",
                encoding.len()
            );
        }
        Ok(TokenizedText::from_offsets(encoding.get_offsets()))
    }
}
