//! In-memory tokenizer and encoder fakes for tests that need no model files.
#![allow(dead_code)]

use std::cell::RefCell;

use anyhow::{bail, Result};
use long_text_embedding::{TextEncoder, TextTokenizer, TokenSpan, TokenizedText};

/// Whitespace-separated words as tokens.
pub struct WhitespaceTokenizer;

impl TextTokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenizedText> {
        let mut spans = Vec::new();
        let mut start = None;
        for (i, c) in text.char_indices() {
            match (c.is_whitespace(), start) {
                (true, Some(s)) => {
                    spans.push(TokenSpan::new(s, i));
                    start = None;
                }
                (false, None) => start = Some(i),
                _ => {}
            }
        }
        if let Some(s) = start {
            spans.push(TokenSpan::new(s, text.len()));
        }
        Ok(TokenizedText::new(spans))
    }
}

pub struct FailingTokenizer;

impl TextTokenizer for FailingTokenizer {
    fn tokenize(&self, _text: &str) -> Result<TokenizedText> {
        bail!("tokenizer offline")
    }
}

/// Counts of ASCII vowels plus one, so no span maps to the zero vector.
pub struct VowelEncoder;

impl TextEncoder for VowelEncoder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut v = vec![1.0f32; 5];
        for c in text.chars() {
            if let Some(i) = "aeiou".find(c.to_ascii_lowercase()) {
                v[i] += 1.0;
            }
        }
        Ok(v)
    }
}

/// Records every span it is asked to encode.
#[derive(Default)]
pub struct RecordingEncoder {
    pub seen: RefCell<Vec<String>>,
}

impl TextEncoder for RecordingEncoder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        self.seen.borrow_mut().push(text.to_string());
        VowelEncoder.encode(text)
    }
}

/// Fails on any span containing `needle`.
pub struct FailingEncoder {
    pub needle: &'static str,
}

impl TextEncoder for FailingEncoder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        if text.contains(self.needle) {
            bail!("encoder rejected span");
        }
        VowelEncoder.encode(text)
    }
}

/// A batch encoder that drops the last vector.
pub struct ShortBatchEncoder;

impl TextEncoder for ShortBatchEncoder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        VowelEncoder.encode(text)
    }

    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut out = texts
            .iter()
            .map(|t| VowelEncoder.encode(t))
            .collect::<Result<Vec<_>>>()?;
        out.pop();
        Ok(out)
    }
}

pub fn norm(v: &[f32]) -> f64 {
    v.iter().map(|&x| f64::from(x) * f64::from(x)).sum::<f64>().sqrt()
}
