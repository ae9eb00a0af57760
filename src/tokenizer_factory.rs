use anyhow::{Context, Result};
use std::path::Path;
use tokenizers::tokenizer::Tokenizer;

pub fn get_tokenizer(base_path: &Path) -> Result<Tokenizer> {
    let tokenizer_path = base_path.join("tokenizer.json");
    let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("loading tokenizer from {}", tokenizer_path.display()))?;

    // tokenizer.json may carry the model's input limit; chunking needs every token
    tokenizer
        .with_truncation(None)
        .map_err(anyhow::Error::msg)
        .context("disabling tokenizer truncation")?;
    tokenizer.with_padding(None);

    Ok(tokenizer)
}
