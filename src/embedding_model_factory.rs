use anyhow::{Context, Result};
use fastembed::{
    read_file_to_bytes, InitOptionsUserDefined, Pooling, TextEmbedding, TokenizerFiles,
    UserDefinedEmbeddingModel,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Load an ONNX sentence encoder exported in the Hugging Face layout.
pub fn get_model(base_path: &Path) -> Result<TextEmbedding> {
    let onnx_path = base_path.join("onnx").join("model.onnx");
    let tokenizer_path = base_path.join("tokenizer.json");
    let config_path = base_path.join("config.json");
    let special_tokens_map_path = base_path.join("special_tokens_map.json");
    let tokenizer_config_path = base_path.join("tokenizer_config.json");

    let read = |path: &PathBuf| {
        read_file_to_bytes(path).with_context(|| format!("reading {}", path.display()))
    };

    let onnx_bytes = read(&onnx_path)?;
    let tokenizer_files = TokenizerFiles {
        tokenizer_file: read(&tokenizer_path)?,
        config_file: read(&config_path)?,
        special_tokens_map_file: read(&special_tokens_map_path)?,
        tokenizer_config_file: read(&tokenizer_config_path)?,
    };

    let user_model =
        UserDefinedEmbeddingModel::new(onnx_bytes, tokenizer_files).with_pooling(Pooling::Mean);

    let model =
        TextEmbedding::try_new_from_user_defined(user_model, InitOptionsUserDefined::default())
            .with_context(|| format!("initializing encoder from {}", base_path.display()))?;
    info!(model_dir = %base_path.display(), "loaded embedding model");
    Ok(model)
}
