use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use fastembed::TextEmbedding;
use serde::{Deserialize, Serialize};
use tokenizers::tokenizer::Tokenizer;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use long_text_embedding::config::Config;
use long_text_embedding::{
    embedding_model_factory, tokenizer_factory, ChunkEmbedding, Embedder, Error,
};

// Request/Response structs
#[derive(Deserialize)]
struct EmbedRequest {
    text: String,
    max_tokens: Option<usize>,
}

#[derive(Serialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
    dimension: usize,
}

#[derive(Serialize)]
struct ChunkResponse {
    start: usize,
    end: usize,
    token_count: usize,
    embedding: Vec<f32>,
}

impl From<ChunkEmbedding> for ChunkResponse {
    fn from(c: ChunkEmbedding) -> Self {
        Self {
            start: c.start,
            end: c.end,
            token_count: c.token_count,
            embedding: c.embedding,
        }
    }
}

#[derive(Serialize)]
struct ChunksResponse {
    chunks: Vec<ChunkResponse>,
}

// App state
struct AppState {
    embedder: Embedder<Tokenizer, TextEmbedding>,
}

struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Error::DegenerateInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Tokenizer(_) | Error::Encoder(_) => {
                error!(error = %self.0, "embedding failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(serde_json::json!({
            "error": self.0.to_string(),
            "code": status.as_u16(),
        }));
        (status, body).into_response()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    info!(?config, "starting");

    let tokenizer = tokenizer_factory::get_tokenizer(&config.model_dir)?;
    let model = embedding_model_factory::get_model(&config.model_dir)?;
    let embedder = Embedder::new(tokenizer, model).with_max_tokens(config.max_tokens);

    let probe = embedder.embed("ping").context("probing embedding model")?;
    info!(
        model_dir = %config.model_dir.display(),
        dimension = probe.len(),
        "embedding model ready"
    );

    let state = Arc::new(AppState { embedder });

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/embed", post(embed))
        .route("/embed/chunks", post(embed_chunks))
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    info!("Server running on http://{}", config.listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// Handler for embedding a whole text
async fn embed(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EmbedRequest>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let embedding = run_blocking(move || {
        let max_tokens = payload.max_tokens.unwrap_or(state.embedder.max_tokens());
        state.embedder.embed_with(&payload.text, max_tokens)
    })
    .await?;

    Ok(Json(EmbedResponse {
        dimension: embedding.len(),
        embedding,
    }))
}

// Handler for per-chunk embeddings
async fn embed_chunks(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EmbedRequest>,
) -> Result<Json<ChunksResponse>, ApiError> {
    let chunks = run_blocking(move || {
        let max_tokens = payload.max_tokens.unwrap_or(state.embedder.max_tokens());
        state.embedder.embed_chunks(&payload.text, max_tokens)
    })
    .await?;

    Ok(Json(ChunksResponse {
        chunks: chunks.into_iter().map(ChunkResponse::from).collect(),
    }))
}

/// Encoding is CPU/GPU bound; keep it off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> long_text_embedding::Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => Err(ApiError(Error::Encoder(anyhow::anyhow!(
            "embedding task failed: {e}"
        )))),
    }
}
