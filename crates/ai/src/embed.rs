use anyhow::anyhow;
use async_openai::{Client, config::OpenAIConfig, types::embeddings::CreateEmbeddingRequestArgs};
use eldermem_shared::{APP_ENV, AppError};
use sea_orm::prelude::PgVector;

use crate::embed_shared::{EMBEDDING_DIM, process_embedding};

pub async fn embed(input: &str) -> Result<PgVector, AppError> {
  if input.trim().is_empty() {
    return Err(AppError::validation("cannot embed empty text"));
  }

  let config = OpenAIConfig::new()
    .with_api_key(&APP_ENV.openai_api_key)
    .with_api_base(&APP_ENV.openai_base_url);

  let client = Client::with_config(config);

  let request = CreateEmbeddingRequestArgs::default()
    .model(&APP_ENV.openai_embedding_model)
    .input(input)
    .dimensions(EMBEDDING_DIM as u32)
    .build()?;

  let embedding = client
    .embeddings()
    .create(request)
    .await
    .map(|r| r.data.into_iter())?
    .map(|e| e.embedding)
    .next_back()
    .ok_or_else(|| anyhow!("empty embedding"))?;

  let processed = process_embedding(embedding)?;
  Ok(PgVector::from(processed))
}
