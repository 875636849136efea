use std::time::Duration;

use eldermem_shared::{APP_ENV, AppError};
use serde::{Deserialize, Serialize};

const PREPROCESS_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Serialize)]
struct PreprocessRequest<'a> {
  text: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreprocessedEntity {
  pub text: String,
  pub label: String,
  pub start: usize,
  pub end: usize,
  #[serde(default)]
  pub confidence: f32,
}

/// Output of the external preprocessor: filler-stripped sentence segments
/// plus NER annotations over the cleaned text.
#[derive(Debug, Clone, Deserialize)]
pub struct Preprocessed {
  pub sentences: Vec<String>,
  #[serde(default)]
  pub entities: Vec<PreprocessedEntity>,
}

pub async fn preprocess(text: &str) -> Result<Preprocessed, AppError> {
  if text.trim().is_empty() {
    return Err(AppError::validation("text is required and cannot be empty"));
  }

  let client = reqwest::Client::new();
  let response: Preprocessed = client
    .post(format!("{}/preprocess", APP_ENV.preprocess_base_url))
    .timeout(PREPROCESS_TIMEOUT)
    .json(&PreprocessRequest { text })
    .send()
    .await?
    .error_for_status()?
    .json()
    .await?;

  Ok(response)
}
