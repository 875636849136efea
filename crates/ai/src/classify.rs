use std::time::Duration;

use eldermem_shared::{APP_ENV, AppError};
use serde::{Deserialize, Serialize};

const CLASSIFY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct ClassifyRequest<'a> {
  text: &'a str,
}

#[derive(Deserialize)]
struct QaResponse {
  qa: String,
}

#[derive(Deserialize)]
struct TopicResponse {
  topic: Vec<String>,
}

async fn post_classify<T: serde::de::DeserializeOwned>(
  path: &str,
  text: &str,
) -> Result<T, AppError> {
  let client = reqwest::Client::new();
  let response = client
    .post(format!("{}{path}", APP_ENV.classifier_base_url))
    .timeout(CLASSIFY_TIMEOUT)
    .json(&ClassifyRequest { text })
    .send()
    .await?
    .error_for_status()?
    .json()
    .await?;
  Ok(response)
}

/// Question-vs-statement classifier. Returns the raw tag
/// (`"question"` or `"statement"`).
pub async fn classify_qa(text: &str) -> Result<String, AppError> {
  if text.trim().is_empty() {
    return Err(AppError::validation("cannot classify empty text"));
  }
  let response: QaResponse = post_classify("/classify/qa", text).await?;
  Ok(response.qa)
}

/// Topic classifier. Returns the flat tag set, possibly empty; callers
/// apply the short-term default.
pub async fn classify_topic(text: &str) -> Result<Vec<String>, AppError> {
  if text.trim().is_empty() {
    return Err(AppError::validation("cannot classify empty text"));
  }
  let response: TopicResponse = post_classify("/classify/topic", text).await?;
  Ok(response.topic)
}
