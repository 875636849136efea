use std::time::Duration;

use anyhow::anyhow;
use eldermem_shared::{APP_ENV, AppError};
use serde::{Deserialize, Serialize};

const RERANK_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct RerankRequest<'a> {
  model: &'a str,
  query: &'a str,
  texts: &'a [String],
}

#[derive(Deserialize)]
struct RerankHit {
  index: usize,
  score: f32,
}

/// Score `(query, text)` pairs with the cross-encoder service.
///
/// Returns one raw score per text, in input order. Scores are whatever the
/// model emits; normalisation is the caller's concern.
pub async fn rerank_score(query: &str, texts: &[String]) -> Result<Vec<f32>, AppError> {
  if texts.is_empty() {
    return Ok(vec![]);
  }
  if query.trim().is_empty() {
    return Err(AppError::validation("cannot rerank with an empty query"));
  }

  let client = reqwest::Client::new();

  let hits: Vec<RerankHit> = client
    .post(format!("{}/rerank", APP_ENV.rerank_base_url))
    .timeout(RERANK_TIMEOUT)
    .json(&RerankRequest {
      model: &APP_ENV.rerank_model,
      query,
      texts,
    })
    .send()
    .await?
    .error_for_status()?
    .json()
    .await?;

  // Responses may arrive ranked; restore input order by index
  let mut scores = vec![f32::NEG_INFINITY; texts.len()];
  for hit in hits {
    if hit.index >= texts.len() {
      return Err(anyhow!("rerank index {} out of range", hit.index).into());
    }
    scores[hit.index] = hit.score;
  }
  if scores.iter().any(|s| s.is_infinite()) {
    return Err(anyhow!("rerank response missing scores").into());
  }

  Ok(scores)
}
