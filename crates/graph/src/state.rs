use std::time::Duration;

use eldermem_core::{
  Candidate, FinalChunk, MemoryBucket, RerankParams, SearchParams, insert_short_term, search,
};
use eldermem_shared::AppError;
use sea_orm::{DatabaseConnection, prelude::PgVector};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use utoipa::ToSchema;
use uuid::Uuid;

/// Question-vs-statement tag from the QA classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum QaType {
  Question,
  Statement,
}

/// Long-lived resources shared by both graphs. Model gateways are free
/// functions over process configuration, so the session only carries the
/// connection pool, the profile scope and the tuning knobs. Per-request
/// data (query embedding, candidates, transcript) travels through graph
/// state, never through the session.
#[derive(Clone)]
pub struct SessionContext {
  pub db: DatabaseConnection,
  pub elderly_id: Uuid,
  pub search: SearchParams,
  pub rerank: RerankParams,
  /// Deadline for a single bucket search or insertion.
  pub bucket_timeout: Duration,
}

impl SessionContext {
  #[must_use]
  pub fn new(db: DatabaseConnection, elderly_id: Uuid) -> Self {
    Self {
      db,
      elderly_id,
      search: SearchParams::default(),
      rerank: RerankParams::default(),
      bucket_timeout: Duration::from_secs(10),
    }
  }

  /// Deadline-bounded hybrid search over one bucket. Timeouts and store
  /// failures degrade to an empty contribution; invalid input surfaces.
  pub(crate) async fn search_bucket(
    &self,
    bucket: MemoryBucket,
    query: &str,
    embedding: &PgVector,
  ) -> Result<Vec<Candidate>, AppError> {
    let fut = search(
      &self.db,
      bucket,
      self.elderly_id,
      query,
      embedding,
      &self.search,
    );

    match timeout(self.bucket_timeout, fut).await {
      Ok(Ok(candidates)) => {
        tracing::info!(
          bucket = bucket.as_topic(),
          hits = candidates.len(),
          "bucket search complete"
        );
        Ok(candidates)
      }
      Ok(Err(err)) if err.is_client_error() => Err(err),
      Ok(Err(err)) => {
        tracing::warn!(bucket = bucket.as_topic(), %err, "bucket search failed");
        Ok(vec![])
      }
      Err(_) => {
        tracing::warn!(bucket = bucket.as_topic(), "bucket search timed out");
        Ok(vec![])
      }
    }
  }

  /// Deadline-bounded short-term write. Failure never aborts the request;
  /// it is reported as `(false, Some(error))` for the response body.
  pub(crate) async fn insert_statement(
    &self,
    content: &str,
    embedding: Option<PgVector>,
  ) -> (bool, Option<String>) {
    let fut = insert_short_term(&self.db, self.elderly_id, content, embedding);

    match timeout(self.bucket_timeout, fut).await {
      Ok(Ok(receipt)) => {
        tracing::info!(id = %receipt.id, "statement stored to short-term memory");
        (true, None)
      }
      Ok(Err(err)) => {
        tracing::error!(%err, "short-term insertion failed");
        (false, Some(err.to_string()))
      }
      Err(_) => {
        tracing::error!("short-term insertion timed out");
        (false, Some("short-term insertion timed out".to_owned()))
      }
    }
  }
}

/// What a graph run produced, offline and online alike.
#[derive(Debug, Clone, Default)]
pub struct GraphOutcome {
  pub final_chunks: Vec<FinalChunk>,
  pub inserted: bool,
  /// Set when the insertion arm failed; surfaced at the API boundary.
  pub insert_error: Option<String>,
}
