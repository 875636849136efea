//! Deterministic offline DAG: embed once, fan out to the classified
//! buckets, merge, rerank. Statements additionally fan out to the
//! short-term insertion arm, which runs concurrently with retrieval.

use eldermem_ai::embed;
use eldermem_core::{Candidate, FinalChunk, MemoryBucket, into_final_chunks, rerank};
use eldermem_shared::AppError;
use futures::future::join_all;
use sea_orm::prelude::PgVector;

use crate::state::{GraphOutcome, QaType, SessionContext};

#[derive(Debug, Clone)]
pub struct OfflineInput {
  pub text: String,
  pub qa_type: QaType,
  pub topics: Vec<MemoryBucket>,
}

pub struct OfflineGraph {
  session: SessionContext,
}

impl OfflineGraph {
  #[must_use]
  pub const fn new(session: SessionContext) -> Self {
    Self { session }
  }

  pub async fn invoke(&self, input: OfflineInput) -> Result<GraphOutcome, AppError> {
    // A failed query embedding kills retrieval, not insertion; bad input
    // (empty text) surfaces to the caller
    let embedding = match embed(&input.text).await {
      Ok(embedding) => Some(embedding),
      Err(err) if err.is_client_error() => return Err(err),
      Err(err) => {
        tracing::warn!(%err, "query embedding failed, retrieval will contribute nothing");
        None
      }
    };

    match input.qa_type {
      QaType::Question => {
        let final_chunks = self
          .retrieve_and_rerank(&input.text, embedding.as_ref(), &input.topics)
          .await?;
        Ok(GraphOutcome {
          final_chunks,
          inserted: false,
          insert_error: None,
        })
      }
      QaType::Statement => {
        // Insertion is independent of retrieval; run both arms at once
        let (retrieved, inserted) = tokio::join!(
          self.retrieve_and_rerank(&input.text, embedding.as_ref(), &input.topics),
          self.session.insert_statement(&input.text, embedding.clone()),
        );
        let (inserted, insert_error) = inserted;
        Ok(GraphOutcome {
          final_chunks: retrieved?,
          inserted,
          insert_error,
        })
      }
    }
  }

  async fn retrieve_and_rerank(
    &self,
    query: &str,
    embedding: Option<&PgVector>,
    topics: &[MemoryBucket],
  ) -> Result<Vec<FinalChunk>, AppError> {
    let Some(embedding) = embedding else {
      return Ok(vec![]);
    };

    let topics = dedup_topics(topics);
    let searches = topics
      .iter()
      .map(|&bucket| self.session.search_bucket(bucket, query, embedding));

    // Append-merge across buckets is commutative; completion order is
    // irrelevant to the reranked output
    let mut candidates: Vec<Candidate> = Vec::new();
    for result in join_all(searches).await {
      candidates.extend(result?);
    }

    if candidates.is_empty() {
      return Ok(vec![]);
    }

    match rerank(query, &candidates, &self.session.rerank).await {
      Ok(ranked) => Ok(into_final_chunks(&ranked)),
      Err(err) if err.is_client_error() => Err(err),
      Err(err) => {
        tracing::warn!(%err, "rerank failed, returning no chunks");
        Ok(vec![])
      }
    }
  }
}

/// Fan out to each selected bucket at most once, preserving order.
fn dedup_topics(topics: &[MemoryBucket]) -> Vec<MemoryBucket> {
  let mut seen = Vec::with_capacity(topics.len());
  for &topic in topics {
    if !seen.contains(&topic) {
      seen.push(topic);
    }
  }
  seen
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn topic_fan_out_is_deduplicated() {
    let topics = [
      MemoryBucket::Healthcare,
      MemoryBucket::ShortTerm,
      MemoryBucket::Healthcare,
      MemoryBucket::LongTerm,
      MemoryBucket::ShortTerm,
    ];
    assert_eq!(
      dedup_topics(&topics),
      vec![
        MemoryBucket::Healthcare,
        MemoryBucket::ShortTerm,
        MemoryBucket::LongTerm,
      ]
    );
  }

  #[test]
  fn empty_topics_fan_out_nowhere() {
    assert!(dedup_topics(&[]).is_empty());
  }
}
