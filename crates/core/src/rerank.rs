//! MMR reranking: greedy selection trading cross-encoder relevance against
//! intra-result diversity, with a small recency bonus.

use eldermem_ai::{cosine_similarity, rerank_score};
use eldermem_shared::AppError;
use uuid::Uuid;

use crate::recency;
use crate::records::{Candidate, FinalChunk};

#[derive(Debug, Clone)]
pub struct RerankParams {
  /// Relevance-vs-diversity balance.
  pub alpha_mmr: f64,
  /// Recency bonus weight.
  pub beta_recency: f64,
  /// Maximum chunks selected.
  pub top_k_mmr: usize,
}

impl Default for RerankParams {
  fn default() -> Self {
    Self {
      alpha_mmr: 0.75,
      beta_recency: 0.1,
      top_k_mmr: 8,
    }
  }
}

/// A selected candidate with its selection-time scores attached.
#[derive(Debug, Clone)]
pub struct RankedCandidate {
  pub candidate: Candidate,
  pub ce_score: f64,
  pub recency_score: f64,
  pub mmr_score: f64,
}

/// Rerank merged candidates and return them in selection order.
///
/// Candidates are read, never consumed: the caller's list keeps its
/// embeddings and scores. Candidates with an empty embedding are dropped
/// from the pool with a warning; a candidate with no usable text is an
/// input error.
pub async fn rerank(
  query: &str,
  candidates: &[Candidate],
  params: &RerankParams,
) -> Result<Vec<RankedCandidate>, AppError> {
  if candidates.is_empty() {
    return Ok(vec![]);
  }

  let pool: Vec<&Candidate> = candidates
    .iter()
    .filter(|candidate| {
      let usable = !candidate.embedding.as_slice().is_empty();
      if !usable {
        tracing::warn!(id = %candidate.id, "dropping candidate with empty embedding");
      }
      usable
    })
    .collect();
  if pool.is_empty() {
    return Ok(vec![]);
  }

  let mut texts = Vec::with_capacity(pool.len());
  for candidate in &pool {
    let text = candidate.fields.text().trim();
    if text.is_empty() {
      return Err(AppError::validation(
        "candidate has no content, value or description to rerank on",
      ));
    }
    texts.push(text.to_owned());
  }

  let recency_scores: Vec<f64> = pool
    .iter()
    .map(|candidate| recency::score(candidate.fields.timestamp()))
    .collect();

  let raw = rerank_score(query, &texts).await?;
  let ce_scores = normalize_ce(&raw);

  let similarity = similarity_matrix(&pool);
  let ids: Vec<Uuid> = pool.iter().map(|candidate| candidate.id).collect();

  let selection = mmr_select(&ids, &ce_scores, &recency_scores, &similarity, params);

  Ok(
    selection
      .into_iter()
      .map(|(index, mmr_score)| RankedCandidate {
        candidate: pool[index].clone(),
        ce_score: ce_scores[index],
        recency_score: recency_scores[index],
        mmr_score,
      })
      .collect(),
  )
}

/// Strip internal scores down to the public chunk shape.
#[must_use]
pub fn into_final_chunks(ranked: &[RankedCandidate]) -> Vec<FinalChunk> {
  ranked
    .iter()
    .map(|entry| FinalChunk::from(&entry.candidate))
    .collect()
}

/// Min-max normalise raw cross-encoder scores into [0, 1]; a flat score
/// set maps to all ones.
fn normalize_ce(raw: &[f32]) -> Vec<f64> {
  let min = raw.iter().copied().fold(f32::INFINITY, f32::min);
  let max = raw.iter().copied().fold(f32::NEG_INFINITY, f32::max);

  if (max - min).abs() < f32::EPSILON {
    return vec![1.0; raw.len()];
  }
  raw
    .iter()
    .map(|score| f64::from((score - min) / (max - min)))
    .collect()
}

fn similarity_matrix(pool: &[&Candidate]) -> Vec<Vec<f64>> {
  let n = pool.len();
  let mut matrix = vec![vec![0.0; n]; n];
  for i in 0..n {
    matrix[i][i] = 1.0;
    for j in (i + 1)..n {
      let sim = f64::from(cosine_similarity(
        pool[i].embedding.as_slice(),
        pool[j].embedding.as_slice(),
      ));
      matrix[i][j] = sim;
      matrix[j][i] = sim;
    }
  }
  matrix
}

/// Greedy MMR over the candidate pool. Returns `(index, mmr_score)` in
/// selection order; ties go to the lowest candidate id so the output is
/// deterministic for a fixed input.
fn mmr_select(
  ids: &[Uuid],
  ce: &[f64],
  recency: &[f64],
  similarity: &[Vec<f64>],
  params: &RerankParams,
) -> Vec<(usize, f64)> {
  let mut selected: Vec<(usize, f64)> = Vec::new();
  let mut remaining: Vec<usize> = (0..ids.len()).collect();

  while selected.len() < params.top_k_mmr && !remaining.is_empty() {
    let mut best: Option<(usize, f64)> = None;

    for &index in &remaining {
      let max_sim = selected
        .iter()
        .map(|&(chosen, _)| similarity[index][chosen])
        .fold(0.0_f64, f64::max);

      let score = params.alpha_mmr * ce[index] - (1.0 - params.alpha_mmr) * max_sim
        + params.beta_recency * recency[index];

      let wins = match best {
        None => true,
        Some((best_index, best_score)) => {
          score > best_score || (score == best_score && ids[index] < ids[best_index])
        }
      };
      if wins {
        best = Some((index, score));
      }
    }

    let Some((winner, score)) = best else { break };
    selected.push((winner, score));
    remaining.retain(|&index| index != winner);
  }

  selected
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ids(n: u128) -> Vec<Uuid> {
    (0..n).map(Uuid::from_u128).collect()
  }

  fn identity_matrix(n: usize) -> Vec<Vec<f64>> {
    let mut m = vec![vec![0.0; n]; n];
    for (i, row) in m.iter_mut().enumerate() {
      row[i] = 1.0;
    }
    m
  }

  #[test]
  fn selects_at_most_top_k() {
    let params = RerankParams {
      top_k_mmr: 2,
      ..RerankParams::default()
    };
    let picked = mmr_select(
      &ids(5),
      &[0.9, 0.8, 0.7, 0.6, 0.5],
      &[0.0; 5],
      &identity_matrix(5),
      &params,
    );
    assert_eq!(picked.len(), 2);
    assert_eq!(picked[0].0, 0);
    assert_eq!(picked[1].0, 1);
  }

  #[test]
  fn singleton_is_selected_with_zero_diversity_penalty() {
    let params = RerankParams::default();
    let picked = mmr_select(&ids(1), &[0.4], &[0.2], &identity_matrix(1), &params);
    assert_eq!(picked.len(), 1);
    let expected = params.alpha_mmr * 0.4 + params.beta_recency * 0.2;
    assert!((picked[0].1 - expected).abs() < 1e-12);
  }

  #[test]
  fn ties_break_toward_the_lowest_id() {
    let params = RerankParams {
      top_k_mmr: 1,
      ..RerankParams::default()
    };
    // Identical scores everywhere: only the id ordering can decide
    let picked = mmr_select(
      &ids(3),
      &[0.5, 0.5, 0.5],
      &[0.0; 3],
      &identity_matrix(3),
      &params,
    );
    assert_eq!(picked[0].0, 0);
  }

  #[test]
  fn near_duplicates_are_penalized() {
    // 0 and 1 are near-identical; 2 is relevant but diverse
    let mut similarity = identity_matrix(3);
    similarity[0][1] = 0.99;
    similarity[1][0] = 0.99;

    let params = RerankParams {
      top_k_mmr: 2,
      beta_recency: 0.0,
      ..RerankParams::default()
    };
    let picked = mmr_select(&ids(3), &[0.9, 0.88, 0.7], &[0.0; 3], &similarity, &params);
    assert_eq!(picked[0].0, 0);
    // Without the penalty, 1 would win the second slot on relevance alone
    assert_eq!(picked[1].0, 2);
  }

  #[test]
  fn recency_bonus_can_flip_the_order() {
    let params = RerankParams {
      top_k_mmr: 1,
      ..RerankParams::default()
    };
    let picked = mmr_select(
      &ids(2),
      &[0.80, 0.78],
      &[0.0, 1.0],
      &identity_matrix(2),
      &params,
    );
    assert_eq!(picked[0].0, 1);
  }

  #[test]
  fn selection_is_deterministic() {
    let params = RerankParams::default();
    let ce = [0.3, 0.9, 0.9, 0.1];
    let rec = [0.5, 0.0, 0.0, 1.0];
    let first = mmr_select(&ids(4), &ce, &rec, &identity_matrix(4), &params);
    let second = mmr_select(&ids(4), &ce, &rec, &identity_matrix(4), &params);
    assert_eq!(first, second);
  }

  #[test]
  fn selected_ids_are_unique() {
    let params = RerankParams::default();
    let picked = mmr_select(
      &ids(6),
      &[0.5; 6],
      &[0.0; 6],
      &identity_matrix(6),
      &params,
    );
    let mut seen: Vec<usize> = picked.iter().map(|&(i, _)| i).collect();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), picked.len());
  }

  #[test]
  fn flat_ce_scores_normalize_to_ones() {
    assert_eq!(normalize_ce(&[3.2, 3.2, 3.2]), vec![1.0, 1.0, 1.0]);
  }

  #[test]
  fn ce_scores_normalize_to_unit_range() {
    let normalized = normalize_ce(&[-4.0, 0.0, 6.0]);
    assert_eq!(normalized[0], 0.0);
    assert_eq!(normalized[2], 1.0);
    assert!(normalized[1] > 0.0 && normalized[1] < 1.0);
  }
}
