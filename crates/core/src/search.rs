//! Generic per-bucket hybrid retrieval: pgvector cosine kNN and ParadeDB
//! BM25 (with fuzzy matching) run concurrently, then their scores are
//! fused into a single ranked candidate list.

use eldermem_shared::AppError;
use sea_orm::{
  ActiveEnum, ConnectionTrait, DatabaseConnection, DbBackend, Statement,
  prelude::{Date, PgVector},
};
use uuid::Uuid;

use crate::records::{Candidate, MemoryBucket, RecordFields};

#[derive(Debug, Clone)]
pub struct SearchParams {
  /// Candidates retained per path and after fusion.
  pub top_k: u64,
  /// Lexical weight in the fusion: `α·bm25 + (1−α)·emb`.
  pub alpha: f64,
  /// Minimum dense similarity; `None` disables the filter.
  pub sim_threshold: Option<f64>,
  /// Edit distance tolerated by the fuzzy lexical match.
  pub fuzzy_distance: i32,
}

impl Default for SearchParams {
  fn default() -> Self {
    Self {
      top_k: 25,
      alpha: 0.5,
      sim_threshold: Some(0.3),
      fuzzy_distance: 2,
    }
  }
}

impl SearchParams {
  /// Size of the materialised nearest-set. Filtering by similarity needs a
  /// wider net than `top_k`, since the threshold may reject most of it.
  #[must_use]
  pub const fn nearest_limit(&self) -> u64 {
    if self.sim_threshold.is_some() {
      self.top_k * 5
    } else {
      self.top_k
    }
  }
}

/// One row out of either search path, before fusion.
#[derive(Debug, Clone)]
struct ScoredRow {
  id: Uuid,
  fields: RecordFields,
  embedding: PgVector,
  score: f64,
}

/// Hybrid search over one bucket, strictly scoped to `elderly_id`.
///
/// Store failures are logged and degrade to an empty result so the other
/// buckets can still contribute; invalid input surfaces to the caller.
pub async fn search(
  db: &DatabaseConnection,
  bucket: MemoryBucket,
  elderly_id: Uuid,
  query: &str,
  embedding: &PgVector,
  params: &SearchParams,
) -> Result<Vec<Candidate>, AppError> {
  if query.trim().is_empty() {
    return Err(AppError::validation("search query cannot be empty"));
  }
  if elderly_id.is_nil() {
    return Err(AppError::validation("elderly_id is required"));
  }

  match search_inner(db, bucket, elderly_id, query, embedding, params).await {
    Ok(candidates) => Ok(candidates),
    Err(err) if err.is_client_error() => Err(err),
    Err(err) => {
      tracing::warn!(bucket = bucket.as_topic(), %err, "hybrid search failed, returning no candidates");
      Ok(vec![])
    }
  }
}

async fn search_inner(
  db: &DatabaseConnection,
  bucket: MemoryBucket,
  elderly_id: Uuid,
  query: &str,
  embedding: &PgVector,
  params: &SearchParams,
) -> Result<Vec<Candidate>, AppError> {
  let (dense, lexical) = futures::try_join!(
    dense_search(db, bucket, elderly_id, embedding, params),
    lexical_search(db, bucket, elderly_id, query, params),
  )?;

  Ok(fuse(bucket, dense, lexical, params.alpha, params.top_k))
}

// --- Dense path ---

async fn dense_search(
  db: &DatabaseConnection,
  bucket: MemoryBucket,
  elderly_id: Uuid,
  embedding: &PgVector,
  params: &SearchParams,
) -> Result<Vec<ScoredRow>, AppError> {
  let threshold_clause = if params.sim_threshold.is_some() {
    "WHERE 1 - distance >= $5"
  } else {
    ""
  };

  let sql = format!(
    r"
    WITH nearest AS MATERIALIZED (
      SELECT id, {columns}, embedding, embedding <=> $1 AS distance
      FROM {table}
      WHERE elderly_id = $2
      ORDER BY distance
      LIMIT $3
    )
    SELECT id, {names}, embedding, 1 - distance AS similarity
    FROM nearest
    {threshold_clause}
    ORDER BY distance
    LIMIT $4;
    ",
    columns = bucket.payload_columns(),
    names = payload_names(bucket),
    table = bucket.table(),
  );

  let mut values: Vec<sea_orm::Value> = vec![
    embedding.clone().into(),
    elderly_id.into(),
    (params.nearest_limit() as i64).into(),
    (params.top_k as i64).into(),
  ];
  if let Some(threshold) = params.sim_threshold {
    values.push(threshold.into());
  }

  let rows = db
    .query_all_raw(Statement::from_sql_and_values(
      DbBackend::Postgres,
      &sql,
      values,
    ))
    .await?;

  rows
    .iter()
    .map(|row| {
      Ok(ScoredRow {
        id: row.try_get("", "id")?,
        fields: fields_from_row(bucket, row)?,
        embedding: row.try_get("", "embedding")?,
        score: row.try_get("", "similarity")?,
      })
    })
    .collect()
}

// --- Lexical path (BM25 + fuzzy) ---

async fn lexical_search(
  db: &DatabaseConnection,
  bucket: MemoryBucket,
  elderly_id: Uuid,
  query: &str,
  params: &SearchParams,
) -> Result<Vec<ScoredRow>, AppError> {
  let sql = format!(
    r"
    SELECT id, {columns}, embedding, paradedb.score(id)::float8 AS bm25_score
    FROM {table}
    WHERE elderly_id = $1
      AND ({matches})
    ORDER BY bm25_score DESC
    LIMIT $4;
    ",
    columns = bucket.payload_columns(),
    table = bucket.table(),
    matches = lexical_match_clause(bucket),
  );

  let rows = db
    .query_all_raw(Statement::from_sql_and_values(
      DbBackend::Postgres,
      &sql,
      [
        elderly_id.into(),
        normalize_query(query).into(),
        params.fuzzy_distance.into(),
        (params.top_k as i64).into(),
      ],
    ))
    .await?;

  rows
    .iter()
    .map(|row| {
      Ok(ScoredRow {
        id: row.try_get("", "id")?,
        fields: fields_from_row(bucket, row)?,
        embedding: row.try_get("", "embedding")?,
        score: row.try_get("", "bm25_score")?,
      })
    })
    .collect()
}

/// Exact token match plus edit-distance match on every searchable column.
fn lexical_match_clause(bucket: MemoryBucket) -> String {
  let exact = bucket
    .lexical_columns()
    .iter()
    .map(|column| format!("{column} @@@ $2"))
    .collect::<Vec<_>>();
  let fuzzy = bucket
    .lexical_columns()
    .iter()
    .map(|column| format!("id @@@ paradedb.match('{column}', $2, distance => $3)"))
    .collect::<Vec<_>>();

  [exact, fuzzy].concat().join(" OR ")
}

/// Strip characters the ParadeDB query parser treats as syntax; collapse
/// runs of whitespace.
#[must_use]
pub fn normalize_query(query: &str) -> String {
  let cleaned: String = query
    .chars()
    .map(|c| {
      if c.is_alphanumeric() || c.is_whitespace() {
        c
      } else {
        ' '
      }
    })
    .collect();

  cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

// --- Row decoding ---

fn payload_names(bucket: MemoryBucket) -> &'static str {
  match bucket {
    MemoryBucket::ShortTerm => "content, created_at",
    MemoryBucket::LongTerm => "category, key, value, last_updated",
    MemoryBucket::Healthcare => "record_type, description, diagnosis_date, last_updated",
  }
}

fn fields_from_row(
  bucket: MemoryBucket,
  row: &sea_orm::QueryResult,
) -> Result<RecordFields, AppError> {
  match bucket {
    MemoryBucket::ShortTerm => Ok(RecordFields::ShortTerm {
      content: row.try_get("", "content")?,
      created_at: row.try_get("", "created_at")?,
    }),
    MemoryBucket::LongTerm => Ok(RecordFields::LongTerm {
      category: ActiveEnum::try_from_value(&row.try_get("", "category")?)?,
      key: row.try_get("", "key")?,
      value: row.try_get("", "value")?,
      last_updated: row.try_get("", "last_updated")?,
    }),
    MemoryBucket::Healthcare => Ok(RecordFields::Healthcare {
      record_type: ActiveEnum::try_from_value(&row.try_get("", "record_type")?)?,
      description: row.try_get("", "description")?,
      diagnosis_date: row.try_get::<Option<Date>>("", "diagnosis_date")?,
      last_updated: row.try_get("", "last_updated")?,
    }),
  }
}

// --- Fusion ---

/// Fuse the two result sets: lexical scores are normalised by the maximum
/// BM25 score in this response, then each id in the union is scored
/// `α·bm25 + (1−α)·emb` with missing sides as 0. Dense payloads win when
/// both paths returned the same id.
fn fuse(
  bucket: MemoryBucket,
  dense: Vec<ScoredRow>,
  lexical: Vec<ScoredRow>,
  alpha: f64,
  top_k: u64,
) -> Vec<Candidate> {
  let max_bm25 = lexical
    .iter()
    .map(|row| row.score)
    .fold(f64::NEG_INFINITY, f64::max)
    .max(1e-9);

  let mut combined: std::collections::BTreeMap<Uuid, Candidate> = std::collections::BTreeMap::new();

  for row in dense {
    combined.insert(
      row.id,
      Candidate {
        id: row.id,
        bucket,
        fields: row.fields,
        embedding: row.embedding,
        emb_score: row.score,
        bm25_score: 0.0,
        hybrid_score: 0.0,
      },
    );
  }

  for row in lexical {
    let normalized = row.score / max_bm25;
    combined
      .entry(row.id)
      .or_insert_with(|| Candidate {
        id: row.id,
        bucket,
        fields: row.fields,
        embedding: row.embedding,
        emb_score: 0.0,
        bm25_score: 0.0,
        hybrid_score: 0.0,
      })
      .bm25_score = normalized;
  }

  let mut candidates: Vec<Candidate> = combined.into_values().collect();
  for candidate in &mut candidates {
    candidate.hybrid_score =
      round4(alpha * candidate.bm25_score + (1.0 - alpha) * candidate.emb_score);
  }

  // BTreeMap iteration gives ascending ids, and the sort is stable, so
  // equal hybrid scores tie-break by id
  candidates.sort_by(|a, b| {
    b.hybrid_score
      .partial_cmp(&a.hybrid_score)
      .unwrap_or(std::cmp::Ordering::Equal)
  });
  candidates.truncate(top_k as usize);
  candidates
}

fn round4(value: f64) -> f64 {
  (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn row(id: u128, score: f64) -> ScoredRow {
    ScoredRow {
      id: Uuid::from_u128(id),
      fields: RecordFields::ShortTerm {
        content: format!("memory {id}"),
        created_at: NaiveDate::from_ymd_opt(2025, 10, 1)
          .unwrap()
          .and_hms_opt(8, 0, 0)
          .unwrap(),
      },
      embedding: PgVector::from(vec![0.0_f32; 4]),
      score,
    }
  }

  #[test]
  fn fusion_weights_both_paths() {
    let fused = fuse(
      MemoryBucket::ShortTerm,
      vec![row(1, 0.8)],
      vec![row(1, 4.0), row(2, 2.0)],
      0.5,
      10,
    );

    assert_eq!(fused.len(), 2);
    // id 1: bm25 normalised to 1.0, emb 0.8 -> 0.5*1.0 + 0.5*0.8
    assert_eq!(fused[0].id, Uuid::from_u128(1));
    assert_eq!(fused[0].hybrid_score, 0.9);
    // id 2: lexical only, bm25 2.0/4.0
    assert_eq!(fused[1].id, Uuid::from_u128(2));
    assert_eq!(fused[1].hybrid_score, 0.25);
  }

  #[test]
  fn missing_side_counts_as_zero() {
    let fused = fuse(MemoryBucket::ShortTerm, vec![row(7, 0.6)], vec![], 0.5, 10);
    assert_eq!(fused.len(), 1);
    assert_eq!(fused[0].emb_score, 0.6);
    assert_eq!(fused[0].bm25_score, 0.0);
    assert_eq!(fused[0].hybrid_score, 0.3);
  }

  #[test]
  fn lexical_scores_normalise_into_unit_range() {
    let fused = fuse(
      MemoryBucket::ShortTerm,
      vec![],
      vec![row(1, 12.5), row(2, 5.0), row(3, 0.5)],
      1.0,
      10,
    );
    for candidate in &fused {
      assert!(candidate.bm25_score >= 0.0 && candidate.bm25_score <= 1.0);
      assert!(candidate.hybrid_score >= 0.0 && candidate.hybrid_score <= 1.0);
    }
    assert_eq!(fused[0].bm25_score, 1.0);
  }

  #[test]
  fn hybrid_order_breaks_ties_by_id() {
    let fused = fuse(
      MemoryBucket::ShortTerm,
      vec![row(9, 0.4), row(3, 0.4)],
      vec![],
      0.5,
      10,
    );
    assert_eq!(fused[0].id, Uuid::from_u128(3));
    assert_eq!(fused[1].id, Uuid::from_u128(9));
  }

  #[test]
  fn fusion_truncates_to_top_k() {
    let dense = (0..30).map(|i| row(i, 0.9 - i as f64 * 0.01)).collect();
    let fused = fuse(MemoryBucket::ShortTerm, dense, vec![], 0.5, 25);
    assert_eq!(fused.len(), 25);
  }

  #[test]
  fn alpha_zero_is_pure_dense() {
    let fused = fuse(
      MemoryBucket::ShortTerm,
      vec![row(1, 0.8)],
      vec![row(2, 3.0)],
      0.0,
      10,
    );
    let dense_only = fused.iter().find(|c| c.id == Uuid::from_u128(1)).unwrap();
    let lexical_only = fused.iter().find(|c| c.id == Uuid::from_u128(2)).unwrap();
    assert_eq!(dense_only.hybrid_score, 0.8);
    assert_eq!(lexical_only.hybrid_score, 0.0);
  }

  #[test]
  fn nearest_limit_widens_under_threshold() {
    let with_threshold = SearchParams::default();
    assert_eq!(with_threshold.nearest_limit(), 125);

    let without = SearchParams {
      sim_threshold: None,
      ..SearchParams::default()
    };
    assert_eq!(without.nearest_limit(), 25);
  }

  #[test]
  fn normalize_query_strips_parser_syntax() {
    assert_eq!(
      normalize_query("what's my  medication: plan?"),
      "what s my medication plan"
    );
    assert_eq!(normalize_query("  plain words  "), "plain words");
  }

  #[test]
  fn lexical_clause_covers_exact_and_fuzzy_per_column() {
    let clause = lexical_match_clause(MemoryBucket::LongTerm);
    for column in ["category_search", "key", "value"] {
      assert!(clause.contains(&format!("{column} @@@ $2")));
      assert!(clause.contains(&format!("paradedb.match('{column}', $2, distance => $3)")));
    }
  }
}
