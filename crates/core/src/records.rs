use chrono::{NaiveDate, NaiveDateTime};
use eldermem_entities::{HealthRecordType, LtmCategory};
use sea_orm::prelude::PgVector;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// The three typed memory stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum MemoryBucket {
  ShortTerm,
  LongTerm,
  Healthcare,
}

impl MemoryBucket {
  #[must_use]
  pub const fn table(self) -> &'static str {
    match self {
      Self::ShortTerm => "short_term_memory",
      Self::LongTerm => "long_term_memory",
      Self::Healthcare => "healthcare_records",
    }
  }

  /// Payload columns selected by both search paths, enums cast to text so
  /// raw rows decode uniformly.
  #[must_use]
  pub const fn payload_columns(self) -> &'static str {
    match self {
      Self::ShortTerm => "content, created_at",
      Self::LongTerm => "category::text AS category, key, value, last_updated",
      Self::Healthcare => {
        "record_type::text AS record_type, description, diagnosis_date, last_updated"
      }
    }
  }

  /// Columns the lexical path matches against. Enum-backed fields are
  /// shadowed by generated `*_search` text columns so BM25 can index them.
  #[must_use]
  pub const fn lexical_columns(self) -> &'static [&'static str] {
    match self {
      Self::ShortTerm => &["content"],
      Self::LongTerm => &["category_search", "key", "value"],
      Self::Healthcare => &["record_type_search", "description"],
    }
  }

  #[must_use]
  pub const fn as_topic(self) -> &'static str {
    match self {
      Self::ShortTerm => "short-term",
      Self::LongTerm => "long-term",
      Self::Healthcare => "healthcare",
    }
  }
}

/// Domain fields of one memory record, shaped per bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RecordFields {
  LongTerm {
    category: LtmCategory,
    key: String,
    value: String,
    last_updated: NaiveDateTime,
  },
  Healthcare {
    record_type: HealthRecordType,
    description: String,
    diagnosis_date: Option<NaiveDate>,
    last_updated: NaiveDateTime,
  },
  ShortTerm {
    content: String,
    created_at: NaiveDateTime,
  },
}

impl RecordFields {
  /// The textual representation used for cross-encoder scoring.
  #[must_use]
  pub fn text(&self) -> &str {
    match self {
      Self::ShortTerm { content, .. } => content,
      Self::LongTerm { value, .. } => value,
      Self::Healthcare { description, .. } => description,
    }
  }

  /// `last_updated` if present, else `created_at`. Naive — interpretation
  /// (SGT) happens in the recency scorer.
  #[must_use]
  pub const fn timestamp(&self) -> NaiveDateTime {
    match self {
      Self::ShortTerm { created_at, .. } => *created_at,
      Self::LongTerm { last_updated, .. } | Self::Healthcare { last_updated, .. } => *last_updated,
    }
  }
}

/// A retrieved record plus the transient retrieval scores. Request-scoped;
/// never serialized to the public API.
#[derive(Debug, Clone)]
pub struct Candidate {
  pub id: Uuid,
  pub bucket: MemoryBucket,
  pub fields: RecordFields,
  pub embedding: PgVector,
  pub emb_score: f64,
  pub bm25_score: f64,
  pub hybrid_score: f64,
}

/// Public return shape: domain fields plus id, all internal scores absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FinalChunk {
  pub id: Uuid,
  #[serde(flatten)]
  pub fields: RecordFields,
}

impl From<&Candidate> for FinalChunk {
  fn from(candidate: &Candidate) -> Self {
    Self {
      id: candidate.id,
      fields: candidate.fields.clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn short_term_fields() -> RecordFields {
    RecordFields::ShortTerm {
      content: "I took my vitamin D supplement this morning.".to_owned(),
      created_at: NaiveDate::from_ymd_opt(2025, 10, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap(),
    }
  }

  #[test]
  fn text_picks_the_bucket_field() {
    assert_eq!(
      short_term_fields().text(),
      "I took my vitamin D supplement this morning."
    );

    let ltm = RecordFields::LongTerm {
      category: LtmCategory::Lifestyle,
      key: "likes".to_owned(),
      value: "Taiwanese soap operas".to_owned(),
      last_updated: short_term_fields().timestamp(),
    };
    assert_eq!(ltm.text(), "Taiwanese soap operas");

    let hcm = RecordFields::Healthcare {
      record_type: HealthRecordType::Condition,
      description: "Hypertension".to_owned(),
      diagnosis_date: NaiveDate::from_ymd_opt(2000, 1, 1),
      last_updated: short_term_fields().timestamp(),
    };
    assert_eq!(hcm.text(), "Hypertension");
  }

  #[test]
  fn final_chunk_serializes_without_scores() {
    let candidate = Candidate {
      id: Uuid::nil(),
      bucket: MemoryBucket::ShortTerm,
      fields: short_term_fields(),
      embedding: PgVector::from(vec![0.0_f32; 4]),
      emb_score: 0.9,
      bm25_score: 0.5,
      hybrid_score: 0.7,
    };

    let chunk = FinalChunk::from(&candidate);
    let json = serde_json::to_value(&chunk).unwrap();

    assert_eq!(
      json["content"],
      "I took my vitamin D supplement this morning."
    );
    assert!(json.get("emb_score").is_none());
    assert!(json.get("bm25_score").is_none());
    assert!(json.get("hybrid_score").is_none());
    assert!(json.get("mmr_score").is_none());
  }

  #[test]
  fn topic_tags_round_trip() {
    for bucket in [
      MemoryBucket::ShortTerm,
      MemoryBucket::LongTerm,
      MemoryBucket::Healthcare,
    ] {
      let tag = serde_json::to_value(bucket).unwrap();
      assert_eq!(tag, bucket.as_topic());
      let back: MemoryBucket = serde_json::from_value(tag).unwrap();
      assert_eq!(back, bucket);
    }
  }
}
