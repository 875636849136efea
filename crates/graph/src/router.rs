//! Classifier front-end: offline requests get a QA tag and a topic set,
//! online requests pass straight through to the planner-driven graph.

use eldermem_ai::{classify_qa, classify_topic};
use eldermem_core::MemoryBucket;
use eldermem_shared::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::QaType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
  Offline,
  Online,
}

/// Routing result. Online flows carry no classification; offline flows
/// always have a QA tag and a non-empty topic set.
#[derive(Debug, Clone, PartialEq)]
pub struct Routed {
  pub qa_type: Option<QaType>,
  pub topics: Vec<MemoryBucket>,
}

/// Classify the utterance for dispatch.
///
/// The two classifiers run in parallel. `qa_hint` and `topic_hint` are the
/// caller-provided overrides from the request body; a classifier failure
/// falls back to its hint before giving up.
pub async fn route(
  text: &str,
  flow_type: FlowType,
  qa_hint: Option<&str>,
  topic_hint: &[String],
) -> Result<Routed, AppError> {
  if flow_type == FlowType::Online {
    return Ok(Routed {
      qa_type: None,
      topics: vec![],
    });
  }

  let (qa, topics) = tokio::join!(classify_qa(text), classify_topic(text));

  let qa = match qa {
    Ok(tag) => tag,
    Err(err) => match qa_hint {
      Some(hint) => {
        tracing::warn!(%err, "qa classifier failed, using request hint");
        hint.to_owned()
      }
      None => return Err(err),
    },
  };

  let topics = match topics {
    Ok(tags) => tags,
    Err(err) => {
      if topic_hint.is_empty() {
        return Err(err);
      }
      tracing::warn!(%err, "topic classifier failed, using request hint");
      topic_hint.to_vec()
    }
  };

  Ok(Routed {
    qa_type: Some(parse_qa(&qa)),
    topics: resolve_topics(&topics),
  })
}

/// Anything that is not a question routes down the statement arm.
fn parse_qa(tag: &str) -> QaType {
  if tag.eq_ignore_ascii_case("question") {
    QaType::Question
  } else {
    QaType::Statement
  }
}

/// Map classifier tags to buckets, dropping unknown tags and duplicates.
/// An empty result defaults to short-term.
fn resolve_topics(tags: &[String]) -> Vec<MemoryBucket> {
  let mut topics: Vec<MemoryBucket> = Vec::new();
  for tag in tags {
    if let Some(bucket) = parse_topic(tag) {
      if !topics.contains(&bucket) {
        topics.push(bucket);
      }
    } else {
      tracing::warn!(%tag, "dropping unknown topic tag");
    }
  }

  if topics.is_empty() {
    topics.push(MemoryBucket::ShortTerm);
  }
  topics
}

/// The classifiers emit both hyphenated and collapsed spellings.
fn parse_topic(tag: &str) -> Option<MemoryBucket> {
  match tag.to_ascii_lowercase().replace('-', "").as_str() {
    "healthcare" => Some(MemoryBucket::Healthcare),
    "longterm" => Some(MemoryBucket::LongTerm),
    "shortterm" => Some(MemoryBucket::ShortTerm),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
  }

  #[test]
  fn empty_topics_default_to_short_term() {
    assert_eq!(resolve_topics(&[]), vec![MemoryBucket::ShortTerm]);
  }

  #[test]
  fn unknown_tags_are_dropped() {
    assert_eq!(
      resolve_topics(&tags(&["healthcare", "weather"])),
      vec![MemoryBucket::Healthcare]
    );
    // All unknown collapses to the default
    assert_eq!(
      resolve_topics(&tags(&["weather"])),
      vec![MemoryBucket::ShortTerm]
    );
  }

  #[test]
  fn duplicates_are_removed_preserving_order() {
    assert_eq!(
      resolve_topics(&tags(&["long-term", "healthcare", "long-term"])),
      vec![MemoryBucket::LongTerm, MemoryBucket::Healthcare]
    );
  }

  #[test]
  fn both_tag_spellings_parse() {
    assert_eq!(parse_topic("long-term"), Some(MemoryBucket::LongTerm));
    assert_eq!(parse_topic("longterm"), Some(MemoryBucket::LongTerm));
    assert_eq!(parse_topic("short-term"), Some(MemoryBucket::ShortTerm));
    assert_eq!(parse_topic("Healthcare"), Some(MemoryBucket::Healthcare));
    assert_eq!(parse_topic("finance"), None);
  }

  #[test]
  fn non_questions_route_as_statements() {
    assert_eq!(parse_qa("question"), QaType::Question);
    assert_eq!(parse_qa("statement"), QaType::Statement);
    assert_eq!(parse_qa("unknown"), QaType::Statement);
  }
}
