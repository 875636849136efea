use axum::{Json, extract::State};
use eldermem_ai::preprocess;
use eldermem_core::FinalChunk;
use eldermem_graph::{FlowType, OfflineInput, QaType, route};
use eldermem_shared::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::AppState;

/// `topic` accepts a single tag or a list of tags.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum TopicHint {
  One(String),
  Many(Vec<String>),
}

impl TopicHint {
  fn into_vec(self) -> Vec<String> {
    match self {
      Self::One(tag) => vec![tag],
      Self::Many(tags) => tags,
    }
  }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InvokeRequest {
  /// Raw utterance from (or about) the elderly user
  pub text: String,
  /// "offline" for classifier-driven routing, "online" for the planner
  pub flow_type: String,
  /// Optional QA tag override, used if the classifier is unavailable
  #[serde(default)]
  pub qa: Option<String>,
  /// Optional topic tag(s) override, used if the classifier is unavailable
  #[serde(default)]
  pub topic: Option<TopicHint>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvokeResponse {
  /// The utterance actually processed (first preprocessed sentence)
  pub user_query: String,
  /// Reranked memory chunks, internal scores stripped
  pub final_chunks: Vec<FinalChunk>,
  /// Whether a short-term record was written
  pub inserted: bool,
  /// Present when the insertion arm failed
  #[serde(skip_serializing_if = "Option::is_none")]
  pub insert_error: Option<String>,
}

fn parse_flow_type(raw: &str) -> Result<FlowType, AppError> {
  match raw {
    "offline" => Ok(FlowType::Offline),
    "online" => Ok(FlowType::Online),
    other => Err(AppError::validation(format!(
      "Invalid flow_type: {other}. Must be 'offline' or 'online'."
    ))),
  }
}

/// Route one utterance through the memory service
#[utoipa::path(
  post,
  path = "/invoke",
  request_body = InvokeRequest,
  responses(
    (status = 200, description = "Retrieved chunks and insertion flag", body = InvokeResponse),
    (status = 400, description = "Invalid flow_type or empty text"),
    (status = 500, description = "Internal Server Error")
  )
)]
#[axum::debug_handler]
#[tracing::instrument(skip(state, payload), fields(flow_type = %payload.flow_type))]
pub async fn invoke(
  State(state): State<AppState>,
  Json(payload): Json<InvokeRequest>,
) -> Result<Json<InvokeResponse>, AppError> {
  let flow_type = parse_flow_type(&payload.flow_type)?;

  if payload.text.trim().is_empty() {
    return Err(AppError::validation("text is required and cannot be empty"));
  }

  // Only the first preprocessed sentence is routed; the rest of the
  // utterance is dropped here
  let text = match preprocess(&payload.text).await {
    Ok(output) => output
      .sentences
      .into_iter()
      .next()
      .unwrap_or_else(|| payload.text.trim().to_owned()),
    Err(err) if err.is_client_error() => return Err(err),
    Err(err) => {
      tracing::warn!(%err, "preprocessor unavailable, routing the raw utterance");
      payload.text.trim().to_owned()
    }
  };

  let topic_hint = payload.topic.map(TopicHint::into_vec).unwrap_or_default();
  let routed = route(&text, flow_type, payload.qa.as_deref(), &topic_hint).await?;

  let outcome = match flow_type {
    FlowType::Offline => {
      state
        .offline
        .invoke(OfflineInput {
          text: text.clone(),
          qa_type: routed.qa_type.unwrap_or(QaType::Statement),
          topics: routed.topics,
        })
        .await?
    }
    FlowType::Online => state.online.invoke(&text).await?,
  };

  Ok(Json(InvokeResponse {
    user_query: text,
    final_chunks: outcome.final_chunks,
    inserted: outcome.inserted,
    insert_error: outcome.insert_error,
  }))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flow_type_rejects_unknown_values() {
    assert!(parse_flow_type("offline").is_ok());
    assert!(parse_flow_type("online").is_ok());

    let err = parse_flow_type("batch").unwrap_err();
    assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
  }

  #[test]
  fn topic_hint_accepts_string_or_list() {
    let single: InvokeRequest =
      serde_json::from_str(r#"{"text": "hi", "flow_type": "offline", "topic": "healthcare"}"#)
        .unwrap();
    assert_eq!(
      single.topic.unwrap().into_vec(),
      vec!["healthcare".to_owned()]
    );

    let many: InvokeRequest = serde_json::from_str(
      r#"{"text": "hi", "flow_type": "offline", "topic": ["healthcare", "short-term"]}"#,
    )
    .unwrap();
    assert_eq!(
      many.topic.unwrap().into_vec(),
      vec!["healthcare".to_owned(), "short-term".to_owned()]
    );

    let none: InvokeRequest =
      serde_json::from_str(r#"{"text": "hi", "flow_type": "online"}"#).unwrap();
    assert!(none.topic.is_none());
    assert!(none.qa.is_none());
  }
}
