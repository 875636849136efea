//! Online graph: the planner LLM decides which memory operations to run.
//! embed → agent → tools → conditional rerank. The query embedding is
//! computed once and carried through the run; retrieval tools never
//! re-embed.

use eldermem_ai::{
  ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
  ChatCompletionRequestUserMessage, PlannedCall, embed, plan,
};
use eldermem_core::{Candidate, into_final_chunks, rerank};
use eldermem_shared::AppError;
use futures::future::join_all;
use sea_orm::prelude::PgVector;

use crate::state::{GraphOutcome, SessionContext};
use crate::tools::{MemoryTool, SYSTEM_PROMPT, ToolArguments, tool_specs};

/// Effect of one executed tool call.
struct ToolEffect {
  message: String,
  candidates: Vec<Candidate>,
  inserted: bool,
  insert_error: Option<String>,
}

impl ToolEffect {
  fn note(message: String) -> Self {
    Self {
      message,
      candidates: vec![],
      inserted: false,
      insert_error: None,
    }
  }
}

pub struct OnlineGraph {
  session: SessionContext,
}

impl OnlineGraph {
  #[must_use]
  pub const fn new(session: SessionContext) -> Self {
    Self { session }
  }

  pub async fn invoke(&self, text: &str) -> Result<GraphOutcome, AppError> {
    if text.trim().is_empty() {
      return Err(AppError::validation("text is required and cannot be empty"));
    }

    // Computed once per invocation; tools read it from the run state
    let query_embedding = match embed(text).await {
      Ok(embedding) => Some(embedding),
      Err(err) if err.is_client_error() => return Err(err),
      Err(err) => {
        tracing::warn!(%err, "query embedding failed, retrieval tools will be skipped");
        None
      }
    };

    let mut transcript: Vec<String> = vec![format!("user: {text}")];

    let messages: Vec<ChatCompletionRequestMessage> = vec![
      ChatCompletionRequestSystemMessage::from(SYSTEM_PROMPT).into(),
      ChatCompletionRequestUserMessage::from(text).into(),
    ];

    let tool_plan = match plan(messages, &tool_specs()).await {
      Ok(tool_plan) => tool_plan,
      Err(err) if err.is_client_error() => return Err(err),
      Err(err) => {
        tracing::warn!(%err, "planner failed, ending online graph");
        transcript.push("planner unavailable, no memory operations ran".to_owned());
        log_transcript(&transcript);
        return Ok(GraphOutcome::default());
      }
    };

    if tool_plan.is_empty() {
      if let Some(content) = &tool_plan.content {
        transcript.push(format!("assistant: {content}"));
      }
      transcript.push("planner requested no tools".to_owned());
      log_transcript(&transcript);
      return Ok(GraphOutcome::default());
    }

    let effects = join_all(
      tool_plan
        .calls
        .iter()
        .map(|call| self.execute_call(call, query_embedding.as_ref())),
    )
    .await;

    let mut candidates: Vec<Candidate> = Vec::new();
    let mut inserted = false;
    let mut insert_error = None;
    for effect in effects {
      transcript.push(effect.message);
      candidates.extend(effect.candidates);
      inserted |= effect.inserted;
      if insert_error.is_none() {
        insert_error = effect.insert_error;
      }
    }

    if candidates.is_empty() {
      transcript.push("no candidates retrieved, skipping rerank".to_owned());
      log_transcript(&transcript);
      return Ok(GraphOutcome {
        final_chunks: vec![],
        inserted,
        insert_error,
      });
    }

    let final_chunks = match rerank(text, &candidates, &self.session.rerank).await {
      Ok(ranked) => into_final_chunks(&ranked),
      Err(err) if err.is_client_error() => return Err(err),
      Err(err) => {
        tracing::warn!(%err, "rerank failed, returning no chunks");
        transcript.push("rerank unavailable".to_owned());
        vec![]
      }
    };

    transcript.push(format!("rerank: {} chunks", final_chunks.len()));
    log_transcript(&transcript);

    Ok(GraphOutcome {
      final_chunks,
      inserted,
      insert_error,
    })
  }

  async fn execute_call(&self, call: &PlannedCall, embedding: Option<&PgVector>) -> ToolEffect {
    let Ok(tool) = call.name.parse::<MemoryTool>() else {
      tracing::warn!(tool = %call.name, "planner requested an unknown tool");
      return ToolEffect::note(format!("{}: unknown tool", call.name));
    };

    let arguments: ToolArguments = match serde_json::from_str(&call.arguments) {
      Ok(arguments) => arguments,
      Err(err) => {
        tracing::warn!(tool = tool.name(), %err, "malformed tool arguments");
        return ToolEffect::note(format!("{}: malformed arguments", tool.name()));
      }
    };
    let Some(text) = arguments.text() else {
      return ToolEffect::note(format!("{}: empty argument", tool.name()));
    };

    match tool {
      MemoryTool::InsertStatement => {
        let (inserted, insert_error) = self
          .session
          .insert_statement(text, embedding.cloned())
          .await;
        let message = if inserted {
          format!("{}: stored", tool.name())
        } else {
          format!("{}: failed", tool.name())
        };
        ToolEffect {
          message,
          candidates: vec![],
          inserted,
          insert_error,
        }
      }
      MemoryTool::RetrieveLongTerm | MemoryTool::RetrieveHealthcare
      | MemoryTool::RetrieveShortTerm => {
        let Some(embedding) = embedding else {
          return ToolEffect::note(format!("{}: skipped, no query embedding", tool.name()));
        };
        let bucket = match tool {
          MemoryTool::RetrieveLongTerm => eldermem_core::MemoryBucket::LongTerm,
          MemoryTool::RetrieveHealthcare => eldermem_core::MemoryBucket::Healthcare,
          _ => eldermem_core::MemoryBucket::ShortTerm,
        };
        match self.session.search_bucket(bucket, text, embedding).await {
          Ok(candidates) => ToolEffect {
            message: format!("{}: {} hits", tool.name(), candidates.len()),
            candidates,
            inserted: false,
            insert_error: None,
          },
          Err(err) => {
            tracing::warn!(tool = tool.name(), %err, "retrieval tool failed");
            ToolEffect::note(format!("{}: failed", tool.name()))
          }
        }
      }
    }
  }
}

fn log_transcript(transcript: &[String]) {
  tracing::debug!(transcript = %transcript.join(" | "), "online graph transcript");
}
