use anyhow::anyhow;
use async_openai::{
  Client,
  config::OpenAIConfig,
  types::chat::{
    ChatCompletionMessageToolCalls, ChatCompletionRequestMessage, ChatCompletionTool,
    ChatCompletionTools, CreateChatCompletionRequestArgs, FunctionObjectArgs,
  },
};
use eldermem_shared::{APP_ENV, AppError};

/// A tool the planner may request, described by name, purpose and a JSON
/// schema for its single-argument payload.
#[derive(Debug, Clone)]
pub struct ToolSpec {
  pub name: &'static str,
  pub description: &'static str,
  pub parameters: serde_json::Value,
}

/// One tool invocation requested by the planner.
#[derive(Debug, Clone)]
pub struct PlannedCall {
  pub id: String,
  pub name: String,
  /// Raw JSON argument string as emitted by the model.
  pub arguments: String,
}

/// The planner's decision for one turn: zero or more tool calls plus an
/// optional assistant message.
#[derive(Debug, Clone, Default)]
pub struct ToolPlan {
  pub calls: Vec<PlannedCall>,
  pub content: Option<String>,
}

impl ToolPlan {
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.calls.is_empty()
  }
}

fn build_tools(specs: &[ToolSpec]) -> Result<Vec<ChatCompletionTools>, AppError> {
  specs
    .iter()
    .map(|spec| {
      Ok(ChatCompletionTools::Function(ChatCompletionTool {
        function: FunctionObjectArgs::default()
          .name(spec.name)
          .description(spec.description)
          .parameters(spec.parameters.clone())
          .build()?,
      }))
    })
    .collect()
}

/// Ask the planner LLM which tools to run for this turn.
///
/// The model sees the full transcript with the tool set bound; it may
/// request any subset of the tools (including none, or the same tool more
/// than once) in a single response.
pub async fn plan(
  messages: Vec<ChatCompletionRequestMessage>,
  tools: &[ToolSpec],
) -> Result<ToolPlan, AppError> {
  let config = OpenAIConfig::new()
    .with_api_key(&APP_ENV.openai_api_key)
    .with_api_base(&APP_ENV.openai_base_url);

  let client = Client::with_config(config);

  let request = CreateChatCompletionRequestArgs::default()
    .model(&APP_ENV.openai_chat_model)
    .messages(messages)
    .tools(build_tools(tools)?)
    .build()?;

  let message = client
    .chat()
    .create(request)
    .await
    .map(|r| r.choices.into_iter())?
    .map(|c| c.message)
    .next_back()
    .ok_or_else(|| anyhow!("planner returned no choices"))?;

  let calls = message
    .tool_calls
    .unwrap_or_default()
    .into_iter()
    .filter_map(|call| match call {
      ChatCompletionMessageToolCalls::Function(call) => Some(PlannedCall {
        id: call.id,
        name: call.function.name,
        arguments: call.function.arguments,
      }),
      ChatCompletionMessageToolCalls::Custom(_) => None,
    })
    .collect();

  Ok(ToolPlan {
    calls,
    content: message.content,
  })
}
