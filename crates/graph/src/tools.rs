use std::str::FromStr;

use eldermem_ai::ToolSpec;

/// Planner guidance. The tool-use intent here is part of the external
/// interface: retrievals on questions or when context helps, insertion on
/// new rememberable information, any combination in one turn.
pub const SYSTEM_PROMPT: &str = r#"**ROLE:** Elder Companion Memory Agent

**INSTRUCTIONS:**
- Use retrieval tools when the user asks a question, implies a need for past information, or when contextual information would benefit the conversation
- Use `insert_statement` whenever the user shares new information that should be remembered.
- You can call any combination of tools in a single turn.

**TOOLS:**
* `retrieve_long_term`: Core identity, life events, relationships, preferences.
* `retrieve_healthcare`: Medical history, appointments, medications, conditions.
* `retrieve_short_term`: Recent conversations, daily to-dos, temporary information.
* `insert_statement`: Log new factual or any general contextual information from the user's message into memory for future reference

**EXAMPLES:**
1. User: "When was my next doctor appointment?"
-> retrieve_healthcare, retrieve_short_term
Why: The appointment is likely in healthcare memory; short-term memory may contain recent updates or rescheduling.

2. User: "What is my address?"
-> retrieve_long_term
Why: Address and other personalised information are stored in long-term memory.

3. User: "I have started taking Vitamin D every morning."
-> insert_statement, retrieve_healthcare, retrieve_short_term
Why: Insert the new habit and check existing healthcare and short-term memories provide contextual awareness (e.g., "You're already taking a multivitamin that includes Vitamin D")

4. User: "Did I mention what I was cooking yesterday? I made lasagna again."
-> retrieve_short_term, insert_statement
Why: Recall yesterday's meal, then log the new mention to keep memory current and consistent.
"#;

/// The capability set bound to the planner. Each tool takes exactly one
/// string argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryTool {
  RetrieveLongTerm,
  RetrieveHealthcare,
  RetrieveShortTerm,
  InsertStatement,
}

impl MemoryTool {
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::RetrieveLongTerm => "retrieve_long_term",
      Self::RetrieveHealthcare => "retrieve_healthcare",
      Self::RetrieveShortTerm => "retrieve_short_term",
      Self::InsertStatement => "insert_statement",
    }
  }
}

impl FromStr for MemoryTool {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "retrieve_long_term" => Ok(Self::RetrieveLongTerm),
      "retrieve_healthcare" => Ok(Self::RetrieveHealthcare),
      "retrieve_short_term" => Ok(Self::RetrieveShortTerm),
      "insert_statement" => Ok(Self::InsertStatement),
      _ => Err(()),
    }
  }
}

fn query_schema(description: &str) -> serde_json::Value {
  serde_json::json!({
    "type": "object",
    "properties": {
      "query": { "type": "string", "description": description }
    },
    "required": ["query"]
  })
}

#[must_use]
pub fn tool_specs() -> Vec<ToolSpec> {
  vec![
    ToolSpec {
      name: MemoryTool::RetrieveLongTerm.name(),
      description: "Retrieve long-term profile facts (stable traits, preferences, demographics)",
      parameters: query_schema("What to look up in long-term memory"),
    },
    ToolSpec {
      name: MemoryTool::RetrieveHealthcare.name(),
      description: "Retrieve health-care data (conditions, meds, allergies, appointments)",
      parameters: query_schema("What to look up in healthcare memory"),
    },
    ToolSpec {
      name: MemoryTool::RetrieveShortTerm.name(),
      description:
        "Retrieve past conversational details (recent plans, reminders, temporary preferences)",
      parameters: query_schema("What to look up in short-term memory"),
    },
    ToolSpec {
      name: MemoryTool::InsertStatement.name(),
      description:
        "Insert general conversational details (recent plans, reminders, temporary preferences)",
      parameters: serde_json::json!({
        "type": "object",
        "properties": {
          "content": { "type": "string", "description": "The statement to remember" }
        },
        "required": ["content"]
      }),
    },
  ]
}

/// Argument payload of a planned tool call: retrievals carry `query`,
/// insertion carries `content`.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ToolArguments {
  #[serde(default)]
  pub query: Option<String>,
  #[serde(default)]
  pub content: Option<String>,
}

impl ToolArguments {
  pub fn text(&self) -> Option<&str> {
    self
      .query
      .as_deref()
      .or(self.content.as_deref())
      .map(str::trim)
      .filter(|text| !text.is_empty())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tool_names_round_trip() {
    for tool in [
      MemoryTool::RetrieveLongTerm,
      MemoryTool::RetrieveHealthcare,
      MemoryTool::RetrieveShortTerm,
      MemoryTool::InsertStatement,
    ] {
      assert_eq!(tool.name().parse::<MemoryTool>().unwrap(), tool);
    }
    assert!("retrieve_everything".parse::<MemoryTool>().is_err());
  }

  #[test]
  fn specs_cover_the_full_capability_set() {
    let specs = tool_specs();
    assert_eq!(specs.len(), 4);
    for spec in &specs {
      assert!(spec.name.parse::<MemoryTool>().is_ok());
      assert_eq!(spec.parameters["type"], "object");
    }
  }

  #[test]
  fn arguments_accept_query_or_content() {
    let query: ToolArguments = serde_json::from_str(r#"{"query": "my meds"}"#).unwrap();
    assert_eq!(query.text(), Some("my meds"));

    let content: ToolArguments = serde_json::from_str(r#"{"content": " new fact "}"#).unwrap();
    assert_eq!(content.text(), Some("new fact"));

    let empty: ToolArguments = serde_json::from_str(r#"{"query": "  "}"#).unwrap();
    assert_eq!(empty.text(), None);
  }
}
