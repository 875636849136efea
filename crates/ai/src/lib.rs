// Re-export async_openai types for consumers
pub use async_openai::types::chat::{
  ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
  ChatCompletionRequestUserMessage,
};

mod classify;
pub use classify::{classify_qa, classify_topic};

mod cosine_similarity;
pub use cosine_similarity::cosine_similarity;

mod embed;
pub use embed::embed;

mod embed_many;
pub use embed_many::embed_many;

mod embed_shared;
pub use embed_shared::{EMBEDDING_DIM, process_embedding};

mod plan;
pub use plan::{PlannedCall, ToolPlan, ToolSpec, plan};

mod preprocess;
pub use preprocess::{Preprocessed, PreprocessedEntity, preprocess};

mod rerank;
pub use rerank::rerank_score;
