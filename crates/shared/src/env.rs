use std::env;
use std::sync::LazyLock;

use uuid::Uuid;

fn required_env(key: &str) -> String {
  env::var(key).expect(&format!("env {key} must be set"))
}

fn env_or(key: &str, default: &str) -> String {
  env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Demo profile seeded by the migrations; overridable via `ELDERLY_ID`.
const DEFAULT_ELDERLY_ID: &str = "87654321-4321-4321-4321-019876543210";

pub struct AppEnv {
  pub database_url: String,
  pub database_encryption_key: String,
  pub openai_base_url: String,
  pub openai_api_key: String,
  pub openai_chat_model: String,
  pub openai_embedding_model: String,
  pub rerank_base_url: String,
  pub rerank_model: String,
  pub classifier_base_url: String,
  pub preprocess_base_url: String,
  pub elderly_id: Uuid,
}

impl AppEnv {
  fn new() -> Self {
    dotenvy::dotenv().ok();

    Self {
      database_url: required_env("DATABASE_URL"),
      database_encryption_key: required_env("DATABASE_ENCRYPTION_KEY"),
      openai_base_url: required_env("OPENAI_BASE_URL"),
      openai_api_key: required_env("OPENAI_API_KEY"),
      openai_chat_model: required_env("OPENAI_CHAT_MODEL"),
      openai_embedding_model: required_env("OPENAI_EMBEDDING_MODEL"),
      rerank_base_url: required_env("RERANK_BASE_URL"),
      rerank_model: env_or("RERANK_MODEL", "BAAI/bge-reranker-base"),
      classifier_base_url: required_env("CLASSIFIER_BASE_URL"),
      preprocess_base_url: required_env("PREPROCESS_BASE_URL"),
      elderly_id: Uuid::parse_str(&env_or("ELDERLY_ID", DEFAULT_ELDERLY_ID))
        .expect("env ELDERLY_ID must be a valid UUID"),
    }
  }
}

pub static APP_ENV: LazyLock<AppEnv> = LazyLock::new(AppEnv::new);
