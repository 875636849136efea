use chrono::NaiveDateTime;
use eldermem_ai::embed;
use eldermem_entities::{elderly_profile, short_term_memory};
use eldermem_shared::AppError;
use sea_orm::{ActiveValue::NotSet, DatabaseConnection, EntityTrait, Set, prelude::PgVector};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Receipt for a persisted short-term record.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Insertion {
  pub id: Uuid,
  pub created_at: NaiveDateTime,
}

/// Append one short-term memory row.
///
/// The embedding is computed from `content` when the caller has none at
/// hand (the graphs pass the query embedding they already hold). The
/// `created_at` timestamp is server-assigned by the database default.
pub async fn insert_short_term(
  db: &DatabaseConnection,
  elderly_id: Uuid,
  content: &str,
  embedding: Option<PgVector>,
) -> Result<Insertion, AppError> {
  let content = content.trim();
  if content.is_empty() {
    return Err(AppError::validation(
      "content is required and cannot be empty",
    ));
  }
  if elderly_id.is_nil() {
    return Err(AppError::validation("elderly_id is required"));
  }

  elderly_profile::Entity::find_by_id(elderly_id)
    .one(db)
    .await?
    .ok_or_else(|| AppError::not_found(format!("elderly profile {elderly_id} not found")))?;

  let embedding = match embedding {
    Some(embedding) => embedding,
    None => embed(content).await?,
  };

  let row = short_term_memory::ActiveModel {
    id: Set(Uuid::new_v4()),
    elderly_id: Set(elderly_id),
    content: Set(content.to_owned()),
    embedding: Set(embedding),
    created_at: NotSet,
  };

  let inserted = short_term_memory::Entity::insert(row)
    .exec_with_returning(db)
    .await?;

  tracing::info!(id = %inserted.id, "stored short-term memory");

  Ok(Insertion {
    id: inserted.id,
    created_at: inserted.created_at,
  })
}
