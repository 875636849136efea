use sea_orm_migration::{prelude::*, sea_orm::Statement};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    let statements = [
      // HNSW indexes for vector similarity search
      "CREATE INDEX idx_stm_embedding_hnsw ON short_term_memory USING hnsw (embedding vector_cosine_ops);",
      "CREATE INDEX idx_ltm_embedding_hnsw ON long_term_memory USING hnsw (embedding vector_cosine_ops);",
      "CREATE INDEX idx_hcm_embedding_hnsw ON healthcare_records USING hnsw (embedding vector_cosine_ops);",
      // BM25 indexes over each bucket's searchable text fields
      "CREATE INDEX idx_stm_content_bm25 ON short_term_memory USING bm25 (id, content) WITH (key_field='id');",
      "CREATE INDEX idx_ltm_fields_bm25 ON long_term_memory USING bm25 (id, category_search, key, value) WITH (key_field='id');",
      "CREATE INDEX idx_hcm_fields_bm25 ON healthcare_records USING bm25 (id, record_type_search, description) WITH (key_field='id');",
    ];

    for sql in statements {
      manager
        .get_connection()
        .execute_raw(Statement::from_string(
          manager.get_database_backend(),
          sql,
        ))
        .await?;
    }

    Ok(())
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    let statements = [
      "DROP INDEX IF EXISTS idx_hcm_fields_bm25;",
      "DROP INDEX IF EXISTS idx_ltm_fields_bm25;",
      "DROP INDEX IF EXISTS idx_stm_content_bm25;",
      "DROP INDEX IF EXISTS idx_hcm_embedding_hnsw;",
      "DROP INDEX IF EXISTS idx_ltm_embedding_hnsw;",
      "DROP INDEX IF EXISTS idx_stm_embedding_hnsw;",
    ];

    for sql in statements {
      manager
        .get_connection()
        .execute_raw(Statement::from_string(
          manager.get_database_backend(),
          sql,
        ))
        .await?;
    }

    Ok(())
  }
}
