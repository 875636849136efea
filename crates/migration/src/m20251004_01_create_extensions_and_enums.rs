use sea_orm_migration::{prelude::*, sea_orm::Statement};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    let statements = [
      // Extensions: cosine kNN, symmetric encryption, BM25 full text
      "CREATE EXTENSION IF NOT EXISTS vector;",
      "CREATE EXTENSION IF NOT EXISTS pgcrypto;",
      "CREATE EXTENSION IF NOT EXISTS pg_search;",
      // Enum types
      "CREATE TYPE gender_enum AS ENUM ('Male','Female','Other');",
      "CREATE TYPE marital_enum AS ENUM ('Single','Married','Widowed','Divorced');",
      "CREATE TYPE ltm_category_enum AS ENUM ('personal','family','education','career','lifestyle','finance','legal');",
      "CREATE TYPE record_type_enum AS ENUM ('condition','procedure','appointment','medication');",
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
      "DROP TYPE IF EXISTS record_type_enum;",
      "DROP TYPE IF EXISTS ltm_category_enum;",
      "DROP TYPE IF EXISTS marital_enum;",
      "DROP TYPE IF EXISTS gender_enum;",
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
