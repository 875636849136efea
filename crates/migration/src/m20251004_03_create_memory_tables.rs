use sea_orm_migration::{
  prelude::*,
  schema::{custom, date_null, text, timestamp, uuid},
  sea_orm::Statement,
};

use crate::m20251004_02_create_elderly_profile_table::ElderlyProfile;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(ShortTermMemory::Table)
          .if_not_exists()
          .col(uuid(ShortTermMemory::Id).primary_key())
          .col(uuid(ShortTermMemory::ElderlyId))
          .col(text(ShortTermMemory::Content))
          .col(custom(ShortTermMemory::Embedding, "vector(768)").not_null())
          .col(timestamp(ShortTermMemory::CreatedAt).default(Expr::current_timestamp()))
          .foreign_key(
            ForeignKey::create()
              .from(ShortTermMemory::Table, ShortTermMemory::ElderlyId)
              .to(ElderlyProfile::Table, ElderlyProfile::Id),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(LongTermMemory::Table)
          .if_not_exists()
          .col(uuid(LongTermMemory::Id).primary_key())
          .col(uuid(LongTermMemory::ElderlyId))
          .col(custom(LongTermMemory::Category, "ltm_category_enum").not_null())
          .col(text(LongTermMemory::Key))
          .col(text(LongTermMemory::Value))
          .col(custom(LongTermMemory::Embedding, "vector(768)").not_null())
          .col(timestamp(LongTermMemory::LastUpdated).default(Expr::current_timestamp()))
          .foreign_key(
            ForeignKey::create()
              .from(LongTermMemory::Table, LongTermMemory::ElderlyId)
              .to(ElderlyProfile::Table, ElderlyProfile::Id),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(HealthcareRecords::Table)
          .if_not_exists()
          .col(uuid(HealthcareRecords::Id).primary_key())
          .col(uuid(HealthcareRecords::ElderlyId))
          .col(custom(HealthcareRecords::RecordType, "record_type_enum").not_null())
          .col(text(HealthcareRecords::Description))
          .col(date_null(HealthcareRecords::DiagnosisDate))
          .col(custom(HealthcareRecords::Embedding, "vector(768)").not_null())
          .col(timestamp(HealthcareRecords::LastUpdated).default(Expr::current_timestamp()))
          .foreign_key(
            ForeignKey::create()
              .from(HealthcareRecords::Table, HealthcareRecords::ElderlyId)
              .to(ElderlyProfile::Table, ElderlyProfile::Id),
          )
          .to_owned(),
      )
      .await?;

    // Text shadows of the enum columns so BM25 can index them
    let statements = [
      "ALTER TABLE long_term_memory ADD COLUMN category_search TEXT GENERATED ALWAYS AS (category::text) STORED;",
      "ALTER TABLE healthcare_records ADD COLUMN record_type_search TEXT GENERATED ALWAYS AS (record_type::text) STORED;",
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
    manager
      .drop_table(Table::drop().table(HealthcareRecords::Table).to_owned())
      .await?;
    manager
      .drop_table(Table::drop().table(LongTermMemory::Table).to_owned())
      .await?;
    manager
      .drop_table(Table::drop().table(ShortTermMemory::Table).to_owned())
      .await?;

    Ok(())
  }
}

#[derive(Iden)]
pub enum ShortTermMemory {
  Table,

  Id,
  ElderlyId,

  // memory content (for bm25)
  Content,
  // content embedding (for cosine similarity)
  Embedding,

  CreatedAt,
}

#[derive(Iden)]
pub enum LongTermMemory {
  Table,

  Id,
  ElderlyId,

  Category,
  Key,
  Value,
  // value embedding (for cosine similarity)
  Embedding,

  LastUpdated,
}

#[derive(Iden)]
pub enum HealthcareRecords {
  Table,

  Id,
  ElderlyId,

  RecordType,
  Description,
  DiagnosisDate,
  // description embedding (for cosine similarity)
  Embedding,

  LastUpdated,
}
