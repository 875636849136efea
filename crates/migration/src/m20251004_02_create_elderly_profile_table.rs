use sea_orm_migration::{
  prelude::*,
  schema::{binary_null, uuid},
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(ElderlyProfile::Table)
          .if_not_exists()
          .col(uuid(ElderlyProfile::Id).primary_key())
          // pgp_sym_encrypt'ed with the server-held key
          .col(binary_null(ElderlyProfile::Name))
          .col(binary_null(ElderlyProfile::DateOfBirth))
          .col(
            ColumnDef::new(ElderlyProfile::Gender)
              .custom(Alias::new("gender_enum"))
              .null(),
          )
          .col(binary_null(ElderlyProfile::Nationality))
          .col(binary_null(ElderlyProfile::DialectGroup))
          .col(
            ColumnDef::new(ElderlyProfile::MaritalStatus)
              .custom(Alias::new("marital_enum"))
              .null(),
          )
          .col(binary_null(ElderlyProfile::Address))
          .to_owned(),
      )
      .await?;

    Ok(())
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(ElderlyProfile::Table).to_owned())
      .await?;

    Ok(())
  }
}

#[derive(Iden)]
pub enum ElderlyProfile {
  Table,

  Id, // uuid v4

  // Encrypted BYTEA
  Name,
  DateOfBirth,
  Nationality,
  DialectGroup,
  Address,

  // Plain enums
  Gender,
  MaritalStatus,
}
