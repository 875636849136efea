use sea_orm::entity::prelude::*;

use crate::sea_orm_active_enums::{Gender, MaritalStatus};

/// Caregiver-facing profile. Sensitive columns are pgcrypto-encrypted
/// BYTEA; decryption happens in SQL with the server-held key, never here.
#[derive(Debug, Clone, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "elderly_profile")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: Uuid,
  pub name: Option<Vec<u8>>,
  pub date_of_birth: Option<Vec<u8>>,
  pub gender: Option<Gender>,
  pub nationality: Option<Vec<u8>>,
  pub dialect_group: Option<Vec<u8>>,
  pub marital_status: Option<MaritalStatus>,
  pub address: Option<Vec<u8>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "super::short_term_memory::Entity")]
  ShortTermMemory,
  #[sea_orm(has_many = "super::long_term_memory::Entity")]
  LongTermMemory,
  #[sea_orm(has_many = "super::healthcare_records::Entity")]
  HealthcareRecords,
}

impl Related<super::short_term_memory::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::ShortTermMemory.def()
  }
}

impl Related<super::long_term_memory::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::LongTermMemory.def()
  }
}

impl Related<super::healthcare_records::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::HealthcareRecords.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
