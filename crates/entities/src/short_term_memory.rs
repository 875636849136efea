use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "short_term_memory")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: Uuid,
  pub elderly_id: Uuid,
  pub content: String,
  #[serde(skip)]
  pub embedding: PgVector,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "super::elderly_profile::Entity",
    from = "Column::ElderlyId",
    to = "super::elderly_profile::Column::Id"
  )]
  ElderlyProfile,
}

impl Related<super::elderly_profile::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::ElderlyProfile.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
