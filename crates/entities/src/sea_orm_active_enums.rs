use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ltm_category_enum")]
#[serde(rename_all = "lowercase")]
pub enum LtmCategory {
  #[sea_orm(string_value = "personal")]
  Personal,
  #[sea_orm(string_value = "family")]
  Family,
  #[sea_orm(string_value = "education")]
  Education,
  #[sea_orm(string_value = "career")]
  Career,
  #[sea_orm(string_value = "lifestyle")]
  Lifestyle,
  #[sea_orm(string_value = "finance")]
  Finance,
  #[sea_orm(string_value = "legal")]
  Legal,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "record_type_enum")]
#[serde(rename_all = "lowercase")]
pub enum HealthRecordType {
  #[sea_orm(string_value = "condition")]
  Condition,
  #[sea_orm(string_value = "procedure")]
  Procedure,
  #[sea_orm(string_value = "appointment")]
  Appointment,
  #[sea_orm(string_value = "medication")]
  Medication,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "gender_enum")]
pub enum Gender {
  #[sea_orm(string_value = "Male")]
  Male,
  #[sea_orm(string_value = "Female")]
  Female,
  #[sea_orm(string_value = "Other")]
  Other,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "marital_enum")]
pub enum MaritalStatus {
  #[sea_orm(string_value = "Single")]
  Single,
  #[sea_orm(string_value = "Married")]
  Married,
  #[sea_orm(string_value = "Widowed")]
  Widowed,
  #[sea_orm(string_value = "Divorced")]
  Divorced,
}
