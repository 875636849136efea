pub mod elderly_profile;
pub mod healthcare_records;
pub mod long_term_memory;
pub mod sea_orm_active_enums;
pub mod short_term_memory;

pub use sea_orm_active_enums::{Gender, HealthRecordType, LtmCategory, MaritalStatus};
