pub use sea_orm_migration::*;

mod m20251004_01_create_extensions_and_enums;
mod m20251004_02_create_elderly_profile_table;
mod m20251004_03_create_memory_tables;
mod m20251004_04_create_memory_indexes;
mod m20251005_01_seed_demo_profile;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20251004_01_create_extensions_and_enums::Migration),
      Box::new(m20251004_02_create_elderly_profile_table::Migration),
      Box::new(m20251004_03_create_memory_tables::Migration),
      Box::new(m20251004_04_create_memory_indexes::Migration),
      Box::new(m20251005_01_seed_demo_profile::Migration),
    ]
  }
}
