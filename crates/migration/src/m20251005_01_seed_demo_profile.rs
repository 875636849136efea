use eldermem_ai::embed_many;
use eldermem_shared::APP_ENV;
use sea_orm_migration::{prelude::*, sea_orm::Statement};

#[derive(DeriveMigrationName)]
pub struct Migration;

const LTM_SEED: &[(&str, &str, &str)] = &[
  ("career", "occupation", "Retired hawker"),
  ("family", "closest_kin", "Nephew Tan Ma Ne"),
  (
    "lifestyle",
    "likes",
    "Taiwanese soap operas, Channel 8 news, Radio FM 95.8",
  ),
  (
    "lifestyle",
    "dislikes",
    "Computers, digital devices, hot weather",
  ),
];

const HCM_SEED: &[(&str, &str, &str)] = &[
  ("condition", "Hypertension", "2000-01-01"),
  ("condition", "Diabetes Mellitus", "2010-01-01"),
  (
    "procedure",
    "Coronary Artery Disease with angioplasty",
    "2022-03-15",
  ),
  (
    "procedure",
    "Cataract surgery with lens implants",
    "2024-05-01",
  ),
];

const STM_SEED: &[&str] = &[
  "I feel dizzy today.",
  "The chicken rice I ate today was really yummy!",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    let db = manager.get_connection();
    let backend = manager.get_database_backend();
    let elderly_id = APP_ENV.elderly_id;
    let key = APP_ENV.database_encryption_key.as_str();

    db.execute_raw(Statement::from_sql_and_values(
      backend,
      r"
      INSERT INTO elderly_profile
        (id, name, date_of_birth, gender, nationality, dialect_group, marital_status, address)
      VALUES (
        $1,
        pgp_sym_encrypt($2, $8),
        pgp_sym_encrypt($3, $8),
        $4::gender_enum,
        pgp_sym_encrypt($5, $8),
        pgp_sym_encrypt($6, $8),
        'Single'::marital_enum,
        pgp_sym_encrypt($7, $8)
      )
      ON CONFLICT (id) DO NOTHING;
      ",
      [
        elderly_id.into(),
        "Tan Ah Lek".into(),
        "1945-03-27".into(),
        "Male".into(),
        "Singaporean".into(),
        "Hokkien".into(),
        "21 Hui Mui Keng Terrace, i3 Building, Singapore 119613".into(),
        key.into(),
      ],
    ))
    .await?;

    // One batched embedding call for every seed text
    let texts: Vec<String> = LTM_SEED
      .iter()
      .map(|(_, _, value)| (*value).to_owned())
      .chain(HCM_SEED.iter().map(|(_, description, _)| (*description).to_owned()))
      .chain(STM_SEED.iter().map(|content| (*content).to_owned()))
      .collect();

    let mut embeddings = embed_many(&texts)
      .await
      .map_err(|err| DbErr::Custom(format!("seed embedding failed: {err}")))?
      .into_iter();

    for ((category, k, value), embedding) in LTM_SEED.iter().zip(embeddings.by_ref()) {
      db.execute_raw(Statement::from_sql_and_values(
        backend,
        r"
        INSERT INTO long_term_memory (id, elderly_id, category, key, value, embedding)
        VALUES (gen_random_uuid(), $1, $2::ltm_category_enum, $3, $4, $5);
        ",
        [
          elderly_id.into(),
          (*category).into(),
          (*k).into(),
          (*value).into(),
          embedding.into(),
        ],
      ))
      .await?;
    }

    for ((record_type, description, diagnosis_date), embedding) in
      HCM_SEED.iter().zip(embeddings.by_ref())
    {
      db.execute_raw(Statement::from_sql_and_values(
        backend,
        r"
        INSERT INTO healthcare_records
          (id, elderly_id, record_type, description, diagnosis_date, embedding)
        VALUES (gen_random_uuid(), $1, $2::record_type_enum, $3, $4::date, $5);
        ",
        [
          elderly_id.into(),
          (*record_type).into(),
          (*description).into(),
          (*diagnosis_date).into(),
          embedding.into(),
        ],
      ))
      .await?;
    }

    for (content, embedding) in STM_SEED.iter().zip(embeddings) {
      db.execute_raw(Statement::from_sql_and_values(
        backend,
        r"
        INSERT INTO short_term_memory (id, elderly_id, content, embedding)
        VALUES (gen_random_uuid(), $1, $2, $3);
        ",
        [elderly_id.into(), (*content).into(), embedding.into()],
      ))
      .await?;
    }

    tracing::info!(%elderly_id, "seeded demo profile and memories");

    Ok(())
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    let db = manager.get_connection();
    let backend = manager.get_database_backend();
    let elderly_id = APP_ENV.elderly_id;

    for sql in [
      "DELETE FROM short_term_memory WHERE elderly_id = $1;",
      "DELETE FROM long_term_memory WHERE elderly_id = $1;",
      "DELETE FROM healthcare_records WHERE elderly_id = $1;",
      "DELETE FROM elderly_profile WHERE id = $1;",
    ] {
      db.execute_raw(Statement::from_sql_and_values(
        backend,
        sql,
        [elderly_id.into()],
      ))
      .await?;
    }

    Ok(())
  }
}
