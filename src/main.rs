use std::time::Duration;

use eldermem_migration::{Migrator, MigratorTrait};
use eldermem_server::server;
use eldermem_shared::{APP_ENV, AppError};
use sea_orm::{ConnectOptions, Database};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .with(tracing_error::ErrorLayer::default())
    .init();

  // ~5 warm connections bursting to 10, pre-pinged on checkout and
  // recycled every ten minutes
  let mut options = ConnectOptions::new(APP_ENV.database_url.as_str());
  options
    .min_connections(5)
    .max_connections(10)
    .test_before_acquire(true)
    .max_lifetime(Duration::from_secs(600));

  let db = Database::connect(options).await?;

  // Apply all pending migrations
  // https://www.sea-ql.org/SeaORM/docs/migration/running-migration/#migrating-programmatically
  Migrator::up(&db, None).await?;

  server(db).await?;

  Ok(())
}
