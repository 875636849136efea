use std::sync::Arc;

use eldermem_graph::{OfflineGraph, OnlineGraph, SessionContext};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

/// Long-lived request-handling resources: the pool-backed session plus the
/// two compiled graphs. Graphs are built once at startup and shared.
#[derive(Clone)]
pub struct AppState {
  pub session: SessionContext,
  pub offline: Arc<OfflineGraph>,
  pub online: Arc<OnlineGraph>,
}

impl AppState {
  #[must_use]
  pub fn new(db: DatabaseConnection, elderly_id: Uuid) -> Self {
    let session = SessionContext::new(db, elderly_id);
    Self {
      offline: Arc::new(OfflineGraph::new(session.clone())),
      online: Arc::new(OnlineGraph::new(session.clone())),
      session,
    }
  }
}
