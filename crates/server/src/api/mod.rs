use axum::{Json, Router, routing::{get, post}};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::utils::AppState;

mod invoke;

pub use invoke::{InvokeRequest, InvokeResponse, TopicHint};

#[derive(OpenApi)]
#[openapi(
  info(
    title = "Eldermem API",
    version = "0.1.0",
    description = "Elder-care conversational memory service"
  ),
  paths(invoke::invoke),
  components(schemas(
    InvokeRequest,
    InvokeResponse,
    TopicHint,
    eldermem_core::FinalChunk,
    eldermem_core::RecordFields,
    eldermem_graph::QaType,
  ))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
  Json(ApiDoc::openapi())
}

pub fn app() -> Router<AppState> {
  Router::new()
    .route("/invoke", post(invoke::invoke))
    .route("/openapi.json", get(openapi_json))
    .merge(Scalar::with_url("/openapi/", ApiDoc::openapi()))
}
