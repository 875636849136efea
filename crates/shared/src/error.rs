use std::{
  backtrace::{Backtrace, BacktraceStatus},
  fmt::Display,
};

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};

#[derive(Debug)]
pub struct AppError {
  err: anyhow::Error,
  status_code: StatusCode,
}

impl AppError {
  /// Create with 500 status
  pub fn new<E: Into<anyhow::Error>>(err: E) -> Self {
    Self {
      err: err.into(),
      status_code: StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  /// Create with custom status
  pub fn with_status<E: Into<anyhow::Error>>(status: StatusCode, err: E) -> Self {
    Self {
      err: err.into(),
      status_code: status,
    }
  }

  /// Bad input shape, empty strings, unknown enum values (400)
  pub fn validation(msg: impl Display) -> Self {
    Self::with_status(StatusCode::BAD_REQUEST, anyhow::anyhow!("{msg}"))
  }

  /// Referenced record or profile missing (404)
  pub fn not_found(msg: impl Display) -> Self {
    Self::with_status(StatusCode::NOT_FOUND, anyhow::anyhow!("{msg}"))
  }

  #[must_use]
  pub const fn status_code(&self) -> StatusCode {
    self.status_code
  }

  #[must_use]
  pub fn is_client_error(&self) -> bool {
    self.status_code.is_client_error()
  }

  /// Get backtrace from anyhow (requires `RUST_BACKTRACE=1` to capture)
  pub fn backtrace(&self) -> &Backtrace {
    self.err.backtrace()
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let message = if self.status_code.is_client_error() {
      self.err.to_string()
    } else if cfg!(debug_assertions) {
      let bt = self.err.backtrace();
      if bt.status() == BacktraceStatus::Captured {
        format!("{}\nBacktrace:\n{}", self.err, bt)
      } else {
        format!(
          "{}\n(hint: set RUST_BACKTRACE=1 to enable backtrace)",
          self.err
        )
      }
    } else {
      // Never leak internals past the facade
      "Internal Server Error".to_owned()
    };

    (
      self.status_code,
      Json(serde_json::json!({ "error": message })),
    )
      .into_response()
  }
}

impl Display for AppError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "[{}] {}", self.status_code, self.err)
  }
}

impl<E> From<E> for AppError
where
  E: Into<anyhow::Error>,
{
  fn from(err: E) -> Self {
    Self::new(err)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn validation_maps_to_400() {
    let err = AppError::validation("content is required and cannot be empty");
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert!(err.is_client_error());
  }

  #[test]
  fn not_found_maps_to_404() {
    let err = AppError::not_found("elderly profile not found");
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
  }

  #[test]
  fn anyhow_conversion_defaults_to_500() {
    let err: AppError = anyhow::anyhow!("boom").into();
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
