//! API error type and its envelope rendering.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use retreat_core::Error as CoreError;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] CoreError),

  #[error("unauthorized")]
  Unauthorized,

  /// Unparseable body, path or query.
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

fn failure(status: StatusCode, error: Value) -> Response {
  (status, Json(json!({ "success": false, "error": error }))).into_response()
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Unauthorized => {
        let mut res = failure(StatusCode::UNAUTHORIZED, json!("unauthorized"));
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"retreat-admin\""),
        );
        res
      }
      ApiError::BadRequest(msg) => failure(StatusCode::BAD_REQUEST, json!(msg)),
      ApiError::NotFound(msg) => failure(StatusCode::NOT_FOUND, json!(msg)),
      ApiError::Core(e) => match e {
        CoreError::Validation(violations) => failure(
          StatusCode::BAD_REQUEST,
          json!({ "message": "validation failed", "details": violations }),
        ),
        CoreError::Conflict(msg) => failure(StatusCode::BAD_REQUEST, json!(msg)),
        CoreError::NotFound(msg) => failure(StatusCode::NOT_FOUND, json!(msg)),
        CoreError::InvalidToken => failure(StatusCode::NOT_FOUND, json!(e.to_string())),
        CoreError::Store(_) | CoreError::Serialization(_) => {
          error!(error = %e, "request failed");
          failure(StatusCode::INTERNAL_SERVER_ERROR, json!("internal server error"))
        }
      },
    }
  }
}
