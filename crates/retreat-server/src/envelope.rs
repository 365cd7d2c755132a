//! The `{ success, data?, message? }` wrapper every successful response uses.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:    Option<T>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

/// A successful response with its status code.
pub struct Reply<T> {
  status:   StatusCode,
  envelope: Envelope<T>,
}

impl<T: Serialize> Reply<T> {
  pub fn ok(data: T) -> Self {
    Self {
      status:   StatusCode::OK,
      envelope: Envelope { success: true, data: Some(data), message: None },
    }
  }

  pub fn created(data: T) -> Self { Self { status: StatusCode::CREATED, ..Self::ok(data) } }

  pub fn with_message(mut self, message: impl Into<String>) -> Self {
    self.envelope.message = Some(message.into());
    self
  }
}

impl Reply<()> {
  /// No payload, only a message.
  pub fn message(message: impl Into<String>) -> Self {
    Self {
      status:   StatusCode::OK,
      envelope: Envelope { success: true, data: None, message: Some(message.into()) },
    }
  }
}

impl<T: Serialize> IntoResponse for Reply<T> {
  fn into_response(self) -> Response { (self.status, Json(self.envelope)).into_response() }
}
