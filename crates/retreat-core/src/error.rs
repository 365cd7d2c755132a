//! Error types for `retreat-core`.

use thiserror::Error;

use crate::{document::Collection, store::StoreError, validate::Violations};

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed or missing input; always raised before anything is persisted.
  #[error("validation failed: {0}")]
  Validation(Violations),

  #[error("not found: {0}")]
  NotFound(String),

  /// No pending record matches the token. Unknown and expired tokens are
  /// reported the same way.
  #[error("invalid or expired confirmation token")]
  InvalidToken,

  /// The record exists but is in the wrong state, or a unique field clashes.
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Classify a store failure. Unique-index violations become conflicts.
  pub fn store<E: StoreError>(err: E) -> Self {
    if err.is_unique_violation() {
      Self::Conflict("a record with the same key already exists".into())
    } else {
      Self::Store(Box::new(err))
    }
  }

  /// Like [`Error::store`], naming the unique key of `collection` in the
  /// conflict message.
  pub fn store_in<E: StoreError>(collection: Collection, err: E) -> Self {
    if !err.is_unique_violation() {
      return Self::Store(Box::new(err));
    }
    let message = match collection {
      Collection::Registrations => "a confirmed registration already exists for this email",
      Collection::People => "a person with this email is already registered",
      _ => "a record with the same key already exists",
    };
    Self::Conflict(message.into())
  }

  /// Shorthand for a single-field validation failure.
  pub fn invalid(field: &str, message: impl Into<String>) -> Self {
    let mut violations = Violations::new();
    violations.push(field, message);
    Self::Validation(violations)
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::MemoryError;

  #[test]
  fn unique_violations_become_conflicts() {
    assert!(matches!(Error::store(MemoryError::Unique), Error::Conflict(_)));

    let err = Error::store_in(Collection::Registrations, MemoryError::Unique);
    let Error::Conflict(message) = err else { panic!("expected conflict, got {err:?}") };
    assert_eq!(message, "a confirmed registration already exists for this email");
  }

  #[test]
  fn other_store_failures_are_faults() {
    let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(Error::store(MemoryError::Json(json)), Error::Store(_)));

    let json = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
    let err = Error::store_in(Collection::People, MemoryError::Json(json));
    assert!(matches!(err, Error::Store(_)));
  }
}
