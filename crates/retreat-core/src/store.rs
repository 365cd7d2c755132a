//! The `DocumentStore` trait.
//!
//! Implemented by storage backends (e.g. `retreat-store-sqlite`). Workflows
//! receive a store by reference; nothing in this crate reaches for a global
//! connection.

use std::future::Future;

use uuid::Uuid;

use crate::document::{Document, Field};

/// Backend errors must say whether they were caused by a unique index, which
/// is the real backstop against concurrent duplicate submissions.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_unique_violation(&self) -> bool;
}

/// Abstraction over a document store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait DocumentStore: Send + Sync {
  type Error: StoreError;

  /// Persist a new document. Fails with a unique violation if an indexed
  /// unique field is already taken.
  fn insert<'a, D: Document>(
    &'a self,
    doc: &'a D,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Retrieve a document by id. Returns `None` if not found.
  fn find_by_id<D: Document>(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<D>, Self::Error>> + Send + '_;

  /// Retrieve every document whose id is in `ids`, in one query. Ids that do
  /// not resolve are silently skipped.
  fn find_by_ids<'a, D: Document>(
    &'a self,
    ids: &'a [Uuid],
  ) -> impl Future<Output = Result<Vec<D>, Self::Error>> + Send + 'a;

  /// Exact match on an indexed field, newest first.
  fn find_by_field<'a, D: Document>(
    &'a self,
    field: Field,
    value: &'a str,
  ) -> impl Future<Output = Result<Vec<D>, Self::Error>> + Send + 'a;

  /// All documents of a collection, newest first; optionally only those
  /// visible on the public site.
  fn list<D: Document>(
    &self,
    visible_only: bool,
  ) -> impl Future<Output = Result<Vec<D>, Self::Error>> + Send + '_;

  /// Overwrite a stored document. Returns `false` if no document has its id.
  fn replace<'a, D: Document>(
    &'a self,
    doc: &'a D,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Remove a document. Returns `false` if it did not exist.
  fn delete<D: Document>(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
