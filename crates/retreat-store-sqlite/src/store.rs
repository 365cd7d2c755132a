//! [`SqliteStore`], the SQLite implementation of [`DocumentStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use tracing::debug;
use uuid::Uuid;

use retreat_core::{
  document::{Document, Field},
  store::DocumentStore,
};

use crate::{
  Error, Result,
  encode::{EncodedDocument, RawDocument, encode_uuid},
  schema::SCHEMA,
};

/// Projected column backing each queryable field.
fn column(field: Field) -> &'static str {
  match field {
    Field::Email => "email",
    Field::RegistrationCode => "registration_code",
    Field::TokenDigest => "token_digest",
    Field::SpentTokenDigest => "spent_token_digest",
    Field::Role => "role",
  }
}

fn read_doc(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawDocument> {
  Ok(RawDocument { doc: row.get(0)? })
}

fn decode_all<D: Document>(raws: Vec<RawDocument>) -> Result<Vec<D>> {
  raws.into_iter().map(RawDocument::decode).collect()
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A document store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection handle is shared.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Close the underlying connection. Later calls on any clone fail.
  pub async fn close(&self) -> Result<()> {
    self.conn.clone().close().await?;
    debug!("sqlite connection closed");
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── DocumentStore impl ──────────────────────────────────────────────────────

impl DocumentStore for SqliteStore {
  type Error = Error;

  async fn insert<D: Document>(&self, doc: &D) -> Result<()> {
    let row = EncodedDocument::new(doc)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (
             collection, id, doc, created_at, email, registration_code,
             token_digest, spent_token_digest, role, is_confirmed, visible
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            row.collection,
            row.id,
            row.doc,
            row.created_at,
            row.email,
            row.registration_code,
            row.token_digest,
            row.spent_token_digest,
            row.role,
            row.is_confirmed,
            row.visible,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn find_by_id<D: Document>(&self, id: Uuid) -> Result<Option<D>> {
    let collection: &'static str = D::COLLECTION.into();
    let id_str = encode_uuid(id);

    let raw: Option<RawDocument> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT doc FROM documents WHERE collection = ?1 AND id = ?2",
            rusqlite::params![collection, id_str],
            read_doc,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawDocument::decode).transpose()
  }

  async fn find_by_ids<D: Document>(&self, ids: &[Uuid]) -> Result<Vec<D>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }
    let collection: &'static str = D::COLLECTION.into();
    let id_strs: Vec<String> = ids.iter().copied().map(encode_uuid).collect();

    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; id_strs.len()].join(", ");
        let sql = format!(
          "SELECT doc FROM documents
           WHERE collection = ? AND id IN ({placeholders})
           ORDER BY created_at DESC, rowid DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let params = std::iter::once(collection.to_owned()).chain(id_strs);
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), read_doc)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    decode_all(raws)
  }

  async fn find_by_field<D: Document>(&self, field: Field, value: &str) -> Result<Vec<D>> {
    let collection: &'static str = D::COLLECTION.into();
    let value = value.to_owned();
    let sql = format!(
      "SELECT doc FROM documents
       WHERE collection = ?1 AND {} = ?2
       ORDER BY created_at DESC, rowid DESC",
      column(field)
    );

    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![collection, value], read_doc)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    decode_all(raws)
  }

  async fn list<D: Document>(&self, visible_only: bool) -> Result<Vec<D>> {
    let collection: &'static str = D::COLLECTION.into();

    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT doc FROM documents
           WHERE collection = ?1 AND (?2 = 0 OR visible = 1)
           ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![collection, visible_only], read_doc)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    decode_all(raws)
  }

  async fn replace<D: Document>(&self, doc: &D) -> Result<bool> {
    let row = EncodedDocument::new(doc)?;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE documents SET
             doc = ?3, email = ?4, registration_code = ?5, token_digest = ?6,
             spent_token_digest = ?7, role = ?8, is_confirmed = ?9, visible = ?10
           WHERE collection = ?1 AND id = ?2",
          rusqlite::params![
            row.collection,
            row.id,
            row.doc,
            row.email,
            row.registration_code,
            row.token_digest,
            row.spent_token_digest,
            row.role,
            row.is_confirmed,
            row.visible,
          ],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn delete<D: Document>(&self, id: Uuid) -> Result<bool> {
    let collection: &'static str = D::COLLECTION.into();
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
          rusqlite::params![collection, id_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }
}
