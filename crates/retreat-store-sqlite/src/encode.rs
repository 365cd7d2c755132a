//! Encoding helpers between domain documents and the plain-text columns
//! stored in SQLite.
//!
//! Timestamps are RFC 3339 strings with fixed microsecond precision so they
//! sort lexically. UUIDs are hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use retreat_core::document::Document;
use uuid::Uuid;

use crate::Result;

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Micros, true) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Every column of a `documents` row, ready to bind.
pub struct EncodedDocument {
  pub collection:         &'static str,
  pub id:                 String,
  pub doc:                String,
  pub created_at:         String,
  pub email:              Option<String>,
  pub registration_code:  Option<String>,
  pub token_digest:       Option<String>,
  pub spent_token_digest: Option<String>,
  pub role:               Option<String>,
  pub is_confirmed:       bool,
  pub visible:            bool,
}

impl EncodedDocument {
  pub fn new<D: Document>(doc: &D) -> Result<Self> {
    let p = doc.projection();
    Ok(Self {
      collection:         D::COLLECTION.into(),
      id:                 encode_uuid(doc.id()),
      doc:                serde_json::to_string(doc)?,
      created_at:         encode_dt(doc.created_at()),
      email:              p.email,
      registration_code:  p.registration_code,
      token_digest:       p.token_digest,
      spent_token_digest: p.spent_token_digest,
      role:               p.role,
      is_confirmed:       p.is_confirmed,
      visible:            p.visible,
    })
  }
}

/// Raw JSON body read from the `doc` column.
pub struct RawDocument {
  pub doc: String,
}

impl RawDocument {
  pub fn decode<D: Document>(self) -> Result<D> { Ok(serde_json::from_str(&self.doc)?) }
}
