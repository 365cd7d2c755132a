//! The document abstraction every persisted record implements.
//!
//! Records are stored whole as JSON. A handful of fields are copied into
//! indexed columns (the [`Projection`]) so the store can look records up and
//! enforce uniqueness without parsing every document.

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

/// The collection a document lives in.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Collection {
  People,
  Registrations,
  Testimonies,
  Sermons,
  Media,
  AudioMessages,
  Events,
}

/// Indexed fields a document can be looked up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Email,
  RegistrationCode,
  /// Digest of a confirmation token that is still pending.
  TokenDigest,
  /// Digest of a confirmation token that has already been used.
  SpentTokenDigest,
  Role,
}

/// Values copied out of a document into indexed columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
  pub email:              Option<String>,
  pub registration_code:  Option<String>,
  pub token_digest:       Option<String>,
  pub spent_token_digest: Option<String>,
  pub role:               Option<String>,
  pub is_confirmed:       bool,
  /// Whether the document may be shown on the public site.
  pub visible:            bool,
}

impl Projection {
  pub fn get(&self, field: Field) -> Option<&str> {
    match field {
      Field::Email => self.email.as_deref(),
      Field::RegistrationCode => self.registration_code.as_deref(),
      Field::TokenDigest => self.token_digest.as_deref(),
      Field::SpentTokenDigest => self.spent_token_digest.as_deref(),
      Field::Role => self.role.as_deref(),
    }
  }
}

/// A record owned by the document store.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
  const COLLECTION: Collection;

  fn id(&self) -> Uuid;

  /// Listings are ordered newest first by this timestamp.
  fn created_at(&self) -> DateTime<Utc>;

  fn projection(&self) -> Projection { Projection::default() }
}
