//! The emailed-token confirmation lifecycle shared by registrations and
//! people.
//!
//! ```text
//! PENDING --confirm--> CONFIRMED (terminal)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  document::Document,
  notify::{ConfirmKind, Recipient},
};

/// A record is either waiting for its token or confirmed; it can never hold a
/// live token and be confirmed at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Confirmation {
  Pending {
    token_digest: String,
    /// Stored for reference; the confirm path does not enforce it.
    expires_at:   DateTime<Utc>,
  },
  Confirmed {
    confirmed_at:       DateTime<Utc>,
    /// Digest of the token that was used, kept so a replay can be answered
    /// with "already confirmed" instead of "invalid".
    spent_token_digest: Option<String>,
  },
}

impl Confirmation {
  pub fn pending(token_digest: String, expires_at: DateTime<Utc>) -> Self {
    Self::Pending { token_digest, expires_at }
  }

  pub fn is_confirmed(&self) -> bool { matches!(self, Self::Confirmed { .. }) }

  pub fn confirmed_at(&self) -> Option<DateTime<Utc>> {
    match self {
      Self::Confirmed { confirmed_at, .. } => Some(*confirmed_at),
      Self::Pending { .. } => None,
    }
  }

  pub fn expires_at(&self) -> Option<DateTime<Utc>> {
    match self {
      Self::Pending { expires_at, .. } => Some(*expires_at),
      Self::Confirmed { .. } => None,
    }
  }

  pub fn token_digest(&self) -> Option<&str> {
    match self {
      Self::Pending { token_digest, .. } => Some(token_digest),
      Self::Confirmed { .. } => None,
    }
  }

  pub fn spent_token_digest(&self) -> Option<&str> {
    match self {
      Self::Confirmed { spent_token_digest, .. } => spent_token_digest.as_deref(),
      Self::Pending { .. } => None,
    }
  }

  /// Move from pending to confirmed, clearing the live token. Returns `false`
  /// (and changes nothing) if already confirmed.
  pub fn confirm(&mut self, at: DateTime<Utc>) -> bool {
    match self {
      Self::Pending { token_digest, .. } => {
        let spent = std::mem::take(token_digest);
        *self = Self::Confirmed { confirmed_at: at, spent_token_digest: Some(spent) };
        true
      }
      Self::Confirmed { .. } => false,
    }
  }
}

/// Records that go through the confirmation lifecycle.
pub trait Confirmable: Document {
  /// Which confirmation link the emailed token belongs to.
  const KIND: ConfirmKind;

  fn confirmation(&self) -> &Confirmation;

  fn confirmation_mut(&mut self) -> &mut Confirmation;

  fn registration_code(&self) -> &str;

  fn recipient(&self) -> Recipient;

  /// Called right after the PENDING → CONFIRMED transition, before persisting.
  fn on_confirmed(&mut self, _at: DateTime<Utc>) {}
}

#[cfg(test)]
mod tests {
  use chrono::Duration;

  use super::*;

  #[test]
  fn confirm_clears_token_and_sets_timestamp() {
    let now = Utc::now();
    let mut c = Confirmation::pending("abc".into(), now + Duration::hours(48));
    assert!(!c.is_confirmed());
    assert_eq!(c.token_digest(), Some("abc"));

    assert!(c.confirm(now));
    assert!(c.is_confirmed());
    assert_eq!(c.confirmed_at(), Some(now));
    assert_eq!(c.token_digest(), None);
    assert_eq!(c.spent_token_digest(), Some("abc"));
    assert_eq!(c.expires_at(), None);
  }

  #[test]
  fn confirm_twice_is_rejected_without_change() {
    let now = Utc::now();
    let mut c = Confirmation::pending("abc".into(), now);
    assert!(c.confirm(now));
    let snapshot = c.clone();
    assert!(!c.confirm(now + Duration::minutes(5)));
    assert_eq!(c, snapshot);
  }

  #[test]
  fn serializes_with_state_tag() {
    let c = Confirmation::pending("abc".into(), Utc::now());
    let json = serde_json::to_value(&c).unwrap();
    assert_eq!(json["state"], "pending");
    assert_eq!(json["token_digest"], "abc");
  }
}
