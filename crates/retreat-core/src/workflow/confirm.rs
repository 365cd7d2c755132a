//! Token confirmation: PENDING → CONFIRMED, then a welcome email.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::{
  Error, Result,
  confirmation::Confirmable,
  document::Field,
  notify::{self, Notification, NotificationStatus, Notifier, Template},
  person::Person,
  registration::Registration,
  store::DocumentStore,
  token,
};

const CONFIRMED: &str = "Your registration is confirmed. We look forward to seeing you!";
const ALREADY_CONFIRMED: &str = "this registration has already been confirmed";

#[derive(Debug, Clone, Serialize)]
pub struct Confirmed {
  pub id:                Uuid,
  pub registration_code: String,
  pub confirmed_at:      DateTime<Utc>,
  /// Carried in the response envelope, not the payload.
  #[serde(skip)]
  pub message:           String,
  /// The welcome email; a failure here does not undo the confirmation.
  pub notification:      NotificationStatus,
}

pub async fn confirm_registration<S, N>(store: &S, notifier: &N, token: &str) -> Result<Confirmed>
where
  S: DocumentStore,
  N: Notifier,
{
  confirm::<S, N, Registration>(store, notifier, token).await
}

pub async fn confirm_person<S, N>(store: &S, notifier: &N, token: &str) -> Result<Confirmed>
where
  S: DocumentStore,
  N: Notifier,
{
  confirm::<S, N, Person>(store, notifier, token).await
}

/// Confirm the record of type `D` holding `token`.
///
/// Unknown tokens yield [`Error::InvalidToken`]; a token that was already used
/// yields [`Error::Conflict`]. Read-then-write without locking: two concurrent
/// confirms may both succeed and both send a welcome email, leaving the same
/// final state.
pub async fn confirm<S, N, D>(store: &S, notifier: &N, token: &str) -> Result<Confirmed>
where
  S: DocumentStore,
  N: Notifier,
  D: Confirmable,
{
  let token = token.trim();
  if token.is_empty() {
    return Err(Error::InvalidToken);
  }
  let digest = token::digest_token(token);

  let pending: Option<D> = store
    .find_by_field(Field::TokenDigest, &digest)
    .await
    .map_err(Error::store)?
    .into_iter()
    .next();

  let Some(mut record) = pending else {
    let spent: Vec<D> = store
      .find_by_field(Field::SpentTokenDigest, &digest)
      .await
      .map_err(Error::store)?;
    return Err(if spent.is_empty() {
      Error::InvalidToken
    } else {
      Error::Conflict(ALREADY_CONFIRMED.into())
    });
  };

  let now = Utc::now();
  if !record.confirmation_mut().confirm(now) {
    return Err(Error::Conflict(ALREADY_CONFIRMED.into()));
  }
  record.on_confirmed(now);

  if !store
    .replace(&record)
    .await
    .map_err(|e| Error::store_in(D::COLLECTION, e))?
  {
    // Deleted between the lookup and the write.
    return Err(Error::InvalidToken);
  }

  let id = record.id();
  let registration_code = record.registration_code().to_owned();
  info!(%id, code = %registration_code, collection = %D::COLLECTION, "record confirmed");

  let notification = notify::dispatch(notifier, Notification {
    to:       record.recipient(),
    template: Template::Welcome { registration_code: registration_code.clone() },
  })
  .await;

  Ok(Confirmed {
    id,
    registration_code,
    confirmed_at: now,
    message: CONFIRMED.to_owned(),
    notification,
  })
}
