//! Self-service sign-up: validate, check for duplicates, issue a token,
//! persist pending, send the confirmation email.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::Settings;
use crate::{
  Error, Result,
  confirmation::{Confirmable, Confirmation},
  document::Field,
  notify::{self, Notification, NotificationStatus, Notifier, Template},
  person::{Person, PersonForm},
  registration::{Registration, RegistrationForm},
  store::DocumentStore,
  token,
  validate::{Validate, normalize_email},
};

const CHECK_INBOX: &str =
  "Registration received. Please check your inbox for a confirmation link.";

/// Result of a successful submission.
#[derive(Debug, Clone, Serialize)]
pub struct Submitted {
  pub id:                Uuid,
  pub registration_code: String,
  /// Carried in the response envelope, not the payload.
  #[serde(skip)]
  pub message:           String,
  /// The record stays persisted even when this reports a failure.
  pub notification:      NotificationStatus,
}

/// Submit a camp registration.
///
/// Rejected when a *confirmed* registration already exists for the email;
/// further pending registrations for the same email are accepted.
pub async fn submit_registration<S, N>(
  store: &S,
  notifier: &N,
  settings: &Settings,
  form: RegistrationForm,
) -> Result<Submitted>
where
  S: DocumentStore,
  N: Notifier,
{
  form.validate()?;
  let email = normalize_email(&form.email);

  let existing: Vec<Registration> = store
    .find_by_field(Field::Email, &email)
    .await
    .map_err(Error::store)?;
  if existing.iter().any(|r| r.confirmation.is_confirmed()) {
    return Err(Error::Conflict(format!(
      "a confirmed registration already exists for {email}"
    )));
  }

  let (token, digest) = token::generate_token();
  let now = Utc::now();
  let registration = form.into_registration(
    token::generate_registration_code(),
    Confirmation::pending(digest, expiry(now, settings)),
    now,
  )?;

  persist_and_notify(store, notifier, registration, token).await
}

/// Submit a participant, volunteer or staff sign-up. Email is unique across
/// all people, pending or not.
pub async fn submit_person<S, N>(
  store: &S,
  notifier: &N,
  settings: &Settings,
  form: PersonForm,
) -> Result<Submitted>
where
  S: DocumentStore,
  N: Notifier,
{
  form.validate()?;
  let email = normalize_email(&form.email);

  let existing: Vec<Person> = store
    .find_by_field(Field::Email, &email)
    .await
    .map_err(Error::store)?;
  if !existing.is_empty() {
    return Err(Error::Conflict(format!("{email} is already registered")));
  }

  let (token, digest) = token::generate_token();
  let now = Utc::now();
  let person = form.into_person(
    token::generate_registration_code(),
    Confirmation::pending(digest, expiry(now, settings)),
    now,
  )?;

  persist_and_notify(store, notifier, person, token).await
}

/// Saturates instead of overflowing on an absurd TTL.
fn expiry(now: DateTime<Utc>, settings: &Settings) -> DateTime<Utc> {
  now.checked_add_signed(settings.token_ttl).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

async fn persist_and_notify<S, N, D>(
  store: &S,
  notifier: &N,
  record: D,
  token: String,
) -> Result<Submitted>
where
  S: DocumentStore,
  N: Notifier,
  D: Confirmable,
{
  store
    .insert(&record)
    .await
    .map_err(|e| Error::store_in(D::COLLECTION, e))?;

  let id = record.id();
  let registration_code = record.registration_code().to_owned();
  info!(
    %id,
    code = %registration_code,
    collection = %D::COLLECTION,
    "pending record created"
  );

  let notification = notify::dispatch(notifier, Notification {
    to:       record.recipient(),
    template: Template::Confirmation {
      kind: D::KIND,
      token,
      registration_code: registration_code.clone(),
    },
  })
  .await;

  Ok(Submitted {
    id,
    registration_code,
    message: CHECK_INBOX.to_owned(),
    notification,
  })
}
