//! In-memory fakes for workflow tests.

use std::{
  collections::HashSet,
  sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::{
  document::{Collection, Document, Field, Projection},
  notify::{Notification, Notifier, NotifyError, Template},
  person::{Department, Gender, MaritalStatus, PersonForm, PersonRole},
  registration::{Accommodation, EmergencyContactForm, RegistrationForm},
  store::{DocumentStore, StoreError},
};

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MemoryError {
  #[error("unique constraint violated")]
  Unique,
  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

impl StoreError for MemoryError {
  fn is_unique_violation(&self) -> bool { matches!(self, Self::Unique) }
}

struct Entry {
  collection: Collection,
  id:         Uuid,
  created_at: DateTime<Utc>,
  projection: Projection,
  json:       Value,
}

impl Entry {
  fn of<D: Document>(doc: &D) -> Result<Self, MemoryError> {
    Ok(Self {
      collection: D::COLLECTION,
      id:         doc.id(),
      created_at: doc.created_at(),
      projection: doc.projection(),
      json:       serde_json::to_value(doc)?,
    })
  }

  /// Mirrors the unique indexes of the SQLite schema.
  fn clashes_with(&self, other: &Entry) -> bool {
    if self.collection != other.collection || self.id == other.id {
      return false;
    }
    let (a, b) = (&self.projection, &other.projection);
    let same_code = a.registration_code.is_some() && a.registration_code == b.registration_code;
    let same_email = a.email.is_some() && a.email == b.email;
    same_code
      || (self.collection == Collection::People && same_email)
      || (self.collection == Collection::Registrations
        && same_email
        && a.is_confirmed
        && b.is_confirmed)
  }
}

/// A document store held in a `Vec`, enforcing the same unique indexes as
/// the SQLite backend.
#[derive(Default)]
pub struct MemoryStore {
  entries: Mutex<Vec<Entry>>,
}

impl MemoryStore {
  fn lock(&self) -> MutexGuard<'_, Vec<Entry>> { self.entries.lock().unwrap() }

  pub fn count(&self, collection: Collection) -> usize {
    self.lock().iter().filter(|e| e.collection == collection).count()
  }

  fn select<D: Document>(&self, keep: impl Fn(&Entry) -> bool) -> Result<Vec<D>, MemoryError> {
    let entries = self.lock();
    let mut hits: Vec<&Entry> = entries
      .iter()
      .filter(|e| e.collection == D::COLLECTION && keep(e))
      .collect();
    hits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    hits
      .into_iter()
      .map(|e| Ok(serde_json::from_value(e.json.clone())?))
      .collect()
  }
}

impl DocumentStore for MemoryStore {
  type Error = MemoryError;

  async fn insert<D: Document>(&self, doc: &D) -> Result<(), MemoryError> {
    let entry = Entry::of(doc)?;
    let mut entries = self.lock();
    if entries.iter().any(|e| e.id == entry.id || entry.clashes_with(e)) {
      return Err(MemoryError::Unique);
    }
    entries.push(entry);
    Ok(())
  }

  async fn find_by_id<D: Document>(&self, id: Uuid) -> Result<Option<D>, MemoryError> {
    Ok(self.select(|e| e.id == id)?.into_iter().next())
  }

  async fn find_by_ids<D: Document>(&self, ids: &[Uuid]) -> Result<Vec<D>, MemoryError> {
    self.select(|e| ids.contains(&e.id))
  }

  async fn find_by_field<D: Document>(
    &self,
    field: Field,
    value: &str,
  ) -> Result<Vec<D>, MemoryError> {
    self.select(|e| e.projection.get(field) == Some(value))
  }

  async fn list<D: Document>(&self, visible_only: bool) -> Result<Vec<D>, MemoryError> {
    self.select(|e| !visible_only || e.projection.visible)
  }

  async fn replace<D: Document>(&self, doc: &D) -> Result<bool, MemoryError> {
    let entry = Entry::of(doc)?;
    let mut entries = self.lock();
    if entries.iter().any(|e| entry.clashes_with(e)) {
      return Err(MemoryError::Unique);
    }
    match entries
      .iter_mut()
      .find(|e| e.collection == D::COLLECTION && e.id == entry.id)
    {
      Some(slot) => {
        *slot = entry;
        Ok(true)
      }
      None => Ok(false),
    }
  }

  async fn delete<D: Document>(&self, id: Uuid) -> Result<bool, MemoryError> {
    let mut entries = self.lock();
    let before = entries.len();
    entries.retain(|e| !(e.collection == D::COLLECTION && e.id == id));
    Ok(entries.len() < before)
  }
}

// ─── Notifier ────────────────────────────────────────────────────────────────

/// Records every notification; sends to addresses in `failing` fail.
#[derive(Default)]
pub struct RecordingNotifier {
  sent:    Mutex<Vec<Notification>>,
  failing: HashSet<String>,
}

impl RecordingNotifier {
  pub fn failing(emails: &[&str]) -> Self {
    Self {
      sent:    Mutex::default(),
      failing: emails.iter().map(|e| e.to_string()).collect(),
    }
  }

  pub fn sent(&self) -> Vec<Notification> { self.sent.lock().unwrap().clone() }

  /// The token carried by the most recent confirmation email.
  pub fn last_token(&self) -> Option<String> {
    self.sent().into_iter().rev().find_map(|n| match n.template {
      Template::Confirmation { token, .. } => Some(token),
      _ => None,
    })
  }
}

impl Notifier for RecordingNotifier {
  async fn send(&self, notification: Notification) -> Result<(), NotifyError> {
    let to = notification.to.email.clone();
    self.sent.lock().unwrap().push(notification);
    if self.failing.contains(&to) {
      Err(NotifyError::SendFailed(format!("mailbox unavailable: {to}")))
    } else {
      Ok(())
    }
  }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

pub fn registration_form(email: &str) -> RegistrationForm {
  RegistrationForm {
    full_name:            "Jane Doe".into(),
    email:                email.into(),
    phone:                "+1 555 010 2000".into(),
    camp_date:            NaiveDate::from_ymd_opt(2026, 8, 14),
    accommodation:        Some(Accommodation::Private),
    emergency_contact:    EmergencyContactForm {
      name:         "John Doe".into(),
      phone:        "+1 555 010 2001".into(),
      relationship: "spouse".into(),
    },
    dietary_requirements: Some("vegetarian".into()),
    medical_conditions:   None,
    goals:                None,
    user_id:              None,
  }
}

pub fn person_form(role: PersonRole, email: &str) -> PersonForm {
  PersonForm {
    role: Some(role),
    first_name: "Grace".into(),
    last_name: "Okafor".into(),
    email: email.into(),
    phone: "+234 803 555 0101".into(),
    gender: Some(Gender::Female),
    marital_status: Some(MaritalStatus::Married),
    departments: if role == PersonRole::Volunteer {
      vec![Department::Hospitality]
    } else {
      Vec::new()
    },
    ..PersonForm::default()
  }
}
