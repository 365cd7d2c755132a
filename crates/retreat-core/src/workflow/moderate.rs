//! Admin moderation: status overwrites, check-in, testimony gates and bulk
//! email.

use std::collections::HashSet;

use chrono::Utc;
use futures::{StreamExt as _, stream};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::Settings;
use crate::{
  Error, Result,
  content::Testimony,
  document::Document,
  notify::{self, Notification, NotificationStatus, Notifier, Recipient, Template},
  person::{ApplicationStatus, CheckIn, Person, PersonStatus},
  store::DocumentStore,
  validate::Violations,
};

async fn load<S: DocumentStore, D: Document>(store: &S, id: Uuid, what: &str) -> Result<D> {
  store
    .find_by_id(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound(format!("{what} {id} not found")))
}

async fn save<S: DocumentStore, D: Document>(store: &S, doc: &D, what: &str) -> Result<()> {
  if store.replace(doc).await.map_err(Error::store)? {
    Ok(())
  } else {
    Err(Error::NotFound(format!("{what} {} not found", doc.id())))
  }
}

// ─── People ──────────────────────────────────────────────────────────────────

/// Overwrite a volunteer's application status. Every transition is allowed.
pub async fn set_application_status<S: DocumentStore>(
  store: &S,
  id: Uuid,
  status: ApplicationStatus,
) -> Result<Person> {
  let mut person: Person = load(store, id, "volunteer").await?;
  let Some(details) = person.volunteer_mut() else {
    return Err(Error::NotFound(format!("volunteer {id} not found")));
  };
  let previous = details.application_status;
  details.application_status = status;
  person.updated_at = Utc::now();
  save(store, &person, "volunteer").await?;
  info!(%id, %previous, %status, "volunteer application status set");
  Ok(person)
}

/// Overwrite a person's operational status.
pub async fn set_person_status<S: DocumentStore>(
  store: &S,
  id: Uuid,
  status: PersonStatus,
) -> Result<Person> {
  let mut person: Person = load(store, id, "person").await?;
  person.status = status;
  person.updated_at = Utc::now();
  save(store, &person, "person").await?;
  info!(%id, %status, "person status set");
  Ok(person)
}

/// Record arrival on site. Independent of the confirmation state.
pub async fn check_in<S: DocumentStore>(store: &S, id: Uuid) -> Result<Person> {
  let mut person: Person = load(store, id, "person").await?;
  if let Some(existing) = person.check_in {
    return Err(Error::Conflict(format!(
      "already checked in at {}",
      existing.checked_in_at.to_rfc3339()
    )));
  }
  let now = Utc::now();
  person.check_in = Some(CheckIn { checked_in_at: now });
  person.updated_at = now;
  save(store, &person, "person").await?;
  info!(%id, "person checked in");
  Ok(person)
}

// ─── Testimonies ─────────────────────────────────────────────────────────────

/// Independent toggles; an absent field leaves that gate unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestimonyModeration {
  pub is_approved:  Option<bool>,
  pub is_published: Option<bool>,
}

pub async fn moderate_testimony<S: DocumentStore>(
  store: &S,
  id: Uuid,
  moderation: TestimonyModeration,
) -> Result<Testimony> {
  if moderation.is_approved.is_none() && moderation.is_published.is_none() {
    return Err(Error::invalid("is_approved", "set is_approved and/or is_published"));
  }
  let mut testimony: Testimony = load(store, id, "testimony").await?;
  if let Some(approved) = moderation.is_approved {
    testimony.is_approved = approved;
  }
  if let Some(published) = moderation.is_published {
    testimony.is_published = published;
  }
  save(store, &testimony, "testimony").await?;
  info!(
    %id,
    approved = testimony.is_approved,
    published = testimony.is_published,
    "testimony moderated"
  );
  Ok(testimony)
}

// ─── Bulk notification ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BulkNotification {
  pub ids:     Vec<Uuid>,
  pub subject: String,
  pub body:    String,
}

/// One entry per resolved recipient.
#[derive(Debug, Clone, Serialize)]
pub struct Delivery {
  pub id:     Uuid,
  pub email:  String,
  #[serde(flatten)]
  pub status: NotificationStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkReport {
  pub sent:       usize,
  pub failed:     usize,
  pub deliveries: Vec<Delivery>,
  /// Requested ids that matched no person.
  pub unresolved: Vec<Uuid>,
}

/// Email every person in `request.ids`, at most `bulk_concurrency` at a time.
///
/// Individual send failures are tallied, never raised; a slow address only
/// occupies one slot.
pub async fn notify_people<S, N>(
  store: &S,
  notifier: &N,
  settings: &Settings,
  request: BulkNotification,
) -> Result<BulkReport>
where
  S: DocumentStore,
  N: Notifier,
{
  let mut v = Violations::new();
  if request.ids.is_empty() {
    v.push("ids", "select at least one recipient");
  }
  v.required("subject", &request.subject);
  v.required("body", &request.body);
  v.into_result()?;

  let mut seen = HashSet::new();
  let ids: Vec<Uuid> = request.ids.into_iter().filter(|id| seen.insert(*id)).collect();

  let people: Vec<Person> = store.find_by_ids(&ids).await.map_err(Error::store)?;
  let resolved: HashSet<Uuid> = people.iter().map(|p| p.id).collect();
  let unresolved: Vec<Uuid> = ids.into_iter().filter(|id| !resolved.contains(id)).collect();

  let subject = request.subject.trim().to_owned();
  let body = request.body.trim().to_owned();

  let deliveries: Vec<Delivery> = stream::iter(people)
    .map(|person| {
      let notification = Notification {
        to:       Recipient { email: person.profile.email.clone(), name: person.full_name() },
        template: Template::Bulk { subject: subject.clone(), body: body.clone() },
      };
      async move {
        let status = notify::dispatch(notifier, notification).await;
        Delivery { id: person.id, email: person.profile.email, status }
      }
    })
    .buffered(settings.bulk_concurrency.max(1))
    .collect()
    .await;

  let sent = deliveries.iter().filter(|d| d.status.is_sent()).count();
  let failed = deliveries.len() - sent;
  info!(sent, failed, unresolved = unresolved.len(), "bulk notification dispatched");

  Ok(BulkReport { sent, failed, deliveries, unresolved })
}
