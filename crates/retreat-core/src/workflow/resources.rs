//! Generic create/update/delete over the content collections, the public
//! content surface and the admin listings.
//!
//! Resource-generic operations dispatch on [`ResourceKind`] and speak JSON so
//! the HTTP layer does not need one route per collection.

use chrono::Utc;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::{
  Error, Result,
  content::{
    AudioMessage, Event, Interaction, Media, PROTECTED_FIELDS, Resource, ResourceKind, Sermon,
    Testimony, TestimonyDraft,
  },
  document::Field,
  person::{Person, PersonRole},
  registration::Registration,
  store::DocumentStore,
  validate::{Validate, Violations},
};

/// Run `$body` with `$r` bound to the record type for `$kind`.
macro_rules! with_resource {
  ($kind:expr, $r:ident => $body:expr) => {
    match $kind {
      ResourceKind::Sermons => {
        type $r = Sermon;
        $body
      }
      ResourceKind::Media => {
        type $r = Media;
        $body
      }
      ResourceKind::AudioMessages => {
        type $r = AudioMessage;
        $body
      }
      ResourceKind::Testimonies => {
        type $r = Testimony;
        $body
      }
      ResourceKind::Events => {
        type $r = Event;
        $body
      }
    }
  };
}

fn not_found(kind: ResourceKind, id: Uuid) -> Error {
  Error::NotFound(format!("{kind} {id} not found"))
}

// ─── Admin CRUD ──────────────────────────────────────────────────────────────

pub async fn create_resource<S: DocumentStore>(
  store: &S,
  kind: ResourceKind,
  body: Value,
) -> Result<Value> {
  with_resource!(kind, R => create::<S, R>(store, body).await)
}

async fn create<S: DocumentStore, R: Resource>(store: &S, body: Value) -> Result<Value> {
  let draft: R::Draft =
    serde_json::from_value(body).map_err(|e| Error::invalid("body", e.to_string()))?;
  let record = R::from_draft(draft, Uuid::new_v4(), Utc::now());
  record.validate()?;
  store.insert(&record).await.map_err(Error::store)?;
  info!(id = %record.id(), kind = %R::KIND, "resource created");
  Ok(serde_json::to_value(&record)?)
}

/// Shallow-merge `patch` over the stored record, re-validate and persist.
pub async fn update_resource<S: DocumentStore>(
  store: &S,
  kind: ResourceKind,
  id: Uuid,
  patch: Value,
) -> Result<Value> {
  with_resource!(kind, R => update::<S, R>(store, id, patch).await)
}

async fn update<S: DocumentStore, R: Resource>(store: &S, id: Uuid, patch: Value) -> Result<Value> {
  let Value::Object(patch) = patch else {
    return Err(Error::invalid("body", "patch must be a JSON object"));
  };
  let mut v = Violations::new();
  for field in PROTECTED_FIELDS.iter().filter(|f| patch.contains_key(**f)) {
    v.push(*field, "cannot be modified");
  }
  v.into_result()?;

  let current: R = store
    .find_by_id(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| not_found(R::KIND, id))?;

  let mut merged = serde_json::to_value(&current)?;
  if let Value::Object(fields) = &mut merged {
    fields.extend(patch);
  }
  let updated: R =
    serde_json::from_value(merged).map_err(|e| Error::invalid("body", e.to_string()))?;
  updated.validate()?;

  if !store.replace(&updated).await.map_err(Error::store)? {
    return Err(not_found(R::KIND, id));
  }
  info!(%id, kind = %R::KIND, "resource updated");
  Ok(serde_json::to_value(&updated)?)
}

pub async fn delete_resource<S: DocumentStore>(
  store: &S,
  kind: ResourceKind,
  id: Uuid,
) -> Result<()> {
  let deleted = with_resource!(kind, R => store.delete::<R>(id).await.map_err(Error::store)?);
  if !deleted {
    return Err(not_found(kind, id));
  }
  info!(%id, %kind, "resource deleted");
  Ok(())
}

// ─── Public surface ──────────────────────────────────────────────────────────

/// Publicly visible records of `kind`, newest first.
pub async fn list_visible<S: DocumentStore>(store: &S, kind: ResourceKind) -> Result<Vec<Value>> {
  with_resource!(kind, R => {
    let records: Vec<R> = store.list(true).await.map_err(Error::store)?;
    records
      .iter()
      .map(|r| serde_json::to_value(r).map_err(Error::from))
      .collect()
  })
}

/// Fetch one visible record; counts as a view where views are counted.
///
/// Counters are best-effort: read, increment, replace without locking, so
/// concurrent reads may drop increments.
pub async fn get_visible<S: DocumentStore>(store: &S, kind: ResourceKind, id: Uuid) -> Result<Value> {
  with_resource!(kind, R => {
    let mut record = find_visible::<S, R>(store, id).await?;
    if record.record(Interaction::View) {
      store.replace(&record).await.map_err(Error::store)?;
    }
    Ok(serde_json::to_value(&record)?)
  })
}

/// Bump a public counter on a visible record. Best-effort, like the view
/// counter in [`get_visible`].
pub async fn record_interaction<S: DocumentStore>(
  store: &S,
  kind: ResourceKind,
  id: Uuid,
  interaction: Interaction,
) -> Result<Value> {
  with_resource!(kind, R => {
    let mut record = find_visible::<S, R>(store, id).await?;
    if !record.record(interaction) {
      return Err(Error::invalid(
        "interaction",
        format!("{kind} do not count {interaction} interactions"),
      ));
    }
    store.replace(&record).await.map_err(Error::store)?;
    Ok(serde_json::to_value(&record)?)
  })
}

/// Hidden records are reported exactly like missing ones.
async fn find_visible<S: DocumentStore, R: Resource>(store: &S, id: Uuid) -> Result<R> {
  store
    .find_by_id::<R>(id)
    .await
    .map_err(Error::store)?
    .filter(R::is_visible)
    .ok_or_else(|| not_found(R::KIND, id))
}

/// Public testimony submission; both moderation gates start closed.
pub async fn submit_testimony<S: DocumentStore>(store: &S, draft: TestimonyDraft) -> Result<Testimony> {
  let testimony = Testimony::from_draft(draft, Uuid::new_v4(), Utc::now());
  testimony.validate()?;
  store.insert(&testimony).await.map_err(Error::store)?;
  info!(id = %testimony.id, "testimony submitted");
  Ok(testimony)
}

// ─── Admin listings ──────────────────────────────────────────────────────────

pub async fn list_registrations<S: DocumentStore>(store: &S) -> Result<Vec<Registration>> {
  store.list(false).await.map_err(Error::store)
}

/// All people, or only those with `role`; one query either way.
pub async fn list_people<S: DocumentStore>(
  store: &S,
  role: Option<PersonRole>,
) -> Result<Vec<Person>> {
  match role {
    Some(role) => store
      .find_by_field(Field::Role, &role.to_string())
      .await
      .map_err(Error::store),
    None => store.list(false).await.map_err(Error::store),
  }
}
