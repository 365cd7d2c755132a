//! Admin routes. Every handler takes [`Authenticated`] first, so credentials
//! are checked before the body is read.

use axum::extract::State;
use retreat_core::{
  content::Testimony,
  notify::Notifier,
  person::{ApplicationStatus, Person, PersonRole, PersonStatus},
  registration::Registration,
  store::DocumentStore,
  workflow::{self, BulkNotification, BulkReport, TestimonyModeration},
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::content::resource_kind;
use crate::{
  AppState,
  auth::Authenticated,
  envelope::Reply,
  error::ApiError,
  extract::{Json, Path, Query},
};

// ─── Listings ────────────────────────────────────────────────────────────────

/// `GET /api/admin/registrations`
pub async fn list_registrations<S, N>(
  _: Authenticated,
  State(state): State<AppState<S, N>>,
) -> Result<Reply<Vec<Registration>>, ApiError>
where
  S: DocumentStore,
  N: Notifier,
{
  Ok(Reply::ok(workflow::list_registrations(&*state.store).await?))
}

#[derive(Debug, Deserialize)]
pub struct PeopleParams {
  pub role: Option<PersonRole>,
}

/// `GET /api/admin/people[?role=participant|volunteer|staff]`
pub async fn list_people<S, N>(
  _: Authenticated,
  State(state): State<AppState<S, N>>,
  Query(params): Query<PeopleParams>,
) -> Result<Reply<Vec<Person>>, ApiError>
where
  S: DocumentStore,
  N: Notifier,
{
  Ok(Reply::ok(workflow::list_people(&*state.store, params.role).await?))
}

// ─── People ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody<T> {
  pub status: T,
}

/// `PUT /api/admin/people/{id}/status`
pub async fn set_status<S, N>(
  _: Authenticated,
  State(state): State<AppState<S, N>>,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody<PersonStatus>>,
) -> Result<Reply<Person>, ApiError>
where
  S: DocumentStore,
  N: Notifier,
{
  let person = workflow::set_person_status(&*state.store, id, body.status).await?;
  Ok(Reply::ok(person).with_message(format!("status set to {}", body.status)))
}

/// `PUT /api/admin/people/{id}/application-status`
pub async fn set_application_status<S, N>(
  _: Authenticated,
  State(state): State<AppState<S, N>>,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody<ApplicationStatus>>,
) -> Result<Reply<Person>, ApiError>
where
  S: DocumentStore,
  N: Notifier,
{
  let person = workflow::set_application_status(&*state.store, id, body.status).await?;
  Ok(Reply::ok(person).with_message(format!("application {}", body.status)))
}

/// `POST /api/admin/people/{id}/check-in`
pub async fn check_in<S, N>(
  _: Authenticated,
  State(state): State<AppState<S, N>>,
  Path(id): Path<Uuid>,
) -> Result<Reply<Person>, ApiError>
where
  S: DocumentStore,
  N: Notifier,
{
  let person = workflow::check_in(&*state.store, id).await?;
  Ok(Reply::ok(person).with_message("checked in"))
}

// ─── Testimonies ─────────────────────────────────────────────────────────────

/// `PUT /api/admin/testimonies/{id}/moderation`
pub async fn moderate_testimony<S, N>(
  _: Authenticated,
  State(state): State<AppState<S, N>>,
  Path(id): Path<Uuid>,
  Json(body): Json<TestimonyModeration>,
) -> Result<Reply<Testimony>, ApiError>
where
  S: DocumentStore,
  N: Notifier,
{
  Ok(Reply::ok(workflow::moderate_testimony(&*state.store, id, body).await?))
}

// ─── Bulk notification ───────────────────────────────────────────────────────

/// `POST /api/admin/notifications`
pub async fn notify<S, N>(
  _: Authenticated,
  State(state): State<AppState<S, N>>,
  Json(body): Json<BulkNotification>,
) -> Result<Reply<BulkReport>, ApiError>
where
  S: DocumentStore,
  N: Notifier,
{
  let report =
    workflow::notify_people(&*state.store, &*state.notifier, &state.settings, body).await?;
  let message = format!("{} sent, {} failed", report.sent, report.failed);
  Ok(Reply::ok(report).with_message(message))
}

// ─── Generic resources ───────────────────────────────────────────────────────

/// `POST /api/admin/resources/{resource}`
pub async fn create_resource<S, N>(
  _: Authenticated,
  State(state): State<AppState<S, N>>,
  Path(tag): Path<String>,
  Json(body): Json<Value>,
) -> Result<Reply<Value>, ApiError>
where
  S: DocumentStore,
  N: Notifier,
{
  let kind = resource_kind(&tag)?;
  Ok(Reply::created(workflow::create_resource(&*state.store, kind, body).await?))
}

/// `PATCH /api/admin/resources/{resource}/{id}`
pub async fn update_resource<S, N>(
  _: Authenticated,
  State(state): State<AppState<S, N>>,
  Path((tag, id)): Path<(String, Uuid)>,
  Json(patch): Json<Value>,
) -> Result<Reply<Value>, ApiError>
where
  S: DocumentStore,
  N: Notifier,
{
  let kind = resource_kind(&tag)?;
  Ok(Reply::ok(workflow::update_resource(&*state.store, kind, id, patch).await?))
}

/// `DELETE /api/admin/resources/{resource}/{id}`
pub async fn delete_resource<S, N>(
  _: Authenticated,
  State(state): State<AppState<S, N>>,
  Path((tag, id)): Path<(String, Uuid)>,
) -> Result<Reply<()>, ApiError>
where
  S: DocumentStore,
  N: Notifier,
{
  let kind = resource_kind(&tag)?;
  workflow::delete_resource(&*state.store, kind, id).await?;
  Ok(Reply::message(format!("{kind} {id} deleted")))
}
