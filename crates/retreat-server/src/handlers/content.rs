//! Public content routes.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/content/{resource}` | Visible records, newest first |
//! | `GET`  | `/api/content/{resource}/{id}` | Counts a view where views are counted |
//! | `POST` | `/api/content/{resource}/{id}/{interaction}` | `view`, `download` or `play` |
//! | `POST` | `/api/testimonies` | 201; hidden until approved and published |

use axum::extract::State;
use retreat_core::{
  content::{Interaction, ResourceKind, Testimony, TestimonyDraft},
  notify::Notifier,
  store::DocumentStore,
  workflow,
};
use serde_json::Value;
use uuid::Uuid;

use crate::{
  AppState,
  envelope::Reply,
  error::ApiError,
  extract::{Json, Path},
};

const TESTIMONY_RECEIVED: &str =
  "Thank you for sharing your testimony. It will appear once it has been reviewed.";

/// Unknown resource tags are reported like unknown routes.
pub(crate) fn resource_kind(tag: &str) -> Result<ResourceKind, ApiError> {
  tag
    .parse()
    .map_err(|_| ApiError::NotFound(format!("unknown resource: {tag}")))
}

/// `GET /api/content/{resource}`
pub async fn list<S, N>(
  State(state): State<AppState<S, N>>,
  Path(tag): Path<String>,
) -> Result<Reply<Vec<Value>>, ApiError>
where
  S: DocumentStore,
  N: Notifier,
{
  let kind = resource_kind(&tag)?;
  Ok(Reply::ok(workflow::list_visible(&*state.store, kind).await?))
}

/// `GET /api/content/{resource}/{id}`
pub async fn get_one<S, N>(
  State(state): State<AppState<S, N>>,
  Path((tag, id)): Path<(String, Uuid)>,
) -> Result<Reply<Value>, ApiError>
where
  S: DocumentStore,
  N: Notifier,
{
  let kind = resource_kind(&tag)?;
  Ok(Reply::ok(workflow::get_visible(&*state.store, kind, id).await?))
}

/// `POST /api/content/{resource}/{id}/{interaction}`
pub async fn interact<S, N>(
  State(state): State<AppState<S, N>>,
  Path((tag, id, interaction)): Path<(String, Uuid, String)>,
) -> Result<Reply<Value>, ApiError>
where
  S: DocumentStore,
  N: Notifier,
{
  let kind = resource_kind(&tag)?;
  let interaction: Interaction = interaction
    .parse()
    .map_err(|_| ApiError::NotFound(format!("unknown interaction: {interaction}")))?;
  let record = workflow::record_interaction(&*state.store, kind, id, interaction).await?;
  Ok(Reply::ok(record))
}

/// `POST /api/testimonies`
pub async fn submit_testimony<S, N>(
  State(state): State<AppState<S, N>>,
  Json(draft): Json<TestimonyDraft>,
) -> Result<Reply<Testimony>, ApiError>
where
  S: DocumentStore,
  N: Notifier,
{
  let testimony = workflow::submit_testimony(&*state.store, draft).await?;
  Ok(Reply::created(testimony).with_message(TESTIMONY_RECEIVED))
}
