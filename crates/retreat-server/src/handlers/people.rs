//! Participant, volunteer and staff sign-up and confirmation.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/people` | 201; email must be new |
//! | `GET`  | `/api/people/confirm?token=…` | 404 on unknown token |

use axum::extract::State;
use retreat_core::{
  notify::Notifier,
  person::PersonForm,
  store::DocumentStore,
  workflow::{self, Confirmed, Submitted},
};

use super::registrations::ConfirmParams;
use crate::{
  AppState,
  envelope::Reply,
  error::ApiError,
  extract::{Json, Query},
};

/// `POST /api/people`
pub async fn submit<S, N>(
  State(state): State<AppState<S, N>>,
  Json(form): Json<PersonForm>,
) -> Result<Reply<Submitted>, ApiError>
where
  S: DocumentStore,
  N: Notifier,
{
  let out =
    workflow::submit_person(&*state.store, &*state.notifier, &state.settings, form).await?;
  let message = out.message.clone();
  Ok(Reply::created(out).with_message(message))
}

/// `GET /api/people/confirm?token=…`
pub async fn confirm<S, N>(
  State(state): State<AppState<S, N>>,
  Query(params): Query<ConfirmParams>,
) -> Result<Reply<Confirmed>, ApiError>
where
  S: DocumentStore,
  N: Notifier,
{
  let out = workflow::confirm_person(&*state.store, &*state.notifier, &params.token).await?;
  let message = out.message.clone();
  Ok(Reply::ok(out).with_message(message))
}
