//! Camp registration sign-up and confirmation.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/registrations` | 201; confirmation email sent |
//! | `GET`  | `/api/registrations/confirm?token=…` | 404 on unknown token |

use axum::extract::State;
use retreat_core::{
  notify::Notifier,
  registration::RegistrationForm,
  store::DocumentStore,
  workflow::{self, Confirmed, Submitted},
};
use serde::Deserialize;

use crate::{
  AppState,
  envelope::Reply,
  error::ApiError,
  extract::{Json, Query},
};

#[derive(Debug, Deserialize)]
pub struct ConfirmParams {
  #[serde(default)]
  pub token: String,
}

/// `POST /api/registrations`
pub async fn submit<S, N>(
  State(state): State<AppState<S, N>>,
  Json(form): Json<RegistrationForm>,
) -> Result<Reply<Submitted>, ApiError>
where
  S: DocumentStore,
  N: Notifier,
{
  let out =
    workflow::submit_registration(&*state.store, &*state.notifier, &state.settings, form).await?;
  let message = out.message.clone();
  Ok(Reply::created(out).with_message(message))
}

/// `GET /api/registrations/confirm?token=…`
pub async fn confirm<S, N>(
  State(state): State<AppState<S, N>>,
  Query(params): Query<ConfirmParams>,
) -> Result<Reply<Confirmed>, ApiError>
where
  S: DocumentStore,
  N: Notifier,
{
  let out = workflow::confirm_registration(&*state.store, &*state.notifier, &params.token).await?;
  let message = out.message.clone();
  Ok(Reply::ok(out).with_message(message))
}
