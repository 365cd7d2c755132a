//! HTTP layer for the retreat service.
//!
//! Exposes an axum [`Router`] over any [`DocumentStore`] and [`Notifier`]:
//! public sign-up, confirmation and content routes, plus the admin routes
//! guarded by HTTP Basic auth. Every response uses the
//! [`Envelope`](envelope::Envelope) shape.

pub mod auth;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context as _, ensure};

use axum::{
  Router,
  routing::{get, patch, post, put},
};
use retreat_core::{
  notify::Notifier,
  store::DocumentStore,
  workflow::{DEFAULT_BULK_CONCURRENCY, DEFAULT_TOKEN_TTL_HOURS, Settings},
};
use retreat_mail::MailConfig;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;
use handlers::{admin, content, people, registrations};

// ─── Configuration ───────────────────────────────────────────────────────────

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

/// One year; longer lifetimes are rejected at startup.
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

fn default_token_ttl_hours() -> i64 { DEFAULT_TOKEN_TTL_HOURS }

fn default_bulk_concurrency() -> usize { DEFAULT_BULK_CONCURRENCY }

/// Runtime server configuration, deserialised from `config.toml` and
/// `RETREAT_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  /// Externally reachable base URL, used in confirmation links.
  pub public_url:          String,
  pub store_path:          PathBuf,
  pub admin_username:      String,
  pub admin_password_hash: String,
  #[serde(default = "default_token_ttl_hours")]
  pub token_ttl_hours:     i64,
  #[serde(default = "default_bulk_concurrency")]
  pub bulk_concurrency:    usize,
  pub mail:                MailConfig,
}

impl ServerConfig {
  pub fn settings(&self) -> anyhow::Result<Settings> {
    let hours = self.token_ttl_hours;
    ensure!(
      (1..=MAX_TOKEN_TTL_HOURS).contains(&hours),
      "token_ttl_hours must be between 1 and {MAX_TOKEN_TTL_HOURS}, got {hours}"
    );
    let token_ttl = chrono::Duration::try_hours(hours)
      .with_context(|| format!("token_ttl_hours {hours} is out of range"))?;
    Ok(Settings { token_ttl, bulk_concurrency: self.bulk_concurrency.max(1) })
  }

  pub fn auth(&self) -> AuthConfig {
    AuthConfig {
      username:      self.admin_username.clone(),
      password_hash: self.admin_password_hash.clone(),
    }
  }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, N> {
  pub store:    Arc<S>,
  pub notifier: Arc<N>,
  pub settings: Arc<Settings>,
  pub auth:     Arc<AuthConfig>,
}

impl<S, N> Clone for AppState<S, N> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      notifier: Arc::clone(&self.notifier),
      settings: Arc::clone(&self.settings),
      auth:     Arc::clone(&self.auth),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S, N>(state: AppState<S, N>) -> Router
where
  S: DocumentStore + 'static,
  N: Notifier + 'static,
{
  Router::new()
    .route("/health", get(handlers::health))
    // Public sign-up
    .route("/api/registrations", post(registrations::submit::<S, N>))
    .route("/api/registrations/confirm", get(registrations::confirm::<S, N>))
    .route("/api/people", post(people::submit::<S, N>))
    .route("/api/people/confirm", get(people::confirm::<S, N>))
    // Public content
    .route("/api/testimonies", post(content::submit_testimony::<S, N>))
    .route("/api/content/{resource}", get(content::list::<S, N>))
    .route("/api/content/{resource}/{id}", get(content::get_one::<S, N>))
    .route(
      "/api/content/{resource}/{id}/{interaction}",
      post(content::interact::<S, N>),
    )
    // Admin
    .route("/api/admin/registrations", get(admin::list_registrations::<S, N>))
    .route("/api/admin/people", get(admin::list_people::<S, N>))
    .route("/api/admin/people/{id}/status", put(admin::set_status::<S, N>))
    .route(
      "/api/admin/people/{id}/application-status",
      put(admin::set_application_status::<S, N>),
    )
    .route("/api/admin/people/{id}/check-in", post(admin::check_in::<S, N>))
    .route(
      "/api/admin/testimonies/{id}/moderation",
      put(admin::moderate_testimony::<S, N>),
    )
    .route("/api/admin/notifications", post(admin::notify::<S, N>))
    .route("/api/admin/resources/{resource}", post(admin::create_resource::<S, N>))
    .route(
      "/api/admin/resources/{resource}/{id}",
      patch(admin::update_resource::<S, N>).delete(admin::delete_resource::<S, N>),
    )
    .fallback(handlers::not_found)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
