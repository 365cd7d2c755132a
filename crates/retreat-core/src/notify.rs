//! The `Notifier` trait and the notifications workflows send.

use std::future::Future;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Who a notification goes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
  pub email: String,
  pub name:  String,
}

/// Which confirmation link a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmKind {
  Registration,
  Person,
}

/// The message to render. Rendering (subject lines, bodies, links) is the
/// notifier's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
  /// Carries the plaintext token; this is the only place it ever appears.
  Confirmation {
    kind:              ConfirmKind,
    token:             String,
    registration_code: String,
  },
  Welcome {
    registration_code: String,
  },
  Bulk {
    subject: String,
    body:    String,
  },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
  pub to:       Recipient,
  pub template: Template,
}

#[derive(Debug, Error)]
pub enum NotifyError {
  #[error("failed to send email: {0}")]
  SendFailed(String),

  #[error("invalid address: {0}")]
  InvalidAddress(String),

  #[error("invalid configuration: {0}")]
  InvalidConfig(String),
}

/// Abstraction over an email delivery backend.
pub trait Notifier: Send + Sync {
  fn send(
    &self,
    notification: Notification,
  ) -> impl Future<Output = Result<(), NotifyError>> + Send + '_;
}

/// Delivery result reported alongside an otherwise successful operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationStatus {
  Sent,
  Failed { error: String },
}

impl NotificationStatus {
  pub fn is_sent(&self) -> bool { matches!(self, Self::Sent) }
}

/// Send once, never retry. A failure is logged and returned as a status; it
/// never fails the surrounding operation.
pub async fn dispatch<N: Notifier>(
  notifier: &N,
  notification: Notification,
) -> NotificationStatus {
  let to = notification.to.email.clone();
  match notifier.send(notification).await {
    Ok(()) => NotificationStatus::Sent,
    Err(e) => {
      warn!(%to, error = %e, "notification failed");
      NotificationStatus::Failed { error: e.to_string() }
    }
  }
}
