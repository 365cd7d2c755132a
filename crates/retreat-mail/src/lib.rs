//! Email delivery for retreat notifications.
//!
//! [`Mailer`] implements [`Notifier`] over SMTP, or over a log-only sink when
//! no SMTP relay is configured. Rendering lives in [`templates`].

mod smtp;
pub mod templates;

use retreat_core::notify::{Notification, Notifier, NotifyError};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{smtp::SmtpTransport, templates::EmailContent};

// ─── Configuration ───────────────────────────────────────────────────────────

fn default_smtp_port() -> u16 { 587 }

fn default_use_tls() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
  pub host:     String,
  #[serde(default = "default_smtp_port")]
  pub port:     u16,
  pub username: Option<String>,
  pub password: Option<String>,
  /// Port 465 uses implicit TLS; any other port uses STARTTLS.
  #[serde(default = "default_use_tls")]
  pub use_tls:  bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
  pub from_address: String,
  pub from_name:    Option<String>,
  /// Without a relay, emails are logged instead of sent.
  pub smtp:         Option<SmtpConfig>,
}

// ─── Mailer ──────────────────────────────────────────────────────────────────

enum Transport {
  Smtp(SmtpTransport),
  Log,
}

/// Renders notifications and hands them to the configured transport.
pub struct Mailer {
  transport:  Transport,
  from:       String,
  public_url: String,
}

impl Mailer {
  /// Build a mailer. `public_url` is the externally reachable base of the
  /// server, used in confirmation links.
  pub fn new(config: &MailConfig, public_url: &str) -> Result<Self, NotifyError> {
    let from = match &config.from_name {
      Some(name) => format!("{name} <{}>", config.from_address),
      None => config.from_address.clone(),
    };
    // Fail at startup rather than on the first send.
    smtp::parse_mailbox(&from)
      .map_err(|e| NotifyError::InvalidConfig(format!("invalid from address: {e}")))?;

    let transport = match &config.smtp {
      Some(smtp) => Transport::Smtp(SmtpTransport::new(smtp)?),
      None => Transport::Log,
    };

    Ok(Self {
      transport,
      from,
      public_url: public_url.trim_end_matches('/').to_owned(),
    })
  }

  pub fn is_log_only(&self) -> bool { matches!(self.transport, Transport::Log) }
}

impl Notifier for Mailer {
  async fn send(&self, notification: Notification) -> Result<(), NotifyError> {
    let content =
      EmailContent::render(&notification.template, &notification.to.name, &self.public_url);

    match &self.transport {
      Transport::Smtp(smtp) => {
        smtp.send(&self.from, &notification.to, content).await?;
        debug!(to = %notification.to.email, "email sent");
      }
      Transport::Log => {
        info!(
          to = %notification.to.email,
          subject = %content.subject,
          "email not sent (no smtp relay configured)"
        );
        debug!(body = %content.text, "email body");
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use retreat_core::notify::{Recipient, Template};

  use super::*;

  fn config(smtp: Option<SmtpConfig>) -> MailConfig {
    MailConfig {
      from_address: "hello@retreat.example.org".into(),
      from_name: Some("Retreat Team".into()),
      smtp,
    }
  }

  #[test]
  fn without_smtp_the_mailer_only_logs() {
    let mailer = Mailer::new(&config(None), "https://retreat.example.org/").unwrap();
    assert!(mailer.is_log_only());
    assert_eq!(mailer.public_url, "https://retreat.example.org");
  }

  #[test]
  fn bad_from_address_is_a_config_error() {
    let mut cfg = config(None);
    cfg.from_address = "not an address".into();
    let err = Mailer::new(&cfg, "http://localhost").err().unwrap();
    assert!(matches!(err, NotifyError::InvalidConfig(_)));
  }

  #[tokio::test]
  async fn smtp_mailer_builds_without_connecting() {
    let smtp = SmtpConfig {
      host:     "localhost".into(),
      port:     2525,
      username: Some("user".into()),
      password: Some("pass".into()),
      use_tls:  false,
    };
    let mailer = Mailer::new(&config(Some(smtp)), "http://localhost").unwrap();
    assert!(!mailer.is_log_only());
  }

  #[tokio::test]
  async fn log_only_send_succeeds() {
    let mailer = Mailer::new(&config(None), "http://localhost").unwrap();
    mailer
      .send(Notification {
        to:       Recipient { email: "jane@example.org".into(), name: "Jane".into() },
        template: Template::Welcome { registration_code: "RTR-ABCD2345".into() },
      })
      .await
      .unwrap();
  }

  #[tokio::test]
  async fn smtp_rejects_an_invalid_recipient() {
    let smtp = SmtpConfig {
      host:     "localhost".into(),
      port:     2525,
      username: None,
      password: None,
      use_tls:  false,
    };
    let mailer = Mailer::new(&config(Some(smtp)), "http://localhost").unwrap();
    let err = mailer
      .send(Notification {
        to:       Recipient { email: "nope".into(), name: "Nobody".into() },
        template: Template::Welcome { registration_code: "RTR-ABCD2345".into() },
      })
      .await
      .unwrap_err();
    assert!(matches!(err, NotifyError::InvalidAddress(_)));
  }
}
