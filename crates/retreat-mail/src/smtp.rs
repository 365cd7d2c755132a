//! SMTP delivery over `lettre`'s async tokio transport.

use lettre::{
  Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
  address::AddressError,
  message::{Mailbox, MultiPart, SinglePart, header::ContentType},
  transport::smtp::{
    Error as SmtpError,
    authentication::Credentials,
    client::{Tls, TlsParameters},
  },
};
use retreat_core::notify::{NotifyError, Recipient};

use crate::{SmtpConfig, templates::EmailContent};

pub fn parse_mailbox(s: &str) -> Result<Mailbox, AddressError> { s.parse() }

pub struct SmtpTransport {
  inner: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
  /// Configure the relay. Nothing connects until the first send.
  pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
    let relay_err = |e: SmtpError| NotifyError::InvalidConfig(format!("smtp relay error: {e}"));

    let mut builder = if config.use_tls {
      let tls = TlsParameters::new(config.host.clone())
        .map_err(|e| NotifyError::InvalidConfig(format!("tls configuration error: {e}")))?;
      if config.port == 465 {
        AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
          .map_err(relay_err)?
          .port(config.port)
          .tls(Tls::Wrapper(tls))
      } else {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
          .map_err(relay_err)?
          .port(config.port)
          .tls(Tls::Required(tls))
      }
    } else {
      AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host).port(config.port)
    };

    if let (Some(user), Some(pass)) = (&config.username, &config.password) {
      builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
    }

    Ok(Self { inner: builder.build() })
  }

  pub async fn send(
    &self,
    from: &str,
    to: &Recipient,
    content: EmailContent,
  ) -> Result<(), NotifyError> {
    let from = parse_mailbox(from)
      .map_err(|e| NotifyError::InvalidConfig(format!("invalid from address: {e}")))?;
    let address: Address = to
      .email
      .parse()
      .map_err(|e| NotifyError::InvalidAddress(format!("{}: {e}", to.email)))?;
    let to = Mailbox::new(Some(to.name.clone()).filter(|n| !n.is_empty()), address);

    let message = Message::builder()
      .from(from)
      .to(to)
      .subject(content.subject)
      .multipart(
        MultiPart::alternative()
          .singlepart(
            SinglePart::builder()
              .header(ContentType::TEXT_PLAIN)
              .body(content.text),
          )
          .singlepart(
            SinglePart::builder()
              .header(ContentType::TEXT_HTML)
              .body(content.html),
          ),
      )
      .map_err(|e| NotifyError::SendFailed(format!("failed to build email: {e}")))?;

    self
      .inner
      .send(message)
      .await
      .map_err(|e| NotifyError::SendFailed(e.to_string()))?;
    Ok(())
  }
}
