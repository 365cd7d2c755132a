//! Subject lines and bodies for every notification template.

use retreat_core::notify::{ConfirmKind, Template};

/// A rendered email with plain-text and HTML alternatives.
#[derive(Debug, Clone)]
pub struct EmailContent {
  pub subject: String,
  pub text:    String,
  pub html:    String,
}

/// Link the recipient follows to confirm. `public_url` has no trailing slash.
pub fn confirmation_link(public_url: &str, kind: ConfirmKind, token: &str) -> String {
  let path = match kind {
    ConfirmKind::Registration => "/api/registrations/confirm",
    ConfirmKind::Person => "/api/people/confirm",
  };
  format!("{public_url}{path}?token={token}")
}

fn escape_html(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      c => out.push(c),
    }
  }
  out
}

fn greeting(name: &str) -> String {
  if name.trim().is_empty() { "Hello,".to_owned() } else { format!("Hello {},", name.trim()) }
}

fn html_page(title: &str, body: &str) -> String {
  format!(
    r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <style>
    body {{ font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; background: #f5f5f5; margin: 0; }}
    .card {{ max-width: 560px; margin: 40px auto; background: white; border-radius: 8px; padding: 32px; }}
    .code {{ font-family: 'SF Mono', Monaco, monospace; font-size: 20px; letter-spacing: 2px; }}
    .button {{ display: inline-block; padding: 12px 24px; background: #2563eb; color: white; border-radius: 6px; text-decoration: none; }}
    .footer {{ margin-top: 24px; color: #888; font-size: 12px; }}
  </style>
</head>
<body>
  <div class="card">
    <h1>{title}</h1>
{body}
    <p class="footer">If you did not sign up for the retreat, you can ignore this email.</p>
  </div>
</body>
</html>"#,
    title = escape_html(title),
  )
}

impl EmailContent {
  pub fn render(template: &Template, name: &str, public_url: &str) -> Self {
    let hello = greeting(name);
    match template {
      Template::Confirmation { kind, token, registration_code } => {
        let link = confirmation_link(public_url, *kind, token);
        let subject = "Please confirm your retreat registration".to_owned();
        let text = format!(
          "{hello}\n\nThank you for registering. Your registration code is {registration_code}.\n\n\
           Confirm your registration by opening this link:\n{link}\n"
        );
        let html = html_page(
          "Confirm your registration",
          &format!(
            "    <p>{}</p>\n    <p>Thank you for registering. Your registration code is \
             <span class=\"code\">{}</span>.</p>\n    <p><a class=\"button\" \
             href=\"{}\">Confirm registration</a></p>",
            escape_html(&hello),
            escape_html(registration_code),
            escape_html(&link),
          ),
        );
        Self { subject, text, html }
      }
      Template::Welcome { registration_code } => {
        let subject = "Your retreat registration is confirmed".to_owned();
        let text = format!(
          "{hello}\n\nYour registration is confirmed. Keep your registration code \
           {registration_code} handy for check-in.\n\nWe look forward to seeing you!\n"
        );
        let html = html_page(
          "You're confirmed",
          &format!(
            "    <p>{}</p>\n    <p>Your registration is confirmed. Keep your registration \
             code <span class=\"code\">{}</span> handy for check-in.</p>\n    <p>We look \
             forward to seeing you!</p>",
            escape_html(&hello),
            escape_html(registration_code),
          ),
        );
        Self { subject, text, html }
      }
      Template::Bulk { subject, body } => {
        let text = format!("{hello}\n\n{body}\n");
        let paragraphs: String = body
          .split("\n\n")
          .map(|p| format!("    <p>{}</p>\n", escape_html(p.trim()).replace('\n', "<br>")))
          .collect();
        let html = html_page(
          subject,
          &format!("    <p>{}</p>\n{}", escape_html(&hello), paragraphs.trim_end()),
        );
        Self { subject: subject.clone(), text, html }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn confirmation_links_point_at_the_right_route() {
    assert_eq!(
      confirmation_link("https://r.example.org", ConfirmKind::Registration, "abc"),
      "https://r.example.org/api/registrations/confirm?token=abc"
    );
    assert_eq!(
      confirmation_link("https://r.example.org", ConfirmKind::Person, "abc"),
      "https://r.example.org/api/people/confirm?token=abc"
    );
  }

  #[test]
  fn confirmation_email_carries_code_and_link() {
    let content = EmailContent::render(
      &Template::Confirmation {
        kind:              ConfirmKind::Person,
        token:             "f00d".into(),
        registration_code: "RTR-ABCD2345".into(),
      },
      "Grace Okafor",
      "http://localhost:8080",
    );
    let link = "http://localhost:8080/api/people/confirm?token=f00d";
    assert!(content.text.contains("Hello Grace Okafor,"));
    assert!(content.text.contains("RTR-ABCD2345"));
    assert!(content.text.contains(link));
    assert!(content.html.contains(link));
  }

  #[test]
  fn bulk_body_is_escaped_in_html() {
    let content = EmailContent::render(
      &Template::Bulk {
        subject: "Room <changes>".into(),
        body:    "Bring a <torch>.\n\nSee you soon & stay safe.".into(),
      },
      "",
      "http://localhost",
    );
    assert_eq!(content.subject, "Room <changes>");
    assert!(content.text.starts_with("Hello,"));
    assert!(content.html.contains("Room &lt;changes&gt;"));
    assert!(content.html.contains("<p>Bring a &lt;torch&gt;.</p>"));
    assert!(content.html.contains("<p>See you soon &amp; stay safe.</p>"));
    assert!(!content.html.contains("<torch>"));
  }
}
