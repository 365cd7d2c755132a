//! Field-level validation.
//!
//! Forms are plain typed structs; each one implements [`Validate`] by walking
//! its fields and collecting every violation instead of stopping at the first.

use std::fmt;

use serde::Serialize;

use crate::{Error, Result};

/// Longest free-text answer accepted on public forms.
pub const MAX_TEXT_LEN: usize = 2000;

/// A single offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
  pub field:   String,
  pub message: String,
}

/// All violations found on one input, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
  pub fn new() -> Self { Self::default() }

  pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.0.push(FieldViolation { field: field.into(), message: message.into() });
  }

  /// Record a violation if `value` is blank. Returns `true` when present.
  pub fn required(&mut self, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
      self.push(field, "is required");
      false
    } else {
      true
    }
  }

  /// Record a violation if a required choice was not made.
  pub fn chosen<T>(&mut self, field: &str, value: &Option<T>) {
    if value.is_none() {
      self.push(field, "is required");
    }
  }

  pub fn email(&mut self, field: &str, value: &str) {
    if self.required(field, value) && !is_email(value) {
      self.push(field, "must be a valid email address");
    }
  }

  pub fn phone(&mut self, field: &str, value: &str) {
    if self.required(field, value) && !is_phone(value) {
      self.push(field, "must be a valid phone number");
    }
  }

  /// Only `http`/`https` URLs are accepted for hosted media.
  pub fn url(&mut self, field: &str, value: &str) {
    if self.required(field, value) {
      let value = value.trim();
      if !(value.starts_with("https://") || value.starts_with("http://")) {
        self.push(field, "must be an http(s) URL");
      }
    }
  }

  pub fn optional_url(&mut self, field: &str, value: Option<&str>) {
    if let Some(value) = value {
      self.url(field, value);
    }
  }

  pub fn max_len(&mut self, field: &str, value: Option<&str>, max: usize) {
    if value.is_some_and(|v| v.chars().count() > max) {
      self.push(field, format!("must be at most {max} characters"));
    }
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn iter(&self) -> impl Iterator<Item = &FieldViolation> { self.0.iter() }

  /// Whether `field` has at least one violation.
  pub fn has(&self, field: &str) -> bool { self.0.iter().any(|v| v.field == field) }

  /// `Ok(())` when clean, otherwise [`Error::Validation`].
  pub fn into_result(self) -> Result<()> {
    if self.is_empty() { Ok(()) } else { Err(Error::Validation(self)) }
  }
}

impl fmt::Display for Violations {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let parts: Vec<String> = self
      .0
      .iter()
      .map(|v| format!("{} {}", v.field, v.message))
      .collect();
    f.write_str(&parts.join("; "))
  }
}

/// Implemented by every input and record that can be checked before it is
/// persisted.
pub trait Validate {
  fn violations(&self) -> Violations;

  fn validate(&self) -> Result<()> { self.violations().into_result() }
}

/// Emails are compared and indexed in this form.
pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

/// Trim a free-text answer, mapping blank input to `None`.
pub fn clean(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

fn is_email(value: &str) -> bool {
  let value = value.trim();
  if value.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = value.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !domain.contains('@')
    && domain.contains('.')
    && !domain.starts_with('.')
    && !domain.ends_with('.')
}

fn is_phone(value: &str) -> bool {
  let value = value.trim();
  let body = value.strip_prefix('+').unwrap_or(value);
  let allowed = body
    .chars()
    .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'));
  let digits = body.chars().filter(char::is_ascii_digit).count();
  allowed && (7..=15).contains(&digits)
}
