//! Workflows, one async function per operation.
//!
//! Every workflow runs to completion inside a single request. The store and
//! notifier are passed in by reference; there is no ambient state. Steps are
//! not transactional: a duplicate check followed by an insert can race, and
//! the store's unique indexes are the backstop.

mod confirm;
mod moderate;
mod register;
mod resources;


pub use confirm::{Confirmed, confirm, confirm_person, confirm_registration};
pub use moderate::{
  BulkNotification, BulkReport, Delivery, TestimonyModeration, check_in, moderate_testimony,
  notify_people, set_application_status, set_person_status,
};
pub use register::{Submitted, submit_person, submit_registration};
pub use resources::{
  create_resource, delete_resource, get_visible, list_people, list_registrations, list_visible,
  record_interaction, submit_testimony, update_resource,
};

use chrono::Duration;

/// Default lifetime recorded on a new confirmation token.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 48;

/// Default number of bulk emails in flight at once.
pub const DEFAULT_BULK_CONCURRENCY: usize = 8;

/// Tunables shared by the workflows.
#[derive(Debug, Clone)]
pub struct Settings {
  /// Recorded as the token's `expires_at`; not enforced on confirm.
  pub token_ttl:        Duration,
  pub bulk_concurrency: usize,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      token_ttl:        Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
      bulk_concurrency: DEFAULT_BULK_CONCURRENCY,
    }
  }
}
