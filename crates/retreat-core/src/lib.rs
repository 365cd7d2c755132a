//! Core types, traits and workflows for the retreat registration service.
//!
//! No HTTP or SQL lives here. Storage and email delivery are reached through
//! the [`store::DocumentStore`] and [`notify::Notifier`] traits, which the
//! server wires to concrete backends.

pub mod confirmation;
pub mod content;
pub mod document;
pub mod error;
pub mod notify;
pub mod person;
pub mod registration;
pub mod store;
pub mod token;
pub mod validate;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
