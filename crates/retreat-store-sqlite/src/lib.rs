//! SQLite backend for the retreat document store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every collection shares one
//! `documents` table; the JSON body is authoritative and a handful of
//! projected columns carry the indexes.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
