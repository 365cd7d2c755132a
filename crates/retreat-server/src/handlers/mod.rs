//! Route handlers, grouped by audience.

pub mod admin;
pub mod content;
pub mod people;
pub mod registrations;

use serde_json::{Value, json};

use crate::{envelope::Reply, error::ApiError};

/// `GET /health`
pub async fn health() -> Reply<Value> { Reply::ok(json!({ "status": "ok" })) }

pub async fn not_found() -> ApiError { ApiError::NotFound("no such route".to_string()) }
