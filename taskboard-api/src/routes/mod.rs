/// API route handlers
///
/// This module contains all JSON route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: User CRUD under `/api/users`
/// - `categories`: Category CRUD under `/api/categories`
/// - `tasks`: Task CRUD under `/api/tasks`
/// - `validation`: Validators shared by request types
///
/// Every successful response body is wrapped as `{"data": ...}`.

pub mod categories;
pub mod health;
pub mod tasks;
pub mod users;
pub mod validation;

use axum::Json;
use serde::{Deserialize, Serialize};

/// Success envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct Data<T> {
    pub data: T,
}

/// Wraps a value in the success envelope
pub fn data<T>(value: T) -> Json<Data<T>> {
    Json(Data { data: value })
}
