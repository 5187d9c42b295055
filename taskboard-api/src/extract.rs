//! Extractors whose rejections render as [`ApiError`] envelopes
//!
//! Axum's built-in extractors reply with plain-text bodies when they reject a
//! request. These wrappers run the same extraction and route the rejection
//! through `ApiError`, so a malformed id or JSON body looks like every other
//! API error.

use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters (`/api/tasks/:id`)
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
