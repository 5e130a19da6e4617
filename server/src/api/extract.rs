//! Request extractors whose rejections render as `ApiError`.
//!
//! axum's own `Json` and `Query` reject malformed input with a plain-text
//! 4xx; these wrappers turn the same failures into a 400 `{"error": ...}`.

use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON request body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string deserialized into `T`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
