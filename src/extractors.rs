use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// `Json` that rejects bad bodies with a 422 `{"detail": ...}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ValidJson<T>(pub T);

/// `Path` that rejects unparsable segments with a 422 `{"detail": ...}`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ValidPath<T>(pub T);
