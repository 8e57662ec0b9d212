//! Request extractors with JSON error bodies.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` whose rejection is an [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
