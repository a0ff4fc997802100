//! HTTP handlers for recipe-service.

pub mod health;
pub mod index;
pub mod recipes;
pub mod transform;

use axum::extract::rejection::FormRejection;
use service_core::error::AppError;

/// Map an undecodable form body to a 400.
pub(crate) fn invalid_form(rejection: FormRejection) -> AppError {
    tracing::debug!(rejection = %rejection, "Rejected form body");
    AppError::BadRequest(anyhow::anyhow!("Invalid form data"))
}
