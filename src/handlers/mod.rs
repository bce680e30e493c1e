//! HTTP handlers, one module per collection.
//!
//! Handlers stay thin: pull the request apart, apply the domain rule from
//! `identity` or `moderation`, make one repository call and answer with JSON.
//! Failures are `AppError`s and render themselves.

pub mod accounts;
pub mod achievements;
pub mod blogs;
pub mod events;
pub mod notices;
pub mod research;
pub mod resources;

use crate::{moderation::Role, uploads::UploadForm};

/// The role a form claims for its author, if it names a known one.
pub(crate) fn declared_role(form: &UploadForm, field: &str) -> Option<Role> {
    form.text(field).as_deref().and_then(Role::parse)
}

/// health
///
/// Liveness probe for load balancers. Sits outside `/api`.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health() -> &'static str {
    "ok"
}
