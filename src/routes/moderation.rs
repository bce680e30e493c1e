use crate::{
    AppState,
    handlers::{accounts, achievements, blogs, events, notices, research, resources},
};
use axum::{
    Router,
    routing::{delete, put},
};

/// Moderation Router Module
///
/// Approvals and deletes. `create_router` wraps this group in
/// `auth::moderator_gate`, which demands an approved teacher caller when
/// `ENFORCE_MODERATOR_ROLE` is on and lets everything through otherwise.
///
/// Every delete answers with a `DeletionReport`; attachment files that could
/// not be removed show up as warnings, never as a failed delete.
pub fn moderation_routes() -> Router<AppState> {
    Router::new()
        // --- Approvals ---
        .route("/students/approve/{id}", put(accounts::approve_student))
        .route("/blogs/approve/{id}", put(blogs::approve_blog))
        // --- Deletes ---
        .route("/resources/{id}", delete(resources::delete_resource))
        .route("/blogs/{id}", delete(blogs::delete_blog))
        .route("/notices/{id}", delete(notices::delete_notice))
        .route("/research-feed/{id}", delete(research::delete_research_post))
        .route("/events/post/{id}", delete(events::delete_event_post))
        .route("/achievements/{id}", delete(achievements::delete_achievement))
}
