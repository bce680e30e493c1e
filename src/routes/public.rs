use crate::{
    AppState,
    handlers::{accounts, achievements, blogs, events, notices, research, resources},
};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Read-only listings plus the two identity endpoints. Visibility rules live
/// in the handlers and repository: only approved blogs are listed as published
/// and anonymous visitors do not see lecture resources.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // --- Identity ---
        .route("/login", post(accounts::login))
        .route("/register", post(accounts::register))
        .route("/faculty", get(accounts::list_faculty))
        // Teacher dashboard queue.
        .route("/students/pending", get(accounts::list_pending_students))
        // --- Content listings ---
        // GET /resources?role=...
        .route("/resources", get(resources::list_resources))
        .route("/blogs", get(blogs::list_published_blogs))
        .route("/blogs/pending", get(blogs::list_pending_blogs))
        .route("/notices", get(notices::list_notices))
        .route("/research-feed", get(research::list_research_posts))
        .route("/events/highlights", get(events::list_highlights))
        .route("/events/posts/{highlight_id}", get(events::list_event_posts))
        // `{id}` holds the category; the name must match the DELETE route on the same path.
        .route("/achievements/{id}", get(achievements::list_achievements))
}
