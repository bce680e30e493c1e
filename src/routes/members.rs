use crate::{
    AppState,
    handlers::{accounts, achievements, blogs, events, notices, research, resources},
};
use axum::{
    Router,
    routing::{post, put},
};

/// Members Router Module
///
/// Content creation and editing. Author identity and role travel in the
/// request body; the few role rules (notices and gallery categories are for
/// teachers) are checked by the handlers against those fields.
pub fn member_routes() -> Router<AppState> {
    Router::new()
        // Multipart, optional profilePic.
        .route("/profile/{username}", put(accounts::update_profile))
        // Multipart uploads.
        .route("/upload", post(resources::upload_resource))
        .route("/blogs", post(blogs::create_blog))
        .route("/notices", post(notices::create_notice))
        .route("/research-feed", post(research::create_research_post))
        .route("/achievements", post(achievements::create_achievement))
        // --- Event gallery ---
        .route("/events/highlight", post(events::create_highlight))
        .route("/events/highlight/{id}", put(events::rename_highlight))
        .route("/events/post", post(events::create_event_post))
        .route("/events/post/{id}", put(events::edit_event_post))
}
