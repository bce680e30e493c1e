use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    http::HeaderName,
    middleware,
    routing::get,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Domain rules.
pub mod attachments;
pub mod identity;
pub mod moderation;

// Services and infrastructure.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod storage;
pub mod uploads;

// Route groups (public, members, moderation).
pub mod routes;
use routes::{members, moderation as moderation_routes, public};

// --- Public Re-exports ---

pub use config::{AppConfig, StorageBackend};
pub use error::{AppError, AppResult};
pub use repository::{MemoryRepository, PostgresRepository, RepositoryState};
pub use storage::{LocalDiskStorage, MockStorageService, S3StorageClient, StorageState};

/// ApiDoc
///
/// OpenAPI document for every route, served at `/api-docs/openapi.json` and
/// browsable through Swagger UI.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::accounts::register, handlers::accounts::login,
        handlers::accounts::list_pending_students, handlers::accounts::approve_student,
        handlers::accounts::list_faculty, handlers::accounts::update_profile,
        handlers::resources::upload_resource, handlers::resources::list_resources,
        handlers::resources::delete_resource,
        handlers::blogs::create_blog, handlers::blogs::list_published_blogs,
        handlers::blogs::list_pending_blogs, handlers::blogs::approve_blog,
        handlers::blogs::delete_blog,
        handlers::notices::create_notice, handlers::notices::list_notices,
        handlers::notices::delete_notice,
        handlers::research::create_research_post, handlers::research::list_research_posts,
        handlers::research::delete_research_post,
        handlers::events::create_highlight, handlers::events::list_highlights,
        handlers::events::rename_highlight, handlers::events::create_event_post,
        handlers::events::list_event_posts, handlers::events::edit_event_post,
        handlers::events::delete_event_post,
        handlers::achievements::create_achievement, handlers::achievements::list_achievements,
        handlers::achievements::delete_achievement,
    ),
    components(
        schemas(
            models::Account, models::AccountProfile, models::AccountSummary,
            models::AttendanceCount, models::RegisterRequest, models::RegisterResponse,
            models::LoginRequest, models::Resource, models::Blog, models::Notice,
            models::ResearchPost, models::EventHighlight, models::EventPost,
            models::Achievement, models::CreateHighlightRequest,
            models::RenameHighlightRequest, models::EditEventPostRequest,
            models::MessageResponse, models::DeletionReport,
            models::ResourceUploadForm, models::BlogUploadForm, models::NoticeUploadForm,
            models::ResearchUploadForm, models::EventPostUploadForm,
            models::AchievementUploadForm, models::ProfileUploadForm,
            moderation::ModerationStatus, moderation::Role,
        )
    ),
    tags(
        (name = "accounts", description = "Registration, login and approvals"),
        (name = "resources", description = "Lecture notes and magazines"),
        (name = "blogs", description = "Moderated department blog"),
        (name = "notices", description = "Digital notice board"),
        (name = "research", description = "Research feed"),
        (name = "events", description = "Event gallery"),
        (name = "achievements", description = "Student achievements")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// Everything a handler may need, cloned cheaply into every request.
#[derive(Clone)]
pub struct AppState {
    /// Persistence (Postgres in production, in-memory in tests).
    pub repo: RepositoryState,
    /// Blob storage for uploaded files.
    pub storage: StorageState,
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the API under `/api`, the health probe, static serving of
/// uploaded files under `/uploads`, Swagger UI, and the global layers.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. API routes
    let api = Router::new()
        .merge(public::public_routes())
        .merge(members::member_routes())
        .merge(
            moderation_routes::moderation_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::moderator_gate,
            )),
        );

    let mut base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health))
        .nest("/api", api);

    // Stored paths look like `uploads/<name>`. Only the local backend keeps them
    // on this host; S3 objects are fetched from the bucket directly.
    if state.config.storage == StorageBackend::LocalDisk {
        base_router =
            base_router.nest_service("/uploads", ServeDir::new(&state.config.upload_dir));
    }

    let base_router = base_router
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .with_state(state);

    // 3. Observability and Correlation Layers
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for one request, tagged with the `x-request-id` set by the outer layer.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
