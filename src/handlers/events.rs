use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState, attachments,
    error::{AppError, AppResult},
    models::{
        CreateHighlightRequest, DeletionReport, EditEventPostRequest, EventHighlight, EventPost,
        EventPostUploadForm, NewEventPost, RenameHighlightRequest,
    },
    moderation::Role,
    uploads::{FileSlot, UploadForm},
};

/// Photos per album.
pub const MAX_EVENT_PHOTOS: usize = 20;

const EVENT_POST_SLOTS: [FileSlot; 1] = [FileSlot::many("photos", MAX_EVENT_PHOTOS)];

fn required_title(title: &str) -> AppResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("Title is required.".to_string()));
    }
    Ok(title.to_string())
}

// --- Highlights ---

/// create_highlight
///
/// Opens a new gallery category. Teachers only; titles are unique.
#[utoipa::path(
    post,
    path = "/api/events/highlight",
    tag = "events",
    request_body = CreateHighlightRequest,
    responses(
        (status = 201, description = "Category created", body = EventHighlight),
        (status = 403, description = "Not a teacher"),
        (status = 409, description = "Category already exists")
    )
)]
pub async fn create_highlight(
    State(state): State<AppState>,
    Json(payload): Json<CreateHighlightRequest>,
) -> AppResult<(StatusCode, Json<EventHighlight>)> {
    if payload.role.as_deref().and_then(Role::parse) != Some(Role::Teacher) {
        return Err(AppError::Forbidden(
            "Only teachers can create categories.".to_string(),
        ));
    }
    let title = required_title(&payload.title)?;

    let highlight = state
        .repo
        .create_highlight(title, payload.author.filter(|a| !a.trim().is_empty()))
        .await?;

    info!(highlight = %highlight.id, title = %highlight.title, "highlight created");
    Ok((StatusCode::CREATED, Json(highlight)))
}

#[utoipa::path(
    get,
    path = "/api/events/highlights",
    tag = "events",
    responses((status = 200, description = "Categories by title", body = [EventHighlight]))
)]
pub async fn list_highlights(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<EventHighlight>>> {
    Ok(Json(state.repo.list_highlights().await?))
}

#[utoipa::path(
    put,
    path = "/api/events/highlight/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Highlight ID")),
    request_body = RenameHighlightRequest,
    responses(
        (status = 200, description = "Renamed", body = EventHighlight),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Category already exists")
    )
)]
pub async fn rename_highlight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RenameHighlightRequest>,
) -> AppResult<Json<EventHighlight>> {
    let title = required_title(&payload.title)?;

    let highlight = state
        .repo
        .rename_highlight(id, title)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;
    Ok(Json(highlight))
}

// --- Albums ---

/// create_event_post
///
/// Publishes an album of 1 to 20 photos into an existing category. Nothing is
/// stored until the form and the category have both been checked.
#[utoipa::path(
    post,
    path = "/api/events/post",
    tag = "events",
    request_body(content = EventPostUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Album published", body = EventPost),
        (status = 400, description = "No photos, too many photos or bad field"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn create_event_post(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<EventPost>)> {
    let mut form = UploadForm::read(multipart, &EVENT_POST_SLOTS).await?;

    let highlight_id = Uuid::parse_str(&form.require("highlightId")?)
        .map_err(|_| AppError::InvalidInput("highlightId must be a UUID".to_string()))?;
    let title = form.require("title")?;
    if form.file_count("photos") == 0 {
        return Err(AppError::InvalidInput(
            "Please select at least one photo.".to_string(),
        ));
    }

    if state.repo.get_highlight(highlight_id).await?.is_none() {
        return Err(AppError::NotFound("Category not found".to_string()));
    }

    let image_paths = form.store_all(&state.storage, "photos").await?;
    let post = NewEventPost {
        highlight_id,
        title,
        caption: form.text("caption"),
        image_paths: image_paths.clone(),
        author: form.text("author"),
        role: form.text("role"),
    };

    let created = attachments::commit_or_discard(
        &state.storage,
        image_paths,
        state.repo.create_event_post(post),
    )
    .await?;

    info!(post = %created.id, highlight = %highlight_id, photos = created.image_paths.len(), "album published");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/events/posts/{highlight_id}",
    tag = "events",
    params(("highlight_id" = Uuid, Path, description = "Highlight ID")),
    responses((status = 200, description = "Albums, newest first", body = [EventPost]))
)]
pub async fn list_event_posts(
    State(state): State<AppState>,
    Path(highlight_id): Path<Uuid>,
) -> AppResult<Json<Vec<EventPost>>> {
    Ok(Json(state.repo.list_event_posts(highlight_id).await?))
}

/// edit_event_post
///
/// Title and caption only; the photos of an album are fixed.
#[utoipa::path(
    put,
    path = "/api/events/post/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Album ID")),
    request_body = EditEventPostRequest,
    responses(
        (status = 200, description = "Updated album", body = EventPost),
        (status = 404, description = "Not Found")
    )
)]
pub async fn edit_event_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EditEventPostRequest>,
) -> AppResult<Json<EventPost>> {
    let edit = EditEventPostRequest {
        title: payload.title.as_deref().map(required_title).transpose()?,
        caption: payload.caption,
    };

    let post = state
        .repo
        .update_event_post(id, edit)
        .await?
        .ok_or_else(|| AppError::NotFound("Album not found".to_string()))?;
    Ok(Json(post))
}

/// delete_event_post
///
/// Removes the album, then every one of its photos.
#[utoipa::path(
    delete,
    path = "/api/events/post/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Album ID")),
    responses(
        (status = 200, description = "Deleted", body = DeletionReport),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_event_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeletionReport>> {
    let report = attachments::delete_with_attachments(
        &state.storage,
        state.repo.get_event_post(id).await?,
        state.repo.delete_event_post(id),
        "Album",
    )
    .await?;
    Ok(Json(report))
}
