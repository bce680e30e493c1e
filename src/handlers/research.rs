use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState, attachments,
    error::AppResult,
    models::{DeletionReport, NewResearchPost, ResearchPost, ResearchUploadForm},
    uploads::{FileSlot, UploadForm},
};

const RESEARCH_SLOTS: [FileSlot; 2] = [FileSlot::single("photo"), FileSlot::single("document")];

/// create_research_post
///
/// A cover photo and the paper are both optional; the text fields are not.
#[utoipa::path(
    post,
    path = "/api/research-feed",
    tag = "research",
    request_body(content = ResearchUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Research published", body = ResearchPost),
        (status = 400, description = "Missing field or bad upload")
    )
)]
pub async fn create_research_post(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ResearchPost>)> {
    let mut form = UploadForm::read(multipart, &RESEARCH_SLOTS).await?;

    let title = form.require("title")?;
    let caption = form.require("caption")?;
    let author = form.require("author")?;
    let role = form.require("role")?;

    let image_path = form.store_one(&state.storage, "photo").await?;
    let document_path = match form.store_one(&state.storage, "document").await {
        Ok(path) => path,
        Err(e) => {
            attachments::purge(&state.storage, image_path.into_iter().collect()).await;
            return Err(e);
        }
    };

    let stored = [&image_path, &document_path]
        .into_iter()
        .flatten()
        .cloned()
        .collect();

    let post = NewResearchPost {
        title,
        caption,
        author,
        role,
        image_path,
        document_path,
    };

    let created = attachments::commit_or_discard(
        &state.storage,
        stored,
        state.repo.create_research_post(post),
    )
    .await?;

    info!(post = %created.id, "research post published");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/research-feed",
    tag = "research",
    responses((status = 200, description = "Research feed, newest first", body = [ResearchPost]))
)]
pub async fn list_research_posts(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ResearchPost>>> {
    Ok(Json(state.repo.list_research_posts().await?))
}

#[utoipa::path(
    delete,
    path = "/api/research-feed/{id}",
    tag = "research",
    params(("id" = Uuid, Path, description = "Research post ID")),
    responses(
        (status = 200, description = "Deleted", body = DeletionReport),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_research_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeletionReport>> {
    let report = attachments::delete_with_attachments(
        &state.storage,
        state.repo.get_research_post(id).await?,
        state.repo.delete_research_post(id),
        "Post",
    )
    .await?;
    Ok(Json(report))
}
