use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use tracing::info;
use uuid::Uuid;

use super::declared_role;
use crate::{
    AppState, attachments,
    error::{AppError, AppResult},
    models::{Blog, BlogUploadForm, DeletionReport, NewBlog},
    moderation::{ModerationStatus, Visibility},
    uploads::{FileSlot, UploadForm},
};

const BLOG_SLOTS: [FileSlot; 2] = [FileSlot::single("image"), FileSlot::single("document")];

/// create_blog
///
/// Student posts wait for a teacher; everyone else publishes straight away.
#[utoipa::path(
    post,
    path = "/api/blogs",
    tag = "blogs",
    request_body(content = BlogUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Blog stored", body = Blog),
        (status = 400, description = "Missing title or bad upload")
    )
)]
pub async fn create_blog(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Blog>)> {
    let mut form = UploadForm::read(multipart, &BLOG_SLOTS).await?;

    let title = form.require("title")?;
    let status = ModerationStatus::initial_for(declared_role(&form, "role"));

    let image_path = form.store_one(&state.storage, "image").await?;
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

    let blog = NewBlog {
        title,
        content: form.text("content"),
        author: form.text("author"),
        image_path,
        document_path,
        status,
    };

    let created =
        attachments::commit_or_discard(&state.storage, stored, state.repo.create_blog(blog))
            .await?;

    info!(blog = %created.id, status = created.status.as_str(), "blog posted");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/blogs",
    tag = "blogs",
    responses((status = 200, description = "Published blogs, newest first", body = [Blog]))
)]
pub async fn list_published_blogs(State(state): State<AppState>) -> AppResult<Json<Vec<Blog>>> {
    Ok(Json(state.repo.list_blogs(Visibility::Published).await?))
}

#[utoipa::path(
    get,
    path = "/api/blogs/pending",
    tag = "blogs",
    responses((status = 200, description = "Blogs awaiting approval, newest first", body = [Blog]))
)]
pub async fn list_pending_blogs(State(state): State<AppState>) -> AppResult<Json<Vec<Blog>>> {
    Ok(Json(state.repo.list_blogs(Visibility::Pending).await?))
}

#[utoipa::path(
    put,
    path = "/api/blogs/approve/{id}",
    tag = "blogs",
    params(("id" = Uuid, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Approved blog", body = Blog),
        (status = 404, description = "Not Found")
    )
)]
pub async fn approve_blog(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Blog>> {
    let blog = state
        .repo
        .approve_blog(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".to_string()))?;

    info!(blog = %id, "blog approved");
    Ok(Json(blog))
}

/// delete_blog
///
/// Removes the blog whatever its status, then its image and document.
#[utoipa::path(
    delete,
    path = "/api/blogs/{id}",
    tag = "blogs",
    params(("id" = Uuid, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Deleted", body = DeletionReport),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeletionReport>> {
    let report = attachments::delete_with_attachments(
        &state.storage,
        state.repo.get_blog(id).await?,
        state.repo.delete_blog(id),
        "Blog",
    )
    .await?;
    Ok(Json(report))
}
