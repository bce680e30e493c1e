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
    models::{DeletionReport, NewNotice, Notice, NoticeUploadForm},
    moderation::Role,
    uploads::{FileSlot, UploadForm},
};

const NOTICE_SLOTS: [FileSlot; 1] = [FileSlot::single("file")];

/// create_notice
///
/// Teachers only, judged by the `role` field of the form. The check runs
/// before the attachment is stored.
#[utoipa::path(
    post,
    path = "/api/notices",
    tag = "notices",
    request_body(content = NoticeUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Notice published", body = Notice),
        (status = 403, description = "Only teachers can post notices")
    )
)]
pub async fn create_notice(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Notice>)> {
    let mut form = UploadForm::read(multipart, &NOTICE_SLOTS).await?;

    if declared_role(&form, "role") != Some(Role::Teacher) {
        return Err(AppError::Forbidden(
            "Only teachers can post notices.".to_string(),
        ));
    }
    let title = form.require("title")?;
    let author = form.require("author")?;

    let file_path = form.store_one(&state.storage, "file").await?;
    let notice = NewNotice {
        title,
        content: form.text("content"),
        file_path: file_path.clone(),
        author,
    };

    let created = attachments::commit_or_discard(
        &state.storage,
        file_path.into_iter().collect(),
        state.repo.create_notice(notice),
    )
    .await?;

    info!(notice = %created.id, author = %created.author, "notice published");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/notices",
    tag = "notices",
    responses((status = 200, description = "Notices, newest first", body = [Notice]))
)]
pub async fn list_notices(State(state): State<AppState>) -> AppResult<Json<Vec<Notice>>> {
    Ok(Json(state.repo.list_notices().await?))
}

#[utoipa::path(
    delete,
    path = "/api/notices/{id}",
    tag = "notices",
    params(("id" = Uuid, Path, description = "Notice ID")),
    responses(
        (status = 200, description = "Deleted", body = DeletionReport),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_notice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeletionReport>> {
    let report = attachments::delete_with_attachments(
        &state.storage,
        state.repo.get_notice(id).await?,
        state.repo.delete_notice(id),
        "Notice",
    )
    .await?;
    Ok(Json(report))
}
