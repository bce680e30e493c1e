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
    models::{Achievement, AchievementUploadForm, DeletionReport, NewAchievement},
    uploads::{FileSlot, UploadForm},
};

pub const MAX_ACHIEVEMENT_PHOTOS: usize = 10;

const ACHIEVEMENT_SLOTS: [FileSlot; 1] = [FileSlot::many("photos", MAX_ACHIEVEMENT_PHOTOS)];

/// create_achievement
///
/// Up to ten photos, none required.
#[utoipa::path(
    post,
    path = "/api/achievements",
    tag = "achievements",
    request_body(content = AchievementUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Achievement posted", body = Achievement),
        (status = 400, description = "Missing field or too many photos")
    )
)]
pub async fn create_achievement(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Achievement>)> {
    let mut form = UploadForm::read(multipart, &ACHIEVEMENT_SLOTS).await?;

    let category = form.require("category")?;
    let students_involved = form.require("studentsInvolved")?;
    let description = form.require("description")?;

    let image_paths = form.store_all(&state.storage, "photos").await?;
    let achievement = NewAchievement {
        category,
        students_involved,
        description,
        image_paths: image_paths.clone(),
        author: form.text("author"),
        author_role: form.text("authorRole"),
    };

    let created = attachments::commit_or_discard(
        &state.storage,
        image_paths,
        state.repo.create_achievement(achievement),
    )
    .await?;

    info!(achievement = %created.id, category = %created.category, "achievement posted");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/achievements/{category}",
    tag = "achievements",
    params(("category" = String, Path, description = "e.g. academic or activity")),
    responses((status = 200, description = "Achievements, newest first", body = [Achievement]))
)]
pub async fn list_achievements(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<Json<Vec<Achievement>>> {
    Ok(Json(state.repo.list_achievements(&category).await?))
}

#[utoipa::path(
    delete,
    path = "/api/achievements/{id}",
    tag = "achievements",
    params(("id" = Uuid, Path, description = "Achievement ID")),
    responses(
        (status = 200, description = "Deleted", body = DeletionReport),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_achievement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeletionReport>> {
    let report = attachments::delete_with_attachments(
        &state.storage,
        state.repo.get_achievement(id).await?,
        state.repo.delete_achievement(id),
        "Achievement",
    )
    .await?;
    Ok(Json(report))
}
