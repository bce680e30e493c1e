use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    AppState, attachments,
    error::{AppError, AppResult},
    models::{DeletionReport, NewResource, Resource, ResourceUploadForm},
    uploads::{FileSlot, UploadForm},
};

const RESOURCE_SLOTS: [FileSlot; 1] = [FileSlot::single("file")];

/// ResourceQuery
///
/// `role` is whatever the client believes the visitor is.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ResourceQuery {
    /// `teacher`, `student`, or absent/`outsider` for anonymous visitors.
    pub role: Option<String>,
}

impl ResourceQuery {
    /// Anonymous visitors do not get lecture resources.
    pub fn include_academic(&self) -> bool {
        match self.role.as_deref().map(str::trim) {
            None | Some("") | Some("outsider") | Some("undefined") => false,
            Some(_) => true,
        }
    }
}

/// upload_resource
///
/// Stores the uploaded file and records it. Semester, subject and topic
/// default to empty strings.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "resources",
    request_body(content = ResourceUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Resource stored", body = Resource),
        (status = 400, description = "Missing file or field")
    )
)]
pub async fn upload_resource(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Resource>)> {
    let mut form = UploadForm::read(multipart, &RESOURCE_SLOTS).await?;

    let title = form.require("title")?;
    let kind = form.require("type")?;
    if form.file_count("file") == 0 {
        return Err(AppError::InvalidInput("No file uploaded".to_string()));
    }

    let file_path = form
        .store_one(&state.storage, "file")
        .await?
        .ok_or_else(|| AppError::InvalidInput("No file uploaded".to_string()))?;

    let resource = NewResource {
        title,
        kind,
        semester: form.text("semester").unwrap_or_default(),
        subject: form.text("subject").unwrap_or_default(),
        topic: form.text("topic").unwrap_or_default(),
        uploader: form.text("uploader"),
        role: form.text("role"),
        file_path: file_path.clone(),
    };

    let created = attachments::commit_or_discard(
        &state.storage,
        vec![file_path],
        state.repo.create_resource(resource),
    )
    .await?;

    info!(resource = %created.id, kind = %created.kind, "resource uploaded");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/resources",
    tag = "resources",
    params(ResourceQuery),
    responses((status = 200, description = "Resources, newest first", body = [Resource]))
)]
pub async fn list_resources(
    State(state): State<AppState>,
    Query(query): Query<ResourceQuery>,
) -> AppResult<Json<Vec<Resource>>> {
    let resources = state.repo.list_resources(query.include_academic()).await?;
    Ok(Json(resources))
}

#[utoipa::path(
    delete,
    path = "/api/resources/{id}",
    tag = "resources",
    params(("id" = Uuid, Path, description = "Resource ID")),
    responses(
        (status = 200, description = "Deleted", body = DeletionReport),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_resource(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeletionReport>> {
    let report = attachments::delete_with_attachments(
        &state.storage,
        state.repo.get_resource(id).await?,
        state.repo.delete_resource(id),
        "Resource",
    )
    .await?;
    Ok(Json(report))
}
