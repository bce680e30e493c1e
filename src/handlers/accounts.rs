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
    identity,
    models::{
        Account, AccountSummary, LoginRequest, MessageResponse, ProfileUploadForm,
        RegisterRequest, RegisterResponse, TeacherProfileUpdate,
    },
    moderation::{ModerationStatus, Role},
    uploads::{FileSlot, UploadForm},
};

const PROFILE_SLOTS: [FileSlot; 1] = [FileSlot::single("profilePic")];

/// register
///
/// Creates a teacher (approved at once, teacher code required) or a student
/// (pending, username derived from name and roll number).
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "accounts",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Invalid teacher code"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let plan = identity::plan_registration(payload, &state.config.teacher_admin_code)?;
    let account = state.repo.create_account(plan).await?;

    info!(username = %account.username, role = account.role().as_str(), status = account.status.as_str(), "account registered");

    let message = match account.status {
        ModerationStatus::Pending => "Account Created. Waiting for Teacher Approval.",
        ModerationStatus::Approved => "Account Created",
    };

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: message.to_string(),
            username: account.username,
            status: account.status,
        }),
    ))
}

/// login
///
/// Returns the account summary the client keeps for the session. Pending
/// students are refused before their password is checked.
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AccountSummary),
        (status = 400, description = "Invalid Username or Password"),
        (status = 403, description = "Awaiting teacher approval")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AccountSummary>> {
    let credentials = state.repo.find_credentials(payload.username.trim()).await?;
    let summary = identity::authenticate(credentials, &payload.password)?;

    info!(username = %summary.username, "login succeeded");
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/students/pending",
    tag = "accounts",
    responses((status = 200, description = "Students awaiting approval", body = [Account]))
)]
pub async fn list_pending_students(State(state): State<AppState>) -> AppResult<Json<Vec<Account>>> {
    let students = state
        .repo
        .list_accounts(Role::Student, ModerationStatus::Pending)
        .await?;
    Ok(Json(students))
}

/// approve_student
///
/// Idempotent: approving an approved student succeeds again.
#[utoipa::path(
    put,
    path = "/api/students/approve/{id}",
    tag = "accounts",
    params(("id" = Uuid, Path, description = "Student account ID")),
    responses(
        (status = 200, description = "Approved", body = MessageResponse),
        (status = 404, description = "No such student")
    )
)]
pub async fn approve_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    if !state.repo.approve_student(id).await? {
        return Err(AppError::NotFound("Student not found".to_string()));
    }

    info!(student = %id, "student approved");
    Ok(Json(MessageResponse::new("Student Approved!")))
}

#[utoipa::path(
    get,
    path = "/api/faculty",
    tag = "accounts",
    responses((status = 200, description = "Approved teachers", body = [Account]))
)]
pub async fn list_faculty(State(state): State<AppState>) -> AppResult<Json<Vec<Account>>> {
    let faculty = state
        .repo
        .list_accounts(Role::Teacher, ModerationStatus::Approved)
        .await?;
    Ok(Json(faculty))
}

/// update_profile
///
/// Partial teacher profile update. Blank text fields and a missing picture
/// leave the stored values alone.
#[utoipa::path(
    put,
    path = "/api/profile/{username}",
    tag = "accounts",
    params(("username" = String, Path, description = "Teacher username")),
    request_body(content = ProfileUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated profile", body = Account),
        (status = 404, description = "No such teacher")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<Account>> {
    let mut form = UploadForm::read(multipart, &PROFILE_SLOTS).await?;

    let profile_picture = form.store_one(&state.storage, "profilePic").await?;
    let update = TeacherProfileUpdate {
        qualifications: form.text("qualifications"),
        bio: form.text("bio"),
        profile_picture: profile_picture.clone(),
    };

    let updated = attachments::commit_or_discard(
        &state.storage,
        profile_picture.iter().cloned().collect(),
        state.repo.update_teacher_profile(&username, update),
    )
    .await?;

    match updated {
        Some(account) => {
            info!(username = %username, "teacher profile updated");
            Ok(Json(account))
        }
        None => {
            attachments::purge(&state.storage, profile_picture.into_iter().collect()).await;
            Err(AppError::NotFound("Teacher not found".to_string()))
        }
    }
}
