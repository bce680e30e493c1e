use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::moderation::{ModerationStatus, Role};

pub const DEFAULT_QUALIFICATIONS: &str = "M.Sc, PhD";
pub const DEFAULT_BIO: &str = "Dedicated to teaching and research in physics.";

// --- Accounts ---

/// AttendanceCount
///
/// Attended versus total class sessions for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AttendanceCount {
    pub attended: i32,
    pub total: i32,
}

/// Monthly attendance keyed by short month name (`jan`, `feb`, ...).
pub type Attendance = BTreeMap<String, AttendanceCount>;

/// Attendance sheet every new account starts with.
pub fn initial_attendance() -> Attendance {
    ["jan", "feb"]
        .into_iter()
        .map(|month| (month.to_string(), AttendanceCount::default()))
        .collect()
}

/// AccountProfile
///
/// Role-specific account data. The `role` key in the JSON form is the tag, so a
/// teacher can never carry a roll number and a student never has a bio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(tag = "role", rename_all = "lowercase")]
#[ts(export)]
pub enum AccountProfile {
    Teacher {
        designation: Option<String>,
        qualifications: String,
        bio: String,
        #[serde(rename = "profilePicture")]
        profile_picture: Option<String>,
    },
    Student {
        #[serde(rename = "rollNumber")]
        roll_number: Option<String>,
        semester: Option<String>,
    },
}

impl AccountProfile {
    /// A teacher profile with the department's default blurb.
    pub fn new_teacher(designation: Option<String>) -> Self {
        AccountProfile::Teacher {
            designation,
            qualifications: DEFAULT_QUALIFICATIONS.to_string(),
            bio: DEFAULT_BIO.to_string(),
            profile_picture: None,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            AccountProfile::Teacher { .. } => Role::Teacher,
            AccountProfile::Student { .. } => Role::Student,
        }
    }
}

/// Account
///
/// A teacher or student as returned to clients. The password hash lives only in
/// `StoredCredentials` and never reaches this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub status: ModerationStatus,
    #[serde(flatten)]
    pub profile: AccountProfile,
    pub attendance: Attendance,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn role(&self) -> Role {
        self.profile.role()
    }

    pub fn semester(&self) -> Option<&str> {
        match &self.profile {
            AccountProfile::Student { semester, .. } => semester.as_deref(),
            AccountProfile::Teacher { .. } => None,
        }
    }

    /// Pending students are the only accounts that may not sign in.
    pub fn awaiting_approval(&self) -> bool {
        self.role() == Role::Student && self.status == ModerationStatus::Pending
    }
}

/// AccountSummary
///
/// What a successful login hands back to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AccountSummary {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub semester: Option<String>,
    pub status: ModerationStatus,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            name: account.name.clone(),
            role: account.role(),
            semester: account.semester().map(str::to_string),
            status: account.status,
        }
    }
}

/// An account together with its password hash. Repository-internal.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub account: Account,
    pub password_hash: String,
}

/// Everything needed to insert an account row.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub status: ModerationStatus,
    pub profile: AccountProfile,
    pub attendance: Attendance,
}

/// Partial teacher profile change. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeacherProfileUpdate {
    pub qualifications: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
}

// --- Content ---

/// Resource
///
/// A shared file: lecture notes (`type = "Resource"`) or a magazine issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Resource {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub semester: String,
    pub subject: String,
    pub topic: String,
    pub uploader: Option<String>,
    pub role: Option<String>,
    pub file_path: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// The resource type hidden from visitors who are not signed in.
pub const ACADEMIC_RESOURCE_KIND: &str = "Resource";

#[derive(Debug, Clone)]
pub struct NewResource {
    pub title: String,
    pub kind: String,
    pub semester: String,
    pub subject: String,
    pub topic: String,
    pub uploader: Option<String>,
    pub role: Option<String>,
    pub file_path: String,
}

/// Blog
///
/// The only moderated content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub author: Option<String>,
    pub image_path: Option<String>,
    pub document_path: Option<String>,
    pub status: ModerationStatus,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub content: Option<String>,
    pub author: Option<String>,
    pub image_path: Option<String>,
    pub document_path: Option<String>,
    pub status: ModerationStatus,
}

/// Notice
///
/// A notice board entry with an optional attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Notice {
    pub id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub file_path: Option<String>,
    pub author: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNotice {
    pub title: String,
    pub content: Option<String>,
    pub file_path: Option<String>,
    pub author: String,
}

/// ResearchPost
///
/// A research feed entry: cover photo plus the paper itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ResearchPost {
    pub id: Uuid,
    pub title: String,
    pub caption: String,
    pub author: String,
    pub role: String,
    pub image_path: Option<String>,
    pub document_path: Option<String>,
    pub likes: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewResearchPost {
    pub title: String,
    pub caption: String,
    pub author: String,
    pub role: String,
    pub image_path: Option<String>,
    pub document_path: Option<String>,
}

/// EventHighlight
///
/// A uniquely named gallery folder such as "Picnics".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EventHighlight {
    pub id: Uuid,
    pub title: String,
    pub created_by: Option<String>,
}

/// EventPost
///
/// One album inside a highlight. Always holds at least one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EventPost {
    pub id: Uuid,
    pub highlight_id: Uuid,
    pub title: String,
    pub caption: Option<String>,
    pub image_paths: Vec<String>,
    pub author: Option<String>,
    pub role: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEventPost {
    pub highlight_id: Uuid,
    pub title: String,
    pub caption: Option<String>,
    pub image_paths: Vec<String>,
    pub author: Option<String>,
    pub role: Option<String>,
}

/// Achievement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Achievement {
    pub id: Uuid,
    pub category: String,
    pub students_involved: String,
    pub description: String,
    pub image_paths: Vec<String>,
    pub author: Option<String>,
    pub author_role: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAchievement {
    pub category: String,
    pub students_involved: String,
    pub description: String,
    pub image_paths: Vec<String>,
    pub author: Option<String>,
    pub author_role: Option<String>,
}

// --- Request Payloads (JSON) ---

/// RegisterRequest
///
/// Input payload for POST /register. Only the fields relevant to the chosen
/// role are read; the rest are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct RegisterRequest {
    pub role: String,
    pub name: Option<String>,
    pub password: String,
    /// Chosen username. Teachers only; student usernames are derived.
    pub username: Option<String>,
    pub roll_number: Option<String>,
    pub designation: Option<String>,
    pub semester: Option<String>,
    pub admin_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RegisterResponse {
    pub message: String,
    pub username: String,
    pub status: ModerationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// CreateHighlightRequest
///
/// Input payload for POST /events/highlight. `role` is the poster's declared
/// role; only teachers may create categories.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(default)]
#[ts(export)]
pub struct CreateHighlightRequest {
    pub title: String,
    pub author: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RenameHighlightRequest {
    pub title: String,
}

/// EditEventPostRequest
///
/// Partial update for an album. Absent fields stay as they are.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct EditEventPostRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

// --- Responses ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// DeletionReport
///
/// Returned by every delete. The record is gone whenever this is returned;
/// `warnings` lists attachments whose underlying file could not be removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DeletionReport {
    pub message: String,
    pub warnings: Vec<String>,
}

// --- Multipart Form Schemas (documentation only) ---

/// Fields accepted by POST /upload.
#[derive(Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct ResourceUploadForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    title: String,
    #[serde(rename = "type")]
    kind: String,
    uploader: Option<String>,
    role: Option<String>,
    semester: Option<String>,
    subject: Option<String>,
    topic: Option<String>,
}

/// Fields accepted by POST /blogs.
#[derive(Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct BlogUploadForm {
    title: String,
    content: Option<String>,
    author: Option<String>,
    role: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    image: Option<Vec<u8>>,
    #[schema(value_type = Option<String>, format = Binary)]
    document: Option<Vec<u8>>,
}

/// Fields accepted by POST /notices.
#[derive(Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct NoticeUploadForm {
    title: String,
    content: Option<String>,
    author: String,
    role: String,
    #[schema(value_type = Option<String>, format = Binary)]
    file: Option<Vec<u8>>,
}

/// Fields accepted by POST /research-feed.
#[derive(Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct ResearchUploadForm {
    title: String,
    caption: String,
    author: String,
    role: String,
    #[schema(value_type = Option<String>, format = Binary)]
    photo: Option<Vec<u8>>,
    #[schema(value_type = Option<String>, format = Binary)]
    document: Option<Vec<u8>>,
}

/// Fields accepted by POST /events/post.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct EventPostUploadForm {
    highlight_id: Uuid,
    title: String,
    caption: Option<String>,
    author: Option<String>,
    role: Option<String>,
    #[schema(value_type = Vec<String>, format = Binary)]
    photos: Vec<Vec<u8>>,
}

/// Fields accepted by POST /achievements.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct AchievementUploadForm {
    category: String,
    students_involved: String,
    description: String,
    author: Option<String>,
    author_role: Option<String>,
    #[schema(value_type = Vec<String>, format = Binary)]
    photos: Vec<Vec<u8>>,
}

/// Fields accepted by PUT /profile/{username}.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct ProfileUploadForm {
    qualifications: Option<String>,
    bio: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    profile_pic: Option<Vec<u8>>,
}
