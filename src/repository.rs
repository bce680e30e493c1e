use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        Account, AccountProfile, Achievement, Attendance, Blog, EditEventPostRequest, EventHighlight,
        EventPost, NewAccount, NewAchievement, NewBlog, NewEventPost, NewNotice, NewResearchPost,
        NewResource, Notice, ResearchPost, Resource, StoredCredentials, TeacherProfileUpdate,
    },
    moderation::{ModerationStatus, Role, Visibility},
};

mod memory;

pub use memory::MemoryRepository;

pub const DUPLICATE_USERNAME: &str = "Username already exists";
pub const DUPLICATE_HIGHLIGHT: &str = "Category already exists";

/// Repository Trait
///
/// The persistence contract for accounts and every content collection. Handlers
/// only ever see `Arc<dyn Repository>`, so the Postgres implementation and the
/// in-memory one used by tests are interchangeable.
///
/// Lookups return `Ok(None)` for a missing id; deletes and approvals return
/// `Ok(false)` when nothing matched. Errors are real storage failures, or
/// `Conflict` for a violated uniqueness rule.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Accounts ---
    /// Fails with `Conflict` when the username is taken.
    async fn create_account(&self, account: NewAccount) -> AppResult<Account>;
    async fn find_credentials(&self, username: &str) -> AppResult<Option<StoredCredentials>>;
    async fn get_account(&self, id: Uuid) -> AppResult<Option<Account>>;
    /// Marks a student approved. False when no student has this id.
    async fn approve_student(&self, id: Uuid) -> AppResult<bool>;
    /// Accounts of one role and status, ordered by username.
    async fn list_accounts(&self, role: Role, status: ModerationStatus)
    -> AppResult<Vec<Account>>;
    async fn update_teacher_profile(
        &self,
        username: &str,
        update: TeacherProfileUpdate,
    ) -> AppResult<Option<Account>>;

    // --- Resources ---
    async fn create_resource(&self, resource: NewResource) -> AppResult<Resource>;
    /// Newest first. With `include_academic` false, lecture resources are left out.
    async fn list_resources(&self, include_academic: bool) -> AppResult<Vec<Resource>>;
    async fn get_resource(&self, id: Uuid) -> AppResult<Option<Resource>>;
    async fn delete_resource(&self, id: Uuid) -> AppResult<bool>;

    // --- Blogs ---
    async fn create_blog(&self, blog: NewBlog) -> AppResult<Blog>;
    async fn list_blogs(&self, visibility: Visibility) -> AppResult<Vec<Blog>>;
    async fn get_blog(&self, id: Uuid) -> AppResult<Option<Blog>>;
    async fn approve_blog(&self, id: Uuid) -> AppResult<Option<Blog>>;
    async fn delete_blog(&self, id: Uuid) -> AppResult<bool>;

    // --- Notices ---
    async fn create_notice(&self, notice: NewNotice) -> AppResult<Notice>;
    async fn list_notices(&self) -> AppResult<Vec<Notice>>;
    async fn get_notice(&self, id: Uuid) -> AppResult<Option<Notice>>;
    async fn delete_notice(&self, id: Uuid) -> AppResult<bool>;

    // --- Research feed ---
    async fn create_research_post(&self, post: NewResearchPost) -> AppResult<ResearchPost>;
    async fn list_research_posts(&self) -> AppResult<Vec<ResearchPost>>;
    async fn get_research_post(&self, id: Uuid) -> AppResult<Option<ResearchPost>>;
    async fn delete_research_post(&self, id: Uuid) -> AppResult<bool>;

    // --- Event gallery ---
    /// Fails with `Conflict` when the title is taken.
    async fn create_highlight(
        &self,
        title: String,
        created_by: Option<String>,
    ) -> AppResult<EventHighlight>;
    /// Ordered by title.
    async fn list_highlights(&self) -> AppResult<Vec<EventHighlight>>;
    async fn get_highlight(&self, id: Uuid) -> AppResult<Option<EventHighlight>>;
    async fn rename_highlight(&self, id: Uuid, title: String)
    -> AppResult<Option<EventHighlight>>;

    async fn create_event_post(&self, post: NewEventPost) -> AppResult<EventPost>;
    async fn list_event_posts(&self, highlight_id: Uuid) -> AppResult<Vec<EventPost>>;
    async fn get_event_post(&self, id: Uuid) -> AppResult<Option<EventPost>>;
    async fn update_event_post(
        &self,
        id: Uuid,
        edit: EditEventPostRequest,
    ) -> AppResult<Option<EventPost>>;
    async fn delete_event_post(&self, id: Uuid) -> AppResult<bool>;

    // --- Achievements ---
    async fn create_achievement(&self, achievement: NewAchievement) -> AppResult<Achievement>;
    async fn list_achievements(&self, category: &str) -> AppResult<Vec<Achievement>>;
    async fn get_achievement(&self, id: Uuid) -> AppResult<Option<Achievement>>;
    async fn delete_achievement(&self, id: Uuid) -> AppResult<bool>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

// --- Row mapping ---

const ACCOUNT_COLUMNS: &str = "id, username, password_hash, name, role, status, designation, \
     qualifications, bio, profile_picture, roll_number, semester, attendance, created_at";

const RESOURCE_COLUMNS: &str =
    "id, title, type AS kind, semester, subject, topic, uploader, role, file_path, created_at";

const BLOG_COLUMNS: &str =
    "id, title, content, author, image_path, document_path, status, created_at";

const NOTICE_COLUMNS: &str = "id, title, content, file_path, author, created_at";

const RESEARCH_COLUMNS: &str =
    "id, title, caption, author, role, image_path, document_path, likes, created_at";

const EVENT_POST_COLUMNS: &str =
    "id, highlight_id, title, caption, image_paths, author, role, created_at";

const ACHIEVEMENT_COLUMNS: &str =
    "id, category, students_involved, description, image_paths, author, author_role, created_at";

/// One `accounts` row. The profile columns are flattened; which of them are
/// meaningful depends on `role`.
#[derive(FromRow)]
struct AccountRow {
    id: Uuid,
    username: String,
    password_hash: String,
    name: String,
    role: String,
    status: String,
    designation: Option<String>,
    qualifications: Option<String>,
    bio: Option<String>,
    profile_picture: Option<String>,
    roll_number: Option<String>,
    semester: Option<String>,
    attendance: Json<Attendance>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for StoredCredentials {
    type Error = AppError;

    fn try_from(row: AccountRow) -> AppResult<Self> {
        let profile = match Role::parse(&row.role) {
            Some(Role::Teacher) => AccountProfile::Teacher {
                designation: row.designation,
                qualifications: row.qualifications.unwrap_or_default(),
                bio: row.bio.unwrap_or_default(),
                profile_picture: row.profile_picture,
            },
            Some(Role::Student) => AccountProfile::Student {
                roll_number: row.roll_number,
                semester: row.semester,
            },
            None => {
                return Err(AppError::Internal(anyhow::anyhow!(
                    "unrecognized account role {:?}",
                    row.role
                )));
            }
        };

        Ok(StoredCredentials {
            account: Account {
                id: row.id,
                username: row.username,
                name: row.name,
                status: ModerationStatus::parse(&row.status)?,
                profile,
                attendance: row.attendance.0,
                created_at: row.created_at,
            },
            password_hash: row.password_hash,
        })
    }
}

impl TryFrom<AccountRow> for Account {
    type Error = AppError;

    fn try_from(row: AccountRow) -> AppResult<Self> {
        StoredCredentials::try_from(row).map(|creds| creds.account)
    }
}

/// Profile fields split back into their nullable columns for an insert.
#[derive(Default)]
struct ProfileColumns {
    designation: Option<String>,
    qualifications: Option<String>,
    bio: Option<String>,
    profile_picture: Option<String>,
    roll_number: Option<String>,
    semester: Option<String>,
}

impl From<AccountProfile> for ProfileColumns {
    fn from(profile: AccountProfile) -> Self {
        match profile {
            AccountProfile::Teacher {
                designation,
                qualifications,
                bio,
                profile_picture,
            } => ProfileColumns {
                designation,
                qualifications: Some(qualifications),
                bio: Some(bio),
                profile_picture,
                ..ProfileColumns::default()
            },
            AccountProfile::Student {
                roll_number,
                semester,
            } => ProfileColumns {
                roll_number,
                semester,
                ..ProfileColumns::default()
            },
        }
    }
}

#[derive(FromRow)]
struct BlogRow {
    id: Uuid,
    title: String,
    content: Option<String>,
    author: Option<String>,
    image_path: Option<String>,
    document_path: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<BlogRow> for Blog {
    type Error = AppError;

    fn try_from(row: BlogRow) -> AppResult<Self> {
        Ok(Blog {
            id: row.id,
            title: row.title,
            content: row.content,
            author: row.author,
            image_path: row.image_path,
            document_path: row.document_path,
            status: ModerationStatus::parse(&row.status)?,
            created_at: row.created_at,
        })
    }
}

/// PostgresRepository
///
/// The `Repository` backed by PostgreSQL. Queries are built at runtime and
/// every value is bound, never interpolated.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn delete_by_id(&self, table: &str, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- ACCOUNTS ---

    async fn create_account(&self, account: NewAccount) -> AppResult<Account> {
        let role = account.profile.role();
        let columns = ProfileColumns::from(account.profile);

        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            INSERT INTO accounts (
                id, username, password_hash, name, role, status,
                designation, qualifications, bio, profile_picture,
                roll_number, semester, attendance
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(&account.name)
        .bind(role.as_str())
        .bind(account.status.as_str())
        .bind(columns.designation)
        .bind(columns.qualifications)
        .bind(columns.bio)
        .bind(columns.profile_picture)
        .bind(columns.roll_number)
        .bind(columns.semester)
        .bind(Json(account.attendance))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_USERNAME))?;

        Account::try_from(row)
    }

    async fn find_credentials(&self, username: &str) -> AppResult<Option<StoredCredentials>> {
        sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .map(StoredCredentials::try_from)
        .transpose()
    }

    async fn get_account(&self, id: Uuid) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Account::try_from)
        .transpose()
    }

    /// approve_student
    ///
    /// Only student rows match, so a teacher id reports "not found". Approving
    /// an already approved student still matches and is a no-op.
    async fn approve_student(&self, id: Uuid) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE accounts SET status = $2 WHERE id = $1 AND role = 'student'")
                .bind(id)
                .bind(ModerationStatus::Approved.as_str())
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_accounts(
        &self,
        role: Role,
        status: ModerationStatus,
    ) -> AppResult<Vec<Account>> {
        sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE role = $1 AND status = $2 ORDER BY username"
        ))
        .bind(role.as_str())
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Account::try_from)
        .collect()
    }

    /// update_teacher_profile
    ///
    /// `COALESCE` keeps every column whose update value is `None`.
    async fn update_teacher_profile(
        &self,
        username: &str,
        update: TeacherProfileUpdate,
    ) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            UPDATE accounts
            SET qualifications = COALESCE($2, qualifications),
                bio = COALESCE($3, bio),
                profile_picture = COALESCE($4, profile_picture)
            WHERE username = $1 AND role = 'teacher'
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(username)
        .bind(update.qualifications)
        .bind(update.bio)
        .bind(update.profile_picture)
        .fetch_optional(&self.pool)
        .await?
        .map(Account::try_from)
        .transpose()
    }

    // --- RESOURCES ---

    async fn create_resource(&self, resource: NewResource) -> AppResult<Resource> {
        let created = sqlx::query_as::<_, Resource>(&format!(
            r#"
            INSERT INTO resources (id, title, type, semester, subject, topic, uploader, role, file_path)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {RESOURCE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(resource.title)
        .bind(resource.kind)
        .bind(resource.semester)
        .bind(resource.subject)
        .bind(resource.topic)
        .bind(resource.uploader)
        .bind(resource.role)
        .bind(resource.file_path)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list_resources(&self, include_academic: bool) -> AppResult<Vec<Resource>> {
        let resources = sqlx::query_as::<_, Resource>(&format!(
            "SELECT {RESOURCE_COLUMNS} FROM resources WHERE ($1 OR type <> $2) ORDER BY created_at DESC"
        ))
        .bind(include_academic)
        .bind(crate::models::ACADEMIC_RESOURCE_KIND)
        .fetch_all(&self.pool)
        .await?;
        Ok(resources)
    }

    async fn get_resource(&self, id: Uuid) -> AppResult<Option<Resource>> {
        let resource = sqlx::query_as::<_, Resource>(&format!(
            "SELECT {RESOURCE_COLUMNS} FROM resources WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(resource)
    }

    async fn delete_resource(&self, id: Uuid) -> AppResult<bool> {
        self.delete_by_id("resources", id).await
    }

    // --- BLOGS ---

    async fn create_blog(&self, blog: NewBlog) -> AppResult<Blog> {
        let row = sqlx::query_as::<_, BlogRow>(&format!(
            r#"
            INSERT INTO blogs (id, title, content, author, image_path, document_path, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {BLOG_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(blog.title)
        .bind(blog.content)
        .bind(blog.author)
        .bind(blog.image_path)
        .bind(blog.document_path)
        .bind(blog.status.as_str())
        .fetch_one(&self.pool)
        .await?;
        Blog::try_from(row)
    }

    async fn list_blogs(&self, visibility: Visibility) -> AppResult<Vec<Blog>> {
        sqlx::query_as::<_, BlogRow>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE status = $1 ORDER BY created_at DESC"
        ))
        .bind(visibility.status().as_str())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Blog::try_from)
        .collect()
    }

    async fn get_blog(&self, id: Uuid) -> AppResult<Option<Blog>> {
        sqlx::query_as::<_, BlogRow>(&format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Blog::try_from)
            .transpose()
    }

    async fn approve_blog(&self, id: Uuid) -> AppResult<Option<Blog>> {
        sqlx::query_as::<_, BlogRow>(&format!(
            "UPDATE blogs SET status = $2 WHERE id = $1 RETURNING {BLOG_COLUMNS}"
        ))
        .bind(id)
        .bind(ModerationStatus::Approved.as_str())
        .fetch_optional(&self.pool)
        .await?
        .map(Blog::try_from)
        .transpose()
    }

    async fn delete_blog(&self, id: Uuid) -> AppResult<bool> {
        self.delete_by_id("blogs", id).await
    }

    // --- NOTICES ---

    async fn create_notice(&self, notice: NewNotice) -> AppResult<Notice> {
        let created = sqlx::query_as::<_, Notice>(&format!(
            r#"
            INSERT INTO notices (id, title, content, file_path, author)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {NOTICE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(notice.title)
        .bind(notice.content)
        .bind(notice.file_path)
        .bind(notice.author)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list_notices(&self) -> AppResult<Vec<Notice>> {
        let notices = sqlx::query_as::<_, Notice>(&format!(
            "SELECT {NOTICE_COLUMNS} FROM notices ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(notices)
    }

    async fn get_notice(&self, id: Uuid) -> AppResult<Option<Notice>> {
        let notice = sqlx::query_as::<_, Notice>(&format!(
            "SELECT {NOTICE_COLUMNS} FROM notices WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(notice)
    }

    async fn delete_notice(&self, id: Uuid) -> AppResult<bool> {
        self.delete_by_id("notices", id).await
    }

    // --- RESEARCH FEED ---

    async fn create_research_post(&self, post: NewResearchPost) -> AppResult<ResearchPost> {
        let created = sqlx::query_as::<_, ResearchPost>(&format!(
            r#"
            INSERT INTO research_posts (id, title, caption, author, role, image_path, document_path)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {RESEARCH_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(post.title)
        .bind(post.caption)
        .bind(post.author)
        .bind(post.role)
        .bind(post.image_path)
        .bind(post.document_path)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list_research_posts(&self) -> AppResult<Vec<ResearchPost>> {
        let posts = sqlx::query_as::<_, ResearchPost>(&format!(
            "SELECT {RESEARCH_COLUMNS} FROM research_posts ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    async fn get_research_post(&self, id: Uuid) -> AppResult<Option<ResearchPost>> {
        let post = sqlx::query_as::<_, ResearchPost>(&format!(
            "SELECT {RESEARCH_COLUMNS} FROM research_posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(post)
    }

    async fn delete_research_post(&self, id: Uuid) -> AppResult<bool> {
        self.delete_by_id("research_posts", id).await
    }

    // --- EVENT GALLERY ---

    async fn create_highlight(
        &self,
        title: String,
        created_by: Option<String>,
    ) -> AppResult<EventHighlight> {
        sqlx::query_as::<_, EventHighlight>(
            "INSERT INTO event_highlights (id, title, created_by) VALUES ($1, $2, $3) RETURNING id, title, created_by",
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_HIGHLIGHT))
    }

    async fn list_highlights(&self) -> AppResult<Vec<EventHighlight>> {
        let highlights = sqlx::query_as::<_, EventHighlight>(
            "SELECT id, title, created_by FROM event_highlights ORDER BY title",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(highlights)
    }

    async fn get_highlight(&self, id: Uuid) -> AppResult<Option<EventHighlight>> {
        let highlight = sqlx::query_as::<_, EventHighlight>(
            "SELECT id, title, created_by FROM event_highlights WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(highlight)
    }

    async fn rename_highlight(
        &self,
        id: Uuid,
        title: String,
    ) -> AppResult<Option<EventHighlight>> {
        sqlx::query_as::<_, EventHighlight>(
            "UPDATE event_highlights SET title = $2 WHERE id = $1 RETURNING id, title, created_by",
        )
        .bind(id)
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_HIGHLIGHT))
    }

    async fn create_event_post(&self, post: NewEventPost) -> AppResult<EventPost> {
        let created = sqlx::query_as::<_, EventPost>(&format!(
            r#"
            INSERT INTO event_posts (id, highlight_id, title, caption, image_paths, author, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {EVENT_POST_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(post.highlight_id)
        .bind(post.title)
        .bind(post.caption)
        .bind(post.image_paths)
        .bind(post.author)
        .bind(post.role)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list_event_posts(&self, highlight_id: Uuid) -> AppResult<Vec<EventPost>> {
        let posts = sqlx::query_as::<_, EventPost>(&format!(
            "SELECT {EVENT_POST_COLUMNS} FROM event_posts WHERE highlight_id = $1 ORDER BY created_at DESC"
        ))
        .bind(highlight_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    async fn get_event_post(&self, id: Uuid) -> AppResult<Option<EventPost>> {
        let post = sqlx::query_as::<_, EventPost>(&format!(
            "SELECT {EVENT_POST_COLUMNS} FROM event_posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(post)
    }

    async fn update_event_post(
        &self,
        id: Uuid,
        edit: EditEventPostRequest,
    ) -> AppResult<Option<EventPost>> {
        let post = sqlx::query_as::<_, EventPost>(&format!(
            r#"
            UPDATE event_posts
            SET title = COALESCE($2, title),
                caption = COALESCE($3, caption)
            WHERE id = $1
            RETURNING {EVENT_POST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(edit.title)
        .bind(edit.caption)
        .fetch_optional(&self.pool)
        .await?;
        Ok(post)
    }

    async fn delete_event_post(&self, id: Uuid) -> AppResult<bool> {
        self.delete_by_id("event_posts", id).await
    }

    // --- ACHIEVEMENTS ---

    async fn create_achievement(&self, achievement: NewAchievement) -> AppResult<Achievement> {
        let created = sqlx::query_as::<_, Achievement>(&format!(
            r#"
            INSERT INTO achievements (id, category, students_involved, description, image_paths, author, author_role)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ACHIEVEMENT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(achievement.category)
        .bind(achievement.students_involved)
        .bind(achievement.description)
        .bind(achievement.image_paths)
        .bind(achievement.author)
        .bind(achievement.author_role)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list_achievements(&self, category: &str) -> AppResult<Vec<Achievement>> {
        let achievements = sqlx::query_as::<_, Achievement>(&format!(
            "SELECT {ACHIEVEMENT_COLUMNS} FROM achievements WHERE category = $1 ORDER BY created_at DESC"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(achievements)
    }

    async fn get_achievement(&self, id: Uuid) -> AppResult<Option<Achievement>> {
        let achievement = sqlx::query_as::<_, Achievement>(&format!(
            "SELECT {ACHIEVEMENT_COLUMNS} FROM achievements WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(achievement)
    }

    async fn delete_achievement(&self, id: Uuid) -> AppResult<bool> {
        self.delete_by_id("achievements", id).await
    }
}
