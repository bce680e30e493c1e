//! Postgres-backed repository tests.
//!
//! These need a reachable database (`DATABASE_URL`) and are ignored by
//! default: `cargo test -- --ignored`. Every test uses fresh names so runs do
//! not collide.

use dept_portal::{
    AppError,
    identity::hash_password,
    models::{
        AccountProfile, EditEventPostRequest, NewAccount, NewAchievement, NewBlog, NewEventPost,
        NewResource, TeacherProfileUpdate, initial_attendance,
    },
    moderation::{ModerationStatus, Role, Visibility},
    repository::{PostgresRepository, Repository},
};
use sqlx::PgPool;
use tokio::test;
use uuid::Uuid;

// --- Test Context and Setup ---

struct DbTestContext {
    pool: PgPool,
}

impl DbTestContext {
    async fn setup() -> Self {
        dotenv::dotenv().ok();

        let db_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set to run integration tests");

        let pool = PgPool::connect(&db_url)
            .await
            .expect("Failed to connect to database for integration tests.");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run database migrations.");

        DbTestContext { pool }
    }

    fn repository(&self) -> PostgresRepository {
        PostgresRepository::new(self.pool.clone())
    }
}

// --- Test Data Helpers ---

fn unique(prefix: &str) -> String {
    format!("{prefix}_{}", &Uuid::new_v4().simple().to_string()[..8])
}

fn new_student(username: &str) -> NewAccount {
    NewAccount {
        username: username.to_string(),
        password_hash: hash_password("secret").unwrap(),
        name: "Rahul Sharma".to_string(),
        status: ModerationStatus::Pending,
        profile: AccountProfile::Student {
            roll_number: Some("410012345678".to_string()),
            semester: Some("4th Semester".to_string()),
        },
        attendance: initial_attendance(),
    }
}

fn new_teacher(username: &str) -> NewAccount {
    NewAccount {
        username: username.to_string(),
        password_hash: hash_password("123").unwrap(),
        name: "Dr. Physics".to_string(),
        status: ModerationStatus::Approved,
        profile: AccountProfile::new_teacher(Some("Professor".to_string())),
        attendance: initial_attendance(),
    }
}

// --- Accounts ---

#[test]
#[ignore]
async fn test_account_lifecycle() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let username = unique("student");

    let created = repo.create_account(new_student(&username)).await.unwrap();
    assert_eq!(created.status, ModerationStatus::Pending);
    assert_eq!(created.role(), Role::Student);
    assert_eq!(created.attendance, initial_attendance());

    let credentials = repo.find_credentials(&username).await.unwrap().unwrap();
    assert!(credentials.password_hash.starts_with("$argon2"));

    let pending = repo
        .list_accounts(Role::Student, ModerationStatus::Pending)
        .await
        .unwrap();
    assert!(pending.iter().any(|a| a.id == created.id));

    assert!(repo.approve_student(created.id).await.unwrap());
    assert!(repo.approve_student(created.id).await.unwrap());

    let fetched = repo.get_account(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, ModerationStatus::Approved);
}

#[test]
#[ignore]
async fn test_duplicate_username_is_conflict() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let username = unique("dup");

    repo.create_account(new_student(&username)).await.unwrap();
    let err = repo.create_account(new_student(&username)).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[test]
#[ignore]
async fn test_approve_only_matches_students() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();

    let teacher = repo
        .create_account(new_teacher(&unique("teacher")))
        .await
        .unwrap();
    assert!(!repo.approve_student(teacher.id).await.unwrap());
    assert!(!repo.approve_student(Uuid::new_v4()).await.unwrap());
}

#[test]
#[ignore]
async fn test_teacher_profile_partial_update() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let username = unique("teacher");
    repo.create_account(new_teacher(&username)).await.unwrap();

    let updated = repo
        .update_teacher_profile(
            &username,
            TeacherProfileUpdate {
                bio: Some("Quantum optics".to_string()),
                ..TeacherProfileUpdate::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    match updated.profile {
        AccountProfile::Teacher {
            bio,
            qualifications,
            ..
        } => {
            assert_eq!(bio, "Quantum optics");
            assert_eq!(qualifications, "M.Sc, PhD");
        }
        AccountProfile::Student { .. } => panic!("teacher expected"),
    }

    // Students have no teacher profile.
    let student = unique("student");
    repo.create_account(new_student(&student)).await.unwrap();
    let none = repo
        .update_teacher_profile(
            &student,
            TeacherProfileUpdate {
                bio: Some("x".to_string()),
                ..TeacherProfileUpdate::default()
            },
        )
        .await
        .unwrap();
    assert!(none.is_none());
}

// --- Content ---

#[test]
#[ignore]
async fn test_resource_filter_and_delete() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();

    let academic = repo
        .create_resource(NewResource {
            title: unique("notes"),
            kind: "Resource".to_string(),
            semester: "4".to_string(),
            subject: "Optics".to_string(),
            topic: String::new(),
            uploader: None,
            role: None,
            file_path: "uploads/notes.pdf".to_string(),
        })
        .await
        .unwrap();

    let outsiders = repo.list_resources(false).await.unwrap();
    assert!(outsiders.iter().all(|r| r.kind != "Resource"));

    let members = repo.list_resources(true).await.unwrap();
    assert!(members.iter().any(|r| r.id == academic.id));

    assert!(repo.delete_resource(academic.id).await.unwrap());
    assert!(!repo.delete_resource(academic.id).await.unwrap());
}

#[test]
#[ignore]
async fn test_blog_approval() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();

    let blog = repo
        .create_blog(NewBlog {
            title: unique("blog"),
            content: Some("body".to_string()),
            author: Some("Rahul".to_string()),
            image_path: None,
            document_path: None,
            status: ModerationStatus::Pending,
        })
        .await
        .unwrap();

    let pending = repo.list_blogs(Visibility::Pending).await.unwrap();
    assert!(pending.iter().any(|b| b.id == blog.id));

    let approved = repo.approve_blog(blog.id).await.unwrap().unwrap();
    assert_eq!(approved.status, ModerationStatus::Approved);

    let published = repo.list_blogs(Visibility::Published).await.unwrap();
    assert!(published.iter().any(|b| b.id == blog.id));
    assert!(repo.approve_blog(Uuid::new_v4()).await.unwrap().is_none());
}

#[test]
#[ignore]
async fn test_highlight_titles_are_unique() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let title = unique("Picnics");

    let highlight = repo.create_highlight(title.clone(), None).await.unwrap();
    let err = repo.create_highlight(title.clone(), None).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let other = repo.create_highlight(unique("Fests"), None).await.unwrap();
    let err = repo.rename_highlight(other.id, title).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let renamed = repo
        .rename_highlight(highlight.id, unique("Excursions"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.id, highlight.id);
}

#[test]
#[ignore]
async fn test_event_post_array_columns() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let highlight = repo.create_highlight(unique("Trips"), None).await.unwrap();

    let post = repo
        .create_event_post(NewEventPost {
            highlight_id: highlight.id,
            title: "Trip 2024".to_string(),
            caption: None,
            image_paths: vec!["uploads/a.jpg".to_string(), "uploads/b.jpg".to_string()],
            author: None,
            role: None,
        })
        .await
        .unwrap();
    assert_eq!(post.image_paths.len(), 2);

    let edited = repo
        .update_event_post(
            post.id,
            EditEventPostRequest {
                title: None,
                caption: Some("Hills".to_string()),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(edited.title, "Trip 2024");
    assert_eq!(edited.caption.as_deref(), Some("Hills"));

    let listed = repo.list_event_posts(highlight.id).await.unwrap();
    assert_eq!(listed.len(), 1);

    assert!(repo.delete_event_post(post.id).await.unwrap());
}

#[test]
#[ignore]
async fn test_achievements_by_category() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let category = unique("academic");

    let achievement = repo
        .create_achievement(NewAchievement {
            category: category.clone(),
            students_involved: "Rahul".to_string(),
            description: "Olympiad".to_string(),
            image_paths: vec![],
            author: None,
            author_role: None,
        })
        .await
        .unwrap();
    assert!(achievement.image_paths.is_empty());

    let listed = repo.list_achievements(&category).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(repo.list_achievements(&unique("none")).await.unwrap().is_empty());
}
