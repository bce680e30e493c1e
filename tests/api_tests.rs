use dept_portal::{
    AppConfig, AppState, MemoryRepository, MockStorageService, create_router,
    models::{AccountSummary, EventHighlight, RegisterResponse},
    moderation::{ModerationStatus, Role},
    repository::RepositoryState,
    storage::StorageState,
};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use uuid::Uuid;

#[derive(Debug)]
pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    async fn register(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/register"))
            .json(&body)
            .send()
            .await
            .expect("req fail")
    }

    async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("req fail")
    }
}

async fn spawn_app(config: AppConfig) -> TestApp {
    let repo = Arc::new(MemoryRepository::new()) as RepositoryState;
    let storage = Arc::new(MockStorageService::new()) as StorageState;

    let state = AppState {
        repo,
        storage,
        config,
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp {
        address,
        client: reqwest::Client::new(),
    }
}

fn gated_config() -> AppConfig {
    AppConfig {
        enforce_moderator_role: true,
        ..AppConfig::default()
    }
}

fn teacher_body() -> serde_json::Value {
    json!({
        "role": "teacher",
        "name": "Dr. Physics",
        "username": "drphysics",
        "password": "123",
        "designation": "Professor",
        "adminCode": "PHYSICA2026"
    })
}

fn student_body() -> serde_json::Value {
    json!({
        "role": "student",
        "name": "Rahul Sharma",
        "password": "secret",
        "rollNumber": "410012345678",
        "semester": "4th Semester"
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app(AppConfig::default()).await;
    let response = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .expect("req fail");

    assert!(response.status().is_success());
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = spawn_app(AppConfig::default()).await;
    let response = app
        .client
        .get(app.url("/api-docs/openapi.json"))
        .send()
        .await
        .expect("req fail");

    assert_eq!(response.status(), 200);
    let doc: serde_json::Value = response.json().await.unwrap();
    assert!(doc["paths"]["/api/register"].is_object());
}

#[tokio::test]
async fn test_registration_and_approval_flow() {
    let app = spawn_app(AppConfig::default()).await;

    let response = app.register(student_body()).await;
    assert_eq!(response.status(), 201);
    let registered: RegisterResponse = response.json().await.unwrap();
    assert_eq!(registered.username, "rahulsharma_5678");
    assert_eq!(
        registered.message,
        "Account Created. Waiting for Teacher Approval."
    );

    let refused = app.login("rahulsharma_5678", "secret").await;
    assert_eq!(refused.status(), 403);

    let pending: Vec<serde_json::Value> = app
        .client
        .get(app.url("/api/students/pending"))
        .send()
        .await
        .expect("req fail")
        .json()
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["role"], "student");
    assert_eq!(pending[0]["rollNumber"], "410012345678");
    assert!(pending[0].get("passwordHash").is_none());

    let id = pending[0]["id"].as_str().unwrap();
    let approved = app
        .client
        .put(app.url(&format!("/api/students/approve/{id}")))
        .send()
        .await
        .expect("req fail");
    assert_eq!(approved.status(), 200);

    let response = app.login("rahulsharma_5678", "secret").await;
    assert_eq!(response.status(), 200);
    let summary: AccountSummary = response.json().await.unwrap();
    assert_eq!(summary.role, Role::Student);
    assert_eq!(summary.status, ModerationStatus::Approved);
}

#[tokio::test]
async fn test_bad_registrations_are_rejected() {
    let app = spawn_app(AppConfig::default()).await;

    let mut wrong_code = teacher_body();
    wrong_code["adminCode"] = json!("letmein");
    assert_eq!(app.register(wrong_code).await.status(), 403);

    let mut short_roll = student_body();
    short_roll["rollNumber"] = json!("1234");
    let response = app.register(short_roll).await;
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Roll Number must be 12 digits.");

    assert_eq!(app.register(teacher_body()).await.status(), 201);
    assert_eq!(app.register(teacher_body()).await.status(), 409);
}

#[tokio::test]
async fn test_wrong_password_message() {
    let app = spawn_app(AppConfig::default()).await;
    app.register(teacher_body()).await;

    let response = app.login("drphysics", "wrong").await;
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid Username or Password");
}

#[tokio::test]
async fn test_highlight_json_routes() {
    let app = spawn_app(AppConfig::default()).await;

    let created = app
        .client
        .post(app.url("/api/events/highlight"))
        .json(&json!({ "title": "Picnics", "author": "Dr. Physics", "role": "teacher" }))
        .send()
        .await
        .expect("req fail");
    assert_eq!(created.status(), 201);
    let highlight: EventHighlight = created.json().await.unwrap();

    let renamed = app
        .client
        .put(app.url(&format!("/api/events/highlight/{}", highlight.id)))
        .json(&json!({ "title": "Excursions" }))
        .send()
        .await
        .expect("req fail");
    assert_eq!(renamed.status(), 200);

    let listed: Vec<EventHighlight> = app
        .client
        .get(app.url("/api/events/highlights"))
        .send()
        .await
        .expect("req fail")
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Excursions");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = spawn_app(AppConfig::default()).await;
    let response = app
        .client
        .get(app.url("/api/does-not-exist"))
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), 404);
}

// --- Moderator Gate ---

#[tokio::test]
async fn test_moderation_open_when_gate_disabled() {
    let app = spawn_app(AppConfig::default()).await;
    let response = app
        .client
        .delete(app.url(&format!("/api/blogs/{}", Uuid::new_v4())))
        .send()
        .await
        .expect("req fail");

    // Reaches the handler: the blog simply does not exist.
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_moderator_gate_requires_approved_teacher() {
    let app = spawn_app(gated_config()).await;
    let target = app.url(&format!("/api/notices/{}", Uuid::new_v4()));

    // No caller.
    let response = app.client.delete(&target).send().await.expect("req fail");
    assert_eq!(response.status(), 401);

    // Unknown caller.
    let response = app
        .client
        .delete(&target)
        .header("x-user-id", Uuid::new_v4().to_string())
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), 401);

    // A student, once approved, still may not moderate.
    app.register(student_body()).await;
    let pending: Vec<serde_json::Value> = app
        .client
        .get(app.url("/api/students/pending"))
        .send()
        .await
        .expect("req fail")
        .json()
        .await
        .unwrap();
    let student_id = pending[0]["id"].as_str().unwrap().to_string();

    let response = app
        .client
        .put(app.url(&format!("/api/students/approve/{student_id}")))
        .header("x-user-id", &student_id)
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), 403);

    // A teacher passes the gate and reaches the handler.
    app.register(teacher_body()).await;
    let teacher: AccountSummary = app.login("drphysics", "123").await.json().await.unwrap();

    let response = app
        .client
        .put(app.url(&format!("/api/students/approve/{student_id}")))
        .header("x-user-id", teacher.id.to_string())
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), 200);

    let response = app
        .client
        .delete(&target)
        .header("x-user-id", teacher.id.to_string())
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), 404);

    let response = app
        .client
        .delete(&target)
        .header("x-user-id", &student_id)
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), 403);
}
