use chrono::Utc;
use dept_portal::{
    models::{
        Account, AccountProfile, AccountSummary, DeletionReport, EditEventPostRequest,
        RegisterRequest, Resource, initial_attendance,
    },
    moderation::{ModerationStatus, Role},
};
use serde_json::json;
use uuid::Uuid;

fn teacher() -> Account {
    Account {
        id: Uuid::new_v4(),
        username: "teacher1".to_string(),
        name: "Dr. Physics".to_string(),
        status: ModerationStatus::Approved,
        profile: AccountProfile::new_teacher(Some("Professor".to_string())),
        attendance: initial_attendance(),
        created_at: Utc::now(),
    }
}

// --- Accounts ---

#[test]
fn test_account_json_is_flat_and_camel_case() {
    let json = serde_json::to_value(teacher()).unwrap();

    assert_eq!(json["role"], "teacher");
    assert_eq!(json["status"], "approved");
    assert_eq!(json["designation"], "Professor");
    assert_eq!(json["qualifications"], "M.Sc, PhD");
    assert!(json["profilePicture"].is_null());
    assert!(json.get("createdAt").is_some());
    assert!(json.get("profile").is_none());
    assert!(json.get("rollNumber").is_none());
    assert_eq!(json["attendance"]["jan"], json!({ "attended": 0, "total": 0 }));
}

#[test]
fn test_account_json_never_carries_password() {
    let json = serde_json::to_string(&teacher()).unwrap();
    assert!(!json.to_lowercase().contains("password"));
}

#[test]
fn test_student_account_round_trips_through_role_tag() {
    let raw = json!({
        "id": Uuid::new_v4(),
        "username": "rahulsharma_5678",
        "name": "Rahul Sharma",
        "status": "pending",
        "role": "student",
        "rollNumber": "410012345678",
        "semester": "4th Semester",
        "attendance": {},
        "createdAt": Utc::now(),
    });

    let account: Account = serde_json::from_value(raw).unwrap();
    assert_eq!(account.role(), Role::Student);
    assert_eq!(account.semester(), Some("4th Semester"));
    assert!(account.awaiting_approval());

    let summary = AccountSummary::from(&account);
    assert_eq!(summary.role, Role::Student);
    assert_eq!(summary.status, ModerationStatus::Pending);
}

#[test]
fn test_unknown_status_is_rejected() {
    let raw = json!({
        "id": Uuid::new_v4(),
        "username": "x",
        "name": "x",
        "status": "archived",
        "role": "teacher",
        "designation": null,
        "qualifications": "",
        "bio": "",
        "profilePicture": null,
        "attendance": {},
        "createdAt": Utc::now(),
    });
    assert!(serde_json::from_value::<Account>(raw).is_err());
}

#[test]
fn test_register_request_accepts_partial_payload() {
    let request: RegisterRequest = serde_json::from_value(json!({
        "role": "student",
        "name": "Rahul Sharma",
        "password": "secret",
        "rollNumber": "410012345678"
    }))
    .unwrap();

    assert_eq!(request.roll_number.as_deref(), Some("410012345678"));
    assert!(request.admin_code.is_none());
    assert!(request.username.is_none());
}

// --- Content ---

#[test]
fn test_resource_kind_serializes_as_type() {
    let resource = Resource {
        id: Uuid::new_v4(),
        title: "Kalavatika 2024".to_string(),
        kind: "Kalavatika".to_string(),
        semester: String::new(),
        subject: String::new(),
        topic: String::new(),
        uploader: None,
        role: None,
        file_path: "uploads/DOC-1-abc.pdf".to_string(),
        created_at: Utc::now(),
    };

    let json = serde_json::to_value(&resource).unwrap();
    assert_eq!(json["type"], "Kalavatika");
    assert_eq!(json["filePath"], "uploads/DOC-1-abc.pdf");
    assert!(json.get("kind").is_none());
}

#[test]
fn test_edit_request_omits_absent_fields() {
    let edit = EditEventPostRequest {
        title: None,
        caption: Some("Sunny".to_string()),
    };
    assert_eq!(serde_json::to_value(&edit).unwrap(), json!({ "caption": "Sunny" }));

    let parsed: EditEventPostRequest = serde_json::from_value(json!({})).unwrap();
    assert!(parsed.title.is_none() && parsed.caption.is_none());
}

#[test]
fn test_deletion_report_shape() {
    let report = DeletionReport {
        message: "Blog deleted successfully".to_string(),
        warnings: vec![],
    };
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({ "message": "Blog deleted successfully", "warnings": [] })
    );
}
