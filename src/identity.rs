//! Account registration and login rules.
//!
//! Everything here is pure apart from password hashing, so the handlers stay a
//! thin layer of extraction, a repository call and a response.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::{
    error::{AppError, AppResult},
    models::{
        AccountProfile, AccountSummary, NewAccount, RegisterRequest, StoredCredentials,
        initial_attendance,
    },
    moderation::{ModerationStatus, Role},
};

/// Roll numbers are exactly this many characters long.
pub const ROLL_NUMBER_LEN: usize = 12;

/// Number of trailing roll-number characters used in a student username.
const USERNAME_SUFFIX_LEN: usize = 4;

pub const PENDING_APPROVAL_MESSAGE: &str =
    "Access Denied: Your account is waiting for Teacher Approval.";

/// Builds the account to insert for a registration request.
///
/// Teachers must present the configured code and are approved at once.
/// Students must present a 12 character roll number, get a derived username
/// and always start pending.
pub fn plan_registration(req: RegisterRequest, teacher_code: &str) -> AppResult<NewAccount> {
    let role = Role::parse(&req.role)
        .ok_or_else(|| AppError::InvalidInput("Role must be teacher or student.".to_string()))?;

    let (username, name, status, profile) = match role {
        Role::Teacher => {
            if req.admin_code.as_deref() != Some(teacher_code) {
                return Err(AppError::Forbidden("Invalid Teacher Code".to_string()));
            }
            let username = non_blank(req.username)
                .ok_or_else(|| AppError::InvalidInput("Username is required.".to_string()))?;
            let name = non_blank(req.name).unwrap_or_else(|| username.clone());
            (
                username,
                name,
                ModerationStatus::Approved,
                AccountProfile::new_teacher(non_blank(req.designation)),
            )
        }
        Role::Student => {
            let roll_number = req
                .roll_number
                .filter(|roll| roll.chars().count() == ROLL_NUMBER_LEN)
                .ok_or_else(|| {
                    AppError::InvalidInput("Roll Number must be 12 digits.".to_string())
                })?;
            let name = non_blank(req.name)
                .ok_or_else(|| AppError::InvalidInput("Name is required.".to_string()))?;
            let username = derive_student_username(&name, &roll_number);
            (
                username,
                name,
                ModerationStatus::Pending,
                AccountProfile::Student {
                    roll_number: Some(roll_number),
                    semester: non_blank(req.semester),
                },
            )
        }
    };

    if req.password.is_empty() {
        return Err(AppError::InvalidInput("Password is required.".to_string()));
    }
    let password_hash = hash_password(&req.password)?;

    Ok(NewAccount {
        username,
        password_hash,
        name,
        status,
        profile,
        attendance: initial_attendance(),
    })
}

/// `"Rahul Sharma"` + `"410012345678"` becomes `"rahulsharma_5678"`.
pub fn derive_student_username(name: &str, roll_number: &str) -> String {
    let compact: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    let chars: Vec<char> = roll_number.chars().collect();
    let suffix: String = chars[chars.len().saturating_sub(USERNAME_SUFFIX_LEN)..]
        .iter()
        .collect();

    format!("{compact}_{suffix}")
}

/// Checks a login attempt against the stored credentials.
///
/// A pending student is turned away before the password is looked at, so the
/// response does not reveal whether the password was right.
pub fn authenticate(
    credentials: Option<StoredCredentials>,
    password: &str,
) -> AppResult<AccountSummary> {
    let Some(credentials) = credentials else {
        return Err(AppError::InvalidCredentials);
    };

    if credentials.account.awaiting_approval() {
        return Err(AppError::Forbidden(PENDING_APPROVAL_MESSAGE.to_string()));
    }

    if !verify_password(&credentials.password_hash, password) {
        return Err(AppError::InvalidCredentials);
    }

    Ok(AccountSummary::from(&credentials.account))
}

/// Hash a password using Argon2id with a fresh random salt.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash string.
pub fn verify_password(hash: &str, password: &str) -> bool {
    if hash.is_empty() {
        return false;
    }

    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Account;
    use chrono::Utc;
    use uuid::Uuid;

    const CODE: &str = "PHYSICA2026";

    fn student_request(name: &str, roll: &str) -> RegisterRequest {
        RegisterRequest {
            role: "student".to_string(),
            name: Some(name.to_string()),
            password: "secret".to_string(),
            roll_number: Some(roll.to_string()),
            semester: Some("4th Semester".to_string()),
            ..RegisterRequest::default()
        }
    }

    fn credentials_for(plan: NewAccount) -> StoredCredentials {
        StoredCredentials {
            account: Account {
                id: Uuid::new_v4(),
                username: plan.username,
                name: plan.name,
                status: plan.status,
                profile: plan.profile,
                attendance: plan.attendance,
                created_at: Utc::now(),
            },
            password_hash: plan.password_hash,
        }
    }

    #[test]
    fn test_derive_student_username() {
        assert_eq!(
            derive_student_username("Rahul Sharma", "410012345678"),
            "rahulsharma_5678"
        );
        assert_eq!(
            derive_student_username("  Ana\tMaria  Lopez ", "000000009876"),
            "anamarialopez_9876"
        );
    }

    #[test]
    fn test_student_registration_is_pending() {
        let plan = plan_registration(student_request("Rahul Sharma", "410012345678"), CODE)
            .unwrap();

        assert_eq!(plan.username, "rahulsharma_5678");
        assert_eq!(plan.status, ModerationStatus::Pending);
        assert_eq!(plan.profile.role(), Role::Student);
        assert_ne!(plan.password_hash, "secret");
        assert!(plan.attendance.contains_key("jan"));
    }

    #[test]
    fn test_student_roll_number_length_enforced() {
        for roll in ["", "12345", "4100123456789"] {
            let err = plan_registration(student_request("Rahul", roll), CODE).unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)), "roll {roll:?}");
        }

        let mut missing = student_request("Rahul", "410012345678");
        missing.roll_number = None;
        assert!(matches!(
            plan_registration(missing, CODE),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_student_cannot_self_approve_with_admin_code() {
        let mut req = student_request("Rahul Sharma", "410012345678");
        req.admin_code = Some(CODE.to_string());
        let plan = plan_registration(req, CODE).unwrap();
        assert_eq!(plan.status, ModerationStatus::Pending);
    }

    #[test]
    fn test_teacher_registration_requires_code() {
        let req = RegisterRequest {
            role: "Teacher".to_string(),
            name: Some("Dr. Physics".to_string()),
            username: Some("drphysics".to_string()),
            password: "123".to_string(),
            admin_code: Some("wrong".to_string()),
            ..RegisterRequest::default()
        };
        assert!(matches!(
            plan_registration(req.clone(), CODE),
            Err(AppError::Forbidden(_))
        ));

        let ok = RegisterRequest {
            admin_code: Some(CODE.to_string()),
            ..req
        };
        let plan = plan_registration(ok, CODE).unwrap();
        assert_eq!(plan.status, ModerationStatus::Approved);
        assert_eq!(plan.username, "drphysics");
        assert_eq!(plan.profile.role(), Role::Teacher);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let req = RegisterRequest {
            role: "admin".to_string(),
            password: "x".to_string(),
            ..RegisterRequest::default()
        };
        assert!(matches!(
            plan_registration(req, CODE),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_password_hashing() {
        let hash = hash_password("test_password_123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "test_password_123"));
        assert!(!verify_password(&hash, "wrong"));
        assert!(!verify_password("", "test_password_123"));

        // Salted: the same password hashes differently each time.
        assert_ne!(hash, hash_password("test_password_123").unwrap());
    }

    #[test]
    fn test_pending_student_rejected_before_password_check() {
        let creds =
            credentials_for(plan_registration(student_request("Rahul", "410012345678"), CODE).unwrap());

        let right = authenticate(Some(creds.clone()), "secret").unwrap_err();
        let wrong = authenticate(Some(creds), "not-it").unwrap_err();

        assert!(matches!(right, AppError::Forbidden(_)));
        assert!(matches!(wrong, AppError::Forbidden(_)));
    }

    #[test]
    fn test_unknown_user_and_wrong_password_look_alike() {
        let mut plan = plan_registration(student_request("Rahul", "410012345678"), CODE).unwrap();
        plan.status = ModerationStatus::Approved;
        let creds = credentials_for(plan);

        let missing = authenticate(None, "secret").unwrap_err();
        let wrong = authenticate(Some(creds.clone()), "nope").unwrap_err();
        assert_eq!(missing.to_string(), wrong.to_string());

        let summary = authenticate(Some(creds), "secret").unwrap();
        assert_eq!(summary.role, Role::Student);
        assert_eq!(summary.semester.as_deref(), Some("4th Semester"));
    }
}
