//! Creates the two demo accounts used for local development.
//!
//! `teacher1` (approved) and `student1` (pending), both with password `123`.
//! Existing usernames are left untouched, so running it twice is harmless.

use anyhow::Context;
use dept_portal::{
    AppError,
    config::AppConfig,
    identity::hash_password,
    models::{AccountProfile, AttendanceCount, NewAccount, initial_attendance},
    moderation::ModerationStatus,
    repository::{PostgresRepository, Repository},
};
use sqlx::postgres::PgPoolOptions;

const DEMO_PASSWORD: &str = "123";

fn demo_accounts() -> anyhow::Result<Vec<NewAccount>> {
    let password_hash = hash_password(DEMO_PASSWORD)?;

    let mut student_attendance = initial_attendance();
    student_attendance.insert("jan".into(), AttendanceCount { attended: 20, total: 25 });
    student_attendance.insert("feb".into(), AttendanceCount { attended: 18, total: 24 });

    Ok(vec![
        NewAccount {
            username: "teacher1".to_string(),
            password_hash: password_hash.clone(),
            name: "Dr. Physics".to_string(),
            status: ModerationStatus::Approved,
            profile: AccountProfile::new_teacher(Some("Professor".to_string())),
            attendance: initial_attendance(),
        },
        NewAccount {
            username: "student1".to_string(),
            password_hash,
            name: "Rahul Sharma".to_string(),
            status: ModerationStatus::Pending,
            profile: AccountProfile::Student {
                roll_number: None,
                semester: Some("4th Semester".to_string()),
            },
            attendance: student_attendance,
        },
    ])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let config = AppConfig::load();
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.db_url)
        .await
        .context("failed to connect to Postgres, check DATABASE_URL")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run database migrations")?;

    let repo = PostgresRepository::new(pool);

    for account in demo_accounts()? {
        let username = account.username.clone();
        match repo.create_account(account).await {
            Ok(created) => {
                tracing::info!(username = %created.username, status = created.status.as_str(), "demo account created")
            }
            Err(AppError::Conflict(_)) => {
                tracing::info!(username = %username, "demo account already exists, skipped")
            }
            Err(e) => {
                return Err(anyhow::Error::from(e).context(format!("failed to create {username}")));
            }
        }
    }

    Ok(())
}
