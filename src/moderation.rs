//! Moderation state shared by accounts and blog posts.
//!
//! The machine is deliberately tiny: `Pending -> Approved` is the only
//! transition, it is one-way and approving twice is harmless.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// ModerationStatus
///
/// A closed set. Values read back from storage that are neither `pending` nor
/// `approved` are rejected instead of being treated as published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ModerationStatus {
    Pending,
    Approved,
}

impl ModerationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
        }
    }

    pub fn parse(raw: &str) -> AppResult<Self> {
        match raw {
            "pending" => Ok(ModerationStatus::Pending),
            "approved" => Ok(ModerationStatus::Approved),
            other => Err(AppError::Internal(anyhow::anyhow!(
                "unrecognized moderation status {other:?}"
            ))),
        }
    }

    /// Initial state of a freshly posted item: student authors wait for a
    /// teacher, every other author is published immediately.
    pub fn initial_for(author_role: Option<Role>) -> Self {
        match author_role {
            Some(Role::Student) => ModerationStatus::Pending,
            _ => ModerationStatus::Approved,
        }
    }

    /// The single transition. Idempotent.
    pub fn approve(self) -> Self {
        ModerationStatus::Approved
    }

    pub fn is_published(self) -> bool {
        self == ModerationStatus::Approved
    }
}

/// Role
///
/// The two account roles. Parsing is case-insensitive and ignores surrounding
/// whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Teacher,
    Student,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "teacher" => Some(Role::Teacher),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

/// Which slice of a moderated collection a listing wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Published,
    Pending,
}

impl Visibility {
    pub fn status(self) -> ModerationStatus {
        match self {
            Visibility::Published => ModerationStatus::Approved,
            Visibility::Pending => ModerationStatus::Pending,
        }
    }

    pub fn admits(self, status: ModerationStatus) -> bool {
        self.status() == status
    }
}
