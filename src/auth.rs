use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::Account,
    moderation::Role,
    repository::RepositoryState,
};

/// Header carrying the caller's account id.
pub const ACTOR_HEADER: &str = "x-user-id";

/// Actor
///
/// The caller of a request, resolved from the `x-user-id` header to a stored
/// account. There are no sessions: the client remembers the account summary it
/// got from login and sends the id back.
#[derive(Debug, Clone)]
pub struct Actor {
    pub account: Account,
}

impl Actor {
    pub fn id(&self) -> Uuid {
        self.account.id
    }

    /// Only approved teachers may moderate.
    pub fn require_teacher(&self) -> AppResult<()> {
        if self.account.role() == Role::Teacher && self.account.status.is_published() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Only teachers can perform this action.".to_string(),
            ))
        }
    }
}

/// Rejects with `Unauthorized` when the header is missing, is not a UUID, or
/// names no account.
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);

        let id = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .ok_or(AppError::Unauthorized)?;

        let account = repo.get_account(id).await?.ok_or(AppError::Unauthorized)?;

        Ok(Actor { account })
    }
}

/// moderator_gate
///
/// Middleware for the moderation routes (approvals and deletes). A no-op unless
/// `enforce_moderator_role` is configured, in which case the caller must be an
/// approved teacher.
pub async fn moderator_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !state.config.enforce_moderator_role {
        return Ok(next.run(request).await);
    }

    let (mut parts, body) = request.into_parts();
    let actor = Actor::from_request_parts(&mut parts, &state).await?;
    actor.require_teacher()?;

    tracing::debug!(actor = %actor.id(), path = %parts.uri.path(), "moderator admitted");
    Ok(next.run(Request::from_parts(parts, body)).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountProfile, initial_attendance};
    use crate::moderation::ModerationStatus;
    use chrono::Utc;

    fn account(profile: AccountProfile, status: ModerationStatus) -> Actor {
        Actor {
            account: Account {
                id: Uuid::new_v4(),
                username: "someone".into(),
                name: "Someone".into(),
                status,
                profile,
                attendance: initial_attendance(),
                created_at: Utc::now(),
            },
        }
    }

    #[test]
    fn test_only_approved_teachers_moderate() {
        let teacher = account(AccountProfile::new_teacher(None), ModerationStatus::Approved);
        assert!(teacher.require_teacher().is_ok());

        let student = account(
            AccountProfile::Student {
                roll_number: Some("410012345678".into()),
                semester: None,
            },
            ModerationStatus::Approved,
        );
        assert!(matches!(
            student.require_teacher(),
            Err(AppError::Forbidden(_))
        ));

        let odd = account(AccountProfile::new_teacher(None), ModerationStatus::Pending);
        assert!(odd.require_teacher().is_err());
    }
}
