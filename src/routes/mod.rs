/// Router Module Index
///
/// Routes are grouped by who is expected to call them. All three groups are
/// nested under `/api` by `create_router`.

/// Reads, registration and login. Open to everyone.
pub mod public;

/// Posting and editing content.
pub mod members;

/// Approvals and deletes. Behind `moderator_gate`.
pub mod moderation;
