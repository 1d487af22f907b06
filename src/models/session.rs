use uuid::Uuid;

/// The identity proven by a verified session token.
///
/// Inserted into request extensions by the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The ID of the authenticated user.
    pub user_id: Uuid,
    /// The email the token was issued for.
    pub email: String,
}
