use crate::crypto::password::{hash_password, verify_password};
use crate::error::{AppError, Result};
use crate::models::user::User;
use crate::repositories::user as user_repo;
use crate::state::AppState;
use crate::validation::auth::{LoginRequest, RegisterRequest};
use uuid::Uuid;

/// Message shared by every failed login so callers cannot tell which accounts exist.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Creates a new user and issues their first session token.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `req` - The validated registration payload.
///
/// # Returns
///
/// A `Result` containing the created `User` and a signed token.
pub async fn register(state: &AppState, req: RegisterRequest) -> Result<(User, String)> {
    tracing::debug!("🔐 Registering user: {}", req.email);

    let password = req.password;
    let hashed_password = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))??;

    let user = user_repo::create_user(
        &state.db,
        Uuid::new_v4(),
        &req.email,
        &req.name,
        &hashed_password,
    )
    .await?
    .ok_or_else(|| AppError::invalid("email", "User already exists with this email"))?;

    let token = state.jwt.issue(user.id, &user.email)?;

    tracing::info!("✅ User created with ID: {}", user.id);
    Ok((user, token))
}

/// Authenticates a user and issues a session token.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `req` - The validated login payload.
///
/// # Returns
///
/// A `Result` containing the authenticated `User` and a signed token.
pub async fn login(state: &AppState, req: LoginRequest) -> Result<(User, String)> {
    tracing::debug!("🔐 Authenticating user: {}", req.email);

    let user = user_repo::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

    let password = req.password;
    let hash = user.password.clone();
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))??;

    if !matches {
        return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
    }

    let token = state.jwt.issue(user.id, &user.email)?;

    tracing::info!("✅ User authenticated: {}", user.id);
    Ok((user, token))
}

/// Loads the profile of an authenticated user.
pub async fn profile(state: &AppState, user_id: Uuid) -> Result<User> {
    user_repo::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))
}
