use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;

use crate::{
    error::Result,
    models::{session::AuthUser, user::UserProfile},
    services::auth as auth_service,
    state::AppState,
    validation::{
        auth::{LoginRequest, RegisterRequest},
        json::ValidJson,
    },
};

/// The response payload for register and login.
#[derive(Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub token: String,
    pub user: UserProfile,
}

/// The response payload for the profile endpoint.
#[derive(Serialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

/// Handles user registration.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> Result<Response> {
    let (user, token) = auth_service::register(&state, payload).await?;

    let response = AuthResponse {
        message: "User created successfully",
        token,
        user: user.into(),
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Handles user login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<Response> {
    let (user, token) = auth_service::login(&state, payload).await?;

    let response = AuthResponse {
        message: "Login successful",
        token,
        user: user.into(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Returns the authenticated user's profile.
#[axum::debug_handler]
pub async fn profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let user = auth_service::profile(&state, auth.user_id).await?;
    Ok(Json(ProfileResponse { user: user.into() }))
}
