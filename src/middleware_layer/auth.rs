use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::{
    error::{AppError, Result},
    state::AppState,
};

/// Extracts the bearer token from the `Authorization` header.
///
/// # Arguments
///
/// * `headers` - The request headers.
///
/// # Returns
///
/// An `Option` containing the token if one was sent.
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// A middleware that requires a valid session token.
///
/// On success the verified `AuthUser` is inserted into the request extensions.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let token = extract_bearer_token(request.headers()).ok_or_else(|| {
        AppError::Authentication("No token, authorization denied".to_string())
    })?;

    let user = state.jwt.verify(token)?;
    tracing::debug!("✅ User authenticated: {} ({})", user.user_id, user.email);

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
