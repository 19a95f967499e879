use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type to store authenticated user ID in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Middleware that validates bearer tokens and adds the caller's identity to
/// request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Token validation failed");
        match e {
            auth::JwtError::TokenExpired => {
                ApiError::Unauthorized("Not authorized, token expired".to_string())
            }
            _ => ApiError::Unauthorized("Not authorized, token failed".to_string()),
        }
    })?;

    let user_id = claims
        .sub
        .as_deref()
        .ok_or_else(|| {
            tracing::error!("Missing 'sub' claim in token");
            ApiError::Unauthorized("Not authorized, token failed".to_string())
        })
        .and_then(|sub| {
            UserId::from_string(sub).map_err(|e| {
                tracing::error!(error = %e, "Failed to parse user ID from token");
                ApiError::Unauthorized("Not authorized, token failed".to_string())
            })
        })?;

    req.extensions_mut().insert(AuthenticatedUser { user_id });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Not authorized, no token".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Not authorized, token failed".to_string()))?;

    auth_str
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Not authorized, no token".to_string()))
}
