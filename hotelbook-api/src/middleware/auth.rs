use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CustomerClaims {
    #[serde(rename = "userId")]
    pub user_id: i32,
    pub exp: usize,
}

/// Identity of the caller, placed in request extensions by the middleware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i32,
}

/// Sign a token for `user_id`. Sessions are created by the sign-in flow,
/// which stores the returned token.
pub fn issue_token(
    secret: &str,
    user_id: i32,
    ttl_seconds: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = CustomerClaims {
        user_id,
        exp: (Utc::now() + Duration::seconds(ttl_seconds)).timestamp() as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
}

// ============================================================================
// Customer Authentication Middleware
// ============================================================================

pub async fn customer_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 1. Extract token from Authorization header
    let auth_header = req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::AuthenticationError("Expected a bearer token".to_string()))?;

    // 2. Decode and validate JWT
    let token_data = decode::<CustomerClaims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    ).map_err(|e| AppError::AuthenticationError(format!("Invalid token: {}", e)))?;

    // 3. Token must belong to a live session of the same user
    let session = state.sessions.find_session(token).await
        .map_err(|e| AppError::InternalServerError(format!("Session lookup failed: {}", e)))?
        .ok_or_else(|| AppError::AuthenticationError("No session for token".to_string()))?;

    if session.user_id != token_data.claims.user_id {
        tracing::warn!(session_user = session.user_id, token_user = token_data.claims.user_id, "token and session disagree");
        return Err(AppError::AuthenticationError("No session for token".to_string()));
    }

    // 4. Inject identity
    req.extensions_mut().insert(AuthenticatedUser { user_id: session.user_id });

    Ok(next.run(req).await)
}
