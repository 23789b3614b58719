use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, Uri},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;

use crate::auth::{validate_jwt, Claims, SESSION_COOKIE};
use crate::database::RepositoryError;
use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated user for the current request. Handlers receive it
/// through `Extension<AuthUser>` and pass it on explicitly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Gate for protected routes: a valid session naming an existing user, or a
/// redirect to the login page that comes back to the requested path.
pub async fn require_login(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let token = match extract_session_token(request.headers()) {
        Some(token) => token,
        None => {
            tracing::debug!("No session for {}, redirecting to login", request.uri().path());
            return login_redirect(request.uri()).into_response();
        }
    };

    let claims = match validate_jwt(&token, &state.config.security) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!("Rejected session token: {}", e);
            return login_redirect(request.uri()).into_response();
        }
    };

    // The token may outlive the account it names
    match state.store.get_user(claims.user_id).await {
        Ok(user) if user.username == claims.username => {}
        Ok(_) | Err(RepositoryError::NotFound(_)) => {
            tracing::warn!("Session names unknown user '{}' (ID: {})", claims.username, claims.user_id);
            return login_redirect(request.uri()).into_response();
        }
        Err(e) => return ApiError::from(e).into_response(),
    }

    let auth_user = AuthUser::from(claims);
    tracing::debug!("Authenticated {} ({})", auth_user.username, auth_user.id);
    request.extensions_mut().insert(auth_user);

    next.run(request).await
}

/// Session token from the `session` cookie, falling back to a Bearer token
fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    })
}

pub fn login_redirect(uri: &Uri) -> Redirect {
    let next = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let encoded: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
    Redirect::to(&format!("/login/?next={}", encoded))
}

/// Only local absolute paths are followed after login
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
}
