// handlers/public/accounts.rs - signup, login and logout
//
// A successful signup or login issues a JWT and stores it in the session
// cookie; require_login reads it back on every protected request.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{clear_session_cookie, generate_jwt, session_cookie, Claims};
use crate::database::models::User;
use crate::error::ApiError;
use crate::forms::{FieldErrors, LoginForm, SignupForm};
use crate::middleware::{safe_next, FormPage};
use crate::services::ServiceError;
use crate::state::AppState;

const AFTER_LOGIN: &str = "/cats/";

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// GET /signup/
pub async fn signup_form() -> FormPage {
    FormPage::new::<SignupForm>("/signup/", json!({}))
}

/// POST /signup/ - create the account and log it in straight away
pub async fn signup(State(state): State<AppState>, Form(form): Form<SignupForm>) -> Result<Response, ApiError> {
    match state.accounts().signup(&form).await {
        Ok(user) => start_session(&state, &user, AFTER_LOGIN),
        Err(ServiceError::Validation(errors)) => Ok(FormPage::invalid("/signup/", &form, errors).into_response()),
        Err(e) => Err(e.into()),
    }
}

/// GET /login/?next=/cats/3/
pub async fn login_form(Query(query): Query<NextQuery>) -> FormPage {
    let next = safe_next(query.next.as_deref()).unwrap_or(AFTER_LOGIN);
    FormPage::new::<LoginForm>("/login/", json!({ "next": next }))
}

/// POST /login/
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Result<Response, ApiError> {
    match state.accounts().login(&form).await {
        Ok(user) => {
            let next = safe_next(form.next.as_deref()).unwrap_or(AFTER_LOGIN);
            start_session(&state, &user, next)
        }
        Err(ServiceError::Validation(errors)) => Ok(FormPage::invalid("/login/", &form, errors).into_response()),
        Err(ServiceError::InvalidCredentials) => {
            let mut errors = FieldErrors::new();
            errors.insert(
                "__all__".to_string(),
                "Please enter a correct username and password.".to_string(),
            );
            Ok(FormPage::invalid("/login/", &form, errors).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /logout/
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_session_cookie(&state.config.security))],
        Redirect::to("/"),
    )
}

fn start_session(state: &AppState, user: &User, next: &str) -> Result<Response, ApiError> {
    let security = &state.config.security;
    let claims = Claims::new(user.id, user.username.clone(), security);
    let token = generate_jwt(&claims, security)?;

    Ok((
        [(header::SET_COOKIE, session_cookie(&token, security))],
        Redirect::to(next),
    )
        .into_response())
}
