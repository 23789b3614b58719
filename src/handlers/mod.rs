// handlers/mod.rs - two security tiers
//
// Public (no session) -> Protected (session required, see middleware::require_login)
pub mod protected;
pub mod public;

use axum::response::{IntoResponse, Redirect, Response};

use crate::error::ApiError;
use crate::forms::FieldErrors;
use crate::middleware::FormPage;
use crate::services::{ServiceError, ServiceResult};

/// Finish a form POST: redirect on success, re-render the form on a
/// validation failure, and report anything else as an API error.
pub(crate) fn redirect_or_form<T>(
    result: ServiceResult<T>,
    success_url: impl FnOnce(&T) -> String,
    invalid_form: impl FnOnce(FieldErrors) -> FormPage,
) -> Result<Response, ApiError> {
    match result {
        Ok(value) => Ok(Redirect::to(&success_url(&value)).into_response()),
        Err(ServiceError::Validation(errors)) => Ok(invalid_form(errors).into_response()),
        Err(other) => Err(other.into()),
    }
}

pub(crate) fn cat_url(cat_id: i64) -> String {
    format!("/cats/{}/", cat_id)
}

pub(crate) fn toy_url(toy_id: i64) -> String {
    format!("/toys/{}/", toy_id)
}
