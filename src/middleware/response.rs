use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::forms::{FieldErrors, Validate};

/// Wrapper for view models that automatically adds the success envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: None, // Default to 200 OK
        }
    }

    /// Create an API response with custom status code
    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self {
            data,
            status_code: Some(status_code),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        // Convert data to JSON Value for consistent envelope format
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Failed to serialize response data"
                    })),
                )
                    .into_response();
            }
        };

        let envelope = json!({
            "success": status.is_success(),
            "data": data_value
        });

        (status, Json(envelope)).into_response()
    }
}

// Convenience type alias
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

/// View model for an input form: what to show on GET, and what to show again
/// (submitted values plus per-field errors) when a POST fails validation.
#[derive(Debug, Serialize)]
pub struct FormPage {
    pub form: &'static str,
    pub action: String,
    pub values: Value,
    pub choices: BTreeMap<&'static str, Vec<&'static str>>,
    pub errors: FieldErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<Value>,
}

impl FormPage {
    /// Unbound form; `values` holds initial data (empty for create forms)
    pub fn new<F: Validate>(action: impl Into<String>, values: Value) -> Self {
        Self {
            form: F::NAME,
            action: action.into(),
            values,
            choices: F::choices().into_iter().collect(),
            errors: FieldErrors::new(),
            object: None,
        }
    }

    /// Form re-rendered with what the user submitted and what was wrong with it
    pub fn invalid<F: Validate + Serialize>(action: impl Into<String>, submitted: &F, errors: FieldErrors) -> Self {
        let values = serde_json::to_value(submitted).unwrap_or(Value::Null);
        Self {
            errors,
            ..Self::new::<F>(action, values)
        }
    }

    /// The record the form acts on (update and delete pages)
    pub fn with_object<T: Serialize>(mut self, object: &T) -> Self {
        self.object = serde_json::to_value(object).ok();
        self
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl IntoResponse for FormPage {
    fn into_response(self) -> Response {
        let status = if self.is_valid() {
            StatusCode::OK
        } else {
            StatusCode::BAD_REQUEST
        };
        ApiResponse::with_status(self, status).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{CatForm, FeedingForm};

    #[test]
    fn blank_form_lists_choices() {
        let page = FormPage::new::<FeedingForm>("/cats/1/add-feeding/", json!({}));
        assert_eq!(page.form, "feeding_form");
        assert_eq!(page.choices["meal"], vec!["breakfast", "lunch", "dinner"]);
        assert!(page.is_valid());
        assert_eq!(page.into_response().status(), StatusCode::OK);
    }

    #[test]
    fn invalid_form_keeps_submission_and_errors() {
        let submitted = CatForm {
            name: Some("Tom".into()),
            age: Some("old".into()),
            ..Default::default()
        };
        let mut errors = FieldErrors::new();
        errors.insert("age".into(), "Enter a whole number.".into());

        let page = FormPage::invalid("/cats/create/", &submitted, errors);
        assert_eq!(page.values["name"], "Tom");
        assert_eq!(page.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
