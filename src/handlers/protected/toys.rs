use axum::{
    extract::{Path, State},
    response::{Redirect, Response},
    Extension, Form,
};
use serde::Serialize;
use serde_json::json;

use crate::database::models::Toy;
use crate::error::ApiError;
use crate::forms::ToyForm;
use crate::handlers::{redirect_or_form, toy_url};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, FormPage};
use crate::services::ToyDetail;
use crate::state::AppState;

use super::cats::ConfirmDelete;

#[derive(Debug, Serialize)]
pub struct ToyIndex {
    pub toys: Vec<Toy>,
}

/// GET /toys/
pub async fn toy_index(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<ToyIndex> {
    let toys = state.toys().list(&user).await?;
    Ok(ApiResponse::success(ToyIndex { toys }))
}

/// GET /toys/:toy_id/
pub async fn toy_detail(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(toy_id): Path<i64>,
) -> ApiResult<ToyDetail> {
    let detail = state.toys().detail(&user, toy_id).await?;
    Ok(ApiResponse::success(detail))
}

/// GET /toys/create/
pub async fn toy_create_form() -> FormPage {
    FormPage::new::<ToyForm>("/toys/create/", json!({}))
}

/// POST /toys/create/
pub async fn toy_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Form(form): Form<ToyForm>,
) -> Result<Response, ApiError> {
    let result = state.toys().create(&user, &form).await;
    redirect_or_form(
        result,
        |toy| toy_url(toy.id),
        |errors| FormPage::invalid("/toys/create/", &form, errors),
    )
}

/// GET /toys/:toy_id/update/
pub async fn toy_update_form(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(toy_id): Path<i64>,
) -> Result<FormPage, ApiError> {
    let toy = state.toys().get(&user, toy_id).await?;
    let values = json!({ "name": toy.name, "color": toy.color });
    Ok(FormPage::new::<ToyForm>(format!("/toys/{}/update/", toy_id), values).with_object(&toy))
}

/// POST /toys/:toy_id/update/
pub async fn toy_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(toy_id): Path<i64>,
    Form(form): Form<ToyForm>,
) -> Result<Response, ApiError> {
    let current = state.toys().get(&user, toy_id).await?;
    let result = state.toys().update(&user, toy_id, &form).await;
    redirect_or_form(
        result,
        |toy| toy_url(toy.id),
        |errors| FormPage::invalid(format!("/toys/{}/update/", toy_id), &form, errors).with_object(&current),
    )
}

/// GET /toys/:toy_id/delete/
pub async fn toy_delete_confirm(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(toy_id): Path<i64>,
) -> ApiResult<ConfirmDelete<Toy>> {
    let toy = state.toys().get(&user, toy_id).await?;
    Ok(ApiResponse::success(ConfirmDelete {
        object: toy,
        action: format!("/toys/{}/delete/", toy_id),
        cancel: toy_url(toy_id),
    }))
}

/// POST /toys/:toy_id/delete/
pub async fn toy_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(toy_id): Path<i64>,
) -> Result<Redirect, ApiError> {
    state.toys().delete(&user, toy_id).await?;
    Ok(Redirect::to("/toys/"))
}
