use axum::{
    extract::{Path, State},
    response::{Redirect, Response},
    Extension, Form,
};
use serde::Serialize;
use serde_json::json;

use crate::database::models::{Cat, Toy};
use crate::error::ApiError;
use crate::forms::{CatForm, CatUpdateForm, FeedingForm};
use crate::handlers::{cat_url, redirect_or_form};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, FormPage};
use crate::services::CatDetail;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CatIndex {
    pub cats: Vec<Cat>,
}

#[derive(Debug, Serialize)]
pub struct CatDetailPage {
    #[serde(flatten)]
    pub detail: CatDetail,
    pub feeding_form: FormPage,
}

#[derive(Debug, Serialize)]
pub struct AvailableToys {
    pub cat_id: i64,
    pub toys: Vec<Toy>,
}

/// Confirmation page shown before a delete
#[derive(Debug, Serialize)]
pub struct ConfirmDelete<T: Serialize> {
    pub object: T,
    pub action: String,
    pub cancel: String,
}

/// GET /cats/ - the current user's cats
pub async fn cat_index(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<CatIndex> {
    let cats = state.cats().list_for_user(&user).await?;
    Ok(ApiResponse::success(CatIndex { cats }))
}

/// GET /cats/:cat_id/ - cat, feedings, feeding form, toys and toys to add
pub async fn cat_detail(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(cat_id): Path<i64>,
) -> ApiResult<CatDetailPage> {
    let detail = state.cats().detail(&user, cat_id).await?;
    let feeding_form = FormPage::new::<FeedingForm>(format!("/cats/{}/add-feeding/", cat_id), json!({}));
    Ok(ApiResponse::success(CatDetailPage { detail, feeding_form }))
}

/// GET /cats/:cat_id/toys/available/ - toys the cat does not have yet
pub async fn cat_available_toys(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(cat_id): Path<i64>,
) -> ApiResult<AvailableToys> {
    let toys = state.cats().toys_not_on_cat(&user, cat_id).await?;
    Ok(ApiResponse::success(AvailableToys { cat_id, toys }))
}

/// GET /cats/create/
pub async fn cat_create_form() -> FormPage {
    FormPage::new::<CatForm>("/cats/create/", json!({}))
}

/// POST /cats/create/ - owner is always the current user
pub async fn cat_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Form(form): Form<CatForm>,
) -> Result<Response, ApiError> {
    let result = state.cats().create(&user, &form).await;
    redirect_or_form(
        result,
        |cat| cat_url(cat.id),
        |errors| FormPage::invalid("/cats/create/", &form, errors),
    )
}

/// GET /cats/:cat_id/update/ - prefilled with the current values
pub async fn cat_update_form(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(cat_id): Path<i64>,
) -> Result<FormPage, ApiError> {
    let cat = state.cats().get(&user, cat_id).await?;
    let values = json!({
        "breed": cat.breed,
        "description": cat.description,
        "age": cat.age.to_string(),
    });
    Ok(FormPage::new::<CatUpdateForm>(format!("/cats/{}/update/", cat_id), values).with_object(&cat))
}

/// POST /cats/:cat_id/update/ - breed, description and age only
pub async fn cat_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(cat_id): Path<i64>,
    Form(form): Form<CatUpdateForm>,
) -> Result<Response, ApiError> {
    let current = state.cats().get(&user, cat_id).await?;
    let result = state.cats().update(&user, cat_id, &form).await;
    redirect_or_form(
        result,
        |cat| cat_url(cat.id),
        |errors| FormPage::invalid(format!("/cats/{}/update/", cat_id), &form, errors).with_object(&current),
    )
}

/// GET /cats/:cat_id/delete/
pub async fn cat_delete_confirm(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(cat_id): Path<i64>,
) -> ApiResult<ConfirmDelete<Cat>> {
    let cat = state.cats().get(&user, cat_id).await?;
    Ok(ApiResponse::success(ConfirmDelete {
        object: cat,
        action: format!("/cats/{}/delete/", cat_id),
        cancel: cat_url(cat_id),
    }))
}

/// POST /cats/:cat_id/delete/ - back to the cat list
pub async fn cat_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(cat_id): Path<i64>,
) -> Result<Redirect, ApiError> {
    state.cats().delete(&user, cat_id).await?;
    Ok(Redirect::to("/cats/"))
}

/// POST /cats/:cat_id/add-feeding/ - the cat comes from the path, never the form
pub async fn add_feeding(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(cat_id): Path<i64>,
    Form(form): Form<FeedingForm>,
) -> Result<Response, ApiError> {
    let result = state.cats().add_feeding(&user, cat_id, &form).await;
    redirect_or_form(
        result,
        |feeding| cat_url(feeding.cat_id),
        |errors| FormPage::invalid(format!("/cats/{}/add-feeding/", cat_id), &form, errors),
    )
}

/// POST /cats/:cat_id/associate-toy/:toy_id/
pub async fn associate_toy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((cat_id, toy_id)): Path<(i64, i64)>,
) -> Result<Redirect, ApiError> {
    state.cats().associate_toy(&user, cat_id, toy_id).await?;
    Ok(Redirect::to(&cat_url(cat_id)))
}

/// POST /cats/:cat_id/remove-toy/:toy_id/
pub async fn remove_toy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((cat_id, toy_id)): Path<(i64, i64)>,
) -> Result<Redirect, ApiError> {
    state.cats().disassociate_toy(&user, cat_id, toy_id).await?;
    Ok(Redirect::to(&cat_url(cat_id)))
}
