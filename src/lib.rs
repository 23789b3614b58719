pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::require_login;
use crate::state::AppState;

/// The full HTTP application: public pages and accounts, plus the
/// cat and toy routes behind the login gate.
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(public_routes())
        .merge(cat_routes().route_layer(from_fn_with_state(state.clone(), require_login)))
        .merge(toy_routes().route_layer(from_fn_with_state(state.clone(), require_login)));

    if state.config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    if state.config.server.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::public::{accounts, pages};

    Router::new()
        .route("/", get(pages::home))
        .route("/about/", get(pages::about))
        .route("/health", get(pages::health))
        .route("/signup/", get(accounts::signup_form).post(accounts::signup))
        .route("/login/", get(accounts::login_form).post(accounts::login))
        .route("/logout/", post(accounts::logout))
}

fn cat_routes() -> Router<AppState> {
    use handlers::protected::cats;

    Router::new()
        .route("/cats/", get(cats::cat_index))
        .route("/cats/create/", get(cats::cat_create_form).post(cats::cat_create))
        .route("/cats/:cat_id/", get(cats::cat_detail))
        .route("/cats/:cat_id/update/", get(cats::cat_update_form).post(cats::cat_update))
        .route("/cats/:cat_id/delete/", get(cats::cat_delete_confirm).post(cats::cat_delete))
        .route("/cats/:cat_id/add-feeding/", post(cats::add_feeding))
        .route("/cats/:cat_id/toys/available/", get(cats::cat_available_toys))
        // Toy associations
        .route("/cats/:cat_id/associate-toy/:toy_id/", post(cats::associate_toy))
        .route("/cats/:cat_id/remove-toy/:toy_id/", post(cats::remove_toy))
}

fn toy_routes() -> Router<AppState> {
    use handlers::protected::toys;

    Router::new()
        .route("/toys/", get(toys::toy_index))
        .route("/toys/create/", get(toys::toy_create_form).post(toys::toy_create))
        .route("/toys/:toy_id/", get(toys::toy_detail))
        .route("/toys/:toy_id/update/", get(toys::toy_update_form).post(toys::toy_update))
        .route("/toys/:toy_id/delete/", get(toys::toy_delete_confirm).post(toys::toy_delete))
}
