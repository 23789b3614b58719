mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{TestApp, PASSWORD};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = TestApp::new();

    let res = app.get("/health", None).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()?["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn home_and_about_are_public() -> Result<()> {
    let app = TestApp::new();

    assert_eq!(app.get("/", None).await?.data()?["name"], "Cat Collector");
    assert_eq!(app.get("/about/", None).await?.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn protected_pages_redirect_to_login() -> Result<()> {
    let app = TestApp::new();

    let res = app.get("/cats/3/", None).await?;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/login/?next=%2Fcats%2F3%2F"));

    let res = app.post_form("/toys/create/", &[("name", "Ball"), ("color", "red")], None).await?;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert!(res.location().unwrap_or_default().starts_with("/login/"));
    Ok(())
}

#[tokio::test]
async fn signup_logs_in_and_lands_on_cat_index() -> Result<()> {
    let app = TestApp::new();

    let res = app
        .post_form(
            "/signup/",
            &[("username", "alice"), ("password1", PASSWORD), ("password2", PASSWORD)],
            None,
        )
        .await?;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/cats/"));

    let session = res.session_cookie().expect("session cookie");
    let cats = app.get("/cats/", Some(&session)).await?;
    assert_eq!(cats.status, StatusCode::OK);
    assert_eq!(cats.data()?["cats"], serde_json::json!([]));
    Ok(())
}

#[tokio::test]
async fn signup_rejects_duplicates_and_mismatched_passwords() -> Result<()> {
    let app = TestApp::new();
    app.signup("alice").await?;

    let res = app
        .post_form(
            "/signup/",
            &[("username", "alice"), ("password1", PASSWORD), ("password2", PASSWORD)],
            None,
        )
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let page = res.form_page()?;
    assert!(page["errors"]["username"].is_string());
    assert_eq!(page["values"]["username"], "alice");
    assert!(page["values"].get("password1").is_none());

    let res = app
        .post_form(
            "/signup/",
            &[("username", "bob"), ("password1", PASSWORD), ("password2", "different1")],
            None,
        )
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.session_cookie().is_none());
    Ok(())
}

#[tokio::test]
async fn login_follows_local_next_only() -> Result<()> {
    let app = TestApp::new();
    app.signup("alice").await?;

    let res = app
        .post_form(
            "/login/",
            &[("username", "alice"), ("password", PASSWORD), ("next", "/toys/")],
            None,
        )
        .await?;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/toys/"));
    assert!(res.session_cookie().is_some());

    let res = app
        .post_form(
            "/login/",
            &[("username", "alice"), ("password", PASSWORD), ("next", "//evil.example/")],
            None,
        )
        .await?;
    assert_eq!(res.location(), Some("/cats/"));
    Ok(())
}

#[tokio::test]
async fn login_form_carries_next() -> Result<()> {
    let app = TestApp::new();

    let res = app.get("/login/?next=%2Fcats%2F3%2F", None).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()?["values"]["next"], "/cats/3/");
    Ok(())
}

#[tokio::test]
async fn bad_credentials_re_render_login() -> Result<()> {
    let app = TestApp::new();
    app.signup("alice").await?;

    let res = app
        .post_form("/login/", &[("username", "alice"), ("password", "wrong-password")], None)
        .await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.session_cookie().is_none());
    assert!(res.form_page()?["errors"]["__all__"].is_string());
    Ok(())
}

#[tokio::test]
async fn logout_clears_session() -> Result<()> {
    let app = TestApp::new();
    let session = app.signup("alice").await?;

    let res = app.post_form("/logout/", &[], Some(&session)).await?;

    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/"));
    assert_eq!(res.session_cookie().as_deref(), Some("session="));
    Ok(())
}

#[tokio::test]
async fn forged_session_is_rejected() -> Result<()> {
    let app = TestApp::new();

    let res = app.get("/cats/", Some("session=not.a.token")).await?;

    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert!(res.location().unwrap_or_default().starts_with("/login/"));
    Ok(())
}
