#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use cat_collector::config::AppConfig;
use cat_collector::database::InMemoryStore;
use cat_collector::state::AppState;

pub const PASSWORD: &str = "whiskers99";

/// The application wired to a fresh in-memory store, driven in process
pub struct TestApp {
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::development())
    }

    pub fn with_config(mut config: AppConfig) -> Self {
        config.server.enable_request_logging = false;
        let state = AppState::new(config, Arc::new(InMemoryStore::new()));
        Self {
            router: cat_collector::app(state),
        }
    }

    pub async fn get(&self, path: &str, session: Option<&str>) -> Result<TestResponse> {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(cookie) = session {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty())?).await
    }

    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)], session: Option<&str>) -> Result<TestResponse> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();

        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = session {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body))?).await
    }

    async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;

        Ok(TestResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }

    /// Sign up and return the `session=...` cookie to send back
    pub async fn signup(&self, username: &str) -> Result<String> {
        let res = self
            .post_form(
                "/signup/",
                &[("username", username), ("password1", PASSWORD), ("password2", PASSWORD)],
                None,
            )
            .await?;
        anyhow::ensure!(res.status == StatusCode::SEE_OTHER, "signup failed: {}", res.status);
        res.session_cookie().context("signup set no session cookie")
    }

    /// Create a cat through the form and return its id
    pub async fn create_cat(&self, session: &str, name: &str, breed: &str, age: &str) -> Result<i64> {
        let res = self
            .post_form(
                "/cats/create/",
                &[("name", name), ("breed", breed), ("description", "A fine cat"), ("age", age)],
                Some(session),
            )
            .await?;
        anyhow::ensure!(res.status == StatusCode::SEE_OTHER, "cat create failed: {}", res.status);
        res.redirect_id("/cats/")
    }

    /// Create a toy through the form and return its id
    pub async fn create_toy(&self, session: &str, name: &str, color: &str) -> Result<i64> {
        let res = self
            .post_form("/toys/create/", &[("name", name), ("color", color)], Some(session))
            .await?;
        anyhow::ensure!(res.status == StatusCode::SEE_OTHER, "toy create failed: {}", res.status);
        res.redirect_id("/toys/")
    }
}

impl TestResponse {
    pub fn json(&self) -> Result<Value> {
        serde_json::from_slice(&self.body).context("response body is not JSON")
    }

    /// The `data` member of a success envelope
    pub fn data(&self) -> Result<Value> {
        let body = self.json()?;
        anyhow::ensure!(body["success"] == true, "not a success envelope: {}", body);
        Ok(body["data"].clone())
    }

    /// A re-rendered form: the page sits in `data` with `success: false`
    pub fn form_page(&self) -> Result<Value> {
        let body = self.json()?;
        anyhow::ensure!(body["success"] == false, "expected a failed envelope: {}", body);
        Ok(body["data"].clone())
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }

    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.starts_with("session="))
            .map(str::to_string)
    }

    /// Id from a redirect such as `/cats/7/`
    pub fn redirect_id(&self, prefix: &str) -> Result<i64> {
        let location = self.location().context("no Location header")?;
        let id = location
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix('/'))
            .with_context(|| format!("unexpected redirect {}", location))?;
        Ok(id.parse()?)
    }
}
