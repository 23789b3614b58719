pub mod auth;
pub mod response;

pub use auth::{login_redirect, require_login, safe_next, AuthUser};
pub use response::{ApiResponse, ApiResult, FormPage};
