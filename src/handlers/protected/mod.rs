// handlers/protected/mod.rs - handlers behind middleware::require_login
//
// Every handler here receives the signed-in user as Extension<AuthUser> and
// passes it explicitly to the service it calls.

pub mod cats;
pub mod toys;
