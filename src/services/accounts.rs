use std::sync::Arc;

use crate::auth::{hash_password, verify_password};
use crate::database::models::{NewUser, User};
use crate::database::Store;
use crate::forms::{FieldErrors, LoginForm, SignupForm, Validate};

use super::{ServiceError, ServiceResult};

/// Signup and credential checks
pub struct AccountService {
    store: Arc<dyn Store>,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn signup(&self, form: &SignupForm) -> ServiceResult<User> {
        let credentials = form.validate().map_err(ServiceError::Validation)?;

        if self.store.find_user_by_username(&credentials.username).await?.is_some() {
            return Err(username_taken());
        }

        let user = self
            .store
            .create_user(NewUser {
                username: credentials.username,
                password_hash: hash_password(&credentials.password),
            })
            .await
            .map_err(|e| match ServiceError::from(e) {
                // lost a race with another signup for the same name
                ServiceError::Conflict(_) => username_taken(),
                other => other,
            })?;

        tracing::info!("Signed up user {} ({})", user.username, user.id);
        Ok(user)
    }

    pub async fn login(&self, form: &LoginForm) -> ServiceResult<User> {
        let credentials = form.validate().map_err(ServiceError::Validation)?;

        match self.store.find_user_by_username(&credentials.username).await? {
            Some(user) if verify_password(&credentials.password, &user.password_hash) => {
                tracing::info!("User {} logged in", user.username);
                Ok(user)
            }
            _ => {
                tracing::warn!("Failed login for '{}'", credentials.username);
                Err(ServiceError::InvalidCredentials)
            }
        }
    }
}

fn username_taken() -> ServiceError {
    let mut errors = FieldErrors::new();
    errors.insert("username".to_string(), "A user with that username already exists.".to_string());
    ServiceError::Validation(errors)
}
