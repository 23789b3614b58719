use serde::{Deserialize, Serialize};

use super::{max_length, required, FieldErrors, Validate};

pub const USERNAME_MAX: usize = 150;
pub const PASSWORD_MIN: usize = 8;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupForm {
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password1: Option<String>,
    #[serde(skip_serializing)]
    pub password2: Option<String>,
}

/// Validated signup input; the password is still plain text here
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Validate for SignupForm {
    type Output = Credentials;
    const NAME: &'static str = "signup_form";

    fn validate(&self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::new();

        let username = required(&mut errors, "username", &self.username)
            .and_then(|v| max_length(&mut errors, "username", v, USERNAME_MAX))
            .and_then(|v| {
                if v.chars().all(|c| c.is_alphanumeric() || "@.+-_".contains(c)) {
                    Some(v)
                } else {
                    errors.insert(
                        "username".to_string(),
                        "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                            .to_string(),
                    );
                    None
                }
            });

        // Passwords are not trimmed
        let password = match self.password1.as_deref() {
            Some(p) if !p.is_empty() => {
                if p.chars().count() < PASSWORD_MIN {
                    errors.insert(
                        "password1".to_string(),
                        format!("This password is too short. It must contain at least {} characters.", PASSWORD_MIN),
                    );
                    None
                } else {
                    Some(p)
                }
            }
            _ => {
                errors.insert("password1".to_string(), super::REQUIRED.to_string());
                None
            }
        };

        if let Some(p) = password {
            if self.password2.as_deref() != Some(p) {
                errors.insert("password2".to_string(), "The two password fields didn't match.".to_string());
            }
        }

        match (username, password) {
            (Some(username), Some(password)) if errors.is_empty() => Ok(Credentials {
                username: username.to_string(),
                password: password.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub next: Option<String>,
}

impl Validate for LoginForm {
    type Output = Credentials;
    const NAME: &'static str = "login_form";

    fn validate(&self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::new();
        let username = required(&mut errors, "username", &self.username);
        let password = match self.password.as_deref() {
            Some(p) if !p.is_empty() => Some(p),
            _ => {
                errors.insert("password".to_string(), super::REQUIRED.to_string());
                None
            }
        };

        match (username, password) {
            (Some(username), Some(password)) => Ok(Credentials {
                username: username.to_string(),
                password: password.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str, p1: &str, p2: &str) -> SignupForm {
        SignupForm {
            username: Some(username.into()),
            password1: Some(p1.into()),
            password2: Some(p2.into()),
        }
    }

    #[test]
    fn signup_requires_matching_passwords() {
        assert!(signup("alice", "whiskers99", "whiskers99").validate().is_ok());
        let errors = signup("alice", "whiskers99", "whiskers98").validate().unwrap_err();
        assert!(errors.contains_key("password2"));
    }

    #[test]
    fn signup_rejects_short_passwords_and_odd_usernames() {
        let errors = signup("al ice", "short", "short").validate().unwrap_err();
        assert!(errors.contains_key("username"));
        assert!(errors["password1"].contains("too short"));
    }

    #[test]
    fn rendered_forms_never_echo_passwords() {
        let value = serde_json::to_value(signup("alice", "whiskers99", "whiskers99")).unwrap();
        assert_eq!(value, serde_json::json!({ "username": "alice" }));
    }
}
