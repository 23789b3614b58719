use clap::Args;
use serde_json::json;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::config;
use crate::forms::SignupForm;
use crate::services::{AccountService, ServiceError};

#[derive(Args, Debug)]
pub struct CreateUserArgs {
    #[arg(help = "Username (letters, digits and @.+-_)")]
    pub username: String,

    #[arg(long, help = "Password, at least 8 characters")]
    pub password: String,
}

pub async fn handle(args: CreateUserArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = super::connect_store(config()).await?;

    let form = SignupForm {
        username: Some(args.username),
        password1: Some(args.password.clone()),
        password2: Some(args.password),
    };

    let user = match AccountService::new(store).signup(&form).await {
        Ok(user) => user,
        Err(ServiceError::Validation(errors)) => {
            let mut details: Vec<String> = errors.iter().map(|(field, msg)| format!("{}: {}", field, msg)).collect();
            details.sort();
            anyhow::bail!("invalid user: {}", details.join("; "));
        }
        Err(e) => return Err(e.into()),
    };

    output_success(
        &output_format,
        &format!("Created user '{}'", user.username),
        Some(json!({ "id": user.id, "username": user.username })),
    )
}
