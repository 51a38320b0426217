use super::Output;
use crate::cli::RegisterArgs;
use crate::models::{ChangePasswordRequest, LoginRequest, RegisterRequest};
use crate::services::ApiClient;
use anyhow::{Context, Result};
use secrecy::Secret;

pub async fn login(client: &ApiClient, username: String, password: String) -> Result<Output> {
    let user = client
        .auth()
        .login(&LoginRequest::new(username, password))
        .await
        .context("Login failed")?;
    Ok(Output::Message(format!(
        "Logged in as {} ({})",
        user.username, user.role
    )))
}

pub async fn register(client: &ApiClient, args: RegisterArgs) -> Result<Output> {
    let request = RegisterRequest {
        username: args.username,
        email: args.email,
        password: Secret::new(args.password),
        full_name: args.full_name,
        company: args.company,
    };
    let user = client
        .auth()
        .register(&request)
        .await
        .context("Registration failed")?;
    Ok(Output::Message(format!(
        "Registered and logged in as {}",
        user.username
    )))
}

pub async fn logout(client: &ApiClient) -> Result<Output> {
    client.auth().logout().await.context("Logout failed")?;
    Ok(Output::Message("Logged out".to_string()))
}

pub async fn whoami(client: &ApiClient) -> Result<Output> {
    let user = client
        .auth()
        .me()
        .await
        .context("Failed to load the current user")?;
    Output::json(&user)
}

pub async fn change_password(
    client: &ApiClient,
    current: String,
    new_password: String,
) -> Result<Output> {
    let request = ChangePasswordRequest {
        old_password: Secret::new(current),
        new_password: Secret::new(new_password),
    };
    let message = client
        .auth()
        .change_password(&request)
        .await
        .context("Failed to change password")?;
    Ok(Output::Message(
        message.unwrap_or_else(|| "Password changed".to_string()),
    ))
}
