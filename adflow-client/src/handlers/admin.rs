use super::Output;
use crate::cli::AdminCommand;
use crate::models::{UserQuery, UserUpdate};
use crate::services::ApiClient;
use anyhow::{bail, Context, Result};

pub async fn handle(client: &ApiClient, command: AdminCommand) -> Result<Output> {
    let admin = client.admin();
    match command {
        AdminCommand::Stats => {
            let stats = admin.stats().await.context("Failed to load system stats")?;
            Output::json(&stats)
        }
        AdminCommand::Activity { limit } => {
            let activity = admin
                .activity(limit)
                .await
                .context("Failed to load recent activity")?;
            Output::json(&activity)
        }
        AdminCommand::Users {
            page,
            per_page,
            search,
        } => {
            let query = UserQuery {
                page,
                per_page,
                search,
            };
            let users = admin.users(&query).await.context("Failed to list users")?;
            Output::json(&users)
        }
        AdminCommand::User { id } => {
            let user = admin
                .user(id)
                .await
                .with_context(|| format!("Failed to load user {}", id))?;
            Output::json(&user)
        }
        AdminCommand::UpdateUser(args) => {
            let update = UserUpdate {
                full_name: args.full_name,
                company: args.company,
                role: args.role,
                is_active: args.active,
                is_verified: args.verified,
            };
            if update.is_empty() {
                bail!("Nothing to update for user {}", args.id);
            }
            let updated = admin
                .update_user(args.id, &update)
                .await
                .with_context(|| format!("Failed to update user {}", args.id))?;
            Output::json(&updated)
        }
        AdminCommand::ToggleActive { id } => {
            let toggled = admin
                .toggle_active(id)
                .await
                .with_context(|| format!("Failed to toggle user {}", id))?;
            Output::json(&toggled)
        }
        AdminCommand::SetRole { id, role } => {
            let change = admin
                .set_role(id, &role)
                .await
                .with_context(|| format!("Failed to set the role of user {}", id))?;
            Output::json(&change)
        }
        AdminCommand::DeleteUser { id } => {
            let message = admin
                .delete_user(id)
                .await
                .with_context(|| format!("Failed to delete user {}", id))?;
            Ok(Output::Message(
                message.unwrap_or_else(|| format!("User {} deleted", id)),
            ))
        }
        AdminCommand::Bootstrap => {
            let result = admin.bootstrap().await.context("Bootstrap failed")?;
            Output::json(&result)
        }
    }
}
