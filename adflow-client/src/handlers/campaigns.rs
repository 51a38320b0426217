use super::Output;
use crate::cli::{CampaignCommand, CreateCampaignArgs, MetricsArgs};
use crate::models::{MetricsUpdate, NewCampaign};
use crate::services::ApiClient;
use anyhow::{Context, Result};

pub async fn handle(client: &ApiClient, command: CampaignCommand) -> Result<Output> {
    let campaigns = client.campaigns();
    match command {
        CampaignCommand::List { status } => {
            let list = campaigns
                .list(status)
                .await
                .context("Failed to list campaigns")?;
            Output::json(&list)
        }
        CampaignCommand::Show { id } => {
            let campaign = campaigns
                .get(id)
                .await
                .with_context(|| format!("Failed to load campaign {}", id))?;
            Output::json(&campaign)
        }
        CampaignCommand::Create(args) => {
            let campaign = campaigns
                .create(&new_campaign(args))
                .await
                .context("Failed to create campaign")?;
            Output::json(&campaign)
        }
        CampaignCommand::Delete { id } => {
            campaigns
                .delete(id)
                .await
                .with_context(|| format!("Failed to delete campaign {}", id))?;
            Ok(Output::Message(format!("Campaign {} deleted", id)))
        }
        CampaignCommand::Metrics(args) => {
            let id = args.id;
            let message = campaigns
                .update_metrics(id, &metrics_update(args))
                .await
                .with_context(|| format!("Failed to update metrics of campaign {}", id))?;
            Ok(Output::Message(
                message.unwrap_or_else(|| "Metrics updated".to_string()),
            ))
        }
        CampaignCommand::Optimize { id } => {
            let result = campaigns
                .optimize(id)
                .await
                .with_context(|| format!("Failed to optimize campaign {}", id))?;
            Output::json(&result)
        }
        CampaignCommand::Analytics { id } => {
            let analytics = campaigns
                .analytics(id)
                .await
                .with_context(|| format!("Failed to load analytics of campaign {}", id))?;
            Ok(Output::Json(analytics))
        }
    }
}

fn new_campaign(args: CreateCampaignArgs) -> NewCampaign {
    NewCampaign {
        name: args.name,
        total_budget: args.budget,
        platforms: args.platforms,
        start_date: args.start,
        end_date: args.end,
        objective: args.objective,
        target_audience: None,
        description: args.description,
    }
}

fn metrics_update(args: MetricsArgs) -> MetricsUpdate {
    MetricsUpdate {
        impressions: args.impressions,
        clicks: args.clicks,
        conversions: args.conversions,
        spent_budget: args.spent,
        ctr: args.ctr,
        cpc: args.cpc,
        cpa: args.cpa,
        roas: args.roas,
    }
}
