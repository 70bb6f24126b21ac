use thiserror::Error;
use uuid::Uuid;

pub type AutopilotResult<T> = Result<T, AutopilotError>;

#[derive(Error, Debug)]
pub enum AutopilotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Campaign {campaign_id} not found for org {org_id}")]
    CampaignNotFound { org_id: Uuid, campaign_id: Uuid },

    #[error("Rule {0} not found")]
    RuleNotFound(Uuid),

    #[error("Rule validation failed: {}", .0.join("; "))]
    InvalidRule(Vec<String>),

    #[error("No active campaigns found for org {0}")]
    NoActiveCampaigns(Uuid),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
