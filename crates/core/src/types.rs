use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Campaign lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Scheduled,
    Active,
    Paused,
    Completed,
}

/// Why a campaign is currently paused. Auto-resume only reverses
/// `PoorPerformance` pauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PausedReason {
    BudgetExhausted,
    PoorPerformance,
    RuleTriggered,
}

/// An ad campaign owned by an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub status: CampaignStatus,
    /// Total budget in the org's currency.
    pub budget: f64,
    pub currency: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub paused_reason: Option<PausedReason>,
    pub activated_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Post-campaign analysis payload, written once after completion.
    pub post_campaign_analysis: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    pub fn new(org_id: Uuid, name: impl Into<String>, budget: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            org_id,
            name: name.into(),
            status: CampaignStatus::Draft,
            budget,
            currency: "USD".to_string(),
            start_date: now,
            end_date: None,
            paused_reason: None,
            activated_at: None,
            completed_at: None,
            post_campaign_analysis: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Raw delivery counters for a campaign, fed in from the ad platforms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignMetrics {
    pub spend: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub revenue: f64,
}

/// Flat metric-name -> value mapping evaluated against rule conditions.
/// Computed once per evaluation pass; never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    values: HashMap<String, f64>,
}

impl MetricsSnapshot {
    /// Derive the full snapshot from raw counters. Ratio metrics guard
    /// against zero denominators and default to 0.0.
    pub fn from_metrics(metrics: &CampaignMetrics) -> Self {
        let impressions = metrics.impressions as f64;
        let clicks = metrics.clicks as f64;
        let conversions = metrics.conversions as f64;

        let ctr = if impressions > 0.0 {
            clicks / impressions * 100.0
        } else {
            0.0
        };
        let cpc = if clicks > 0.0 {
            metrics.spend / clicks
        } else {
            0.0
        };
        let cpa = if conversions > 0.0 {
            metrics.spend / conversions
        } else {
            0.0
        };
        let conversion_rate = if clicks > 0.0 {
            conversions / clicks * 100.0
        } else {
            0.0
        };
        let roas = if metrics.spend > 0.0 {
            metrics.revenue / metrics.spend
        } else {
            0.0
        };

        let mut values = HashMap::new();
        values.insert("spend".to_string(), metrics.spend);
        values.insert("impressions".to_string(), impressions);
        values.insert("clicks".to_string(), clicks);
        values.insert("conversions".to_string(), conversions);
        values.insert("ctr".to_string(), ctr);
        values.insert("cpc".to_string(), cpc);
        values.insert("cpa".to_string(), cpa);
        values.insert("conversion_rate".to_string(), conversion_rate);
        values.insert("roas".to_string(), roas);
        Self { values }
    }

    pub fn get(&self, metric: &str) -> Option<f64> {
        self.values.get(metric).copied()
    }

    /// Build a snapshot from explicit values (tests and fixtures).
    pub fn from_values(pairs: &[(&str, f64)]) -> Self {
        Self {
            values: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }
}

/// Comparison operator for rule conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOp {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
    In,
}

/// A single metric condition: `metrics[metric] <op> value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleCondition {
    pub metric: String,
    pub operator: ComparisonOp,
    pub value: serde_json::Value,
}

/// Direction of a rule-triggered budget adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustDirection {
    Increase,
    Decrease,
}

/// What a rule does when its condition matches. Each variant carries its
/// own typed payload; dispatch is an exhaustive match, so there is no
/// unknown-action fallback at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleAction {
    PauseCampaign,
    AdjustBudget {
        direction: AdjustDirection,
        percent: f64,
    },
    /// Bid adjustment is deferred to the platform connectors; executing it
    /// only queues the request.
    AdjustBid { percent: f64 },
    Notify { message: String },
    /// Pass-through, not implemented: reported as an explicit stub result.
    TriggerWebhook { url: String },
    /// Pass-through, not implemented: reported as an explicit stub result.
    TagEntity { tag: String },
}

impl RuleAction {
    /// Stable label used for audit entries and batch counters.
    pub fn label(&self) -> &'static str {
        match self {
            RuleAction::PauseCampaign => "pause_campaign",
            RuleAction::AdjustBudget { .. } => "adjust_budget",
            RuleAction::AdjustBid { .. } => "adjust_bid",
            RuleAction::Notify { .. } => "notify",
            RuleAction::TriggerWebhook { .. } => "trigger_webhook",
            RuleAction::TagEntity { .. } => "tag_entity",
        }
    }
}

/// An org-scoped automation rule: one condition, one action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationRule {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub condition: RuleCondition,
    pub action: RuleAction,
    pub is_active: bool,
    pub execution_count: u64,
    pub last_executed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AutomationRule {
    pub fn new(
        org_id: Uuid,
        name: impl Into<String>,
        condition: RuleCondition,
        action: RuleAction,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            org_id,
            name: name.into(),
            condition,
            action,
            is_active: true,
            execution_count: 0,
            last_executed_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Result of applying one action to one campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub action: String,
    pub success: bool,
    pub message: String,
    pub error: Option<String>,
}

impl ActionOutcome {
    pub fn ok(action: &str, message: impl Into<String>) -> Self {
        Self {
            action: action.to_string(),
            success: true,
            message: message.into(),
            error: None,
        }
    }

    pub fn failed(action: &str, error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            action: action.to_string(),
            success: false,
            message: format!("{action} failed"),
            error: Some(error),
        }
    }
}

/// Budget reallocation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStrategy {
    RoiMaximization,
    EqualDistribution,
    PerformanceWeighted,
    Predictive,
}

impl Default for AllocationStrategy {
    fn default() -> Self {
        Self::PerformanceWeighted
    }
}

impl std::str::FromStr for AllocationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "roi_maximization" => Ok(Self::RoiMaximization),
            "equal_distribution" => Ok(Self::EqualDistribution),
            "performance_weighted" => Ok(Self::PerformanceWeighted),
            "predictive" => Ok(Self::Predictive),
            other => Err(format!("unknown allocation strategy: {other}")),
        }
    }
}

/// One campaign's row in a computed allocation. Produced for every
/// campaign in the run, whether or not the change is later applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationItem {
    pub campaign_id: Uuid,
    pub campaign_name: String,
    pub current_budget: f64,
    pub new_budget: f64,
    pub change_amount: f64,
    pub change_percentage: f64,
    pub reason: String,
    /// The weight source that drove this item (score, roi, or predicted
    /// roi), when the strategy uses one.
    pub weight_source: Option<f64>,
}

/// A budget change that was actually persisted (change > 1% of old).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetChange {
    pub campaign_id: Uuid,
    pub campaign_name: String,
    pub old_budget: f64,
    pub new_budget: f64,
    pub change_amount: f64,
    pub change_percentage: f64,
}

/// A notification addressed to an org, referencing the rule and campaign
/// that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub org_id: Uuid,
    pub rule_id: Option<Uuid>,
    pub campaign_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
