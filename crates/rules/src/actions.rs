//! Action execution: applies one action to one campaign row. Every
//! mutating branch persists the change and appends exactly one audit
//! entry; a failed write produces no audit entry and a failure outcome.

use std::sync::Arc;

use autopilot_core::types::{
    ActionOutcome, AdjustDirection, AutomationRule, Notification, PausedReason, RuleAction,
    CampaignStatus,
};
use autopilot_core::AutomationConfig;
use autopilot_store::{AuditLog, OrgStore};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

pub struct ActionExecutor {
    store: Arc<OrgStore>,
    audit: Arc<AuditLog>,
    config: AutomationConfig,
}

impl ActionExecutor {
    pub fn new(store: Arc<OrgStore>, audit: Arc<AuditLog>, config: AutomationConfig) -> Self {
        Self {
            store,
            audit,
            config,
        }
    }

    /// Apply one action against one org-scoped campaign. The dispatch is
    /// exhaustive over the action enum, so there is no unknown-action
    /// branch.
    pub fn apply(
        &self,
        action: &RuleAction,
        rule: Option<&AutomationRule>,
        org_id: Uuid,
        campaign_id: Uuid,
    ) -> ActionOutcome {
        let label = action.label();
        let actor = rule.map(|r| r.id);

        match action {
            RuleAction::PauseCampaign => {
                let old_status = match self.store.get_campaign(org_id, campaign_id) {
                    Some(c) => c.status,
                    None => return ActionOutcome::failed(label, "campaign not found"),
                };
                match self.store.update_campaign(org_id, campaign_id, |c| {
                    c.status = CampaignStatus::Paused;
                    c.paused_reason = Some(PausedReason::RuleTriggered);
                }) {
                    Ok(_) => {
                        self.audit.record(
                            org_id,
                            actor,
                            campaign_id,
                            label,
                            serde_json::json!(old_status),
                            serde_json::json!(CampaignStatus::Paused),
                            "rule condition matched",
                        );
                        info!(campaign_id = %campaign_id, "Campaign paused by rule");
                        ActionOutcome::ok(label, "campaign paused")
                    }
                    Err(e) => {
                        warn!(campaign_id = %campaign_id, error = %e, "Pause failed");
                        ActionOutcome::failed(label, e.to_string())
                    }
                }
            }

            RuleAction::AdjustBudget { direction, percent } => {
                let old_budget = match self.store.get_campaign(org_id, campaign_id) {
                    Some(c) => c.budget,
                    None => return ActionOutcome::failed(label, "campaign not found"),
                };
                let factor = match direction {
                    AdjustDirection::Increase => 1.0 + percent / 100.0,
                    AdjustDirection::Decrease => 1.0 - percent / 100.0,
                };
                let new_budget = (old_budget * factor).max(self.config.min_campaign_budget);
                match self
                    .store
                    .update_campaign(org_id, campaign_id, |c| c.budget = new_budget)
                {
                    Ok(_) => {
                        self.audit.record(
                            org_id,
                            actor,
                            campaign_id,
                            label,
                            serde_json::json!(old_budget),
                            serde_json::json!(new_budget),
                            "rule condition matched",
                        );
                        ActionOutcome::ok(
                            label,
                            format!(
                                "budget adjusted {old_budget:.2} -> {new_budget:.2} ({:+.2})",
                                new_budget - old_budget
                            ),
                        )
                    }
                    Err(e) => {
                        warn!(campaign_id = %campaign_id, error = %e, "Budget adjust failed");
                        ActionOutcome::failed(label, e.to_string())
                    }
                }
            }

            // Real bid changes go through the platform connectors; here
            // the request is only queued.
            RuleAction::AdjustBid { percent } => {
                if self.store.get_campaign(org_id, campaign_id).is_none() {
                    return ActionOutcome::failed(label, "campaign not found");
                }
                info!(campaign_id = %campaign_id, percent, "Bid adjustment queued");
                ActionOutcome::ok(label, format!("bid adjustment of {percent}% queued"))
            }

            RuleAction::Notify { message } => {
                if self.store.get_campaign(org_id, campaign_id).is_none() {
                    return ActionOutcome::failed(label, "campaign not found");
                }
                let notification = Notification {
                    id: Uuid::new_v4(),
                    org_id,
                    rule_id: actor,
                    campaign_id,
                    message: message.clone(),
                    created_at: Utc::now(),
                };
                self.store.push_notification(notification);
                self.audit.record(
                    org_id,
                    actor,
                    campaign_id,
                    label,
                    serde_json::Value::Null,
                    serde_json::json!(message),
                    "rule condition matched",
                );
                ActionOutcome::ok(label, "notification created")
            }

            // Unimplemented pass-throughs: reported as explicit stubs, no
            // I/O performed.
            RuleAction::TriggerWebhook { url } => {
                ActionOutcome::ok(label, format!("webhook to {url} not dispatched (stub)"))
            }
            RuleAction::TagEntity { tag } => {
                ActionOutcome::ok(label, format!("tag '{tag}' not applied (stub)"))
            }
        }
    }
}
