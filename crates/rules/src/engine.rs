use std::sync::Arc;

use autopilot_core::types::{ActionOutcome, AutomationRule, CampaignStatus};
use autopilot_core::{AutomationConfig, AutopilotError, AutopilotResult};
use autopilot_store::{AuditLog, OrgStore};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::actions::ActionExecutor;
use crate::evaluator::evaluate;
use crate::validate::validate_rule;

/// Result of one evaluation pass over one campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignRunResult {
    pub campaign_id: Uuid,
    pub optimized: bool,
    pub actions: Vec<ActionOutcome>,
}

/// Aggregate counters for an org-wide run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrgRunSummary {
    pub campaigns_evaluated: usize,
    pub paused: u64,
    pub budget_adjusted: u64,
    pub notified: u64,
    pub errors: u64,
}

/// Evaluates an org's automation rules against campaign metric
/// snapshots and applies matching actions.
pub struct RulesEngine {
    store: Arc<OrgStore>,
    executor: ActionExecutor,
}

impl RulesEngine {
    pub fn new(store: Arc<OrgStore>, audit: Arc<AuditLog>, config: AutomationConfig) -> Self {
        let executor = ActionExecutor::new(Arc::clone(&store), audit, config);
        Self { store, executor }
    }

    /// Run rules against one campaign. When `rules` is `None`, all active
    /// rules for the org are loaded.
    ///
    /// Rules are evaluated independently and unconditionally: no
    /// short-circuit on first match, no priority ordering; several rules
    /// may fire in one pass. The metrics snapshot is computed once up
    /// front, so a later rule does not observe an earlier rule's budget
    /// mutation within the same pass. That keeps one evaluation pass a
    /// single consistent read of the campaign's metrics.
    pub fn run_for_campaign(
        &self,
        org_id: Uuid,
        campaign_id: Uuid,
        rules: Option<&[AutomationRule]>,
    ) -> AutopilotResult<CampaignRunResult> {
        let snapshot = self
            .store
            .snapshot(org_id, campaign_id)
            .ok_or(AutopilotError::CampaignNotFound {
                org_id,
                campaign_id,
            })?;

        let owned_rules;
        let rules = match rules {
            Some(r) => r,
            None => {
                owned_rules = self.store.active_rules(org_id);
                &owned_rules
            }
        };

        let mut actions = Vec::new();
        for rule in rules {
            let problems = validate_rule(rule);
            if !problems.is_empty() {
                warn!(
                    rule_id = %rule.id,
                    errors = ?problems,
                    "Skipping invalid rule"
                );
                continue;
            }

            if !evaluate(&rule.condition, &snapshot) {
                continue;
            }

            info!(
                rule_id = %rule.id,
                campaign_id = %campaign_id,
                action = rule.action.label(),
                "Rule matched"
            );
            let outcome = self
                .executor
                .apply(&rule.action, Some(rule), org_id, campaign_id);
            self.store.record_execution(rule.id);
            if outcome.success {
                actions.push(outcome);
            } else {
                warn!(
                    rule_id = %rule.id,
                    campaign_id = %campaign_id,
                    error = ?outcome.error,
                    "Rule action failed"
                );
            }
        }

        Ok(CampaignRunResult {
            campaign_id,
            optimized: !actions.is_empty(),
            actions,
        })
    }

    /// Run the org's active rules over every non-completed campaign.
    /// A single campaign's failure never aborts the batch.
    pub fn run_for_organization(&self, org_id: Uuid) -> OrgRunSummary {
        let rules = self.store.active_rules(org_id);
        let campaigns: Vec<_> = self
            .store
            .list_campaigns(org_id)
            .into_iter()
            .filter(|c| c.status != CampaignStatus::Completed)
            .collect();

        let mut summary = OrgRunSummary {
            campaigns_evaluated: campaigns.len(),
            ..Default::default()
        };

        for campaign in campaigns {
            match self.run_for_campaign(org_id, campaign.id, Some(&rules)) {
                Ok(result) => {
                    for outcome in &result.actions {
                        match outcome.action.as_str() {
                            "pause_campaign" => summary.paused += 1,
                            "adjust_budget" => summary.budget_adjusted += 1,
                            "notify" => summary.notified += 1,
                            _ => {}
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        org_id = %org_id,
                        campaign_id = %campaign.id,
                        error = %e,
                        "Campaign rule run failed, continuing batch"
                    );
                    summary.errors += 1;
                }
            }
        }

        info!(
            org_id = %org_id,
            evaluated = summary.campaigns_evaluated,
            paused = summary.paused,
            budget_adjusted = summary.budget_adjusted,
            notified = summary.notified,
            errors = summary.errors,
            "Org rules run complete"
        );
        summary
    }
}
