use autopilot_core::types::{
    AutomationRule, Campaign, CampaignMetrics, CampaignStatus, MetricsSnapshot, Notification,
};
use autopilot_core::{AutopilotError, AutopilotResult};
use chrono::Utc;
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

/// Thread-safe in-memory store for campaigns, automation rules, metrics,
/// and notifications.
pub struct OrgStore {
    campaigns: DashMap<Uuid, Campaign>,
    rules: DashMap<Uuid, AutomationRule>,
    metrics: DashMap<Uuid, CampaignMetrics>,
    notifications: DashMap<Uuid, Notification>,
    /// Campaign ids whose next write fails. Lets tests drive the
    /// persistence-failure path without a real database.
    failing_writes: DashMap<Uuid, ()>,
}

impl OrgStore {
    pub fn new() -> Self {
        info!("Org store initialized (in-memory, development mode)");
        Self {
            campaigns: DashMap::new(),
            rules: DashMap::new(),
            metrics: DashMap::new(),
            notifications: DashMap::new(),
            failing_writes: DashMap::new(),
        }
    }

    // ─── Campaigns ─────────────────────────────────────────────────────

    pub fn insert_campaign(&self, campaign: Campaign) -> Uuid {
        let id = campaign.id;
        self.campaigns.insert(id, campaign);
        id
    }

    /// Org-scoped fetch. A campaign belonging to another org reads as
    /// absent, never as the other org's row.
    pub fn get_campaign(&self, org_id: Uuid, campaign_id: Uuid) -> Option<Campaign> {
        self.campaigns
            .get(&campaign_id)
            .filter(|c| c.org_id == org_id)
            .map(|c| c.clone())
    }

    pub fn list_campaigns(&self, org_id: Uuid) -> Vec<Campaign> {
        let mut campaigns: Vec<Campaign> = self
            .campaigns
            .iter()
            .filter(|c| c.org_id == org_id)
            .map(|c| c.clone())
            .collect();
        campaigns.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        campaigns
    }

    pub fn list_by_status(&self, org_id: Uuid, statuses: &[CampaignStatus]) -> Vec<Campaign> {
        self.list_campaigns(org_id)
            .into_iter()
            .filter(|c| statuses.contains(&c.status))
            .collect()
    }

    /// Apply a mutation to one campaign row and return the updated row.
    /// Fails closed on cross-org access and surfaces injected write
    /// failures without applying the mutation.
    pub fn update_campaign<F>(
        &self,
        org_id: Uuid,
        campaign_id: Uuid,
        mutate: F,
    ) -> AutopilotResult<Campaign>
    where
        F: FnOnce(&mut Campaign),
    {
        if self.failing_writes.remove(&campaign_id).is_some() {
            return Err(AutopilotError::Persistence(format!(
                "write failed for campaign {campaign_id}"
            )));
        }

        let mut entry = self
            .campaigns
            .get_mut(&campaign_id)
            .filter(|c| c.org_id == org_id)
            .ok_or(AutopilotError::CampaignNotFound {
                org_id,
                campaign_id,
            })?;

        mutate(&mut entry);
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    /// Make the next write to this campaign fail (tests and drills).
    pub fn fail_next_write(&self, campaign_id: Uuid) {
        self.failing_writes.insert(campaign_id, ());
    }

    // ─── Metrics ───────────────────────────────────────────────────────

    pub fn set_metrics(&self, campaign_id: Uuid, metrics: CampaignMetrics) {
        self.metrics.insert(campaign_id, metrics);
    }

    /// Current spend for a campaign; 0.0 when no metrics row exists.
    pub fn spend(&self, org_id: Uuid, campaign_id: Uuid) -> f64 {
        if self.get_campaign(org_id, campaign_id).is_none() {
            return 0.0;
        }
        self.metrics
            .get(&campaign_id)
            .map(|m| m.spend)
            .unwrap_or(0.0)
    }

    /// Build the evaluation snapshot for a campaign. `None` when the
    /// campaign is absent for this org; a campaign with no metrics row
    /// yields an all-zero snapshot.
    pub fn snapshot(&self, org_id: Uuid, campaign_id: Uuid) -> Option<MetricsSnapshot> {
        self.get_campaign(org_id, campaign_id)?;
        let metrics = self
            .metrics
            .get(&campaign_id)
            .map(|m| m.clone())
            .unwrap_or_default();
        Some(MetricsSnapshot::from_metrics(&metrics))
    }

    // ─── Automation rules ──────────────────────────────────────────────

    pub fn insert_rule(&self, rule: AutomationRule) -> Uuid {
        let id = rule.id;
        self.rules.insert(id, rule);
        id
    }

    pub fn get_rule(&self, org_id: Uuid, rule_id: Uuid) -> Option<AutomationRule> {
        self.rules
            .get(&rule_id)
            .filter(|r| r.org_id == org_id)
            .map(|r| r.clone())
    }

    /// All `is_active` rules for the org, oldest first.
    pub fn active_rules(&self, org_id: Uuid) -> Vec<AutomationRule> {
        let mut rules: Vec<AutomationRule> = self
            .rules
            .iter()
            .filter(|r| r.org_id == org_id && r.is_active)
            .map(|r| r.clone())
            .collect();
        rules.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        rules
    }

    /// Bump execution counters after a rule fires.
    pub fn record_execution(&self, rule_id: Uuid) {
        if let Some(mut rule) = self.rules.get_mut(&rule_id) {
            rule.execution_count += 1;
            rule.last_executed_at = Some(Utc::now());
            rule.updated_at = Utc::now();
        }
    }

    // ─── Notifications ─────────────────────────────────────────────────

    pub fn push_notification(&self, notification: Notification) -> Uuid {
        let id = notification.id;
        self.notifications.insert(id, notification);
        id
    }

    pub fn notifications(&self, org_id: Uuid) -> Vec<Notification> {
        let mut list: Vec<Notification> = self
            .notifications
            .iter()
            .filter(|n| n.org_id == org_id)
            .map(|n| n.clone())
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }
}

impl Default for OrgStore {
    fn default() -> Self {
        Self::new()
    }
}
