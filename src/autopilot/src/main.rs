//! Autopilot: campaign automation engine for rules, lifecycle, and
//! budget reallocation.
//!
//! Entry point that seeds a demonstration organization, registers the
//! three schedule kinds, and runs one scheduler tick. Production wires a
//! real analyzer/forecaster and loops on an interval.

use autopilot_core::analysis::{neutral_analyzer, zero_forecaster};
use autopilot_core::types::{
    AllocationStrategy, AutomationRule, Campaign, CampaignMetrics, CampaignStatus, ComparisonOp,
    RuleAction, RuleCondition,
};
use autopilot_core::AutomationConfig;
use autopilot_execution::{AutomationSchedule, ExecutionService, ScheduleKind};
use autopilot_store::{AuditLog, OrgStore};
use chrono::{Duration, Utc};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "autopilot")]
#[command(about = "Campaign automation engine: rules, lifecycle, and budget reallocation")]
#[command(version)]
struct Cli {
    /// Number of demo organizations to seed
    #[arg(long, env = "AUTOPILOT__ORG_SEED", default_value_t = 1)]
    org_seed: usize,

    /// Total budget for the reallocation schedule
    #[arg(long, env = "AUTOPILOT__TOTAL_BUDGET", default_value_t = 600.0)]
    total_budget: f64,

    /// Allocation strategy (roi_maximization, equal_distribution,
    /// performance_weighted, predictive)
    #[arg(long, env = "AUTOPILOT__STRATEGY", default_value = "performance_weighted")]
    strategy: AllocationStrategy,

    /// Compute the reallocation without persisting it
    #[arg(long, default_value_t = false)]
    simulate_only: bool,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autopilot=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Autopilot starting up");

    // Load configuration
    let config = AutomationConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AutomationConfig::default()
    });

    info!(
        min_campaign_budget = config.min_campaign_budget,
        max_budget_shift_pct = config.max_budget_shift_pct,
        "Configuration loaded"
    );

    let store = Arc::new(OrgStore::new());
    let audit = Arc::new(AuditLog::new());
    let org_ids: Vec<Uuid> = (0..cli.org_seed.max(1))
        .map(|_| seed_demo_org(&store))
        .collect();

    let service = ExecutionService::new(
        Arc::clone(&store),
        Arc::clone(&audit),
        neutral_analyzer(config.neutral_score),
        zero_forecaster(),
        config,
    );

    if cli.simulate_only {
        // Preview only: no schedules, no writes.
        let mut reports = Vec::with_capacity(org_ids.len());
        for org_id in org_ids {
            reports.push(
                service
                    .allocator()
                    .simulate(org_id, cli.total_budget, cli.strategy)?,
            );
        }
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for org_id in org_ids {
        service.add_schedule(AutomationSchedule::new(org_id, ScheduleKind::Rules, 15));
        service.add_schedule(AutomationSchedule::new(org_id, ScheduleKind::Lifecycle, 15));
        service.add_schedule(AutomationSchedule::new(
            org_id,
            ScheduleKind::Reallocation {
                total_budget: cli.total_budget,
                strategy: cli.strategy,
            },
            60,
        ));
    }

    let runs = service.process_due_schedules(Utc::now());
    info!(runs = runs.len(), "Scheduler tick complete");
    println!("{}", serde_json::to_string_pretty(&runs)?);

    Ok(())
}

/// One org with a mix of campaign states, some metrics, and a
/// high-CPA pause rule.
fn seed_demo_org(store: &OrgStore) -> Uuid {
    let org_id = Uuid::new_v4();

    let mut spring = Campaign::new(org_id, "Spring Sale", 100.0);
    spring.status = CampaignStatus::Active;
    let spring_id = store.insert_campaign(spring);
    store.set_metrics(
        spring_id,
        CampaignMetrics {
            spend: 40.0,
            impressions: 120_000,
            clicks: 2_400,
            conversions: 60,
            revenue: 180.0,
        },
    );

    let mut brand = Campaign::new(org_id, "Brand Awareness", 200.0);
    brand.status = CampaignStatus::Active;
    let brand_id = store.insert_campaign(brand);
    store.set_metrics(
        brand_id,
        CampaignMetrics {
            spend: 150.0,
            impressions: 300_000,
            clicks: 1_500,
            conversions: 3,
            revenue: 90.0,
        },
    );

    let mut launch = Campaign::new(org_id, "Product Launch", 300.0);
    launch.status = CampaignStatus::Scheduled;
    launch.start_date = Utc::now() - Duration::hours(1);
    store.insert_campaign(launch);

    store.insert_rule(AutomationRule::new(
        org_id,
        "Pause high-CPA campaigns",
        RuleCondition {
            metric: "cpa".into(),
            operator: ComparisonOp::Gt,
            value: serde_json::json!(40.0),
        },
        RuleAction::PauseCampaign,
    ));

    info!(org_id = %org_id, "Demo organization seeded");
    org_id
}
