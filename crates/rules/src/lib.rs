//! Automation rules: condition evaluation, action execution, and the
//! per-campaign / per-org rules engine.

pub mod actions;
pub mod engine;
pub mod evaluator;
pub mod validate;

pub use actions::ActionExecutor;
pub use engine::{CampaignRunResult, OrgRunSummary, RulesEngine};
pub use evaluator::evaluate;
pub use validate::validate_rule;
