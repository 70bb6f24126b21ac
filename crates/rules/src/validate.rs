//! Rule validation: malformed definitions are rejected with a list of
//! error strings before they can execute.

use autopilot_core::types::{AutomationRule, ComparisonOp, RuleAction};

/// Collect every problem with a rule definition. An empty result means
/// the rule is executable.
pub fn validate_rule(rule: &AutomationRule) -> Vec<String> {
    let mut errors = Vec::new();

    if rule.condition.metric.trim().is_empty() {
        errors.push("condition metric is empty".to_string());
    }

    match rule.condition.operator {
        ComparisonOp::In => {
            match rule.condition.value.as_array() {
                Some(list) if list.is_empty() => {
                    errors.push("'in' condition has an empty list".to_string())
                }
                Some(_) => {}
                None => errors.push("'in' condition value must be a list".to_string()),
            }
        }
        ComparisonOp::Contains => {
            if rule.condition.value.as_str().is_none() {
                errors.push("'contains' condition value must be a string".to_string());
            }
        }
        _ => {
            let numeric = match &rule.condition.value {
                serde_json::Value::Number(n) => n.as_f64().map_or(false, f64::is_finite),
                serde_json::Value::String(s) => s.parse::<f64>().map_or(false, |v| v.is_finite()),
                _ => false,
            };
            if !numeric {
                errors.push(format!(
                    "condition value {} is not numeric",
                    rule.condition.value
                ));
            }
        }
    }

    match &rule.action {
        RuleAction::AdjustBudget { percent, .. } | RuleAction::AdjustBid { percent } => {
            if !(*percent > 0.0 && *percent <= 100.0) {
                errors.push(format!("adjustment percent {percent} must be in (0, 100]"));
            }
        }
        RuleAction::Notify { message } => {
            if message.trim().is_empty() {
                errors.push("notify message is empty".to_string());
            }
        }
        RuleAction::TriggerWebhook { url } => {
            if url.trim().is_empty() {
                errors.push("webhook url is empty".to_string());
            }
        }
        RuleAction::TagEntity { tag } => {
            if tag.trim().is_empty() {
                errors.push("tag is empty".to_string());
            }
        }
        RuleAction::PauseCampaign => {}
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use autopilot_core::types::{AdjustDirection, RuleCondition};
    use uuid::Uuid;

    fn rule_with(condition: RuleCondition, action: RuleAction) -> AutomationRule {
        AutomationRule::new(Uuid::new_v4(), "test", condition, action)
    }

    #[test]
    fn test_valid_rule_has_no_errors() {
        let rule = rule_with(
            RuleCondition {
                metric: "roas".into(),
                operator: ComparisonOp::Lt,
                value: serde_json::json!(1.5),
            },
            RuleAction::PauseCampaign,
        );
        assert!(validate_rule(&rule).is_empty());
    }

    #[test]
    fn test_collects_multiple_errors() {
        let rule = rule_with(
            RuleCondition {
                metric: "  ".into(),
                operator: ComparisonOp::Gt,
                value: serde_json::json!(null),
            },
            RuleAction::AdjustBudget {
                direction: AdjustDirection::Increase,
                percent: 150.0,
            },
        );
        let errors = validate_rule(&rule);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_in_requires_nonempty_list() {
        let rule = rule_with(
            RuleCondition {
                metric: "clicks".into(),
                operator: ComparisonOp::In,
                value: serde_json::json!([]),
            },
            RuleAction::PauseCampaign,
        );
        assert_eq!(validate_rule(&rule).len(), 1);
    }
}
