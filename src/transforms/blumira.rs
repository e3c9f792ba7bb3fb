//! Blumira safeguard evaluators.

use crate::input::{normalize, Payload, RawInput};
use crate::report::{guarded, Report};
use crate::value::truthy;
use serde_json::{json, Value};

/// Evaluate whether detection rules are active, from accumulated evidence.
///
/// Signals are checked in priority order and the first positive one
/// decides (short-circuit variant): an explicit `detectionEnabled` flag,
/// then any enabled/active rule record, then a positive
/// `totalActiveRules` counter.
pub fn detection_rules_active(input: impl Into<RawInput>) -> Report {
    let raw = input.into();
    guarded(&[("detectionRulesActive", Value::Bool(false))], move || {
        let payload = normalize(raw, &["response", "data"])?;

        let rules: &[Value] = match &payload {
            Payload::Sequence(items) => items,
            Payload::Mapping(map) => map
                .get("rules")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            Payload::Scalar(_) => &[],
        };

        let active_count = rules
            .iter()
            .filter(|rule| {
                rule.get("enabled").map(truthy).unwrap_or(false)
                    || rule
                        .get("status")
                        .and_then(Value::as_str)
                        .map(|s| s.eq_ignore_ascii_case("active"))
                        .unwrap_or(false)
            })
            .count();

        let active = payload.get("detectionEnabled").is_some_and(truthy)
            || active_count > 0
            || payload
                .get("totalActiveRules")
                .and_then(Value::as_u64)
                .unwrap_or(0)
                > 0;

        let mut report = Report::new();
        report.insert("detectionRulesActive".to_string(), Value::Bool(active));
        report.insert("activeRuleCount".to_string(), json!(active_count));
        Ok(report)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_flag_wins() {
        let report = detection_rules_active(json!({"detectionEnabled": true, "rules": []}));
        assert_eq!(report["detectionRulesActive"], true);
        assert_eq!(report["activeRuleCount"], 0);
    }

    #[test]
    fn test_active_rule_records() {
        let response = json!({"data": {"rules": [
            {"name": "lateral movement", "enabled": true},
            {"name": "stale rule", "enabled": false},
            {"name": "impossible travel", "status": "ACTIVE"}
        ]}});
        let report = detection_rules_active(response);
        assert_eq!(report["detectionRulesActive"], true);
        assert_eq!(report["activeRuleCount"], 2);
    }

    #[test]
    fn test_counter_fallback() {
        let report = detection_rules_active(json!({"totalActiveRules": 12}));
        assert_eq!(report["detectionRulesActive"], true);
    }

    #[test]
    fn test_no_signal_is_inactive() {
        let report = detection_rules_active(json!({"rules": [], "totalActiveRules": 0}));
        assert_eq!(report["detectionRulesActive"], false);
    }
}
