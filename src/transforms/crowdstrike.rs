//! CrowdStrike safeguard evaluators.

use crate::input::{normalize, Payload, RawInput};
use crate::report::{guarded, percentage, Report, TransformError};
use crate::value::truthy;
use serde::Deserialize;
use serde_json::{json, Value};

/// One Falcon host record.
#[derive(Debug, Deserialize)]
struct Host {
    /// Installed sensor version; empty means no sensor reported.
    #[serde(default)]
    agent_version: String,
}

/// Evaluate sensor coverage across the tenant's hosts.
///
/// Falcon wraps host records in a `resources` envelope. A host counts as
/// covered when it reports a sensor version.
pub fn sensor_coverage(input: impl Into<RawInput>) -> Report {
    let raw = input.into();
    guarded(&[("sensorCoveragePercentage", json!(0))], move || {
        let payload = normalize(raw, &["response", "resources"])?;
        let records = payload.sequence()?;

        let total = records.len();
        let mut covered = 0usize;
        for record in records {
            let host: Host = serde_json::from_value(record.clone())
                .map_err(|e| TransformError::Shape(e.to_string()))?;
            if !host.agent_version.is_empty() {
                covered += 1;
            }
        }

        let coverage = percentage(covered, total)?;

        let mut report = Report::new();
        report.insert("sensorCoveragePercentage".to_string(), json!(coverage));
        report.insert("totalHosts".to_string(), json!(total));
        report.insert("coveredHosts".to_string(), json!(covered));
        Ok(report)
    })
}

/// Evaluate whether the prevention policy is enabled.
///
/// Falcon returns the policy as the first record of `resources`; the
/// record's `enabled` flag decides the criteria.
pub fn prevention_policy_enabled(input: impl Into<RawInput>) -> Report {
    let raw = input.into();
    guarded(
        &[("isPreventionPolicyEnabled", Value::Bool(false))],
        move || {
            let payload = normalize(raw, &["response", "resources"])?;
            let first = match &payload {
                Payload::Sequence(items) => items.first(),
                Payload::Mapping(_) | Payload::Scalar(_) => None,
            }
            .ok_or_else(|| {
                TransformError::Shape("expected at least one policy record".to_string())
            })?;

            let enabled = first.get("enabled").map(truthy).unwrap_or(false);

            let mut report = Report::new();
            report.insert(
                "isPreventionPolicyEnabled".to_string(),
                Value::Bool(enabled),
            );
            if let Some(name) = first.get("name").and_then(Value::as_str) {
                report.insert("policyName".to_string(), json!(name));
            }
            Ok(report)
        },
    )
}
