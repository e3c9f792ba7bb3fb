//! Avanan safeguard evaluators.

use crate::input::{normalize, RawInput};
use crate::report::{guarded, FlagPolicy, Report};
use serde_json::{json, Value};

/// Evaluate whether inline email protection is active.
///
/// Avanan nests the substantive payload under `responseData`. A non-null
/// response without the explicit flag counts as enabled; a vendor `errors`
/// key overrides to disabled.
pub fn inline_protection_enabled(input: impl Into<RawInput>) -> Report {
    let raw = input.into();
    guarded(
        &[("isInlineProtectionEnabled", Value::Bool(false))],
        move || {
            let payload = normalize(raw, &["response", "responseData"])?;
            let policy = FlagPolicy {
                field: "inlineProtection",
                assume_on_response: true,
            };
            let mut report = Report::new();
            report.insert(
                "isInlineProtectionEnabled".to_string(),
                Value::Bool(policy.evaluate(&payload)),
            );
            if let Some(mode) = payload.get("protectionMode").and_then(Value::as_str) {
                report.insert("protectionMode".to_string(), json!(mode));
            }
            Ok(report)
        },
    )
}
