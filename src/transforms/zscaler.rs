//! Zscaler safeguard evaluators.

use crate::input::{normalize, RawInput};
use crate::report::{guarded, FlagPolicy, Report};
use serde_json::Value;

/// Evaluate whether SSL inspection is enabled.
///
/// A non-null response without the explicit `sslScanEnabled` flag counts
/// as enabled; a vendor `errors` key overrides to disabled.
pub fn ssl_inspection_enabled(input: impl Into<RawInput>) -> Report {
    let raw = input.into();
    guarded(&[("isSslInspectionEnabled", Value::Bool(false))], move || {
        let payload = normalize(raw, &["response"])?;
        let policy = FlagPolicy {
            field: "sslScanEnabled",
            assume_on_response: true,
        };
        let mut report = Report::new();
        report.insert(
            "isSslInspectionEnabled".to_string(),
            Value::Bool(policy.evaluate(&payload)),
        );
        Ok(report)
    })
}
