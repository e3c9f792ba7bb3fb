//! Microsoft 365 safeguard evaluators.

use crate::input::{normalize, RawInput};
use crate::report::{guarded, percentage, FlagPolicy, Report, TransformError};
use crate::schema::InputSchema;
use serde::Deserialize;
use serde_json::{json, Value};

/// One Graph user-registration-details record.
#[derive(Debug, Deserialize)]
struct UserRegistration {
    /// `Member` or `Guest`; absent means member.
    #[serde(default, rename = "userType")]
    user_type: String,
    /// Whether the user has registered an MFA method.
    #[serde(default, rename = "isMfaRegistered")]
    is_mfa_registered: bool,
}

/// Evaluate whether security defaults are enforced for the tenant.
///
/// Graph wraps the enforcement policy in a `value` envelope. A non-null
/// response without the explicit flag counts as enabled; a vendor `errors`
/// key overrides to disabled.
pub fn security_defaults_enabled(input: impl Into<RawInput>) -> Report {
    let raw = input.into();
    guarded(
        &[("isSecurityDefaultsEnabled", Value::Bool(false))],
        move || {
            let payload = normalize(raw, &["response", "value"])?;
            let policy = FlagPolicy {
                field: "isEnabled",
                assume_on_response: true,
            };
            let mut report = Report::new();
            report.insert(
                "isSecurityDefaultsEnabled".to_string(),
                Value::Bool(policy.evaluate(&payload)),
            );
            Ok(report)
        },
    )
}

/// Evaluate MFA registration coverage over the tenant's users.
///
/// Eligible users are members (guests are excluded); passing users have an
/// MFA method registered. Reports the ratio over eligible users as the
/// criteria, plus the ratio over all users and the raw counts.
pub fn mfa_registration_coverage(input: impl Into<RawInput>) -> Report {
    let raw = input.into();
    guarded(&[("compliancePercentage", json!(0))], move || {
        let payload = normalize(raw, &["response", "value"])?;
        let records = payload.sequence()?;

        let total = records.len();
        let mut eligible = 0usize;
        let mut registered = 0usize;
        for record in records {
            let user: UserRegistration = serde_json::from_value(record.clone())
                .map_err(|e| TransformError::Shape(e.to_string()))?;
            let member = user.user_type.is_empty() || user.user_type.eq_ignore_ascii_case("member");
            if !member {
                continue;
            }
            eligible += 1;
            if user.is_mfa_registered {
                registered += 1;
            }
        }

        let compliance = percentage(registered, eligible)?;
        let coverage = percentage(registered, total)?;

        let mut report = Report::new();
        report.insert("compliancePercentage".to_string(), json!(compliance));
        report.insert("coveragePercentage".to_string(), json!(coverage));
        report.insert("totalUsers".to_string(), json!(total));
        report.insert("eligibleUsers".to_string(), json!(eligible));
        report.insert("registeredUsers".to_string(), json!(registered));
        Ok(report)
    })
}

/// Input schema declaration for [`mfa_registration_coverage`].
pub fn mfa_registration_schema() -> InputSchema {
    InputSchema::new(
        "microsoft.mfa_registration_coverage",
        json!({
            "type": ["array", "object"],
            "items": {
                "type": "object",
                "properties": {
                    "userType": {"type": "string"},
                    "isMfaRegistered": {"type": "boolean"}
                }
            }
        }),
    )
}
