//! Okta safeguard evaluators.

use crate::input::{normalize, Payload, RawInput};
use crate::report::{guarded, Report, TransformError};
use crate::schema::InputSchema;
use crate::value::{contains_keyword, truthy};
use serde::Deserialize;
use serde_json::{json, Value};

/// Raw Okta factor type strings mapped to canonical authenticator labels.
/// Unmapped types pass through unchanged (e.g. `push`).
const FACTOR_LABELS: &[(&str, &str)] = &[
    ("token:software:totp", "TOTP"),
    ("token:hotp", "HOTP"),
    ("token:hardware", "OTP"),
    ("webauthn", "FIDO"),
    ("u2f", "FIDO"),
];

/// Factor types excluded outright, regardless of status.
const DISALLOWED_FACTORS: &[&str] = &["sms"];

/// Canonical labels that satisfy the factor-policy safeguard.
const ACCEPTED_LABELS: &[&str] = &["FIDO", "OTP", "TOTP"];

/// Keywords that mark an audit-log event as SSO-related.
pub const SSO_AUDIT_KEYWORDS: &[&str] = &[
    "saml",
    "sso",
    "single sign-on",
    "single sign on",
    "identity provider",
    "oidc",
];

/// One enrolled factor record.
#[derive(Debug, Deserialize)]
struct Factor {
    /// Vendor factor type string, e.g. `token:software:totp`.
    #[serde(default, rename = "factorType")]
    factor_type: String,
    /// Enrollment status; only `ACTIVE` factors count.
    #[serde(default)]
    status: String,
}

/// Evaluate whether only accepted MFA factor types are active.
///
/// Active factors are canonicalized through a fixed translation table,
/// `sms` is excluded outright, and the criteria is true iff the remaining
/// canonical set is non-empty and every member is an accepted label.
pub fn mfa_factor_policy(input: impl Into<RawInput>) -> Report {
    let raw = input.into();
    guarded(&[("authTypesAllowed", Value::Bool(false))], move || {
        let payload = normalize(raw, &["response", "result"])?;
        let records: &[Value] = match &payload {
            Payload::Sequence(items) => items,
            Payload::Mapping(map) => map
                .get("factors")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .ok_or_else(|| {
                    TransformError::Shape(
                        "expected a factor list or a mapping with a `factors` key".to_string(),
                    )
                })?,
            Payload::Scalar(_) => {
                return Err(TransformError::Shape(
                    "expected a factor list, found a scalar".to_string(),
                ))
            }
        };

        let mut labels: Vec<String> = Vec::new();
        for record in records {
            let factor: Factor = serde_json::from_value(record.clone())
                .map_err(|e| TransformError::Shape(e.to_string()))?;
            if !factor.status.eq_ignore_ascii_case("active") {
                continue;
            }
            let raw_type = factor.factor_type.to_ascii_lowercase();
            if DISALLOWED_FACTORS.contains(&raw_type.as_str()) {
                continue;
            }
            let label = FACTOR_LABELS
                .iter()
                .find(|(from, _)| *from == raw_type)
                .map(|(_, to)| (*to).to_string())
                .unwrap_or(raw_type);
            if !labels.contains(&label) {
                labels.push(label);
            }
        }

        let allowed = !labels.is_empty()
            && labels
                .iter()
                .all(|label| ACCEPTED_LABELS.contains(&label.as_str()));

        let mut report = Report::new();
        report.insert("authTypesAllowed".to_string(), Value::Bool(allowed));
        report.insert("activeFactors".to_string(), json!(labels));
        Ok(report)
    })
}

/// Evaluate whether SSO appears active, from accumulated evidence.
///
/// No single authoritative field exists; three independent signals are all
/// checked (no short-circuit): an explicit `ssoEnabled` flag, a non-null
/// `idp` substructure, and keyword hits in audit-log text fields against
/// [`SSO_AUDIT_KEYWORDS`].
pub fn sso_audit_evidence(input: impl Into<RawInput>) -> Report {
    let raw = input.into();
    guarded(&[("isSSOEnabled", Value::Bool(false))], move || {
        let payload = normalize(raw, &["response"])?;

        let mut enabled = false;
        if payload.get("ssoEnabled").is_some_and(truthy) {
            enabled = true;
        }
        if payload.get("idp").is_some_and(|v| !v.is_null()) {
            enabled = true;
        }

        let events: &[Value] = match &payload {
            Payload::Sequence(items) => items,
            Payload::Mapping(map) => map
                .get("logs")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            Payload::Scalar(_) => &[],
        };

        let mut matched_events = 0u64;
        for event in events {
            let hit = ["eventType", "displayMessage", "legacyEventType"]
                .iter()
                .filter_map(|field| event.get(*field))
                .filter_map(Value::as_str)
                .any(|text| contains_keyword(text, SSO_AUDIT_KEYWORDS));
            if hit {
                matched_events += 1;
            }
        }
        if matched_events > 0 {
            enabled = true;
        }

        let mut report = Report::new();
        report.insert("isSSOEnabled".to_string(), Value::Bool(enabled));
        report.insert("matchedAuditEvents".to_string(), json!(matched_events));
        Ok(report)
    })
}

/// Input schema declaration for [`mfa_factor_policy`].
pub fn mfa_factor_schema() -> InputSchema {
    InputSchema::new(
        "okta.mfa_factor_policy",
        json!({
            "type": ["array", "object"],
            "items": {
                "type": "object",
                "properties": {
                    "factorType": {"type": "string"},
                    "status": {"type": "string"}
                }
            }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_policy_excludes_sms_and_rejects_push() {
        let factors = json!([
            {"factorType": "sms", "status": "ACTIVE"},
            {"factorType": "push", "status": "ACTIVE"},
            {"factorType": "token:software:totp", "status": "ACTIVE"}
        ]);
        let report = mfa_factor_policy(factors);
        assert_eq!(report["authTypesAllowed"], false);
        assert_eq!(report["activeFactors"], json!(["push", "TOTP"]));
    }

    #[test]
    fn test_factor_policy_accepts_fido_and_totp() {
        let factors = json!([
            {"factorType": "webauthn", "status": "ACTIVE"},
            {"factorType": "token:software:totp", "status": "ACTIVE"},
            {"factorType": "sms", "status": "INACTIVE"}
        ]);
        let report = mfa_factor_policy(factors);
        assert_eq!(report["authTypesAllowed"], true);
        assert_eq!(report["activeFactors"], json!(["FIDO", "TOTP"]));
    }

    #[test]
    fn test_factor_policy_empty_set_fails() {
        let report = mfa_factor_policy(json!([]));
        assert_eq!(report["authTypesAllowed"], false);
    }

    #[test]
    fn test_factor_policy_unwraps_factors_key() {
        let wrapped = json!({"factors": [
            {"factorType": "u2f", "status": "ACTIVE"}
        ]});
        let report = mfa_factor_policy(wrapped);
        assert_eq!(report["authTypesAllowed"], true);
        assert_eq!(report["activeFactors"], json!(["FIDO"]));
    }

    #[test]
    fn test_factor_policy_degrades_on_scalar() {
        let report = mfa_factor_policy(json!(42));
        assert_eq!(report["authTypesAllowed"], false);
        assert!(report.contains_key("error"));
    }

    #[test]
    fn test_sso_evidence_from_audit_keywords() {
        let logs = json!([
            {"eventType": "user.session.start", "displayMessage": "User login"},
            {"eventType": "user.authentication.auth_via_IDP", "displayMessage": "SAML assertion issued"}
        ]);
        let report = sso_audit_evidence(logs);
        assert_eq!(report["isSSOEnabled"], true);
        assert_eq!(report["matchedAuditEvents"], 1);
    }

    #[test]
    fn test_sso_evidence_checks_all_signals() {
        let report = sso_audit_evidence(json!({
            "ssoEnabled": true,
            "logs": [
                {"eventType": "system.sso.rule.evaluate"}
            ]
        }));
        assert_eq!(report["isSSOEnabled"], true);
        // Both signals are counted even though the flag alone suffices.
        assert_eq!(report["matchedAuditEvents"], 1);
    }

    #[test]
    fn test_sso_evidence_negative() {
        let logs = json!([
            {"eventType": "user.session.start", "displayMessage": "Password login"}
        ]);
        let report = sso_audit_evidence(logs);
        assert_eq!(report["isSSOEnabled"], false);
        assert_eq!(report["matchedAuditEvents"], 0);
    }

    #[test]
    fn test_schema_accepts_extra_fields() {
        let schema = mfa_factor_schema();
        let instance = json!([
            {"factorType": "sms", "status": "ACTIVE", "provider": "OKTA"}
        ]);
        assert!(schema.is_valid(&instance));
    }
}
