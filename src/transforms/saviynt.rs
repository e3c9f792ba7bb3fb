//! Saviynt safeguard evaluators.

use crate::input::{normalize, Payload, RawInput};
use crate::report::{guarded, percentage, Report, TransformError};
use serde::Deserialize;
use serde_json::{json, Value};

/// One Saviynt account record.
#[derive(Debug, Deserialize)]
struct Account {
    /// Account name, carried into the offending-records list.
    #[serde(default, rename = "accountName")]
    account_name: String,
    /// Whether the account holds privileged entitlements.
    #[serde(default)]
    privileged: bool,
    /// Whether the last access certification covered this account.
    #[serde(default)]
    certified: bool,
    /// Account lifecycle status; absent means active.
    #[serde(default)]
    status: String,
}

/// Evaluate certification coverage of privileged accounts.
///
/// Eligible accounts are active and privileged; passing accounts were
/// certified. Uncertified privileged accounts are listed by name as the
/// offending records.
pub fn privileged_access_certification(input: impl Into<RawInput>) -> Report {
    let raw = input.into();
    guarded(&[("certificationPercentage", json!(0))], move || {
        let payload = normalize(raw, &["response", "result"])?;
        let records: &[Value] = match &payload {
            Payload::Sequence(items) => items,
            Payload::Mapping(map) => map
                .get("accounts")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .ok_or_else(|| {
                    TransformError::Shape(
                        "expected an account list or a mapping with an `accounts` key".to_string(),
                    )
                })?,
            Payload::Scalar(_) => {
                return Err(TransformError::Shape(
                    "expected an account list, found a scalar".to_string(),
                ))
            }
        };

        let mut eligible = 0usize;
        let mut certified = 0usize;
        let mut uncertified: Vec<String> = Vec::new();
        for record in records {
            let account: Account = serde_json::from_value(record.clone())
                .map_err(|e| TransformError::Shape(e.to_string()))?;
            let active = account.status.is_empty() || account.status.eq_ignore_ascii_case("active");
            if !account.privileged || !active {
                continue;
            }
            eligible += 1;
            if account.certified {
                certified += 1;
            } else {
                uncertified.push(account.account_name);
            }
        }

        let ratio = percentage(certified, eligible)?;

        let mut report = Report::new();
        report.insert("certificationPercentage".to_string(), json!(ratio));
        report.insert("privilegedAccounts".to_string(), json!(eligible));
        report.insert("certifiedAccounts".to_string(), json!(certified));
        report.insert("uncertifiedAccounts".to_string(), json!(uncertified));
        Ok(report)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certification_ratio_and_offenders() {
        let accounts = json!({"result": {"accounts": [
            {"accountName": "root-admin", "privileged": true, "certified": true},
            {"accountName": "db-admin", "privileged": true, "certified": false},
            {"accountName": "old-admin", "privileged": true, "certified": false,
             "status": "disabled"},
            {"accountName": "viewer", "privileged": false, "certified": false}
        ]}});
        let report = privileged_access_certification(accounts);
        assert_eq!(report["certificationPercentage"], 50);
        assert_eq!(report["privilegedAccounts"], 2);
        assert_eq!(report["certifiedAccounts"], 1);
        assert_eq!(report["uncertifiedAccounts"], json!(["db-admin"]));
    }

    #[test]
    fn test_no_privileged_accounts_degrades() {
        let accounts = json!([{"accountName": "viewer", "privileged": false}]);
        let report = privileged_access_certification(accounts);
        assert_eq!(report["certificationPercentage"], 0);
        assert!(report.contains_key("error"));
    }
}
