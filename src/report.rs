//! Output contract: the report mapping, error taxonomy, and containment
//! guard shared by every evaluator.

use crate::input::Payload;
use crate::value::truthy;
use serde_json::{Map, Value};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;
use tracing::warn;

/// Normalized result of one transform invocation.
///
/// Always JSON-serializable, always carries the safeguard's criteria field,
/// and carries an `error` string when the evaluator degraded.
pub type Report = Map<String, Value>;

/// Errors an evaluator can hit internally. None of these ever reach the
/// caller as an error; [`guarded`] converts them into a degraded report.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Text/bytes could not be decoded as JSON, even after repair.
    #[error("input is not valid JSON: {0}")]
    InvalidInputFormat(String),

    /// The input encoding itself is unusable.
    #[error("unsupported input type: {0}")]
    UnsupportedInputType(&'static str),

    /// An expected mapping/sequence/field was missing or mistyped.
    #[error("unexpected input shape: {0}")]
    Shape(String),

    /// A ratio was requested over an empty denominator set.
    #[error("cannot compute ratio over zero {0}")]
    EmptyDenominator(&'static str),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// Run an evaluator under the containment guarantee.
///
/// On success the evaluator's report is returned unchanged. On error, and
/// on panic, the report is rebuilt from `defaults` (the safeguard's
/// conservative criteria values) plus an `error` field with the failure
/// description. The criteria field is therefore always present and always
/// of the declared type, so callers can read it without an existence check.
pub fn guarded<F>(defaults: &[(&str, Value)], eval: F) -> Report
where
    F: FnOnce() -> Result<Report, TransformError>,
{
    match panic::catch_unwind(AssertUnwindSafe(eval)) {
        Ok(Ok(report)) => report,
        Ok(Err(err)) => degraded(defaults, err.to_string()),
        Err(payload) => degraded(defaults, panic_message(payload.as_ref())),
    }
}

/// Build the conservative-default report with an error description.
fn degraded(defaults: &[(&str, Value)], message: String) -> Report {
    warn!(error = %message, "transform degraded to conservative defaults");
    let mut report = Report::new();
    for (key, value) in defaults {
        report.insert((*key).to_string(), value.clone());
    }
    report.insert("error".to_string(), Value::String(message));
    report
}

/// Extract a readable message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "evaluator panicked".to_string()
    }
}

/// Decision table for the flag-with-default evaluator family.
///
/// | condition                          | outcome               |
/// |------------------------------------|-----------------------|
/// | payload carries an `errors` key    | `false`               |
/// | flag field present                 | truthiness of field   |
/// | field absent, payload non-null     | `assume_on_response`  |
/// | payload null                       | `false`               |
///
/// The "non-null implies pass" row preserves the vendors' optimistic
/// default pending an explicit negative signal; it is a product decision,
/// not an inference this crate makes on its own.
#[derive(Debug, Clone, Copy)]
pub struct FlagPolicy {
    /// Field carrying the explicit flag, when the vendor sends one.
    pub field: &'static str,
    /// Value assumed when the field is absent but a payload was returned.
    pub assume_on_response: bool,
}

impl FlagPolicy {
    /// Evaluate the decision table against a normalized payload.
    pub fn evaluate(&self, payload: &Payload) -> bool {
        if payload.has_errors() {
            return false;
        }
        if let Some(flag) = payload.get(self.field) {
            return truthy(flag);
        }
        !payload.is_null() && self.assume_on_response
    }
}

/// Percentage of `passing` over `eligible`, rounded to the nearest integer.
///
/// # Errors
/// Returns [`TransformError::EmptyDenominator`] when `eligible` is zero.
pub fn percentage(passing: usize, eligible: usize) -> Result<u64, TransformError> {
    if eligible == 0 {
        return Err(TransformError::EmptyDenominator("eligible records"));
    }
    let ratio = passing as f64 / eligible as f64 * 100.0;
    Ok(ratio.round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{normalize, RawInput};
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        normalize(RawInput::from(value), &[]).unwrap()
    }

    #[test]
    fn test_guarded_passes_through_success() {
        let report = guarded(&[("ok", Value::Bool(false))], || {
            let mut r = Report::new();
            r.insert("ok".to_string(), Value::Bool(true));
            Ok(r)
        });
        assert_eq!(report["ok"], true);
        assert!(!report.contains_key("error"));
    }

    #[test]
    fn test_guarded_degrades_on_error() {
        let report = guarded(&[("count", json!(0))], || {
            Err(TransformError::Shape("boom".to_string()))
        });
        assert_eq!(report["count"], 0);
        assert_eq!(report["error"], "unexpected input shape: boom");
    }

    #[test]
    fn test_guarded_contains_panics() {
        let report = guarded(&[("ok", Value::Bool(false))], || panic!("bad index"));
        assert_eq!(report["ok"], false);
        assert_eq!(report["error"], "bad index");
    }

    #[test]
    fn test_flag_policy_reads_explicit_field() {
        let policy = FlagPolicy {
            field: "isEnabled",
            assume_on_response: true,
        };
        assert!(policy.evaluate(&payload(json!({"isEnabled": true}))));
        assert!(!policy.evaluate(&payload(json!({"isEnabled": false}))));
    }

    #[test]
    fn test_flag_policy_assumes_on_non_null_response() {
        let policy = FlagPolicy {
            field: "isEnabled",
            assume_on_response: true,
        };
        assert!(policy.evaluate(&payload(json!({"unrelated": 1}))));
        assert!(!policy.evaluate(&payload(json!(null))));
    }

    #[test]
    fn test_flag_policy_errors_key_overrides() {
        let policy = FlagPolicy {
            field: "isEnabled",
            assume_on_response: true,
        };
        let p = payload(json!({"errors": ["denied"], "isEnabled": true}));
        assert!(!policy.evaluate(&p));
    }

    #[test]
    fn test_percentage_rounds() {
        assert_eq!(percentage(7, 10).unwrap(), 70);
        assert_eq!(percentage(1, 3).unwrap(), 33);
        assert_eq!(percentage(2, 3).unwrap(), 67);
    }

    #[test]
    fn test_percentage_guards_zero_denominator() {
        let err = percentage(5, 0).unwrap_err();
        assert!(matches!(err, TransformError::EmptyDenominator(_)));
    }
}
