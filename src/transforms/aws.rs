//! AWS safeguard evaluators.

use crate::input::{normalize, Payload, RawInput};
use crate::report::{guarded, Report, TransformError};
use crate::schema::InputSchema;
use crate::value::first_path;
use serde_json::{json, Value};

/// Nesting conventions under which RDS reports automated backups. Tried in
/// order; the first match wins, and no match means the empty baseline.
const BACKUP_PATHS: &[&[&str]] = &[
    &[
        "DescribeDBInstanceAutomatedBackupsResponse",
        "DescribeDBInstanceAutomatedBackupsResult",
        "DBInstanceAutomatedBackups",
    ],
    &[
        "DescribeDBInstanceAutomatedBackupsResult",
        "DBInstanceAutomatedBackups",
    ],
    &["DBInstanceAutomatedBackups"],
    &["DBInstanceAutomatedBackup"],
];

/// Evaluate whether RDS automated backups are retained.
///
/// Drills through the vendor's nesting conventions (including the singular
/// single-record variant) and counts instances with a positive
/// `BackupRetentionPeriod`.
pub fn rds_automated_backups(input: impl Into<RawInput>) -> Report {
    let raw = input.into();
    guarded(&[("backupsEnabled", Value::Bool(false))], move || {
        let payload = normalize(raw, &["response", "result"])?;
        let map = match &payload {
            Payload::Mapping(map) => map,
            Payload::Sequence(_) | Payload::Scalar(_) => {
                return Err(TransformError::Shape(
                    "expected a mapping of backup descriptions".to_string(),
                ))
            }
        };

        let backups: Vec<Value> = match first_path(map, BACKUP_PATHS) {
            Some(Value::Array(items)) => items.clone(),
            Some(Value::Object(single)) => vec![Value::Object(single.clone())],
            _ => Vec::new(),
        };

        let retained = backups
            .iter()
            .filter(|backup| {
                backup
                    .get("BackupRetentionPeriod")
                    .and_then(Value::as_u64)
                    .unwrap_or(0)
                    > 0
            })
            .count();

        let mut report = Report::new();
        report.insert("backupsEnabled".to_string(), Value::Bool(retained > 0));
        report.insert("retainedInstanceCount".to_string(), json!(retained));
        report.insert("totalInstanceCount".to_string(), json!(backups.len()));
        Ok(report)
    })
}

/// Input schema declaration for [`rds_automated_backups`].
pub fn rds_automated_backups_schema() -> InputSchema {
    InputSchema::new(
        "aws.rds_automated_backups",
        json!({
            "type": "object",
            "properties": {
                "DBInstanceAutomatedBackups": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "BackupRetentionPeriod": {"type": "integer"}
                        }
                    }
                }
            }
        }),
    )
}
