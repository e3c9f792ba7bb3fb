//! Safeguard transform library.
//!
//! A catalog of small, independent transform functions, each mapping one
//! vendor security-product API response (Okta, Microsoft 365, CrowdStrike,
//! Zscaler, AWS, Saviynt, Avanan, Blumira) into a normalized record
//! describing whether a security control ("safeguard") is satisfied:
//!
//! - Tolerant input decoding: parsed JSON values, JSON text, UTF-8 bytes,
//!   and loosely-quoted literal payloads
//! - Ordered, absence-tolerant envelope peeling (`response`, `result`,
//!   vendor-specific wrappers)
//! - A containment guarantee: transforms never raise; any internal failure
//!   degrades to the safeguard's conservative default plus an `error` field
//! - Optional per-safeguard input schema declarations for upstream
//!   validation
//!
//! ## Example
//!
//! ```
//! use safeguard_transforms::transforms::microsoft;
//!
//! let report =
//!     microsoft::security_defaults_enabled(r#"{"value": {"isEnabled": true}}"#);
//! assert_eq!(report["isSecurityDefaultsEnabled"], true);
//! ```

pub mod input;
pub mod report;
pub mod schema;
pub mod transforms;
pub mod value;

pub use input::{normalize, Payload, RawInput};
pub use report::{guarded, percentage, FlagPolicy, Report, TransformError};
pub use schema::InputSchema;
