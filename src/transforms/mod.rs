//! Per-vendor safeguard evaluators.
//!
//! Each evaluator is a pure function `fn(input: impl Into<RawInput>) ->
//! Report`, built on [`crate::input::normalize`] and
//! [`crate::report::guarded`]. Evaluators never raise: any internal
//! failure degrades to the safeguard's conservative default plus an
//! `error` field.

pub mod avanan;
pub mod aws;
pub mod blumira;
pub mod crowdstrike;
pub mod microsoft;
pub mod okta;
pub mod saviynt;
pub mod zscaler;
