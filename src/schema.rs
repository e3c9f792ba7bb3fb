//! Optional per-safeguard input schema declarations.

use jsonschema::JSONSchema;
use serde_json::Value;

/// Declared structural expectation for one safeguard's vendor payload.
///
/// Declarations are permissive: unknown fields always pass, and every
/// declared field is optional. They never drive evaluator behavior; they
/// exist so an upstream caller can pre-validate or document the expected
/// vendor shape. Evaluators stay defensive regardless (defense in depth,
/// not mutual exclusivity).
#[derive(Debug, Clone)]
pub struct InputSchema {
    /// Safeguard the declaration belongs to, as `vendor.safeguard`.
    pub safeguard: &'static str,
    /// JSON Schema document.
    pub document: Value,
}

impl InputSchema {
    /// Create a declaration for a safeguard.
    pub fn new(safeguard: &'static str, document: Value) -> Self {
        Self {
            safeguard,
            document,
        }
    }

    /// Whether an instance satisfies the declaration.
    pub fn is_valid(&self, instance: &Value) -> bool {
        match JSONSchema::compile(&self.document) {
            Ok(compiled) => compiled.is_valid(instance),
            Err(_) => false,
        }
    }

    /// Validate an instance, collecting every violation message.
    ///
    /// # Errors
    /// Returns the violation messages (or the compile failure) as strings.
    pub fn validate(&self, instance: &Value) -> Result<(), Vec<String>> {
        let compiled = JSONSchema::compile(&self.document).map_err(|e| vec![e.to_string()])?;
        let outcome = match compiled.validate(instance) {
            Ok(()) => Ok(()),
            Err(errors) => Err(errors.map(|e| e.to_string()).collect()),
        };
        outcome
    }
}
