// Validation failures and construction-time errors

use std::fmt;

use thiserror::Error;

use crate::rules::RuleKind;

/// A single failed rule for a field.
///
/// Failures are data, not exceptions: the engine reports validity as a boolean
/// plus the first failing rule's message, and the UI layer renders it inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Field key that failed validation
    pub field: String,

    /// Rule kind that failed
    pub rule: RuleKind,

    /// Failure message, carried verbatim from the rule
    pub message: String,
}

impl ValidationFailure {
    /// Create a new validation failure
    pub fn new(field: impl Into<String>, rule: RuleKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationFailure {}

/// Collection of current failures across a form
#[derive(Debug, Clone, Default)]
pub struct ValidationFailures {
    pub failures: Vec<ValidationFailure>,
}

impl ValidationFailures {
    /// Create a new failures collection
    pub fn new(failures: Vec<ValidationFailure>) -> Self {
        Self { failures }
    }

    /// Check if there are any failures
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Get the number of failures
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Add a failure
    pub fn add(&mut self, failure: ValidationFailure) {
        self.failures.push(failure);
    }

    /// Get the failure for a specific field, if any
    pub fn for_field(&self, field: &str) -> Option<&ValidationFailure> {
        self.failures.iter().find(|f| f.field == field)
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "failures": self.failures.iter().map(|f| {
                serde_json::json!({
                    "field": f.field,
                    "rule": f.rule.as_str(),
                    "message": f.message,
                })
            }).collect::<Vec<_>>()
        })
    }
}

impl fmt::Display for ValidationFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for failure in &self.failures {
            writeln!(f, "{}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailures {}

impl From<Vec<ValidationFailure>> for ValidationFailures {
    fn from(failures: Vec<ValidationFailure>) -> Self {
        Self::new(failures)
    }
}

/// Rejection of a malformed rule descriptor.
///
/// These are configuration defects caught when descriptors are compiled into
/// rules; evaluation itself has no error path.
#[derive(Debug, Error)]
pub enum RuleError {
    /// `min`/`max` descriptor without a numeric value
    #[error("rule `{0}` requires a numeric value")]
    MissingNumber(&'static str),

    /// `regexp` descriptor without a pattern string
    #[error("rule `regexp` requires a pattern value")]
    MissingPattern,

    /// `regexp` descriptor with a pattern that does not compile
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Returned by [`Form::set_value`](crate::Form::set_value) for a key the form
/// does not own.
#[derive(Debug, Error)]
#[error("unknown field `{0}`")]
pub struct UnknownField(pub String);

/// Submission rejected because at least one field is invalid
#[derive(Debug, Error)]
#[error("fill all fields correctly ({} invalid)", fields.len())]
pub struct SubmitError {
    /// Keys of the currently-invalid fields, in declaration order
    pub fields: Vec<String>,
}
