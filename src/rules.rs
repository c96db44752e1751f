// Rule descriptors, compilation, and evaluation

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{RuleError, ValidationFailure};

// Canned patterns for the common registration-form checks
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

static DIGIT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").unwrap());

static SPECIAL_CHAR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[!@#$%^&*(),.?":{}|<>]"#).unwrap());

/// Named validation strategy, used in descriptors and failure reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Trimmed value must be non-empty
    Required,
    /// Value must be at least N characters
    Min,
    /// Value must be at most N characters
    Max,
    /// Pattern must match somewhere in the value
    Regexp,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Required => "required",
            RuleKind::Min => "min",
            RuleKind::Max => "max",
            RuleKind::Regexp => "regexp",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation rule with its failure message.
///
/// Each variant carries exactly the data its kind needs. Rules are immutable
/// once constructed; a field evaluates its rules in declaration order, and the
/// first failing rule supplies the surfaced message.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Passes iff the value, after trimming, is non-empty
    Required { message: String },

    /// Passes iff the value is at least `min` characters long
    Min { min: usize, message: String },

    /// Passes iff the value is at most `max` characters long
    Max { max: usize, message: String },

    /// Passes iff the pattern matches somewhere in the value (no implicit
    /// anchoring; anchor inside the pattern for full-string checks)
    Regexp { pattern: Regex, message: String },
}

impl Rule {
    /// Trimmed value must be non-empty
    pub fn required(message: impl Into<String>) -> Self {
        Rule::Required {
            message: message.into(),
        }
    }

    /// Value must be at least `min` characters (Unicode scalar values)
    pub fn min(min: usize, message: impl Into<String>) -> Self {
        Rule::Min {
            min,
            message: message.into(),
        }
    }

    /// Value must be at most `max` characters
    pub fn max(max: usize, message: impl Into<String>) -> Self {
        Rule::Max {
            max,
            message: message.into(),
        }
    }

    /// Value must contain a match for `pattern`.
    ///
    /// A pattern that does not compile is a configuration defect and is
    /// rejected here rather than at evaluation time.
    pub fn regexp(pattern: &str, message: impl Into<String>) -> Result<Self, RuleError> {
        Ok(Rule::Regexp {
            pattern: Regex::new(pattern)?,
            message: message.into(),
        })
    }

    /// Email-shape check using the canned pattern
    pub fn email(message: impl Into<String>) -> Self {
        Rule::Regexp {
            pattern: EMAIL_REGEX.clone(),
            message: message.into(),
        }
    }

    /// Value must contain at least one digit
    pub fn contains_digit(message: impl Into<String>) -> Self {
        Rule::Regexp {
            pattern: DIGIT_REGEX.clone(),
            message: message.into(),
        }
    }

    /// Value must contain at least one special character
    pub fn contains_special_char(message: impl Into<String>) -> Self {
        Rule::Regexp {
            pattern: SPECIAL_CHAR_REGEX.clone(),
            message: message.into(),
        }
    }

    /// Get the rule kind
    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::Required { .. } => RuleKind::Required,
            Rule::Min { .. } => RuleKind::Min,
            Rule::Max { .. } => RuleKind::Max,
            Rule::Regexp { .. } => RuleKind::Regexp,
        }
    }

    /// Get the failure message
    pub fn message(&self) -> &str {
        match self {
            Rule::Required { message }
            | Rule::Min { message, .. }
            | Rule::Max { message, .. }
            | Rule::Regexp { message, .. } => message,
        }
    }

    /// Check a value against this rule alone.
    ///
    /// Lengths count Unicode scalar values, not bytes.
    pub fn passes(&self, value: &str) -> bool {
        match self {
            Rule::Required { .. } => !value.trim().is_empty(),
            Rule::Min { min, .. } => value.chars().count() >= *min,
            Rule::Max { max, .. } => value.chars().count() <= *max,
            Rule::Regexp { pattern, .. } => pattern.is_match(value),
        }
    }

    /// Evaluate a value, producing the failure record on a miss
    pub fn evaluate(&self, value: &str, field: &str) -> Result<(), ValidationFailure> {
        if self.passes(value) {
            Ok(())
        } else {
            Err(ValidationFailure::new(field, self.kind(), self.message()))
        }
    }
}

/// Declarative rule form, as a form screen or config file supplies it.
///
/// `value` is a number for `min`/`max` and a pattern string for `regexp`;
/// `required` takes none. Descriptors are compiled into [`Rule`]s up front so
/// malformed input is rejected before any evaluation runs.
///
/// ```
/// use formgate::RuleDescriptor;
///
/// let descriptors: Vec<RuleDescriptor> = serde_json::from_str(r#"[
///     { "rule": "required", "message": "Email is required" },
///     { "rule": "regexp",
///       "value": "^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\\.[a-zA-Z]{2,}$",
///       "message": "Email is invalid" }
/// ]"#).unwrap();
///
/// let rules = formgate::compile_rules(&descriptors).unwrap();
/// assert_eq!(rules.len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDescriptor {
    /// Rule kind tag
    pub rule: RuleKind,

    /// Numeric threshold or pattern string, depending on the kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<RuleValue>,

    /// Failure message, surfaced verbatim
    pub message: String,
}

/// Kind-dependent descriptor payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    /// Threshold for `min`/`max`
    Number(usize),
    /// Pattern source for `regexp`
    Pattern(String),
}

impl RuleDescriptor {
    /// Compile this descriptor into an evaluable rule
    pub fn compile(&self) -> Result<Rule, RuleError> {
        match self.rule {
            RuleKind::Required => Ok(Rule::required(&self.message)),
            RuleKind::Min => match self.value {
                Some(RuleValue::Number(n)) => Ok(Rule::min(n, &self.message)),
                _ => Err(RuleError::MissingNumber("min")),
            },
            RuleKind::Max => match self.value {
                Some(RuleValue::Number(n)) => Ok(Rule::max(n, &self.message)),
                _ => Err(RuleError::MissingNumber("max")),
            },
            RuleKind::Regexp => match &self.value {
                Some(RuleValue::Pattern(p)) => Rule::regexp(p, &self.message),
                _ => Err(RuleError::MissingPattern),
            },
        }
    }
}

/// Compile an ordered descriptor list, failing on the first defect
pub fn compile_rules(descriptors: &[RuleDescriptor]) -> Result<Vec<Rule>, RuleError> {
    descriptors.iter().map(RuleDescriptor::compile).collect()
}
